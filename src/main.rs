//! # LCARS Face Host
//!
//! This binary plays the part of the watch-face runtime: it delivers lifecycle
//! callbacks to the engine on one event queue, owns the single tick timer and
//! the time-zone watcher, and presents frames into an in-memory framebuffer.
//! In development mode each frame is echoed to the terminal as ASCII or JSON.


use anyhow::Context;
use lcars_face_lib::{
    clock::{SystemClock, TimeSource},
    config::{Config, ConfigError, CONFIG_FILE},
    engine::WatchFaceEngine,
    logging,
    raster::{draw_ascii, rasterize, FrameBuffer},
    scheduler::{Effect, Event},
};
use std::env;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

/// How often the zone watcher compares the system offset.
const ZONE_POLL_INTERVAL: Duration = Duration::from_secs(60);
/// Ambient displays are refreshed by the host once a minute.
const TIME_TICK_INTERVAL: Duration = Duration::from_secs(60);
const ASCII_COLUMNS: u32 = 60;

/// Parsed command line switches.
#[derive(Debug, Default, PartialEq)]
struct Options {
    stdout: bool,
    json: bool,
    ambient: bool,
    frames: Option<u64>,
}

impl Options {
    fn parse<I: IntoIterator<Item = String>>(args: I) -> anyhow::Result<Self> {
        let mut options = Options::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--stdout" => options.stdout = true,
                "--json" => options.json = true,
                "--ambient" => options.ambient = true,
                "--frames" => {
                    let count = args.next().context("--frames needs a count")?;
                    let count: u64 = count
                        .parse()
                        .with_context(|| format!("invalid frame count '{}'", count))?;
                    anyhow::ensure!(count > 0, "--frames needs at least one frame");
                    options.frames = Some(count);
                }
                other => anyhow::bail!("unknown argument '{}'", other),
            }
        }
        Ok(options)
    }
}

/// Host-side resources the scheduler's effects act on.
struct Host {
    events: UnboundedSender<Event>,
    timer: Option<JoinHandle<()>>,
    zone_watcher: Option<JoinHandle<()>>,
    dirty: bool,
}

impl Host {
    fn new(events: UnboundedSender<Event>) -> Self {
        Self {
            events,
            timer: None,
            zone_watcher: None,
            dirty: false,
        }
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Redraw => self.dirty = true,
                Effect::CancelTimer => {
                    if let Some(timer) = self.timer.take() {
                        timer.abort();
                    }
                }
                Effect::ArmTimer { delay_ms } => {
                    // Only one tick may be outstanding.
                    if let Some(timer) = self.timer.take() {
                        timer.abort();
                    }
                    let events = self.events.clone();
                    self.timer = Some(tokio::spawn(async move {
                        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                        let _ = events.send(Event::TimerFired);
                    }));
                }
                Effect::RegisterZoneListener => {
                    if self.zone_watcher.is_none() {
                        self.zone_watcher = Some(spawn_zone_watcher(self.events.clone()));
                        tracing::debug!("zone watcher registered");
                    }
                }
                Effect::UnregisterZoneListener => {
                    if let Some(watcher) = self.zone_watcher.take() {
                        watcher.abort();
                        tracing::debug!("zone watcher unregistered");
                    }
                }
            }
        }
    }

    fn shutdown(&mut self) {
        for handle in [self.timer.take(), self.zone_watcher.take()].into_iter().flatten() {
            handle.abort();
        }
    }
}

/// Poll the system offset and report changes as zone-change notifications.
fn spawn_zone_watcher(events: UnboundedSender<Event>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let clock = SystemClock;
        let mut last = clock.default_zone();
        let mut interval = tokio::time::interval(ZONE_POLL_INTERVAL);
        interval.tick().await;
        loop {
            interval.tick().await;
            let zone = clock.default_zone();
            if zone != last {
                last = zone;
                if events.send(Event::TimeZoneChanged).is_err() {
                    break;
                }
            }
        }
    })
}

fn spawn_time_ticker(events: UnboundedSender<Event>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(TIME_TICK_INTERVAL);
        interval.tick().await;
        loop {
            interval.tick().await;
            if events.send(Event::TimeTick).is_err() {
                break;
            }
        }
    })
}

/// Present one frame and echo it in development mode.
fn present(
    engine: &WatchFaceEngine<SystemClock>,
    buffer: &mut FrameBuffer,
    options: &Options,
) -> anyhow::Result<()> {
    let Some(frame) = engine.frame() else {
        return Ok(());
    };
    rasterize(&frame, buffer).ok();

    let time = frame.iter().find_map(|p| p.text()).unwrap_or_default();
    tracing::info!(time, mode = ?engine.mode(), "frame presented");

    if options.json {
        println!("{}", serde_json::to_string(&frame).context("serialize frame")?);
    }
    if options.stdout {
        draw_ascii(buffer, ASCII_COLUMNS);
        println!();
    }
    Ok(())
}

async fn run(
    config: Config,
    options: Options,
    events_tx: UnboundedSender<Event>,
    mut events_rx: UnboundedReceiver<Event>,
) -> anyhow::Result<()> {
    let mut engine = WatchFaceEngine::with_interval(SystemClock, config.face.tick_interval_ms);
    let mut host = Host::new(events_tx.clone());
    let mut buffer = FrameBuffer::new(config.display.width, config.display.height);
    let ticker = spawn_time_ticker(events_tx.clone());

    // Startup sequence as a watch-face runtime would deliver it.
    host.apply(engine.on_create());
    host.apply(engine.on_properties_changed(false, false));
    host.apply(engine.on_surface_changed(config.display.width, config.display.height));
    if options.ambient || config.face.start_ambient {
        host.apply(engine.on_ambient_mode_changed(true));
    }
    host.apply(engine.on_visibility_changed(true));

    // One listener for the whole loop so an interrupt during a present is kept.
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut presented = 0u64;
    loop {
        if host.dirty {
            host.dirty = false;
            present(&engine, &mut buffer, &options)?;
            presented += 1;
            if options.frames.is_some_and(|limit| presented >= limit) {
                break;
            }
        }

        tokio::select! {
            event = events_rx.recv() => {
                let Some(event) = event else { break };
                host.apply(engine.handle(event));
                // Drain whatever queued up meanwhile so redraws coalesce.
                while let Ok(event) = events_rx.try_recv() {
                    host.apply(engine.handle(event));
                }
            }
            _ = &mut ctrl_c => {
                tracing::info!("interrupted");
                break;
            }
        }
    }

    host.apply(engine.on_visibility_changed(false));
    host.apply(engine.on_destroy());
    host.shutdown();
    ticker.abort();
    tracing::info!(frames = presented, "face destroyed");
    Ok(())
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    let options = Options::parse(env::args().skip(1))?;

    // Logging depends on the config, so report how loading went afterwards.
    let loaded = Config::try_load_from_path(CONFIG_FILE);
    let config = loaded.as_ref().cloned().unwrap_or_default();
    logging::init(config.logging.debug);
    match loaded {
        Ok(_) => tracing::info!("loaded {}", CONFIG_FILE),
        Err(ConfigError::Read(_)) => tracing::info!("no config file found, using defaults"),
        Err(e) => tracing::warn!(error = %e, "invalid config file, using defaults"),
    }

    // One cooperative thread delivers every callback in order.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .enable_io()
        .build()
        .context("build event loop runtime")?;

    let (events_tx, events_rx) = mpsc::unbounded_channel();
    runtime.block_on(run(config, options, events_tx, events_rx))
}

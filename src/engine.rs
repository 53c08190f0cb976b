//! # Watch Face Engine
//!
//! Binds the redraw [`Scheduler`] to a [`TimeSource`] and exposes one method
//! per host lifecycle callback. Each callback returns the effects the host
//! loop must perform; [`WatchFaceEngine::draw_frame`] produces the pixels
//! when the host decides to present.
//!
//! The host is expected to deliver callbacks one at a time on a single
//! thread; nothing here is synchronized.

use crate::clock::TimeSource;
use crate::layout::{render_frame, DrawPrimitive};
use crate::raster::rasterize;
use crate::scheduler::{Effect, Event, Scheduler, TapKind, INTERACTIVE_UPDATE_RATE_MS};
use crate::{ClockSample, DisplayMetrics, RenderMode};
use embedded_graphics::{pixelcolor::Rgb888, prelude::DrawTarget};

pub struct WatchFaceEngine<T> {
    scheduler: Scheduler,
    clock: T,
}

impl<T: TimeSource> WatchFaceEngine<T> {
    pub fn new(clock: T) -> Self {
        Self::with_interval(clock, INTERACTIVE_UPDATE_RATE_MS)
    }

    pub fn with_interval(clock: T, tick_interval_ms: u64) -> Self {
        let scheduler = Scheduler::with_interval(clock.default_zone(), tick_interval_ms);
        Self { scheduler, clock }
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn clock(&self) -> &T {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut T {
        &mut self.clock
    }

    /// Forward any event, reading the clock at delivery time.
    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        let now_ms = self.clock.now_millis();
        let zone = self.clock.default_zone();
        let effects = self.scheduler.handle(event, now_ms, zone);
        tracing::trace!(?event, ?effects, "event handled");
        effects
    }

    pub fn on_create(&mut self) -> Vec<Effect> {
        self.handle(Event::Created)
    }

    pub fn on_destroy(&mut self) -> Vec<Effect> {
        self.handle(Event::Destroyed)
    }

    pub fn on_surface_changed(&mut self, width: u32, height: u32) -> Vec<Effect> {
        self.handle(Event::SurfaceReady {
            width: width as f32,
            height: height as f32,
        })
    }

    pub fn on_visibility_changed(&mut self, visible: bool) -> Vec<Effect> {
        self.handle(Event::VisibilityChanged(visible))
    }

    pub fn on_ambient_mode_changed(&mut self, is_ambient: bool) -> Vec<Effect> {
        self.handle(Event::AmbientModeChanged(is_ambient))
    }

    /// Display capabilities; kept for future burn-in handling.
    pub fn on_properties_changed(&mut self, low_bit_ambient: bool, burn_in_protection: bool) -> Vec<Effect> {
        self.handle(Event::PropertiesChanged {
            low_bit_ambient,
            burn_in_protection,
        })
    }

    pub fn on_interruption_filter_changed(&mut self, filter_is_none: bool) -> Vec<Effect> {
        self.handle(Event::InterruptionFilterChanged(filter_is_none))
    }

    pub fn on_tap_command(&mut self, kind: TapKind, x: i32, y: i32, event_time_ms: i64) -> Vec<Effect> {
        self.handle(Event::Tap {
            kind,
            x,
            y,
            event_time_ms,
        })
    }

    pub fn on_time_tick(&mut self) -> Vec<Effect> {
        self.handle(Event::TimeTick)
    }

    pub fn on_time_zone_changed(&mut self) -> Vec<Effect> {
        self.handle(Event::TimeZoneChanged)
    }

    pub fn on_timer_fired(&mut self) -> Vec<Effect> {
        self.handle(Event::TimerFired)
    }

    /// Surface size, once the host has reported one.
    pub fn metrics(&self) -> Option<DisplayMetrics> {
        self.scheduler
            .state()
            .surface
            .map(|(width, height)| DisplayMetrics::new(width, height))
    }

    pub fn mode(&self) -> RenderMode {
        RenderMode::from_ambient(self.scheduler.state().is_ambient)
    }

    /// Read the clock now, in the zone the scheduler last refreshed.
    pub fn sample(&self) -> ClockSample {
        ClockSample::at(self.clock.now_millis(), self.scheduler.state().time_zone)
    }

    /// Primitives for a frame at the current instant, or `None` before the
    /// surface exists.
    pub fn frame(&self) -> Option<Vec<DrawPrimitive>> {
        let metrics = self.metrics()?;
        Some(render_frame(metrics, self.mode(), &self.sample()))
    }

    /// Render and rasterize the current frame onto `target`.
    ///
    /// Returns `Ok(false)` when there is no surface yet.
    pub fn draw_frame<D>(&self, target: &mut D) -> Result<bool, D::Error>
    where
        D: DrawTarget<Color = Rgb888>,
    {
        let Some(frame) = self.frame() else {
            tracing::debug!("draw requested before surface was ready");
            return Ok(false);
        };
        rasterize(&frame, target)?;
        Ok(true)
    }
}

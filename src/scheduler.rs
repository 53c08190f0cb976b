//! # Redraw Scheduler
//!
//! Decides when the face must be redrawn and whether the one-second tick
//! should be running. The scheduler owns no timer and no listener: every
//! transition returns a list of [`Effect`]s for the host loop to carry out,
//! in order.
//!
//! ## Timer Discipline
//! - The tick runs iff the face is visible and not ambient
//! - Any event that can flip that predicate cancels the pending tick first,
//!   then arms a zero-delay tick if the predicate holds, so the first frame
//!   after waking is immediate
//! - Every tick re-arms itself to land on the next wall-clock second
//!
//! ## Zone Listener Discipline
//! The time-zone-change listener is registered when the face becomes visible
//! and unregistered when it is hidden. A guard flag makes both directions
//! idempotent so the host never sees a double registration.

use chrono::FixedOffset;

/// Default tick period while active.
pub const INTERACTIVE_UPDATE_RATE_MS: u64 = 1000;

/// Kind of touch interaction reported by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TapKind {
    /// A finger went down.
    Touch,
    /// The touch turned into another gesture or was abandoned.
    TouchCancel,
    /// A complete tap.
    Tap,
}

/// Lifecycle and timer events delivered by the host, one at a time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    Created,
    Destroyed,
    SurfaceReady { width: f32, height: f32 },
    VisibilityChanged(bool),
    AmbientModeChanged(bool),
    PropertiesChanged {
        low_bit_ambient: bool,
        burn_in_protection: bool,
    },
    /// `true` when the interruption filter is "none", i.e. the wearer muted everything.
    InterruptionFilterChanged(bool),
    Tap {
        kind: TapKind,
        x: i32,
        y: i32,
        event_time_ms: i64,
    },
    /// Once-a-minute tick the host sends while ambient.
    TimeTick,
    TimeZoneChanged,
    TimerFired,
}

/// Side effects requested from the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Present a new frame. Hosts may coalesce several of these.
    Redraw,
    /// Drop the pending tick, if any.
    CancelTimer,
    /// Schedule the single tick callback after `delay_ms`.
    ArmTimer { delay_ms: u64 },
    RegisterZoneListener,
    UnregisterZoneListener,
}

/// Everything the scheduler remembers between events.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SchedulerState {
    pub is_visible: bool,
    pub is_ambient: bool,
    pub is_muted: bool,
    pub time_zone: FixedOffset,
    pub timer_armed: bool,
    pub zone_listener_registered: bool,
    pub low_bit_ambient: bool,
    pub burn_in_protection: bool,
    /// Latest surface size, `None` until the surface exists.
    pub surface: Option<(f32, f32)>,
}

impl SchedulerState {
    pub fn new(time_zone: FixedOffset) -> Self {
        Self {
            is_visible: false,
            is_ambient: false,
            is_muted: false,
            time_zone,
            timer_armed: false,
            zone_listener_registered: false,
            low_bit_ambient: false,
            burn_in_protection: false,
            surface: None,
        }
    }

    /// The tick runs only while the face is on screen and fully powered.
    pub fn should_timer_run(&self) -> bool {
        self.is_visible && !self.is_ambient
    }
}

/// Delay that puts the next tick on the next multiple of `interval_ms`.
///
/// Always within `(0, interval_ms]`: a fire landing exactly on a boundary
/// waits a full interval.
pub fn next_tick_delay_ms(now_ms: i64, interval_ms: u64) -> u64 {
    let interval = interval_ms.max(1);
    interval - now_ms.rem_euclid(interval as i64) as u64
}

/// The redraw state machine.
#[derive(Clone, Debug)]
pub struct Scheduler {
    state: SchedulerState,
    tick_interval_ms: u64,
}

impl Scheduler {
    pub fn new(time_zone: FixedOffset) -> Self {
        Self::with_interval(time_zone, INTERACTIVE_UPDATE_RATE_MS)
    }

    pub fn with_interval(time_zone: FixedOffset, tick_interval_ms: u64) -> Self {
        Self {
            state: SchedulerState::new(time_zone),
            tick_interval_ms: tick_interval_ms.max(1),
        }
    }

    pub fn state(&self) -> &SchedulerState {
        &self.state
    }

    pub fn tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms
    }

    /// Apply one event.
    ///
    /// `now_ms` is the wall clock at delivery and `system_zone` the current
    /// system default zone; both are only consulted by the events that need them.
    pub fn handle(&mut self, event: Event, now_ms: i64, system_zone: FixedOffset) -> Vec<Effect> {
        let mut effects = Vec::new();

        match event {
            Event::Created => {
                tracing::debug!("face created");
            }
            Event::Destroyed => {
                effects.push(Effect::CancelTimer);
                self.state.timer_armed = false;
                self.unregister_zone_listener(&mut effects);
                tracing::debug!("face destroyed");
            }
            Event::SurfaceReady { width, height } => {
                self.state.surface = Some((width, height));
                tracing::debug!(width, height, "surface ready");
            }
            Event::VisibilityChanged(visible) => {
                self.state.is_visible = visible;
                if visible {
                    self.register_zone_listener(&mut effects);
                    // The zone may have changed while hidden.
                    self.state.time_zone = system_zone;
                    effects.push(Effect::Redraw);
                } else {
                    self.unregister_zone_listener(&mut effects);
                }
                self.update_timer(&mut effects);
                tracing::debug!(visible, "visibility changed");
            }
            Event::AmbientModeChanged(is_ambient) => {
                self.state.is_ambient = is_ambient;
                self.update_timer(&mut effects);
                effects.push(Effect::Redraw);
                tracing::debug!(is_ambient, "ambient mode changed");
            }
            Event::PropertiesChanged {
                low_bit_ambient,
                burn_in_protection,
            } => {
                self.state.low_bit_ambient = low_bit_ambient;
                self.state.burn_in_protection = burn_in_protection;
            }
            Event::InterruptionFilterChanged(filter_is_none) => {
                // Muting has no visual treatment yet; it only forces a fresh frame.
                if self.state.is_muted != filter_is_none {
                    self.state.is_muted = filter_is_none;
                    effects.push(Effect::Redraw);
                    tracing::debug!(muted = filter_is_none, "interruption filter changed");
                }
            }
            Event::Tap { kind, x, y, .. } => {
                tracing::trace!(?kind, x, y, "tap");
                effects.push(Effect::Redraw);
            }
            Event::TimeTick => {
                effects.push(Effect::Redraw);
            }
            Event::TimeZoneChanged => {
                self.state.time_zone = system_zone;
                effects.push(Effect::Redraw);
                tracing::debug!(zone = %system_zone, "time zone changed");
            }
            Event::TimerFired => {
                self.state.timer_armed = false;
                effects.push(Effect::Redraw);
                if self.state.should_timer_run() {
                    let delay_ms = next_tick_delay_ms(now_ms, self.tick_interval_ms);
                    effects.push(Effect::ArmTimer { delay_ms });
                    self.state.timer_armed = true;
                }
            }
        }

        effects
    }

    fn update_timer(&mut self, effects: &mut Vec<Effect>) {
        effects.push(Effect::CancelTimer);
        self.state.timer_armed = false;
        if self.state.should_timer_run() {
            effects.push(Effect::ArmTimer { delay_ms: 0 });
            self.state.timer_armed = true;
        }
    }

    fn register_zone_listener(&mut self, effects: &mut Vec<Effect>) {
        if self.state.zone_listener_registered {
            return;
        }
        self.state.zone_listener_registered = true;
        effects.push(Effect::RegisterZoneListener);
    }

    fn unregister_zone_listener(&mut self, effects: &mut Vec<Effect>) {
        if !self.state.zone_listener_registered {
            return;
        }
        self.state.zone_listener_registered = false;
        effects.push(Effect::UnregisterZoneListener);
    }
}

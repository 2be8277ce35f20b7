//! Transient notification board
//!
//! One message at a time, shown until its expiry elapses. Posting while a
//! message is pending replaces it and restarts the countdown: last write
//! wins, nothing queues. The board is pure state - expiry is observed via
//! `expire_if_due(now)` or, from the async runtime, via the generation
//! returned by `post` so a superseded hide can never fire.

use std::time::Duration;

use hydro_core::SimTime;

/// Default display duration for control-surface notifications
pub const DEFAULT_DURATION: Duration = Duration::from_millis(3000);

/// Display duration for the leak alert notification
pub const LEAK_ALERT_DURATION: Duration = Duration::from_millis(6000);

/// Message shown when the leak alert raises
pub const LEAK_ALERT_MESSAGE: &str =
    "Potential leak detected! Check system or shut off pump.";

/// Messages posted by the pump toggle
pub const PUMP_ON_MESSAGE: &str = "Pump turned ON";
pub const PUMP_OFF_MESSAGE: &str = "Pump turned OFF";

/// Message posted by the emergency shut-off
pub const EMERGENCY_MESSAGE: &str = "Emergency shut-off activated. Pump is now OFF.";

/// A transient user-facing message
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Notification {
    pub message: String,
    pub visible: bool,
    /// When `visible` flips back to false
    pub expires_at: SimTime,
}

/// Receipt for a posted notification
///
/// Carries what the runtime needs to schedule the deferred hide: the
/// generation to guard against superseded expiries, and the duration to
/// sleep for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Posted {
    pub generation: u64,
    pub duration: Duration,
}

/// Holds the single current notification
#[derive(Clone, Debug, Default)]
pub struct NotificationBoard {
    current: Notification,
    generation: u64,
}

impl NotificationBoard {
    pub fn new() -> Self {
        NotificationBoard::default()
    }

    /// Post a message, superseding any pending one
    pub fn post(&mut self, message: &str, duration: Duration, now: SimTime) -> Posted {
        self.generation += 1;
        self.current = Notification {
            message: message.to_string(),
            visible: true,
            expires_at: now + duration,
        };
        tracing::debug!(message, ?duration, "notification posted");
        Posted {
            generation: self.generation,
            duration,
        }
    }

    /// Hide the notification if its expiry has elapsed
    ///
    /// Expiry is inclusive: `now >= expires_at` hides.
    pub fn expire_if_due(&mut self, now: SimTime) -> bool {
        if self.current.visible && now >= self.current.expires_at {
            self.current.visible = false;
            tracing::debug!("notification expired");
            return true;
        }
        false
    }

    /// Hide the notification posted as `generation`
    ///
    /// A hide scheduled for an earlier post is a no-op: the newer message
    /// keeps its own countdown.
    pub fn expire_generation(&mut self, generation: u64) -> bool {
        if self.current.visible && self.generation == generation {
            self.current.visible = false;
            tracing::debug!("notification expired");
            return true;
        }
        false
    }

    #[inline]
    pub fn current(&self) -> &Notification {
        &self.current
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.current.visible
    }
}

//! Alert hysteresis state machine

use hydro_core::LeakProbability;

/// Score above which a clear alert raises
pub const RAISE_THRESHOLD: u8 = 70;

/// Score below which an active alert clears
pub const CLEAR_THRESHOLD: u8 = 30;

/// Alert state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AlertState {
    #[default]
    Clear,
    Active,
}

/// Outcome of feeding one score into the machine
///
/// `Raised` is edge-triggered: it is returned exactly once per
/// `Clear -> Active` transition, never while the alert is held.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlertTransition {
    /// `Clear -> Active` edge; the caller owes the user a notification
    Raised,
    /// `Active -> Clear` edge
    Cleared,
    /// No transition; score is inside the hysteresis band or on the
    /// wrong side of the threshold for the current state
    Held,
}

/// Hysteresis machine over the leak score
///
/// Raise strictly above [`RAISE_THRESHOLD`], clear strictly below
/// [`CLEAR_THRESHOLD`]; everything in between holds. The dead-zone keeps the
/// alert from flapping when scores hover near a single threshold.
#[derive(Clone, Debug, Default)]
pub struct AlertMachine {
    state: AlertState,
}

impl AlertMachine {
    pub fn new() -> Self {
        AlertMachine::default()
    }

    #[inline]
    pub fn state(&self) -> AlertState {
        self.state
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.state == AlertState::Active
    }

    /// Evaluate one emitted score
    pub fn observe(&mut self, probability: LeakProbability) -> AlertTransition {
        let percent = probability.as_percent();
        match self.state {
            AlertState::Clear if percent > RAISE_THRESHOLD => {
                self.state = AlertState::Active;
                tracing::debug!(percent, "leak alert raised");
                AlertTransition::Raised
            }
            AlertState::Active if percent < CLEAR_THRESHOLD => {
                self.state = AlertState::Clear;
                tracing::debug!(percent, "leak alert cleared");
                AlertTransition::Cleared
            }
            _ => AlertTransition::Held,
        }
    }

    /// Force the machine clear, bypassing hysteresis
    ///
    /// Used when the pump turns off: the alert drops immediately and no
    /// notification is owed. Returns `true` if the alert was active.
    pub fn force_clear(&mut self) -> bool {
        let was_active = self.is_active();
        if was_active {
            tracing::debug!("leak alert force-cleared");
        }
        self.state = AlertState::Clear;
        was_active
    }
}

//! Monitor - shared state, tick functions, control and read surfaces

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use hydro_alert::{
    AlertMachine, AlertTransition, NotificationBoard, Posted, DEFAULT_DURATION,
    EMERGENCY_MESSAGE, LEAK_ALERT_DURATION, LEAK_ALERT_MESSAGE, PUMP_OFF_MESSAGE,
    PUMP_ON_MESSAGE,
};
use hydro_core::{FlowRate, HydroError, HydroResult, LeakProbability, SimTime, UsageTotal};
use hydro_sim::{
    LeakScorer, ScorerConfig, SignalConfig, SignalGenerator, UsageAccumulator, UsageConfig,
};

/// Full scale of the flow gauge, in L/min
pub const GAUGE_FULL_SCALE_LPM: f64 = 15.0;

/// Upper bound of the expected healthy flow range, in L/min
pub const EXPECTED_FLOW_MAX_LPM: f64 = 10.0;

/// Monitor configuration
#[derive(Clone, Debug)]
pub struct MonitorConfig {
    /// Signal generator / usage accumulator cadence
    pub signal_interval: Duration,
    /// Leak scorer / alert machine cadence
    pub scorer_interval: Duration,
    pub signal: SignalConfig,
    pub scorer: ScorerConfig,
    pub usage: UsageConfig,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        MonitorConfig {
            signal_interval: Duration::from_secs(1),
            scorer_interval: Duration::from_secs(3),
            signal: SignalConfig::default(),
            scorer: ScorerConfig::default(),
            usage: UsageConfig::default(),
        }
    }
}

impl MonitorConfig {
    /// Compressed cadences for tests that drive real timers
    pub fn accelerated() -> Self {
        MonitorConfig {
            signal_interval: Duration::from_millis(10),
            scorer_interval: Duration::from_millis(30),
            ..MonitorConfig::default()
        }
    }

    pub fn validate(&self) -> HydroResult<()> {
        if self.signal_interval.is_zero() {
            return Err(HydroError::ZeroInterval { name: "signal" });
        }
        if self.scorer_interval.is_zero() {
            return Err(HydroError::ZeroInterval { name: "scorer" });
        }
        self.usage.validate()
    }
}

/// Counters maintained across the monitor's lifetime
#[derive(Clone, Debug, Default)]
pub struct RuntimeStats {
    pub signal_ticks: u64,
    pub scorer_ticks: u64,
    pub alerts_raised: u64,
    pub alerts_cleared: u64,
    pub notifications_posted: u64,
    pub notifications_expired: u64,
}

/// Read-only projection of the monitor state
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MonitorSnapshot {
    pub flow_rate: f64,
    pub total_liters: f64,
    pub leak_probability: u8,
    pub alert_active: bool,
    pub notification: NotificationView,
    pub pump_on: bool,
    pub fault_injected: bool,
}

/// The notification fields the presentation layer reads
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NotificationView {
    pub message: String,
    pub visible: bool,
}

/// The single shared mutable state
struct MonitorState {
    pump_on: bool,
    fault_injected: bool,
    flow_rate: FlowRate,
    probability: LeakProbability,
    generator: SignalGenerator,
    usage: UsageAccumulator,
    scorer: LeakScorer,
    alerts: AlertMachine,
    board: NotificationBoard,
    stats: RuntimeStats,
}

impl MonitorState {
    /// Pump-off side effects: alert force-cleared with the notification
    /// suppressed, and the published probability zeroed, in one mutation.
    fn apply_pump_off(&mut self) {
        if self.alerts.force_clear() {
            self.stats.alerts_cleared += 1;
        }
        self.probability = LeakProbability::ZERO;
    }
}

/// The simulation and decision core
///
/// Cheap to clone; clones share the same state. All mutation happens under
/// one mutex, and every tick body is a short bounded computation.
#[derive(Clone)]
pub struct Monitor {
    inner: Arc<Mutex<MonitorState>>,
}

impl Monitor {
    /// Create a monitor with entropy-seeded generators
    pub fn new(config: MonitorConfig) -> HydroResult<Self> {
        config.validate()?;
        Ok(Self::build(
            SignalGenerator::with_config(config.signal.clone()),
            LeakScorer::with_config(config.scorer.clone()),
            UsageAccumulator::with_config(&config.usage),
        ))
    }

    /// Create a monitor whose every random draw is reproducible
    pub fn seeded(config: MonitorConfig, seed: u64) -> HydroResult<Self> {
        config.validate()?;
        Ok(Self::build(
            SignalGenerator::seeded(config.signal.clone(), seed),
            LeakScorer::seeded(config.scorer.clone(), seed.wrapping_add(1)),
            UsageAccumulator::with_config(&config.usage),
        ))
    }

    fn build(
        generator: SignalGenerator,
        scorer: LeakScorer,
        usage: UsageAccumulator,
    ) -> Self {
        Monitor {
            inner: Arc::new(Mutex::new(MonitorState {
                pump_on: false,
                fault_injected: false,
                flow_rate: FlowRate::ZERO,
                probability: LeakProbability::ZERO,
                generator,
                usage,
                scorer,
                alerts: AlertMachine::new(),
                board: NotificationBoard::new(),
                stats: RuntimeStats::default(),
            })),
        }
    }

    // ------------------------------------------------------------------
    // Tick functions
    // ------------------------------------------------------------------

    /// One signal tick: draw a flow sample, publish it, feed the
    /// accumulator
    ///
    /// The sample write happens-before the accumulator read within the same
    /// locked section.
    pub fn signal_tick(&self) {
        let mut state = self.inner.lock();
        let state = &mut *state;
        let sample = state.generator.sample(state.pump_on, state.fault_injected);
        state.flow_rate = sample;
        state.usage.record(sample, state.pump_on);
        state.stats.signal_ticks += 1;
    }

    /// One scorer tick: draw a score, publish it, evaluate the alert
    /// machine
    ///
    /// Returns the notification receipt when the alert raises, so the
    /// caller can schedule the deferred hide.
    pub fn scorer_tick(&self, now: SimTime) -> Option<Posted> {
        let mut state = self.inner.lock();
        let state = &mut *state;
        let score = state.scorer.score(state.pump_on, state.fault_injected);
        state.probability = score;
        state.stats.scorer_ticks += 1;

        match state.alerts.observe(score) {
            AlertTransition::Raised => {
                state.stats.alerts_raised += 1;
                tracing::info!(percent = score.as_percent(), "leak alert raised");
                let posted = state
                    .board
                    .post(LEAK_ALERT_MESSAGE, LEAK_ALERT_DURATION, now);
                state.stats.notifications_posted += 1;
                Some(posted)
            }
            AlertTransition::Cleared => {
                state.stats.alerts_cleared += 1;
                tracing::info!(percent = score.as_percent(), "leak alert cleared");
                None
            }
            AlertTransition::Held => None,
        }
    }

    // ------------------------------------------------------------------
    // Control surface
    // ------------------------------------------------------------------

    /// Flip the pump; turning it off also force-clears the alert and zeroes
    /// the published probability
    pub fn toggle_pump(&self, now: SimTime) -> Posted {
        let mut state = self.inner.lock();
        state.pump_on = !state.pump_on;
        let message = if state.pump_on {
            PUMP_ON_MESSAGE
        } else {
            state.apply_pump_off();
            PUMP_OFF_MESSAGE
        };
        tracing::info!(pump_on = state.pump_on, "pump toggled");
        let posted = state.board.post(message, DEFAULT_DURATION, now);
        state.stats.notifications_posted += 1;
        posted
    }

    /// Flip the injected fault; returns the new value
    pub fn toggle_fault(&self) -> bool {
        let mut state = self.inner.lock();
        state.fault_injected = !state.fault_injected;
        tracing::info!(fault_injected = state.fault_injected, "fault toggled");
        state.fault_injected
    }

    /// Unconditionally stop the pump and clear the alert
    ///
    /// Safe to call when the pump is already off.
    pub fn emergency_shut_off(&self, now: SimTime) -> Posted {
        let mut state = self.inner.lock();
        state.pump_on = false;
        state.apply_pump_off();
        tracing::warn!("emergency shut-off activated");
        let posted = state.board.post(EMERGENCY_MESSAGE, DEFAULT_DURATION, now);
        state.stats.notifications_posted += 1;
        posted
    }

    // ------------------------------------------------------------------
    // Notification expiry
    // ------------------------------------------------------------------

    /// Hide the current notification if its expiry has elapsed
    pub fn expire_notifications(&self, now: SimTime) -> bool {
        let mut state = self.inner.lock();
        let expired = state.board.expire_if_due(now);
        if expired {
            state.stats.notifications_expired += 1;
        }
        expired
    }

    /// Hide the notification posted as `generation`; stale generations are
    /// no-ops
    pub fn expire_generation(&self, generation: u64) -> bool {
        let mut state = self.inner.lock();
        let expired = state.board.expire_generation(generation);
        if expired {
            state.stats.notifications_expired += 1;
        }
        expired
    }

    // ------------------------------------------------------------------
    // Read surface
    // ------------------------------------------------------------------

    pub fn pump_on(&self) -> bool {
        self.inner.lock().pump_on
    }

    pub fn fault_injected(&self) -> bool {
        self.inner.lock().fault_injected
    }

    pub fn flow_rate(&self) -> FlowRate {
        self.inner.lock().flow_rate
    }

    pub fn total_liters(&self) -> UsageTotal {
        self.inner.lock().usage.total()
    }

    pub fn leak_probability(&self) -> LeakProbability {
        self.inner.lock().probability
    }

    pub fn alert_active(&self) -> bool {
        self.inner.lock().alerts.is_active()
    }

    pub fn notification(&self) -> hydro_alert::Notification {
        self.inner.lock().board.current().clone()
    }

    pub fn stats(&self) -> RuntimeStats {
        self.inner.lock().stats.clone()
    }

    /// Clone-out projection of the whole state
    pub fn snapshot(&self) -> MonitorSnapshot {
        let state = self.inner.lock();
        MonitorSnapshot {
            flow_rate: state.flow_rate.as_l_per_min(),
            total_liters: state.usage.total().as_liters(),
            leak_probability: state.probability.as_percent(),
            alert_active: state.alerts.is_active(),
            notification: NotificationView {
                message: state.board.current().message.clone(),
                visible: state.board.current().visible,
            },
            pump_on: state.pump_on,
            fault_injected: state.fault_injected,
        }
    }

    /// Flow as a share of the gauge full scale, in percent, capped at 100
    pub fn flow_percentage(&self) -> f64 {
        let rate = self.inner.lock().flow_rate.as_l_per_min();
        (rate / GAUGE_FULL_SCALE_LPM * 100.0).min(100.0)
    }

    /// Status line for the dashboard's analysis panel
    pub fn analysis_summary(&self) -> &'static str {
        let state = self.inner.lock();
        if !state.pump_on {
            return "Pump is currently off. No flow to analyze.";
        }
        match state.probability.as_percent() {
            p if p > 70 => "Abnormal flow pattern detected - immediate inspection recommended.",
            p if p > 30 => "Flow patterns show some irregularities - monitoring closely.",
            _ => "Water flow pattern is within normal parameters.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(millis: i64) -> SimTime {
        SimTime::from_millis(millis)
    }

    fn seeded_monitor() -> Monitor {
        Monitor::seeded(MonitorConfig::default(), 1234).unwrap()
    }

    /// Drive scorer ticks until the alert raises; panics if it never does.
    fn raise_alert(monitor: &Monitor, start: SimTime) -> Posted {
        for tick in 0u64..200 {
            let now = start + Duration::from_secs(3 * tick);
            if let Some(posted) = monitor.scorer_tick(now) {
                return posted;
            }
        }
        panic!("alert never raised with fault injected");
    }

    #[test]
    fn test_initial_state() {
        let monitor = seeded_monitor();
        let snapshot = monitor.snapshot();

        assert!(!snapshot.pump_on);
        assert!(!snapshot.fault_injected);
        assert_eq!(snapshot.flow_rate, 0.0);
        assert_eq!(snapshot.total_liters, 1250.0);
        assert_eq!(snapshot.leak_probability, 0);
        assert!(!snapshot.alert_active);
        assert!(!snapshot.notification.visible);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = MonitorConfig {
            signal_interval: Duration::ZERO,
            ..MonitorConfig::default()
        };
        assert_eq!(
            Monitor::new(config).err(),
            Some(HydroError::ZeroInterval { name: "signal" })
        );
    }

    #[test]
    fn test_pump_off_ticks_publish_zero() {
        let monitor = seeded_monitor();

        monitor.signal_tick();
        monitor.scorer_tick(at(0));

        assert_eq!(monitor.flow_rate(), FlowRate::ZERO);
        assert_eq!(monitor.leak_probability(), LeakProbability::ZERO);
        assert_eq!(monitor.total_liters().as_liters(), 1250.0);
    }

    #[test]
    fn test_toggle_pump_starts_flow_and_usage() {
        let monitor = seeded_monitor();
        monitor.toggle_pump(at(0));
        assert!(monitor.pump_on());
        assert_eq!(monitor.notification().message, PUMP_ON_MESSAGE);

        monitor.signal_tick();

        let rate = monitor.flow_rate().as_l_per_min();
        assert!(rate > 0.0);

        // One accumulator tick adds rate/60, rounded to a tenth.
        let expected = hydro_core::round_tenths(1250.0 + rate / 60.0);
        assert_eq!(monitor.total_liters().as_liters(), expected);
    }

    #[test]
    fn test_toggle_pump_off_forces_alert_clear() {
        let monitor = seeded_monitor();
        monitor.toggle_pump(at(0));
        monitor.toggle_fault();
        raise_alert(&monitor, at(0));
        assert!(monitor.alert_active());

        let posted = monitor.toggle_pump(at(1000));

        assert!(!monitor.pump_on());
        assert!(!monitor.alert_active());
        assert_eq!(monitor.leak_probability(), LeakProbability::ZERO);
        // The force-clear is silent; only the pump message is posted.
        assert_eq!(monitor.notification().message, PUMP_OFF_MESSAGE);
        assert_eq!(posted.duration, DEFAULT_DURATION);
    }

    #[test]
    fn test_alert_raise_posts_leak_notification() {
        let monitor = seeded_monitor();
        monitor.toggle_pump(at(0));
        monitor.toggle_fault();

        let posted = raise_alert(&monitor, at(0));

        assert!(monitor.alert_active());
        assert_eq!(posted.duration, LEAK_ALERT_DURATION);
        let notification = monitor.notification();
        assert!(notification.visible);
        assert_eq!(notification.message, LEAK_ALERT_MESSAGE);
        assert_eq!(monitor.stats().alerts_raised, 1);
    }

    #[test]
    fn test_emergency_shut_off_is_idempotent() {
        let monitor = seeded_monitor();
        monitor.toggle_pump(at(0));
        monitor.toggle_fault();
        raise_alert(&monitor, at(0));

        monitor.emergency_shut_off(at(500));
        assert!(!monitor.pump_on());
        assert!(!monitor.alert_active());
        assert_eq!(monitor.leak_probability(), LeakProbability::ZERO);
        assert_eq!(monitor.notification().message, EMERGENCY_MESSAGE);

        // Already off: calling again changes nothing but the notification.
        monitor.emergency_shut_off(at(600));
        assert!(!monitor.pump_on());
        assert_eq!(monitor.notification().message, EMERGENCY_MESSAGE);
    }

    #[test]
    fn test_toggle_fault_has_no_notification() {
        let monitor = seeded_monitor();

        assert!(monitor.toggle_fault());
        assert!(!monitor.notification().visible);
        assert!(!monitor.toggle_fault());
        assert_eq!(monitor.stats().notifications_posted, 0);
    }

    #[test]
    fn test_flow_percentage_caps_at_one_hundred() {
        let monitor = seeded_monitor();
        assert_eq!(monitor.flow_percentage(), 0.0);

        monitor.toggle_pump(at(0));
        monitor.toggle_fault();
        monitor.signal_tick();

        // Fault flow lands in [13, 20]; the gauge caps at 15 L/min.
        let percentage = monitor.flow_percentage();
        assert!(percentage > 0.0 && percentage <= 100.0);
    }

    #[test]
    fn test_analysis_summary_bands() {
        let monitor = seeded_monitor();
        assert_eq!(
            monitor.analysis_summary(),
            "Pump is currently off. No flow to analyze."
        );

        monitor.toggle_pump(at(0));
        monitor.scorer_tick(at(0));
        // Healthy score is at most 20: the normal band.
        assert_eq!(
            monitor.analysis_summary(),
            "Water flow pattern is within normal parameters."
        );

        monitor.toggle_fault();
        raise_alert(&monitor, at(0));
        assert_eq!(
            monitor.analysis_summary(),
            "Abnormal flow pattern detected - immediate inspection recommended."
        );
    }

    #[test]
    fn test_notification_expiry_updates_stats() {
        let monitor = seeded_monitor();
        monitor.toggle_pump(at(0));

        assert!(!monitor.expire_notifications(at(2999)));
        assert!(monitor.expire_notifications(at(3000)));
        assert!(!monitor.notification().visible);
        assert_eq!(monitor.stats().notifications_expired, 1);
    }

    #[test]
    fn test_snapshot_serializes() {
        let monitor = seeded_monitor();
        monitor.toggle_pump(at(0));
        monitor.signal_tick();

        let json = serde_json::to_string(&monitor.snapshot()).unwrap();
        assert!(json.contains("\"pump_on\":true"));
        assert!(json.contains("\"notification\""));
    }
}

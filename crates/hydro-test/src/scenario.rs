//! Scenario runner - drives a monitor deterministically
//!
//! Simulated time replaces the tokio timers: the runner tracks when each
//! periodic tick is next due and fires them in timestamp order as time
//! advances, with the signal tick ahead of the scorer tick whenever both
//! land on the same instant. Every flow sample and leak score is recorded
//! so tests can assert over the whole series, not just the final state.

use std::time::Duration;

use hydro_core::{FlowRate, LeakProbability, SimTime};
use hydro_runtime::{Monitor, MonitorConfig};

/// Deterministic monitor harness
pub struct ScenarioRunner {
    monitor: Monitor,
    config: MonitorConfig,
    now: SimTime,
    next_signal: SimTime,
    next_scorer: SimTime,
    flow_history: Vec<(SimTime, FlowRate)>,
    score_history: Vec<(SimTime, LeakProbability)>,
}

impl ScenarioRunner {
    /// Create a runner with default configuration and a fixed seed
    pub fn new(seed: u64) -> Self {
        Self::with_config(MonitorConfig::default(), seed)
    }

    /// Create a runner with custom configuration and a fixed seed
    pub fn with_config(config: MonitorConfig, seed: u64) -> Self {
        let monitor = Monitor::seeded(config.clone(), seed).expect("valid scenario config");
        ScenarioRunner {
            monitor,
            next_signal: SimTime::ZERO + config.signal_interval,
            next_scorer: SimTime::ZERO + config.scorer_interval,
            config,
            now: SimTime::ZERO,
            flow_history: Vec::new(),
            score_history: Vec::new(),
        }
    }

    /// Advance simulated time, firing every due tick in timestamp order
    pub fn advance(&mut self, duration: Duration) {
        let target = self.now + duration;

        loop {
            let next = self.next_signal.min(self.next_scorer);
            if next > target {
                break;
            }
            self.now = next;

            if self.next_signal == next {
                self.monitor.signal_tick();
                self.flow_history.push((self.now, self.monitor.flow_rate()));
                self.next_signal = self.next_signal + self.config.signal_interval;
            }
            if self.next_scorer == next {
                self.monitor.scorer_tick(self.now);
                self.score_history
                    .push((self.now, self.monitor.leak_probability()));
                self.next_scorer = self.next_scorer + self.config.scorer_interval;
            }

            self.monitor.expire_notifications(self.now);
        }

        self.now = target;
        self.monitor.expire_notifications(self.now);
    }

    /// Advance by whole seconds
    pub fn run_secs(&mut self, secs: u64) {
        self.advance(Duration::from_secs(secs));
    }

    // ------------------------------------------------------------------
    // Control surface at simulated time
    // ------------------------------------------------------------------

    pub fn toggle_pump(&mut self) {
        self.monitor.toggle_pump(self.now);
    }

    pub fn toggle_fault(&mut self) {
        self.monitor.toggle_fault();
    }

    pub fn emergency_shut_off(&mut self) {
        self.monitor.emergency_shut_off(self.now);
    }

    // ------------------------------------------------------------------
    // Observation
    // ------------------------------------------------------------------

    pub fn monitor(&self) -> &Monitor {
        &self.monitor
    }

    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Every flow sample fired so far, in order
    pub fn flow_history(&self) -> &[(SimTime, FlowRate)] {
        &self.flow_history
    }

    /// Every leak score fired so far, in order
    pub fn score_history(&self) -> &[(SimTime, LeakProbability)] {
        &self.score_history
    }

    /// Keep advancing in scorer-cadence steps until the alert raises;
    /// panics after `max_ticks` scorer ticks without one
    pub fn run_until_alert(&mut self, max_ticks: usize) {
        for _ in 0..max_ticks {
            self.advance(self.config.scorer_interval);
            if self.monitor.alert_active() {
                return;
            }
        }
        panic!("alert did not raise within {max_ticks} scorer ticks");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hydro_alert::{EMERGENCY_MESSAGE, LEAK_ALERT_MESSAGE};
    use hydro_core::round_tenths;

    #[test]
    fn test_ticks_fire_on_schedule() {
        let mut runner = ScenarioRunner::new(1);
        runner.run_secs(10);

        let stats = runner.monitor().stats();
        assert_eq!(stats.signal_ticks, 10);
        assert_eq!(stats.scorer_ticks, 3);
        assert_eq!(runner.flow_history().len(), 10);
        assert_eq!(runner.score_history().len(), 3);
    }

    #[test]
    fn test_scenario_a_pump_on_starts_flow_within_one_tick() {
        let mut runner = ScenarioRunner::new(2);
        runner.toggle_pump();
        runner.run_secs(1);

        let (_, first_sample) = runner.flow_history()[0];
        assert!(first_sample.as_l_per_min() > 0.0);

        let expected = round_tenths(1250.0 + first_sample.as_l_per_min() / 60.0);
        assert_eq!(runner.monitor().total_liters().as_liters(), expected);
    }

    #[test]
    fn test_scenario_b_healthy_scores_stay_low() {
        let mut runner = ScenarioRunner::new(3);
        runner.toggle_pump();
        runner.run_secs(300);

        assert_eq!(runner.score_history().len(), 100);
        for (when, score) in runner.score_history() {
            assert!(
                score.as_percent() <= 20,
                "healthy score {score:?} at {when:?}"
            );
        }
        assert!(!runner.monitor().alert_active());
        assert_eq!(runner.monitor().stats().alerts_raised, 0);
    }

    #[test]
    fn test_scenario_c_fault_raises_alert_with_leak_notification() {
        let mut runner = ScenarioRunner::new(4);
        runner.toggle_pump();
        runner.toggle_fault();
        runner.run_until_alert(200);

        assert!(runner.monitor().alert_active());
        assert!(runner
            .score_history()
            .iter()
            .any(|(_, score)| score.as_percent() > 70));

        let notification = runner.monitor().notification();
        assert!(notification.visible);
        assert_eq!(notification.message, LEAK_ALERT_MESSAGE);
        // The leak alert stays up for 6 s from the raising tick.
        let raise_time = runner
            .score_history()
            .iter()
            .find(|(_, score)| score.as_percent() > 70)
            .map(|(when, _)| *when)
            .unwrap();
        assert_eq!(notification.expires_at, raise_time + Duration::from_secs(6));
    }

    #[test]
    fn test_scenario_d_emergency_shut_off_clears_everything() {
        let mut runner = ScenarioRunner::new(5);
        runner.toggle_pump();
        runner.toggle_fault();
        runner.run_until_alert(200);

        runner.emergency_shut_off();

        let snapshot = runner.monitor().snapshot();
        assert!(!snapshot.pump_on);
        assert!(!snapshot.alert_active);
        assert_eq!(snapshot.leak_probability, 0);
        assert_eq!(snapshot.notification.message, EMERGENCY_MESSAGE);
    }

    #[test]
    fn test_alert_clears_after_fault_repaired() {
        let mut runner = ScenarioRunner::new(6);
        runner.toggle_pump();
        runner.toggle_fault();
        runner.run_until_alert(200);

        // Repair the fault: scores fall back to [0, 20), below the clear
        // threshold, so the next scorer tick drops the alert.
        runner.toggle_fault();
        runner.run_secs(3);

        assert!(!runner.monitor().alert_active());
        assert_eq!(runner.monitor().stats().alerts_cleared, 1);
    }

    #[test]
    fn test_usage_only_grows_and_only_while_pump_on() {
        let mut runner = ScenarioRunner::new(7);
        runner.run_secs(5);
        assert_eq!(runner.monitor().total_liters().as_liters(), 1250.0);

        runner.toggle_pump();
        runner.run_secs(60);
        let after_running = runner.monitor().total_liters();
        assert!(after_running.as_liters() > 1250.0);

        runner.toggle_pump();
        runner.run_secs(60);
        assert_eq!(runner.monitor().total_liters(), after_running);
    }

    #[test]
    fn test_pump_off_zeroes_flow_and_score_every_tick() {
        let mut runner = ScenarioRunner::new(8);
        runner.toggle_pump();
        runner.run_secs(9);
        runner.toggle_pump();
        let flow_ticks_so_far = runner.flow_history().len();
        runner.run_secs(9);

        for (_, sample) in &runner.flow_history()[flow_ticks_so_far..] {
            assert_eq!(*sample, FlowRate::ZERO);
        }
        assert_eq!(runner.monitor().leak_probability(), LeakProbability::ZERO);
    }

    #[test]
    fn test_custom_scorer_band_raises_without_fault() {
        // Pin the healthy score band above the raise threshold: the alert
        // must raise on the first scorer tick, no fault needed.
        let config = MonitorConfig {
            scorer: hydro_sim::ScorerConfig {
                base_min: 90.0,
                base_max: 95.0,
                ..hydro_sim::ScorerConfig::default()
            },
            ..MonitorConfig::default()
        };
        let mut runner = ScenarioRunner::with_config(config, 10);
        runner.toggle_pump();
        runner.run_secs(3);

        assert!(runner.monitor().alert_active());
        assert_eq!(runner.monitor().stats().alerts_raised, 1);
    }

    #[test]
    fn test_superseding_notification_keeps_second_countdown() {
        let mut runner = ScenarioRunner::new(9);
        runner.toggle_pump();
        runner.advance(Duration::from_secs(1));
        runner.emergency_shut_off();

        // First post's 3 s deadline passes; the superseding message stays.
        runner.advance(Duration::from_millis(2500));
        let notification = runner.monitor().notification();
        assert!(notification.visible);
        assert_eq!(notification.message, EMERGENCY_MESSAGE);

        // The second post's own deadline hides it.
        runner.advance(Duration::from_millis(600));
        assert!(!runner.monitor().notification().visible);
    }
}

//! Live Monitor Example
//!
//! Runs the monitor with real timers, drives the control surface the way a
//! dashboard would, and prints snapshots along the way.

use std::time::Duration;

use hydro_runtime::{MonitorConfig, MonitorHandle, EXPECTED_FLOW_MAX_LPM};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    println!("=== HydroSense Live Monitor ===\n");

    let handle = MonitorHandle::spawn(MonitorConfig::default()).expect("valid default config");
    println!("Expected flow: 0-{EXPECTED_FLOW_MAX_LPM:.0} L/min\n");

    // 1. Turn the pump on and watch flow build up
    println!("1. Turning pump on...");
    handle.toggle_pump();
    tokio::time::sleep(Duration::from_secs(4)).await;
    print_snapshot(&handle);

    // 2. Inject a fault and wait for the leak alert
    println!("\n2. Injecting fault...");
    handle.toggle_fault();
    for _ in 0..10 {
        tokio::time::sleep(Duration::from_secs(3)).await;
        if handle.snapshot().alert_active {
            break;
        }
    }
    print_snapshot(&handle);
    println!("   Analysis: {}", handle.monitor().analysis_summary());

    // 3. Emergency shut-off
    println!("\n3. Emergency shut-off...");
    handle.emergency_shut_off();
    print_snapshot(&handle);

    let stats = handle.monitor().stats();
    println!(
        "\nStats: {} signal ticks, {} scorer ticks, {} alerts raised",
        stats.signal_ticks, stats.scorer_ticks, stats.alerts_raised
    );

    handle.shutdown();
}

fn print_snapshot(handle: &MonitorHandle) {
    let s = handle.snapshot();
    println!(
        "   pump={} fault={} flow={:.1} L/min usage={:.1} L leak={}% alert={}",
        s.pump_on, s.fault_injected, s.flow_rate, s.total_liters, s.leak_probability,
        s.alert_active
    );
    if s.notification.visible {
        println!("   notification: {}", s.notification.message);
    }
}

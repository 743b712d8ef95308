//! Scripted overlay walk-through using the mock sensor feed.
//!
//! Places two geolocated markers, drives the runtime with canned sensor
//! samples and prints every marker event the renderer would receive.

use ar_overlay::{
    GeoLocation, MarkerEvent, MockSensorFeed, MonitorHandle, OverlayConfig, OverlaySession,
    TrackedPoint, Viewport,
};
use std::time::Duration;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = OverlayConfig {
        scale_by_distance: true,
        ..OverlayConfig::default()
    };

    let mut session = OverlaySession::new(config, Viewport::new(800.0, 600.0))
        .expect("default configuration is valid");

    session.add_point(
        TrackedPoint::from_location(GeoLocation::new(0.0, 0.0012, 10.0)).with_label("Cafe"),
    );
    session.add_point(
        TrackedPoint::from_location(GeoLocation::new(0.0004, 0.0009, 0.0)).with_label("Fountain"),
    );

    session.register_marker_callback(Box::new(|event| match event {
        MarkerEvent::Place(update) => {
            let center = update.rect.center();
            println!(
                "place {:?} ({}) at ({:.0}, {:.0}) rotation {:.3} rad scale {:.2}",
                update.point_id,
                update.label.as_deref().unwrap_or("-"),
                center.x,
                center.y,
                update.rotation,
                update.scale,
            );
        }
        MarkerEvent::Hide { point_id } => println!("hide {:?}", point_id),
    }));

    let handle = MonitorHandle::spawn(session);
    let sender = handle.sender();

    // Scripted walk: one fix, then a slow pan from north toward east
    let mut feed = MockSensorFeed::new();
    feed.simulate_noise(true, 0.02);
    feed.add_location_fix(0.0, 0.0, 0.0);
    feed.add_accelerometer_burst(0.0, 0.0, -1.0, 50);
    for step in 0..=9 {
        feed.add_heading(f64::from(step) * 10.0);
    }
    feed.drain_into(&sender);

    std::thread::sleep(Duration::from_millis(300));

    let session = handle.stop().expect("worker joins cleanly");
    let state = session.state();
    println!(
        "done: {} ticks, max observed distance {:.1} m",
        state.ticks, state.max_observed_distance
    );
}

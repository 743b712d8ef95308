//! Overlay session: the single owner of all mutable overlay state
//!
//! An [`OverlaySession`] owns the tracked-point working set, the orientation
//! tracker and the monotonic distance maximum. Sensor samples mutate it
//! between ticks; each [`tick`](OverlaySession::tick) projects every point
//! against one snapshot of the fused orientation and hands the results to the
//! registered marker callbacks. The session has no internal locking; the
//! runtime confines it to a single thread.

use crate::algorithms::geodesy::{Haversine, HorizontalDistance};
use crate::api::types::{
    CallbackHandle, MarkerCallback, MarkerEvent, MarkerUpdate, OverlayError, OverlayResult,
    PointId, SessionState,
};
use crate::core::types::{GeoLocation, ReferenceOrientation, ScreenRect, Viewport};
use crate::processing::orientation::OrientationTracker;
use crate::processing::tracked_point::{marker_transform, scale_factor, TrackedPoint};
use crate::sensors::{AccelerometerSample, HeadingSample, LocationFix, SensorEvent};
use crate::utils::config::OverlayConfig;
use std::collections::HashMap;

/// Session owning the tracked points and the device orientation
pub struct OverlaySession {
    config: OverlayConfig,
    viewport: Viewport,
    tracker: OrientationTracker,
    points: Vec<(PointId, TrackedPoint)>,
    distance_model: Box<dyn HorizontalDistance + Send>,
    current_location: Option<GeoLocation>,
    callbacks: HashMap<CallbackHandle, MarkerCallback>,
    point_counter: u32,
    callback_counter: u32,
    state: SessionState,
}

impl OverlaySession {
    /// Create a session for the given overlay surface. Fails when the
    /// configuration is out of range.
    pub fn new(config: OverlayConfig, viewport: Viewport) -> OverlayResult<Self> {
        config.validate()?;
        let tracker = OrientationTracker::new(config.filter_factor);

        Ok(Self {
            config,
            viewport,
            tracker,
            points: Vec::new(),
            distance_model: Box::new(Haversine),
            current_location: None,
            callbacks: HashMap::new(),
            point_counter: 0,
            callback_counter: 0,
            state: SessionState::default(),
        })
    }

    /// Replace the horizontal-distance provider. Platforms with an
    /// ellipsoidal distance from their location stack plug it in here.
    pub fn with_distance_model(mut self, model: Box<dyn HorizontalDistance + Send>) -> Self {
        self.distance_model = model;
        self
    }

    /// Add one tracked point to the working set.
    ///
    /// A manually-placed point contributes its preset distance to the
    /// observed maximum right away; geolocated points contribute after their
    /// first recalibration.
    pub fn add_point(&mut self, point: TrackedPoint) -> PointId {
        self.point_counter += 1;
        let id = PointId::new(self.point_counter);

        if point.polar().distance > self.state.max_observed_distance {
            self.state.max_observed_distance = point.polar().distance;
        }

        self.points.push((id, point));
        self.state.tracked_points = self.points.len();
        id
    }

    /// Add every geolocation produced by the picker, in order
    pub fn add_points<I>(&mut self, locations: I) -> Vec<PointId>
    where
        I: IntoIterator<Item = GeoLocation>,
    {
        locations
            .into_iter()
            .map(|location| self.add_point(TrackedPoint::from_location(location)))
            .collect()
    }

    /// Look up a tracked point by id
    pub fn point(&self, id: PointId) -> Option<&TrackedPoint> {
        self.points
            .iter()
            .find(|(point_id, _)| *point_id == id)
            .map(|(_, point)| point)
    }

    /// Drop the whole working set. Points are never removed individually.
    pub fn clear_points(&mut self) {
        self.points.clear();
        self.state.tracked_points = 0;
        tracing::info!("tracked points cleared");
    }

    /// Reset for a fresh monitoring run: clears points, the rolling
    /// orientation filter, the device location and the observed maximum.
    pub fn reset(&mut self) {
        self.points.clear();
        self.tracker.reset();
        self.current_location = None;
        self.state = SessionState::default();
        tracing::info!("overlay session reset");
    }

    /// Register a renderer callback fired for every marker event
    pub fn register_marker_callback(&mut self, callback: MarkerCallback) -> CallbackHandle {
        self.callback_counter += 1;
        let handle = CallbackHandle::new(self.callback_counter);
        self.callbacks.insert(handle, callback);
        handle
    }

    /// Remove a previously registered callback
    pub fn unregister_callback(&mut self, handle: CallbackHandle) -> OverlayResult<()> {
        if self.callbacks.remove(&handle).is_some() {
            Ok(())
        } else {
            Err(OverlayError::InvalidHandle {
                reason: format!("unknown callback handle {}", handle.id()),
            })
        }
    }

    /// Ingest one device location fix: recalibrate every geolocated point
    /// and grow the observed distance maximum. The maximum never shrinks.
    pub fn on_location_fix(&mut self, fix: &LocationFix) {
        if !fix.location.is_finite() {
            self.reject_sample("location fix with non-finite component");
            return;
        }

        self.current_location = Some(fix.location);
        self.state.last_fix_time_ms = Some(fix.timestamp_ms);

        for (_, point) in &mut self.points {
            point.recalibrate(&fix.location, self.distance_model.as_ref());
            if point.polar().distance > self.state.max_observed_distance {
                self.state.max_observed_distance = point.polar().distance;
            }
        }
    }

    /// Ingest one compass heading sample
    pub fn on_heading_sample(&mut self, sample: &HeadingSample) {
        if !sample.magnetic_heading_deg.is_finite() {
            self.reject_sample("non-finite heading");
            return;
        }
        self.tracker.on_heading_sample(sample.magnetic_heading_deg);
    }

    /// Ingest one accelerometer sample
    pub fn on_accelerometer_sample(&mut self, sample: &AccelerometerSample) {
        if !sample.acceleration.iter().all(|c| c.is_finite()) {
            self.reject_sample("non-finite accelerometer sample");
            return;
        }
        self.tracker.on_accelerometer_sample(&sample.acceleration);
    }

    /// Dispatch one sensor event to the matching ingestion path
    pub fn apply(&mut self, event: &SensorEvent) {
        match event {
            SensorEvent::Location(fix) => self.on_location_fix(fix),
            SensorEvent::Heading(sample) => self.on_heading_sample(sample),
            SensorEvent::Accelerometer(sample) => self.on_accelerometer_sample(sample),
        }
    }

    /// Run one refresh tick.
    ///
    /// Every point is projected against the same orientation snapshot; a
    /// heading sample arriving mid-tick only takes effect on the next one.
    /// Fires the registered callbacks with a place or hide event per point
    /// and returns the placements for callers that poll instead.
    pub fn tick(&mut self) -> Vec<MarkerUpdate> {
        let reference = self.tracker.orientation();
        let fov = self.config.fov();

        let mut events = Vec::with_capacity(self.points.len());
        let mut placements = Vec::new();

        for (id, point) in &self.points {
            if point.is_visible(&reference, &fov) {
                let update = self.placement_for(*id, point, &reference);
                placements.push(update.clone());
                events.push(MarkerEvent::Place(update));
            } else {
                events.push(MarkerEvent::Hide { point_id: *id });
            }
        }

        for event in &events {
            for callback in self.callbacks.values() {
                callback(event);
            }
        }

        self.state.ticks += 1;
        placements
    }

    /// Current fused device orientation
    pub fn orientation(&self) -> ReferenceOrientation {
        self.tracker.orientation()
    }

    /// Last accepted device location, if any fix arrived yet
    pub fn current_location(&self) -> Option<&GeoLocation> {
        self.current_location.as_ref()
    }

    /// Resize the overlay surface
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// Session state snapshot
    pub fn state(&self) -> SessionState {
        self.state.clone()
    }

    fn placement_for(
        &self,
        id: PointId,
        point: &TrackedPoint,
        reference: &ReferenceOrientation,
    ) -> MarkerUpdate {
        let fov = self.config.fov();
        let center = point.project(reference, &fov, &self.viewport);

        let scale = scale_factor(
            point.polar().distance,
            self.state.max_observed_distance,
            self.config.scale_by_distance,
            self.config.min_scale_factor,
        );

        let rotation = if self.config.allow_rotate {
            point.rotation_angle(reference, &fov, self.config.max_rotation_angle)
        } else {
            0.0
        };

        let rect = ScreenRect::centered_on(
            center,
            self.config.marker_width * scale,
            self.config.marker_height * scale,
        );

        MarkerUpdate {
            point_id: id,
            label: point.label().map(str::to_string),
            rect,
            rotation,
            scale,
            transform: marker_transform(rotation, scale, self.config.allow_rotate),
        }
    }

    fn reject_sample(&mut self, reason: &str) {
        self.state.rejected_samples += 1;
        tracing::debug!(reason, "sensor sample rejected");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::sync::Mutex;

    fn session() -> OverlaySession {
        OverlaySession::new(OverlayConfig::default(), Viewport::new(800.0, 600.0)).unwrap()
    }

    fn fix(lat: f64, lon: f64, alt: f64) -> LocationFix {
        LocationFix::new(GeoLocation::new(lat, lon, alt), 1_000)
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = OverlayConfig::default();
        config.fov_width = -1.0;
        assert!(OverlaySession::new(config, Viewport::new(800.0, 600.0)).is_err());
    }

    #[test]
    fn test_end_to_end_due_east_target() {
        let mut session = session();
        session.add_points([GeoLocation::new(0.0, 0.001, 0.0)]);

        session.on_location_fix(&fix(0.0, 0.0, 0.0));
        // Device looking due east: the target sits dead center
        session.on_heading_sample(&HeadingSample::new(90.0));

        let placements = session.tick();
        assert_eq!(placements.len(), 1);

        let update = &placements[0];
        let center = update.rect.center();
        assert!((center.x - 400.0).abs() < 1.0);
        assert!((center.y - 300.0).abs() < 1.0);
        assert!((update.rotation).abs() < 1e-9);
        assert_eq!(update.scale, 1.0);

        let point = session.point(placements[0].point_id).unwrap();
        assert!((point.polar().azimuth - FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn test_point_leaves_view_emits_hide() {
        let mut session = session();
        let id = session.add_points([GeoLocation::new(0.0, 0.001, 0.0)])[0];

        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        session.register_marker_callback(Box::new(move |event| {
            sink.lock().unwrap().push(event.clone());
        }));

        session.on_location_fix(&fix(0.0, 0.0, 0.0));
        session.on_heading_sample(&HeadingSample::new(90.0));
        session.tick();

        // Turn away: the target falls out of the azimuth window
        session.on_heading_sample(&HeadingSample::new(270.0));
        session.tick();

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], MarkerEvent::Place(_)));
        assert!(matches!(events[1], MarkerEvent::Hide { point_id } if point_id == id));
    }

    #[test]
    fn test_max_observed_distance_monotonic() {
        let mut session = session();
        session.add_points([GeoLocation::new(0.0, 0.001, 0.0)]);

        // Walk toward the target, then past it: the distance shrinks but the
        // observed maximum must not
        session.on_location_fix(&fix(0.0, -0.001, 0.0));
        let far = session.state().max_observed_distance;

        session.on_location_fix(&fix(0.0, 0.0, 0.0));
        let near = session.state().max_observed_distance;

        session.on_location_fix(&fix(0.0, 0.0009, 0.0));
        let nearer = session.state().max_observed_distance;

        assert!(far > 0.0);
        assert_eq!(far, near);
        assert_eq!(near, nearer);
    }

    #[test]
    fn test_manual_point_survives_fixes() {
        let mut session = session();
        let id = session.add_point(TrackedPoint::from_polar(25.0, 0.1, 1.5));

        session.on_location_fix(&fix(40.0, -100.0, 250.0));
        let point = session.point(id).unwrap();
        assert_eq!(point.polar().distance, 25.0);
        assert_eq!(point.polar().azimuth, 1.5);
    }

    #[test]
    fn test_manual_point_seeds_max_distance() {
        let mut session = session();
        session.add_point(TrackedPoint::from_polar(42.0, 0.0, 0.0));
        assert_eq!(session.state().max_observed_distance, 42.0);
    }

    #[test]
    fn test_non_finite_samples_rejected() {
        let mut session = session();
        session.on_heading_sample(&HeadingSample::new(f64::NAN));
        session.on_accelerometer_sample(&AccelerometerSample::new(0.0, f64::INFINITY, 0.0));
        session.on_location_fix(&LocationFix::new(
            GeoLocation::new(f64::NAN, 0.0, 0.0),
            1_000,
        ));

        let state = session.state();
        assert_eq!(state.rejected_samples, 3);
        assert!(state.last_fix_time_ms.is_none());
        assert_eq!(session.orientation(), ReferenceOrientation::default());
    }

    #[test]
    fn test_missing_sensors_keep_last_state() {
        let mut session = session();
        session.add_points([GeoLocation::new(0.0, 0.001, 0.0)]);
        session.on_location_fix(&fix(0.0, 0.0, 0.0));
        session.on_heading_sample(&HeadingSample::new(90.0));

        // No further samples: ticks keep producing the same placement
        let first = session.tick();
        let second = session.tick();
        assert_eq!(first, second);
    }

    #[test]
    fn test_scale_by_distance_placement() {
        let mut config = OverlayConfig::default();
        config.scale_by_distance = true;
        let mut session =
            OverlaySession::new(config, Viewport::new(800.0, 600.0)).unwrap();

        // Two manual points straight ahead at different distances
        session.add_point(TrackedPoint::from_polar(100.0, 0.0, FRAC_PI_2));
        session.add_point(TrackedPoint::from_polar(60.0, 0.0, FRAC_PI_2));
        session.on_heading_sample(&HeadingSample::new(90.0));

        let placements = session.tick();
        assert_eq!(placements.len(), 2);
        assert_eq!(placements[0].scale, 1.0);
        assert!((placements[1].scale - 0.6).abs() < 1e-12);
        assert!((placements[1].rect.width - 150.0 * 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_callback_registration_lifecycle() {
        let mut session = session();
        let count = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&count);
        let handle = session.register_marker_callback(Box::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        session.add_point(TrackedPoint::from_polar(10.0, 0.0, FRAC_PI_2));
        session.on_heading_sample(&HeadingSample::new(90.0));
        session.tick();
        assert_eq!(count.load(Ordering::SeqCst), 1);

        session.unregister_callback(handle).unwrap();
        session.tick();
        assert_eq!(count.load(Ordering::SeqCst), 1);

        assert!(session.unregister_callback(handle).is_err());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut session = session();
        session.add_points([GeoLocation::new(0.0, 0.001, 0.0)]);
        session.on_location_fix(&fix(0.0, 0.0, 0.0));
        session.on_heading_sample(&HeadingSample::new(45.0));
        session.tick();

        session.reset();
        let state = session.state();
        assert_eq!(state.tracked_points, 0);
        assert_eq!(state.ticks, 0);
        assert_eq!(state.max_observed_distance, 0.0);
        assert!(session.current_location().is_none());
        assert_eq!(session.orientation(), ReferenceOrientation::default());
    }
}

//! Mock sensor feed for testing and development

use crate::core::types::GeoLocation;
use crate::sensors::{AccelerometerSample, HeadingSample, LocationFix, SensorEvent};
use std::collections::VecDeque;
use std::sync::mpsc::Sender;
use std::time::{SystemTime, UNIX_EPOCH};

/// Scripted sensor feed that stands in for the platform location, heading
/// and accelerometer sources.
pub struct MockSensorFeed {
    event_queue: VecDeque<SensorEvent>,
    simulate_noise: bool,
    noise_amplitude: f64,
}

impl MockSensorFeed {
    /// Create an empty mock feed
    pub fn new() -> Self {
        Self {
            event_queue: VecDeque::new(),
            simulate_noise: false,
            noise_amplitude: 0.0,
        }
    }

    /// Queue a location fix stamped with the current wall clock
    pub fn add_location_fix(&mut self, latitude: f64, longitude: f64, altitude: f64) {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_millis() as u64;

        self.event_queue.push_back(SensorEvent::Location(LocationFix::new(
            GeoLocation::new(latitude, longitude, altitude),
            timestamp,
        )));
    }

    /// Queue a compass heading sample in degrees
    pub fn add_heading(&mut self, magnetic_heading_deg: f64) {
        self.event_queue
            .push_back(SensorEvent::Heading(HeadingSample::new(magnetic_heading_deg)));
    }

    /// Queue one accelerometer sample in g-units
    pub fn add_accelerometer(&mut self, x: f64, y: f64, z: f64) {
        self.event_queue
            .push_back(SensorEvent::Accelerometer(AccelerometerSample::new(x, y, z)));
    }

    /// Queue a burst of identical accelerometer samples, simulating the
    /// fixed-interval sampler
    pub fn add_accelerometer_burst(&mut self, x: f64, y: f64, z: f64, count: usize) {
        for _ in 0..count {
            self.add_accelerometer(x, y, z);
        }
    }

    /// Enable additive uniform noise on accelerometer samples
    pub fn simulate_noise(&mut self, enable: bool, amplitude: f64) {
        self.simulate_noise = enable;
        self.noise_amplitude = amplitude.max(0.0);
    }

    /// Number of queued events
    pub fn queued_event_count(&self) -> usize {
        self.event_queue.len()
    }

    /// Pop the next scripted event, applying noise where enabled
    pub fn next_event(&mut self) -> Option<SensorEvent> {
        let event = self.event_queue.pop_front()?;
        Some(self.apply_noise(event))
    }

    /// Drain every queued event into a runtime channel. Returns the number of
    /// events delivered before the channel disconnected.
    pub fn drain_into(&mut self, sender: &Sender<SensorEvent>) -> usize {
        let mut delivered = 0;
        while let Some(event) = self.next_event() {
            if sender.send(event).is_err() {
                break;
            }
            delivered += 1;
        }
        delivered
    }

    fn apply_noise(&self, event: SensorEvent) -> SensorEvent {
        if !self.simulate_noise {
            return event;
        }

        match event {
            SensorEvent::Accelerometer(sample) => {
                use rand::Rng;
                let mut rng = rand::thread_rng();
                let mut jitter = || rng.gen_range(-self.noise_amplitude..=self.noise_amplitude);
                let noisy = AccelerometerSample::new(
                    sample.acceleration.x + jitter(),
                    sample.acceleration.y + jitter(),
                    sample.acceleration.z + jitter(),
                );
                SensorEvent::Accelerometer(noisy)
            }
            other => other,
        }
    }
}

impl Default for MockSensorFeed {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_order_preserved() {
        let mut feed = MockSensorFeed::new();
        feed.add_heading(90.0);
        feed.add_location_fix(0.0, 0.0, 0.0);
        feed.add_accelerometer(0.0, 0.0, -1.0);
        assert_eq!(feed.queued_event_count(), 3);

        assert!(matches!(feed.next_event(), Some(SensorEvent::Heading(_))));
        assert!(matches!(feed.next_event(), Some(SensorEvent::Location(_))));
        assert!(matches!(
            feed.next_event(),
            Some(SensorEvent::Accelerometer(_))
        ));
        assert!(feed.next_event().is_none());
    }

    #[test]
    fn test_accelerometer_burst() {
        let mut feed = MockSensorFeed::new();
        feed.add_accelerometer_burst(0.0, 0.0, -1.0, 20);
        assert_eq!(feed.queued_event_count(), 20);
    }

    #[test]
    fn test_noise_bounded() {
        let mut feed = MockSensorFeed::new();
        feed.simulate_noise(true, 0.01);
        feed.add_accelerometer(0.0, 0.0, -1.0);

        match feed.next_event() {
            Some(SensorEvent::Accelerometer(sample)) => {
                assert!(sample.acceleration.x.abs() <= 0.01);
                assert!(sample.acceleration.y.abs() <= 0.01);
                assert!((sample.acceleration.z + 1.0).abs() <= 0.01);
            }
            other => panic!("expected accelerometer event, got {:?}", other),
        }
    }

    #[test]
    fn test_drain_into_channel() {
        let mut feed = MockSensorFeed::new();
        feed.add_heading(10.0);
        feed.add_heading(20.0);

        let (sender, receiver) = std::sync::mpsc::channel();
        assert_eq!(feed.drain_into(&sender), 2);
        assert_eq!(feed.queued_event_count(), 0);
        assert!(receiver.try_recv().is_ok());
        assert!(receiver.try_recv().is_ok());
        assert!(receiver.try_recv().is_err());
    }
}

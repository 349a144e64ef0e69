use bitflags::bitflags;

use crate::{TouchConfig, TouchState, DEFAULT_TOUCH_CONFIG};

bitflags! {
    /// Externally visible status flags of a single sensor
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct SensorStatus: u8 {
        const TOUCH = 0x01;
        const PROX = 0x02;
    }
}

/// A single capacitive electrode.
///
/// Measurements are charge-transfer counts: a finger adds capacitance and
/// lowers the count, so the delta is taken as `reference - measurement`.
pub struct Sensor<'a> {
    pub reference: u32,
    pub delta: u16,
    pub state: TouchState,
    pub status: SensorStatus,
    pub config: &'a TouchConfig,
}

impl<'a> Sensor<'a> {
    pub fn new(config: Option<&'a TouchConfig>) -> Self {
        let config = config.unwrap_or(&DEFAULT_TOUCH_CONFIG);
        Self {
            reference: 0,
            delta: 0,
            state: TouchState::Startup(config.calibration_delay),
            status: SensorStatus::empty(),
            config,
        }
    }

    pub fn active(&self) -> bool {
        matches!(self.state, TouchState::Active)
    }

    /// Process a new measurement for this sensor
    ///
    /// Returns the freshly derived status, which is also stored in `status`
    pub fn push(&mut self, measurement: u16) -> SensorStatus {
        // `reference` holds a running sum until calibration completes
        self.delta = match self.state {
            TouchState::Idle(_) | TouchState::Active => (self.reference as u16).saturating_sub(measurement),
            TouchState::Startup(_) | TouchState::Calibrate(_) => 0,
        };
        let delta = self.delta;

        self.state = match self.state {
            TouchState::Startup(counter) => {
                if counter == 0 {
                    TouchState::Calibrate(self.config.calibration_samples)
                } else {
                    TouchState::Startup(counter - 1)
                }
            }
            TouchState::Calibrate(counter) => {
                self.reference += measurement as u32;
                if counter <= 1 {
                    self.reference /= self.config.calibration_samples.max(1) as u32;
                    TouchState::Idle(self.config.debounce)
                } else {
                    TouchState::Calibrate(counter - 1)
                }
            }
            TouchState::Idle(counter) => {
                if delta >= self.config.detect_threshold {
                    if counter <= 1 {
                        TouchState::Active
                    } else {
                        TouchState::Idle(counter - 1)
                    }
                } else {
                    TouchState::Idle(self.config.debounce)
                }
            }
            TouchState::Active => {
                let release = self.config.detect_threshold.saturating_sub(self.config.detect_hysteresis);
                if delta < release {
                    TouchState::Idle(self.config.debounce)
                } else {
                    TouchState::Active
                }
            }
        };

        self.status = match self.state {
            TouchState::Active => SensorStatus::TOUCH,
            TouchState::Idle(_) if delta >= self.config.prox_threshold => SensorStatus::PROX,
            _ => SensorStatus::empty(),
        };
        self.status
    }
}

#[cfg(test)]
pub mod test {
    use super::*;

    const REF: u16 = 1000;

    fn calibrated(config: &TouchConfig) -> Sensor<'_> {
        let mut s = Sensor::new(Some(config));
        for _ in 0..config.calibration_delay + config.calibration_samples + 1 {
            let status = s.push(REF);
            assert!(!s.active());
            assert!(status.is_empty(), "Untouched electrode reported {:?} during warm-up", status);
        }
        assert_eq!(s.reference, REF as u32);
        s
    }

    #[test]
    pub fn test_sensor() {
        let config = &DEFAULT_TOUCH_CONFIG;
        let mut s = calibrated(config);

        // "Touch" it for enough samples to get through debounce
        for _ in 0..config.debounce {
            assert!(!s.active());
            s.push(REF - config.detect_threshold - 1);
        }

        assert!(s.active(), "Not active after debounce");
        assert_eq!(s.status, SensorStatus::TOUCH);

        // Down to hysteresis value, it should remain active
        s.push(REF - config.detect_threshold + config.detect_hysteresis - 1);
        assert!(s.active(), "Became inactive too soon despite hysteresis");

        s.push(REF);
        assert!(!s.active(), "Didn't deactivate");
        assert_eq!(s.status, SensorStatus::empty());
    }

    #[test]
    pub fn test_no_status_until_calibrated() {
        // Low counts look like a touch against the partial calibration sum
        let config = &DEFAULT_TOUCH_CONFIG;
        let mut s = Sensor::new(Some(config));
        for _ in 0..config.calibration_delay + config.calibration_samples + 1 {
            assert!(s.push(REF).is_empty());
            assert_eq!(s.delta, 0);
        }
        assert!(matches!(s.state, TouchState::Idle(_)));

        assert_eq!(s.push(REF), SensorStatus::empty());
        assert_eq!(s.push(REF - config.prox_threshold), SensorStatus::PROX);
    }

    #[test]
    pub fn test_sensor_rising_count() {
        let config = &DEFAULT_TOUCH_CONFIG;
        let mut s = calibrated(config);

        for _ in 0..config.debounce + 2 {
            s.push(REF + 300);
            assert!(!s.active());
        }
    }

    #[test]
    pub fn test_proximity() {
        let config = &DEFAULT_TOUCH_CONFIG;
        let mut s = calibrated(config);

        let status = s.push(REF - config.prox_threshold);
        assert_eq!(status, SensorStatus::PROX);
        assert!(!s.active());

        let status = s.push(REF - config.prox_threshold + 1);
        assert_eq!(status, SensorStatus::empty());
    }

    #[test]
    pub fn test_debounce_resets_on_glitch() {
        let config = TouchConfig {
            debounce: 3,
            ..DEFAULT_TOUCH_CONFIG
        };
        let mut s = calibrated(&config);
        let touched = REF - config.detect_threshold;

        s.push(touched);
        s.push(touched);
        s.push(REF);
        s.push(touched);
        s.push(touched);
        assert!(!s.active(), "Glitch did not restart debounce");
        s.push(touched);
        assert!(s.active());
    }
}

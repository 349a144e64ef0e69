use heapless::Vec;

use crate::codec::{SensingContext, SensorHandle, WidgetKind};
use crate::sensor::{Sensor, SensorStatus};
use crate::TouchConfig;

/// Maximum number of sensors in one widget
pub const MAX_WIDGET_SENSORS: usize = 8;

pub struct Widget<'a> {
    pub kind: WidgetKind,
    pub sensors: Vec<Sensor<'a>, MAX_WIDGET_SENSORS>,
}

impl<'a> Widget<'a> {
    /// Create a widget with `count` sensors sharing one configuration.
    ///
    /// `count` is clamped to [`MAX_WIDGET_SENSORS`].
    pub fn new(kind: WidgetKind, count: usize, config: Option<&'a TouchConfig>) -> Self {
        let mut sensors = Vec::new();
        for _ in 0..count.min(MAX_WIDGET_SENSORS) {
            sensors.push(Sensor::new(config)).ok();
        }
        Self { kind, sensors }
    }
}

/// A fixed set of widgets, in the order the FSS codec enumerates them
pub struct WidgetSet<'a, const W: usize> {
    pub widgets: Vec<Widget<'a>, W>,
}

impl<'a, const W: usize> WidgetSet<'a, W> {
    pub fn new() -> Self {
        Self { widgets: Vec::new() }
    }

    /// Append a widget. Returns the widget back if the set is full.
    pub fn add(&mut self, widget: Widget<'a>) -> Result<(), Widget<'a>> {
        self.widgets.push(widget)
    }

    /// Feed one measurement per sensor, in widget then sensor order.
    ///
    /// Extra measurements are ignored; sensors without a measurement keep
    /// their previous state.
    pub fn push(&mut self, measurements: &[u16]) {
        let sensors = self.widgets.iter_mut().flat_map(|w| w.sensors.iter_mut());
        for (sensor, m) in sensors.zip(measurements) {
            sensor.push(*m);
        }
    }

    /// True if the sensor currently reports a touch
    pub fn is_sensor_active(&self, widget: usize, sensor: usize) -> bool {
        self.widgets
            .get(widget)
            .and_then(|w| w.sensors.get(sensor))
            .map(|s| s.status.contains(SensorStatus::TOUCH))
            .unwrap_or(false)
    }

    pub fn total_sensors(&self) -> usize {
        self.widgets.iter().map(|w| w.sensors.len()).sum()
    }
}

impl<'a, const W: usize> Default for WidgetSet<'a, W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, const W: usize> SensingContext for WidgetSet<'a, W> {
    fn widget_count(&self) -> usize {
        self.widgets.len()
    }

    fn widget_kind(&self, widget: usize) -> WidgetKind {
        self.widgets[widget].kind
    }

    fn sensor_count(&self, widget: usize) -> usize {
        self.widgets[widget].sensors.len()
    }

    fn status(&self, handle: SensorHandle) -> SensorStatus {
        self.widgets[handle.widget].sensors[handle.sensor].status
    }

    fn set_status(&mut self, handle: SensorHandle, status: SensorStatus) {
        self.widgets[handle.widget].sensors[handle.sensor].status = status;
    }
}

#[cfg(test)]
pub mod test {
    use super::*;
    use crate::codec;
    use crate::vector::TouchVector;
    use crate::DEFAULT_TOUCH_CONFIG;

    const REF: u16 = 1000;

    fn calibrated_set() -> WidgetSet<'static, 4> {
        let mut set = WidgetSet::new();
        set.add(Widget::new(WidgetKind::Button, 2, None)).ok().unwrap();
        set.add(Widget::new(WidgetKind::Slider, 3, None)).ok().unwrap();
        set.add(Widget::new(WidgetKind::Button, 1, None)).ok().unwrap();

        let cfg = &DEFAULT_TOUCH_CONFIG;
        for _ in 0..cfg.calibration_delay + cfg.calibration_samples + 1 {
            set.push(&[REF; 6]);
        }
        set
    }

    #[test]
    fn test_widget_set_enumeration() {
        let mut set = calibrated_set();
        assert_eq!(set.total_sensors(), 6);

        let touched = REF - DEFAULT_TOUCH_CONFIG.detect_threshold;
        for _ in 0..DEFAULT_TOUCH_CONFIG.debounce {
            set.push(&[REF, touched, touched, touched, REF, touched]);
        }

        assert!(!set.is_sensor_active(0, 0));
        assert!(set.is_sensor_active(0, 1));
        assert!(set.is_sensor_active(1, 0));
        assert!(set.is_sensor_active(2, 0));
        assert!(!set.is_sensor_active(5, 0));

        let snap = codec::collect(&set);
        assert_eq!(snap.len(), 3);
        assert_eq!(snap.current(), TouchVector(0b110));
    }

    #[test]
    fn test_widget_clamps_sensor_count() {
        let w = Widget::new(WidgetKind::Button, MAX_WIDGET_SENSORS + 4, None);
        assert_eq!(w.sensors.len(), MAX_WIDGET_SENSORS);
    }

    #[test]
    fn test_widget_set_full() {
        let mut set: WidgetSet<'static, 1> = WidgetSet::new();
        assert!(set.add(Widget::new(WidgetKind::Button, 1, None)).is_ok());
        assert!(set.add(Widget::new(WidgetKind::Button, 1, None)).is_err());
    }
}

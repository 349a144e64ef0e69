use crate::hal::gpio::{Output, Pin, PushPull};
use crate::hal::prelude::*;

use fss::widget::WidgetSet;

/// One indicator LED per button sensor
pub struct LedMap {
    pub widget: usize,
    pub sensor: usize,
}

/// Board LED order is the reverse of the button order
pub static LED_MAP: [LedMap; 3] = [
    LedMap { widget: 1, sensor: 0 }, // LED0
    LedMap { widget: 0, sensor: 1 }, // LED1
    LedMap { widget: 0, sensor: 0 }, // LED2
];

pub struct Leds {
    pins: [Pin<Output<PushPull>>; 3],
}

impl Leds {
    pub fn new(pins: [Pin<Output<PushPull>>; 3]) -> Self {
        let mut leds = Self { pins };
        for pin in leds.pins.iter_mut() {
            pin.set_low().ok();
        }
        leds
    }

    /// Mirror the reported touch status of each mapped sensor
    pub fn update<const W: usize>(&mut self, widgets: &WidgetSet<'_, W>) {
        for (pin, map) in self.pins.iter_mut().zip(LED_MAP.iter()) {
            if widgets.is_sensor_active(map.widget, map.sensor) {
                pin.set_high().ok();
            } else {
                pin.set_low().ok();
            }
        }
    }
}

#![no_main]
#![no_std]

use core::sync::atomic::{AtomicU32, Ordering};
use cortex_m;
use cortex_m_rt::{entry, exception};
use panic_halt as _;

use stm32f0xx_hal as hal;

use fss::codec::{self, WidgetKind};
use fss::widget::{Widget, WidgetSet};
use fss::{Fss, FssConfig, TouchConfig, DEFAULT_FSS_CONFIG};

use crate::hal::pac;
use crate::hal::pac::interrupt;
use crate::hal::prelude::*;

use leds::Leds;
use status::StatusLink;
use tsc::{TscSample, TscWrapper};

mod leds;
mod serial;
mod status;
mod tsc;

/// Electrodes in widget order: BUTTON0 SNS0, BUTTON0 SNS1, BUTTON1 SNS0
static SENSOR_CHANNELS: [TscSample; 3] = [
    TscSample { group: 1, sample: 2, channel: 1}, // PA0
    TscSample { group: 2, sample: 3, channel: 1}, // PA4
    TscSample { group: 3, sample: 4, channel: 2}, // PB0
];

static TOUCH_CONFIG: TouchConfig = TouchConfig {
    detect_threshold: 100,
    detect_hysteresis: 5,
    prox_threshold: 40,
    calibration_delay: 10,
    calibration_samples: 10,
    debounce: 3,
};

static FSS_CONFIG: FssConfig = DEFAULT_FSS_CONFIG;

/// SysTick periods between scan cycles
const SCAN_PERIOD: u32 = 2;

static TIME: AtomicU32 = AtomicU32::new(0);

#[entry]
fn main() -> ! {
    let dp = pac::Peripherals::take().unwrap();
    let cp = cortex_m::Peripherals::take().unwrap();

    let mut flash = dp.FLASH;
    let mut rcc = dp.RCC.configure().sysclk(48.mhz()).freeze(&mut flash);
    let gpioa = dp.GPIOA.split(&mut rcc);
    let gpiob = dp.GPIOB.split(&mut rcc);
    let gpioc = dp.GPIOC.split(&mut rcc);

    // A library requiring a critical section to set a gpio AF register is bad and I just won't.
    let fake_cs = unsafe { cortex_m::interrupt::CriticalSection::new() };

    // Touch electrodes and sample caps
    let _btn0_sns0 = gpioa.pa0.into_alternate_af3(&fake_cs);
    let _btn0_sns1 = gpioa.pa4.into_alternate_af3(&fake_cs);
    let _btn1_sns0 = gpiob.pb0.into_alternate_af3(&fake_cs);
    let _g1_cap = gpioa.pa1.into_alternate_af3(&fake_cs);
    let _g2_cap = gpioa.pa6.into_alternate_af3(&fake_cs);
    let _g3_cap = gpiob.pb2.into_alternate_af3(&fake_cs);

    let mut leds = Leds::new([
        gpioc.pc6.into_push_pull_output(&fake_cs).downgrade(),
        gpioc.pc7.into_push_pull_output(&fake_cs).downgrade(),
        gpioc.pc8.into_push_pull_output(&fake_cs).downgrade(),
    ]);

    let tx_pin = gpiob.pb6.into_alternate_af0(&fake_cs);
    let rx_pin = gpiob.pb7.into_alternate_af0(&fake_cs);
    let uart = hal::serial::Serial::usart1(dp.USART1, (tx_pin, rx_pin), 115200.bps(), &mut rcc);
    serial::uart1::init(uart, 4);

    let mut touch = TscWrapper::new(dp.TSC, &mut rcc);

    let mut syst = hal::timers::Timer::syst(cp.SYST, 100.hz(), &mut rcc);
    syst.listen(&hal::timers::Event::TimeOut);

    let mut widgets: WidgetSet<'static, 2> = WidgetSet::new();
    widgets.add(Widget::new(WidgetKind::Button, 2, Some(&TOUCH_CONFIG))).ok();
    widgets.add(Widget::new(WidgetKind::Button, 1, Some(&TOUCH_CONFIG))).ok();

    let mut status = StatusLink::new();
    let mut fss = match Fss::new(&widgets, &FSS_CONFIG) {
        Ok(fss) => fss,
        Err(e) => {
            status.config_error(&e);
            loop {
                cortex_m::asm::wfi();
            }
        }
    };
    status.startup(codec::button_sensors(&widgets).count(), fss.group(&widgets));

    let mut next_time = 10;

    loop {
        let time = TIME.load(Ordering::Relaxed);
        if time >= next_time {
            next_time += SCAN_PERIOD;

            // The next acquisition only starts once this cycle's result is out
            let measurements = touch.sample(&SENSOR_CHANNELS);
            widgets.push(&measurements);

            let report = fss.run_cycle(&mut widgets);

            leds.update(&widgets);
            status.update(&report);
        }

        cortex_m::asm::wfi();
    }
}

#[exception]
fn SysTick() {
    let time = TIME.load(Ordering::Relaxed);
    TIME.store(time + 1, Ordering::Relaxed);
}

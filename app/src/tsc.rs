use crate::hal;
use crate::hal::pac;
use crate::hal::rcc::Rcc;
use crate::hal::tsc::Tsc;

/// One electrode: its TSC group, the IO used for the sample cap, and the
/// IO of the electrode itself
#[derive(Clone, Copy, Debug)]
pub struct TscSample {
    pub group: u8,
    pub sample: u8,
    pub channel: u8,
}

pub struct TscWrapper {
    tsc: Tsc,
    max_count: u16,
}

impl TscWrapper {
    pub fn new(tsc: pac::TSC, rcc: &mut Rcc) -> Self {
        let config = hal::tsc::Config {
            clock_prescale: None,
            max_count: Some(hal::tsc::MaxCount::U8191),
            charge_transfer_high: None,
            charge_transfer_low: None,
        };
        Self {
            tsc: Tsc::tsc(tsc, rcc, Some(config)),
            max_count: 8191,
        }
    }

    /// Acquire all `samples` in one pass. Each sample must be in a distinct group.
    ///
    /// Groups that hit max count read as `max_count + 1`, which the sensors
    /// see as no touch.
    pub fn sample<const N: usize>(&mut self, samples: &[TscSample; N]) -> [u16; N] {
        // The HAL driver doesn't expose the IO config registers, so steal them.
        let regs = unsafe { pac::Peripherals::steal().TSC };

        let mut iogcsr: u32 = 0;
        let mut ioscr: u32 = 0;
        let mut ioccr: u32 = 0;

        for s in samples {
            iogcsr |= 1 << (s.group - 1);
            ioscr |= 1 << ((s.group - 1) * 4 + s.sample - 1);
            ioccr |= 1 << ((s.group - 1) * 4 + s.channel - 1);
        }

        regs.iogcsr.write(|w| unsafe { w.bits(iogcsr) });
        regs.ioscr.write(|w| unsafe { w.bits(ioscr) });
        regs.ioccr.write(|w| unsafe { w.bits(ioccr) });

        self.tsc.acquire().ok();

        // Status bits indicate if the group completed before max count
        let group_status = regs.iogcsr.read().bits() >> 16;

        let mut result = [self.max_count + 1; N];
        for (r, s) in result.iter_mut().zip(samples.iter()) {
            if group_status & (1 << (s.group - 1)) != 0 {
                *r = self.tsc.read_unchecked(s.group);
            }
        }

        result
    }
}

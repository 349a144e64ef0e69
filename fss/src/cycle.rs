use core::fmt;

use crate::arbiter::FlankArbiter;
use crate::codec::{self, SensingContext};
use crate::vector::{EnableMask, TouchVector, CAPACITY};
use crate::{ConfigError, FssConfig};

/// Outcome of one suppression cycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CycleReport {
    /// Touch vector as read from the sensing stack
    pub raw: TouchVector,
    /// Touch vector after arbitration, as written back
    pub resolved: TouchVector,
    /// Number of enumerated button sensors
    pub sensors: usize,
}

impl CycleReport {
    /// Sensors that were touched but not reported
    pub fn suppressed(&self) -> TouchVector {
        self.raw & !self.resolved
    }
}

impl fmt::Display for CycleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FSS n={} raw={} out={} sup={}",
            self.sensors,
            self.raw,
            self.resolved,
            self.suppressed()
        )
    }
}

/// Flanking sensor suppression for one sensing stack.
///
/// Owns the arbiter latch for the lifetime of the program. Call
/// [`Fss::run_cycle`] exactly once per completed scan, before the next scan
/// is started.
///
/// The latch is not meant to be duplicated, so `Fss` is neither `Copy` nor
/// `Clone`:
///
/// ```compile_fail
/// fn fork(fss: fss::Fss) -> (fss::Fss, fss::Fss) {
///     (fss, fss)
/// }
/// ```
#[derive(Debug)]
pub struct Fss {
    arbiter: FlankArbiter,
    enable: EnableMask,
}

impl Fss {
    /// Validate `config` against the sensors `ctx` enumerates
    pub fn new<C: SensingContext + ?Sized>(ctx: &C, config: &FssConfig) -> Result<Self, ConfigError> {
        let count = codec::button_sensors(ctx).count();
        if count > CAPACITY {
            return Err(ConfigError::TooManySensors { count });
        }

        if let EnableMask::Custom(mask) = config.enable {
            if !(mask & !TouchVector::low_bits(count)).is_empty() {
                return Err(ConfigError::MaskOutOfRange { mask, sensors: count });
            }
        }

        Ok(Self {
            arbiter: FlankArbiter::new(),
            enable: config.enable,
        })
    }

    /// Run collect, arbitration and writeback for one completed scan
    pub fn run_cycle<C: SensingContext + ?Sized>(&mut self, ctx: &mut C) -> CycleReport {
        let snapshot = codec::collect(ctx);
        let enable = self.enable.resolve(snapshot.len());

        let resolved = self.arbiter.resolve(snapshot.current(), enable);
        codec::writeback(ctx, &snapshot, resolved);

        CycleReport {
            raw: snapshot.current(),
            resolved,
            sensors: snapshot.len(),
        }
    }

    /// The arbitration group `run_cycle` uses for the sensors `ctx` enumerates
    pub fn group<C: SensingContext + ?Sized>(&self, ctx: &C) -> TouchVector {
        self.enable.resolve(codec::button_sensors(ctx).count())
    }

    /// The last arbitrated vector
    pub fn latched(&self) -> TouchVector {
        self.arbiter.latched()
    }
}

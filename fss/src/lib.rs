//! Flanking sensor suppression for capacitive buttons.
//!
//! Neighbouring electrodes can cross-trigger from a single finger. This crate
//! takes the per-sensor touch status produced by a sensing stack, reports only
//! one touch among a group of flanking buttons, and keeps that choice until the
//! chosen button is released.
//!
//! A cycle is `collect` → `resolve` → `writeback`, driven by [`Fss::run_cycle`].

#![cfg_attr(not(test), no_std)]

use core::fmt;

pub mod arbiter;
pub mod codec;
pub mod cycle;
pub mod sensor;
pub mod vector;
pub mod widget;

pub use cycle::{CycleReport, Fss};
pub use vector::{EnableMask, TouchVector, CAPACITY};

/// Enumeration of touch activity states

#[derive(Clone, Copy, Debug)]
pub enum TouchState {
    Startup(u16),
    Calibrate(u16),
    Idle(u16),
    Active,
}

/// Configuration structure for all touch inputs
#[derive(Clone, Copy, Debug)]
pub struct TouchConfig {
    /// The number of counts of delta capacitance required to active the sensor
    pub detect_threshold: u16,
    /// The hysteresis in deactivation. Once active, counts must fall below `detect_threshold -
    /// detect_hysteresis` in order to deactivate.
    pub detect_hysteresis: u16,
    /// Delta at which an idle sensor reports proximity. Should be below `detect_threshold`.
    pub prox_threshold: u16,
    /// Number of samples to wait after initialization before starting calibration
    pub calibration_delay: u16,
    /// Number of sample to collect for reference level calibration
    pub calibration_samples: u16,
    /// Number of positive samples required to transition to Active state
    pub debounce: u16,
}

impl TouchConfig {
    const fn default() -> Self {
        Self {
            detect_threshold: 100,
            detect_hysteresis: 5,
            prox_threshold: 40,
            calibration_delay: 10,
            calibration_samples: 16,
            debounce: 2,
        }
    }
}

pub const DEFAULT_TOUCH_CONFIG: TouchConfig = TouchConfig::default();

/// Configuration of the suppression group
#[derive(Clone, Copy, Debug)]
pub struct FssConfig {
    /// Sensors taking part in arbitration. Everything else passes through.
    pub enable: EnableMask,
}

impl FssConfig {
    const fn default() -> Self {
        Self {
            enable: EnableMask::All,
        }
    }
}

pub const DEFAULT_FSS_CONFIG: FssConfig = FssConfig::default();

/// Rejected configurations, reported before any cycle runs
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// More button sensors than a [`TouchVector`] can hold
    TooManySensors { count: usize },
    /// The enable mask names sensor indices that do not exist
    MaskOutOfRange { mask: TouchVector, sensors: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooManySensors { count } => {
                write!(f, "{} button sensors exceed capacity of {}", count, CAPACITY)
            }
            Self::MaskOutOfRange { mask, sensors } => {
                write!(f, "enable mask {} out of range for {} sensors", mask, sensors)
            }
        }
    }
}

use core::fmt::Write;

use fss::{ConfigError, CycleReport, TouchVector};

use crate::serial::uart1;

/// Toggles per-cycle reporting when received from the host
const VERBOSE_TOGGLE: u8 = b'v';
/// Requests a single report of the current state
const QUERY: u8 = b'?';

/// Status lines over UART1 for a host-side tuning tool.
///
/// By default a line is written only when the arbitrated vector changes.
pub struct StatusLink {
    verbose: bool,
    last: Option<TouchVector>,
}

impl StatusLink {
    pub const fn new() -> Self {
        Self {
            verbose: false,
            last: None,
        }
    }

    pub fn startup(&mut self, sensors: usize, enable: TouchVector) {
        let mut writer = uart1::writer();
        write!(writer, "FSS ready: {} buttons, group {}\r\n", sensors, enable).ok();
    }

    pub fn config_error(&mut self, err: &ConfigError) {
        let mut writer = uart1::writer();
        write!(writer, "FSS config error: {}\r\n", err).ok();
    }

    /// Handle host commands and report the cycle if requested or changed
    pub fn update(&mut self, report: &CycleReport) {
        let mut query = false;
        while let Some(b) = uart1::read_byte() {
            match b {
                VERBOSE_TOGGLE => self.verbose = !self.verbose,
                QUERY => query = true,
                _ => (),
            }
        }

        let changed = self.last != Some(report.resolved);
        self.last = Some(report.resolved);

        if self.verbose || changed || query {
            let mut writer = uart1::writer();
            write!(writer, "{}\r\n", report).ok();
        }
    }
}

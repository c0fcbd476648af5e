use std::num::NonZeroU32;

use serde::Serialize;

use crate::common::error::ChipstatError;

pub const DEFAULT_LOOKBACK_HOURS: u32 = 24;
pub const DEFAULT_BINWIDTH_HOURS: u32 = 1;

/// Parameters of a usage report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UsageConfig {
    /// Length of the lookback window in hours.
    hours: NonZeroU32,
    /// Number of hours aggregated into a single bar glyph.
    binwidth: NonZeroU32,
}

impl UsageConfig {
    pub fn new(hours: u32, binwidth: u32) -> crate::Result<Self> {
        let hours = NonZeroU32::new(hours).ok_or_else(|| {
            ChipstatError::ConfigError("the lookback window must be at least one hour".to_string())
        })?;
        let binwidth = NonZeroU32::new(binwidth).ok_or_else(|| {
            ChipstatError::ConfigError("the bin width must be at least one hour".to_string())
        })?;
        Ok(Self { hours, binwidth })
    }

    pub fn hours(&self) -> u32 {
        self.hours.get()
    }

    pub fn binwidth(&self) -> NonZeroU32 {
        self.binwidth
    }
}

impl Default for UsageConfig {
    fn default() -> Self {
        Self {
            hours: NonZeroU32::new(DEFAULT_LOOKBACK_HOURS).unwrap_or(NonZeroU32::MIN),
            binwidth: NonZeroU32::new(DEFAULT_BINWIDTH_HOURS).unwrap_or(NonZeroU32::MIN),
        }
    }
}

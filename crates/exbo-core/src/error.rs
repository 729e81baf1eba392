//! Hard-error and warning taxonomy for the back-off engine.
//!
//! Historically this library signalled failure through three multiplexed
//! ABI channels: a positive integer code, a reserved low integer band, and a
//! NaN payload. None of those survive here — Rust ownership already makes
//! the "no instance" / "no config" states this library used to guard
//! against unrepresentable, so codes 1 and 2 are retired rather than
//! reassigned. The remaining codes keep their original numbering so a
//! reader comparing against `exbo.h` can follow the lineage.

use std::fmt;

/// `Exbo_MinimumTime` from the original ABI: kept as a documented constant,
/// not as a live sentinel — queries report failure through [`ExboError`].
pub const MINIMUM_TIME: i64 = i64::MIN + 64;

/// Hard errors: the operation did not happen and state is unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ExboError {
    #[error("a later attempt was already recorded")]
    RecordingAPriorAttempt,
    #[error("the next attempt time overflowed")]
    NextTimeOverflow,
    #[error("BUG: state has negative I")]
    StateWithNegativeI,
    #[error("the pay-back time overflowed")]
    PayBackTimeOverflow,
    #[error("BUG: state has negative D")]
    StateWithNegativeD,
    #[error("the given X is not a finite real number")]
    InvalidConfigX1,
    #[error("the given X is not greater than or equal to 1")]
    InvalidConfigX2,
    #[error("the given A is not positive")]
    InvalidConfigA1,
    #[error("the given L is not positive")]
    InvalidConfigL1,
    #[error("the given L is less than the given A")]
    InvalidConfigL2,
    #[error("the requested configuration value is not set")]
    ConfigValueNotSet,
    #[error("BUG: the finished config is not marked as finished")]
    InternalError1,
    #[error("BUG: the finished config has missing parts")]
    InternalError2,
    #[error("BUG: the finished config is invalid")]
    InternalError3,
}

impl ExboError {
    /// The original `ExboErr_*` numeric code, kept stable. Codes 1
    /// (`NoInstance`) and 2 (`NoConfig`) are permanently retired.
    pub const fn code(self) -> u8 {
        match self {
            ExboError::RecordingAPriorAttempt => 3,
            ExboError::NextTimeOverflow => 4,
            ExboError::StateWithNegativeI => 5,
            ExboError::PayBackTimeOverflow => 6,
            ExboError::StateWithNegativeD => 7,
            ExboError::InvalidConfigX1 => 8,
            ExboError::InvalidConfigX2 => 9,
            ExboError::InvalidConfigA1 => 10,
            ExboError::InvalidConfigL1 => 11,
            ExboError::InvalidConfigL2 => 12,
            ExboError::ConfigValueNotSet => 13,
            ExboError::InternalError1 => 14,
            ExboError::InternalError2 => 15,
            ExboError::InternalError3 => 16,
        }
    }

    /// Static human-readable message, independent of the `Display` wording,
    /// matching the original error-message table verbatim.
    pub const fn message(self) -> &'static str {
        match self {
            ExboError::RecordingAPriorAttempt => "A later attempt was already recorded",
            ExboError::NextTimeOverflow => "The next time overflowed",
            ExboError::StateWithNegativeI => "BUG: state has negative I",
            ExboError::PayBackTimeOverflow => "The payback time overflowed",
            ExboError::StateWithNegativeD => "BUG: state has negative D",
            ExboError::InvalidConfigX1 => "The given X is not a finite real number",
            ExboError::InvalidConfigX2 => "The given X is not greater than 1",
            ExboError::InvalidConfigA1 => "The given A is not positive",
            ExboError::InvalidConfigL1 => "The given L is not positive",
            ExboError::InvalidConfigL2 => "The given L is less than the given A",
            ExboError::ConfigValueNotSet => "The requested configuration value is not set",
            ExboError::InternalError1 => "BUG: the finished config is not marked as finished",
            ExboError::InternalError2 => "BUG: the finished config has missing parts",
            ExboError::InternalError3 => "BUG: the finished config is invalid",
        }
    }
}

/// Warnings: the operation succeeded and state advanced, but the caller
/// should pay attention. Ordered by precedence (highest variant wins when
/// more than one condition fires within a single `record` call).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Warning {
    AttemptIsEarlierThanRecommended,
    ExcessCostLimitBreach,
    ExcessCostLimitBreachWithDebtOverflow,
}

impl Warning {
    /// The original `ExboWarn_*` numeric code (negative, as in the source).
    pub const fn code(self) -> i8 {
        match self {
            Warning::AttemptIsEarlierThanRecommended => -1,
            Warning::ExcessCostLimitBreach => -2,
            Warning::ExcessCostLimitBreachWithDebtOverflow => -3,
        }
    }

    pub const fn message(self) -> &'static str {
        match self {
            Warning::AttemptIsEarlierThanRecommended => {
                "This attempt is earlier than was recommended"
            }
            Warning::ExcessCostLimitBreach => "Excess cost limit breach",
            Warning::ExcessCostLimitBreachWithDebtOverflow => {
                "Excess cost limit breach with debt accumulator overflow"
            }
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Replaces `acc` with `w` unless `acc` already holds a warning of equal or
/// higher precedence. Used by [`crate::instance::Instance::record`] to
/// implement the fixed precedence order from the library's design notes.
pub(crate) fn accumulate(acc: &mut Option<Warning>, w: Warning) {
    match acc {
        Some(current) if *current >= w => {}
        _ => *acc = Some(w),
    }
}

//! The configuration manager: `Policy` and its two-phase commit
//! (`validated` -> `finished`).
//!
//! Ported from the reference C implementation's `zConfigValidate`,
//! `zConfigFinish`, and `zConfigSetDefaults`. The `validated`/`finished`
//! flags are kept as explicit fields rather than encoded in the type
//! system, since the caller can legitimately query them between phases.

use crate::error::ExboError;

const DEFAULT_X: f64 = 2.0;
const DEFAULT_A: i64 = 60_000;
const DEFAULT_L_OVER_A: i64 = 6;

/// The state the configuration has reached. Purely observational — the
/// library never branches on this directly, only on `validated`/`finished`
/// and the three `has_*` flags it summarizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigState {
    Empty,
    PartialUnvalidated,
    PartialValidated,
    Finished,
}

/// The policy triple `(X, A, L)`, with partial specification, validation,
/// and defaulting-then-freezing ("finishing").
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Policy {
    x: Option<f64>,
    a: Option<i64>,
    l: Option<i64>,
    validated: bool,
    finished: bool,
}

impl Policy {
    /// A fresh, empty policy: no fields set, not validated, not finished.
    pub fn new() -> Self {
        Self {
            x: None,
            a: None,
            l: None,
            validated: false,
            finished: false,
        }
    }

    /// Resets all fields and flags to the empty state.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    pub fn configure_x(&mut self, x: f64) {
        self.x = Some(x);
        self.validated = false;
        self.finished = false;
    }

    pub fn configure_a(&mut self, a: i64) {
        self.a = Some(a);
        self.validated = false;
        self.finished = false;
    }

    pub fn configure_l(&mut self, l: i64) {
        self.l = Some(l);
        self.validated = false;
        self.finished = false;
    }

    pub fn has_x(&self) -> bool {
        self.x.is_some()
    }

    pub fn has_a(&self) -> bool {
        self.a.is_some()
    }

    pub fn has_l(&self) -> bool {
        self.l.is_some()
    }

    pub fn x(&self) -> Option<f64> {
        self.x
    }

    pub fn a(&self) -> Option<i64> {
        self.a
    }

    pub fn l(&self) -> Option<i64> {
        self.l
    }

    pub fn is_validated(&self) -> bool {
        self.validated
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn state(&self) -> ConfigState {
        if self.finished {
            ConfigState::Finished
        } else if self.validated {
            ConfigState::PartialValidated
        } else if self.x.is_some() || self.a.is_some() || self.l.is_some() {
            ConfigState::PartialUnvalidated
        } else {
            ConfigState::Empty
        }
    }

    /// Validates whatever fields are currently set, committing
    /// `validated = true` on success. A no-op if already validated.
    pub fn validate(&mut self) -> Result<(), ExboError> {
        if self.validated {
            return Ok(());
        }
        self.revalidate()?;
        self.validated = true;
        Ok(())
    }

    /// Re-runs per-field validation without consulting or mutating the
    /// `validated` flag. Used both by [`Policy::validate`] and, after
    /// defaulting, by [`Policy::finish`]'s self-check.
    fn revalidate(&self) -> Result<(), ExboError> {
        self.validate_x()?;
        self.validate_a()?;
        self.validate_l()?;
        Ok(())
    }

    fn validate_x(&self) -> Result<(), ExboError> {
        match self.x {
            None => Ok(()),
            Some(x) if !x.is_finite() => Err(ExboError::InvalidConfigX1),
            Some(x) if x < 1.0 => Err(ExboError::InvalidConfigX2),
            Some(_) => Ok(()),
        }
    }

    fn validate_a(&self) -> Result<(), ExboError> {
        match self.a {
            None => Ok(()),
            Some(a) if a <= 0 => Err(ExboError::InvalidConfigA1),
            Some(_) => Ok(()),
        }
    }

    fn validate_l(&self) -> Result<(), ExboError> {
        match self.l {
            None => Ok(()),
            Some(l) if l <= 0 => Err(ExboError::InvalidConfigL1),
            Some(l) => match self.a {
                Some(a) if l < a => Err(ExboError::InvalidConfigL2),
                _ => Ok(()),
            },
        }
    }

    /// Idempotent. Validates, fills in missing fields by the documented
    /// defaulting order, freezes the policy, then re-validates the
    /// complete triple as a final self-check — rolling back on failure.
    pub fn finish(&mut self) -> Result<(), ExboError> {
        if self.finished {
            return Ok(());
        }
        self.validate()?;
        self.apply_defaults();
        self.finished = true;
        if let Err(e) = self.validate_finish() {
            self.finished = false;
            self.validated = false;
            return Err(e);
        }
        Ok(())
    }

    fn apply_defaults(&mut self) {
        if self.x.is_none() {
            self.x = Some(DEFAULT_X);
        }
        if self.a.is_none() {
            self.a = Some(match self.l {
                Some(l) => ((l as f64) / (DEFAULT_L_OVER_A as f64)).ceil() as i64,
                None => DEFAULT_A,
            });
        }
        if self.l.is_none() {
            let a = self.a.expect("A was just defaulted above");
            self.l = Some(match a.checked_mul(DEFAULT_L_OVER_A) {
                Some(l) => l,
                None => i64::MAX,
            });
        }
    }

    fn validate_finish(&self) -> Result<(), ExboError> {
        if !self.finished || !self.validated {
            return Err(ExboError::InternalError1);
        }
        if self.x.is_none() || self.a.is_none() || self.l.is_none() {
            return Err(ExboError::InternalError2);
        }
        self.revalidate().map_err(|_| ExboError::InternalError3)
    }
}

impl Default for Policy {
    fn default() -> Self {
        Self::new()
    }
}

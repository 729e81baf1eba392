//! The attempt recorder / state machine: `Instance`.
//!
//! Ported from the reference C implementation's `exboRecordAttempt` for
//! the five-step record algorithm. Every arithmetic step that crosses the
//! signed 64-bit range uses checked arithmetic with an explicit fallback,
//! and each `record()` call appends a structured entry to the lifecycle
//! log.

use crate::config::Policy;
use crate::error::{self, ExboError, Warning, accumulate};
use crate::log::{LifecycleLog, LogLevel, RecordLogEntry};

/// "Never recorded" sentinel for `T`.
const NEVER: i64 = i64::MIN;

/// A single back-off instance: the current state `(T, D, I)` plus its
/// exclusively-owned [`Policy`].
#[derive(Debug, Clone)]
pub struct Instance {
    t: i64,
    d: i64,
    i: i64,
    policy: Policy,
    log: LifecycleLog,
}

impl Instance {
    /// Creates an empty instance: policy present but unconfigured, no
    /// attempt recorded yet.
    pub fn new() -> Self {
        Self {
            t: NEVER,
            d: 0,
            i: 0,
            policy: Policy::new(),
            log: LifecycleLog::default(),
        }
    }

    /// Equivalent to `new()` followed by the three configures and a
    /// `finish_config`.
    pub fn with_policy(x: f64, a: i64, l: i64) -> Result<Self, ExboError> {
        let mut instance = Self::new();
        instance.configure_x(x);
        instance.configure_a(a);
        instance.configure_l(l);
        instance.finish_config()?;
        Ok(instance)
    }

    pub fn clear_config(&mut self) {
        self.policy.clear();
    }

    pub fn configure_x(&mut self, x: f64) {
        self.policy.configure_x(x);
    }

    pub fn configure_a(&mut self, a: i64) {
        self.policy.configure_a(a);
    }

    pub fn configure_l(&mut self, l: i64) {
        self.policy.configure_l(l);
    }

    pub fn validate_config(&mut self) -> Result<(), ExboError> {
        self.policy.validate()
    }

    pub fn finish_config(&mut self) -> Result<(), ExboError> {
        self.policy.finish()
    }

    pub fn is_config_finished(&self) -> bool {
        self.policy.is_finished()
    }

    pub fn is_config_validated(&self) -> bool {
        self.policy.is_validated()
    }

    pub fn config_has_x(&self) -> bool {
        self.policy.has_x()
    }

    pub fn config_has_a(&self) -> bool {
        self.policy.has_a()
    }

    pub fn config_has_l(&self) -> bool {
        self.policy.has_l()
    }

    pub fn config_x(&self) -> Option<f64> {
        self.policy.x()
    }

    pub fn config_a(&self) -> Option<i64> {
        self.policy.a()
    }

    pub fn config_l(&self) -> Option<i64> {
        self.policy.l()
    }

    /// Records an attempt at `t_out`, implicitly finishing the
    /// configuration if it is not already finished.
    ///
    /// On `Err`, state is unchanged. On `Ok`, state has advanced and the
    /// payload carries the highest-precedence warning raised, if any.
    pub fn record(&mut self, t_out: i64) -> Result<Option<Warning>, ExboError> {
        self.policy.finish()?;

        let t_in = self.t;
        if t_out < t_in {
            return Err(ExboError::RecordingAPriorAttempt);
        }

        let a = self.policy.a().expect("finished policy has A");
        let l = self.policy.l().expect("finished policy has L");
        let x = self.policy.x().expect("finished policy has X");
        let d_in = self.d;
        let i_in = self.i;

        let mut warning = None;
        let d_prime = match t_out.checked_sub(t_in) {
            None => 0, // T_in was the "never" sentinel; Δ is unbounded.
            Some(delta) => {
                if delta < i_in {
                    accumulate(&mut warning, Warning::AttemptIsEarlierThanRecommended);
                }
                if delta < d_in { d_in - delta } else { 0 }
            }
        };

        let (d_out, i_out) = match d_prime.checked_add(a) {
            Some(d_out) => {
                let (i_out, interval_warning) = crate::interval::interval(l, a, x, d_out);
                if let Some(w) = interval_warning {
                    accumulate(&mut warning, w);
                }
                (d_out, i_out)
            }
            None => {
                let d_out = i64::MAX;
                let i_out = d_out - (l - a);
                accumulate(&mut warning, Warning::ExcessCostLimitBreachWithDebtOverflow);
                (d_out, i_out)
            }
        };

        self.t = t_out;
        self.d = d_out;
        self.i = i_out;

        let (level, outcome) = match warning {
            Some(Warning::ExcessCostLimitBreachWithDebtOverflow) => {
                (LogLevel::Warn, "excess_cost_limit_breach_with_debt_overflow")
            }
            Some(Warning::ExcessCostLimitBreach) => (LogLevel::Warn, "excess_cost_limit_breach"),
            Some(Warning::AttemptIsEarlierThanRecommended) => {
                (LogLevel::Info, "attempt_earlier_than_recommended")
            }
            None => (LogLevel::Trace, "ok"),
        };
        self.log.push(level, t_out, d_out, i_out, outcome);

        Ok(warning)
    }

    /// `T`, clamped up to `Exbo_MinimumTime` if never recorded.
    pub fn previous_attempt_time(&self) -> i64 {
        self.t.max(error::MINIMUM_TIME)
    }

    /// `T + I`, with overflow and the `I < 0` invariant checked.
    pub fn next_attempt_time(&self) -> Result<i64, ExboError> {
        if self.i < 0 {
            return Err(ExboError::StateWithNegativeI);
        }
        match self.t.checked_add(self.i) {
            Some(sum) => Ok(sum.max(error::MINIMUM_TIME)),
            None => Err(ExboError::NextTimeOverflow),
        }
    }

    /// `T + D`, with overflow and the `D < 0` invariant checked.
    pub fn pay_back_time(&self) -> Result<i64, ExboError> {
        if self.d < 0 {
            return Err(ExboError::StateWithNegativeD);
        }
        match self.t.checked_add(self.d) {
            Some(sum) => Ok(sum.max(error::MINIMUM_TIME)),
            None => Err(ExboError::PayBackTimeOverflow),
        }
    }

    /// Current debt accumulator `D`.
    pub fn debt(&self) -> i64 {
        self.d
    }

    /// Current recommended interval `I`.
    pub fn current_interval(&self) -> i64 {
        self.i
    }

    /// View of the structured `record()` decision log.
    pub fn lifecycle_log(&self) -> &[RecordLogEntry] {
        self.log.entries()
    }

    /// Drains the structured `record()` decision log.
    pub fn drain_lifecycle_log(&mut self) -> Vec<RecordLogEntry> {
        self.log.drain()
    }
}

impl Default for Instance {
    fn default() -> Self {
        Self::new()
    }
}

//! Tunables read from the process environment.

use std::env;

use thiserror::Error;

/// Capacity of the queue between a pump's producer and consumer.
pub const SPINDLE_PUMP_CAPACITY: &str = "SPINDLE_PUMP_CAPACITY";

/// Stack size in bytes for threads started by [`parallel`](crate::parallel).
pub const SPINDLE_TASK_STACK: &str = "SPINDLE_TASK_STACK";

pub(crate) const DEFAULT_PUMP_CAPACITY: usize = 20;
pub(crate) const DEFAULT_TASK_STACK: usize = 1_048_576;

// The queue allocates all of its slots up front.
const MAX_PUMP_CAPACITY: usize = 1 << 20;
const MAX_TASK_STACK: usize = 1 << 30;

/// An environment variable holds something other than a positive
/// integer within its bounds.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("invalid value in {var}; must be a natural number up to {max}")]
pub struct BadConfiguration {
    /// Name of the offending variable.
    pub var: &'static str,
    /// The largest value the variable accepts.
    pub max: usize,
}

fn natural(var: &'static str, default: usize, max: usize) -> Result<usize, BadConfiguration> {
    match env::var(var) {
        Ok(value) => match value.trim().parse() {
            Ok(n) if (1..=max).contains(&n) => Ok(n),
            _ => Err(BadConfiguration { var, max }),
        },

        Err(_) => Ok(default),
    }
}

/// Gets the configured pump queue capacity, falling back to 20 when
/// [`SPINDLE_PUMP_CAPACITY`] is not set.
///
/// Capacities above 2^20 items are rejected.
pub fn pump_capacity() -> Result<usize, BadConfiguration> {
    natural(SPINDLE_PUMP_CAPACITY, DEFAULT_PUMP_CAPACITY, MAX_PUMP_CAPACITY)
}

/// Gets the configured task thread stack size, falling back to 1 MiB
/// when [`SPINDLE_TASK_STACK`] is not set.
///
/// Stacks above 1 GiB are rejected.
pub fn task_stack_size() -> Result<usize, BadConfiguration> {
    natural(SPINDLE_TASK_STACK, DEFAULT_TASK_STACK, MAX_TASK_STACK)
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Arithmetic solvers that share the Tokyo batch input conventions.

pub mod advertising;
pub mod gps;

use thiserror::Error;

/// Errors raised while decoding or evaluating estimate inputs.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EstimateError {
    /// A line held the wrong number of whitespace separated fields.
    #[error("expected {expected} fields but found {found}")]
    FieldCount {
        /// Fields required by the line format.
        expected: usize,
        /// Fields actually present.
        found: usize,
    },
    /// A field was not an integer.
    #[error("could not parse '{0}' as an integer")]
    InvalidNumber(String),
    /// The sampling interval was zero or negative.
    #[error("sampling interval must be positive, got {0}")]
    InvalidInterval(i64),
    /// A route needs at least one recorded fix.
    #[error("route has no recorded positions")]
    EmptyRoute,
    /// Recorded timestamps must strictly increase.
    #[error("fix {index} at time {time} does not come after the previous fix")]
    NonIncreasingTime {
        /// Zero-based index of the offending fix.
        index: usize,
        /// Timestamp of the offending fix.
        time: i64,
    },
    /// The route's time span cannot be sampled without integer overflow.
    #[error("route timestamps {first}..{last} overflow when sampled every {interval}")]
    TimeOverflow {
        /// Timestamp of the first fix.
        first: i64,
        /// Timestamp of the last fix.
        last: i64,
        /// Sampling interval.
        interval: i64,
    },
    /// The route never moves, so a relative error is undefined.
    #[error("route has zero length")]
    ZeroLengthRoute,
}

/// Splits `line` into exactly `N` integers.
pub(crate) fn integers<const N: usize>(line: &str) -> Result<[i64; N], EstimateError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != N {
        return Err(EstimateError::FieldCount {
            expected: N,
            found: fields.len(),
        });
    }

    let mut values = [0; N];
    for (slot, field) in values.iter_mut().zip(fields) {
        *slot = field
            .parse()
            .map_err(|_| EstimateError::InvalidNumber(field.to_owned()))?;
    }
    Ok(values)
}

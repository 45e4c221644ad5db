//! Estimates how much distance a periodic GPS sampler under-reports.
//!
//! The runner's real track is the polyline through the recorded fixes. The
//! sampler reads the position every `interval` time units, interpolating
//! linearly between fixes, and always includes the first and last fix.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{integers, EstimateError};

/// One recorded position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fix {
    /// Horizontal coordinate.
    pub x: i64,
    /// Vertical coordinate.
    pub y: i64,
    /// Time at which the position was recorded.
    pub time: i64,
}

impl FromStr for Fix {
    type Err = EstimateError;

    /// Parses an `x y time` line.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let [x, y, time] = integers::<3>(line)?;
        Ok(Self { x, y, time })
    }
}

/// Parses the `count interval` header of a route.
pub fn parse_header(line: &str) -> Result<(usize, i64), EstimateError> {
    let [count, interval] = integers::<2>(line)?;
    let count =
        usize::try_from(count).map_err(|_| EstimateError::InvalidNumber(count.to_string()))?;
    Ok((count, interval))
}

/// A validated route ready for sampling.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    interval: i64,
    fixes: Vec<Fix>,
}

impl Route {
    /// Validates the sampling interval and the fix ordering.
    ///
    /// The sampling clock never passes `last + interval` and every time
    /// difference is bounded by `last - first`, so checking both up front keeps
    /// the sampler free of overflow.
    pub fn new(interval: i64, fixes: Vec<Fix>) -> Result<Self, EstimateError> {
        if interval <= 0 {
            return Err(EstimateError::InvalidInterval(interval));
        }
        if fixes.is_empty() {
            return Err(EstimateError::EmptyRoute);
        }
        for (index, pair) in fixes.windows(2).enumerate() {
            if pair[1].time <= pair[0].time {
                return Err(EstimateError::NonIncreasingTime {
                    index: index + 1,
                    time: pair[1].time,
                });
            }
        }

        let first = fixes[0].time;
        let last = fixes[fixes.len() - 1].time;
        if last.checked_sub(first).is_none() || last.checked_add(interval).is_none() {
            return Err(EstimateError::TimeOverflow {
                first,
                last,
                interval,
            });
        }

        Ok(Self { interval, fixes })
    }

    /// Length of the recorded polyline.
    #[must_use]
    pub fn real_distance(&self) -> f64 {
        self.fixes
            .windows(2)
            .map(|pair| distance(point(pair[0]), point(pair[1])))
            .sum()
    }

    /// Length of the polyline through the sampled positions.
    #[must_use]
    pub fn sampled_distance(&self) -> f64 {
        let samples = self.samples();
        samples
            .windows(2)
            .map(|pair| distance(pair[0], pair[1]))
            .sum()
    }

    /// Percentage of the real distance the sampler fails to report.
    pub fn distance_error(&self) -> Result<f64, EstimateError> {
        let real = self.real_distance();
        if real == 0.0 {
            return Err(EstimateError::ZeroLengthRoute);
        }
        Ok((real - self.sampled_distance()) / real * 100.0)
    }

    fn samples(&self) -> Vec<(f64, f64)> {
        let first = self.fixes[0];
        let last = self.fixes[self.fixes.len() - 1];
        let mut samples = vec![point(first)];
        let mut segment = 1;
        let mut clock = first.time + self.interval;

        while clock <= last.time {
            let end = self.fixes[segment];
            if clock > end.time {
                segment += 1;
                continue;
            }
            let start = self.fixes[segment - 1];
            let ratio = (clock - start.time) as f64 / (end.time - start.time) as f64;
            let (x0, y0) = point(start);
            let (x1, y1) = point(end);
            samples.push((x0 + (x1 - x0) * ratio, y0 + (y1 - y0) * ratio));
            clock += self.interval;
        }

        samples.push(point(last));
        samples
    }
}

fn point(fix: Fix) -> (f64, f64) {
    (fix.x as f64, fix.y as f64)
}

fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    (b.0 - a.0).hypot(b.1 - a.1)
}

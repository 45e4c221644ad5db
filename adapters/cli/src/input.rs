//! Batch input decoding shared by the solvers.

use anyhow::{Context, Result};
use tokyo_system_estimates::{
    advertising::Campaign,
    gps::{self, Fix, Route},
};
use tokyo_world::Layout;

/// Line cursor that remembers how far it has read for error messages.
struct Lines<'a> {
    inner: std::str::Lines<'a>,
    number: usize,
}

impl<'a> Lines<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            inner: text.lines(),
            number: 0,
        }
    }

    fn next(&mut self, expected: &str) -> Result<&'a str> {
        self.number += 1;
        self.inner
            .next()
            .with_context(|| format!("line {}: expected {expected}, found end of input", self.number))
    }

    /// Like `next`, skipping blank separator lines.
    fn next_content(&mut self, expected: &str) -> Result<&'a str> {
        loop {
            let line = self.next(expected)?;
            if !line.trim().is_empty() {
                return Ok(line);
            }
        }
    }

    fn case_count(&mut self) -> Result<usize> {
        let line = self.next_content("a case count")?;
        line.trim()
            .parse()
            .with_context(|| format!("line {}: '{}' is not a case count", self.number, line.trim()))
    }
}

/// Decodes `T` followed by `T` grids.
pub(crate) fn layouts(text: &str) -> Result<Vec<Layout>> {
    let mut lines = Lines::new(text);
    let cases = lines.case_count()?;

    (1..=cases)
        .map(|case| {
            let header = lines.next_content("grid dimensions")?;
            let (columns, rows) = Layout::parse_dimensions(header)
                .with_context(|| format!("case {case}, line {}", lines.number))?;
            let first = lines.number + 1;
            let body = (0..rows)
                .map(|_| lines.next("a grid row"))
                .collect::<Result<Vec<_>>>()
                .with_context(|| format!("case {case}"))?;
            Layout::parse(columns, rows, body)
                .with_context(|| format!("case {case}, grid starting on line {first}"))
        })
        .collect()
}

/// Decodes `N` followed by `N` campaign lines.
pub(crate) fn campaigns(text: &str) -> Result<Vec<Campaign>> {
    let mut lines = Lines::new(text);
    let cases = lines.case_count()?;

    (1..=cases)
        .map(|case| {
            let line = lines.next("a campaign")?;
            line.parse()
                .with_context(|| format!("case {case}, line {}", lines.number))
        })
        .collect()
}

/// Decodes a `count interval` header followed by `count` fixes.
pub(crate) fn route(text: &str) -> Result<Route> {
    let mut lines = Lines::new(text);
    let header = lines.next_content("a route header")?;
    let (count, interval) =
        gps::parse_header(header).with_context(|| format!("line {}", lines.number))?;

    let fixes = (0..count)
        .map(|_| {
            let line = lines.next("a position fix")?;
            line.parse::<Fix>()
                .with_context(|| format!("line {}", lines.number))
        })
        .collect::<Result<Vec<_>>>()?;

    Route::new(interval, fixes).context("invalid route")
}

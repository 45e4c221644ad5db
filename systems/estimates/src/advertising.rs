//! Decides whether an advertising campaign pays for itself.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{integers, EstimateError};

/// Revenue figures for one campaign.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    /// Revenue without advertising.
    pub before: i64,
    /// Expected revenue with advertising.
    pub after: i64,
    /// Cost of advertising.
    pub cost: i64,
}

impl Campaign {
    /// Compares the advertised revenue against staying put.
    #[must_use]
    pub fn decide(&self) -> Decision {
        match self.before.saturating_add(self.cost).cmp(&self.after) {
            std::cmp::Ordering::Less => Decision::Advertise,
            std::cmp::Ordering::Greater => Decision::DoNotAdvertise,
            std::cmp::Ordering::Equal => Decision::DoesNotMatter,
        }
    }
}

impl FromStr for Campaign {
    type Err = EstimateError;

    /// Parses a `before after cost` line.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let [before, after, cost] = integers::<3>(line)?;
        Ok(Self {
            before,
            after,
            cost,
        })
    }
}

/// Recommendation for a campaign.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Advertising strictly increases profit.
    Advertise,
    /// Advertising strictly decreases profit.
    DoNotAdvertise,
    /// Both choices yield the same profit.
    DoesNotMatter,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Advertise => "advertise",
            Self::DoNotAdvertise => "do not advertise",
            Self::DoesNotMatter => "does not matter",
        })
    }
}

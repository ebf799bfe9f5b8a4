use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config;
use crate::error::DashboardError;

// ---------------------------------------------------------------------------
// Region — Regions offered by the region selector
// ---------------------------------------------------------------------------

/// Serialized by display name, e.g. `"Centro-Oeste"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Region {
    /// The whole country; no region restriction.
    #[default]
    Brasil,
    #[serde(rename = "Centro-Oeste")]
    CentroOeste,
    Nordeste,
    Norte,
    Sudeste,
    Sul,
}

impl Region {
    pub const ALL: [Region; 6] = [
        Region::Brasil,
        Region::CentroOeste,
        Region::Nordeste,
        Region::Norte,
        Region::Sudeste,
        Region::Sul,
    ];

    /// Display name as shown in the selector.
    pub fn name(&self) -> &'static str {
        match self {
            Region::Brasil => "Brasil",
            Region::CentroOeste => "Centro-Oeste",
            Region::Nordeste => "Nordeste",
            Region::Norte => "Norte",
            Region::Sudeste => "Sudeste",
            Region::Sul => "Sul",
        }
    }

    /// Value sent as the `regiao` query parameter: empty for the whole
    /// country, otherwise the lowercased name.
    pub fn query_value(&self) -> String {
        match self {
            Region::Brasil => String::new(),
            other => other.name().to_lowercase(),
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Region {
    type Err = DashboardError;

    /// Accepts display names and query values, case-insensitively. An empty
    /// string means the whole country.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        if needle.is_empty() {
            return Ok(Region::Brasil);
        }
        Region::ALL
            .into_iter()
            .find(|r| r.name().eq_ignore_ascii_case(needle))
            .ok_or_else(|| DashboardError::InvalidArgument(format!("Unknown region: {}", s)))
    }
}

// ---------------------------------------------------------------------------
// Filter — User selections for one render cycle
// ---------------------------------------------------------------------------

/// Region, year and seller selections for one render cycle.
///
/// Region and year scope the request sent to the data source; the seller set
/// is applied locally after the fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub region: Region,
    pub year: Option<i32>,
    #[serde(default)]
    pub sellers: BTreeSet<String>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn region(mut self, region: Region) -> Self {
        self.region = region;
        self
    }

    pub fn year(mut self, year: Option<i32>) -> Self {
        self.year = year;
        self
    }

    pub fn sellers<I, S>(mut self, sellers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sellers = sellers.into_iter().map(Into::into).collect();
        self
    }

    /// The part of the filter the data source understands.
    pub fn source_query(&self) -> SourceQuery {
        SourceQuery {
            region: self.region,
            year: self.year,
        }
    }
}

// ---------------------------------------------------------------------------
// SourceQuery — One request against the sales endpoint
// ---------------------------------------------------------------------------

/// Region/year scope of one request. Two filters that differ only in their
/// seller selection share the same `SourceQuery` and hence the same cached
/// response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourceQuery {
    pub region: Region,
    pub year: Option<i32>,
}

impl SourceQuery {
    /// `(name, value)` pairs for the request's query string.
    pub fn params(&self) -> [(&'static str, String); 2] {
        [
            (config::REGION_PARAM, self.region.query_value()),
            (
                config::YEAR_PARAM,
                self.year.map(|y| y.to_string()).unwrap_or_default(),
            ),
        ]
    }

    /// Stable cache key, e.g. `sales_all_all` or `sales_sudeste_2022`.
    pub fn cache_key(&self) -> String {
        let region = match self.region {
            Region::Brasil => "all".to_string(),
            other => other.query_value(),
        };
        let year = self
            .year
            .map(|y| y.to_string())
            .unwrap_or_else(|| "all".to_string());
        format!("sales_{}_{}", region, year)
    }
}

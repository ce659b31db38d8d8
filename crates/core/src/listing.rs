//! List view filters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Prospects shown per page.
pub const PROSPECTS_PER_PAGE: u32 = 15;
/// Disciplers shown per page.
pub const DISCIPLERS_PER_PAGE: u32 = 15;
/// Survey responses shown per page.
pub const RESPONSES_PER_PAGE: u32 = 20;

/// Prospect list tab.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProspectTab {
    /// Every prospect.
    #[default]
    All,
    /// Prospects with a discipler.
    Assigned,
    /// Prospects without a discipler.
    Unassigned,
}

/// Discipler list tab.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisciplerTab {
    /// Every discipler.
    #[default]
    All,
    /// Disciplers with at least one completed training.
    Trained,
    /// Disciplers with none.
    NotTrained,
}

impl ProspectTab {
    /// Parses a query value; unknown or absent values select `All`.
    #[must_use]
    pub fn from_query(raw: Option<&str>) -> Self {
        raw.and_then(|value| value.parse().ok()).unwrap_or_default()
    }

    /// Returns the query value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Assigned => "assigned",
            Self::Unassigned => "unassigned",
        }
    }
}

impl DisciplerTab {
    /// Parses a query value; unknown or absent values select `All`.
    #[must_use]
    pub fn from_query(raw: Option<&str>) -> Self {
        raw.and_then(|value| value.parse().ok()).unwrap_or_default()
    }

    /// Returns the query value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Trained => "trained",
            Self::NotTrained => "not_trained",
        }
    }
}

impl FromStr for ProspectTab {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "all" => Ok(Self::All),
            "assigned" => Ok(Self::Assigned),
            "unassigned" => Ok(Self::Unassigned),
            _ => Err(()),
        }
    }
}

impl FromStr for DisciplerTab {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "all" => Ok(Self::All),
            "trained" => Ok(Self::Trained),
            "not_trained" => Ok(Self::NotTrained),
            _ => Err(()),
        }
    }
}

impl fmt::Display for ProspectTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for DisciplerTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalises a search query: trimmed, `None` when blank.
#[must_use]
pub fn normalize_search(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|q| !q.is_empty())
        .map(ToString::to_string)
}

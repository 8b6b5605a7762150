//! Waste collection events.
//!
//! An event is a single pickup of one waste category on one day. Within a
//! district it is identified by its `(date, type)` pair.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Waste category, stored on disk by its snake_case key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WasteType {
    Restmuell,
    Biotonne,
    Papiertonne,
    GelberSack,
    Sondermuell,
    Altkleider,
}

impl WasteType {
    pub const ALL: [WasteType; 6] = [
        WasteType::Restmuell,
        WasteType::Biotonne,
        WasteType::Papiertonne,
        WasteType::GelberSack,
        WasteType::Sondermuell,
        WasteType::Altkleider,
    ];

    /// The key used in calendar files and API requests.
    pub fn key(self) -> &'static str {
        match self {
            WasteType::Restmuell => "restmuell",
            WasteType::Biotonne => "biotonne",
            WasteType::Papiertonne => "papiertonne",
            WasteType::GelberSack => "gelber_sack",
            WasteType::Sondermuell => "sondermuell",
            WasteType::Altkleider => "altkleider",
        }
    }

    /// Display name, used as the default event description.
    pub fn label(self) -> &'static str {
        match self {
            WasteType::Restmuell => "Restmüll",
            WasteType::Biotonne => "Biotonne",
            WasteType::Papiertonne => "Papiertonne",
            WasteType::GelberSack => "Gelber Sack",
            WasteType::Sondermuell => "Sondermüll",
            WasteType::Altkleider => "Altkleider",
        }
    }
}

impl fmt::Display for WasteType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for WasteType {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WasteType::ALL
            .into_iter()
            .find(|t| t.key() == s)
            .ok_or_else(|| StoreError::InvalidInput(format!("unknown waste type '{}'", s)))
    }
}

/// A single collection date for one waste category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub waste_type: WasteType,
    pub description: String,
}

impl Event {
    pub fn new(date: NaiveDate, waste_type: WasteType, description: impl Into<String>) -> Self {
        Event {
            date,
            waste_type,
            description: description.into(),
        }
    }

    /// Event described by its category's display name.
    pub fn labelled(date: NaiveDate, waste_type: WasteType) -> Self {
        Event::new(date, waste_type, waste_type.label())
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// Whether this event has the given `(date, type)` identity.
    pub fn matches(&self, date: NaiveDate, waste_type: WasteType) -> bool {
        self.date == date && self.waste_type == waste_type
    }
}

/// Parse an ISO 8601 calendar date (`YYYY-MM-DD`).
pub fn parse_date(s: &str) -> Result<NaiveDate, StoreError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| StoreError::InvalidInput(format!("invalid date '{}', expected YYYY-MM-DD", s)))
}

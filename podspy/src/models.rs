//! Behaviour attached to the shared records
//!
//! The records themselves live in `interface` so UniFFI sees a single
//! definition; derived values and parsing live here.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::interface::{
    CompetitionLevel, CompetitorShop, FilterOptions, NumericRange, Platform, PodSpyError,
    SavedSearch, TrendDirection,
};

// ─────────────────────────────────────────────────────────────────────────────
// ENUM HELPERS
// ─────────────────────────────────────────────────────────────────────────────

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::Etsy,
        Platform::Amazon,
        Platform::Redbubble,
        Platform::Teespring,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Etsy => "Etsy",
            Platform::Amazon => "Amazon",
            Platform::Redbubble => "Redbubble",
            Platform::Teespring => "Teespring",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = PodSpyError;

    /// Case-insensitive, so CLI input like `etsy` works
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::ALL
            .iter()
            .copied()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| PodSpyError::InvalidInput(format!("unknown platform: {}", s)))
    }
}

impl TrendDirection {
    /// rising above +20%, falling below -10%, stable in between
    pub fn from_growth_rate(growth_rate: f64) -> Self {
        if growth_rate > 20.0 {
            TrendDirection::Rising
        } else if growth_rate < -10.0 {
            TrendDirection::Falling
        } else {
            TrendDirection::Stable
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TrendDirection::Rising => "rising",
            TrendDirection::Falling => "falling",
            TrendDirection::Stable => "stable",
        }
    }
}

impl CompetitionLevel {
    pub const ALL: [CompetitionLevel; 3] = [
        CompetitionLevel::Low,
        CompetitionLevel::Medium,
        CompetitionLevel::High,
    ];

    /// Low below 40, Medium below 70, High otherwise
    pub fn from_score(score: u32) -> Self {
        if score < 40 {
            CompetitionLevel::Low
        } else if score < 70 {
            CompetitionLevel::Medium
        } else {
            CompetitionLevel::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CompetitionLevel::Low => "Low",
            CompetitionLevel::Medium => "Medium",
            CompetitionLevel::High => "High",
        }
    }
}

impl FromStr for CompetitionLevel {
    type Err = PodSpyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CompetitionLevel::ALL
            .iter()
            .copied()
            .find(|l| l.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| PodSpyError::InvalidInput(format!("unknown competition level: {}", s)))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// RANGES & FILTERS
// ─────────────────────────────────────────────────────────────────────────────

impl NumericRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl Serialize for NumericRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (self.min, self.max).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for NumericRange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (min, max) = <(f64, f64)>::deserialize(deserializer)?;
        Ok(Self { min, max })
    }
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            price_range: NumericRange::new(0.0, 200.0),
            review_range: NumericRange::new(0.0, 10_000.0),
            platform: Vec::new(),
            category: Vec::new(),
            competition_level: Vec::new(),
            min_score: 0,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// SAVED SEARCHES & SHOPS
// ─────────────────────────────────────────────────────────────────────────────

impl SavedSearch {
    /// Id is derived from the creation instant in milliseconds
    pub fn new(query: String, filters: FilterOptions, now: DateTime<Utc>) -> Self {
        Self {
            id: format!("search-{}", now.timestamp_millis()),
            query,
            filters,
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

impl CompetitorShop {
    /// Flip the monitoring flag, the only field that changes after generation
    pub fn toggle_monitored(&mut self) {
        self.is_monitored = !self.is_monitored;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_trend_direction_thresholds() {
        assert_eq!(TrendDirection::from_growth_rate(25.0), TrendDirection::Rising);
        assert_eq!(TrendDirection::from_growth_rate(-15.0), TrendDirection::Falling);
        assert_eq!(TrendDirection::from_growth_rate(0.0), TrendDirection::Stable);
        // Boundaries are exclusive
        assert_eq!(TrendDirection::from_growth_rate(20.0), TrendDirection::Stable);
        assert_eq!(TrendDirection::from_growth_rate(-10.0), TrendDirection::Stable);
    }

    #[test]
    fn test_competition_level_buckets() {
        assert_eq!(CompetitionLevel::from_score(0), CompetitionLevel::Low);
        assert_eq!(CompetitionLevel::from_score(39), CompetitionLevel::Low);
        assert_eq!(CompetitionLevel::from_score(40), CompetitionLevel::Medium);
        assert_eq!(CompetitionLevel::from_score(69), CompetitionLevel::Medium);
        assert_eq!(CompetitionLevel::from_score(70), CompetitionLevel::High);
    }

    #[test]
    fn test_platform_parse_case_insensitive() {
        assert_eq!("etsy".parse::<Platform>().unwrap(), Platform::Etsy);
        assert_eq!(" REDBUBBLE ".parse::<Platform>().unwrap(), Platform::Redbubble);
        assert!("ebay".parse::<Platform>().is_err());
    }

    #[test]
    fn test_filter_options_json_shape() {
        let json = serde_json::to_value(FilterOptions::default()).unwrap();
        assert_eq!(json["priceRange"], serde_json::json!([0.0, 200.0]));
        assert_eq!(json["reviewRange"], serde_json::json!([0.0, 10000.0]));
        assert_eq!(json["minScore"], 0);

        let parsed: FilterOptions = serde_json::from_str(
            r#"{"priceRange":[10,50],"reviewRange":[0,500],"platform":["Etsy"],"category":[],"competitionLevel":["Low"],"minScore":40}"#,
        )
        .unwrap();
        assert_eq!(parsed.price_range, NumericRange::new(10.0, 50.0));
        assert_eq!(parsed.platform, vec![Platform::Etsy]);
        assert_eq!(parsed.competition_level, vec![CompetitionLevel::Low]);
    }

    #[test]
    fn test_numeric_range_inclusive() {
        let range = NumericRange::new(10.0, 20.0);
        assert!(range.contains(10.0));
        assert!(range.contains(20.0));
        assert!(!range.contains(20.01));
    }

    #[test]
    fn test_saved_search_id_from_timestamp() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let search = SavedSearch::new("mug".into(), FilterOptions::default(), now);
        assert_eq!(search.id, format!("search-{}", now.timestamp_millis()));
        assert_eq!(search.timestamp, "2024-03-01T12:00:00.000Z");
    }
}

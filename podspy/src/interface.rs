//! POD Spy FFI Interface Definition
//!
//! This file defines the records, enums and error type shared with the host UI
//! via UniFFI. It acts as the source of truth for the persisted JSON shape:
//! field names are camelCase so stored blobs match what the dashboard reads.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ═══════════════════════════════════════════════════════════════════════════════
// ENUMS
// ═══════════════════════════════════════════════════════════════════════════════

/// Marketplace a listing or shop lives on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, uniffi::Enum)]
pub enum Platform {
    Etsy,
    Amazon,
    Redbubble,
    Teespring,
}

/// Short-term movement of a single listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, uniffi::Enum)]
#[serde(rename_all = "lowercase")]
pub enum ProductTrend {
    Up,
    Down,
    Stable,
}

/// Direction of a niche, derived from its growth rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, uniffi::Enum)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Rising,
    Falling,
    Stable,
}

/// Bucketed label for a 0-100 competition value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, uniffi::Enum)]
pub enum CompetitionLevel {
    Low,
    Medium,
    High,
}

// ═══════════════════════════════════════════════════════════════════════════════
// RECORDS (Structs)
// ═══════════════════════════════════════════════════════════════════════════════

/// A print-on-demand product listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, uniffi::Record)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub title: String,
    /// Currency value, 2 decimals
    pub price: f64,
    pub platform: Platform,
    pub image_url: String,
    pub seller: String,
    /// 1 decimal
    pub rating: f64,
    pub review_count: u32,
    pub estimated_sales: u32,
    /// Days since the listing went live
    pub listing_age: u32,
    pub category: String,
    /// Composite 10-100 score, see `generator::winning_score`
    pub winning_score: u32,
    pub trend: ProductTrend,
    /// RFC 3339 timestamp
    pub last_updated: String,
}

/// Search keyword metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, uniffi::Record)]
#[serde(rename_all = "camelCase")]
pub struct Keyword {
    pub id: String,
    pub keyword: String,
    pub search_volume: u32,
    pub difficulty: u32,
    /// 0-100 competition score (not a listing count)
    pub competition: u32,
    /// Monthly search volume, January first
    pub trend: Vec<u32>,
    pub related_keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpc: Option<f64>,
}

/// A competing shop, optionally monitored by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, uniffi::Record)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorShop {
    pub id: String,
    pub shop_name: String,
    pub platform: Platform,
    pub products_count: u32,
    pub avg_rating: f64,
    pub total_reviews: u32,
    pub estimated_revenue: u32,
    pub is_monitored: bool,
}

/// Niche-level trend with a sample of listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, uniffi::Record)]
#[serde(rename_all = "camelCase")]
pub struct TrendData {
    pub id: String,
    pub niche: String,
    /// Signed percentage, 1 decimal
    pub growth_rate: f64,
    pub search_demand: u32,
    pub competition_level: u32,
    pub seasonality_score: u32,
    pub avg_price: f64,
    pub trend_direction: TrendDirection,
    pub products: Vec<Product>,
}

/// Inclusive numeric bounds. Persisted as a `[min, max]` pair.
#[derive(Debug, Clone, Copy, PartialEq, uniffi::Record)]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
}

/// Filter panel state
///
/// Empty selection lists mean "no constraint", not "match nothing".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, uniffi::Record)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub price_range: NumericRange,
    pub review_range: NumericRange,
    pub platform: Vec<Platform>,
    pub category: Vec<String>,
    pub competition_level: Vec<CompetitionLevel>,
    pub min_score: u32,
}

/// A query + filter combination the user chose to keep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, uniffi::Record)]
pub struct SavedSearch {
    pub id: String,
    pub query: String,
    pub filters: FilterOptions,
    pub timestamp: String,
}

// ═══════════════════════════════════════════════════════════════════════════════
// ERROR TYPE
// ═══════════════════════════════════════════════════════════════════════════════

/// Error type for POD Spy operations
#[derive(Debug, Error, uniffi::Error)]
pub enum PodSpyError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Export error: {0}")]
    ExportError(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<crate::database::DatabaseError> for PodSpyError {
    fn from(e: crate::database::DatabaseError) -> Self {
        PodSpyError::DatabaseError(e.to_string())
    }
}

impl From<serde_json::Error> for PodSpyError {
    fn from(e: serde_json::Error) -> Self {
        PodSpyError::SerializationError(e.to_string())
    }
}

impl From<csv::Error> for PodSpyError {
    fn from(e: csv::Error) -> Self {
        PodSpyError::ExportError(e.to_string())
    }
}

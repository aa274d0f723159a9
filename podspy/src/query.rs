//! Filtering and ordering of in-memory collections.
//!
//! Every view (research, keywords, trends, competitors) runs the same pipeline:
//! text match → range/set predicates → stable sort. Inputs are never mutated.
//!
//! Each record kind declares which dimensions it has through `Queryable`. A
//! dimension a kind does not have never constrains it, so a competition-level
//! selection leaves products untouched and a price range leaves keywords alone.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::interface::{
    CompetitionLevel, CompetitorShop, FilterOptions, Keyword, Platform, PodSpyError, Product,
    TrendData,
};

// ─────────────────────────────────────────────────────────────────────────────
// SORT KEYS
// ─────────────────────────────────────────────────────────────────────────────

/// Named orderings offered by the dashboard's sort menus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Score,
    Reviews,
    Sales,
    PriceLow,
    PriceHigh,
    Newest,
    Rating,
    Volume,
    Growth,
    Revenue,
}

impl SortKey {
    pub const ALL: [SortKey; 10] = [
        SortKey::Score,
        SortKey::Reviews,
        SortKey::Sales,
        SortKey::PriceLow,
        SortKey::PriceHigh,
        SortKey::Newest,
        SortKey::Rating,
        SortKey::Volume,
        SortKey::Growth,
        SortKey::Revenue,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Score => "score",
            SortKey::Reviews => "reviews",
            SortKey::Sales => "sales",
            SortKey::PriceLow => "price-low",
            SortKey::PriceHigh => "price-high",
            SortKey::Newest => "newest",
            SortKey::Rating => "rating",
            SortKey::Volume => "volume",
            SortKey::Growth => "growth",
            SortKey::Revenue => "revenue",
        }
    }

    /// Cheapest first and youngest listing first; everything else is biggest first
    pub fn is_ascending(&self) -> bool {
        matches!(self, SortKey::PriceLow | SortKey::Newest)
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = PodSpyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // The product grid's plain "price" menu entry meant highest first
        if s == "price" {
            return Ok(SortKey::PriceHigh);
        }
        SortKey::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| PodSpyError::InvalidInput(format!("unknown sort key: {}", s)))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// QUERYABLE RECORDS
// ─────────────────────────────────────────────────────────────────────────────

/// Dimensions a record exposes to filtering and sorting.
///
/// Defaults return `None`, meaning "this kind has no such dimension".
pub trait Queryable {
    /// Fields the free-text query is matched against
    fn text_fields(&self) -> Vec<&str>;

    fn price(&self) -> Option<f64> {
        None
    }

    fn review_count(&self) -> Option<u32> {
        None
    }

    fn platform(&self) -> Option<Platform> {
        None
    }

    fn category(&self) -> Option<&str> {
        None
    }

    fn competition_level(&self) -> Option<CompetitionLevel> {
        None
    }

    /// Primary score compared against `min_score`
    fn score(&self) -> Option<u32> {
        None
    }

    fn sort_value(&self, key: SortKey) -> Option<f64>;
}

impl Queryable for Product {
    fn text_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.seller.as_str(), self.category.as_str()]
    }

    fn price(&self) -> Option<f64> {
        Some(self.price)
    }

    fn review_count(&self) -> Option<u32> {
        Some(self.review_count)
    }

    fn platform(&self) -> Option<Platform> {
        Some(self.platform)
    }

    fn category(&self) -> Option<&str> {
        Some(&self.category)
    }

    fn score(&self) -> Option<u32> {
        Some(self.winning_score)
    }

    fn sort_value(&self, key: SortKey) -> Option<f64> {
        match key {
            SortKey::Score => Some(self.winning_score as f64),
            SortKey::Reviews => Some(self.review_count as f64),
            SortKey::Sales => Some(self.estimated_sales as f64),
            SortKey::PriceLow | SortKey::PriceHigh => Some(self.price),
            SortKey::Newest => Some(self.listing_age as f64),
            SortKey::Rating => Some(self.rating),
            SortKey::Volume | SortKey::Growth | SortKey::Revenue => None,
        }
    }
}

impl Queryable for Keyword {
    fn text_fields(&self) -> Vec<&str> {
        vec![self.keyword.as_str()]
    }

    fn competition_level(&self) -> Option<CompetitionLevel> {
        Some(CompetitionLevel::from_score(self.competition))
    }

    fn sort_value(&self, key: SortKey) -> Option<f64> {
        match key {
            SortKey::Volume => Some(self.search_volume as f64),
            _ => None,
        }
    }
}

impl Queryable for CompetitorShop {
    fn text_fields(&self) -> Vec<&str> {
        vec![self.shop_name.as_str(), self.platform.as_str()]
    }

    fn review_count(&self) -> Option<u32> {
        Some(self.total_reviews)
    }

    fn platform(&self) -> Option<Platform> {
        Some(self.platform)
    }

    fn sort_value(&self, key: SortKey) -> Option<f64> {
        match key {
            SortKey::Reviews => Some(self.total_reviews as f64),
            SortKey::Rating => Some(self.avg_rating),
            SortKey::Revenue => Some(self.estimated_revenue as f64),
            _ => None,
        }
    }
}

impl Queryable for TrendData {
    fn text_fields(&self) -> Vec<&str> {
        vec![self.niche.as_str()]
    }

    fn price(&self) -> Option<f64> {
        Some(self.avg_price)
    }

    fn competition_level(&self) -> Option<CompetitionLevel> {
        Some(CompetitionLevel::from_score(self.competition_level))
    }

    fn sort_value(&self, key: SortKey) -> Option<f64> {
        match key {
            SortKey::PriceLow | SortKey::PriceHigh => Some(self.avg_price),
            SortKey::Volume => Some(self.search_demand as f64),
            SortKey::Growth => Some(self.growth_rate),
            _ => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// PREDICATES
// ─────────────────────────────────────────────────────────────────────────────

/// Case-insensitive substring match on any text field. Empty query matches.
pub fn matches_text<T: Queryable>(record: &T, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    record
        .text_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Conjunction of every range, set and floor constraint in `filters`
pub fn matches_filters<T: Queryable>(record: &T, filters: &FilterOptions) -> bool {
    if let Some(price) = record.price() {
        if !filters.price_range.contains(price) {
            return false;
        }
    }
    if let Some(reviews) = record.review_count() {
        if !filters.review_range.contains(reviews as f64) {
            return false;
        }
    }
    if let Some(platform) = record.platform() {
        if !filters.platform.is_empty() && !filters.platform.contains(&platform) {
            return false;
        }
    }
    if let Some(category) = record.category() {
        if !filters.category.is_empty() && !filters.category.iter().any(|c| c == category) {
            return false;
        }
    }
    if let Some(level) = record.competition_level() {
        if !filters.competition_level.is_empty() && !filters.competition_level.contains(&level) {
            return false;
        }
    }
    if let Some(score) = record.score() {
        if score < filters.min_score {
            return false;
        }
    }
    true
}

// ─────────────────────────────────────────────────────────────────────────────
// PIPELINE
// ─────────────────────────────────────────────────────────────────────────────

/// Filter a collection, returning matching records in input order
pub fn filter_records<T: Queryable + Clone>(
    records: &[T],
    text: &str,
    filters: Option<&FilterOptions>,
) -> Vec<T> {
    records
        .iter()
        .filter(|r| matches_text(*r, text))
        .filter(|r| filters.map_or(true, |f| matches_filters(*r, f)))
        .cloned()
        .collect()
}

/// Stable in-place sort. Records without a value for `key` keep their
/// relative order after those that have one.
pub fn sort_in_place<T: Queryable>(records: &mut [T], key: SortKey) {
    records.sort_by(|a, b| compare_by(a, b, key));
}

fn compare_by<T: Queryable>(a: &T, b: &T, key: SortKey) -> Ordering {
    match (a.sort_value(key), b.sort_value(key)) {
        (Some(x), Some(y)) if key.is_ascending() => x.total_cmp(&y),
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Sort by a named key. Unknown names return the input order unchanged.
pub fn sort_records<T: Queryable + Clone>(records: &[T], key: &str) -> Vec<T> {
    let mut sorted = records.to_vec();
    if let Ok(key) = key.parse::<SortKey>() {
        sort_in_place(&mut sorted, key);
    }
    sorted
}

/// A complete view query: text, optional filter panel state and ordering
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub text: String,
    pub filters: Option<FilterOptions>,
    pub sort: Option<SortKey>,
}

impl Query {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_filters(mut self, filters: FilterOptions) -> Self {
        self.filters = Some(filters);
        self
    }

    pub fn sorted_by(mut self, key: SortKey) -> Self {
        self.sort = Some(key);
        self
    }

    /// Same as `sorted_by`, but silently keeps input order for unknown names
    pub fn sorted_by_name(mut self, key: &str) -> Self {
        self.sort = key.parse().ok();
        self
    }

    pub fn apply<T: Queryable + Clone>(&self, records: &[T]) -> Vec<T> {
        let mut result = filter_records(records, &self.text, self.filters.as_ref());
        if let Some(key) = self.sort {
            sort_in_place(&mut result, key);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::MockDataGenerator;
    use crate::interface::{NumericRange, ProductTrend, TrendDirection};

    fn product(id: &str, score: u32, price: f64) -> Product {
        Product {
            id: id.to_string(),
            title: "Custom Pet Portrait Mug".to_string(),
            price,
            platform: Platform::Etsy,
            image_url: String::new(),
            seller: "CreativeStudio".to_string(),
            rating: 4.5,
            review_count: 100,
            estimated_sales: 500,
            listing_age: 30,
            category: "Mugs".to_string(),
            winning_score: score,
            trend: ProductTrend::Stable,
            last_updated: "2024-01-01T00:00:00.000Z".to_string(),
        }
    }

    fn product_ids(items: &[Product]) -> Vec<&str> {
        items.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_sort_by_score_descending() {
        let items = vec![product("a", 10, 1.0), product("b", 90, 1.0), product("c", 50, 1.0)];
        let sorted = sort_records(&items, "score");
        let scores: Vec<u32> = sorted.iter().map(|p| p.winning_score).collect();
        assert_eq!(scores, vec![90, 50, 10]);
    }

    #[test]
    fn test_sort_by_price_low_ascending() {
        let items = vec![product("a", 50, 30.0), product("b", 50, 10.0), product("c", 50, 20.0)];
        let sorted = sort_records(&items, "price-low");
        let prices: Vec<f64> = sorted.iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![10.0, 20.0, 30.0]);

        let sorted = sort_records(&items, "price-high");
        let prices: Vec<f64> = sorted.iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![30.0, 20.0, 10.0]);
    }

    #[test]
    fn test_sort_is_stable_for_ties() {
        let items = vec![
            product("first", 70, 1.0),
            product("x", 90, 1.0),
            product("second", 70, 1.0),
            product("third", 70, 1.0),
        ];
        let sorted = sort_records(&items, "score");
        assert_eq!(product_ids(&sorted), vec!["x", "first", "second", "third"]);
    }

    #[test]
    fn test_unknown_sort_key_keeps_order() {
        let items = vec![product("a", 10, 3.0), product("b", 90, 1.0), product("c", 50, 2.0)];
        let sorted = sort_records(&items, "alphabetical");
        assert_eq!(sorted, items);
    }

    #[test]
    fn test_sort_key_unsupported_by_kind_keeps_order() {
        let items = vec![product("a", 10, 3.0), product("b", 90, 1.0)];
        assert_eq!(sort_records(&items, "growth"), items);
    }

    #[test]
    fn test_newest_sorts_by_listing_age() {
        let mut young = product("young", 10, 1.0);
        young.listing_age = 2;
        let mut old = product("old", 10, 1.0);
        old.listing_age = 200;
        let sorted = sort_records(&[old, young], "newest");
        assert_eq!(sorted[0].id, "young");
    }

    #[test]
    fn test_price_alias_is_highest_first() {
        assert_eq!("price".parse::<SortKey>().unwrap(), SortKey::PriceHigh);
        assert!("nope".parse::<SortKey>().is_err());
    }

    #[test]
    fn test_text_match_is_case_insensitive_across_fields() {
        let p = product("a", 50, 10.0);
        assert!(matches_text(&p, "PORTRAIT"));
        assert!(matches_text(&p, "creative"));
        assert!(matches_text(&p, "mugs"));
        assert!(matches_text(&p, ""));
        assert!(!matches_text(&p, "poster"));
    }

    #[test]
    fn test_empty_platform_selection_is_no_constraint() {
        let products = MockDataGenerator::seeded(9).products(60);
        let unfiltered = filter_records(&products, "", None);
        let empty_selection = filter_records(&products, "", Some(&FilterOptions::default()));
        assert_eq!(unfiltered, empty_selection);
        assert_eq!(unfiltered.len(), 60);
    }

    #[test]
    fn test_platform_and_category_selection() {
        let products = MockDataGenerator::seeded(21).products(120);
        let filters = FilterOptions {
            platform: vec![Platform::Etsy, Platform::Amazon],
            category: vec!["Mugs".to_string()],
            ..FilterOptions::default()
        };
        let result = filter_records(&products, "", Some(&filters));
        assert!(result.iter().all(|p| {
            (p.platform == Platform::Etsy || p.platform == Platform::Amazon) && p.category == "Mugs"
        }));
        let expected = products
            .iter()
            .filter(|p| matches!(p.platform, Platform::Etsy | Platform::Amazon) && p.category == "Mugs")
            .count();
        assert_eq!(result.len(), expected);
    }

    #[test]
    fn test_ranges_and_min_score() {
        let items = vec![
            product("cheap", 80, 12.0),
            product("mid", 40, 30.0),
            product("pricey", 95, 70.0),
        ];
        let filters = FilterOptions {
            price_range: NumericRange::new(12.0, 30.0),
            min_score: 50,
            ..FilterOptions::default()
        };
        let result = filter_records(&items, "", Some(&filters));
        assert_eq!(product_ids(&result), vec!["cheap"]);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let products = MockDataGenerator::seeded(4).products(100);
        let query = Query::new("print")
            .with_filters(FilterOptions {
                min_score: 40,
                platform: vec![Platform::Redbubble, Platform::Etsy],
                ..FilterOptions::default()
            })
            .sorted_by(SortKey::Sales);
        let once = query.apply(&products);
        let twice = query.apply(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_competition_level_applies_to_trends_not_products() {
        let mut gen = MockDataGenerator::seeded(8);
        let trends = gen.trends(30);
        let products = gen.products(30);
        let filters = FilterOptions {
            competition_level: vec![CompetitionLevel::Low],
            ..FilterOptions::default()
        };

        let low = filter_records(&trends, "", Some(&filters));
        assert!(low.iter().all(|t| t.competition_level < 40));

        // Products have no competition dimension
        assert_eq!(filter_records(&products, "", Some(&filters)).len(), 30);
    }

    #[test]
    fn test_competitor_text_matches_platform() {
        let shops = MockDataGenerator::seeded(2).competitors(20);
        let result = filter_records(&shops, "etsy", None);
        assert!(result.iter().all(|s| s.platform == Platform::Etsy
            || s.shop_name.to_lowercase().contains("etsy")));
        let expected = shops.iter().filter(|s| s.platform == Platform::Etsy).count();
        assert_eq!(result.len(), expected);
    }

    #[test]
    fn test_trends_sort_by_growth() {
        let trends = MockDataGenerator::seeded(6).trends(12);
        let sorted = sort_records(&trends, "growth");
        assert!(sorted.windows(2).all(|w| w[0].growth_rate >= w[1].growth_rate));
        assert!(sorted
            .iter()
            .all(|t| t.trend_direction == TrendDirection::from_growth_rate(t.growth_rate)));
    }

    #[test]
    fn test_review_range_applies_to_competitor_total_reviews() {
        let shops = MockDataGenerator::seeded(9).competitors(50);
        let filters = FilterOptions {
            review_range: NumericRange::new(2000.0, 20000.0),
            ..FilterOptions::default()
        };
        let result = filter_records(&shops, "", Some(&filters));
        let expected: Vec<&str> = shops
            .iter()
            .filter(|s| (2000..=20000).contains(&s.total_reviews))
            .map(|s| s.id.as_str())
            .collect();
        let ids: Vec<&str> = result.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_price_range_applies_to_trend_avg_price() {
        let trends = MockDataGenerator::seeded(10).trends(30);
        let filters = FilterOptions {
            price_range: NumericRange::new(20.0, 35.0),
            ..FilterOptions::default()
        };
        let result = filter_records(&trends, "", Some(&filters));
        assert!(result.iter().all(|t| (20.0..=35.0).contains(&t.avg_price)));
        let expected = trends
            .iter()
            .filter(|t| (20.0..=35.0).contains(&t.avg_price))
            .count();
        assert_eq!(result.len(), expected);
    }

    #[test]
    fn test_product_rating_reviews_and_sales_sorts() {
        let mut items = vec![product("a", 50, 10.0), product("b", 50, 10.0), product("c", 50, 10.0)];
        items[0].rating = 4.1;
        items[1].rating = 4.9;
        items[2].rating = 3.7;
        items[0].review_count = 20;
        items[1].review_count = 5;
        items[2].review_count = 900;
        items[0].estimated_sales = 300;
        items[1].estimated_sales = 4000;
        items[2].estimated_sales = 1200;

        assert_eq!(product_ids(&sort_records(&items, "rating")), vec!["b", "a", "c"]);
        assert_eq!(product_ids(&sort_records(&items, "reviews")), vec!["c", "a", "b"]);
        assert_eq!(product_ids(&sort_records(&items, "sales")), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_competitor_rating_and_reviews_sorts() {
        let shops = MockDataGenerator::seeded(12).competitors(25);
        let by_rating = sort_records(&shops, "rating");
        assert!(by_rating.windows(2).all(|w| w[0].avg_rating >= w[1].avg_rating));
        let by_reviews = sort_records(&shops, "reviews");
        assert!(by_reviews.windows(2).all(|w| w[0].total_reviews >= w[1].total_reviews));
        assert_eq!(by_reviews.len(), shops.len());
    }

    #[test]
    fn test_empty_collection() {
        let empty: Vec<Product> = Vec::new();
        assert!(Query::new("x").sorted_by(SortKey::Score).apply(&empty).is_empty());
        assert!(sort_records(&empty, "score").is_empty());
    }

    #[test]
    fn test_input_not_mutated() {
        let items = vec![product("a", 10, 1.0), product("b", 90, 1.0)];
        let before = items.clone();
        let _ = Query::new("").sorted_by(SortKey::Score).apply(&items);
        assert_eq!(items, before);
    }
}

//! Synthetic research data
//!
//! Every record is sampled from bounded uniform distributions and fixed
//! vocabularies. The generator owns its random source so callers can pin a seed
//! (and a reference instant) to get byte-identical output.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::interface::{CompetitorShop, Keyword, Platform, Product, ProductTrend, TrendData, TrendDirection};
use crate::vocabulary::{
    CATEGORIES, KEYWORDS, NICHES, PRODUCTS_PER_TREND, PRODUCT_TITLES, RELATED_KEYWORD_COUNT,
    SHOP_NAMES,
};

const PRODUCT_TRENDS: [ProductTrend; 3] = [ProductTrend::Up, ProductTrend::Down, ProductTrend::Stable];

/// Lowest and highest winning score a listing can be assigned
pub const MIN_WINNING_SCORE: u32 = 10;
pub const MAX_WINNING_SCORE: u32 = 100;

/// Stateful generator with a seedable random source
pub struct MockDataGenerator {
    rng: StdRng,
    now: DateTime<Utc>,
}

impl MockDataGenerator {
    /// Entropy-seeded generator anchored at the current time
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            now: Utc::now(),
        }
    }

    /// Reproducible generator. Pair with `at` for fully deterministic timestamps.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            now: Utc::now(),
        }
    }

    /// Anchor `lastUpdated` timestamps to a fixed instant
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    pub fn products(&mut self, count: usize) -> Vec<Product> {
        generate_products(&mut self.rng, self.now, count)
    }

    pub fn keywords(&mut self, count: usize) -> Vec<Keyword> {
        generate_keywords(&mut self.rng, count)
    }

    pub fn competitors(&mut self, count: usize) -> Vec<CompetitorShop> {
        generate_competitors(&mut self.rng, count)
    }

    pub fn trends(&mut self, count: usize) -> Vec<TrendData> {
        generate_trends(&mut self.rng, self.now, count)
    }
}

impl Default for MockDataGenerator {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// SAMPLING HELPERS
// ─────────────────────────────────────────────────────────────────────────────

fn random_int<R: Rng + ?Sized>(rng: &mut R, min: u32, max: u32) -> u32 {
    rng.gen_range(min..=max)
}

fn random_float<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    rng.gen_range(min..max)
}

fn random_choice<'a, T, R: Rng + ?Sized>(rng: &mut R, pool: &'a [T]) -> &'a T {
    &pool[rng.gen_range(0..pool.len())]
}

/// Round half away from zero to `decimals` places
fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

// ─────────────────────────────────────────────────────────────────────────────
// DERIVED METRICS
// ─────────────────────────────────────────────────────────────────────────────

/// Weighted composite of review velocity, rating, sales proxy and a
/// competition factor. Rounded first, then clamped to [10, 100].
pub fn winning_score(
    review_count: u32,
    listing_age: u32,
    rating: f64,
    estimated_sales: u32,
    competition_factor: u32,
) -> u32 {
    let review_growth = review_count as f64 / listing_age.max(1) as f64;
    let rating_score = rating / 5.0 * 100.0;
    let sales_score = (estimated_sales as f64 / 100.0).min(100.0);

    let raw = (review_growth * 0.2
        + rating_score * 0.3
        + sales_score * 0.3
        + competition_factor as f64 * 0.2)
        .round();

    raw.clamp(MIN_WINNING_SCORE as f64, MAX_WINNING_SCORE as f64) as u32
}

// ─────────────────────────────────────────────────────────────────────────────
// GENERATORS
// ─────────────────────────────────────────────────────────────────────────────

pub fn generate_products<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>, count: usize) -> Vec<Product> {
    (0..count).map(|i| generate_product(rng, now, i + 1)).collect()
}

fn generate_product<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>, n: usize) -> Product {
    let review_count = random_int(rng, 10, 5000);
    let rating = random_float(rng, 3.5, 5.0);
    let price = random_float(rng, 15.0, 75.0);
    let estimated_sales = random_int(rng, 50, 10_000);
    let listing_age = random_int(rng, 1, 365);
    let competition_factor = random_int(rng, 20, 80);

    let score = winning_score(review_count, listing_age, rating, estimated_sales, competition_factor);

    let title = *random_choice(rng, PRODUCT_TITLES);
    let platform = *random_choice(rng, &Platform::ALL);
    let seller = *random_choice(rng, SHOP_NAMES);
    let category = *random_choice(rng, CATEGORIES);
    let trend = *random_choice(rng, &PRODUCT_TRENDS);
    let days_ago = random_int(rng, 0, 7);
    let last_updated = (now - Duration::days(days_ago as i64)).to_rfc3339_opts(SecondsFormat::Millis, true);

    Product {
        id: format!("prod-{}", n),
        title: title.to_string(),
        price: round_to(price, 2),
        platform,
        image_url: format!("https://placehold.co/400x400?text=POD+Product+{}", n),
        seller: seller.to_string(),
        rating: round_to(rating, 1),
        review_count,
        estimated_sales,
        listing_age,
        category: category.to_string(),
        winning_score: score,
        trend,
        last_updated,
    }
}

pub fn generate_keywords<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<Keyword> {
    (0..count)
        .map(|i| {
            let text = KEYWORDS[i % KEYWORDS.len()];
            let search_volume = random_int(rng, 500, 50_000);
            let difficulty = random_int(rng, 20, 90);
            let competition = random_int(rng, 30, 95);

            // Independent monthly samples capped by the headline volume
            let trend = (0..12).map(|_| random_int(rng, 500, search_volume)).collect();

            let related_keywords = (1..=RELATED_KEYWORD_COUNT)
                .map(|j| format!("{} {}", text, j))
                .collect();

            Keyword {
                id: format!("kw-{}", i + 1),
                keyword: text.to_string(),
                search_volume,
                difficulty,
                competition,
                trend,
                related_keywords,
                cpc: Some(random_float(rng, 0.5, 3.0)),
            }
        })
        .collect()
}

pub fn generate_competitors<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<CompetitorShop> {
    (0..count)
        .map(|i| CompetitorShop {
            id: format!("comp-{}", i + 1),
            shop_name: SHOP_NAMES[i % SHOP_NAMES.len()].to_string(),
            platform: *random_choice(rng, &Platform::ALL),
            products_count: random_int(rng, 10, 500),
            avg_rating: round_to(random_float(rng, 3.5, 5.0), 1),
            total_reviews: random_int(rng, 100, 10_000),
            estimated_revenue: random_int(rng, 1000, 100_000),
            is_monitored: false,
        })
        .collect()
}

pub fn generate_trends<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>, count: usize) -> Vec<TrendData> {
    (0..count)
        .map(|i| {
            let growth_rate = round_to(random_float(rng, -20.0, 150.0), 1);

            TrendData {
                id: format!("trend-{}", i + 1),
                niche: NICHES[i % NICHES.len()].to_string(),
                growth_rate,
                search_demand: random_int(rng, 1000, 50_000),
                competition_level: random_int(rng, 30, 90),
                seasonality_score: random_int(rng, 0, 100),
                avg_price: round_to(random_float(rng, 15.0, 65.0), 2),
                trend_direction: TrendDirection::from_growth_rate(growth_rate),
                products: generate_products(rng, now, PRODUCTS_PER_TREND),
            }
        })
        .collect()
}

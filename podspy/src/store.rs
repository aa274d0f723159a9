//! ResearchStore - typed collections over the key-value database
//!
//! Each collection lives as one JSON array under a fixed key. Reads never fail:
//! a missing key, unreadable row or malformed blob yields an empty collection
//! and a warning. Writes replace the whole array.
//!
//! Concurrency Model:
//! - Database uses r2d2 connection pool (concurrent reads, no mutex blocking)
//! - Read-modify-write operations (add, delete, toggle) hold `write_lock` so two
//!   host calls cannot interleave between the read and the write
//! - Plain saves are last-write-wins
//! - Seeding writes every generated collection in one transaction

use crate::database::Database;
use crate::export::{self, ExportFormat, ExportKind};
use crate::generator::MockDataGenerator;
use crate::insights::{
    self, CompetitorSummary, DashboardStats, KeywordInsights, TrendInsights, TrendSummary,
};
use crate::interface::{
    CompetitorShop, FilterOptions, Keyword, PodSpyError, Product, SavedSearch, TrendData,
};
use crate::query::{Query, Queryable};
use chrono::{SecondsFormat, Utc};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;

/// Fixed storage keys, one per collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKey {
    Products,
    Keywords,
    Competitors,
    Trends,
    SavedSearches,
    Favorites,
}

impl StorageKey {
    pub const ALL: [StorageKey; 6] = [
        StorageKey::Products,
        StorageKey::Keywords,
        StorageKey::Competitors,
        StorageKey::Trends,
        StorageKey::SavedSearches,
        StorageKey::Favorites,
    ];

    /// Collections filled by the mock data generator
    pub const GENERATED: [StorageKey; 4] = [
        StorageKey::Products,
        StorageKey::Keywords,
        StorageKey::Competitors,
        StorageKey::Trends,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::Products => "pod_spy_products",
            StorageKey::Keywords => "pod_spy_keywords",
            StorageKey::Competitors => "pod_spy_competitors",
            StorageKey::Trends => "pod_spy_trends",
            StorageKey::SavedSearches => "pod_spy_saved_searches",
            StorageKey::Favorites => "pod_spy_favorites",
        }
    }
}

/// How many records of each kind a fresh store is seeded with
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Record)]
pub struct SeedCounts {
    pub products: u32,
    pub keywords: u32,
    pub competitors: u32,
    pub trends: u32,
}

impl Default for SeedCounts {
    fn default() -> Self {
        Self {
            products: 100,
            keywords: 30,
            competitors: 20,
            trends: 10,
        }
    }
}

/// Persistent research workspace
#[derive(uniffi::Object)]
pub struct ResearchStore {
    db: Database,
    write_lock: Mutex<()>,
}

// Internal implementation (not exported via FFI)
impl ResearchStore {
    /// Create a store with an in-memory database
    pub fn open_in_memory() -> Result<Self, PodSpyError> {
        let db = Database::open_in_memory()?;
        Ok(Self::with_database(db))
    }

    fn with_database(db: Database) -> Self {
        Self {
            db,
            write_lock: Mutex::new(()),
        }
    }

    fn read_collection<T: DeserializeOwned>(&self, key: StorageKey) -> Vec<T> {
        let raw = match self.db.get(key.as_str()) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(key = key.as_str(), error = %e, "failed to read collection");
                return Vec::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(key = key.as_str(), error = %e, "discarding malformed collection");
            Vec::new()
        })
    }

    fn write_collection<T: Serialize>(&self, key: StorageKey, items: &[T]) -> Result<(), PodSpyError> {
        let json = serde_json::to_string(items)?;
        self.db.put(key.as_str(), &json)?;
        tracing::debug!(key = key.as_str(), count = items.len(), "saved collection");
        Ok(())
    }

    /// Read, change and write back one collection while holding the write lock
    fn update_collection<T, F>(&self, key: StorageKey, change: F) -> Result<(), PodSpyError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut Vec<T>) -> bool,
    {
        let _guard = self.write_lock.lock();
        let mut items = self.read_collection(key);
        if change(&mut items) {
            self.write_collection(key, &items)?;
        }
        Ok(())
    }

    /// Seed every collection from `generator` unless products were already stored.
    /// A store with products but missing one of the other generated collections
    /// gets just the missing ones. Returns whether anything was written.
    pub fn initialize_if_empty(
        &self,
        generator: &mut MockDataGenerator,
        counts: SeedCounts,
    ) -> Result<bool, PodSpyError> {
        let _guard = self.write_lock.lock();
        let stored = self.db.keys()?;
        let is_stored = |key: &StorageKey| stored.iter().any(|k| k == key.as_str());

        if !is_stored(&StorageKey::Products) {
            self.seed_locked(generator, counts, &StorageKey::GENERATED)?;
            return Ok(true);
        }

        let missing: Vec<StorageKey> = StorageKey::GENERATED
            .into_iter()
            .filter(|key| !is_stored(key))
            .collect();
        if missing.is_empty() {
            return Ok(false);
        }
        tracing::warn!(missing = ?missing, "filling in partially seeded store");
        self.seed_locked(generator, counts, &missing)?;
        Ok(true)
    }

    /// Overwrite the generated collections regardless of what is stored.
    /// Saved searches and favorites are left alone.
    pub fn reseed(&self, generator: &mut MockDataGenerator, counts: SeedCounts) -> Result<(), PodSpyError> {
        let _guard = self.write_lock.lock();
        self.seed_locked(generator, counts, &StorageKey::GENERATED)
    }

    /// Generate the requested collections and write them in one transaction,
    /// products last.
    fn seed_locked(
        &self,
        generator: &mut MockDataGenerator,
        counts: SeedCounts,
        keys: &[StorageKey],
    ) -> Result<(), PodSpyError> {
        let wanted = |key: StorageKey| keys.contains(&key);

        let products = if wanted(StorageKey::Products) {
            Some(serde_json::to_string(&generator.products(counts.products as usize))?)
        } else {
            None
        };
        let mut entries: Vec<(&str, String)> = Vec::with_capacity(keys.len());
        if wanted(StorageKey::Keywords) {
            let json = serde_json::to_string(&generator.keywords(counts.keywords as usize))?;
            entries.push((StorageKey::Keywords.as_str(), json));
        }
        if wanted(StorageKey::Competitors) {
            let json = serde_json::to_string(&generator.competitors(counts.competitors as usize))?;
            entries.push((StorageKey::Competitors.as_str(), json));
        }
        if wanted(StorageKey::Trends) {
            let json = serde_json::to_string(&generator.trends(counts.trends as usize))?;
            entries.push((StorageKey::Trends.as_str(), json));
        }
        if let Some(json) = products {
            entries.push((StorageKey::Products.as_str(), json));
        }

        self.db.put_many(&entries)?;
        tracing::info!(
            collections = ?keys,
            products = counts.products,
            keywords = counts.keywords,
            competitors = counts.competitors,
            trends = counts.trends,
            "seeded research store"
        );
        Ok(())
    }

    /// Rows for one export kind, in stored order
    pub fn export_rows(&self, kind: ExportKind) -> Vec<export::ExportRow> {
        match kind {
            ExportKind::Products => export::products_for_export(&self.products()),
            ExportKind::Keywords => export::keywords_for_export(&self.keywords()),
            ExportKind::Competitors => export::competitors_for_export(&self.competitors()),
            ExportKind::Trends => export::trends_for_export(&self.trends()),
        }
    }
}

fn run_query<T: Queryable + Clone>(
    records: &[T],
    text: String,
    filters: Option<FilterOptions>,
    sort: Option<String>,
) -> Vec<T> {
    let mut query = Query::new(text);
    if let Some(filters) = filters {
        query = query.with_filters(filters);
    }
    if let Some(sort) = sort.as_deref() {
        query = query.sorted_by_name(sort);
    }
    query.apply(records)
}

#[uniffi::export]
impl ResearchStore {
    /// Open (or create) a store backed by the SQLite file at `db_path`
    #[uniffi::constructor]
    pub fn new(db_path: String) -> Result<Self, PodSpyError> {
        let db = Database::open(PathBuf::from(db_path))?;
        Ok(Self::with_database(db))
    }

    /// Get the database size in bytes
    pub fn database_size(&self) -> i64 {
        self.db.database_size().unwrap_or(0)
    }

    /// When the products collection was last written (RFC 3339), if ever
    pub fn products_updated_at(&self) -> Option<String> {
        match self.db.updated_at(StorageKey::Products.as_str()) {
            Ok(stamp) => stamp.map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true)),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read products timestamp");
                None
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Products
    // ─────────────────────────────────────────────────────────────────────────────

    pub fn products(&self) -> Vec<Product> {
        self.read_collection(StorageKey::Products)
    }

    pub fn save_products(&self, products: Vec<Product>) -> Result<(), PodSpyError> {
        self.write_collection(StorageKey::Products, &products)
    }

    pub fn add_product(&self, product: Product) -> Result<(), PodSpyError> {
        self.update_collection(StorageKey::Products, |products: &mut Vec<Product>| {
            products.push(product);
            true
        })
    }

    pub fn delete_product(&self, id: String) -> Result<(), PodSpyError> {
        self.update_collection(StorageKey::Products, |products: &mut Vec<Product>| {
            let before = products.len();
            products.retain(|p| p.id != id);
            products.len() != before
        })
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Keywords
    // ─────────────────────────────────────────────────────────────────────────────

    pub fn keywords(&self) -> Vec<Keyword> {
        self.read_collection(StorageKey::Keywords)
    }

    pub fn save_keywords(&self, keywords: Vec<Keyword>) -> Result<(), PodSpyError> {
        self.write_collection(StorageKey::Keywords, &keywords)
    }

    pub fn add_keyword(&self, keyword: Keyword) -> Result<(), PodSpyError> {
        self.update_collection(StorageKey::Keywords, |keywords: &mut Vec<Keyword>| {
            keywords.push(keyword);
            true
        })
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Competitors
    // ─────────────────────────────────────────────────────────────────────────────

    pub fn competitors(&self) -> Vec<CompetitorShop> {
        self.read_collection(StorageKey::Competitors)
    }

    pub fn save_competitors(&self, competitors: Vec<CompetitorShop>) -> Result<(), PodSpyError> {
        self.write_collection(StorageKey::Competitors, &competitors)
    }

    /// Flip `isMonitored` on the shop with `id`. Unknown ids are ignored.
    pub fn toggle_monitor(&self, id: String) -> Result<(), PodSpyError> {
        self.update_collection(StorageKey::Competitors, |shops: &mut Vec<CompetitorShop>| {
            match shops.iter_mut().find(|c| c.id == id) {
                Some(shop) => {
                    shop.toggle_monitored();
                    true
                }
                None => false,
            }
        })
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Trends
    // ─────────────────────────────────────────────────────────────────────────────

    pub fn trends(&self) -> Vec<TrendData> {
        self.read_collection(StorageKey::Trends)
    }

    pub fn save_trends(&self, trends: Vec<TrendData>) -> Result<(), PodSpyError> {
        self.write_collection(StorageKey::Trends, &trends)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Saved searches
    // ─────────────────────────────────────────────────────────────────────────────

    pub fn saved_searches(&self) -> Vec<SavedSearch> {
        self.read_collection(StorageKey::SavedSearches)
    }

    pub fn save_saved_searches(&self, searches: Vec<SavedSearch>) -> Result<(), PodSpyError> {
        self.write_collection(StorageKey::SavedSearches, &searches)
    }

    pub fn add_saved_search(&self, search: SavedSearch) -> Result<(), PodSpyError> {
        self.update_collection(StorageKey::SavedSearches, |searches: &mut Vec<SavedSearch>| {
            searches.push(search);
            true
        })
    }

    /// Stamp a new saved search with the current time and append it
    pub fn create_saved_search(
        &self,
        query: String,
        filters: FilterOptions,
    ) -> Result<SavedSearch, PodSpyError> {
        let search = SavedSearch::new(query, filters, Utc::now());
        self.add_saved_search(search.clone())?;
        Ok(search)
    }

    pub fn delete_saved_search(&self, id: String) -> Result<(), PodSpyError> {
        self.update_collection(StorageKey::SavedSearches, |searches: &mut Vec<SavedSearch>| {
            let before = searches.len();
            searches.retain(|s| s.id != id);
            searches.len() != before
        })
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Favorites
    // ─────────────────────────────────────────────────────────────────────────────

    /// Favorited product ids in the order they were added
    pub fn favorites(&self) -> Vec<String> {
        self.read_collection(StorageKey::Favorites)
    }

    /// Add or remove `product_id`. Returns whether it is a favorite afterwards.
    pub fn toggle_favorite(&self, product_id: String) -> Result<bool, PodSpyError> {
        let mut now_favorite = false;
        self.update_collection(StorageKey::Favorites, |ids: &mut Vec<String>| {
            match ids.iter().position(|id| *id == product_id) {
                Some(index) => {
                    ids.remove(index);
                }
                None => {
                    ids.push(product_id.clone());
                    now_favorite = true;
                }
            }
            true
        })?;
        Ok(now_favorite)
    }

    pub fn is_favorite(&self, product_id: String) -> bool {
        self.favorites().contains(&product_id)
    }

    /// Stored products whose id is favorited, in product order
    pub fn favorite_products(&self) -> Vec<Product> {
        let favorites = self.favorites();
        self.products()
            .into_iter()
            .filter(|p| favorites.contains(&p.id))
            .collect()
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Seeding
    // ─────────────────────────────────────────────────────────────────────────────

    /// Seed with default counts on first use. `seed` makes the data reproducible.
    pub fn initialize_mock_data(&self, seed: Option<u64>) -> Result<bool, PodSpyError> {
        let mut generator = match seed {
            Some(seed) => MockDataGenerator::seeded(seed),
            None => MockDataGenerator::new(),
        };
        self.initialize_if_empty(&mut generator, SeedCounts::default())
    }

    /// Remove every stored collection
    pub fn clear(&self) -> Result<(), PodSpyError> {
        let _guard = self.write_lock.lock();
        self.db.clear_all()?;
        tracing::debug!("cleared research store");
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Views
    // ─────────────────────────────────────────────────────────────────────────────

    /// Text search, optional filter panel and optional named sort over products
    pub fn query_products(
        &self,
        text: String,
        filters: Option<FilterOptions>,
        sort: Option<String>,
    ) -> Vec<Product> {
        run_query(&self.products(), text, filters, sort)
    }

    pub fn query_keywords(
        &self,
        text: String,
        filters: Option<FilterOptions>,
        sort: Option<String>,
    ) -> Vec<Keyword> {
        run_query(&self.keywords(), text, filters, sort)
    }

    pub fn query_competitors(
        &self,
        text: String,
        filters: Option<FilterOptions>,
        sort: Option<String>,
    ) -> Vec<CompetitorShop> {
        run_query(&self.competitors(), text, filters, sort)
    }

    pub fn query_trends(
        &self,
        text: String,
        filters: Option<FilterOptions>,
        sort: Option<String>,
    ) -> Vec<TrendData> {
        run_query(&self.trends(), text, filters, sort)
    }

    /// Difficulty, competition level and monthly series for one keyword
    pub fn keyword_insights(&self, id: String) -> Option<KeywordInsights> {
        self.keywords()
            .iter()
            .find(|k| k.id == id)
            .map(insights::keyword_insights)
    }

    /// Signals and recommendation for one niche
    pub fn trend_insights(&self, id: String) -> Option<TrendInsights> {
        self.trends()
            .iter()
            .find(|t| t.id == id)
            .map(insights::trend_insights)
    }

    pub fn dashboard_stats(&self) -> DashboardStats {
        insights::dashboard_stats(&self.products(), &self.trends())
    }

    pub fn trend_summary(&self) -> TrendSummary {
        insights::trend_summary(&self.trends())
    }

    pub fn competitor_summary(&self) -> CompetitorSummary {
        insights::competitor_summary(&self.competitors())
    }

    /// Render one collection as a CSV or JSON payload
    pub fn export(&self, kind: ExportKind, format: ExportFormat) -> Result<String, PodSpyError> {
        format.render(&self.export_rows(kind))
    }
}

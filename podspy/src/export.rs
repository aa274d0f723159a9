//! Flat projections of collections and their CSV / JSON renderings.
//!
//! A projection is an ordered list of `(header, value)` cells per record, the
//! column names being what a spreadsheet user sees.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::interface::{CompetitorShop, Keyword, PodSpyError, Product, ProductTrend, TrendData};

/// A single exported value
#[derive(Debug, Clone, PartialEq)]
pub enum ExportValue {
    Text(String),
    Integer(i64),
    Number(f64),
    Bool(bool),
    /// Optional field with no value: empty in CSV, omitted in JSON
    Missing,
}

impl ExportValue {
    fn render(&self) -> String {
        match self {
            ExportValue::Text(s) => s.clone(),
            ExportValue::Integer(i) => i.to_string(),
            ExportValue::Number(n) => n.to_string(),
            ExportValue::Bool(b) => b.to_string(),
            ExportValue::Missing => String::new(),
        }
    }
}

impl From<&str> for ExportValue {
    fn from(s: &str) -> Self {
        ExportValue::Text(s.to_string())
    }
}

impl From<String> for ExportValue {
    fn from(s: String) -> Self {
        ExportValue::Text(s)
    }
}

impl From<u32> for ExportValue {
    fn from(v: u32) -> Self {
        ExportValue::Integer(v as i64)
    }
}

impl From<f64> for ExportValue {
    fn from(v: f64) -> Self {
        ExportValue::Number(v)
    }
}

impl From<bool> for ExportValue {
    fn from(v: bool) -> Self {
        ExportValue::Bool(v)
    }
}

impl From<Option<f64>> for ExportValue {
    fn from(v: Option<f64>) -> Self {
        v.map_or(ExportValue::Missing, ExportValue::Number)
    }
}

/// One projected record; cells keep projection order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExportRow {
    cells: Vec<(&'static str, ExportValue)>,
}

impl ExportRow {
    fn with(mut self, header: &'static str, value: impl Into<ExportValue>) -> Self {
        self.cells.push((header, value.into()));
        self
    }

    pub fn headers(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.cells.iter().map(|(h, _)| *h)
    }

    pub fn get(&self, header: &str) -> Option<&ExportValue> {
        self.cells.iter().find(|(h, _)| *h == header).map(|(_, v)| v)
    }
}

impl Serialize for ExportRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let present: Vec<_> = self
            .cells
            .iter()
            .filter(|(_, v)| *v != ExportValue::Missing)
            .collect();
        let mut map = serializer.serialize_map(Some(present.len()))?;
        for (header, value) in present {
            match value {
                ExportValue::Text(s) => map.serialize_entry(header, s)?,
                ExportValue::Integer(i) => map.serialize_entry(header, i)?,
                ExportValue::Number(n) => match whole_number(*n) {
                    Some(i) => map.serialize_entry(header, &i)?,
                    None => map.serialize_entry(header, n)?,
                },
                ExportValue::Bool(b) => map.serialize_entry(header, b)?,
                ExportValue::Missing => {}
            }
        }
        map.end()
    }
}

/// Integral floats are written without a fraction, `25.0` as `25`
fn whole_number(n: f64) -> Option<i64> {
    const SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;
    (n.is_finite() && n.fract() == 0.0 && n.abs() <= SAFE_INTEGER).then_some(n as i64)
}

// ─────────────────────────────────────────────────────────────────────────────
// PROJECTIONS
// ─────────────────────────────────────────────────────────────────────────────

pub fn products_for_export(products: &[Product]) -> Vec<ExportRow> {
    products
        .iter()
        .map(|p| {
            ExportRow::default()
                .with("ID", p.id.as_str())
                .with("Title", p.title.as_str())
                .with("Price", p.price)
                .with("Platform", p.platform.as_str())
                .with("Seller", p.seller.as_str())
                .with("Rating", p.rating)
                .with("Reviews", p.review_count)
                .with("Estimated Sales", p.estimated_sales)
                .with("Listing Age (days)", p.listing_age)
                .with("Category", p.category.as_str())
                .with("Winning Score", p.winning_score)
                .with("Trend", trend_label(p))
                .with("Last Updated", p.last_updated.as_str())
        })
        .collect()
}

fn trend_label(p: &Product) -> &'static str {
    match p.trend {
        ProductTrend::Up => "up",
        ProductTrend::Down => "down",
        ProductTrend::Stable => "stable",
    }
}

pub fn keywords_for_export(keywords: &[Keyword]) -> Vec<ExportRow> {
    keywords
        .iter()
        .map(|k| {
            ExportRow::default()
                .with("Keyword", k.keyword.as_str())
                .with("Search Volume", k.search_volume)
                .with("Difficulty", k.difficulty)
                .with("Competition", k.competition)
                .with("CPC", k.cpc)
                .with("Related Keywords", k.related_keywords.join("; "))
        })
        .collect()
}

pub fn competitors_for_export(competitors: &[CompetitorShop]) -> Vec<ExportRow> {
    competitors
        .iter()
        .map(|c| {
            ExportRow::default()
                .with("ID", c.id.as_str())
                .with("Shop Name", c.shop_name.as_str())
                .with("Platform", c.platform.as_str())
                .with("Products", c.products_count)
                .with("Avg Rating", c.avg_rating)
                .with("Total Reviews", c.total_reviews)
                .with("Estimated Revenue", c.estimated_revenue)
                .with("Monitored", c.is_monitored)
        })
        .collect()
}

pub fn trends_for_export(trends: &[TrendData]) -> Vec<ExportRow> {
    trends
        .iter()
        .map(|t| {
            ExportRow::default()
                .with("ID", t.id.as_str())
                .with("Niche", t.niche.as_str())
                .with("Growth Rate (%)", t.growth_rate)
                .with("Search Demand", t.search_demand)
                .with("Competition Level", t.competition_level)
                .with("Seasonality Score", t.seasonality_score)
                .with("Avg Price", t.avg_price)
                .with("Trend Direction", t.trend_direction.as_str())
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// RENDERING
// ─────────────────────────────────────────────────────────────────────────────

/// Which collection to export
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum ExportKind {
    Products,
    Keywords,
    Competitors,
    Trends,
}

impl ExportKind {
    /// Download filename without extension
    pub fn file_stem(&self) -> &'static str {
        match self {
            ExportKind::Products => "pod-products",
            ExportKind::Keywords => "pod-keywords",
            ExportKind::Competitors => "pod-competitors",
            ExportKind::Trends => "pod-trends",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Json => "application/json",
        }
    }

    pub fn render(&self, rows: &[ExportRow]) -> Result<String, PodSpyError> {
        match self {
            ExportFormat::Csv => to_csv(rows),
            ExportFormat::Json => to_json(rows),
        }
    }
}

/// Header row from the first record, every field quoted, `\n` between lines.
/// No rows renders as an empty payload.
pub fn to_csv(rows: &[ExportRow]) -> Result<String, PodSpyError> {
    let Some(first) = rows.first() else {
        return Ok(String::new());
    };
    let headers: Vec<&str> = first.headers().collect();

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(&headers)?;
    for row in rows {
        let record: Vec<String> = headers
            .iter()
            .map(|h| row.get(h).map(ExportValue::render).unwrap_or_default())
            .collect();
        writer.write_record(&record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| PodSpyError::ExportError(e.to_string()))?;
    let mut out = String::from_utf8(bytes).map_err(|e| PodSpyError::ExportError(e.to_string()))?;
    if out.ends_with('\n') {
        out.pop();
    }
    Ok(out)
}

/// Pretty-printed array of objects, keys in projection order
pub fn to_json(rows: &[ExportRow]) -> Result<String, PodSpyError> {
    Ok(serde_json::to_string_pretty(rows)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::MockDataGenerator;

    #[test]
    fn test_product_projection_headers() {
        let products = MockDataGenerator::seeded(1).products(2);
        let rows = products_for_export(&products);
        let headers: Vec<&str> = rows[0].headers().collect();
        assert_eq!(
            headers,
            vec![
                "ID",
                "Title",
                "Price",
                "Platform",
                "Seller",
                "Rating",
                "Reviews",
                "Estimated Sales",
                "Listing Age (days)",
                "Category",
                "Winning Score",
                "Trend",
                "Last Updated",
            ]
        );
        assert_eq!(rows[0].get("ID"), Some(&ExportValue::Text("prod-1".into())));
    }

    #[test]
    fn test_csv_quotes_every_field() {
        let rows = vec![
            ExportRow::default().with("Name", "Say \"hi\"").with("Count", 3u32),
            ExportRow::default().with("Name", "a,b").with("Count", 4u32),
        ];
        let csv = to_csv(&rows).unwrap();
        assert_eq!(csv, "\"Name\",\"Count\"\n\"Say \"\"hi\"\"\",\"3\"\n\"a,b\",\"4\"");
    }

    #[test]
    fn test_csv_empty_rows() {
        assert_eq!(to_csv(&[]).unwrap(), "");
        assert_eq!(to_json(&[]).unwrap(), "[]");
    }

    #[test]
    fn test_keyword_export_joins_related_and_handles_missing_cpc() {
        let mut keywords = MockDataGenerator::seeded(2).keywords(1);
        keywords[0].cpc = None;
        let rows = keywords_for_export(&keywords);
        assert_eq!(
            rows[0].get("Related Keywords"),
            Some(&ExportValue::Text(
                "funny coffee mug 1; funny coffee mug 2; funny coffee mug 3; funny coffee mug 4; funny coffee mug 5".into()
            ))
        );

        let csv = to_csv(&rows).unwrap();
        let line = csv.lines().nth(1).unwrap();
        assert!(line.contains(",\"\",\"funny coffee mug 1;"));

        let json: serde_json::Value = serde_json::from_str(&to_json(&rows).unwrap()).unwrap();
        assert!(json[0].get("CPC").is_none());
        assert_eq!(json[0]["Keyword"], "funny coffee mug");
    }

    #[test]
    fn test_json_preserves_projection_order() {
        let rows = vec![ExportRow::default().with("Zeta", 1u32).with("Alpha", 2.5)];
        let json = to_json(&rows).unwrap();
        assert_eq!(json, "[\n  {\n    \"Zeta\": 1,\n    \"Alpha\": 2.5\n  }\n]");
    }

    #[test]
    fn test_json_writes_whole_numbers_without_fraction() {
        let rows = vec![ExportRow::default()
            .with("Price", 25.0)
            .with("Rating", 4.5)
            .with("Growth", -12.0)];
        let json = to_json(&rows).unwrap();
        assert_eq!(
            json,
            "[\n  {\n    \"Price\": 25,\n    \"Rating\": 4.5,\n    \"Growth\": -12\n  }\n]"
        );
    }

    #[test]
    fn test_number_rendering_matches_display() {
        assert_eq!(ExportValue::Number(25.0).render(), "25");
        assert_eq!(ExportValue::Number(24.99).render(), "24.99");
        assert_eq!(ExportValue::Bool(true).render(), "true");
    }

    #[test]
    fn test_competitor_and_trend_projections() {
        let mut gen = MockDataGenerator::seeded(3);
        let comps = competitors_for_export(&gen.competitors(3));
        assert_eq!(comps.len(), 3);
        assert_eq!(comps[0].get("Monitored"), Some(&ExportValue::Bool(false)));

        let trends = trends_for_export(&gen.trends(2));
        assert!(matches!(trends[1].get("Trend Direction"), Some(ExportValue::Text(_))));
    }
}

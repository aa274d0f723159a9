//! Derived figures shown on the dashboard, keyword, trend and competitor views.

use crate::interface::{
    CompetitionLevel, CompetitorShop, Keyword, Platform, Product, TrendData, TrendDirection,
};
use crate::vocabulary::MONTHS;

/// Winning score at or above which a product counts as high scoring
pub const HIGH_SCORE_THRESHOLD: u32 = 80;

/// Products listed in the dashboard's top list
pub const TOP_PRODUCT_COUNT: usize = 5;

// ─────────────────────────────────────────────────────────────────────────────
// KEYWORDS
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum DifficultyLabel {
    Easy,
    Medium,
    Hard,
}

impl DifficultyLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyLabel::Easy => "Easy",
            DifficultyLabel::Medium => "Medium",
            DifficultyLabel::Hard => "Hard",
        }
    }
}

pub fn difficulty_label(difficulty: u32) -> DifficultyLabel {
    if difficulty < 40 {
        DifficultyLabel::Easy
    } else if difficulty < 70 {
        DifficultyLabel::Medium
    } else {
        DifficultyLabel::Hard
    }
}

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct MonthlyVolume {
    pub month: String,
    pub volume: u32,
}

/// Label a keyword's monthly series, January first. Extra points beyond twelve are dropped.
pub fn monthly_series(trend: &[u32]) -> Vec<MonthlyVolume> {
    MONTHS
        .iter()
        .zip(trend)
        .map(|(month, volume)| MonthlyVolume {
            month: month.to_string(),
            volume: *volume,
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// NICHES
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum NicheSignal {
    RapidGrowth,
    LowCompetition,
    SeasonalOpportunity,
}

impl NicheSignal {
    pub fn title(&self) -> &'static str {
        match self {
            NicheSignal::RapidGrowth => "Rapid Growth",
            NicheSignal::LowCompetition => "Low Competition",
            NicheSignal::SeasonalOpportunity => "Seasonal Opportunity",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            NicheSignal::RapidGrowth => {
                "This niche is experiencing exceptional growth. Early entry could capture significant market share."
            }
            NicheSignal::LowCompetition => {
                "Relatively low competition makes this an attractive opportunity for new sellers."
            }
            NicheSignal::SeasonalOpportunity => {
                "High seasonality score suggests timing is important. Plan inventory and marketing accordingly."
            }
        }
    }
}

/// Signals raised by a niche, in display order
pub fn niche_signals(trend: &TrendData) -> Vec<NicheSignal> {
    let mut signals = Vec::new();
    if trend.growth_rate > 50.0 {
        signals.push(NicheSignal::RapidGrowth);
    }
    if trend.competition_level < 50 {
        signals.push(NicheSignal::LowCompetition);
    }
    if trend.seasonality_score > 70 {
        signals.push(NicheSignal::SeasonalOpportunity);
    }
    signals
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum NicheRecommendation {
    StrongOpportunity,
    HotTrend,
    GoodEntryPoint,
    Monitor,
}

impl NicheRecommendation {
    pub fn message(&self) -> &'static str {
        match self {
            NicheRecommendation::StrongOpportunity => {
                "Strong opportunity! High growth with manageable competition. Consider entering this niche soon."
            }
            NicheRecommendation::HotTrend => {
                "Hot trend! Act quickly to capitalize on this rapidly growing market."
            }
            NicheRecommendation::GoodEntryPoint => {
                "Good entry point with low competition. Focus on unique designs to stand out."
            }
            NicheRecommendation::Monitor => {
                "Monitor this niche closely. Look for specific sub-niches with less competition."
            }
        }
    }
}

/// First matching rule wins
pub fn niche_recommendation(trend: &TrendData) -> NicheRecommendation {
    if trend.growth_rate > 20.0 && trend.competition_level < 60 {
        NicheRecommendation::StrongOpportunity
    } else if trend.growth_rate > 50.0 {
        NicheRecommendation::HotTrend
    } else if trend.competition_level < 40 {
        NicheRecommendation::GoodEntryPoint
    } else {
        NicheRecommendation::Monitor
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// DETAIL VIEWS
// ─────────────────────────────────────────────────────────────────────────────

/// Everything the keyword detail view shows beyond the record itself
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct KeywordInsights {
    pub keyword: Keyword,
    pub difficulty: DifficultyLabel,
    pub competition: CompetitionLevel,
    pub monthly: Vec<MonthlyVolume>,
}

pub fn keyword_insights(keyword: &Keyword) -> KeywordInsights {
    KeywordInsights {
        keyword: keyword.clone(),
        difficulty: difficulty_label(keyword.difficulty),
        competition: CompetitionLevel::from_score(keyword.competition),
        monthly: monthly_series(&keyword.trend),
    }
}

/// A signal with the copy shown on its card
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct NicheSignalCard {
    pub signal: NicheSignal,
    pub title: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct TrendInsights {
    pub trend: TrendData,
    pub signals: Vec<NicheSignalCard>,
    pub recommendation: NicheRecommendation,
    pub recommendation_message: String,
}

pub fn trend_insights(trend: &TrendData) -> TrendInsights {
    let recommendation = niche_recommendation(trend);
    TrendInsights {
        trend: trend.clone(),
        signals: niche_signals(trend)
            .into_iter()
            .map(|signal| NicheSignalCard {
                signal,
                title: signal.title().to_string(),
                message: signal.message().to_string(),
            })
            .collect(),
        recommendation,
        recommendation_message: recommendation.message().to_string(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// SUMMARIES
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct PlatformCount {
    pub platform: Platform,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct ScoreBucket {
    /// e.g. "40-60"
    pub range: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct DashboardStats {
    pub total_products: u32,
    /// Rounded mean winning score, 0 when there are no products
    pub avg_winning_score: u32,
    pub high_score_products: u32,
    pub trending_niches: u32,
    pub platform_counts: Vec<PlatformCount>,
    pub score_distribution: Vec<ScoreBucket>,
    pub top_products: Vec<Product>,
}

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct TrendSummary {
    pub rising_count: u32,
    /// Rounded mean growth rate in percent
    pub avg_growth: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct CompetitorSummary {
    pub total: u32,
    pub monitored: u32,
    pub avg_revenue: u32,
}

/// Upper bounds (exclusive) of the score buckets; the last bucket is open-ended
const SCORE_BUCKETS: [(u32, u32); 5] = [(0, 20), (20, 40), (40, 60), (60, 80), (80, 100)];

/// Mean rounded half up; 0 for an empty input
fn rounded_mean(sum: f64, len: usize) -> f64 {
    if len == 0 {
        return 0.0;
    }
    (sum / len as f64 + 0.5).floor()
}

fn count_where<T>(items: &[T], pred: impl Fn(&T) -> bool) -> u32 {
    items.iter().filter(|item| pred(*item)).count() as u32
}

pub fn dashboard_stats(products: &[Product], trends: &[TrendData]) -> DashboardStats {
    let score_sum: f64 = products.iter().map(|p| p.winning_score as f64).sum();

    let platform_counts = Platform::ALL
        .iter()
        .map(|platform| PlatformCount {
            platform: *platform,
            count: count_where(products, |p| p.platform == *platform),
        })
        .collect();

    let last = SCORE_BUCKETS.len() - 1;
    let score_distribution = SCORE_BUCKETS
        .iter()
        .enumerate()
        .map(|(i, (lo, hi))| ScoreBucket {
            range: format!("{}-{}", lo, hi),
            count: count_where(products, |p| {
                p.winning_score >= *lo && (i == last || p.winning_score < *hi)
            }),
        })
        .collect();

    let mut top_products = products.to_vec();
    top_products.sort_by(|a, b| b.winning_score.cmp(&a.winning_score));
    top_products.truncate(TOP_PRODUCT_COUNT);

    DashboardStats {
        total_products: products.len() as u32,
        avg_winning_score: rounded_mean(score_sum, products.len()) as u32,
        high_score_products: count_where(products, |p| p.winning_score >= HIGH_SCORE_THRESHOLD),
        trending_niches: count_where(trends, |t| t.trend_direction == TrendDirection::Rising),
        platform_counts,
        score_distribution,
        top_products,
    }
}

pub fn trend_summary(trends: &[TrendData]) -> TrendSummary {
    let growth_sum: f64 = trends.iter().map(|t| t.growth_rate).sum();
    TrendSummary {
        rising_count: count_where(trends, |t| t.trend_direction == TrendDirection::Rising),
        avg_growth: rounded_mean(growth_sum, trends.len()) as i64,
    }
}

pub fn competitor_summary(competitors: &[CompetitorShop]) -> CompetitorSummary {
    let revenue_sum: f64 = competitors.iter().map(|c| c.estimated_revenue as f64).sum();
    CompetitorSummary {
        total: competitors.len() as u32,
        monitored: count_where(competitors, |c| c.is_monitored),
        avg_revenue: rounded_mean(revenue_sum, competitors.len()) as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::MockDataGenerator;

    fn trend(growth_rate: f64, competition_level: u32, seasonality_score: u32) -> TrendData {
        TrendData {
            id: "trend-1".to_string(),
            niche: "Boho Style".to_string(),
            growth_rate,
            search_demand: 1000,
            competition_level,
            seasonality_score,
            avg_price: 20.0,
            trend_direction: TrendDirection::from_growth_rate(growth_rate),
            products: Vec::new(),
        }
    }

    #[test]
    fn test_difficulty_labels() {
        assert_eq!(difficulty_label(0), DifficultyLabel::Easy);
        assert_eq!(difficulty_label(39), DifficultyLabel::Easy);
        assert_eq!(difficulty_label(40), DifficultyLabel::Medium);
        assert_eq!(difficulty_label(69), DifficultyLabel::Medium);
        assert_eq!(difficulty_label(70).as_str(), "Hard");
    }

    #[test]
    fn test_monthly_series_labels() {
        let series = monthly_series(&[5, 6, 7]);
        assert_eq!(series.len(), 3);
        assert_eq!(series[0].month, "Jan");
        assert_eq!(series[2], MonthlyVolume { month: "Mar".into(), volume: 7 });

        let full = monthly_series(&[1; 14]);
        assert_eq!(full.len(), 12);
        assert_eq!(full[11].month, "Dec");
    }

    #[test]
    fn test_niche_signals() {
        assert_eq!(
            niche_signals(&trend(60.0, 30, 80)),
            vec![
                NicheSignal::RapidGrowth,
                NicheSignal::LowCompetition,
                NicheSignal::SeasonalOpportunity
            ]
        );
        // Thresholds are strict
        assert!(niche_signals(&trend(50.0, 50, 70)).is_empty());
    }

    #[test]
    fn test_niche_recommendation_order() {
        assert_eq!(niche_recommendation(&trend(25.0, 59, 0)), NicheRecommendation::StrongOpportunity);
        // High growth but crowded
        assert_eq!(niche_recommendation(&trend(80.0, 75, 0)), NicheRecommendation::HotTrend);
        assert_eq!(niche_recommendation(&trend(5.0, 35, 0)), NicheRecommendation::GoodEntryPoint);
        assert_eq!(niche_recommendation(&trend(5.0, 65, 0)), NicheRecommendation::Monitor);
        assert!(NicheRecommendation::Monitor.message().starts_with("Monitor this niche"));
    }

    #[test]
    fn test_keyword_insights() {
        let mut keyword = MockDataGenerator::seeded(6).keywords(1).remove(0);
        keyword.difficulty = 45;
        keyword.competition = 75;
        let insights = keyword_insights(&keyword);

        assert_eq!(insights.difficulty, DifficultyLabel::Medium);
        assert_eq!(insights.competition, CompetitionLevel::High);
        assert_eq!(insights.monthly.len(), 12);
        assert_eq!(insights.monthly[0].volume, keyword.trend[0]);
        assert_eq!(insights.keyword, keyword);
    }

    #[test]
    fn test_trend_insights_carries_copy() {
        let insights = trend_insights(&trend(60.0, 30, 10));
        let titles: Vec<&str> = insights.signals.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Rapid Growth", "Low Competition"]);
        assert_eq!(insights.signals[1].message, NicheSignal::LowCompetition.message());
        assert_eq!(insights.recommendation, NicheRecommendation::StrongOpportunity);
        assert!(insights.recommendation_message.starts_with("Strong opportunity!"));
    }

    #[test]
    fn test_dashboard_stats_empty() {
        let stats = dashboard_stats(&[], &[]);
        assert_eq!(stats.total_products, 0);
        assert_eq!(stats.avg_winning_score, 0);
        assert_eq!(stats.platform_counts.len(), 4);
        assert!(stats.platform_counts.iter().all(|c| c.count == 0));
        assert_eq!(stats.score_distribution.len(), 5);
        assert!(stats.top_products.is_empty());
    }

    #[test]
    fn test_dashboard_stats_buckets_and_top() {
        let mut products = MockDataGenerator::seeded(11).products(6);
        let scores = [10, 20, 79, 80, 100, 80];
        for (p, s) in products.iter_mut().zip(scores) {
            p.winning_score = s;
        }
        let trends = vec![trend(30.0, 50, 0), trend(0.0, 50, 0)];
        let stats = dashboard_stats(&products, &trends);

        assert_eq!(stats.total_products, 6);
        // (10+20+79+80+100+80)/6 = 61.5 → 62
        assert_eq!(stats.avg_winning_score, 62);
        assert_eq!(stats.high_score_products, 3);
        assert_eq!(stats.trending_niches, 1);

        let counts: Vec<u32> = stats.score_distribution.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 1, 0, 1, 3]);
        assert_eq!(stats.score_distribution[4].range, "80-100");

        let top: Vec<u32> = stats.top_products.iter().map(|p| p.winning_score).collect();
        assert_eq!(top, vec![100, 80, 80, 79, 20]);
        // Ties keep input order
        assert_eq!(stats.top_products[1].id, products[3].id);
        assert_eq!(stats.top_products[2].id, products[5].id);

        let total: u32 = stats.platform_counts.iter().map(|c| c.count).sum();
        assert_eq!(total, 6);
    }

    #[test]
    fn test_trend_summary() {
        let summary = trend_summary(&[trend(30.0, 50, 0), trend(-15.0, 50, 0), trend(0.0, 50, 0)]);
        assert_eq!(summary.rising_count, 1);
        assert_eq!(summary.avg_growth, 5);
        assert_eq!(trend_summary(&[]).avg_growth, 0);
    }

    #[test]
    fn test_competitor_summary() {
        let mut shops = MockDataGenerator::seeded(4).competitors(3);
        shops[0].estimated_revenue = 1000;
        shops[1].estimated_revenue = 2000;
        shops[2].estimated_revenue = 2001;
        shops[2].is_monitored = true;

        let summary = competitor_summary(&shops);
        assert_eq!(summary, CompetitorSummary { total: 3, monitored: 1, avg_revenue: 1667 });
        assert_eq!(competitor_summary(&[]).avg_revenue, 0);
    }
}

//! POD Spy seed-data CLI
//!
//! Seeds a research database with synthetic marketplace data and inspects it
//! through the same store, query and export paths the host app uses.
//!
//! Run with: cargo run -p seed-data -- seed --db research.sqlite --seed 42

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use podspy::export::{ExportFormat, ExportKind};
use podspy::{
    FilterOptions, MockDataGenerator, NumericRange, Platform, Product, Query, ResearchStore,
    SeedCounts,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "seed-data")]
#[command(about = "Seed and inspect a POD Spy research database")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the SQLite research database
    #[arg(long, env = "PODSPY_DB", global = true, default_value = "podspy.sqlite")]
    db: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate synthetic data into the database
    Seed {
        /// RNG seed for reproducible data (random when omitted)
        #[arg(long)]
        seed: Option<u64>,

        #[arg(long, default_value_t = SeedCounts::default().products)]
        products: u32,

        #[arg(long, default_value_t = SeedCounts::default().keywords)]
        keywords: u32,

        #[arg(long, default_value_t = SeedCounts::default().competitors)]
        competitors: u32,

        #[arg(long, default_value_t = SeedCounts::default().trends)]
        trends: u32,

        /// Overwrite existing data instead of only seeding an empty store
        #[arg(long)]
        force: bool,
    },

    /// Filter and sort stored products
    Query {
        /// Case-insensitive text matched against title, seller and category
        #[arg(short, long, default_value = "")]
        text: String,

        /// Sort key (score, reviews, sales, price-low, price-high, newest, rating)
        #[arg(short, long)]
        sort: Option<String>,

        /// Restrict to platforms (repeatable)
        #[arg(long)]
        platform: Vec<String>,

        /// Restrict to categories (repeatable)
        #[arg(long)]
        category: Vec<String>,

        #[arg(long, default_value_t = 0)]
        min_score: u32,

        #[arg(long)]
        min_price: Option<f64>,

        #[arg(long)]
        max_price: Option<f64>,

        /// Number of results to print
        #[arg(short, long, default_value_t = 20)]
        limit: usize,

        /// Print results as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Export a collection as CSV or JSON
    Export {
        #[arg(short, long, value_enum)]
        kind: KindArg,

        #[arg(short, long, value_enum, default_value_t = FormatArg::Csv)]
        format: FormatArg,

        /// Output file or directory (stdout when omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Print dashboard statistics
    Stats,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum KindArg {
    Products,
    Keywords,
    Competitors,
    Trends,
}

impl From<KindArg> for ExportKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Products => ExportKind::Products,
            KindArg::Keywords => ExportKind::Keywords,
            KindArg::Competitors => ExportKind::Competitors,
            KindArg::Trends => ExportKind::Trends,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Csv,
    Json,
}

impl From<FormatArg> for ExportFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Json => ExportFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG wins over --verbose
    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let store = open_store(&cli.db)?;

    match cli.command {
        Commands::Seed {
            seed,
            products,
            keywords,
            competitors,
            trends,
            force,
        } => {
            let counts = SeedCounts {
                products,
                keywords,
                competitors,
                trends,
            };
            run_seed(&store, seed, counts, force)?;
        }

        Commands::Query {
            text,
            sort,
            platform,
            category,
            min_score,
            min_price,
            max_price,
            limit,
            json,
        } => {
            let filters = build_filters(&platform, category, min_score, min_price, max_price)?;
            let mut query = Query::new(text).with_filters(filters);
            if let Some(sort) = sort.as_deref() {
                query = query.sorted_by(sort.parse().with_context(|| format!("Invalid --sort {}", sort))?);
            }
            let results = query.apply(&store.products());
            print_products(&results, limit, json)?;
        }

        Commands::Export { kind, format, out } => {
            run_export(&store, kind.into(), format.into(), out.as_deref())?;
        }

        Commands::Stats => run_stats(&store),
    }

    Ok(())
}

fn open_store(path: &Path) -> Result<ResearchStore> {
    ResearchStore::new(path.to_string_lossy().to_string())
        .with_context(|| format!("Failed to open database at {}", path.display()))
}

fn run_seed(store: &ResearchStore, seed: Option<u64>, counts: SeedCounts, force: bool) -> Result<()> {
    let mut generator = match seed {
        Some(seed) => MockDataGenerator::seeded(seed),
        None => MockDataGenerator::new(),
    };

    if force {
        store.reseed(&mut generator, counts).context("Failed to seed database")?;
    } else if !store
        .initialize_if_empty(&mut generator, counts)
        .context("Failed to seed database")?
    {
        tracing::info!("database already holds products, use --force to overwrite");
        return Ok(());
    }

    println!(
        "Seeded {} products, {} keywords, {} competitors, {} trends",
        counts.products, counts.keywords, counts.competitors, counts.trends
    );
    Ok(())
}

fn build_filters(
    platforms: &[String],
    category: Vec<String>,
    min_score: u32,
    min_price: Option<f64>,
    max_price: Option<f64>,
) -> Result<FilterOptions> {
    let platform = platforms
        .iter()
        .map(|p| p.parse::<Platform>().with_context(|| format!("Invalid --platform {}", p)))
        .collect::<Result<Vec<_>>>()?;

    let defaults = FilterOptions::default();
    let price_range = NumericRange::new(
        min_price.unwrap_or(defaults.price_range.min),
        max_price.unwrap_or(defaults.price_range.max),
    );
    if price_range.min > price_range.max {
        bail!("--min-price must not exceed --max-price");
    }

    Ok(FilterOptions {
        price_range,
        platform,
        category,
        min_score,
        ..defaults
    })
}

fn print_products(products: &[Product], limit: usize, json: bool) -> Result<()> {
    let shown = &products[..products.len().min(limit)];
    if json {
        println!("{}", serde_json::to_string_pretty(shown)?);
        return Ok(());
    }

    println!("{:<10} {:>5} {:>8} {:<10} {:<12} TITLE", "ID", "SCORE", "PRICE", "PLATFORM", "CATEGORY");
    for p in shown {
        println!(
            "{:<10} {:>5} {:>8.2} {:<10} {:<12} {}",
            p.id, p.winning_score, p.price, p.platform.as_str(), p.category, p.title
        );
    }
    println!("{} of {} matching products", shown.len(), products.len());
    Ok(())
}

fn run_export(
    store: &ResearchStore,
    kind: ExportKind,
    format: ExportFormat,
    out: Option<&Path>,
) -> Result<()> {
    let payload = store.export(kind, format).context("Failed to render export")?;

    let Some(out) = out else {
        println!("{}", payload);
        return Ok(());
    };

    let path = if out.is_dir() {
        out.join(format!("{}.{}", kind.file_stem(), format.extension()))
    } else {
        out.to_path_buf()
    };
    fs::write(&path, payload).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), mime = format.mime_type(), "export written");
    Ok(())
}

fn run_stats(store: &ResearchStore) {
    let stats = store.dashboard_stats();
    let trends = store.trend_summary();
    let competitors = store.competitor_summary();

    println!("Products:            {}", stats.total_products);
    if let Some(stamp) = store.products_updated_at() {
        println!("Last written:        {}", stamp);
    }
    println!("Avg winning score:   {}", stats.avg_winning_score);
    println!("High-score products: {}", stats.high_score_products);
    println!("Rising niches:       {}", stats.trending_niches);
    println!("Avg niche growth:    {}%", trends.avg_growth);
    println!(
        "Competitors:         {} ({} monitored, avg revenue ${})",
        competitors.total, competitors.monitored, competitors.avg_revenue
    );

    println!("\nBy platform:");
    for entry in &stats.platform_counts {
        println!("  {:<10} {}", entry.platform.as_str(), entry.count);
    }

    println!("\nScore distribution:");
    for bucket in &stats.score_distribution {
        println!("  {:<7} {}", bucket.range, bucket.count);
    }

    println!("\nTop products:");
    for p in &stats.top_products {
        println!("  {:>3}  {} ({})", p.winning_score, p.title, p.platform);
    }

    let keywords = store.keywords();
    if !keywords.is_empty() {
        println!("\nKeywords:");
        for k in keywords.iter().take(5) {
            let Some(insights) = store.keyword_insights(k.id.clone()) else {
                continue;
            };
            println!(
                "  {:<24} volume {:>6}  {:<6} {} competition",
                k.keyword,
                k.search_volume,
                insights.difficulty.as_str(),
                insights.competition.as_str()
            );
        }
    }

    let niches = store.trends();
    if !niches.is_empty() {
        println!("\nNiches:");
        for t in niches.iter().take(5) {
            let Some(insights) = store.trend_insights(t.id.clone()) else {
                continue;
            };
            println!("  {:<24} {:+}%  {}", t.niche, t.growth_rate, insights.recommendation_message);
            for card in &insights.signals {
                println!("    - {}", card.title);
            }
        }
    }
}

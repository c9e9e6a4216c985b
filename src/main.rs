mod error;
mod extract;
mod fetcher;
mod model;
mod normalize;
mod output;
mod settings;
mod sql;
mod validate;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use model::SeedDocument;
use normalize::NormalizeOptions;
use settings::Settings;
use validate::Limits;

#[derive(Parser)]
#[command(name = "kgsushi_seed", about = "Scrape the kgsushi.ru menu into a seed document")]
struct Cli {
    /// Category for products that list none (overrides KGSUSHI_FALLBACK_CATEGORY)
    #[arg(long, global = true)]
    fallback_category: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the storefront and write the seed JSON
    Scrape {
        /// Page to fetch
        #[arg(long)]
        url: Option<String>,
        /// Seed file to write
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Build the seed JSON from a saved HTML page
    Normalize {
        /// Saved page
        #[arg(long)]
        html: PathBuf,
        /// Seed file to write
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Check counts, category references and prices in a seed file
    Validate {
        #[arg(short, long)]
        seed: Option<PathBuf>,
    },
    /// Emit the Postgres upsert script for a seed file
    Sql {
        #[arg(short, long)]
        seed: Option<PathBuf>,
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Scrape, validate, then emit SQL
    Run,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let mut settings = Settings::load().context("Failed to load settings")?;
    if let Some(code) = cli.fallback_category {
        settings.fallback_category = code;
    }
    info!(settings = ?settings, "Loaded settings");

    let result = match cli.command {
        Commands::Scrape { url, out } => {
            if let Some(url) = url {
                settings.source_url = url;
            }
            let out = out.unwrap_or_else(|| settings.seed_path.clone());
            let seed = scrape(&settings).await?;
            output::write_seed(&out, &seed)?;
            print_counts(&out, &seed);
            Ok(())
        }
        Commands::Normalize { html, out } => {
            let out = out.unwrap_or_else(|| settings.seed_path.clone());
            let page = output::read_to_string(&html)?;
            let seed = normalize::build_seed(&page, Utc::now(), &normalize_options(&settings))?;
            output::write_seed(&out, &seed)?;
            print_counts(&out, &seed);
            Ok(())
        }
        Commands::Validate { seed } => {
            let path = seed.unwrap_or_else(|| settings.seed_path.clone());
            validate_file(&path, &settings)
        }
        Commands::Sql { seed, out } => {
            let path = seed.unwrap_or_else(|| settings.seed_path.clone());
            let out = out.unwrap_or_else(|| settings.sql_path.clone());
            let raw = output::read_to_string(&path)?;
            let seed: SeedDocument = serde_json::from_str(&raw)
                .with_context(|| format!("{} is not a seed document", path.display()))?;
            output::write_atomic(&out, &sql::render(&seed)?)?;
            println!("Wrote {}", out.display());
            Ok(())
        }
        Commands::Run => {
            let t_scrape = Instant::now();
            let seed = scrape(&settings).await?;
            output::write_seed(&settings.seed_path, &seed)?;
            print_counts(&settings.seed_path, &seed);
            println!("Scraped in {:.1}s", t_scrape.elapsed().as_secs_f64());

            validate_file(&settings.seed_path, &settings)?;

            output::write_atomic(&settings.sql_path, &sql::render(&seed)?)?;
            println!("Wrote {}", settings.sql_path.display());
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn normalize_options(settings: &Settings) -> NormalizeOptions {
    NormalizeOptions {
        source_url: settings.source_url.clone(),
        fallback_category: settings.fallback_category.clone(),
    }
}

/// Fetch → extract → normalize. Nothing is written if any step fails.
async fn scrape(settings: &Settings) -> anyhow::Result<SeedDocument> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.set_message(format!("Fetching {}", settings.source_url));
    pb.enable_steady_tick(Duration::from_millis(120));

    let fetched = fetcher::fetch_html(
        &settings.source_url,
        &settings.user_agent,
        Duration::from_secs(settings.timeout_secs),
    )
    .await;
    pb.finish_and_clear();

    let html = fetched?;
    let seed = normalize::build_seed(&html, Utc::now(), &normalize_options(settings))?;
    Ok(seed)
}

fn validate_file(path: &std::path::Path, settings: &Settings) -> anyhow::Result<()> {
    let raw = output::read_to_string(path)?;
    let limits = Limits {
        min_categories: settings.min_categories,
        min_products: settings.min_products,
    };
    let seed = validate::validate_json(&raw, limits)
        .with_context(|| format!("{} failed validation", path.display()))?;
    println!(
        "seed ok: {} categories, {} products",
        seed.categories.len(),
        seed.products.len()
    );
    Ok(())
}

fn print_counts(path: &std::path::Path, seed: &SeedDocument) {
    println!(
        "Wrote {} with {} categories and {} products",
        path.display(),
        seed.categories.len(),
        seed.products.len()
    );
}

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

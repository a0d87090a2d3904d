//! Terminal front-end for the recommendation API.
//!
//! Sends one recommendation request, then joins the returned asset ids with
//! the asset catalog (API order preserved) and prints them. The joined rows
//! can also be exported as CSV.

use std::{fs::File, io, path::PathBuf};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use serde::Serialize;

use asset_recommender::models::{Asset, RecommendationRequest, RecommendationResponse};
use asset_recommender::services::AssetCatalog;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum View {
    Card,
    Table,
}

#[derive(Debug, Parser)]
#[command(name = "recs-dashboard", about = "Request and display asset recommendations")]
struct Args {
    /// Base URL of the recommendation API
    #[arg(long, env = "API_BASE", default_value = "http://127.0.0.1:3000")]
    api_url: String,

    /// Email, username or existing user id
    #[arg(long, required_unless_present = "sample_user")]
    user_id: Option<String>,

    /// Demo user with model history, instead of --user-id
    #[arg(long, conflicts_with = "user_id", value_parser = ["u1001", "u2049", "u3302"])]
    sample_user: Option<String>,

    /// Risk profile used for new users (Conservative, Balanced, Aggressive)
    #[arg(long, default_value = "Balanced")]
    risk_profile: String,

    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u16).range(1..=50))]
    top_k: u16,

    /// Local catalog file; when absent the catalog is fetched from the API
    #[arg(long)]
    catalog: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = View::Card)]
    view: View,

    /// Also write the joined rows to this CSV file
    #[arg(long)]
    output: Option<PathBuf>,
}

/// One exported line of the joined recommendation/catalog view
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    rank: usize,
    asset_id: &'a str,
    score: f64,
    name: &'a str,
    category: &'a str,
    currency: &'a str,
    sector: &'a str,
    risk: &'a str,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let user_id = args
        .sample_user
        .as_deref()
        .or(args.user_id.as_deref())
        .unwrap_or_default()
        .trim()
        .to_lowercase();
    anyhow::ensure!(!user_id.is_empty(), "Please enter an email, username or user id");

    let client = reqwest::Client::new();
    let base = args.api_url.trim_end_matches('/');

    let response = fetch_recommendations(&client, base, &user_id, &args).await?;

    if response.recommendations.is_empty() {
        println!("No recommendations returned for {}", response.user_id);
        return Ok(());
    }

    println!(
        "Got {} recommendations for {} (source: {})",
        response.recommendations.len(),
        response.user_id,
        response.source.as_str()
    );

    let catalog = match &args.catalog {
        Some(path) => AssetCatalog::load(path)?,
        None => fetch_catalog(&client, base).await?,
    };

    let rows = join_with_catalog(&response, &catalog);
    if rows.iter().all(|(_, _, asset)| asset.is_none()) && !catalog.is_empty() {
        eprintln!("warning: none of the returned asset ids matched the catalog");
    }

    match args.view {
        View::Card => print_cards(&rows),
        View::Table => print_table(&rows),
    }

    if let Some(path) = &args.output {
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        write_csv(file, &rows)?;
        println!("Wrote {} rows to {}", rows.len(), path.display());
    }

    Ok(())
}

async fn fetch_recommendations(
    client: &reqwest::Client,
    base: &str,
    user_id: &str,
    args: &Args,
) -> anyhow::Result<RecommendationResponse> {
    let payload = RecommendationRequest {
        user_id: Some(user_id.to_string()),
        risk_tolerance: Some(args.risk_profile.clone()),
        top_k: Some(usize::from(args.top_k)),
    };

    let response = client
        .post(format!("{}/recommend", base))
        .json(&payload)
        .send()
        .await
        .context("Failed to call recommendation API")?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        anyhow::bail!("API error {}: {}", status, body);
    }

    response
        .json()
        .await
        .context("Unexpected recommendation response format")
}

async fn fetch_catalog(client: &reqwest::Client, base: &str) -> anyhow::Result<AssetCatalog> {
    let assets: Vec<Asset> = client
        .get(format!("{}/assets", base))
        .send()
        .await
        .context("Failed to fetch asset catalog")?
        .error_for_status()?
        .json()
        .await
        .context("Unexpected asset catalog format")?;
    Ok(AssetCatalog::new(assets))
}

/// (asset id, score, catalog entry) in API order
fn join_with_catalog<'a>(
    response: &'a RecommendationResponse,
    catalog: &'a AssetCatalog,
) -> Vec<(&'a str, f64, Option<&'a Asset>)> {
    response
        .recommendations
        .iter()
        .map(|r| (r.asset_id.as_str(), r.score, catalog.get(&r.asset_id)))
        .collect()
}

fn print_cards(rows: &[(&str, f64, Option<&Asset>)]) {
    for (asset_id, score, asset) in rows {
        let title = asset.map(Asset::label).unwrap_or(*asset_id);
        println!();
        println!("  {}", title);
        println!("  Asset ID: {}  score: {:.3}", asset_id, score);
        if let Some(asset) = asset {
            println!(
                "  category: {}  currency: {}  sector: {}  risk: {}",
                asset.category,
                asset.currency.as_deref().unwrap_or("-"),
                asset.sector.as_deref().unwrap_or("-"),
                asset.risk.as_deref().unwrap_or("-"),
            );
        }
    }
}

fn print_table(rows: &[(&str, f64, Option<&Asset>)]) {
    println!(
        "{:<4} {:<14} {:>7} {:<10} {:<30}",
        "#", "asset_id", "score", "category", "name"
    );
    for (rank, (asset_id, score, asset)) in rows.iter().enumerate() {
        println!(
            "{:<4} {:<14} {:>7.3} {:<10} {:<30}",
            rank + 1,
            asset_id,
            score,
            asset.map(|a| a.category.as_str()).unwrap_or("-"),
            asset.and_then(|a| a.name.as_deref()).unwrap_or("-"),
        );
    }
}

fn write_csv<W: io::Write>(out: W, rows: &[(&str, f64, Option<&Asset>)]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for (rank, (asset_id, score, asset)) in rows.iter().enumerate() {
        let field = |get: fn(&Asset) -> Option<&str>| asset.and_then(|a| get(a)).unwrap_or("");
        writer.serialize(ExportRow {
            rank: rank + 1,
            asset_id,
            score: *score,
            name: field(|a| a.name.as_deref()),
            category: field(|a| Some(a.category.as_str())),
            currency: field(|a| a.currency.as_deref()),
            sector: field(|a| a.sector.as_deref()),
            risk: field(|a| a.risk.as_deref()),
        })?;
    }
    writer.flush().context("Failed to write CSV export")?;
    Ok(())
}

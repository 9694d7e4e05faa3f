use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use placepulse_common::config::parse_delay;
use placepulse_common::Config;
use placepulse_pipeline::aggregate::{kpis, rating_by_date, sentiment_distribution, summarize};
use placepulse_pipeline::export::{
    export_place_reports, export_reviews, export_summaries, load_collected, load_reviews, reclean,
};
use placepulse_pipeline::resolver::resolve;
use placepulse_pipeline::{
    parse_tokens, run_batch, BatchOptions, PlaceToken, ReviewOptions, VaderAnalyzer,
};
use places_client::PlacesClient;

#[derive(Parser)]
#[command(name = "placepulse", about = "Place reviews: download, sentiment, CSV export")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Download and analyze reviews. Tokens are `pid:<place_id>` or a business name.
    Fetch(FetchArgs),
    /// Look up the place_id, name and address for business names.
    Resolve {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Repair double-encoded text and recompute text_clean/sentiment. The input
    /// needs only `author_name` and `text` columns.
    Clean {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: PathBuf,
    },
    /// Print KPIs and per-location summaries for a review CSV.
    Report {
        #[arg(long)]
        input: PathBuf,
    },
}

#[derive(Args)]
struct FetchArgs {
    /// Places, one per argument.
    tokens: Vec<String>,
    /// File with one place per line.
    #[arg(long)]
    input: Option<PathBuf>,
    #[arg(long, default_value = "reviews_with_sentiment.csv")]
    output: PathBuf,
    /// Also fetch place metadata and write it here, joined with each
    /// place's review summary.
    #[arg(long)]
    metadata: Option<PathBuf>,
    /// Write per-location summaries here.
    #[arg(long)]
    summary: Option<PathBuf>,
    #[arg(long)]
    language: Option<String>,
    /// Keep only the N most recent reviews per place.
    #[arg(long)]
    most_recent: Option<usize>,
    /// Seconds to wait before using a continuation token.
    #[arg(long, value_parser = parse_delay)]
    page_delay: Option<Duration>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("placepulse=info".parse()?)
                .add_directive("places_client=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Fetch(args) => fetch(args).await,
        Command::Resolve { names } => resolve_names(&names).await,
        Command::Clean { input, output } => clean(&input, &output),
        Command::Report { input } => report(&input),
    }
}

async fn fetch(args: FetchArgs) -> Result<()> {
    let mut tokens: Vec<PlaceToken> = args
        .tokens
        .iter()
        .filter_map(|t| PlaceToken::parse(t))
        .collect();
    if let Some(ref path) = args.input {
        tokens.extend(parse_tokens(&std::fs::read_to_string(path)?));
    }
    if tokens.is_empty() {
        bail!("No places given. Pass `pid:<place_id>` or business names, or --input FILE");
    }

    let config = Config::from_env()?;
    let client = PlacesClient::with_base_url(&config.places_api_key, &config.places_base_url);
    let analyzer = VaderAnalyzer::new();

    let options = BatchOptions {
        reviews: ReviewOptions::from_config(
            &config,
            args.language,
            args.most_recent,
            args.page_delay,
        ),
        include_metadata: args.metadata.is_some(),
    };

    let report = run_batch(&client, &analyzer, &tokens, &options).await;
    println!("{report}");

    if report.reviews.is_empty() {
        warn!("No reviews collected, nothing exported");
        return Ok(());
    }

    export_reviews(&args.output, &report.reviews)?;
    if let Some(ref path) = args.metadata {
        export_place_reports(path, &report.place_reports())?;
    }
    if let Some(ref path) = args.summary {
        export_summaries(path, &report.summaries())?;
    }
    info!(output = %args.output.display(), "Batch exported");
    Ok(())
}

async fn resolve_names(names: &[String]) -> Result<()> {
    let config = Config::from_env()?;
    let client = PlacesClient::with_base_url(&config.places_api_key, &config.places_base_url);

    for (idx, name) in names.iter().enumerate() {
        println!("{}. {name}", idx + 1);
        match resolve(&client, name).await {
            Some(candidate) => {
                println!("   name:     {}", candidate.display_name);
                println!("   address:  {}", candidate.address);
                println!("   place_id: {}", candidate.place_id);
            }
            None => println!("   no place_id found"),
        }
    }
    Ok(())
}

fn clean(input: &std::path::Path, output: &std::path::Path) -> Result<()> {
    let reviews = load_collected(input)?;
    let cleaned = reclean(reviews, &VaderAnalyzer::new());
    export_reviews(output, &cleaned)?;
    info!(input = %input.display(), output = %output.display(), "Cleaning complete");
    Ok(())
}

fn report(input: &std::path::Path) -> Result<()> {
    let reviews = load_reviews(input)?;
    if reviews.is_empty() {
        warn!(input = %input.display(), "No reviews in file");
        return Ok(());
    }

    println!("\n=== Reviews ===");
    println!("{}", kpis(&reviews));
    println!("\nSentiment:");
    println!("{}", sentiment_distribution(&reviews));

    let trend = rating_by_date(&reviews);
    if trend.is_empty() {
        println!("\nNo dated, rated reviews to chart by day.");
    } else {
        println!("\nAverage rating by day:");
        for (day, avg) in trend {
            println!("  {day}  {avg:.2}");
        }
    }

    println!("\nBy location:");
    for summary in summarize(&reviews).values() {
        println!("  {summary}");
    }
    Ok(())
}

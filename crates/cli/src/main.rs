use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use engine::{ConsumerPolicy, PairingConfig, PairingOrchestrator, PairingScore, Provider};
use model::parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::info;

/// pairing - provider pairing engine
#[derive(Parser)]
#[command(name = "pairing")]
#[command(about = "Match service providers against a consumer policy", long_about = None)]
struct Cli {
    /// JSON configuration file (weights, top_k, max_concurrency, ...)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log every filter rejection and component score
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Worker limit for each phase
    #[arg(long, global = true)]
    concurrency: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank providers for a consumer policy
    Pair {
        /// JSON array of providers
        #[arg(long)]
        providers: PathBuf,

        /// JSON consumer policy
        #[arg(long)]
        policy: PathBuf,

        /// Number of providers to return
        #[arg(long)]
        top_k: Option<usize>,

        /// Show the score breakdown for each provider
        #[arg(long)]
        explain: bool,
    },

    /// Show providers in normalized form and flag unusable entries
    Inspect {
        /// JSON array of providers
        #[arg(long)]
        providers: PathBuf,
    },

    /// Run benchmark on synthetic providers
    Benchmark {
        /// Number of synthetic providers per request
        #[arg(long, default_value = "1000")]
        providers: usize,

        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Number of concurrent requests
        #[arg(long, default_value = "10")]
        concurrent: usize,

        /// Seed for the synthetic provider set
        #[arg(long, default_value = "7")]
        seed: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_deref(), cli.verbose, cli.concurrency)?;

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Pair {
            providers,
            policy,
            top_k,
            explain,
        } => {
            if let Some(top_k) = top_k {
                config.top_k = top_k;
            }
            handle_pair(config, &providers, &policy, explain)?
        }
        Commands::Inspect { providers } => handle_inspect(&providers)?,
        Commands::Benchmark {
            providers,
            requests,
            concurrent,
            seed,
        } => handle_benchmark(config, providers, requests, concurrent, seed).await?,
    }

    Ok(())
}

/// Configuration file first, then command-line overrides
fn load_config(
    path: Option<&Path>,
    verbose: bool,
    concurrency: Option<usize>,
) -> Result<PairingConfig> {
    let mut config = match path {
        Some(path) => PairingConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => PairingConfig::default(),
    };
    if verbose {
        config.verbose = true;
    }
    if concurrency.is_some() {
        config.max_concurrency = concurrency;
    }
    Ok(config)
}

/// Handle the 'pair' command
fn handle_pair(
    config: PairingConfig,
    providers_path: &Path,
    policy_path: &Path,
    explain: bool,
) -> Result<()> {
    let providers = parser::load_providers(providers_path).context("Failed to load providers")?;
    let policy = parser::load_policy(policy_path).context("Failed to load policy")?;
    info!("Loaded {} providers", providers.len());

    let orchestrator = PairingOrchestrator::new(config)?;
    let start = Instant::now();

    if explain {
        let ranked = orchestrator
            .rank_providers(&providers, policy.as_ref())
            .context("Pairing failed")?;
        print_scores(&ranked);
    } else {
        let top = orchestrator
            .get_pairing_list(&providers, policy.as_ref())
            .context("Pairing failed")?;
        print_providers(&top);
    }
    println!("{} Paired in {:?}", "✓".green(), start.elapsed());
    Ok(())
}

/// Handle the 'inspect' command
fn handle_inspect(providers_path: &Path) -> Result<()> {
    let providers = parser::load_providers(providers_path).context("Failed to load providers")?;

    let mut occurrences: BTreeMap<&str, usize> = BTreeMap::new();
    for provider in &providers {
        *occurrences.entry(provider.address.as_str()).or_insert(0) += 1;
    }

    println!("{}", format!("{} providers:", providers.len()).bold().blue());
    for provider in &providers {
        let normalized = provider.normalized();
        let address = if normalized.address.trim().is_empty() {
            "<blank>".red().to_string()
        } else {
            normalized.address.clone()
        };
        let location = if normalized.has_location() {
            normalized.location.clone()
        } else {
            "-".to_string()
        };
        println!(
            "{}{} stake {} location {} features [{}]",
            "• ".green(),
            address,
            normalized.stake,
            location,
            normalized.features.join(", ")
        );
    }

    let duplicates: Vec<_> = occurrences
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .collect();
    if duplicates.is_empty() {
        println!("{} No duplicate addresses", "✓".green());
    } else {
        println!("{}", "Duplicate addresses:".yellow());
        for (address, count) in duplicates {
            println!("  - {} ({} times)", address, count);
        }
    }
    Ok(())
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    config: PairingConfig,
    provider_count: usize,
    requests: usize,
    concurrent: usize,
    seed: u64,
) -> Result<()> {
    if requests == 0 || concurrent == 0 || provider_count == 0 {
        bail!("providers, requests and concurrent must all be positive");
    }

    let orchestrator = PairingOrchestrator::new(config)?;
    let providers = synthetic_providers(provider_count, seed);
    let policy = ConsumerPolicy::new(Some("EU"), ["rpc"], 1_000);
    println!(
        "Benchmarking {} requests over {} providers ({} in flight, {} workers)",
        requests,
        provider_count,
        concurrent,
        orchestrator.concurrency()
    );

    // Use tokio::spawn to make concurrent requests
    let in_flight = Arc::new(Semaphore::new(concurrent));
    let wall_clock = Instant::now();
    let mut handles = vec![];
    for _ in 0..requests {
        let orchestrator = orchestrator.clone();
        let providers = providers.clone();
        let policy = policy.clone();
        let permit = in_flight.clone().acquire_owned().await?;
        handles.push(tokio::spawn(async move {
            let start = Instant::now();
            orchestrator
                .get_pairing_list_async(providers, Some(policy))
                .await?;
            drop(permit);
            Ok::<_, anyhow::Error>(start.elapsed())
        }));
    }

    // Wait for all tasks to complete and collect timings
    let mut timings = vec![];
    for handle in handles {
        timings.push(handle.await??);
    }
    let total_time = wall_clock.elapsed();

    timings.sort();
    let sum: Duration = timings.iter().sum();
    let avg_latency = sum / timings.len() as u32;
    let percentile = |p: f64| timings[((timings.len() as f64 * p) as usize).min(timings.len() - 1)];
    let throughput = requests as f64 / total_time.as_secs_f64();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

const LOCATIONS: [&str; 5] = ["EU", "US", "ASIA", "AFRICA", ""];
const FEATURES: [&str; 8] = ["rpc", "rest", "grpc", "ws", "archive", "trace", "debug", "tendermint"];

fn synthetic_providers(count: usize, seed: u64) -> Vec<Provider> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            let feature_count = rng.random_range(0..=FEATURES.len());
            let features: Vec<&str> = (0..feature_count)
                .map(|_| FEATURES[rng.random_range(0..FEATURES.len())])
                .collect();
            Provider::new(
                format!("provider-{i}"),
                rng.random_range(0..10_000),
                LOCATIONS[rng.random_range(0..LOCATIONS.len())],
                features,
            )
        })
        .collect()
}

fn print_providers(providers: &[Provider]) {
    print!("{}", "Paired providers:\n".bold().blue());
    for (rank, provider) in providers.iter().enumerate() {
        println!(
            "{}. {} stake {} location {} [{}]",
            (rank + 1).to_string().green(),
            provider.address,
            provider.stake,
            provider.location,
            provider.features.join(", ")
        );
    }
}

fn print_scores(scores: &[PairingScore]) {
    print!("{}", "Paired providers:\n".bold().blue());
    for (rank, score) in scores.iter().enumerate() {
        let provider = &score.provider;
        println!(
            "{}. {} stake {} location {} [{}] - Score: {:.3}",
            (rank + 1).to_string().green(),
            provider.address,
            provider.stake,
            provider.location,
            provider.features.join(", "),
            score.total
        );
        let components = score
            .components
            .iter()
            .map(|(name, value)| format!("{name} {value:.3}"))
            .collect::<Vec<_>>()
            .join(", ");
        println!("   Components: {}", components);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_pair_command() {
        let cli = Cli::try_parse_from([
            "pairing",
            "--verbose",
            "pair",
            "--providers",
            "providers.json",
            "--policy",
            "policy.json",
            "--top-k",
            "3",
            "--explain",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Commands::Pair { top_k, explain, .. } => {
                assert_eq!(top_k, Some(3));
                assert!(explain);
            }
            _ => panic!("expected pair command"),
        }
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = load_config(None, true, Some(3)).unwrap();
        assert!(config.verbose);
        assert_eq!(config.max_concurrency, Some(3));
        assert_eq!(config.top_k, 5);
    }

    #[test]
    fn test_synthetic_providers_are_reproducible() {
        let a = synthetic_providers(50, 42);
        let b = synthetic_providers(50, 42);
        assert_eq!(a, b);
        assert_eq!(a.len(), 50);
    }
}

//! A small CLI that wires config, logging, and [`LeaderboardEngine`] together
//! and drives the three public operations from a scripted session read off
//! stdin (one command per line) or, with `--demo`, a canned walkthrough.
//!
//! This binary carries no transport or wire protocol: it exists only to
//! exercise the engine end to end, matching the teacher workspace's split
//! between a library crate and a thin server binary.

use std::io::{self, BufRead};

use clap::Parser;
use leaderboard_core::Score;
use leaderboard_engine::{LeaderboardConfig, LeaderboardEngine};

/// In-memory ranking leaderboard session
#[derive(Parser)]
#[command(name = "leaderboard-server", version, about)]
struct Cli {
    /// Number of stripes in the per-customer mutex array (must be a power of two)
    #[arg(long, default_value_t = LeaderboardConfig::default().stripe_count)]
    stripe_count: usize,

    /// Maximum height a ranking index node may be assigned
    #[arg(long, default_value_t = LeaderboardConfig::default().max_level)]
    max_level: usize,

    /// Expected participant count, used only to pre-size the score map
    #[arg(long, default_value_t = LeaderboardConfig::default().capacity_hint)]
    capacity_hint: usize,

    /// Run a canned walkthrough instead of reading commands from stdin
    #[arg(long)]
    demo: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let config = LeaderboardConfig {
        stripe_count: cli.stripe_count,
        max_level: cli.max_level,
        capacity_hint: cli.capacity_hint,
    };
    log::info!(
        "starting leaderboard engine: stripe_count={} max_level={} capacity_hint={}",
        config.stripe_count,
        config.max_level,
        config.capacity_hint
    );
    let engine = LeaderboardEngine::new(config);

    if cli.demo {
        run_demo(&engine);
        return;
    }

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                log::error!("failed to read command: {err}");
                std::process::exit(1);
            }
        };
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Err(err) = run_command(&engine, line) {
            log::error!("{err}");
            eprintln!("error: {err}");
        }
    }
}

/// Parses and executes a single scripted command
///
/// Supported commands:
/// - `update <customer_id> <delta>`
/// - `rank <start> <end>`
/// - `neighbors <customer_id> <up> <down>`
fn run_command(engine: &LeaderboardEngine, line: &str) -> Result<(), String> {
    let mut parts = line.split_whitespace();
    let command = parts.next().ok_or_else(|| "empty command".to_string())?;

    match command {
        "update" => {
            let customer_id = next_i64(&mut parts, "customer_id")?;
            let delta = next_score(&mut parts, "delta")?;
            let new_score = engine.update_score(customer_id, delta);
            println!("{customer_id} {new_score}");
            Ok(())
        }
        "rank" => {
            let start = next_i64(&mut parts, "start")?;
            let end = next_i64(&mut parts, "end")?;
            print_entries(&engine.get_by_rank(start, end));
            Ok(())
        }
        "neighbors" => {
            let customer_id = next_i64(&mut parts, "customer_id")?;
            let up = next_i64(&mut parts, "up")?;
            let down = next_i64(&mut parts, "down")?;
            print_entries(&engine.get_neighbors(customer_id, up, down));
            Ok(())
        }
        other => Err(format!("unrecognized command: {other}")),
    }
}

fn next_i64<'a>(
    parts: &mut impl Iterator<Item = &'a str>,
    field: &str,
) -> Result<i64, String> {
    parts
        .next()
        .ok_or_else(|| format!("missing {field}"))?
        .parse()
        .map_err(|_| format!("invalid {field}"))
}

fn next_score<'a>(
    parts: &mut impl Iterator<Item = &'a str>,
    field: &str,
) -> Result<Score, String> {
    parts
        .next()
        .ok_or_else(|| format!("missing {field}"))?
        .parse()
        .map_err(|_| format!("invalid {field}"))
}

fn print_entries(entries: &[leaderboard_core::RankedEntry]) {
    for entry in entries {
        println!("{} {} {}", entry.rank, entry.customer_id, entry.score);
    }
}

/// A canned walkthrough mirroring the design's S2-S5 scenarios
fn run_demo(engine: &LeaderboardEngine) {
    for (id, delta) in [(1, "10"), (2, "20"), (3, "20"), (4, "5")] {
        let score: Score = delta.parse().unwrap();
        let new_score = engine.update_score(id, score);
        println!("update {id} {delta} -> {new_score}");
    }

    println!("-- top 4 by rank --");
    print_entries(&engine.get_by_rank(1, 4));

    println!("-- neighbors of customer 1 (1 up, 1 down) --");
    print_entries(&engine.get_neighbors(1, 1, 1));

    let dropped: Score = "-10".parse().unwrap();
    let new_score = engine.update_score(4, dropped);
    println!("update 4 -10 -> {new_score} (dropped from leaderboard)");

    println!("-- ranking after customer 4 drops out --");
    print_entries(&engine.get_by_rank(1, 10));
}

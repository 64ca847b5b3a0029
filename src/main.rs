//! Plinko Sim entry point
//!
//! Headless driver: drops batches of balls through a simulated board at the
//! nominal tick rate and reports where they landed.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;

use plinko_sim::consts::*;
use plinko_sim::sim::{RejectionReason, Simulation, parse_wager};
use plinko_sim::{MemoryWallet, RiskProfile, SessionStats, Settings, SettingsError, Wallet};

fn parse_risk(s: &str) -> Result<RiskProfile, String> {
    RiskProfile::from_str(s).ok_or_else(|| "expected one of: low, medium, high".to_string())
}

#[derive(Parser, Debug, Clone)]
#[command(name = "plinko-sim", version, about = "Headless Plinko ball-drop simulation")]
struct Args {
    #[arg(
        long = "settings",
        value_name = "FILE",
        help_heading = "SETTINGS",
        help = "Load tuning from a JSON settings file"
    )]
    settings: Option<PathBuf>,

    #[arg(
        short = 'r',
        long = "risk",
        value_parser = parse_risk,
        help_heading = "SETTINGS",
        help = "Risk profile (replaces any multiplier table from the settings file)"
    )]
    risk: Option<RiskProfile>,

    #[arg(
        long = "no-bias",
        help_heading = "SETTINGS",
        help = "Disable the center drift bias"
    )]
    no_bias: bool,

    #[arg(
        long = "dump-settings",
        help_heading = "SETTINGS",
        help = "Print the effective settings as JSON and exit"
    )]
    dump_settings: bool,

    #[arg(
        short = 's',
        long = "seed",
        default_value_t = 0,
        help_heading = "SIMULATION",
        help = "RNG seed"
    )]
    seed: u64,

    #[arg(
        long = "width",
        default_value_t = BOARD_WIDTH,
        help_heading = "SIMULATION",
        help = "Board width in pixels"
    )]
    width: f32,

    #[arg(
        long = "height",
        default_value_t = BOARD_HEIGHT,
        help_heading = "SIMULATION",
        help = "Board height in pixels"
    )]
    height: f32,

    #[arg(
        short = 'n',
        long = "drops",
        default_value_t = 1000,
        help_heading = "SIMULATION",
        help = "Number of balls to drop"
    )]
    drops: u64,

    #[arg(
        short = 'c',
        long = "concurrency",
        default_value_t = 1,
        help_heading = "SIMULATION",
        help = "Maximum balls in flight at once (min 1)"
    )]
    concurrency: usize,

    #[arg(
        short = 'w',
        long = "wager",
        default_value = "10",
        help_heading = "WALLET",
        help = "Stake per ball"
    )]
    wager: String,

    #[arg(
        short = 'b',
        long = "balance",
        default_value_t = 1_000_000.0,
        help_heading = "WALLET",
        help = "Starting balance"
    )]
    balance: f64,

    #[arg(
        long = "json",
        help_heading = "OUTPUT",
        help = "Print the report as JSON"
    )]
    json: bool,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("invalid --wager: {0}")]
    Wager(#[from] RejectionReason),
    #[error("--concurrency must be at least 1")]
    Concurrency,
    #[error("failed to encode report: {0}")]
    Json(#[from] serde_json::Error),
}

/// End-of-run summary
#[derive(Debug, Serialize)]
struct Report<'a> {
    seed: u64,
    risk: &'static str,
    drift_bias: bool,
    wager: f64,
    starting_balance: f64,
    final_balance: f64,
    ticks: u64,
    /// Why drops stopped early, if they did
    stopped: Option<String>,
    multipliers: Vec<f64>,
    stats: &'a SessionStats,
}

fn load_settings(args: &Args) -> Result<Settings, SettingsError> {
    let mut settings = match &args.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    if let Some(risk) = args.risk {
        settings.risk = risk;
        settings.multipliers = None;
    }
    if args.no_bias {
        settings.drift_bias = false;
    }

    settings.validate()?;
    Ok(settings)
}

fn run(args: &Args) -> Result<(), CliError> {
    let settings = load_settings(args)?;
    if args.dump_settings {
        println!("{}", settings.to_json()?);
        return Ok(());
    }

    let wager = parse_wager(&args.wager)?;
    if args.concurrency == 0 {
        return Err(CliError::Concurrency);
    }

    let risk = settings.risk.as_str();
    let drift_bias = settings.drift_bias;
    let mut sim = Simulation::with_board(settings, args.seed, args.width, args.height);
    let mut wallet = MemoryWallet::new(args.balance);
    let mut stats = SessionStats::new(sim.board().buckets.len());

    let mut remaining = args.drops;
    let mut stopped = None;
    while remaining > 0 || sim.is_running() {
        while remaining > 0 && sim.balls().len() < args.concurrency {
            match sim.drop_ball(&mut wallet, wager) {
                Ok(_) => remaining -= 1,
                Err(reason) => {
                    log::warn!("Drop rejected with {} still queued: {}", remaining, reason);
                    stopped = Some(reason.to_string());
                    remaining = 0;
                }
            }
        }

        for outcome in sim.tick(&mut wallet, SIM_DT) {
            stats.record(&outcome);
        }
    }

    let report = Report {
        seed: args.seed,
        risk,
        drift_bias,
        wager,
        starting_balance: args.balance,
        final_balance: wallet.balance(),
        ticks: sim.time_ticks(),
        stopped,
        multipliers: sim.board().buckets.iter().map(|b| b.multiplier).collect(),
        stats: &stats,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, &sim);
    }
    Ok(())
}

fn print_report(report: &Report<'_>, sim: &Simulation) {
    let stats = report.stats;
    println!(
        "Plinko Sim: {} drops, risk {}, bias {}, seed {}",
        stats.drops,
        report.risk,
        if report.drift_bias { "on" } else { "off" },
        report.seed
    );
    if let Some(reason) = &report.stopped {
        println!("Stopped early: {}", reason);
    }
    println!();

    let landed = stats.landed.max(1) as f64;
    let peak = stats.bucket_hits.iter().copied().max().unwrap_or(0).max(1) as f64;
    for (bucket, hits) in sim.board().buckets.iter().zip(&stats.bucket_hits) {
        let bar = "#".repeat((*hits as f64 / peak * 40.0).round() as usize);
        println!(
            "{:>6} {:>8} {:>6.2}% {}",
            bucket.label,
            hits,
            *hits as f64 / landed * 100.0,
            bar
        );
    }

    println!();
    println!("Landed:      {}", stats.landed);
    println!("Expired:     {}", stats.expired);
    println!("Wagered:     {:.0}", stats.total_wagered);
    println!("Paid:        {:.0}", stats.total_paid);
    println!("Best payout: {:.0}", stats.best_payout);
    println!("RTP:         {:.4}", stats.rtp());
    println!("House edge:  {:.2}%", stats.house_edge() * 100.0);
    println!("Center 3:    {:.2}%", stats.center_share(3) * 100.0);
    println!("Balance:     {:.0} -> {:.0}", report.starting_balance, report.final_balance);
    println!("Ticks:       {}", report.ticks);
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

//! CLI entry point for the assault predictor

use assault_odds::{
    config::AssaultConfig,
    convergence::ConvergenceMode,
    predictor::predict,
    stats::{format_sweep_table, SweepAxis},
    sweep::{sweep, sweep_with_threads},
    PredictError,
};
use clap::{Parser, ValueEnum};
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "assault-predictor")]
#[command(version = "1.0")]
#[command(about = "Expected hits, damage and kill probability for an assault", long_about = None)]
struct Args {
    /// Path to an assault configuration file (YAML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Action points available to the attacker
    #[arg(long)]
    pa: Option<u32>,

    /// Target hit points
    #[arg(long)]
    hp: Option<u32>,

    /// Action points of the shooter (caps blaster, lizaro, natamy, rocket launcher, machine gun)
    #[arg(long)]
    shooter_pa: Option<u32>,

    /// Base success rate of a hit, before skills
    #[arg(long)]
    base_success: Option<f64>,

    #[arg(long)]
    expert: bool,
    #[arg(long)]
    elusive: bool,
    #[arg(long)]
    creative: bool,
    #[arg(long)]
    persistent: bool,

    #[arg(long)]
    solid: bool,
    #[arg(long)]
    wrestler: bool,
    #[arg(long)]
    knife: bool,

    #[arg(long)]
    armor: bool,
    #[arg(long)]
    roughneck: bool,
    #[arg(long)]
    berserker: bool,

    /// Blaster charges
    #[arg(long)]
    blaster: Option<u32>,
    /// Lizaro jungle charges
    #[arg(long)]
    lizaro_jungle: Option<u32>,
    /// Number of grenades thrown
    #[arg(long)]
    grenades: Option<u32>,
    /// Natamy rifle charges
    #[arg(long)]
    natamy: Option<u32>,
    /// Rocket launcher charges
    #[arg(long)]
    rocket_launcher: Option<u32>,
    /// Machine gun charges
    #[arg(long)]
    machine_gun: Option<u32>,

    /// The target is a Mush
    #[arg(long)]
    mush: bool,

    /// Use the fixed 1001-step convergence instead of the tolerance stop
    #[arg(long)]
    reference: bool,

    /// Tabulate over a target HP range, e.g. 5..30
    #[arg(long, value_parser = parse_range, conflicts_with = "sweep_pa")]
    sweep_hp: Option<RangeInclusive<u32>>,

    /// Tabulate over an action point range, e.g. 4..16
    #[arg(long, value_parser = parse_range)]
    sweep_pa: Option<RangeInclusive<u32>>,

    /// Run sweeps in parallel
    #[arg(short, long, default_value = "false")]
    parallel: bool,

    /// Worker threads for parallel sweeps (defaults to all cores)
    #[arg(long)]
    threads: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    output: OutputFormat,

    /// Show timing information
    #[arg(short, long, default_value = "false")]
    timing: bool,
}

fn parse_range(s: &str) -> Result<RangeInclusive<u32>, String> {
    let (start, end) = s
        .split_once("..")
        .or_else(|| s.split_once('-'))
        .ok_or_else(|| format!("expected START..END, got '{}'", s))?;
    let start: u32 = start.trim().parse().map_err(|e| format!("bad range start: {}", e))?;
    let end: u32 = end.trim_start_matches('=').trim().parse().map_err(|e| format!("bad range end: {}", e))?;
    if start > end {
        return Err(format!("range start {} is after end {}", start, end));
    }
    Ok(start..=end)
}

/// Build the config from the file (if any) and the inline flags, flags winning
fn build_config(args: &Args) -> Result<AssaultConfig, PredictError> {
    let mut config = match &args.config {
        Some(path) => AssaultConfig::from_file(path)?,
        None => {
            // a sweep supplies its own axis value
            let pa = args
                .pa
                .or_else(|| args.sweep_pa.as_ref().map(|r| *r.start()))
                .ok_or_else(|| PredictError::InvalidInput("--pa is required without --config".into()))?;
            let hp = args
                .hp
                .or_else(|| args.sweep_hp.as_ref().map(|r| *r.start()))
                .ok_or_else(|| PredictError::InvalidInput("--hp is required without --config".into()))?;
            AssaultConfig::new(pa, hp)
        }
    };

    if let Some(pa) = args.pa {
        config.action_points = pa;
    }
    if let Some(hp) = args.hp {
        config = config.with_target_hp(hp);
    }
    if args.mush {
        config.mush = true;
        if let Some(target) = config.target.as_mut() {
            target.mush = true;
        }
    }
    if let Some(shooter_pa) = args.shooter_pa {
        config.shooter_action_points = shooter_pa;
    }
    if let Some(p) = args.base_success {
        config.base_success_rate = p;
    }

    config.skills.expert |= args.expert;
    config.skills.elusive |= args.elusive;
    config.skills.creative |= args.creative;
    config.skills.persistent |= args.persistent;

    config.melee.solid |= args.solid;
    config.melee.wrestler |= args.wrestler;
    config.melee.knife |= args.knife;

    config.penalties.armor |= args.armor;
    config.penalties.roughneck |= args.roughneck;
    config.penalties.berserker |= args.berserker;

    let weapons = &mut config.weapons;
    weapons.blaster = args.blaster.or(weapons.blaster);
    weapons.lizaro_jungle = args.lizaro_jungle.or(weapons.lizaro_jungle);
    weapons.grenades = args.grenades.unwrap_or(weapons.grenades);
    weapons.natamy = args.natamy.or(weapons.natamy);
    weapons.rocket_launcher = args.rocket_launcher.or(weapons.rocket_launcher);
    weapons.machine_gun = args.machine_gun.or(weapons.machine_gun);

    if args.reference {
        config.convergence = ConvergenceMode::reference();
    }
    Ok(config)
}

fn run(args: &Args) -> Result<(), PredictError> {
    let config = build_config(args)?;
    tracing::debug!(?config, "resolved config");

    let sweep_request = args
        .sweep_hp
        .clone()
        .map(|r| (SweepAxis::TargetHp, r))
        .or_else(|| args.sweep_pa.clone().map(|r| (SweepAxis::ActionPoints, r)));

    let start = Instant::now();

    if let Some((axis, range)) = sweep_request {
        let count = range.clone().count();
        let rows = if args.parallel {
            sweep_with_threads(&config, axis, range, args.threads)?
        } else {
            sweep(&config, axis, range, false)?
        };
        let elapsed = start.elapsed();

        match args.output {
            OutputFormat::Text => {
                println!("=== Assault Sweep ({}) ===", axis.label());
                print!("{}", format_sweep_table(axis, &rows));
                if args.timing {
                    println!();
                    println!("--- Performance ---");
                    println!("Rows: {}", count);
                    println!("Total time: {:.3}ms", elapsed.as_secs_f64() * 1000.0);
                    println!("Cores available: {}", num_cpus::get());
                }
            }
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "axis": axis,
                    "parallel": args.parallel,
                    "elapsed_seconds": elapsed.as_secs_f64(),
                    "rows": rows,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
        }
        return Ok(());
    }

    let prediction = predict(&config)?;
    let elapsed = start.elapsed();

    match args.output {
        OutputFormat::Text => {
            println!("{}", prediction.summary());
            println!();
            println!("--- Details ---");
            println!("Success rate per hit: {:.4}", prediction.success_rate);
            println!("Damage per hit:       {:.4}", prediction.damage_per_hit);
            println!("Charges used:         {}", prediction.charges_used);
            println!("Attempts left:        {}", prediction.adjusted_attempts);
            println!("Hits needed to kill:  {}", prediction.needed_hits);
            if args.timing {
                println!();
                println!("--- Performance ---");
                println!("Total time: {:.3}ms", elapsed.as_secs_f64() * 1000.0);
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "elapsed_seconds": elapsed.as_secs_f64(),
                "prediction": prediction,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

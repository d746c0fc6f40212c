//! Debug script to print every intermediate success rate and damage value

use assault_odds::config::AssaultConfig;
use assault_odds::convergence::{
    converge_success, steady_state, ConvergenceMode, FAILURE_BONUS, PERSISTENT_FAILURE_BONUS,
};
use assault_odds::predictor::{predict, validate};
use assault_odds::skills::{trace_skills, Skill};
use assault_odds::weapons::{base_damage, trace_damage};
use std::env;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    // If config path provided, trace that assault
    if args.len() > 1 {
        let config_path = &args[1];
        match AssaultConfig::from_file(config_path) {
            Ok(config) => trace(&config),
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    // Otherwise compare the iterated limits with the closed form for a few rates
    println!("\n=== RECURRENCE LIMITS ===");
    println!("{:>6}  {:>5}  {:>10}  {:>10}  {:>10}", "a", "m", "reference", "tolerance", "closed");
    for a in [0.45, 0.60, 0.72, 0.80] {
        for m in [FAILURE_BONUS, PERSISTENT_FAILURE_BONUS] {
            let fixed = converge_success(m, a, ConvergenceMode::reference());
            let tol = converge_success(m, a, ConvergenceMode::default());
            match (fixed, tol) {
                (Ok(fixed), Ok(tol)) => println!(
                    "{:>6.2}  {:>5.2}  {:>10.6}  {:>10.6}  {:>10.6}",
                    a,
                    m,
                    fixed,
                    tol,
                    steady_state(m, a)
                ),
                (Err(e), _) | (_, Err(e)) => println!("{:>6.2}  {:>5.2}  {}", a, m, e),
            }
        }
    }

    let config = AssaultConfig::new(10, 20);
    trace(&config);
}

fn trace(config: &AssaultConfig) {
    let target = match validate(config) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Invalid config: {}", e);
            std::process::exit(1);
        }
    };

    println!("\n=== SUCCESS RATE ===");
    println!("  base:        {:.6}", config.base_success_rate);
    match trace_skills(config.base_success_rate, &config.skills, config.convergence) {
        Ok(steps) => {
            for step in steps {
                let label = step.skill.map(Skill::name).unwrap_or("base rule");
                println!("  {:<12} {:.6}", format!("{}:", label), step.success_rate);
            }
        }
        Err(e) => println!("  {}", e),
    }

    println!("\n=== DAMAGE PER HIT ===");
    let base = base_damage(&config.melee, &config.penalties, config.bare_hands_damage);
    println!("  melee:       {:.4}", base);
    let (profile, steps) = trace_damage(
        base,
        &config.weapons,
        &target,
        config.action_points,
        config.shooter_action_points,
    );
    for step in steps {
        println!("  {:<16} x{:<3} {:.4}", step.weapon.name(), step.charges, step.damage);
    }
    println!("  charges used: {}", profile.charges_used);

    println!("\n=== PREDICTION ===");
    match predict(config) {
        Ok(prediction) => println!("{}", prediction.summary()),
        Err(e) => println!("{}", e),
    }
}

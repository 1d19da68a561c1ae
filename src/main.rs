// src/main.rs

use anyhow::Result;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use signal_timing::{
    compute_schedule, Config, PhaseRequest, ScheduleEntry, ALL_RED_TIME, YELLOW_TIME,
};
use std::path::Path;
use tracing::{info, warn};

fn main() -> Result<()> {
    let config = Config::load("config.yaml")?;

    tracing_subscriber::fmt()
        .with_env_filter(format!("signal_timing={}", config.logging.level))
        .init();

    info!("🚦 Adaptive Signal Timing starting");
    info!("✓ Configuration loaded for junction {}", config.junction.id);

    let n_phases = config.junction.lanes_per_phase.len();
    let counts = signal_timing::counts::load_counts(
        Path::new(&config.junction.counts_file),
        n_phases,
    )?;
    info!(
        "✓ Vehicle counts loaded for {} phase(s) from {}",
        n_phases, config.junction.counts_file
    );

    let phases: Vec<PhaseRequest> = config
        .junction
        .lanes_per_phase
        .iter()
        .zip(&counts)
        .map(|(&lane_count, &counts)| PhaseRequest { lane_count, counts })
        .collect();

    let mut rng = match config.scheduler.seed {
        Some(seed) => {
            info!("Headway jitter seeded with {}", seed);
            ChaCha8Rng::seed_from_u64(seed)
        }
        None => ChaCha8Rng::from_entropy(),
    };

    let params = config.scheduler_params();
    let schedule = compute_schedule(&phases, &params, &mut rng)?;
    info!("✓ Schedule computed for {} phase(s)", schedule.len());

    print_schedule(&schedule);
    verify_cycle(&schedule);

    if config.output.save_json {
        save_schedule(&schedule, &config)?;
    }

    Ok(())
}

fn print_schedule(schedule: &[ScheduleEntry]) {
    println!("\n--- Calculated Traffic Light Schedule ---");
    println!(
        "{:<18} {:<12} {:<12} {:<12} {:<15}",
        "Traffic Light No.", "Green (s)", "Yellow (s)", "Red (s)", "Clearance (%)"
    );
    println!("{}", "-".repeat(72));
    for entry in schedule {
        println!(
            "{:<18} {:<12.2} {:<12.2} {:<12.2} {:<15.2}",
            entry.traffic_light_no,
            entry.green,
            entry.yellow,
            entry.red,
            entry.percentage_clearance
        );
    }
    println!("{}", "-".repeat(72));
}

/// Re-derive the cycle identity from the emitted schedule.
///
/// The identity `G+Y+R == ΣG + n·Y + n·AR` only holds in the general
/// branch; the single-active branch leaves idle phases without yellow and
/// is skipped here.
fn verify_cycle(schedule: &[ScheduleEntry]) {
    if schedule.iter().any(|entry| entry.yellow == 0.0) {
        return;
    }

    let n = schedule.len() as f64;
    let expected = schedule.iter().map(|e| e.green).sum::<f64>()
        + n * YELLOW_TIME
        + n * ALL_RED_TIME;
    let first = schedule[0].cycle_time();

    if (first - expected).abs() < 0.01 {
        info!(
            "Cycle time consistent: {:.2}s per phase ({:.2}s expected)",
            first, expected
        );
    } else {
        warn!(
            "Cycle time inconsistent: first phase {:.2}s, expected {:.2}s",
            first, expected
        );
    }
}

fn save_schedule(schedule: &[ScheduleEntry], config: &Config) -> Result<()> {
    std::fs::create_dir_all(&config.output.dir)?;
    let path =
        Path::new(&config.output.dir).join(format!("{}_schedule.json", config.junction.id));
    let json = serde_json::to_string_pretty(schedule)?;
    std::fs::write(&path, json)?;
    info!("💾 Schedule saved to {}", path.display());
    Ok(())
}

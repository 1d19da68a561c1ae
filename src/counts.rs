// src/counts.rs

use crate::types::VehicleCounts;
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

/// Load per-phase vehicle counts from a text file.
///
/// One line per phase in the form
/// `two_wheelers,light_motor_vehicles,heavy_motor_vehicles`. The file must
/// carry exactly `expected_phases` non-empty lines and every count must be
/// a non-negative integer; anything else is rejected before scheduling
/// runs.
pub fn load_counts(path: &Path, expected_phases: usize) -> Result<Vec<VehicleCounts>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading counts file {}", path.display()))?;
    parse_counts(&contents, expected_phases)
        .with_context(|| format!("parsing counts file {}", path.display()))
}

fn parse_counts(contents: &str, expected_phases: usize) -> Result<Vec<VehicleCounts>> {
    let lines: Vec<&str> = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if lines.len() != expected_phases {
        bail!(
            "expected {} phase line(s), found {}",
            expected_phases,
            lines.len()
        );
    }

    let mut counts = Vec::with_capacity(lines.len());
    for (i, line) in lines.iter().enumerate() {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() != 3 {
            bail!(
                "line {}: expected 'two_wheelers,light,heavy', got '{}'",
                i + 1,
                line
            );
        }

        let mut parsed = [0u32; 3];
        for (slot, field) in parsed.iter_mut().zip(&fields) {
            let value: i64 = field
                .parse()
                .with_context(|| format!("line {}: invalid count '{}'", i + 1, field))?;
            if value < 0 {
                bail!("line {}: negative count {}", i + 1, value);
            }
            *slot = u32::try_from(value)
                .with_context(|| format!("line {}: count {} out of range", i + 1, value))?;
        }

        counts.push(VehicleCounts::new(parsed[0], parsed[1], parsed[2]));
    }

    Ok(counts)
}

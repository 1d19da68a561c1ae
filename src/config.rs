use crate::types::Config;
use anyhow::{bail, Context, Result};
use std::fs;

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("reading config {path}"))?;
        let config: Config = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.junction.lanes_per_phase.is_empty() {
            bail!("junction {} configures no phases", self.junction.id);
        }
        let p = self.scheduler.service_fraction;
        if !(0.0..=1.0).contains(&p) {
            bail!("service_fraction {p} outside 0.0..=1.0");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
junction:
  id: "J-001"
  approach_distance: 10.0
  lanes_per_phase: [2, 3, 2, 1]
  counts_file: "vehicle_data.txt"
scheduler:
  service_fraction: 0.8
  red_interval: 60.0
  max_green_per_phase: 150.0
  seed: 42
output:
  dir: "output"
  save_json: true
logging:
  level: "info"
"#;

    #[test]
    fn test_parse_sample_config() {
        let config: Config = serde_yaml::from_str(SAMPLE).unwrap();
        assert_eq!(config.junction.id, "J-001");
        assert_eq!(config.junction.lanes_per_phase, vec![2, 3, 2, 1]);
        assert_eq!(config.scheduler.seed, Some(42));

        let params = config.scheduler_params();
        assert_eq!(params.service_fraction, 0.8);
        assert_eq!(params.approach_distance, 10.0);
    }

    #[test]
    fn test_service_fraction_out_of_range_rejected() {
        let mut config: Config = serde_yaml::from_str(SAMPLE).unwrap();
        config.scheduler.service_fraction = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_phase_list_rejected() {
        let mut config: Config = serde_yaml::from_str(SAMPLE).unwrap();
        config.junction.lanes_per_phase.clear();
        assert!(config.validate().is_err());
    }
}

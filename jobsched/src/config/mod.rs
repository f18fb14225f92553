/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Run configuration loading.
//!
//! Every section and every field is optional:
//! ```yaml
//! dynamic_score:
//!   reward_exponent: 1.0      # A
//!   processing_exponent: 1.0  # B
//!   time_left_exponent: 1.0   # C
//!   work_left_exponent: 1.0   # D
//! output:
//!   results_dir: results
//!   summary_log: results_log.csv
//! reference_profits:
//!   test1: 133
//!   test2: 87
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

use crate::scheduler::online::ScoreExponents;
use crate::scheduler::Algorithm;

// ── Private YAML deserialization types ────────────────────────────────────────

/// Maps directly onto the YAML file layout.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RunConfigFile {
    dynamic_score: ScoreExponents,
    output: OutputEntry,
    reference_profits: BTreeMap<String, i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OutputEntry {
    results_dir: Option<PathBuf>,
    summary_log: Option<PathBuf>,
}

// ── Public data structures ────────────────────────────────────────────────────

/// Where results are persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Directory receiving one `<label>.txt` per run.
    pub results_dir: PathBuf,
    /// Appendable CSV summary log.
    pub summary_log: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_dir: PathBuf::from("results"),
            summary_log: PathBuf::from("results_log.csv"),
        }
    }
}

/// Settings for one invocation of the runner.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunConfig {
    pub dynamic_score: ScoreExponents,
    pub output: OutputConfig,
    /// Known best profits keyed by base test-case label (no algorithm
    /// suffix).
    pub reference_profits: BTreeMap<String, i64>,
}

impl RunConfig {
    /// Parse the YAML file at `path`.
    ///
    /// # Errors
    /// The file cannot be read, is not valid YAML for this layout, or holds a
    /// non-finite exponent.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading run configuration from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open configuration file: {}", path.display()))?;

        // An empty document deserialises to unit, not to a mapping.
        let file: RunConfigFile = if content.trim().is_empty() {
            RunConfigFile::default()
        } else {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML file: {}", path.display()))?
        };

        let exps = file.dynamic_score;
        for (name, v) in [
            ("reward_exponent", exps.reward_exponent),
            ("processing_exponent", exps.processing_exponent),
            ("time_left_exponent", exps.time_left_exponent),
            ("work_left_exponent", exps.work_left_exponent),
        ] {
            if !v.is_finite() {
                bail!(
                    "dynamic_score.{name} must be a finite number (got {v}) in {}",
                    path.display()
                );
            }
        }

        let defaults = OutputConfig::default();
        let config = Self {
            dynamic_score: exps,
            output: OutputConfig {
                results_dir: file.output.results_dir.unwrap_or(defaults.results_dir),
                summary_log: file.output.summary_log.unwrap_or(defaults.summary_log),
            },
            reference_profits: file.reference_profits,
        };

        info!(
            exponents = ?config.dynamic_score,
            results_dir = %config.output.results_dir.display(),
            summary_log = %config.output.summary_log.display(),
            references = config.reference_profits.len(),
            "Run configuration loaded"
        );
        for (label, profit) in &config.reference_profits {
            debug!("  Reference: {} = {}", label, profit);
        }

        Ok(config)
    }

    /// Reference profit for `label`, looked up by its [`base_label`].
    pub fn reference_profit(&self, label: &str) -> Option<i64> {
        self.reference_profits.get(base_label(label)).copied()
    }
}

/// Strip the trailing [`Algorithm::label_suffix`] from a run label.  Labels
/// without one are returned unchanged.
pub fn base_label(label: &str) -> &str {
    Algorithm::ALL
        .into_iter()
        .find_map(|a| label.strip_suffix(a.label_suffix()))
        .unwrap_or(label)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn yaml_tempfile(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    // ── load_from_file ────────────────────────────────────────────────────────

    #[test]
    fn load_full_yaml() {
        let yaml = r#"
dynamic_score:
  reward_exponent: 2.0
  processing_exponent: 0.5
  time_left_exponent: 1.5
  work_left_exponent: 0.0
output:
  results_dir: out/results
  summary_log: out/log.csv
reference_profits:
  test1: 133
  test2: -4
"#;
        let f = yaml_tempfile(yaml);
        let cfg = RunConfig::load_from_file(f.path()).unwrap();

        assert_eq!(cfg.dynamic_score.reward_exponent, 2.0);
        assert_eq!(cfg.dynamic_score.processing_exponent, 0.5);
        assert_eq!(cfg.dynamic_score.time_left_exponent, 1.5);
        assert_eq!(cfg.dynamic_score.work_left_exponent, 0.0);
        assert_eq!(cfg.output.results_dir, PathBuf::from("out/results"));
        assert_eq!(cfg.output.summary_log, PathBuf::from("out/log.csv"));
        assert_eq!(cfg.reference_profits.len(), 2);
        assert_eq!(cfg.reference_profits["test2"], -4);
    }

    #[test]
    fn partial_yaml_falls_back_to_defaults() {
        let yaml = "dynamic_score:\n  reward_exponent: 3.0\n";
        let f = yaml_tempfile(yaml);
        let cfg = RunConfig::load_from_file(f.path()).unwrap();

        assert_eq!(cfg.dynamic_score.reward_exponent, 3.0);
        assert_eq!(cfg.dynamic_score.work_left_exponent, 1.0);
        assert_eq!(cfg.output, OutputConfig::default());
        assert!(cfg.reference_profits.is_empty());
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let f = yaml_tempfile("");
        assert_eq!(RunConfig::load_from_file(f.path()).unwrap(), RunConfig::default());
    }

    #[test]
    fn missing_file_returns_error() {
        assert!(RunConfig::load_from_file(Path::new("/nonexistent/path/run.yaml")).is_err());
    }

    #[test]
    fn malformed_yaml_returns_error() {
        let f = yaml_tempfile("this is: not: valid: yaml: content:::");
        assert!(RunConfig::load_from_file(f.path()).is_err());
    }

    #[test]
    fn wrongly_typed_field_returns_error() {
        let f = yaml_tempfile("reference_profits:\n  test1: lots\n");
        assert!(RunConfig::load_from_file(f.path()).is_err());
    }

    #[test]
    fn non_finite_exponent_returns_error() {
        let f = yaml_tempfile("dynamic_score:\n  time_left_exponent: .nan\n");
        let err = RunConfig::load_from_file(f.path()).unwrap_err();
        assert!(err.to_string().contains("time_left_exponent"));
    }

    // ── reference_profit ──────────────────────────────────────────────────────

    #[test]
    fn base_label_strips_algorithm_suffixes() {
        assert_eq!(base_label("test1_offline"), "test1");
        assert_eq!(base_label("test1_exact"), "test1");
        assert_eq!(base_label("test1_online_static"), "test1");
        assert_eq!(base_label("test1_online_dynscore"), "test1");
        assert_eq!(base_label("test1"), "test1");
        assert_eq!(base_label("my_case_offline"), "my_case");
    }

    #[test]
    fn base_label_only_strips_the_trailing_suffix() {
        assert_eq!(base_label("my_online_case_exact"), "my_online_case");
        assert_eq!(base_label("my_exact_case_online_static"), "my_exact_case");
        assert_eq!(base_label("case_online_unknown"), "case_online_unknown");
        assert_eq!(base_label("case_offline_exact"), "case_offline");
    }

    #[test]
    fn reference_profit_is_found_for_any_suffix() {
        let mut cfg = RunConfig::default();
        cfg.reference_profits.insert("test1".into(), 133);

        assert_eq!(cfg.reference_profit("test1_exact"), Some(133));
        assert_eq!(cfg.reference_profit("test1_online_highscore"), Some(133));
        assert_eq!(cfg.reference_profit("test2_exact"), None);
    }
}

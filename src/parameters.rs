// This file is part of AlgoB.
// Copyright © 2025 The AlgoB Developers
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Parameters of an assignment run.
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use serde_derive::{Deserialize, Serialize};

const fn default_max_iterations() -> u64 {
    100
}

fn default_output_directory() -> PathBuf {
    PathBuf::from("output")
}

/// Set of parameters of a run, usually read from a JSON file.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Parameters {
    /// Paths to the input files.
    pub input_files: InputFiles,
    /// Directory where the output files are stored.
    #[serde(default = "default_output_directory")]
    pub output_directory: PathBuf,
    /// Maximum number of iterations.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u64,
    /// The run stops as soon as the relative gap is below this value.
    ///
    /// Default (0) is to run the maximum number of iterations without computing the gap.
    #[serde(default)]
    pub target_relative_gap: f64,
    /// Number of threads used to process the bushes.
    ///
    /// Default (0) is to run the sequential algorithm.
    #[serde(default)]
    pub nb_threads: usize,
}

/// Struct to store all the input file paths.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct InputFiles {
    /// Path to the TNTP network file.
    pub network: PathBuf,
    /// Path to the TNTP origin-destination matrix file.
    pub demand: PathBuf,
}

impl Parameters {
    /// Creates Parameters with default values for the given input files.
    pub fn new(network: &Path, demand: &Path) -> Self {
        Parameters {
            input_files: InputFiles {
                network: network.to_path_buf(),
                demand: demand.to_path_buf(),
            },
            output_directory: default_output_directory(),
            max_iterations: default_max_iterations(),
            target_relative_gap: 0.0,
            nb_threads: 0,
        }
    }

    /// Checks the parameters and returns the [RunConfig] of the algorithm.
    pub fn run_config(&self) -> Result<RunConfig> {
        if self.max_iterations == 0 {
            bail!("The maximum number of iterations must be positive");
        }
        if !self.target_relative_gap.is_finite() || self.target_relative_gap < 0.0 {
            bail!(
                "The target relative gap must be a non-negative number, got {}",
                self.target_relative_gap
            );
        }
        Ok(RunConfig {
            target_relative_gap: self.target_relative_gap,
            max_iterations: self.max_iterations,
            nb_threads: self.nb_threads,
        })
    }
}

/// Configuration of the assignment algorithm.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunConfig {
    /// Stop when the relative gap is below this value (0 disables the gap computation).
    pub target_relative_gap: f64,
    /// Maximum number of iterations.
    pub max_iterations: u64,
    /// Number of worker threads (0 for the sequential algorithm).
    pub nb_threads: usize,
}

impl RunConfig {
    pub const fn new(target_relative_gap: f64, max_iterations: u64, nb_threads: usize) -> Self {
        RunConfig {
            target_relative_gap,
            max_iterations,
            nb_threads,
        }
    }

    /// Returns `true` if the relative gap is computed and used as a stopping criterion.
    pub fn uses_gap(&self) -> bool {
        self.target_relative_gap != 0.0
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig::new(0.0, default_max_iterations(), 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_test() {
        let json = r#"{"input_files": {"network": "net.tntp", "demand": "trips.tntp"}}"#;
        let parameters: Parameters = serde_json::from_str(json).unwrap();
        assert_eq!(parameters, Parameters::new(Path::new("net.tntp"), Path::new("trips.tntp")));
        assert_eq!(parameters.run_config().unwrap(), RunConfig::default());

        let json = r#"{
            "input_files": {"network": "net.tntp", "demand": "trips.tntp"},
            "output_directory": "results",
            "max_iterations": 20,
            "target_relative_gap": 1e-4,
            "nb_threads": 4
        }"#;
        let parameters: Parameters = serde_json::from_str(json).unwrap();
        assert_eq!(parameters.output_directory, PathBuf::from("results"));
        let config = parameters.run_config().unwrap();
        assert_eq!(config, RunConfig::new(1e-4, 20, 4));
        assert!(config.uses_gap());
    }

    #[test]
    fn invalid_parameters_test() {
        let mut parameters = Parameters::new(Path::new("a"), Path::new("b"));
        parameters.max_iterations = 0;
        assert!(parameters.run_config().is_err());
        parameters.max_iterations = 10;
        parameters.target_relative_gap = -1.0;
        assert!(parameters.run_config().is_err());
        parameters.target_relative_gap = f64::NAN;
        assert!(parameters.run_config().is_err());
    }
}

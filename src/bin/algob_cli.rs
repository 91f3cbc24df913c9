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

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

use algob::io::read_json;
use algob::parameters::Parameters;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

/// Static traffic assignment with Algorithm B.
///
/// The parameters are read from a JSON file and / or from the command-line flags (flags take
/// precedence).
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the JSON file with the parameters.
    #[arg(long)]
    parameters: Option<PathBuf>,
    /// Path to the TNTP file with the network.
    #[arg(long = "network", visible_alias = "net")]
    network: Option<PathBuf>,
    /// Path to the TNTP file with the origin-destination matrix.
    #[arg(long = "odmatrix", visible_alias = "odm")]
    odmatrix: Option<PathBuf>,
    /// Directory where the results are written.
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Maximum number of iterations.
    #[arg(short, long)]
    iterations: Option<u64>,
    /// When set, the relative gap is computed after each iteration and the algorithm stops as
    /// soon as it is lower than this value.
    #[arg(long = "relative-gap", visible_alias = "rg")]
    relative_gap: Option<f64>,
    /// Number of worker threads (0 to run the sequential algorithm).
    #[arg(short, long)]
    threads: Option<usize>,
}

impl Args {
    fn into_parameters(self) -> Result<Parameters> {
        let mut parameters = match (self.parameters, self.network, self.odmatrix) {
            (Some(path), network, odmatrix) => {
                let mut parameters: Parameters = read_json(&path)?;
                if let Some(network) = network {
                    parameters.input_files.network = network;
                }
                if let Some(odmatrix) = odmatrix {
                    parameters.input_files.demand = odmatrix;
                }
                parameters
            }
            (None, Some(network), Some(odmatrix)) => Parameters::new(&network, &odmatrix),
            (None, _, _) => {
                bail!("Either `--parameters` or both `--network` and `--odmatrix` are required")
            }
        };
        if let Some(output) = self.output {
            parameters.output_directory = output;
        }
        if let Some(iterations) = self.iterations {
            parameters.max_iterations = iterations;
        }
        if let Some(relative_gap) = self.relative_gap {
            parameters.target_relative_gap = relative_gap;
        }
        if let Some(threads) = self.threads {
            parameters.nb_threads = threads;
        }
        Ok(parameters)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let parameters = args.into_parameters()?;
    algob::run_from_parameters(&parameters)
}

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

//! Static traffic assignment with the bush-based Algorithm B.
//!
//! The trips of an origin-destination matrix are assigned to the arcs of a road network so that
//! the flows satisfy the Wardrop user equilibrium: for each origin-destination pair, all the used
//! paths have the same, minimal, cost.
pub mod algorithm;
pub mod bush;
pub mod demand;
pub mod io;
pub mod logging;
pub mod network;
pub mod observer;
pub mod parameters;
pub mod progress_bar;
pub mod queue;
pub mod results;

use std::path::Path;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use log::info;

use crate::algorithm::Algorithm;
use crate::observer::LogObserver;
use crate::parameters::Parameters;
use crate::results::AssignmentResults;

/// Name of the file where the arc flows are written.
pub const FLOWS_FILENAME: &str = "flows.tsv";
/// Name (without extension) of the JSON file where the run summary is written.
pub const SUMMARY_NAME: &str = "summary";

/// Reads the input files, runs the assignment and writes the results in the output directory.
///
/// The output directory must exist.
pub fn run(parameters: &Parameters) -> Result<AssignmentResults> {
    let config = parameters.run_config()?;

    info!("Reading network");
    let t0 = Instant::now();
    let graph = io::read_network_file(&parameters.input_files.network)?;
    info!(
        "Network with {} nodes, {} zones and {} arcs read in {:.3}s",
        graph.nb_nodes(),
        graph.nb_zones(),
        graph.nb_arcs(),
        t0.elapsed().as_secs_f64()
    );

    info!("Reading demand");
    let t0 = Instant::now();
    let demand = io::read_demand_file(&parameters.input_files.demand)?;
    info!(
        "Demand with {} trips read in {:.3}s",
        demand.total(),
        t0.elapsed().as_secs_f64()
    );
    if demand.nb_zones() != graph.nb_zones() {
        bail!(
            "The demand has {} zones but the network has {} zones",
            demand.nb_zones(),
            graph.nb_zones()
        );
    }

    let results = Algorithm::new(graph, demand, config).run(&mut LogObserver::default())?;

    info!("Writing results");
    let output_dir = &parameters.output_directory;
    io::write_flows_file(&output_dir.join(FLOWS_FILENAME), &results.arcs)?;
    io::write_json(&results.summary, output_dir, SUMMARY_NAME)?;
    Ok(results)
}

/// Creates the output directory, initializes logging and runs the assignment.
pub fn run_from_parameters(parameters: &Parameters) -> Result<()> {
    // Create output directory if it does not exists yet.
    std::fs::create_dir_all(&parameters.output_directory).with_context(|| {
        format!(
            "Failed to create output directory `{:?}`",
            parameters.output_directory
        )
    })?;

    logging::initialize_logging(&parameters.output_directory)?;

    run(parameters).map(|_| ())
}

/// Runs the assignment with the parameters read from a JSON file.
pub fn run_from_file(path: &Path) -> Result<()> {
    let parameters: Parameters = io::read_json(path)?;
    run_from_parameters(&parameters)
}

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

use std::fs;
use std::path::PathBuf;

use algob::io::read_json;
use algob::parameters::Parameters;
use algob::results::RunSummary;
use algob::{FLOWS_FILENAME, SUMMARY_NAME};

const NETWORK: &str = "<NUMBER OF ZONES> 2
<NUMBER OF NODES> 4
<FIRST THRU NODE> 1
<NUMBER OF LINKS> 4
<END OF METADATA>
~ init_node term_node capacity length free_flow_time b power speed toll link_type ;
1 3 1000 0 5 0.15 4 0 0 1 ;
3 2 1000 0 5 0.15 4 0 0 1 ;
1 4 2000 0 7 0.15 4 0 0 1 ;
4 2 2000 0 7 0.15 4 0 0 1 ;
";

const TRIPS: &str = "<NUMBER OF ZONES> 2
<TOTAL OD FLOW> 3000.0
<END OF METADATA>

Origin 1
    2 :    3000.0;
";

fn get_directory(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("algob-{}-{}", name, std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn run_test() {
    let dir = get_directory("run");
    let network = dir.join("net.tntp");
    let trips = dir.join("trips.tntp");
    fs::write(&network, NETWORK).unwrap();
    fs::write(&trips, TRIPS).unwrap();
    let mut parameters = Parameters::new(&network, &trips);
    parameters.output_directory = dir.join("output");
    parameters.max_iterations = 50;
    parameters.target_relative_gap = 1e-8;
    fs::create_dir_all(&parameters.output_directory).unwrap();

    let results = algob::run(&parameters).unwrap();
    assert_eq!(results.arcs.len(), 4);
    assert!(results.last_relative_gap().unwrap() <= 1e-8);

    let flows = fs::read_to_string(parameters.output_directory.join(FLOWS_FILENAME)).unwrap();
    let lines: Vec<_> = flows.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0], "From\tTo\tVolume\tCost");
    assert!(lines[1].starts_with("1\t3\t1349.44"), "{}", lines[1]);

    let summary: RunSummary = read_json(
        &parameters
            .output_directory
            .join(format!("{SUMMARY_NAME}.json")),
    )
    .unwrap();
    assert_eq!(summary.iterations.len(), results.summary.iterations.len());
    assert_eq!(summary.nb_threads, 0);
    let rel_diff = (summary.final_objective - results.summary.final_objective).abs()
        / results.summary.final_objective;
    assert!(rel_diff < 1e-12);

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn zone_mismatch_test() {
    let dir = get_directory("mismatch");
    let network = dir.join("net.tntp");
    let trips = dir.join("trips.tntp");
    fs::write(&network, NETWORK).unwrap();
    fs::write(
        &trips,
        "<NUMBER OF ZONES> 3\n<END OF METADATA>\nOrigin 1\n2 : 10.0;\n",
    )
    .unwrap();
    let mut parameters = Parameters::new(&network, &trips);
    parameters.output_directory = dir.clone();
    let err = algob::run(&parameters).unwrap_err();
    assert!(format!("{err:#}").contains("zones"), "{err:#}");

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn missing_file_test() {
    let dir = get_directory("missing");
    let parameters = Parameters::new(&dir.join("net.tntp"), &dir.join("trips.tntp"));
    assert!(algob::run(&parameters).is_err());
    fs::remove_dir_all(&dir).unwrap();
}

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

use algob::algorithm::Algorithm;
use algob::demand::DemandMatrix;
use algob::network::{node_index, ArcSpec, Graph};
use algob::observer::NoopObserver;
use algob::parameters::RunConfig;

/// Braess network from zone 0 to zone 1, with a cheap link from node 2 to node 3.
///
/// The network is symmetric: reversing all the arcs and swapping 0 with 1 and 2 with 3 gives the
/// same network.
fn get_braess() -> Graph {
    Graph::from_arcs(
        4,
        2,
        [
            ArcSpec::new(node_index(0), node_index(2), 1000.0, 10.0),
            ArcSpec::new(node_index(2), node_index(1), 3000.0, 20.0),
            ArcSpec::new(node_index(0), node_index(3), 3000.0, 20.0),
            ArcSpec::new(node_index(3), node_index(1), 1000.0, 10.0),
            ArcSpec::new(node_index(2), node_index(3), 3000.0, 1.0),
        ],
    )
}

fn flow(results: &algob::results::AssignmentResults, start: usize, end: usize) -> f64 {
    results
        .arcs
        .iter()
        .find(|a| a.start.index() == start && a.end.index() == end)
        .unwrap()
        .flow
}

#[test]
fn braess_test() {
    let mut demand = DemandMatrix::new(2);
    demand.set(node_index(0), node_index(1), 2500.0);
    for nb_threads in [0, 2] {
        let config = RunConfig::new(1e-10, 100, nb_threads);
        let results = Algorithm::new(get_braess(), demand.clone(), config)
            .run(&mut NoopObserver)
            .unwrap();
        let rel_gap = results.last_relative_gap().unwrap();
        assert!(rel_gap < 1e-6, "{rel_gap}");
        // Symmetric equilibrium.
        let (x02, x21, x03, x31, x23) = (
            flow(&results, 0, 2),
            flow(&results, 2, 1),
            flow(&results, 0, 3),
            flow(&results, 3, 1),
            flow(&results, 2, 3),
        );
        assert!((x02 - x31).abs() < 0.1, "{x02} != {x31}");
        assert!((x21 - x03).abs() < 0.1, "{x21} != {x03}");
        // Conservation.
        assert!((x02 + x03 - 2500.0).abs() < 1e-6);
        assert!((x21 + x31 - 2500.0).abs() < 1e-6);
        assert!((x02 - x21 - x23).abs() < 1e-6);
        // The cheap link is used.
        assert!(x23 > 0.0);
    }
}

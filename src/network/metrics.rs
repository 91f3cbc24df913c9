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

//! Aggregate metrics of the current network flows.
use std::sync::atomic::{AtomicU64, Ordering};

use rayon::prelude::*;

use super::{Graph, NodeIndex};
use crate::demand::DemandMatrix;

impl Graph {
    /// Returns the value of the Beckmann objective function for the current flows.
    pub fn objective(&self) -> f64 {
        self.arcs().iter().map(|arc| arc.bpr_integral(0.0)).sum()
    }

    /// Returns the gap between the current flows and an all-or-nothing assignment of the demand
    /// on the current shortest paths.
    ///
    /// The gap is non-positive when the flows are feasible.
    pub fn gap(&self, demand: &DemandMatrix) -> f64 {
        let mut aon_flows = vec![0.0; self.nb_arcs()];
        for origin in 0..self.nb_zones() {
            self.load_all_or_nothing(demand, NodeIndex::new(origin), |arc, trips| {
                aon_flows[arc] += trips;
            });
        }
        self.weighted_gap(|i| aon_flows[i])
    }

    /// Same as [Graph::gap] but the origins are processed in parallel, in the current rayon
    /// thread pool.
    ///
    /// The all-or-nothing flows are summed in a non-deterministic order so the result can differ
    /// from [Graph::gap] by rounding errors.
    pub fn par_gap(&self, demand: &DemandMatrix) -> f64 {
        let aon_flows: Vec<AtomicF64> = (0..self.nb_arcs()).map(|_| AtomicF64::default()).collect();
        (0..self.nb_zones()).into_par_iter().for_each(|origin| {
            self.load_all_or_nothing(demand, NodeIndex::new(origin), |arc, trips| {
                aon_flows[arc].fetch_add(trips);
            });
        });
        self.weighted_gap(|i| aon_flows[i].load())
    }

    /// Calls `load(arc, trips)` for each arc on the shortest path from `origin` to each
    /// destination.
    fn load_all_or_nothing<F: FnMut(usize, f64)>(
        &self,
        demand: &DemandMatrix,
        origin: NodeIndex,
        mut load: F,
    ) {
        let tree = self.min_tree(origin);
        for (destination, &trips) in demand.row(origin).iter().enumerate() {
            if trips == 0.0 {
                continue;
            }
            for arc in self.path(&tree.predecessors, NodeIndex::new(destination), None) {
                load(arc.index(), trips);
            }
        }
    }

    fn weighted_gap<F: Fn(usize) -> f64>(&self, aon_flow: F) -> f64 {
        self.arcs()
            .iter()
            .map(|arc| arc.cost() * (aon_flow(arc.index().index()) - arc.flow()))
            .sum()
    }
}

/// A `f64` which can be safely shared between threads, stored as its bit pattern.
#[derive(Debug, Default)]
struct AtomicF64(AtomicU64);

impl AtomicF64 {
    fn fetch_add(&self, value: f64) {
        // The closure always returns `Some` so the update cannot fail.
        let _ = self
            .0
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |bits| {
                Some((f64::from_bits(bits) + value).to_bits())
            });
    }

    fn load(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Acquire))
    }
}

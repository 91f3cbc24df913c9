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

//! Parallel driver: the bushes are processed in batches, one bush per worker thread.
//!
//! Within a batch, the bushes are improved and their trees are computed concurrently while the
//! graph is only read. The flows are then shifted one bush after the other and the bushes are
//! pruned concurrently. The arc costs are updated at the end of each batch.
use hashbrown::HashSet;
use log::debug;
use rayon::prelude::*;

use super::phases::{
    bush_trees, create_bush, divergence_nodes, equilibrate_bush, improve_bush,
    remove_unused_arcs, BushTrees,
};
use crate::bush::Bush;
use crate::demand::DemandMatrix;
use crate::network::{Graph, NodeIndex};
use crate::observer::AssignmentObserver;

/// Trees and divergence nodes of a bush, computed during the read-only phase of a batch.
struct BushPlan {
    trees: BushTrees,
    divergence: Vec<Option<NodeIndex>>,
}

/// Creates the bush of each zone, in batches of `batch_size` zones.
pub(super) fn create_bushes(graph: &Graph, demand: &DemandMatrix, batch_size: usize) -> Vec<Bush> {
    let roots: Vec<_> = (0..graph.nb_zones()).map(NodeIndex::new).collect();
    let mut bushes = Vec::with_capacity(roots.len());
    for batch in roots.chunks(batch_size) {
        let batch_bushes: Vec<Bush> = batch
            .par_iter()
            .map(|&root| create_bush(graph, demand, root))
            .collect();
        bushes.extend(batch_bushes);
    }
    bushes
}

/// Runs one iteration over all the bushes.
pub(super) fn iterate<O: AssignmentObserver>(
    graph: &mut Graph,
    bushes: &mut [Bush],
    batch_size: usize,
    observer: &mut O,
) {
    for batch in bushes.chunks_mut(batch_size) {
        debug!("Processing a batch of {} bushes", batch.len());
        let plans: Vec<BushPlan> = {
            let graph = &*graph;
            batch
                .par_iter_mut()
                .map_init(HashSet::new, |visited, bush| {
                    improve_bush(graph, bush);
                    let trees = bush_trees(graph, bush);
                    let divergence = divergence_nodes(graph, &trees, visited);
                    BushPlan { trees, divergence }
                })
                .collect()
        };
        // The flows are shifted sequentially as bushes can share arcs.
        for (bush, plan) in batch.iter_mut().zip(plans.iter()) {
            equilibrate_bush(graph, bush, &plan.trees, &plan.divergence);
        }
        batch
            .par_iter_mut()
            .zip(plans.par_iter())
            .for_each(|(bush, plan)| remove_unused_arcs(bush, &plan.trees.min));
        graph.update_costs();
        observer.on_bushes_processed(batch.len());
    }
}

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

//! Bush-based Algorithm B for the static user-equilibrium traffic assignment.
mod parallel;
mod phases;

use std::time::Instant;

use anyhow::{Context, Result};
use hashbrown::HashSet;
use log::debug;

pub use self::phases::{
    bush_trees, create_bush, divergence_node, divergence_nodes, equilibrate_bush, flow_delta,
    improve_bush, indegrees, max_distances, remove_unused_arcs, shift_flows, topological_order,
    BushTrees, Segments,
};
use crate::bush::Bush;
use crate::demand::DemandMatrix;
use crate::network::{ArcIndex, Graph, NodeIndex};
use crate::observer::{AssignmentObserver, RunHeader};
use crate::parameters::RunConfig;
use crate::results::{ArcResult, AssignmentResults, IterationDiagnostics, RunSummary};

/// The assignment algorithm, with its inputs.
#[derive(Clone, Debug)]
pub struct Algorithm {
    graph: Graph,
    demand: DemandMatrix,
    config: RunConfig,
}

impl Algorithm {
    /// Creates a new Algorithm.
    ///
    /// The demand matrix must have one row and one column per zone of the graph.
    pub fn new(graph: Graph, demand: DemandMatrix, config: RunConfig) -> Self {
        debug_assert_eq!(graph.nb_zones(), demand.nb_zones());
        Algorithm {
            graph,
            demand,
            config,
        }
    }

    /// Runs the algorithm until the maximum number of iterations is reached or the relative gap
    /// is below the target.
    ///
    /// The bushes are processed in parallel batches when `nb_threads` is positive.
    pub fn run<O: AssignmentObserver + Send>(self, observer: &mut O) -> Result<AssignmentResults> {
        if self.config.nb_threads == 0 {
            Ok(self.run_with(Driver::Sequential, observer))
        } else {
            let nb_threads = self.config.nb_threads;
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(nb_threads)
                .build()
                .context("Failed to build the thread pool")?;
            Ok(pool.install(|| self.run_with(Driver::Parallel { batch_size: nb_threads }, observer)))
        }
    }

    fn run_with<O: AssignmentObserver>(
        mut self,
        driver: Driver,
        observer: &mut O,
    ) -> AssignmentResults {
        let t0 = Instant::now();
        self.graph.update_costs();
        let mut bushes = driver.create_bushes(&self.graph, &self.demand);
        for bush in &bushes {
            for i in 0..self.graph.nb_arcs() {
                let arc = ArcIndex::new(i);
                self.graph.add_flow(arc, bush.flow(arc));
            }
        }
        self.graph.update_costs();
        debug!("Created {} bushes", bushes.len());

        let initial_objective = self.graph.objective();
        observer.on_start(&RunHeader {
            nb_threads: self.config.nb_threads,
            max_iterations: self.config.max_iterations,
            target_relative_gap: self.config.target_relative_gap,
            initial_objective,
        });

        let mut iterations = Vec::new();
        let mut relative_gap = f64::INFINITY;
        let mut max_lower_bound = f64::NEG_INFINITY;
        let mut iteration = 0;
        while iteration < self.config.max_iterations
            && (!self.config.uses_gap() || relative_gap > self.config.target_relative_gap)
        {
            let iteration_start = Instant::now();
            observer.on_iteration_start(iteration, bushes.len());
            driver.iterate(&mut self.graph, &mut bushes, observer);
            let objective = self.graph.objective();
            let (gap, rel_gap) = if self.config.uses_gap() {
                let gap = driver.gap(&self.graph, &self.demand);
                max_lower_bound = max_lower_bound.max(objective + gap);
                relative_gap = -gap / max_lower_bound.abs();
                (Some(gap), Some(relative_gap))
            } else {
                (None, None)
            };
            let diagnostics = IterationDiagnostics {
                iteration,
                objective,
                gap,
                relative_gap: rel_gap,
                running_time: iteration_start.elapsed(),
            };
            observer.on_iteration_end(&diagnostics);
            iterations.push(diagnostics);
            iteration += 1;
        }
        let running_time = t0.elapsed();
        observer.on_finish(iteration, running_time);

        AssignmentResults {
            arcs: self.graph.arcs().iter().map(ArcResult::from).collect(),
            summary: RunSummary {
                nb_threads: self.config.nb_threads,
                initial_objective,
                final_objective: self.graph.objective(),
                iterations,
                running_time,
            },
        }
    }
}

/// Strategy used to process the bushes.
#[derive(Clone, Copy, Debug)]
enum Driver {
    /// One bush after the other.
    Sequential,
    /// Batches of `batch_size` bushes, in the current rayon thread pool.
    Parallel { batch_size: usize },
}

impl Driver {
    fn create_bushes(&self, graph: &Graph, demand: &DemandMatrix) -> Vec<Bush> {
        match *self {
            Driver::Sequential => (0..graph.nb_zones())
                .map(|root| create_bush(graph, demand, NodeIndex::new(root)))
                .collect(),
            Driver::Parallel { batch_size } => parallel::create_bushes(graph, demand, batch_size),
        }
    }

    fn iterate<O: AssignmentObserver>(
        &self,
        graph: &mut Graph,
        bushes: &mut [Bush],
        observer: &mut O,
    ) {
        match *self {
            Driver::Sequential => {
                let mut visited = HashSet::new();
                for bush in bushes.iter_mut() {
                    process_bush(graph, bush, &mut visited);
                    observer.on_bushes_processed(1);
                }
            }
            Driver::Parallel { batch_size } => {
                parallel::iterate(graph, bushes, batch_size, observer)
            }
        }
    }

    fn gap(&self, graph: &Graph, demand: &DemandMatrix) -> f64 {
        match self {
            Driver::Sequential => graph.gap(demand),
            Driver::Parallel { .. } => graph.par_gap(demand),
        }
    }
}

/// Runs one iteration of the algorithm on a single bush: improvement, equilibration and pruning,
/// then updates the arc costs.
pub fn process_bush(graph: &mut Graph, bush: &mut Bush, visited: &mut HashSet<NodeIndex>) {
    improve_bush(graph, bush);
    let trees = bush_trees(graph, bush);
    let divergence = divergence_nodes(graph, &trees, visited);
    equilibrate_bush(graph, bush, &trees, &divergence);
    remove_unused_arcs(bush, &trees.min);
    graph.update_costs();
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::parallel::tests::{get_grid, load_bushes};
    use crate::network::graph::tests::get_diamond;
    use crate::network::{arc_index, node_index};
    use crate::observer::NoopObserver;

    fn get_demand() -> DemandMatrix {
        let mut demand = DemandMatrix::new(2);
        demand.set(node_index(0), node_index(1), 3000.0);
        demand
    }

    #[test]
    fn diamond_equilibrium_test() {
        let algo = Algorithm::new(get_diamond(), get_demand(), RunConfig::new(0.0, 5, 0));
        let results = algo.run(&mut NoopObserver).unwrap();
        assert_eq!(results.summary.iterations.len(), 5);
        assert!(results.summary.iterations.iter().all(|d| d.gap.is_none()));
        let flow = |i: usize| results.arcs[i].flow;
        let cost = |i: usize| results.arcs[i].cost;
        // Upper route: arcs 0 and 2, lower route: arcs 1 and 3.
        assert!((flow(0) - 1349.4487).abs() < 1e-3, "{}", flow(0));
        assert!((flow(1) - 1650.5513).abs() < 1e-3, "{}", flow(1));
        assert!((flow(0) - flow(2)).abs() < 1e-9);
        assert!((flow(1) - flow(3)).abs() < 1e-9);
        assert!((flow(0) + flow(1) - 3000.0).abs() < 1e-9);
        assert!((cost(0) + cost(2) - cost(1) - cost(3)).abs() < 1e-6);
        assert!((results.summary.initial_objective - 102900.0).abs() < 1e-6);
        assert!((results.summary.final_objective - 38266.24).abs() < 1e-2);
    }

    #[test]
    fn diamond_relative_gap_test() {
        let algo = Algorithm::new(get_diamond(), get_demand(), RunConfig::new(1e-8, 50, 0));
        let results = algo.run(&mut NoopObserver).unwrap();
        // The equilibrium is reached after one iteration.
        assert_eq!(results.summary.iterations.len(), 1);
        let rel_gap = results.last_relative_gap().unwrap();
        assert!(rel_gap <= 1e-8, "{rel_gap}");
    }

    #[test]
    fn parallel_diamond_test() {
        let seq = Algorithm::new(get_diamond(), get_demand(), RunConfig::new(0.0, 3, 0))
            .run(&mut NoopObserver)
            .unwrap();
        let par = Algorithm::new(get_diamond(), get_demand(), RunConfig::new(0.0, 3, 2))
            .run(&mut NoopObserver)
            .unwrap();
        assert_eq!(par.summary.nb_threads, 2);
        for (a, b) in seq.arcs.iter().zip(par.arcs.iter()) {
            assert_eq!(a.start, b.start);
            assert_eq!(a.end, b.end);
            assert!((a.flow - b.flow).abs() < 1e-9);
        }
    }

    #[test]
    fn process_bush_test() {
        let mut graph = get_diamond();
        let demand = get_demand();
        graph.update_costs();
        let mut bush = create_bush(&graph, &demand, node_index(0));
        for i in 0..graph.nb_arcs() {
            graph.add_flow(arc_index(i), bush.flow(arc_index(i)));
        }
        graph.update_costs();
        process_bush(&mut graph, &mut bush, &mut HashSet::new());
        // Both routes are used and all their arcs are in the bush.
        assert_eq!(bush.len(), 4);
        assert!(bush.iter().all(|arc| bush.flow(arc) > 0.0));
        // The costs are up to date.
        assert_eq!(graph.arc(arc_index(0)).cost(), graph.arc(arc_index(0)).bpr(0.0));
    }

    /// Panics if a bush arc does not go forward in the topological order of the bush.
    fn assert_acyclic(graph: &Graph, bush: &Bush) {
        let mut ranks = vec![None; graph.nb_nodes()];
        for (rank, node) in topological_order(graph, bush).into_iter().enumerate() {
            ranks[node.index()] = Some(rank);
        }
        for arc in bush.iter() {
            let arc = graph.arc(arc);
            let start = ranks[arc.start().index()];
            let end = ranks[arc.end().index()];
            assert!(start.is_some() && end.is_some(), "Arc {:?} is not ordered", arc.index());
            assert!(start < end, "Arc {:?} goes backward", arc.index());
        }
    }

    #[test]
    fn acyclic_bushes_test() {
        let (mut graph, demand) = get_grid();
        graph.update_costs();
        let mut bushes: Vec<_> = (0..graph.nb_zones())
            .map(|i| create_bush(&graph, &demand, node_index(i)))
            .collect();
        load_bushes(&mut graph, &bushes);
        let mut visited = HashSet::new();
        let mut objective = graph.objective();
        for _ in 0..15 {
            for bush in bushes.iter_mut() {
                assert_acyclic(&graph, bush);
                process_bush(&mut graph, bush, &mut visited);
                assert_acyclic(&graph, bush);
            }
            let new_objective = graph.objective();
            assert!(
                new_objective <= objective * (1.0 + 1e-9),
                "{new_objective} > {objective}"
            );
            objective = new_objective;
        }
    }

    /// Returns the all-or-nothing flows of the demand on the free-flow shortest paths.
    fn all_or_nothing_flows(graph: &Graph, demand: &DemandMatrix) -> Vec<f64> {
        let mut flows = vec![0.0; graph.nb_arcs()];
        for origin in 0..graph.nb_zones() {
            let tree = graph.min_tree(node_index(origin));
            for (destination, &trips) in demand.row(node_index(origin)).iter().enumerate() {
                let mut node = destination;
                while let Some(arc) = tree.predecessors[node] {
                    flows[arc.index()] += trips;
                    node = graph.arc(arc).start().index();
                }
            }
        }
        flows
    }

    #[test]
    fn initial_loading_test() {
        let (mut graph, demand) = get_grid();
        graph.update_costs();
        let expected = all_or_nothing_flows(&graph, &demand);
        assert!(expected.iter().any(|&f| f > 0.0));

        let bushes = Driver::Sequential.create_bushes(&graph, &demand);
        for arc in graph.arcs() {
            let flow: f64 = bushes.iter().map(|b| b.flow(arc.index())).sum();
            assert!((flow - expected[arc.index().index()]).abs() < 1e-9);
        }

        // Without iterations, the results are the flows of the initial loading.
        for nb_threads in [0, 3] {
            let results = Algorithm::new(
                graph.clone(),
                demand.clone(),
                RunConfig::new(0.0, 0, nb_threads),
            )
            .run(&mut NoopObserver)
            .unwrap();
            assert!(results.summary.iterations.is_empty());
            assert_eq!(
                results.summary.initial_objective,
                results.summary.final_objective
            );
            for (arc, &flow) in results.arcs.iter().zip(expected.iter()) {
                assert!((arc.flow - flow).abs() < 1e-9, "{} != {}", arc.flow, flow);
            }
        }
    }
}

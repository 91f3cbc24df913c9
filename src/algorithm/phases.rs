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

//! Building blocks of Algorithm B, shared by the sequential and the parallel drivers.
use hashbrown::HashSet;
use log::{debug, warn};

use crate::bush::Bush;
use crate::demand::DemandMatrix;
use crate::network::{ArcIndex, Graph, NodeIndex, Predecessors};
use crate::queue::FifoQueue;

/// Maximum number of Newton iterations when computing the flow to shift.
const NEWTON_MAX_ITERATIONS: usize = 100;
/// The Newton iterations stop when two successive estimates differ by less than this value.
const NEWTON_TOLERANCE: f64 = 1e-10;

/// Cheapest and costliest paths from the root of a bush to each node, restricted to the arcs of
/// the bush.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BushTrees {
    /// Min tree: all the arcs of the bush are eligible.
    pub min: Predecessors,
    /// Max tree: only the arcs of the bush with positive bush flow are eligible.
    pub max: Predecessors,
}

/// Arcs of the min and max paths between a divergence node and a node, listed backward from the
/// node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Segments {
    pub min: Vec<ArcIndex>,
    pub max: Vec<ArcIndex>,
}

impl Segments {
    /// Collects the segments ending at `node` and starting at `lca`.
    pub fn new(graph: &Graph, trees: &BushTrees, node: NodeIndex, lca: NodeIndex) -> Self {
        Segments {
            min: graph.path(&trees.min, node, Some(lca)).collect(),
            max: graph.path(&trees.max, node, Some(lca)).collect(),
        }
    }
}

/// Creates the initial bush of `root`.
///
/// The bush contains the arcs whose start node is strictly closer to the root than their end
/// node. The trips from the root are assigned on the shortest paths (all-or-nothing), as bush
/// flows only: the flows of the graph are not modified.
pub fn create_bush(graph: &Graph, demand: &DemandMatrix, root: NodeIndex) -> Bush {
    let tree = graph.min_tree(root);
    let mut bush = Bush::new(root, graph.nb_arcs());
    for arc in graph.arcs() {
        if tree.distances[arc.start().index()] < tree.distances[arc.end().index()] {
            bush.add_arc(arc.index());
        }
    }
    for (destination, &trips) in demand.row(root).iter().enumerate() {
        if trips == 0.0 {
            continue;
        }
        let destination = NodeIndex::new(destination);
        if tree.predecessors[destination.index()].is_none() && destination != root {
            warn!(
                "No path from zone {} to zone {}, {} trips are ignored",
                root.index(),
                destination.index(),
                trips
            );
        }
        for arc in graph.path(&tree.predecessors, destination, None) {
            bush.add_flow(arc, trips);
        }
    }
    bush
}

/// Returns the number of bush arcs entering each node.
pub fn indegrees(graph: &Graph, bush: &Bush) -> Vec<usize> {
    let mut indegrees = vec![0; graph.nb_nodes()];
    for arc in bush.iter() {
        indegrees[graph.arc(arc).end().index()] += 1;
    }
    indegrees
}

/// Returns the nodes reachable from the root through the bush arcs, in topological order.
///
/// The bush must be acyclic.
pub fn topological_order(graph: &Graph, bush: &Bush) -> Vec<NodeIndex> {
    let mut indegrees = indegrees(graph, bush);
    let mut queue = FifoQueue::with_capacity(graph.nb_nodes());
    let mut order = Vec::with_capacity(graph.nb_nodes());
    queue.push(bush.root());
    while let Some(node) = queue.pop() {
        order.push(node);
        for arc in graph.neighbors(node) {
            if !bush.contains(arc.index()) {
                continue;
            }
            let end = arc.end().index();
            indegrees[end] -= 1;
            if indegrees[end] == 0 {
                queue.push(arc.end());
            }
        }
    }
    order
}

/// Returns the cost of the costliest path from the root to each node, using the bush arcs.
///
/// The nodes that cannot be reached have a distance of `-inf`.
pub fn max_distances(graph: &Graph, bush: &Bush) -> Vec<f64> {
    let mut distances = vec![f64::NEG_INFINITY; graph.nb_nodes()];
    distances[bush.root().index()] = 0.0;
    for node in topological_order(graph, bush) {
        let dist = distances[node.index()];
        for arc in graph.neighbors(node) {
            if !bush.contains(arc.index()) {
                continue;
            }
            let end = arc.end().index();
            if distances[end] < dist + arc.cost() {
                distances[end] = dist + arc.cost();
            }
        }
    }
    distances
}

/// Adds to the bush the arcs that go from a node to a node with a strictly larger maximum
/// distance.
pub fn improve_bush(graph: &Graph, bush: &mut Bush) {
    let distances = max_distances(graph, bush);
    for arc in graph.arcs() {
        let start_dist = distances[arc.start().index()];
        let end_dist = distances[arc.end().index()];
        if start_dist == f64::NEG_INFINITY || end_dist == f64::NEG_INFINITY {
            continue;
        }
        if start_dist < end_dist {
            bush.add_arc(arc.index());
        }
    }
}

/// Computes the min and max trees of a bush in a single topological pass.
pub fn bush_trees(graph: &Graph, bush: &Bush) -> BushTrees {
    let nb_nodes = graph.nb_nodes();
    let mut min_dist = vec![f64::INFINITY; nb_nodes];
    let mut max_dist = vec![f64::NEG_INFINITY; nb_nodes];
    let mut trees = BushTrees {
        min: vec![None; nb_nodes],
        max: vec![None; nb_nodes],
    };
    min_dist[bush.root().index()] = 0.0;
    max_dist[bush.root().index()] = 0.0;
    for node in topological_order(graph, bush) {
        for arc in graph.neighbors(node) {
            if !bush.contains(arc.index()) {
                continue;
            }
            let end = arc.end().index();
            let new_min = min_dist[node.index()] + arc.cost();
            if min_dist[end] > new_min {
                min_dist[end] = new_min;
                trees.min[end] = Some(arc.index());
            }
            let new_max = max_dist[node.index()] + arc.cost();
            if max_dist[end] < new_max && bush.flow(arc.index()) > 0.0 {
                max_dist[end] = new_max;
                trees.max[end] = Some(arc.index());
            }
        }
    }
    trees
}

/// Returns the node where the min and max paths to `node` diverge, i.e., the first node of the
/// max path (walking backward) which is also on the min path.
///
/// Returns `None` if one of the paths is missing, if the two paths share their last arc's start
/// node or if no common node is found.
///
/// `visited` is a buffer cleared and reused by each call.
pub fn divergence_node(
    graph: &Graph,
    trees: &BushTrees,
    node: NodeIndex,
    visited: &mut HashSet<NodeIndex>,
) -> Option<NodeIndex> {
    let min_pred = trees.min[node.index()]?;
    let max_pred = trees.max[node.index()]?;
    if graph.arc(min_pred).start() == graph.arc(max_pred).start() {
        return None;
    }
    visited.clear();
    visited.extend(
        graph
            .path(&trees.min, node, None)
            .map(|arc| graph.arc(arc).start()),
    );
    graph
        .path(&trees.max, node, None)
        .map(|arc| graph.arc(arc).start())
        .find(|start| visited.contains(start))
}

/// Returns the divergence node of each node of the graph.
pub fn divergence_nodes(
    graph: &Graph,
    trees: &BushTrees,
    visited: &mut HashSet<NodeIndex>,
) -> Vec<Option<NodeIndex>> {
    (0..graph.nb_nodes())
        .map(|node| divergence_node(graph, trees, NodeIndex::new(node), visited))
        .collect()
}

/// Returns the flow to move from the max segment to the min segment so that both segments have
/// the same cost.
///
/// The flow is found by Newton's method and is bounded by the smallest bush flow on the max
/// segment.
pub fn flow_delta(graph: &Graph, bush: &Bush, segments: &Segments) -> f64 {
    let max_delta = segments
        .max
        .iter()
        .map(|&arc| bush.flow(arc))
        .fold(f64::INFINITY, f64::min);
    if max_delta <= 0.0 {
        return 0.0;
    }
    let mut delta = 0.0;
    for _ in 0..NEWTON_MAX_ITERATIONS {
        let (min_cost, min_der) = segments.min.iter().fold((0.0, 0.0), |(c, d), &arc| {
            let arc = graph.arc(arc);
            (c + arc.bpr(delta), d + arc.bpr_derivative(delta))
        });
        let (max_cost, max_der) = segments.max.iter().fold((0.0, 0.0), |(c, d), &arc| {
            let arc = graph.arc(arc);
            (c + arc.bpr(-delta), d + arc.bpr_derivative(-delta))
        });
        let next = delta + (max_cost - min_cost) / (max_der + min_der);
        if !next.is_finite() {
            debug!("Newton's method diverged when computing the flow to shift");
            break;
        }
        let converged = (delta - next).abs() < NEWTON_TOLERANCE;
        delta = next;
        if converged {
            break;
        }
    }
    delta.max(0.0).min(max_delta)
}

/// Moves `delta` flow from the max segment to the min segment, in the graph and in the bush.
pub fn shift_flows(graph: &mut Graph, bush: &mut Bush, segments: &Segments, delta: f64) {
    for &arc in &segments.min {
        graph.add_flow(arc, delta);
        bush.add_flow(arc, delta);
    }
    for &arc in &segments.max {
        graph.add_flow(arc, -delta);
        bush.add_flow(arc, -delta);
    }
}

/// Equalizes the cost of the min and max paths to each node of a bush, given the divergence
/// node of each node.
pub fn equilibrate_bush(
    graph: &mut Graph,
    bush: &mut Bush,
    trees: &BushTrees,
    divergence: &[Option<NodeIndex>],
) {
    for (node, lca) in divergence.iter().enumerate() {
        let Some(lca) = *lca else {
            continue;
        };
        let segments = Segments::new(graph, trees, NodeIndex::new(node), lca);
        let delta = flow_delta(graph, bush, &segments);
        if delta == 0.0 {
            continue;
        }
        shift_flows(graph, bush, &segments, delta);
    }
}

/// Removes the bush arcs with no bush flow, except the arcs of the min tree.
pub fn remove_unused_arcs(bush: &mut Bush, min_tree: &[Option<ArcIndex>]) {
    let unused: Vec<_> = bush.iter().filter(|&arc| bush.flow(arc) <= 0.0).collect();
    for arc in unused {
        bush.remove_arc(arc);
    }
    for arc in min_tree.iter().flatten() {
        bush.add_arc(*arc);
    }
}

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

//! Compressed sparse row storage of the road network.
use anyhow::{anyhow, Result};

use super::{Arc, ArcIndex, ArcSpec, NodeIndex};

/// A static directed graph whose first `nb_zones` nodes are zones.
///
/// The arcs are stored in a single vector, grouped by start node. The outgoing arcs of node `n`
/// are the arcs in `offsets[n]..offsets[n + 1]`. The index of each arc is its position in this
/// vector.
#[derive(Clone, Debug)]
pub struct Graph {
    offsets: Vec<usize>,
    arcs: Vec<Arc>,
    nb_zones: usize,
}

impl Graph {
    /// Creates a Graph from the list of outgoing arcs of each node.
    ///
    /// The order of the arcs within each node is preserved.
    pub fn from_adjacency(adjacency: Vec<Vec<ArcSpec>>, nb_zones: usize) -> Self {
        debug_assert!(nb_zones <= adjacency.len());
        let nb_arcs = adjacency.iter().map(|out| out.len()).sum();
        let mut offsets = Vec::with_capacity(adjacency.len() + 1);
        let mut arcs = Vec::with_capacity(nb_arcs);
        for (node, out_arcs) in adjacency.into_iter().enumerate() {
            offsets.push(arcs.len());
            for spec in out_arcs {
                debug_assert_eq!(spec.start.index(), node);
                let index = ArcIndex::new(arcs.len());
                arcs.push(Arc::new(spec, index));
            }
        }
        offsets.push(arcs.len());
        Graph {
            offsets,
            arcs,
            nb_zones,
        }
    }

    /// Creates a Graph with `nb_nodes` nodes from arcs given in any order.
    ///
    /// The arcs are grouped by start node, keeping their relative order.
    pub fn from_arcs<I>(nb_nodes: usize, nb_zones: usize, arcs: I) -> Self
    where
        I: IntoIterator<Item = ArcSpec>,
    {
        let mut adjacency = vec![Vec::new(); nb_nodes];
        for spec in arcs {
            adjacency[spec.start.index()].push(spec);
        }
        Graph::from_adjacency(adjacency, nb_zones)
    }

    /// Returns the number of nodes in the graph.
    pub fn nb_nodes(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Returns the number of zones in the graph.
    pub const fn nb_zones(&self) -> usize {
        self.nb_zones
    }

    /// Returns the number of arcs in the graph.
    pub fn nb_arcs(&self) -> usize {
        self.arcs.len()
    }

    /// Returns all the arcs of the graph, ordered by index.
    pub fn arcs(&self) -> &[Arc] {
        &self.arcs
    }

    /// Returns the arc with the given index.
    pub fn arc(&self, index: ArcIndex) -> &Arc {
        &self.arcs[index.index()]
    }

    /// Returns the outgoing arcs of a node.
    pub fn neighbors(&self, node: NodeIndex) -> &[Arc] {
        &self.arcs[self.offsets[node.index()]..self.offsets[node.index() + 1]]
    }

    /// Returns the first arc going from `start` to `end`.
    pub fn find_arc(&self, start: NodeIndex, end: NodeIndex) -> Result<&Arc> {
        self.neighbors(start)
            .iter()
            .find(|arc| arc.end() == end)
            .ok_or_else(|| {
                anyhow!(
                    "No arc from node {} to node {}",
                    start.index(),
                    end.index()
                )
            })
    }

    /// Adds `delta` to the flow of an arc.
    ///
    /// The cost of the arc is not updated.
    pub fn add_flow(&mut self, index: ArcIndex, delta: f64) {
        self.arcs[index.index()].add_flow(delta);
    }

    /// Recomputes the cost of every arc from its current flow.
    pub fn update_costs(&mut self) {
        self.arcs.iter_mut().for_each(Arc::update_cost);
    }

    /// Returns an iterator over the arcs of the path from `node` back to `stop`, following a
    /// predecessor tree.
    ///
    /// If `stop` is `None` (or is never met), the iteration ends at the first node without
    /// predecessor.
    pub fn path<'a>(
        &'a self,
        predecessors: &'a [Option<ArcIndex>],
        node: NodeIndex,
        stop: Option<NodeIndex>,
    ) -> PathArcs<'a> {
        PathArcs {
            graph: self,
            predecessors,
            current: node,
            stop,
        }
    }
}

/// Iterator over the arcs of a path, walking backward from its last node.
///
/// See [Graph::path].
#[derive(Clone, Debug)]
pub struct PathArcs<'a> {
    graph: &'a Graph,
    predecessors: &'a [Option<ArcIndex>],
    current: NodeIndex,
    stop: Option<NodeIndex>,
}

impl Iterator for PathArcs<'_> {
    type Item = ArcIndex;
    fn next(&mut self) -> Option<Self::Item> {
        if self.stop == Some(self.current) {
            return None;
        }
        let arc = self.predecessors[self.current.index()]?;
        self.current = self.graph.arc(arc).start();
        Some(arc)
    }
}

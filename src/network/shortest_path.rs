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

//! Single-source shortest paths over the whole graph.
use super::{Graph, NodeIndex, Predecessors};
use crate::queue::{BinaryHeapQueue, MinPriorityQueue};

/// Result of a shortest-path search from a root node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShortestPathTree {
    /// Distance from the root to each node (infinite for the unreachable nodes).
    pub distances: Vec<f64>,
    /// Last arc of the shortest path to each node.
    pub predecessors: Predecessors,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Label {
    Unseen,
    Open,
    Closed,
}

impl Graph {
    /// Runs a Dijkstra search from `root`, using the cached cost of the arcs.
    pub fn min_tree(&self, root: NodeIndex) -> ShortestPathTree {
        let nb_nodes = self.nb_nodes();
        let mut distances = vec![f64::INFINITY; nb_nodes];
        let mut predecessors = vec![None; nb_nodes];
        let mut labels = vec![Label::Unseen; nb_nodes];
        let mut queue = BinaryHeapQueue::with_capacity(nb_nodes);

        distances[root.index()] = 0.0;
        labels[root.index()] = Label::Open;
        queue.push(root, 0.0);
        while let Some((node, dist)) = queue.pop() {
            labels[node.index()] = Label::Closed;
            for arc in self.neighbors(node) {
                let next = arc.end().index();
                let new_dist = dist + arc.cost();
                match labels[next] {
                    Label::Closed => {}
                    Label::Unseen => {
                        labels[next] = Label::Open;
                        distances[next] = new_dist;
                        predecessors[next] = Some(arc.index());
                        queue.push(arc.end(), new_dist);
                    }
                    Label::Open => {
                        if new_dist < distances[next] {
                            distances[next] = new_dist;
                            predecessors[next] = Some(arc.index());
                            queue.decrease_value(arc.end(), new_dist);
                        }
                    }
                }
            }
        }
        ShortestPathTree {
            distances,
            predecessors,
        }
    }
}

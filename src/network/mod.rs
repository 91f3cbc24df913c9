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

//! Road network: compact graph storage, arc cost model and shortest-path oracle.
mod arc;
pub(crate) mod graph;
mod metrics;
mod shortest_path;

pub use self::arc::{Arc, ArcSpec};
pub use self::graph::{Graph, PathArcs};
pub use self::shortest_path::ShortestPathTree;

/// A predecessor tree: for each node, the index of the arc used to reach it (`None` at the root
/// and at the nodes that cannot be reached).
pub type Predecessors = Vec<Option<ArcIndex>>;

/// Index of a node in a [Graph].
///
/// The first `nb_zones` nodes of a graph are zones.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeIndex(usize);

impl NodeIndex {
    /// Creates a new NodeIndex.
    pub const fn new(x: usize) -> Self {
        NodeIndex(x)
    }

    /// Returns the index of the NodeIndex.
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Short version of `NodeIndex::new`.
pub const fn node_index(index: usize) -> NodeIndex {
    NodeIndex::new(index)
}

/// Index of an arc in the global arc sequence of a [Graph].
///
/// The index of an arc is assigned when the graph is built and never changes afterwards.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArcIndex(usize);

impl ArcIndex {
    /// Creates a new ArcIndex.
    pub const fn new(x: usize) -> Self {
        ArcIndex(x)
    }

    /// Returns the index of the ArcIndex.
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Short version of `ArcIndex::new`.
pub const fn arc_index(index: usize) -> ArcIndex {
    ArcIndex::new(index)
}

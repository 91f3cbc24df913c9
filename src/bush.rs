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

//! Per-origin working subgraph.
use fixedbitset::FixedBitSet;

use crate::network::{ArcIndex, NodeIndex};

/// The bush of an origin: an acyclic subgraph rooted at the origin, together with the part of
/// the arc flows that is due to the trips from this origin.
///
/// Membership and flows are indexed by the global index of the arcs.
#[derive(Clone, Debug)]
pub struct Bush {
    root: NodeIndex,
    arcs: FixedBitSet,
    flows: Vec<f64>,
}

impl Bush {
    /// Creates an empty bush for a graph with `nb_arcs` arcs.
    pub fn new(root: NodeIndex, nb_arcs: usize) -> Self {
        Bush {
            root,
            arcs: FixedBitSet::with_capacity(nb_arcs),
            flows: vec![0.0; nb_arcs],
        }
    }

    /// Returns the origin of the bush.
    pub const fn root(&self) -> NodeIndex {
        self.root
    }

    /// Returns `true` if the arc belongs to the bush.
    pub fn contains(&self, arc: ArcIndex) -> bool {
        self.arcs.contains(arc.index())
    }

    pub fn add_arc(&mut self, arc: ArcIndex) {
        self.arcs.insert(arc.index());
    }

    /// Removes the arc from the bush.
    ///
    /// The bush flow of the arc is left unchanged.
    pub fn remove_arc(&mut self, arc: ArcIndex) {
        self.arcs.set(arc.index(), false);
    }

    /// Returns the flow of the arc due to this bush.
    pub fn flow(&self, arc: ArcIndex) -> f64 {
        self.flows[arc.index()]
    }

    pub fn add_flow(&mut self, arc: ArcIndex, delta: f64) {
        self.flows[arc.index()] += delta;
    }

    /// Returns the number of arcs in the bush.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.arcs.count_ones(..)
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.arcs.is_clear()
    }

    /// Returns an iterator over the arcs of the bush, in increasing index order.
    pub fn iter(&self) -> impl Iterator<Item = ArcIndex> + '_ {
        self.arcs.ones().map(ArcIndex::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{arc_index, node_index};

    #[test]
    fn bush_test() {
        let mut bush = Bush::new(node_index(2), 10);
        assert_eq!(bush.root(), node_index(2));
        assert!(bush.is_empty());
        bush.add_arc(arc_index(7));
        bush.add_arc(arc_index(3));
        bush.add_arc(arc_index(7));
        assert!(bush.contains(arc_index(3)));
        assert!(!bush.contains(arc_index(4)));
        assert_eq!(bush.len(), 2);
        assert_eq!(bush.iter().collect::<Vec<_>>(), vec![arc_index(3), arc_index(7)]);
        bush.add_flow(arc_index(3), 10.0);
        bush.add_flow(arc_index(3), -4.0);
        assert_eq!(bush.flow(arc_index(3)), 6.0);
        bush.remove_arc(arc_index(3));
        assert!(!bush.contains(arc_index(3)));
        assert_eq!(bush.flow(arc_index(3)), 6.0);
        assert_eq!(bush.len(), 1);
    }
}

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

//! Description of an [Arc] and its volume-delay function.
use super::{ArcIndex, NodeIndex};

/// Coefficient `alpha` of the BPR volume-delay function.
const BPR_ALPHA: f64 = 0.15;

/// Record used to describe an arc when building a [Graph](super::Graph).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcSpec {
    /// Node at which the arc starts.
    pub start: NodeIndex,
    /// Node at which the arc ends.
    pub end: NodeIndex,
    /// Capacity of the arc.
    pub capacity: f64,
    /// Free-flow travel time of the arc.
    pub free_flow: f64,
    /// Initial flow on the arc.
    pub flow: f64,
}

impl ArcSpec {
    /// Creates a new ArcSpec with no initial flow.
    pub const fn new(start: NodeIndex, end: NodeIndex, capacity: f64, free_flow: f64) -> Self {
        ArcSpec {
            start,
            end,
            capacity,
            free_flow,
            flow: 0.0,
        }
    }

    /// Returns the same ArcSpec with the given initial flow.
    pub const fn with_flow(mut self, flow: f64) -> Self {
        self.flow = flow;
        self
    }
}

/// A directed arc of the road network.
///
/// The cost of the arc is cached: it is only refreshed by [Arc::update_cost], not when the flow
/// changes.
#[derive(Clone, Debug, PartialEq)]
pub struct Arc {
    start: NodeIndex,
    end: NodeIndex,
    /// Position of the arc in the global arc sequence of the graph.
    index: ArcIndex,
    capacity: f64,
    free_flow: f64,
    /// Current flow (sum of the flows of all the bushes).
    flow: f64,
    /// Cost at the time of the last update.
    cost: f64,
}

impl Arc {
    pub(crate) fn new(spec: ArcSpec, index: ArcIndex) -> Self {
        Arc {
            start: spec.start,
            end: spec.end,
            index,
            capacity: spec.capacity,
            free_flow: spec.free_flow,
            flow: spec.flow,
            cost: 0.0,
        }
    }

    /// Returns the node at which the arc starts.
    pub const fn start(&self) -> NodeIndex {
        self.start
    }

    /// Returns the node at which the arc ends.
    pub const fn end(&self) -> NodeIndex {
        self.end
    }

    /// Returns the index of the arc in the graph.
    pub const fn index(&self) -> ArcIndex {
        self.index
    }

    /// Returns the capacity of the arc.
    #[cfg(test)]
    pub(crate) const fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Returns the free-flow travel time of the arc.
    #[cfg(test)]
    pub(crate) const fn free_flow(&self) -> f64 {
        self.free_flow
    }

    /// Returns the current flow of the arc.
    pub const fn flow(&self) -> f64 {
        self.flow
    }

    /// Returns the cached cost of the arc.
    ///
    /// The value corresponds to the flow at the time of the last call to [Arc::update_cost].
    pub const fn cost(&self) -> f64 {
        self.cost
    }

    /// Adds `delta` to the current flow.
    pub fn add_flow(&mut self, delta: f64) {
        self.flow += delta;
    }

    /// Recomputes the cached cost from the current flow.
    pub fn update_cost(&mut self) {
        self.cost = self.bpr(0.0);
    }

    /// Returns the cost of the arc if its flow was `flow + delta`:
    /// `t0 * (1 + 0.15 * (x / c)^4)`.
    pub fn bpr(&self, delta: f64) -> f64 {
        let ratio = (self.flow + delta) / self.capacity;
        self.free_flow * (1.0 + BPR_ALPHA * ratio.powi(4))
    }

    /// Returns the derivative of the cost function at flow `flow + delta`:
    /// `0.6 * t0 * (x / c)^3 / c`.
    pub fn bpr_derivative(&self, delta: f64) -> f64 {
        let ratio = (self.flow + delta) / self.capacity;
        4.0 * BPR_ALPHA * self.free_flow * ratio.powi(3) / self.capacity
    }

    /// Returns the integral of the cost function between 0 and `flow + delta`:
    /// `t0 * x * (1 + 0.03 * (x / c)^4)`.
    pub fn bpr_integral(&self, delta: f64) -> f64 {
        let x = self.flow + delta;
        let ratio = x / self.capacity;
        self.free_flow * x * (1.0 + BPR_ALPHA / 5.0 * ratio.powi(4))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{arc_index, node_index};

    fn get_arc(capacity: f64, free_flow: f64, flow: f64) -> Arc {
        let spec = ArcSpec::new(node_index(0), node_index(1), capacity, free_flow).with_flow(flow);
        Arc::new(spec, arc_index(0))
    }

    #[test]
    fn bpr_test() {
        let arc = get_arc(1.0, 1.0, 1.0);
        assert!((arc.bpr(0.0) - 1.15).abs() < 1e-12);
        // Flow 2 = 1 + 1.
        assert!((arc.bpr(1.0) - (1.0 + 0.15 * 16.0)).abs() < 1e-12);
        // Free-flow cost.
        assert!((arc.bpr(-1.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn bpr_derivative_test() {
        let arc = get_arc(2.0, 10.0, 4.0);
        // ratio = 2, 0.6 * 10 * 8 / 2 = 24.
        assert!((arc.bpr_derivative(0.0) - 24.0).abs() < 1e-12);
        // Numerical derivative.
        let h = 1e-6;
        let num = (arc.bpr(h) - arc.bpr(-h)) / (2.0 * h);
        assert!((arc.bpr_derivative(0.0) - num).abs() < 1e-4, "{num}");
    }

    #[test]
    fn bpr_integral_test() {
        let arc = get_arc(1000.0, 5.0, 0.0);
        assert_eq!(arc.bpr_integral(0.0), 0.0);
        let arc = get_arc(1000.0, 5.0, 1000.0);
        assert!((arc.bpr_integral(0.0) - 5.0 * 1000.0 * 1.03).abs() < 1e-9);
        // The derivative of the integral is the cost.
        let h = 1e-4;
        let num = (arc.bpr_integral(h) - arc.bpr_integral(-h)) / (2.0 * h);
        assert!((arc.bpr(0.0) - num).abs() < 1e-6, "{num}");
    }

    #[test]
    fn cost_is_cached_test() {
        let mut arc = get_arc(1.0, 1.0, 0.0);
        assert_eq!(arc.cost(), 0.0);
        arc.update_cost();
        assert_eq!(arc.cost(), 1.0);
        arc.add_flow(1.0);
        assert_eq!(arc.flow(), 1.0);
        assert_eq!(arc.cost(), 1.0);
        arc.update_cost();
        assert!((arc.cost() - 1.15).abs() < 1e-12);
    }
}

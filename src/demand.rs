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

//! Origin-destination demand.
use crate::network::NodeIndex;

/// Dense square matrix of the number of trips between each pair of zones.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DemandMatrix {
    nb_zones: usize,
    /// Trips in row-major order.
    trips: Vec<f64>,
}

impl DemandMatrix {
    /// Creates a DemandMatrix with no trips.
    pub fn new(nb_zones: usize) -> Self {
        DemandMatrix {
            nb_zones,
            trips: vec![0.0; nb_zones * nb_zones],
        }
    }

    pub const fn nb_zones(&self) -> usize {
        self.nb_zones
    }

    /// Returns the number of trips from `origin` to `destination`.
    #[cfg(test)]
    pub(crate) fn get(&self, origin: NodeIndex, destination: NodeIndex) -> f64 {
        self.trips[origin.index() * self.nb_zones + destination.index()]
    }

    /// Sets the number of trips from `origin` to `destination`.
    pub fn set(&mut self, origin: NodeIndex, destination: NodeIndex, trips: f64) {
        self.trips[origin.index() * self.nb_zones + destination.index()] = trips;
    }

    /// Returns the number of trips from `origin` to each destination.
    pub fn row(&self, origin: NodeIndex) -> &[f64] {
        let start = origin.index() * self.nb_zones;
        &self.trips[start..start + self.nb_zones]
    }

    /// Returns the total number of trips.
    pub fn total(&self) -> f64 {
        self.trips.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::node_index;

    #[test]
    fn demand_matrix_test() {
        let mut demand = DemandMatrix::new(3);
        assert_eq!(demand.nb_zones(), 3);
        assert_eq!(demand.total(), 0.0);
        demand.set(node_index(1), node_index(2), 10.0);
        demand.set(node_index(2), node_index(0), 5.0);
        assert_eq!(demand.get(node_index(1), node_index(2)), 10.0);
        assert_eq!(demand.get(node_index(2), node_index(1)), 0.0);
        assert_eq!(demand.row(node_index(1)), &[0.0, 0.0, 10.0]);
        assert_eq!(demand.total(), 15.0);
        assert_eq!(demand.row(node_index(2)), &[5.0, 0.0, 0.0]);
    }
}

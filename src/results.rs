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

//! Results of an assignment run.
use std::time::Duration;

use serde_derive::{Deserialize, Serialize};
use serde_with::{serde_as, DurationSecondsWithFrac};

use crate::network::{Arc, NodeIndex};

/// Final flow and cost of an arc.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcResult {
    pub start: NodeIndex,
    pub end: NodeIndex,
    pub flow: f64,
    pub cost: f64,
}

impl From<&Arc> for ArcResult {
    fn from(arc: &Arc) -> Self {
        ArcResult {
            start: arc.start(),
            end: arc.end(),
            flow: arc.flow(),
            cost: arc.cost(),
        }
    }
}

/// Diagnostics computed at the end of an iteration.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct IterationDiagnostics {
    /// Index of the iteration (starting at 0).
    pub iteration: u64,
    /// Value of the objective function at the end of the iteration.
    pub objective: f64,
    /// Gap at the end of the iteration (only computed when a target relative gap is set).
    pub gap: Option<f64>,
    /// Relative gap at the end of the iteration (only computed when a target relative gap is
    /// set).
    pub relative_gap: Option<f64>,
    /// Time spent on the iteration.
    #[serde_as(as = "DurationSecondsWithFrac<f64>")]
    pub running_time: Duration,
}

/// Summary of a run.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct RunSummary {
    /// Number of worker threads (0 for the sequential algorithm).
    pub nb_threads: usize,
    /// Value of the objective function after the initial all-or-nothing assignment.
    pub initial_objective: f64,
    /// Value of the objective function at the end of the run.
    pub final_objective: f64,
    /// Diagnostics of each iteration.
    pub iterations: Vec<IterationDiagnostics>,
    /// Total running time of the algorithm.
    #[serde_as(as = "DurationSecondsWithFrac<f64>")]
    pub running_time: Duration,
}

/// Output of the assignment algorithm.
#[derive(Clone, Debug, PartialEq)]
pub struct AssignmentResults {
    /// Final state of each arc, in graph order.
    pub arcs: Vec<ArcResult>,
    /// Diagnostics of the run.
    pub summary: RunSummary,
}

impl AssignmentResults {
    /// Returns the relative gap of the last iteration, if it was computed.
    pub fn last_relative_gap(&self) -> Option<f64> {
        self.summary
            .iterations
            .last()
            .and_then(|diag| diag.relative_gap)
    }
}

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

//! Observers notified of the progress of the assignment algorithm.
use std::time::Duration;

use log::info;

use crate::progress_bar::BushProgressBar;
use crate::results::IterationDiagnostics;

/// Description of a run, sent to the observer before the first iteration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunHeader {
    /// Number of worker threads (0 for the sequential algorithm).
    pub nb_threads: usize,
    pub max_iterations: u64,
    /// Target relative gap (0 if disabled).
    pub target_relative_gap: f64,
    /// Value of the objective function after the initial all-or-nothing assignment.
    pub initial_objective: f64,
}

/// Trait for collaborators notified at the checkpoints of the algorithm.
///
/// All the methods do nothing by default.
pub trait AssignmentObserver {
    /// Called once the bushes are created, before the first iteration.
    fn on_start(&mut self, _header: &RunHeader) {}
    /// Called at the start of each iteration.
    fn on_iteration_start(&mut self, _iteration: u64, _nb_bushes: usize) {}
    /// Called each time some bushes have been processed during an iteration.
    fn on_bushes_processed(&mut self, _nb_bushes: usize) {}
    /// Called at the end of each iteration.
    fn on_iteration_end(&mut self, _diagnostics: &IterationDiagnostics) {}
    /// Called when the algorithm stops.
    fn on_finish(&mut self, _nb_iterations: u64, _running_time: Duration) {}
}

/// Observer that ignores all notifications.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl AssignmentObserver for NoopObserver {}

/// Observer that logs the progress of the algorithm and displays a progress bar during the
/// iterations.
#[derive(Debug, Default)]
pub struct LogObserver {
    bp: Option<BushProgressBar>,
}

impl AssignmentObserver for LogObserver {
    fn on_start(&mut self, header: &RunHeader) {
        if header.nb_threads == 0 {
            info!("Static traffic assignment with Algorithm B (sequential)");
        } else {
            info!(
                "Static traffic assignment with Algorithm B ({} threads)",
                header.nb_threads
            );
        }
        info!("Maximum number of iterations: {}", header.max_iterations);
        if header.target_relative_gap != 0.0 {
            info!("Target relative gap: {:.15}", header.target_relative_gap);
        }
        info!("Initial objective: {:.15}", header.initial_objective);
    }

    fn on_iteration_start(&mut self, iteration: u64, nb_bushes: usize) {
        info!("===== Iteration {} =====", iteration);
        self.bp = Some(BushProgressBar::new(nb_bushes));
    }

    fn on_bushes_processed(&mut self, nb_bushes: usize) {
        if let Some(bp) = &self.bp {
            bp.inc(nb_bushes);
        }
    }

    fn on_iteration_end(&mut self, diagnostics: &IterationDiagnostics) {
        if let Some(bp) = self.bp.take() {
            bp.finish();
        }
        info!("Objective: {:.15}", diagnostics.objective);
        if let Some(gap) = diagnostics.gap {
            info!("Gap: {:.15}", gap);
        }
        if let Some(relative_gap) = diagnostics.relative_gap {
            info!("Relative gap: {:.15}", relative_gap);
        }
        info!("Running time: {:.3}s", diagnostics.running_time.as_secs_f64());
    }

    fn on_finish(&mut self, nb_iterations: u64, running_time: Duration) {
        info!(
            "Assignment finished after {} iterations ({:.3}s)",
            nb_iterations,
            running_time.as_secs_f64()
        );
    }
}

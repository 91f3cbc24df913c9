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

//! Progress bar displayed while the bushes of an iteration are processed.
use indicatif::{ProgressBar, ProgressStyle};
use log::{log_enabled, Level};

/// A progress bar over the bushes of an iteration.
///
/// The bar is hidden when info-level logging is disabled.
#[derive(Debug, Clone)]
pub struct BushProgressBar {
    bp: ProgressBar,
}

impl BushProgressBar {
    /// Returns a [BushProgressBar] of given length.
    pub fn new(length: usize) -> Self {
        let bp = if log_enabled!(Level::Info) {
            ProgressBar::new(length as u64)
        } else {
            ProgressBar::hidden()
        };
        bp.set_style(
            ProgressStyle::default_bar()
                .template("{bar:60} {pos}/{len} bushes ETA: {eta}")
                .unwrap(),
        );
        BushProgressBar { bp }
    }

    /// Increments the progress bar by `n`.
    pub fn inc(&self, n: usize) {
        self.bp.inc(n as u64);
    }

    /// Returns the current position of the progress bar.
    #[cfg(test)]
    pub(crate) fn position(&self) -> u64 {
        self.bp.position()
    }

    /// Sets the progress bar to finished.
    pub fn finish(&self) {
        self.bp.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_bar_test() {
        let bar = BushProgressBar::new(10);
        bar.inc(3);
        bar.inc(4);
        assert_eq!(bar.position(), 7);
        bar.finish();
    }
}

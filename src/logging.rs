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

//! Logging to the terminal and to a file.
use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use simplelog::{
    ColorChoice, CombinedLogger, Config, LevelFilter, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

/// Name of the log file created in the output directory.
pub const LOG_FILENAME: &str = "log.txt";

/// Initializes logging to the terminal (info level) and to the file `log.txt` of the output
/// directory (debug level).
pub fn initialize_logging(output: &Path) -> Result<()> {
    let log_filename = output.join(LOG_FILENAME);
    let log_file = File::create(&log_filename)
        .with_context(|| format!("Failed to create log file `{:?}`", log_filename))?;
    let loggers: Vec<Box<dyn SharedLogger>> = vec![
        TermLogger::new(
            LevelFilter::Info,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Debug, Config::default(), log_file),
    ];
    CombinedLogger::init(loggers).context("Failed to initialize logging")
}

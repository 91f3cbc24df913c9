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

//! Writer for the final arc flows.
use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use csv::WriterBuilder;

use crate::results::ArcResult;

/// Writes the flow and cost of each arc as a tab-separated table with columns `From`, `To`,
/// `Volume` and `Cost`.
///
/// Nodes are written with 1-based ids.
pub fn write_flows<W: Write>(writer: W, arcs: &[ArcResult]) -> Result<()> {
    let mut writer = WriterBuilder::new().delimiter(b'\t').from_writer(writer);
    writer.write_record(["From", "To", "Volume", "Cost"])?;
    for arc in arcs {
        writer.write_record([
            (arc.start.index() + 1).to_string(),
            (arc.end.index() + 1).to_string(),
            format!("{:.15}", arc.flow),
            format!("{:.15}", arc.cost),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes the flow and cost of each arc to the given file.
pub fn write_flows_file(filename: &Path, arcs: &[ArcResult]) -> Result<()> {
    let file = File::create(filename)
        .with_context(|| format!("Unable to create file `{filename:?}`"))?;
    write_flows(file, arcs).with_context(|| format!("Unable to write flows to `{filename:?}`"))
}

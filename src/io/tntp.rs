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

//! Readers for the TNTP network and trip table formats.
//!
//! A TNTP file starts with a header of `<KEY> value` lines, terminated by `<END OF METADATA>`.
//! Everything after a `~` is a comment. Node and zone ids are 1-based in the files.
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};
use hashbrown::HashMap;
use log::warn;

use crate::demand::DemandMatrix;
use crate::network::{node_index, ArcSpec, Graph};

const COMMENT_SIGN: char = '~';
const HEADER_END: &str = "<END OF METADATA>";
const NB_ZONES_KEY: &str = "<NUMBER OF ZONES>";
const NB_NODES_KEY: &str = "<NUMBER OF NODES>";
const ORIGIN_KEYWORD: &str = "Origin";
/// Free-flow travel time used for the arcs with a zero free-flow travel time.
const MIN_FREE_FLOW: f64 = 1e-4;

/// Iterator over the non-empty lines of a file, with comments removed, together with their
/// 1-based line number.
struct Lines<R> {
    inner: std::io::Lines<R>,
    line_number: usize,
}

impl<R: BufRead> Lines<R> {
    fn new(reader: R) -> Self {
        Lines {
            inner: reader.lines(),
            line_number: 0,
        }
    }
}

impl<R: BufRead> Iterator for Lines<R> {
    type Item = Result<(usize, String)>;
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.inner.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e).context("Unable to read line")),
            };
            self.line_number += 1;
            let content = line.split(COMMENT_SIGN).next().unwrap_or("").trim();
            if !content.is_empty() {
                return Some(Ok((self.line_number, content.to_owned())));
            }
        }
    }
}

/// Reads the header, until the end-of-metadata line.
fn read_header<R: BufRead>(lines: &mut Lines<R>) -> Result<HashMap<String, String>> {
    let mut header = HashMap::new();
    for line in lines.by_ref() {
        let (_, line) = line?;
        if line == HEADER_END {
            return Ok(header);
        }
        let (key, value) = match line.split_once('>') {
            Some((key, value)) => (format!("{}>", key.trim()), value.trim()),
            None => (line.clone(), ""),
        };
        header.insert(key, value.to_owned());
    }
    bail!("Missing `{HEADER_END}` line")
}

fn header_value<T>(header: &HashMap<String, String>, key: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = header
        .get(key)
        .ok_or_else(|| anyhow!("Missing `{key}` in header"))?;
    value
        .parse()
        .with_context(|| format!("Invalid value for `{key}`: `{value}`"))
}

fn parse_field<T>(value: &str, name: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .parse()
        .with_context(|| format!("Invalid {name}: `{value}`"))
}

/// Converts a 1-based id to a 0-based index, checking that it is at most `max`.
fn to_index(id: usize, max: usize, name: &str) -> Result<usize> {
    if id == 0 || id > max {
        bail!("Invalid {name} {id} (must be between 1 and {max})");
    }
    Ok(id - 1)
}

/// Reads a [Graph] from a TNTP network file.
///
/// Each data line is `init_node term_node capacity length free_flow_time ...`. The arcs with a
/// zero free-flow travel time are given a small positive free-flow travel time.
pub fn read_network<R: BufRead>(reader: R) -> Result<Graph> {
    let mut lines = Lines::new(reader);
    let header = read_header(&mut lines)?;
    let nb_nodes: usize = header_value(&header, NB_NODES_KEY)?;
    let nb_zones: usize = header_value(&header, NB_ZONES_KEY)?;
    if nb_zones > nb_nodes {
        bail!("The number of zones ({nb_zones}) is larger than the number of nodes ({nb_nodes})");
    }
    let mut adjacency = vec![Vec::new(); nb_nodes];
    let mut nb_floored = 0;
    for line in lines {
        let (line_number, line) = line?;
        let spec = parse_arc(&line, nb_nodes)
            .with_context(|| format!("Invalid arc at line {line_number}"))?;
        let spec = if spec.free_flow == 0.0 {
            nb_floored += 1;
            ArcSpec {
                free_flow: MIN_FREE_FLOW,
                ..spec
            }
        } else {
            spec
        };
        adjacency[spec.start.index()].push(spec);
    }
    if nb_floored > 0 {
        warn!("{nb_floored} arcs have a zero free-flow travel time, using {MIN_FREE_FLOW} instead");
    }
    Ok(Graph::from_adjacency(adjacency, nb_zones))
}

fn parse_arc(line: &str, nb_nodes: usize) -> Result<ArcSpec> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 5 {
        bail!("Expected at least 5 fields, got {}", fields.len());
    }
    let start = to_index(parse_field(fields[0], "init node")?, nb_nodes, "node")?;
    let end = to_index(parse_field(fields[1], "term node")?, nb_nodes, "node")?;
    let capacity = parse_field(fields[2], "capacity")?;
    let free_flow = parse_field(fields[4], "free-flow time")?;
    Ok(ArcSpec::new(
        node_index(start),
        node_index(end),
        capacity,
        free_flow,
    ))
}

/// Reads a [DemandMatrix] from a TNTP trip table file.
///
/// An `Origin k` line selects the origin of the following `destination : trips ;` pairs.
pub fn read_demand<R: BufRead>(reader: R) -> Result<DemandMatrix> {
    let mut lines = Lines::new(reader);
    let header = read_header(&mut lines)?;
    let nb_zones: usize = header_value(&header, NB_ZONES_KEY)?;
    let mut demand = DemandMatrix::new(nb_zones);
    let mut origin = None;
    for line in lines {
        let (line_number, line) = line?;
        if let Some(id) = line.strip_prefix(ORIGIN_KEYWORD) {
            let id = parse_field(id.trim(), "origin")
                .and_then(|id| to_index(id, nb_zones, "origin"))
                .with_context(|| format!("Invalid origin at line {line_number}"))?;
            origin = Some(id);
            continue;
        }
        let Some(origin) = origin else {
            bail!("Unexpected trips at line {line_number}: no origin has been set");
        };
        for pair in line.split(';') {
            let pair: String = pair.chars().filter(|c| !c.is_whitespace()).collect();
            if pair.is_empty() {
                continue;
            }
            let (destination, trips) = parse_trips(&pair, nb_zones)
                .with_context(|| format!("Invalid trips at line {line_number}"))?;
            demand.set(node_index(origin), node_index(destination), trips);
        }
    }
    Ok(demand)
}

fn parse_trips(pair: &str, nb_zones: usize) -> Result<(usize, f64)> {
    let (destination, trips) = pair
        .split_once(':')
        .ok_or_else(|| anyhow!("Expected `destination : trips`, got `{pair}`"))?;
    let destination = to_index(parse_field(destination, "destination")?, nb_zones, "zone")?;
    let trips: f64 = parse_field(trips, "number of trips")?;
    if trips < 0.0 {
        bail!("Negative number of trips: {trips}");
    }
    Ok((destination, trips))
}

/// Reads a [Graph] from the TNTP network file at the given path.
pub fn read_network_file(filename: &Path) -> Result<Graph> {
    let file =
        File::open(filename).with_context(|| format!("Unable to open file `{filename:?}`"))?;
    read_network(BufReader::new(file))
        .with_context(|| format!("Unable to read network from `{filename:?}`"))
}

/// Reads a [DemandMatrix] from the TNTP trip table file at the given path.
pub fn read_demand_file(filename: &Path) -> Result<DemandMatrix> {
    let file =
        File::open(filename).with_context(|| format!("Unable to open file `{filename:?}`"))?;
    read_demand(BufReader::new(file))
        .with_context(|| format!("Unable to read demand from `{filename:?}`"))
}

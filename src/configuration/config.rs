//! Run configuration and the JSON wire format.
//!
//! Input is a stream of newline-delimited records, one body per line:
//!
//! ```text
//! {"Command":"ADD","Mass":1.2,"Id":0,"Position":[500,500],"Velocity":[1.0,0.0]}
//! ```
//!
//! `ADD` is the only recognized command. Console output is a single JSON
//! array of [`TrajectoryRecord`]s. Any malformed record is fatal before the
//! step loop starts.

use std::io::{BufRead, Lines};
use std::sync::Mutex;

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

use crate::simulation::barnes_hut::Rect;
use crate::simulation::params::THETA;
use crate::simulation::states::{Body, NVec2};

/// One framed input record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InputRecord {
    pub command: String,
    pub mass: f32,
    pub id: i32,
    pub position: [f32; 2],
    pub velocity: [f32; 2],
}

impl InputRecord {
    /// Validate the record and turn it into a simulation body.
    pub fn into_body(self) -> Result<Body> {
        ensure!(
            self.command == "ADD",
            "unrecognized command {:?} (only ADD is supported)",
            self.command
        );
        ensure!(self.mass > 0.0, "body mass must be positive, got {}", self.mass);
        ensure!(self.id >= 0, "body id must be non-negative, got {}", self.id);

        Ok(Body::new(
            self.mass,
            self.id,
            NVec2::new(self.position[0], self.position[1]),
            NVec2::new(self.velocity[0], self.velocity[1]),
        ))
    }
}

/// One body's recorded trajectory: the initial position followed by one
/// sample per simulated step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TrajectoryRecord {
    pub id: i32,
    pub position: Vec<[f32; 2]>,
}

/// Settings shared by every run mode.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub width: f32,
    pub height: f32,
    /// Worker thread count; 0 selects the sequential engine in console mode
    pub threads: usize,
    /// Barnes-Hut opening angle; [`THETA`] unless overridden
    pub theta: f32,
}

impl RunConfig {
    pub fn new(width: f32, height: f32, threads: usize) -> Self {
        Self {
            width,
            height,
            threads,
            theta: THETA,
        }
    }

    /// The root rectangle the tree is built over.
    pub fn domain(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

fn parse_record(line: &str) -> Result<Body> {
    let record: InputRecord = serde_json::from_str(line)
        .with_context(|| format!("malformed input record: {line}"))?;
    record.into_body()
}

/// Decode every record from `input` until EOF. Blank lines are skipped.
pub fn read_bodies<R: BufRead>(input: R) -> Result<Vec<Body>> {
    let mut bodies = Vec::new();

    for line in input.lines() {
        let line = line.context("failed to read input record")?;
        if line.trim().is_empty() {
            continue;
        }
        bodies.push(parse_record(&line)?);
    }

    Ok(bodies)
}

/// Line decoder shared by the parallel reader threads. The mutex makes
/// each framed decode atomic: a reader takes the lock, consumes exactly
/// one line, and parses it before the next reader gets a turn.
pub struct SharedDecoder<R> {
    lines: Mutex<Lines<R>>,
}

impl<R: BufRead> SharedDecoder<R> {
    pub fn new(input: R) -> Self {
        Self {
            lines: Mutex::new(input.lines()),
        }
    }

    /// Next decoded body, `None` at EOF.
    pub fn next_body(&self) -> Option<Result<Body>> {
        let mut lines = self.lines.lock().unwrap();

        loop {
            match lines.next()?.context("failed to read input record") {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => return Some(parse_record(&line)),
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// Trajectories are stored in an array slot per id, so every id must fit
/// as an index into the body array.
pub fn check_ids(bodies: &[Body]) -> Result<()> {
    for b in bodies {
        ensure!(
            (b.id as usize) < bodies.len(),
            "body id {} does not fit a {}-body array",
            b.id,
            bodies.len()
        );
    }
    Ok(())
}

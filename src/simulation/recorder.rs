//! Per-body trajectory log.
//!
//! One append-only position sequence per body, keyed by id. The first
//! sample is the initial position; each simulated step appends one more.

use crate::configuration::config::TrajectoryRecord;
use crate::simulation::states::{Body, NVec2};

pub struct TrajectoryRecorder {
    tracks: Vec<TrajectoryRecord>, // slot k holds the body with id k
}

impl TrajectoryRecorder {
    /// Seed one track per body with its initial position. Ids must already
    /// have been checked to fit as indices.
    pub fn new(bodies: &[Body]) -> Self {
        let mut tracks: Vec<TrajectoryRecord> = (0..bodies.len())
            .map(|k| TrajectoryRecord {
                id: k as i32,
                position: Vec::new(),
            })
            .collect();

        for b in bodies {
            tracks[b.id as usize]
                .position
                .push([b.position.x, b.position.y]);
        }

        Self { tracks }
    }

    /// Append a step sample for the body with this id.
    pub fn record(&mut self, id: i32, position: NVec2) {
        self.tracks[id as usize].position.push([position.x, position.y]);
    }

    /// Finish recording, yielding the output array ordered by id.
    pub fn into_records(self) -> Vec<TrajectoryRecord> {
        self.tracks
    }
}

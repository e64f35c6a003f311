//! Timing sweeps comparing the sequential and parallel engines.
//!
//! Output is plain columns, easy to paste into a spreadsheet.

use std::io::Cursor;
use std::time::Instant;

use crate::configuration::config::{InputRecord, RunConfig};
use crate::simulation::engine::{run_parallel, run_sequential};
use crate::simulation::states::{Body, NVec2};

const DOMAIN: f32 = 1000.0;
const STEPS: u32 = 10;

/// Deterministic body cloud, no rand needed
fn make_bodies(n: usize) -> Vec<Body> {
    (0..n)
        .map(|i| {
            let i_f = i as f32;
            let position = NVec2::new(
                DOMAIN / 2.0 + (i_f * 0.37).sin() * DOMAIN / 3.0,
                DOMAIN / 2.0 + (i_f * 0.13).cos() * DOMAIN / 3.0,
            );
            let velocity = NVec2::new((i_f * 0.07).sin(), (i_f * 0.11).cos());
            Body::new(1.0, i as i32, position, velocity)
        })
        .collect()
}

/// The same cloud framed as input records, for driving `run_parallel`
fn make_input(n: usize) -> String {
    make_bodies(n)
        .iter()
        .map(|b| {
            let record = InputRecord {
                command: "ADD".to_string(),
                mass: b.mass,
                id: b.id,
                position: [b.position.x, b.position.y],
                velocity: [b.velocity.x, b.velocity.y],
            };
            serde_json::to_string(&record).expect("record serializes")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Sequential vs. parallel step times over a range of body counts.
pub fn bench_engines(threads: usize) {
    let ns = [200, 400, 800, 1600, 3200, 6400];

    println!("N, seq_ms_per_step, par_ms_per_step ({} threads)", threads);

    for n in ns {
        let seq_cfg = RunConfig::new(DOMAIN, DOMAIN, 0);
        let bodies = make_bodies(n);

        let t0 = Instant::now();
        let _ = run_sequential(&seq_cfg, bodies, STEPS);
        let seq_ms = t0.elapsed().as_secs_f64() * 1000.0 / STEPS as f64;

        let par_cfg = RunConfig::new(DOMAIN, DOMAIN, threads);
        let input = make_input(n);

        let t1 = Instant::now();
        let _ = run_parallel(&par_cfg, Cursor::new(input), STEPS);
        let par_ms = t1.elapsed().as_secs_f64() * 1000.0 / STEPS as f64;

        println!("{n:5}, {seq_ms:8.4}, {par_ms:8.4}");
    }
}

/// Parallel step times for a fixed body count over a range of thread counts.
pub fn bench_threads(n: usize) {
    let thread_counts = [1, 2, 4, 8, 16];

    println!("threads, par_ms_per_step (N = {n})");

    for t in thread_counts {
        let cfg = RunConfig::new(DOMAIN, DOMAIN, t);
        let input = make_input(n);

        let t0 = Instant::now();
        let _ = run_parallel(&cfg, Cursor::new(input), STEPS);
        let ms = t0.elapsed().as_secs_f64() * 1000.0 / STEPS as f64;

        println!("{t:7}, {ms:8.4}");
    }
}

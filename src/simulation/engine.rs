//! Step orchestration for the sequential and parallel engines
//!
//! Both engines advance the system in lockstep over a freshly built tree
//! per step. The parallel engine pipelines across steps: while the workers
//! apply forces and integrate against `tree_k`, a builder thread is already
//! inserting the updated bodies into `tree_{k+1}`. Trees move between steps
//! over a single-slot channel; the channel handoff is the only
//! synchronization that publishes a tree.
//!
//! Workers own disjoint contiguous shards of the body array and mutate
//! them in place; everything they emit downstream (builder, recorder) is a
//! copy by value.

use std::io::BufRead;
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::sync::Mutex;
use std::thread;

use anyhow::{Context, Result};

use crate::configuration::config::{check_ids, RunConfig, SharedDecoder, TrajectoryRecord};
use crate::simulation::barnes_hut::{BHTree, Rect};
use crate::simulation::integrator::euler_cromer;
use crate::simulation::recorder::TrajectoryRecorder;
use crate::simulation::states::Body;

/// Run the sequential engine for a fixed number of steps and return the
/// recorded trajectories. Fails before the step loop if any body id does
/// not fit the body array.
pub fn run_sequential(
    cfg: &RunConfig,
    mut bodies: Vec<Body>,
    iterations: u32,
) -> Result<Vec<TrajectoryRecord>> {
    check_ids(&bodies)?;

    let mut recorder = TrajectoryRecorder::new(&bodies);

    for _ in 0..iterations {
        sequential_step(cfg.domain(), &mut bodies, cfg.theta, Some(&mut recorder));
    }

    Ok(recorder.into_records())
}

/// One sequential step: build a tree over the domain, inserting every body
/// in index order, then apply forces and integrate each body in turn.
/// Returns the step's tree so a viewer can draw it.
pub fn sequential_step(
    domain: Rect,
    bodies: &mut [Body],
    theta: f32,
    mut recorder: Option<&mut TrajectoryRecorder>,
) -> BHTree {
    let mut tree = BHTree::new(domain);
    for b in bodies.iter() {
        tree.insert(*b, 0);
    }

    for b in bodies.iter_mut() {
        tree.compute_forces(b, theta);
        b.position = euler_cromer(b);
        b.zero_force();

        if let Some(rec) = recorder.as_deref_mut() {
            rec.record(b.id, b.position);
        }
    }

    tree
}

/// Run the parallel engine: load bodies from `input` with `cfg.threads`
/// readers (overlapping the bootstrap tree build), then pipeline the step
/// loop. Returns the recorded trajectories.
pub fn run_parallel<R: BufRead + Send>(
    cfg: &RunConfig,
    input: R,
    iterations: u32,
) -> Result<Vec<TrajectoryRecord>> {
    let domain = cfg.domain();
    let threads = cfg.threads.max(1);

    // Readers share one mutex-guarded decoder and stream each body straight
    // into the bootstrap builder, so tree_0 takes shape while input is
    // still arriving
    let decoder = SharedDecoder::new(input);
    let loaded: Mutex<Vec<Body>> = Mutex::new(Vec::new());
    let failure: Mutex<Option<anyhow::Error>> = Mutex::new(None);

    let (boot_tx, boot_rx) = mpsc::channel::<Body>();
    let (tree_tx, boot_tree) = mpsc::sync_channel::<BHTree>(1);

    thread::spawn(move || build_from_stream(domain, boot_rx, tree_tx));

    thread::scope(|s| {
        for _ in 0..threads {
            let boot_tx = boot_tx.clone();
            let decoder = &decoder;
            let loaded = &loaded;
            let failure = &failure;

            s.spawn(move || loop {
                if failure.lock().unwrap().is_some() {
                    break;
                }
                match decoder.next_body() {
                    Some(Ok(body)) => {
                        loaded.lock().unwrap().push(body);
                        let _ = boot_tx.send(body);
                    }
                    Some(Err(e)) => {
                        *failure.lock().unwrap() = Some(e);
                        break;
                    }
                    None => break,
                }
            });
        }
    });
    drop(boot_tx);

    // Malformed input is fatal; the step loop never starts
    if let Some(e) = failure.into_inner().unwrap() {
        return Err(e);
    }

    let mut bodies = loaded.into_inner().unwrap();
    // Readers race on append order; restore id order so sharding is
    // deterministic and bodies[k].id == k holds for consecutive ids
    bodies.sort_unstable_by_key(|b| b.id);
    check_ids(&bodies)?;

    let mut recorder = TrajectoryRecorder::new(&bodies);
    let mut pending = boot_tree;

    for _ in 0..iterations {
        // Synchronous barrier: step k cannot start until tree_k is delivered
        let tree = pending.recv().context("tree builder terminated")?;
        pending = pipeline_step(
            domain,
            cfg.theta,
            threads,
            &mut bodies,
            &tree,
            Some(&mut recorder),
        );
    }

    Ok(recorder.into_records())
}

/// One pipelined step against `tree`: launch the builder for the next
/// step's tree, fan the shards out to workers, and (when recording) drain
/// the sample channel. Returns the receiver that will yield the next tree.
fn pipeline_step(
    domain: Rect,
    theta: f32,
    threads: usize,
    bodies: &mut [Body],
    tree: &BHTree,
    mut recorder: Option<&mut TrajectoryRecorder>,
) -> Receiver<BHTree> {
    let n = bodies.len();

    // Sized so a full step's worth of bodies never blocks a worker
    let (build_tx, build_rx) = mpsc::sync_channel::<Body>(n);
    let (tree_tx, next_tree) = mpsc::sync_channel::<BHTree>(1);

    // The builder consumes updated bodies while the workers are still
    // computing; it terminates once every worker has dropped its sender
    thread::spawn(move || build_from_stream(domain, build_rx, tree_tx));

    if n == 0 {
        // No workers to spawn; close the builder's input immediately
        drop(build_tx);
        return next_tree;
    }

    let workers = threads.clamp(1, n);
    let chunk = n.div_ceil(workers);
    let (data_tx, data_rx) = mpsc::sync_channel::<Body>(n);

    thread::scope(|s| {
        for shard in bodies.chunks_mut(chunk) {
            let build = build_tx.clone();
            let data = recorder.is_some().then(|| data_tx.clone());
            s.spawn(move || process_shard(shard, tree, theta, build, data));
        }

        // Only the worker-held clones keep the channels open now, so both
        // close exactly when the last worker finishes
        drop(build_tx);
        drop(data_tx);

        if let Some(rec) = recorder.as_deref_mut() {
            for b in data_rx.iter() {
                rec.record(b.id, b.position);
            }
        }
    });

    next_tree
}

/// Worker body: apply forces from the current tree, integrate, and fan the
/// updated body out to the next-step builder and (console mode) the
/// recorder.
fn process_shard(
    shard: &mut [Body],
    tree: &BHTree,
    theta: f32,
    build: SyncSender<Body>,
    data: Option<SyncSender<Body>>,
) {
    for b in shard.iter_mut() {
        tree.compute_forces(b, theta);
        b.position = euler_cromer(b);
        b.zero_force();

        // Copies by value: downstream readers get a stable snapshot
        let _ = build.send(*b);
        if let Some(data) = &data {
            let _ = data.send(*b);
        }
    }
}

/// Builder task: insert every body arriving on `bodies` into a fresh tree
/// over the domain, then publish it.
fn build_from_stream(domain: Rect, bodies: Receiver<Body>, trees: SyncSender<BHTree>) {
    let mut tree = BHTree::new(domain);

    for body in bodies {
        tree.insert(body, 0);
    }

    // The receiver may be gone if the run is shutting down mid-step
    let _ = trees.send(tree);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineMode {
    Sequential,
    Parallel,
}

/// Engine variant for windowed mode: one step per rendered frame, with the
/// engine toggling between sequential and parallel mid-run.
pub struct RealtimeEngine {
    domain: Rect,
    threads: usize,
    theta: f32,
    bodies: Vec<Body>,
    mode: EngineMode,
    /// Tree queued for the next parallel step, if a builder is in flight
    pending: Option<Receiver<BHTree>>,
}

impl RealtimeEngine {
    /// Starts in sequential mode, matching the viewer's initial setting.
    /// Fails if any body id does not fit the body array.
    pub fn new(cfg: &RunConfig, bodies: Vec<Body>) -> Result<Self> {
        check_ids(&bodies)?;

        Ok(Self {
            domain: cfg.domain(),
            threads: cfg.threads.max(1),
            theta: cfg.theta,
            bodies,
            mode: EngineMode::Sequential,
            pending: None,
        })
    }

    pub fn mode(&self) -> EngineMode {
        self.mode
    }

    pub fn domain(&self) -> Rect {
        self.domain
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// Switch sequential <-> parallel between frames.
    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            EngineMode::Sequential => EngineMode::Parallel,
            EngineMode::Parallel => EngineMode::Sequential,
        };

        if self.mode == EngineMode::Parallel {
            // A tree left queued by the previous parallel period must be
            // drained, or it leaks and the next handoff stalls
            if let Some(stale) = self.pending.take() {
                let _ = stale.recv();
            }

            // Bootstrap the first tree from a snapshot of the current bodies
            let domain = self.domain;
            let snapshot = self.bodies.clone();
            let (tree_tx, tree_rx) = mpsc::sync_channel::<BHTree>(1);

            thread::spawn(move || {
                let mut tree = BHTree::new(domain);
                for body in snapshot {
                    tree.insert(body, 0);
                }
                let _ = tree_tx.send(tree);
            });

            self.pending = Some(tree_rx);
        }
    }

    /// Advance one step (one rendered frame). Returns the tree the step ran
    /// against so the viewer can draw it.
    pub fn step(&mut self) -> Option<BHTree> {
        match self.mode {
            EngineMode::Sequential => Some(sequential_step(
                self.domain,
                &mut self.bodies,
                self.theta,
                None,
            )),
            EngineMode::Parallel => {
                let tree = self.pending.take()?.recv().ok()?;
                let next = pipeline_step(
                    self.domain,
                    self.theta,
                    self.threads,
                    &mut self.bodies,
                    &tree,
                    None,
                );
                self.pending = Some(next);
                Some(tree)
            }
        }
    }
}

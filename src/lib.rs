pub mod simulation;
pub mod configuration;
pub mod visualization;
pub mod benchmark;

pub use simulation::states::{combine, Body, NVec2, COM_ID};
pub use simulation::params::{DT, G, MAX_DEPTH, MAX_DISTANCE, RADIUS_COEFF, THETA};
pub use simulation::forces::add_force;
pub use simulation::integrator::euler_cromer;
pub use simulation::barnes_hut::{BHTree, Rect};
pub use simulation::engine::{
    run_parallel, run_sequential, sequential_step, EngineMode, RealtimeEngine,
};
pub use simulation::recorder::TrajectoryRecorder;

pub use configuration::config::{
    check_ids, read_bodies, InputRecord, RunConfig, SharedDecoder, TrajectoryRecord,
};

pub use visualization::window::run_window;

pub use benchmark::benchmark::{bench_engines, bench_threads};

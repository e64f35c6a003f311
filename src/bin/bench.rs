//! Timing harness for the sequential and parallel engines.

use clap::Parser;

use nbsim::{bench_engines, bench_threads};

#[derive(Parser, Debug)]
struct Args {
    /// Worker threads for the body-count sweep
    #[arg(short, long, default_value_t = 4)]
    threads: usize,

    /// Body count for the thread-scaling sweep
    #[arg(short, long, default_value_t = 3200)]
    bodies: usize,
}

fn main() {
    let args = Args::parse();

    bench_engines(args.threads);
    println!();
    bench_threads(args.bodies);
}

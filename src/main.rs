use std::io::{self, BufReader, Write};

use anyhow::Result;
use clap::Parser;

use nbsim::{read_bodies, run_parallel, run_sequential, run_window, RealtimeEngine, RunConfig};

const USAGE: &str = "Usage: sim [-w | -i=INTEGER] <X> <Y> <thread_count>
\t -w = Run this program in windowed (real-time) mode.
\t -i = Number of updates to run. Must be greater than 0. (Use only one of -w and -i.)
\t <X> = The width of the domain. Positive integer.
\t <Y> = The height of the domain. Positive integer.
\t <thread_count> = Maximum number of worker threads. Set to 0 to run in sequential mode.";

#[derive(Parser, Debug)]
struct Args {
    /// Run in windowed (real-time) mode
    #[arg(short)]
    w: bool,

    /// Number of updates to run
    #[arg(short)]
    i: Option<u32>,

    x: i64,
    y: i64,
    thread_count: i64,
}

enum Mode {
    Windowed,
    Console(u32),
}

/// Apply the CLI contract; `None` means print usage and exit 0.
fn validate(args: &Args) -> Option<Mode> {
    if args.x <= 0 || args.y <= 0 || args.thread_count < 0 {
        return None;
    }

    match (args.w, args.i) {
        // Windowed mode needs at least one worker thread
        (true, None) if args.thread_count > 0 => Some(Mode::Windowed),
        (false, Some(i)) if i >= 1 => Some(Mode::Console(i)),
        _ => None,
    }
}

fn main() -> Result<()> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(_) => {
            println!("{USAGE}");
            return Ok(());
        }
    };

    let Some(mode) = validate(&args) else {
        println!("{USAGE}");
        return Ok(());
    };

    let cfg = RunConfig::new(args.x as f32, args.y as f32, args.thread_count as usize);

    match mode {
        Mode::Windowed => {
            let bodies = read_bodies(BufReader::new(io::stdin()))?;
            run_window(RealtimeEngine::new(&cfg, bodies)?);
        }
        Mode::Console(iterations) => {
            let records = if cfg.threads == 0 {
                let bodies = read_bodies(BufReader::new(io::stdin()))?;
                run_sequential(&cfg, bodies, iterations)?
            } else {
                run_parallel(&cfg, BufReader::new(io::stdin()), iterations)?
            };

            let mut stdout = io::stdout().lock();
            serde_json::to_writer(&mut stdout, &records)?;
            writeln!(stdout)?;
        }
    }

    Ok(())
}

//! Random input generator: emits newline-delimited ADD records on stdout.

use std::io::{self, Write};

use anyhow::Result;
use clap::Parser;
use rand::Rng;
use serde::Serialize;

const USAGE: &str = "Usage: generate <num_of_obj> <x> <y> [-s]
\t <num_of_obj> = the number of objects to generate
\t <x> = the width of the domain. Integer
\t <y> = the height of the domain. Integer
\t -s = start all objects with zero initial velocity.";

const MAX_MASS: f32 = 3.0;
const MIN_MASS: f32 = 0.5;
const MAX_VEL: f32 = 2.0;
const MIN_VEL: f32 = -2.0;

#[derive(Parser, Debug)]
struct Args {
    num_of_obj: i64,
    x: i64,
    y: i64,

    /// Start all objects with zero initial velocity
    #[arg(short)]
    s: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct AddRecord {
    command: &'static str,
    mass: f32,
    id: i32,
    position: [i64; 2],
    velocity: [f32; 2],
}

fn main() -> Result<()> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(_) => {
            println!("{USAGE}");
            return Ok(());
        }
    };

    if args.num_of_obj < 0 || args.x <= 0 || args.y <= 0 {
        println!("{USAGE}");
        return Ok(());
    }

    let mut rng = rand::thread_rng();
    let mut stdout = io::stdout().lock();

    for id in 0..args.num_of_obj {
        let velocity = if args.s {
            [0.0, 0.0]
        } else {
            [
                rng.gen_range(MIN_VEL..MAX_VEL),
                rng.gen_range(MIN_VEL..MAX_VEL),
            ]
        };

        let record = AddRecord {
            command: "ADD",
            mass: rng.gen_range(MIN_MASS..MAX_MASS),
            id: id as i32,
            position: [rng.gen_range(0..args.x), rng.gen_range(0..args.y)],
            velocity,
        };

        serde_json::to_writer(&mut stdout, &record)?;
        writeln!(stdout)?;
    }

    Ok(())
}

//! Gomory-Hu tree demo
//!
//! Builds the min-cut tree of a capacity matrix read from a JSON file
//! (`[[0, 3], [3, 0]]`), or of a built-in six-vertex sample graph when no
//! file is given. Run with `RUST_LOG=debug` to see every refinement round.

use std::error::Error;
use std::fs;
use std::process::ExitCode;

use clap::{Arg, Command};
use log::{error, info};

use gomory_hu_core::algorithm::traits::Algorithm;
use gomory_hu_core::validation::correctness::verify_tree;
use gomory_hu_core::{
    Capacity, CapacityMatrix, GomoryHuBuilder, GomoryHuConfig, LogTracer, VERSION,
};

fn sample_graph() -> Vec<Vec<Capacity>> {
    vec![
        vec![0, 1, 7, 0, 0, 0],
        vec![1, 0, 1, 3, 2, 0],
        vec![7, 1, 0, 0, 4, 0],
        vec![0, 3, 0, 0, 1, 6],
        vec![0, 2, 4, 1, 0, 2],
        vec![0, 0, 0, 6, 2, 0],
    ]
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let matches = Command::new("gomory-hu")
        .version(VERSION)
        .about("Builds the Gomory-Hu min-cut tree of an undirected capacity matrix")
        .arg(
            Arg::new("matrix")
                .help("JSON file holding the capacity matrix as an array of rows")
                .index(1),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .takes_value(true)
                .help("JSON file with builder settings"),
        )
        .arg(
            Arg::new("pair-selection")
                .long("pair-selection")
                .takes_value(true)
                .possible_values(["first_two", "last_two", "first_and_last"])
                .help("Which two group members become source and sink"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print the tree as JSON instead of a matrix"),
        )
        .arg(
            Arg::new("verify")
                .long("verify")
                .help("Check the tree against a brute-force all-pairs computation"),
        )
        .get_matches();

    let matrix = match matches.value_of("matrix") {
        Some(path) => CapacityMatrix::from_json(&fs::read_to_string(path)?)?,
        None => CapacityMatrix::from_rows(sample_graph())?,
    };
    let config = match matches.value_of("config") {
        Some(path) => GomoryHuConfig::from_json(&fs::read_to_string(path)?)?,
        None => GomoryHuConfig::default(),
    };

    let mut builder = GomoryHuBuilder::with_config(config);
    if let Some(strategy) = matches.value_of("pair-selection") {
        builder.set_parameter("pair_selection", strategy)?;
    }

    let mut tracer = LogTracer::default();
    let tree = builder.execute_with_tracing(&matrix, Some(&mut tracer))?;

    if matches.is_present("verify") {
        verify_tree(&matrix, &tree)?;
        let pairs = matrix.size() * matrix.size().saturating_sub(1) / 2;
        info!("all {} pairwise cuts match", pairs);
    }

    if matches.is_present("json") {
        println!("{}", tree.to_json()?);
    } else {
        println!("result:");
        print!("{}", tree);
    }
    Ok(())
}

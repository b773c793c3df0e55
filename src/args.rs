use bank::Result;

use std::{env, fs, num::NonZeroUsize, path::PathBuf};

use anyhow::Context;

use thiserror::Error;

const DEFAULT_WORKERS: usize = 4;

#[derive(Error, Debug)]
pub enum InputArgsError {
    #[error("Couldn't parse input arguments: {0}")]
    Parse(String),

    #[error("File not found: {0}")]
    FileNotFound(String),
}

#[derive(Debug)]
pub struct InputArgs {
    pub input_path: PathBuf,
    pub workers: NonZeroUsize,
}

/// Parses the input arguments: a required filepath, then an optional worker thread count
pub fn parse_input_args() -> Result<InputArgs> {
    let mut args = env::args().skip(1);

    let filename = args
        .next()
        .ok_or_else(|| InputArgsError::Parse("First argument must be the input file.".to_string()))?;

    let input_path = fs::canonicalize(filename.clone())
        .with_context(|| InputArgsError::FileNotFound(filename))?;

    let workers = match args.next() {
        None => DEFAULT_WORKERS,
        Some(workers) => workers.parse::<usize>().with_context(|| {
            InputArgsError::Parse(format!("Worker count must be a positive integer: {workers}"))
        })?,
    };

    let workers = NonZeroUsize::new(workers)
        .ok_or_else(|| InputArgsError::Parse("Worker count must be at least 1.".to_string()))?;

    Ok(InputArgs {
        input_path,
        workers,
    })
}

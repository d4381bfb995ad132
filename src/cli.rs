//! Thin `clap` derive front door over the library's engines.
//!
//! TEVD's handful of operations map naturally onto `clap`'s `Subcommand`
//! derive, one variant per operation with only the arguments that operation
//! needs.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "tevd",
    version,
    about = "Inspect and edit TEVD virtual-disk archives",
    long_about = "A CLI front end over the TEVD in-memory and streaming skimmer engines. \
                   Not part of the archive format itself, just an operator-facing \
                   client of its public interface."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Increase logging verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Seed the handle-allocation RNG for deterministic output (testing only)
    #[arg(long = "rng-seed", global = true, value_name = "SEED")]
    pub rng_seed: Option<u64>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create a fresh, root-only archive via the in-memory engine
    Create {
        path: PathBuf,
        #[arg(long, default_value_t = crate::config::DEFAULT_CAPACITY)]
        capacity: u64,
        #[arg(long)]
        disk_name: Option<String>,
    },
    /// Walk the directory graph from the root and print it as JSON
    Tree { path: PathBuf },
    /// Fetch a handle and write its payload to stdout
    Cat { path: PathBuf, handle: i32 },
    /// Read a host file and create_path it into the archive
    Add {
        path: PathBuf,
        dest_path: String,
        source_file: PathBuf,
        #[arg(long)]
        overwrite: bool,
    },
    /// Delete a handle via the skimmer
    Rm { path: PathBuf, handle: i32 },
    /// Load the whole archive in-memory and report CRC mismatches
    Verify { path: PathBuf },
}

//! A small, validated `Config` built from parsed CLI arguments.
//!
//! A plain struct with a `validate()` pass and a `TryFrom<Cli>` constructor.
//! The archive format itself persists nothing beyond the file on disk and
//! its transient commit siblings, so this layer exists purely to carry
//! CLI-derived settings into the library calls the subcommands make.

use crate::cli::{Cli, Command};

/// Default capacity (in bytes) used by `tevd create` when `--capacity` is omitted.
pub const DEFAULT_CAPACITY: u64 = 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub command: Command,
    pub verbose: u8,
    /// Caller-controllable RNG seed for deterministic handle generation.
    /// `None` means seed from OS entropy.
    pub rng_seed: Option<u64>,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        match &self.command {
            Command::Create { capacity, .. } => {
                if *capacity == 0 {
                    anyhow::bail!("--capacity must be greater than zero for a writable archive");
                }
            }
            Command::Add { dest_path, .. } => {
                if dest_path.trim_matches(['/', '\\']).is_empty() {
                    anyhow::bail!("destination path must not be empty");
                }
            }
            Command::Tree { .. }
            | Command::Cat { .. }
            | Command::Rm { .. }
            | Command::Verify { .. } => {}
        }
        Ok(())
    }
}

impl TryFrom<Cli> for Config {
    type Error = anyhow::Error;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let config = Config {
            command: cli.command,
            verbose: cli.verbose,
            rng_seed: cli.rng_seed,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn zero_capacity_create_fails_validation() {
        let config = Config {
            command: Command::Create {
                path: PathBuf::from("x.tevd"),
                capacity: 0,
                disk_name: None,
            },
            verbose: 0,
            rng_seed: None,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_dest_path_add_fails_validation() {
        let config = Config {
            command: Command::Add {
                path: PathBuf::from("x.tevd"),
                dest_path: "///".to_string(),
                source_file: PathBuf::from("src.bin"),
                overwrite: false,
            },
            verbose: 0,
            rng_seed: None,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn verify_command_always_validates() {
        let config = Config {
            command: Command::Verify {
                path: PathBuf::from("x.tevd"),
            },
            verbose: 0,
            rng_seed: None,
        };
        assert!(config.validate().is_ok());
    }
}

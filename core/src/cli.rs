//! # Command Line Interface
//!
//! This module defines command line interface for the `mainchain-pow`
//! binary. `Clap` is used for easy generation of help messages and handling
//! arguments.

use crate::block::{MemoryHistory, SidechainBlock};
use crate::config::{MainchainNetwork, NetworkParams};
use crate::errors::PowError;
use crate::genesis::parse_pow_data;
use crate::header::MainchainHeader;
use crate::retarget::calculate_next_work_required;
use crate::verifier::{check_next_work_required, check_proof_of_work};
use clap::{Parser, Subcommand};
use num_bigint::BigUint;
use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Mainchain proof-of-work verification for sidechain blocks.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// TOML formatted network parameters file.
    #[arg(short, long)]
    pub params_file: Option<PathBuf>,
    /// Verbosity level, ranging from 0 (none) to 5 (highest)
    #[arg(short, long, default_value_t = 3)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Decodes genesis PoW data and prints its samples, oldest first.
    ParsePowData {
        /// Hex output of `getscgenesisinfo`.
        pow_data: String,
    },
    /// Checks the proof of work of a single mainchain header.
    CheckHeader {
        /// JSON file holding one mainchain header.
        header: PathBuf,
    },
    /// Prints the bits computed from an average target and two medians.
    NextWork {
        /// Average target, big endian hex.
        #[arg(long)]
        avg_target: String,
        #[arg(long, allow_hyphen_values = true)]
        first_time: i32,
        #[arg(long, allow_hyphen_values = true)]
        last_time: i32,
    },
    /// Checks the difficulty of every mainchain header a sidechain block claims.
    VerifyBlock {
        /// JSON file holding the sidechain block.
        #[arg(long)]
        block: PathBuf,
        /// JSON file holding an array of its ancestors.
        #[arg(long)]
        history: PathBuf,
    },
}

/// Parse all the command line arguments.
pub fn parse() -> Result<Args, PowError> {
    parse_from(env::args())
}

/// Parse given iterator. This is good for isolated environments, like tests.
pub fn parse_from<I, T>(itr: I) -> Result<Args, PowError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Args::try_parse_from(itr).map_err(|e| PowError::ConfigError(e.to_string()))
}

/// Picks network parameters from, in order: the params file given on the
/// command line, environment variables, the regtest preset. The preset is
/// only used when none of the network environment variables are set.
pub fn get_network_params(args: &Args) -> Result<NetworkParams, PowError> {
    if let Some(params_file) = &args.params_file {
        return NetworkParams::try_parse_file(params_file);
    }

    match NetworkParams::from_env_if_set()? {
        Some(params) => {
            tracing::info!("All the environment variables are set, using them...");
            Ok(params)
        }
        None => {
            tracing::info!(
                "No network parameters given, using the {} preset without genesis data",
                MainchainNetwork::Regtest
            );
            Ok(NetworkParams::without_genesis(MainchainNetwork::Regtest))
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, PowError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Runs `command` and prints its result. Returns whether the input was
/// accepted.
pub fn run(command: &Command, params: &NetworkParams) -> Result<bool, PowError> {
    match command {
        Command::ParsePowData { pow_data } => {
            let samples = parse_pow_data(pow_data)?;
            println!("{}", serde_json::to_string_pretty(&samples)?);
            Ok(true)
        }
        Command::CheckHeader { header } => {
            let header: MainchainHeader = read_json(header)?;
            let valid = check_proof_of_work(&header, params);
            println!("{}", if valid { "valid" } else { "invalid" });
            Ok(valid)
        }
        Command::NextWork {
            avg_target,
            first_time,
            last_time,
        } => {
            let avg_target = BigUint::from_bytes_be(&hex::decode(avg_target)?);
            let bits = calculate_next_work_required(&avg_target, *first_time, *last_time, params);
            println!("{bits:#010x}");
            Ok(true)
        }
        Command::VerifyBlock { block, history } => {
            let block: SidechainBlock = read_json(block)?;
            let history = MemoryHistory::try_parse_file(history)?;
            tracing::debug!("Loaded {} sidechain blocks of history", history.len());

            let valid = check_next_work_required(&block, &history, params);
            println!("{}", if valid { "valid" } else { "invalid" });
            Ok(valid)
        }
    }
}

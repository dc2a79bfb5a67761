//! ffi-demo entry point.
//!
//! Drives both libraries in-process, the way a foreign caller would:
//!
//! ```text
//! ffi-demo dog 5 -2              # create, run twice, query, destroy
//! ffi-demo send --address 10.0.0.1 --port 4791 414243
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::{error, info};

use ffi_handle::{dog_ctor, dog_dctor, dog_distance, dog_last_error, dog_run, HandleErrorCode};
use ffi_svdpi::{send_packet, DiscardSink, MarshalConfig, SliceArray};

/// Exercise the dog handle ABI and the svdpi marshaller
#[derive(Parser, Debug)]
#[command(name = "ffi-demo")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, default_value = "info", global = true)]
    log_level: String,

    /// Marshaller configuration file (TOML)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a dog, run it by each amount, print the distance and destroy it
    Dog {
        /// Distances to run, in order
        #[arg(allow_negative_numbers = true)]
        amounts: Vec<i32>,
    },

    /// Marshal hex bytes as an open array and hand them to the discard sink
    Send {
        /// Destination address (passed through unvalidated)
        #[arg(short = 'a', long)]
        address: String,

        /// Destination port
        #[arg(short = 'p', long)]
        port: u16,

        /// Index of the first element
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        low: i32,

        /// Payload as hex, e.g. 414243
        #[arg(default_value = "")]
        payload: String,
    },
}

/// Runs the dog lifecycle through the exported C functions.
///
/// Returns the final distance.
fn run_dog(amounts: &[i32]) -> Result<i32> {
    let dog = dog_ctor();
    if dog == 0 {
        bail!(
            "dog_ctor failed: {}",
            HandleErrorCode::from_raw(dog_last_error())
        );
    }
    info!("Created dog 0x{:x}", dog);

    for amount in amounts {
        dog_run(dog, *amount);
        info!("Ran {} -> distance {}", amount, dog_distance(dog));
    }
    let distance = dog_distance(dog);
    dog_dctor(dog);

    // The handle is dead now; a query must be rejected, not read freed memory.
    dog_distance(dog);
    let code = HandleErrorCode::from_raw(dog_last_error());
    if code != HandleErrorCode::InvalidHandle {
        bail!("query after destroy was not rejected (got {})", code);
    }
    info!("Query after destroy rejected with {}", code);

    Ok(distance)
}

/// Marshals `payload_hex` and sends it to a discard sink.
fn run_send(
    address: &str,
    port: u16,
    low: i32,
    payload_hex: &str,
    config: MarshalConfig,
) -> Result<usize> {
    let payload = hex::decode(payload_hex).context("payload is not valid hex")?;
    let array = SliceArray::with_bounds(low, &payload)
        .with_context(|| format!("{} bytes do not fit from index {}", payload.len(), low))?;

    let sink = DiscardSink::new(config);
    send_packet(address, port, &array, &sink)
        .with_context(|| format!("send to {}:{} failed", address, port))?;

    Ok(payload.len())
}

fn load_config(path: Option<&Path>) -> Result<MarshalConfig> {
    match path {
        Some(path) => MarshalConfig::from_file(path)
            .with_context(|| format!("failed to load {}", path.display())),
        None => Ok(MarshalConfig::default()),
    }
}

fn run(args: Args) -> Result<()> {
    let config = load_config(args.config.as_deref())?;

    match args.command {
        Command::Dog { amounts } => {
            let distance = run_dog(&amounts)?;
            println!("{}", distance);
        }
        Command::Send {
            address,
            port,
            low,
            payload,
        } => {
            let sent = run_send(&address, port, low, &payload, config)?;
            info!("Marshalled {} bytes for {}:{}", sent, address, port);
            println!("0");
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&args.log_level))
        .init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("ffi-demo error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

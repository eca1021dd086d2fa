use clap::{Args, Subcommand};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

use scanpack_codec::{CodecConfig, ScanProperties, DEFAULT_FIXED_FRAME_ID};

use crate::exit::{io_error, json_error, CliResult};
use crate::output::OutputFormat;

pub mod decode;
pub mod encode;
pub mod inspect;
pub mod select;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compress a dual-channel scan (JSON) into the compact wire form.
    Encode(EncodeArgs),
    /// Expand a compact wire scan into a dual-channel scan (JSON).
    Decode(DecodeArgs),
    /// Extract one range channel of a dual-channel scan (JSON).
    Select(SelectArgs),
    /// Summarize the beam states of a compact wire scan.
    Inspect(InspectArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args),
        Command::Decode(args) => decode::run(args, format),
        Command::Select(args) => select::run(args, format),
        Command::Inspect(args) => inspect::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Dual-channel scan JSON file.
    pub input: PathBuf,
    /// Write wire bytes here instead of stdout.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Compact wire scan file.
    pub input: PathBuf,
    /// Scan properties JSON (frame id, increments, range limits).
    #[arg(long, short = 'p', env = "SCANPACK_PROPERTIES")]
    pub properties: PathBuf,
    /// Frame id of the fixed frame the ray transforms are expressed in.
    #[arg(long, env = "SCANPACK_FIXED_FRAME", default_value = DEFAULT_FIXED_FRAME_ID)]
    pub fixed_frame: String,
    /// Write JSON here instead of stdout.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

impl DecodeArgs {
    pub fn codec_config(&self) -> CodecConfig {
        CodecConfig {
            fixed_frame_id: self.fixed_frame.clone(),
            ..CodecConfig::default()
        }
    }
}

#[derive(Args, Debug)]
pub struct SelectArgs {
    /// Dual-channel scan JSON file.
    pub input: PathBuf,
    /// Channel to extract: `preprocessed`, `self-filtered`, or its index.
    #[arg(long, short = 'c', default_value = "self-filtered")]
    pub channel: String,
    /// Write JSON here instead of stdout.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Compact wire scan file.
    pub input: PathBuf,
    /// Scan properties JSON (frame id, increments, range limits).
    #[arg(long, short = 'p', env = "SCANPACK_PROPERTIES")]
    pub properties: PathBuf,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

pub fn read_input(path: &Path) -> CliResult<Vec<u8>> {
    std::fs::read(path).map_err(|err| io_error(&format!("failed reading {}", path.display()), err))
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> CliResult<T> {
    let data = read_input(path)?;
    serde_json::from_slice(&data)
        .map_err(|err| json_error(&format!("invalid JSON in {}", path.display()), err))
}

pub fn read_properties(path: &Path) -> CliResult<ScanProperties> {
    read_json(path)
}

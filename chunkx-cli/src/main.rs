use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Seek, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use chunkx_core::{
    read_chunk_header_with_limits, write_chunk, ChunkDescriptor, ChunkReader, EncoderTechnique,
    HeaderLimits,
};

#[derive(Parser)]
#[command(name = "chunkx", version, about = "Write and inspect erasure-coded chunk files")]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(clap::Args, Clone, Copy)]
struct LimitArgs {
    #[arg(long, default_value_t = HeaderLimits::default().max_record_bytes)]
    max_record_bytes: u64,
    #[arg(long, default_value_t = HeaderLimits::default().max_key_len)]
    max_key_len: usize,
}

impl From<LimitArgs> for HeaderLimits {
    fn from(a: LimitArgs) -> Self {
        HeaderLimits { max_record_bytes: a.max_record_bytes, max_key_len: a.max_key_len }
    }
}

#[derive(Subcommand)]
enum Cmd {
    /// Write a chunk file: header followed by the input bytes
    Write {
        #[arg(long)]
        key: String,
        #[arg(long, default_value_t = 0)]
        index: u64,
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..))]
        k: u8,
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..))]
        m: u8,
        #[arg(long, default_value_t = EncoderTechnique::Cauchy)]
        technique: EncoderTechnique,
        /// Defaults to the input file size
        #[arg(long)]
        original_length: Option<u32>,
        input: PathBuf,
        output: PathBuf,
    },
    /// Print the header and a payload summary of a chunk file
    Inspect {
        chunk: PathBuf,
        #[arg(long, default_value_t = false)]
        json: bool,
        #[command(flatten)]
        limits: LimitArgs,
    },
    /// Copy the payload of a chunk file to OUTPUT
    Extract {
        chunk: PathBuf,
        output: PathBuf,
        #[command(flatten)]
        limits: LimitArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Cmd::Write { key, index, k, m, technique, original_length, input, output } => {
            write_cmd(key, index, k, m, technique, original_length, &input, &output)?
        }
        Cmd::Inspect { chunk, json, limits } => inspect(&chunk, json, &limits.into())?,
        Cmd::Extract { chunk, output, limits } => extract(&chunk, &output, &limits.into())?,
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

#[allow(clippy::too_many_arguments)]
fn write_cmd(
    key: String,
    index: u64,
    k: u8,
    m: u8,
    technique: EncoderTechnique,
    original_length: Option<u32>,
    input: &Path,
    output: &Path,
) -> Result<()> {
    let mut src = BufReader::new(File::open(input).with_context(|| format!("open {}", input.display()))?);
    let original_length = match original_length {
        Some(n) => n,
        None => {
            let size = fs::metadata(input)?.len();
            u32::try_from(size)
                .map_err(|_| anyhow!("{} is {} bytes; pass --original-length", input.display(), size))?
        }
    };
    let desc = ChunkDescriptor::new(key, index, original_length, k, m, technique)?;
    let f = File::create(output).with_context(|| format!("create {}", output.display()))?;
    let mut out = BufWriter::new(f);
    let copied = write_chunk(&mut out, &desc, &mut src).context("write chunk")?;
    out.flush()?;
    info!(output = %output.display(), payload_len = copied, "chunk written");
    Ok(())
}

#[derive(Serialize)]
struct InspectReport {
    #[serde(flatten)]
    descriptor: ChunkDescriptor,
    header_len: u64,
    payload_len: u64,
    payload_blake3: String,
}

fn inspect(chunk: &Path, json: bool, limits: &HeaderLimits) -> Result<()> {
    let mut f = File::open(chunk).with_context(|| format!("open {}", chunk.display()))?;
    // Unbuffered read so the file position marks the end of the header.
    let descriptor = read_chunk_header_with_limits(&mut f, limits)
        .with_context(|| format!("read chunk header of {}", chunk.display()))?;
    let header_len = f.stream_position()?;
    let mut hasher = blake3::Hasher::new();
    let payload_len = io::copy(&mut BufReader::new(f), &mut hasher)?;
    let report = InspectReport {
        descriptor,
        header_len,
        payload_len,
        payload_blake3: hasher.finalize().to_hex().to_string(),
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let d = &report.descriptor;
        println!("key: {}", d.key);
        println!("chunk_index: {}", d.chunk_index);
        println!("original_length: {}", d.original_length);
        println!("encoder: {} k={} m={}", d.encoder_technique, d.encoder_k, d.encoder_m);
        println!("header_len: {}", report.header_len);
        println!("payload_len: {}", report.payload_len);
        println!("payload_blake3: {}", report.payload_blake3);
    }
    Ok(())
}

fn extract(chunk: &Path, output: &Path, limits: &HeaderLimits) -> Result<()> {
    let f = File::open(chunk).with_context(|| format!("open {}", chunk.display()))?;
    let mut rd = ChunkReader::with_limits(BufReader::new(f), limits)
        .with_context(|| format!("read chunk header of {}", chunk.display()))?;
    let mut out = BufWriter::new(
        File::create(output).with_context(|| format!("create {}", output.display()))?,
    );
    io::copy(&mut rd, &mut out)?;
    out.flush()?;
    info!(key = %rd.descriptor().key, payload_len = rd.payload_read(), "payload extracted");
    Ok(())
}

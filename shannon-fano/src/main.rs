use std::{
    fs::{self, File},
    io::{BufReader, BufWriter},
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::Parser;
use log::info;

use shannon_fano::{whitespace::printable, Artifact};

const DEFAULT_ENCODED_FILE: &str = "encoded.txt";
const DEFAULT_DECODED_FILE: &str = "decoded.txt";

/// Shannon-Fano coding of a file. Encodes by default.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Decode INPUT instead of encoding it
    #[arg(short, long)]
    decode: bool,

    /// Do not echo the code table and bitstream (or decoded text) to stdout
    #[arg(short, long)]
    quiet: bool,

    input: PathBuf,

    /// Defaults to `encoded.txt`, or `decoded.txt` with --decode
    output: Option<PathBuf>,
}

impl Args {
    fn output(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            let default = if self.decode {
                DEFAULT_DECODED_FILE
            } else {
                DEFAULT_ENCODED_FILE
            };
            PathBuf::from(default)
        })
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    run(&args)
}

fn run(args: &Args) -> anyhow::Result<()> {
    let output = args.output();
    if args.decode {
        decode_file(&args.input, &output, args.quiet)
    } else {
        encode_file(&args.input, &output, args.quiet)
    }
}

// The output file is only created once the artifact is complete, so a failed
// run leaves nothing behind.
fn encode_file(input: &Path, output: &Path, quiet: bool) -> anyhow::Result<()> {
    let content =
        fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;

    let artifact = shannon_fano::encode_bytes(&content)
        .with_context(|| format!("Failed to encode {}", input.display()))?;

    let mut writer = BufWriter::new(
        File::create(output).with_context(|| format!("Failed to create {}", output.display()))?,
    );
    artifact
        .write_to(&mut writer)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!("wrote {}", output.display());
    if !quiet {
        echo_artifact(&artifact);
    }
    Ok(())
}

fn decode_file(input: &Path, output: &Path, quiet: bool) -> anyhow::Result<()> {
    let mut reader = BufReader::new(
        File::open(input).with_context(|| format!("Failed to open {}", input.display()))?,
    );

    let artifact = Artifact::read_from(&mut reader)
        .with_context(|| format!("Failed to read the artifact in {}", input.display()))?;
    let decoded = shannon_fano::decode_artifact(&artifact)
        .with_context(|| format!("Failed to decode {}", input.display()))?;

    fs::write(output, &decoded)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!("wrote {} bytes to {}", decoded.len(), output.display());
    if !quiet {
        println!("{}", String::from_utf8_lossy(&decoded));
    }
    Ok(())
}

fn echo_artifact(artifact: &Artifact) {
    println!("{}", artifact.rows().len());
    for row in artifact.rows() {
        println!(
            "{}\t{:.6}\t{}",
            printable(row.symbol),
            row.probability,
            row.codeword
        );
    }
    println!();
    println!("{}", artifact.bits_as_text());
}

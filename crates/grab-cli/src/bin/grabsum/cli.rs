//! CLI for the `grabsum` checksum tool.

use anyhow::Result;
use clap::Parser;
use grab_core::checksum::{self, Algorithm, FileDigest};
use grab_core::config::{self, GrabConfig};
use std::path::{Path, PathBuf};

/// Compute a file checksum and optionally compare it with an expected digest.
#[derive(Debug, Parser)]
#[command(name = "grabsum", version)]
#[command(about = "Compute a file checksum, optionally checking it against a known digest", long_about = None)]
pub struct Cli {
    /// Size in bytes of the buffer used to read the file (default from config, normally 256).
    #[arg(short = 'b', long = "buffer-size", value_name = "BYTES")]
    pub buffer_size: Option<usize>,

    /// Expected checksum to verify against (hex, case-insensitive).
    #[arg(short = 'c', long = "check", value_name = "DIGEST")]
    pub check: Option<String>,

    /// Digest algorithm: md5 or sha256.
    #[arg(short = 'a', long = "algorithm", value_name = "ALGO", default_value = "md5")]
    pub algorithm: Algorithm,

    /// File to hash.
    pub path: PathBuf,
}

/// Parses process arguments. Usage errors exit with status 1; `--help` and `--version` with 0.
pub fn parse_args() -> Cli {
    Cli::try_parse().unwrap_or_else(|err| {
        let code = if err.use_stderr() { 1 } else { 0 };
        let _ = err.print();
        std::process::exit(code);
    })
}

pub fn run(cli: Cli) -> Result<()> {
    let cfg = config::load_or_init()?;
    tracing::debug!("loaded config: {:?}", cfg);
    for line in run_with_config(&cli, &cfg)? {
        println!("{}", line);
    }
    Ok(())
}

/// Hashes the file and returns the lines to print. A mismatch is reported, not an error.
pub fn run_with_config(cli: &Cli, cfg: &GrabConfig) -> Result<Vec<String>> {
    let buf_size = cli.buffer_size.unwrap_or(cfg.checksum_buffer_bytes);
    if buf_size == 0 {
        anyhow::bail!("buffer size must be >= 1");
    }
    let digest = checksum::digest_path(&cli.path, cli.algorithm, buf_size)?;
    tracing::info!(
        path = %cli.path.display(),
        bytes = digest.bytes,
        algorithm = %cli.algorithm,
        "computed checksum"
    );
    Ok(report_lines(&cli.path, &digest, cli.check.as_deref()))
}

fn report_lines(path: &Path, digest: &FileDigest, check: Option<&str>) -> Vec<String> {
    let mut lines = vec![format!(
        "{} checksum for {} ({} bytes): {}",
        digest.algorithm.label(),
        path.display(),
        digest.bytes,
        digest.hex
    )];
    if let Some(expected) = check.filter(|c| !c.is_empty()) {
        lines.push(format!("Checksums match: {}", digest.matches(expected)));
    }
    lines
}

//! recapsheet CLI
//!
//! 標準入力から連結されたリキャップメッセージを読み取り、月次の
//! Excelワークブックに書き込むコマンド。診断テキストは標準エラーのみに
//! 出力され、標準出力は使用しません。

use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use recapsheet::ProcessorBuilder;

/// Process watchlist recap messages from stdin and write monthly Excel files
#[derive(Parser, Debug)]
#[command(name = "recapsheet", version, about)]
struct Cli {
    /// Output Excel path; its directory becomes the base directory for
    /// the generated month files (default: ~/Documents/watchlist_summary.xlsx)
    #[arg(short = 'o', long = "out")]
    out: Option<PathBuf>,
}

fn default_out_path() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_default()
        .join("Documents")
        .join("watchlist_summary.xlsx")
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();

    let cli = Cli::parse();
    let out = cli.out.unwrap_or_else(default_out_path);

    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("reading standard input")?;

    if input.trim().is_empty() {
        warn!("no input received; no messages found");
        return Ok(());
    }

    let base_dir = out
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let processor = ProcessorBuilder::new().with_base_dir(base_dir).build()?;
    let summary = processor.process(&input)?;

    if summary.messages == 0 {
        warn!("no messages after splitting; exiting");
        return Ok(());
    }

    info!(
        messages = summary.messages,
        months_written = summary.months_written,
        blocks_written = summary.blocks_written,
        blocks_skipped = summary.blocks_skipped,
        base_dir = %base_dir.display(),
        "wrote monthly workbooks"
    );
    if !summary.failed_months.is_empty() {
        warn!(failed = ?summary.failed_months, "some months could not be persisted");
    }
    Ok(())
}

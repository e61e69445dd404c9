//! hgx - Hex grid tool for pipes
//!
//! Dump, search and patch binary data with the same grid engine as the editor.

use std::io::{self, Read, Write};

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use hexgrid::grid::{GridPosition, GridRenderer, apply_nibble, hex_format, search};

/// Hex grid tool for pipes
#[derive(Parser, Debug)]
#[command(name = "hgx")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print address, hex and ASCII panes side by side
    Dump {
        /// Input file (default: stdin)
        #[arg(short, long)]
        input: Option<String>,
    },

    /// Find hex pattern in input, output matching offsets
    Find {
        /// Hex pattern to search (e.g., "DEADBEEF" or "DE AD BE EF")
        pattern: String,

        /// Input file (default: stdin)
        #[arg(short, long)]
        input: Option<String>,

        /// Output format: "hex" (default), "dec", "both"
        #[arg(short, long, default_value = "hex")]
        format: String,
    },

    /// Overwrite bytes at specific offsets (length never changes)
    Patch {
        /// Patches in format "offset=hexvalue" (e.g., "0x100=FF" "0x200=DEAD")
        patches: Vec<String>,

        /// Input file (default: stdin)
        #[arg(short, long)]
        input: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    match args.command {
        Command::Dump { input } => cmd_dump(input.as_deref()),
        Command::Find { pattern, input, format } => cmd_find(&pattern, input.as_deref(), &format),
        Command::Patch { patches, input } => cmd_patch(&patches, input.as_deref()),
    }
}

/// Read input from file or stdin
fn read_input(path: Option<&str>) -> Result<Vec<u8>> {
    match path {
        Some(p) => Ok(std::fs::read(p)?),
        None => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Parse offset (hex with 0x prefix or decimal)
fn parse_offset(s: &str) -> Result<usize> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        usize::from_str_radix(hex, 16).map_err(|e| anyhow::anyhow!("Invalid hex offset: {}", e))
    } else {
        s.parse().map_err(|e| anyhow::anyhow!("Invalid offset: {}", e))
    }
}

/// Join the three panes line by line
fn dump_lines(data: &[u8]) -> Vec<String> {
    let text = GridRenderer::default().render_full(data);
    text.offsets
        .lines()
        .zip(text.hex.lines())
        .zip(text.ascii.lines())
        .map(|((addr, hex), ascii)| format!("{}  {} |{}|", addr, hex, ascii))
        .collect()
}

/// Overwrite `value` at `offset`, one nibble at a time
fn patch_bytes(data: &mut [u8], offset: usize, value: &str) -> Result<()> {
    let bytes = hex_format::parse(value)?;
    if offset.checked_add(bytes.len()).is_none_or(|end| end > data.len()) {
        bail!(
            "Patch at {} with {} bytes exceeds file size {}",
            offset,
            bytes.len(),
            data.len()
        );
    }

    let renderer = GridRenderer::default();
    let mut position = Some(GridPosition::high(offset));
    for digit in value.chars().filter(|c| !c.is_whitespace()) {
        let Some(pos) = position else {
            break;
        };
        position = apply_nibble(&renderer, data, pos, digit)?.next;
    }
    debug!(offset, bytes = bytes.len(), "patched");
    Ok(())
}

// === Commands ===

fn cmd_dump(input: Option<&str>) -> Result<()> {
    let data = read_input(input)?;
    let mut stdout = io::stdout().lock();
    for line in dump_lines(&data) {
        writeln!(stdout, "{}", line)?;
    }
    Ok(())
}

fn cmd_find(pattern: &str, input: Option<&str>, format: &str) -> Result<()> {
    let data = read_input(input)?;
    let pattern_bytes = hex_format::parse(pattern)?;
    if pattern_bytes.is_empty() {
        bail!("Empty pattern");
    }
    let matches = search::find_all(&data, &pattern_bytes);

    for offset in matches {
        match format {
            "dec" => println!("{}", offset),
            "both" => println!("0x{:08X} ({})", offset, offset),
            _ => println!("0x{:08X}", offset),
        }
    }

    Ok(())
}

fn cmd_patch(patches: &[String], input: Option<&str>) -> Result<()> {
    let mut data = read_input(input)?;

    for patch in patches {
        let Some((offset, value)) = patch.split_once('=') else {
            bail!("Patch must be in format 'offset=hexvalue': {}", patch);
        };
        patch_bytes(&mut data, parse_offset(offset)?, value)?;
    }

    io::stdout().write_all(&data)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dump_joins_panes() {
        let lines = dump_lines(b"Hello World!");
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("00000000  48 65 6C 6C 6F 20 57 6F  72 6C 64 21"));
        assert!(lines[0].ends_with("|Hello World!|"));
    }

    #[test]
    fn patch_overwrites_in_place() {
        let mut data = vec![0u8; 4];
        patch_bytes(&mut data, 1, "DE AD").unwrap();
        assert_eq!(data, vec![0x00, 0xDE, 0xAD, 0x00]);
    }

    #[test]
    fn patch_to_last_byte() {
        let mut data = vec![0u8; 2];
        patch_bytes(&mut data, 1, "7f").unwrap();
        assert_eq!(data, vec![0x00, 0x7F]);
    }

    #[test]
    fn patch_past_end_is_rejected() {
        let mut data = vec![0u8; 2];
        assert!(patch_bytes(&mut data, 1, "0102").is_err());
        assert!(patch_bytes(&mut data, 0, "123").is_err());
        assert_eq!(data, vec![0, 0]);
    }

    #[test]
    fn patch_offset_overflow_is_rejected() {
        let mut data = vec![0u8; 4];
        assert!(patch_bytes(&mut data, usize::MAX, "FF").is_err());
        assert!(patch_bytes(&mut data, usize::MAX - 1, "0102").is_err());
        assert_eq!(data, vec![0; 4]);
    }

    #[test]
    fn offsets() {
        assert_eq!(parse_offset("0x10").unwrap(), 16);
        assert_eq!(parse_offset("10").unwrap(), 10);
        assert!(parse_offset("zz").is_err());
    }
}

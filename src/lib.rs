use std::{
    error,
    fmt::Display,
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, enabled, Level};

pub mod blocks;
pub mod disk_map;

pub use blocks::Blocks;
pub use disk_map::{DiskMap, Extent};

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    InvalidChar(char),
    EmptyDiskMap,
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidChar(c) => write!(f, "Invalid character({}) for disk map text.", c),
            Error::EmptyDiskMap => write!(
                f,
                "Can't read disk map from empty text, expect one line of digits."
            ),
        }
    }
}

impl error::Error for Error {}

#[derive(Debug, Parser)]
#[command(version, about = "Compact a disk map and print its checksums")]
pub struct CLIArgs {
    #[arg(default_value = "inputs.txt")]
    pub input_path: PathBuf,

    /// Which part to run, both parts run if absent
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=2))]
    pub part: Option<u8>,

    /// Turn debugging information on
    #[arg(short, long)]
    pub debug: bool,
}

impl CLIArgs {
    pub fn parts(&self) -> Vec<u8> {
        match self.part {
            Some(part) => vec![part],
            None => vec![1, 2],
        }
    }
}

pub fn checksum_per_block(disk_map: &DiskMap) -> usize {
    let blocks = disk_map.to_blocks();
    if enabled!(Level::DEBUG) {
        let compacted = blocks.compact_per_block();
        debug!(layout = %compacted, "Compacted one block at a time.");
    }

    blocks.per_block_checksum()
}

pub fn checksum_per_file(disk_map: &DiskMap) -> usize {
    let blocks = disk_map.compact_per_file();
    debug!(layout = %blocks, "Compacted one file at a time.");
    blocks.checksum()
}

pub fn read_disk_map<P: AsRef<Path>>(path: P) -> Result<DiskMap> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open disk map file({}).", path.display()))?;
    let mut disk_map_text = String::new();
    BufReader::new(file)
        .read_line(&mut disk_map_text)
        .with_context(|| format!("Failed to read disk map line from file({}).", path.display()))?;

    DiskMap::try_from(disk_map_text.trim_end_matches(['\n', '\r']))
        .with_context(|| format!("Invalid disk map in file({}).", path.display()))
}

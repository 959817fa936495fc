use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use disk_fragmenter::CLIArgs;
use tracing::{info, level_filters::LevelFilter};

fn main() -> Result<()> {
    let args = CLIArgs::parse();
    let level_filter = if args.debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level_filter)
        .with_writer(std::io::stderr)
        .init();

    let disk_map = disk_fragmenter::read_disk_map(&args.input_path).with_context(|| {
        format!(
            "Failed to read disk map from given file({}).",
            args.input_path.display()
        )
    })?;
    info!(
        extents = disk_map.extents().len(),
        blocks = disk_map.blocks_n(),
        "Read disk map from {}.",
        args.input_path.display()
    );

    for part in args.parts() {
        let start = Instant::now();
        let checksum = match part {
            1 => disk_fragmenter::checksum_per_block(&disk_map),
            _ => disk_fragmenter::checksum_per_file(&disk_map),
        };
        info!(part, elapsed = ?start.elapsed(), "Computed checksum.");
        println!("{}", checksum);
    }

    Ok(())
}

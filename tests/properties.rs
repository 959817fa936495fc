use std::collections::BTreeMap;

use disk_fragmenter::{Blocks, DiskMap};
use proptest::prelude::*;

// Swap the last file block into the first free block until no free block comes before a file block.
fn swap_per_block(blocks: &Blocks) -> Blocks {
    let mut blocks = blocks.as_slice().to_vec();
    loop {
        let first_free = blocks.iter().position(|b| b.is_none());
        let last_file = blocks.iter().rposition(|b| b.is_some());
        match (first_free, last_file) {
            (Some(free_ind), Some(file_ind)) if free_ind < file_ind => blocks.swap(free_ind, file_ind),
            _ => break,
        }
    }

    Blocks::from(blocks)
}

// Move each file once, highest id first, into the leftmost free span before it that can hold it.
fn move_per_file(blocks: &Blocks, files_n: usize) -> Blocks {
    let mut blocks = blocks.as_slice().to_vec();
    for id in (0..files_n).rev() {
        let Some(file_start) = blocks.iter().position(|b| *b == Some(id)) else {
            continue;
        };
        let file_len = blocks[file_start..]
            .iter()
            .take_while(|b| **b == Some(id))
            .count();

        let mut span_start = 0;
        while span_start < file_start {
            if blocks[span_start].is_some() {
                span_start += 1;
                continue;
            }

            let span_len = blocks[span_start..file_start]
                .iter()
                .take_while(|b| b.is_none())
                .count();
            if span_len >= file_len {
                for offset in 0..file_len {
                    blocks.swap(span_start + offset, file_start + offset);
                }
                break;
            }
            span_start += span_len;
        }
    }

    Blocks::from(blocks)
}

fn disk_map_text() -> impl Strategy<Value = String> {
    (prop::collection::vec((1u8..=9, 0u8..=9), 0..30), 1u8..=9).prop_map(|(pairs, last)| {
        pairs
            .into_iter()
            .flat_map(|(file, free)| [file, free])
            .chain([last])
            .map(|d| char::from(b'0' + d))
            .collect()
    })
}

proptest! {
    #[test]
    fn compaction_conserves_file_blocks(text in "[0-9]{1,60}") {
        let disk_map = DiskMap::try_from(text.as_str()).unwrap();
        let blocks = disk_map.to_blocks();
        let counts = blocks.file_block_counts();
        let expected: BTreeMap<usize, usize> = disk_map
            .extents()
            .iter()
            .filter_map(|e| e.file_id().map(|id| (id, e.len())))
            .filter(|(_, len)| *len > 0)
            .collect();
        prop_assert_eq!(&counts, &expected);

        let per_block = blocks.compact_per_block();
        prop_assert_eq!(per_block.len(), blocks.len());
        prop_assert_eq!(&per_block.file_block_counts(), &counts);

        let per_file = disk_map.compact_per_file();
        prop_assert_eq!(per_file.len(), blocks.len());
        prop_assert_eq!(&per_file.file_block_counts(), &counts);
    }

    #[test]
    fn per_block_matches_swapping(text in "[0-9]{1,60}") {
        let blocks = DiskMap::try_from(text.as_str()).unwrap().to_blocks();
        let swapped = swap_per_block(&blocks);
        prop_assert!(swapped.is_compact());
        prop_assert_eq!(blocks.per_block_checksum(), swapped.checksum());
        prop_assert_eq!(blocks.compact_per_block(), swapped);
    }

    #[test]
    fn per_file_matches_moving_files(text in disk_map_text()) {
        let disk_map = DiskMap::try_from(text.as_str()).unwrap();
        let moved = move_per_file(&disk_map.to_blocks(), disk_map.files_n());
        prop_assert_eq!(disk_map.compact_per_file().checksum(), moved.checksum());
    }

    #[test]
    fn compacted_checksum_is_stable(text in "[0-9]{1,60}") {
        let compacted = DiskMap::try_from(text.as_str()).unwrap().to_blocks().compact_per_block();
        prop_assert_eq!(compacted.checksum(), compacted.per_block_checksum());
        prop_assert_eq!(compacted.compact_per_block().checksum(), compacted.checksum());
    }
}

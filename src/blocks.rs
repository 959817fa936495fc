use std::{collections::BTreeMap, fmt::Display};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blocks {
    blocks: Vec<Option<usize>>, // One per disk block, the file id in it or None for free space.
}

impl From<Vec<Option<usize>>> for Blocks {
    fn from(blocks: Vec<Option<usize>>) -> Self {
        Self { blocks }
    }
}

impl Display for Blocks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for block in &self.blocks {
            match block {
                Some(id) => write!(f, "{}", id)?,
                None => write!(f, ".")?,
            }
        }

        Ok(())
    }
}

impl Blocks {
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn as_slice(&self) -> &[Option<usize>] {
        &self.blocks
    }

    pub fn file_blocks_n(&self) -> usize {
        self.blocks.iter().filter(|b| b.is_some()).count()
    }

    pub fn checksum(&self) -> usize {
        self.blocks
            .iter()
            .enumerate()
            .filter_map(|(ind, b)| b.as_ref().map(|id| ind * *id))
            .sum::<usize>()
    }

    pub fn file_block_counts(&self) -> BTreeMap<usize, usize> {
        let mut counts = BTreeMap::new();
        for id in self.blocks.iter().flatten() {
            *counts.entry(*id).or_insert(0) += 1;
        }

        counts
    }

    pub fn is_compact(&self) -> bool {
        match self.blocks.iter().position(|b| b.is_none()) {
            Some(first_free_ind) => self.blocks[first_free_ind..].iter().all(|b| b.is_none()),
            None => true,
        }
    }

    pub fn per_block_moves(&self) -> PerBlockMoves<'_> {
        PerBlockMoves {
            blocks: &self.blocks,
            ind: 0,
            end_ind: self.file_blocks_n(),
            back_ind: self.blocks.len(),
        }
    }

    pub fn per_block_checksum(&self) -> usize {
        self.per_block_moves().map(|(ind, id)| ind * id).sum()
    }

    pub fn compact_per_block(&self) -> Blocks {
        let mut blocks = vec![None; self.blocks.len()];
        for (ind, id) in self.per_block_moves() {
            blocks[ind] = Some(id);
        }

        Blocks { blocks }
    }
}

/// Walks the layout left to right, filling each free block with the last file
/// block not taken yet. Yields `(position, file id)` for every position before
/// the count of file blocks, which is where the compacted files end.
#[derive(Debug)]
pub struct PerBlockMoves<'a> {
    blocks: &'a [Option<usize>],
    ind: usize,
    end_ind: usize,
    back_ind: usize, // Blocks from here on are either free or already moved.
}

impl Iterator for PerBlockMoves<'_> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if self.ind >= self.end_ind {
            return None;
        }

        let ind = self.ind;
        self.ind += 1;
        let file_id = match self.blocks[ind] {
            Some(id) => id,
            None => loop {
                self.back_ind -= 1;
                if let Some(id) = self.blocks[self.back_ind] {
                    break id;
                }
            },
        };

        Some((ind, file_id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left_n = self.end_ind.saturating_sub(self.ind);
        (left_n, Some(left_n))
    }
}

impl ExactSizeIterator for PerBlockMoves<'_> {}

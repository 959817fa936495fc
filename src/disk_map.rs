use std::iter;

use crate::{blocks::Blocks, Error};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extent {
    file_id: Option<usize>, // Some, a run of blocks of the file with this id; None, a run of free blocks.
    len: usize,
}

impl Extent {
    pub fn file(id: usize, len: usize) -> Self {
        Self {
            file_id: Some(id),
            len,
        }
    }

    pub fn free(len: usize) -> Self {
        Self { file_id: None, len }
    }

    pub fn file_id(&self) -> Option<usize> {
        self.file_id
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_free(&self) -> bool {
        self.file_id.is_none()
    }

    fn blocks(&self) -> impl Iterator<Item = Option<usize>> {
        iter::repeat(self.file_id).take(self.len)
    }
}

#[derive(Debug, Clone)]
pub struct DiskMap {
    extents: Vec<Extent>,
}

impl TryFrom<&str> for DiskMap {
    type Error = Error;

    fn try_from(value: &str) -> std::result::Result<Self, Self::Error> {
        if value.is_empty() {
            return Err(Error::EmptyDiskMap);
        }

        let mut extents = Vec::with_capacity(value.len());
        let mut file_id = 0;
        let mut is_free = false;
        for c in value.chars() {
            let len = c.to_digit(10).ok_or(Error::InvalidChar(c))? as usize;
            let extent = if is_free {
                Extent::free(len)
            } else {
                let cur_file_id = file_id;
                file_id += 1;
                Extent::file(cur_file_id, len)
            };
            extents.push(extent);
            is_free = !is_free;
        }

        Ok(Self { extents })
    }
}

impl DiskMap {
    pub fn extents(&self) -> &[Extent] {
        &self.extents
    }

    pub fn files_n(&self) -> usize {
        self.extents.iter().filter(|e| !e.is_free()).count()
    }

    pub fn file_blocks_n(&self) -> usize {
        self.extents
            .iter()
            .filter(|e| !e.is_free())
            .map(Extent::len)
            .sum()
    }

    pub fn blocks_n(&self) -> usize {
        self.extents.iter().map(Extent::len).sum()
    }

    pub fn to_blocks(&self) -> Blocks {
        let mut blocks = Vec::with_capacity(self.blocks_n());
        for extent in &self.extents {
            blocks.extend(extent.blocks());
        }

        Blocks::from(blocks)
    }

    // Fill each free span, left to right, with the files behind it, trying them from the back.
    // A file goes into the first span that can hold all of it, and each span is searched only once.
    pub fn compact_per_file(&self) -> Blocks {
        let mut extents = self.extents.clone();
        let mut blocks = Vec::with_capacity(self.blocks_n());
        // The search steps by 2 from the last extent, so a map ending in free space only meets free extents.
        let last_ind = extents.len().saturating_sub(1);
        for ind in 0..extents.len() {
            let extent = extents[ind];
            if !extent.is_free() || extent.len == 0 {
                blocks.extend(extent.blocks());
                continue;
            }

            let mut free_n = extent.len;
            for move_ind in ((ind + 1)..=last_ind).rev().step_by(2) {
                let candidate = extents[move_ind];
                if candidate.is_free() || candidate.len > free_n {
                    continue;
                }

                blocks.extend(candidate.blocks());
                free_n -= candidate.len;
                extents[move_ind] = Extent::free(candidate.len);
                if free_n == 0 {
                    break;
                }
            }

            blocks.extend(iter::repeat(None).take(free_n));
        }

        Blocks::from(blocks)
    }
}

// SPDX-License-Identifier: MIT

//! In-memory index over the parsed summary records.
//!
//! Built once, never mutated afterward. Every keyed structure is a
//! `BTreeMap`/`BTreeSet` so the auditors enumerate in ascending numeric
//! order and the reported output is reproducible.

use std::collections::{BTreeMap, BTreeSet};

use crate::errors::{SummaryError, SummaryResult};
use crate::types::*;

/// Discovered directory references vs the stored link count of one inode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkTally {
    /// Number of directory entries resolving to this inode.
    pub discovered: u32,
    /// Link count stored in the inode record; 0 if the inode has none.
    pub stored: u32,
}

#[derive(Debug, Clone)]
pub struct MetadataStore {
    group: GroupSummary,
    inodes: BTreeMap<u32, InodeRecord>,
    free_blocks: BTreeSet<u32>,
    free_inodes: BTreeSet<u32>,
    allocated_blocks: BTreeSet<u32>,
    block_refs: BTreeMap<u32, Vec<(u32, u32)>>,
    link_tally: BTreeMap<u32, LinkTally>,
    dir_children: BTreeMap<u32, Vec<u32>>,
    dirents: Vec<DirEntry>,
}

impl MetadataStore {
    /// Indexes the records. Fails only when no group summary row is present;
    /// without one the block and inode ranges are unknown.
    pub fn load(records: Vec<SummaryRecord>) -> SummaryResult<Self> {
        let group = records
            .iter()
            .find_map(|r| match r {
                SummaryRecord::Group(g) => Some(*g),
                _ => None,
            })
            .ok_or(SummaryError::MissingGroup)?;

        let mut store = Self {
            group,
            inodes: BTreeMap::new(),
            free_blocks: BTreeSet::new(),
            free_inodes: BTreeSet::new(),
            allocated_blocks: BTreeSet::new(),
            block_refs: BTreeMap::new(),
            link_tally: BTreeMap::new(),
            dir_children: BTreeMap::new(),
            dirents: Vec::new(),
        };

        for record in records {
            match record {
                SummaryRecord::Group(_) => {}
                SummaryRecord::Inode(rec) => store.index_inode(rec),
                SummaryRecord::Indirect(rec) => store.index_indirect(rec),
                SummaryRecord::FreeBlock(block) => {
                    store.free_blocks.insert(block);
                }
                SummaryRecord::FreeInode(inode) => {
                    store.free_inodes.insert(inode);
                }
                SummaryRecord::DirEntry(entry) => store.index_dirent(entry),
            }
        }

        // Stored link counts come from the inode table; inodes only seen
        // through directory entries keep stored = 0 (unused).
        for (inode, rec) in &store.inodes {
            store.link_tally.entry(*inode).or_default().stored = rec.link_count;
        }

        Ok(store)
    }

    fn index_inode(&mut self, rec: InodeRecord) {
        for (slot, &block) in rec.blocks.iter().enumerate() {
            if block == 0 {
                continue;
            }
            self.allocated_blocks.insert(block);
            self.block_refs
                .entry(block)
                .or_default()
                .push((rec.inode, slot_offset(slot)));
        }
        self.inodes.insert(rec.inode, rec);
    }

    fn index_indirect(&mut self, rec: IndirectRecord) {
        self.allocated_blocks.insert(rec.block);
        self.block_refs
            .entry(rec.block)
            .or_default()
            .push((rec.inode, rec.offset));
    }

    fn index_dirent(&mut self, entry: DirEntry) {
        self.link_tally.entry(entry.target).or_default().discovered += 1;
        self.dir_children
            .entry(entry.parent)
            .or_default()
            .push(entry.target);
        self.dirents.push(entry);
    }

    pub fn group(&self) -> &GroupSummary {
        &self.group
    }

    /// Inode table, ascending inode number. The key set is the allocated set.
    pub fn inodes(&self) -> &BTreeMap<u32, InodeRecord> {
        &self.inodes
    }

    pub fn free_blocks(&self) -> &BTreeSet<u32> {
        &self.free_blocks
    }

    pub fn free_inodes(&self) -> &BTreeSet<u32> {
        &self.free_inodes
    }

    /// Every block number referenced by any inode slot or indirect row.
    pub fn allocated_blocks(&self) -> &BTreeSet<u32> {
        &self.allocated_blocks
    }

    /// Block number -> `(inode, offset)` references, in load order per block.
    pub fn block_refs(&self) -> &BTreeMap<u32, Vec<(u32, u32)>> {
        &self.block_refs
    }

    pub fn link_tally(&self) -> &BTreeMap<u32, LinkTally> {
        &self.link_tally
    }

    /// Directory inode -> target inodes of its entries, in load order.
    pub fn dir_children(&self) -> &BTreeMap<u32, Vec<u32>> {
        &self.dir_children
    }

    /// Directory entries in load order.
    pub fn dirents(&self) -> &[DirEntry] {
        &self.dirents
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_summary;

    fn store(input: &str) -> MetadataStore {
        MetadataStore::load(parse_summary(input)).expect("load failed")
    }

    #[test]
    fn test_missing_group_is_an_error() {
        let err = MetadataStore::load(parse_summary("BFREE,9\n")).unwrap_err();
        assert_eq!(err, SummaryError::MissingGroup);
    }

    #[test]
    fn test_allocated_blocks_and_refs() {
        let s = store(
            "GROUP,64,24,11\n\
             INODE,12,1,20,0,0,0,0,0,0,0,0,0,0,0,30,0,0\n\
             INDIRECT,12,12,31\n",
        );
        assert!(s.allocated_blocks().contains(&20));
        assert!(s.allocated_blocks().contains(&30));
        assert!(s.allocated_blocks().contains(&31));
        // Zero slots never count as references.
        assert!(!s.allocated_blocks().contains(&0));
        assert_eq!(s.block_refs()[&20], vec![(12, 0)]);
        assert_eq!(s.block_refs()[&30], vec![(12, 12)]);
    }

    #[test]
    fn test_link_tally() {
        let s = store(
            "GROUP,64,24,11\n\
             INODE,12,2,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0\n\
             DIRENT,2,12,'d'\n\
             DIRENT,12,12,'.'\n\
             DIRENT,2,13,'ghost'\n",
        );
        assert_eq!(
            s.link_tally()[&12],
            LinkTally {
                discovered: 2,
                stored: 2,
            }
        );
        // Referenced but not in the inode table: stored stays 0.
        assert_eq!(
            s.link_tally()[&13],
            LinkTally {
                discovered: 1,
                stored: 0,
            }
        );
    }

    #[test]
    fn test_dir_children_load_order() {
        let s = store(
            "GROUP,64,24,11\n\
             DIRENT,2,12,'b'\n\
             DIRENT,2,11,'a'\n",
        );
        assert_eq!(s.dir_children()[&2], vec![12, 11]);
    }
}

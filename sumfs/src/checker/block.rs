// SPDX-License-Identifier: MIT

//! Block-pointer validity, block-allocation completeness and duplicate
//! block references.

use crate::constant::FIRST_DATA_BLOCK;
use crate::report::{AuditReport, BlockIssue, Finding};
use crate::store::MetadataStore;
use crate::types::slot_offset;

/// Every nonzero slot of every inode must point into
/// `[FIRST_DATA_BLOCK, block_count)`. Pointers into the reserved metadata
/// blocks `[1, FIRST_DATA_BLOCK)` are RESERVED, everything else out of
/// range is INVALID. Inodes ascending, slots in index order.
pub fn check_pointer_validity(store: &MetadataStore, rep: &mut AuditReport) {
    let block_count = store.group().block_count;
    for (&inode, record) in store.inodes() {
        for (slot, &block) in record.blocks.iter().enumerate() {
            if block == 0 || (FIRST_DATA_BLOCK..block_count).contains(&block) {
                continue;
            }
            let issue = if block < FIRST_DATA_BLOCK {
                BlockIssue::Reserved
            } else {
                BlockIssue::Invalid
            };
            rep.push(Finding::BadBlockPointer {
                issue,
                block,
                inode,
                offset: slot_offset(slot),
            });
        }
    }
}

/// Every legal block must be referenced or free-listed, never both.
/// Freelist collisions first over ascending allocated blocks, then the
/// unreferenced sweep over ascending in-range block numbers.
pub fn check_allocation(store: &MetadataStore, rep: &mut AuditReport) {
    for &block in store.allocated_blocks() {
        if store.free_blocks().contains(&block) {
            rep.push(Finding::AllocatedBlockOnFreelist { block });
        }
    }

    for block in FIRST_DATA_BLOCK..store.group().block_count {
        if !store.allocated_blocks().contains(&block) && !store.free_blocks().contains(&block) {
            rep.push(Finding::UnreferencedBlock { block });
        }
    }
}

/// A legal block may be referenced by at most one `(inode, offset)` pair.
/// For a block with k >= 2 references, k findings are emitted, sorted by
/// ascending offset; blocks ascending.
pub fn check_duplicates(store: &MetadataStore, rep: &mut AuditReport) {
    for (&block, refs) in store.block_refs() {
        if refs.len() < 2 {
            continue;
        }
        let mut refs = refs.clone();
        refs.sort_by_key(|&(_, offset)| offset);
        for (inode, offset) in refs {
            rep.push(Finding::DuplicateBlock {
                block,
                inode,
                offset,
            });
        }
    }
}

// SPDX-License-Identifier: MIT

//! Inode-allocation completeness against the free-inode list.

use std::collections::BTreeSet;

use crate::constant::ROOT_INODE;
use crate::report::{AuditReport, Finding};
use crate::store::MetadataStore;

/// An allocated inode must not be free-listed, and every inode that must be
/// accounted for (root, plus the non-reserved range up to the inode count)
/// must be either allocated or free-listed. Inode 1 and the reserved range
/// below `first_inode` are exempt. Ascending inode order throughout.
pub fn check_allocation(store: &MetadataStore, rep: &mut AuditReport) {
    for &inode in store.inodes().keys() {
        if store.free_inodes().contains(&inode) {
            rep.push(Finding::AllocatedInodeOnFreelist { inode });
        }
    }

    let group = store.group();
    let mut tracked: BTreeSet<u32> = (group.first_inode..=group.inode_count).collect();
    tracked.insert(ROOT_INODE);
    for inode in tracked {
        if !store.free_inodes().contains(&inode) && !store.inodes().contains_key(&inode) {
            rep.push(Finding::UnallocatedInode { inode });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_summary;

    fn store(input: &str) -> MetadataStore {
        MetadataStore::load(parse_summary(input)).expect("load failed")
    }

    fn lines(rep: &AuditReport) -> Vec<String> {
        rep.iter().map(|f| f.to_string()).collect()
    }

    const ZEROS: &str = "0,0,0,0,0,0,0,0,0,0,0,0,0,0,0";

    #[test]
    fn test_allocated_inode_on_freelist() {
        let s = store(&format!(
            "GROUP,64,12,11\n\
             INODE,11,1,{ZEROS}\n\
             INODE,2,1,{ZEROS}\n\
             IFREE,11\nIFREE,12\n",
        ));
        let mut rep = AuditReport::new();
        check_allocation(&s, &mut rep);
        assert_eq!(lines(&rep), ["ALLOCATED INODE 11 ON FREELIST"]);
    }

    #[test]
    fn test_unallocated_inodes_ascending() {
        // Must account for {2} + [11, 13]; 12 is free-listed, 2/11/13 are in
        // neither set.
        let s = store("GROUP,64,13,11\nIFREE,12\n");
        let mut rep = AuditReport::new();
        check_allocation(&s, &mut rep);
        assert_eq!(
            lines(&rep),
            [
                "UNALLOCATED INODE 2 NOT ON FREELIST",
                "UNALLOCATED INODE 11 NOT ON FREELIST",
                "UNALLOCATED INODE 13 NOT ON FREELIST",
            ]
        );
    }

    #[test]
    fn test_reserved_range_is_exempt() {
        // Inodes 1 and 3..=10 are neither allocated nor free-listed but sit
        // below first_inode; only root is demanded.
        let s = store(&format!(
            "GROUP,64,12,11\n\
             INODE,2,1,{ZEROS}\n\
             INODE,11,1,{ZEROS}\n\
             IFREE,12\n",
        ));
        let mut rep = AuditReport::new();
        check_allocation(&s, &mut rep);
        assert!(rep.ok(), "unexpected findings:\n{rep}");
    }
}

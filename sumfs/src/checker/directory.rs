// SPDX-License-Identifier: MIT

//! Directory consistency: reference counts, entry-target validity, and
//! `.`/`..` tree structure.

use crate::constant::ROOT_INODE;
use crate::report::{AuditReport, Finding, TargetIssue};
use crate::store::MetadataStore;

/// For every inode with a nonzero stored link count, the number of
/// directory entries resolving to it must equal that count. Stored count 0
/// means the inode is unused and is skipped. Ascending inode order.
pub fn check_link_counts(store: &MetadataStore, rep: &mut AuditReport) {
    for (&inode, tally) in store.link_tally() {
        if tally.stored == 0 {
            continue;
        }
        if tally.discovered != tally.stored {
            rep.push(Finding::LinkCountMismatch {
                inode,
                discovered: tally.discovered,
                stored: tally.stored,
            });
        }
    }
}

/// Every entry must resolve to a valid, allocated inode. Root references
/// are exempt. A free-listed target reports UNALLOCATED even when it is
/// also out of range. Entries in load order.
pub fn check_entry_targets(store: &MetadataStore, rep: &mut AuditReport) {
    let inode_count = store.group().inode_count;
    for entry in store.dirents() {
        if entry.target == ROOT_INODE {
            continue;
        }
        let issue = if store.free_inodes().contains(&entry.target) {
            TargetIssue::Unallocated
        } else if entry.target < 1 || entry.target > inode_count {
            TargetIssue::Invalid
        } else {
            continue;
        };
        rep.push(Finding::BadEntryTarget {
            dir: entry.parent,
            name: entry.name.clone(),
            issue,
            target: entry.target,
        });
    }
}

/// Pass 1: every `.` entry must target its own directory. Pass 2: every
/// `..` entry must target the directory's true parent; root's `..` targets
/// root itself. The parent search walks directories in ascending inode
/// order and takes the first one listing this directory as a child, so a
/// tie between claimed parents resolves deterministically. A directory no
/// parent lists (orphan) has no defined expectation and its `..` entry is
/// not judged.
pub fn check_tree_links(store: &MetadataStore, rep: &mut AuditReport) {
    for entry in store.dirents() {
        if entry.name == "." && entry.target != entry.parent {
            rep.push(Finding::SelfLinkMismatch {
                dir: entry.parent,
                target: entry.target,
            });
        }
    }

    for entry in store.dirents() {
        if entry.name != ".." {
            continue;
        }
        if entry.parent == ROOT_INODE {
            if entry.target != ROOT_INODE {
                rep.push(Finding::ParentLinkMismatch {
                    dir: entry.parent,
                    target: entry.target,
                    expected: ROOT_INODE,
                });
            }
            continue;
        }
        let Some(expected) = find_parent(store, entry.parent) else {
            continue;
        };
        if entry.target != expected {
            rep.push(Finding::ParentLinkMismatch {
                dir: entry.parent,
                target: entry.target,
                expected,
            });
        }
    }
}

/// First directory, ascending, whose child list contains `dir`. The
/// directory's own entries (its `.` self link) do not make it its own
/// parent.
fn find_parent(store: &MetadataStore, dir: u32) -> Option<u32> {
    store
        .dir_children()
        .iter()
        .find(|&(&parent, children)| parent != dir && children.contains(&dir))
        .map(|(&parent, _)| parent)
}

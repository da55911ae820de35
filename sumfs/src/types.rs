// SPDX-License-Identifier: MIT

//! Record model for the metadata summary.
//!
//! All block and inode numbers use a single canonical `u32` so that set and
//! map lookups never silently miss across record kinds.

use crate::constant::*;

/// Filesystem-wide counters, read once from the group summary row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupSummary {
    /// Total block count; valid block numbers are `< block_count`.
    pub block_count: u32,
    /// Total inode count; valid inode numbers are `1..=inode_count`.
    pub inode_count: u32,
    /// First non-reserved inode number.
    pub first_inode: u32,
}

/// One inode-table row: stored link count plus the 15 block-address slots.
///
/// Slots 0-11 are direct pointers, slot 12 single-indirect, slot 13
/// double-indirect, slot 14 triple-indirect. A slot value of 0 is an unused
/// slot, not a block reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InodeRecord {
    pub inode: u32,
    pub link_count: u32,
    pub blocks: [u32; INODE_SLOTS],
}

/// An indirect-addressing block owned by an inode: the logical offset it
/// occupies within the inode's addressing space and its own block number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndirectRecord {
    pub inode: u32,
    pub offset: u32,
    pub block: u32,
}

/// A name-to-inode mapping inside a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Inode of the directory containing the entry.
    pub parent: u32,
    /// Inode the entry resolves to.
    pub target: u32,
    pub name: String,
}

/// One parsed row of the summary dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryRecord {
    Group(GroupSummary),
    Inode(InodeRecord),
    Indirect(IndirectRecord),
    FreeBlock(u32),
    FreeInode(u32),
    DirEntry(DirEntry),
}

/// Indirection level of a logical offset, for finding labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndirectionLevel {
    None,
    Single,
    Double,
    Triple,
}

impl IndirectionLevel {
    /// Classifies an arbitrary recorded offset by threshold.
    pub fn of_offset(offset: u32) -> Self {
        if offset >= TRIPLE_INDIRECT_OFFSET {
            Self::Triple
        } else if offset >= DOUBLE_INDIRECT_OFFSET {
            Self::Double
        } else if offset >= SINGLE_INDIRECT_OFFSET {
            Self::Single
        } else {
            Self::None
        }
    }

    /// Print label, trailing space included for the non-empty levels.
    pub fn label(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Single => "INDIRECT ",
            Self::Double => "DOUBLE INDIRECT ",
            Self::Triple => "TRIPLE INDIRECT ",
        }
    }
}

/// Logical offset represented by an inode slot index.
///
/// Direct slots map to their own index; the three indirect slots map to the
/// first logical position each indirection level covers.
pub fn slot_offset(slot: usize) -> u32 {
    match slot {
        12 => SINGLE_INDIRECT_OFFSET,
        13 => DOUBLE_INDIRECT_OFFSET,
        14 => TRIPLE_INDIRECT_OFFSET,
        direct => direct as u32,
    }
}

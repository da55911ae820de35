// SPDX-License-Identifier: MIT

//! Fixed geometry of the audited addressing scheme.

/// Direct block-pointer slots per inode.
pub const DIRECT_SLOTS: usize = 12;

/// Total block-address slots per inode (12 direct + single/double/triple).
pub const INODE_SLOTS: usize = 15;

/// Pointers held by one indirect block.
pub const PTRS_PER_BLOCK: u32 = 256;

/// Logical offset represented by the single-indirect slot.
pub const SINGLE_INDIRECT_OFFSET: u32 = DIRECT_SLOTS as u32;

/// Logical offset represented by the double-indirect slot.
pub const DOUBLE_INDIRECT_OFFSET: u32 = SINGLE_INDIRECT_OFFSET + PTRS_PER_BLOCK;

/// Logical offset represented by the triple-indirect slot.
pub const TRIPLE_INDIRECT_OFFSET: u32 = DOUBLE_INDIRECT_OFFSET + PTRS_PER_BLOCK * PTRS_PER_BLOCK;

/// First block usable for file data. Blocks `1..FIRST_DATA_BLOCK` hold the
/// superblock, group descriptors, bitmaps and the inode table.
pub const FIRST_DATA_BLOCK: u32 = 8;

/// Root directory inode.
pub const ROOT_INODE: u32 = 2;

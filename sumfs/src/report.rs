// SPDX-License-Identifier: MIT

//! Audit findings and the append-only report the auditors write to.
//!
//! `Finding` has one variant per reported inconsistency and its `Display`
//! produces the exact output line; the report is the only mutable state of
//! an audit run, and its emptiness decides the exit status.

use core::fmt;

use crate::types::IndirectionLevel;

/// Why a block pointer is bad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockIssue {
    /// Points into the reserved metadata blocks `[1, FIRST_DATA_BLOCK)`.
    Reserved,
    /// Out of the valid block range.
    Invalid,
}

impl BlockIssue {
    fn tag(self) -> &'static str {
        match self {
            Self::Reserved => "RESERVED",
            Self::Invalid => "INVALID",
        }
    }
}

/// Why a directory entry's target inode is bad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetIssue {
    /// Out of the valid inode range.
    Invalid,
    /// On the free-inode list.
    Unallocated,
}

impl TargetIssue {
    fn tag(self) -> &'static str {
        match self {
            Self::Invalid => "INVALID",
            Self::Unallocated => "UNALLOCATED",
        }
    }
}

/// One reported inconsistency between metadata structures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finding {
    BadBlockPointer {
        issue: BlockIssue,
        block: u32,
        inode: u32,
        offset: u32,
    },
    AllocatedBlockOnFreelist {
        block: u32,
    },
    UnreferencedBlock {
        block: u32,
    },
    DuplicateBlock {
        block: u32,
        inode: u32,
        offset: u32,
    },
    AllocatedInodeOnFreelist {
        inode: u32,
    },
    UnallocatedInode {
        inode: u32,
    },
    LinkCountMismatch {
        inode: u32,
        discovered: u32,
        stored: u32,
    },
    BadEntryTarget {
        dir: u32,
        name: String,
        issue: TargetIssue,
        target: u32,
    },
    /// A `.` entry not pointing at its own directory.
    SelfLinkMismatch {
        dir: u32,
        target: u32,
    },
    /// A `..` entry not pointing at the directory's true parent.
    ParentLinkMismatch {
        dir: u32,
        target: u32,
        expected: u32,
    },
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::BadBlockPointer {
                issue,
                block,
                inode,
                offset,
            } => write!(
                f,
                "{} {}BLOCK {block} IN INODE {inode} AT OFFSET {offset}",
                issue.tag(),
                IndirectionLevel::of_offset(*offset).label(),
            ),
            Finding::AllocatedBlockOnFreelist { block } => {
                write!(f, "ALLOCATED BLOCK {block} ON FREELIST")
            }
            Finding::UnreferencedBlock { block } => {
                write!(f, "UNREFERENCED BLOCK {block}")
            }
            Finding::DuplicateBlock {
                block,
                inode,
                offset,
            } => write!(
                f,
                "DUPLICATE {}BLOCK {block} IN INODE {inode} AT OFFSET {offset}",
                IndirectionLevel::of_offset(*offset).label(),
            ),
            Finding::AllocatedInodeOnFreelist { inode } => {
                write!(f, "ALLOCATED INODE {inode} ON FREELIST")
            }
            Finding::UnallocatedInode { inode } => {
                write!(f, "UNALLOCATED INODE {inode} NOT ON FREELIST")
            }
            Finding::LinkCountMismatch {
                inode,
                discovered,
                stored,
            } => write!(
                f,
                "INODE {inode} HAS {discovered} LINKS BUT LINKCOUNT IS {stored}"
            ),
            Finding::BadEntryTarget {
                dir,
                name,
                issue,
                target,
            } => write!(
                f,
                "DIRECTORY INODE {dir} NAME '{name}' {} INODE {target}",
                issue.tag(),
            ),
            Finding::SelfLinkMismatch { dir, target } => write!(
                f,
                "DIRECTORY INODE {dir} NAME '.' LINK TO INODE {target} SHOULD BE {dir}"
            ),
            Finding::ParentLinkMismatch {
                dir,
                target,
                expected,
            } => write!(
                f,
                "DIRECTORY INODE {dir} NAME '..' LINK TO INODE {target} SHOULD BE {expected}"
            ),
        }
    }
}

/// Ordered, append-only sink for audit findings.
#[derive(Debug, Clone, Default)]
pub struct AuditReport {
    findings: Vec<Finding>,
}

impl AuditReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    /// True when the audit found nothing.
    pub fn ok(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn iter(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter()
    }
}

impl fmt::Display for AuditReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for finding in &self.findings {
            writeln!(f, "{finding}")?;
        }
        Ok(())
    }
}

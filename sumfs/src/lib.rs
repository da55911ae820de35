// SPDX-License-Identifier: MIT

//! Record model and consistency auditors for filesystem metadata summaries.
//!
//! A summary dump (group counters, inode table, indirect-block rows, free
//! lists, directory entries) is parsed permissively, indexed once into a
//! [`MetadataStore`], and audited by three independent read-only passes:
//! block pointers/allocation/duplication, inode allocation, and directory
//! link/tree structure. Every inconsistency becomes a [`Finding`] in an
//! ordered [`AuditReport`]; an empty report means the metadata is
//! consistent.

pub mod checker;
pub mod constant;
mod errors;
pub mod parser;
pub mod report;
pub mod store;
pub mod types;

pub use checker::{AuditOptions, AuditPhases, SummaryAuditor};
pub use errors::{SummaryError, SummaryResult};
pub use report::{AuditReport, Finding};
pub use store::MetadataStore;

/// Parses a summary dump and runs the full audit over it.
pub fn audit_summary(input: &str) -> SummaryResult<AuditReport> {
    let store = MetadataStore::load(parser::parse_summary(input))?;
    Ok(SummaryAuditor::new(&store).audit())
}

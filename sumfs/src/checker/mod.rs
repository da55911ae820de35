// SPDX-License-Identifier: MIT

//! Consistency auditors over the metadata store.
//!
//! Three independent passes, each appending zero or more findings to the
//! shared report: block pointers/allocation/duplication, inode allocation,
//! and directory link/tree structure. The passes have no data dependency on
//! each other; the report keeps the fixed component order Block, Inode,
//! Directory so output is stable.

pub mod block;
pub mod directory;
pub mod inode;

use bitflags::bitflags;

use crate::report::AuditReport;
use crate::store::MetadataStore;

bitflags! {
    #[derive(Clone, Copy, Debug)]
    pub struct AuditPhases: u32 {
        const BLOCK     = 1 << 0;
        const INODE     = 1 << 1;
        const DIRECTORY = 1 << 2;
        const ALL       = u32::MAX;
    }
}

#[derive(Clone, Debug)]
pub struct AuditOptions {
    pub phases: AuditPhases,
}

impl Default for AuditOptions {
    fn default() -> Self {
        Self {
            phases: AuditPhases::ALL,
        }
    }
}

pub struct SummaryAuditor<'a> {
    store: &'a MetadataStore,
}

impl<'a> SummaryAuditor<'a> {
    pub fn new(store: &'a MetadataStore) -> Self {
        Self { store }
    }

    /// Runs every enabled phase and returns the accumulated report.
    pub fn audit_with(&self, opt: &AuditOptions) -> AuditReport {
        let mut rep = AuditReport::new();
        self.run_phase(opt, &mut rep, AuditPhases::BLOCK, Self::audit_blocks);
        self.run_phase(opt, &mut rep, AuditPhases::INODE, Self::audit_inodes);
        self.run_phase(opt, &mut rep, AuditPhases::DIRECTORY, Self::audit_directories);
        rep
    }

    /// Full audit with default options.
    pub fn audit(&self) -> AuditReport {
        self.audit_with(&AuditOptions::default())
    }

    fn audit_blocks(&self, rep: &mut AuditReport) {
        block::check_pointer_validity(self.store, rep);
        block::check_allocation(self.store, rep);
        block::check_duplicates(self.store, rep);
    }

    fn audit_inodes(&self, rep: &mut AuditReport) {
        inode::check_allocation(self.store, rep);
    }

    fn audit_directories(&self, rep: &mut AuditReport) {
        directory::check_link_counts(self.store, rep);
        directory::check_entry_targets(self.store, rep);
        directory::check_tree_links(self.store, rep);
    }

    // Findings are never fatal: every enabled phase runs to completion no
    // matter what earlier phases reported.
    fn run_phase<F>(&self, opt: &AuditOptions, rep: &mut AuditReport, phase: AuditPhases, f: F)
    where
        F: Fn(&Self, &mut AuditReport),
    {
        if opt.phases.contains(phase) {
            f(self, rep);
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

    // Every block in range accounted for, one allocated directory inode,
    // correct `.`/`..` self links on root.
    const CLEAN: &str = "GROUP,16,3,3\n\
                         INODE,2,2,8,0,0,0,0,0,0,0,0,0,0,0,0,0,0\n\
                         IFREE,3\n\
                         BFREE,9\nBFREE,10\nBFREE,11\nBFREE,12\n\
                         BFREE,13\nBFREE,14\nBFREE,15\n\
                         DIRENT,2,2,'.'\n\
                         DIRENT,2,2,'..'\n";

    #[test]
    fn test_clean_dataset_is_silent() {
        let s = store(CLEAN);
        let rep = SummaryAuditor::new(&s).audit();
        assert!(rep.ok(), "unexpected findings:\n{rep}");
    }

    #[test]
    fn test_audit_is_idempotent() {
        let input = CLEAN.replace("BFREE,9\n", "");
        let s = store(&input);
        let auditor = SummaryAuditor::new(&s);
        let first = auditor.audit().to_string();
        let second = auditor.audit().to_string();
        assert_eq!(first, "UNREFERENCED BLOCK 9\n");
        assert_eq!(first, second);
    }

    #[test]
    fn test_phase_selection() {
        let input = CLEAN.replace("IFREE,3\n", "");
        let s = store(&input);
        let auditor = SummaryAuditor::new(&s);

        let opt = AuditOptions {
            phases: AuditPhases::BLOCK,
        };
        assert!(auditor.audit_with(&opt).ok());

        let opt = AuditOptions {
            phases: AuditPhases::INODE,
        };
        let rep = auditor.audit_with(&opt);
        assert_eq!(rep.to_string(), "UNALLOCATED INODE 3 NOT ON FREELIST\n");
    }

    #[test]
    fn test_every_phase_runs_despite_earlier_findings() {
        // Block-phase findings never stop the inode and directory phases.
        let input = CLEAN.replace("BFREE,9\n", "BFREE,8\nBFREE,9\n").replace(
            "INODE,2,2,8",
            "INODE,2,5,8",
        );
        let s = store(&input);
        let rep = SummaryAuditor::new(&s).audit();
        assert_eq!(
            rep.to_string(),
            "ALLOCATED BLOCK 8 ON FREELIST\n\
             INODE 2 HAS 2 LINKS BUT LINKCOUNT IS 5\n"
        );
    }
}

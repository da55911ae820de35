// SPDX-License-Identifier: MIT

//! Permissive parser for the metadata summary dump.
//!
//! One comma-separated row per line, tagged by a leading type name:
//!
//! ```text
//! GROUP,<block_count>,<inode_count>,<first_inode>
//! INODE,<inode>,<link_count>,<b0>,...,<b14>
//! INDIRECT,<inode>,<offset>,<block>
//! BFREE,<block>
//! IFREE,<inode>
//! DIRENT,<parent>,<target>,<name>
//! ```
//!
//! Unknown tags, short rows and non-numeric fields are skipped without
//! error: the audit favors running over failing on dump noise.

use crate::constant::INODE_SLOTS;
use crate::types::*;

/// Parses every recognizable row of the dump, skipping the rest.
pub fn parse_summary(input: &str) -> Vec<SummaryRecord> {
    input.lines().filter_map(parse_row).collect()
}

fn parse_row(line: &str) -> Option<SummaryRecord> {
    let fields: Vec<&str> = line.trim().split(',').collect();
    match *fields.first()? {
        "GROUP" => parse_group(&fields),
        "INODE" => parse_inode(&fields),
        "INDIRECT" => parse_indirect(&fields),
        "BFREE" => Some(SummaryRecord::FreeBlock(num(&fields, 1)?)),
        "IFREE" => Some(SummaryRecord::FreeInode(num(&fields, 1)?)),
        "DIRENT" => parse_dirent(&fields),
        _ => None,
    }
}

fn num(fields: &[&str], idx: usize) -> Option<u32> {
    fields.get(idx)?.trim().parse().ok()
}

fn parse_group(fields: &[&str]) -> Option<SummaryRecord> {
    Some(SummaryRecord::Group(GroupSummary {
        block_count: num(fields, 1)?,
        inode_count: num(fields, 2)?,
        first_inode: num(fields, 3)?,
    }))
}

fn parse_inode(fields: &[&str]) -> Option<SummaryRecord> {
    let mut blocks = [0u32; INODE_SLOTS];
    for (slot, block) in blocks.iter_mut().enumerate() {
        *block = num(fields, 3 + slot)?;
    }
    Some(SummaryRecord::Inode(InodeRecord {
        inode: num(fields, 1)?,
        link_count: num(fields, 2)?,
        blocks,
    }))
}

fn parse_indirect(fields: &[&str]) -> Option<SummaryRecord> {
    Some(SummaryRecord::Indirect(IndirectRecord {
        inode: num(fields, 1)?,
        offset: num(fields, 2)?,
        block: num(fields, 3)?,
    }))
}

fn parse_dirent(fields: &[&str]) -> Option<SummaryRecord> {
    if fields.len() < 4 {
        return None;
    }
    // Names may contain commas; everything past the third separator is name.
    let name = fields[3..].join(",");
    let name = name
        .strip_prefix('\'')
        .and_then(|n| n.strip_suffix('\''))
        .unwrap_or(&name);
    Some(SummaryRecord::DirEntry(DirEntry {
        parent: num(fields, 1)?,
        target: num(fields, 2)?,
        name: name.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_rows() {
        let records = parse_summary(
            "GROUP,64,24,11\n\
             BFREE,9\n\
             IFREE,12\n\
             INDIRECT,13,12,40\n\
             DIRENT,2,2,'.'\n",
        );
        assert_eq!(records.len(), 5);
        assert_eq!(
            records[0],
            SummaryRecord::Group(GroupSummary {
                block_count: 64,
                inode_count: 24,
                first_inode: 11,
            })
        );
        assert_eq!(records[1], SummaryRecord::FreeBlock(9));
        assert_eq!(records[2], SummaryRecord::FreeInode(12));
        assert_eq!(
            records[3],
            SummaryRecord::Indirect(IndirectRecord {
                inode: 13,
                offset: 12,
                block: 40,
            })
        );
    }

    #[test]
    fn test_parse_inode_slots() {
        let row = "INODE,12,2,8,9,10,0,0,0,0,0,0,0,0,0,41,42,43";
        let records = parse_summary(row);
        let SummaryRecord::Inode(rec) = &records[0] else {
            panic!("expected inode record");
        };
        assert_eq!(rec.inode, 12);
        assert_eq!(rec.link_count, 2);
        assert_eq!(&rec.blocks[..3], &[8, 9, 10]);
        assert_eq!(&rec.blocks[12..], &[41, 42, 43]);
    }

    #[test]
    fn test_dirent_name_quotes_stripped() {
        let records = parse_summary("DIRENT,2,11,'lost+found'");
        let SummaryRecord::DirEntry(d) = &records[0] else {
            panic!("expected dirent");
        };
        assert_eq!(d.parent, 2);
        assert_eq!(d.target, 11);
        assert_eq!(d.name, "lost+found");
    }

    #[test]
    fn test_dirent_name_with_comma() {
        let records = parse_summary("DIRENT,2,13,'a,b'");
        let SummaryRecord::DirEntry(d) = &records[0] else {
            panic!("expected dirent");
        };
        assert_eq!(d.name, "a,b");
    }

    #[test]
    fn test_noise_skipped() {
        let records = parse_summary(
            "SUPERBLOCK,64,24,1024,128\n\
             GROUP,64,24,11\n\
             BFREE,not_a_number\n\
             INODE,5,1\n\
             \n\
             garbage line\n",
        );
        assert_eq!(records.len(), 1);
    }
}

//! Read-only tree dump of a block forest.
//!
//! Standalone introspection: every block's tag, decoded payload fields,
//! resource descriptor, and child count, in nesting order. Independent of
//! mesh extraction.

use std::fmt::Write;

use crate::block::Block;

/// Render the forest as tab-indented text.
pub fn dump_blocks(blocks: &[Block]) -> String {
    let mut out = String::new();
    dump_level(blocks, 0, &mut out);
    out
}

fn dump_level(blocks: &[Block], level: usize, out: &mut String) {
    for block in blocks {
        indent(out, level);
        let _ = writeln!(
            out,
            "Block Type: {}{}",
            block.tag,
            if block.is_unknown() {
                " (unknown block type)"
            } else {
                ""
            }
        );

        let info = block.payload.info();
        for line in info.lines().filter(|line| !line.is_empty()) {
            indent(out, level + 1);
            out.push_str(line);
            out.push('\n');
        }

        if let Some(desc) = &block.resource {
            indent(out, level + 1);
            let _ = writeln!(
                out,
                "Resource: {} buffer, offset {:#x} (masked {:#x}), length {}",
                desc.selector,
                desc.offset,
                desc.masked_offset(),
                desc.length
            );
        }

        if !block.children.is_empty() {
            indent(out, level + 1);
            let _ = writeln!(out, "Child Blocks: {}", block.child_count());
            out.push('\n');
            dump_level(&block.children, level + 1, out);
        }

        out.push('\n');
    }
}

fn indent(out: &mut String, level: usize) {
    for _ in 0..level {
        out.push('\t');
    }
}

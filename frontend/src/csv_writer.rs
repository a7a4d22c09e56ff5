//! CSV serialization. Not handled by the `csv` crate's writer: the leading
//! comment lines, uppercase hex words, symbolic `FAST_CMD` names, and
//! final-newline stripping don't fit its row-oriented API, so this renders
//! the text directly the way the original tooling did.

use std::fmt::Write as _;

use roc_core::constants::NELINKS;
use roc_core::output::{OutputAssembler, OutputRow};

pub fn render(assembler: &OutputAssembler, comment_lines: &[String]) -> String {
    let mut out = String::new();
    for line in comment_lines {
        let _ = writeln!(out, "# {line}");
    }
    let _ = writeln!(out, "CLK_N,RESET_B,SOFT_RESET_B,{},FAST_CMD", erx_header());

    for row in &assembler.rows {
        match row {
            OutputRow::Framing(f) => {
                let _ = write!(out, ",{},{}", bool_bit(f.reset_b), bool_bit(f.soft_reset_b));
                write_links(&mut out, &f.links);
                let _ = writeln!(out, ",{}", f.command);
            }
            OutputRow::Data(d) => {
                let _ = write!(out, "{},{},{}", d.clk_n, bool_bit(d.reset_b), bool_bit(d.soft_reset_b));
                write_links(&mut out, &d.links);
                let _ = writeln!(out, ",{}", d.command);
            }
        }
    }

    if out.ends_with('\n') {
        out.pop();
    }
    out
}

fn write_links(out: &mut String, links: &[u32; NELINKS]) {
    for link in links {
        let _ = write!(out, ",{link:08X}");
    }
}

fn bool_bit(b: bool) -> u8 {
    b as u8
}

fn erx_header() -> String {
    (0..NELINKS)
        .map(|i| format!("ERX_{i}"))
        .collect::<Vec<_>>()
        .join(",")
}

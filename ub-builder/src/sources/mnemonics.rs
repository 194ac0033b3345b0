//! Mnemonics text loader
//!
//! Format: blocks separated by a blank line. The first line of a block is the
//! species' common name; every following line is one mnemonic.

use super::read_file;
use std::path::Path;
use tracing::info;
use ub_common::Result;

/// Parse mnemonics into (common name, `<br/>`-joined text) pairs in file order
///
/// Blocks without any mnemonic line are skipped.
pub fn parse_mnemonics(content: &str) -> Vec<(String, String)> {
    let content = content.replace("\r\n", "\n");
    content
        .split("\n\n")
        .filter_map(|block| {
            let mut lines = block.lines().filter(|l| !l.trim().is_empty());
            let name = lines.next()?.trim().to_string();
            let text = lines.collect::<Vec<_>>().join("<br/>");
            (!text.is_empty()).then_some((name, text))
        })
        .collect()
}

pub fn load_mnemonics(path: &Path) -> Result<Vec<(String, String)>> {
    let entries = parse_mnemonics(&read_file(path)?);
    info!("Loaded {} mnemonic blocks", entries.len());
    Ok(entries)
}

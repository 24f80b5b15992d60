//! Hexdump command: raw guest RAM bytes, one 16-byte row per line.
//!
//! # Output Format
//!
//! ```text
//! 0x00100: 48 65 6C 6C 6F 20 57 6F 72 6C 64 00 00 00 00 00  |Hello World.....|
//! ```

use anyhow::{Context, Result};
use fme_core::format::{self, MemBase, MemType};

/// Bytes per output row.
const ROW: usize = 16;

fn ascii_gutter(chunk: &[u8]) -> String {
    chunk
        .iter()
        .map(|&b| {
            if b.is_ascii_graphic() || b == b' ' {
                b as char
            } else {
                '.'
            }
        })
        .collect()
}

/// Run the hexdump command
pub fn run(offset: u32, size: usize, ascii: bool) -> Result<()> {
    let accessor = super::hook()?;
    let bytes = accessor
        .read(offset, size, false)
        .with_context(|| format!("Failed to read {size} bytes at {offset:#x}"))?;

    println!("Guest RAM at {offset:#X} ({size} bytes):");
    println!();

    for (i, chunk) in bytes.chunks(ROW).enumerate() {
        let row_offset = offset as usize + i * ROW;
        let hex = format::format_bytes(chunk, MemType::ByteArray, MemBase::Hexadecimal, true, false);

        if ascii {
            println!(
                "{row_offset:#07X}: {hex:<hex_width$}  |{gutter:<gutter_width$}|",
                hex_width = ROW * 3 - 1,
                gutter = ascii_gutter(chunk),
                gutter_width = ROW,
            );
        } else {
            println!("{row_offset:#07X}: {hex}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gutter_keeps_printables_and_dots_the_rest() {
        assert_eq!(ascii_gutter(b"Hi there"), "Hi there");
        assert_eq!(ascii_gutter(&[0x41, 0x00, 0x7F, 0x20, 0x42]), "A.. B");
    }
}

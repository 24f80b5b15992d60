//! Write command: one typed value into guest RAM.

use anyhow::{Context, Result, bail};

use crate::cli::TypeArg;

fn parse_integer(text: &str, bits: u32) -> Result<u64> {
    let max = u64::MAX >> (64 - bits);

    if let Some(magnitude) = text.strip_prefix('-') {
        // Negative decimal: two's complement at the target width.
        let magnitude: u64 = magnitude
            .parse()
            .with_context(|| format!("Invalid integer value: {text}"))?;
        if magnitude > 1u64 << (bits - 1) {
            bail!("Value {text} does not fit in {bits} bits");
        }
        return Ok(magnitude.wrapping_neg() & max);
    }

    let value = if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).ok()
    } else {
        text.parse().ok()
    };

    let value = value.with_context(|| format!("Invalid integer value: {text}"))?;
    if value > max {
        bail!("Value {text} does not fit in {bits} bits");
    }
    Ok(value)
}

/// Encode a value in guest (little-endian) byte order.
fn encode(mem_type: TypeArg, text: &str) -> Result<Vec<u8>> {
    let bytes = match mem_type {
        TypeArg::Byte => vec![parse_integer(text, 8)? as u8],
        TypeArg::Halfword => (parse_integer(text, 16)? as u16).to_le_bytes().to_vec(),
        TypeArg::Word => (parse_integer(text, 32)? as u32).to_le_bytes().to_vec(),
        TypeArg::Float => {
            let v: f32 = text
                .parse()
                .with_context(|| format!("Invalid float value: {text}"))?;
            v.to_le_bytes().to_vec()
        }
        TypeArg::Double => {
            let v: f64 = text
                .parse()
                .with_context(|| format!("Invalid double value: {text}"))?;
            v.to_le_bytes().to_vec()
        }
    };
    Ok(bytes)
}

/// Run the write command
pub fn run(mem_type: TypeArg, offset: u32, value: &str) -> Result<()> {
    let bytes = encode(mem_type, value)?;

    let accessor = super::hook()?;
    accessor
        .write(offset, &bytes, false)
        .with_context(|| format!("Failed to write {} bytes at {offset:#x}", bytes.len()))?;

    println!("Wrote {} bytes at {offset:#X}", bytes.len());
    Ok(())
}

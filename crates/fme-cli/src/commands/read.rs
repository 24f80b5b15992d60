//! Read command: one typed value from guest RAM.

use anyhow::{Context, Result};

use crate::cli::{BaseArg, TypeArg};

/// Run the read command
pub fn run(mem_type: TypeArg, offset: u32, base: BaseArg, unsigned: bool) -> Result<()> {
    let accessor = super::hook()?;

    let rendered = accessor
        .format_value(
            offset,
            mem_type.mem_type(),
            mem_type.size(),
            base.mem_base(),
            unsigned,
        )
        .with_context(|| format!("Failed to read at {offset:#x}"))?;

    println!("{rendered}");
    Ok(())
}

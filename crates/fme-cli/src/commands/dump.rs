//! Dump command: copy the whole of guest RAM to a file.

use std::path::Path;

use anyhow::{Context, Result};

/// Run the dump command
pub fn run(output: &Path) -> Result<()> {
    let accessor = super::hook()?;

    let mut ram = vec![0u8; accessor.ram_total_size() as usize];
    accessor
        .read_entire_ram(&mut ram)
        .context("Failed to read guest RAM")?;

    std::fs::write(output, &ram)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("Wrote {} bytes to {}", ram.len(), output.display());
    Ok(())
}

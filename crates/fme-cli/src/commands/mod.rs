pub mod dump;
pub mod hexdump;
pub mod read;
pub mod status;
pub mod write;

use anyhow::{Context, Result, bail};
use fme_core::{Accessor, Status, process::PlatformProbe};

/// Parse a guest RAM offset: `0x`-prefixed hex or plain decimal.
pub fn parse_offset(text: &str) -> Result<u32> {
    let parsed = if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16)
    } else {
        text.parse()
    };
    parsed.with_context(|| format!("Invalid guest offset: {text}"))
}

/// Attach to the emulator and report whatever state comes up.
pub fn attach() -> Accessor<PlatformProbe> {
    let mut accessor = Accessor::new();
    accessor.hook();
    accessor
}

/// Attach to the emulator, failing with a readable message when the
/// attachment does not come up hooked.
pub fn hook() -> Result<Accessor<PlatformProbe>> {
    let accessor = attach();

    match accessor.status() {
        Status::Hooked => Ok(accessor),
        Status::NotRunning => bail!(
            "Flycast process not found. Is the emulator running? \
             (use -d to override the process name)"
        ),
        status => bail!(
            "Found the process but could not locate emulated memory ({}). \
             Is a game loaded?",
            status.as_str()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_parse_in_both_notations() {
        assert_eq!(parse_offset("0x100").unwrap(), 0x100);
        assert_eq!(parse_offset("0XABCDEF").unwrap(), 0xABCDEF);
        assert_eq!(parse_offset("256").unwrap(), 256);
        assert!(parse_offset("zzz").is_err());
        assert!(parse_offset("0x").is_err());
    }
}

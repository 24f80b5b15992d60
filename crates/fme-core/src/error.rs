use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Emulator process not found")]
    ProcessNotFound,

    #[error("Failed to enumerate the target's memory map")]
    EnumerationFailed,

    #[error("Guest memory arena not found in the target's mappings")]
    ArenaNotFound,

    #[error("Probe read at the putative RAM base failed")]
    ProbeFailed,

    #[error("Cross-process transfer failed at guest offset {offset:#x} ({len} bytes)")]
    TransferFailed { offset: u32, len: usize },

    #[error("Not hooked to an emulator process")]
    NotHooked,
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_failures_carry_the_location() {
        let err = Error::TransferFailed {
            offset: 0x1234,
            len: 8,
        };
        let message = err.to_string();
        assert!(message.contains("0x1234"));
        assert!(message.contains("8 bytes"));
    }
}

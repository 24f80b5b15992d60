//! Typed rendering of raw guest bytes.

use crate::memory::bswap_in_place;

/// Interpretation applied to a raw byte buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemType {
    Byte,
    Halfword,
    Word,
    Float,
    Double,
    String,
    ByteArray,
}

impl MemType {
    /// Width in bytes for the fixed-size interpretations.
    pub fn fixed_size(&self) -> Option<usize> {
        match self {
            MemType::Byte => Some(1),
            MemType::Halfword => Some(2),
            MemType::Word | MemType::Float => Some(4),
            MemType::Double => Some(8),
            MemType::String | MemType::ByteArray => None,
        }
    }
}

/// Numeric base for integer rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemBase {
    Decimal,
    Hexadecimal,
    Octal,
    Binary,
}

/// Whether a typed read of `mem_type` wants the whole-buffer swap.
/// Multi-byte numerics do; strings and byte arrays never do.
pub fn should_swap_for_type(mem_type: MemType) -> bool {
    matches!(
        mem_type,
        MemType::Halfword | MemType::Word | MemType::Float | MemType::Double
    )
}

fn render_unsigned(value: u64, base: MemBase) -> String {
    match base {
        MemBase::Decimal => format!("{value}"),
        MemBase::Hexadecimal => format!("{value:X}"),
        MemBase::Octal => format!("{value:o}"),
        MemBase::Binary => format!("{value:b}"),
    }
}

fn render_integer(value: u64, bits: u32, base: MemBase, unsigned: bool) -> String {
    if unsigned || base != MemBase::Decimal {
        // Non-decimal bases always show the raw bit pattern.
        return render_unsigned(value, base);
    }
    let shift = 64 - bits;
    let signed = (value << shift) as i64 >> shift;
    format!("{signed}")
}

/// Render `bytes` as `mem_type`. With `swap`, the buffer gets the
/// whole-buffer byte swap before interpretation (lengths 2/4/8 only,
/// matching the transfer-path policy).
pub fn format_bytes(
    bytes: &[u8],
    mem_type: MemType,
    base: MemBase,
    unsigned: bool,
    swap: bool,
) -> String {
    let mut data = bytes.to_vec();
    if swap {
        bswap_in_place(&mut data);
    }

    if let Some(size) = mem_type.fixed_size()
        && data.len() < size
    {
        return String::from("??");
    }

    match mem_type {
        MemType::Byte => render_integer(data[0] as u64, 8, base, unsigned),
        MemType::Halfword => {
            let v = u16::from_le_bytes([data[0], data[1]]);
            render_integer(v as u64, 16, base, unsigned)
        }
        MemType::Word => {
            let v = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
            render_integer(v as u64, 32, base, unsigned)
        }
        MemType::Float => {
            let v = f32::from_le_bytes([data[0], data[1], data[2], data[3]]);
            format!("{v}")
        }
        MemType::Double => {
            let v = f64::from_le_bytes([
                data[0], data[1], data[2], data[3], data[4], data[5], data[6], data[7],
            ]);
            format!("{v}")
        }
        MemType::String => {
            let end = data.iter().position(|&b| b == 0).unwrap_or(data.len());
            String::from_utf8_lossy(&data[..end]).into_owned()
        }
        MemType::ByteArray => data
            .iter()
            .map(|b| format!("{b:02X}"))
            .collect::<Vec<_>>()
            .join(" "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_render_in_every_base() {
        let bytes = 0xCAFEu16.to_le_bytes();
        assert_eq!(
            format_bytes(&bytes, MemType::Halfword, MemBase::Decimal, true, false),
            "51966"
        );
        assert_eq!(
            format_bytes(&bytes, MemType::Halfword, MemBase::Hexadecimal, true, false),
            "CAFE"
        );
        assert_eq!(
            format_bytes(&bytes, MemType::Halfword, MemBase::Octal, true, false),
            "145376"
        );
        assert_eq!(
            format_bytes(&bytes, MemType::Halfword, MemBase::Binary, true, false),
            "1100101011111110"
        );
    }

    #[test]
    fn signed_decimal_sign_extends() {
        let bytes = (-2i32 as u32).to_le_bytes();
        assert_eq!(
            format_bytes(&bytes, MemType::Word, MemBase::Decimal, false, false),
            "-2"
        );
        assert_eq!(
            format_bytes(&bytes, MemType::Word, MemBase::Decimal, true, false),
            "4294967294"
        );
    }

    #[test]
    fn swap_flag_reverses_before_interpretation() {
        let bytes = [0x12, 0x34, 0x56, 0x78];
        assert_eq!(
            format_bytes(&bytes, MemType::Word, MemBase::Hexadecimal, true, false),
            "78563412"
        );
        assert_eq!(
            format_bytes(&bytes, MemType::Word, MemBase::Hexadecimal, true, true),
            "12345678"
        );
    }

    #[test]
    fn floats_ignore_the_base() {
        let bytes = 1.5f32.to_le_bytes();
        assert_eq!(
            format_bytes(&bytes, MemType::Float, MemBase::Hexadecimal, false, false),
            "1.5"
        );
    }

    #[test]
    fn strings_stop_at_nul() {
        let bytes = b"SONIC\0junk";
        assert_eq!(
            format_bytes(bytes, MemType::String, MemBase::Decimal, false, false),
            "SONIC"
        );
    }

    #[test]
    fn byte_arrays_render_as_hex_pairs() {
        assert_eq!(
            format_bytes(&[0xDE, 0xAD, 0x01], MemType::ByteArray, MemBase::Decimal, false, false),
            "DE AD 01"
        );
    }

    #[test]
    fn short_buffers_are_flagged() {
        assert_eq!(
            format_bytes(&[0x01], MemType::Word, MemBase::Decimal, true, false),
            "??"
        );
    }

    #[test]
    fn only_multi_byte_numerics_want_the_swap() {
        assert!(!should_swap_for_type(MemType::Byte));
        assert!(should_swap_for_type(MemType::Halfword));
        assert!(should_swap_for_type(MemType::Word));
        assert!(should_swap_for_type(MemType::Float));
        assert!(should_swap_for_type(MemType::Double));
        assert!(!should_swap_for_type(MemType::String));
        assert!(!should_swap_for_type(MemType::ByteArray));
    }
}

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "fme",
    version,
    about = "Inspect and edit the emulated memory of a running Flycast process"
)]
pub struct Args {
    /// Custom name for the Flycast emulator process. By default,
    /// platform-specific names are used (e.g. "flycast.exe" on
    /// Windows, "flycast" on Linux). Check your task manager if in
    /// doubt.
    #[arg(short = 'd', long = "flycast-process-name", global = true)]
    pub flycast_process_name: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Attach to the emulator and report the attachment state
    Status {
        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Dump guest RAM bytes at an offset in hexdump format
    Hexdump {
        /// Guest RAM offset (hex with 0x prefix, or decimal)
        offset: String,

        /// Number of bytes to show
        #[arg(default_value_t = 256)]
        size: usize,

        /// Include an ASCII gutter
        #[arg(long)]
        ascii: bool,
    },

    /// Read one typed value from guest RAM
    Read {
        /// Value interpretation
        #[arg(short = 't', long = "type", value_enum, default_value = "word")]
        mem_type: TypeArg,

        /// Guest RAM offset (hex with 0x prefix, or decimal)
        offset: String,

        /// Numeric base for integer output
        #[arg(short, long, value_enum, default_value = "dec")]
        base: BaseArg,

        /// Render integers as unsigned
        #[arg(short, long)]
        unsigned: bool,
    },

    /// Write one typed value into guest RAM
    Write {
        /// Value interpretation
        #[arg(short = 't', long = "type", value_enum, default_value = "word")]
        mem_type: TypeArg,

        /// Guest RAM offset (hex with 0x prefix, or decimal)
        offset: String,

        /// Value to write (integers accept a 0x prefix)
        value: String,
    },

    /// Copy the entire 16 MiB of guest RAM into a file
    Dump {
        /// Output file path
        output: PathBuf,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TypeArg {
    Byte,
    Halfword,
    Word,
    Float,
    Double,
}

impl TypeArg {
    pub fn mem_type(self) -> fme_core::MemType {
        match self {
            TypeArg::Byte => fme_core::MemType::Byte,
            TypeArg::Halfword => fme_core::MemType::Halfword,
            TypeArg::Word => fme_core::MemType::Word,
            TypeArg::Float => fme_core::MemType::Float,
            TypeArg::Double => fme_core::MemType::Double,
        }
    }

    pub fn size(self) -> usize {
        match self {
            TypeArg::Byte => 1,
            TypeArg::Halfword => 2,
            TypeArg::Word | TypeArg::Float => 4,
            TypeArg::Double => 8,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BaseArg {
    Dec,
    Hex,
    Oct,
    Bin,
}

impl BaseArg {
    pub fn mem_base(self) -> fme_core::MemBase {
        match self {
            BaseArg::Dec => fme_core::MemBase::Decimal,
            BaseArg::Hex => fme_core::MemBase::Hexadecimal,
            BaseArg::Oct => fme_core::MemBase::Octal,
            BaseArg::Bin => fme_core::MemBase::Binary,
        }
    }
}

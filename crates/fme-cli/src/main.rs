mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Args, Command};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = Args::parse();

    // Default to warnings unless RUST_LOG says otherwise
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("fme=warn,fme_core=warn"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    if let Some(name) = &args.flycast_process_name {
        // SAFETY: set before any other thread exists.
        unsafe { std::env::set_var(fme_core::PROCESS_NAME_ENV, name) };
    }

    match args.command {
        Command::Status { json } => commands::status::run(json),
        Command::Hexdump { offset, size, ascii } => {
            let offset = commands::parse_offset(&offset)?;
            commands::hexdump::run(offset, size, ascii)
        }
        Command::Read { mem_type, offset, base, unsigned } => {
            let offset = commands::parse_offset(&offset)?;
            commands::read::run(mem_type, offset, base, unsigned)
        }
        Command::Write { mem_type, offset, value } => {
            let offset = commands::parse_offset(&offset)?;
            commands::write::run(mem_type, offset, &value)
        }
        Command::Dump { output } => commands::dump::run(&output),
    }
}

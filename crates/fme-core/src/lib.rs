//! Attachment core for the Flycast memory engine.
//!
//! Attaches to a running Flycast process, infers the base of its
//! guest-memory arena from the process's virtual memory map, and
//! exposes guest RAM as a flat, offset-addressable byte space with
//! optional endianness conversion. Higher layers (search, watchlists,
//! GUIs) build on [`Accessor`].
//!
//! Every read is a fresh cross-process transfer; nothing is mirrored
//! or synchronized with emulator frames.

pub mod accessor;
pub mod arena;
pub mod attach;
pub mod error;
pub mod format;
pub mod memory;
pub mod process;

pub use accessor::Accessor;
pub use attach::{Attachment, Status};
pub use error::{Error, Result};
pub use format::{MemBase, MemType};
pub use memory::{Region, layout};
pub use process::{NameSelector, PROCESS_NAME_ENV, ProcessProbe};

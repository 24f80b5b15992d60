mod bytes;
pub mod layout;
mod region;

pub use bytes::{bswap16, bswap32, bswap64, bswap_in_place};
pub use region::{Region, any_contains};

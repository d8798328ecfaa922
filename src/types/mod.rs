//! Hash type and node response payloads.

mod hash;
mod models;

pub use hash::{ADDRESS_VERSION, HashParseError, UInt160};
pub use models::*;

//! The container codec: the on-disk artifact layout described in the
//! crate's design notes. Purely structural, no cryptographic operation
//! lives here, only (de)serialization and framing.

pub mod header;
pub mod mac;

pub use header::Header;
pub use mac::StreamingMac;

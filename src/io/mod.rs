//! Boundary data layout shared with external file codecs.
//!
//! Only the in-memory packed form lives here; reading and writing files is
//! left to the codecs that consume it.

pub mod packed;

pub use packed::{PackedHeader, decode, decode_with_token, encode};

//! Wire codec primitives for Shockwire.
//!
//! This crate owns the byte-level encodings of the protocol's scalar
//! values:
//!
//! - **Reader** ([`PacketReader`]) — a forward-only cursor over an input
//!   buffer. No operation may rewind it, so a decode decision can never
//!   depend on bytes that have not been read yet.
//! - **Writer** ([`PacketWriter`]) — an append-only, growable output
//!   buffer with the matching write routine for every read routine.
//! - **Scalar set** ([`ScalarType`]) — the closed enumeration of logical
//!   scalar types, each with exactly one encode/decode strategy.
//! - **Errors** ([`CodecError`]) — what can go wrong while decoding a
//!   single frame.
//!
//! Everything here is pure and stateless: readers and writers own no
//! shared state, so concurrent decode/encode calls on different buffers
//! never contend.

// ---------------------------------------------------------------------------
// Module declarations
// ---------------------------------------------------------------------------

mod error;
mod reader;
mod scalar;
mod writer;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use error::CodecError;
pub use reader::PacketReader;
pub use scalar::ScalarType;
pub use writer::PacketWriter;

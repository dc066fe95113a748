//! Error types for the dispatch layer.

use shockwire_codec::CodecError;
use shockwire_codegen::EncodeError;

/// Errors surfaced to the transport per frame.
///
/// None of these are fatal to the table or the connection; the
/// transport decides per-connection policy (drop the frame, or
/// terminate). [`DuplicatePacketId`](Self::DuplicatePacketId) is the
/// exception: it is a build-time failure and no table is produced.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// No decoder is registered under this id.
    ///
    /// Expected, not exceptional: a slightly mismatched client revision
    /// sends ids this revision never defined. The frame is dropped.
    #[error("unknown packet id {id}")]
    UnknownPacketId {
        /// The id the frame carried.
        id: u32,
    },

    /// The id resolved but its payload failed to decode.
    ///
    /// The frame is dropped; there is no automatic retry.
    #[error("malformed packet {id}: {source}")]
    MalformedPacket {
        /// The id the frame carried.
        id: u32,
        /// The codec failure underneath.
        #[source]
        source: CodecError,
    },

    /// Encoding failed because the packet object violated its contract.
    /// Unreachable when composing well-typed, fully-owned packets.
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// Two packets in one direction declared the same id.
    /// Raised while building the table, never afterwards.
    #[error("duplicate packet id {id}: `{first}` and `{second}`")]
    DuplicatePacketId {
        /// The contested id.
        id: u32,
        /// The packet registered first.
        first: String,
        /// The packet that collided with it.
        second: String,
    },
}

//! Unified error type for the Shockwire toolkit.

use shockwire_codec::CodecError;
use shockwire_codegen::EncodeError;
use shockwire_dispatch::DispatchError;
use shockwire_schema::SchemaError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `shockwire` meta-crate, you deal with this single
/// error type instead of importing errors from each sub-crate. The
/// `#[from]` attribute on each variant auto-generates `From` impls, so
/// the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum ShockwireError {
    /// A schema-level failure (malformed, cyclic, unsupported).
    /// Fatal to the generation run that raised it.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A codec-level failure decoding one frame. Recoverable at the
    /// frame boundary.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// A dispatch-level failure (unknown id, malformed frame,
    /// duplicate id at build time).
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// An encode-side contract violation. Unreachable for well-typed
    /// packet objects.
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// Reading the schema file failed.
    #[error("schema file: {0}")]
    Io(#[from] std::io::Error),

    /// The schema file is not the canonical JSON shape.
    #[error("schema file: {0}")]
    Json(#[from] serde_json::Error),
}

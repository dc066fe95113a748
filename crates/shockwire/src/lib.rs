//! # Shockwire
//!
//! Schema-driven binary wire-protocol toolkit for a virtual-world game
//! server that must speak dozens of divergent, versioned client
//! dialects.
//!
//! One JSON schema per revision declares every packet's layout; the
//! generator compiles it into per-packet decoders and encoders behind
//! an id-keyed [`DispatchTable`]. The transport layer stays external:
//! it hands in length-delimited frames and gets back decoded packet
//! objects or encoded byte sequences.
//!
//! ## Quick start
//!
//! ```rust
//! use shockwire::prelude::*;
//!
//! let json = r#"{"incoming":{"Handshake.VersionCheck":
//!     {"id":5,"structure":[{"name":"VersionId","type":"int"}]}}}"#;
//! let schema: ProtocolSchema = serde_json::from_str(json)?;
//! let revision = Revision::from_schema("RELEASE9", &schema, &GeneratorOptions::default())?;
//!
//! let packet = revision.incoming.decode(5, &[42])?;
//! assert_eq!(packet.get("VersionId"), Some(&FieldValue::Int(42)));
//! # Ok::<(), shockwire::ShockwireError>(())
//! ```

mod error;
mod revision;

pub use error::ShockwireError;
pub use revision::Revision;

pub use shockwire_codec::{CodecError, PacketReader, PacketWriter, ScalarType};
pub use shockwire_codegen::{
    commit_artifact, generate, CompiledPacket, CompiledProtocol, ContractRegistry, Direction,
    EncodeError, FieldValue, GeneratorOptions, Packet,
};
pub use shockwire_dispatch::{DispatchError, DispatchTable};
pub use shockwire_schema::{
    check_structures_acyclic, MappingNode, PacketSchema, ProtocolSchema, SchemaError,
};

/// The names most callers need.
pub mod prelude {
    pub use crate::{
        Direction, DispatchTable, FieldValue, GeneratorOptions, Packet, ProtocolSchema, Revision,
        ShockwireError,
    };
}

//! Schema model for Shockwire.
//!
//! This crate is the typed representation of one revision's
//! `packets.json`:
//!
//! - **Model** ([`ProtocolSchema`], [`PacketSchema`], [`MappingNode`]) —
//!   the aggregate schema and its mapping-node trees, (de)serializing
//!   losslessly to and from the canonical JSON shape.
//! - **Edit operations** — ordered insertion, removal, and move on
//!   mapping-node sequences, consumed by the external authoring tool.
//! - **Errors** ([`SchemaError`]) — malformed, cyclic, or unsupported
//!   schema content. Every variant is fatal to a generation run.
//!
//! The model performs no type validation; tags are kept as raw strings
//! and resolving them against the closed scalar set is the generator's
//! responsibility. What the model does enforce is the acyclicity of
//! structure references, because a cyclic structure can never be laid
//! out on the wire.
//!
//! A schema is loaded once per generation run and is read-only
//! thereafter; the authoring tool produces a new snapshot between runs.

mod edit;
mod error;
mod model;

pub use edit::{insert_node, move_node, remove_node};
pub use error::SchemaError;
pub use model::{
    check_structures_acyclic, Interface, MappingNode, PacketSchema, ProtocolSchema,
    StructureBody,
};

//! Schema compiler for Shockwire.
//!
//! Given a [`ProtocolSchema`](shockwire_schema::ProtocolSchema), a wire
//! direction, and one protocol revision, this crate synthesizes one
//! decoder and one encoder per packet:
//!
//! - **Contracts** ([`ContractRegistry`]) — the load-time registry that
//!   maps a packet's group and direction to its interface contract.
//!   Resolution is best-effort; a miss never blocks generation.
//! - **Conditions** ([`CondExpr`]) — the boolean expression language of
//!   conditional nodes, parsed once at generation time.
//! - **Plans** ([`CompiledProtocol`], [`CompiledPacket`], [`Op`]) — the
//!   typed operation sequences the generator emits, plus their
//!   canonical, diffable text rendering.
//! - **Runtime** ([`Packet`], [`FieldValue`]) — plan execution: decode
//!   a frame payload into a packet object, encode a packet object into
//!   bytes.
//! - **Artifacts** ([`commit_artifact`]) — staging-file plus atomic
//!   rename, so a failed run never corrupts a committed artifact.
//!
//! Generation is a one-shot, single-threaded batch transformation and
//! is deterministic: identical schema input yields byte-identical
//! rendered output.

mod artifact;
mod contract;
mod expr;
mod generate;
mod plan;
mod runtime;
mod value;

pub use artifact::commit_artifact;
pub use contract::{ContractRegistry, Direction, ResolvedContract};
pub use expr::{CmpOp, CondExpr};
pub use generate::{generate, GeneratorOptions};
pub use plan::{CombinePart, CompiledPacket, CompiledProtocol, Op};
pub use runtime::EncodeError;
pub use value::{FieldValue, Packet};

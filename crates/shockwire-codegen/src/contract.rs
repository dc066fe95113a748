//! Load-time contract registry.
//!
//! A packet's dotted logical name determines which interface contract
//! it should satisfy: the part before the last `.` is its group, the
//! remainder its base name, and the direction picks the naming
//! convention (`{group}.I{base}IncomingPacket` for parsers,
//! `{group}.{base}OutgoingPacket` for composers).
//!
//! The registry is built once per generation run from the schema's
//! `interfaces` section. Lookups afterwards are plain map reads; there
//! is no name derivation or string matching left at compile time for
//! individual nodes. Resolution is advisory: a missing contract means
//! the packet's fields are treated as free-form, because schema
//! authoring must not be blocked by a momentarily stale contract.

use std::collections::HashMap;

use shockwire_schema::{Interface, ProtocolSchema};

/// Which way packets travel for one generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Client → server: parsers.
    Incoming,
    /// Server → client: composers.
    Outgoing,
}

impl Direction {
    /// Lowercase label used in renderings and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Incoming => "incoming",
            Self::Outgoing => "outgoing",
        }
    }
}

/// A resolved contract: the identifier it was registered under and its
/// ordered field table.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedContract<'a> {
    /// The interface identifier, e.g. `Handshake.IVersionCheckIncomingPacket`.
    pub name: &'a str,
    /// Ordered logical-field-name → declared type name.
    pub fields: &'a Interface,
}

impl ResolvedContract<'_> {
    /// Whether the contract declares a field of this name.
    pub fn declares(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// The contract's required logical field names, in declared order.
    pub fn required_fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

/// Registry mapping `(group, base name, direction)` to a contract.
#[derive(Debug)]
pub struct ContractRegistry<'a> {
    by_packet: HashMap<(String, String, Direction), ResolvedContract<'a>>,
}

impl<'a> ContractRegistry<'a> {
    /// Indexes every interface whose identifier follows the naming
    /// convention. Identifiers that do not parse are skipped; the
    /// contract table is advisory and an unparseable entry simply never
    /// resolves.
    pub fn new(schema: &'a ProtocolSchema) -> Self {
        let mut by_packet = HashMap::new();
        for (name, fields) in &schema.interfaces {
            let Some((group, rest)) = name.rsplit_once('.') else {
                continue;
            };
            let contract = ResolvedContract { name, fields };
            if let Some(base) = rest
                .strip_prefix('I')
                .and_then(|r| r.strip_suffix("IncomingPacket"))
            {
                by_packet.insert(
                    (group.to_owned(), base.to_owned(), Direction::Incoming),
                    contract,
                );
            } else if let Some(base) = rest.strip_suffix("OutgoingPacket") {
                by_packet.insert(
                    (group.to_owned(), base.to_owned(), Direction::Outgoing),
                    contract,
                );
            }
        }
        Self { by_packet }
    }

    /// Resolves the contract for a dotted packet name, or a miss.
    ///
    /// A miss is non-fatal to generation; the caller proceeds with
    /// free-form fields.
    pub fn resolve(&self, packet_name: &str, direction: Direction) -> Option<ResolvedContract<'a>> {
        let (group, base) = packet_name.rsplit_once('.')?;
        self.by_packet
            .get(&(group.to_owned(), base.to_owned(), direction))
            .copied()
    }

    /// The identifier a packet's contract is expected to be registered
    /// under, or `None` for an ungrouped name. Used for diagnostics
    /// when resolution misses.
    pub fn expected_identifier(packet_name: &str, direction: Direction) -> Option<String> {
        let (group, base) = packet_name.rsplit_once('.')?;
        Some(match direction {
            Direction::Incoming => format!("{group}.I{base}IncomingPacket"),
            Direction::Outgoing => format!("{group}.{base}OutgoingPacket"),
        })
    }
}

//! The id-keyed dispatch table.

use std::collections::HashMap;

use shockwire_codegen::{CompiledPacket, CompiledProtocol, Direction, Packet};
use tracing::debug;

use crate::DispatchError;

/// Immutable map from packet id to compiled codec, for one direction of
/// one revision.
///
/// Built once from the generator's output. All methods take `&self`;
/// the table is `Send + Sync` and safe to share across threads without
/// locking.
#[derive(Debug)]
pub struct DispatchTable {
    direction: Direction,
    packets: HashMap<u32, CompiledPacket>,
}

impl DispatchTable {
    /// Builds a table from one generation run's output.
    ///
    /// Id uniqueness within the direction is enforced here, not at
    /// schema load time.
    pub fn build(protocol: CompiledProtocol) -> Result<Self, DispatchError> {
        let direction = protocol.direction;
        let mut packets: HashMap<u32, CompiledPacket> =
            HashMap::with_capacity(protocol.packets.len());
        for packet in protocol.packets {
            if let Some(existing) = packets.get(&packet.id) {
                return Err(DispatchError::DuplicatePacketId {
                    id: packet.id,
                    first: existing.name.clone(),
                    second: packet.name,
                });
            }
            packets.insert(packet.id, packet);
        }
        debug!(
            direction = direction.as_str(),
            packets = packets.len(),
            "dispatch table built"
        );
        Ok(Self { direction, packets })
    }

    /// The direction this table serves.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Number of registered packet ids.
    pub fn len(&self) -> usize {
        self.packets.len()
    }

    /// Whether the table registers no packets at all.
    pub fn is_empty(&self) -> bool {
        self.packets.is_empty()
    }

    /// Whether an id has a codec registered.
    pub fn contains(&self, id: u32) -> bool {
        self.packets.contains_key(&id)
    }

    /// Registered ids in ascending order, for diagnostics.
    pub fn ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.packets.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// The compiled codec for an id, if registered.
    pub fn get(&self, id: u32) -> Option<&CompiledPacket> {
        self.packets.get(&id)
    }

    /// Decodes one frame payload.
    ///
    /// A missing id or a malformed payload is a recoverable
    /// [`DispatchError`]; the table itself is unaffected either way.
    pub fn decode(&self, id: u32, payload: &[u8]) -> Result<Packet, DispatchError> {
        let Some(packet) = self.packets.get(&id) else {
            debug!(id, "frame for unknown packet id dropped");
            return Err(DispatchError::UnknownPacketId { id });
        };
        packet
            .decode(payload)
            .map_err(|source| DispatchError::MalformedPacket { id, source })
    }

    /// Encodes a packet object under its registered id.
    pub fn encode(&self, packet: &Packet) -> Result<Vec<u8>, DispatchError> {
        let Some(compiled) = self.packets.get(&packet.id) else {
            return Err(DispatchError::UnknownPacketId { id: packet.id });
        };
        Ok(compiled.encode(packet)?)
    }
}

//! Edit operations consumed by the external schema-authoring tool.
//!
//! The tool works on node sequences positionally (insert, remove, move
//! up/down) and on the four top-level maps by name. The operations here
//! are the model-side half of that contract; rendering and input belong
//! to the tool.

use crate::{
    check_structures_acyclic, Interface, MappingNode, PacketSchema, ProtocolSchema,
    SchemaError, StructureBody,
};

/// Inserts `node` at `index`, shifting later nodes down.
pub fn insert_node(
    seq: &mut Vec<MappingNode>,
    index: usize,
    node: MappingNode,
) -> Result<(), SchemaError> {
    if index > seq.len() {
        return Err(SchemaError::IndexOutOfBounds {
            index,
            len: seq.len(),
        });
    }
    seq.insert(index, node);
    Ok(())
}

/// Removes and returns the node at `index`.
pub fn remove_node(seq: &mut Vec<MappingNode>, index: usize) -> Result<MappingNode, SchemaError> {
    if index >= seq.len() {
        return Err(SchemaError::IndexOutOfBounds {
            index,
            len: seq.len(),
        });
    }
    Ok(seq.remove(index))
}

/// Moves the node at `from` so it ends up at `to`, preserving the
/// relative order of everything else.
pub fn move_node(seq: &mut Vec<MappingNode>, from: usize, to: usize) -> Result<(), SchemaError> {
    let len = seq.len();
    if from >= len {
        return Err(SchemaError::IndexOutOfBounds { index: from, len });
    }
    if to >= len {
        return Err(SchemaError::IndexOutOfBounds { index: to, len });
    }
    let node = seq.remove(from);
    seq.insert(to, node);
    Ok(())
}

impl ProtocolSchema {
    /// Adds an incoming packet. Names are unique within the map.
    pub fn add_incoming(
        &mut self,
        name: impl Into<String>,
        packet: PacketSchema,
    ) -> Result<(), SchemaError> {
        let name = name.into();
        if self.incoming.contains_key(&name) {
            return Err(SchemaError::DuplicateName(name));
        }
        self.incoming.insert(name, packet);
        Ok(())
    }

    /// Adds an outgoing packet. Names are unique within the map.
    pub fn add_outgoing(
        &mut self,
        name: impl Into<String>,
        packet: PacketSchema,
    ) -> Result<(), SchemaError> {
        let name = name.into();
        if self.outgoing.contains_key(&name) {
            return Err(SchemaError::DuplicateName(name));
        }
        self.outgoing.insert(name, packet);
        Ok(())
    }

    /// Adds an empty reusable structure.
    pub fn add_structure(&mut self, name: impl Into<String>) -> Result<(), SchemaError> {
        let name = name.into();
        if self.structures.contains_key(&name) {
            return Err(SchemaError::DuplicateName(name));
        }
        self.structures.insert(name, StructureBody::new());
        Ok(())
    }

    /// Adds an empty interface contract.
    pub fn add_interface(&mut self, name: impl Into<String>) -> Result<(), SchemaError> {
        let name = name.into();
        if self.interfaces.contains_key(&name) {
            return Err(SchemaError::DuplicateName(name));
        }
        self.interfaces.insert(name, Interface::new());
        Ok(())
    }

    /// Inserts a node into a structure body, refusing edits that would
    /// make the structure graph cyclic. On rejection the schema is left
    /// exactly as it was.
    pub fn insert_structure_node(
        &mut self,
        structure: &str,
        index: usize,
        node: MappingNode,
    ) -> Result<(), SchemaError> {
        let body = self
            .structures
            .get_mut(structure)
            .ok_or_else(|| SchemaError::UnknownStructure(structure.to_owned()))?;
        insert_node(body, index, node)?;
        if let Err(err) = check_structures_acyclic(self) {
            let body = self.structures.get_mut(structure).expect("just edited");
            body.remove(index);
            return Err(err);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq() -> Vec<MappingNode> {
        vec![
            MappingNode::field("A", "int"),
            MappingNode::field("B", "short"),
            MappingNode::field("C", "bool"),
        ]
    }

    fn names(seq: &[MappingNode]) -> Vec<&str> {
        seq.iter()
            .map(|node| match node {
                MappingNode::Field { name, .. } => name.as_str(),
                _ => "?",
            })
            .collect()
    }

    #[test]
    fn test_insert_at_front_and_back() {
        let mut s = seq();
        insert_node(&mut s, 0, MappingNode::field("Z", "int")).unwrap();
        insert_node(&mut s, 4, MappingNode::field("Y", "int")).unwrap();
        assert_eq!(names(&s), ["Z", "A", "B", "C", "Y"]);
    }

    #[test]
    fn test_insert_past_end_is_rejected() {
        let mut s = seq();
        assert_eq!(
            insert_node(&mut s, 9, MappingNode::field("X", "int")),
            Err(SchemaError::IndexOutOfBounds { index: 9, len: 3 })
        );
    }

    #[test]
    fn test_remove_returns_the_node() {
        let mut s = seq();
        let removed = remove_node(&mut s, 1).unwrap();
        assert_eq!(removed, MappingNode::field("B", "short"));
        assert_eq!(names(&s), ["A", "C"]);
    }

    #[test]
    fn test_move_node_up_and_down() {
        let mut s = seq();
        move_node(&mut s, 2, 0).unwrap();
        assert_eq!(names(&s), ["C", "A", "B"]);
        move_node(&mut s, 0, 2).unwrap();
        assert_eq!(names(&s), ["A", "B", "C"]);
    }

    #[test]
    fn test_duplicate_packet_name_is_rejected() {
        let mut schema = ProtocolSchema::default();
        let packet = PacketSchema {
            id: 1,
            structure: vec![],
        };
        schema.add_incoming("Room.Enter", packet.clone()).unwrap();
        assert_eq!(
            schema.add_incoming("Room.Enter", packet),
            Err(SchemaError::DuplicateName("Room.Enter".into()))
        );
    }

    #[test]
    fn test_same_name_allowed_across_directions() {
        let mut schema = ProtocolSchema::default();
        let packet = PacketSchema {
            id: 1,
            structure: vec![],
        };
        schema.add_incoming("Room.Chat", packet.clone()).unwrap();
        assert!(schema.add_outgoing("Room.Chat", packet).is_ok());
    }

    #[test]
    fn test_cyclic_structure_edit_is_rolled_back() {
        let mut schema = ProtocolSchema::default();
        schema.add_structure("Loop").unwrap();
        let err = schema
            .insert_structure_node("Loop", 0, MappingNode::field("Again", "Loop"))
            .unwrap_err();
        assert_eq!(err, SchemaError::CyclicStructure("Loop".into()));
        assert!(schema.structures["Loop"].is_empty());
    }

    #[test]
    fn test_acyclic_structure_edit_is_kept() {
        let mut schema = ProtocolSchema::default();
        schema.add_structure("Badge").unwrap();
        schema
            .insert_structure_node("Badge", 0, MappingNode::field("Code", "string"))
            .unwrap();
        assert_eq!(schema.structures["Badge"].len(), 1);
    }
}

//! Typed representation of one revision's `packets.json`.
//!
//! The JSON shape is the contract with the external authoring tool:
//! whatever it writes, this model must load, and whatever this model
//! stores must read back identically. Maps are order-preserving
//! ([`IndexMap`]) so a load/store round trip does not shuffle keys and
//! generation iterates in schema order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::SchemaError;

/// A reusable, ordered sequence of mapping nodes.
pub type StructureBody = Vec<MappingNode>;

/// An interface contract: ordered logical-field-name → declared type
/// name. Pure lookup table; it has no wire effect.
pub type Interface = IndexMap<String, String>;

/// The aggregate schema for one protocol revision.
///
/// Loaded once per generation run and read-only thereafter. All four
/// sections default to empty, so a minimal schema may declare only the
/// packets it needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolSchema {
    /// Client → server packets, keyed by dotted logical name.
    pub incoming: IndexMap<String, PacketSchema>,
    /// Server → client packets, keyed by dotted logical name.
    pub outgoing: IndexMap<String, PacketSchema>,
    /// Reusable node sequences, referenced by a field whose type tag
    /// names an entry here.
    pub structures: IndexMap<String, StructureBody>,
    /// Interface contracts, advisory for field-binding validation.
    pub interfaces: IndexMap<String, Interface>,
}

/// One packet's layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PacketSchema {
    /// Revision-scoped numeric discriminator. Unique within its
    /// direction; enforced when the dispatch table is built, not here.
    pub id: u32,
    /// Ordered mapping nodes. Order IS wire order.
    #[serde(default)]
    pub structure: Vec<MappingNode>,
}

/// One node of a packet layout.
///
/// The closed tagged variant of the schema language. The JSON carries
/// no explicit tag; the variant is inferred structurally, which is what
/// the `untagged` representation plus the declaration order below
/// encodes: presence of `value` means Constant, `condition` means
/// Conditional, `fields` means Combine, and a bare name/type pair is a
/// Field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MappingNode {
    /// A literal always written on encode and consumed, never
    /// compared, on decode.
    Constant {
        /// Scalar type tag.
        #[serde(rename = "type")]
        ty: String,
        /// The literal, kept in its JSON string form.
        value: String,
    },

    /// A node emitted only when `condition` holds.
    Conditional {
        /// Boolean expression over fields bound earlier in the same
        /// structure.
        condition: String,
        /// The single nested node guarded by the condition.
        #[serde(rename = "whenTrue")]
        when_true: Box<MappingNode>,
    },

    /// Nested wire values folding into one logical value.
    Combine {
        /// Ordered nested nodes, decoded/encoded individually.
        fields: Vec<MappingNode>,
        /// Target logical type the wire values fold into.
        #[serde(rename = "type")]
        ty: String,
    },

    /// A named value read or written directly.
    Field {
        /// Binds to a contract property, or free-form inside nested
        /// structures.
        name: String,
        /// Scalar type tag, or the name of a reusable structure.
        #[serde(rename = "type")]
        ty: String,
    },
}

impl MappingNode {
    /// A field node.
    pub fn field(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self::Field {
            name: name.into(),
            ty: ty.into(),
        }
    }

    /// A constant node.
    pub fn constant(ty: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Constant {
            ty: ty.into(),
            value: value.into(),
        }
    }

    /// A conditional node.
    pub fn conditional(condition: impl Into<String>, when_true: MappingNode) -> Self {
        Self::Conditional {
            condition: condition.into(),
            when_true: Box::new(when_true),
        }
    }

    /// A combine node.
    pub fn combine(fields: Vec<MappingNode>, ty: impl Into<String>) -> Self {
        Self::Combine {
            fields,
            ty: ty.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Acyclicity
// ---------------------------------------------------------------------------

/// Verifies that no structure references itself, directly or
/// transitively, via field type tags, `whenTrue` nesting, or combine
/// children.
///
/// A field's type tag is an edge exactly when it names an entry in
/// `structures`; unknown tags are left for the generator to reject.
pub fn check_structures_acyclic(schema: &ProtocolSchema) -> Result<(), SchemaError> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        Visiting,
        Done,
    }

    fn visit(
        schema: &ProtocolSchema,
        name: &str,
        marks: &mut IndexMap<String, Mark>,
    ) -> Result<(), SchemaError> {
        match marks.get(name) {
            Some(Mark::Done) => return Ok(()),
            Some(Mark::Visiting) => {
                return Err(SchemaError::CyclicStructure(name.to_owned()));
            }
            None => {}
        }
        marks.insert(name.to_owned(), Mark::Visiting);
        if let Some(body) = schema.structures.get(name) {
            for node in body {
                visit_node(schema, node, marks)?;
            }
        }
        marks.insert(name.to_owned(), Mark::Done);
        Ok(())
    }

    fn visit_node(
        schema: &ProtocolSchema,
        node: &MappingNode,
        marks: &mut IndexMap<String, Mark>,
    ) -> Result<(), SchemaError> {
        match node {
            MappingNode::Field { ty, .. } => {
                if schema.structures.contains_key(ty) {
                    visit(schema, ty, marks)?;
                }
            }
            MappingNode::Conditional { when_true, .. } => {
                visit_node(schema, when_true, marks)?;
            }
            MappingNode::Combine { fields, .. } => {
                for child in fields {
                    visit_node(schema, child, marks)?;
                }
            }
            MappingNode::Constant { .. } => {}
        }
        Ok(())
    }

    let mut marks = IndexMap::new();
    for name in schema.structures.keys() {
        visit(schema, name, &mut marks)?;
    }
    Ok(())
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! The JSON shape is load-bearing: the authoring tool and this
    //! model must agree byte-for-byte on what each node variant looks
    //! like, and the variant must be recoverable without an explicit
    //! tag.

    use super::*;

    #[test]
    fn test_field_node_infers_from_name_and_type() {
        let node: MappingNode =
            serde_json::from_str(r#"{"name":"VersionId","type":"int"}"#).unwrap();
        assert_eq!(node, MappingNode::field("VersionId", "int"));
    }

    #[test]
    fn test_constant_node_infers_from_value() {
        let node: MappingNode =
            serde_json::from_str(r#"{"type":"string","value":"SECRET"}"#).unwrap();
        assert_eq!(node, MappingNode::constant("string", "SECRET"));
    }

    #[test]
    fn test_conditional_node_infers_from_condition() {
        let json = r#"{"condition":"HasUrl","whenTrue":{"name":"Url","type":"string"}}"#;
        let node: MappingNode = serde_json::from_str(json).unwrap();
        assert_eq!(
            node,
            MappingNode::conditional("HasUrl", MappingNode::field("Url", "string"))
        );
    }

    #[test]
    fn test_combine_node_infers_from_fields() {
        let json = r#"{"fields":[{"name":"High","type":"short"},{"name":"Low","type":"short"}],"type":"int"}"#;
        let node: MappingNode = serde_json::from_str(json).unwrap();
        assert_eq!(
            node,
            MappingNode::combine(
                vec![
                    MappingNode::field("High", "short"),
                    MappingNode::field("Low", "short"),
                ],
                "int"
            )
        );
    }

    #[test]
    fn test_node_serialization_carries_no_tag() {
        let json = serde_json::to_value(MappingNode::field("UserId", "int")).unwrap();
        assert_eq!(json, serde_json::json!({"name": "UserId", "type": "int"}));

        let json = serde_json::to_value(MappingNode::constant("bool", "true")).unwrap();
        assert_eq!(json, serde_json::json!({"type": "bool", "value": "true"}));
    }

    #[test]
    fn test_schema_sections_default_to_empty() {
        let schema: ProtocolSchema = serde_json::from_str(
            r#"{"incoming":{"Handshake.VersionCheck":{"id":5,"structure":[{"name":"VersionId","type":"int"}]}}}"#,
        )
        .unwrap();
        assert_eq!(schema.incoming.len(), 1);
        assert!(schema.outgoing.is_empty());
        assert!(schema.structures.is_empty());
        assert!(schema.interfaces.is_empty());
    }

    #[test]
    fn test_schema_round_trip_preserves_key_order() {
        let json = r#"{
            "incoming": {
                "Zebra.Last": {"id": 2, "structure": []},
                "Alpha.First": {"id": 1, "structure": []}
            },
            "outgoing": {},
            "structures": {},
            "interfaces": {}
        }"#;
        let schema: ProtocolSchema = serde_json::from_str(json).unwrap();
        let keys: Vec<&str> = schema.incoming.keys().map(String::as_str).collect();
        assert_eq!(keys, ["Zebra.Last", "Alpha.First"]);

        let stored = serde_json::to_string(&schema).unwrap();
        let reloaded: ProtocolSchema = serde_json::from_str(&stored).unwrap();
        assert_eq!(schema, reloaded);
    }

    #[test]
    fn test_acyclic_passes_for_nested_references() {
        let mut schema = ProtocolSchema::default();
        schema
            .structures
            .insert("Inner".into(), vec![MappingNode::field("X", "int")]);
        schema
            .structures
            .insert("Outer".into(), vec![MappingNode::field("Nested", "Inner")]);
        assert!(check_structures_acyclic(&schema).is_ok());
    }

    #[test]
    fn test_self_reference_is_cyclic() {
        let mut schema = ProtocolSchema::default();
        schema
            .structures
            .insert("Loop".into(), vec![MappingNode::field("Again", "Loop")]);
        assert_eq!(
            check_structures_acyclic(&schema),
            Err(SchemaError::CyclicStructure("Loop".into()))
        );
    }

    #[test]
    fn test_mutual_reference_is_cyclic() {
        let mut schema = ProtocolSchema::default();
        schema
            .structures
            .insert("A".into(), vec![MappingNode::field("B", "B")]);
        schema.structures.insert(
            "B".into(),
            vec![MappingNode::conditional(
                "true",
                MappingNode::field("A", "A"),
            )],
        );
        assert!(matches!(
            check_structures_acyclic(&schema),
            Err(SchemaError::CyclicStructure(_))
        ));
    }

    #[test]
    fn test_cycle_through_combine_children_is_detected() {
        let mut schema = ProtocolSchema::default();
        schema.structures.insert(
            "C".into(),
            vec![MappingNode::combine(
                vec![MappingNode::field("Part", "C")],
                "int",
            )],
        );
        assert!(check_structures_acyclic(&schema).is_err());
    }
}

//! Compiled codec plans and their canonical rendering.
//!
//! A plan is what the generator emits for one packet: a validated,
//! fully-resolved operation sequence. Type tags have been resolved
//! against the closed scalar set, structure references inlined,
//! constants parsed into typed values, and conditions parsed into ASTs.
//! Executing a plan forward over a reader decodes a frame; executing it
//! over a writer encodes one. The plan IS the packet's decoder and
//! encoder.

use shockwire_codec::ScalarType;

use crate::{CondExpr, Direction, FieldValue};

/// One compiled codec operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    /// Read/write a scalar bound to a named field.
    Scalar {
        /// Logical field name the value binds to.
        name: String,
        /// Resolved scalar type.
        ty: ScalarType,
    },

    /// Write the literal on encode; consume and discard on decode.
    Constant {
        /// Resolved scalar type.
        ty: ScalarType,
        /// The literal, parsed from its schema form.
        value: FieldValue,
    },

    /// Execute the nested ops only when the guard holds.
    ///
    /// The schema's `whenTrue` is a single node, but a node that
    /// references a structure inlines to several ops, so the guarded
    /// body is a sequence.
    Conditional {
        /// Guard over already-bound fields.
        cond: CondExpr,
        /// The guarded operations.
        when_true: Vec<Op>,
    },

    /// Decode the parts in order and fold them into one logical value;
    /// split on encode.
    Combine {
        /// Field name the folded value binds to.
        name: String,
        /// Target logical type of the fold.
        ty: ScalarType,
        /// The wire parts, in order.
        parts: Vec<CombinePart>,
    },
}

/// One wire part of a combine node.
#[derive(Debug, Clone, PartialEq)]
pub enum CombinePart {
    /// Contributes to the fold.
    Field {
        /// Wire-local part name.
        name: String,
        /// Part scalar type.
        ty: ScalarType,
    },
    /// Written/consumed in place but excluded from the fold.
    Constant {
        /// Part scalar type.
        ty: ScalarType,
        /// The literal.
        value: FieldValue,
    },
}

/// One packet's compiled decoder/encoder plus its dispatch key.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledPacket {
    /// Numeric discriminator, the dispatch key.
    pub id: u32,
    /// Dotted logical name from the schema.
    pub name: String,
    /// The compiled operation sequence, in wire order.
    pub ops: Vec<Op>,
}

/// Everything generated for one direction of one revision.
///
/// Packets appear in schema order, which together with the canonical
/// condition rendering makes [`render`](Self::render) deterministic:
/// byte-identical schema input yields byte-identical output.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledProtocol {
    /// The direction this run generated.
    pub direction: Direction,
    /// Compiled packets in schema order.
    pub packets: Vec<CompiledPacket>,
}

impl CompiledProtocol {
    /// Renders the canonical, diffable plan listing.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "protocol direction={} packets={}\n",
            self.direction.as_str(),
            self.packets.len()
        ));
        for packet in &self.packets {
            out.push_str(&format!("\npacket {} id={}\n", packet.name, packet.id));
            for op in &packet.ops {
                render_op(&mut out, op, 1);
            }
        }
        out
    }
}

fn render_op(out: &mut String, op: &Op, depth: usize) {
    let indent = "  ".repeat(depth);
    match op {
        Op::Scalar { name, ty } => {
            out.push_str(&format!("{indent}field {name} {ty}\n"));
        }
        Op::Constant { ty, value } => {
            out.push_str(&format!("{indent}constant {ty} {value}\n"));
        }
        Op::Conditional { cond, when_true } => {
            out.push_str(&format!("{indent}when {cond}\n"));
            for nested in when_true {
                render_op(out, nested, depth + 1);
            }
        }
        Op::Combine { name, ty, parts } => {
            out.push_str(&format!("{indent}combine {name} {ty}\n"));
            for part in parts {
                match part {
                    CombinePart::Field { name, ty } => {
                        out.push_str(&format!("{indent}  part {name} {ty}\n"));
                    }
                    CombinePart::Constant { ty, value } => {
                        out.push_str(&format!("{indent}  part constant {ty} {value}\n"));
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_shape() {
        let protocol = CompiledProtocol {
            direction: Direction::Incoming,
            packets: vec![CompiledPacket {
                id: 5,
                name: "Handshake.VersionCheck".into(),
                ops: vec![
                    Op::Scalar {
                        name: "VersionId".into(),
                        ty: ScalarType::Int,
                    },
                    Op::Conditional {
                        cond: CondExpr::parse("VersionId >= 401").unwrap(),
                        when_true: vec![Op::Scalar {
                            name: "ClientUrl".into(),
                            ty: ScalarType::String,
                        }],
                    },
                ],
            }],
        };
        let rendered = protocol.render();
        let expected = [
            "protocol direction=incoming packets=1",
            "",
            "packet Handshake.VersionCheck id=5",
            "  field VersionId int",
            "  when (VersionId >= 401)",
            "    field ClientUrl string",
            "",
        ]
        .join("\n");
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_render_is_pure() {
        let protocol = CompiledProtocol {
            direction: Direction::Outgoing,
            packets: vec![],
        };
        assert_eq!(protocol.render(), protocol.render());
    }
}

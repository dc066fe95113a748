//! The packet compiler.
//!
//! Walks each packet's structure top to bottom, validating as it goes,
//! and emits one compiled plan per packet. Every failure mode here is a
//! [`SchemaError`], fatal to the whole run; partial output is never
//! returned.

use shockwire_codec::ScalarType;
use shockwire_schema::{
    check_structures_acyclic, MappingNode, ProtocolSchema, SchemaError,
};
use tracing::{debug, warn};

use crate::{
    CombinePart, CompiledPacket, CompiledProtocol, CondExpr, ContractRegistry, Direction,
    FieldValue, Op, ResolvedContract,
};

/// Knobs for one generation run.
#[derive(Debug, Clone, Default)]
pub struct GeneratorOptions {
    /// When set, free-form fallback is forbidden: a field outside its
    /// packet's resolved contract is an error, and so is any field
    /// binding on a packet whose contract did not resolve at all.
    pub strict_bindings: bool,
}

/// Compiles one direction of a schema into per-packet codec plans.
///
/// One-shot and single-threaded; safe to re-run with unchanged input,
/// yielding identical output.
pub fn generate(
    schema: &ProtocolSchema,
    direction: Direction,
    options: &GeneratorOptions,
) -> Result<CompiledProtocol, SchemaError> {
    check_structures_acyclic(schema)?;
    let registry = ContractRegistry::new(schema);

    let packets = match direction {
        Direction::Incoming => &schema.incoming,
        Direction::Outgoing => &schema.outgoing,
    };

    let mut compiled = Vec::with_capacity(packets.len());
    for (name, packet) in packets {
        let contract = registry.resolve(name, direction);
        if contract.is_none() {
            debug!(packet = %name, "no contract resolved; fields are free-form");
        }
        let expected_contract = ContractRegistry::expected_identifier(name, direction)
            .unwrap_or_else(|| "<ungrouped>".to_owned());
        let mut ctx = PacketContext {
            schema,
            options,
            packet: name,
            contract,
            expected_contract,
            bound: Vec::new(),
        };
        let mut ops = Vec::with_capacity(packet.structure.len());
        for node in &packet.structure {
            ctx.compile_into(node, &mut ops, false)?;
        }
        compiled.push(CompiledPacket {
            id: packet.id,
            name: name.clone(),
            ops,
        });
    }

    debug!(
        direction = direction.as_str(),
        packets = compiled.len(),
        "generation complete"
    );
    Ok(CompiledProtocol {
        direction,
        packets: compiled,
    })
}

/// Per-packet compile state: which fields are bound so far and which
/// contract, if any, constrains top-level field names.
struct PacketContext<'a> {
    schema: &'a ProtocolSchema,
    options: &'a GeneratorOptions,
    packet: &'a str,
    contract: Option<ResolvedContract<'a>>,
    expected_contract: String,
    bound: Vec<String>,
}

impl PacketContext<'_> {
    /// Compiles one mapping node, appending the resulting op(s).
    /// `free_form` is true inside an inlined structure, where names do
    /// not bind to the packet's contract.
    fn compile_into(
        &mut self,
        node: &MappingNode,
        out: &mut Vec<Op>,
        free_form: bool,
    ) -> Result<(), SchemaError> {
        match node {
            MappingNode::Field { name, ty } => self.compile_field(name, ty, out, free_form),
            MappingNode::Constant { ty, value } => {
                let ty = self.scalar(ty)?;
                let value = self.parse_constant(ty, value)?;
                out.push(Op::Constant { ty, value });
                Ok(())
            }
            MappingNode::Conditional {
                condition,
                when_true,
            } => {
                let cond = CondExpr::parse(condition).map_err(|detail| {
                    SchemaError::ConditionSyntax {
                        packet: self.packet.to_owned(),
                        detail,
                    }
                })?;
                let mut refs = Vec::new();
                cond.referenced_fields(&mut refs);
                for field in refs {
                    if !self.bound.iter().any(|bound| bound == field) {
                        return Err(SchemaError::UnboundConditionField {
                            packet: self.packet.to_owned(),
                            field: field.to_owned(),
                        });
                    }
                }
                let mut body = Vec::with_capacity(1);
                self.compile_into(when_true, &mut body, free_form)?;
                out.push(Op::Conditional {
                    cond,
                    when_true: body,
                });
                Ok(())
            }
            MappingNode::Combine { fields, ty } => {
                let op = self.compile_combine(fields, ty, free_form)?;
                out.push(op);
                Ok(())
            }
        }
    }

    fn compile_field(
        &mut self,
        name: &str,
        ty: &str,
        out: &mut Vec<Op>,
        free_form: bool,
    ) -> Result<(), SchemaError> {
        if let Some(scalar) = ScalarType::parse(ty) {
            if !free_form {
                self.check_binding(name)?;
            }
            self.bound.push(name.to_owned());
            out.push(Op::Scalar {
                name: name.to_owned(),
                ty: scalar,
            });
            return Ok(());
        }

        // Not a scalar: the tag may name a reusable structure, which is
        // inlined here. Cycles were ruled out before compilation began.
        if let Some(body) = self.schema.structures.get(ty) {
            for node in body {
                self.compile_into(node, out, true)?;
            }
            return Ok(());
        }

        Err(SchemaError::UnsupportedType {
            packet: self.packet.to_owned(),
            tag: ty.to_owned(),
        })
    }

    fn compile_combine(
        &mut self,
        fields: &[MappingNode],
        ty: &str,
        free_form: bool,
    ) -> Result<Op, SchemaError> {
        let target = self.scalar(ty)?;
        let mut parts = Vec::with_capacity(fields.len());
        let mut bind_name: Option<String> = None;

        for child in fields {
            match child {
                MappingNode::Field { name, ty } => {
                    let part_ty = self.scalar(ty)?;
                    if part_ty.is_numeric() != target.is_numeric() {
                        return Err(SchemaError::CombineKindMismatch {
                            packet: self.packet.to_owned(),
                            tag: target.as_tag().to_owned(),
                        });
                    }
                    if bind_name.is_none() {
                        bind_name = Some(name.clone());
                    }
                    parts.push(CombinePart::Field {
                        name: name.clone(),
                        ty: part_ty,
                    });
                }
                MappingNode::Constant { ty, value } => {
                    let part_ty = self.scalar(ty)?;
                    let value = self.parse_constant(part_ty, value)?;
                    parts.push(CombinePart::Constant { ty: part_ty, value });
                }
                MappingNode::Conditional { .. } | MappingNode::Combine { .. } => {
                    return Err(SchemaError::UnsupportedCombineChild {
                        packet: self.packet.to_owned(),
                    });
                }
            }
        }

        let Some(name) = bind_name else {
            return Err(SchemaError::CombineWithoutField {
                packet: self.packet.to_owned(),
            });
        };
        if !free_form {
            self.check_binding(&name)?;
        }
        self.bound.push(name.clone());
        Ok(Op::Combine {
            name,
            ty: target,
            parts,
        })
    }

    fn scalar(&self, tag: &str) -> Result<ScalarType, SchemaError> {
        ScalarType::parse(tag).ok_or_else(|| SchemaError::UnsupportedType {
            packet: self.packet.to_owned(),
            tag: tag.to_owned(),
        })
    }

    fn parse_constant(&self, ty: ScalarType, value: &str) -> Result<FieldValue, SchemaError> {
        let invalid = || SchemaError::InvalidConstant {
            packet: self.packet.to_owned(),
            tag: ty.as_tag().to_owned(),
            value: value.to_owned(),
        };
        Ok(match ty {
            ScalarType::Int => FieldValue::Int(value.parse().map_err(|_| invalid())?),
            ScalarType::Short => FieldValue::Short(value.parse().map_err(|_| invalid())?),
            ScalarType::Bool => match value {
                "true" | "1" => FieldValue::Bool(true),
                "false" | "0" => FieldValue::Bool(false),
                _ => return Err(invalid()),
            },
            ScalarType::String | ScalarType::Text => FieldValue::Str(value.to_owned()),
        })
    }

    /// Validates a top-level field name against the resolved contract.
    fn check_binding(&self, name: &str) -> Result<(), SchemaError> {
        let Some(contract) = &self.contract else {
            // No contract resolved: free-form unless policy forbids it.
            if self.options.strict_bindings {
                return Err(SchemaError::UnboundField {
                    packet: self.packet.to_owned(),
                    field: name.to_owned(),
                    contract: self.expected_contract.clone(),
                });
            }
            return Ok(());
        };
        if contract.declares(name) {
            return Ok(());
        }
        if self.options.strict_bindings {
            return Err(SchemaError::UnboundField {
                packet: self.packet.to_owned(),
                field: name.to_owned(),
                contract: contract.name.to_owned(),
            });
        }
        warn!(
            packet = %self.packet,
            field = %name,
            contract = %contract.name,
            "field is not part of the contract; binding free-form"
        );
        Ok(())
    }
}

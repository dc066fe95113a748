//! Plan execution: the decode and encode halves of a compiled packet.
//!
//! Decoding walks the op sequence forward over a [`PacketReader`],
//! binding fields in wire order. Encoding walks the same sequence over
//! a [`PacketWriter`]. Both are synchronous, CPU-bound, and stateless
//! beyond the single buffer they touch, so a compiled packet can be
//! shared across threads freely.

use indexmap::IndexMap;
use shockwire_codec::{CodecError, PacketReader, PacketWriter, ScalarType};

use crate::{CombinePart, CompiledPacket, FieldValue, Op, Packet};

/// Errors composing an outgoing frame.
///
/// Reserved: encoders only consume already-valid in-memory objects, so
/// in normal operation none of these are reachable. They exist because
/// a packet object is a dynamic field map and callers can hand over one
/// that violates its contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    /// The packet object lacks a field the plan binds.
    #[error("packet is missing bound field `{0}`")]
    MissingField(String),

    /// A bound field carries the wrong kind of value.
    #[error("field `{field}` has kind {found}, expected {expected}")]
    KindMismatch {
        /// The offending field.
        field: String,
        /// Kind the plan requires.
        expected: &'static str,
        /// Kind the packet object supplied.
        found: &'static str,
    },

    /// A condition could not be evaluated against the packet object.
    #[error("condition failed: {0}")]
    Condition(String),
}

impl CompiledPacket {
    /// Decodes one frame payload into a packet object.
    ///
    /// Any [`CodecError`] means this frame is malformed; the caller
    /// drops the frame and carries on.
    pub fn decode(&self, payload: &[u8]) -> Result<Packet, CodecError> {
        let mut reader = PacketReader::new(payload);
        let mut fields = IndexMap::new();
        decode_ops(&self.ops, &mut reader, &mut fields)?;
        Ok(Packet {
            id: self.id,
            name: self.name.clone(),
            fields,
        })
    }

    /// Encodes a packet object into a frame payload.
    pub fn encode(&self, packet: &Packet) -> Result<Vec<u8>, EncodeError> {
        let mut writer = PacketWriter::new();
        encode_ops(&self.ops, &mut writer, &packet.fields)?;
        Ok(writer.into_bytes())
    }
}

// ---------------------------------------------------------------------------
// Decode
// ---------------------------------------------------------------------------

fn decode_ops(
    ops: &[Op],
    reader: &mut PacketReader<'_>,
    fields: &mut IndexMap<String, FieldValue>,
) -> Result<(), CodecError> {
    for op in ops {
        match op {
            Op::Scalar { name, ty } => {
                let value = read_value(reader, *ty)?;
                fields.insert(name.clone(), value);
            }
            Op::Constant { ty, .. } => {
                // Consumed, never compared against the literal.
                read_value(reader, *ty)?;
            }
            Op::Conditional { cond, when_true } => {
                let holds = cond
                    .evaluate(fields)
                    .map_err(CodecError::FormatError)?;
                if holds {
                    decode_ops(when_true, reader, fields)?;
                }
            }
            Op::Combine { name, ty, parts } => {
                let value = decode_combine(reader, *ty, parts)?;
                fields.insert(name.clone(), value);
            }
        }
    }
    Ok(())
}

fn read_value(reader: &mut PacketReader<'_>, ty: ScalarType) -> Result<FieldValue, CodecError> {
    Ok(match ty {
        ScalarType::Int => FieldValue::Int(reader.read_varint()?),
        ScalarType::Short => FieldValue::Short(reader.read_short()?),
        ScalarType::Bool => FieldValue::Bool(reader.read_bool()?),
        ScalarType::String => FieldValue::Str(reader.read_string()?),
        ScalarType::Text => FieldValue::Str(reader.read_text()?),
    })
}

fn decode_combine(
    reader: &mut PacketReader<'_>,
    target: ScalarType,
    parts: &[CombinePart],
) -> Result<FieldValue, CodecError> {
    if target.is_numeric() {
        // Positional bit concatenation: the first part holds the most
        // significant chunk.
        let mut acc: u64 = 0;
        for part in parts {
            match part {
                CombinePart::Field { ty, .. } => {
                    let value = read_value(reader, *ty)?;
                    let width = ty.bit_width().unwrap_or(0);
                    let bits = value.to_bits().unwrap_or(0);
                    acc = (acc << width) | bits;
                }
                CombinePart::Constant { ty, .. } => {
                    read_value(reader, *ty)?;
                }
            }
        }
        Ok(match target {
            ScalarType::Int => FieldValue::Int(acc as u32),
            ScalarType::Short => FieldValue::Short(acc as u16),
            ScalarType::Bool => FieldValue::Bool(acc & 1 != 0),
            ScalarType::String | ScalarType::Text => unreachable!("target is numeric"),
        })
    } else {
        // Ordered concatenation of the textual parts.
        let mut acc = String::new();
        for part in parts {
            match part {
                CombinePart::Field { ty, .. } => {
                    if let FieldValue::Str(piece) = read_value(reader, *ty)? {
                        acc.push_str(&piece);
                    }
                }
                CombinePart::Constant { ty, .. } => {
                    read_value(reader, *ty)?;
                }
            }
        }
        Ok(FieldValue::Str(acc))
    }
}

// ---------------------------------------------------------------------------
// Encode
// ---------------------------------------------------------------------------

fn encode_ops(
    ops: &[Op],
    writer: &mut PacketWriter,
    fields: &IndexMap<String, FieldValue>,
) -> Result<(), EncodeError> {
    for op in ops {
        match op {
            Op::Scalar { name, ty } => {
                let value = fields
                    .get(name)
                    .ok_or_else(|| EncodeError::MissingField(name.clone()))?;
                write_value(writer, *ty, name, value)?;
            }
            Op::Constant { ty, value } => {
                // The literal is always written; no packet field is
                // consulted.
                write_constant(writer, *ty, value);
            }
            Op::Conditional { cond, when_true } => {
                // The condition references only fields bound earlier,
                // so it is computable without the guarded field itself.
                let holds = cond
                    .evaluate(fields)
                    .map_err(EncodeError::Condition)?;
                if holds {
                    encode_ops(when_true, writer, fields)?;
                }
            }
            Op::Combine { name, ty, parts } => {
                let value = fields
                    .get(name)
                    .ok_or_else(|| EncodeError::MissingField(name.clone()))?;
                encode_combine(writer, *ty, name, parts, value)?;
            }
        }
    }
    Ok(())
}

fn write_value(
    writer: &mut PacketWriter,
    ty: ScalarType,
    field: &str,
    value: &FieldValue,
) -> Result<(), EncodeError> {
    let mismatch = || EncodeError::KindMismatch {
        field: field.to_owned(),
        expected: ty.as_tag(),
        found: value.kind(),
    };
    match (ty, value) {
        (ScalarType::Int, FieldValue::Int(v)) => writer.write_varint(*v),
        (ScalarType::Short, FieldValue::Short(v)) => writer.write_short(*v),
        (ScalarType::Bool, FieldValue::Bool(v)) => writer.write_bool(*v),
        (ScalarType::String, FieldValue::Str(v)) => writer.write_string(v),
        (ScalarType::Text, FieldValue::Str(v)) => writer.write_text(v),
        _ => return Err(mismatch()),
    }
    Ok(())
}

fn write_constant(writer: &mut PacketWriter, ty: ScalarType, value: &FieldValue) {
    // Constants were parsed against their declared type at generation
    // time, so the kinds always line up.
    match (ty, value) {
        (ScalarType::Int, FieldValue::Int(v)) => writer.write_varint(*v),
        (ScalarType::Short, FieldValue::Short(v)) => writer.write_short(*v),
        (ScalarType::Bool, FieldValue::Bool(v)) => writer.write_bool(*v),
        (ScalarType::String, FieldValue::Str(v)) => writer.write_string(v),
        (ScalarType::Text, FieldValue::Str(v)) => writer.write_text(v),
        _ => unreachable!("constant kind checked at generation time"),
    }
}

fn encode_combine(
    writer: &mut PacketWriter,
    target: ScalarType,
    field: &str,
    parts: &[CombinePart],
    value: &FieldValue,
) -> Result<(), EncodeError> {
    if target.is_numeric() {
        let Some(bits) = value.to_bits() else {
            return Err(EncodeError::KindMismatch {
                field: field.to_owned(),
                expected: target.as_tag(),
                found: value.kind(),
            });
        };

        // Split is the inverse of the fold: walk field parts from the
        // last to the first, peeling chunks off the low end.
        let mut chunks: Vec<Option<u64>> = vec![None; parts.len()];
        let mut rest = bits;
        for (index, part) in parts.iter().enumerate().rev() {
            if let CombinePart::Field { ty, .. } = part {
                let width = ty.bit_width().unwrap_or(0);
                let mask = (1u64 << width) - 1;
                chunks[index] = Some(rest & mask);
                rest >>= width;
            }
        }

        for (index, part) in parts.iter().enumerate() {
            match part {
                CombinePart::Field { name, ty } => {
                    let chunk = chunks[index].expect("chunk computed above");
                    let piece = match ty {
                        ScalarType::Int => FieldValue::Int(chunk as u32),
                        ScalarType::Short => FieldValue::Short(chunk as u16),
                        ScalarType::Bool => FieldValue::Bool(chunk != 0),
                        ScalarType::String | ScalarType::Text => {
                            unreachable!("numeric combine has numeric parts")
                        }
                    };
                    write_value(writer, *ty, name, &piece)?;
                }
                CombinePart::Constant { ty, value } => write_constant(writer, *ty, value),
            }
        }
        Ok(())
    } else {
        let FieldValue::Str(text) = value else {
            return Err(EncodeError::KindMismatch {
                field: field.to_owned(),
                expected: target.as_tag(),
                found: value.kind(),
            });
        };

        // Concatenation has no unique inverse: the first field part
        // carries the whole value, later field parts are empty.
        let mut first = true;
        for part in parts {
            match part {
                CombinePart::Field { name, ty } => {
                    let piece = if first { text.as_str() } else { "" };
                    first = false;
                    write_value(writer, *ty, name, &FieldValue::Str(piece.to_owned()))?;
                }
                CombinePart::Constant { ty, value } => write_constant(writer, *ty, value),
            }
        }
        Ok(())
    }
}

//! Error type for schema loading, editing, and generation.

/// Errors raised by schema validation, editing, or a generation run.
///
/// Every variant is fatal to the run that raised it. Generation stages
/// its output and commits atomically, so a failed run never corrupts a
/// previously committed artifact.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// A structure references itself, directly or transitively.
    #[error("cyclic structure reference through `{0}`")]
    CyclicStructure(String),

    /// An insert into one of the top-level maps collided with an
    /// existing entry. Logical names are unique within each map.
    #[error("duplicate name `{0}`")]
    DuplicateName(String),

    /// An edit addressed a structure that does not exist.
    #[error("no structure named `{0}`")]
    UnknownStructure(String),

    /// An edit addressed a position outside the node sequence.
    #[error("index {index} out of bounds for sequence of length {len}")]
    IndexOutOfBounds {
        /// The offending index.
        index: usize,
        /// The sequence length at the time of the edit.
        len: usize,
    },

    /// A type tag is neither a scalar nor the name of a structure.
    #[error("packet `{packet}`: type tag `{tag}` is not a scalar or a known structure")]
    UnsupportedType {
        /// Dotted logical name of the packet being compiled.
        packet: String,
        /// The unrecognized tag.
        tag: String,
    },

    /// A constant's literal does not parse as its declared type.
    #[error("packet `{packet}`: constant `{value}` is not a valid {tag}")]
    InvalidConstant {
        /// Dotted logical name of the packet being compiled.
        packet: String,
        /// Declared type tag.
        tag: String,
        /// The literal as written in the schema.
        value: String,
    },

    /// A conditional's expression failed to parse.
    #[error("packet `{packet}`: bad condition: {detail}")]
    ConditionSyntax {
        /// Dotted logical name of the packet being compiled.
        packet: String,
        /// What the parser choked on.
        detail: String,
    },

    /// A condition references a field that is not bound earlier in the
    /// same structure. The cursor is forward-only, so such a condition
    /// could never be evaluated.
    #[error("packet `{packet}`: condition references `{field}` before it is bound")]
    UnboundConditionField {
        /// Dotted logical name of the packet being compiled.
        packet: String,
        /// The unbound identifier.
        field: String,
    },

    /// A combine node nests something other than field or constant
    /// nodes.
    #[error("packet `{packet}`: combine nodes may only nest field and constant nodes")]
    UnsupportedCombineChild {
        /// Dotted logical name of the packet being compiled.
        packet: String,
    },

    /// A combine's children do not agree with its target kind
    /// (numeric targets fold numeric parts, textual targets fold
    /// textual parts).
    #[error("packet `{packet}`: combine into {tag} mixes numeric and textual parts")]
    CombineKindMismatch {
        /// Dotted logical name of the packet being compiled.
        packet: String,
        /// Target type tag.
        tag: String,
    },

    /// A combine node has no field child to bind its folded value to.
    #[error("packet `{packet}`: combine has no field child to bind to")]
    CombineWithoutField {
        /// Dotted logical name of the packet being compiled.
        packet: String,
    },

    /// Strict bindings only: a field does not appear in the packet's
    /// resolved contract and free-form fallback is disabled.
    #[error("packet `{packet}`: field `{field}` is not part of contract `{contract}`")]
    UnboundField {
        /// Dotted logical name of the packet being compiled.
        packet: String,
        /// The unmatched field name.
        field: String,
        /// The contract the packet resolved to.
        contract: String,
    },
}

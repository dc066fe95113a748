//! One loaded protocol revision.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use shockwire_codegen::{generate, Direction, GeneratorOptions};
use shockwire_dispatch::DispatchTable;
use shockwire_schema::ProtocolSchema;
use tracing::info;

use crate::ShockwireError;

/// Both dispatch tables for one concrete client dialect.
///
/// Revisions are fully isolated: each carries its own generated codecs
/// and tables, so any number of them can be loaded side by side and
/// shared read-only across connection handlers. Only the codec
/// primitives underneath are shared, and those are pure and stateless.
#[derive(Debug)]
pub struct Revision {
    /// Revision label, e.g. `RELEASE9` or `WIN63-202111081545-75921380`.
    pub name: String,
    /// Table for client → server packets.
    pub incoming: DispatchTable,
    /// Table for server → client packets.
    pub outgoing: DispatchTable,
}

impl Revision {
    /// Generates both directions from an already-loaded schema and
    /// builds their dispatch tables.
    pub fn from_schema(
        name: impl Into<String>,
        schema: &ProtocolSchema,
        options: &GeneratorOptions,
    ) -> Result<Self, ShockwireError> {
        let name = name.into();
        let incoming = DispatchTable::build(generate(schema, Direction::Incoming, options)?)?;
        let outgoing = DispatchTable::build(generate(schema, Direction::Outgoing, options)?)?;
        info!(
            revision = %name,
            incoming = incoming.len(),
            outgoing = outgoing.len(),
            "revision loaded"
        );
        Ok(Self {
            name,
            incoming,
            outgoing,
        })
    }

    /// Reads a `packets.json` file and builds the revision from it.
    ///
    /// The revision name is the file's parent directory name when there
    /// is one (the authoring tool keeps one directory per revision),
    /// otherwise the file stem.
    pub fn load(path: &Path, options: &GeneratorOptions) -> Result<Self, ShockwireError> {
        let file = File::open(path)?;
        let schema: ProtocolSchema = serde_json::from_reader(BufReader::new(file))?;
        let name = path
            .parent()
            .and_then(|dir| dir.file_name())
            .or_else(|| path.file_stem())
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unnamed".to_owned());
        Self::from_schema(name, &schema, options)
    }
}

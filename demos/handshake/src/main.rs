//! Shockwire demo: compile a revision schema and poke frames through it.
//!
//! ```text
//! handshake protocols/RELEASE9/packets.json
//! handshake protocols/RELEASE9/packets.json --artifact-dir build/
//! handshake protocols/RELEASE9/packets.json --id 5 --frame 2a
//! ```

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use shockwire::prelude::*;
use shockwire::{commit_artifact, generate};

#[derive(Parser)]
#[command(about = "Compile a packets.json and inspect or decode frames")]
struct Args {
    /// Path to the revision's packets.json.
    schema: PathBuf,

    /// Commit the rendered plan artifacts into this directory.
    #[arg(long)]
    artifact_dir: Option<PathBuf>,

    /// Decode this hex-encoded incoming frame payload (use with --id).
    #[arg(long, requires = "id")]
    frame: Option<String>,

    /// Packet id the frame was sent under.
    #[arg(long)]
    id: Option<u32>,

    /// Reject fields that fall outside their packet's contract.
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();
    let options = GeneratorOptions {
        strict_bindings: args.strict,
    };

    let revision = Revision::load(&args.schema, &options)
        .with_context(|| format!("loading {}", args.schema.display()))?;
    println!(
        "revision {}: {} incoming, {} outgoing",
        revision.name,
        revision.incoming.len(),
        revision.outgoing.len()
    );

    if let Some(dir) = &args.artifact_dir {
        let schema = std::fs::read_to_string(&args.schema)?;
        let schema: ProtocolSchema = serde_json::from_str(&schema)?;
        for direction in [Direction::Incoming, Direction::Outgoing] {
            let rendered = generate(&schema, direction, &options)?.render();
            let label = format!("{}.{}", revision.name, direction.as_str());
            let path = commit_artifact(dir, &label, &rendered)
                .with_context(|| format!("committing {label}"))?;
            println!("committed {}", path.display());
        }
    }

    if let Some(hex) = &args.frame {
        let id = args.id.context("--id is required with --frame")?;
        let payload = parse_hex(hex)?;
        match revision.incoming.decode(id, &payload) {
            Ok(packet) => {
                println!("decoded {} (id {})", packet.name, packet.id);
                for (name, value) in &packet.fields {
                    println!("  {name} = {value}");
                }
            }
            Err(err) => println!("frame dropped: {err}"),
        }
    }

    Ok(())
}

fn parse_hex(input: &str) -> Result<Vec<u8>> {
    let cleaned: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.len() % 2 != 0 {
        bail!("hex payload has an odd number of digits");
    }
    (0..cleaned.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&cleaned[i..i + 2], 16)
                .with_context(|| format!("bad hex byte `{}`", &cleaned[i..i + 2]))
        })
        .collect()
}

//! Integration tests: loading a realistic `packets.json` document.

use shockwire_schema::{check_structures_acyclic, MappingNode, ProtocolSchema};

const PACKETS_JSON: &str = r#"{
    "incoming": {
        "Handshake.VersionCheck": {
            "id": 5,
            "structure": [
                {"name": "VersionId", "type": "int"},
                {"name": "ClientUrl", "type": "string"}
            ]
        },
        "Room.Chat": {
            "id": 24,
            "structure": [
                {"name": "Message", "type": "text"},
                {"name": "HasStyle", "type": "bool"},
                {"condition": "HasStyle", "whenTrue": {"name": "StyleId", "type": "short"}}
            ]
        }
    },
    "outgoing": {
        "Room.Whisper": {
            "id": 3117,
            "structure": [
                {"name": "UserId", "type": "int"},
                {"name": "Text", "type": "text"},
                {"name": "Link", "type": "LinkData"}
            ]
        }
    },
    "structures": {
        "LinkData": [
            {"name": "Location", "type": "text"},
            {"name": "Trusted", "type": "bool"}
        ]
    },
    "interfaces": {
        "Handshake.IVersionCheckIncomingPacket": {
            "VersionId": "int",
            "ClientUrl": "string"
        }
    }
}"#;

#[test]
fn test_full_document_loads() {
    let schema: ProtocolSchema = serde_json::from_str(PACKETS_JSON).unwrap();
    assert_eq!(schema.incoming.len(), 2);
    assert_eq!(schema.outgoing.len(), 1);
    assert_eq!(schema.incoming["Handshake.VersionCheck"].id, 5);
    assert_eq!(schema.structures["LinkData"].len(), 2);
    assert_eq!(
        schema.interfaces["Handshake.IVersionCheckIncomingPacket"]["VersionId"],
        "int"
    );
    assert!(check_structures_acyclic(&schema).is_ok());
}

#[test]
fn test_variant_inference_in_context() {
    let schema: ProtocolSchema = serde_json::from_str(PACKETS_JSON).unwrap();
    let chat = &schema.incoming["Room.Chat"].structure;
    assert!(matches!(chat[0], MappingNode::Field { .. }));
    assert!(matches!(chat[2], MappingNode::Conditional { .. }));

    // The structure reference is just a field with a non-scalar tag.
    let whisper = &schema.outgoing["Room.Whisper"].structure;
    assert_eq!(whisper[2], MappingNode::field("Link", "LinkData"));
}

#[test]
fn test_store_then_load_is_lossless() {
    let schema: ProtocolSchema = serde_json::from_str(PACKETS_JSON).unwrap();
    let stored = serde_json::to_string_pretty(&schema).unwrap();
    let reloaded: ProtocolSchema = serde_json::from_str(&stored).unwrap();
    assert_eq!(schema, reloaded);
}

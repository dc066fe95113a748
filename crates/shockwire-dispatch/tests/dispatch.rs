//! Integration tests for the dispatch table.

use shockwire_codegen::{generate, Direction, FieldValue, GeneratorOptions, Packet};
use shockwire_dispatch::{DispatchError, DispatchTable};
use shockwire_schema::ProtocolSchema;

fn table(json: &str, direction: Direction) -> DispatchTable {
    let schema: ProtocolSchema = serde_json::from_str(json).unwrap();
    let compiled = generate(&schema, direction, &GeneratorOptions::default()).unwrap();
    DispatchTable::build(compiled).unwrap()
}

const HOTEL: &str = r#"{
    "incoming": {
        "Handshake.VersionCheck": {"id": 5, "structure": [{"name": "VersionId", "type": "int"}]},
        "Room.Chat": {"id": 24, "structure": [{"name": "Message", "type": "string"}]}
    },
    "outgoing": {
        "Room.Whisper": {"id": 3117, "structure": [
            {"name": "UserId", "type": "int"},
            {"name": "Text", "type": "text"}
        ]}
    }
}"#;

#[test]
fn test_decode_routes_by_id() {
    let table = table(HOTEL, Direction::Incoming);
    assert_eq!(table.len(), 2);
    assert_eq!(table.ids(), [5, 24]);

    let decoded = table.decode(5, &[42]).unwrap();
    assert_eq!(decoded.name, "Handshake.VersionCheck");
    assert_eq!(decoded.get("VersionId"), Some(&FieldValue::Int(42)));
}

#[test]
fn test_unknown_id_is_recoverable_and_table_survives() {
    let table = table(HOTEL, Direction::Incoming);
    let err = table.decode(9999, &[1, 2, 3]).unwrap_err();
    assert!(matches!(err, DispatchError::UnknownPacketId { id: 9999 }));

    // The table keeps dispatching after the miss.
    assert!(table.decode(5, &[7]).is_ok());
}

#[test]
fn test_malformed_payload_is_reported_per_frame() {
    let table = table(HOTEL, Direction::Incoming);
    // Packet 24 expects a string; an empty payload underruns.
    let err = table.decode(24, &[]).unwrap_err();
    assert!(matches!(
        err,
        DispatchError::MalformedPacket { id: 24, .. }
    ));
    assert!(table.decode(24, &[0x40, 0x42, b'h', b'i']).is_ok());
}

#[test]
fn test_encode_path_round_trips_through_decode() {
    let outgoing = table(HOTEL, Direction::Outgoing);
    let whisper = Packet::new(3117, "Room.Whisper")
        .with("UserId", 88u32)
        .with("Text", "pssst");
    let bytes = outgoing.encode(&whisper).unwrap();
    let decoded = outgoing.get(3117).unwrap().decode(&bytes).unwrap();
    assert_eq!(decoded, whisper);
}

#[test]
fn test_encode_unregistered_id_is_an_error() {
    let outgoing = table(HOTEL, Direction::Outgoing);
    let err = outgoing
        .encode(&Packet::new(1, "Not.Registered"))
        .unwrap_err();
    assert!(matches!(err, DispatchError::UnknownPacketId { id: 1 }));
}

#[test]
fn test_duplicate_ids_fail_at_build_time() {
    let json = r#"{
        "incoming": {
            "A.First": {"id": 7, "structure": []},
            "A.Second": {"id": 7, "structure": []}
        }
    }"#;
    let schema: ProtocolSchema = serde_json::from_str(json).unwrap();
    let compiled = generate(&schema, Direction::Incoming, &GeneratorOptions::default()).unwrap();
    let err = DispatchTable::build(compiled).unwrap_err();
    match err {
        DispatchError::DuplicatePacketId { id, first, second } => {
            assert_eq!(id, 7);
            assert_eq!(first, "A.First");
            assert_eq!(second, "A.Second");
        }
        other => panic!("expected duplicate id error, got {other:?}"),
    }
}

#[test]
fn test_same_id_allowed_across_directions() {
    let json = r#"{
        "incoming": {"A.In": {"id": 1, "structure": []}},
        "outgoing": {"A.Out": {"id": 1, "structure": []}}
    }"#;
    assert!(table(json, Direction::Incoming).contains(1));
    assert!(table(json, Direction::Outgoing).contains(1));
}

#[test]
fn test_table_is_shareable_across_threads() {
    let table = std::sync::Arc::new(table(HOTEL, Direction::Incoming));
    let handles: Vec<_> = (0..4u8)
        .map(|i| {
            let table = std::sync::Arc::clone(&table);
            std::thread::spawn(move || {
                let decoded = table.decode(5, &[i]).unwrap();
                assert_eq!(decoded.get("VersionId"), Some(&FieldValue::Int(u32::from(i))));
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
}

//! Integration tests: whole-frame sequences across every primitive.

use shockwire_codec::{CodecError, PacketReader, PacketWriter};

#[test]
fn test_full_frame_round_trip() {
    let mut w = PacketWriter::new();
    w.write_varint(1_234_567);
    w.write_string("habbo15");
    w.write_text("Välkommen");
    w.write_short(443);
    w.write_bool(true);
    let frame = w.into_bytes();

    let mut r = PacketReader::new(&frame);
    assert_eq!(r.read_varint().unwrap(), 1_234_567);
    assert_eq!(r.read_string().unwrap(), "habbo15");
    assert_eq!(r.read_text().unwrap(), "Välkommen");
    assert_eq!(r.read_short().unwrap(), 443);
    assert!(r.read_bool().unwrap());
    assert!(r.is_empty());
}

#[test]
fn test_varint_law_over_sampled_range() {
    // Exhaustive 2^32 is impractical; sweep chunk boundaries and a
    // stride through the full range.
    let mut values: Vec<u32> = vec![0, 1, 127, 128, 16_383, 16_384, u32::MAX];
    values.extend((0..64u32).map(|i| i.wrapping_mul(0x0411_9E2F)));
    for value in values {
        let mut w = PacketWriter::new();
        w.write_varint(value);
        let bytes = w.into_bytes();
        assert_eq!(PacketReader::new(&bytes).read_varint().unwrap(), value);
    }
}

#[test]
fn test_truncated_frame_fails_fast() {
    let mut w = PacketWriter::new();
    w.write_string("truncate me");
    let mut frame = w.into_bytes();
    frame.truncate(frame.len() - 3);

    let mut r = PacketReader::new(&frame);
    assert!(matches!(
        r.read_string(),
        Err(CodecError::BufferUnderrun { .. })
    ));
}

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;

use crate::{
    decode_document,
    decode_document_with_options,
    doc,
    encode_document,
    oid::ObjectId,
    spec::BinarySubtype,
    Binary,
    Bson,
    DateTime,
    DbPointer,
    DecodeOptions,
    DecoderError,
    Document,
    EncoderError,
    Regex,
    Timestamp,
};

fn round_trip(doc: &Document, expected: &[u8]) {
    let buf = encode_document(doc).unwrap();
    assert_eq!(buf, expected);

    let decoded = decode_document(&buf).unwrap();
    assert_eq!(&decoded, doc);
}

#[test]
fn encode_decode_empty_document() {
    round_trip(&doc! {}, &[5, 0, 0, 0, 0]);
}

#[test]
fn encode_decode_floating_point() {
    round_trip(
        &doc! { "key" => 1020.123 },
        &[
            18, 0, 0, 0, 1, 107, 101, 121, 0, 68, 139, 108, 231, 251, 224, 143, 64, 0,
        ],
    );
}

#[test]
fn encode_decode_utf8_string() {
    // "test你好吗" is 4 one-byte and 3 three-byte code points; the declared
    // length is the UTF-8 byte length plus one for the trailing null
    round_trip(
        &doc! { "key" => "test你好吗" },
        &[
            28, 0, 0, 0, 2, 107, 101, 121, 0, 14, 0, 0, 0, 116, 101, 115, 116, 228, 189, 160, 229,
            165, 189, 229, 144, 151, 0, 0,
        ],
    );
}

#[test]
fn encode_decode_array() {
    let src = vec![Bson::Double(1.01), Bson::String("xyz".to_owned())];
    round_trip(
        &doc! { "key" => src },
        &[
            37, 0, 0, 0, 4, 107, 101, 121, 0, 27, 0, 0, 0, 1, 48, 0, 41, 92, 143, 194, 245, 40,
            240, 63, 2, 49, 0, 4, 0, 0, 0, 120, 121, 122, 0, 0, 0,
        ],
    );
}

#[test]
fn encode_decode_array_of_ints_keyed_by_index() {
    let buf = encode_document(&doc! { "key" => [1, 2] }).unwrap();
    assert_eq!(
        buf,
        vec![
            29, 0, 0, 0, 4, 107, 101, 121, 0, 19, 0, 0, 0, 16, 48, 0, 1, 0, 0, 0, 16, 49, 0, 2, 0,
            0, 0, 0, 0,
        ]
    );

    let decoded = decode_document(&buf).unwrap();
    let arr = decoded.get_array("key").unwrap();
    assert_eq!(arr.as_slice(), &[Bson::Int32(1), Bson::Int32(2)]);
}

#[test]
fn encode_decode_embedded_document() {
    round_trip(
        &doc! { "key" => { "subkey" => 1 } },
        &[
            27, 0, 0, 0, 3, 107, 101, 121, 0, 17, 0, 0, 0, 16, 115, 117, 98, 107, 101, 121, 0, 1,
            0, 0, 0, 0, 0,
        ],
    );
}

#[test]
fn encode_decode_boolean() {
    round_trip(&doc! { "key" => true }, &[11, 0, 0, 0, 8, 107, 101, 121, 0, 1, 0]);
}

#[test]
fn encode_decode_null() {
    round_trip(&doc! { "key" => (Bson::Null) }, &[10, 0, 0, 0, 10, 107, 101, 121, 0, 0]);
}

#[test]
fn encode_decode_no_payload_values() {
    round_trip(
        &doc! { "key" => (Bson::Undefined) },
        &[10, 0, 0, 0, 6, 107, 101, 121, 0, 0],
    );
    round_trip(
        &doc! { "key" => (Bson::MinKey) },
        &[10, 0, 0, 0, 255, 107, 101, 121, 0, 0],
    );
    round_trip(
        &doc! { "key" => (Bson::MaxKey) },
        &[10, 0, 0, 0, 127, 107, 101, 121, 0, 0],
    );
}

#[test]
fn encode_decode_int32() {
    round_trip(
        &doc! { "key" => 42 },
        &[14, 0, 0, 0, 16, 107, 101, 121, 0, 42, 0, 0, 0, 0],
    );
}

#[test]
fn encode_decode_int64() {
    round_trip(
        &doc! { "key" => 258i64 },
        &[18, 0, 0, 0, 18, 107, 101, 121, 0, 2, 1, 0, 0, 0, 0, 0, 0, 0],
    );
}

#[test]
fn encode_decode_datetime() {
    round_trip(
        &doc! { "key" => (DateTime::from_millis(258)) },
        &[18, 0, 0, 0, 9, 107, 101, 121, 0, 2, 1, 0, 0, 0, 0, 0, 0, 0],
    );
}

#[test]
fn encode_decode_timestamp() {
    // seconds in the high half, increment in the low half
    round_trip(
        &doc! { "key" => (Timestamp { time: 1, increment: 2 }) },
        &[18, 0, 0, 0, 17, 107, 101, 121, 0, 2, 0, 0, 0, 1, 0, 0, 0, 0],
    );
}

#[test]
fn encode_decode_object_id() {
    round_trip(
        &doc! { "key" => (ObjectId::from_bytes([0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11])) },
        &[
            22, 0, 0, 0, 7, 107, 101, 121, 0, 0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 0,
        ],
    );
}

#[test]
fn encode_decode_binary() {
    round_trip(
        &doc! { "key" => (Binary { subtype: BinarySubtype::Generic, bytes: vec![1, 2, 3] }) },
        &[
            18, 0, 0, 0, 5, 107, 101, 121, 0, 3, 0, 0, 0, 0, 1, 2, 3, 0,
        ],
    );
}

#[test]
fn encode_decode_regex() {
    round_trip(
        &doc! { "key" => (Regex { pattern: "ab".to_owned(), options: "im".to_owned() }) },
        &[
            16, 0, 0, 0, 11, 107, 101, 121, 0, 97, 98, 0, 105, 109, 0, 0,
        ],
    );
}

#[test]
fn encode_decode_javascript_code() {
    round_trip(
        &doc! { "key" => (Bson::JavaScriptCode("x".to_owned())) },
        &[16, 0, 0, 0, 15, 107, 101, 121, 0, 2, 0, 0, 0, 120, 0, 0],
    );
    round_trip(
        &doc! { "key" => (Bson::LegacyJavaScriptCode("x".to_owned())) },
        &[16, 0, 0, 0, 13, 107, 101, 121, 0, 2, 0, 0, 0, 120, 0, 0],
    );
}

#[test]
fn encode_decode_db_pointer() {
    let id = ObjectId::from_bytes([0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]);
    round_trip(
        &doc! { "key" => (DbPointer { namespace: "a.b".to_owned(), id }) },
        &[
            30, 0, 0, 0, 12, 107, 101, 121, 0, 4, 0, 0, 0, 97, 46, 98, 0, 0, 1, 2, 3, 4, 5, 6, 7,
            8, 9, 10, 11, 0,
        ],
    );
}

#[test]
fn length_prefix_equals_total_length() {
    let docs = [
        doc! {},
        doc! { "a" => 1 },
        doc! { "a" => ["x", "y", "z"], "b" => { "c" => 4.5 } },
    ];

    for doc in &docs {
        let buf = encode_document(doc).unwrap();
        let declared = i32::from_le_bytes(buf[0..4].try_into().unwrap());
        assert_eq!(declared as usize, buf.len());
        assert_eq!(*buf.last().unwrap(), 0);
    }
}

#[test]
fn decode_rejects_truncated_input() {
    let buf = encode_document(&doc! { "a" => [1, 2], "b" => "hello" }).unwrap();

    for prefix_len in 0..buf.len() {
        assert_matches!(
            decode_document(&buf[..prefix_len]),
            Err(DecoderError::MalformedDocument { .. }),
            "prefix of length {} should not decode",
            prefix_len
        );
    }
}

#[test]
fn decode_rejects_unknown_tag() {
    // tag 0x14 is not in the known set
    let buf = vec![12, 0, 0, 0, 0x14, 107, 101, 121, 0, 0, 0, 0];
    assert_matches!(
        decode_document(&buf),
        Err(DecoderError::UnrecognizedElementType { tag: 0x14 })
    );
}

#[test]
fn decode_rejects_bad_length_prefix() {
    // declared length below the 5-byte minimum
    assert_matches!(
        decode_document(&[4, 0, 0, 0, 0]),
        Err(DecoderError::MalformedDocument { .. })
    );

    // negative declared length
    assert_matches!(
        decode_document(&[0xFF, 0xFF, 0xFF, 0xFF, 0]),
        Err(DecoderError::MalformedDocument { .. })
    );

    // declared length larger than the input
    assert_matches!(
        decode_document(&[6, 0, 0, 0, 0]),
        Err(DecoderError::MalformedDocument { .. })
    );
}

#[test]
fn decode_rejects_length_extent_mismatch() {
    // a valid empty document body with a declared length of 6
    assert_matches!(
        decode_document(&[6, 0, 0, 0, 0, 0]),
        Err(DecoderError::MalformedDocument { .. })
    );
}

#[test]
fn decode_rejects_string_without_terminator() {
    // string element declaring 2 bytes, neither of which is the null
    let buf = vec![16, 0, 0, 0, 2, 107, 101, 121, 0, 2, 0, 0, 0, 97, 98, 0];
    assert_matches!(
        decode_document(&buf),
        Err(DecoderError::MalformedDocument { .. })
    );
}

#[test]
fn decode_rejects_invalid_array_key() {
    // array whose first element is keyed "1" instead of "0"
    let buf = vec![
        22, 0, 0, 0, 4, 107, 101, 121, 0, 12, 0, 0, 0, 16, 49, 0, 1, 0, 0, 0, 0, 0,
    ];
    assert_matches!(
        decode_document(&buf),
        Err(DecoderError::InvalidArrayKey { expected: 0, .. })
    );
}

#[test]
fn decode_preserves_element_order() {
    // equality on documents is order-insensitive, so iteration order has to
    // be asserted directly
    let doc = doc! { "z" => 1, "a" => "two", "m" => { "q" => 3, "b" => 4 } };
    let decoded = decode_document(&encode_document(&doc).unwrap()).unwrap();

    let keys: Vec<_> = decoded.keys().map(|k| k.as_str()).collect();
    assert_eq!(keys, vec!["z", "a", "m"]);

    let nested_keys: Vec<_> = decoded
        .get_document("m")
        .unwrap()
        .keys()
        .map(|k| k.as_str())
        .collect();
    assert_eq!(nested_keys, vec!["q", "b"]);
}

#[test]
fn decode_rejects_non_canonical_array_key() {
    // an array element keyed "00" instead of "0"
    let buf = vec![
        23, 0, 0, 0, 4, 107, 101, 121, 0, 13, 0, 0, 0, 16, 48, 48, 0, 1, 0, 0, 0, 0, 0,
    ];
    assert_matches!(
        decode_document(&buf),
        Err(DecoderError::InvalidArrayKey { expected: 0, .. })
    );

    // a signed index key "+0"
    let buf = vec![
        23, 0, 0, 0, 4, 107, 101, 121, 0, 13, 0, 0, 0, 16, 43, 48, 0, 1, 0, 0, 0, 0, 0,
    ];
    assert_matches!(
        decode_document(&buf),
        Err(DecoderError::InvalidArrayKey { expected: 0, .. })
    );
}

#[test]
fn decode_rejects_too_deep_nesting() {
    let mut doc = doc! { "leaf" => 1 };
    for _ in 0..200 {
        doc = doc! { "n" => doc };
    }

    let buf = encode_document(&doc).unwrap();
    assert_matches!(
        decode_document(&buf),
        Err(DecoderError::TooDeeplyNested { max_depth: 100 })
    );

    // a shallow limit set explicitly
    let buf = encode_document(&doc! { "a" => { "b" => { "c" => 1 } } }).unwrap();
    let options = DecodeOptions {
        max_depth: 1,
        ..DecodeOptions::default()
    };
    assert_matches!(
        decode_document_with_options(&buf, &options),
        Err(DecoderError::TooDeeplyNested { max_depth: 1 })
    );
}

#[test]
fn decode_enforces_max_document_size() {
    let buf = encode_document(&doc! { "key" => "a longer string value" }).unwrap();
    let options = DecodeOptions {
        max_document_size: 16,
        ..DecodeOptions::default()
    };
    assert_matches!(
        decode_document_with_options(&buf, &options),
        Err(DecoderError::DocumentTooLarge { max_size: 16, .. })
    );

    // exactly at the limit still decodes
    let options = DecodeOptions {
        max_document_size: buf.len(),
        ..DecodeOptions::default()
    };
    decode_document_with_options(&buf, &options).unwrap();
}

#[test]
fn decode_ignores_trailing_bytes() {
    let mut buf = encode_document(&doc! { "key" => 1 }).unwrap();
    let expected = decode_document(&buf).unwrap();

    buf.extend_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);
    assert_eq!(decode_document(&buf).unwrap(), expected);
}

#[test]
fn decode_duplicate_key_last_wins() {
    // { "key": 1, "key": 2 } on the wire
    let buf = vec![
        23, 0, 0, 0, 16, 107, 101, 121, 0, 1, 0, 0, 0, 16, 107, 101, 121, 0, 2, 0, 0, 0, 0,
    ];
    let doc = decode_document(&buf).unwrap();
    assert_eq!(doc.len(), 1);
    assert_eq!(doc.get_i32("key"), Ok(2));
}

#[test]
fn encode_rejects_null_byte_in_key() {
    let mut doc = Document::new();
    doc.insert("a\0b", 1);
    assert_matches!(
        encode_document(&doc),
        Err(EncoderError::InvalidCString(_))
    );
}

#[test]
fn encode_rejects_null_byte_in_regex() {
    let doc = doc! {
        "key" => (Regex { pattern: "a\0b".to_owned(), options: String::new() })
    };
    assert_matches!(
        encode_document(&doc),
        Err(EncoderError::InvalidCString(_))
    );
}

#[test]
fn string_payload_may_contain_null_bytes() {
    // unlike keys, string payloads are length-prefixed and may carry nulls
    let doc = doc! { "key" => "a\0b" };
    let decoded = decode_document(&encode_document(&doc).unwrap()).unwrap();
    assert_eq!(decoded.get_str("key"), Ok("a\0b"));
}

use super::*;

#[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
struct Draft {
    title: String,
    pinned: bool,
}

// =============================================================
// JSON codec
// =============================================================

#[test]
fn json_codec_encodes_struct() {
    let codec = Codec::<Draft>::json();
    let raw = codec
        .encode(&Draft { title: "notes".into(), pinned: true })
        .unwrap();
    assert_eq!(raw, r#"{"title":"notes","pinned":true}"#);
}

#[test]
fn json_codec_decodes_struct() {
    let codec = Codec::<Draft>::default();
    let draft = codec.decode(r#"{"title":"a","pinned":false}"#).unwrap();
    assert_eq!(draft, Draft { title: "a".into(), pinned: false });
}

#[test]
fn json_codec_reports_malformed_text() {
    let codec = Codec::<Draft>::json();
    let err = codec.decode("{not json").unwrap_err();
    assert!(matches!(err, CodecError::Decode(_)));
}

#[test]
fn json_codec_reports_unencodable_value() {
    let codec = Codec::<f64>::json();
    // serde_json emits null for non-finite floats rather than failing.
    assert_eq!(codec.encode(&f64::NAN).unwrap(), "null");

    let codec = Codec::<std::collections::HashMap<(u8, u8), u8>>::json();
    let mut map = std::collections::HashMap::new();
    map.insert((1, 2), 3);
    assert!(matches!(codec.encode(&map), Err(CodecError::Encode(_))));
}

#[test]
fn json_codec_blank_encodings() {
    let codec = Codec::<String>::json();
    assert!(codec.is_blank(""));
    assert!(codec.is_blank("null"));
    assert!(codec.is_blank("\"\""));
    assert!(!codec.is_blank("0"));
    assert!(!codec.is_blank("false"));
    assert!(!codec.is_blank("\" \""));
}

// =============================================================
// Plain / custom codecs
// =============================================================

#[test]
fn plain_codec_stores_text_verbatim() {
    let codec = Codec::plain();
    assert_eq!(codec.encode(&"true".to_owned()).unwrap(), "true");
    assert_eq!(codec.decode("not json").unwrap(), "not json");
    assert!(codec.is_blank(""));
    assert!(!codec.is_blank("null"));
}

#[test]
fn custom_codec_uses_supplied_closures() {
    let codec = Codec::new(
        |n: &u32| Ok(format!("n={n}")),
        |raw: &str| {
            raw.strip_prefix("n=")
                .and_then(|n| n.parse().ok())
                .ok_or_else(|| CodecError::Decode(raw.to_owned()))
        },
    );
    assert_eq!(codec.encode(&7).unwrap(), "n=7");
    assert_eq!(codec.decode("n=9").unwrap(), 9);
    assert_eq!(codec.decode("9").unwrap_err(), CodecError::Decode("9".to_owned()));
}

#[test]
fn codec_clones_share_behavior() {
    let codec = Codec::<i32>::json();
    let copy = codec.clone();
    assert_eq!(copy.encode(&5).unwrap(), codec.encode(&5).unwrap());
}

//! Parser tests against an in-memory lookup

use envbind::{Decoder, EnvBind, Error, Kind, Parser};
use serde::Deserialize;
use std::any::Any;
use std::collections::HashMap;
use std::error::Error as _;

fn map_parser(vars: &[(&str, &str)]) -> Parser<impl Fn(&str) -> Option<String>> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Parser::new("env", move |name: &str| vars.get(name).cloned())
}

#[derive(Debug, Default, EnvBind)]
struct NoTags {
    pub var_a: String,
}

#[test]
fn test_no_tags() {
    let parser = map_parser(&[("VAR_A", "VAL_A")]);
    let mut config = NoTags {
        var_a: "untouched".to_string(),
    };
    parser.get(&mut config).unwrap();
    assert_eq!(config.var_a, "untouched");
}

#[derive(Debug, Default, EnvBind)]
struct MissingName {
    #[bind(env = "")]
    pub var_a: String,
}

#[test]
fn test_tag_missing_name() {
    let err = map_parser(&[]).get(&mut MissingName::default()).unwrap_err();
    assert!(matches!(err, Error::MissingNameTag { ref tag } if tag.is_empty()));
}

#[derive(Debug, Default, EnvBind)]
struct BadOption {
    #[bind(env = "VAR_A,not-a-valid-option")]
    pub var_a: String,
}

#[test]
fn test_bad_option() {
    let err = map_parser(&[("VAR_A", "VAL_A")])
        .get(&mut BadOption::default())
        .unwrap_err();
    match err {
        Error::InvalidTagOption { tag, option } => {
            assert_eq!(tag, "VAR_A,not-a-valid-option");
            assert_eq!(option, "not-a-valid-option");
        }
        other => panic!("Expected InvalidTagOption, got {other:?}"),
    }
}

#[derive(Debug, Default, EnvBind)]
struct Strings {
    #[bind(env = "VAR_A")]
    pub var_a: String,
    #[bind(env = "VAR_B,optional")]
    pub var_b: String,
}

#[test]
fn test_strings() {
    let parser = map_parser(&[("VAR_A", "VAL_A"), ("VAR_B", "VAL_B")]);
    let config: Strings = parser.load().unwrap();
    assert_eq!(config.var_a, "VAL_A");
    assert_eq!(config.var_b, "VAL_B");
}

#[test]
fn test_string_required_but_missing() {
    let err = map_parser(&[("VAR_B", "VAL_B")])
        .get(&mut Strings::default())
        .unwrap_err();
    assert!(matches!(err, Error::VarNotFound { ref key } if key == "VAR_A"));
}

#[test]
fn test_string_optional_and_missing_keeps_default() {
    let parser = map_parser(&[("VAR_A", "VAL_A")]);
    let mut config = Strings {
        var_a: String::new(),
        var_b: "default_b".to_string(),
    };
    parser.get(&mut config).unwrap();
    assert_eq!(config.var_a, "VAL_A");
    assert_eq!(config.var_b, "default_b");
}

#[derive(Debug, Default, EnvBind)]
struct Bytes {
    #[bind(env = "VAR_A")]
    pub plain: Vec<u8>,
    #[bind(env = "VAR_B,base64")]
    pub decoded: Vec<u8>,
    #[bind(env = "VAR_B,base64")]
    pub decoded_text: String,
}

#[test]
fn test_bytes_and_base64() {
    let parser = map_parser(&[("VAR_A", "VAL_A"), ("VAR_B", "VkFMX0E=")]);
    let config: Bytes = parser.load().unwrap();
    assert_eq!(config.plain, vec![0x56, 0x41, 0x4C, 0x5F, 0x41]);
    assert_eq!(config.decoded, vec![0x56, 0x41, 0x4C, 0x5F, 0x41]);
    assert_eq!(config.decoded_text, "VAL_A");
}

#[test]
fn test_base64_non_ascii_bytes() {
    let config: Bytes = map_parser(&[("VAR_A", ""), ("VAR_B", "AP+A")]).load().unwrap();
    assert_eq!(config.decoded, vec![0x00, 0xff, 0x80]);
    assert_eq!(config.decoded_text, "\0\u{fffd}\u{fffd}");
}

#[derive(Debug, Default, EnvBind)]
struct Base64Int {
    #[bind(env = "VAR_A,base64")]
    pub var_a: i64,
}

#[test]
fn test_base64_int() {
    let config: Base64Int = map_parser(&[("VAR_A", "MDkxNQ==")]).load().unwrap();
    assert_eq!(config.var_a, 915);
}

#[test]
fn test_base64_invalid() {
    let err = map_parser(&[("VAR_A", "i-am-not-base64")])
        .get(&mut Base64Int::default())
        .unwrap_err();
    assert!(err.source().is_some());
    match err {
        Error::DecodeFailure {
            key,
            value,
            decoder,
            ..
        } => {
            assert_eq!(key, "VAR_A");
            assert_eq!(value, "i-am-not-base64");
            assert_eq!(decoder, Decoder::Base64);
        }
        other => panic!("Expected DecodeFailure, got {other:?}"),
    }
}

#[derive(Debug, Default, EnvBind)]
struct Numbers {
    #[bind(env = "VAR_C")]
    pub var_c: i64,
    #[bind(env = "VAR_D")]
    pub var_d: usize,
    #[bind(env = "VAR_E")]
    pub var_e: i16,
    #[bind(env = "VAR_F")]
    pub var_f: f32,
    #[bind(env = "VAR_G")]
    pub var_g: bool,
}

#[test]
fn test_numbers_and_bool() {
    let parser = map_parser(&[
        ("VAR_C", "10"),
        ("VAR_D", "20"),
        ("VAR_E", "30"),
        ("VAR_F", "500.5"),
        ("VAR_G", "true"),
    ]);
    let config: Numbers = parser.load().unwrap();
    assert_eq!(config.var_c, 10);
    assert_eq!(config.var_d, 20);
    assert_eq!(config.var_e, 30);
    assert_eq!(config.var_f, 500.5);
    assert!(config.var_g);
}

#[derive(Debug, Default, EnvBind)]
struct Widths {
    #[bind(env = "VAR_A")]
    pub wide: i64,
    #[bind(env = "VAR_A")]
    pub narrow: i8,
}

#[test]
fn test_int_overflow_after_earlier_fields_populated() {
    let mut config = Widths::default();
    let err = map_parser(&[("VAR_A", "500")]).get(&mut config).unwrap_err();

    assert!(matches!(
        err,
        Error::Overflow { kind: Kind::I8, ref key, ref value } if key == "VAR_A" && value == "500"
    ));
    // No rollback
    assert_eq!(config.wide, 500);
    assert_eq!(config.narrow, 0);
}

#[test]
fn test_cannot_parse_env_exposes_cause() {
    let err = map_parser(&[
        ("VAR_C", "not-an-int"),
        ("VAR_D", "20"),
        ("VAR_E", "30"),
        ("VAR_F", "1"),
        ("VAR_G", "true"),
    ])
    .get(&mut Numbers::default())
    .unwrap_err();

    assert!(err.source().is_some());
    assert!(matches!(
        err,
        Error::CannotParseEnv { kind: Kind::I64, ref value, .. } if value == "not-an-int"
    ));
}

#[derive(Debug, Default, EnvBind)]
struct Indirections {
    #[bind(env = "VAR_A")]
    pub number: Option<i32>,
    #[bind(env = "VAR_B")]
    pub text: Option<String>,
    #[bind(env = "VAR_C,optional")]
    pub absent: Option<u8>,
}

#[test]
fn test_indirections() {
    let parser = map_parser(&[("VAR_A", "500"), ("VAR_B", "500")]);
    let mut config = Indirections {
        absent: Some(7),
        ..Indirections::default()
    };
    parser.get(&mut config).unwrap();
    assert_eq!(config.number, Some(500));
    assert_eq!(config.text.as_deref(), Some("500"));
    assert_eq!(config.absent, Some(7));
}

#[derive(EnvBind)]
struct AnyField {
    #[bind(env = "VAR_A")]
    pub var_a: Box<dyn Any>,
}

#[test]
fn test_cannot_set_kind_for_any() {
    let mut config = AnyField {
        var_a: Box::new(()),
    };
    let err = map_parser(&[("VAR_A", "false")]).get(&mut config).unwrap_err();
    assert!(matches!(err, Error::CannotSetKind { kind: Kind::Any }));
}

#[derive(Debug, Default, EnvBind)]
struct Plain {
    pub value: String,
}

#[derive(Debug, Default, EnvBind)]
struct RecordWithoutJson {
    #[bind(env = "PLAIN")]
    pub plain: Plain,
}

#[test]
fn test_cannot_set_kind_for_record() {
    let err = map_parser(&[("PLAIN", "text")])
        .get(&mut RecordWithoutJson::default())
        .unwrap_err();
    assert!(matches!(err, Error::CannotSetKind { kind: Kind::Struct }));
}

#[derive(Debug, Default, EnvBind)]
struct Inner {
    #[bind(env = "VAR_C")]
    pub var_c: i32,
    #[bind(env = "VAR_D")]
    pub var_d: u32,
}

#[derive(Debug, Default, EnvBind)]
struct Outer {
    #[bind(env = "VAR_A")]
    pub var_a: String,
    #[bind(nested)]
    pub nested: Inner,
    #[bind(nested)]
    pub boxed: Box<Inner>,
}

#[derive(Debug, Default, EnvBind)]
struct OuterIndirect {
    #[bind(nested)]
    pub nested: Option<Inner>,
}

#[test]
fn test_nested_struct() {
    let parser = map_parser(&[("VAR_A", "VAL_A"), ("VAR_C", "10"), ("VAR_D", "20")]);
    let config: Outer = parser.load().unwrap();
    assert_eq!(config.var_a, "VAL_A");
    assert_eq!(config.nested.var_c, 10);
    assert_eq!(config.nested.var_d, 20);
    assert_eq!(config.boxed.var_c, 10);
}

#[test]
fn test_nested_struct_indirection_is_allocated() {
    let parser = map_parser(&[("VAR_C", "10"), ("VAR_D", "20")]);
    let config: OuterIndirect = parser.load().unwrap();
    let nested = config.nested.unwrap();
    assert_eq!(nested.var_c, 10);
    assert_eq!(nested.var_d, 20);
}

#[test]
fn test_nested_struct_error() {
    let parser = map_parser(&[("VAR_A", "VAL_A"), ("VAR_C", "not-an-int"), ("VAR_D", "20")]);
    let err = parser.get(&mut Outer::default()).unwrap_err();
    assert!(matches!(err, Error::CannotParseEnv { ref key, .. } if key == "VAR_C"));
}

#[derive(Debug, Default, EnvBind)]
struct JsonArrays {
    #[bind(env = "ARRAY,json")]
    pub array: Vec<i32>,
    #[bind(env = "ARRAY,json")]
    pub boxed: Vec<Box<i32>>,
}

#[test]
fn test_array_as_json() {
    let config: JsonArrays = map_parser(&[("ARRAY", "[9,1,5]")]).load().unwrap();
    assert_eq!(config.array, vec![9, 1, 5]);
    assert_eq!(config.boxed, vec![Box::new(9), Box::new(1), Box::new(5)]);
}

#[derive(Debug, Default, PartialEq, Deserialize)]
struct JsonNested {
    #[serde(rename = "varc")]
    pub var_c: i32,
    #[serde(rename = "vard")]
    pub var_d: String,
}

#[derive(Debug, Default, EnvBind)]
struct JsonStructs {
    #[bind(env = "NESTED,json")]
    pub nested: JsonNested,
    #[bind(env = "NESTED,json")]
    pub indirect: Option<JsonNested>,
}

#[test]
fn test_nested_struct_as_json() {
    let parser = map_parser(&[("NESTED", r#"{"varc": 10, "vard": "val_d"}"#)]);
    let config: JsonStructs = parser.load().unwrap();

    let expected = JsonNested {
        var_c: 10,
        var_d: "val_d".to_string(),
    };
    assert_eq!(config.indirect.as_ref(), Some(&expected));
    assert_eq!(config.nested, expected);
}

#[test]
fn test_nested_struct_as_invalid_json() {
    let err = map_parser(&[("NESTED", "i-am-not-json")])
        .get(&mut JsonStructs::default())
        .unwrap_err();
    assert!(err.source().is_some());
    assert!(matches!(
        err,
        Error::DecodeFailure { decoder: Decoder::Json, ref key, ref value, .. }
            if key == "NESTED" && value == "i-am-not-json"
    ));
}

#[derive(Debug, Default, EnvBind)]
struct Base64Json {
    #[bind(env = "B64_JSON,base64,json")]
    pub first: Vec<String>,
    #[bind(env = "B64_JSON,json,base64")]
    pub second: Vec<String>,
}

#[test]
fn test_base64_runs_before_json_regardless_of_order() {
    // ["a","b"]
    let config: Base64Json = map_parser(&[("B64_JSON", "WyJhIiwiYiJd")]).load().unwrap();
    assert_eq!(config.first, vec!["a", "b"]);
    assert_eq!(config.second, vec!["a", "b"]);
}

#[derive(Debug, Default, Deserialize, EnvBind)]
#[serde(default)]
struct TaggedInner {
    #[bind(env = "VAR_C")]
    #[serde(rename = "varc")]
    pub var_c: i32,
}

#[derive(Debug, Default, EnvBind)]
struct NestedConflict {
    #[bind(env = "NESTED,json", nested)]
    pub nested: TaggedInner,
}

#[test]
fn test_nested_struct_with_config_tags() {
    let err = map_parser(&[("NESTED", "{}")])
        .get(&mut NestedConflict::default())
        .unwrap_err();
    assert!(matches!(
        err,
        Error::NestedTags { ref field, ref key } if field == "nested" && key == "NESTED"
    ));
}

#[derive(Debug, Default, EnvBind)]
struct UnmarkedConflict {
    #[bind(env = "NESTED,json")]
    pub nested: TaggedInner,
}

#[test]
fn test_json_record_checked_without_nested_marker() {
    let err = map_parser(&[("NESTED", "{}")])
        .get(&mut UnmarkedConflict::default())
        .unwrap_err();
    assert!(matches!(
        err,
        Error::NestedTags { ref field, ref key } if field == "nested" && key == "NESTED"
    ));
}

#[test]
fn test_nested_tags_checked_after_resolution() {
    let err = map_parser(&[])
        .get(&mut NestedConflict::default())
        .unwrap_err();
    assert!(matches!(err, Error::VarNotFound { ref key } if key == "NESTED"));

    let err = map_parser(&[("NESTED", "i-am-not-json")])
        .get(&mut NestedConflict::default())
        .unwrap_err();
    assert!(matches!(err, Error::DecodeFailure { decoder: Decoder::Json, .. }));
}

#[derive(Debug, Default, EnvBind)]
struct NestedWithoutJson {
    #[bind(env = "NESTED", nested)]
    pub nested: TaggedInner,
}

#[test]
fn test_tagged_nested_without_json_cannot_be_set() {
    let err = map_parser(&[("NESTED", "{}"), ("VAR_C", "1")])
        .get(&mut NestedWithoutJson::default())
        .unwrap_err();
    assert!(matches!(err, Error::CannotSetKind { kind: Kind::Struct }));
}

#[derive(Debug, Default, Deserialize, EnvBind)]
struct UntaggedInner {
    #[serde(rename = "varc")]
    pub var_c: i32,
}

#[derive(Debug, Default, EnvBind)]
struct TaggedNested {
    #[bind(env = "NESTED,json", nested)]
    pub nested: Option<UntaggedInner>,
}

#[test]
fn test_tagged_nested_without_inner_tags() {
    let config: TaggedNested = map_parser(&[("NESTED", r#"{"varc": 3}"#)]).load().unwrap();
    assert_eq!(config.nested.unwrap().var_c, 3);
}

#[derive(Debug, Default, EnvBind)]
struct MultiKey {
    #[bind(env = "VAR_A", envtag = "OTHER_A,optional")]
    pub var_a: u16,
    #[bind(envtag = "OTHER_B")]
    pub var_b: String,
}

#[test]
fn test_custom_annotation_key() {
    let vars = HashMap::from([("OTHER_B", "b")]);
    let parser = Parser::new("envtag", |name: &str| vars.get(name).map(|v| v.to_string()));
    let mut config = MultiKey {
        var_a: 8,
        ..MultiKey::default()
    };
    parser.get(&mut config).unwrap();
    assert_eq!(config.var_a, 8);
    assert_eq!(config.var_b, "b");
}

#[test]
fn test_default_key_ignores_other_annotations() {
    let config: MultiKey = map_parser(&[("VAR_A", "1")]).load().unwrap();
    assert_eq!(config.var_a, 1);
    assert_eq!(config.var_b, "");
}

#[derive(Debug, Default, EnvBind)]
struct Generic<T: Default> {
    #[bind(env = "VAR_A")]
    pub var_a: u8,
    pub extra: T,
}

#[test]
fn test_generic_record() {
    let config: Generic<Vec<u64>> = map_parser(&[("VAR_A", "1")]).load().unwrap();
    assert_eq!(config.var_a, 1);
    assert!(config.extra.is_empty());
}

#[test]
fn test_invalid_config_type() {
    let mut value = String::new();
    let err = map_parser(&[]).get(&mut value).unwrap_err();
    assert!(matches!(err, Error::InvalidConfigType { ref type_name } if type_name.contains("String")));
}

//! Fuzzing harnesses for `nodepatch-core`.
//!
//! Each public function accepts raw bytes so it can be driven from
//! `cargo fuzz` targets as well as from plain unit tests. Decoding failures
//! are swallowed; broken builder invariants panic.
//!
//! # Examples
//!
//! ```
//! nodepatch_fuzz::fuzz_classification(b"{\"name\":\"node-1\"}");
//! nodepatch_fuzz::fuzz_build(&[1, 2, 3, 4]);
//! nodepatch_fuzz::fuzz_render(b"render");
//! ```
#![forbid(unsafe_code)]
#![warn(missing_docs)]

use arbitrary::Unstructured;
use nodepatch_core::{
    build_patch, PatchFormat, PatchOp, PatchOptions, PointerStyle, RenderConfig, Status, Value,
};
use serde_json::{Map as JsonMap, Number as JsonNumber, Value as JsonValue};

const MAX_DEPTH: usize = 4;
const MAX_ARRAY_LEN: u8 = 6;
const MAX_OBJECT_LEN: u8 = 6;
const MAX_STRING_LEN: u8 = 12;

/// Feeds arbitrary bytes through the JSON and YAML classifiers.
///
/// ```
/// nodepatch_fuzz::fuzz_classification(b"driver: ipmi\n");
/// ```
pub fn fuzz_classification(data: &[u8]) {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let dated = PatchOptions::default().with_date_detection(true);
    for options in [PatchOptions::default(), dated] {
        if let Ok(value) = Value::from_json_str_with(text, &options) {
            let _ = value.to_json_value();
        }
        if let Ok(value) = Value::from_yaml_str_with(text, &options) {
            let _ = value.to_json_value();
        }
    }
}

/// Builds patches between randomly generated documents and checks the
/// builder invariants that hold for any input.
///
/// ```
/// nodepatch_fuzz::fuzz_build(b"seed");
/// ```
pub fn fuzz_build(data: &[u8]) {
    let mut unstructured = Unstructured::new(data);
    let (Some(source), Some(target)) =
        (random_value(&mut unstructured), random_value(&mut unstructured))
    else {
        return;
    };
    let escaped = unstructured.arbitrary::<bool>().unwrap_or(false);
    let style = if escaped { PointerStyle::Escaped } else { PointerStyle::Raw };
    let Ok(options) = PatchOptions::default().with_base_path("/node") else {
        return;
    };
    let options = options.with_pointer_style(style);

    let identity = build_patch(&source, &source, &options);
    assert!(identity.is_empty(), "self diff produced {:?}", identity.operations);

    let result = build_patch(&source, &target, &options);
    for operation in &result {
        assert!(
            operation.path == "/node" || operation.path.starts_with("/node/"),
            "unexpected path {}",
            operation.path
        );
        assert!(operation.value.is_scalar(), "non-leaf value at {}", operation.path);
    }

    if let Value::Collection(_) = source {
        let empty = Value::from(JsonValue::Object(JsonMap::new()));
        let cleared = build_patch(&source, &empty, &options);
        assert!(cleared.iter().all(|operation| operation.op == PatchOp::Remove));
        assert_ne!(cleared.status, Status::Error);
    }
}

/// Renders patches between randomly generated documents in every format.
///
/// ```
/// nodepatch_fuzz::fuzz_render(b"render fuzz");
/// ```
pub fn fuzz_render(data: &[u8]) {
    let mut unstructured = Unstructured::new(data);
    let (Some(source), Some(target)) =
        (random_value(&mut unstructured), random_value(&mut unstructured))
    else {
        return;
    };
    let result = build_patch(&source, &target, &PatchOptions::default());

    let text = result.render(&RenderConfig::default());
    let status_lines = usize::from(!result.status.is_ok());
    assert_eq!(text.lines().count(), result.len() + status_lines);

    for format in [PatchFormat::Debug, PatchFormat::Strict] {
        let Ok(rendered) = result.render_patch(format) else {
            continue;
        };
        let parsed: JsonValue = match serde_json::from_str(&rendered) {
            Ok(parsed) => parsed,
            Err(err) => panic!("rendered patch is not JSON: {err}"),
        };
        assert_eq!(parsed.as_array().map(Vec::len), Some(result.len()));
    }
}

fn random_value(unstructured: &mut Unstructured<'_>) -> Option<Value> {
    json_value_from_unstructured(unstructured, 0).ok().map(Value::from)
}

fn json_value_from_unstructured(
    unstructured: &mut Unstructured<'_>,
    depth: usize,
) -> Result<JsonValue, arbitrary::Error> {
    if depth >= MAX_DEPTH {
        return json_leaf(unstructured);
    }

    let choice = unstructured.int_in_range::<u8>(0..=5)?;
    match choice {
        0 => Ok(JsonValue::Null),
        1 => Ok(JsonValue::Bool(unstructured.arbitrary()?)),
        2 => Ok(JsonValue::Number(random_number(unstructured)?)),
        3 => Ok(JsonValue::String(random_string(unstructured)?)),
        4 => {
            let len = usize::from(unstructured.int_in_range::<u8>(0..=MAX_ARRAY_LEN)?);
            let mut items = Vec::with_capacity(len);
            for _ in 0..len {
                items.push(json_value_from_unstructured(unstructured, depth + 1)?);
            }
            Ok(JsonValue::Array(items))
        }
        _ => {
            let len = usize::from(unstructured.int_in_range::<u8>(0..=MAX_OBJECT_LEN)?);
            let mut map = JsonMap::new();
            for _ in 0..len {
                let key = random_string(unstructured)?;
                let value = json_value_from_unstructured(unstructured, depth + 1)?;
                map.insert(key, value);
            }
            Ok(JsonValue::Object(map))
        }
    }
}

fn json_leaf(unstructured: &mut Unstructured<'_>) -> Result<JsonValue, arbitrary::Error> {
    let choice = unstructured.int_in_range::<u8>(0..=3)?;
    match choice {
        0 => Ok(JsonValue::Null),
        1 => Ok(JsonValue::Bool(unstructured.arbitrary()?)),
        2 => Ok(JsonValue::Number(random_number(unstructured)?)),
        _ => Ok(JsonValue::String(random_string(unstructured)?)),
    }
}

fn random_number(unstructured: &mut Unstructured<'_>) -> Result<JsonNumber, arbitrary::Error> {
    if unstructured.arbitrary()? {
        // Node properties are doubles; keep integers exactly representable.
        let int = unstructured.arbitrary::<i32>()?;
        Ok(JsonNumber::from(int))
    } else {
        let numerator = f64::from(unstructured.arbitrary::<i32>()?);
        let denominator = f64::from(unstructured.int_in_range::<u16>(1..=1024)?);
        JsonNumber::from_f64(numerator / denominator).ok_or(arbitrary::Error::IncorrectFormat)
    }
}

fn random_string(unstructured: &mut Unstructured<'_>) -> Result<String, arbitrary::Error> {
    let len = usize::from(unstructured.int_in_range::<u8>(0..=MAX_STRING_LEN)?);
    let mut string = String::with_capacity(len);
    for _ in 0..len {
        let byte = unstructured.int_in_range::<u8>(0x20..=0x7e)?;
        string.push(char::from(byte));
    }
    Ok(string)
}

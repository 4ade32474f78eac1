use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

/**
    Serializes the given value as pretty-printed JSON,
    using the given number of spaces for each indentation level.
*/
pub fn to_string_pretty_indented<T: Serialize + ?Sized>(
    value: &T,
    indent: usize,
) -> serde_json::Result<String> {
    let indent = " ".repeat(indent);
    let mut out = Vec::new();
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut ser = Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut ser)?;
    // NOTE: serde_json only ever emits valid UTF-8
    Ok(String::from_utf8_lossy(&out).into_owned())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn indent_width() {
        let value = json!({ "version": "v1.0.0", "nested": { "a": 1 } });
        let two = to_string_pretty_indented(&value, 2).unwrap();
        let four = to_string_pretty_indented(&value, 4).unwrap();
        assert_eq!(two, serde_json::to_string_pretty(&value).unwrap());
        assert!(four.contains("\n    \"version\": \"v1.0.0\""));
        assert!(four.contains("\n        \"a\": 1"));
    }
}

//! Shape documents and the defaulting rules applied to them.

use crate::error::DecoratorError;
use serde_json::{Map, Value};

/// A JSON object as received from the caller.
pub type Document = Map<String, Value>;

/// Key holding the shape's name.
pub const NAME_KEY: &str = "Name";
/// Key holding the shape's color.
pub const COLOR_KEY: &str = "Color";
/// Value used when no name is given.
pub const DEFAULT_NAME: &str = "Nameless";
/// Value used when no color is given.
pub const DEFAULT_COLOR: &str = "Transparent";

/// Parse a request body into a document.
///
/// Fails with [`DecoratorError::Parse`] on malformed JSON and with
/// [`DecoratorError::NotAnObject`] when the top-level value is anything
/// other than an object.
pub fn parse_document(body: &[u8]) -> Result<Document, DecoratorError> {
    match serde_json::from_slice::<Value>(body)? {
        Value::Object(map) => Ok(map),
        other => Err(DecoratorError::NotAnObject(kind_of(&other))),
    }
}

/// Fill in `Name` and `Color` when they are missing or null.
///
/// Any other value, including `""`, `0` and `false`, is kept as given.
pub fn apply_defaults(mut doc: Document) -> Document {
    set_if_missing(&mut doc, NAME_KEY, DEFAULT_NAME);
    set_if_missing(&mut doc, COLOR_KEY, DEFAULT_COLOR);
    doc
}

/// Serialize a normalized document for the downstream request.
pub fn to_body(doc: &Document) -> Result<Vec<u8>, DecoratorError> {
    Ok(serde_json::to_vec(doc)?)
}

fn set_if_missing(doc: &mut Document, key: &str, default: &str) {
    let missing = matches!(doc.get(key), None | Some(Value::Null));
    if missing {
        doc.insert(key.to_string(), Value::String(default.to_string()));
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

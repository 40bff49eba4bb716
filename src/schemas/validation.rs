use crate::{error::GenerationError, schemas::SchemaHandle};
use jsonschema::{Draft, JSONSchema};
use serde_json::{json, Map, Value};

const MAX_SCHEMA_ERRORS: usize = 3;

/// Keywords carried over into the provider schema; everything else is dropped.
const PROVIDER_KEYWORDS: &[&str] = &["description", "enum", "required", "nullable"];

/// Validate a structured payload against a schema
pub(crate) fn validate_structured_payload(
    schema: &SchemaHandle,
    payload: &Value,
) -> Result<(), GenerationError> {
    let validator = JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(schema.schema_json())
        .map_err(|err| {
            GenerationError::InvalidResponse(format!(
                "Failed to prepare `{}` schema for validation: {}",
                schema.schema_name(),
                err
            ))
        })?;

    if let Err(errors) = validator.validate(payload) {
        let mut details = Vec::new();
        let mut truncated = false;

        for (idx, error) in errors.enumerate() {
            if idx < MAX_SCHEMA_ERRORS {
                let mut path = error.instance_path.to_string();
                if path.is_empty() {
                    path = "<root>".to_string();
                }
                details.push(format!("{}: {}", path, error));
            } else {
                truncated = true;
                break;
            }
        }

        let mut detail_str = if details.is_empty() {
            "structured payload failed schema validation".to_string()
        } else {
            details.join("; ")
        };

        if truncated {
            detail_str.push_str("; additional errors truncated");
        }

        return Err(GenerationError::InvalidResponse(format!(
            "Structured payload does not match `{}` schema: {}",
            schema.schema_name(),
            detail_str
        )));
    }

    Ok(())
}

/// Convert a `schemars` draft-07 schema into Gemini's `responseSchema` dialect.
///
/// Gemini takes an OpenAPI 3.0 subset: no `$ref`, upper-case type names and
/// `nullable` instead of `["T", "null"]` type unions.
pub fn provider_schema(schema: &Value) -> Value {
    let definitions = schema.get("definitions").and_then(Value::as_object);
    convert_node(schema, definitions)
}

fn convert_node(node: &Value, definitions: Option<&Map<String, Value>>) -> Value {
    let Some(object) = node.as_object() else {
        return json!({ "type": "STRING" });
    };

    if let Some(target) = resolve_reference(object, definitions) {
        let mut resolved = convert_node(target, definitions);
        if let (Some(description), Some(resolved_object)) =
            (object.get("description"), resolved.as_object_mut())
        {
            resolved_object.insert("description".to_string(), description.clone());
        }
        return resolved;
    }

    let mut converted = Map::new();

    match object.get("type") {
        Some(Value::String(kind)) => {
            converted.insert("type".to_string(), json!(kind.to_uppercase()));
        }
        Some(Value::Array(kinds)) => {
            let mut nullable = false;
            for kind in kinds.iter().filter_map(Value::as_str) {
                if kind == "null" {
                    nullable = true;
                } else {
                    converted.insert("type".to_string(), json!(kind.to_uppercase()));
                }
            }
            if nullable {
                converted.insert("nullable".to_string(), json!(true));
            }
        }
        _ => {}
    }

    for keyword in PROVIDER_KEYWORDS {
        if let Some(value) = object.get(*keyword) {
            converted.insert((*keyword).to_string(), value.clone());
        }
    }

    if let Some(properties) = object.get("properties").and_then(Value::as_object) {
        let properties: Map<String, Value> = properties
            .iter()
            .map(|(name, property)| (name.clone(), convert_node(property, definitions)))
            .collect();
        converted.insert("properties".to_string(), Value::Object(properties));
    }

    if let Some(items) = object.get("items") {
        converted.insert("items".to_string(), convert_node(items, definitions));
    }

    Value::Object(converted)
}

/// Follow `$ref` directly or through schemars' single-entry `allOf` wrapper.
fn resolve_reference<'a>(
    object: &'a Map<String, Value>,
    definitions: Option<&'a Map<String, Value>>,
) -> Option<&'a Value> {
    let reference = object.get("$ref").and_then(Value::as_str).or_else(|| {
        match object.get("allOf").and_then(Value::as_array).map(Vec::as_slice) {
            Some([single]) => single.get("$ref").and_then(Value::as_str),
            _ => None,
        }
    })?;

    let name = reference.rsplit('/').next()?;
    definitions?.get(name)
}

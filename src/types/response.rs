use serde_json::Value;

use crate::{
    error::GenerationError,
    schemas::{validation::validate_structured_payload, CompletionSchema},
};

/// Parse provider text into `T`, failing on anything the schema does not accept.
pub fn parse_structured_response<T>(raw: &str) -> Result<T, GenerationError>
where
    T: CompletionSchema,
{
    let schema = T::schema();
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(GenerationError::InvalidResponse(format!(
            "empty `{}` payload",
            schema.schema_name()
        )));
    }

    let payload: Value = serde_json::from_str(trimmed).map_err(|err| {
        GenerationError::InvalidResponse(format!(
            "`{}` payload is not valid JSON: {}",
            schema.schema_name(),
            err
        ))
    })?;

    validate_structured_payload(schema, &payload)?;
    deserialize_structured_response(&payload, schema.schema_name())
}

pub fn deserialize_structured_response<T>(
    payload: &Value,
    schema_name: &str,
) -> Result<T, GenerationError>
where
    T: CompletionSchema,
{
    serde_path_to_error::deserialize(payload).map_err(|err| {
        let path = err.path().to_string();
        let location = if path.is_empty() || path == "." {
            "<root>".to_string()
        } else {
            path
        };
        GenerationError::InvalidResponse(format!(
            "failed to deserialize `{}` at {}: {}",
            schema_name,
            location,
            err.inner()
        ))
    })
}

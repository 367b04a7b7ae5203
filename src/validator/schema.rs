use super::{ValidationError, Validator};
use serde_json::Value;

/// Validates JSON payloads against a schema compiled once at construction.
pub struct JsonSchemaValidator {
    schema: Value,
    compiled: ::jsonschema::Validator,
}

impl JsonSchemaValidator {
    /// Compile a schema document.
    pub fn new(schema: Value) -> Result<Self, ValidationError> {
        let compiled = ::jsonschema::Validator::new(&schema)
            .map_err(|e| ValidationError::new(format!("invalid JSON schema: {}", e)))?;
        Ok(Self { schema, compiled })
    }

    /// The schema document this validator was built from.
    pub fn schema(&self) -> &Value {
        &self.schema
    }
}

impl std::fmt::Debug for JsonSchemaValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonSchemaValidator")
            .field("schema", &self.schema)
            .finish()
    }
}

impl Validator<Value> for JsonSchemaValidator {
    fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        self.compiled
            .validate(value)
            .map_err(|e| ValidationError::new(e.to_string()))
    }
}

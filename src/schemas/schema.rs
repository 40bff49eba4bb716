use schemars::schema::RootSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

use super::validation::provider_schema;

/// Cached JSON schema handle associated with a response type.
#[derive(Clone, Debug)]
pub struct SchemaHandle {
    schema_name: &'static str,
    type_name: &'static str,
    schema_json: Arc<Value>,
    provider_json: Arc<Value>,
}

impl SchemaHandle {
    pub fn from_root_schema(
        schema_name: &'static str,
        type_name: &'static str,
        root: RootSchema,
    ) -> Self {
        let schema_json = serde_json::to_value(root)
            .unwrap_or_else(|err| panic!("failed to serialize schema for {}: {}", type_name, err));
        let provider_json = provider_schema(&schema_json);

        Self {
            schema_name,
            type_name,
            schema_json: Arc::new(schema_json),
            provider_json: Arc::new(provider_json),
        }
    }

    pub fn schema_name(&self) -> &'static str {
        self.schema_name
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Draft-07 JSON schema as produced by `schemars`.
    pub fn schema_json(&self) -> &Value {
        self.schema_json.as_ref()
    }

    /// The same schema in the OpenAPI subset Gemini accepts as `responseSchema`.
    pub fn provider_json(&self) -> &Value {
        self.provider_json.as_ref()
    }
}

/// A type the text-generation provider can be asked to produce.
pub trait CompletionSchema: DeserializeOwned + Send + Sync + 'static {
    fn schema() -> &'static SchemaHandle;
}

/// Implement [`CompletionSchema`] for a `JsonSchema` type, caching the handle.
#[macro_export]
macro_rules! completion_schema {
    ($ty:ty, $name:literal) => {
        impl $crate::schemas::CompletionSchema for $ty {
            fn schema() -> &'static $crate::schemas::SchemaHandle {
                static HANDLE: ::std::sync::OnceLock<$crate::schemas::SchemaHandle> =
                    ::std::sync::OnceLock::new();
                HANDLE.get_or_init(|| {
                    $crate::schemas::SchemaHandle::from_root_schema(
                        $name,
                        ::std::any::type_name::<$ty>(),
                        ::schemars::schema_for!($ty),
                    )
                })
            }
        }
    };
}

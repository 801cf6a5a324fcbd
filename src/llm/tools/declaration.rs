//! Tool declaration helpers using JSON Schema generation

use schemars::gen::SchemaSettings;
use schemars::JsonSchema;

use crate::llm::core::types::ToolDeclaration;

/// Create a tool declaration from a type that implements JsonSchema
///
/// Doc comments on the argument struct's fields become the parameter
/// descriptions the model sees. `Option` fields are optional parameters and
/// are typed as plain `"string"` (no `null`), which is the shape
/// function-calling APIs expect. The meta-schema URL and title are dropped.
///
/// # Example
///
/// ```ignore
/// use schemars::JsonSchema;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, JsonSchema)]
/// struct LookupArgs {
///     /// The user ID to look up
///     user_id: String,
/// }
///
/// let decl = create_tool_declaration::<LookupArgs>(
///     "get_identity_info",
///     "Get detailed identity information"
/// );
/// ```
pub fn create_tool_declaration<T: JsonSchema>(
    name: impl Into<String>,
    description: impl Into<String>,
) -> ToolDeclaration {
    let generator = SchemaSettings::draft07()
        .with(|settings| {
            settings.option_add_null_type = false;
            settings.option_nullable = false;
            settings.meta_schema = None;
        })
        .into_generator();
    let schema = generator.into_root_schema_for::<T>();

    let mut parameters = serde_json::to_value(&schema)
        .expect("Failed to serialize schema - this is a bug in schemars or the JsonSchema impl");
    if let Some(object) = parameters.as_object_mut() {
        object.remove("title");
    }

    ToolDeclaration {
        name: name.into(),
        description: description.into(),
        parameters,
    }
}

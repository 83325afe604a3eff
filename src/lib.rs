pub mod ast;
pub mod config;
pub mod export;
pub mod inflect;
pub mod lexer;
pub mod options;
pub mod parser;
pub mod render;
pub mod types;
pub mod value;

use wasm_bindgen::prelude::*;

pub use ast::{
    FieldDefinition, ForeignKeyDefinition, IndexDefinition, Keyword, SchemaDocument,
    TableDefinition, Value, ValueKind,
};
pub use config::{ArrayFilter, ParserOptions};
pub use export::{ExportError, Format, export};
pub use inflect::{English, Inflector};
pub use parser::{Diagnostic, ParsedSchema, SchemaParser, parse_schema};

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

/// Parse schema.rb source and export it as JSON (default) or text
#[wasm_bindgen(js_name = "schemaToJson")]
pub fn schema_to_json(source: &str, format: Option<String>) -> Result<String, String> {
    let format = format
        .as_deref()
        .and_then(Format::from_str)
        .unwrap_or_default();

    let parsed = parse_schema(source);
    export(&parsed.schema, format).map_err(|e| e.to_string())
}

/// Diagnostics produced while parsing schema.rb source, one message each
#[wasm_bindgen(js_name = "schemaDiagnostics")]
pub fn schema_diagnostics(source: &str) -> js_sys::Array {
    parse_schema(source)
        .diagnostics
        .iter()
        .map(|d| JsValue::from_str(&d.to_string()))
        .collect()
}

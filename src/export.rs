//! Output formats for a parsed schema.

use crate::ast::SchemaDocument;
use crate::render::TextRenderer;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Pretty-printed JSON of the whole document
    #[default]
    Json,
    /// Aligned plain-text tables
    Text,
}

impl Format {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" | "raw" => Some(Self::Json),
            "text" | "schema" => Some(Self::Text),
            _ => None,
        }
    }
}

pub fn export(schema: &SchemaDocument, format: Format) -> Result<String, ExportError> {
    match format {
        Format::Json => Ok(serde_json::to_string_pretty(schema)?),
        Format::Text => Ok(TextRenderer::default().render(schema)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_schema;
    use serde_json::json;

    #[test]
    fn test_format_from_str() {
        assert_eq!(Format::from_str("JSON"), Some(Format::Json));
        assert_eq!(Format::from_str("schema"), Some(Format::Text));
        assert_eq!(Format::from_str("svg"), None);
    }

    #[test]
    fn test_json_shape() {
        let parsed = parse_schema(
            "create_table \"users\", force: :cascade do |t|\n  t.string \"email\", limit: 100, null: false, default: nil\nend\n\
             create_table \"posts\" do |t|\n  t.integer \"user_id\"\nend\n\
             add_foreign_key \"posts\", \"users\", on_delete: :cascade\n",
        );
        let out = export(&parsed.schema, Format::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(value["users"]["force"], json!("cascade"));
        assert_eq!(
            value["users"]["fields"][1],
            json!({
                "name": "email",
                "type": "string",
                "nullable": false,
                "default": null,
                "limit": "100"
            })
        );
        assert_eq!(
            value["users"]["indexes"][0],
            json!({"columns": ["id"], "unique": true, "name": "PRIMARY_KEY"})
        );
        assert_eq!(
            value["posts"]["foreignKeys"],
            json!([{
                "toTable": "users",
                "column": "user_id",
                "toColumn": "id",
                "on_delete": "cascade"
            }])
        );
    }

    #[test]
    fn test_json_preserves_table_order() {
        let parsed = parse_schema(
            "create_table \"zebras\" do |t|\nend\ncreate_table \"apples\" do |t|\nend\n",
        );
        let out = export(&parsed.schema, Format::Json).unwrap();
        assert!(out.find("zebras").unwrap() < out.find("apples").unwrap());
    }
}

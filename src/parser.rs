//! Structural extraction: schema.rb text to `SchemaDocument`.

use crate::ast::{
    FieldDefinition, ForeignKeyDefinition, IndexDefinition, Keyword, Options, SchemaDocument,
    TableDefinition, Value,
};
use crate::config::ParserOptions;
use crate::inflect::{English, Inflector};
use crate::lexer;
use crate::options::{parse_array, parse_hash};
use thiserror::Error;

/// Non-fatal problems found while resolving cross references.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    #[error("destination table `{to_table}` not found for foreign key on `{from_table}`")]
    MissingDestinationTable { from_table: String, to_table: String },
    #[error("source table `{from_table}` not found for foreign key to `{to_table}`")]
    MissingSourceTable { from_table: String, to_table: String },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedSchema {
    pub schema: SchemaDocument,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse with default options and the built-in English inflector.
pub fn parse_schema(text: &str) -> ParsedSchema {
    SchemaParser::new().parse(text)
}

/// Holds configuration only; every `parse` call scans with fresh cursors.
#[derive(Debug, Clone)]
pub struct SchemaParser<I = English> {
    options: ParserOptions,
    inflector: I,
}

impl SchemaParser<English> {
    pub fn new() -> Self {
        Self {
            options: ParserOptions::default(),
            inflector: English,
        }
    }
}

impl Default for SchemaParser<English> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Inflector> SchemaParser<I> {
    pub fn with_inflector<J: Inflector>(self, inflector: J) -> SchemaParser<J> {
        SchemaParser {
            options: self.options,
            inflector,
        }
    }

    pub fn with_options(mut self, options: ParserOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    pub fn parse(&self, text: &str) -> ParsedSchema {
        let mut schema = SchemaDocument::default();

        for block in lexer::table_blocks(text) {
            let table = self.parse_table(block.body, block.options);
            // last definition wins, first-seen position is kept
            if schema.tables.insert(block.name.to_string(), table).is_some() {
                tracing::debug!(table = block.name, "table redefined");
            }
        }

        let mut diagnostics = Vec::new();
        for fk in self.parse_foreign_keys(text) {
            let problem = if !schema.tables.contains_key(&fk.from_table) {
                Some(Diagnostic::MissingSourceTable {
                    from_table: fk.from_table.clone(),
                    to_table: fk.to_table.clone(),
                })
            } else if !schema.tables.contains_key(&fk.to_table) {
                Some(Diagnostic::MissingDestinationTable {
                    from_table: fk.from_table.clone(),
                    to_table: fk.to_table.clone(),
                })
            } else {
                None
            };

            match problem {
                Some(diagnostic) => {
                    tracing::warn!("{}", diagnostic);
                    diagnostics.push(diagnostic);
                }
                None => {
                    if let Some(table) = schema.tables.get_mut(&fk.from_table) {
                        table.foreign_keys.push(fk);
                    }
                }
            }
        }

        ParsedSchema {
            schema,
            diagnostics,
        }
    }

    /// Build one table from its block body and the option text after its name.
    pub fn parse_table(&self, body: &str, options_text: &str) -> TableDefinition {
        let mut fields = self.parse_fields(body);
        let mut indexes = self.parse_indexes(body);

        let mut options = parse_hash(options_text, &self.options);
        let id = options.shift_remove("id");
        let primary_key = options.shift_remove("primary_key");

        match primary_key.as_ref().and_then(primary_key_columns) {
            Some(columns) => indexes.insert(0, IndexDefinition::primary_key(columns)),
            None => {
                let id = id.unwrap_or(Value::Keyword(Keyword::True));
                if id.is_truthy() {
                    fields.insert(0, synthesized_id(&id));
                    indexes.insert(0, IndexDefinition::primary_key(vec!["id".to_string()]));
                }
            }
        }

        TableDefinition {
            options,
            fields,
            indexes,
            foreign_keys: Vec::new(),
        }
    }

    /// `t.column` declarations first, then `t.<type>` shorthand, each in
    /// source order.
    pub fn parse_fields(&self, body: &str) -> Vec<FieldDefinition> {
        lexer::generic_columns(body)
            .into_iter()
            .chain(lexer::typed_columns(body))
            .map(|decl| {
                let options = parse_hash(decl.options, &self.options);
                FieldDefinition::from_options(decl.name, decl.typ, options)
            })
            .collect()
    }

    pub fn parse_indexes(&self, body: &str) -> Vec<IndexDefinition> {
        lexer::indexes(body)
            .into_iter()
            .filter_map(|decl| {
                let columns: Vec<String> = parse_array(decl.columns, &self.options)
                    .iter()
                    .filter_map(Value::as_text)
                    .map(str::to_string)
                    .collect();
                if columns.is_empty() {
                    return None;
                }

                let mut options = parse_hash(decl.options, &self.options);
                let unique = options
                    .shift_remove("unique")
                    .is_some_and(|v| v.is_truthy());
                let name = options.shift_remove("name").map(|v| v.to_string());

                Some(IndexDefinition {
                    columns,
                    unique,
                    name,
                    options,
                })
            })
            .collect()
    }

    /// Every `add_foreign_key` in `text`, with default column names filled in.
    pub fn parse_foreign_keys(&self, text: &str) -> Vec<ForeignKeyDefinition> {
        lexer::foreign_keys(text)
            .into_iter()
            .map(|decl| {
                let mut options = parse_hash(decl.options, &self.options);
                let column = take_text(&mut options, "column").unwrap_or_else(|| {
                    format!("{}_id", self.inflector.singular(decl.to_table))
                });
                let to_column =
                    take_text(&mut options, "primary_key").unwrap_or_else(|| "id".to_string());
                let name = take_text(&mut options, "name");

                ForeignKeyDefinition {
                    from_table: decl.from_table.to_string(),
                    to_table: decl.to_table.to_string(),
                    column,
                    to_column,
                    name,
                    options,
                }
            })
            .collect()
    }
}

/// Remove `key` and return its text, treating an empty value as absent.
fn take_text(options: &mut Options, key: &str) -> Option<String> {
    options
        .shift_remove(key)
        .map(|v| v.to_string())
        .filter(|s| !s.is_empty())
}

fn primary_key_columns(value: &Value) -> Option<Vec<String>> {
    let columns: Vec<String> = match value {
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_text)
            .map(str::to_string)
            .collect(),
        Value::Str(s) | Value::Symbol(s) => vec![s.clone()],
        _ => Vec::new(),
    };
    let columns: Vec<String> = columns.into_iter().filter(|c| !c.is_empty()).collect();
    (!columns.is_empty()).then_some(columns)
}

/// The implicit `id` column. `id: :uuid` picks its type, `id: { ... }`
/// overrides its attributes.
fn synthesized_id(id: &Value) -> FieldDefinition {
    let mut field = FieldDefinition {
        name: "id".to_string(),
        typ: match id {
            Value::Str(s) | Value::Symbol(s) => s.clone(),
            _ => "primary_key".to_string(),
        },
        nullable: false,
        default: None,
        comment: Some("AUTO_INCREMENT".to_string()),
        options: Options::new(),
    };

    if let Some(overrides) = id.as_hash() {
        for (key, value) in overrides {
            match key.as_str() {
                "type" => {
                    if let Some(typ) = value.as_text() {
                        field.typ = typ.to_string();
                    }
                }
                "null" => field.nullable = value.is_truthy(),
                "default" => field.default = Some(value.clone()),
                "comment" => field.comment = Some(value.to_string()),
                _ => {
                    field.options.insert(key.clone(), value.clone());
                }
            }
        }
    }
    field
}

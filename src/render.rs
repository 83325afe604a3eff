//! Plain-text report of a parsed schema, one block per table.

use crate::ast::{FieldDefinition, ForeignKeyDefinition, IndexDefinition, Options, SchemaDocument, TableDefinition};
use crate::types::display_type;
use unicode_width::UnicodeWidthStr;

const FIELD_HEADERS: [&str; 6] = ["Field Name", "Data Type", "Default", "Not Null?", "Notes", "Others"];
const INDEX_HEADERS: [&str; 4] = ["Index Name", "Column", "Unique?", "Notes"];
const FOREIGN_KEY_HEADERS: [&str; 5] = [
    "Foreign Key",
    "Column",
    "Destination",
    "Destination Column",
    "Notes",
];

pub struct TextRenderer {
    pub indent: usize,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self { indent: 2 }
    }
}

impl TextRenderer {
    pub fn render(&self, schema: &SchemaDocument) -> String {
        let mut out = String::new();
        for (i, (name, table)) in schema.tables.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            self.render_table(&mut out, name, table);
        }
        out
    }

    fn render_table(&self, out: &mut String, name: &str, table: &TableDefinition) {
        out.push_str(name);
        out.push('\n');

        let fields: Vec<Vec<String>> = table.fields.iter().map(field_row).collect();
        self.section(out, "FIELDS", &FIELD_HEADERS, &fields);

        // empty index and foreign key sections are omitted
        if !table.indexes.is_empty() {
            let rows: Vec<Vec<String>> = table.indexes.iter().map(index_row).collect();
            self.section(out, "INDEXES", &INDEX_HEADERS, &rows);
        }
        if !table.foreign_keys.is_empty() {
            let rows: Vec<Vec<String>> = table.foreign_keys.iter().map(foreign_key_row).collect();
            self.section(out, "FOREIGN KEYS", &FOREIGN_KEY_HEADERS, &rows);
        }
    }

    fn section(&self, out: &mut String, title: &str, headers: &[&str], rows: &[Vec<String>]) {
        let pad = " ".repeat(self.indent);
        out.push_str(&pad);
        out.push_str(title);
        out.push('\n');

        let mut widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();
        for row in rows {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(cell.width());
            }
        }

        let header: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
        self.line(out, &pad, &header, &widths);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        self.line(out, &pad, &rule, &widths);
        for row in rows {
            self.line(out, &pad, row, &widths);
        }
    }

    fn line(&self, out: &mut String, pad: &str, cells: &[String], widths: &[usize]) {
        out.push_str(pad);
        out.push('|');
        for (cell, width) in cells.iter().zip(widths) {
            out.push(' ');
            out.push_str(cell);
            out.push_str(&" ".repeat(width.saturating_sub(cell.width())));
            out.push_str(" |");
        }
        out.push('\n');
    }
}

pub fn field_row(field: &FieldDefinition) -> Vec<String> {
    vec![
        field.name.clone(),
        display_type(field),
        field.default.as_ref().map(|v| v.to_string()).unwrap_or_default(),
        if field.nullable { String::new() } else { "Yes".to_string() },
        field.comment.clone().unwrap_or_default(),
        extract_options(&field.options, &["precision", "scale", "collation"]),
    ]
}

pub fn index_row(index: &IndexDefinition) -> Vec<String> {
    vec![
        index.name.clone().unwrap_or_default(),
        index.columns.join(", "),
        if index.unique { "Yes".to_string() } else { String::new() },
        extract_options(&index.options, &["order", "length", "where"]),
    ]
}

pub fn foreign_key_row(fk: &ForeignKeyDefinition) -> Vec<String> {
    vec![
        fk.name.clone().unwrap_or_default(),
        fk.column.clone(),
        fk.to_table.clone(),
        fk.to_column.clone(),
        extract_options(&fk.options, &["on_delete", "on_update", "validate"]),
    ]
}

/// `key: value` pairs for the listed keys that are present, in list order.
fn extract_options(options: &Options, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|key| options.get(*key).map(|v| format!("{}: {}", key, v)))
        .collect::<Vec<_>>()
        .join(", ")
        .replace('\n', " ")
}

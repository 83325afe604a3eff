use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::fmt;

/// Ordered option map. Iteration follows first insertion.
pub type Options = IndexMap<String, Value>;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SchemaDocument {
    pub tables: IndexMap<String, TableDefinition>,
}

impl SchemaDocument {
    pub fn table(&self, name: &str) -> Option<&TableDefinition> {
        self.tables.get(name)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableDefinition {
    /// Table-level options such as `force` or `comment`
    #[serde(flatten)]
    pub options: Options,
    pub fields: Vec<FieldDefinition>,
    pub indexes: Vec<IndexDefinition>,
    #[serde(rename = "foreignKeys")]
    pub foreign_keys: Vec<ForeignKeyDefinition>,
}

impl TableDefinition {
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub typ: String,
    pub nullable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// `limit`, `precision`, `scale`, `unsigned`, `collation`, `size`, ...
    #[serde(flatten)]
    pub options: Options,
}

impl FieldDefinition {
    /// Build a field from its declaration, pulling `null`, `default` and
    /// `comment` out of the option hash.
    pub fn from_options(name: impl Into<String>, typ: impl Into<String>, mut options: Options) -> Self {
        let nullable = !matches!(
            options.shift_remove("null"),
            Some(Value::Keyword(Keyword::False))
        );
        let default = options.shift_remove("default");
        let comment = options.shift_remove("comment").map(|v| v.to_string());

        Self {
            name: name.into(),
            typ: typ.into(),
            nullable,
            default,
            comment,
            options,
        }
    }

    pub fn option(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexDefinition {
    pub columns: Vec<String>,
    pub unique: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `order`, `length`, `where`, ...
    #[serde(flatten)]
    pub options: Options,
}

impl IndexDefinition {
    pub const PRIMARY_KEY: &'static str = "PRIMARY_KEY";

    pub fn primary_key(columns: Vec<String>) -> Self {
        Self {
            columns,
            unique: true,
            name: Some(Self::PRIMARY_KEY.to_string()),
            options: Options::new(),
        }
    }

    pub fn is_primary_key(&self) -> bool {
        self.name.as_deref() == Some(Self::PRIMARY_KEY)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForeignKeyDefinition {
    #[serde(skip)]
    pub from_table: String,
    #[serde(rename = "toTable")]
    pub to_table: String,
    pub column: String,
    #[serde(rename = "toColumn")]
    pub to_column: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `on_delete`, `on_update`, `validate`, ...
    #[serde(flatten)]
    pub options: Options,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    True,
    False,
    Nil,
}

impl Keyword {
    pub fn from_ident(s: &str) -> Option<Self> {
        match s {
            "true" => Some(Self::True),
            "false" => Some(Self::False),
            "nil" => Some(Self::Nil),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    /// Raw source of a `-> { ... }` literal, never evaluated
    Callable(String),
    Hash(Options),
    Array(Vec<Value>),
    /// Decimal text as written (leading `.` normalized to `0.`)
    Numeric(String),
    Symbol(String),
    Keyword(Keyword),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    String,
    Callable,
    Hash,
    Array,
    Numeric,
    Symbol,
    Keyword,
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Str(_) => ValueKind::String,
            Value::Callable(_) => ValueKind::Callable,
            Value::Hash(_) => ValueKind::Hash,
            Value::Array(_) => ValueKind::Array,
            Value::Numeric(_) => ValueKind::Numeric,
            Value::Symbol(_) => ValueKind::Symbol,
            Value::Keyword(_) => ValueKind::Keyword,
        }
    }

    /// Text of scalar values that read as a name (strings, symbols, numbers).
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Str(s) | Value::Symbol(s) | Value::Numeric(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_hash(&self) -> Option<&Options> {
        match self {
            Value::Hash(h) => Some(h),
            _ => None,
        }
    }

    /// Ruby truthiness: only `false` and `nil` are falsy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Keyword(Keyword::False | Keyword::Nil))
    }

    /// Truthiness of the legacy array filter, which also treated the empty
    /// string and numeric zero as absent.
    pub fn is_legacy_truthy(&self) -> bool {
        match self {
            Value::Str(s) => !s.is_empty(),
            Value::Numeric(n) => n.parse::<f64>().map(|v| v != 0.0).unwrap_or(true),
            other => other.is_truthy(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) | Value::Callable(s) | Value::Numeric(s) | Value::Symbol(s) => {
                f.write_str(s)
            }
            Value::Keyword(Keyword::True) => f.write_str("true"),
            Value::Keyword(Keyword::False) => f.write_str("false"),
            Value::Keyword(Keyword::Nil) => f.write_str("null"),
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Value::Hash(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                f.write_str("}")
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Str(s) | Value::Callable(s) | Value::Numeric(s) | Value::Symbol(s) => {
                serializer.serialize_str(s)
            }
            Value::Keyword(Keyword::True) => serializer.serialize_bool(true),
            Value::Keyword(Keyword::False) => serializer.serialize_bool(false),
            Value::Keyword(Keyword::Nil) => serializer.serialize_unit(),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Hash(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

//! Parser configuration.

/// How `parse_array` treats literals that parse successfully but read as
/// "empty" (`""`, `0`, `false`, `nil`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArrayFilter {
    /// Keep every literal that parsed
    #[default]
    Present,
    /// Drop empty strings, numeric zero, `false` and `nil`
    LegacyTruthy,
}

impl ArrayFilter {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "present" => Some(Self::Present),
            "legacy" | "truthy" => Some(Self::LegacyTruthy),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    pub array_filter: ArrayFilter,
    /// Deepest array/hash nesting accepted by the literal parser. A literal
    /// nested deeper fails to match.
    pub max_depth: usize,
}

impl ParserOptions {
    pub const DEFAULT_MAX_DEPTH: usize = 64;
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            array_filter: ArrayFilter::Present,
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }
}

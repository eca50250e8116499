//! The closed type lattice used to check every reference.
//!
//! Type tags arrive from the catalog and from parameter declarations as raw
//! strings. They are parsed once into [`ValueType`] and every compatibility or
//! conversion question is answered by [`conversion`] from a single table.

pub mod conversion;

pub use conversion::{
    ConversionComplexity, ConversionLoss, are_compatible, can_convert, conversion_complexity,
    conversion_loss, conversion_pairs, is_auto_fixable, suggest_transformation,
};

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Value type of a parameter or output.
///
/// Parsing trims surrounding whitespace and ignores case, but only the
/// canonical names map to a known variant. Anything else is kept as
/// [`ValueType::Other`] in normalized form, so `"MyType"` and `" mytype "`
/// are still the same type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ValueType {
    Text,
    Integer,
    Decimal,
    Float,
    Boolean,
    Address,
    Identifier,
    Timestamp,
    Json,
    Other(String),
}

impl ValueType {
    /// All known variants, in declaration order.
    pub const KNOWN: [ValueType; 9] = [
        ValueType::Text,
        ValueType::Integer,
        ValueType::Decimal,
        ValueType::Float,
        ValueType::Boolean,
        ValueType::Address,
        ValueType::Identifier,
        ValueType::Timestamp,
        ValueType::Json,
    ];

    pub fn parse(tag: &str) -> Self {
        let normalized = tag.trim().to_lowercase();
        match normalized.as_str() {
            "text" => ValueType::Text,
            "integer" => ValueType::Integer,
            "decimal" => ValueType::Decimal,
            "float" => ValueType::Float,
            "boolean" => ValueType::Boolean,
            "address" => ValueType::Address,
            "identifier" => ValueType::Identifier,
            "timestamp" => ValueType::Timestamp,
            "json" => ValueType::Json,
            _ => ValueType::Other(normalized),
        }
    }

    pub fn is_textual(&self) -> bool {
        matches!(self, ValueType::Text)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ValueType::Integer | ValueType::Decimal | ValueType::Float
        )
    }

    /// Boolean, address and identifier values carry meaning beyond their text form.
    pub fn is_boolean_or_identifier_like(&self) -> bool {
        matches!(
            self,
            ValueType::Boolean | ValueType::Address | ValueType::Identifier
        )
    }

    pub fn name(&self) -> &str {
        match self {
            ValueType::Text => "Text",
            ValueType::Integer => "Integer",
            ValueType::Decimal => "Decimal",
            ValueType::Float => "Float",
            ValueType::Boolean => "Boolean",
            ValueType::Address => "Address",
            ValueType::Identifier => "Identifier",
            ValueType::Timestamp => "Timestamp",
            ValueType::Json => "Json",
            ValueType::Other(name) => name,
        }
    }
}

impl FromStr for ValueType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ValueType::parse(s))
    }
}

impl From<String> for ValueType {
    fn from(value: String) -> Self {
        ValueType::parse(&value)
    }
}

impl From<&str> for ValueType {
    fn from(value: &str) -> Self {
        ValueType::parse(value)
    }
}

impl From<ValueType> for String {
    fn from(value: ValueType) -> Self {
        value.name().to_string()
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

use super::ValueType;
use serde::Serialize;
use std::fmt;

/// How much effort a conversion between two types takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversionComplexity {
    Simple,
    Moderate,
    Complex,
}

impl fmt::Display for ConversionComplexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionComplexity::Simple => write!(f, "simple"),
            ConversionComplexity::Moderate => write!(f, "moderate"),
            ConversionComplexity::Complex => write!(f, "complex"),
        }
    }
}

/// Whether a conversion can lose information or fail at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversionLoss {
    Lossless,
    Lossy,
}

/// Defines the directed conversion table, its lookup and its enumeration.
macro_rules! define_conversions {
    ( $( ($from:ident => $to:ident, $loss:ident, $hint:expr) ),* $(,)? ) => {
        fn lookup(from: &ValueType, to: &ValueType) -> Option<(ConversionLoss, &'static str)> {
            match (from, to) {
                $( (ValueType::$from, ValueType::$to) => Some((ConversionLoss::$loss, $hint)), )*
                _ => None,
            }
        }

        /// Every `(from, to)` pair present in the conversion table.
        pub fn conversion_pairs() -> Vec<(ValueType, ValueType)> {
            vec![ $( (ValueType::$from, ValueType::$to), )* ]
        }
    };
}

define_conversions! {
    // Text parses into most scalars
    (Text => Integer, Lossy, "parse text as integer"),
    (Text => Decimal, Lossy, "parse text as decimal"),
    (Text => Float, Lossy, "parse text as floating point number"),
    (Text => Boolean, Lossy, "parse text as boolean (\"true\"/\"false\")"),
    (Text => Address, Lossy, "validate text as an address"),
    (Text => Identifier, Lossy, "validate text as an identifier"),
    (Text => Timestamp, Lossy, "parse text as an ISO-8601 timestamp"),
    (Text => Json, Lossy, "parse text as JSON"),

    // Numeric interconversion
    (Integer => Decimal, Lossless, "widen integer to decimal"),
    (Integer => Float, Lossless, "widen integer to floating point"),
    (Decimal => Integer, Lossy, "round decimal to integer"),
    (Float => Integer, Lossy, "round floating point to integer"),
    (Decimal => Float, Lossy, "convert decimal to floating point"),
    (Float => Decimal, Lossy, "convert floating point to decimal"),

    // Everything renders as text
    (Integer => Text, Lossless, "format integer as text"),
    (Decimal => Text, Lossless, "format decimal as text"),
    (Float => Text, Lossless, "format floating point as text"),
    (Boolean => Text, Lossless, "format boolean as text"),
    (Address => Text, Lossless, "format address as text"),
    (Identifier => Text, Lossless, "format identifier as text"),
    (Timestamp => Text, Lossless, "format timestamp as ISO-8601 text"),
    (Json => Text, Lossless, "serialize JSON to text"),

    // Epoch timestamps
    (Timestamp => Integer, Lossless, "convert timestamp to epoch seconds"),
    (Integer => Timestamp, Lossy, "interpret integer as epoch seconds"),
}

/// Case-insensitive exact match on the type name.
pub fn are_compatible(source: &ValueType, target: &ValueType) -> bool {
    source == target
}

/// Whether the conversion table has an entry from `source` to `target`.
pub fn can_convert(source: &ValueType, target: &ValueType) -> bool {
    lookup(source, target).is_some()
}

/// Loss class of a conversion, `None` when no conversion exists.
pub fn conversion_loss(source: &ValueType, target: &ValueType) -> Option<ConversionLoss> {
    lookup(source, target).map(|(loss, _)| loss)
}

/// Classifies the effort of converting between two types.
///
/// Rules apply in order: boolean- or identifier-like on either side is
/// `Moderate`; text on either side, or numeric on both, is `Simple`;
/// everything else is `Complex`. Defined for every pair, convertible or not.
pub fn conversion_complexity(source: &ValueType, target: &ValueType) -> ConversionComplexity {
    if source.is_boolean_or_identifier_like() || target.is_boolean_or_identifier_like() {
        ConversionComplexity::Moderate
    } else if source.is_textual()
        || target.is_textual()
        || (source.is_numeric() && target.is_numeric())
    {
        ConversionComplexity::Simple
    } else {
        ConversionComplexity::Complex
    }
}

/// A conversion can be applied automatically only when it is simple and cannot lose data.
pub fn is_auto_fixable(source: &ValueType, target: &ValueType) -> bool {
    conversion_loss(source, target) == Some(ConversionLoss::Lossless)
        && conversion_complexity(source, target) == ConversionComplexity::Simple
}

/// Human-readable hint for turning a `source` value into a `target` value.
///
/// Returns `None` exactly when [`can_convert`] is false.
pub fn suggest_transformation(source: &ValueType, target: &ValueType) -> Option<String> {
    lookup(source, target).map(|(_, hint)| {
        if hint.is_empty() {
            format!("convert {} to {}", source, target)
        } else {
            hint.to_string()
        }
    })
}

//! Lenient deserializers for the remote API's loosely typed JSON.
//!
//! The same field arrives as `42`, `"42"` or `""` depending on the action
//! and the installation's version.

use serde::de::{self, Deserializer};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Int(i64),
    Float(f64),
    Str(String),
}

fn to_i64<E: de::Error>(value: NumberOrString) -> Result<Option<i64>, E> {
    match value {
        NumberOrString::Int(n) => Ok(Some(n)),
        NumberOrString::Float(f) if f.fract() == 0.0 => Ok(Some(f as i64)),
        NumberOrString::Float(f) => Err(E::custom(format!("expected an integer, got {f}"))),
        NumberOrString::Str(s) if s.trim().is_empty() => Ok(None),
        NumberOrString::Str(s) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| E::custom(format!("expected an integer, got `{s}`"))),
    }
}

/// An id that may be a number or a numeric string. Empty strings are `0`.
pub fn int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = NumberOrString::deserialize(deserializer)?;
    Ok(to_i64(value)?.unwrap_or_default())
}

/// Optional variant of `int`; `null` and `""` become `None`.
pub fn opt_int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    match Option::<NumberOrString>::deserialize(deserializer)? {
        Some(value) => to_i64(value),
        None => Ok(None),
    }
}

/// A text field that is sometimes sent as a number.
pub fn opt_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<NumberOrString>::deserialize(deserializer)? {
        Some(NumberOrString::Int(n)) => Some(n.to_string()),
        Some(NumberOrString::Float(f)) => Some(f.to_string()),
        Some(NumberOrString::Str(s)) => Some(s),
        None => None,
    })
}

/// A list the remote sends as `[]`, `""` or omits when empty.
pub fn list_or_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ListOrEmpty<T> {
        List(Vec<T>),
        Text(String),
    }

    match Option::<ListOrEmpty<T>>::deserialize(deserializer)? {
        Some(ListOrEmpty::List(items)) => Ok(items),
        Some(ListOrEmpty::Text(text)) if !text.is_empty() => {
            Err(de::Error::custom(format!("expected a list, got `{text}`")))
        }
        _ => Ok(Vec::new()),
    }
}

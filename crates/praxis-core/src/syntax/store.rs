//! Variable directives: `$NAME` tokens, `STORE-AS`, `STORE-GET`

use serde::Serialize;

use crate::text::upper_snake;

/// Placeholder printed when a value has no literal form
pub const UNSERIALIZABLE: &str = "{UNSERIALIZABLE}";

/// Variable and storage directives
#[derive(Debug, Clone, Copy, Default)]
pub struct Store;

impl Store {
    /// Variable token, e.g. `taskId` → `$TASK_ID`
    pub fn var(name: &str) -> String {
        format!("${}", upper_snake(name))
    }

    /// `STORE-AS($NAME = v1, v2)`; with no values, `STORE-AS($NAME)`
    pub fn store_as<I, T>(name: &str, values: I) -> String
    where
        I: IntoIterator<Item = T>,
        T: Serialize,
    {
        let values: Vec<String> = values.into_iter().map(|v| Self::literal(&v)).collect();
        if values.is_empty() {
            format!("STORE-AS({})", Self::var(name))
        } else {
            format!("STORE-AS({} = {})", Self::var(name), values.join(", "))
        }
    }

    /// `STORE-GET($NAME)`
    pub fn get(name: &str) -> String {
        format!("STORE-GET({})", Self::var(name))
    }

    /// Literal form of a value: strings verbatim, everything else as compact JSON.
    ///
    /// Values serde cannot represent (e.g. maps with non-string keys) become
    /// [`UNSERIALIZABLE`].
    pub fn literal<T: Serialize + ?Sized>(value: &T) -> String {
        match serde_json::to_value(value) {
            Ok(serde_json::Value::String(s)) => s,
            Ok(other) => other.to_string(),
            Err(e) => {
                tracing::warn!("Value has no literal form, using placeholder: {}", e);
                UNSERIALIZABLE.to_string()
            }
        }
    }
}

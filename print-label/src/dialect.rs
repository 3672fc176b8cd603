//! Dialects translate a [`Label`] into bytes for a printer
//!
//! A dialect is stateless with respect to the labels it encodes. It may hold
//! immutable configuration chosen at construction time.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::instrument;

use crate::error::{PrintError, PrintResult};
use crate::label::{Label, Unit};

/// Key holding label metadata in the JSON dialect
pub const META_KEY: &str = "__meta__";

/// Trait for label dialects
pub trait Dialect {
    /// Encode a label into a transport-ready byte sequence
    fn encode(&self, label: &Label) -> PrintResult<Vec<u8>>;
}

/// JSON representation of a label
///
/// Specific to this library; it does not correspond to any real printer
/// language. Fields are keyed by name, followed by a `__meta__` entry with
/// the label geometry.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json {
    pretty: bool,
}

impl Json {
    /// Compact JSON output
    pub fn new() -> Self {
        Self::default()
    }

    /// Indented JSON output
    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    pub fn is_pretty(&self) -> bool {
        self.pretty
    }

    fn validate(label: &Label) -> PrintResult<()> {
        check_finite("width", label.width())?;
        check_finite("height", label.height())?;

        for (name, field) in label.fields() {
            if name == META_KEY {
                return Err(PrintError::Encoding(format!(
                    "Field name {} is reserved",
                    META_KEY
                )));
            }
            check_finite(name, field.loc_x)?;
            check_finite(name, field.loc_y)?;
        }
        Ok(())
    }
}

impl Dialect for Json {
    #[instrument(skip(self, label), fields(fields = label.len(), pretty = self.pretty))]
    fn encode(&self, label: &Label) -> PrintResult<Vec<u8>> {
        Self::validate(label)?;

        let document = JsonDocument(label);
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(&document)?
        } else {
            serde_json::to_vec(&document)?
        };
        Ok(bytes)
    }
}

/// JSON numbers cannot carry NaN or infinities
fn check_finite(what: &str, value: f64) -> PrintResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(PrintError::Encoding(format!(
            "{} is not representable in JSON: {}",
            what, value
        )))
    }
}

#[derive(Serialize)]
struct Meta {
    width: f64,
    height: f64,
    units: Unit,
}

/// Borrowed view serialized in field insertion order
struct JsonDocument<'a>(&'a Label);

impl Serialize for JsonDocument<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let label = self.0;
        let mut map = serializer.serialize_map(Some(label.len() + 1))?;
        for (name, field) in label.fields() {
            map.serialize_entry(name, field)?;
        }
        map.serialize_entry(
            META_KEY,
            &Meta {
                width: label.width(),
                height: label.height(),
                units: label.units(),
            },
        )?;
        map.end()
    }
}

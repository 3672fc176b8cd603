//! Dialect-agnostic label model
//!
//! A [`Label`] has fixed geometry and an insertion-ordered set of named
//! fields. Fields are only ever added; there is no rename or removal.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PrintError, PrintResult};

/// Prefix for autogenerated field names
pub const DEFAULT_FIELD_PREFIX: &str = "field-";

/// Measurement units for label geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "mm")]
    Millimeters,
    #[serde(rename = "in")]
    Inches,
    #[serde(rename = "dot")]
    Dots,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Millimeters => "mm",
            Unit::Inches => "in",
            Unit::Dots => "dot",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = PrintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mm" => Ok(Unit::Millimeters),
            "in" => Ok(Unit::Inches),
            "dot" => Ok(Unit::Dots),
            other => Err(PrintError::InvalidConfig(format!("Unknown unit: {}", other))),
        }
    }
}

/// A positioned placeholder within a label
///
/// Offsets are in label units, measured from the upper-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub loc_x: f64,
    pub loc_y: f64,
}

/// Printable label layout
#[derive(Debug, Clone)]
pub struct Label {
    width: f64,
    height: f64,
    units: Unit,
    fields: Vec<(String, Field)>,
    index: HashMap<String, usize>,
}

impl Label {
    /// Create an empty label
    pub fn new(width: f64, height: f64, units: Unit) -> Self {
        Self {
            width,
            height,
            units,
            fields: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn units(&self) -> Unit {
        self.units
    }

    /// Add a field at (`loc_x`, `loc_y`) and return its name
    ///
    /// When `name` is `None` the next default name is used. Placement is not
    /// checked against the label bounds.
    ///
    /// The default name only depends on the current field count, so a
    /// caller-chosen `field-<n>` can make a later default name collide. That
    /// collision is reported like any other.
    pub fn create_field(
        &mut self,
        loc_x: f64,
        loc_y: f64,
        name: Option<&str>,
    ) -> PrintResult<String> {
        let name = match name {
            Some(name) => name.to_string(),
            None => self.generate_field_name(),
        };

        if self.index.contains_key(&name) {
            return Err(PrintError::FieldNameConflict(name));
        }

        debug!(field = %name, loc_x, loc_y, "Field created");
        self.index.insert(name.clone(), self.fields.len());
        self.fields.push((name.clone(), Field { loc_x, loc_y }));
        Ok(name)
    }

    /// Next default field name, `field-<count>`
    pub fn generate_field_name(&self) -> String {
        format!("{}{}", DEFAULT_FIELD_PREFIX, self.fields.len())
    }

    /// Field names in insertion order
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.index.get(name).map(|&i| &self.fields[i].1)
    }

    pub fn contains_field(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Iterate over `(name, field)` pairs in insertion order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(name, field)| (name.as_str(), field))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

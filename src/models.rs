//! Domain models that mirror the SQLite schema and get passed throughout the
//! TUI. These types stay light-weight data holders so other layers can focus
//! on presentation and persistence logic.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone)]
/// An animal under care. One patient owns any number of exams; deleting the
/// patient cascades to them at the schema level.
pub struct Patient {
    /// Primary key from the database. Kept around even when the UI only needs
    /// display information because edit/delete flows bubble the id back to
    /// the persistence layer.
    pub id: i64,
    /// Animal's call name, the sort key for every patient listing.
    pub name: String,
    pub species: String,
    pub breed: String,
    /// Name of the person the animal belongs to.
    pub owner_name: String,
    /// Creation timestamp as written by the database default.
    pub created_at: String,
}

impl Patient {
    /// Compose a `Name (species)` string that omits the parenthetical when the
    /// species is blank. List views rely on this ready-to-use formatting.
    pub fn display_name(&self) -> String {
        if self.species.trim().is_empty() {
            self.name.clone()
        } else {
            format!("{} ({})", self.name, self.species)
        }
    }
}

impl fmt::Display for Patient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Debug, Clone)]
/// One recorded examination. The `data` field holds the semi-structured
/// findings payload, stored as JSON text in the `exam_data` column.
pub struct Exam {
    /// Primary key from the SQLite store.
    pub id: i64,
    /// Owning patient; enforced by a foreign key with cascade delete.
    pub patient_id: i64,
    /// Kind of examination ("xray", "ultrasound", ...). Free text.
    pub exam_type: String,
    /// Findings payload. Always a JSON object; a malformed stored payload is
    /// replaced by an empty object when the row is read back.
    pub data: Value,
    pub created_at: String,
    /// Refreshed by every update so the detail view can show recency.
    pub updated_at: String,
}

impl Exam {
    /// Compose an `exam_type — created_at` line for list panes.
    pub fn display_label(&self) -> String {
        if self.created_at.trim().is_empty() {
            self.exam_type.clone()
        } else {
            format!("{} ({})", self.exam_type, self.created_at)
        }
    }
}

/// Typed view over the exam findings payload used by the shell. The facade
/// itself treats the payload as opaque JSON; this struct is how the forms read
/// and write the fields they understand without dropping unknown keys' siblings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExamPayload {
    /// Free-text clinical notes.
    #[serde(default)]
    pub notes: String,
    /// Short summary of findings shown in the detail header.
    #[serde(default)]
    pub findings: String,
    /// Named measurements taken during the exam, in the unit the reference
    /// table declares for them.
    #[serde(default)]
    pub measurements: BTreeMap<String, f64>,
    /// Payload keys the shell does not model, carried through edits untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ExamPayload {
    /// Read the typed fields out of a stored payload. Unknown shapes fall back
    /// to the default, mirroring how the store treats malformed payload text.
    pub fn from_value(value: &Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }

    /// Serialize back to the JSON object the facade stores.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Default::default()))
    }
}

#[derive(Debug, Clone)]
/// A reusable block of report text. Names are unique so templates can be
/// picked by name from the exam detail view.
pub struct Template {
    pub id: i64,
    pub name: String,
    pub content: String,
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Debug, Clone)]
/// Normal range for one measurement, keyed by the (exam_type, species, organ,
/// measurement) quadruple the schema declares unique.
pub struct ReferenceValue {
    pub id: i64,
    pub exam_type: String,
    pub species: String,
    pub organ: String,
    pub measurement: String,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub unit: String,
}

impl ReferenceValue {
    /// Render the `min–max unit` range with open ends shown as `..`.
    pub fn display_range(&self) -> String {
        let min = self
            .min_value
            .map_or_else(|| "..".to_string(), |v| v.to_string());
        let max = self
            .max_value
            .map_or_else(|| "..".to_string(), |v| v.to_string());
        if self.unit.trim().is_empty() {
            format!("{min} - {max}")
        } else {
            format!("{min} - {max} {}", self.unit)
        }
    }
}

//! Note (jot) domain model.
//!
//! # Responsibility
//! - Define the canonical sticky-note record and its nested value types.
//! - Own the default field values applied on creation.
//!
//! # Invariants
//! - `id` is unique within one collection and never reused.
//! - `color` is chosen once from `NOTE_COLORS` and never changed afterwards.
//! - Across a collection, `z_index` values form the dense range `0..len`.

use serde::{Deserialize, Serialize};

/// Identifier of one note inside a collection.
///
/// Ids look numeric but are opaque; store lookups compare them as strings.
pub type NoteId = String;

/// Palette a new note's background color is drawn from.
pub const NOTE_COLORS: [&str; 5] = ["#F1F1F1", "#FFEBFA", "#FFF4F1", "#FFFDFA", "#EEFEFF"];

/// Pixel offsets and size of a note card.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub top: f64,
    pub left: f64,
    pub height: f64,
    pub width: f64,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            top: 20.0,
            left: 20.0,
            height: 250.0,
            width: 300.0,
        }
    }
}

/// Reminder scheduling metadata attached to a note.
///
/// Both fields are `null` until the presentation layer schedules one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    /// Unix epoch milliseconds the reminder fires at.
    pub time: Option<i64>,
    /// Text shown when the reminder fires.
    pub display: Option<String>,
}

/// One sticky note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub header: String,
    pub raw_content: String,
    pub geometry: Geometry,
    /// Stacking rank; higher values render in front.
    pub z_index: usize,
    pub hidden: bool,
    pub color: String,
    pub reminder: Reminder,
}

impl Note {
    /// Builds a freshly created note with default header, body and geometry.
    pub fn new_default(id: impl Into<NoteId>, z_index: usize, color: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            header: default_header(&id),
            id,
            raw_content: String::new(),
            geometry: Geometry::default(),
            z_index,
            hidden: false,
            color: color.into(),
            reminder: Reminder::default(),
        }
    }
}

/// Default title shown for a new note.
pub fn default_header(id: &str) -> String {
    format!("Note {id}")
}

/// Returns whether `notes` satisfies the dense z-order invariant.
///
/// True when the multiset of `z_index` values is exactly `0..notes.len()`.
pub fn is_dense_z_order(notes: &[Note]) -> bool {
    let mut seen = vec![false; notes.len()];
    for note in notes {
        let Some(slot) = seen.get_mut(note.z_index) else {
            return false;
        };
        if *slot {
            return false;
        }
        *slot = true;
    }
    true
}

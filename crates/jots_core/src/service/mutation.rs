//! Structured mutation payloads.
//!
//! A `Mutation` is both the request the presentation layer commits to the
//! store and the event the store hands to change listeners afterwards.
//! The serde shape is `{"type": "<name>", ...payload}`.

use crate::model::note::{Geometry, NoteId, Reminder};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Mutation {
    #[serde(rename = "createJot")]
    CreateJot,
    #[serde(rename = "removeJot")]
    RemoveJot { id: NoteId },
    #[serde(rename = "setJotHeader")]
    SetHeader { id: NoteId, header: String },
    #[serde(rename = "setJotContent")]
    SetContent {
        id: NoteId,
        #[serde(rename = "rawContent")]
        raw_content: String,
    },
    #[serde(rename = "setJotHidden")]
    SetHidden { id: NoteId, hidden: bool },
    #[serde(rename = "setJotGeometry")]
    SetGeometry { id: NoteId, geometry: Geometry },
    #[serde(rename = "setJotReminder")]
    SetReminder { id: NoteId, reminder: Reminder },
    #[serde(rename = "bringJotToFront")]
    BringToFront { id: NoteId },
}

impl Mutation {
    /// Stable name used in payloads and log events.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateJot => "createJot",
            Self::RemoveJot { .. } => "removeJot",
            Self::SetHeader { .. } => "setJotHeader",
            Self::SetContent { .. } => "setJotContent",
            Self::SetHidden { .. } => "setJotHidden",
            Self::SetGeometry { .. } => "setJotGeometry",
            Self::SetReminder { .. } => "setJotReminder",
            Self::BringToFront { .. } => "bringJotToFront",
        }
    }

    /// Target note id, `None` for `CreateJot`.
    pub fn target_id(&self) -> Option<&str> {
        match self {
            Self::CreateJot => None,
            Self::RemoveJot { id }
            | Self::SetHeader { id, .. }
            | Self::SetContent { id, .. }
            | Self::SetHidden { id, .. }
            | Self::SetGeometry { id, .. }
            | Self::SetReminder { id, .. }
            | Self::BringToFront { id } => Some(id.as_str()),
        }
    }
}

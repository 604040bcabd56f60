//! Form model shared by the engine and the page ports.
//!
//! Everything here is ephemeral: field descriptors are recomputed from a
//! fresh snapshot on every form step and handles are only valid until the
//! next snapshot.

use serde::{Deserialize, Serialize};

/// Kind of form control, as classified from the live page.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlKind {
    Text,
    Textarea,
    Select,
    Checkbox,
    Radio,
    File,
}

impl ControlKind {
    /// Text-bearing kinds are the only ones eligible for the generative
    /// answer fallback.
    pub fn is_textual(&self) -> bool {
        matches!(self, Self::Text | Self::Textarea)
    }
}

/// Semantic descriptor for one visible, enabled control.
///
/// `label` may be empty (no associated label element was found); an empty
/// label simply never matches an answer rule. `options` is populated for
/// select controls only.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FormField {
    #[serde(default)]
    pub label: String,
    pub kind: ControlKind,
    #[serde(default)]
    pub options: Vec<String>,
}

/// Opaque handle to a control in the current snapshot.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ControlRef(pub u32);

/// A classified control together with the handle used to act on it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FormControl {
    pub field: FormField,
    pub handle: ControlRef,
}

/// One radio input inside a labelled group, with its own label text.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RadioOption {
    #[serde(default)]
    pub label: String,
    pub handle: ControlRef,
}

/// A logical field group inside the active dialog: one label, the non-radio
/// controls it covers, and any radio inputs resolved as a group.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FieldGroup {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub controls: Vec<FormControl>,
    #[serde(default)]
    pub radios: Vec<RadioOption>,
}

impl FieldGroup {
    pub fn labelled(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn with_control(mut self, field: FormField, handle: ControlRef) -> Self {
        self.controls.push(FormControl { field, handle });
        self
    }

    pub fn with_radio(mut self, label: impl Into<String>, handle: ControlRef) -> Self {
        self.radios.push(RadioOption {
            label: label.into(),
            handle,
        });
        self
    }
}

/// Classification of the primary navigation action found in the dialog.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavKind {
    Submit,
    Review,
    Next,
}

/// The primary navigation button chosen for the current step.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NavAction {
    pub kind: NavKind,
    pub label: String,
}

impl NavAction {
    pub fn new(kind: NavKind, label: impl Into<String>) -> Self {
        Self {
            kind,
            label: label.into(),
        }
    }
}

/// Button-label vocabularies used to rank candidate navigation buttons.
///
/// Priority is submit > review > next; `exclude` guards the last-resort
/// fallback (first enabled visible button in the dialog's action area) from
/// picking a back/close/cancel control.
#[derive(Clone, Copy, Debug)]
pub struct NavVocabulary {
    pub submit: &'static [&'static str],
    pub review: &'static [&'static str],
    pub next: &'static [&'static str],
    pub exclude: &'static [&'static str],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_kind_deserializes_from_lowercase() {
        let kind: ControlKind = serde_json::from_str("\"textarea\"").unwrap();
        assert_eq!(kind, ControlKind::Textarea);
        assert!(kind.is_textual());
        let kind: ControlKind = serde_json::from_str("\"file\"").unwrap();
        assert!(!kind.is_textual());
    }

    #[test]
    fn field_group_deserializes_from_snapshot_shape() {
        let raw = r#"{
            "label": "Notice period",
            "controls": [
                {"field": {"label": "Notice period", "kind": "text", "options": []}, "handle": 3}
            ],
            "radios": []
        }"#;
        let group: FieldGroup = serde_json::from_str(raw).unwrap();
        assert_eq!(group.label, "Notice period");
        assert_eq!(group.controls.len(), 1);
        assert_eq!(group.controls[0].handle, ControlRef(3));
    }

    #[test]
    fn nav_action_deserializes_kind() {
        let action: NavAction =
            serde_json::from_str(r#"{"kind": "submit", "label": "Submit application"}"#).unwrap();
        assert_eq!(action.kind, NavKind::Submit);
    }
}

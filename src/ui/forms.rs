//! Form state for the modal dialogs: field focus management, character
//! input, and parse-and-validate before anything reaches the database.

use std::collections::BTreeMap;

use anyhow::{anyhow, Result};
use ratatui::text::{Line, Span};
use serde_json::{Map, Value};

use crate::models::{Exam, ExamPayload, Patient, Template};

use super::theme::Theme;

/// Form state for patient creation/editing.
#[derive(Default, Clone)]
pub(crate) struct PatientForm {
    pub(crate) name: String,
    pub(crate) species: String,
    pub(crate) breed: String,
    pub(crate) owner_name: String,
    pub(crate) active: PatientField,
    pub(crate) error: Option<String>,
}

/// Enumerates the fields within the patient form to drive focus management.
#[derive(Copy, Clone, PartialEq, Eq, Default)]
pub(crate) enum PatientField {
    #[default]
    Name,
    Species,
    Breed,
    Owner,
}

impl PatientForm {
    /// Populate the form from an existing patient when entering edit mode.
    pub(crate) fn from_patient(patient: &Patient) -> Self {
        Self {
            name: patient.name.clone(),
            species: patient.species.clone(),
            breed: patient.breed.clone(),
            owner_name: patient.owner_name.clone(),
            active: PatientField::Name,
            error: None,
        }
    }

    /// Cycle focus across the four fields.
    pub(crate) fn toggle_field(&mut self) {
        self.active = match self.active {
            PatientField::Name => PatientField::Species,
            PatientField::Species => PatientField::Breed,
            PatientField::Breed => PatientField::Owner,
            PatientField::Owner => PatientField::Name,
        };
    }

    /// Insert a character into the active field.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            PatientField::Name => self.name.push(ch),
            PatientField::Species => self.species.push(ch),
            PatientField::Breed => self.breed.push(ch),
            PatientField::Owner => self.owner_name.push(ch),
        }
        true
    }

    /// Remove the last character from the active field.
    pub(crate) fn backspace(&mut self) {
        match self.active {
            PatientField::Name => {
                self.name.pop();
            }
            PatientField::Species => {
                self.species.pop();
            }
            PatientField::Breed => {
                self.breed.pop();
            }
            PatientField::Owner => {
                self.owner_name.pop();
            }
        }
    }

    /// Validate the inputs and return trimmed values ready for persistence.
    /// Only the name is required; the schema allows the rest to stay blank.
    pub(crate) fn parse_inputs(&self) -> Result<(String, String, String, String)> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(anyhow!("Patient name is required."));
        }
        Ok((
            name.to_string(),
            self.species.trim().to_string(),
            self.breed.trim().to_string(),
            self.owner_name.trim().to_string(),
        ))
    }

    fn field_value(&self, field: PatientField) -> &String {
        match field {
            PatientField::Name => &self.name,
            PatientField::Species => &self.species,
            PatientField::Breed => &self.breed,
            PatientField::Owner => &self.owner_name,
        }
    }

    /// Render a single labeled line for the form widget.
    pub(crate) fn build_line(
        &self,
        field_name: &str,
        field: PatientField,
        theme: &Theme,
    ) -> Line<'static> {
        build_field_line(
            field_name,
            self.field_value(field),
            self.active == field,
            field == PatientField::Name,
            theme,
        )
    }

    /// Return the character count for the requested field.
    pub(crate) fn value_len(&self, field: PatientField) -> usize {
        self.field_value(field).chars().count()
    }
}

/// Form state for exam creation/editing. Measurements and unmodeled payload
/// keys are not edited here; the form carries them through untouched so
/// saving an edit never drops payload data it does not understand.
#[derive(Default, Clone)]
pub(crate) struct ExamForm {
    pub(crate) exam_type: String,
    pub(crate) findings: String,
    pub(crate) notes: String,
    pub(crate) measurements: BTreeMap<String, f64>,
    pub(crate) extra: Map<String, Value>,
    pub(crate) active: ExamField,
    pub(crate) error: Option<String>,
}

#[derive(Copy, Clone, PartialEq, Eq, Default)]
pub(crate) enum ExamField {
    #[default]
    ExamType,
    Findings,
    Notes,
}

impl ExamForm {
    /// Populate the form from an existing exam when entering edit mode.
    pub(crate) fn from_exam(exam: &Exam) -> Self {
        let payload = ExamPayload::from_value(&exam.data);
        Self {
            exam_type: exam.exam_type.clone(),
            findings: payload.findings,
            notes: payload.notes,
            measurements: payload.measurements,
            extra: payload.extra,
            active: ExamField::ExamType,
            error: None,
        }
    }

    pub(crate) fn toggle_field(&mut self) {
        self.active = match self.active {
            ExamField::ExamType => ExamField::Findings,
            ExamField::Findings => ExamField::Notes,
            ExamField::Notes => ExamField::ExamType,
        };
    }

    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            ExamField::ExamType => self.exam_type.push(ch),
            ExamField::Findings => self.findings.push(ch),
            ExamField::Notes => self.notes.push(ch),
        }
        true
    }

    pub(crate) fn backspace(&mut self) {
        match self.active {
            ExamField::ExamType => {
                self.exam_type.pop();
            }
            ExamField::Findings => {
                self.findings.pop();
            }
            ExamField::Notes => {
                self.notes.pop();
            }
        }
    }

    /// Append a template's content to the notes field, separated from any
    /// existing text by a blank line.
    pub(crate) fn apply_template(&mut self, content: &str) {
        if !self.notes.trim().is_empty() {
            self.notes.push_str("\n\n");
        }
        self.notes.push_str(content);
    }

    /// Validate and assemble the exam type plus the payload to store.
    pub(crate) fn parse_inputs(&self) -> Result<(String, ExamPayload)> {
        let exam_type = self.exam_type.trim();
        if exam_type.is_empty() {
            return Err(anyhow!("Exam type is required."));
        }
        let payload = ExamPayload {
            notes: self.notes.trim().to_string(),
            findings: self.findings.trim().to_string(),
            measurements: self.measurements.clone(),
            extra: self.extra.clone(),
        };
        Ok((exam_type.to_string(), payload))
    }

    fn field_value(&self, field: ExamField) -> &String {
        match field {
            ExamField::ExamType => &self.exam_type,
            ExamField::Findings => &self.findings,
            ExamField::Notes => &self.notes,
        }
    }

    pub(crate) fn build_line(
        &self,
        field_name: &str,
        field: ExamField,
        theme: &Theme,
    ) -> Line<'static> {
        build_field_line(
            field_name,
            self.field_value(field),
            self.active == field,
            field == ExamField::ExamType,
            theme,
        )
    }

    pub(crate) fn value_len(&self, field: ExamField) -> usize {
        self.field_value(field).chars().count()
    }
}

/// Form state for template creation/editing.
#[derive(Default, Clone)]
pub(crate) struct TemplateForm {
    pub(crate) name: String,
    pub(crate) content: String,
    pub(crate) active: TemplateField,
    pub(crate) error: Option<String>,
}

#[derive(Copy, Clone, PartialEq, Eq, Default)]
pub(crate) enum TemplateField {
    #[default]
    Name,
    Content,
}

impl TemplateForm {
    pub(crate) fn from_template(template: &Template) -> Self {
        Self {
            name: template.name.clone(),
            content: template.content.clone(),
            active: TemplateField::Name,
            error: None,
        }
    }

    pub(crate) fn toggle_field(&mut self) {
        self.active = match self.active {
            TemplateField::Name => TemplateField::Content,
            TemplateField::Content => TemplateField::Name,
        };
    }

    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            TemplateField::Name => self.name.push(ch),
            TemplateField::Content => self.content.push(ch),
        }
        true
    }

    pub(crate) fn backspace(&mut self) {
        match self.active {
            TemplateField::Name => {
                self.name.pop();
            }
            TemplateField::Content => {
                self.content.pop();
            }
        }
    }

    /// Both columns are NOT NULL in the schema, so both fields are required.
    pub(crate) fn parse_inputs(&self) -> Result<(String, String)> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(anyhow!("Template name is required."));
        }
        let content = self.content.trim();
        if content.is_empty() {
            return Err(anyhow!("Template content is required."));
        }
        Ok((name.to_string(), content.to_string()))
    }

    fn field_value(&self, field: TemplateField) -> &String {
        match field {
            TemplateField::Name => &self.name,
            TemplateField::Content => &self.content,
        }
    }

    pub(crate) fn build_line(
        &self,
        field_name: &str,
        field: TemplateField,
        theme: &Theme,
    ) -> Line<'static> {
        build_field_line(
            field_name,
            self.field_value(field),
            self.active == field,
            true,
            theme,
        )
    }

    pub(crate) fn value_len(&self, field: TemplateField) -> usize {
        self.field_value(field).chars().count()
    }
}

/// Form state for editing or adding a setting. When editing an existing
/// setting the key is fixed and focus stays on the value.
#[derive(Default, Clone)]
pub(crate) struct SettingForm {
    pub(crate) key: String,
    pub(crate) value: String,
    pub(crate) key_editable: bool,
    pub(crate) active: SettingField,
    pub(crate) error: Option<String>,
}

#[derive(Copy, Clone, PartialEq, Eq, Default)]
pub(crate) enum SettingField {
    #[default]
    Key,
    Value,
}

impl SettingForm {
    /// Build the form for a brand new setting, with the key editable.
    pub(crate) fn new_entry() -> Self {
        Self {
            key_editable: true,
            ..Self::default()
        }
    }

    /// Build the form for an existing key; only the value can change.
    pub(crate) fn from_pair(key: &str, value: &str) -> Self {
        Self {
            key: key.to_string(),
            value: value.to_string(),
            key_editable: false,
            active: SettingField::Value,
            error: None,
        }
    }

    pub(crate) fn toggle_field(&mut self) {
        if !self.key_editable {
            return;
        }
        self.active = match self.active {
            SettingField::Key => SettingField::Value,
            SettingField::Value => SettingField::Key,
        };
    }

    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            SettingField::Key => self.key.push(ch),
            SettingField::Value => self.value.push(ch),
        }
        true
    }

    pub(crate) fn backspace(&mut self) {
        match self.active {
            SettingField::Key => {
                self.key.pop();
            }
            SettingField::Value => {
                self.value.pop();
            }
        }
    }

    pub(crate) fn parse_inputs(&self) -> Result<(String, String)> {
        let key = self.key.trim();
        if key.is_empty() {
            return Err(anyhow!("Setting key is required."));
        }
        Ok((key.to_string(), self.value.trim().to_string()))
    }

    fn field_value(&self, field: SettingField) -> &String {
        match field {
            SettingField::Key => &self.key,
            SettingField::Value => &self.value,
        }
    }

    pub(crate) fn build_line(
        &self,
        field_name: &str,
        field: SettingField,
        theme: &Theme,
    ) -> Line<'static> {
        build_field_line(
            field_name,
            self.field_value(field),
            self.active == field,
            field == SettingField::Key,
            theme,
        )
    }

    pub(crate) fn value_len(&self, field: SettingField) -> usize {
        self.field_value(field).chars().count()
    }
}

/// Confirmation state for deleting a patient, carrying the display data the
/// dialog needs. Deleting cascades to the patient's exams, so the dialog
/// spells that out.
#[derive(Clone)]
pub(crate) struct ConfirmPatientDelete {
    pub(crate) id: i64,
    pub(crate) name: String,
}

impl ConfirmPatientDelete {
    pub(crate) fn from(patient: Patient) -> Self {
        Self {
            id: patient.id,
            name: patient.name,
        }
    }
}

#[derive(Clone)]
pub(crate) struct ConfirmExamDelete {
    pub(crate) id: i64,
    pub(crate) label: String,
}

impl ConfirmExamDelete {
    pub(crate) fn from(exam: &Exam) -> Self {
        Self {
            id: exam.id,
            label: exam.display_label(),
        }
    }
}

#[derive(Clone)]
pub(crate) struct ConfirmTemplateDelete {
    pub(crate) id: i64,
    pub(crate) name: String,
}

impl ConfirmTemplateDelete {
    pub(crate) fn from(template: &Template) -> Self {
        Self {
            id: template.id,
            name: template.name.clone(),
        }
    }
}

/// Shared renderer for one labeled form line: highlight the active field,
/// dim empty values, and mark required fields with a placeholder.
fn build_field_line(
    field_name: &str,
    value: &str,
    is_active: bool,
    required: bool,
    theme: &Theme,
) -> Line<'static> {
    let display = if value.is_empty() {
        if required {
            "<required>".to_string()
        } else {
            "<blank>".to_string()
        }
    } else {
        value.to_string()
    };

    let style = if is_active {
        theme.active_field()
    } else if value.is_empty() {
        theme.muted()
    } else {
        theme.text()
    };

    Line::from(vec![
        Span::raw(format!("{field_name}: ")),
        Span::styled(display, style),
    ])
}

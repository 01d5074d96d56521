//! Per-screen state containers. Each routed view keeps its own selection and
//! cached rows here so `App` stays focused on dispatch and rendering.

use std::collections::HashMap;

use crate::models::{Exam, ReferenceValue, Template};

/// Which pane of the home screen owns the arrow keys.
#[derive(Copy, Clone, PartialEq, Eq)]
pub(crate) enum HomePane {
    Patients,
    Exams,
}

/// State for the home screen: the exam list of the currently selected
/// patient. The patient list itself is the app-wide cache held by `App`.
pub(crate) struct HomeScreen {
    pub(crate) exams: Vec<Exam>,
    pub(crate) exam_selected: usize,
    pub(crate) focus: HomePane,
}

impl HomeScreen {
    pub(crate) fn new(exams: Vec<Exam>) -> Self {
        Self {
            exams,
            exam_selected: 0,
            focus: HomePane::Patients,
        }
    }

    /// Replace the exam list after the patient selection changed or an exam
    /// was added or removed, keeping the cursor in bounds.
    pub(crate) fn set_exams(&mut self, exams: Vec<Exam>) {
        self.exams = exams;
        self.ensure_in_bounds();
    }

    pub(crate) fn move_exam_selection(&mut self, delta: isize) {
        if self.exams.is_empty() {
            self.exam_selected = 0;
            return;
        }
        let last = self.exams.len() - 1;
        let next = self.exam_selected as isize + delta;
        self.exam_selected = next.clamp(0, last as isize) as usize;
    }

    pub(crate) fn current_exam(&self) -> Option<&Exam> {
        self.exams.get(self.exam_selected)
    }

    pub(crate) fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            HomePane::Patients => HomePane::Exams,
            HomePane::Exams => HomePane::Patients,
        };
    }

    fn ensure_in_bounds(&mut self) {
        if self.exams.is_empty() {
            self.exam_selected = 0;
        } else if self.exam_selected >= self.exams.len() {
            self.exam_selected = self.exams.len() - 1;
        }
    }
}

/// State for the single-exam detail view, parameterized by the exam that was
/// opened. Carries the owning patient's display data and the reference
/// ranges that apply to this exam type and species.
pub(crate) struct ExamDetailScreen {
    pub(crate) exam: Exam,
    pub(crate) patient_name: String,
    pub(crate) species: String,
    pub(crate) references: Vec<ReferenceValue>,
}

impl ExamDetailScreen {
    pub(crate) fn new(
        exam: Exam,
        patient_name: String,
        species: String,
        references: Vec<ReferenceValue>,
    ) -> Self {
        Self {
            exam,
            patient_name,
            species,
            references,
        }
    }

    /// Find the normal range declared for a named measurement, if any.
    pub(crate) fn reference_for(&self, measurement: &str) -> Option<&ReferenceValue> {
        self.references
            .iter()
            .find(|reference| reference.measurement == measurement)
    }
}

/// Which pane of the settings screen owns the arrow keys.
#[derive(Copy, Clone, PartialEq, Eq)]
pub(crate) enum SettingsPane {
    Settings,
    Templates,
}

/// State for the settings screen: the key/value settings plus the template
/// library, side by side.
pub(crate) struct SettingsScreen {
    pub(crate) settings: Vec<(String, String)>,
    pub(crate) templates: Vec<Template>,
    pub(crate) pane: SettingsPane,
    pub(crate) setting_selected: usize,
    pub(crate) template_selected: usize,
}

impl SettingsScreen {
    pub(crate) fn new(settings: &HashMap<String, String>, templates: Vec<Template>) -> Self {
        let mut screen = Self {
            settings: Vec::new(),
            templates,
            pane: SettingsPane::Settings,
            setting_selected: 0,
            template_selected: 0,
        };
        screen.set_settings(settings);
        screen
    }

    /// Rebuild the sorted key/value rows from the settings map.
    pub(crate) fn set_settings(&mut self, settings: &HashMap<String, String>) {
        let mut rows: Vec<(String, String)> = settings
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        rows.sort_by(|a, b| a.0.cmp(&b.0));
        self.settings = rows;
        self.ensure_in_bounds();
    }

    pub(crate) fn set_templates(&mut self, templates: Vec<Template>) {
        self.templates = templates;
        self.ensure_in_bounds();
    }

    pub(crate) fn toggle_pane(&mut self) {
        self.pane = match self.pane {
            SettingsPane::Settings => SettingsPane::Templates,
            SettingsPane::Templates => SettingsPane::Settings,
        };
    }

    pub(crate) fn move_selection(&mut self, delta: isize) {
        let (selected, len) = match self.pane {
            SettingsPane::Settings => (&mut self.setting_selected, self.settings.len()),
            SettingsPane::Templates => (&mut self.template_selected, self.templates.len()),
        };
        if len == 0 {
            *selected = 0;
            return;
        }
        let next = *selected as isize + delta;
        *selected = next.clamp(0, len as isize - 1) as usize;
    }

    pub(crate) fn current_setting(&self) -> Option<&(String, String)> {
        self.settings.get(self.setting_selected)
    }

    pub(crate) fn current_template(&self) -> Option<&Template> {
        self.templates.get(self.template_selected)
    }

    fn ensure_in_bounds(&mut self) {
        if self.settings.is_empty() {
            self.setting_selected = 0;
        } else if self.setting_selected >= self.settings.len() {
            self.setting_selected = self.settings.len() - 1;
        }
        if self.templates.is_empty() {
            self.template_selected = 0;
        } else if self.template_selected >= self.templates.len() {
            self.template_selected = self.templates.len() - 1;
        }
    }
}

/// Overlay state for choosing a template to insert into an exam's notes.
pub(crate) struct TemplatePicker {
    pub(crate) templates: Vec<Template>,
    pub(crate) selected: usize,
}

impl TemplatePicker {
    pub(crate) fn new(templates: Vec<Template>) -> Self {
        Self {
            templates,
            selected: 0,
        }
    }

    pub(crate) fn move_selection(&mut self, delta: isize) {
        if self.templates.is_empty() {
            self.selected = 0;
            return;
        }
        let next = self.selected as isize + delta;
        self.selected = next.clamp(0, self.templates.len() as isize - 1) as usize;
    }

    pub(crate) fn current(&self) -> Option<&Template> {
        self.templates.get(self.selected)
    }
}

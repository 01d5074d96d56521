use std::collections::HashMap;
use std::mem;

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap};
use ratatui::Frame;

use crate::db::Database;
use crate::models::{ExamPayload, Patient, Template};

use super::forms::{
    ConfirmExamDelete, ConfirmPatientDelete, ConfirmTemplateDelete, ExamField, ExamForm,
    PatientField, PatientForm, SettingField, SettingForm, TemplateField, TemplateForm,
};
use super::helpers::{centered_rect, surface_error, truncate_for_list};
use super::screens::{
    ExamDetailScreen, HomePane, HomeScreen, SettingsPane, SettingsScreen, TemplatePicker,
};
use super::theme::{Theme, THEME_SETTING_KEY};

/// Footer space reserved for the toast message and key hints.
const FOOTER_HEIGHT: u16 = 3;

/// High-level navigation states: the three routed views of the application.
enum Screen {
    Home(HomeScreen),
    ExamDetail(ExamDetailScreen),
    Settings(SettingsScreen),
}

/// Fine-grained modal states layered over the current screen.
enum Mode {
    Normal,
    AddingPatient(PatientForm),
    EditingPatient { id: i64, form: PatientForm },
    ConfirmPatientDelete(ConfirmPatientDelete),
    CreatingExam { patient_id: i64, form: ExamForm },
    EditingExam { exam_id: i64, form: ExamForm },
    ConfirmExamDelete(ConfirmExamDelete),
    PickingTemplate(TemplatePicker),
    EditingSetting(SettingForm),
    AddingTemplate(TemplateForm),
    EditingTemplate { id: i64, form: TemplateForm },
    ConfirmTemplateDelete(ConfirmTemplateDelete),
}

/// Transient footer notification plus its severity.
struct Toast {
    text: String,
    kind: ToastKind,
}

#[derive(Copy, Clone)]
enum ToastKind {
    Info,
    Error,
}

impl ToastKind {
    fn style(self, theme: &Theme) -> ratatui::style::Style {
        match self {
            ToastKind::Info => theme.info(),
            ToastKind::Error => theme.error(),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App {
    db: Database,
    patients: Vec<Patient>,
    selected: usize,
    settings: HashMap<String, String>,
    theme: Theme,
    screen: Screen,
    mode: Mode,
    toast: Option<Toast>,
}

impl App {
    /// Assemble the shell around an opened store. Loads the exam list for the
    /// initially selected patient so the home screen renders complete on the
    /// first frame.
    pub fn new(
        db: Database,
        patients: Vec<Patient>,
        settings: HashMap<String, String>,
    ) -> Result<Self> {
        let theme = Theme::from_setting(settings.get(THEME_SETTING_KEY).map(String::as_str));
        let exams = match patients.first() {
            Some(patient) => db.list_exams_for_patient(patient.id)?,
            None => Vec::new(),
        };
        Ok(Self {
            db,
            patients,
            selected: 0,
            settings,
            theme,
            screen: Screen::Home(HomeScreen::new(exams)),
            mode: Mode::Normal,
            toast: None,
        })
    }

    pub(crate) fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mut mode = mem::replace(&mut self.mode, Mode::Normal);

        mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::AddingPatient(form) => self.handle_add_patient(code, form)?,
            Mode::EditingPatient { id, form } => self.handle_edit_patient(code, id, form)?,
            Mode::ConfirmPatientDelete(confirm) => {
                self.handle_confirm_patient_delete(code, confirm)?
            }
            Mode::CreatingExam { patient_id, form } => {
                self.handle_create_exam(code, patient_id, form)?
            }
            Mode::EditingExam { exam_id, form } => self.handle_edit_exam(code, exam_id, form)?,
            Mode::ConfirmExamDelete(confirm) => self.handle_confirm_exam_delete(code, confirm)?,
            Mode::PickingTemplate(picker) => self.handle_pick_template(code, picker)?,
            Mode::EditingSetting(form) => self.handle_edit_setting(code, form)?,
            Mode::AddingTemplate(form) => self.handle_add_template(code, form)?,
            Mode::EditingTemplate { id, form } => self.handle_edit_template(code, id, form)?,
            Mode::ConfirmTemplateDelete(confirm) => {
                self.handle_confirm_template_delete(code, confirm)?
            }
        };

        self.mode = mode;
        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        if matches!(self.screen, Screen::Home(_)) {
            return self.handle_home_key(code, exit);
        }
        if matches!(self.screen, Screen::ExamDetail(_)) {
            return self.handle_detail_key(code, exit);
        }
        self.handle_settings_key(code, exit)
    }

    fn handle_home_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        let mut move_patient: Option<isize> = None;
        let mut open_exam: Option<i64> = None;
        let mut open_settings = false;
        let mut no_patient_message: Option<&'static str> = None;

        if let Screen::Home(home) = &mut self.screen {
            match code {
                KeyCode::Char('q') => {
                    *exit = true;
                }
                KeyCode::Esc => {
                    if home.focus == HomePane::Exams {
                        home.focus = HomePane::Patients;
                    } else {
                        *exit = true;
                    }
                }
                KeyCode::Tab | KeyCode::BackTab => home.toggle_focus(),
                KeyCode::Up => match home.focus {
                    HomePane::Patients => move_patient = Some(-1),
                    HomePane::Exams => home.move_exam_selection(-1),
                },
                KeyCode::Down => match home.focus {
                    HomePane::Patients => move_patient = Some(1),
                    HomePane::Exams => home.move_exam_selection(1),
                },
                KeyCode::Enter => match home.focus {
                    HomePane::Patients => {
                        if home.exams.is_empty() {
                            no_patient_message = Some("No exams for this patient yet.");
                        } else {
                            home.focus = HomePane::Exams;
                        }
                    }
                    HomePane::Exams => open_exam = home.current_exam().map(|exam| exam.id),
                },
                KeyCode::Char('+') => {
                    self.clear_toast();
                    return Ok(Mode::AddingPatient(PatientForm::default()));
                }
                KeyCode::Char('e') | KeyCode::Char('E') => {
                    if let Some(patient) = self.patients.get(self.selected) {
                        let form = PatientForm::from_patient(patient);
                        let id = patient.id;
                        self.clear_toast();
                        return Ok(Mode::EditingPatient { id, form });
                    }
                    no_patient_message = Some("No patient selected to edit.");
                }
                KeyCode::Char('-') => {
                    if let Some(patient) = self.patients.get(self.selected) {
                        let confirm = ConfirmPatientDelete::from(patient.clone());
                        self.clear_toast();
                        return Ok(Mode::ConfirmPatientDelete(confirm));
                    }
                    no_patient_message = Some("No patient selected to remove.");
                }
                KeyCode::Char('n') | KeyCode::Char('N') => {
                    if let Some(patient) = self.patients.get(self.selected) {
                        let patient_id = patient.id;
                        self.clear_toast();
                        return Ok(Mode::CreatingExam {
                            patient_id,
                            form: ExamForm::default(),
                        });
                    }
                    no_patient_message = Some("Add a patient before recording an exam.");
                }
                KeyCode::Char('s') | KeyCode::Char('S') => open_settings = true,
                _ => {}
            }
        }

        if let Some(delta) = move_patient {
            self.move_patient_selection(delta)?;
        }
        if open_settings {
            self.clear_toast();
            self.open_settings()?;
        }
        if let Some(exam_id) = open_exam {
            self.clear_toast();
            self.open_exam_detail(exam_id)?;
        }
        if let Some(message) = no_patient_message {
            self.set_toast(message, ToastKind::Error);
        }
        Ok(Mode::Normal)
    }

    fn handle_detail_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Char('q') => {
                *exit = true;
                Ok(Mode::Normal)
            }
            KeyCode::Esc => {
                self.clear_toast();
                self.open_home()?;
                Ok(Mode::Normal)
            }
            KeyCode::Char('e') | KeyCode::Char('E') => {
                if let Screen::ExamDetail(detail) = &self.screen {
                    let form = ExamForm::from_exam(&detail.exam);
                    let exam_id = detail.exam.id;
                    self.clear_toast();
                    return Ok(Mode::EditingExam { exam_id, form });
                }
                Ok(Mode::Normal)
            }
            KeyCode::Char('t') | KeyCode::Char('T') => {
                let templates = self.db.list_templates()?;
                if templates.is_empty() {
                    self.set_toast(
                        "No templates yet. Add one from the settings screen.",
                        ToastKind::Info,
                    );
                    return Ok(Mode::Normal);
                }
                self.clear_toast();
                Ok(Mode::PickingTemplate(TemplatePicker::new(templates)))
            }
            KeyCode::Char('-') => {
                if let Screen::ExamDetail(detail) = &self.screen {
                    let confirm = ConfirmExamDelete::from(&detail.exam);
                    self.clear_toast();
                    return Ok(Mode::ConfirmExamDelete(confirm));
                }
                Ok(Mode::Normal)
            }
            _ => Ok(Mode::Normal),
        }
    }

    fn handle_settings_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        let mut toggle_theme = false;
        let mut go_home = false;
        let mut settings_pane_message: Option<&'static str> = None;

        if let Screen::Settings(settings) = &mut self.screen {
            match code {
                KeyCode::Char('q') => {
                    *exit = true;
                }
                KeyCode::Esc => go_home = true,
                KeyCode::Tab | KeyCode::BackTab => settings.toggle_pane(),
                KeyCode::Up => settings.move_selection(-1),
                KeyCode::Down => settings.move_selection(1),
                KeyCode::Char('e') | KeyCode::Char('E') => match settings.pane {
                    SettingsPane::Settings => {
                        if let Some((key, value)) = settings.current_setting() {
                            let form = SettingForm::from_pair(key, value);
                            self.clear_toast();
                            return Ok(Mode::EditingSetting(form));
                        }
                        settings_pane_message = Some("No setting selected to edit.");
                    }
                    SettingsPane::Templates => {
                        if let Some(template) = settings.current_template() {
                            let id = template.id;
                            let form = TemplateForm::from_template(template);
                            self.clear_toast();
                            return Ok(Mode::EditingTemplate { id, form });
                        }
                        settings_pane_message = Some("No template selected to edit.");
                    }
                },
                KeyCode::Char('+') => match settings.pane {
                    SettingsPane::Settings => {
                        self.clear_toast();
                        return Ok(Mode::EditingSetting(SettingForm::new_entry()));
                    }
                    SettingsPane::Templates => {
                        self.clear_toast();
                        return Ok(Mode::AddingTemplate(TemplateForm::default()));
                    }
                },
                KeyCode::Char('-') => match settings.pane {
                    SettingsPane::Settings => {
                        settings_pane_message = Some("Settings can be edited but not removed.");
                    }
                    SettingsPane::Templates => {
                        if let Some(template) = settings.current_template() {
                            let confirm = ConfirmTemplateDelete::from(template);
                            self.clear_toast();
                            return Ok(Mode::ConfirmTemplateDelete(confirm));
                        }
                        settings_pane_message = Some("No template selected to remove.");
                    }
                },
                KeyCode::Char('d') | KeyCode::Char('D') => toggle_theme = true,
                _ => {}
            }
        }

        if toggle_theme {
            self.toggle_theme()?;
        }
        if go_home {
            self.clear_toast();
            self.open_home()?;
        }
        if let Some(message) = settings_pane_message {
            self.set_toast(message, ToastKind::Error);
        }
        Ok(Mode::Normal)
    }

    // --- modal handlers -------------------------------------------------

    fn handle_add_patient(&mut self, code: KeyCode, mut form: PatientForm) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_toast("Add patient cancelled.", ToastKind::Info);
                keep_open = false;
            }
            KeyCode::Tab | KeyCode::BackTab => form.toggle_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_new_patient(&form) {
                Ok(()) => keep_open = false,
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_toast(message, ToastKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            Ok(Mode::AddingPatient(form))
        } else {
            Ok(Mode::Normal)
        }
    }

    fn handle_edit_patient(
        &mut self,
        code: KeyCode,
        id: i64,
        mut form: PatientForm,
    ) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_toast("Edit cancelled.", ToastKind::Info);
                keep_open = false;
            }
            KeyCode::Tab | KeyCode::BackTab => form.toggle_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_existing_patient(id, &form) {
                Ok(()) => keep_open = false,
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_toast(message, ToastKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            Ok(Mode::EditingPatient { id, form })
        } else {
            Ok(Mode::Normal)
        }
    }

    fn handle_confirm_patient_delete(
        &mut self,
        code: KeyCode,
        confirm: ConfirmPatientDelete,
    ) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_toast("Deletion cancelled.", ToastKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                match self.perform_patient_delete(&confirm) {
                    Ok(()) => Ok(Mode::Normal),
                    Err(err) => {
                        let message = surface_error(&err);
                        self.set_toast(message, ToastKind::Error);
                        Ok(Mode::ConfirmPatientDelete(confirm))
                    }
                }
            }
            _ => Ok(Mode::ConfirmPatientDelete(confirm)),
        }
    }

    fn handle_create_exam(
        &mut self,
        code: KeyCode,
        patient_id: i64,
        mut form: ExamForm,
    ) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_toast("New exam cancelled.", ToastKind::Info);
                keep_open = false;
            }
            KeyCode::Tab | KeyCode::BackTab => form.toggle_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_new_exam(patient_id, &form) {
                Ok(()) => keep_open = false,
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_toast(message, ToastKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            Ok(Mode::CreatingExam { patient_id, form })
        } else {
            Ok(Mode::Normal)
        }
    }

    fn handle_edit_exam(&mut self, code: KeyCode, exam_id: i64, mut form: ExamForm) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_toast("Edit cancelled.", ToastKind::Info);
                keep_open = false;
            }
            KeyCode::Tab | KeyCode::BackTab => form.toggle_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_existing_exam(exam_id, &form) {
                Ok(()) => keep_open = false,
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_toast(message, ToastKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            Ok(Mode::EditingExam { exam_id, form })
        } else {
            Ok(Mode::Normal)
        }
    }

    fn handle_confirm_exam_delete(
        &mut self,
        code: KeyCode,
        confirm: ConfirmExamDelete,
    ) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_toast("Deletion cancelled.", ToastKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                match self.perform_exam_delete(&confirm) {
                    Ok(()) => Ok(Mode::Normal),
                    Err(err) => {
                        let message = surface_error(&err);
                        self.set_toast(message, ToastKind::Error);
                        Ok(Mode::ConfirmExamDelete(confirm))
                    }
                }
            }
            _ => Ok(Mode::ConfirmExamDelete(confirm)),
        }
    }

    fn handle_pick_template(&mut self, code: KeyCode, mut picker: TemplatePicker) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.set_toast("Template insert cancelled.", ToastKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Up => {
                picker.move_selection(-1);
                Ok(Mode::PickingTemplate(picker))
            }
            KeyCode::Down => {
                picker.move_selection(1);
                Ok(Mode::PickingTemplate(picker))
            }
            KeyCode::Enter => {
                let Some(template) = picker.current().cloned() else {
                    return Ok(Mode::PickingTemplate(picker));
                };
                match self.apply_template_to_exam(&template) {
                    Ok(()) => Ok(Mode::Normal),
                    Err(err) => {
                        let message = surface_error(&err);
                        self.set_toast(message, ToastKind::Error);
                        Ok(Mode::PickingTemplate(picker))
                    }
                }
            }
            _ => Ok(Mode::PickingTemplate(picker)),
        }
    }

    fn handle_edit_setting(&mut self, code: KeyCode, mut form: SettingForm) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_toast("Setting edit cancelled.", ToastKind::Info);
                keep_open = false;
            }
            KeyCode::Tab | KeyCode::BackTab => form.toggle_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_setting_form(&form) {
                Ok(()) => keep_open = false,
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_toast(message, ToastKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            Ok(Mode::EditingSetting(form))
        } else {
            Ok(Mode::Normal)
        }
    }

    fn handle_add_template(&mut self, code: KeyCode, mut form: TemplateForm) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_toast("Add template cancelled.", ToastKind::Info);
                keep_open = false;
            }
            KeyCode::Tab | KeyCode::BackTab => form.toggle_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_new_template(&form) {
                Ok(()) => keep_open = false,
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_toast(message, ToastKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            Ok(Mode::AddingTemplate(form))
        } else {
            Ok(Mode::Normal)
        }
    }

    fn handle_edit_template(
        &mut self,
        code: KeyCode,
        id: i64,
        mut form: TemplateForm,
    ) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_toast("Edit cancelled.", ToastKind::Info);
                keep_open = false;
            }
            KeyCode::Tab | KeyCode::BackTab => form.toggle_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_existing_template(id, &form) {
                Ok(()) => keep_open = false,
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_toast(message, ToastKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            Ok(Mode::EditingTemplate { id, form })
        } else {
            Ok(Mode::Normal)
        }
    }

    fn handle_confirm_template_delete(
        &mut self,
        code: KeyCode,
        confirm: ConfirmTemplateDelete,
    ) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_toast("Deletion cancelled.", ToastKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                match self.perform_template_delete(&confirm) {
                    Ok(()) => Ok(Mode::Normal),
                    Err(err) => {
                        let message = surface_error(&err);
                        self.set_toast(message, ToastKind::Error);
                        Ok(Mode::ConfirmTemplateDelete(confirm))
                    }
                }
            }
            _ => Ok(Mode::ConfirmTemplateDelete(confirm)),
        }
    }

    // --- persistence actions --------------------------------------------

    fn save_new_patient(&mut self, form: &PatientForm) -> Result<()> {
        let (name, species, breed, owner_name) = form.parse_inputs()?;
        let patient = self
            .db
            .create_patient(&name, &species, &breed, &owner_name)?;
        self.refresh_patients()?;
        if let Some(index) = self.patients.iter().position(|p| p.id == patient.id) {
            self.selected = index;
            self.reload_home_exams()?;
        }
        self.set_toast(format!("Patient \"{name}\" added."), ToastKind::Info);
        Ok(())
    }

    fn save_existing_patient(&mut self, id: i64, form: &PatientForm) -> Result<()> {
        let (name, species, breed, owner_name) = form.parse_inputs()?;
        self.db
            .update_patient(id, &name, &species, &breed, &owner_name)?;
        self.refresh_patients()?;
        self.set_toast(format!("Patient \"{name}\" updated."), ToastKind::Info);
        Ok(())
    }

    fn perform_patient_delete(&mut self, confirm: &ConfirmPatientDelete) -> Result<()> {
        self.db.delete_patient(confirm.id)?;
        self.refresh_patients()?;
        self.set_toast(
            format!("Patient \"{}\" and their exams deleted.", confirm.name),
            ToastKind::Info,
        );
        Ok(())
    }

    fn save_new_exam(&mut self, patient_id: i64, form: &ExamForm) -> Result<()> {
        let (exam_type, payload) = form.parse_inputs()?;
        self.db
            .create_exam(patient_id, &exam_type, &payload.to_value())?;
        self.reload_home_exams()?;
        self.set_toast(format!("{exam_type} exam recorded."), ToastKind::Info);
        Ok(())
    }

    fn save_existing_exam(&mut self, exam_id: i64, form: &ExamForm) -> Result<()> {
        let (exam_type, payload) = form.parse_inputs()?;
        self.db
            .update_exam(exam_id, &exam_type, &payload.to_value())?;
        self.reload_exam_detail(exam_id)?;
        self.set_toast("Exam updated.", ToastKind::Info);
        Ok(())
    }

    fn perform_exam_delete(&mut self, confirm: &ConfirmExamDelete) -> Result<()> {
        self.db.delete_exam(confirm.id)?;
        self.open_home()?;
        self.set_toast(
            format!("Exam \"{}\" deleted.", confirm.label),
            ToastKind::Info,
        );
        Ok(())
    }

    fn apply_template_to_exam(&mut self, template: &Template) -> Result<()> {
        let Screen::ExamDetail(detail) = &self.screen else {
            return Ok(());
        };
        let exam_id = detail.exam.id;
        let mut form = ExamForm::from_exam(&detail.exam);
        form.apply_template(&template.content);
        let (exam_type, payload) = form.parse_inputs()?;
        self.db.update_exam(exam_id, &exam_type, &payload.to_value())?;
        self.reload_exam_detail(exam_id)?;
        self.set_toast(
            format!("Template \"{template}\" inserted into notes."),
            ToastKind::Info,
        );
        Ok(())
    }

    fn save_setting_form(&mut self, form: &SettingForm) -> Result<()> {
        let (key, value) = form.parse_inputs()?;
        self.db.save_setting(&key, &value)?;
        self.refresh_settings()?;
        if key == THEME_SETTING_KEY {
            self.theme = Theme::from_setting(Some(value.as_str()));
        }
        self.set_toast(format!("Setting \"{key}\" saved."), ToastKind::Info);
        Ok(())
    }

    fn toggle_theme(&mut self) -> Result<()> {
        let next = self.theme.toggled();
        self.db
            .save_setting(THEME_SETTING_KEY, next.setting_value())?;
        self.theme = next;
        self.refresh_settings()?;
        self.set_toast(
            format!("Theme switched to {}.", next.setting_value()),
            ToastKind::Info,
        );
        Ok(())
    }

    fn save_new_template(&mut self, form: &TemplateForm) -> Result<()> {
        let (name, content) = form.parse_inputs()?;
        self.db.create_template(&name, &content)?;
        self.refresh_templates()?;
        self.set_toast(format!("Template \"{name}\" added."), ToastKind::Info);
        Ok(())
    }

    fn save_existing_template(&mut self, id: i64, form: &TemplateForm) -> Result<()> {
        let (name, content) = form.parse_inputs()?;
        self.db.update_template(id, &name, &content)?;
        self.refresh_templates()?;
        self.set_toast(format!("Template \"{name}\" updated."), ToastKind::Info);
        Ok(())
    }

    fn perform_template_delete(&mut self, confirm: &ConfirmTemplateDelete) -> Result<()> {
        self.db.delete_template(confirm.id)?;
        self.refresh_templates()?;
        self.set_toast(
            format!("Template \"{}\" deleted.", confirm.name),
            ToastKind::Info,
        );
        Ok(())
    }

    // --- navigation and cache refresh -----------------------------------

    fn move_patient_selection(&mut self, delta: isize) -> Result<()> {
        if self.patients.is_empty() {
            return Ok(());
        }
        let last = self.patients.len() as isize - 1;
        let next = (self.selected as isize + delta).clamp(0, last) as usize;
        if next != self.selected {
            self.selected = next;
            self.reload_home_exams()?;
        }
        Ok(())
    }

    fn reload_home_exams(&mut self) -> Result<()> {
        let exams = match self.patients.get(self.selected) {
            Some(patient) => self.db.list_exams_for_patient(patient.id)?,
            None => Vec::new(),
        };
        if let Screen::Home(home) = &mut self.screen {
            home.set_exams(exams);
        }
        Ok(())
    }

    fn refresh_patients(&mut self) -> Result<()> {
        self.patients = self.db.list_patients()?;
        if self.selected >= self.patients.len() {
            self.selected = self.patients.len().saturating_sub(1);
        }
        if matches!(self.screen, Screen::Home(_)) {
            self.reload_home_exams()?;
        }
        Ok(())
    }

    fn refresh_settings(&mut self) -> Result<()> {
        self.settings = self.db.all_settings()?;
        if let Screen::Settings(screen) = &mut self.screen {
            screen.set_settings(&self.settings);
        }
        Ok(())
    }

    fn refresh_templates(&mut self) -> Result<()> {
        let templates = self.db.list_templates()?;
        if let Screen::Settings(screen) = &mut self.screen {
            screen.set_templates(templates);
        }
        Ok(())
    }

    fn open_home(&mut self) -> Result<()> {
        let exams = match self.patients.get(self.selected) {
            Some(patient) => self.db.list_exams_for_patient(patient.id)?,
            None => Vec::new(),
        };
        self.screen = Screen::Home(HomeScreen::new(exams));
        Ok(())
    }

    fn open_settings(&mut self) -> Result<()> {
        self.settings = self.db.all_settings()?;
        let templates = self.db.list_templates()?;
        self.screen = Screen::Settings(SettingsScreen::new(&self.settings, templates));
        Ok(())
    }

    fn open_exam_detail(&mut self, exam_id: i64) -> Result<()> {
        match self.db.get_exam(exam_id)? {
            Some(exam) => {
                let (patient_name, species) = self
                    .patients
                    .iter()
                    .find(|patient| patient.id == exam.patient_id)
                    .map(|patient| (patient.name.clone(), patient.species.clone()))
                    .unwrap_or_default();
                let references = self.db.list_reference_values(&exam.exam_type, &species)?;
                self.screen = Screen::ExamDetail(ExamDetailScreen::new(
                    exam,
                    patient_name,
                    species,
                    references,
                ));
            }
            None => self.set_toast("Exam no longer exists.", ToastKind::Error),
        }
        Ok(())
    }

    /// Re-fetch the exam shown in the detail view after a mutation. The exam
    /// type may have changed, so the reference ranges are re-queried too.
    fn reload_exam_detail(&mut self, exam_id: i64) -> Result<()> {
        if matches!(self.screen, Screen::ExamDetail(_)) {
            self.open_exam_detail(exam_id)?;
        }
        Ok(())
    }

    fn set_toast<S: Into<String>>(&mut self, text: S, kind: ToastKind) {
        self.toast = Some(Toast {
            text: text.into(),
            kind,
        });
    }

    fn clear_toast(&mut self) {
        self.toast = None;
    }

    // --- rendering -------------------------------------------------------

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        match &self.screen {
            Screen::Home(home) => self.draw_home(frame, content_area, home),
            Screen::ExamDetail(detail) => self.draw_exam_detail(frame, content_area, detail),
            Screen::Settings(settings) => self.draw_settings(frame, content_area, settings),
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::AddingPatient(form) => self.draw_patient_form(frame, area, "Add Patient", form),
            Mode::EditingPatient { form, .. } => {
                self.draw_patient_form(frame, area, "Edit Patient", form)
            }
            Mode::ConfirmPatientDelete(confirm) => self.draw_confirm(
                frame,
                area,
                "Delete Patient",
                &format!(
                    "Delete \"{}\" and every exam on record for them?",
                    confirm.name
                ),
            ),
            Mode::CreatingExam { form, .. } => self.draw_exam_form(frame, area, "New Exam", form),
            Mode::EditingExam { form, .. } => self.draw_exam_form(frame, area, "Edit Exam", form),
            Mode::ConfirmExamDelete(confirm) => self.draw_confirm(
                frame,
                area,
                "Delete Exam",
                &format!("Delete exam \"{}\"?", confirm.label),
            ),
            Mode::PickingTemplate(picker) => self.draw_template_picker(frame, area, picker),
            Mode::EditingSetting(form) => self.draw_setting_form(frame, area, form),
            Mode::AddingTemplate(form) => {
                self.draw_template_form(frame, area, "Add Template", form)
            }
            Mode::EditingTemplate { form, .. } => {
                self.draw_template_form(frame, area, "Edit Template", form)
            }
            Mode::ConfirmTemplateDelete(confirm) => self.draw_confirm(
                frame,
                area,
                "Delete Template",
                &format!("Delete template \"{}\"?", confirm.name),
            ),
            Mode::Normal => {}
        }
    }

    fn draw_home(&self, frame: &mut Frame, area: Rect, home: &HomeScreen) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(area);

        let mut patient_block = Block::default().borders(Borders::ALL).title("Patients");
        if home.focus == HomePane::Patients {
            patient_block = patient_block.border_style(self.theme.pane_focus());
        }
        if self.patients.is_empty() {
            let message = Paragraph::new("No patients yet. Press '+' to add one.")
                .alignment(Alignment::Center)
                .style(self.theme.muted())
                .block(patient_block);
            frame.render_widget(message, chunks[0]);
        } else {
            let items: Vec<ListItem> = self
                .patients
                .iter()
                .enumerate()
                .map(|(index, patient)| {
                    let style = if index == self.selected {
                        self.theme.selected()
                    } else {
                        self.theme.text()
                    };
                    let mut line = vec![Span::styled(patient.display_name(), style)];
                    if !patient.owner_name.trim().is_empty() {
                        line.push(Span::styled(
                            format!("  {}", patient.owner_name),
                            self.theme.muted(),
                        ));
                    }
                    ListItem::new(Line::from(line))
                })
                .collect();
            frame.render_widget(List::new(items).block(patient_block), chunks[0]);
        }

        let exam_title = match self.patients.get(self.selected) {
            Some(patient) => format!("Exams — {patient}"),
            None => "Exams".to_string(),
        };
        let mut exam_block = Block::default().borders(Borders::ALL).title(exam_title);
        if home.focus == HomePane::Exams {
            exam_block = exam_block.border_style(self.theme.pane_focus());
        }
        if home.exams.is_empty() {
            let message = Paragraph::new("No exams recorded. Press 'n' to add one.")
                .alignment(Alignment::Center)
                .style(self.theme.muted())
                .block(exam_block);
            frame.render_widget(message, chunks[1]);
        } else {
            let items: Vec<ListItem> = home
                .exams
                .iter()
                .enumerate()
                .map(|(index, exam)| {
                    let style = if index == home.exam_selected {
                        self.theme.selected()
                    } else {
                        self.theme.text()
                    };
                    let payload = ExamPayload::from_value(&exam.data);
                    let mut line = vec![Span::styled(exam.display_label(), style)];
                    if !payload.findings.is_empty() {
                        line.push(Span::styled(
                            format!("  {}", truncate_for_list(&payload.findings, 40)),
                            self.theme.muted(),
                        ));
                    }
                    ListItem::new(Line::from(line))
                })
                .collect();
            frame.render_widget(List::new(items).block(exam_block), chunks[1]);
        }
    }

    fn draw_exam_detail(&self, frame: &mut Frame, area: Rect, detail: &ExamDetailScreen) {
        let payload = ExamPayload::from_value(&detail.exam.data);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(6),
                Constraint::Min(4),
            ])
            .split(area);

        let species = if detail.species.trim().is_empty() {
            "unknown species".to_string()
        } else {
            detail.species.clone()
        };
        let mut header_lines = vec![
            Line::from(vec![
                Span::styled("Patient: ", self.theme.muted()),
                Span::styled(
                    format!("{} ({species})", detail.patient_name),
                    self.theme.text(),
                ),
            ]),
            Line::from(vec![
                Span::styled("Type: ", self.theme.muted()),
                Span::styled(detail.exam.exam_type.clone(), self.theme.text()),
            ]),
            Line::from(vec![
                Span::styled("Recorded: ", self.theme.muted()),
                Span::styled(detail.exam.created_at.clone(), self.theme.text()),
                Span::styled("   Updated: ", self.theme.muted()),
                Span::styled(detail.exam.updated_at.clone(), self.theme.text()),
            ]),
        ];
        if !payload.findings.is_empty() {
            header_lines.push(Line::from(vec![
                Span::styled("Findings: ", self.theme.muted()),
                Span::styled(payload.findings.clone(), self.theme.text()),
            ]));
        }
        let header = Paragraph::new(header_lines)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("Exam #{}", detail.exam.id)),
            );
        frame.render_widget(header, chunks[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[1]);

        let notes_text = if payload.notes.is_empty() {
            Span::styled("No notes. Press 'e' to edit.", self.theme.muted())
        } else {
            Span::styled(payload.notes.clone(), self.theme.text())
        };
        let notes = Paragraph::new(Line::from(notes_text))
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title("Notes"));
        frame.render_widget(notes, body[0]);

        let measurement_lines = self.measurement_lines(detail, &payload);
        let measurements = Paragraph::new(measurement_lines)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Measurements"));
        frame.render_widget(measurements, body[1]);
    }

    /// One line per recorded measurement, annotated with the matching normal
    /// range when the reference table declares one for this exam type and
    /// species.
    fn measurement_lines(
        &self,
        detail: &ExamDetailScreen,
        payload: &ExamPayload,
    ) -> Vec<Line<'static>> {
        if payload.measurements.is_empty() {
            return vec![Line::from(Span::styled(
                "No measurements recorded.",
                self.theme.muted(),
            ))];
        }

        payload
            .measurements
            .iter()
            .map(|(name, value)| {
                let mut spans = vec![Span::styled(
                    format!("{name}: {value}"),
                    self.theme.text(),
                )];
                if let Some(reference) = detail.reference_for(name) {
                    if !reference.unit.trim().is_empty() {
                        spans.push(Span::styled(
                            format!(" {}", reference.unit),
                            self.theme.text(),
                        ));
                    }
                    spans.push(Span::styled(
                        format!("  [{}]", reference.display_range()),
                        self.theme.muted(),
                    ));
                    let below = reference.min_value.is_some_and(|min| *value < min);
                    let above = reference.max_value.is_some_and(|max| *value > max);
                    if below || above {
                        spans.push(Span::styled(" out of range", self.theme.out_of_range()));
                    }
                }
                Line::from(spans)
            })
            .collect()
    }

    fn draw_settings(&self, frame: &mut Frame, area: Rect, settings: &SettingsScreen) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        let mut settings_block = Block::default().borders(Borders::ALL).title("Settings");
        if settings.pane == SettingsPane::Settings {
            settings_block = settings_block.border_style(self.theme.pane_focus());
        }
        if settings.settings.is_empty() {
            let message = Paragraph::new("No settings saved. Press '+' to add one.")
                .alignment(Alignment::Center)
                .style(self.theme.muted())
                .block(settings_block);
            frame.render_widget(message, chunks[0]);
        } else {
            let items: Vec<ListItem> = settings
                .settings
                .iter()
                .enumerate()
                .map(|(index, (key, value))| {
                    let style = if index == settings.setting_selected {
                        self.theme.selected()
                    } else {
                        self.theme.text()
                    };
                    ListItem::new(Line::from(vec![
                        Span::styled(key.clone(), style),
                        Span::styled(
                            format!(" = {}", truncate_for_list(value, 40)),
                            self.theme.muted(),
                        ),
                    ]))
                })
                .collect();
            frame.render_widget(List::new(items).block(settings_block), chunks[0]);
        }

        let mut template_block = Block::default().borders(Borders::ALL).title("Templates");
        if settings.pane == SettingsPane::Templates {
            template_block = template_block.border_style(self.theme.pane_focus());
        }
        if settings.templates.is_empty() {
            let message = Paragraph::new("No templates yet. Press '+' to add one.")
                .alignment(Alignment::Center)
                .style(self.theme.muted())
                .block(template_block);
            frame.render_widget(message, chunks[1]);
        } else {
            let items: Vec<ListItem> = settings
                .templates
                .iter()
                .enumerate()
                .map(|(index, template)| {
                    let style = if index == settings.template_selected {
                        self.theme.selected()
                    } else {
                        self.theme.text()
                    };
                    ListItem::new(Line::from(vec![
                        Span::styled(template.name.clone(), style),
                        Span::styled(
                            format!("  {}", truncate_for_list(&template.content, 36)),
                            self.theme.muted(),
                        ),
                    ]))
                })
                .collect();
            frame.render_widget(List::new(items).block(template_block), chunks[1]);
        }
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let toast_line = if let Some(toast) = &self.toast {
            Line::from(vec![Span::styled(
                toast.text.clone(),
                toast.kind.style(&self.theme),
            )])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![toast_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = self.theme.key_hint();
        match (&self.screen, &self.mode) {
            (_, Mode::PickingTemplate(_)) => Line::from(vec![
                Span::styled("[↑↓]", key_style),
                Span::raw(" Navigate   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Insert   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            (Screen::ExamDetail(_), _) => Line::from(vec![
                Span::styled("[e]", key_style),
                Span::raw(" Edit   "),
                Span::styled("[t]", key_style),
                Span::raw(" Insert Template   "),
                Span::styled("[-]", key_style),
                Span::raw(" Delete   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Back   "),
                Span::styled("[q]", key_style),
                Span::raw(" Quit"),
            ]),
            (Screen::Settings(_), _) => Line::from(vec![
                Span::styled("[↑↓]", key_style),
                Span::raw(" Select   "),
                Span::styled("[Tab]", key_style),
                Span::raw(" Switch Pane   "),
                Span::styled("[+]", key_style),
                Span::raw(" Add   "),
                Span::styled("[e]", key_style),
                Span::raw(" Edit   "),
                Span::styled("[-]", key_style),
                Span::raw(" Delete   "),
                Span::styled("[d]", key_style),
                Span::raw(" Theme   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Back   "),
                Span::styled("[q]", key_style),
                Span::raw(" Quit"),
            ]),
            _ => Line::from(vec![
                Span::styled("[↑↓]", key_style),
                Span::raw(" Select   "),
                Span::styled("[Tab]", key_style),
                Span::raw(" Switch Pane   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Open   "),
                Span::styled("[+]", key_style),
                Span::raw(" Add Patient   "),
                Span::styled("[e]", key_style),
                Span::raw(" Edit   "),
                Span::styled("[-]", key_style),
                Span::raw(" Remove   "),
                Span::styled("[n]", key_style),
                Span::raw(" New Exam   "),
                Span::styled("[s]", key_style),
                Span::raw(" Settings   "),
                Span::styled("[q]", key_style),
                Span::raw(" Quit"),
            ]),
        }
    }

    fn draw_patient_form(&self, frame: &mut Frame, area: Rect, title: &str, form: &PatientForm) {
        let popup_area = centered_rect(60, 45, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![
            form.build_line("Name", PatientField::Name, &self.theme),
            form.build_line("Species", PatientField::Species, &self.theme),
            form.build_line("Breed", PatientField::Breed, &self.theme),
            form.build_line("Owner", PatientField::Owner, &self.theme),
            Line::from(""),
        ];
        lines.push(self.form_footer_line(form.error.as_deref()));

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let (prefix, row) = match form.active {
            PatientField::Name => ("Name: ", 0),
            PatientField::Species => ("Species: ", 1),
            PatientField::Breed => ("Breed: ", 2),
            PatientField::Owner => ("Owner: ", 3),
        };
        let cursor_x = inner.x + prefix.len() as u16 + form.value_len(form.active) as u16;
        frame.set_cursor_position((cursor_x, inner.y + row));
    }

    fn draw_exam_form(&self, frame: &mut Frame, area: Rect, title: &str, form: &ExamForm) {
        let popup_area = centered_rect(70, 45, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![
            form.build_line("Type", ExamField::ExamType, &self.theme),
            form.build_line("Findings", ExamField::Findings, &self.theme),
            form.build_line("Notes", ExamField::Notes, &self.theme),
            Line::from(""),
        ];
        lines.push(self.form_footer_line(form.error.as_deref()));

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let (prefix, row) = match form.active {
            ExamField::ExamType => ("Type: ", 0),
            ExamField::Findings => ("Findings: ", 1),
            ExamField::Notes => ("Notes: ", 2),
        };
        let cursor_x = inner.x + prefix.len() as u16 + form.value_len(form.active) as u16;
        frame.set_cursor_position((cursor_x, inner.y + row));
    }

    fn draw_template_form(&self, frame: &mut Frame, area: Rect, title: &str, form: &TemplateForm) {
        let popup_area = centered_rect(70, 40, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![
            form.build_line("Name", TemplateField::Name, &self.theme),
            form.build_line("Content", TemplateField::Content, &self.theme),
            Line::from(""),
        ];
        lines.push(self.form_footer_line(form.error.as_deref()));

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let (prefix, row) = match form.active {
            TemplateField::Name => ("Name: ", 0),
            TemplateField::Content => ("Content: ", 1),
        };
        let cursor_x = inner.x + prefix.len() as u16 + form.value_len(form.active) as u16;
        frame.set_cursor_position((cursor_x, inner.y + row));
    }

    fn draw_setting_form(&self, frame: &mut Frame, area: Rect, form: &SettingForm) {
        let popup_area = centered_rect(60, 35, area);
        frame.render_widget(Clear, popup_area);

        let title = if form.key_editable {
            "Add Setting"
        } else {
            "Edit Setting"
        };
        let block = Block::default().title(title).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![
            form.build_line("Key", SettingField::Key, &self.theme),
            form.build_line("Value", SettingField::Value, &self.theme),
            Line::from(""),
        ];
        lines.push(self.form_footer_line(form.error.as_deref()));

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let (prefix, row) = match form.active {
            SettingField::Key => ("Key: ", 0),
            SettingField::Value => ("Value: ", 1),
        };
        let cursor_x = inner.x + prefix.len() as u16 + form.value_len(form.active) as u16;
        frame.set_cursor_position((cursor_x, inner.y + row));
    }

    fn draw_template_picker(&self, frame: &mut Frame, area: Rect, picker: &TemplatePicker) {
        let popup_area = centered_rect(60, 50, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Insert Template")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let items: Vec<ListItem> = picker
            .templates
            .iter()
            .enumerate()
            .map(|(index, template)| {
                let style = if index == picker.selected {
                    self.theme.selected()
                } else {
                    self.theme.text()
                };
                ListItem::new(Line::from(vec![
                    Span::styled(template.name.clone(), style),
                    Span::styled(
                        format!("  {}", truncate_for_list(&template.content, 40)),
                        self.theme.muted(),
                    ),
                ]))
            })
            .collect();
        frame.render_widget(List::new(items), inner);
    }

    fn draw_confirm(&self, frame: &mut Frame, area: Rect, title: &str, message: &str) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(Span::styled(message.to_string(), self.theme.text())),
            Line::from(""),
            Line::from(Span::styled(
                "Enter/y to confirm • Esc/n to cancel",
                self.theme.muted(),
            )),
        ];
        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn form_footer_line(&self, error: Option<&str>) -> Line<'static> {
        match error {
            Some(error) => Line::from(Span::styled(error.to_string(), self.theme.error())),
            None => Line::from(Span::styled(
                "Enter to save • Tab to switch • Esc to cancel",
                self.theme.muted(),
            )),
        }
    }
}

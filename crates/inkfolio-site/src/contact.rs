//! Contact form with a simulated submission.
//!
//! Submitting a valid form waits out the submit delay, shows the success
//! message for a while, then clears the form. Both waits are runtime timers
//! owned by the page, so leaving the page cancels them.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};
use std::sync::LazyLock;

use inkfolio_core::{Dispose, Runtime, TimerId, effect, on_unmount};
use inkfolio_fx::ScrollSpeedLines;
use regex::Regex;
use thiserror::Error;
use web_time::Duration;

static EMAIL_SHAPE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    Email,
    Subject,
    Message,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Name, Field::Email, Field::Subject, Field::Message];

    pub fn parse(s: &str) -> Option<Field> {
        match s {
            "name" => Some(Field::Name),
            "email" => Some(Field::Email),
            "subject" => Some(Field::Subject),
            "message" => Some(Field::Message),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("Le nom est requis")]
    NameRequired,
    #[error("L'email est requis")]
    EmailRequired,
    #[error("Format d'email invalide")]
    EmailInvalid,
    #[error("Le sujet est requis")]
    SubjectRequired,
    #[error("Le message est requis")]
    MessageRequired,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("{0} field(s) need attention")]
    Invalid(usize),
    #[error("a submission is already in progress")]
    Busy,
    #[error("the form is no longer mounted")]
    Closed,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormData {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl FormData {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Subject => &self.subject,
            Field::Message => &self.message,
        }
    }

    fn slot(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
            Field::Subject => &mut self.subject,
            Field::Message => &mut self.message,
        }
    }
}

pub fn is_email_shaped(s: &str) -> bool {
    match EMAIL_SHAPE.as_ref() {
        Some(re) => re.is_match(s),
        None => false,
    }
}

/// Every problem with `data`, at most one per field.
pub fn validate(data: &FormData) -> BTreeMap<Field, FieldError> {
    let mut errors = BTreeMap::new();
    if data.name.trim().is_empty() {
        errors.insert(Field::Name, FieldError::NameRequired);
    }
    if data.email.trim().is_empty() {
        errors.insert(Field::Email, FieldError::EmailRequired);
    } else if !is_email_shaped(&data.email) {
        errors.insert(Field::Email, FieldError::EmailInvalid);
    }
    if data.subject.trim().is_empty() {
        errors.insert(Field::Subject, FieldError::SubjectRequired);
    }
    if data.message.trim().is_empty() {
        errors.insert(Field::Message, FieldError::MessageRequired);
    }
    errors
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitPhase {
    Editing,
    /// Submit button disabled.
    Submitting,
    /// Success message showing; the form clears when it ends.
    Sent,
}

struct FormState {
    data: FormData,
    errors: BTreeMap<Field, FieldError>,
    phase: SubmitPhase,
    pending: Option<TimerId>,
    torn_down: bool,
}

pub struct ContactForm {
    rt: Runtime,
    submit_delay: Duration,
    success_for: Duration,
    state: Rc<RefCell<FormState>>,
    dispose: Dispose,
}

impl ContactForm {
    pub fn mount(rt: &Runtime, submit_delay: Duration, success_for: Duration) -> Self {
        let state = Rc::new(RefCell::new(FormState {
            data: FormData::default(),
            errors: BTreeMap::new(),
            phase: SubmitPhase::Editing,
            pending: None,
            torn_down: false,
        }));
        let dispose = {
            let rt = rt.clone();
            let weak = Rc::downgrade(&state);
            effect(move || {
                on_unmount(move || {
                    let Some(st) = weak.upgrade() else { return };
                    let mut st = st.borrow_mut();
                    st.torn_down = true;
                    if let Some(id) = st.pending.take() {
                        rt.cancel(id);
                        log::debug!("contact: pending submission cancelled");
                    }
                })
            })
        };
        Self {
            rt: rt.clone(),
            submit_delay,
            success_for,
            state,
            dispose,
        }
    }

    /// Edits a field and clears that field's error.
    pub fn set_field(&self, field: Field, value: impl Into<String>) {
        let mut st = self.state.borrow_mut();
        *st.data.slot(field) = value.into();
        st.errors.remove(&field);
    }

    pub fn data(&self) -> FormData {
        self.state.borrow().data.clone()
    }

    pub fn value(&self, field: Field) -> String {
        self.state.borrow().data.get(field).to_string()
    }

    pub fn error(&self, field: Field) -> Option<FieldError> {
        self.state.borrow().errors.get(&field).copied()
    }

    pub fn errors(&self) -> BTreeMap<Field, FieldError> {
        self.state.borrow().errors.clone()
    }

    pub fn phase(&self) -> SubmitPhase {
        self.state.borrow().phase
    }

    pub fn can_submit(&self) -> bool {
        self.phase() == SubmitPhase::Editing
    }

    pub fn submit(&self) -> Result<(), SubmitError> {
        {
            let mut st = self.state.borrow_mut();
            if st.torn_down {
                return Err(SubmitError::Closed);
            }
            if st.phase != SubmitPhase::Editing {
                return Err(SubmitError::Busy);
            }
            st.errors = validate(&st.data);
            if !st.errors.is_empty() {
                return Err(SubmitError::Invalid(st.errors.len()));
            }
            st.phase = SubmitPhase::Submitting;
        }
        log::debug!("contact: submitting");

        let rt = self.rt.clone();
        let weak = Rc::downgrade(&self.state);
        let success_for = self.success_for;
        let id = self
            .rt
            .set_timeout(self.submit_delay, move || sent(&rt, &weak, success_for));
        self.state.borrow_mut().pending = Some(id);
        Ok(())
    }

    pub fn teardown(&self) {
        self.dispose.run();
    }
}

impl Drop for ContactForm {
    fn drop(&mut self) {
        self.dispose.run();
    }
}

fn sent(rt: &Runtime, weak: &Weak<RefCell<FormState>>, success_for: Duration) {
    let Some(state) = weak.upgrade() else {
        return;
    };
    state.borrow_mut().phase = SubmitPhase::Sent;
    log::debug!("contact: message sent");

    let weak = weak.clone();
    let id = rt.set_timeout(success_for, move || {
        if let Some(state) = weak.upgrade() {
            let mut st = state.borrow_mut();
            st.pending = None;
            st.data = FormData::default();
            st.phase = SubmitPhase::Editing;
        }
    });
    state.borrow_mut().pending = Some(id);
}

pub struct ContactPage {
    form: ContactForm,
    lines: ScrollSpeedLines,
}

impl ContactPage {
    pub fn mount(rt: &Runtime, submit_delay: Duration, success_for: Duration) -> Self {
        Self {
            form: ContactForm::mount(rt, submit_delay, success_for),
            lines: ScrollSpeedLines::mount(rt),
        }
    }

    pub fn form(&self) -> &ContactForm {
        &self.form
    }

    pub fn scroll_lines(&self) -> &ScrollSpeedLines {
        &self.lines
    }

    pub fn tick(&self) {
        self.lines.tick();
    }
}

//! Entity Forms
//!
//! Each form owns a draft plus the raw text the user has typed into each
//! field. Drafts are not cleared after a submit; the next submit sends the
//! same values again unless the user edits them or calls [`Form::reset`].

mod drafts;

pub use drafts::{
    coerce_date, coerce_number, CustomerDraft, LoanDraft, PartnerDraft, DEFAULT_COMMISSION_RATE,
};

use serde_json::Value;
use std::fmt;
use thiserror::Error;

use crate::models::{Customer, EntityKind, LoanStatus, Partner};

/// Where a select field gets its choices from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectSource {
    Customers,
    Partners,
    Statuses,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Date,
    Select(SelectSource),
}

/// Static description of one form field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn new(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self { key, label, kind }
    }

    pub fn is_select(&self) -> bool {
        matches!(self.kind, FieldKind::Select(_))
    }
}

/// Form errors
#[derive(Debug, Error)]
pub enum FormError {
    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Invalid value for {field}: {value}")]
    InvalidChoice { field: String, value: String },

    #[error("Failed to encode draft: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A record being composed before submission
pub trait Draft: fmt::Debug + Send + Sync {
    /// Entity this draft creates
    fn kind(&self) -> EntityKind;

    /// Fields in display order
    fn fields(&self) -> &'static [FieldSpec];

    /// Current coerced value of a field, as input text
    fn input(&self, key: &str) -> String;

    /// Apply raw user input to one field, coercing it to the field's type
    fn set_input(&mut self, key: &str, raw: &str) -> Result<(), FormError>;

    /// JSON body to post
    fn payload(&self) -> Result<Value, FormError>;

    /// Back to the seeded defaults
    fn reset(&mut self);
}

/// One choice in a select field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    /// Value written into the draft; empty means "nothing selected"
    pub value: String,
    pub label: String,
}

impl SelectOption {
    fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Live collections the loan form's selectors are populated from
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectContext<'a> {
    pub customers: &'a [Customer],
    pub partners: &'a [Partner],
}

impl<'a> SelectContext<'a> {
    pub fn new(customers: &'a [Customer], partners: &'a [Partner]) -> Self {
        Self {
            customers,
            partners,
        }
    }

    pub fn options(&self, source: SelectSource) -> Vec<SelectOption> {
        match source {
            SelectSource::Customers => customer_options(self.customers),
            SelectSource::Partners => partner_options(self.partners),
            SelectSource::Statuses => status_options(),
        }
    }
}

/// "Select customer" followed by one entry per customer
pub fn customer_options(customers: &[Customer]) -> Vec<SelectOption> {
    std::iter::once(SelectOption::new("", "Select customer"))
        .chain(
            customers
                .iter()
                .map(|c| SelectOption::new(c.id.to_string(), c.display_name())),
        )
        .collect()
}

/// "None" followed by one entry per partner
pub fn partner_options(partners: &[Partner]) -> Vec<SelectOption> {
    std::iter::once(SelectOption::new("", "None"))
        .chain(
            partners
                .iter()
                .map(|p| SelectOption::new(p.id.to_string(), p.name.clone())),
        )
        .collect()
}

pub fn status_options() -> Vec<SelectOption> {
    LoanStatus::ALL
        .iter()
        .map(|s| SelectOption::new(s.as_str(), s.as_str()))
        .collect()
}

/// What a form hands to its submission callback
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub kind: EntityKind,
    pub payload: Value,
}

/// Editable form over a draft
#[derive(Debug)]
pub struct Form {
    draft: Box<dyn Draft>,
    buffers: Vec<String>,
    focus: usize,
}

impl Form {
    pub fn new(draft: Box<dyn Draft>) -> Self {
        let buffers = draft.fields().iter().map(|f| draft.input(f.key)).collect();
        Self {
            draft,
            buffers,
            focus: 0,
        }
    }

    pub fn customer() -> Self {
        Self::new(Box::new(CustomerDraft::default()))
    }

    pub fn partner() -> Self {
        Self::new(Box::new(PartnerDraft::default()))
    }

    pub fn loan() -> Self {
        Self::new(Box::new(LoanDraft::default()))
    }

    pub fn for_kind(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Customer => Self::customer(),
            EntityKind::Partner => Self::partner(),
            EntityKind::Loan => Self::loan(),
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.draft.kind()
    }

    pub fn title(&self) -> &'static str {
        match self.kind() {
            EntityKind::Customer => "Customer",
            EntityKind::Partner => "Partner",
            EntityKind::Loan => "Loan",
        }
    }

    pub fn fields(&self) -> &'static [FieldSpec] {
        self.draft.fields()
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn focused_field(&self) -> Option<&'static FieldSpec> {
        self.fields().get(self.focus)
    }

    pub fn set_focus(&mut self, index: usize) {
        if index < self.fields().len() {
            self.focus = index;
        }
    }

    /// Set a field from raw text, as if the user had typed it
    pub fn set(&mut self, key: &str, raw: &str) -> Result<(), FormError> {
        let index = self
            .fields()
            .iter()
            .position(|f| f.key == key)
            .ok_or_else(|| FormError::UnknownField(key.to_string()))?;
        self.draft.set_input(key, raw)?;
        self.sync_buffer(index, raw);
        Ok(())
    }

    /// Text shown in the field: the raw buffer, or the option label for selects
    pub fn display_value(&self, index: usize, ctx: &SelectContext<'_>) -> String {
        let Some(field) = self.fields().get(index) else {
            return String::new();
        };

        match field.kind {
            FieldKind::Select(source) => {
                let current = self.draft.input(field.key);
                ctx.options(source)
                    .into_iter()
                    .find(|o| o.value == current)
                    .map(|o| o.label)
                    .unwrap_or(current)
            }
            _ => self.buffers.get(index).cloned().unwrap_or_default(),
        }
    }

    /// Type one character into the focused text field
    pub fn insert_char(&mut self, c: char) {
        let Some(field) = self.focused_field() else {
            return;
        };
        if field.is_select() {
            return;
        }
        let mut raw = self.buffers.get(self.focus).cloned().unwrap_or_default();
        raw.push(c);
        if self.draft.set_input(field.key, &raw).is_ok() {
            self.sync_buffer(self.focus, &raw);
        }
    }

    pub fn backspace(&mut self) {
        let Some(field) = self.focused_field() else {
            return;
        };
        if field.is_select() {
            return;
        }
        let mut raw = self.buffers.get(self.focus).cloned().unwrap_or_default();
        raw.pop();
        if self.draft.set_input(field.key, &raw).is_ok() {
            self.sync_buffer(self.focus, &raw);
        }
    }

    /// Step the focused select field to the next or previous option
    pub fn cycle_option(&mut self, ctx: &SelectContext<'_>, forward: bool) {
        let Some(field) = self.focused_field() else {
            return;
        };
        let FieldKind::Select(source) = field.kind else {
            return;
        };

        let options = ctx.options(source);
        if options.is_empty() {
            return;
        }
        let current = self.draft.input(field.key);
        let position = options.iter().position(|o| o.value == current);
        let next = match (position, forward) {
            (None, _) => 0,
            (Some(i), true) => (i + 1) % options.len(),
            (Some(i), false) => (i + options.len() - 1) % options.len(),
        };

        if let Some(option) = options.get(next) {
            if self.draft.set_input(field.key, &option.value).is_ok() {
                self.sync_buffer(self.focus, &option.value);
            }
        }
    }

    pub fn focus_next(&mut self) {
        let len = self.fields().len();
        if len > 0 {
            self.focus = (self.focus + 1) % len;
        }
    }

    pub fn focus_previous(&mut self) {
        let len = self.fields().len();
        if len > 0 {
            self.focus = (self.focus + len - 1) % len;
        }
    }

    pub fn payload(&self) -> Result<Value, FormError> {
        self.draft.payload()
    }

    /// Hand the draft to `on_submit`. The draft itself is left as is.
    pub fn submit<R>(&self, on_submit: impl FnOnce(Submission) -> R) -> Result<R, FormError> {
        let submission = Submission {
            kind: self.kind(),
            payload: self.payload()?,
        };
        Ok(on_submit(submission))
    }

    pub fn reset(&mut self) {
        self.draft.reset();
        self.buffers = self
            .fields()
            .iter()
            .map(|f| self.draft.input(f.key))
            .collect();
        self.focus = 0;
    }

    fn sync_buffer(&mut self, index: usize, raw: &str) {
        if let Some(buffer) = self.buffers.get_mut(index) {
            *buffer = raw.to_string();
        }
    }
}

//! Terminal UI state and key handling
//!
//! Holds the current tab and one form per entity. Forms are shared between
//! the dashboard's quick-add panels and the entity tabs, so a half-typed
//! customer survives switching tabs.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::forms::{Form, Submission};
use crate::models::EntityKind;
use crate::nav::{Navigation, Tab};
use crate::store::AppState;

/// Something the event loop must do in response to a key
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    Quit,
    Refresh,
    Submit(Submission),
}

pub struct UiApp {
    nav: Navigation,
    customer_form: Form,
    partner_form: Form,
    loan_form: Form,
    /// Quick-add form with focus on the dashboard
    dashboard_form: EntityKind,
}

impl Default for UiApp {
    fn default() -> Self {
        Self::new()
    }
}

impl UiApp {
    pub fn new() -> Self {
        Self {
            nav: Navigation::new(),
            customer_form: Form::customer(),
            partner_form: Form::partner(),
            loan_form: Form::loan(),
            dashboard_form: EntityKind::Customer,
        }
    }

    pub fn current_tab(&self) -> Tab {
        self.nav.current()
    }

    pub fn form(&self, kind: EntityKind) -> &Form {
        match kind {
            EntityKind::Customer => &self.customer_form,
            EntityKind::Partner => &self.partner_form,
            EntityKind::Loan => &self.loan_form,
        }
    }

    fn form_mut(&mut self, kind: EntityKind) -> &mut Form {
        match kind {
            EntityKind::Customer => &mut self.customer_form,
            EntityKind::Partner => &mut self.partner_form,
            EntityKind::Loan => &mut self.loan_form,
        }
    }

    /// Form receiving keystrokes on the current tab
    pub fn active_kind(&self) -> EntityKind {
        match self.nav.current() {
            Tab::Dashboard => self.dashboard_form,
            Tab::Customers => EntityKind::Customer,
            Tab::Partners => EntityKind::Partner,
            Tab::Loans => EntityKind::Loan,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Option<UiAction> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let kind = self.active_kind();

        match key.code {
            KeyCode::Char('c') if ctrl => return Some(UiAction::Quit),
            KeyCode::Esc => return Some(UiAction::Quit),
            KeyCode::F(5) => return Some(UiAction::Refresh),
            KeyCode::F(n @ 1..=4) => {
                if let Some(tab) = Tab::ALL.get(usize::from(n) - 1) {
                    self.nav.select(*tab);
                }
            }
            KeyCode::Tab => self.nav.next(),
            KeyCode::BackTab => self.nav.previous(),
            KeyCode::Down => self.focus_down(),
            KeyCode::Up => self.focus_up(),
            KeyCode::Left => self.form_mut(kind).cycle_option(&state.select_context(), false),
            KeyCode::Right => self.form_mut(kind).cycle_option(&state.select_context(), true),
            KeyCode::Backspace => self.form_mut(kind).backspace(),
            KeyCode::Enter => {
                return match self.form(kind).submit(UiAction::Submit) {
                    Ok(action) => Some(action),
                    Err(e) => {
                        tracing::warn!(error = %e, "Could not submit form");
                        None
                    }
                };
            }
            KeyCode::Char(c) if !ctrl => self.form_mut(kind).insert_char(c),
            _ => {}
        }
        None
    }

    /// On the dashboard, moving past the last field hops to the other panel
    fn focus_down(&mut self) {
        let kind = self.active_kind();
        let form = self.form(kind);
        if self.nav.current() == Tab::Dashboard && form.focus() + 1 == form.fields().len() {
            self.dashboard_form = other_quick_add(kind);
            self.form_mut(self.dashboard_form).set_focus(0);
        } else {
            self.form_mut(kind).focus_next();
        }
    }

    fn focus_up(&mut self) {
        let kind = self.active_kind();
        if self.nav.current() == Tab::Dashboard && self.form(kind).focus() == 0 {
            self.dashboard_form = other_quick_add(kind);
            let form = self.form_mut(self.dashboard_form);
            let last = form.fields().len().saturating_sub(1);
            form.set_focus(last);
        } else {
            self.form_mut(kind).focus_previous();
        }
    }
}

fn other_quick_add(kind: EntityKind) -> EntityKind {
    match kind {
        EntityKind::Customer => EntityKind::Partner,
        _ => EntityKind::Customer,
    }
}

//! Entity drafts
//!
//! Local, uncommitted records behind each form. Raw user input is coerced
//! into the field's type as it arrives; the serialized draft is exactly what
//! gets posted.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use super::{Draft, FieldKind, FieldSpec, FormError, SelectSource};
use crate::models::{EntityKind, LoanStatus, RecordId};
use crate::table::raw_display;

/// Commission rate a new partner starts with (percent)
pub const DEFAULT_COMMISSION_RATE: f64 = 5.0;

const CUSTOMER_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("first_name", "First name", FieldKind::Text),
    FieldSpec::new("last_name", "Last name", FieldKind::Text),
    FieldSpec::new("email", "Email", FieldKind::Text),
    FieldSpec::new("phone", "Phone", FieldKind::Text),
    FieldSpec::new("address", "Address", FieldKind::Text),
    FieldSpec::new("city", "City", FieldKind::Text),
    FieldSpec::new("state", "State", FieldKind::Text),
    FieldSpec::new("postal_code", "Postal Code", FieldKind::Text),
];

const PARTNER_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("name", "Business/Agent Name", FieldKind::Text),
    FieldSpec::new("contact_name", "Contact Name", FieldKind::Text),
    FieldSpec::new("email", "Email", FieldKind::Text),
    FieldSpec::new("phone", "Phone", FieldKind::Text),
    FieldSpec::new("commission_rate", "Commission Rate (%)", FieldKind::Number),
];

const LOAN_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("customer_id", "Customer", FieldKind::Select(SelectSource::Customers)),
    FieldSpec::new("partner_id", "Referral Partner", FieldKind::Select(SelectSource::Partners)),
    FieldSpec::new("amount", "Amount", FieldKind::Number),
    FieldSpec::new("status", "Status", FieldKind::Select(SelectSource::Statuses)),
    FieldSpec::new("application_date", "Application Date", FieldKind::Date),
    FieldSpec::new("funded_date", "Funded Date", FieldKind::Date),
];

/// Lenient float parse: the longest numeric prefix wins, so "12abc" is 12
pub fn coerce_number(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    (1..=raw.len())
        .rev()
        .filter(|end| raw.is_char_boundary(*end))
        .find_map(|end| raw[..end].parse::<f64>().ok())
        .filter(|n| n.is_finite())
}

/// `YYYY-MM-DD` or nothing
pub fn coerce_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

fn coerce_id(raw: &str) -> Option<RecordId> {
    let raw = raw.trim();
    if raw.is_empty() {
        None
    } else {
        raw.parse().ok()
    }
}

fn unknown(key: &str) -> FormError {
    FormError::UnknownField(key.to_string())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CustomerDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

impl CustomerDraft {
    fn slot(&mut self, key: &str) -> Option<&mut String> {
        Some(match key {
            "first_name" => &mut self.first_name,
            "last_name" => &mut self.last_name,
            "email" => &mut self.email,
            "phone" => &mut self.phone,
            "address" => &mut self.address,
            "city" => &mut self.city,
            "state" => &mut self.state,
            "postal_code" => &mut self.postal_code,
            _ => return None,
        })
    }
}

impl Draft for CustomerDraft {
    fn kind(&self) -> EntityKind {
        EntityKind::Customer
    }

    fn fields(&self) -> &'static [FieldSpec] {
        CUSTOMER_FIELDS
    }

    fn input(&self, key: &str) -> String {
        match key {
            "first_name" => &self.first_name,
            "last_name" => &self.last_name,
            "email" => &self.email,
            "phone" => &self.phone,
            "address" => &self.address,
            "city" => &self.city,
            "state" => &self.state,
            "postal_code" => &self.postal_code,
            _ => return String::new(),
        }
        .clone()
    }

    fn set_input(&mut self, key: &str, raw: &str) -> Result<(), FormError> {
        let slot = self.slot(key).ok_or_else(|| unknown(key))?;
        *slot = raw.to_string();
        Ok(())
    }

    fn payload(&self) -> Result<Value, FormError> {
        Ok(serde_json::to_value(self)?)
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartnerDraft {
    pub name: String,
    pub contact_name: String,
    pub email: String,
    pub phone: String,
    pub commission_rate: f64,
}

impl Default for PartnerDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            contact_name: String::new(),
            email: String::new(),
            phone: String::new(),
            commission_rate: DEFAULT_COMMISSION_RATE,
        }
    }
}

impl Draft for PartnerDraft {
    fn kind(&self) -> EntityKind {
        EntityKind::Partner
    }

    fn fields(&self) -> &'static [FieldSpec] {
        PARTNER_FIELDS
    }

    fn input(&self, key: &str) -> String {
        match key {
            "name" => self.name.clone(),
            "contact_name" => self.contact_name.clone(),
            "email" => self.email.clone(),
            "phone" => self.phone.clone(),
            "commission_rate" => raw_display(&Value::from(self.commission_rate)),
            _ => String::new(),
        }
    }

    fn set_input(&mut self, key: &str, raw: &str) -> Result<(), FormError> {
        match key {
            "name" => self.name = raw.to_string(),
            "contact_name" => self.contact_name = raw.to_string(),
            "email" => self.email = raw.to_string(),
            "phone" => self.phone = raw.to_string(),
            "commission_rate" => self.commission_rate = coerce_number(raw).unwrap_or(0.0),
            _ => return Err(unknown(key)),
        }
        Ok(())
    }

    fn payload(&self) -> Result<Value, FormError> {
        Ok(serde_json::to_value(self)?)
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Loan draft. Unset references, amount and dates are left out of the payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoanDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner_id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    pub status: LoanStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub funded_date: Option<NaiveDate>,
}

impl Draft for LoanDraft {
    fn kind(&self) -> EntityKind {
        EntityKind::Loan
    }

    fn fields(&self) -> &'static [FieldSpec] {
        LOAN_FIELDS
    }

    fn input(&self, key: &str) -> String {
        let text = |id: &Option<RecordId>| id.as_ref().map(|id| id.to_string()).unwrap_or_default();
        let date = |d: &Option<NaiveDate>| d.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default();

        match key {
            "customer_id" => text(&self.customer_id),
            "partner_id" => text(&self.partner_id),
            "amount" => self
                .amount
                .map(|a| raw_display(&Value::from(a)))
                .unwrap_or_default(),
            "status" => self.status.to_string(),
            "application_date" => date(&self.application_date),
            "funded_date" => date(&self.funded_date),
            _ => String::new(),
        }
    }

    fn set_input(&mut self, key: &str, raw: &str) -> Result<(), FormError> {
        match key {
            "customer_id" => self.customer_id = coerce_id(raw),
            "partner_id" => self.partner_id = coerce_id(raw),
            "amount" => self.amount = coerce_number(raw),
            "status" => {
                self.status = raw.parse().map_err(|_| FormError::InvalidChoice {
                    field: key.to_string(),
                    value: raw.to_string(),
                })?
            }
            "application_date" => self.application_date = coerce_date(raw),
            "funded_date" => self.funded_date = coerce_date(raw),
            _ => return Err(unknown(key)),
        }
        Ok(())
    }

    fn payload(&self) -> Result<Value, FormError> {
        Ok(serde_json::to_value(self)?)
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_partner_defaults_commission_rate() {
        let mut draft = PartnerDraft::default();
        draft.set_input("name", "Acme Mortgage").unwrap();

        assert_eq!(
            draft.payload().unwrap(),
            json!({
                "name": "Acme Mortgage",
                "contact_name": "",
                "email": "",
                "phone": "",
                "commission_rate": 5.0
            })
        );
    }

    #[test]
    fn test_partner_invalid_rate_coalesces_to_zero() {
        let mut draft = PartnerDraft::default();
        draft.set_input("commission_rate", "abc").unwrap();
        assert_eq!(draft.commission_rate, 0.0);

        draft.set_input("commission_rate", "2.5%").unwrap();
        assert_eq!(draft.commission_rate, 2.5);
        assert_eq!(draft.input("commission_rate"), "2.5");
    }

    #[test]
    fn test_customer_sends_every_field() {
        let mut draft = CustomerDraft::default();
        draft.set_input("first_name", "Ann").unwrap();
        draft.set_input("last_name", "Lee").unwrap();

        let payload = draft.payload().unwrap();
        let object = payload.as_object().unwrap();
        assert_eq!(object.len(), 8);
        assert_eq!(object["first_name"], json!("Ann"));
        assert_eq!(object["city"], json!(""));
        assert!(!object.contains_key("id"));
        assert_eq!(draft.input("last_name"), "Lee");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let mut draft = CustomerDraft::default();
        assert!(matches!(
            draft.set_input("ssn", "123"),
            Err(FormError::UnknownField(_))
        ));
    }

    #[test]
    fn test_loan_omits_unset_fields() {
        let draft = LoanDraft::default();
        assert_eq!(draft.payload().unwrap(), json!({"status": "applied"}));
    }

    #[test]
    fn test_loan_coercion() {
        let mut draft = LoanDraft::default();
        draft.set_input("customer_id", "4").unwrap();
        draft.set_input("partner_id", "").unwrap();
        draft.set_input("amount", "250000").unwrap();
        draft.set_input("status", "funded").unwrap();
        draft.set_input("application_date", "2024-02-30").unwrap();
        draft.set_input("funded_date", "2024-03-15").unwrap();

        assert_eq!(
            draft.payload().unwrap(),
            json!({
                "customer_id": 4,
                "amount": 250000.0,
                "status": "funded",
                "funded_date": "2024-03-15"
            })
        );

        draft.set_input("amount", "lots").unwrap();
        assert_eq!(draft.amount, None);
    }

    #[test]
    fn test_loan_rejects_unknown_status() {
        let mut draft = LoanDraft::default();
        let err = draft.set_input("status", "pending").unwrap_err();
        assert!(matches!(err, FormError::InvalidChoice { .. }));
        assert_eq!(draft.status, LoanStatus::Applied);
    }

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_number("42"), Some(42.0));
        assert_eq!(coerce_number(" 3.75 "), Some(3.75));
        assert_eq!(coerce_number("12abc"), Some(12.0));
        assert_eq!(coerce_number(""), None);
        assert_eq!(coerce_number("x1"), None);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut draft = PartnerDraft::default();
        draft.set_input("commission_rate", "9").unwrap();
        draft.reset();
        assert_eq!(draft, PartnerDraft::default());
    }
}

//! Entity records
//!
//! Customers, partners and loans as returned by the backend. Every field
//! except the identity tolerates being missing or `null`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Backend-assigned identity (integer or opaque string)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(id) => write!(f, "{}", id),
            RecordId::Text(id) => f.write_str(id),
        }
    }
}

impl FromStr for RecordId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().parse::<i64>() {
            Ok(id) => RecordId::Int(id),
            Err(_) => RecordId::Text(s.to_string()),
        })
    }
}

/// The three record types the backend persists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Customer,
    Partner,
    Loan,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [EntityKind::Customer, EntityKind::Partner, EntityKind::Loan];

    /// REST collection path for this entity
    pub fn path(&self) -> &'static str {
        match self {
            EntityKind::Customer => "/api/customers",
            EntityKind::Partner => "/api/partners",
            EntityKind::Loan => "/api/loans",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::Customer => "customer",
            EntityKind::Partner => "partner",
            EntityKind::Loan => "loan",
        }
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().trim_end_matches('s') {
            "customer" => Ok(EntityKind::Customer),
            "partner" => Ok(EntityKind::Partner),
            "loan" => Ok(EntityKind::Loan),
            other => Err(format!("unknown entity: {}", other)),
        }
    }
}

/// Loan lifecycle status
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum LoanStatus {
    #[default]
    Applied,
    Approved,
    Funded,
    Rejected,
    Closed,
    /// Anything else the backend sends, kept verbatim for display
    Unknown(String),
}

impl LoanStatus {
    /// Selectable statuses, in display order
    pub const ALL: [LoanStatus; 5] = [
        LoanStatus::Applied,
        LoanStatus::Approved,
        LoanStatus::Funded,
        LoanStatus::Rejected,
        LoanStatus::Closed,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            LoanStatus::Applied => "applied",
            LoanStatus::Approved => "approved",
            LoanStatus::Funded => "funded",
            LoanStatus::Rejected => "rejected",
            LoanStatus::Closed => "closed",
            LoanStatus::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LoanStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown loan status: {}", s))
    }
}

impl Serialize for LoanStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LoanStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = match Value::deserialize(deserializer)? {
            Value::Null => return Ok(LoanStatus::default()),
            Value::String(s) => s,
            other => other.to_string(),
        };
        Ok(LoanStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == raw)
            .unwrap_or(LoanStatus::Unknown(raw)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: RecordId,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub first_name: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub last_name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub postal_code: Option<String>,
}

impl Customer {
    /// "First Last", as shown in the loan form's customer selector
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Partner {
    pub id: RecordId,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub contact_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub phone: Option<String>,
    /// Percentage, e.g. `5.0` for 5%
    #[serde(default, deserialize_with = "lenient_number")]
    pub commission_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub id: RecordId,
    #[serde(default)]
    pub customer_id: Option<RecordId>,
    #[serde(default)]
    pub partner_id: Option<RecordId>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: LoanStatus,
    #[serde(default, deserialize_with = "lenient_text")]
    pub application_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub funded_date: Option<String>,
    /// Computed by the backend; only meaningful once funded
    #[serde(default, deserialize_with = "lenient_number")]
    pub commission_amount: Option<f64>,
}

impl Loan {
    pub fn is_funded(&self) -> bool {
        self.status == LoanStatus::Funded
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Strings as-is, numbers and booleans stringified, anything else missing
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

fn text_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_text(deserializer)?.unwrap_or_default())
}

/// Numbers, or decimal strings such as `"2500.00"`
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let number = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(number.filter(|n| n.is_finite()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entity_paths() {
        assert_eq!(EntityKind::Customer.path(), "/api/customers");
        assert_eq!(EntityKind::Partner.path(), "/api/partners");
        assert_eq!(EntityKind::Loan.path(), "/api/loans");
    }

    #[test]
    fn test_entity_kind_from_str_accepts_plurals() {
        assert_eq!("customers".parse::<EntityKind>().unwrap(), EntityKind::Customer);
        assert_eq!("Partner".parse::<EntityKind>().unwrap(), EntityKind::Partner);
        assert_eq!("loans".parse::<EntityKind>().unwrap(), EntityKind::Loan);
        assert!("invoices".parse::<EntityKind>().is_err());
    }

    #[test]
    fn test_record_id_int_or_text() {
        let id: RecordId = serde_json::from_value(json!(7)).unwrap();
        assert_eq!(id, RecordId::Int(7));

        let id: RecordId = serde_json::from_value(json!("65f0c1")).unwrap();
        assert_eq!(id, RecordId::Text("65f0c1".to_string()));

        assert_eq!("12".parse::<RecordId>().unwrap(), RecordId::Int(12));
        assert_eq!(RecordId::Int(12).to_string(), "12");
    }

    #[test]
    fn test_loan_decodes_with_nulls_and_unknown_status() {
        let loan: Loan = serde_json::from_value(json!({
            "id": 3,
            "customer_id": 1,
            "partner_id": null,
            "amount": null,
            "status": "withdrawn",
            "application_date": "2024-03-01"
        }))
        .unwrap();

        assert_eq!(loan.customer_id, Some(RecordId::Int(1)));
        assert_eq!(loan.partner_id, None);
        assert_eq!(loan.amount, None);
        assert_eq!(loan.status, LoanStatus::Unknown("withdrawn".to_string()));
        assert_eq!(loan.status.to_string(), "withdrawn");
        assert!(!loan.is_funded());
        assert_eq!(serde_json::to_value(&loan).unwrap()["status"], json!("withdrawn"));
    }

    #[test]
    fn test_decimal_strings_and_scalar_text() {
        let loans: Vec<Loan> = serde_json::from_value(json!([
            {"id": 1, "amount": 1000.0, "status": "funded"},
            {"id": 2, "amount": "2500.00", "commission_amount": "125.5", "status": "funded"},
            {"id": 3, "amount": "n/a", "status": "applied"}
        ]))
        .unwrap();

        assert_eq!(loans[1].amount, Some(2500.0));
        assert_eq!(loans[1].commission_amount, Some(125.5));
        assert_eq!(loans[2].amount, None);

        let customer: Customer = serde_json::from_value(json!({
            "id": 4,
            "first_name": "Ann",
            "last_name": "Lee",
            "phone": 5551234,
            "postal_code": 94110,
            "city": {"name": "SF"}
        }))
        .unwrap();
        assert_eq!(customer.phone.as_deref(), Some("5551234"));
        assert_eq!(customer.postal_code.as_deref(), Some("94110"));
        assert_eq!(customer.city, None);

        let partner: Partner =
            serde_json::from_value(json!({"id": 5, "name": "Acme", "commission_rate": "7.25"})).unwrap();
        assert_eq!(partner.commission_rate, Some(7.25));
    }

    #[test]
    fn test_customer_null_names() {
        let customer: Customer = serde_json::from_value(json!({
            "id": 1,
            "first_name": "Ann",
            "last_name": null
        }))
        .unwrap();

        assert_eq!(customer.last_name, "");
        assert_eq!(customer.display_name(), "Ann ");
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("Funded".parse::<LoanStatus>().unwrap(), LoanStatus::Funded);
        assert!("unknown".parse::<LoanStatus>().is_err());
        assert_eq!(serde_json::to_value(LoanStatus::Approved).unwrap(), json!("approved"));
    }
}

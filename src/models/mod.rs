//! Data Model
//!
//! Backend-owned records. The client never mints identities; every record
//! it holds came back from a `GET` on the entity's collection path.

mod entities;

pub use entities::{Customer, EntityKind, Loan, LoanStatus, Partner, RecordId};

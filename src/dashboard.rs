//! Dashboard totals
//!
//! Derived figures over the loan collection. Nothing here is stored; the
//! totals are recomputed from whatever snapshot the caller holds.

use crate::models::Loan;

/// Funded-loan totals shown on the dashboard tab
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DashboardTotals {
    /// Number of loans with status `funded`
    pub funded_count: usize,
    /// Sum of `amount` over funded loans
    pub funded_amount: f64,
    /// Sum of `commission_amount` over funded loans
    pub commission: f64,
}

impl DashboardTotals {
    /// Fold a loan list into totals. Missing amounts count as zero.
    pub fn from_loans(loans: &[Loan]) -> Self {
        loans
            .iter()
            .filter(|loan| loan.is_funded())
            .fold(Self::default(), |mut totals, loan| {
                totals.funded_count += 1;
                totals.funded_amount += loan.amount.unwrap_or(0.0);
                totals.commission += loan.commission_amount.unwrap_or(0.0);
                totals
            })
    }
}

/// Format a currency amount as `$1,234.5`
///
/// Grouped thousands, at most three fractional digits, trailing zeros
/// dropped.
pub fn format_money(value: f64) -> String {
    format!("${}", format_number(value))
}

/// Format a number with thousands separators
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let fixed = format!("{:.3}", value.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && (whole != "0" || !fraction.is_empty()) {
        "-"
    } else {
        ""
    };

    if fraction.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, fraction)
    }
}

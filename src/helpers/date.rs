//! Publication date formatting
//!
//! Display dates are fixed to Brazilian-Portuguese month names regardless of
//! the host locale.

use chrono::{DateTime, Datelike, Utc};

/// pt-BR month abbreviations, January first
const MONTHS_PT_BR: [&str; 12] = [
    "jan", "fev", "mar", "abr", "mai", "jun", "jul", "ago", "set", "out", "nov", "dez",
];

/// Format a publication timestamp as `dd MMM yyyy` (e.g. "15 mar 2023").
///
/// Callers guard against unpublished documents: this is only invoked once a
/// post record with a non-null publication date is in hand.
pub fn format_publication_date(date: &DateTime<Utc>) -> String {
    let month = MONTHS_PT_BR[date.month0() as usize];
    format!("{:02} {} {}", date.day(), month, date.year())
}

//! Fee-schedule evaluation
//!
//! A member is on schedule when every year from their first paid year up to,
//! but not including, the current year has a fee. The current year itself is
//! not yet due.

use std::collections::HashSet;

use super::date::{current_year, year_range};

/// Whether the paid years cover `[min(paid_years), current UTC year)`.
///
/// An empty slice is never on schedule.
pub fn is_fee_schedule_compliant(paid_years: &[i32]) -> bool {
    is_fee_schedule_compliant_at(paid_years, current_year())
}

/// Same rule as [`is_fee_schedule_compliant`] evaluated against a given year.
pub fn is_fee_schedule_compliant_at(paid_years: &[i32], current_year: i32) -> bool {
    let Some(&first_year) = paid_years.iter().min() else {
        return false;
    };

    let paid: HashSet<i32> = paid_years.iter().copied().collect();

    year_range(first_year, current_year).all(|year| paid.contains(&year))
}

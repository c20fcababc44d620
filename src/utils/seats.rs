//! Seat reconciliation and booking totals

use rust_decimal::Decimal;

/// Total reserved seats across member and non-member bookings
pub fn sum_seats(member_seats: &[i32], non_member_seats: &[i32]) -> i64 {
    member_seats
        .iter()
        .chain(non_member_seats)
        .map(|seats| i64::from(*seats))
        .sum()
}

/// Whether the requested seats fit the trip capacity.
///
/// A capacity of zero or less is not enforced.
pub fn seats_fit_capacity(total_seats: i32, member_seats: &[i32], non_member_seats: &[i32]) -> bool {
    if total_seats <= 0 {
        return true;
    }

    sum_seats(member_seats, non_member_seats) <= i64::from(total_seats)
}

/// Sum of paid amounts across member and non-member bookings
pub fn total_paid_amount(member_amounts: &[Decimal], non_member_amounts: &[Decimal]) -> Decimal {
    member_amounts.iter().chain(non_member_amounts).sum()
}

// Pure business rules shared by the services
pub mod date;
pub mod fees;
pub mod seats;

pub use fees::{is_fee_schedule_compliant, is_fee_schedule_compliant_at};
pub use seats::{seats_fit_capacity, sum_seats, total_paid_amount};

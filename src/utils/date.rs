use std::ops::Range;
use time::OffsetDateTime;

/// Half-open range of years `[from, to)`.
///
/// Negative bounds or `from > to` yield an empty range.
pub fn year_range(from: i32, to: i32) -> Range<i32> {
    if from < 0 || to < 0 || from > to {
        return 0..0;
    }

    from..to
}

/// Current calendar year in UTC
pub fn current_year() -> i32 {
    OffsetDateTime::now_utc().year()
}

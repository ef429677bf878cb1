use time::{Date, Duration, OffsetDateTime, UtcOffset};

/// Calendar date of a timestamp, truncated in UTC so grouping never depends on locale.
pub fn utc_date(dt: OffsetDateTime) -> Date {
    dt.to_offset(UtcOffset::UTC).date()
}

/// Smallest instant strictly after `previous` that is not before `now`.
pub fn strictly_after(previous: OffsetDateTime, now: OffsetDateTime) -> OffsetDateTime {
    if now > previous {
        now
    } else {
        previous + Duration::milliseconds(1)
    }
}

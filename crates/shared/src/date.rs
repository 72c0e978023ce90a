use time::OffsetDateTime;

/// Milliseconds since the unix epoch.
pub fn now_millis() -> u64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as u64
}

/// Seconds since the unix epoch.
pub fn now_secs() -> u64 {
    OffsetDateTime::now_utc().unix_timestamp() as u64
}

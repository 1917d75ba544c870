use chrono::Utc;

/// Returns `1` while `now` lies strictly between sunrise and sunset, else `0`.
///
/// `now` is fractional epoch seconds. A missing bound never matches.
pub fn sun_status(now: f64, sunrise: Option<i64>, sunset: Option<i64>) -> i64 {
    match (sunrise, sunset) {
        (Some(rise), Some(set)) if now > rise as f64 && now < set as f64 => 1,
        _ => 0,
    }
}

/// Current wall-clock time in fractional epoch seconds.
pub fn now_epoch_secs() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1e6
}

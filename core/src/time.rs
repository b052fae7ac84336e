use chrono::Utc;

/// Current wall clock in epoch millis
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

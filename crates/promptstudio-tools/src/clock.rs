use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
pub struct CurrentTimeArgs {
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

/// Current date and time. Only UTC is supported; other requested zones fall
/// back to UTC rather than failing the call.
pub fn get_current_time(args: &CurrentTimeArgs) -> Value {
    if !args.timezone.eq_ignore_ascii_case("UTC") {
        tracing::debug!(requested = %args.timezone, "unsupported timezone, using UTC");
    }
    let now = Utc::now();
    json!({
        "timestamp": now.to_rfc3339(),
        "timezone": "UTC",
        "unix_timestamp": now.timestamp(),
        "formatted": now.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        "date": now.format("%Y-%m-%d").to_string(),
        "time": now.format("%H:%M:%S").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_has_stable_fields() {
        let args = CurrentTimeArgs {
            timezone: "UTC".to_string(),
        };
        let value = get_current_time(&args);
        assert_eq!(value["timezone"], "UTC");
        assert!(value["unix_timestamp"].as_i64().unwrap() > 0);
        let date = value["date"].as_str().unwrap();
        assert_eq!(date.len(), 10);
        assert!(value["timestamp"].as_str().unwrap().starts_with(date));
    }
}

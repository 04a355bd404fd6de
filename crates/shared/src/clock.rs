//! Wall-clock helpers for operating windows and bookings.
//!
//! Times travel over the wire as `HH:MM` (seconds are accepted on input).

use chrono::{NaiveTime, Weekday};

/// Parses `HH:MM` or `HH:MM:SS`.
pub fn parse_clock_time(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

/// Formats a time as `HH:MM`.
pub fn format_clock_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Lowercase English weekday name, as used for availability maps.
pub fn weekday_key(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

/// Serde adapter for `NaiveTime` as `HH:MM`.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_clock_time(*time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_clock_time(&raw)
            .ok_or_else(|| D::Error::custom(format!("invalid time '{}', expected HH:MM", raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize)]
    struct Window {
        #[serde(with = "hhmm")]
        start: NaiveTime,
    }

    #[test]
    fn test_parse_clock_time() {
        assert_eq!(
            parse_clock_time("08:00"),
            NaiveTime::from_hms_opt(8, 0, 0)
        );
        assert_eq!(
            parse_clock_time("14:30:15"),
            NaiveTime::from_hms_opt(14, 30, 15)
        );
        assert_eq!(parse_clock_time(" 09:05 "), NaiveTime::from_hms_opt(9, 5, 0));
        assert!(parse_clock_time("25:00").is_none());
        assert!(parse_clock_time("noon").is_none());
    }

    #[test]
    fn test_format_clock_time_drops_seconds() {
        let t = NaiveTime::from_hms_opt(17, 0, 59).unwrap();
        assert_eq!(format_clock_time(t), "17:00");
    }

    #[test]
    fn test_weekday_key() {
        assert_eq!(weekday_key(Weekday::Mon), "monday");
        assert_eq!(weekday_key(Weekday::Sun), "sunday");
    }

    #[test]
    fn test_hhmm_serde() {
        let w: Window = serde_json::from_str(r#"{"start":"08:30"}"#).unwrap();
        assert_eq!(w.start, NaiveTime::from_hms_opt(8, 30, 0).unwrap());
        assert_eq!(serde_json::to_string(&w).unwrap(), r#"{"start":"08:30"}"#);
        assert!(serde_json::from_str::<Window>(r#"{"start":"8am"}"#).is_err());
    }
}

use chrono::NaiveDate;
use serde::de::{self, Deserialize, Deserializer};

pub fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    NaiveDate::parse_from_str(&s, "%Y%m%d").map_err(serde::de::Error::custom)
}

fn parse_time_impl(h: &str, m: &str, s: &str) -> Option<u32> {
    let hours: u32 = h.parse().ok()?;
    let minutes: u32 = m.parse().ok()?;
    let seconds: u32 = s.parse().ok()?;
    if minutes > 59 || seconds > 59 {
        return None;
    }
    hours.checked_mul(3600)?.checked_add(minutes * 60 + seconds)
}

/// Parses a `H:MM:SS` time into seconds since midnight
///
/// The hour can have more than two digits and go past 23 for trips running after midnight,
/// `25:00:00` is 90000. Minutes and seconds must be two digits between 00 and 59.
pub fn parse_time(s: &str) -> Result<u32, crate::Error> {
    let mk_err = || crate::Error::MalformedTime(s.to_owned());

    if s.len() < 7 {
        Err(mk_err())
    } else {
        let mut parts = s.split(':');

        let hour = parts.next().ok_or_else(mk_err)?;
        let min = parts.next().ok_or_else(mk_err)?;
        let sec = parts.next().ok_or_else(mk_err)?;
        if parts.next().is_some() {
            return Err(mk_err());
        }

        if hour.is_empty() || min.len() != 2 || sec.len() != 2 {
            return Err(mk_err());
        }

        parse_time_impl(hour, min, sec).ok_or_else(mk_err)
    }
}

/// Formats seconds since midnight as `HH:MM:SS`, hours are not wrapped at 24
pub fn format_time(time: u32) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        time / 3600,
        time % 3600 / 60,
        time % 60
    )
}

pub fn deserialize_optional_time<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = Option::<String>::deserialize(deserializer)?;

    match s {
        None => Ok(None),
        Some(t) => parse_time(&t).map(Some).map_err(de::Error::custom),
    }
}

pub fn de_with_trimed_float<'de, D>(de: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(de).and_then(|s| s.trim().parse().map_err(de::Error::custom))
}

pub fn deserialize_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    match s.as_str() {
        "0" => Ok(false),
        "1" => Ok(true),
        &_ => Err(serde::de::Error::custom(format!(
            "Invalid value `{}`, expected 0 or 1",
            s
        ))),
    }
}

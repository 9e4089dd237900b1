use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parse an event date given as RFC 3339, `YYYY-MM-DD HH:MM`, or `YYYY-MM-DD`
/// (the last two in UTC). Dates before today (UTC) are rejected.
pub fn parse_event_date(input: &str, now: DateTime<Utc>) -> anyhow::Result<DateTime<Utc>> {
    let input = input.trim();
    let parsed = DateTime::parse_from_rfc3339(input)
        .map(|date| date.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M").map(|date| date.and_utc())
        })
        .or_else(|_| {
            NaiveDate::parse_from_str(input, "%Y-%m-%d")
                .map(|date| date.and_time(chrono::NaiveTime::MIN).and_utc())
        })
        .map_err(|_| {
            anyhow::anyhow!(
                "invalid date '{input}': use RFC 3339, 'YYYY-MM-DD HH:MM', or 'YYYY-MM-DD'"
            )
        })?;

    if parsed.date_naive() < now.date_naive() {
        anyhow::bail!("event date {} is in the past", parsed.date_naive());
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn accepts_rfc3339_with_offset() {
        let date = parse_event_date("2026-11-20T09:30:00+02:00", now()).unwrap();
        assert_eq!(date, Utc.with_ymd_and_hms(2026, 11, 20, 7, 30, 0).unwrap());
    }

    #[test]
    fn accepts_date_and_time() {
        let date = parse_event_date("2026-11-20 18:45", now()).unwrap();
        assert_eq!(date, Utc.with_ymd_and_hms(2026, 11, 20, 18, 45, 0).unwrap());
    }

    #[test]
    fn bare_date_is_midnight_utc() {
        let date = parse_event_date("2026-11-20", now()).unwrap();
        assert_eq!(date, Utc.with_ymd_and_hms(2026, 11, 20, 0, 0, 0).unwrap());
    }

    #[test]
    fn today_is_allowed_even_if_earlier_in_the_day() {
        let date = parse_event_date("2026-10-15 08:00", now()).unwrap();
        assert_eq!(date.date_naive(), now().date_naive());
    }

    #[test]
    fn yesterday_is_rejected() {
        let err = parse_event_date("2026-10-14", now()).unwrap_err();
        assert_eq!(err.to_string(), "event date 2026-10-14 is in the past");
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse_event_date("next tuesday", now()).is_err());
    }
}

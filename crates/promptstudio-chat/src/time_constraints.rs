use chrono::{DateTime, Datelike, Duration, Utc};
use regex::Regex;
use serde_json::{Map, Value};

/// Time constraint extracted from prompt text.
///
/// `time_hint` reflects the actual day range (≤1 day, ≤7 week, ≤30 month,
/// else year); `after`/`before` are `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeConstraint {
    pub time_hint: String,
    pub after: String,
    pub before: Option<String>,
    pub days_ago: i64,
}

fn hint_from_days(days: i64) -> &'static str {
    if days <= 1 {
        "day"
    } else if days <= 7 {
        "week"
    } else if days <= 30 {
        "month"
    } else {
        "year"
    }
}

/// Extract a freshness period from prompt text, relative to the current time
pub fn parse_time_constraints(text: &str) -> Option<TimeConstraint> {
    parse_time_constraints_at(text, Utc::now())
}

/// Rule-based extraction: named spans (`today`, `yesterday`, `this/last
/// week`, `this/last month`) and `(last|past|in the last) N <unit>`.
/// Months count as 30 days, years as 365.
pub fn parse_time_constraints_at(text: &str, now: DateTime<Utc>) -> Option<TimeConstraint> {
    let text = text.to_lowercase();
    let date = |d: DateTime<Utc>| d.format("%Y-%m-%d").to_string();

    let word = |pattern: &str| {
        Regex::new(pattern)
            .map(|re| re.is_match(&text))
            .unwrap_or(false)
    };

    if word(r"\btoday\b") {
        return Some(TimeConstraint {
            time_hint: "day".to_string(),
            after: date(now),
            before: None,
            days_ago: 1,
        });
    }
    if word(r"\byesterday\b") {
        return Some(TimeConstraint {
            time_hint: "day".to_string(),
            after: date(now - Duration::days(1)),
            before: None,
            days_ago: 1,
        });
    }

    let weekday = i64::from(now.weekday().num_days_from_monday());
    if word(r"\bthis\s+week\b") {
        return Some(TimeConstraint {
            time_hint: "week".to_string(),
            after: date(now - Duration::days(weekday)),
            before: None,
            days_ago: 7,
        });
    }
    if word(r"\blast\s+week\b") {
        return Some(TimeConstraint {
            time_hint: "week".to_string(),
            after: date(now - Duration::days(weekday + 7)),
            before: None,
            days_ago: 7,
        });
    }
    if word(r"\bthis\s+month\b") {
        let first = now - Duration::days(i64::from(now.day()) - 1);
        return Some(TimeConstraint {
            time_hint: "month".to_string(),
            after: date(first),
            before: None,
            days_ago: 30,
        });
    }
    if word(r"\blast\s+month\b") {
        let first_this = now - Duration::days(i64::from(now.day()) - 1);
        let last_month_end = first_this - Duration::days(1);
        let start = last_month_end - Duration::days(i64::from(last_month_end.day()) - 1);
        return Some(TimeConstraint {
            time_hint: "month".to_string(),
            after: date(start),
            before: None,
            days_ago: 30,
        });
    }

    let re = Regex::new(
        r"\b(last|past|in\s+the\s+last)\s+(\d{1,3})\s+(day|days|week|weeks|month|months|year|years)\b",
    )
    .ok()?;
    let caps = re.captures(&text)?;
    let n: i64 = caps.get(2)?.as_str().parse().ok()?;
    let unit = caps.get(3)?.as_str();
    let days = if unit.starts_with("day") {
        n
    } else if unit.starts_with("week") {
        n * 7
    } else if unit.starts_with("month") {
        n * 30
    } else {
        n * 365
    };

    Some(TimeConstraint {
        time_hint: hint_from_days(days).to_string(),
        after: date(now - Duration::days(days)),
        before: None,
        days_ago: days,
    })
}

/// Augment search arguments with a parsed constraint, never overriding keys
/// the model already supplied.
pub fn enrich_search_args(args: &mut Map<String, Value>, constraint: &TimeConstraint) {
    if !args.contains_key("time_hint") {
        args.insert("time_hint".to_string(), Value::String(constraint.time_hint.clone()));
    }
    if !args.contains_key("after") {
        args.insert("after".to_string(), Value::String(constraint.after.clone()));
    }
    if !args.contains_key("before") {
        if let Some(before) = &constraint.before {
            args.insert("before".to_string(), Value::String(before.clone()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn at() -> DateTime<Utc> {
        // A Thursday
        Utc.with_ymd_and_hms(2026, 3, 12, 15, 30, 0).unwrap()
    }

    #[test]
    fn named_spans() {
        let c = parse_time_constraints_at("what happened today?", at()).unwrap();
        assert_eq!(c.time_hint, "day");
        assert_eq!(c.after, "2026-03-12");
        assert_eq!(c.days_ago, 1);

        let c = parse_time_constraints_at("news from yesterday", at()).unwrap();
        assert_eq!(c.after, "2026-03-11");

        let c = parse_time_constraints_at("releases this week", at()).unwrap();
        assert_eq!(c.time_hint, "week");
        assert_eq!(c.after, "2026-03-09");

        let c = parse_time_constraints_at("sales last week", at()).unwrap();
        assert_eq!(c.after, "2026-03-02");

        let c = parse_time_constraints_at("earnings this month", at()).unwrap();
        assert_eq!(c.time_hint, "month");
        assert_eq!(c.after, "2026-03-01");

        let c = parse_time_constraints_at("earnings last month", at()).unwrap();
        assert_eq!(c.after, "2026-02-01");
    }

    #[test]
    fn relative_spans_pick_hint_by_actual_range() {
        let c = parse_time_constraints_at("in the last 7 days", at()).unwrap();
        assert_eq!(c.time_hint, "week");
        assert_eq!(c.days_ago, 7);
        assert_eq!(c.after, "2026-03-05");

        let c = parse_time_constraints_at("past 2 weeks", at()).unwrap();
        assert_eq!(c.time_hint, "month");
        assert_eq!(c.days_ago, 14);

        let c = parse_time_constraints_at("last 3 months", at()).unwrap();
        assert_eq!(c.time_hint, "year");
        assert_eq!(c.days_ago, 90);

        let c = parse_time_constraints_at("last 1 day", at()).unwrap();
        assert_eq!(c.time_hint, "day");
    }

    #[test]
    fn no_constraint_in_plain_text() {
        assert!(parse_time_constraints_at("tell me a joke", at()).is_none());
        // Substrings of other words do not count
        assert!(parse_time_constraints_at("the yesterdays were a band", at()).is_none());
    }

    #[test]
    fn parse_is_idempotent_over_after_date() {
        let c = parse_time_constraints_at("last 10 days", at()).unwrap();
        let reparsed = chrono::NaiveDate::parse_from_str(&c.after, "%Y-%m-%d").unwrap();
        assert_eq!(reparsed, (at() - Duration::days(10)).date_naive());
    }

    #[test]
    fn enrich_never_overrides_model_keys() {
        let c = parse_time_constraints_at("last 7 days", at()).unwrap();
        let mut args = json!({"query": "x", "time_hint": "month"})
            .as_object()
            .cloned()
            .unwrap();
        enrich_search_args(&mut args, &c);
        assert_eq!(args["time_hint"], "month");
        assert_eq!(args["after"], "2026-03-05");
        assert!(!args.contains_key("before"));
    }
}

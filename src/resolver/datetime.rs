use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::resolver::error::ResolveError;

/// An absolute point in time produced by [`resolve_datetime`]. The instant is
/// normalized to UTC; the timezone the phrase was resolved in rides along for
/// audit and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedMoment {
    pub utc: DateTime<Utc>,
    pub tz: Tz,
}

impl ResolvedMoment {
    pub fn local(&self) -> DateTime<Tz> {
        self.utc.with_timezone(&self.tz)
    }
}

const WEEKDAYS: [(&str, i64); 7] = [
    ("monday", 0),
    ("tuesday", 1),
    ("wednesday", 2),
    ("thursday", 3),
    ("friday", 4),
    ("saturday", 5),
    ("sunday", 6),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Meridiem {
    Am,
    Pm,
}

/// Resolve a scheduling phrase ("tomorrow at 3pm", "next Friday morning",
/// "in 2 hours") against a reference instant, in the named IANA timezone.
///
/// The reference instant always substitutes for the wall clock, so identical
/// inputs always resolve to the identical moment. When the phrase carries
/// neither an explicit clock time nor a time-of-day keyword, `default_time`
/// decides the outcome: `Some` fills it in, `None` fails with `MissingTime`.
pub fn resolve_datetime(
    phrase: &str,
    tz_name: &str,
    reference: DateTime<Utc>,
    default_time: Option<NaiveTime>,
) -> Result<ResolvedMoment, ResolveError> {
    let tz: Tz = tz_name
        .parse()
        .map_err(|_| ResolveError::InvalidTimezone(tz_name.to_string()))?;

    let lower = phrase.trim().to_lowercase();
    if lower.is_empty() {
        return Err(ResolveError::UnrecognizedPhrase(phrase.to_string()));
    }

    let local_ref = reference.with_timezone(&tz);

    // "in N minutes/hours/days" is pure offset arithmetic and skips the
    // day / time-of-day machinery entirely.
    if let Some(delta) = relative_offset(&lower) {
        return Ok(ResolvedMoment {
            utc: reference + delta,
            tz,
        });
    }

    let time = resolve_clock_time(&lower, phrase, default_time)?;

    let date = resolve_base_day(&lower, local_ref.date_naive(), local_ref.time(), time);

    let local = tz
        .from_local_datetime(&date.and_time(time))
        .earliest()
        .ok_or_else(|| ResolveError::UnrecognizedPhrase(phrase.to_string()))?;

    Ok(ResolvedMoment {
        utc: local.with_timezone(&Utc),
        tz,
    })
}

// "in 2 hours", "in 45 minutes", "in 3 days"
fn relative_offset(lower: &str) -> Option<Duration> {
    let tokens: Vec<&str> = lower.split_whitespace().collect();
    for window in tokens.windows(3) {
        if window[0] != "in" {
            continue;
        }
        let Ok(amount) = window[1].parse::<i64>() else {
            continue;
        };
        let unit = window[2].trim_end_matches(|c: char| !c.is_ascii_alphabetic());
        if unit.starts_with("minute") || unit == "min" || unit == "mins" {
            return Some(Duration::minutes(amount));
        }
        if unit.starts_with("hour") || unit == "hr" || unit == "hrs" {
            return Some(Duration::hours(amount));
        }
        if unit.starts_with("day") {
            return Some(Duration::days(amount));
        }
    }
    None
}

fn resolve_clock_time(
    lower: &str,
    phrase: &str,
    default_time: Option<NaiveTime>,
) -> Result<NaiveTime, ResolveError> {
    if let Some((hour, minute, meridiem)) = explicit_time(lower) {
        let hour24 = to_hour24(hour, meridiem, lower);
        if hour24 > 23 || minute > 59 {
            return Err(ResolveError::UnrecognizedPhrase(phrase.to_string()));
        }
        return NaiveTime::from_hms_opt(hour24, minute, 0)
            .ok_or_else(|| ResolveError::UnrecognizedPhrase(phrase.to_string()));
    }

    // Keyword defaults when no explicit clock time is present. "tonight"
    // contains "night" and lands on 20:00 for free.
    let keyword_default = if lower.contains("morning") {
        Some((9, 0))
    } else if lower.contains("afternoon") {
        Some((14, 0))
    } else if lower.contains("evening") {
        Some((18, 0))
    } else if lower.contains("night") {
        Some((20, 0))
    } else {
        None
    };

    match keyword_default {
        Some((h, m)) => Ok(NaiveTime::from_hms_opt(h, m, 0).unwrap()),
        None => default_time.ok_or_else(|| ResolveError::MissingTime(phrase.to_string())),
    }
}

// Scan for "3pm", "3:30pm", "3 pm", or a bare "at 3" / "at 15:00".
// Bare clock digits only count when prefixed with "at", so phrases like
// "room 12" never read as times.
fn explicit_time(lower: &str) -> Option<(u32, u32, Option<Meridiem>)> {
    let tokens: Vec<&str> = lower
        .split_whitespace()
        .map(|t| t.trim_matches(|c: char| c == ',' || c == '.' || c == '!' || c == '?'))
        .collect();

    for (i, token) in tokens.iter().enumerate() {
        // Meridiem glued on: "3pm", "11:30am".
        if let Some(rest) = token.strip_suffix("am") {
            if let Some((h, m)) = parse_clock_digits(rest) {
                return Some((h, m, Some(Meridiem::Am)));
            }
        }
        if let Some(rest) = token.strip_suffix("pm") {
            if let Some((h, m)) = parse_clock_digits(rest) {
                return Some((h, m, Some(Meridiem::Pm)));
            }
        }

        if let Some((h, m)) = parse_clock_digits(token) {
            // Meridiem as its own token: "3 pm".
            match tokens.get(i + 1).copied() {
                Some("am") => return Some((h, m, Some(Meridiem::Am))),
                Some("pm") => return Some((h, m, Some(Meridiem::Pm))),
                _ => {}
            }
            if i > 0 && tokens[i - 1] == "at" {
                return Some((h, m, None));
            }
        }
    }
    None
}

// "3" -> (3, 0); "3:30" -> (3, 30). Anything else is not a clock reading.
fn parse_clock_digits(token: &str) -> Option<(u32, u32)> {
    if token.is_empty() {
        return None;
    }
    match token.split_once(':') {
        Some((h, m)) => {
            if m.len() != 2 {
                return None;
            }
            Some((h.parse().ok()?, m.parse().ok()?))
        }
        None => Some((token.parse().ok()?, 0)),
    }
}

// A 12-hour value without am/pm leans on the nearest time-of-day keyword in
// the phrase; with none present the earlier reading (am) wins, which for 12
// is midnight. 13..23 pass through as 24-hour times.
fn to_hour24(hour: u32, meridiem: Option<Meridiem>, lower: &str) -> u32 {
    match meridiem {
        Some(Meridiem::Pm) if hour != 12 => hour + 12,
        Some(Meridiem::Am) if hour == 12 => 0,
        Some(_) => hour,
        None => {
            let afternoonish = lower.contains("afternoon")
                || lower.contains("evening")
                || lower.contains("night");
            if afternoonish && (1..=11).contains(&hour) {
                hour + 12
            } else if !afternoonish && hour == 12 {
                0
            } else {
                hour
            }
        }
    }
}

// Pick the calendar day the phrase points at. Weekday names outrank the
// relative-day words; with no day token at all the reference date stands.
fn resolve_base_day(
    lower: &str,
    ref_date: NaiveDate,
    ref_time: NaiveTime,
    resolved_time: NaiveTime,
) -> NaiveDate {
    let current = ref_date.weekday().num_days_from_monday() as i64;
    let has_next = lower.contains("next");

    for (name, day_num) in WEEKDAYS {
        if !lower.contains(name) {
            continue;
        }
        let mut days_ahead = day_num - current;
        if has_next {
            // "next Friday" on a Thursday is the Friday of the following
            // week, eight days out; on a Friday it is seven days out.
            return ref_date + Duration::days(days_ahead + 7);
        }
        if days_ahead < 0 {
            days_ahead += 7;
        } else if days_ahead == 0 && resolved_time <= ref_time {
            // Bare weekday on that same weekday: today only while the
            // resolved clock time is still ahead of the reference.
            days_ahead = 7;
        }
        return ref_date + Duration::days(days_ahead);
    }

    if lower.contains("day after tomorrow") {
        ref_date + Duration::days(2)
    } else if lower.contains("tomorrow") {
        ref_date + Duration::days(1)
    } else if lower.contains("next week") {
        ref_date + Duration::days(7)
    } else {
        ref_date
    }
}

use crate::resolver::error::ResolveError;

/// Applied by the composer when the caller omits a duration or supplies one
/// we cannot read.
pub const DEFAULT_DURATION_MINUTES: u32 = 60;

const HOUR_UNITS: [&str; 4] = ["hours", "hour", "hrs", "hr"];
const MINUTE_UNITS: [&str; 4] = ["minutes", "minute", "mins", "min"];

/// Parse a short duration phrase ("1 hour", "45 minutes", "90 min", "1.5
/// hours", or a bare number) into minutes. A bare number reads as minutes.
/// The result is always at least 1.
pub fn resolve_duration(text: &str) -> Result<u32, ResolveError> {
    let lower = text.trim().to_lowercase();
    // Units only count as whole words so "shred 45" never reads as hours.
    // Trimming digits also catches glued forms like "45min".
    let words: Vec<&str> = lower
        .split_whitespace()
        .map(|word| word.trim_matches(|c: char| !c.is_ascii_alphabetic()))
        .collect();
    let has_hours = HOUR_UNITS.iter().any(|unit| words.contains(unit));

    let Some(amount) = first_number(&lower) else {
        // "an hour" / "a minute" carry no digit but are still unambiguous.
        if has_hours {
            return Ok(60);
        }
        if MINUTE_UNITS.iter().any(|unit| words.contains(unit)) {
            return Ok(1);
        }
        return Err(ResolveError::UnrecognizedDuration(text.to_string()));
    };

    // Minute units and bare numbers both read as minutes, so only the hour
    // units change the scale.
    let minutes = if has_hours { amount * 60.0 } else { amount };
    Ok((minutes.round() as u32).max(1))
}

// First integer or decimal in the text, e.g. "1.5" out of "about 1.5 hours".
fn first_number(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i].is_ascii_digit() {
            let start = i;
            let mut seen_dot = false;
            while i < bytes.len()
                && (bytes[i].is_ascii_digit() || (bytes[i] == b'.' && !seen_dot))
            {
                if bytes[i] == b'.' {
                    seen_dot = true;
                }
                i += 1;
            }
            let mut end = i;
            // A trailing dot is sentence punctuation, not a decimal point.
            if bytes[end - 1] == b'.' {
                end -= 1;
            }
            return text[start..end].parse().ok();
        }
        i += 1;
    }
    None
}

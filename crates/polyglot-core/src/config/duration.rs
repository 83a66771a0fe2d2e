//! Duration strings: `"2h"`, `"30m"`, `"1h30m"`, `"45s"`, `"500ms"`, `"1d"`.

use std::time::Duration;

/// Parse a compact duration string made of `<number><unit>` segments.
///
/// Units: `ms`, `s`, `m`, `h`, `d`, `w`. A bare number is read as seconds.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("empty duration".to_string());
    }
    if let Ok(secs) = trimmed.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }

    let mut total = Duration::ZERO;
    let mut rest = trimmed;
    while !rest.is_empty() {
        let digits = rest.bytes().take_while(|b| b.is_ascii_digit()).count();
        if digits == 0 {
            return Err(format!("expected a number in duration {input:?}"));
        }
        let value: u64 = rest[..digits]
            .parse()
            .map_err(|e| format!("bad number in duration {input:?}: {e}"))?;
        rest = &rest[digits..];

        let unit_len = rest.bytes().take_while(|b| b.is_ascii_alphabetic()).count();
        let unit = &rest[..unit_len];
        rest = &rest[unit_len..];

        let secs_per_unit: u64 = match unit.to_ascii_lowercase().as_str() {
            "ms" => 0,
            "s" | "sec" | "secs" => 1,
            "m" | "min" | "mins" => 60,
            "h" | "hr" | "hrs" => 3_600,
            "d" | "day" | "days" => 86_400,
            "w" => 604_800,
            "" => return Err(format!("missing unit in duration {input:?}")),
            other => return Err(format!("unknown unit {other:?} in duration {input:?}")),
        };
        let segment = if secs_per_unit == 0 {
            Duration::from_millis(value)
        } else {
            value
                .checked_mul(secs_per_unit)
                .map(Duration::from_secs)
                .ok_or_else(|| out_of_range(input))?
        };
        total = total.checked_add(segment).ok_or_else(|| out_of_range(input))?;
    }
    Ok(total)
}

fn out_of_range(input: &str) -> String {
    format!("duration out of range: {input:?}")
}

//! Priority normalization tables.
//!
//! Each backend family owns an independent mapping from the canonical
//! label set (min, low, moderate, normal/default, high, critical,
//! emergency/max) to its native representation. Input is trimmed and
//! matched case-insensitively; unrecognized labels resolve to the
//! family default rather than failing.

/// Map a canonical priority label to a Gotify priority label.
pub fn gotify(raw: &str) -> &'static str {
    match raw.trim().to_ascii_lowercase().as_str() {
        "min" | "low" => "low",
        "moderate" => "moderate",
        "high" => "high",
        "critical" | "emergency" | "max" => "emergency",
        _ => "normal",
    }
}

/// Map a canonical priority label to an ntfy priority label.
pub fn ntfy(raw: &str) -> &'static str {
    match raw.trim().to_ascii_lowercase().as_str() {
        "min" => "min",
        "low" | "moderate" => "low",
        "high" => "high",
        "critical" | "emergency" | "max" => "max",
        _ => "default",
    }
}

/// Map a priority to a Pushover integer priority.
///
/// Integer-like input passes through verbatim and takes precedence
/// over label matching.
pub fn pushover(raw: &str) -> i64 {
    let trimmed = raw.trim();
    if let Ok(level) = trimmed.parse::<i64>() {
        return level;
    }
    match trimmed.to_ascii_lowercase().as_str() {
        "min" | "lowest" => -2,
        "low" | "moderate" => -1,
        "high" | "critical" => 1,
        "emergency" | "max" => 2,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gotify_labels() {
        assert_eq!(gotify("min"), "low");
        assert_eq!(gotify("moderate"), "moderate");
        assert_eq!(gotify("normal"), "normal");
        assert_eq!(gotify("default"), "normal");
        assert_eq!(gotify("Critical"), "emergency");
        assert_eq!(gotify(" MAX "), "emergency");
    }

    #[test]
    fn gotify_unknown_falls_back_to_normal() {
        assert_eq!(gotify("unknown"), "normal");
        assert_eq!(gotify(""), "normal");
    }

    #[test]
    fn ntfy_labels() {
        assert_eq!(ntfy("min"), "min");
        assert_eq!(ntfy("moderate"), "low");
        assert_eq!(ntfy("normal"), "default");
        assert_eq!(ntfy("HIGH"), "high");
        assert_eq!(ntfy("emergency"), "max");
    }

    #[test]
    fn ntfy_unknown_falls_back_to_default() {
        assert_eq!(ntfy("whatever"), "default");
    }

    #[test]
    fn pushover_labels() {
        assert_eq!(pushover("min"), -2);
        assert_eq!(pushover("lowest"), -2);
        assert_eq!(pushover("moderate"), -1);
        assert_eq!(pushover("medium"), 0);
        assert_eq!(pushover("high"), 1);
        assert_eq!(pushover("max"), 2);
    }

    #[test]
    fn pushover_numeric_passthrough() {
        assert_eq!(pushover("7"), 7);
        assert_eq!(pushover(" -1 "), -1);
    }

    #[test]
    fn pushover_unknown_falls_back_to_zero() {
        assert_eq!(pushover("loud"), 0);
    }
}

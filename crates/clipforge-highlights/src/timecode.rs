//! Parses the several time formats the remote reasoning model may
//! return: `hh:mm:ss`, `mm:ss`, plain seconds.

/// Parses `hh:mm:ss`, `mm:ss`, or a plain numeric string into seconds.
/// Returns `None` rather than erroring — an unparseable time is simply
/// not used by the caller, per the lenient-parsing rule.
pub fn parse_time_to_seconds(raw: &str) -> Option<f64> {
    let v = raw.trim();
    if v.is_empty() {
        return None;
    }

    let parts: Vec<&str> = v.split(':').collect();
    match parts.len() {
        3 => {
            let h: f64 = parts[0].parse().ok()?;
            let m: f64 = parts[1].parse().ok()?;
            let s: f64 = parts[2].parse().ok()?;
            Some(h * 3600.0 + m * 60.0 + s)
        }
        2 => {
            let m: f64 = parts[0].parse().ok()?;
            let s: f64 = parts[1].parse().ok()?;
            Some(m * 60.0 + s)
        }
        _ => v.parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hh_mm_ss() {
        assert_eq!(parse_time_to_seconds("01:02:03"), Some(3723.0));
    }

    #[test]
    fn parses_mm_ss() {
        assert_eq!(parse_time_to_seconds("02:30"), Some(150.0));
    }

    #[test]
    fn parses_plain_seconds() {
        assert_eq!(parse_time_to_seconds("125.5"), Some(125.5));
    }

    #[test]
    fn unparseable_returns_none() {
        assert_eq!(parse_time_to_seconds("not a time"), None);
        assert_eq!(parse_time_to_seconds(""), None);
    }
}

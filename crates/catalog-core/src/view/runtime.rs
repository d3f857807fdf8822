//! Interpretation of the free-form `runtime` field: either a duration
//! ("142 min") or a season count ("3 Seasons").

/// First run of ASCII digits in the string, 0 when absent. Saturates at
/// `u64::MAX` on overflow.
pub fn runtime_minutes(runtime: Option<&str>) -> u64 {
    let Some(runtime) = runtime else {
        return 0;
    };

    let digits: String = runtime
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();

    if digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or(u64::MAX)
}

pub fn is_season_entry(runtime: Option<&str>) -> bool {
    runtime
        .map(|r| r.to_lowercase().contains("season"))
        .unwrap_or(false)
}

/// Leading count of the first `<digits><whitespace>Season` occurrence.
/// "Season" is matched case-sensitively. Saturates on overflow.
pub fn season_count(runtime: Option<&str>) -> Option<u64> {
    let runtime = runtime?;
    let bytes = runtime.as_bytes();

    for (pos, _) in runtime.match_indices("Season") {
        let mut end = pos;
        while end > 0 && bytes[end - 1].is_ascii_whitespace() {
            end -= 1;
        }
        if end == pos {
            continue;
        }

        let mut start = end;
        while start > 0 && bytes[start - 1].is_ascii_digit() {
            start -= 1;
        }
        if start == end {
            continue;
        }

        // Only digits remain, so a failed parse means overflow.
        return Some(runtime[start..end].parse().unwrap_or(u64::MAX));
    }

    None
}

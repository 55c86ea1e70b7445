use std::sync::LazyLock;

use regex::Regex;

use super::model::CaptionLine;

// [mm:ss], [mm:ss.xx], [mm:ss:xx] and [h:mm:ss.xx]
static STAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[(\d+):(\d+)(?::(\d+))?(?:\.(\d+))?\]").expect("valid LRC stamp regex")
});

/// Lines whose text starts with one of these are song credits, not lyrics.
const CREDIT_PREFIXES: &[&str] = &[
    "作词",
    "作曲",
    "编曲",
    "词：",
    "曲：",
    "词:",
    "曲:",
    "lyricist",
    "lyrics by",
    "composer",
    "composed by",
    "written by",
    "arranger",
    "arranged by",
];

fn number(s: Option<regex::Match<'_>>) -> u64 {
    s.and_then(|m| m.as_str().parse().ok()).unwrap_or(0)
}

/// Scale a fractional-second digit run to milliseconds: `3` -> 300, `34` -> 340.
fn fraction_ms(digits: &str) -> u64 {
    let digits = &digits[..digits.len().min(3)];
    let value: u64 = digits.parse().unwrap_or(0);
    value * 10u64.pow(3 - digits.len() as u32)
}

fn stamp_ms(caps: &regex::Captures<'_>) -> u64 {
    let a = number(caps.get(1));
    let b = number(caps.get(2));

    let (hours, minutes, seconds, frac) = match (caps.get(3), caps.get(4)) {
        (Some(c), Some(f)) => (a, b, number(Some(c)), fraction_ms(f.as_str())),
        (Some(c), None) => (0, a, b, fraction_ms(c.as_str())),
        (None, Some(f)) => (0, a, b, fraction_ms(f.as_str())),
        (None, None) => (0, a, b, 0),
    };

    hours
        .saturating_mul(3_600_000)
        .saturating_add(minutes.saturating_mul(60_000))
        .saturating_add(seconds.saturating_mul(1_000))
        .saturating_add(frac)
}

fn is_credit(text: &str) -> bool {
    let lower = text.to_lowercase();
    CREDIT_PREFIXES.iter().any(|p| lower.starts_with(p))
}

/// Parse LRC content. Malformed lines are skipped; output is sorted by time.
pub(crate) fn parse(content: &str) -> Vec<CaptionLine> {
    let mut lines = Vec::new();

    for raw in content.lines() {
        let mut rest = raw.trim().trim_start_matches('\u{feff}');
        let mut stamps = Vec::new();

        while let Some(caps) = STAMP.captures(rest) {
            stamps.push(stamp_ms(&caps));
            rest = &rest[caps.get(0).map_or(0, |m| m.end())..];
        }

        let text = rest.trim();
        if stamps.is_empty() || text.is_empty() || is_credit(text) {
            continue;
        }

        lines.extend(stamps.into_iter().map(|t| CaptionLine::new(t, text)));
    }

    // Stable, so equal stamps keep file order.
    lines.sort_by_key(|l| l.time_ms);
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction_scales_by_digit_count() {
        assert_eq!(fraction_ms("3"), 300);
        assert_eq!(fraction_ms("34"), 340);
        assert_eq!(fraction_ms("345"), 345);
        assert_eq!(fraction_ms("3456"), 345);
    }

    #[test]
    fn stamp_variants() {
        let parsed = parse("[01:02]a\n[01:02.5]b\n[01:02:50]c\n[1:01:02.25]d");
        let times: Vec<u64> = parsed.iter().map(|l| l.time_ms).collect();
        assert_eq!(times, vec![62_000, 62_500, 62_500, 3_662_250]);
    }

    #[test]
    fn huge_numbers_do_not_panic() {
        let parsed = parse("[99999999999999999999999:00.00]overflow\n[00:01.00]ok");
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].time_ms, 0);
        assert_eq!(parsed[0].text, "overflow");
    }
}

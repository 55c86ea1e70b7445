use std::sync::LazyLock;

use regex::Regex;

use super::model::CaptionLine;

static CUE_TIMING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(\d+):)?(\d+):(\d+)[.,](\d+)\s*-->").expect("valid VTT timing regex")
});

static MARKUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid VTT markup regex"));

fn number(m: Option<regex::Match<'_>>) -> u64 {
    m.and_then(|m| m.as_str().parse().ok()).unwrap_or(0)
}

fn cue_start_ms(line: &str) -> Option<u64> {
    let caps = CUE_TIMING.captures(line)?;
    let millis = caps.get(4).map_or("", |m| m.as_str());
    let millis = &millis[..millis.len().min(3)];
    let millis = millis.parse::<u64>().unwrap_or(0) * 10u64.pow(3 - millis.len() as u32);

    Some(
        number(caps.get(1))
            .saturating_mul(3_600_000)
            .saturating_add(number(caps.get(2)).saturating_mul(60_000))
            .saturating_add(number(caps.get(3)).saturating_mul(1_000))
            .saturating_add(millis),
    )
}

struct Cue {
    start_ms: u64,
    text: Vec<String>,
}

fn flush(cue: Option<Cue>, out: &mut Vec<CaptionLine>) {
    if let Some(cue) = cue {
        if !cue.text.is_empty() {
            out.push(CaptionLine::new(cue.start_ms, cue.text.join(" ")));
        }
    }
}

/// Parse WebVTT content into one line per non-empty cue, sorted by start time.
pub(crate) fn parse(content: &str) -> Vec<CaptionLine> {
    let mut lines = Vec::new();
    let mut cue: Option<Cue> = None;

    for raw in content.lines() {
        let line = raw.trim().trim_start_matches('\u{feff}');

        if let Some(start_ms) = cue_start_ms(line) {
            flush(cue.take(), &mut lines);
            cue = Some(Cue {
                start_ms,
                text: Vec::new(),
            });
            continue;
        }

        if line.is_empty() {
            flush(cue.take(), &mut lines);
            continue;
        }

        // Header, NOTE blocks and cue identifiers live outside a cue body.
        let Some(current) = cue.as_mut() else {
            continue;
        };
        if current.text.is_empty() && line.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }

        let clean = MARKUP.replace_all(line, "");
        let clean = clean.trim();
        if !clean.is_empty() {
            current.text.push(clean.to_string());
        }
    }
    flush(cue, &mut lines);

    lines.sort_by_key(|l| l.time_ms);
    lines
}

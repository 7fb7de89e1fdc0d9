const HEADER: &str = "WEBVTT";
const CUE_ARROW: &str = "-->";

/// True when the text starts with the WEBVTT marker, ignoring case and leading whitespace
pub fn is_webvtt(text: &str) -> bool {
    starts_with_header(text.trim_start())
}

/// Drop headers, timestamps and cue timings, keeping only the spoken lines
pub fn strip_cues(captions: &str) -> String {
    captions
        .lines()
        .map(str::trim)
        .filter(|line| {
            !line.is_empty()
                && !starts_with_header(line)
                && !starts_with_timestamp(line)
                && !line.contains(CUE_ARROW)
        })
        .collect::<Vec<&str>>()
        .join(" ")
}

fn starts_with_header(line: &str) -> bool {
    line.get(..HEADER.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(HEADER))
}

/// Matches `HH:MM:SS.` at the start of a line
fn starts_with_timestamp(line: &str) -> bool {
    let bytes = line.as_bytes();
    if bytes.len() < 9 {
        return false;
    }
    bytes[..8].iter().enumerate().all(|(i, b)| match i {
        2 | 5 => *b == b':',
        _ => b.is_ascii_digit(),
    }) && bytes[8] == b'.'
}

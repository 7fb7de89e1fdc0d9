use crate::config::DescriptionPolicy;
use crate::error::ValidationError;
use log::debug;

/// Descriptions must stay under this many words
pub const MAX_DESCRIPTION_WORDS: usize = 100;

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

pub fn enforce_limit(
    description: &str,
    policy: DescriptionPolicy,
) -> Result<String, ValidationError> {
    let words = word_count(description);
    if words < MAX_DESCRIPTION_WORDS {
        return Ok(description.trim().to_string());
    }

    match policy {
        DescriptionPolicy::Reject => Err(ValidationError::DescriptionTooLong { words }),
        DescriptionPolicy::Truncate => {
            let truncated = truncate_to_sentence(description, MAX_DESCRIPTION_WORDS - 1);
            debug!(
                "Truncated description from {} to {} words",
                words,
                word_count(&truncated)
            );
            Ok(truncated)
        }
    }
}

/// Keep whole sentences while staying within `max_words`.
/// Falls back to a hard cut when the first sentence is already too long.
/// The kept text is a slice of the original, so its spacing survives.
fn truncate_to_sentence(text: &str, max_words: usize) -> String {
    let spans: Vec<(usize, usize)> = word_spans(text).take(max_words).collect();

    let (Some(&(start, _)), Some(&(_, last_end))) = (spans.first(), spans.last()) else {
        return String::new();
    };

    let end = spans
        .iter()
        .rev()
        .find(|(s, e)| text[*s..*e].ends_with(&['.', '!', '?'][..]))
        .map_or(last_end, |&(_, e)| e);

    text[start..end].to_string()
}

/// Byte ranges of the whitespace-separated words in `text`
fn word_spans(text: &str) -> impl Iterator<Item = (usize, usize)> + '_ {
    text.split_whitespace().map(move |word| {
        let start = word.as_ptr() as usize - text.as_ptr() as usize;
        (start, start + word.len())
    })
}

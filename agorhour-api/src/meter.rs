use regex::Regex;
use shared_types::Meter;
use std::sync::OnceLock;

const MAX_CALM_LENGTH: usize = 110;

static HARD_PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
static SOFT_PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
static SHOUTING: OnceLock<Regex> = OnceLock::new();

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("meter pattern must compile"))
        .collect()
}

fn hard_patterns() -> &'static [Regex] {
    HARD_PATTERNS.get_or_init(|| {
        compile(&[
            r"\b(kill|murder|rape|lynch|gas|exterminate)\b",
            r"\b(doxx|address|phone|ssn)\b",
        ])
    })
}

fn soft_patterns() -> &'static [Regex] {
    SOFT_PATTERNS.get_or_init(|| compile(&[r"[!?.]{3,}", r"\b(damn|hell|crap)\b"]))
}

fn shouting() -> &'static Regex {
    SHOUTING.get_or_init(|| Regex::new(r"[A-Z]{5,}").expect("meter pattern must compile"))
}

/// Label a draft answer green, yellow or red
///
/// Advisory only: the widget shows it and sends it back as `risk`.
pub fn meter(text: &str) -> Meter {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Meter::Red;
    }

    let lowered = trimmed.to_lowercase();
    if hard_patterns().iter().any(|p| p.is_match(&lowered)) {
        return Meter::Red;
    }

    // Capital runs only show up before lower-casing
    if shouting().is_match(trimmed) || soft_patterns().iter().any(|p| p.is_match(&lowered)) {
        return Meter::Yellow;
    }

    if trimmed.chars().count() > MAX_CALM_LENGTH {
        return Meter::Yellow;
    }

    Meter::Green
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_red() {
        assert_eq!(meter(""), Meter::Red);
        assert_eq!(meter("   \n\t"), Meter::Red);
    }

    #[test]
    fn test_hard_words_are_red() {
        assert_eq!(meter("I would kill for a coffee"), Meter::Red);
        assert_eq!(meter("post his ADDRESS here"), Meter::Red);
    }

    #[test]
    fn test_hard_words_need_word_boundaries() {
        assert_eq!(meter("skills matter"), Meter::Green);
        assert_eq!(meter("gasoline prices"), Meter::Green);
    }

    #[test]
    fn test_soft_signals_are_yellow() {
        assert_eq!(meter("this is SO WRONG"), Meter::Yellow);
        assert_eq!(meter("really?!?"), Meter::Yellow);
        assert_eq!(meter("what the hell"), Meter::Yellow);
    }

    #[test]
    fn test_long_text_is_yellow() {
        let long = "a calm sentence ".repeat(8);
        assert!(long.chars().count() > 110);
        assert_eq!(meter(&long), Meter::Yellow);
    }

    #[test]
    fn test_plain_text_is_green() {
        assert_eq!(meter("Remote work is better for focus."), Meter::Green);
    }
}

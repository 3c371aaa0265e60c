//! Chat command recognition

/// A recognized "find a match" request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BotCommand {
    pub seed_id: i64,
}

impl BotCommand {
    /// Recognize `trigger` at the start of `text` (case-insensitive).
    ///
    /// A numeric id after the trigger (`123`, `id123`, `vk.com/id123`)
    /// selects the seed; otherwise the sender is the seed.
    pub fn parse(text: &str, sender_id: i64, trigger: &str) -> Option<Self> {
        let text = text.trim().to_lowercase();
        let trigger = trigger.trim().to_lowercase();
        let rest = text.strip_prefix(&trigger)?;

        // "find me a pairs" is not the trigger
        if rest.chars().next().is_some_and(char::is_alphanumeric) {
            return None;
        }

        let seed_id = explicit_id(rest).unwrap_or(sender_id);
        Some(Self { seed_id })
    }
}

/// URL and screen-name prefixes accepted in front of a numeric id
const ID_PREFIXES: [&str; 5] = ["https://", "http://", "m.", "vk.com/", "id"];

/// The id directly after the trigger: `123`, `id123` or `vk.com/id123`,
/// ending at whitespace or the end of the message
fn explicit_id(rest: &str) -> Option<i64> {
    let rest = rest.trim_start_matches(|c: char| c.is_whitespace() || matches!(c, ',' | ':' | '-'));
    let mut token = rest.split_whitespace().next()?;
    for prefix in ID_PREFIXES {
        token = token.strip_prefix(prefix).unwrap_or(token);
    }

    if token.is_empty() || !token.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    token.parse::<i64>().ok().filter(|id| *id > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIGGER: &str = "find me a pair";

    #[test]
    fn test_trigger_uses_sender() {
        assert_eq!(
            BotCommand::parse("Find me a pair", 42, TRIGGER),
            Some(BotCommand { seed_id: 42 })
        );
        assert_eq!(
            BotCommand::parse("  find me a pair!  ", 42, TRIGGER),
            Some(BotCommand { seed_id: 42 })
        );
    }

    #[test]
    fn test_explicit_id_forms() {
        for text in [
            "find me a pair 813472314",
            "find me a pair id813472314",
            "find me a pair https://vk.com/id813472314",
            "find me a pair: vk.com/id813472314",
            "find me a pair 813472314 please",
        ] {
            assert_eq!(
                BotCommand::parse(text, 1, TRIGGER).map(|c| c.seed_id),
                Some(813_472_314),
                "{text}"
            );
        }
    }

    #[test]
    fn test_other_text_ignored() {
        assert!(BotCommand::parse("hello", 1, TRIGGER).is_none());
        assert!(BotCommand::parse("please find me a pair", 1, TRIGGER).is_none());
        assert!(BotCommand::parse("find me a pairs", 1, TRIGGER).is_none());
    }

    #[test]
    fn test_numbers_in_free_text_are_not_ids() {
        for text in [
            "find me a pair, I am 30 years old",
            "find me a pair for 2 weeks",
            "find me a pair id12abc",
            "find me a pair!",
        ] {
            assert_eq!(
                BotCommand::parse(text, 42, TRIGGER).map(|c| c.seed_id),
                Some(42),
                "{text}"
            );
        }
    }

    #[test]
    fn test_zero_id_falls_back_to_sender() {
        assert_eq!(
            BotCommand::parse("find me a pair 0", 7, TRIGGER).map(|c| c.seed_id),
            Some(7)
        );
    }
}

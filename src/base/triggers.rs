//! Trigger literals and the message classifier.
//!
//! Matching is case-sensitive substring containment: `"hey @all!"` and `"@allright"`
//! both request a notification.

use serde::Deserialize;

/// Literals that request an all-member notification, in every supported language.
pub const MULTILINGUAL_NOTIFY_TRIGGERS: &[&str] = &["@all", "@everyone", "@все", "@каждый"];

/// Literals that request a joke link, in every supported language.
pub const MULTILINGUAL_JOKE_TRIGGERS: &[&str] = &["@joke", "@anecdote", "@анекдот", "@анек"];

/// ASCII-only notification literals.
pub const ENGLISH_NOTIFY_TRIGGERS: &[&str] = &["@all", "@everyone"];

/// ASCII-only joke literals.
pub const ENGLISH_JOKE_TRIGGERS: &[&str] = &["@joke", "@anecdote"];

/// Literals that request the usage message.
pub const HELP_TRIGGERS: &[&str] = &["@help"];

/// Selects which trigger literals are active.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// English and Russian literals.
    #[default]
    Multilingual,
    /// English literals only.
    English,
}

/// Immutable set of trigger literals, built once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerSet {
    notify: Vec<String>,
    joke: Vec<String>,
    help: Vec<String>,
}

impl TriggerSet {
    /// Builds the trigger set for a locale.
    pub fn for_locale(locale: Locale) -> Self {
        let (notify, joke) = match locale {
            Locale::Multilingual => (MULTILINGUAL_NOTIFY_TRIGGERS, MULTILINGUAL_JOKE_TRIGGERS),
            Locale::English => (ENGLISH_NOTIFY_TRIGGERS, ENGLISH_JOKE_TRIGGERS),
        };

        Self::new(notify, joke, HELP_TRIGGERS)
    }

    pub fn new(notify: &[&str], joke: &[&str], help: &[&str]) -> Self {
        let owned = |literals: &[&str]| literals.iter().map(|s| s.to_string()).collect();

        Self {
            notify: owned(notify),
            joke: owned(joke),
            help: owned(help),
        }
    }

    /// Whether the text asks to ping every member of the chat.
    pub fn requests_notify_all(&self, text: &str) -> bool {
        contains_any(text, &self.notify)
    }

    /// Whether the text asks for a random joke link.
    pub fn requests_joke(&self, text: &str) -> bool {
        contains_any(text, &self.joke)
    }

    /// Whether the text asks for the usage message.
    pub fn requests_help(&self, text: &str) -> bool {
        contains_any(text, &self.help)
    }

    pub fn notify_literals(&self) -> &[String] {
        &self.notify
    }

    pub fn joke_literals(&self) -> &[String] {
        &self.joke
    }
}

fn contains_any(text: &str, literals: &[String]) -> bool {
    literals.iter().any(|literal| text.contains(literal.as_str()))
}

// Tests.

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_notify_triggers() {
        let triggers = TriggerSet::for_locale(Locale::Multilingual);

        assert!(triggers.requests_notify_all("@all come here"));
        assert!(triggers.requests_notify_all("ping @everyone please"));
        assert!(triggers.requests_notify_all("@все сюда"));
        assert!(triggers.requests_notify_all("@каждый"));
        assert!(!triggers.requests_notify_all("hello all"));
        assert!(!triggers.requests_notify_all(""));
    }

    #[test]
    fn test_matching_is_case_sensitive_substring() {
        let triggers = TriggerSet::for_locale(Locale::Multilingual);

        assert!(triggers.requests_notify_all("@allright"));
        assert!(triggers.requests_notify_all("mail me at x@all.com"));
        assert!(!triggers.requests_notify_all("@ALL"));
        assert!(!triggers.requests_joke("@Joke"));
    }

    #[test]
    fn test_joke_triggers() {
        let triggers = TriggerSet::for_locale(Locale::Multilingual);

        assert!(triggers.requests_joke("@joke"));
        assert!(triggers.requests_joke("tell an @anecdote"));
        assert!(triggers.requests_joke("@анек"));
        assert!(triggers.requests_joke("@анекдот"));
        assert!(!triggers.requests_joke("joke"));
    }

    #[test]
    fn test_english_locale_ignores_cyrillic() {
        let triggers = TriggerSet::for_locale(Locale::English);

        assert!(triggers.requests_notify_all("@everyone"));
        assert!(triggers.requests_joke("@joke"));
        assert!(!triggers.requests_notify_all("@все"));
        assert!(!triggers.requests_joke("@анекдот"));
    }

    #[test]
    fn test_predicates_are_independent() {
        let triggers = TriggerSet::for_locale(Locale::Multilingual);
        let text = "@all @joke @help";

        assert!(triggers.requests_notify_all(text));
        assert!(triggers.requests_joke(text));
        assert!(triggers.requests_help(text));
    }

    proptest! {
        #[test]
        fn prop_any_notify_literal_matches(prefix in ".*", suffix in ".*", idx in 0usize..MULTILINGUAL_NOTIFY_TRIGGERS.len()) {
            let triggers = TriggerSet::for_locale(Locale::Multilingual);
            let text = format!("{prefix}{}{suffix}", MULTILINGUAL_NOTIFY_TRIGGERS[idx]);

            prop_assert!(triggers.requests_notify_all(&text));
        }

        #[test]
        fn prop_any_joke_literal_matches(prefix in ".*", suffix in ".*", idx in 0usize..MULTILINGUAL_JOKE_TRIGGERS.len()) {
            let triggers = TriggerSet::for_locale(Locale::Multilingual);
            let text = format!("{prefix}{}{suffix}", MULTILINGUAL_JOKE_TRIGGERS[idx]);

            prop_assert!(triggers.requests_joke(&text));
        }

        #[test]
        fn prop_text_without_at_sign_never_matches(text in "[^@]*") {
            let triggers = TriggerSet::for_locale(Locale::Multilingual);

            prop_assert!(!triggers.requests_notify_all(&text));
            prop_assert!(!triggers.requests_joke(&text));
        }
    }
}

use toml::Value;


/// Formatting codes recognized after the escape character.
const FORMATTING_CODES: &str = "0123456789AaBbCcDdEeFfKkLlMmNnOoRrXx";


/// Cosmetic filter applied to string values only.
///
/// Documents spell formatting codes with a user-friendly escape character
/// (`&a`), while objects hold them with the internal marker character (`§a`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextDecoration {
    pub marker: char,
    pub escape: char,
}

impl Default for TextDecoration {
    fn default() -> Self {
        Self {
            marker: '§',
            escape: '&',
        }
    }
}

impl TextDecoration {
    pub const fn new(marker: char, escape: char) -> Self {
        Self { marker, escape }
    }

    /// Document form to in-memory form: every escape character followed by
    /// a formatting code becomes the marker, and the code is lower-cased.
    pub fn decorate(&self, text: &str) -> String {
        let mut decorated = String::with_capacity(text.len());
        let mut characters = text.chars().peekable();

        while let Some(character) = characters.next() {
            match characters.peek() {
                Some(&code) if character == self.escape && FORMATTING_CODES.contains(code) => {
                    decorated.push(self.marker);
                    decorated.push(code.to_ascii_lowercase());
                    characters.next();
                }
                _ => decorated.push(character),
            }
        }

        decorated
    }

    /// In-memory form to document form: every marker becomes the escape character.
    pub fn undecorate(&self, text: &str) -> String {
        text.chars()
            .map(|character| {
                if character == self.marker {
                    self.escape
                } else {
                    character
                }
            })
            .collect()
    }

    pub(crate) fn decorate_value(&self, value: Value) -> Value {
        match value {
            Value::String(text) => Value::String(self.decorate(&text)),
            other => other,
        }
    }

    pub(crate) fn undecorate_value(&self, value: Value) -> Value {
        match value {
            Value::String(text) => Value::String(self.undecorate(&text)),
            other => other,
        }
    }
}


#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn decorates_known_codes_only() {
        let decoration = TextDecoration::default();

        assert_eq!(decoration.decorate("&aGreen &Lbold"), "§aGreen §lbold");
        assert_eq!(decoration.decorate("fish & chips"), "fish & chips");
        assert_eq!(decoration.decorate("&zz"), "&zz");
        assert_eq!(decoration.decorate("trailing &"), "trailing &");
    }

    #[test]
    fn undecorates_every_marker() {
        let decoration = TextDecoration::default();
        assert_eq!(decoration.undecorate("§aGreen §"), "&aGreen &");
    }

    #[test]
    fn non_string_values_pass_through() {
        let decoration = TextDecoration::default();

        assert_eq!(
            decoration.decorate_value(Value::Integer(7)),
            Value::Integer(7)
        );
        assert_eq!(
            decoration.undecorate_value(Value::Boolean(true)),
            Value::Boolean(true)
        );
        assert_eq!(
            decoration.decorate_value(Value::String("&1".to_string())),
            Value::String("§1".to_string())
        );
    }

    #[test]
    fn custom_characters() {
        let decoration = TextDecoration::new('\u{1}', '^');
        assert_eq!(decoration.decorate("^b"), "\u{1}b");
        assert_eq!(decoration.undecorate("\u{1}b"), "^b");
    }

    proptest! {
        #[test]
        fn decorated_text_survives_undecorate_then_decorate(
            segments in proptest::collection::vec(("[0-9a-fk-orx]", "[^§&]{0,8}"), 0..8)
        ) {
            let decoration = TextDecoration::default();
            let text = segments
                .iter()
                .map(|(code, plain)| format!("§{code}{plain}"))
                .collect::<String>();

            prop_assert_eq!(decoration.decorate(&decoration.undecorate(&text)), text);
        }

        #[test]
        fn document_text_survives_decorate_then_undecorate(text in "[^§]*") {
            let decoration = TextDecoration::default();
            let lowered = lowercase_codes(&text);

            prop_assert_eq!(decoration.undecorate(&decoration.decorate(&lowered)), lowered);
        }
    }

    /// Lower-case every code following an escape, the only change `decorate` makes
    /// that `undecorate` cannot restore.
    fn lowercase_codes(text: &str) -> String {
        let mut lowered = String::with_capacity(text.len());
        let mut previous_was_escape = false;

        for character in text.chars() {
            if previous_was_escape && FORMATTING_CODES.contains(character) {
                lowered.push(character.to_ascii_lowercase());
                previous_was_escape = false;
            } else {
                lowered.push(character);
                previous_was_escape = character == '&';
            }
        }

        lowered
    }
}

use pianola_types::TriggerKey;

/// Platform-neutral key as delivered by the host, before normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Space,
    Tab,
    Escape,
    Other,
}

/// Keyboard layout configuration for key translation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyboardLayout {
    #[default]
    Qwerty,
    Colemak,
}

/// Keys whose host default (focus cycling, activation, scrolling) is
/// swallowed while the piano has the keyboard.
pub fn suppresses_default(key: Key) -> bool {
    matches!(key, Key::Space | Key::Enter | Key::Tab)
}

/// Map a host key to its canonical trigger identifier.
///
/// Named keys resolve through the table below; printable keys are lowercased
/// and shifted punctuation folds onto the physical key it shares, so holding
/// shift does not change which note plays.
pub fn normalize(key: Key, layout: KeyboardLayout) -> Option<TriggerKey> {
    match key {
        Key::Enter => Some(TriggerKey::Enter),
        Key::Char(c) => {
            let c = fold_shifted(c.to_ascii_lowercase());
            Some(TriggerKey::Char(translate_key(c, layout)))
        }
        Key::Space | Key::Tab | Key::Escape | Key::Other => None,
    }
}

fn fold_shifted(c: char) -> char {
    match c {
        ':' => ';',
        '"' => '\'',
        '}' => ']',
        '|' => '\\',
        other => other,
    }
}

/// Translate a key character from the configured layout to QWERTY physical position.
pub fn translate_key(c: char, layout: KeyboardLayout) -> char {
    match layout {
        KeyboardLayout::Qwerty => c,
        KeyboardLayout::Colemak => colemak_to_qwerty(c),
    }
}

fn colemak_to_qwerty(c: char) -> char {
    match c {
        // top row
        'f' => 'e', 'p' => 'r', 'g' => 't', 'j' => 'y',
        'l' => 'u', 'u' => 'i', 'y' => 'o', ';' => 'p',
        // home row
        'r' => 's', 's' => 'd', 't' => 'f', 'd' => 'g',
        'n' => 'j', 'e' => 'k', 'i' => 'l', 'o' => ';',
        // bottom row
        'k' => 'n',
        other => other,
    }
}

pub fn parse_keyboard_layout(s: &str) -> Option<KeyboardLayout> {
    match s.to_ascii_lowercase().as_str() {
        "qwerty" => Some(KeyboardLayout::Qwerty),
        "colemak" => Some(KeyboardLayout::Colemak),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_lowercase() {
        assert_eq!(
            normalize(Key::Char('A'), KeyboardLayout::Qwerty),
            Some(TriggerKey::Char('a'))
        );
    }

    #[test]
    fn enter_is_named() {
        assert_eq!(normalize(Key::Enter, KeyboardLayout::Qwerty), Some(TriggerKey::Enter));
    }

    #[test]
    fn shifted_punctuation_folds() {
        let q = KeyboardLayout::Qwerty;
        assert_eq!(normalize(Key::Char(':'), q), Some(TriggerKey::Char(';')));
        assert_eq!(normalize(Key::Char('"'), q), Some(TriggerKey::Char('\'')));
        assert_eq!(normalize(Key::Char('}'), q), Some(TriggerKey::Char(']')));
        assert_eq!(normalize(Key::Char('|'), q), Some(TriggerKey::Char('\\')));
    }

    #[test]
    fn non_note_keys_have_no_trigger() {
        let q = KeyboardLayout::Qwerty;
        assert_eq!(normalize(Key::Space, q), None);
        assert_eq!(normalize(Key::Tab, q), None);
        assert_eq!(normalize(Key::Escape, q), None);
    }

    #[test]
    fn default_suppression() {
        assert!(suppresses_default(Key::Space));
        assert!(suppresses_default(Key::Enter));
        assert!(suppresses_default(Key::Tab));
        assert!(!suppresses_default(Key::Char('a')));
        assert!(!suppresses_default(Key::Escape));
    }

    #[test]
    fn colemak_translation() {
        let c = KeyboardLayout::Colemak;
        // Colemak 'r' sits where QWERTY has 's'
        assert_eq!(normalize(Key::Char('r'), c), Some(TriggerKey::Char('s')));
        assert_eq!(normalize(Key::Char('o'), c), Some(TriggerKey::Char(';')));
        assert_eq!(normalize(Key::Char('a'), c), Some(TriggerKey::Char('a')));
    }

    #[test]
    fn parse_layout_names() {
        assert_eq!(parse_keyboard_layout("Colemak"), Some(KeyboardLayout::Colemak));
        assert_eq!(parse_keyboard_layout("dvorak"), None);
    }
}

//! Translation of terminal text into the key codes the game understands.
//!
//! Input is line based: every character of a line becomes one key press.
//! Vi keys and the numeric keypad digits move, space and `.` search, and the
//! escape sequences a terminal emits for arrows, Home, End, Page Up and Page
//! Down are decoded as those keys.

use ananas_core::{keys, InputEvent};

/// Splits a line of terminal input into key events.
pub(crate) fn decode_line(line: &str) -> Vec<InputEvent> {
    let mut events = Vec::new();
    let mut chars = line.chars().peekable();

    while let Some(current) = chars.next() {
        if current == '\x1b' && chars.peek() == Some(&'[') {
            let _ = chars.next();
            let mut sequence = String::new();
            while let Some(&next) = chars.peek() {
                sequence.push(next);
                let _ = chars.next();
                if next.is_ascii_alphabetic() || next == '~' {
                    break;
                }
            }
            if let Some(code) = escape_code(&sequence) {
                events.push(InputEvent::new(code));
            }
            continue;
        }

        if current == '\n' || current == '\r' {
            continue;
        }
        if let Some(code) = char_code(current) {
            events.push(InputEvent::new(code));
        }
    }

    events
}

fn escape_code(sequence: &str) -> Option<u32> {
    let code = match sequence {
        "A" => keys::UP,
        "B" => keys::DOWN,
        "C" => keys::RIGHT,
        "D" => keys::LEFT,
        "H" | "1~" | "7~" => keys::HOME,
        "F" | "4~" | "8~" => keys::END,
        "5~" => keys::PAGE_UP,
        "6~" => keys::PAGE_DOWN,
        _ => return None,
    };
    Some(code)
}

/// Key code for a printable character.
///
/// Unbound letters keep their upper-case ASCII value, the way browsers report
/// letter keys, so the player controller sees and ignores them. Any other
/// unbound character produces no key press.
fn char_code(glyph: char) -> Option<u32> {
    let code = match glyph {
        'k' | '8' => keys::UP,
        'u' | '9' => keys::PAGE_UP,
        'l' | '6' => keys::RIGHT,
        'n' | '3' => keys::PAGE_DOWN,
        'j' | '2' => keys::DOWN,
        'b' | '1' => keys::END,
        'h' | '4' => keys::LEFT,
        'y' | '7' => keys::HOME,
        ' ' | '.' | '5' => keys::SPACE,
        other if other.is_ascii_alphabetic() => u32::from(other.to_ascii_uppercase()),
        _ => return None,
    };
    Some(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(line: &str) -> Vec<u32> {
        decode_line(line)
            .into_iter()
            .map(|event| event.key_code())
            .collect()
    }

    #[test]
    fn vi_keys_cover_every_direction() {
        assert_eq!(
            codes("kulnjbhy"),
            vec![38, 33, 39, 34, 40, 35, 37, 36]
        );
    }

    #[test]
    fn keypad_digits_mirror_vi_keys() {
        assert_eq!(codes("8963214 7 5"), codes("kulnjbh y ."));
    }

    #[test]
    fn arrow_escape_sequences_are_decoded() {
        assert_eq!(
            codes("\x1b[A\x1b[C\x1b[5~\x1b[F"),
            vec![keys::UP, keys::RIGHT, keys::PAGE_UP, keys::END]
        );
    }

    #[test]
    fn unknown_escape_sequences_are_dropped() {
        assert_eq!(codes("\x1b[Zl"), vec![keys::RIGHT]);
    }

    #[test]
    fn unbound_letters_report_upper_case_codes() {
        assert_eq!(codes("q\r\n"), vec![81]);
    }

    #[test]
    fn unbound_punctuation_produces_no_key() {
        assert!(codes("&(%'!\"#$").is_empty());
        assert_eq!(codes("!l0@"), vec![keys::RIGHT]);
    }
}

// Chunk: docs/chunks/headless_replay - Key script parsing for headless runs
//!
//! Key scripts: a compact text form of a key sequence.
//!
//! Plain characters stand for themselves. Special keys and chords are
//! written in angle brackets, Emacs style:
//!
//! | Script          | Event                     |
//! |-----------------|---------------------------|
//! | `a`             | `a`                       |
//! | `<RET>`         | Return (a literal newline works too) |
//! | `<TAB>` `<BS>` `<DEL>` `<ESC>` | Tab, Backspace, Delete, Escape |
//! | `<LEFT>` `<RIGHT>` `<UP>` `<DOWN>` `<HOME>` `<END>` | motion keys |
//! | `<SPC>` `<LT>`  | space, `<`                |
//! | `<C-s>`         | Ctrl+S                    |
//! | `<M-x>`         | Alt+X                     |
//! | `<C-SPC>`       | Ctrl+Space                |

use thiserror::Error;

use lite_edit_input::{Key, KeyEvent, Modifiers};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyScriptError {
    #[error("unterminated '<' at offset {offset}")]
    Unterminated { offset: usize },
    #[error("unknown key <{name}> at offset {offset}")]
    UnknownKey { name: String, offset: usize },
}

/// Parses a key script into events.
pub fn parse_key_script(script: &str) -> Result<Vec<KeyEvent>, KeyScriptError> {
    let mut events = Vec::new();
    let mut rest = script;
    let mut offset = 0;

    while let Some(ch) = rest.chars().next() {
        let consumed = match ch {
            '<' => {
                let close = rest.find('>').ok_or(KeyScriptError::Unterminated { offset })?;
                events.push(parse_tag(&rest[1..close], offset)?);
                close + 1
            }
            '\n' => {
                events.push(KeyEvent::plain(Key::Return));
                1
            }
            _ => {
                events.push(KeyEvent::char(ch));
                ch.len_utf8()
            }
        };
        rest = &rest[consumed..];
        offset += consumed;
    }
    Ok(events)
}

/// Parses the inside of `<...>`: modifier prefixes, then one key.
fn parse_tag(tag: &str, offset: usize) -> Result<KeyEvent, KeyScriptError> {
    let unknown = || KeyScriptError::UnknownKey {
        name: tag.to_string(),
        offset,
    };

    let mut modifiers = Modifiers::default();
    let mut name = tag;
    loop {
        if let Some(rest) = name.strip_prefix("C-") {
            modifiers.control = true;
            name = rest;
        } else if let Some(rest) = name.strip_prefix("M-") {
            modifiers.alt = true;
            name = rest;
        } else if let Some(rest) = name.strip_prefix("S-") {
            modifiers.shift = true;
            name = rest;
        } else {
            break;
        }
    }

    let key = match name {
        "RET" => Key::Return,
        "TAB" => Key::Tab,
        "BS" => Key::Backspace,
        "DEL" => Key::Delete,
        "ESC" => Key::Escape,
        "LEFT" => Key::Left,
        "RIGHT" => Key::Right,
        "UP" => Key::Up,
        "DOWN" => Key::Down,
        "HOME" => Key::Home,
        "END" => Key::End,
        "SPC" => Key::Char(' '),
        "LT" => Key::Char('<'),
        _ => {
            let mut chars = name.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => Key::Char(ch),
                _ => return Err(unknown()),
            }
        }
    };
    Ok(KeyEvent::new(key, modifiers))
}

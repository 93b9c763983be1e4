//! Character to Morse symbol table
//!
//! Letters are case-insensitive. Anything outside letters, digits, comma,
//! period and question mark maps to the empty symbol, which the sequencer
//! renders as a bare inter-character gap (this is how word spaces come out).

use crate::types::Element;

/// Empty symbol for unsupported input
pub const DEFAULT_SYMBOL: &str = "";

const LETTERS: [&str; 26] = [
    ".-", "-...", "-.-.", "-..", ".", "..-.", "--.", "....", "..", ".---", "-.-", ".-..", "--",
    "-.", "---", ".--.", "--.-", ".-.", "...", "-", "..-", "...-", ".--", "-..-", "-.--", "--..",
];

const DIGITS: [&str; 10] = [
    "-----", ".----", "..---", "...--", "....-", ".....", "-....", "--...", "---..", "----.",
];

const COMMA: &str = "--..--";
const PERIOD: &str = ".-.-.-";
const QUESTION_MARK: &str = "..--..";

/// Symbol for one input byte, never fails
pub const fn lookup(byte: u8) -> &'static str {
    match byte {
        b'a'..=b'z' => LETTERS[(byte - b'a') as usize],
        b'A'..=b'Z' => LETTERS[(byte - b'A') as usize],
        b'0'..=b'9' => DIGITS[(byte - b'0') as usize],
        b',' => COMMA,
        b'.' => PERIOD,
        b'?' => QUESTION_MARK,
        _ => DEFAULT_SYMBOL,
    }
}

/// Symbol for any character; non-ASCII input maps to the empty symbol
pub fn lookup_char(c: char) -> &'static str {
    if c.is_ascii() {
        lookup(c as u8)
    } else {
        DEFAULT_SYMBOL
    }
}

/// True if `byte` produces at least one pulse
pub const fn is_encodable(byte: u8) -> bool {
    !lookup(byte).is_empty()
}

/// Elements of the symbol for `byte`, in transmission order
pub fn elements(byte: u8) -> impl Iterator<Item = Element> {
    lookup(byte).bytes().filter_map(Element::from_symbol_byte)
}

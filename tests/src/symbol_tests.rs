//! Symbol table lookups

use morse_core::symbol::{elements, is_encodable, lookup, lookup_char, DEFAULT_SYMBOL};
use morse_core::Element;
use rstest::rstest;

#[rstest]
#[case(b's', "...")]
#[case(b'o', "---")]
#[case(b'0', "-----")]
#[case(b'5', ".....")]
#[case(b'?', "..--..")]
#[case(b',', "--..--")]
#[case(b'.', ".-.-.-")]
#[case(b'e', ".")]
#[case(b't', "-")]
#[case(b'q', "--.-")]
#[case(b'y', "-.--")]
fn test_known_symbols(#[case] byte: u8, #[case] code: &str) {
    assert_eq!(lookup(byte), code);
}

#[rstest]
#[case(b' ')]
#[case(b'\t')]
#[case(b'\n')]
#[case(b'\0')]
#[case(b'!')]
#[case(b'/')]
#[case(b':')]
#[case(b'@')]
#[case(b'_')]
#[case(b'~')]
#[case(0x80)]
#[case(0xff)]
fn test_unsupported_bytes(#[case] byte: u8) {
    assert_eq!(lookup(byte), DEFAULT_SYMBOL);
    assert!(!is_encodable(byte));
    assert_eq!(elements(byte).count(), 0);
}

#[rstest]
#[case('a', 'A')]
#[case('m', 'M')]
#[case('z', 'Z')]
fn test_case_folding(#[case] lower: char, #[case] upper: char) {
    assert_eq!(lookup_char(lower), lookup_char(upper));
    assert!(!lookup_char(lower).is_empty());
}

#[test]
fn test_non_ascii_characters() {
    for c in ['é', 'ß', 'Ж', '日', '\u{10FFFF}'] {
        assert_eq!(lookup_char(c), DEFAULT_SYMBOL);
    }
}

#[test]
fn test_every_letter_and_digit_is_distinct() {
    let mut seen: Vec<&str> = (b'a'..=b'z').chain(b'0'..=b'9').map(lookup).collect();
    let total = seen.len();
    seen.sort_unstable();
    seen.dedup();
    assert_eq!(seen.len(), total);
}

#[test]
fn test_elements_follow_symbol() {
    let dashes: Vec<Element> = elements(b'0').collect();
    assert_eq!(dashes, vec![Element::Dash; 5]);

    let question: String = elements(b'?').map(|e| e.as_char()).collect();
    assert_eq!(question, "..--..");
}

//! Character constants and per-char classifiers used by the scanner.

pub const NULL_CHARACTER: char = '\0';
pub const LINE_FEED: char = '\n';
pub const CARRIAGE_RETURN: char = '\r';
pub const TAB: char = '\t';

/// Check if a character is a line terminator.
#[inline]
pub fn is_line_break(ch: char) -> bool {
    ch == LINE_FEED || ch == CARRIAGE_RETURN
}

/// Check if a character is whitespace (not line break).
#[inline]
pub fn is_white_space_single_line(ch: char) -> bool {
    matches!(
        ch,
        ' ' | '\t'
            | '\u{000B}' // vertical tab
            | '\u{000C}' // form feed
            | '\u{00A0}' // no-break space
            | '\u{1680}' // ogham space mark
            | '\u{2000}'..='\u{200A}' // various spaces
            | '\u{202F}' // narrow no-break space
            | '\u{205F}' // medium mathematical space
            | '\u{3000}' // ideographic space
            | '\u{FEFF}' // BOM / zero-width no-break space
    )
}

/// Check if a character is a decimal digit.
#[inline]
pub fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}

/// Check if a character is a letter.
#[inline]
pub fn is_letter(ch: char) -> bool {
    ch.is_alphabetic()
}

/// Translate the char following an escape character.
///
/// Only `\0`, `\r`, `\n` and `\t` have a meaning; any other char stands for itself.
#[inline]
pub fn translate_escape(ch: char) -> char {
    match ch {
        '0' => NULL_CHARACTER,
        'r' => CARRIAGE_RETURN,
        'n' => LINE_FEED,
        't' => TAB,
        other => other,
    }
}

//! Character reference states for the HTML tokenizer.
//!
//! [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
//! through
//! [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)

use super::core::{HTMLTokenizer, TokenizerState};
use super::named_character_references::{any_entity_has_prefix, lookup_entity};
use crate::error::ParseErrorCode;

/// [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
///
/// "If the number is one of the numbers in the first column of the following
/// table, then find the row with that number in the first column, and set the
/// character reference code to the number in the second column of that row."
const C1_CONTROL_REPLACEMENTS: [(u32, u32); 27] = [
    (0x80, 0x20AC), // EURO SIGN (€)
    (0x82, 0x201A), // SINGLE LOW-9 QUOTATION MARK (‚)
    (0x83, 0x0192), // LATIN SMALL LETTER F WITH HOOK (ƒ)
    (0x84, 0x201E), // DOUBLE LOW-9 QUOTATION MARK („)
    (0x85, 0x2026), // HORIZONTAL ELLIPSIS (…)
    (0x86, 0x2020), // DAGGER (†)
    (0x87, 0x2021), // DOUBLE DAGGER (‡)
    (0x88, 0x02C6), // MODIFIER LETTER CIRCUMFLEX ACCENT (ˆ)
    (0x89, 0x2030), // PER MILLE SIGN (‰)
    (0x8A, 0x0160), // LATIN CAPITAL LETTER S WITH CARON (Š)
    (0x8B, 0x2039), // SINGLE LEFT-POINTING ANGLE QUOTATION MARK (‹)
    (0x8C, 0x0152), // LATIN CAPITAL LIGATURE OE (Œ)
    (0x8E, 0x017D), // LATIN CAPITAL LETTER Z WITH CARON (Ž)
    (0x91, 0x2018), // LEFT SINGLE QUOTATION MARK (‘)
    (0x92, 0x2019), // RIGHT SINGLE QUOTATION MARK (’)
    (0x93, 0x201C), // LEFT DOUBLE QUOTATION MARK (“)
    (0x94, 0x201D), // RIGHT DOUBLE QUOTATION MARK (”)
    (0x95, 0x2022), // BULLET (•)
    (0x96, 0x2013), // EN DASH (–)
    (0x97, 0x2014), // EM DASH (—)
    (0x98, 0x02DC), // SMALL TILDE (˜)
    (0x99, 0x2122), // TRADE MARK SIGN (™)
    (0x9A, 0x0161), // LATIN SMALL LETTER S WITH CARON (š)
    (0x9B, 0x203A), // SINGLE RIGHT-POINTING ANGLE QUOTATION MARK (›)
    (0x9C, 0x0153), // LATIN SMALL LIGATURE OE (œ)
    (0x9E, 0x017E), // LATIN SMALL LETTER Z WITH CARON (ž)
    (0x9F, 0x0178), // LATIN CAPITAL LETTER Y WITH DIAERESIS (Ÿ)
];

/// Anything above this is already out of range; keeps the accumulator from
/// overflowing on `&#99999999999;`.
const CODE_CEILING: u32 = 0x11_0000;

/// [§ 4.6 Code points](https://infra.spec.whatwg.org/#noncharacter)
const fn is_noncharacter(code: u32) -> bool {
    matches!(code, 0xFDD0..=0xFDEF) || (code & 0xFFFE) == 0xFFFE
}

/// [§ 4.6 Code points](https://infra.spec.whatwg.org/#control)
/// "A control is a C0 control or a code point in the range U+007F DELETE to
/// U+009F APPLICATION PROGRAM COMMAND, inclusive."
const fn is_control(code: u32) -> bool {
    code <= 0x1F || matches!(code, 0x7F..=0x9F)
}

/// Apply the checks of the numeric character reference end state to `code`.
///
/// Returns the character to use and the parse error, if any.
pub(super) fn resolve_numeric_reference(code: u32) -> (char, Option<ParseErrorCode>) {
    // "If the number is 0x00, then this is a null-character-reference parse
    // error. Set the character reference code to 0xFFFD."
    if code == 0 {
        return ('\u{FFFD}', Some(ParseErrorCode::NullCharacterReference));
    }
    // "If the number is greater than 0x10FFFF, then this is a
    // character-reference-outside-unicode-range parse error."
    if code > 0x10_FFFF {
        return (
            '\u{FFFD}',
            Some(ParseErrorCode::CharacterReferenceOutsideUnicodeRange),
        );
    }
    // "If the number is a surrogate, then this is a
    // surrogate-character-reference parse error."
    if matches!(code, 0xD800..=0xDFFF) {
        return ('\u{FFFD}', Some(ParseErrorCode::SurrogateCharacterReference));
    }

    let mut error = None;
    let mut code = code;
    // "If the number is a noncharacter, then this is a
    // noncharacter-character-reference parse error."
    if is_noncharacter(code) {
        error = Some(ParseErrorCode::NoncharacterCharacterReference);
    }
    // "If the number is 0x0D, or a control that's not ASCII whitespace, then
    // this is a control-character-reference parse error."
    if code == 0x0D || (is_control(code) && !matches!(code, 0x09 | 0x0A | 0x0C | 0x20)) {
        error = Some(ParseErrorCode::ControlCharacterReference);
        if let Some(&(_, replacement)) = C1_CONTROL_REPLACEMENTS
            .iter()
            .find(|&&(from, _)| from == code)
        {
            code = replacement;
        }
    }
    (char::from_u32(code).unwrap_or('\u{FFFD}'), error)
}

impl HTMLTokenizer {
    /// Returns true if the return state is an attribute value state.
    /// "consumed as part of an attribute"
    pub(super) const fn is_consumed_as_part_of_attribute(&self) -> bool {
        matches!(
            self.return_state,
            TokenizerState::AttributeValueDoubleQuoted
                | TokenizerState::AttributeValueSingleQuoted
                | TokenizerState::AttributeValueUnquoted
        )
    }

    /// Append `c` to the current attribute's value when the reference sits in
    /// an attribute, otherwise emit it as a character token.
    fn emit_or_append_to_attribute(&mut self, c: char) {
        if self.is_consumed_as_part_of_attribute() {
            self.append_to_attribute_value(c);
        } else {
            self.emit_character_token(c);
        }
    }

    /// "Flush code points consumed as a character reference"
    ///
    /// "If the character reference was consumed as part of an attribute, then
    /// append each character to the current attribute's value. Otherwise,
    /// emit each character as a character token."
    pub(super) fn flush_code_points_consumed_as_character_reference(&mut self) {
        let buffer = std::mem::take(&mut self.temporary_buffer);
        for c in buffer.chars() {
            self.emit_or_append_to_attribute(c);
        }
        self.temporary_buffer = buffer;
    }

    /// [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
    pub(super) fn handle_character_reference_state(&mut self) {
        // "Set the temporary buffer to the empty string. Append a U+0026
        // AMPERSAND (&) character to the temporary buffer."
        self.temporary_buffer.clear();
        self.temporary_buffer.push('&');

        match self.current_input_character {
            // "ASCII alphanumeric: Reconsume in the named character reference state."
            Some(c) if c.is_ascii_alphanumeric() => {
                self.reconsume_in(TokenizerState::NamedCharacterReference);
            }
            // "U+0023 NUMBER SIGN (#): Append the current input character to the
            // temporary buffer. Switch to the numeric character reference state."
            Some('#') => {
                self.temporary_buffer.push('#');
                self.switch_to(TokenizerState::NumericCharacterReference);
            }
            // "Anything else: Flush code points consumed as a character
            // reference. Reconsume in the return state."
            _ => {
                self.flush_code_points_consumed_as_character_reference();
                self.reconsume_in(self.return_state);
            }
        }
    }

    /// [§ 13.2.5.73 Named character reference state](https://html.spec.whatwg.org/multipage/parsing.html#named-character-reference-state)
    ///
    /// "Consume the maximum number of characters possible, where the consumed
    /// characters are one of the identifiers in the first column of the named
    /// character references table."
    ///
    /// We enter this state via reconsume, so the current input character is
    /// the first alphanumeric of the name. The scan looks ahead in the input
    /// and then moves the position to just past the longest match.
    pub(super) fn handle_named_character_reference_state(&mut self) {
        let Some(first) = self.current_input_character else {
            self.reconsume_in(TokenizerState::AmbiguousAmpersand);
            return;
        };
        let start = self.current_pos - first.len_utf8();

        let mut longest_match: Option<(usize, &'static str)> = None;
        let mut end = start;
        for c in self.input[start..].chars() {
            if !(c.is_ascii_alphanumeric() || c == ';') {
                break;
            }
            let candidate = &self.input[start..end + c.len_utf8()];
            if !any_entity_has_prefix(candidate) {
                break;
            }
            end += c.len_utf8();
            if let Some(replacement) = lookup_entity(candidate) {
                longest_match = Some((end, replacement));
            }
            if c == ';' {
                break;
            }
        }

        // "Otherwise: Flush code points consumed as a character reference.
        // Switch to the ambiguous ampersand state."
        let Some((match_end, replacement)) = longest_match else {
            self.flush_code_points_consumed_as_character_reference();
            self.reconsume_in(TokenizerState::AmbiguousAmpersand);
            return;
        };

        self.current_pos = match_end;
        let matched_name = &self.input[start..match_end];
        let ends_with_semicolon = matched_name.ends_with(';');
        self.temporary_buffer.push_str(matched_name);

        // "If the character reference was consumed as part of an attribute, and
        // the last character matched is not a U+003B SEMICOLON character (;), and
        // the next input character is either a U+003D EQUALS SIGN character (=) or
        // an ASCII alphanumeric, then, for historical reasons, flush code points
        // consumed as a character reference and switch to the return state."
        if self.is_consumed_as_part_of_attribute() && !ends_with_semicolon {
            let next = self.peek_codepoint(0);
            if next.is_some_and(|c| c == '=' || c.is_ascii_alphanumeric()) {
                self.flush_code_points_consumed_as_character_reference();
                self.switch_to(self.return_state);
                return;
            }
        }

        // "If the last character matched is not a U+003B SEMICOLON character
        // (;), then this is a missing-semicolon-after-character-reference
        // parse error."
        if !ends_with_semicolon {
            self.parse_error(ParseErrorCode::MissingSemicolonAfterCharacterReference);
        }

        // "Set the temporary buffer to the empty string. Append one or two
        // characters corresponding to the character reference name to the
        // temporary buffer. Flush code points consumed as a character
        // reference. Switch to the return state."
        self.temporary_buffer.clear();
        self.temporary_buffer.push_str(replacement);
        self.flush_code_points_consumed_as_character_reference();
        self.switch_to(self.return_state);
    }

    /// [§ 13.2.5.74 Ambiguous ampersand state](https://html.spec.whatwg.org/multipage/parsing.html#ambiguous-ampersand-state)
    pub(super) fn handle_ambiguous_ampersand_state(&mut self) {
        match self.current_input_character {
            // "ASCII alphanumeric: If the character reference was consumed as
            // part of an attribute, then append the current input character to
            // the current attribute's value. Otherwise, emit the current input
            // character as a character token."
            Some(c) if c.is_ascii_alphanumeric() => self.emit_or_append_to_attribute(c),
            // "U+003B SEMICOLON (;): This is an unknown-named-character-reference
            // parse error. Reconsume in the return state."
            Some(';') => {
                self.parse_error(ParseErrorCode::UnknownNamedCharacterReference);
                self.reconsume_in(self.return_state);
            }
            _ => self.reconsume_in(self.return_state),
        }
    }

    /// [§ 13.2.5.75 Numeric character reference state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-state)
    pub(super) fn handle_numeric_character_reference_state(&mut self) {
        // "Set the character reference code to zero (0)."
        self.character_reference_code = 0;

        match self.current_input_character {
            // "U+0078 LATIN SMALL LETTER X / U+0058 LATIN CAPITAL LETTER X:
            // Append the current input character to the temporary buffer.
            // Switch to the hexadecimal character reference start state."
            Some(c @ ('x' | 'X')) => {
                self.temporary_buffer.push(c);
                self.switch_to(TokenizerState::HexadecimalCharacterReferenceStart);
            }
            // "Anything else: Reconsume in the decimal character reference start state."
            _ => self.reconsume_in(TokenizerState::DecimalCharacterReferenceStart),
        }
    }

    /// [§ 13.2.5.76 Hexadecimal character reference start state](https://html.spec.whatwg.org/multipage/parsing.html#hexadecimal-character-reference-start-state)
    pub(super) fn handle_hexadecimal_character_reference_start_state(&mut self) {
        match self.current_input_character {
            Some(c) if c.is_ascii_hexdigit() => {
                self.reconsume_in(TokenizerState::HexadecimalCharacterReference);
            }
            _ => self.absence_of_digits(),
        }
    }

    /// [§ 13.2.5.77 Decimal character reference start state](https://html.spec.whatwg.org/multipage/parsing.html#decimal-character-reference-start-state)
    pub(super) fn handle_decimal_character_reference_start_state(&mut self) {
        match self.current_input_character {
            Some(c) if c.is_ascii_digit() => {
                self.reconsume_in(TokenizerState::DecimalCharacterReference);
            }
            _ => self.absence_of_digits(),
        }
    }

    /// "This is an absence-of-digits-in-numeric-character-reference parse
    /// error. Flush code points consumed as a character reference. Reconsume
    /// in the return state."
    fn absence_of_digits(&mut self) {
        self.parse_error(ParseErrorCode::AbsenceOfDigitsInNumericCharacterReference);
        self.flush_code_points_consumed_as_character_reference();
        self.reconsume_in(self.return_state);
    }

    /// [§ 13.2.5.78 Hexadecimal character reference state](https://html.spec.whatwg.org/multipage/parsing.html#hexadecimal-character-reference-state)
    pub(super) fn handle_hexadecimal_character_reference_state(&mut self) {
        self.numeric_digits(16);
    }

    /// [§ 13.2.5.79 Decimal character reference state](https://html.spec.whatwg.org/multipage/parsing.html#decimal-character-reference-state)
    pub(super) fn handle_decimal_character_reference_state(&mut self) {
        self.numeric_digits(10);
    }

    fn numeric_digits(&mut self, radix: u32) {
        match self.current_input_character {
            // "Multiply the character reference code by 16 (10). Add a numeric
            // version of the current input character to the character
            // reference code."
            Some(c) if c.is_digit(radix) => {
                let digit = c.to_digit(radix).unwrap_or(0);
                self.character_reference_code = self
                    .character_reference_code
                    .saturating_mul(radix)
                    .saturating_add(digit)
                    .min(CODE_CEILING);
            }
            // "U+003B SEMICOLON: Switch to the numeric character reference end state."
            Some(';') => self.switch_to(TokenizerState::NumericCharacterReferenceEnd),
            // "Anything else: This is a missing-semicolon-after-character-reference
            // parse error. Reconsume in the numeric character reference end state."
            _ => {
                self.parse_error(ParseErrorCode::MissingSemicolonAfterCharacterReference);
                self.reconsume_in(TokenizerState::NumericCharacterReferenceEnd);
            }
        }
    }

    /// [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
    ///
    /// The standard's end state does not consume a character. The main loop
    /// has already consumed one (or is reconsuming the character that ended
    /// the digits), so it is handed back to the return state.
    pub(super) fn handle_numeric_character_reference_end_state(&mut self) {
        let (c, error) = resolve_numeric_reference(self.character_reference_code);
        if let Some(code) = error {
            self.parse_error(code);
        }

        // "Set the temporary buffer to the empty string. Append a code point
        // equal to the character reference code to the temporary buffer. Flush
        // code points consumed as a character reference. Switch to the return
        // state."
        self.temporary_buffer.clear();
        self.temporary_buffer.push(c);
        self.flush_code_points_consumed_as_character_reference();
        self.reconsume_in(self.return_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_c1_controls_are_remapped() {
        assert_eq!(
            resolve_numeric_reference(0x80),
            ('€', Some(ParseErrorCode::ControlCharacterReference))
        );
        assert_eq!(
            resolve_numeric_reference(0x9F),
            ('Ÿ', Some(ParseErrorCode::ControlCharacterReference))
        );
        // 0x81 has no replacement and stays as-is
        assert_eq!(
            resolve_numeric_reference(0x81),
            ('\u{81}', Some(ParseErrorCode::ControlCharacterReference))
        );
    }

    #[test]
    fn test_invalid_code_points_become_replacement_character() {
        assert_eq!(
            resolve_numeric_reference(0),
            ('\u{FFFD}', Some(ParseErrorCode::NullCharacterReference))
        );
        assert_eq!(
            resolve_numeric_reference(0xD800),
            ('\u{FFFD}', Some(ParseErrorCode::SurrogateCharacterReference))
        );
        assert_eq!(
            resolve_numeric_reference(CODE_CEILING),
            (
                '\u{FFFD}',
                Some(ParseErrorCode::CharacterReferenceOutsideUnicodeRange)
            )
        );
    }

    #[test]
    fn test_whitespace_and_noncharacters() {
        assert_eq!(resolve_numeric_reference(0x0A), ('\n', None));
        assert_eq!(
            resolve_numeric_reference(0x0D),
            ('\r', Some(ParseErrorCode::ControlCharacterReference))
        );
        assert_eq!(
            resolve_numeric_reference(0xFFFF),
            (
                '\u{FFFF}',
                Some(ParseErrorCode::NoncharacterCharacterReference)
            )
        );
        assert_eq!(resolve_numeric_reference(0x41), ('A', None));
    }
}

// Copyright 2025 Vivian Voss. Licensed under the Apache Licence, Version 2.0.
// SPDX-Licence-Identifier: Apache-2.0

#[cfg(test)]
mod tests {
    use crate::hivereg::codec::{dump_str, parse_str};
    use crate::hivereg::wide::WideString;

    const QUOTES: [char; 2] = ['"', '"'];
    const BRACKETS: [char; 2] = ['[', ']'];

    fn units(s: &str) -> Vec<u16> {
        s.encode_utf16().collect()
    }

    #[test]
    fn test_plain_ascii_passes_through() {
        assert_eq!(dump_str(&units("Software"), QUOTES), "Software");
    }

    #[test]
    fn test_control_codes_use_letter_escapes() {
        assert_eq!(dump_str(&units("a\tb\nc\r"), QUOTES), "a\\tb\\nc\\r");
        assert_eq!(dump_str(&[0x07, 0x08, 0x0b, 0x0c, 0x1b], QUOTES), "\\a\\b\\v\\f\\e");
    }

    #[test]
    fn test_other_controls_use_octal() {
        // 0x01 not followed by an octal digit: minimal form.
        assert_eq!(dump_str(&[0x01, b'x' as u16], QUOTES), "\\1x");
        // 0x01 followed by '3' (an octal digit): padded to three digits.
        assert_eq!(dump_str(&[0x01, b'3' as u16], QUOTES), "\\0013");
    }

    #[test]
    fn test_high_units_use_hex_escapes() {
        // Minimal form when no hex digit follows.
        assert_eq!(dump_str(&[0x2026], QUOTES), "\\x2026");
        assert_eq!(dump_str(&[0x2026, b'z' as u16], QUOTES), "\\x2026z");
        // Padded form when the next unit is a hex digit.
        assert_eq!(dump_str(&[0x2026, b'b' as u16], QUOTES), "\\x2026b");
        assert_eq!(dump_str(&[0xe9, b'f' as u16], QUOTES), "\\x00e9f");
        assert_eq!(dump_str(&[0xe9, b'g' as u16], QUOTES), "\\xe9g");
    }

    #[test]
    fn test_delimiters_and_backslash_escaped() {
        assert_eq!(dump_str(&units("a\"b\\c"), QUOTES), "a\\\"b\\\\c");
        assert_eq!(dump_str(&units("x[y]z"), BRACKETS), "x\\[y\\]z");
        // Brackets are not special inside quoted strings.
        assert_eq!(dump_str(&units("x[y]z"), QUOTES), "x[y]z");
    }

    #[test]
    fn test_trailing_zero_unit_dropped() {
        let mut data = units("hello");
        data.push(0);
        assert_eq!(dump_str(&data, QUOTES), "hello");
        // A zero in the middle is octal-escaped, not dropped.
        assert_eq!(dump_str(&[b'a' as u16, 0, b'b' as u16], QUOTES), "a\\0b");
    }

    #[test]
    fn test_parse_letter_escapes() {
        let (parsed, consumed) = parse_str("\\a\\b\\e\\f\\n\\r\\t\\v\"rest", '"').unwrap();
        assert_eq!(
            parsed.units(),
            &[0x07, 0x08, 0x1b, 0x0c, 0x0a, 0x0d, 0x09, 0x0b]
        );
        assert_eq!(consumed, 17);
    }

    #[test]
    fn test_parse_hex_escapes() {
        let (parsed, _) = parse_str("\\x41\"", '"').unwrap();
        assert_eq!(parsed.units(), &[0x41]);
        let (parsed, _) = parse_str("\\x265f9\"", '"').unwrap();
        // Four digits consumed, then a literal.
        assert_eq!(parsed.units(), &[0x265f, b'9' as u16]);
        // No hex digit after \x yields the literal 'x'.
        let (parsed, _) = parse_str("\\xg\"", '"').unwrap();
        assert_eq!(parsed.units(), &[b'x' as u16, b'g' as u16]);
    }

    #[test]
    fn test_parse_octal_escapes() {
        let (parsed, _) = parse_str("\\101\"", '"').unwrap();
        assert_eq!(parsed.units(), &[0o101]);
        let (parsed, _) = parse_str("\\18\"", '"').unwrap();
        // '8' stops the octal run.
        assert_eq!(parsed.units(), &[0o1, b'8' as u16]);
    }

    #[test]
    fn test_parse_unknown_escape_is_literal() {
        let (parsed, _) = parse_str("\\q\\\"\"", '"').unwrap();
        assert_eq!(parsed.units(), &[b'q' as u16, b'"' as u16]);
    }

    #[test]
    fn test_parse_unterminated_fails() {
        assert!(parse_str("no terminator", '"').is_err());
        assert!(parse_str("trailing backslash\\", '"').is_err());
    }

    #[test]
    fn test_parse_reports_consumed_length() {
        let (_, consumed) = parse_str("abc] 12345", ']').unwrap();
        assert_eq!(consumed, 4);
    }

    #[test]
    fn test_round_trip_named_cases() {
        let cases: Vec<Vec<u16>> = vec![
            units("plain"),
            units("tab\there"),
            units("quote\"back\\slash"),
            vec![0x0001, 0x0033],          // octal escape glued to a digit
            vec![0x00e9, b'f' as u16],     // hex escape glued to a hex digit
            vec![0xd800, 0xdfff],          // unpaired surrogates survive
            vec![b'a' as u16, 0, b'b' as u16],
            units("ends with high \u{2026}"),
        ];
        for case in cases {
            let dumped = dump_str(&case, QUOTES);
            let (parsed, _) = parse_str(&format!("{}\"", dumped), '"').unwrap();
            assert_eq!(parsed.units(), &case[..], "case {:?} via {:?}", case, dumped);
        }
    }

    #[test]
    fn test_round_trip_randomized() {
        for _ in 0..200 {
            let len = (rand::random::<usize>() % 12) + 1;
            let mut case: Vec<u16> = (0..len).map(|_| rand::random::<u16>()).collect();
            // A trailing zero unit is dropped by design; keep the tail nonzero.
            if let Some(last) = case.last_mut() {
                if *last == 0 {
                    *last = 1;
                }
            }
            let dumped = dump_str(&case, BRACKETS);
            let (parsed, _) = parse_str(&format!("{}]", dumped), ']').unwrap();
            assert_eq!(parsed.units(), &case[..], "case {:?} via {:?}", case, dumped);
        }
    }

    #[test]
    fn test_dump_output_is_ascii() {
        let exotic = WideString::from("日本語 ± ™");
        let dumped = dump_str(exotic.units(), QUOTES);
        assert!(dumped.is_ascii());
    }
}

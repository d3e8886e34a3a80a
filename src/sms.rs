//! GSM 03.38 encoding for SMS bodies.
//!
//! Characters outside the GSM alphabet either have a known replacement, are transliterated
//! to something GSM can carry, or become `?`. Welsh letters are kept: the message is then
//! sent as unicode, which changes how it is split into fragments.

use super::*;

/// The GSM 03.38 basic character set, without the escape character.
const GSM_BASIC: &str = "@£$¥èéùìòÇ\nØø\rÅåΔ_ΦΓΛΩΠΨΣΘΞÆæßÉ !\"#¤%&'()*+,-./0123456789:;<=>?\
                         ¡ABCDEFGHIJKLMNOPQRSTUVWXYZÄÖÑÜ§¿abcdefghijklmnopqrstuvwxyzäöñüà";

/// The GSM 03.38 extension table. Each of these takes two septets.
const GSM_EXTENDED: &str = "^{}\\[~]|€";

/// Welsh letters outside GSM. Any of them forces a unicode message.
const WELSH_NON_GSM: &str = "ÀÁÂÈÊËÌÍÎÏÒÓÔÙÚÛÝŴŶŸẀẂẄỲáâêëíîïóôúûýÿŵŷẁẃẅỳ";

const REPLACEMENTS: &[(char, &str)] = &[
    ('\u{2013}', "-"),   // en dash
    ('\u{2014}', "-"),   // em dash
    ('\u{2026}', "..."), // horizontal ellipsis
    ('\u{2018}', "'"),
    ('\u{2019}', "'"),
    ('\u{201C}', "\""),
    ('\u{201D}', "\""),
    ('\u{180E}', ""),
    ('\u{200B}', ""),
    ('\u{200C}', ""),
    ('\u{200D}', ""),
    ('\u{2060}', ""),
    ('\u{FEFF}', ""),
    ('\u{00A0}', " "),
    ('\t', " "),
];

/// Whether `c` can be sent without switching to unicode.
pub fn is_gsm(c: char) -> bool {
    GSM_BASIC.contains(c) || GSM_EXTENDED.contains(c)
}

fn is_welsh(c: char) -> bool {
    WELSH_NON_GSM.contains(c)
}

/// Encode `content` for SMS.
///
/// ```rust
/// # use notify_fmt::sms;
/// assert_eq!(sms::encode("\u{2018}Hi\u{2019} \u{2013} ok\u{2026}"), "'Hi' - ok...");
/// assert_eq!(sms::encode("Łukasz"), "Lukasz");
/// ```
pub fn encode(content: &str) -> String {
    let mut encoded = String::with_capacity(content.len());
    for c in content.chars() {
        if is_gsm(c) || is_welsh(c) {
            encoded.push(c);
        } else if let Some((_, replacement)) = REPLACEMENTS.iter().find(|(from, _)| *from == c) {
            encoded.push_str(replacement);
        } else {
            encoded.push_str(downgrade(c));
        }
    }
    encoded
}

fn downgrade(c: char) -> &'static str {
    match deunicode::deunicode_char(c) {
        Some(ascii) if !ascii.is_empty() && ascii.chars().all(is_gsm) => ascii,
        _ => {
            tracing::debug!(character = %c.escape_unicode(), "no SMS replacement");
            "?"
        }
    }
}

/// Characters that would not survive [`encode`] unchanged, in order of first appearance.
pub fn non_gsm_characters(content: &str) -> Vec<char> {
    content
        .chars()
        .filter(|&c| !is_gsm(c) && !is_welsh(c))
        .unique()
        .collect()
}

/// Whether the message has to be sent as unicode.
pub fn is_unicode(content: &str) -> bool {
    content.chars().any(is_welsh)
}

/// How many fragments a message of `count` characters is billed as.
///
/// A single message carries 160 GSM characters or 70 unicode ones. Longer messages are
/// split, and each part loses room to the concatenation header.
pub fn fragment_count(count: usize, unicode: bool) -> usize {
    let (single, part) = if unicode { (70, 67) } else { (160, 153) };
    if count <= single {
        1
    } else {
        count.div_ceil(part)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn fragment_boundaries() {
        for (count, expected) in [(0, 1), (160, 1), (161, 2), (306, 2), (307, 3), (612, 4)] {
            assert_eq!(fragment_count(count, false), expected, "{count}");
        }
        for (count, expected) in [(70, 1), (71, 2), (134, 2), (135, 3)] {
            assert_eq!(fragment_count(count, true), expected, "{count}");
        }
    }

    #[test]
    fn replacements_and_downgrades() {
        assert_eq!(encode("a\u{00A0}b\tc"), "a b c");
        assert_eq!(encode("zero\u{200B}width"), "zerowidth");
        assert_eq!(encode("£5 {€}"), "£5 {€}");
        assert_eq!(encode("ł"), "l");
    }

    #[test]
    fn welsh_is_kept_and_flags_unicode() {
        assert_eq!(encode("Croeso i Gymru, ŵyr"), "Croeso i Gymru, ŵyr");
        assert!(is_unicode("ŵyr"));
        assert!(!is_unicode("plain ascii éà"));
        assert_eq!(non_gsm_characters("ŵ ł ł – a"), ['ł', '\u{2013}']);
    }

    proptest! {
        #[test]
        fn more_characters_never_means_fewer_fragments(count in 0usize..2000, unicode: bool) {
            prop_assert!(fragment_count(count + 1, unicode) >= fragment_count(count, unicode));
        }

        #[test]
        fn encoded_text_is_sendable(text in "\\PC{0,40}") {
            prop_assert!(encode(&text).chars().all(|c| is_gsm(c) || is_welsh(c)));
        }
    }
}

use crate::foundation::core::Rgba8Premul;

/// Parse a persisted banner background color.
///
/// Accepts `#RGB`, `#RRGGBB`, `#RRGGBBAA` (case-insensitive, `#` optional) and `transparent`.
/// Anything else yields `None`; the rendering layer then keeps its solid fallback color.
pub fn parse_bg_color(s: &str) -> Option<Rgba8Premul> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("transparent") {
        return Some(Rgba8Premul::from_straight_rgba(0, 0, 0, 0));
    }
    let s = s.strip_prefix('#').unwrap_or(s);
    if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    fn hex_byte(pair: &str) -> Option<u8> {
        u8::from_str_radix(pair, 16).ok()
    }

    fn hex_nibble(c: &str) -> Option<u8> {
        let v = u8::from_str_radix(c, 16).ok()?;
        Some(v * 17)
    }

    let (r, g, b, a) = match s.len() {
        3 => (
            hex_nibble(&s[0..1])?,
            hex_nibble(&s[1..2])?,
            hex_nibble(&s[2..3])?,
            255,
        ),
        6 => (
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
            255,
        ),
        8 => (
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
            hex_byte(&s[6..8])?,
        ),
        _ => return None,
    };

    Some(Rgba8Premul::from_straight_rgba(r, g, b, a))
}

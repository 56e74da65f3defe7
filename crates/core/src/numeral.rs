//! Chinese positional numeral conversion.
//!
//! Handles the small numbers that appear in episode counts: digit characters
//! combined with the magnitude units 十, 百 and 千.

/// Characters accepted by [`parse_chinese_numeral`], usable inside a regex class.
pub const NUMERAL_CHARS: &str = "零一二两三四五六七八九十百千";

/// Error type for numeral conversion failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NumeralError {
    #[error("unrecognized numeral character: {0:?}")]
    Unrecognized(char),

    #[error("numeral evaluates to zero")]
    Zero,

    #[error("numeral overflows u32")]
    Overflow,
}

enum Glyph {
    Digit(u32),
    Unit(u32),
}

fn glyph(c: char) -> Option<Glyph> {
    let glyph = match c {
        '零' => Glyph::Digit(0),
        '一' => Glyph::Digit(1),
        '二' | '两' => Glyph::Digit(2),
        '三' => Glyph::Digit(3),
        '四' => Glyph::Digit(4),
        '五' => Glyph::Digit(5),
        '六' => Glyph::Digit(6),
        '七' => Glyph::Digit(7),
        '八' => Glyph::Digit(8),
        '九' => Glyph::Digit(9),
        '十' => Glyph::Unit(10),
        '百' => Glyph::Unit(100),
        '千' => Glyph::Unit(1000),
        _ => return None,
    };
    Some(glyph)
}

/// Convert a Chinese numeral such as `二十三` or `两百` into an integer.
///
/// A digit is held pending until the next unit multiplies it. A unit with no
/// pending digit counts as one of itself, so `十六` is 16. A trailing digit is
/// added as-is. `零` only clears the pending slot, which makes `一百零五` 105.
///
/// # Errors
///
/// - `Unrecognized` for any character outside [`NUMERAL_CHARS`]
/// - `Zero` when the value is 0 (empty input, `零`)
/// - `Overflow` when the value does not fit in `u32`
pub fn parse_chinese_numeral(input: &str) -> Result<u32, NumeralError> {
    let mut result: u32 = 0;
    let mut pending: u32 = 0;

    for c in input.chars() {
        match glyph(c).ok_or(NumeralError::Unrecognized(c))? {
            Glyph::Digit(value) => pending = value,
            Glyph::Unit(magnitude) => {
                let multiplier = if pending == 0 { 1 } else { pending };
                result = multiplier
                    .checked_mul(magnitude)
                    .and_then(|v| result.checked_add(v))
                    .ok_or(NumeralError::Overflow)?;
                pending = 0;
            }
        }
    }

    result = result.checked_add(pending).ok_or(NumeralError::Overflow)?;

    if result == 0 { Err(NumeralError::Zero) } else { Ok(result) }
}

/// Value of an ASCII or full-width (U+FF10..=U+FF19) decimal digit.
fn decimal_digit(c: char) -> Option<u32> {
    match c {
        '０'..='９' => Some(c as u32 - '０' as u32),
        _ => c.to_digit(10),
    }
}

/// Parse a run of ASCII or full-width decimal digits. `None` when empty or on overflow.
pub(crate) fn parse_decimal(token: &str) -> Option<u32> {
    if token.is_empty() {
        return None;
    }
    token
        .chars()
        .try_fold(0u32, |acc, c| acc.checked_mul(10)?.checked_add(decimal_digit(c)?))
}

/// Parse a count token that is either decimal digits or a Chinese numeral.
pub(crate) fn parse_count(token: &str) -> Option<u32> {
    if token.chars().all(|c| decimal_digit(c).is_some()) {
        parse_decimal(token)
    } else {
        parse_chinese_numeral(token).ok()
    }
}

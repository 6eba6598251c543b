//! Decimal text <-> limb pair conversion without an arbitrary-precision type.

use crate::IntError;
use crate::limb::Limbs;

/// Digits in 2^128 - 1, the longest magnitude either type formats.
pub(crate) const MAX_DIGITS: usize = 39;

/// Splits an optional leading `-` from the numeral.
#[inline(always)]
pub(crate) fn split_sign(bytes: &[u8]) -> (bool, &[u8]) {
    match bytes.split_first() {
        Some((b'-', rest)) => (true, rest),
        _ => (false, bytes),
    }
}

/// Parses an unsigned run of ASCII digits by Horner's method.
///
/// Every byte is checked before a range failure is reported, so text that is
/// both too long and malformed is `InvalidFormat`, never `Overflow`.
pub(crate) fn parse_magnitude(digits: &[u8]) -> crate::Result<Limbs> {
    if digits.is_empty() {
        return Err(IntError::InvalidFormat);
    }

    let mut acc = Some(Limbs::ZERO);
    for &b in digits {
        let digit = b.wrapping_sub(b'0');
        if digit > 9 {
            return Err(IntError::InvalidFormat);
        }
        acc = match acc {
            Some(value) => value.checked_mul10_add(digit),
            None => None,
        };
    }

    acc.ok_or(IntError::Overflow)
}

/// Writes the decimal digits of `magnitude` right-aligned into `buffer` and
/// returns the index of the first digit.
pub(crate) fn format_magnitude(mut magnitude: Limbs, buffer: &mut [u8; MAX_DIGITS]) -> usize {
    let mut pos = MAX_DIGITS;
    loop {
        let (quotient, digit) = magnitude.div_rem_small(10);
        pos -= 1;
        buffer[pos] = b'0' + digit as u8;
        magnitude = quotient;
        if magnitude.is_zero() {
            return pos;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(value: Limbs) -> std::string::String {
        let mut buffer = [0u8; MAX_DIGITS];
        let start = format_magnitude(value, &mut buffer);
        std::string::String::from(core::str::from_utf8(&buffer[start..]).unwrap())
    }

    #[test]
    fn test_split_sign() {
        assert_eq!(split_sign(b"-12"), (true, &b"12"[..]));
        assert_eq!(split_sign(b"12"), (false, &b"12"[..]));
        assert_eq!(split_sign(b"-"), (true, &b""[..]));
        assert_eq!(split_sign(b""), (false, &b""[..]));
    }

    #[test]
    fn test_parse_small() {
        assert_eq!(parse_magnitude(b"0"), Ok(Limbs::ZERO));
        assert_eq!(parse_magnitude(b"42"), Ok(Limbs::new(0, 42)));
        assert_eq!(parse_magnitude(b"0007"), Ok(Limbs::new(0, 7)));
    }

    #[test]
    fn test_parse_crosses_limb_boundary() {
        assert_eq!(
            parse_magnitude(b"18446744073709551615"),
            Ok(Limbs::new(0, u64::MAX))
        );
        assert_eq!(parse_magnitude(b"18446744073709551616"), Ok(Limbs::new(1, 0)));
    }

    #[test]
    fn test_parse_max() {
        assert_eq!(
            parse_magnitude(b"340282366920938463463374607431768211455"),
            Ok(Limbs::new(u64::MAX, u64::MAX))
        );
    }

    #[test]
    fn test_parse_overflow() {
        assert_eq!(
            parse_magnitude(b"340282366920938463463374607431768211456"),
            Err(IntError::Overflow)
        );
        assert_eq!(
            parse_magnitude(b"1000000000000000000000000000000000000000"),
            Err(IntError::Overflow)
        );
        assert_eq!(
            parse_magnitude(b"99999999999999999999999999999999999999999999999999"),
            Err(IntError::Overflow)
        );
    }

    #[test]
    fn test_parse_long_leading_zeros() {
        assert_eq!(
            parse_magnitude(b"0000000000000000000000000000000000000000000000001"),
            Ok(Limbs::new(0, 1))
        );
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(parse_magnitude(b""), Err(IntError::InvalidFormat));
        assert_eq!(parse_magnitude(b"12a"), Err(IntError::InvalidFormat));
        assert_eq!(parse_magnitude(b"+1"), Err(IntError::InvalidFormat));
        assert_eq!(parse_magnitude(b" 1"), Err(IntError::InvalidFormat));
        assert_eq!(parse_magnitude(b"1_000"), Err(IntError::InvalidFormat));
        assert_eq!(parse_magnitude(b"1.0"), Err(IntError::InvalidFormat));
    }

    #[test]
    fn test_parse_invalid_after_overflow() {
        assert_eq!(
            parse_magnitude(b"9999999999999999999999999999999999999999x"),
            Err(IntError::InvalidFormat)
        );
    }

    #[test]
    fn test_format() {
        assert_eq!(format(Limbs::ZERO), "0");
        assert_eq!(format(Limbs::new(0, 9)), "9");
        assert_eq!(format(Limbs::new(0, 10)), "10");
        assert_eq!(format(Limbs::new(1, 0)), "18446744073709551616");
        assert_eq!(
            format(Limbs::new(u64::MAX, u64::MAX)),
            "340282366920938463463374607431768211455"
        );
        assert_eq!(
            format(Limbs::new(1 << 63, 0)),
            "170141183460469231731687303715884105728"
        );
    }
}

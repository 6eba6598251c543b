use core::cmp::Ordering;
use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::IntError;
use crate::decimal::{self, MAX_DIGITS};
use crate::limb::Limbs;

/// Unsigned 128-bit integer stored as two 64-bit limbs.
///
/// Range: 0 ..= 340,282,366,920,938,463,463,374,607,431,768,211,455
///
/// Arithmetic wraps modulo 2^128 and never panics: `Uint128::MAX + Uint128::ONE`
/// is `Uint128::ZERO`. Use [`Uint128::add_with_carry`] and
/// [`Uint128::sub_with_borrow`] to observe the carry or borrow.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Uint128 {
    limbs: Limbs,
}

// ============================================================================
// Constants
// ============================================================================

impl Uint128 {
    /// Zero
    pub const ZERO: Self = Self { limbs: Limbs::ZERO };

    /// One
    pub const ONE: Self = Self::from_limbs(0, 1);

    /// Minimum value: 0
    pub const MIN: Self = Self::ZERO;

    /// Maximum value: 2^128 - 1
    pub const MAX: Self = Self::from_limbs(u64::MAX, u64::MAX);

    /// The size of this type in bytes.
    pub const BYTES: usize = 16;
}

// ============================================================================
// Constructors and Raw Access
// ============================================================================

impl Default for Uint128 {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Uint128 {
    /// Creates a value from its high and low limbs: `hi * 2^64 + lo`.
    #[inline(always)]
    pub const fn from_limbs(hi: u64, lo: u64) -> Self {
        Self {
            limbs: Limbs::new(hi, lo),
        }
    }

    #[inline(always)]
    pub(crate) const fn from_raw_limbs(limbs: Limbs) -> Self {
        Self { limbs }
    }

    #[inline(always)]
    pub(crate) const fn raw_limbs(self) -> Limbs {
        self.limbs
    }

    /// The most significant 64 bits.
    #[inline(always)]
    pub const fn hi(self) -> u64 {
        self.limbs.hi
    }

    /// The least significant 64 bits.
    #[inline(always)]
    pub const fn lo(self) -> u64 {
        self.limbs.lo
    }

    #[inline(always)]
    pub const fn is_zero(self) -> bool {
        self.limbs.is_zero()
    }

    /// Always `false`; present so generic callers can treat both widths alike.
    #[inline(always)]
    pub const fn is_negative(self) -> bool {
        false
    }

    /// Widens a `u64` into the low limb.
    #[inline(always)]
    pub const fn from_u64(value: u64) -> Self {
        Self::from_limbs(0, value)
    }

    #[inline(always)]
    pub const fn from_u128(value: u128) -> Self {
        Self::from_limbs((value >> 64) as u64, value as u64)
    }

    /// Converts to a native `u128`. Never fails.
    #[inline(always)]
    pub const fn to_u128(self) -> u128 {
        ((self.limbs.hi as u128) << 64) | self.limbs.lo as u128
    }
}

// ============================================================================
// Arithmetic Operations
// ============================================================================

impl Uint128 {
    /// `self + rhs + carry` modulo 2^128, with the carry out of bit 127.
    ///
    /// `carry` must be 0 or 1.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn add_with_carry(self, rhs: Self, carry: u64) -> (Self, u64) {
        let (limbs, carry) = self.limbs.add_with_carry(rhs.limbs, carry);
        (Self { limbs }, carry)
    }

    /// `self - rhs - borrow` modulo 2^128, with the borrow out of bit 127.
    ///
    /// `borrow` must be 0 or 1.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn sub_with_borrow(self, rhs: Self, borrow: u64) -> (Self, u64) {
        let (limbs, borrow) = self.limbs.sub_with_borrow(rhs.limbs, borrow);
        (Self { limbs }, borrow)
    }

    /// Wrapping addition. Wraps on overflow.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn wrapping_add(self, rhs: Self) -> Self {
        self.add_with_carry(rhs, 0).0
    }

    /// Wrapping subtraction. Wraps on underflow.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn wrapping_sub(self, rhs: Self) -> Self {
        self.sub_with_borrow(rhs, 0).0
    }

    /// Two's-complement negation, `0 - self`.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn wrapping_neg(self) -> Self {
        Self {
            limbs: self.limbs.negate(),
        }
    }
}

// ============================================================================
// Comparison
// ============================================================================

impl Uint128 {
    #[inline(always)]
    pub const fn equal(self, rhs: Self) -> bool {
        self.limbs.equal(rhs.limbs)
    }

    /// `self < rhs`, read off the borrow of `self - rhs`.
    #[inline(always)]
    pub const fn less(self, rhs: Self) -> bool {
        self.sub_with_borrow(rhs, 0).1 != 0
    }

    #[inline]
    pub const fn compare(self, rhs: Self) -> Ordering {
        if self.equal(rhs) {
            Ordering::Equal
        } else if self.less(rhs) {
            Ordering::Less
        } else {
            Ordering::Greater
        }
    }
}

pub fn compare_uint128(lhs: Uint128, rhs: Uint128) -> Ordering {
    lhs.compare(rhs)
}

pub fn less_uint128(lhs: Uint128, rhs: Uint128) -> bool {
    lhs.less(rhs)
}

impl Ord for Uint128 {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(*other)
    }
}

impl PartialOrd for Uint128 {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// ============================================================================
// String Parsing
// ============================================================================

impl Uint128 {
    /// Parses a base-10 numeral such as `"0"` or `"340282366920938463463374607431768211455"`.
    ///
    /// No sign, whitespace or separators are accepted, except that a leading
    /// `-` is read as a negative numeral: `"-0"` is zero and any other negative
    /// value is [`IntError::Overflow`].
    pub fn from_dec_str(s: &str) -> crate::Result<Self> {
        let (negative, digits) = decimal::split_sign(s.as_bytes());
        let magnitude = Self::parse_digits(digits)?;
        if negative && !magnitude.is_zero() {
            return Err(IntError::Overflow);
        }
        Ok(magnitude)
    }

    /// Unsigned digits only, no sign.
    #[inline]
    pub(crate) fn parse_digits(digits: &[u8]) -> crate::Result<Self> {
        decimal::parse_magnitude(digits).map(Self::from_raw_limbs)
    }

    /// Parses a numeral known to be valid.
    ///
    /// # Panics
    /// Panics if `s` is not a numeral within range.
    pub fn must_parse(s: &str) -> Self {
        match Self::from_dec_str(s) {
            Ok(value) => value,
            Err(_) => panic!("invalid Uint128 literal"),
        }
    }

    /// Parses decimal text given as UTF-8 bytes.
    pub fn from_utf8_bytes(bytes: &[u8]) -> crate::Result<Self> {
        let s = core::str::from_utf8(bytes).map_err(|_| IntError::InvalidFormat)?;
        Self::from_dec_str(s)
    }
}

impl FromStr for Uint128 {
    type Err = IntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_dec_str(s)
    }
}

// ============================================================================
// Bytes Operations
// ============================================================================

impl Uint128 {
    /// Low limb first, each limb little-endian.
    #[inline(always)]
    pub const fn to_le_bytes(self) -> [u8; 16] {
        let lo = self.limbs.lo.to_le_bytes();
        let hi = self.limbs.hi.to_le_bytes();
        let mut out = [0u8; 16];
        let mut i = 0;
        while i < 8 {
            out[i] = lo[i];
            out[i + 8] = hi[i];
            i += 1;
        }
        out
    }

    /// High limb first, each limb big-endian.
    #[inline(always)]
    pub const fn to_be_bytes(self) -> [u8; 16] {
        let hi = self.limbs.hi.to_be_bytes();
        let lo = self.limbs.lo.to_be_bytes();
        let mut out = [0u8; 16];
        let mut i = 0;
        while i < 8 {
            out[i] = hi[i];
            out[i + 8] = lo[i];
            i += 1;
        }
        out
    }

    #[inline(always)]
    pub const fn from_le_bytes(bytes: [u8; Self::BYTES]) -> Self {
        let (lo, hi) = split_halves(bytes);
        Self::from_limbs(u64::from_le_bytes(hi), u64::from_le_bytes(lo))
    }

    #[inline(always)]
    pub const fn from_be_bytes(bytes: [u8; Self::BYTES]) -> Self {
        let (hi, lo) = split_halves(bytes);
        Self::from_limbs(u64::from_be_bytes(hi), u64::from_be_bytes(lo))
    }

    /// Read from the first 16 bytes of a slice (little-endian)
    ///
    /// # Panics
    /// Panics if `bytes` is shorter than 16 bytes.
    #[inline(always)]
    pub fn read_le_bytes(bytes: &[u8]) -> Self {
        assert!(bytes.len() >= Self::BYTES, "buffer too short");
        Self::from_le_bytes(first_16(bytes))
    }

    /// Read from the first 16 bytes of a slice (big-endian)
    ///
    /// # Panics
    /// Panics if `bytes` is shorter than 16 bytes.
    #[inline(always)]
    pub fn read_be_bytes(bytes: &[u8]) -> Self {
        assert!(bytes.len() >= Self::BYTES, "buffer too short");
        Self::from_be_bytes(first_16(bytes))
    }

    #[inline(always)]
    pub fn try_read_le_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::BYTES {
            return None;
        }
        Some(Self::from_le_bytes(first_16(bytes)))
    }

    #[inline(always)]
    pub fn try_read_be_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::BYTES {
            return None;
        }
        Some(Self::from_be_bytes(first_16(bytes)))
    }

    /// Writes into the first 16 bytes of `buf` in little-endian order.
    ///
    /// # Panics
    /// Panics if `buf` is shorter than 16 bytes.
    #[inline(always)]
    pub fn write_le_bytes(&self, buf: &mut [u8]) {
        assert!(buf.len() >= Self::BYTES, "buffer too short");
        buf[..Self::BYTES].copy_from_slice(&self.to_le_bytes());
    }

    /// Writes into the first 16 bytes of `buf` in big-endian order.
    ///
    /// # Panics
    /// Panics if `buf` is shorter than 16 bytes.
    #[inline(always)]
    pub fn write_be_bytes(&self, buf: &mut [u8]) {
        assert!(buf.len() >= Self::BYTES, "buffer too short");
        buf[..Self::BYTES].copy_from_slice(&self.to_be_bytes());
    }

    #[inline(always)]
    pub fn try_write_le_bytes(&self, buf: &mut [u8]) -> Option<()> {
        if buf.len() < Self::BYTES {
            return None;
        }
        buf[..Self::BYTES].copy_from_slice(&self.to_le_bytes());
        Some(())
    }

    #[inline(always)]
    pub fn try_write_be_bytes(&self, buf: &mut [u8]) -> Option<()> {
        if buf.len() < Self::BYTES {
            return None;
        }
        buf[..Self::BYTES].copy_from_slice(&self.to_be_bytes());
        Some(())
    }
}

/// First and second 8-byte halves of a 16-byte array.
#[inline(always)]
pub(crate) const fn split_halves(bytes: [u8; 16]) -> ([u8; 8], [u8; 8]) {
    let mut first = [0u8; 8];
    let mut second = [0u8; 8];
    let mut i = 0;
    while i < 8 {
        first[i] = bytes[i];
        second[i] = bytes[i + 8];
        i += 1;
    }
    (first, second)
}

#[inline(always)]
pub(crate) fn first_16(bytes: &[u8]) -> [u8; 16] {
    let mut array = [0u8; 16];
    array.copy_from_slice(&bytes[..16]);
    array
}

// ============================================================================
// Operator Overloading
// ============================================================================

/// Wraps modulo 2^128.
impl Add for Uint128 {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self::Output {
        self.wrapping_add(rhs)
    }
}

/// Wraps modulo 2^128.
impl Sub for Uint128 {
    type Output = Self;

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self::Output {
        self.wrapping_sub(rhs)
    }
}

/// Two's-complement negation, `0 - self`.
impl Neg for Uint128 {
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self::Output {
        self.wrapping_neg()
    }
}

impl AddAssign for Uint128 {
    #[inline(always)]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Uint128 {
    #[inline(always)]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Sum for Uint128 {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a Uint128> for Uint128 {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, x| acc + *x)
    }
}

// ============================================================================
// Standard Library Trait Implementations
// ============================================================================

impl From<u8> for Uint128 {
    #[inline(always)]
    fn from(value: u8) -> Self {
        Self::from_u64(value as u64)
    }
}

impl From<u32> for Uint128 {
    #[inline(always)]
    fn from(value: u32) -> Self {
        Self::from_u64(value as u64)
    }
}

impl From<u64> for Uint128 {
    #[inline(always)]
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl From<u128> for Uint128 {
    #[inline(always)]
    fn from(value: u128) -> Self {
        Self::from_u128(value)
    }
}

impl From<Uint128> for u128 {
    #[inline(always)]
    fn from(value: Uint128) -> Self {
        value.to_u128()
    }
}

// ============================================================================
// Formatting
// ============================================================================

impl fmt::Display for Uint128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buffer = [0u8; MAX_DIGITS];
        let start = decimal::format_magnitude(self.limbs, &mut buffer);
        let digits = core::str::from_utf8(&buffer[start..]).map_err(|_| fmt::Error)?;
        f.pad_integral(true, "", digits)
    }
}

impl fmt::Debug for Uint128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            f.debug_struct("Uint128")
                .field("hi", &self.limbs.hi)
                .field("lo", &self.limbs.lo)
                .finish()
        } else {
            write!(f, "Uint128({})", self)
        }
    }
}

// ============================================================================
// Serde Support
// ============================================================================

#[cfg(feature = "serde")]
impl Serialize for Uint128 {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() {
            // JSON, TOML, etc. - quoted decimal string
            serializer.collect_str(self)
        } else {
            serializer.serialize_u128(self.to_u128())
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Uint128 {
    fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct Uint128Visitor;

        impl<'de> de::Visitor<'de> for Uint128Visitor {
            type Value = Uint128;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an unsigned 128-bit integer as a decimal string or number")
            }

            fn visit_str<E>(self, v: &str) -> core::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                Uint128::from_dec_str(v).map_err(|_| de::Error::custom(IntError::InvalidValue))
            }

            fn visit_u64<E>(self, v: u64) -> core::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Uint128::from_u64(v))
            }

            fn visit_u128<E>(self, v: u128) -> core::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Uint128::from_u128(v))
            }

            fn visit_i64<E>(self, v: i64) -> core::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                u64::try_from(v)
                    .map(Uint128::from_u64)
                    .map_err(|_| de::Error::custom(IntError::InvalidValue))
            }

            fn visit_i128<E>(self, v: i128) -> core::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                u128::try_from(v)
                    .map(Uint128::from_u128)
                    .map_err(|_| de::Error::custom(IntError::InvalidValue))
            }

            // Bare numerals past 64 bits reach here from serde_json unless
            // `serde-arbitrary-precision` is on; the float has already lost
            // precision.
            fn visit_f64<E>(self, _v: f64) -> core::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                Err(de::Error::custom(IntError::InvalidValue))
            }

            #[cfg(feature = "serde-arbitrary-precision")]
            fn visit_map<A>(self, map: A) -> core::result::Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                crate::serde_number::visit_number_map(map, self)
            }
        }

        if deserializer.is_human_readable() {
            deserializer.deserialize_any(Uint128Visitor)
        } else {
            deserializer.deserialize_u128(Uint128Visitor)
        }
    }
}


#[cfg(test)]
mod arithmetic_tests {
    use super::*;

    fn u(s: &str) -> Uint128 {
        Uint128::must_parse(s)
    }

    #[test]
    fn test_add_with_carry_table() {
        let cases = [
            ("0", "0", "0", 0),
            ("1", "340282366920938463463374607431768211455", "0", 1),
            (
                "170141183460469231731687303715884105727",
                "170141183460469231731687303715884105727",
                "340282366920938463463374607431768211454",
                0,
            ),
            (
                "170141183460469231731687303715884105727",
                "170141183460469231731687303715884105728",
                "340282366920938463463374607431768211455",
                0,
            ),
            (
                "170141183460469231731687303715884105727",
                "170141183460469231731687303715884105729",
                "0",
                1,
            ),
        ];

        for (a, b, s, c) in cases {
            let (a, b, s) = (u(a), u(b), u(s));
            assert_eq!(a.add_with_carry(b, 0), (s, c));
            assert_eq!(s.sub_with_borrow(a, 0), (b, c));
            assert_eq!(s.sub_with_borrow(b, 0), (a, c));
        }
    }

    #[test]
    fn test_add_max_with_carry_in() {
        assert_eq!(
            Uint128::MAX.add_with_carry(Uint128::MAX, 1),
            (Uint128::MAX, 1)
        );
    }

    #[test]
    fn test_wrapping_add() {
        assert_eq!(Uint128::MAX + Uint128::ONE, Uint128::ZERO);
        assert_eq!(
            Uint128::from_u64(u64::MAX) + Uint128::ONE,
            Uint128::from_limbs(1, 0)
        );
    }

    #[test]
    fn test_wrapping_sub() {
        assert_eq!(Uint128::ZERO - Uint128::ONE, Uint128::MAX);
        assert_eq!(
            Uint128::from_limbs(1, 0) - Uint128::ONE,
            Uint128::from_u64(u64::MAX)
        );
    }

    #[test]
    fn test_negation() {
        assert_eq!(-Uint128::ZERO, Uint128::ZERO);
        assert_eq!(-Uint128::ONE, Uint128::MAX);
        assert_eq!(-(-Uint128::from_u64(12345)), Uint128::from_u64(12345));
    }

    #[test]
    fn test_assign_ops() {
        let mut a = Uint128::from_u64(10);
        a += Uint128::from_u64(5);
        assert_eq!(a, Uint128::from_u64(15));
        a -= Uint128::from_u64(20);
        assert_eq!(a, Uint128::MAX - Uint128::from_u64(4));
    }

    #[test]
    fn test_sum() {
        let values = [Uint128::ONE, Uint128::from_u64(2), Uint128::from_u64(3)];
        assert_eq!(values.iter().sum::<Uint128>(), Uint128::from_u64(6));
        assert_eq!(
            [Uint128::MAX, Uint128::from_u64(2)].into_iter().sum::<Uint128>(),
            Uint128::ONE
        );
    }
}

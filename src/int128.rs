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
use crate::uint128::{Uint128, first_16};

/// Signed 128-bit two's-complement integer stored as two 64-bit limbs.
///
/// Range: -170,141,183,460,469,231,731,687,303,715,884,105,728 ..= 170,141,183,460,469,231,731,687,303,715,884,105,727
///
/// Arithmetic uses the same carry chain as [`Uint128`] and wraps modulo 2^128
/// without panicking, signed overflow included: `Int128::MAX + Int128::ONE`
/// is `Int128::MIN`, and `-Int128::MIN` is `Int128::MIN`.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Int128 {
    limbs: Limbs,
}

/// 2^127 - 1, the largest non-negative magnitude.
const POSITIVE_LIMIT: Uint128 = Uint128::from_limbs(i64::MAX as u64, u64::MAX);

/// 2^127, the largest negative magnitude.
const NEGATIVE_LIMIT: Uint128 = Uint128::from_limbs(1 << 63, 0);

// ============================================================================
// Constants
// ============================================================================

impl Int128 {
    /// Zero
    pub const ZERO: Self = Self { limbs: Limbs::ZERO };

    /// One
    pub const ONE: Self = Self::from_limbs(0, 1);

    /// Minus one
    pub const NEG_ONE: Self = Self::from_limbs(u64::MAX, u64::MAX);

    /// Minimum value: -2^127. It has no positive counterpart.
    pub const MIN: Self = Self::from_limbs(1 << 63, 0);

    /// Maximum value: 2^127 - 1
    pub const MAX: Self = Self::from_limbs(i64::MAX as u64, u64::MAX);

    /// The size of this type in bytes.
    pub const BYTES: usize = 16;
}

// ============================================================================
// Constructors and Raw Access
// ============================================================================

impl Default for Int128 {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Int128 {
    /// Creates a value from the raw two's-complement limbs.
    #[inline(always)]
    pub const fn from_limbs(hi: u64, lo: u64) -> Self {
        Self {
            limbs: Limbs::new(hi, lo),
        }
    }

    /// The most significant 64 bits, including the sign bit.
    #[inline(always)]
    pub const fn hi(self) -> u64 {
        self.limbs.hi
    }

    /// The least significant 64 bits.
    #[inline(always)]
    pub const fn lo(self) -> u64 {
        self.limbs.lo
    }

    /// Widens an `i64`, sign-extending into the high limb.
    #[inline(always)]
    pub const fn from_i64(value: i64) -> Self {
        Self::from_limbs((value >> 63) as u64, value as u64)
    }

    /// Creates a value from a native `i128` with the same bits.
    #[inline(always)]
    pub const fn from_i128(value: i128) -> Self {
        Self::from_limbs((value >> 64) as u64, value as u64)
    }

    /// Converts to a native `i128`. Never fails.
    #[inline(always)]
    pub const fn to_i128(self) -> i128 {
        (((self.limbs.hi as u128) << 64) | self.limbs.lo as u128) as i128
    }

    /// Same bits read as unsigned.
    #[inline(always)]
    pub const fn cast_unsigned(self) -> Uint128 {
        Uint128::from_raw_limbs(self.limbs)
    }

    /// Same bits read as two's-complement.
    #[inline(always)]
    pub const fn from_unsigned_bits(value: Uint128) -> Self {
        Self {
            limbs: value.raw_limbs(),
        }
    }
}

// ============================================================================
// Sign Operations
// ============================================================================

impl Int128 {
    #[inline(always)]
    pub const fn is_negative(self) -> bool {
        self.limbs.sign_bit()
    }

    #[inline(always)]
    pub const fn is_positive(self) -> bool {
        !self.is_negative() && !self.is_zero()
    }

    #[inline(always)]
    pub const fn is_zero(self) -> bool {
        self.limbs.is_zero()
    }

    /// Returns -1, 0 or 1.
    #[inline(always)]
    pub const fn signum(self) -> i32 {
        if self.is_negative() {
            -1
        } else if self.is_zero() {
            0
        } else {
            1
        }
    }

    /// Magnitude as an unsigned value, computed as `0 - self` for negatives,
    /// so `Int128::MIN` maps to 2^127.
    #[inline(always)]
    pub const fn unsigned_abs(self) -> Uint128 {
        if self.is_negative() {
            self.cast_unsigned().wrapping_neg()
        } else {
            self.cast_unsigned()
        }
    }
}

// ============================================================================
// Arithmetic Operations
// ============================================================================

impl Int128 {
    /// `self + rhs + carry` on the raw bits, with the unsigned carry out of
    /// bit 127. `carry` must be 0 or 1.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn add_with_carry(self, rhs: Self, carry: u64) -> (Self, u64) {
        let (limbs, carry) = self.limbs.add_with_carry(rhs.limbs, carry);
        (Self { limbs }, carry)
    }

    /// `self - rhs - borrow` on the raw bits, with the unsigned borrow out of
    /// bit 127. `borrow` must be 0 or 1.
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

    /// Wrapping subtraction, `self + (-rhs)`. Wraps on overflow.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn wrapping_sub(self, rhs: Self) -> Self {
        self.wrapping_add(rhs.wrapping_neg())
    }

    /// Two's-complement negation. `Int128::MIN` negates to itself.
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

impl Int128 {
    #[inline(always)]
    pub const fn equal(self, rhs: Self) -> bool {
        self.limbs.equal(rhs.limbs)
    }

    /// Signed `self < rhs` from the flags of `self - rhs`: less iff SF != OF.
    #[inline(always)]
    pub const fn less(self, rhs: Self) -> bool {
        let (r, _) = self.sub_with_borrow(rhs, 0);
        let sf = r.is_negative();
        // Overflow: operand signs differ and the result took the subtrahend's sign.
        let of = (self.is_negative() != rhs.is_negative()) && (r.is_negative() == rhs.is_negative());
        sf != of
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

pub fn compare_int128(lhs: Int128, rhs: Int128) -> Ordering {
    lhs.compare(rhs)
}

pub fn less_int128(lhs: Int128, rhs: Int128) -> bool {
    lhs.less(rhs)
}

impl Ord for Int128 {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(*other)
    }
}

impl PartialOrd for Int128 {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// ============================================================================
// String Parsing
// ============================================================================

impl Int128 {
    /// Parses an optionally negative base-10 numeral such as `"-42"`.
    ///
    /// The magnitude is parsed as a [`Uint128`] and range-checked once the
    /// sign is known, so `"-170141183460469231731687303715884105728"` is
    /// accepted while its positive counterpart is [`IntError::Overflow`].
    pub fn from_dec_str(s: &str) -> crate::Result<Self> {
        let (negative, digits) = decimal::split_sign(s.as_bytes());
        let magnitude = Uint128::parse_digits(digits)?;

        let limit = if negative {
            NEGATIVE_LIMIT
        } else {
            POSITIVE_LIMIT
        };
        if limit.less(magnitude) {
            return Err(IntError::Overflow);
        }

        let value = Self::from_unsigned_bits(magnitude);
        Ok(if negative { value.wrapping_neg() } else { value })
    }

    /// Parses a numeral known to be valid.
    ///
    /// # Panics
    /// Panics if `s` is not a numeral within range.
    pub fn must_parse(s: &str) -> Self {
        match Self::from_dec_str(s) {
            Ok(value) => value,
            Err(_) => panic!("invalid Int128 literal"),
        }
    }

    pub fn from_utf8_bytes(bytes: &[u8]) -> crate::Result<Self> {
        let s = core::str::from_utf8(bytes).map_err(|_| IntError::InvalidFormat)?;
        Self::from_dec_str(s)
    }
}

impl FromStr for Int128 {
    type Err = IntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_dec_str(s)
    }
}

// ============================================================================
// Bytes Operations
// ============================================================================

impl Int128 {
    /// Low limb first, each limb little-endian.
    #[inline(always)]
    pub const fn to_le_bytes(self) -> [u8; 16] {
        self.cast_unsigned().to_le_bytes()
    }

    /// High limb first, each limb big-endian.
    #[inline(always)]
    pub const fn to_be_bytes(self) -> [u8; 16] {
        self.cast_unsigned().to_be_bytes()
    }

    #[inline(always)]
    pub const fn from_le_bytes(bytes: [u8; Self::BYTES]) -> Self {
        Self::from_unsigned_bits(Uint128::from_le_bytes(bytes))
    }

    #[inline(always)]
    pub const fn from_be_bytes(bytes: [u8; Self::BYTES]) -> Self {
        Self::from_unsigned_bits(Uint128::from_be_bytes(bytes))
    }

    /// # Panics
    /// Panics if `bytes` is shorter than 16 bytes.
    #[inline(always)]
    pub fn read_le_bytes(bytes: &[u8]) -> Self {
        assert!(bytes.len() >= Self::BYTES, "buffer too short");
        Self::from_le_bytes(first_16(bytes))
    }

    /// # Panics
    /// Panics if `bytes` is shorter than 16 bytes.
    #[inline(always)]
    pub fn read_be_bytes(bytes: &[u8]) -> Self {
        assert!(bytes.len() >= Self::BYTES, "buffer too short");
        Self::from_be_bytes(first_16(bytes))
    }

    #[inline(always)]
    pub fn try_read_le_bytes(bytes: &[u8]) -> Option<Self> {
        Uint128::try_read_le_bytes(bytes).map(Self::from_unsigned_bits)
    }

    #[inline(always)]
    pub fn try_read_be_bytes(bytes: &[u8]) -> Option<Self> {
        Uint128::try_read_be_bytes(bytes).map(Self::from_unsigned_bits)
    }

    /// # Panics
    /// Panics if `buf` is shorter than 16 bytes.
    #[inline(always)]
    pub fn write_le_bytes(&self, buf: &mut [u8]) {
        self.cast_unsigned().write_le_bytes(buf);
    }

    /// # Panics
    /// Panics if `buf` is shorter than 16 bytes.
    #[inline(always)]
    pub fn write_be_bytes(&self, buf: &mut [u8]) {
        self.cast_unsigned().write_be_bytes(buf);
    }

    #[inline(always)]
    pub fn try_write_le_bytes(&self, buf: &mut [u8]) -> Option<()> {
        self.cast_unsigned().try_write_le_bytes(buf)
    }

    #[inline(always)]
    pub fn try_write_be_bytes(&self, buf: &mut [u8]) -> Option<()> {
        self.cast_unsigned().try_write_be_bytes(buf)
    }
}

// ============================================================================
// Operator Overloading
// ============================================================================

/// Wraps modulo 2^128; signed overflow does not panic.
impl Add for Int128 {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self::Output {
        self.wrapping_add(rhs)
    }
}

/// Wraps modulo 2^128; signed overflow does not panic.
impl Sub for Int128 {
    type Output = Self;

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self::Output {
        self.wrapping_sub(rhs)
    }
}

/// `-Int128::MIN` is `Int128::MIN`.
impl Neg for Int128 {
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self::Output {
        self.wrapping_neg()
    }
}

impl AddAssign for Int128 {
    #[inline(always)]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Int128 {
    #[inline(always)]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Sum for Int128 {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a Int128> for Int128 {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, x| acc + *x)
    }
}

// ============================================================================
// Standard Library Trait Implementations
// ============================================================================

impl From<i32> for Int128 {
    #[inline(always)]
    fn from(value: i32) -> Self {
        Self::from_i64(value as i64)
    }
}

impl From<i64> for Int128 {
    #[inline(always)]
    fn from(value: i64) -> Self {
        Self::from_i64(value)
    }
}

impl From<i128> for Int128 {
    #[inline(always)]
    fn from(value: i128) -> Self {
        Self::from_i128(value)
    }
}

impl From<Int128> for i128 {
    #[inline(always)]
    fn from(value: Int128) -> Self {
        value.to_i128()
    }
}

impl TryFrom<Uint128> for Int128 {
    type Error = IntError;

    #[inline(always)]
    fn try_from(value: Uint128) -> crate::Result<Self> {
        if POSITIVE_LIMIT.less(value) {
            return Err(IntError::Overflow);
        }
        Ok(Self::from_unsigned_bits(value))
    }
}

impl TryFrom<Int128> for Uint128 {
    type Error = IntError;

    #[inline(always)]
    fn try_from(value: Int128) -> crate::Result<Self> {
        if value.is_negative() {
            return Err(IntError::Overflow);
        }
        Ok(value.cast_unsigned())
    }
}

// ============================================================================
// Formatting
// ============================================================================

impl fmt::Display for Int128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buffer = [0u8; MAX_DIGITS];
        let start = decimal::format_magnitude(self.unsigned_abs().raw_limbs(), &mut buffer);
        let digits = core::str::from_utf8(&buffer[start..]).map_err(|_| fmt::Error)?;
        f.pad_integral(!self.is_negative(), "", digits)
    }
}

impl fmt::Debug for Int128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            f.debug_struct("Int128")
                .field("hi", &self.limbs.hi)
                .field("lo", &self.limbs.lo)
                .finish()
        } else {
            write!(f, "Int128({})", self)
        }
    }
}

// ============================================================================
// Serde Support
// ============================================================================

#[cfg(feature = "serde")]
impl Serialize for Int128 {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() {
            serializer.collect_str(self)
        } else {
            serializer.serialize_i128(self.to_i128())
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Int128 {
    fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct Int128Visitor;

        impl<'de> de::Visitor<'de> for Int128Visitor {
            type Value = Int128;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a signed 128-bit integer as a decimal string or number")
            }

            fn visit_str<E>(self, v: &str) -> core::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                Int128::from_dec_str(v).map_err(|_| de::Error::custom(IntError::InvalidValue))
            }

            fn visit_i64<E>(self, v: i64) -> core::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Int128::from_i64(v))
            }

            fn visit_i128<E>(self, v: i128) -> core::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Int128::from_i128(v))
            }

            fn visit_u64<E>(self, v: u64) -> core::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Int128::from_unsigned_bits(Uint128::from_u64(v)))
            }

            fn visit_u128<E>(self, v: u128) -> core::result::Result<Self::Value, E>
            where
                E: de::Error,
            {
                Int128::try_from(Uint128::from_u128(v))
                    .map_err(|_| de::Error::custom(IntError::InvalidValue))
            }

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
            deserializer.deserialize_any(Int128Visitor)
        } else {
            deserializer.deserialize_i128(Int128Visitor)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(Int128::ZERO.to_i128(), 0);
        assert_eq!(Int128::ONE.to_i128(), 1);
        assert_eq!(Int128::NEG_ONE.to_i128(), -1);
        assert_eq!(Int128::MIN.to_i128(), i128::MIN);
        assert_eq!(Int128::MAX.to_i128(), i128::MAX);
        assert_eq!(Int128::default(), Int128::ZERO);
    }

    #[test]
    fn test_from_i64_sign_extends() {
        assert_eq!(Int128::from_i64(-1), Int128::NEG_ONE);
        assert_eq!(Int128::from_i64(i64::MIN).to_i128(), i64::MIN as i128);
        assert_eq!(Int128::from_i64(i64::MAX).hi(), 0);
    }

    #[test]
    fn test_sign_checks() {
        assert!(Int128::MIN.is_negative());
        assert!(Int128::NEG_ONE.is_negative());
        assert!(!Int128::ZERO.is_negative());
        assert!(!Int128::ZERO.is_positive());
        assert!(Int128::MAX.is_positive());
        assert_eq!(Int128::MIN.signum(), -1);
        assert_eq!(Int128::ZERO.signum(), 0);
        assert_eq!(Int128::ONE.signum(), 1);
    }

    #[test]
    fn test_unsigned_abs() {
        assert_eq!(Int128::MIN.unsigned_abs(), NEGATIVE_LIMIT);
        assert_eq!(Int128::MAX.unsigned_abs(), POSITIVE_LIMIT);
        assert_eq!(Int128::NEG_ONE.unsigned_abs(), Uint128::ONE);
    }

    #[test]
    fn test_unsigned_conversions() {
        assert_eq!(Int128::try_from(Uint128::from_u64(5)), Ok(Int128::from_i64(5)));
        assert_eq!(Int128::try_from(NEGATIVE_LIMIT), Err(IntError::Overflow));
        assert_eq!(Int128::try_from(POSITIVE_LIMIT), Ok(Int128::MAX));
        assert_eq!(Uint128::try_from(Int128::NEG_ONE), Err(IntError::Overflow));
        assert_eq!(Uint128::try_from(Int128::MAX), Ok(POSITIVE_LIMIT));
    }
}


#[cfg(test)]
mod comparison_tests {
    use super::*;

    fn i(s: &str) -> Int128 {
        Int128::must_parse(s)
    }

    #[test]
    fn test_compare_table() {
        let cases = [
            ("0", "0", Ordering::Equal),
            ("1", "-1", Ordering::Greater),
            ("-1", "0", Ordering::Less),
            (
                "-170141183460469231731687303715884105728",
                "-170141183460469231731687303715884105727",
                Ordering::Less,
            ),
            (
                "-170141183460469231731687303715884105728",
                "170141183460469231731687303715884105727",
                Ordering::Less,
            ),
            (
                "170141183460469231731687303715884105727",
                "-1",
                Ordering::Greater,
            ),
            ("-9223372036854775808", "9223372036854775808", Ordering::Less),
            (
                "18446744073709551616",
                "18446744073709551615",
                Ordering::Greater,
            ),
        ];

        for (a, b, expected) in cases {
            let (a, b) = (i(a), i(b));
            assert_eq!(compare_int128(a, b), expected);
            assert_eq!(compare_int128(b, a), expected.reverse());
            assert_eq!(less_int128(a, b), expected == Ordering::Less);
            assert_eq!(less_int128(b, a), expected == Ordering::Greater);
        }
    }

    #[test]
    fn test_min_is_least() {
        assert!(Int128::MIN < Int128::MAX);
        assert!(Int128::MIN < Int128::NEG_ONE);
        assert!(!Int128::MIN.less(Int128::MIN));
    }

    #[test]
    fn test_differs_from_unsigned_order() {
        // Bit patterns compare the other way round as unsigned.
        assert!(Int128::NEG_ONE < Int128::ONE);
        assert!(Int128::ONE.cast_unsigned() < Int128::NEG_ONE.cast_unsigned());
    }
}

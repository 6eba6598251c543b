//! Two-limb carry-chain arithmetic shared by [`Uint128`](crate::Uint128) and
//! [`Int128`](crate::Int128).
//!
//! Signedness never reaches this module: both types hand it the same bit
//! pattern and only interpret the result differently.

/// A 128-bit value as `hi * 2^64 + lo`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Limbs {
    pub(crate) lo: u64,
    pub(crate) hi: u64,
}

impl Limbs {
    pub(crate) const ZERO: Self = Self { lo: 0, hi: 0 };

    #[inline(always)]
    pub(crate) const fn new(hi: u64, lo: u64) -> Self {
        Self { lo, hi }
    }

    #[inline(always)]
    pub(crate) const fn is_zero(self) -> bool {
        self.lo == 0 && self.hi == 0
    }

    /// Top bit of the high limb.
    #[inline(always)]
    pub(crate) const fn sign_bit(self) -> bool {
        self.hi >> 63 != 0
    }

    #[inline(always)]
    pub(crate) const fn equal(self, rhs: Self) -> bool {
        self.lo == rhs.lo && self.hi == rhs.hi
    }

    /// `self + rhs + carry`, returning the sum modulo 2^128 and the carry out
    /// of bit 127. `carry` must be 0 or 1.
    #[inline(always)]
    pub(crate) const fn add_with_carry(self, rhs: Self, carry: u64) -> (Self, u64) {
        debug_assert!(carry <= 1, "carry must be 0 or 1");
        let (lo, carry) = add_limb(self.lo, rhs.lo, carry);
        let (hi, carry) = add_limb(self.hi, rhs.hi, carry);
        (Self { lo, hi }, carry)
    }

    /// `self - rhs - borrow`, returning the difference modulo 2^128 and the
    /// borrow out of bit 127. `borrow` must be 0 or 1.
    #[inline(always)]
    pub(crate) const fn sub_with_borrow(self, rhs: Self, borrow: u64) -> (Self, u64) {
        debug_assert!(borrow <= 1, "borrow must be 0 or 1");
        let (lo, borrow) = sub_limb(self.lo, rhs.lo, borrow);
        let (hi, borrow) = sub_limb(self.hi, rhs.hi, borrow);
        (Self { lo, hi }, borrow)
    }

    /// Two's-complement negation, `0 - self`.
    #[inline(always)]
    pub(crate) const fn negate(self) -> Self {
        Self::ZERO.sub_with_borrow(self, 0).0
    }

    /// Shifts left by `n` bits (`1..=63`), returning the shifted value and the
    /// bits pushed out of the high limb.
    #[inline(always)]
    const fn shl_small(self, n: u32) -> (Self, u64) {
        debug_assert!(n > 0 && n < 64);
        let out = self.hi >> (64 - n);
        let hi = (self.hi << n) | (self.lo >> (64 - n));
        let lo = self.lo << n;
        (Self { lo, hi }, out)
    }

    /// One Horner step: `self * 10 + digit`, or `None` if the result needs a
    /// 129th bit.
    #[inline]
    pub(crate) const fn checked_mul10_add(self, digit: u8) -> Option<Self> {
        debug_assert!(digit <= 9);
        let (x8, out8) = self.shl_small(3);
        let (x2, out2) = self.shl_small(1);
        let (x10, c1) = x8.add_with_carry(x2, 0);
        let (sum, c2) = x10.add_with_carry(Self::new(0, digit as u64), 0);
        if (out8 | out2 | c1 | c2) != 0 {
            None
        } else {
            Some(sum)
        }
    }

    /// Schoolbook long division by a 32-bit divisor, high limb first.
    ///
    /// Each limb is split into 32-bit halves so every partial dividend,
    /// `remainder * 2^32 + half`, stays below `divisor * 2^32` and fits a `u64`.
    #[inline]
    pub(crate) const fn div_rem_small(self, divisor: u32) -> (Self, u32) {
        assert!(divisor != 0, "attempt to divide by zero");
        let d = divisor as u64;
        let (hi, rem) = div_rem_limb(self.hi, 0, d);
        let (lo, rem) = div_rem_limb(self.lo, rem, d);
        (Self { lo, hi }, rem as u32)
    }
}

#[inline(always)]
const fn add_limb(a: u64, b: u64, carry: u64) -> (u64, u64) {
    let (sum, c1) = a.overflowing_add(b);
    let (sum, c2) = sum.overflowing_add(carry);
    (sum, (c1 | c2) as u64)
}

#[inline(always)]
const fn sub_limb(a: u64, b: u64, borrow: u64) -> (u64, u64) {
    let (diff, b1) = a.overflowing_sub(b);
    let (diff, b2) = diff.overflowing_sub(borrow);
    (diff, (b1 | b2) as u64)
}

#[inline(always)]
const fn div_rem_limb(limb: u64, rem: u64, d: u64) -> (u64, u64) {
    let upper = (rem << 32) | (limb >> 32);
    let q_upper = upper / d;
    let lower = ((upper % d) << 32) | (limb & 0xFFFF_FFFF);
    let q_lower = lower / d;
    ((q_upper << 32) | q_lower, lower % d)
}

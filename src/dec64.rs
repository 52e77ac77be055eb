use core::cmp::Ordering;
use core::fmt;
use core::iter::{Product, Sum};
use core::ops::{Add, Div, Mul, Neg, Rem, Sub};

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::Dec64Error;

/// DEC64 number: a 56-bit signed decimal coefficient and an 8-bit signed
/// exponent packed into one `i64`, denoting `coefficient × 10^exponent`.
///
/// The exponent byte value -128 is reserved as the NaN sentinel. Distinct bit
/// patterns may denote the same number (`2 × 10^0` and `20 × 10^-1`), so
/// equality goes through [`Dec64::equals`], never raw bit comparison —
/// `PartialEq` is wired accordingly.
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct Dec64 {
    value: i64,
}

// ============================================================================
// Constants
// ============================================================================

impl Dec64 {
    /// Largest coefficient: 2^55 - 1.
    pub const MAX_COEFFICIENT: i64 = 36_028_797_018_963_967;

    /// Smallest coefficient: -2^55.
    pub const MIN_COEFFICIENT: i64 = -36_028_797_018_963_968;

    /// Largest exponent.
    pub const MAX_EXPONENT: i8 = 127;

    /// Smallest exponent. The byte below it (-128) is the NaN sentinel.
    pub const MIN_EXPONENT: i8 = -127;

    /// Not a number: the single NaN bit pattern produced by all operators.
    pub const NAN: Self = Self { value: 0x80 };

    /// Zero, at exponent zero.
    pub const ZERO: Self = Self { value: 0 };

    /// One.
    pub const ONE: Self = Self { value: 1 << 8 };

    /// Two.
    pub const TWO: Self = Self { value: 2 << 8 };

    /// Negative one.
    pub const NEGATIVE_ONE: Self = Self { value: -(1 << 8) };

    /// Largest integer at exponent zero: `MAX_COEFFICIENT`.
    pub const MAXINT: Self = Self {
        value: Self::MAX_COEFFICIENT << 8,
    };

    /// Smallest positive number: `1 × 10^-127`.
    pub const MINNUM: Self = Self {
        value: (1 << 8) | 0x81,
    };

    /// Largest number: `MAX_COEFFICIENT × 10^127`.
    pub const MAXNUM: Self = Self {
        value: (Self::MAX_COEFFICIENT << 8) | 127,
    };
}

// ============================================================================
// Packing Internals
// ============================================================================

/// Powers of ten for rescaling, alignment and the reciprocal loop.
const POW10: [i128; 39] = [
    1,
    10,
    100,
    1_000,
    10_000,
    100_000,
    1_000_000,
    10_000_000,
    100_000_000,
    1_000_000_000,
    10_000_000_000,
    100_000_000_000,
    1_000_000_000_000,
    10_000_000_000_000,
    100_000_000_000_000,
    1_000_000_000_000_000,
    10_000_000_000_000_000,
    100_000_000_000_000_000,
    1_000_000_000_000_000_000,
    10_000_000_000_000_000_000,
    100_000_000_000_000_000_000,
    1_000_000_000_000_000_000_000,
    10_000_000_000_000_000_000_000,
    100_000_000_000_000_000_000_000,
    1_000_000_000_000_000_000_000_000,
    10_000_000_000_000_000_000_000_000,
    100_000_000_000_000_000_000_000_000,
    1_000_000_000_000_000_000_000_000_000,
    10_000_000_000_000_000_000_000_000_000,
    100_000_000_000_000_000_000_000_000_000,
    1_000_000_000_000_000_000_000_000_000_000,
    10_000_000_000_000_000_000_000_000_000_000,
    100_000_000_000_000_000_000_000_000_000_000,
    1_000_000_000_000_000_000_000_000_000_000_000,
    10_000_000_000_000_000_000_000_000_000_000_000,
    100_000_000_000_000_000_000_000_000_000_000_000,
    1_000_000_000_000_000_000_000_000_000_000_000_000,
    10_000_000_000_000_000_000_000_000_000_000_000_000,
    100_000_000_000_000_000_000_000_000_000_000_000_000,
];

/// Magic constant for exact division by ten: ceil(2^67 / 10).
const RECIP_TEN: u128 = 0xCCCC_CCCC_CCCC_CCCD;
const RECIP_TEN_SHIFT: u32 = 67;

/// Divides by ten via a 128-bit multiply-high. Exact for every `u64`.
#[inline(always)]
const fn div10(n: u64) -> u64 {
    ((n as u128 * RECIP_TEN) >> RECIP_TEN_SHIFT) as u64
}

/// Bits above the 56-bit coefficient field, sign bit excluded.
const COEFFICIENT_OVERFLOW_MASK: u64 = 0x7F00_0000_0000_0000;

/// Fast coefficient-range reject: true when the magnitude sets any bit above
/// the 56-bit field. One-sided — a clear mask does not prove the value fits
/// (2^55 slips through), so the exact range test stays authoritative.
#[inline(always)]
const fn coefficient_overflow(coefficient: i64) -> bool {
    coefficient.unsigned_abs() & COEFFICIENT_OVERFLOW_MASK != 0
}

#[inline(always)]
const fn in_coefficient_range(coefficient: i64) -> bool {
    coefficient >= Dec64::MIN_COEFFICIENT && coefficient <= Dec64::MAX_COEFFICIENT
}

/// Assembles a packed word from fields already known to be in range.
#[inline(always)]
const fn from_parts(coefficient: i64, exponent: i32) -> Dec64 {
    Dec64 {
        value: (coefficient << 8) | (exponent as i64 & 0xFF),
    }
}

/// Number of decimal digits in `magnitude` (0 for 0).
const fn decimal_digits(mut magnitude: u64) -> u32 {
    let mut count = 0;
    while magnitude != 0 {
        magnitude = div10(magnitude);
        count += 1;
    }
    count
}

/// Drops `digits` decimal digits in a single rounding step: a signed
/// half-divisor bias, then truncation, so halves round away from zero.
const fn round_div_pow10(coefficient: i128, digits: u32) -> i128 {
    if digits == 1 {
        // The one-digit overshoot is the common case; take the
        // multiply-high shortcut when the magnitude permits.
        let magnitude = coefficient.unsigned_abs();
        if magnitude <= (u64::MAX - 5) as u128 {
            let quotient = div10(magnitude as u64 + 5) as i128;
            return if coefficient < 0 { -quotient } else { quotient };
        }
    }
    let divisor = POW10[digits as usize];
    let bias = divisor / 2;
    if coefficient < 0 {
        (coefficient - bias) / divisor
    } else {
        (coefficient + bias) / divisor
    }
}

/// `coefficient × 10^digits`, or `None` when it leaves 128 bits.
#[inline(always)]
const fn scale_up(coefficient: i128, digits: u32) -> Option<i128> {
    if digits as usize >= POW10.len() {
        return None;
    }
    coefficient.checked_mul(POW10[digits as usize])
}

/// The normalizing constructor over a double-width coefficient.
///
/// Rescues out-of-range pairs instead of wrapping: exponents above 127
/// inflate the coefficient, coefficients beyond 56 bits are scaled down with
/// round-half-away-from-zero, exponents below -127 deflate toward -127 and
/// collapse to zero once the shift passes the 19-digit rescue bound. Pairs
/// that cannot be rescued become NaN.
const fn pack(mut coefficient: i128, mut exponent: i32) -> Dec64 {
    if coefficient == 0 {
        return Dec64::ZERO;
    }
    // Exponent above range: inflate the coefficient toward exponent 127.
    while exponent > Dec64::MAX_EXPONENT as i32 {
        coefficient = match coefficient.checked_mul(10) {
            Some(scaled) => scaled,
            None => return Dec64::NAN,
        };
        if coefficient > Dec64::MAX_COEFFICIENT as i128
            || coefficient < Dec64::MIN_COEFFICIENT as i128
        {
            return Dec64::NAN;
        }
        exponent -= 1;
    }
    // Coefficient wider than 56 bits: scale down. Rounding can carry back
    // over the limit (..9675 -> ..968), hence the outer loop.
    while coefficient > Dec64::MAX_COEFFICIENT as i128
        || coefficient < Dec64::MIN_COEFFICIENT as i128
    {
        let mut probe = coefficient.unsigned_abs();
        let mut drop = 0u32;
        while probe > Dec64::MAX_COEFFICIENT as u128 {
            probe /= 10;
            drop += 1;
        }
        coefficient = round_div_pow10(coefficient, drop);
        exponent += drop as i32;
    }
    if exponent > Dec64::MAX_EXPONENT as i32 {
        return Dec64::NAN;
    }
    // Exponent below range: deflate toward -127.
    if exponent < Dec64::MIN_EXPONENT as i32 {
        let drop = (Dec64::MIN_EXPONENT as i32 - exponent) as u32;
        if drop > 19 {
            return Dec64::ZERO;
        }
        coefficient = round_div_pow10(coefficient, drop);
        if coefficient == 0 {
            return Dec64::ZERO;
        }
        exponent = Dec64::MIN_EXPONENT as i32;
    }
    from_parts(coefficient as i64, exponent)
}

// ============================================================================
// Constructors and Raw Access
// ============================================================================

impl Default for Dec64 {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Dec64 {
    /// Creates a `Dec64` from a raw packed word.
    ///
    /// The bits are taken as-is; nothing is normalized or validated.
    #[inline(always)]
    pub const fn from_raw(value: i64) -> Self {
        Self { value }
    }

    /// Returns the raw packed word.
    #[inline(always)]
    pub const fn to_raw(self) -> i64 {
        self.value
    }

    /// Creates a `Dec64` from a coefficient and a decimal exponent,
    /// normalizing as needed.
    ///
    /// In-range pairs are packed directly and round-trip exactly. Out-of-range
    /// pairs are rescued by rescaling: the coefficient is scaled up for
    /// exponents above 127 and scaled down (rounding half away from zero) when
    /// it exceeds 56 bits or the exponent sits below -127. A zero coefficient
    /// always yields [`Dec64::ZERO`]. Pairs whose magnitude cannot be
    /// represented at all yield [`Dec64::NAN`]; values too small to survive a
    /// 19-digit downshift collapse to zero.
    pub const fn new(coefficient: i64, exponent: i32) -> Self {
        if exponent >= Self::MIN_EXPONENT as i32
            && exponent <= Self::MAX_EXPONENT as i32
            && !coefficient_overflow(coefficient)
            && in_coefficient_range(coefficient)
        {
            if coefficient == 0 {
                return Self::ZERO;
            }
            return from_parts(coefficient, exponent);
        }
        pack(coefficient as i128, exponent)
    }

    /// Like [`Dec64::new`], but reports an unrepresentable magnitude as
    /// [`Dec64Error::Overflow`] instead of returning NaN.
    pub const fn try_new(coefficient: i64, exponent: i32) -> crate::Result<Self> {
        let packed = Self::new(coefficient, exponent);
        if packed.is_nan() {
            Err(Dec64Error::Overflow)
        } else {
            Ok(packed)
        }
    }
}

// ============================================================================
// Field Extraction and Predicates
// ============================================================================

impl Dec64 {
    /// The signed 56-bit coefficient.
    #[inline(always)]
    pub const fn coefficient(self) -> i64 {
        self.value >> 8
    }

    /// The signed 8-bit decimal exponent. -128 marks NaN.
    #[inline(always)]
    pub const fn exponent(self) -> i8 {
        self.value as i8
    }

    /// Returns `true` if `self` is the NaN sentinel (any NaN payload).
    #[inline(always)]
    pub const fn is_nan(self) -> bool {
        self.exponent() == -128
    }

    /// Returns `true` if `self` denotes zero, whatever its exponent.
    #[inline(always)]
    pub const fn is_zero(self) -> bool {
        !self.is_nan() && self.coefficient() == 0
    }

    /// Returns `true` if the exponent is zero.
    #[inline(always)]
    pub const fn is_basic(self) -> bool {
        self.exponent() == 0
    }

    /// Returns `true` if `self` is a whole number.
    ///
    /// Trailing-zero aliases count: `30 × 10^-1` is an integer.
    pub const fn is_integer(self) -> bool {
        if self.is_nan() {
            return false;
        }
        if self.exponent() >= 0 {
            return true;
        }
        self.canonical().exponent() >= 0
    }

    /// Returns `true` if `self` is greater than zero.
    #[inline(always)]
    pub const fn is_positive(self) -> bool {
        !self.is_nan() && self.coefficient() > 0
    }

    /// Returns `true` if `self` is less than zero.
    #[inline(always)]
    pub const fn is_negative(self) -> bool {
        !self.is_nan() && self.coefficient() < 0
    }

    /// Number of decimal digits in the coefficient: 0 for zero, -1 for NaN.
    pub const fn digits(self) -> i8 {
        if self.is_nan() {
            return -1;
        }
        let coefficient = self.coefficient();
        if coefficient == 0 {
            return 0;
        }
        decimal_digits(coefficient.unsigned_abs()) as i8
    }
}

// ============================================================================
// Normalization
// ============================================================================

impl Dec64 {
    /// Slides the exponent toward zero without changing the value: positive
    /// exponents inflate the coefficient while it fits, negative exponents
    /// divide out factors of ten. Exponents 0 and 127 are left untouched, as
    /// are NaN and zero (which normalizes to [`Dec64::ZERO`]).
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn canonical(self) -> Self {
        if self.is_nan() {
            return Self::NAN;
        }
        let mut coefficient = self.coefficient();
        if coefficient == 0 {
            return Self::ZERO;
        }
        let mut exponent = self.exponent() as i32;
        if exponent == 0 || exponent == Self::MAX_EXPONENT as i32 {
            return self;
        }
        if exponent > 0 {
            while exponent > 0
                && coefficient >= Self::MIN_COEFFICIENT / 10
                && coefficient <= Self::MAX_COEFFICIENT / 10
            {
                coefficient *= 10;
                exponent -= 1;
            }
        } else {
            while exponent < 0 && coefficient % 10 == 0 {
                let quotient = div10(coefficient.unsigned_abs()) as i64;
                coefficient = if coefficient < 0 { -quotient } else { quotient };
                exponent += 1;
            }
        }
        from_parts(coefficient, exponent)
    }

    /// The fully-reduced normal form; same reduction as [`Dec64::canonical`].
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn normal(self) -> Self {
        self.canonical()
    }

    /// One alignment step: coefficient × 10, exponent - 1. NaN when the
    /// scaled coefficient leaves the 56-bit range.
    const fn reduce_exponent(self) -> Self {
        let coefficient = self.coefficient() * 10;
        if !in_coefficient_range(coefficient) {
            return Self::NAN;
        }
        from_parts(coefficient, self.exponent() as i32 - 1)
    }
}

// ============================================================================
// Addition and Subtraction
// ============================================================================

impl Dec64 {
    /// Adds two numbers.
    ///
    /// Operands at the same exponent add coefficients directly. Otherwise the
    /// larger exponent is walked down one step at a time until the exponents
    /// meet; if the walking coefficient overflows 56 bits before they meet,
    /// the sum is not representable and the result is NaN.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn add(self, other: Self) -> Self {
        if self.is_nan() || other.is_nan() {
            return Self::NAN;
        }
        let ea = self.exponent();
        let eb = other.exponent();
        if ea == eb {
            return pack(
                self.coefficient() as i128 + other.coefficient() as i128,
                ea as i32,
            );
        }
        let (mut high, low, target) = if ea > eb {
            (self, other, eb)
        } else {
            (other, self, ea)
        };
        loop {
            high = high.reduce_exponent();
            if high.is_nan() {
                return Self::NAN;
            }
            if high.exponent() == target {
                return pack(
                    high.coefficient() as i128 + low.coefficient() as i128,
                    target as i32,
                );
            }
        }
    }

    /// Subtracts `other` from `self`.
    ///
    /// Both operands are canonicalized first; a remaining exponent gap is
    /// closed by scaling the larger-exponent coefficient up by the exact
    /// power-of-ten difference in 128-bit arithmetic. A gap too wide even for
    /// that puts the smaller operand below the result's rounding granularity,
    /// so the dominant operand is returned as-is.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn subtract(self, other: Self) -> Self {
        if self.is_nan() || other.is_nan() {
            return Self::NAN;
        }
        let a = self.canonical();
        let b = other.canonical();
        let ea = a.exponent() as i32;
        let eb = b.exponent() as i32;
        let ca = a.coefficient() as i128;
        let cb = b.coefficient() as i128;
        if ea == eb {
            return pack(ca - cb, ea);
        }
        if ea > eb {
            match scale_up(ca, (ea - eb) as u32) {
                Some(scaled) => pack(scaled - cb, eb),
                None => a,
            }
        } else {
            match scale_up(cb, (eb - ea) as u32) {
                Some(scaled) => pack(ca - scaled, ea),
                None => pack(-cb, eb),
            }
        }
    }

    /// Adds one to an integer in place; a no-op on values whose granularity
    /// is coarser than one, a full add otherwise.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn inc(self) -> Self {
        let value = self.canonical();
        if value.is_nan() {
            return Self::NAN;
        }
        let exponent = value.exponent();
        if exponent == 0 {
            return Self::new(value.coefficient() + 1, 0);
        }
        if exponent > 0 {
            return value;
        }
        value.add(Self::ONE)
    }

    /// Subtracts one; the mirror of [`Dec64::inc`].
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn dec(self) -> Self {
        let value = self.canonical();
        if value.is_nan() {
            return Self::NAN;
        }
        let exponent = value.exponent();
        if exponent == 0 {
            return Self::new(value.coefficient() - 1, 0);
        }
        if exponent > 0 {
            return value;
        }
        value.subtract(Self::ONE)
    }
}

// ============================================================================
// Multiplication
// ============================================================================

impl Dec64 {
    /// Multiplies two numbers.
    ///
    /// Zero dominates: a zero operand yields zero even when the other is NaN.
    /// Coefficients multiply in 128
    /// bits and the product is renormalized, so in-range magnitudes survive
    /// coefficient products far beyond 64 bits.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn multiply(self, other: Self) -> Self {
        if self.is_zero() || other.is_zero() {
            return Self::ZERO;
        }
        if self.is_nan() || other.is_nan() {
            return Self::NAN;
        }
        pack(
            self.coefficient() as i128 * other.coefficient() as i128,
            self.exponent() as i32 + other.exponent() as i32,
        )
    }

    /// Halves exactly: even coefficients divide by two in place, odd ones
    /// multiply by five and drop the exponent, so no fractional digit is lost.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn half(self) -> Self {
        if self.is_nan() {
            return Self::NAN;
        }
        let coefficient = self.coefficient();
        let exponent = self.exponent() as i32;
        if coefficient % 2 == 0 {
            Self::new(coefficient / 2, exponent)
        } else {
            pack(coefficient as i128 * 5, exponent - 1)
        }
    }
}

// ============================================================================
// Division and Reciprocal
// ============================================================================

/// Scaled long division of `1 / |coefficient|`.
///
/// Seeds the numerator at the divisor's leading decimal digit, then extends
/// the quotient digit by digit over an accumulator pair, stopping only when
/// the next digit would overflow 56 bits. The final remainder rounds the
/// quotient half away from zero. Returns `(quotient, shift, exact)` with
/// `quotient ≈ 10^shift / coefficient`; `exact` is set when the remainder
/// reached zero.
const fn recip_coefficient(coefficient: i64) -> (i64, i32, bool) {
    let negative = coefficient < 0;
    let divisor = coefficient.unsigned_abs();
    let mut seed = 1u64;
    let mut shift = 0i32;
    while seed <= divisor / 10 {
        seed *= 10;
        shift += 1;
    }
    let mut quotient = seed / divisor;
    let mut remainder = seed % divisor;
    while remainder != 0 {
        let numerator = remainder * 10;
        let extended = quotient * 10 + numerator / divisor;
        if extended > Dec64::MAX_COEFFICIENT as u64 {
            break;
        }
        quotient = extended;
        remainder = numerator % divisor;
        shift += 1;
    }
    let exact = remainder == 0;
    if remainder * 2 >= divisor {
        quotient += 1;
    }
    let quotient = quotient as i64;
    (if negative { -quotient } else { quotient }, shift, exact)
}

impl Dec64 {
    /// The multiplicative inverse, to maximal representable precision.
    ///
    /// NaN for NaN or zero input. Terminating reciprocals are returned in
    /// canonical form; repeating ones carry 16-17 significant digits.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn reciprocal(self) -> Self {
        if self.is_nan() || self.is_zero() {
            return Self::NAN;
        }
        let (quotient, shift, exact) = recip_coefficient(self.coefficient());
        let out = pack(quotient as i128, -(self.exponent() as i32) - shift);
        if exact {
            out.canonical()
        } else {
            out
        }
    }

    /// Divides `self` by `other`.
    ///
    /// A zero dividend yields zero even against NaN or zero divisors; a zero
    /// divisor otherwise yields NaN. Computed as the divisor-coefficient
    /// reciprocal multiplied into
    /// the dividend with the exponents subtracted. Exact divisions produce
    /// minimal-exponent results; repeating ones keep 16-17 significant digits
    /// and are correct to the last digit or so.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn divide(self, other: Self) -> Self {
        if self.is_zero() {
            return Self::ZERO;
        }
        if self.is_nan() || other.is_nan() {
            return Self::NAN;
        }
        if other.is_zero() {
            return Self::NAN;
        }
        let (quotient, shift, exact) = recip_coefficient(other.coefficient());
        let out = pack(
            self.coefficient() as i128 * quotient as i128,
            self.exponent() as i32 - other.exponent() as i32 - shift,
        );
        if exact {
            out.canonical()
        } else {
            out
        }
    }

    /// Like [`Dec64::divide`], but reports a zero divisor as
    /// [`Dec64Error::DivisionByZero`].
    pub const fn try_divide(self, other: Self) -> crate::Result<Self> {
        if other.is_zero() {
            return Err(Dec64Error::DivisionByZero);
        }
        Ok(self.divide(other))
    }

    /// Truncating integer division: the whole quotient, rounded toward zero.
    ///
    /// Exact wherever the true quotient fits 17 significant digits: operands
    /// are canonicalized, aligned to the smaller exponent in 128-bit
    /// arithmetic, and their coefficients divided with truncation. Quotients
    /// beyond that range are already integral at the representation's
    /// granularity and come from [`Dec64::divide`] directly.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn integer_divide(self, other: Self) -> Self {
        if self.is_nan() || other.is_nan() {
            return Self::NAN;
        }
        if other.is_zero() {
            return Self::NAN;
        }
        if self.is_zero() {
            return Self::ZERO;
        }
        let a = self.canonical();
        let b = other.canonical();
        let ea = a.exponent() as i32;
        let eb = b.exponent() as i32;
        let ca = a.coefficient() as i128;
        let cb = b.coefficient() as i128;
        if ea >= eb {
            match scale_up(ca, (ea - eb) as u32) {
                Some(scaled) => pack(scaled / cb, 0),
                None => a.divide(b),
            }
        } else {
            match scale_up(cb, (eb - ea) as u32) {
                Some(scaled) => pack(ca / scaled, 0),
                // the divisor dwarfs the dividend
                None => Self::ZERO,
            }
        }
    }

    /// Remainder of truncating division: `self - integer_divide(self, other)
    /// × other`, carrying the dividend's sign. NaN for a zero or NaN divisor.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn modulo(self, other: Self) -> Self {
        if other.is_nan() || other.is_zero() {
            return Self::NAN;
        }
        if self.is_nan() {
            return Self::NAN;
        }
        self.subtract(self.integer_divide(other).multiply(other))
    }
}

// ============================================================================
// Sign Operations
// ============================================================================

impl Dec64 {
    /// Negates. NaN when the coefficient is the minimum value, whose negation
    /// leaves the 56-bit range.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn neg(self) -> Self {
        if self.is_nan() {
            return Self::NAN;
        }
        let coefficient = self.coefficient();
        if coefficient > Self::MIN_COEFFICIENT {
            Self::new(-coefficient, self.exponent() as i32)
        } else {
            Self::NAN
        }
    }

    /// Absolute value, with the same minimum-coefficient failure as
    /// [`Dec64::neg`].
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn abs(self) -> Self {
        if self.is_nan() {
            return Self::NAN;
        }
        if self.coefficient() >= 0 {
            return self;
        }
        self.neg()
    }

    /// The sign as a number: -1, 0 or 1; NaN for NaN.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn signum(self) -> Self {
        if self.is_nan() {
            return Self::NAN;
        }
        let coefficient = self.coefficient();
        if coefficient == 0 {
            Self::ZERO
        } else if coefficient < 0 {
            Self::NEGATIVE_ONE
        } else {
            Self::ONE
        }
    }

    /// Boolean complement over the canonical truth values: zero becomes one,
    /// one becomes zero, everything else is NaN.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn not(self) -> Self {
        if self.is_nan() {
            return Self::NAN;
        }
        if self.is_zero() {
            return Self::ONE;
        }
        if self.equals(Self::ONE) {
            return Self::ZERO;
        }
        Self::NAN
    }
}

// ============================================================================
// Rounding to Integers
// ============================================================================

impl Dec64 {
    /// The largest integer less than or equal to `self`.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn floor(self) -> Self {
        if self.is_nan() {
            return Self::NAN;
        }
        let coefficient = self.coefficient();
        if coefficient == 0 {
            return Self::ZERO;
        }
        let exponent = self.exponent() as i32;
        if exponent >= 0 {
            return self;
        }
        let drop = -exponent as u32;
        if drop >= 18 {
            // |value| < 1
            return if coefficient < 0 {
                Self::NEGATIVE_ONE
            } else {
                Self::ZERO
            };
        }
        let divisor = POW10[drop as usize];
        let wide = coefficient as i128;
        let mut quotient = wide / divisor;
        if coefficient < 0 && quotient * divisor != wide {
            quotient -= 1;
        }
        pack(quotient, 0)
    }

    /// The smallest integer greater than or equal to `self`.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn ceiling(self) -> Self {
        if self.is_nan() {
            return Self::NAN;
        }
        let coefficient = self.coefficient();
        if coefficient == 0 {
            return Self::ZERO;
        }
        let exponent = self.exponent() as i32;
        if exponent >= 0 {
            return self;
        }
        let drop = -exponent as u32;
        if drop >= 18 {
            return if coefficient > 0 { Self::ONE } else { Self::ZERO };
        }
        let divisor = POW10[drop as usize];
        let wide = coefficient as i128;
        let mut quotient = wide / divisor;
        if coefficient > 0 && quotient * divisor != wide {
            quotient += 1;
        }
        pack(quotient, 0)
    }

    /// Rounds half away from zero at decimal place `10^place`; `place` 0
    /// rounds to an integer, -2 to hundredths. A no-op when the value is
    /// already at that granularity or coarser.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn round(self, place: i32) -> Self {
        if self.is_nan() {
            return Self::NAN;
        }
        if self.is_zero() {
            return Self::ZERO;
        }
        let exponent = self.exponent() as i32;
        if exponent >= place {
            return self;
        }
        let drop = (place - exponent) as u32;
        if drop >= 19 {
            return Self::ZERO;
        }
        pack(round_div_pow10(self.coefficient() as i128, drop), place)
    }
}

// ============================================================================
// Comparison
// ============================================================================

impl Dec64 {
    /// Value equality over represented magnitudes.
    ///
    /// NaN equals nothing, including itself. Zero equals zero at any
    /// exponent. Unequal exponents align exactly as [`Dec64::add`] does; an
    /// alignment that overflows proves the values cannot be equal.
    pub const fn equals(self, other: Self) -> bool {
        if self.is_nan() || other.is_nan() {
            return false;
        }
        if self.is_zero() && other.is_zero() {
            return true;
        }
        if self.value == other.value {
            return true;
        }
        let ea = self.exponent();
        let eb = other.exponent();
        if ea == eb {
            return self.coefficient() == other.coefficient();
        }
        let (mut high, low, target) = if ea > eb {
            (self, other, eb)
        } else {
            (other, self, ea)
        };
        loop {
            high = high.reduce_exponent();
            if high.is_nan() {
                return false;
            }
            if high.exponent() == target {
                return high.coefficient() == low.coefficient();
            }
        }
    }

    /// Returns `true` if `self` is strictly less than `other`; always `false`
    /// when either operand is NaN.
    ///
    /// Decided by sign class, then decimal order of magnitude (digit count
    /// plus exponent, which trailing-zero aliasing cannot disturb), then a
    /// 128-bit aligned coefficient comparison.
    pub const fn less(self, other: Self) -> bool {
        if self.is_nan() || other.is_nan() {
            return false;
        }
        let ca = self.coefficient();
        let cb = other.coefficient();
        let sa = if ca > 0 {
            1
        } else if ca < 0 {
            -1
        } else {
            0
        };
        let sb = if cb > 0 {
            1
        } else if cb < 0 {
            -1
        } else {
            0
        };
        if sa != sb {
            return sa < sb;
        }
        if sa == 0 {
            return false;
        }
        let ea = self.exponent() as i32;
        let eb = other.exponent() as i32;
        let ma = decimal_digits(ca.unsigned_abs()) as i32 + ea;
        let mb = decimal_digits(cb.unsigned_abs()) as i32 + eb;
        if ma != mb {
            return if sa > 0 { ma < mb } else { mb < ma };
        }
        let floor = if ea < eb { ea } else { eb };
        let left = ca as i128 * POW10[(ea - floor) as usize];
        let right = cb as i128 * POW10[(eb - floor) as usize];
        left < right
    }

    /// Returns the smaller of two values, or NaN if either is NaN.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn min(self, other: Self) -> Self {
        if self.is_nan() || other.is_nan() {
            return Self::NAN;
        }
        if self.less(other) {
            self
        } else {
            other
        }
    }

    /// Returns the larger of two values, or NaN if either is NaN.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn max(self, other: Self) -> Self {
        if self.is_nan() || other.is_nan() {
            return Self::NAN;
        }
        if other.less(self) {
            self
        } else {
            other
        }
    }
}

// ============================================================================
// Operator Trait Implementations
// ============================================================================

impl Add for Dec64 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Dec64::add(self, rhs)
    }
}

impl Sub for Dec64 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        self.subtract(rhs)
    }
}

impl Mul for Dec64 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self::Output {
        self.multiply(rhs)
    }
}

impl Div for Dec64 {
    type Output = Self;

    #[inline]
    fn div(self, rhs: Self) -> Self::Output {
        self.divide(rhs)
    }
}

impl Rem for Dec64 {
    type Output = Self;

    #[inline]
    fn rem(self, rhs: Self) -> Self::Output {
        self.modulo(rhs)
    }
}

impl Neg for Dec64 {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self::Output {
        Dec64::neg(self)
    }
}

impl PartialEq for Dec64 {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.equals(*other)
    }
}

impl PartialOrd for Dec64 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.is_nan() || other.is_nan() {
            return None;
        }
        if self.equals(*other) {
            Some(Ordering::Equal)
        } else if self.less(*other) {
            Some(Ordering::Less)
        } else {
            Some(Ordering::Greater)
        }
    }
}

impl Sum for Dec64 {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a Dec64> for Dec64 {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, x| acc + *x)
    }
}

impl Product for Dec64 {
    fn product<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ONE, |acc, x| acc * x)
    }
}

impl<'a> Product<&'a Dec64> for Dec64 {
    fn product<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.fold(Self::ONE, |acc, x| acc * *x)
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl From<i8> for Dec64 {
    #[inline]
    fn from(value: i8) -> Self {
        Self::new(value as i64, 0)
    }
}

impl From<i16> for Dec64 {
    #[inline]
    fn from(value: i16) -> Self {
        Self::new(value as i64, 0)
    }
}

impl From<i32> for Dec64 {
    #[inline]
    fn from(value: i32) -> Self {
        Self::new(value as i64, 0)
    }
}

impl From<u8> for Dec64 {
    #[inline]
    fn from(value: u8) -> Self {
        Self::new(value as i64, 0)
    }
}

impl From<u16> for Dec64 {
    #[inline]
    fn from(value: u16) -> Self {
        Self::new(value as i64, 0)
    }
}

impl From<u32> for Dec64 {
    #[inline]
    fn from(value: u32) -> Self {
        Self::new(value as i64, 0)
    }
}

impl TryFrom<i64> for Dec64 {
    type Error = Dec64Error;

    /// Exact conversion; integers beyond the 56-bit coefficient range would
    /// have to round and are refused. Use [`Dec64::new`] for lossy packing.
    fn try_from(value: i64) -> crate::Result<Self> {
        if in_coefficient_range(value) {
            Ok(Self::new(value, 0))
        } else {
            Err(Dec64Error::PrecisionLoss)
        }
    }
}

impl TryFrom<u64> for Dec64 {
    type Error = Dec64Error;

    fn try_from(value: u64) -> crate::Result<Self> {
        if value <= Self::MAX_COEFFICIENT as u64 {
            Ok(Self::new(value as i64, 0))
        } else {
            Err(Dec64Error::PrecisionLoss)
        }
    }
}

impl fmt::Debug for Dec64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            // {:#?} shows the raw packed word
            f.debug_struct("Dec64").field("value", &self.value).finish()
        } else if self.is_nan() {
            f.write_str("Dec64(NaN)")
        } else {
            write!(f, "Dec64({}e{})", self.coefficient(), self.exponent())
        }
    }
}

// ============================================================================
// Serde Support
// ============================================================================

#[cfg(feature = "serde")]
impl Serialize for Dec64 {
    /// Serializes the raw packed word; the bit pattern round-trips exactly.
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.value.serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Dec64 {
    fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = i64::deserialize(deserializer)?;
        Ok(Self { value })
    }
}

// ============================================================================
// Tests
// ============================================================================





#[cfg(test)]
mod canonical_tests {
    use super::test_fixtures::*;
    use super::*;

    #[test]
    fn test_negative_exponent_reduces() {
        assert_eq!(num(300, -2).canonical().to_raw(), num(3, 0).to_raw());
        assert_eq!(num(-300, -2).canonical().to_raw(), num(-3, 0).to_raw());
        // stops once a factor of ten no longer divides
        assert_eq!(num(15, -1).canonical().to_raw(), num(15, -1).to_raw());
    }

    #[test]
    fn test_positive_exponent_inflates() {
        assert_eq!(num(3, 2).canonical().to_raw(), num(300, 0).to_raw());
        // stops when the coefficient cannot absorb another digit
        assert_eq!(
            num(Dec64::MAX_COEFFICIENT, 2).canonical().to_raw(),
            num(Dec64::MAX_COEFFICIENT, 2).to_raw()
        );
    }

    #[test]
    fn test_exponent_zero_and_127_untouched() {
        assert_eq!(num(120, 0).canonical().to_raw(), num(120, 0).to_raw());
        assert_eq!(num(1, 127).canonical().to_raw(), num(1, 127).to_raw());
    }

    #[test]
    fn test_zero_and_nan() {
        assert_eq!(ZIP.canonical().to_raw(), Dec64::ZERO.to_raw());
        assert_eq!(Dec64::NAN.canonical().to_raw(), Dec64::NAN.to_raw());
        assert_eq!(NANNAN.canonical().to_raw(), Dec64::NAN.to_raw());
    }

    #[test]
    fn test_value_preserved() {
        let samples = [
            num(250, -2),
            num(-7000, 3),
            num(123456789, -8),
            num(1, 100),
            Dec64::MINNUM,
            Dec64::MAXNUM,
        ];
        for &x in &samples {
            assert!(x.canonical().equals(x), "{x:?}");
        }
    }

    #[test]
    fn test_normal_is_canonical() {
        assert_eq!(num(300, -2).normal().to_raw(), num(300, -2).canonical().to_raw());
    }
}






#[cfg(test)]
mod integer_divide_tests {
    use super::test_fixtures::*;
    use super::*;

    #[test]
    fn test_small_integer_grid() {
        for a in -50i64..=50 {
            for b in -50i64..=50 {
                if b == 0 {
                    continue;
                }
                let quotient = num(a, 0).integer_divide(num(b, 0));
                let remainder = num(a, 0).modulo(num(b, 0));
                assert_eq!(quotient.to_raw(), num(a / b, 0).to_raw(), "{a} / {b}");
                assert_eq!(remainder.to_raw(), num(a % b, 0).to_raw(), "{a} % {b}");
            }
        }
    }

    #[test]
    fn test_truncates_toward_zero() {
        assert_eq!(num(7, 0).integer_divide(Dec64::TWO).to_raw(), num(3, 0).to_raw());
        assert_eq!(num(-7, 0).integer_divide(Dec64::TWO).to_raw(), num(-3, 0).to_raw());
        assert_eq!(num(7, 0).integer_divide(num(-2, 0)).to_raw(), num(-3, 0).to_raw());
    }

    #[test]
    fn test_fractional_operands() {
        assert_eq!(
            num(75, -1).integer_divide(num(25, -1)).to_raw(),
            num(3, 0).to_raw()
        );
        assert_eq!(num(75, -1).integer_divide(Dec64::TWO).to_raw(), num(3, 0).to_raw());
    }

    #[test]
    fn test_exact_at_the_unit_boundary() {
        // a 16-digit reciprocal would land just under 1; exact alignment must not
        assert_eq!(num(22, 0).integer_divide(num(22, 0)).to_raw(), Dec64::ONE.to_raw());
        assert_eq!(num(22, 0).modulo(num(22, 0)).to_raw(), Dec64::ZERO.to_raw());
    }

    #[test]
    fn test_quotient_beyond_exact_range() {
        assert_eq!(
            num(1, 20).integer_divide(num(3, 0)).to_raw(),
            num(33333333333333333, 3).to_raw()
        );
        assert_eq!(Dec64::ONE.integer_divide(num(1, 20)).to_raw(), Dec64::ZERO.to_raw());
    }

    #[test]
    fn test_failure_modes() {
        assert!(num(5, 0).integer_divide(Dec64::ZERO).is_nan());
        assert!(num(5, 0).integer_divide(ZIP).is_nan());
        assert!(Dec64::NAN.integer_divide(Dec64::ONE).is_nan());
        assert!(num(5, 0).integer_divide(Dec64::NAN).is_nan());
    }
}


#[cfg(test)]
mod sign_tests {
    use super::test_fixtures::*;
    use super::*;

    #[test]
    fn test_neg() {
        assert_eq!(Dec64::ONE.neg().to_raw(), Dec64::NEGATIVE_ONE.to_raw());
        assert_eq!(Dec64::MINNUM.neg().to_raw(), num(-1, -127).to_raw());
        assert_eq!(Dec64::ZERO.neg().to_raw(), Dec64::ZERO.to_raw());
        assert!(Dec64::NAN.neg().is_nan());
        // negating the minimum coefficient leaves the 56-bit range
        assert!(NEGATIVE_MAXINT.neg().is_nan());
        assert!(num(Dec64::MIN_COEFFICIENT, 5).neg().is_nan());
    }

    #[test]
    fn test_abs() {
        assert_eq!(num(-123, -2).abs().to_raw(), num(123, -2).to_raw());
        assert_eq!(num(123, -2).abs().to_raw(), num(123, -2).to_raw());
        assert_eq!(Dec64::ZERO.abs().to_raw(), Dec64::ZERO.to_raw());
        assert!(Dec64::NAN.abs().is_nan());
        assert!(num(Dec64::MIN_COEFFICIENT, 5).abs().is_nan());
    }

    #[test]
    fn test_signum() {
        assert_eq!(num(-5, 3).signum().to_raw(), Dec64::NEGATIVE_ONE.to_raw());
        assert_eq!(Dec64::MAXNUM.signum().to_raw(), Dec64::ONE.to_raw());
        assert_eq!(Dec64::ZERO.signum().to_raw(), Dec64::ZERO.to_raw());
        assert_eq!(ZIP.signum().to_raw(), Dec64::ZERO.to_raw());
        assert!(Dec64::NAN.signum().is_nan());
    }

    #[test]
    fn test_not() {
        assert_eq!(Dec64::ZERO.not().to_raw(), Dec64::ONE.to_raw());
        assert_eq!(Dec64::ONE.not().to_raw(), Dec64::ZERO.to_raw());
        assert_eq!(ZIP.not().to_raw(), Dec64::ONE.to_raw());
        // any one-valued alias counts as true
        assert_eq!(num(10, -1).not().to_raw(), Dec64::ZERO.to_raw());
        assert!(Dec64::TWO.not().is_nan());
        assert!(Dec64::NAN.not().is_nan());
    }
}

#[cfg(test)]
mod inc_dec_half_tests {
    use super::test_fixtures::*;
    use super::*;

    #[test]
    fn test_inc() {
        assert_eq!(Dec64::ZERO.inc().to_raw(), Dec64::ONE.to_raw());
        assert_eq!(ZIP.inc().to_raw(), Dec64::ONE.to_raw());
        assert_eq!(num(25, -1).inc().to_raw(), num(35, -1).to_raw());
        assert_eq!(Dec64::MAXINT.inc().to_raw(), num(3602879701896397, 1).to_raw());
        // granularity coarser than one: unchanged
        assert_eq!(num(1, 127).inc().to_raw(), num(1, 127).to_raw());
        assert!(Dec64::NAN.inc().is_nan());
    }

    #[test]
    fn test_dec() {
        assert_eq!(Dec64::ONE.dec().to_raw(), Dec64::ZERO.to_raw());
        assert_eq!(num(25, -1).dec().to_raw(), num(15, -1).to_raw());
        assert_eq!(num(1, 1).dec().to_raw(), num(9, 0).to_raw());
        assert_eq!(num(1, 127).dec().to_raw(), num(1, 127).to_raw());
        assert!(Dec64::NAN.dec().is_nan());
    }

    #[test]
    fn test_half() {
        assert_eq!(Dec64::TWO.half().to_raw(), Dec64::ONE.to_raw());
        assert_eq!(num(13, 0).half().to_raw(), num(65, -1).to_raw());
        assert_eq!(num(-6, 2).half().to_raw(), num(-3, 2).to_raw());
        assert_eq!(Dec64::ZERO.half().to_raw(), Dec64::ZERO.to_raw());
        assert!(Dec64::NAN.half().is_nan());
    }

    #[test]
    fn test_half_at_the_edges() {
        // odd minimum: 5e-128 rounds back up to minnum
        assert_eq!(Dec64::MINNUM.half().to_raw(), Dec64::MINNUM.to_raw());
        // odd maximum coefficient: the x5 path must rescale, not wrap
        assert_eq!(
            Dec64::MAXINT.half().to_raw(),
            num(18014398509481984, 0).to_raw()
        );
        assert_eq!(
            NEGATIVE_MAXINT.half().to_raw(),
            num(-18014398509481984, 0).to_raw()
        );
    }

    #[test]
    fn test_repeated_halving_is_exact() {
        let mut x = Dec64::ONE;
        for _ in 0..10 {
            x = x.half();
        }
        // 2^-10 = 5^10 * 10^-10
        assert_eq!(x.to_raw(), num(9765625, -10).to_raw());
    }
}


#[cfg(test)]
mod comparison_tests {
    use super::test_fixtures::*;
    use super::*;

    #[test]
    fn test_equals_across_aliases() {
        assert!(num(2, 0).equals(num(20, -1)));
        assert!(num(30, -1).equals(num(3, 0)));
        assert!(num(1000000, -6).equals(Dec64::ONE));
        assert!(!num(2, 0).equals(num(21, -1)));
    }

    #[test]
    fn test_nan_equals_nothing() {
        assert!(!Dec64::NAN.equals(Dec64::NAN));
        assert!(!NANNAN.equals(NANNAN));
        assert!(!Dec64::NAN.equals(Dec64::ZERO));
        assert!(!Dec64::ONE.equals(Dec64::NAN));
    }

    #[test]
    fn test_zero_aliases_are_equal() {
        assert!(ZIP.equals(Dec64::ZERO));
        assert!(Dec64::ZERO.equals(ZIP));
        assert!(ZIP.equals(ZIP));
    }

    #[test]
    fn test_alignment_overflow_means_unequal() {
        assert!(!num(1, 20).equals(num(1, 0)));
        assert!(!Dec64::MAXNUM.equals(Dec64::MINNUM));
    }

    #[test]
    fn test_less() {
        assert!(Dec64::ONE.less(Dec64::TWO));
        assert!(!Dec64::TWO.less(Dec64::ONE));
        assert!(!Dec64::ONE.less(Dec64::ONE));
        assert!(num(-2, 0).less(Dec64::NEGATIVE_ONE));
        assert!(!Dec64::NEGATIVE_ONE.less(num(-2, 0)));
        assert!(Dec64::NEGATIVE_ONE.less(Dec64::ZERO));
        assert!(Dec64::ZERO.less(Dec64::MINNUM));
        assert!(!num(2, 0).less(num(20, -1)));
        assert!(!num(20, -1).less(num(2, 0)));
        assert!(!ZIP.less(Dec64::ZERO));
        assert!(!Dec64::ZERO.less(ZIP));
    }

    #[test]
    fn test_less_across_extreme_exponents() {
        assert!(Dec64::MINNUM.less(Dec64::MAXNUM));
        assert!(!Dec64::MAXNUM.less(Dec64::MINNUM));
        assert!(num(1, -127).less(num(1, 127)));
        assert!(num(-1, 127).less(num(1, -127)));
        assert!(!num(1, -127).less(num(-1, 127)));
    }

    #[test]
    fn test_less_rejects_nan() {
        assert!(!Dec64::NAN.less(Dec64::ONE));
        assert!(!Dec64::ONE.less(Dec64::NAN));
        assert!(!Dec64::NAN.less(Dec64::NAN));
    }

    #[test]
    fn test_min_max() {
        assert_eq!(Dec64::ONE.min(Dec64::TWO).to_raw(), Dec64::ONE.to_raw());
        assert_eq!(Dec64::ONE.max(Dec64::TWO).to_raw(), Dec64::TWO.to_raw());
        assert!(Dec64::ONE.min(Dec64::NAN).is_nan());
        assert!(Dec64::NAN.max(Dec64::ONE).is_nan());
    }
}

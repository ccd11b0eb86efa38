//! Arbitrary-precision integer backed by a decimal digit string

use crate::error::ValueError;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Limb base for magnitude arithmetic (10^9 fits a u32, products fit a u64)
const BASE: u64 = 1_000_000_000;
const BASE_DIGITS: usize = 9;

/// Arbitrary-precision integer
///
/// The original text is kept verbatim; comparison, equality and hashing are
/// numeric, so `"007"` equals `"7"`.
#[derive(Debug, Clone)]
pub struct BigInt {
    repr: String,
}

impl BigInt {
    /// Parse from a decimal string matching `^-?\d+$`
    pub fn new(value: impl Into<String>) -> Result<Self, ValueError> {
        let repr = value.into();
        if !is_integer_text(&repr) {
            return Err(ValueError::InvalidBigInt(repr));
        }
        Ok(Self { repr })
    }

    /// Original decimal text
    pub fn as_str(&self) -> &str {
        &self.repr
    }

    /// Sign and magnitude digits without leading zeros; zero is never negative
    fn parts(&self) -> (bool, &str) {
        let (negative, digits) = match self.repr.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, self.repr.as_str()),
        };
        let trimmed = digits.trim_start_matches('0');
        if trimmed.is_empty() {
            (false, "0")
        } else {
            (negative, trimmed)
        }
    }

    /// Canonical decimal text (no leading zeros, no negative zero)
    pub fn normalized(&self) -> String {
        match self.parts() {
            (true, digits) => format!("-{}", digits),
            (false, digits) => digits.to_string(),
        }
    }

    /// True when strictly greater than zero
    pub fn is_positive(&self) -> bool {
        let (negative, digits) = self.parts();
        !negative && digits != "0"
    }

    /// True when strictly less than zero
    pub fn is_negative(&self) -> bool {
        self.parts().0
    }

    /// True when equal to zero
    pub fn is_zero(&self) -> bool {
        self.parts().1 == "0"
    }

    /// Absolute value
    pub fn abs(&self) -> BigInt {
        match self.repr.strip_prefix('-') {
            Some(rest) => BigInt {
                repr: rest.to_string(),
            },
            None => self.clone(),
        }
    }

    /// Convert to `i64`, failing if the value does not fit
    pub fn try_to_i64(&self) -> Result<i64, ValueError> {
        self.normalized()
            .parse::<i64>()
            .map_err(|_| ValueError::IntegerOverflow(self.repr.clone()))
    }

    /// Exact sum
    pub fn add(&self, other: &BigInt) -> BigInt {
        if let (Ok(a), Ok(b)) = (self.try_to_i64(), other.try_to_i64()) {
            if let Some(sum) = a.checked_add(b) {
                return BigInt::from(sum);
            }
        }
        let (a_neg, a) = self.signed_limbs();
        let (b_neg, b) = other.signed_limbs();
        let (neg, mag) = signed_add(a_neg, &a, b_neg, &b);
        BigInt::from_limbs(neg, &mag)
    }

    /// Exact difference
    pub fn subtract(&self, other: &BigInt) -> BigInt {
        if let (Ok(a), Ok(b)) = (self.try_to_i64(), other.try_to_i64()) {
            if let Some(diff) = a.checked_sub(b) {
                return BigInt::from(diff);
            }
        }
        let (a_neg, a) = self.signed_limbs();
        let (b_neg, b) = other.signed_limbs();
        let (neg, mag) = signed_add(a_neg, &a, !b_neg, &b);
        BigInt::from_limbs(neg, &mag)
    }

    /// Exact product
    pub fn multiply(&self, other: &BigInt) -> BigInt {
        if let (Ok(a), Ok(b)) = (self.try_to_i64(), other.try_to_i64()) {
            if let Some(product) = a.checked_mul(b) {
                return BigInt::from(product);
            }
        }
        let (a_neg, a) = self.signed_limbs();
        let (b_neg, b) = other.signed_limbs();
        BigInt::from_limbs(a_neg != b_neg, &mul_mag(&a, &b))
    }

    /// Quotient truncated toward zero
    pub fn divide(&self, other: &BigInt) -> Result<BigInt, ValueError> {
        if other.is_zero() {
            return Err(ValueError::DivisionByZero);
        }
        if let (Ok(a), Ok(b)) = (self.try_to_i64(), other.try_to_i64()) {
            if let Some(quotient) = a.checked_div(b) {
                return Ok(BigInt::from(quotient));
            }
        }
        let (a_neg, a) = self.signed_limbs();
        let (b_neg, b) = other.signed_limbs();
        let (quotient, _) = divmod_mag(&a, &b);
        Ok(BigInt::from_limbs(a_neg != b_neg, &quotient))
    }

    /// Remainder whose sign follows the dividend
    pub fn modulo(&self, other: &BigInt) -> Result<BigInt, ValueError> {
        if other.is_zero() {
            return Err(ValueError::DivisionByZero);
        }
        if let (Ok(a), Ok(b)) = (self.try_to_i64(), other.try_to_i64()) {
            if let Some(remainder) = a.checked_rem(b) {
                return Ok(BigInt::from(remainder));
            }
        }
        let (a_neg, a) = self.signed_limbs();
        let (_, b) = other.signed_limbs();
        let (_, remainder) = divmod_mag(&a, &b);
        Ok(BigInt::from_limbs(a_neg, &remainder))
    }

    /// Numeric comparison
    pub fn compare(&self, other: &BigInt) -> Ordering {
        let (a_neg, a) = self.parts();
        let (b_neg, b) = other.parts();
        match (a_neg, b_neg) {
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
            (false, false) => cmp_digits(a, b),
            (true, true) => cmp_digits(b, a),
        }
    }

    fn signed_limbs(&self) -> (bool, Vec<u32>) {
        let (negative, digits) = self.parts();
        (negative, parse_mag(digits))
    }

    fn from_limbs(negative: bool, mag: &[u32]) -> BigInt {
        let digits = mag_to_string(mag);
        let repr = if negative && !mag.is_empty() {
            format!("-{}", digits)
        } else {
            digits
        };
        BigInt { repr }
    }
}

/// Check `^-?\d+$`
pub fn is_integer_text(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn cmp_digits(a: &str, b: &str) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn parse_mag(digits: &str) -> Vec<u32> {
    let bytes = digits.as_bytes();
    let mut limbs = Vec::with_capacity(bytes.len() / BASE_DIGITS + 1);
    let mut end = bytes.len();
    while end > 0 {
        let start = end.saturating_sub(BASE_DIGITS);
        let limb = bytes[start..end]
            .iter()
            .fold(0u32, |acc, &b| acc * 10 + u32::from(b - b'0'));
        limbs.push(limb);
        end = start;
    }
    trim(&mut limbs);
    limbs
}

fn mag_to_string(mag: &[u32]) -> String {
    match mag.split_last() {
        None => "0".to_string(),
        Some((top, rest)) => {
            let mut out = top.to_string();
            for limb in rest.iter().rev() {
                out.push_str(&format!("{:09}", limb));
            }
            out
        }
    }
}

fn trim(limbs: &mut Vec<u32>) {
    while limbs.last() == Some(&0) {
        limbs.pop();
    }
}

fn cmp_mag(a: &[u32], b: &[u32]) -> Ordering {
    a.len()
        .cmp(&b.len())
        .then_with(|| a.iter().rev().cmp(b.iter().rev()))
}

fn add_mag(a: &[u32], b: &[u32]) -> Vec<u32> {
    let mut out = Vec::with_capacity(a.len().max(b.len()) + 1);
    let mut carry = 0u64;
    for i in 0..a.len().max(b.len()) {
        let sum = u64::from(a.get(i).copied().unwrap_or(0))
            + u64::from(b.get(i).copied().unwrap_or(0))
            + carry;
        out.push((sum % BASE) as u32);
        carry = sum / BASE;
    }
    if carry > 0 {
        out.push(carry as u32);
    }
    out
}

/// `a - b` for `a >= b`
fn sub_mag(a: &[u32], b: &[u32]) -> Vec<u32> {
    let mut out = Vec::with_capacity(a.len());
    let mut borrow = 0i64;
    for (i, &limb) in a.iter().enumerate() {
        let mut diff = i64::from(limb) - borrow - i64::from(b.get(i).copied().unwrap_or(0));
        if diff < 0 {
            diff += BASE as i64;
            borrow = 1;
        } else {
            borrow = 0;
        }
        out.push(diff as u32);
    }
    trim(&mut out);
    out
}

fn signed_add(a_neg: bool, a: &[u32], b_neg: bool, b: &[u32]) -> (bool, Vec<u32>) {
    if a_neg == b_neg {
        return (a_neg, add_mag(a, b));
    }
    match cmp_mag(a, b) {
        Ordering::Less => (b_neg, sub_mag(b, a)),
        _ => (a_neg, sub_mag(a, b)),
    }
}

fn mul_mag(a: &[u32], b: &[u32]) -> Vec<u32> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let mut acc = vec![0u64; a.len() + b.len()];
    for (i, &x) in a.iter().enumerate() {
        let mut carry = 0u64;
        for (j, &y) in b.iter().enumerate() {
            let cur = acc[i + j] + u64::from(x) * u64::from(y) + carry;
            acc[i + j] = cur % BASE;
            carry = cur / BASE;
        }
        let mut k = i + b.len();
        while carry > 0 {
            let cur = acc[k] + carry;
            acc[k] = cur % BASE;
            carry = cur / BASE;
            k += 1;
        }
    }
    let mut out: Vec<u32> = acc.into_iter().map(|limb| limb as u32).collect();
    trim(&mut out);
    out
}

fn mul_small(a: &[u32], m: u32) -> Vec<u32> {
    mul_mag(a, &[m])
}

/// Quotient and remainder of magnitudes; `b` must be non-zero
fn divmod_mag(a: &[u32], b: &[u32]) -> (Vec<u32>, Vec<u32>) {
    if cmp_mag(a, b) == Ordering::Less {
        return (Vec::new(), a.to_vec());
    }

    if let [divisor] = b {
        let divisor = u64::from(*divisor);
        let mut quotient = vec![0u32; a.len()];
        let mut rem = 0u64;
        for i in (0..a.len()).rev() {
            let cur = rem * BASE + u64::from(a[i]);
            quotient[i] = (cur / divisor) as u32;
            rem = cur % divisor;
        }
        trim(&mut quotient);
        let mut remainder = vec![rem as u32];
        trim(&mut remainder);
        return (quotient, remainder);
    }

    let mut quotient = vec![0u32; a.len()];
    let mut rem: Vec<u32> = Vec::new();
    for i in (0..a.len()).rev() {
        rem.insert(0, a[i]);
        trim(&mut rem);

        // Largest digit d with b * d <= rem
        let (mut lo, mut hi) = (0u32, (BASE - 1) as u32);
        while lo < hi {
            let mid = lo + (hi - lo).div_ceil(2);
            if cmp_mag(&mul_small(b, mid), &rem) == Ordering::Greater {
                hi = mid - 1;
            } else {
                lo = mid;
            }
        }
        quotient[i] = lo;
        if lo > 0 {
            rem = sub_mag(&rem, &mul_small(b, lo));
        }
    }
    trim(&mut quotient);
    (quotient, rem)
}

impl PartialEq for BigInt {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

impl Eq for BigInt {}

impl PartialOrd for BigInt {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BigInt {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl Hash for BigInt {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let (negative, digits) = self.parts();
        negative.hash(state);
        digits.hash(state);
    }
}

impl fmt::Display for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repr)
    }
}

impl FromStr for BigInt {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BigInt::new(s)
    }
}

impl From<i64> for BigInt {
    fn from(value: i64) -> Self {
        BigInt {
            repr: value.to_string(),
        }
    }
}

impl From<u64> for BigInt {
    fn from(value: u64) -> Self {
        BigInt {
            repr: value.to_string(),
        }
    }
}

impl From<i128> for BigInt {
    fn from(value: i128) -> Self {
        BigInt {
            repr: value.to_string(),
        }
    }
}

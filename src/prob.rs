//!
//! Log-space probabilities
//!
//! Every score of the models is a `Prob`, stored as its natural log so that
//! products over long sequences do not underflow. Probability zero is
//! `-inf` and flows through `*` and `+` without special casing by callers.
//!
use approx::AbsDiffEq;
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::cmp::Ordering;
use std::str::FromStr;

///
/// Probability `0 <= p <= 1` stored as `log p` in `[-inf, 0]`
///
#[derive(Clone, Copy, Debug, SerializeDisplay, DeserializeFromStr)]
pub struct Prob(f64);

/// `Prob` from a plain probability
pub fn p(value: f64) -> Prob {
    Prob::from_prob(value)
}

/// `Prob` from a log probability
pub fn lp(log_value: f64) -> Prob {
    Prob::from_log_prob(log_value)
}

impl Prob {
    pub fn from_prob(value: f64) -> Prob {
        Prob(value.ln())
    }
    pub fn from_log_prob(log_value: f64) -> Prob {
        Prob(log_value)
    }
    /// `p`
    pub fn to_value(self) -> f64 {
        self.0.exp()
    }
    /// `log p`
    pub fn to_log_value(self) -> f64 {
        self.0
    }
    pub fn zero() -> Prob {
        Prob(f64::NEG_INFINITY)
    }
    pub fn one() -> Prob {
        Prob(0.0)
    }
    pub fn is_zero(self) -> bool {
        self.0 == f64::NEG_INFINITY
    }
    pub fn is_one(self) -> bool {
        self.0 == 0.0
    }
    ///
    /// `p^n`. `p^0` is one even for `p = 0`, as for a run of length 1
    /// that takes no self-transition.
    ///
    pub fn powi(self, n: usize) -> Prob {
        match n {
            0 => Prob::one(),
            _ => Prob(self.0 * n as f64),
        }
    }
}

impl Default for Prob {
    fn default() -> Self {
        Prob::zero()
    }
}

impl num_traits::Zero for Prob {
    fn zero() -> Self {
        Prob::zero()
    }
    fn is_zero(&self) -> bool {
        Prob::is_zero(*self)
    }
}

impl num_traits::One for Prob {
    fn one() -> Self {
        Prob::one()
    }
}

///
/// `log p (p)`, e.g. `-0.6931471805599453(0.5000)`
///
impl std::fmt::Display for Prob {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}({:.4})", self.0, self.to_value())
    }
}

///
/// Parses the Display form, or a bare log value.
///
impl FromStr for Prob {
    type Err = std::num::ParseFloatError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let log_value = s.split('(').next().unwrap_or(s);
        log_value.trim().parse::<f64>().map(Prob)
    }
}

///
/// Exact `log(e^x + e^y) = max + log1p(e^(min - max))`.
///
impl std::ops::Add for Prob {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        let (hi, lo) = if self.0 >= other.0 {
            (self.0, other.0)
        } else {
            (other.0, self.0)
        };
        if lo == f64::NEG_INFINITY {
            Prob(hi)
        } else {
            Prob(hi + (lo - hi).exp().ln_1p())
        }
    }
}

impl std::ops::Mul for Prob {
    type Output = Self;
    fn mul(self, other: Self) -> Self {
        Prob(self.0 + other.0)
    }
}

///
/// Division by zero is only meaningful for a zero numerator, which is kept zero.
///
impl std::ops::Div for Prob {
    type Output = Self;
    fn div(self, other: Self) -> Self {
        if self.is_zero() {
            Prob::zero()
        } else {
            Prob(self.0 - other.0)
        }
    }
}

impl std::ops::AddAssign for Prob {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl std::ops::MulAssign for Prob {
    fn mul_assign(&mut self, other: Self) {
        *self = *self * other;
    }
}

impl std::iter::Sum for Prob {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Prob::zero(), |acc, x| acc + x)
    }
}

impl<'a> std::iter::Sum<&'a Prob> for Prob {
    fn sum<I: Iterator<Item = &'a Prob>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl std::iter::Product for Prob {
    fn product<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Prob::one(), |acc, x| acc * x)
    }
}

impl<'a> std::iter::Product<&'a Prob> for Prob {
    fn product<I: Iterator<Item = &'a Prob>>(iter: I) -> Self {
        iter.copied().product()
    }
}

///
/// Compares log values, with any two zeros equal.
///
impl AbsDiffEq for Prob {
    type Epsilon = f64;
    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }
    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        (self.is_zero() && other.is_zero()) || self.0.abs_diff_eq(&other.0, epsilon)
    }
}

///
/// Total order on log values. `log 1` written as `-0.0` or `0.0` is the same
/// probability, so the sign of zero is ignored.
///
impl Ord for Prob {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.0 + 0.0).total_cmp(&(other.0 + 0.0))
    }
}

impl PartialOrd for Prob {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Prob {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Prob {}

//
// log_sum on raw log values
//

/// Log values at or below this are treated as exact zero probability by `log_sum`.
pub const LOG_ZERO_THRESHOLD: f64 = -2e20;

/// `log_sum` drops the correction term when the two operands are further apart than this.
pub const LOG_SUM_CUTOFF: f64 = 7.5;

///
/// `log(exp(x) + exp(y))` with the truncation policy of the legacy toolkit:
///
/// * an operand `<= LOG_ZERO_THRESHOLD` contributes nothing
/// * if `|x - y| > LOG_SUM_CUTOFF` the larger operand is returned as is
///
/// The error of the cutoff is at most `log(1 + exp(-7.5)) ~ 5.5e-4`.
///
/// Standalone helper for reproducing scores of the legacy toolkit. `Prob`
/// addition is exact and is what forward, backward and posterior use, so
/// none of them apply this truncation.
///
pub fn log_sum(x: f64, y: f64) -> f64 {
    let (hi, lo) = if x >= y { (x, y) } else { (y, x) };
    if hi <= LOG_ZERO_THRESHOLD {
        f64::NEG_INFINITY
    } else if lo <= LOG_ZERO_THRESHOLD || hi - lo > LOG_SUM_CUTOFF {
        hi
    } else {
        hi + (lo - hi).exp().ln_1p()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn zero_and_one_are_identities() {
        let x = p(0.37);
        assert_eq!(x + Prob::zero(), x);
        assert_eq!(Prob::zero() + x, x);
        assert_eq!(x * Prob::one(), x);
        assert!((x * Prob::zero()).is_zero());
        assert!(p(0.0).is_zero());
        assert!(!p(1e-300).is_zero());
        assert!(p(1.0).is_one());
        assert_eq!(Prob::default(), Prob::zero());
        assert_eq!(<Prob as num_traits::Zero>::zero(), Prob::zero());
        assert_eq!(<Prob as num_traits::One>::one(), Prob::one());
    }
    #[test]
    fn arithmetic_in_log_space() {
        assert_abs_diff_eq!(p(0.25) + p(0.5), p(0.75), epsilon = 1e-12);
        assert_abs_diff_eq!(p(0.2) + p(0.2), p(0.4), epsilon = 1e-12);
        assert_abs_diff_eq!(p(0.25) * p(0.5), p(0.125), epsilon = 1e-12);
        assert_abs_diff_eq!(p(0.125) / p(0.5), p(0.25), epsilon = 1e-12);
        assert!((Prob::zero() / Prob::zero()).is_zero());
        // far below f64 resolution
        let tiny = lp(-2000.0);
        assert_abs_diff_eq!((tiny + tiny).to_log_value(), -2000.0 + 2f64.ln(), epsilon = 1e-9);

        let mut x = p(0.1);
        x += p(0.3);
        x *= p(0.5);
        assert_abs_diff_eq!(x, p(0.2), epsilon = 1e-12);
    }
    #[test]
    fn sum_and_product_of_iterators() {
        let xs = vec![p(0.1), p(0.2), p(0.3)];
        let s: Prob = xs.iter().sum();
        let q: Prob = xs.iter().product();
        assert_abs_diff_eq!(s, p(0.6), epsilon = 1e-12);
        assert_abs_diff_eq!(q, p(0.006), epsilon = 1e-12);
        let none: Vec<Prob> = Vec::new();
        assert!(none.iter().sum::<Prob>().is_zero());
        assert!(none.into_iter().product::<Prob>().is_one());
        let zeros = vec![Prob::zero(); 3];
        assert!(zeros.iter().sum::<Prob>().is_zero());
    }
    #[test]
    fn ordering_puts_zero_first() {
        let mut xs = vec![p(0.5), Prob::zero(), p(1.0), p(0.01)];
        xs.sort();
        assert_eq!(xs, vec![Prob::zero(), p(0.01), p(0.5), p(1.0)]);
        assert_eq!(xs.iter().max(), Some(&p(1.0)));
    }
    #[test]
    fn ordering_ignores_sign_of_zero() {
        let negative_one = lp(-0.0);
        assert_eq!(negative_one, Prob::one());
        assert_eq!(negative_one.partial_cmp(&Prob::one()), Some(Ordering::Equal));
        assert_eq!(negative_one.cmp(&Prob::one()), Ordering::Equal);
        assert!(negative_one.is_one());
        assert_ne!(Prob::zero(), p(1e-300));
        assert!(Prob::zero() < p(1e-300));
    }
    #[test]
    fn addition_is_exact_beyond_cutoff() {
        // beyond the legacy cutoff, exact addition still moves the sum
        let big = lp(0.0);
        let small = lp(-8.0);
        let exact = (big + small).to_log_value();
        assert!(exact > 0.0);
        assert_abs_diff_eq!(exact, (-8.0f64).exp().ln_1p(), epsilon = 1e-15);
        assert_eq!(log_sum(0.0, -8.0), 0.0);
    }
    #[test]
    fn powi_of_zero() {
        assert_abs_diff_eq!(p(0.9).powi(2), p(0.81), epsilon = 1e-12);
        assert!(Prob::zero().powi(0).is_one());
        assert!(Prob::zero().powi(3).is_zero());
    }
    #[test]
    fn approx_treats_zeros_as_equal() {
        assert!(abs_diff_eq!(Prob::zero(), Prob::zero()));
        assert!(!abs_diff_eq!(Prob::zero(), p(1e-10)));
        assert!(abs_diff_eq!(p(0.5), p(0.5000001), epsilon = 1e-6));
    }
    #[test]
    fn text_and_json_forms() {
        for x in [Prob::zero(), p(0.5), Prob::one()] {
            assert_eq!(x.to_string().parse::<Prob>().unwrap(), x);
            let json = serde_json::to_string(&x).unwrap();
            assert_eq!(serde_json::from_str::<Prob>(&json).unwrap(), x);
        }
        assert_eq!("-1.5".parse::<Prob>().unwrap(), lp(-1.5));
        assert!("half".parse::<Prob>().is_err());
    }
    #[test]
    fn log_sum_matches_logaddexp() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
        for _ in 0..1000 {
            let x: f64 = rng.gen_range(-50.0..0.0);
            let y: f64 = rng.gen_range(-50.0..0.0);
            let exact = (x.exp() + y.exp()).ln();
            assert_abs_diff_eq!(log_sum(x, y), exact, epsilon = 6e-4);
            assert_abs_diff_eq!((lp(x) + lp(y)).to_log_value(), exact, epsilon = 1e-9);
        }
    }
    #[test]
    fn log_sum_zero_policy() {
        assert_eq!(log_sum(-1.5, f64::NEG_INFINITY), -1.5);
        assert_eq!(log_sum(f64::NEG_INFINITY, -1.5), -1.5);
        assert_eq!(log_sum(f64::NEG_INFINITY, f64::NEG_INFINITY), f64::NEG_INFINITY);
        assert_eq!(log_sum(-1.0, -3e20), -1.0);
        assert_eq!(log_sum(-3e20, -4e20), f64::NEG_INFINITY);
        // beyond the cutoff the smaller operand is dropped
        assert_eq!(log_sum(-1.0, -9.0), -1.0);
        assert_abs_diff_eq!(log_sum(-1.0, -1.0), -1.0 + 2f64.ln(), epsilon = 1e-12);
    }
}

// Copyright 2017 The Spade Developers.
// Copyright 2020 The GeoRust Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Exact floating-point expansions.
//!
//! An expansion represents a real number exactly as the sum of `f64` components that are
//! sorted by increasing magnitude and pairwise *nonoverlapping*: the lowest set bit of each
//! component is more significant than the highest set bit of every smaller one.
//! Sums, differences and products of expansions are computed without any rounding error,
//! following Shewchuk, *Adaptive Precision Floating-Point Arithmetic and Fast Robust
//! Geometric Predicates* (1997).

use core::ops::{Add, Mul, Neg, Sub};

use num_traits::{One, Zero};
use smallvec::SmallVec;

use crate::arith::{fast_two_sum, split, two_diff, two_product, two_product_presplit, two_sum};

/// Components stored inline before spilling to the heap. Large enough for the exact
/// 2D orientation path and for most intermediate terms of the 3D kernels.
const INLINE_COMPONENTS: usize = 16;

type Components = SmallVec<[f64; INLINE_COMPONENTS]>;

/// An exact real value, stored as a nonoverlapping sum of `f64` components.
///
/// The zero value ([`Zero::zero`]) has no components. Zero components are never stored.
///
/// ```
/// use exact_predicates::Expansion;
///
/// let big = Expansion::from_f64(1e16);
/// let tiny = Expansion::from_f64(1.0);
/// let sum = &big + &tiny;
/// assert_eq!(sum.len(), 2);
/// assert_eq!((&sum - &big).most_significant(), 1.0);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Expansion {
    components: Components,
}

impl Expansion {
    /// A single-component expansion.
    pub fn from_f64(value: f64) -> Self {
        debug_assert!(value.is_finite(), "expansions hold finite components only");
        let mut components = Components::new();
        push_nonzero(&mut components, value);
        Self { components }
    }

    /// The exact value of `a + b`.
    pub fn sum(a: f64, b: f64) -> Self {
        let (x, y) = two_sum(a, b);
        Self::from_pair(x, y)
    }

    /// The exact value of `a - b`.
    pub fn difference(a: f64, b: f64) -> Self {
        let (x, y) = two_diff(a, b);
        Self::from_pair(x, y)
    }

    /// The exact value of `a * b`.
    pub fn product(a: f64, b: f64) -> Self {
        let (x, y) = two_product(a, b);
        Self::from_pair(x, y)
    }

    /// The exact value of `a * a`.
    pub fn square(a: f64) -> Self {
        let (x, y) = crate::arith::square(a);
        Self::from_pair(x, y)
    }

    fn from_pair(hi: f64, lo: f64) -> Self {
        let mut components = Components::new();
        push_nonzero(&mut components, lo);
        push_nonzero(&mut components, hi);
        Self::from_components(components)
    }

    fn from_components(components: Components) -> Self {
        debug_assert!(
            is_nonoverlapping(&components),
            "expansion invariant violated: {:?}",
            components
        );
        Self { components }
    }

    /// The components, smallest magnitude first.
    pub fn components(&self) -> &[f64] {
        &self.components
    }

    /// Number of stored components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// `true` iff the expansion has no components, i.e. is exactly zero.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// A floating-point approximation of the value: the components summed in
    /// order of increasing magnitude.
    pub fn estimate(&self) -> f64 {
        self.components.iter().fold(0.0, |acc, &c| acc + c)
    }

    /// The largest component, or `0.0` for the zero expansion.
    ///
    /// Because the components do not overlap, the smaller ones sum to less than one unit
    /// in the last place of this component: its sign is the exact sign of the expansion.
    pub fn most_significant(&self) -> f64 {
        self.components.last().copied().unwrap_or(0.0)
    }

    /// The exact product of this expansion and `b`.
    pub fn scale(&self, b: f64) -> Self {
        Self::from_components(scale_components(&self.components, b))
    }

    fn plus(&self, other: &Self) -> Self {
        Self::from_components(sum_components(&self.components, &other.components))
    }

    fn times(&self, other: &Self) -> Self {
        let (long, short) = if self.len() >= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        short
            .components
            .iter()
            .fold(Self::zero(), |acc, &c| acc.plus(&long.scale(c)))
    }

    fn negated(&self) -> Self {
        Self {
            components: self.components.iter().map(|c| -c).collect(),
        }
    }
}

impl Zero for Expansion {
    fn zero() -> Self {
        Self {
            components: Components::new(),
        }
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl One for Expansion {
    fn one() -> Self {
        Self::from_f64(1.0)
    }
}

impl From<f64> for Expansion {
    fn from(value: f64) -> Self {
        Self::from_f64(value)
    }
}

#[inline]
fn push_nonzero(h: &mut Components, value: f64) {
    if value != 0.0 {
        h.push(value);
    }
}

/// Yields the components of two expansions in order of increasing magnitude.
fn merge_by_magnitude<'a>(e: &'a [f64], f: &'a [f64]) -> impl Iterator<Item = f64> + 'a {
    let (mut i, mut j) = (0, 0);
    core::iter::from_fn(move || {
        let take_e = match (e.get(i), f.get(j)) {
            // true iff |f| > |e|, without computing absolute values
            (Some(&a), Some(&b)) => (b > a) == (b > -a),
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => return None,
        };
        if take_e {
            i += 1;
            Some(e[i - 1])
        } else {
            j += 1;
            Some(f[j - 1])
        }
    })
}

/// Zero-eliminating expansion sum: merges by magnitude, then sweeps a running two-sum
/// through the merged sequence, emitting every nonzero roundoff term.
fn sum_components(e: &[f64], f: &[f64]) -> Components {
    if e.is_empty() {
        return Components::from_slice(f);
    }
    if f.is_empty() {
        return Components::from_slice(e);
    }

    let mut h = Components::with_capacity(e.len() + f.len());
    let mut merged = merge_by_magnitude(e, f);
    let mut q = match merged.next() {
        Some(first) => first,
        None => return h,
    };
    for now in merged {
        let (sum, err) = two_sum(q, now);
        push_nonzero(&mut h, err);
        q = sum;
    }
    push_nonzero(&mut h, q);
    h
}

/// Zero-eliminating scale: multiplies every component by `b` exactly and carries the
/// running sum upwards.
fn scale_components(e: &[f64], b: f64) -> Components {
    let mut h = Components::with_capacity(2 * e.len());
    if b == 0.0 {
        return h;
    }

    let (b_hi, b_lo) = split(b);
    let mut products = e.iter().map(|&c| two_product_presplit(c, b, b_hi, b_lo));
    let (mut q, low) = match products.next() {
        Some(first) => first,
        None => return h,
    };
    push_nonzero(&mut h, low);
    for (product_hi, product_lo) in products {
        let (sum, err) = two_sum(q, product_lo);
        push_nonzero(&mut h, err);
        let (carry, err) = fast_two_sum(product_hi, sum);
        push_nonzero(&mut h, err);
        q = carry;
    }
    push_nonzero(&mut h, q);
    h
}

/// Value of the least significant set bit of `x` (nonzero, finite).
fn lowest_bit(x: f64) -> f64 {
    const MANTISSA_MASK: u64 = (1 << 52) - 1;
    let x = x.abs();
    let bits = x.to_bits();
    if bits & MANTISSA_MASK == 0 {
        x
    } else {
        // clearing the lowest set bit keeps the exponent, so the subtraction is exact
        x - f64::from_bits(bits & (bits - 1))
    }
}

fn is_nonoverlapping(components: &[f64]) -> bool {
    components.iter().all(|c| *c != 0.0 && c.is_finite())
        && components
            .windows(2)
            .all(|pair| pair[0].abs() < lowest_bit(pair[1]))
}

impl Neg for Expansion {
    type Output = Expansion;

    fn neg(self) -> Expansion {
        self.negated()
    }
}

impl Neg for &Expansion {
    type Output = Expansion;

    fn neg(self) -> Expansion {
        self.negated()
    }
}

impl<'a, 'b> Add<&'b Expansion> for &'a Expansion {
    type Output = Expansion;

    fn add(self, rhs: &'b Expansion) -> Expansion {
        self.plus(rhs)
    }
}

impl<'a, 'b> Sub<&'b Expansion> for &'a Expansion {
    type Output = Expansion;

    fn sub(self, rhs: &'b Expansion) -> Expansion {
        self.plus(&rhs.negated())
    }
}

impl<'a, 'b> Mul<&'b Expansion> for &'a Expansion {
    type Output = Expansion;

    fn mul(self, rhs: &'b Expansion) -> Expansion {
        self.times(rhs)
    }
}

// By-value forms forward to the by-reference ones.
macro_rules! forward_owned_binop {
    ($imp:ident, $method:ident) => {
        impl $imp for Expansion {
            type Output = Expansion;

            fn $method(self, rhs: Expansion) -> Expansion {
                (&self).$method(&rhs)
            }
        }

        impl<'a> $imp<&'a Expansion> for Expansion {
            type Output = Expansion;

            fn $method(self, rhs: &'a Expansion) -> Expansion {
                (&self).$method(rhs)
            }
        }

        impl<'a> $imp<Expansion> for &'a Expansion {
            type Output = Expansion;

            fn $method(self, rhs: Expansion) -> Expansion {
                self.$method(&rhs)
            }
        }
    };
}

forward_owned_binop!(Add, add);
forward_owned_binop!(Sub, sub);
forward_owned_binop!(Mul, mul);

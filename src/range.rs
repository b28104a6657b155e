// Copyright 2017 The Spade Developers.
// Copyright 2020 The GeoRust Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Exponent range of a set of coordinates.
//!
//! Both the floating-point filters and the expansion arithmetic assume that no product
//! underflows or overflows. A polynomial of degree `d` in coordinates whose set bits all lie
//! between `2^lowest` and `2^highest` only produces nonzero intermediate values that are
//! multiples of `2^(d * lowest)` and smaller than roughly `2^(d * highest)`, so checking the
//! two exponents up front is enough to know whether that assumption holds.

/// Smallest exponent of the granularity of an intermediate value. Leaves room for the
/// 106 bits of a two-product tail above the subnormal range.
const MIN_GRANULARITY: i32 = -960;

/// Largest exponent of an intermediate magnitude. Leaves room for the splitter, for sums of
/// up to `16!` terms and for the lifted coordinate.
const MAX_MAGNITUDE: i32 = 920;

const EXPONENT_BIAS: i32 = 1023;
const MANTISSA_BITS: i32 = 52;
const MANTISSA_MASK: u64 = (1 << MANTISSA_BITS) - 1;

/// Exponents of the least and most significant set bits over a set of finite values.
///
/// The unit `1.0` always counts as a member, so the range also covers the constant
/// entries of homogenised matrices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ExponentRange {
    lowest: i32,
    highest: i32,
}

impl ExponentRange {
    pub(crate) fn of(values: impl IntoIterator<Item = f64>) -> Self {
        values.into_iter().filter(|x| *x != 0.0).fold(
            ExponentRange {
                lowest: 0,
                highest: 0,
            },
            |range, x| {
                let (lowest, highest) = bit_exponents(x);
                ExponentRange {
                    lowest: range.lowest.min(lowest),
                    highest: range.highest.max(highest),
                }
            },
        )
    }

    /// `true` if every intermediate value of a polynomial of this degree in the values (or in
    /// their pairwise differences) stays clear of underflow and overflow.
    pub(crate) fn supports_degree(&self, degree: usize) -> bool {
        let degree = degree as i32;
        // differences of two values may carry one more bit on top
        degree * self.lowest >= MIN_GRANULARITY && degree * (self.highest + 2) <= MAX_MAGNITUDE
    }
}

/// Exponents of the lowest and highest set bits of a nonzero finite `x`.
fn bit_exponents(x: f64) -> (i32, i32) {
    let bits = x.to_bits();
    let biased = ((bits >> MANTISSA_BITS) & 0x7ff) as i32;
    let fraction = bits & MANTISSA_MASK;
    if biased == 0 {
        // subnormal: no implicit bit, fixed exponent
        let scale = 1 - EXPONENT_BIAS - MANTISSA_BITS;
        let lowest = scale + fraction.trailing_zeros() as i32;
        let highest = scale + 63 - fraction.leading_zeros() as i32;
        (lowest, highest)
    } else {
        let mantissa = fraction | (1 << MANTISSA_BITS);
        let highest = biased - EXPONENT_BIAS;
        (highest - MANTISSA_BITS + mantissa.trailing_zeros() as i32, highest)
    }
}

// Copyright 2017 The Spade Developers.
// Copyright 2020 The GeoRust Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use thiserror::Error;

/// Reasons a predicate refuses its input.
///
/// Every variant is detected before any arithmetic takes place. There is no variant for
/// loss of precision: a predicate that accepts its input always returns an exact sign.
///
/// ```
/// use exact_predicates::{volume, PredicateError};
///
/// let err = volume(&[[0.0, 0.0], [1.0, 0.0]]).unwrap_err();
/// assert_eq!(err, PredicateError::InvalidArity { expected: 3, found: 2 });
/// ```
#[derive(Clone, Debug, Error, PartialEq)]
pub enum PredicateError {
    /// The number of points (or matrix rows) does not match the dimension.
    #[error("expected {expected} points, got {found}")]
    InvalidArity {
        /// Number of points the predicate needs.
        expected: usize,
        /// Number of points supplied.
        found: usize,
    },
    /// A point (or matrix row) has the wrong number of coordinates.
    #[error("point {index} has {found} coordinates, expected {expected}")]
    DimensionMismatch {
        /// Position of the offending point.
        index: usize,
        /// Number of coordinates every point must have.
        expected: usize,
        /// Number of coordinates the point has.
        found: usize,
    },
    /// A coordinate is NaN or infinite.
    #[error("coordinate {axis} of point {index} is not finite: {value}")]
    NonFiniteInput {
        /// Position of the offending point.
        index: usize,
        /// Position of the coordinate within the point.
        axis: usize,
        /// The offending value.
        value: f64,
    },
    /// The determinant order exceeds [`MAX_DETERMINANT_ORDER`](crate::MAX_DETERMINANT_ORDER).
    #[error("unsupported determinant order: {order} (max {max})")]
    UnsupportedOrder {
        /// Requested order.
        order: usize,
        /// Largest supported order.
        max: usize,
    },
}

// Copyright 2017 The Spade Developers.
// Copyright 2020 The GeoRust Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Input validation shared by all entry points.

use tracing::debug;

use crate::error::PredicateError;
use crate::MAX_DETERMINANT_ORDER;

/// Rejects NaN and infinite coordinates of the point at `index`.
pub(crate) fn check_finite(index: usize, coords: &[f64]) -> Result<(), PredicateError> {
    match coords.iter().position(|c| !c.is_finite()) {
        None => Ok(()),
        Some(axis) => {
            let err = PredicateError::NonFiniteInput {
                index,
                axis,
                value: coords[axis],
            };
            debug!(%err, "rejected predicate input");
            Err(err)
        }
    }
}

/// Validates a point set for a predicate that needs `D + extra` points of `D` coordinates,
/// where `D` is the length of the first point. Returns `D`.
///
/// An empty set is reported against the `D = 0` arity.
pub(crate) fn simplex_dimension<P: AsRef<[f64]>>(
    points: &[P],
    extra: usize,
) -> Result<usize, PredicateError> {
    let dim = points.first().map_or(0, |p| p.as_ref().len());
    if points.len() != dim + extra {
        let err = PredicateError::InvalidArity {
            expected: dim + extra,
            found: points.len(),
        };
        debug!(%err, "rejected predicate input");
        return Err(err);
    }
    check_rows(points, dim)?;
    Ok(dim)
}

/// Validates a square matrix given as rows. Returns its order.
pub(crate) fn square_order<R: AsRef<[f64]>>(matrix: &[R]) -> Result<usize, PredicateError> {
    let order = matrix.len();
    check_order(order)?;
    check_rows(matrix, order)?;
    Ok(order)
}

/// Rejects determinants larger than [`MAX_DETERMINANT_ORDER`].
pub(crate) fn check_order(order: usize) -> Result<(), PredicateError> {
    if order > MAX_DETERMINANT_ORDER {
        let err = PredicateError::UnsupportedOrder {
            order,
            max: MAX_DETERMINANT_ORDER,
        };
        debug!(%err, "rejected predicate input");
        return Err(err);
    }
    Ok(())
}

fn check_rows<R: AsRef<[f64]>>(rows: &[R], width: usize) -> Result<(), PredicateError> {
    for (index, row) in rows.iter().enumerate() {
        let row = row.as_ref();
        if row.len() != width {
            let err = PredicateError::DimensionMismatch {
                index,
                expected: width,
                found: row.len(),
            };
            debug!(%err, "rejected predicate input");
            return Err(err);
        }
        check_finite(index, row)?;
    }
    Ok(())
}

#![no_main]

use exact_predicates::{sign_exact_determinant, volume};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (u8, Vec<f64>)| {
    let (dim, coords) = data;
    let dim = 1 + usize::from(dim % 6);
    if coords.len() < dim * (dim + 1) {
        return;
    }
    let points: Vec<&[f64]> = coords.chunks_exact(dim).take(dim + 1).collect();
    if points.iter().flat_map(|p| p.iter()).any(|x| !x.is_finite()) {
        assert!(volume(&points).is_err());
        return;
    }

    let result = volume(&points).unwrap();
    let rows: Vec<Vec<f64>> = points
        .iter()
        .map(|p| std::iter::once(1.0).chain(p.iter().copied()).collect())
        .collect();
    let expected = sign_exact_determinant(&rows).unwrap();

    assert_eq!(result.partial_cmp(&0.0), expected.partial_cmp(&0.0));
});

#![no_main]

use exact_predicates::{orientation2d, sign_exact_determinant, Coord};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: [(f64, f64); 3]| {
    let [pa, pb, pc] = data.map(|(x, y)| Coord { x, y });
    if data.iter().any(|&(x, y)| !x.is_finite() || !y.is_finite()) {
        assert!(orientation2d(pa, pb, pc).is_err());
        return;
    }

    let result = orientation2d(pa, pb, pc).unwrap();
    let rows = data.map(|(x, y)| [1.0, x, y]);
    let expected = sign_exact_determinant(&rows).unwrap();

    assert_eq!(result.partial_cmp(&0.0), expected.partial_cmp(&0.0));
});

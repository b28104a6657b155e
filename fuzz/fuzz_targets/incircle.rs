#![no_main]

use exact_predicates::{incircle, Coord};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: [(f64, f64); 4]| {
    let [pa, pb, pc, pd] = data.map(|(x, y)| Coord { x, y });
    if data.iter().any(|&(x, y)| !x.is_finite() || !y.is_finite()) {
        assert!(incircle(pa, pb, pc, pd).is_err());
        return;
    }

    let result = incircle(pa, pb, pc, pd).unwrap();
    assert!(result.is_finite());

    // the kernel works relative to its first point, so permuting the points changes every
    // intermediate value but must only change the sign by the parity of the permutation
    let rotated = incircle(pb, pc, pa, pd).unwrap();
    let swapped = incircle(pd, pb, pc, pa).unwrap();
    assert_eq!(result.partial_cmp(&0.0), rotated.partial_cmp(&0.0));
    assert_eq!(result.partial_cmp(&0.0), (-swapped).partial_cmp(&0.0));
});

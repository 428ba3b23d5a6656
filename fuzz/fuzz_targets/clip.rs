#![no_main]

use arbitrary::Unstructured;
use libfuzzer_sys::fuzz_target;
use polyclip::{arbitrary as pick, area, clip};

fn run(u: &mut Unstructured<'_>) -> Result<(), arbitrary::Error> {
    let subject = pick::polygons(1000, u)?;
    let clip_paths = pick::polygons(1000, u)?;
    let op = pick::binary_op(u)?;
    let fill_rule = pick::fill_rule(u)?;

    let out = clip(&subject, &clip_paths, op, fill_rule).unwrap();
    for c in out.contours() {
        assert!(c.points.len() >= 3);
        assert_eq!(area(&c.points) > 0.0, c.outer);
        if let Some(parent) = c.parent {
            assert_ne!(out[parent].outer, c.outer);
        }
    }
    Ok(())
}

fuzz_target!(|data: &[u8]| {
    let _ = run(&mut Unstructured::new(data));
});

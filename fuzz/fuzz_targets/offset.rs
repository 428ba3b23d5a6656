#![no_main]

use arbitrary::Unstructured;
use libfuzzer_sys::fuzz_target;
use polyclip::{arbitrary as pick, offset, OffsetOptions};

fn run(u: &mut Unstructured<'_>) -> Result<(), arbitrary::Error> {
    let paths = pick::polygons(1000, u)?;
    let join = pick::join_style(u)?;
    let end = pick::end_style(u)?;
    let delta = u.int_in_range(-4000i32..=4000)? as f64 / 8.0;

    offset(&paths, delta, join, end, &OffsetOptions::default()).unwrap();
    Ok(())
}

fuzz_target!(|data: &[u8]| {
    let _ = run(&mut Unstructured::new(data));
});

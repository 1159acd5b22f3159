#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::fuzz_target;
use mesh_weld_fuzz::{Geometry, Vertex};

#[derive(Debug)]
struct OneTriangle(Geometry);

impl Arbitrary<'_> for OneTriangle {
    fn arbitrary(u: &mut Unstructured<'_>) -> Result<Self, arbitrary::Error> {
        let vertices = vec![
            Vertex::arbitrary(u)?,
            Vertex::arbitrary(u)?,
            Vertex::arbitrary(u)?,
        ];
        let mut value = Geometry {
            vertices,
            faces: vec![[0, 1, 2]],
            smoothing_groups: vec![u32::arbitrary(u)?],
        };

        value.validate()?;

        Ok(Self(value))
    }

    fn size_hint(depth: usize) -> (usize, Option<usize>) {
        let (min, max) = Vertex::size_hint(depth);
        (3 * min + 4, max.map(|max| 3 * max + 4))
    }
}

fuzz_target!(|value: OneTriangle| {
    let OneTriangle(value) = value;
    value.check();
});

#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

#[macro_use]
mod typed_vec;

#[cfg(any(test, feature = "arbitrary"))]
pub mod arbitrary;
mod geom;
mod num;
pub mod offset;
mod sweep;
pub mod topology;
mod vertices;

#[cfg(feature = "generators")]
pub mod generators;

pub use geom::{
    area, is_positive, orientation, point_in_polygon, reverse_paths, segment_intersect,
    segments_intersect, strip_duplicates, Orientation, Path, Paths, Point, PointInPolygon, Rect,
};
pub use num::MAX_COORD;
pub use offset::{offset, EndStyle, JoinStyle, OffsetOptions, Offsetter};
pub use topology::{Contour, ContourIdx, Contours};

use sweep::Sweeper;
use topology::{build_contours, BuildOptions};
use vertices::{PathType, Vertices};

/// A fill rule tells us how to decide whether a point is "inside" a set of
/// closed paths, given its winding number.
///
/// Paths with positive [`area`] wind `+1` around the points inside them, and
/// paths with negative area wind `-1`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
pub enum FillRule {
    /// The point is "inside" if its winding number is odd.
    EvenOdd,
    /// The point is "inside" if its winding number is non-zero.
    NonZero,
    /// The point is "inside" if its winding number is positive.
    Positive,
    /// The point is "inside" if its winding number is negative.
    Negative,
}

/// Binary operations between sets.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
pub enum BinaryOp {
    /// A point is in the union of two sets if it is in either one.
    Union,
    /// A point is in the intersection of two sets if it is in both.
    Intersection,
    /// A point is in the difference of two sets if it is in the first but not the second.
    Difference,
    /// A point is in the exclusive-or of two sets if it is in one or the other, but not both.
    Xor,
}

/// Something went wrong while clipping or offsetting.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum Error {
    /// The input (or one of the parameters) doesn't make sense.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// What was wrong with it.
        reason: &'static str,
    },
    /// A coordinate is too large to be handled exactly, or isn't finite.
    #[error("the point ({x}, {y}) is outside the supported coordinate range")]
    PrecisionExceeded {
        /// The horizontal coordinate of the offending point.
        x: f64,
        /// The vertical coordinate of the offending point.
        y: f64,
    },
    /// The sweep got into a state that shouldn't be possible.
    ///
    /// This is a bug; please report it along with the input.
    #[error("inconsistent topology near ({x}, {y})")]
    InconsistentTopology {
        /// Roughly where it happened.
        x: i64,
        /// Roughly where it happened.
        y: i64,
    },
}

/// Knobs for clipping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ClipOptions {
    /// Keep vertices that lie in the middle of a straight edge. Duplicate
    /// points and spikes are removed regardless.
    pub preserve_collinear: bool,
    /// Output outer contours with negative orientation and holes with
    /// positive orientation.
    pub reverse_solution: bool,
}

/// Computes a boolean operation between two sets, each of which is described
/// as a collection of closed paths.
///
/// ```
/// use polyclip::{clip, BinaryOp, FillRule, Point};
///
/// let a = vec![Point::new(0, 0), Point::new(10, 0), Point::new(10, 10), Point::new(0, 10)];
/// let b = vec![Point::new(5, 5), Point::new(15, 5), Point::new(15, 15), Point::new(5, 15)];
/// let out = clip(&[a], &[b], BinaryOp::Intersection, FillRule::NonZero)?;
/// assert_eq!(out.area(), 25.0);
/// # Ok::<(), polyclip::Error>(())
/// ```
pub fn clip(
    subject: &[Path],
    clip: &[Path],
    op: BinaryOp,
    fill_rule: FillRule,
) -> Result<Contours, Error> {
    clip_with_options(subject, clip, op, fill_rule, &ClipOptions::default())
}

/// Like [`clip`], but with some extra options.
pub fn clip_with_options(
    subject: &[Path],
    clip: &[Path],
    op: BinaryOp,
    fill_rule: FillRule,
    options: &ClipOptions,
) -> Result<Contours, Error> {
    let mut verts = Vertices::default();
    verts.add_paths(subject, PathType::Subject)?;
    verts.add_paths(clip, PathType::Clip)?;

    let out = Sweeper::new(verts, op, fill_rule, options.preserve_collinear).run()?;
    build_contours(
        out,
        BuildOptions {
            preserve_collinear: options.preserve_collinear,
            reverse_solution: options.reverse_solution,
        },
    )
}

/// Collects subject and clip paths, for running one or more boolean
/// operations on them.
#[derive(Clone, Debug, Default)]
pub struct Clipper {
    subject: Paths,
    clip: Paths,
    options: ClipOptions,
}

impl Clipper {
    /// Creates a clipper with no paths.
    pub fn new(options: ClipOptions) -> Self {
        Clipper {
            subject: Paths::new(),
            clip: Paths::new(),
            options,
        }
    }

    /// Adds some paths to the subject.
    pub fn add_subject(&mut self, paths: &[Path]) -> &mut Self {
        self.subject.extend_from_slice(paths);
        self
    }

    /// Adds some paths to the clip.
    pub fn add_clip(&mut self, paths: &[Path]) -> &mut Self {
        self.clip.extend_from_slice(paths);
        self
    }

    /// Forgets all the paths.
    pub fn clear(&mut self) {
        self.subject.clear();
        self.clip.clear();
    }

    /// Runs a boolean operation, returning just the paths.
    pub fn execute(&self, op: BinaryOp, fill_rule: FillRule) -> Result<Paths, Error> {
        Ok(self.execute_tree(op, fill_rule)?.paths())
    }

    /// Runs a boolean operation, returning the contours with their nesting.
    pub fn execute_tree(&self, op: BinaryOp, fill_rule: FillRule) -> Result<Contours, Error> {
        clip_with_options(&self.subject, &self.clip, op, fill_rule, &self.options)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use proptest::prelude::*;

    use super::*;

    fn p(x: i64, y: i64) -> Point {
        Point::new(x, y)
    }

    fn rect(x0: i64, y0: i64, x1: i64, y1: i64) -> Path {
        vec![p(x0, y0), p(x1, y0), p(x1, y1), p(x0, y1)]
    }

    // Checks the things that should be true of every result.
    fn check_contours(contours: &Contours) {
        for c in contours.contours() {
            assert!(c.points.len() >= 3);
            let distinct: std::collections::HashSet<_> = c.points.iter().collect();
            assert_eq!(distinct.len(), c.points.len(), "repeated point in {:?}", c.points);
            assert_eq!(area(&c.points) > 0.0, c.outer);
            if let Some(parent) = c.parent {
                assert_eq!(contours[parent].outer, !c.outer);
            } else {
                assert!(c.outer);
            }
        }
    }

    #[test]
    fn identical_squares() {
        let sq = vec![p(0, 0), p(0, 5), p(5, 5), p(5, 0)];
        let subjects = [sq.clone(), sq];

        let even_odd = clip(&subjects, &[], BinaryOp::Union, FillRule::EvenOdd).unwrap();
        assert!(even_odd.is_empty());

        let non_zero = clip(&subjects, &[], BinaryOp::Union, FillRule::NonZero).unwrap();
        assert_eq!(non_zero.len(), 1);
        assert_eq!(non_zero.area(), 25.0);
    }

    #[test]
    fn union_of_one() {
        let poly = vec![p(0, 0), p(10, 0), p(10, 10), p(5, 15), p(0, 10)];
        let out = clip(&[poly.clone()], &[], BinaryOp::Union, FillRule::NonZero).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out.area(), area(&poly));
        check_contours(&out);
    }

    #[test]
    fn negative_input_gives_positive_output() {
        let sq = vec![p(0, 0), p(0, 5), p(5, 5), p(5, 0)];
        assert!(!is_positive(&sq));
        let out = clip(&[sq], &[], BinaryOp::Union, FillRule::NonZero).unwrap();
        assert_eq!(out.area(), 25.0);
        assert!(is_positive(&out[ContourIdx(0)].points));

        // ...unless the fill rule only counts positive windings.
        let sq = vec![p(0, 0), p(0, 5), p(5, 5), p(5, 0)];
        let out = clip(&[sq], &[], BinaryOp::Union, FillRule::Positive).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn differences() {
        let a = rect(0, 0, 10, 10);
        let b = rect(20, 0, 30, 10);
        let out = clip(&[a.clone()], &[b], BinaryOp::Difference, FillRule::NonZero).unwrap();
        assert_eq!(out.area(), 100.0);

        let out = clip(&[a.clone()], &[a], BinaryOp::Difference, FillRule::NonZero).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn overlapping_squares() {
        let a = [rect(0, 0, 10, 10)];
        let b = [rect(5, 5, 15, 15)];
        let area_of = |op| clip(&a, &b, op, FillRule::NonZero).unwrap().area();
        assert_eq!(area_of(BinaryOp::Intersection), 25.0);
        assert_eq!(area_of(BinaryOp::Union), 175.0);
        assert_eq!(area_of(BinaryOp::Difference), 75.0);
        assert_eq!(area_of(BinaryOp::Xor), 150.0);
    }

    #[test]
    fn touching_squares() {
        let out = clip(
            &[rect(0, 0, 10, 10), rect(10, 0, 20, 10)],
            &[],
            BinaryOp::Union,
            FillRule::NonZero,
        )
        .unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out.area(), 200.0);
        assert_eq!(out[ContourIdx(0)].points.len(), 4);
    }

    #[test]
    fn shared_edge_in_either_order() {
        let (a, b) = (rect(0, 0, 10, 10), rect(10, 0, 20, 10));
        for subject in [[a.clone(), b.clone()], [b, a]] {
            let out = clip(&subject, &[], BinaryOp::Union, FillRule::NonZero).unwrap();
            assert_eq!(out.len(), 1);
            assert_eq!(out.area(), 200.0);
            let mut corners = out[ContourIdx(0)].points.clone();
            corners.sort();
            let mut expected = rect(0, 0, 20, 10);
            expected.sort();
            assert_eq!(corners, expected);
        }
    }

    #[test]
    fn subject_order_doesnt_matter() {
        // The two triangles share a vertex, and the even-odd union pinches
        // there into two lobes.
        let t1 = vec![p(800, 1100), p(200, 300), p(0, 0)];
        let t2 = vec![p(800, 1100), p(600, 0), p(0, 100)];
        let forward =
            clip(&[t1.clone(), t2.clone()], &[], BinaryOp::Union, FillRule::EvenOdd).unwrap();
        let backward = clip(&[t2, t1], &[], BinaryOp::Union, FillRule::EvenOdd).unwrap();
        check_contours(&forward);
        check_contours(&backward);
        assert_eq!(forward.area(), backward.area());
        assert_eq!(forward.len(), 3);
        assert_eq!(backward.len(), 3);
    }

    #[test]
    fn bowtie() {
        let bowtie = vec![p(0, 0), p(10, 10), p(10, 0), p(0, 10)];
        let out = clip(&[bowtie], &[], BinaryOp::Union, FillRule::NonZero).unwrap();
        assert_eq!(out.len(), 2);
        for c in out.contours() {
            assert_eq!(c.points.len(), 3);
            assert_eq!(area(&c.points), 25.0);
        }
        check_contours(&out);
    }

    #[test]
    fn square_with_hole() {
        let mut hole = rect(10, 10, 20, 20);
        hole.reverse();
        let out = clip(
            &[rect(0, 0, 30, 30), hole],
            &[],
            BinaryOp::Union,
            FillRule::NonZero,
        )
        .unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out.area(), 800.0);
        assert_eq!(out.grouped(), vec![vec![ContourIdx(0), ContourIdx(1)]]);
        check_contours(&out);

        // With even-odd, the orientation of the hole doesn't matter.
        let out = clip(
            &[rect(0, 0, 30, 30), rect(10, 10, 20, 20)],
            &[],
            BinaryOp::Union,
            FillRule::EvenOdd,
        )
        .unwrap();
        assert_eq!(out.area(), 800.0);
        check_contours(&out);
    }

    #[test]
    fn island_in_hole() {
        let out = clip(
            &[rect(0, 0, 50, 50), rect(10, 10, 40, 40), rect(20, 20, 30, 30)],
            &[],
            BinaryOp::Union,
            FillRule::EvenOdd,
        )
        .unwrap();
        assert_eq!(out.len(), 3);
        assert_eq!(out.area(), 2500.0 - 900.0 + 100.0);
        check_contours(&out);
        let island = out.contours().find(|c| area(&c.points) == 100.0).unwrap();
        let hole = island.parent.unwrap();
        assert!(!out[hole].outer);
    }

    #[test]
    fn reverse_solution() {
        let opts = ClipOptions {
            reverse_solution: true,
            ..Default::default()
        };
        let out = clip_with_options(
            &[rect(0, 0, 10, 10)],
            &[],
            BinaryOp::Union,
            FillRule::NonZero,
            &opts,
        )
        .unwrap();
        assert_eq!(out.area(), -100.0);
    }

    #[test]
    fn preserve_collinear() {
        let poly = vec![p(0, 0), p(5, 0), p(10, 0), p(10, 10), p(0, 10)];
        let out = clip(&[poly.clone()], &[], BinaryOp::Union, FillRule::NonZero).unwrap();
        assert_eq!(out[ContourIdx(0)].points.len(), 4);

        let opts = ClipOptions {
            preserve_collinear: true,
            ..Default::default()
        };
        let out =
            clip_with_options(&[poly], &[], BinaryOp::Union, FillRule::NonZero, &opts).unwrap();
        assert_eq!(out[ContourIdx(0)].points.len(), 5);
    }

    #[test]
    fn clipper_builder() {
        let mut c = Clipper::default();
        c.add_subject(&[rect(0, 0, 10, 10)])
            .add_clip(&[rect(5, 0, 15, 10)]);
        let paths = c.execute(BinaryOp::Intersection, FillRule::NonZero).unwrap();
        assert_eq!(paths.len(), 1);
        assert_eq!(area(&paths[0]), 50.0);
        c.clear();
        assert!(c
            .execute(BinaryOp::Union, FillRule::NonZero)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn deterministic() {
        let subject = [rect(0, 0, 10, 10), vec![p(3, -4), p(12, 7), p(-2, 9)]];
        let clip_paths = [rect(4, 4, 20, 6)];
        let a = clip(&subject, &clip_paths, BinaryOp::Xor, FillRule::NonZero).unwrap();
        let b = clip(&subject, &clip_paths, BinaryOp::Xor, FillRule::NonZero).unwrap();
        assert_eq!(a.paths(), b.paths());
    }

    #[test]
    fn out_of_range() {
        let big = MAX_COORD + 1;
        assert_matches!(
            clip(&[rect(0, 0, big, 10)], &[], BinaryOp::Union, FillRule::NonZero),
            Err(Error::PrecisionExceeded { .. })
        );
    }

    #[test]
    fn huge_but_fine() {
        let m = MAX_COORD;
        let out = clip(
            &[rect(-m, -m, m, m)],
            &[rect(0, 0, m, m)],
            BinaryOp::Intersection,
            FillRule::NonZero,
        )
        .unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(Rect::from_path(&out[ContourIdx(0)].points), Rect {
            left: 0,
            top: 0,
            right: m,
            bottom: m,
        });
    }

    #[test]
    fn error_messages() {
        let e = Error::InvalidInput {
            reason: "non-finite offset",
        };
        assert_eq!(e.to_string(), "invalid input: non-finite offset");
    }

    // An oriented rectangle: winding +1 inside if `positive`, -1 otherwise.
    fn oriented_rect() -> impl Strategy<Value = (i64, i64, i64, i64, bool)> {
        (0i64..8, 0i64..8, 1i64..5, 1i64..5, any::<bool>())
            .prop_map(|(x, y, w, h, pos)| (x, y, x + w, y + h, pos))
    }

    fn to_path(&(x0, y0, x1, y1, pos): &(i64, i64, i64, i64, bool)) -> Path {
        let mut r = rect(x0, y0, x1, y1);
        if !pos {
            r.reverse();
        }
        r
    }

    fn winding(rects: &[(i64, i64, i64, i64, bool)], cx: i64, cy: i64) -> i32 {
        rects
            .iter()
            .filter(|&&(x0, y0, x1, y1, _)| x0 <= cx && cx < x1 && y0 <= cy && cy < y1)
            .map(|&(_, _, _, _, pos)| if pos { 1 } else { -1 })
            .sum()
    }

    fn filled(w: i32, fill_rule: FillRule) -> bool {
        match fill_rule {
            FillRule::EvenOdd => w % 2 != 0,
            FillRule::NonZero => w != 0,
            FillRule::Positive => w > 0,
            FillRule::Negative => w < 0,
        }
    }

    fn op_strategy() -> impl Strategy<Value = BinaryOp> {
        prop_oneof![
            Just(BinaryOp::Union),
            Just(BinaryOp::Intersection),
            Just(BinaryOp::Difference),
            Just(BinaryOp::Xor),
        ]
    }

    fn fill_strategy() -> impl Strategy<Value = FillRule> {
        prop_oneof![
            Just(FillRule::EvenOdd),
            Just(FillRule::NonZero),
            Just(FillRule::Positive),
            Just(FillRule::Negative),
        ]
    }

    proptest! {
        // Compares the area of the result with a count of the unit cells
        // that should be covered.
        #[test]
        fn rectangle_grid(
            subject in prop::collection::vec(oriented_rect(), 0..5),
            clip_rects in prop::collection::vec(oriented_rect(), 0..5),
            op in op_strategy(),
            fill_rule in fill_strategy(),
        ) {
            let subject_paths: Paths = subject.iter().map(to_path).collect();
            let clip_paths: Paths = clip_rects.iter().map(to_path).collect();
            let out = clip(&subject_paths, &clip_paths, op, fill_rule).unwrap();
            check_contours(&out);

            let mut expected = 0;
            for cx in 0..12 {
                for cy in 0..12 {
                    let a = filled(winding(&subject, cx, cy), fill_rule);
                    let b = filled(winding(&clip_rects, cx, cy), fill_rule);
                    let inside = match op {
                        BinaryOp::Union => a || b,
                        BinaryOp::Intersection => a && b,
                        BinaryOp::Difference => a && !b,
                        BinaryOp::Xor => a != b,
                    };
                    if inside {
                        expected += 1;
                    }
                }
            }
            prop_assert_eq!(out.area(), expected as f64);
        }

        #[test]
        fn shuffled_rectangles(
            (subject, shuffled) in prop::collection::vec(oriented_rect(), 1..6)
                .prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle())),
            clip_rects in prop::collection::vec(oriented_rect(), 0..4),
            op in op_strategy(),
            fill_rule in fill_strategy(),
        ) {
            let clip_paths: Paths = clip_rects.iter().map(to_path).collect();
            let reversed_clip: Paths = clip_paths.iter().rev().cloned().collect();
            let run = |rects: &[(i64, i64, i64, i64, bool)], clip_paths: &[Path]| {
                let paths: Paths = rects.iter().map(to_path).collect();
                clip(&paths, clip_paths, op, fill_rule).unwrap()
            };
            let a = run(&subject, &clip_paths);
            let b = run(&shuffled, &reversed_clip);
            check_contours(&a);
            check_contours(&b);
            prop_assert_eq!(a.area(), b.area());
        }

        #[test]
        fn shuffled_triangles(
            (subject, shuffled) in prop::collection::vec(
                prop::collection::vec((-50i64..50, -50i64..50), 3),
                2..5,
            )
            .prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle())),
            fill_rule in fill_strategy(),
        ) {
            let to_paths = |v: &[Vec<(i64, i64)>]| -> Paths {
                v.iter().map(|t| t.iter().copied().map(Point::from).collect()).collect()
            };
            let a = clip(&to_paths(&subject), &[], BinaryOp::Union, fill_rule).unwrap();
            let b = clip(&to_paths(&shuffled), &[], BinaryOp::Union, fill_rule).unwrap();
            check_contours(&a);
            check_contours(&b);
            // Rounded crossings may land differently, but only slightly.
            prop_assert!((a.area() - b.area()).abs() < 200.0);
        }

        #[test]
        fn triangle_identities(
            a in prop::collection::vec((-50i64..50, -50i64..50), 3),
            b in prop::collection::vec((-50i64..50, -50i64..50), 3),
        ) {
            let a: Path = a.into_iter().map(Point::from).collect();
            let b: Path = b.into_iter().map(Point::from).collect();
            let area_of = |op| clip(&[a.clone()], &[b.clone()], op, FillRule::NonZero).unwrap().area();
            let union = area_of(BinaryOp::Union);
            let inter = area_of(BinaryOp::Intersection);
            let diff = area_of(BinaryOp::Difference);
            let xor = area_of(BinaryOp::Xor);
            // Crossings are rounded to integers, so allow a little slack for
            // each of them.
            let tol = 200.0;
            prop_assert!((union + inter - area(&a).abs() - area(&b).abs()).abs() < tol);
            prop_assert!((diff + inter - area(&a).abs()).abs() < tol);
            prop_assert!((xor + inter - union).abs() < tol);
        }
    }
}

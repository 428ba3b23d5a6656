//! The edge model: input paths as rings of vertices, and their local minima.

use crate::geom::{strip_duplicates, Path, Point};
use crate::Error;

typed_arena!(
    /// An arena of vertices, indexed by [`VertexIdx`].
    VertexVec,
    /// An index into the vertex arena.
    VertexIdx,
    "v"
);

/// Which side of a boolean operation a path belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub enum PathType {
    /// The first operand.
    Subject,
    /// The second operand.
    Clip,
}

/// An input vertex, linked to its neighbors in its (closed) path.
#[derive(Clone, Debug)]
pub struct Vertex {
    pub pt: Point,
    pub next: VertexIdx,
    pub prev: VertexIdx,
    /// The path turns from going up to going down here. Where the top is a
    /// horizontal run, only the last vertex of the run (in path order) gets
    /// the flag.
    pub local_max: bool,
    pub local_min: bool,
}

/// A vertex where the boundary turns from going down to going up.
///
/// Both edges leaving a local minimum go up (towards smaller `y`), so this is
/// where the sweep first encounters a piece of boundary.
#[derive(Clone, Copy, Debug)]
pub struct LocalMinimum {
    pub vertex: VertexIdx,
    pub path_type: PathType,
}

/// All the vertices of one sweep, together with their local minima.
#[derive(Debug, Default)]
pub struct Vertices {
    verts: VertexVec<Vertex>,
    minima: Vec<LocalMinimum>,
}

impl std::ops::Index<VertexIdx> for Vertices {
    type Output = Vertex;

    fn index(&self, index: VertexIdx) -> &Self::Output {
        &self.verts[index]
    }
}

impl Vertices {
    /// Adds a collection of closed paths.
    ///
    /// Paths that have fewer than three distinct points, or that are
    /// completely flat, don't contribute anything. Coordinates that are too
    /// large for exact arithmetic are an error.
    pub fn add_paths(&mut self, paths: &[Path], path_type: PathType) -> Result<(), Error> {
        for path in paths {
            for p in path {
                p.check_range()?;
            }
            self.add_path(path, path_type);
        }
        Ok(())
    }

    fn add_path(&mut self, path: &[Point], path_type: PathType) {
        let points = strip_duplicates(path, true);
        if points.len() < 3 {
            return;
        }

        let first = VertexIdx(self.verts.len());
        let n = points.len();
        for (i, pt) in points.iter().enumerate() {
            self.verts.push(Vertex {
                pt: *pt,
                next: VertexIdx(first.0 + (i + 1) % n),
                prev: VertexIdx(first.0 + (i + n - 1) % n),
                local_max: false,
                local_min: false,
            });
        }

        // Find out whether we arrive at the first vertex going up or down,
        // skipping horizontal runs.
        let first_y = self.verts[first].pt.y;
        let mut prev = self.verts[first].prev;
        while prev != first && self.verts[prev].pt.y == first_y {
            prev = self.verts[prev].prev;
        }
        if prev == first {
            // Completely flat.
            return;
        }

        // "Up" means decreasing y.
        let going_up_at_start = self.verts[prev].pt.y > first_y;
        let mut going_up = going_up_at_start;
        let mut prev = first;
        let mut cur = self.verts[first].next;
        while cur != first {
            let (prev_y, cur_y) = (self.verts[prev].pt.y, self.verts[cur].pt.y);
            if cur_y > prev_y && going_up {
                self.verts[prev].local_max = true;
                going_up = false;
            } else if cur_y < prev_y && !going_up {
                going_up = true;
                self.add_local_min(prev, path_type);
            }
            prev = cur;
            cur = self.verts[cur].next;
        }

        if going_up != going_up_at_start {
            if going_up_at_start {
                self.add_local_min(prev, path_type);
            } else {
                self.verts[prev].local_max = true;
            }
        }
    }

    fn add_local_min(&mut self, vertex: VertexIdx, path_type: PathType) {
        if self.verts[vertex].local_min {
            return;
        }
        self.verts[vertex].local_min = true;
        self.minima.push(LocalMinimum { vertex, path_type });
    }

    /// Sorts the local minima in sweep order.
    ///
    /// The sweep starts at the largest `y`; ties are broken by increasing `x`
    /// and then by the order in which the paths were added.
    pub fn sort_minima(&mut self) {
        let verts = &self.verts;
        self.minima.sort_by_key(|lm| verts[lm.vertex].pt);
    }

    /// The local minima, in whatever order they're currently in.
    pub fn minima(&self) -> &[LocalMinimum] {
        &self.minima
    }

    /// The total number of vertices.
    pub fn len(&self) -> usize {
        self.verts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: i64, y: i64) -> Point {
        Point::new(x, y)
    }

    fn minima_points(verts: &Vertices) -> Vec<Point> {
        verts.minima().iter().map(|lm| verts[lm.vertex].pt).collect()
    }

    fn maxima_points(verts: &Vertices) -> Vec<Point> {
        (0..verts.len())
            .map(VertexIdx)
            .filter(|&v| verts[v].local_max)
            .map(|v| verts[v].pt)
            .collect()
    }

    #[test]
    fn square() {
        let mut verts = Vertices::default();
        verts
            .add_paths(&[vec![p(0, 0), p(0, 5), p(5, 5), p(5, 0)]], PathType::Subject)
            .unwrap();
        assert_eq!(minima_points(&verts), vec![p(5, 5)]);
        assert_eq!(maxima_points(&verts), vec![p(0, 0)]);
    }

    #[test]
    fn zigzag() {
        // Two teeth pointing down (towards larger y).
        let path = vec![p(0, 0), p(1, 4), p(2, 1), p(3, 4), p(4, 0)];
        let mut verts = Vertices::default();
        verts.add_paths(&[path], PathType::Clip).unwrap();
        verts.sort_minima();
        assert_eq!(minima_points(&verts), vec![p(1, 4), p(3, 4)]);
        assert_eq!(maxima_points(&verts), vec![p(0, 0), p(2, 1)]);
        assert!(verts.minima().iter().all(|lm| lm.path_type == PathType::Clip));
    }

    #[test]
    fn degenerate_paths_are_skipped() {
        let mut verts = Vertices::default();
        let paths = vec![
            vec![],
            vec![p(1, 1)],
            vec![p(1, 1), p(2, 2), p(1, 1)],
            vec![p(0, 3), p(5, 3), p(9, 3)],
            vec![p(0, 0), p(0, 0), p(0, 0)],
        ];
        verts.add_paths(&paths, PathType::Subject).unwrap();
        assert!(verts.minima().is_empty());
    }

    #[test]
    fn out_of_range() {
        let mut verts = Vertices::default();
        let huge = vec![p(0, 0), p(i64::MAX, 0), p(0, 1)];
        assert!(matches!(
            verts.add_paths(&[huge], PathType::Subject),
            Err(Error::PrecisionExceeded { .. })
        ));
    }

    #[test]
    fn minima_order_is_stable() {
        let tri = |x: i64| vec![p(x, 10), p(x + 5, 0), p(x + 10, 10)];
        let mut verts = Vertices::default();
        verts
            .add_paths(&[tri(20), tri(0), tri(0)], PathType::Subject)
            .unwrap();
        verts.sort_minima();
        // Each triangle's minimum is its first vertex. The two triangles at
        // x = 0 tie, and keep their input order.
        let order: Vec<usize> = verts.minima().iter().map(|lm| lm.vertex.0).collect();
        assert_eq!(order, vec![3, 6, 0]);
    }
}

//! Horizontal edges.
//!
//! Horizontal edges lie along a scanline, so they can't be handled with the
//! usual "position at the top of the beam" logic. Instead, once the rest of
//! the scanline is settled, each pending horizontal is swept from one end to
//! the other, crossing every edge it passes over:
//!
//! ```text
//!        \   |   /
//!   ------x--x--x------>    (crossings happen at the horizontal's y)
//!          \ |  /
//! ```
//!
//! Consecutive horizontals in the same bound are followed one after the
//! other, and a horizontal that ends at a local maximum finishes off the
//! output it was building together with its maxima pair.

use crate::geom::Point;
use crate::vertices::VertexIdx;
use crate::Error;

use super::active::ActiveIdx;
use super::Sweeper;

impl Sweeper {
    /// The local maximum at the end of this edge's run of horizontals, if
    /// there is one.
    fn curr_y_maxima_vertex(&self, e: ActiveIdx) -> Option<VertexIdx> {
        let verts = &self.verts;
        let e = &self.actives[e];
        let mut result = e.vertex_top;
        if e.wind_dx > 0 {
            while verts[verts[result].next].pt.y == verts[result].pt.y {
                result = verts[result].next;
            }
        } else {
            while verts[verts[result].prev].pt.y == verts[result].pt.y {
                result = verts[result].prev;
            }
        }
        verts[result].local_max.then_some(result)
    }

    /// Figures out which way a horizontal goes, and how far. Returns
    /// `(left_to_right, left, right)`.
    fn horz_direction(&self, horz: ActiveIdx, max_vertex: Option<VertexIdx>) -> (bool, i64, i64) {
        let h = &self.actives[horz];
        if h.bot.x == h.top.x {
            // Going nowhere: head towards the maxima pair, if it's to the right.
            let mut e = h.next_in_ael;
            while let Some(cur) = e {
                if Some(self.actives[cur].vertex_top) == max_vertex {
                    break;
                }
                e = self.actives[cur].next_in_ael;
            }
            (e.is_some(), h.curr_x, h.curr_x)
        } else if h.curr_x < h.top.x {
            (true, h.curr_x, h.top.x)
        } else {
            (false, h.top.x, h.curr_x)
        }
    }

    /// Skips over collinear horizontal vertices, so that the edge covers the
    /// whole run. With `preserve_collinear`, only 180 degree spikes are
    /// skipped.
    pub(super) fn trim_horz(&mut self, e: ActiveIdx) {
        let mut trimmed = false;
        let mut pt = self.verts[self.actives[e].next_vertex(&self.verts)].pt;
        loop {
            let h = &self.actives[e];
            if pt.y != h.top.y {
                break;
            }
            if self.preserve_collinear && ((pt.x < h.top.x) != (h.bot.x < h.top.x)) {
                break;
            }
            let next = h.next_vertex(&self.verts);
            let h = &mut self.actives[e];
            h.vertex_top = next;
            h.top = pt;
            trimmed = true;
            if self.actives[e].is_maxima(&self.verts) {
                break;
            }
            pt = self.verts[self.actives[e].next_vertex(&self.verts)].pt;
        }
        if trimmed {
            self.actives[e].set_dx();
        }
    }

    pub(super) fn do_horizontal(&mut self, horz: ActiveIdx) -> Result<(), Error> {
        let y = self.actives[horz].bot.y;
        let vertex_max = self.curr_y_maxima_vertex(horz);
        if vertex_max.is_some() && vertex_max != Some(self.actives[horz].vertex_top) {
            self.trim_horz(horz);
        }
        let (mut left_to_right, mut horz_left, mut horz_right) =
            self.horz_direction(horz, vertex_max);

        if self.is_hot(horz) {
            let x = self.actives[horz].curr_x;
            self.add_out_pt(horz, Point::new(x, y));
        }

        loop {
            let mut e = if left_to_right {
                self.actives[horz].next_in_ael
            } else {
                self.actives[horz].prev_in_ael
            };

            while let Some(cur) = e {
                if Some(self.actives[cur].vertex_top) == vertex_max {
                    // We've reached the maxima pair.
                    if self.is_hot(horz) {
                        let top = self.actives[cur].top;
                        self.split(cur, top);
                        while Some(self.actives[horz].vertex_top) != vertex_max {
                            let top = self.actives[horz].top;
                            self.add_out_pt(horz, top);
                            self.update_edge_into_ael(horz)?;
                        }
                        let top = self.actives[horz].top;
                        if left_to_right {
                            self.add_local_max_poly(horz, cur, top)?;
                        } else {
                            self.add_local_max_poly(cur, horz, top)?;
                        }
                    }
                    self.delete_from_ael(cur);
                    self.delete_from_ael(horz);
                    return Ok(());
                }

                // Unless the horizontal ends at a maximum (in which case we
                // keep going until its pair), stop once we're past its end.
                if vertex_max != Some(self.actives[horz].vertex_top) {
                    let ex = self.actives[cur].curr_x;
                    if (left_to_right && ex > horz_right) || (!left_to_right && ex < horz_left) {
                        break;
                    }

                    if ex == self.actives[horz].top.x && !self.actives[cur].is_horizontal() {
                        // Stop if `cur` leaves this point on the far side of
                        // where the horizontal's bound goes next.
                        let next_pt =
                            self.verts[self.actives[horz].next_vertex(&self.verts)].pt;
                        let cur_x = self.actives[cur].top_x(next_pt.y);
                        if (left_to_right && cur_x >= next_pt.x)
                            || (!left_to_right && cur_x <= next_pt.x)
                        {
                            break;
                        }
                    }
                }

                let pt = Point::new(self.actives[cur].curr_x, y);
                if left_to_right {
                    self.intersect_edges(horz, cur, pt)?;
                    self.swap_positions(horz, cur);
                    self.check_join_left(cur, pt, false)?;
                    self.actives[horz].curr_x = pt.x;
                    e = self.actives[horz].next_in_ael;
                } else {
                    self.intersect_edges(cur, horz, pt)?;
                    self.swap_positions(cur, horz);
                    self.check_join_right(cur, pt, false)?;
                    self.actives[horz].curr_x = pt.x;
                    e = self.actives[horz].prev_in_ael;
                }
            }

            // Are there more horizontals in this bound?
            let next_pt = self.verts[self.actives[horz].next_vertex(&self.verts)].pt;
            if next_pt.y != self.actives[horz].top.y {
                break;
            }
            if self.is_hot(horz) {
                let top = self.actives[horz].top;
                self.add_out_pt(horz, top);
            }
            self.update_edge_into_ael(horz)?;
            (left_to_right, horz_left, horz_right) = self.horz_direction(horz, vertex_max);
        }

        if self.is_hot(horz) {
            let top = self.actives[horz].top;
            self.add_out_pt(horz, top);
        }
        // The end of an intermediate horizontal.
        self.update_edge_into_ael(horz)
    }
}

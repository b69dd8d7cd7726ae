use crate::{
    element::{EH, FH, HH, Handle, LH, VH},
    iterator,
    mesh::Mesh,
};

pub(crate) const DEGEN_EPS: f32 = 1e-12;

/// Whether the triangles `(a1, a2, a3)` and `(b1, b2, b3)` face the same way.
/// Degenerate triangles face no way at all, so they compare unequal to
/// everything.
fn same_winding(
    a1: glam::Vec3,
    a2: glam::Vec3,
    a3: glam::Vec3,
    b1: glam::Vec3,
    b2: glam::Vec3,
    b3: glam::Vec3,
) -> bool {
    let da = (a2 - a1).cross(a2 - a3);
    if da.length_squared() <= DEGEN_EPS {
        return false;
    }
    let db = (b2 - b1).cross(b2 - b3);
    if db.length_squared() <= DEGEN_EPS {
        return false;
    }
    da.dot(db) > 0.0
}

impl Mesh {
    /**
     * Delete `to_die` and let `replacement` take its place in every edge and
     * face that used it. The merge can leave the topology degenerate, and the
     * degeneracies are cleaned up before returning: an edge whose endpoints
     * both became `replacement` is removed along with its uses in faces, two
     * edges that now connect the same two vertices are merged into one, and
     * faces left with fewer than 3 sides are dissolved.
     *
     * A face that used both `to_die` and `replacement` without the edge
     * between them keeps referring to `replacement` twice. The merge only
     * stops such vertices being adjacent, which allows for some very strange
     * non-manifold geometry. Meshes of only triangles come out clean.
     */
    pub fn fire(&mut self, to_die: VH, replacement: VH) {
        assert!(to_die != replacement, "cannot fire {} into itself", to_die);
        // The replacement having nothing attached to it is surprisingly
        // common, and needs none of the cleanup below. The ring moves over
        // whole, with the incoming halfedges re-pointed.
        if self.vertex(replacement).halfedge.is_none() {
            let start = self.vertex(to_die).halfedge;
            if let Some(start) = start {
                let mut h = start;
                loop {
                    self.halfedge_mut(h.opposite()).head = replacement;
                    h = self.ring_next(h);
                    if h == start {
                        break;
                    }
                }
            }
            self.vertex_mut(replacement).halfedge = start;
            self.verts.remove(to_die.index());
            return;
        }
        // Transfer every edge over, whether it should survive or not, and fix
        // the damage in a second pass.
        while let Some(h) = self.vertex(to_die).halfedge {
            self.unsplice(h, to_die);
            self.halfedge_mut(h.opposite()).head = replacement;
            self.splice(h, replacement);
        }
        self.verts.remove(to_die.index());
        // Walk a snapshot of the merged ring. The cleanup only ever deletes,
        // so a dead slot means an earlier step consumed that entry.
        let mut ring = std::mem::take(&mut self.cache.ring);
        ring.clear();
        ring.extend(iterator::voh_iter(self, replacement));
        for i in 0..ring.len() {
            let h = ring[i];
            if !self.is_live_edge(h.edge()) {
                continue;
            }
            if self.head_vertex(h) == replacement {
                self.remove_loop_edge(h, replacement);
            } else {
                // Look for another edge to the same vertex further along the
                // ring. Quadratic, but unavoidable really.
                let w = self.head_vertex(h);
                for &h2 in &ring[i + 1..] {
                    if self.is_live_edge(h2.edge()) && self.head_vertex(h2) == w {
                        self.merge_duplicate_edge(h, h2, replacement, w);
                        break;
                    }
                }
            }
        }
        ring.clear();
        self.cache.ring = ring;
    }

    /// Delete an edge whose two endpoints became the same vertex, detaching
    /// it from every face using it. A face that drops to 2 sides is dissolved
    /// on the spot; its two remaining edges must connect the same vertices,
    /// and the duplicate pass deals with them.
    fn remove_loop_edge(&mut self, h: HH, v: VH) {
        let (h0, h1) = h.edge().halfedges();
        loop {
            let l = match self.halfedge_loops(h0).first().copied() {
                Some(l) => l,
                None => match self.halfedge_loops(h1).first().copied() {
                    Some(l) => l,
                    None => break,
                },
            };
            let f = self.detach_loop(l);
            if self.face(f).size == 2 {
                self.delete_face(f);
            }
        }
        self.unsplice(h0, v);
        self.unsplice(h1, v);
        self.edges.remove(h.edge().index());
    }

    /// Detach one boundary loop from its face, leaving the face one side
    /// smaller. Returns the face so the caller can dissolve it if it became
    /// degenerate.
    fn detach_loop(&mut self, l: LH) -> FH {
        let (f, h) = {
            let lp = self.loop_at(l);
            (lp.face, lp.halfedge)
        };
        let next = self.loop_next(l);
        let mut p = next;
        while self.loop_next(p) != l {
            p = self.loop_next(p);
        }
        self.loop_mut(p).next = next;
        let face = self.face_mut(f);
        if face.start == l {
            face.start = next;
        }
        face.size -= 1;
        self.halfedge_mut(h).loops.retain(|x| *x != l);
        self.loops.remove(l.index());
        f
    }

    /// Merge the edge of `from` into the edge of `to`, both running from
    /// `v` to `w`. Faces that used both edges now run along the survivor
    /// twice in a row; each such switchback pair of loops is removed, and the
    /// face with it once it falls below 3 sides.
    fn merge_duplicate_edge(&mut self, from: HH, to: HH, v: VH, w: VH) {
        for (fh, th) in [(from, to), (from.opposite(), to.opposite())] {
            let moved = std::mem::take(&mut self.halfedge_mut(fh).loops);
            for l in &moved {
                self.loop_mut(*l).halfedge = th;
            }
            self.halfedge_mut(th).loops.extend(moved);
        }
        self.unsplice(from, v);
        self.unsplice(from.opposite(), w);
        self.edges.remove(from.edge().index());
        for d in [to, to.opposite()] {
            let radial = self.halfedge_loops(d).to_vec();
            for l in radial {
                if !self.is_live_loop(l) {
                    continue;
                }
                let ln = self.loop_next(l);
                if self.loop_halfedge(ln) != d.opposite() {
                    continue;
                }
                // The face doubles back over the merged edge at `l`.
                let f = self.loop_face(l);
                let after = self.loop_next(ln);
                let mut p = after;
                while self.loop_next(p) != l {
                    p = self.loop_next(p);
                }
                self.loop_mut(p).next = after;
                {
                    let face = self.face_mut(f);
                    face.start = p;
                    face.size -= 2;
                }
                self.halfedge_mut(d).loops.retain(|x| *x != l);
                self.halfedge_mut(d.opposite()).loops.retain(|x| *x != ln);
                self.loops.remove(l.index());
                self.loops.remove(ln.index());
                if self.face(f).size < 3 {
                    self.delete_face(f);
                }
            }
        }
    }

    /// Delete every edge that no face uses, then every vertex that no edge
    /// uses.
    pub fn prune(&mut self) {
        let mut edges = std::mem::take(&mut self.cache.edges);
        edges.clear();
        edges.extend(self.edges());
        for e in &edges {
            let (h0, h1) = e.halfedges();
            if self.halfedge_loops(h0).is_empty() && self.halfedge_loops(h1).is_empty() {
                self.delete_edge(*e);
            }
        }
        edges.clear();
        self.cache.edges = edges;
        let mut verts = std::mem::take(&mut self.cache.verts);
        verts.clear();
        verts.extend(self.vertices());
        for v in &verts {
            if self.vertex(*v).halfedge.is_none() {
                self.verts.remove(v.index());
            }
        }
        verts.clear();
        self.cache.verts = verts;
    }

    /// Turn the face around so it points the other way. Every boundary loop
    /// moves to the opposite direction of its edge and the chain order is
    /// reversed.
    pub fn reverse_face(&mut self, f: FH) {
        let mut loops = std::mem::take(&mut self.cache.loops);
        loops.clear();
        loops.extend(iterator::fl_iter(self, f));
        for (i, l) in loops.iter().enumerate() {
            let prev = loops[(i + loops.len() - 1) % loops.len()];
            self.loop_mut(*l).next = prev;
            let h = self.loop_halfedge(*l);
            self.halfedge_mut(h).loops.retain(|x| *x != *l);
            self.loop_mut(*l).halfedge = h.opposite();
            self.halfedge_mut(h.opposite()).loops.push(*l);
        }
        loops.clear();
        self.cache.loops = loops;
    }

    /**
     * Whether collapsing the edge to the position `new_pos` leaves every face
     * around both endpoints facing the way it faced before. Returns false
     * when any face would invert, and also when anything around the endpoints
     * is non-manifold, in which case things are already screwed and the
     * answer is not going to make them better. Does not mutate.
     *
     * Faces of more than 4 sides that use the collapsing edge only get their
     * near corners checked; the far corners would need a convexity sweep that
     * is not implemented.
     */
    pub fn safe_contraction(&self, e: EH, new_pos: glam::Vec3) -> bool {
        let (va, vb) = self.edge_vertices(e);
        for vert in [va, vb] {
            for h in iterator::voh_iter(self, vert) {
                // One face per edge direction, or the neighbourhood is
                // non-manifold.
                if self.halfedge_loops(h).len() > 1
                    || self.halfedge_loops(h.opposite()).len() > 1
                {
                    return false;
                }
                // The face is examined through its loop coming into `vert`.
                let l = match self.halfedge_loops(h.opposite()).first().copied() {
                    Some(l) => l,
                    None => continue,
                };
                let lh = self.loop_halfedge(l);
                if lh.edge() == e {
                    // The face enters `vert` along the collapsing edge; it
                    // leaves the other endpoint along it, and gets analysed
                    // from there.
                    continue;
                }
                let ln = self.loop_next(l);
                let lnh = self.loop_halfedge(ln);
                let p = self.point(self.tail_vertex(lh));
                let vpos = self.point(self.head_vertex(lh));
                let wpos = self.point(self.head_vertex(lnh));
                let size = self.face_size(self.loop_face(l));
                if lnh.edge() == e {
                    // The face leaves `vert` along the collapsing edge.
                    if size > 3 {
                        let lnn = self.loop_next(ln);
                        let x = self.point(self.head_vertex(self.loop_halfedge(lnn)));
                        if !same_winding(p, vpos, wpos, p, new_pos, x) {
                            return false;
                        }
                        if !same_winding(vpos, wpos, x, p, new_pos, x) {
                            return false;
                        }
                        // size > 4 would need the convexity sweep here.
                    }
                } else {
                    if !same_winding(p, vpos, wpos, p, new_pos, wpos) {
                        return false;
                    }
                    if size > 3 {
                        // The triangles on both sides of the moving corner.
                        let mut lp = ln;
                        while self.loop_next(lp) != l {
                            lp = self.loop_next(lp);
                        }
                        let pp = self.point(self.tail_vertex(self.loop_halfedge(lp)));
                        let lnn = self.loop_next(ln);
                        let x = self.point(self.head_vertex(self.loop_halfedge(lnn)));
                        if !same_winding(pp, p, vpos, pp, p, new_pos) {
                            return false;
                        }
                        if !same_winding(vpos, wpos, x, new_pos, wpos, x) {
                            return false;
                        }
                    }
                }
            }
        }
        true
    }

    /// Whether moving the vertex to `new_pos` keeps every face using it
    /// facing the way it faces now. Checks every corner of every face around
    /// the vertex, so concave results on faces of more than 3 sides are
    /// caught too.
    pub fn safe_move(&self, v: VH, new_pos: glam::Vec3) -> bool {
        let old = self.point(v);
        for h in iterator::voh_iter(self, v) {
            for &l in self.halfedge_loops(h) {
                let mut t = l;
                for _ in 0..self.face_size(self.loop_face(l)) {
                    let b = self.point(self.head_vertex(self.loop_halfedge(t)));
                    let tn = self.loop_next(t);
                    let c = self.point(self.head_vertex(self.loop_halfedge(tn)));
                    let orig = (b - old).cross(b - c);
                    let rep = (b - new_pos).cross(b - c);
                    if orig.dot(rep) < 0.0 {
                        return false;
                    }
                    t = tn;
                }
            }
        }
        true
    }
}

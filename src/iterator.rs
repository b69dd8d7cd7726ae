use crate::{
    element::{EH, FH, HH, LH, VH},
    mesh::Mesh,
};

struct OutgoingHalfedgeIter<'a> {
    mesh: &'a Mesh,
    hstart: Option<HH>,
    hcurrent: Option<HH>,
}

impl Iterator for OutgoingHalfedgeIter<'_> {
    type Item = HH;

    fn next(&mut self) -> Option<Self::Item> {
        match self.hcurrent {
            Some(current) => {
                let next = self.mesh.ring_next(current);
                self.hcurrent = match self.hstart {
                    Some(start) if start != next => Some(next),
                    _ => None,
                };
                Some(current)
            }
            None => None,
        }
    }
}

struct FaceLoopIter<'a> {
    mesh: &'a Mesh,
    lstart: LH,
    lcurrent: Option<LH>,
}

impl Iterator for FaceLoopIter<'_> {
    type Item = LH;

    fn next(&mut self) -> Option<Self::Item> {
        match self.lcurrent {
            Some(current) => {
                let next = self.mesh.loop_next(current);
                self.lcurrent = if next == self.lstart {
                    None
                } else {
                    Some(next)
                };
                Some(current)
            }
            None => None,
        }
    }
}

/// Iterate the outgoing halfedges of a vertex in ring order, which is the
/// order the edges were created in.
pub(crate) fn voh_iter(mesh: &Mesh, v: VH) -> impl Iterator<Item = HH> + use<'_> {
    let h = mesh.vertex_halfedge(v);
    OutgoingHalfedgeIter {
        mesh,
        hstart: h,
        hcurrent: h,
    }
}

pub(crate) fn vv_iter(mesh: &Mesh, v: VH) -> impl Iterator<Item = VH> + use<'_> {
    voh_iter(mesh, v).map(|h| mesh.head_vertex(h))
}

pub(crate) fn ve_iter(mesh: &Mesh, v: VH) -> impl Iterator<Item = EH> + use<'_> {
    voh_iter(mesh, v).map(|h| h.edge())
}

/// The faces whose boundaries leave `v` along each outgoing halfedge. A face
/// appears once per corner it has at this vertex.
pub(crate) fn vf_iter(mesh: &Mesh, v: VH) -> impl Iterator<Item = FH> + use<'_> {
    voh_iter(mesh, v)
        .flat_map(move |h| mesh.halfedge_loops(h).iter().map(move |l| mesh.loop_face(*l)))
}

pub(crate) fn ee_iter(mesh: &Mesh, e: EH) -> impl Iterator<Item = EH> + use<'_> {
    let (a, b) = mesh.edge_vertices(e);
    ve_iter(mesh, a)
        .chain(ve_iter(mesh, b))
        .filter(move |other| *other != e)
}

pub(crate) fn ef_iter(mesh: &Mesh, e: EH) -> impl Iterator<Item = FH> + use<'_> {
    let (h0, h1) = e.halfedges();
    mesh.halfedge_loops(h0)
        .iter()
        .chain(mesh.halfedge_loops(h1).iter())
        .map(move |l| mesh.loop_face(*l))
}

pub(crate) fn fl_iter(mesh: &Mesh, f: FH) -> impl Iterator<Item = LH> + use<'_> {
    let l = mesh.face_start(f);
    FaceLoopIter {
        mesh,
        lstart: l,
        lcurrent: Some(l),
    }
}

pub(crate) fn fh_iter(mesh: &Mesh, f: FH) -> impl Iterator<Item = HH> + use<'_> {
    fl_iter(mesh, f).map(|l| mesh.loop_halfedge(l))
}

/// The vertices of a face in boundary order. Each loop contributes the tail
/// of its halfedge, so the sequence matches the order the face was created
/// with.
pub(crate) fn fv_iter(mesh: &Mesh, f: FH) -> impl Iterator<Item = VH> + use<'_> {
    fh_iter(mesh, f).map(|h| mesh.tail_vertex(h))
}

pub(crate) fn fe_iter(mesh: &Mesh, f: FH) -> impl Iterator<Item = EH> + use<'_> {
    fh_iter(mesh, f).map(|h| h.edge())
}

impl Mesh {
    pub fn voh_iter(&self, v: VH) -> impl Iterator<Item = HH> + use<'_> {
        voh_iter(self, v)
    }

    pub fn vv_iter(&self, v: VH) -> impl Iterator<Item = VH> + use<'_> {
        vv_iter(self, v)
    }

    pub fn ve_iter(&self, v: VH) -> impl Iterator<Item = EH> + use<'_> {
        ve_iter(self, v)
    }

    pub fn vf_iter(&self, v: VH) -> impl Iterator<Item = FH> + use<'_> {
        vf_iter(self, v)
    }

    /// The number of edges incident on this vertex.
    pub fn degree(&self, v: VH) -> usize {
        voh_iter(self, v).count()
    }

    /// The edges sharing an endpoint with `e`, walking both endpoint rings.
    pub fn ee_iter(&self, e: EH) -> impl Iterator<Item = EH> + use<'_> {
        ee_iter(self, e)
    }

    /// The faces using `e`, from both directions. A face using the edge more
    /// than once appears once per use.
    pub fn ef_iter(&self, e: EH) -> impl Iterator<Item = FH> + use<'_> {
        ef_iter(self, e)
    }

    pub fn edge_face_count(&self, e: EH) -> usize {
        let (h0, h1) = e.halfedges();
        self.halfedge_loops(h0).len() + self.halfedge_loops(h1).len()
    }

    /// An edge is on the boundary when faces run along exactly one of its
    /// two directions. An edge with no faces at all is a wire edge, not a
    /// boundary edge.
    pub fn is_boundary_edge(&self, e: EH) -> bool {
        let (h0, h1) = e.halfedges();
        self.halfedge_loops(h0).is_empty() != self.halfedge_loops(h1).is_empty()
    }

    /// Any face using this edge, if there is one.
    pub fn any_face(&self, e: EH) -> Option<FH> {
        ef_iter(self, e).next()
    }

    /// The endpoint of `e` other than `v`. Panics when `v` is not an
    /// endpoint of `e`.
    pub fn opposite_vertex(&self, e: EH, v: VH) -> VH {
        let (a, b) = self.edge_vertices(e);
        if v == a {
            b
        } else if v == b {
            a
        } else {
            panic!("{} is not an endpoint of {}", v, e);
        }
    }

    /// The vertex two edges have in common, if any.
    pub fn shared_vertex(&self, e: EH, other: EH) -> Option<VH> {
        let (a, b) = self.edge_vertices(e);
        let (c, d) = self.edge_vertices(other);
        if a == c || a == d {
            Some(a)
        } else if b == c || b == d {
            Some(b)
        } else {
            None
        }
    }

    pub fn fl_iter(&self, f: FH) -> impl Iterator<Item = LH> + use<'_> {
        fl_iter(self, f)
    }

    pub fn fh_iter(&self, f: FH) -> impl Iterator<Item = HH> + use<'_> {
        fh_iter(self, f)
    }

    pub fn fv_iter(&self, f: FH) -> impl Iterator<Item = VH> + use<'_> {
        fv_iter(self, f)
    }

    pub fn fe_iter(&self, f: FH) -> impl Iterator<Item = EH> + use<'_> {
        fe_iter(self, f)
    }

    /// The faces sharing at least one edge with `f`, each reported once, in
    /// handle order.
    pub fn adjacent_faces(&self, f: FH) -> Vec<FH> {
        let mut out = std::collections::BTreeSet::new();
        for h in fh_iter(self, f) {
            for l in self
                .halfedge_loops(h)
                .iter()
                .chain(self.halfedge_loops(h.opposite()).iter())
            {
                let other = self.loop_face(*l);
                if other != f {
                    out.insert(other);
                }
            }
        }
        out.into_iter().collect()
    }

    /// The edges along which `f` and `other` touch, in boundary order of
    /// `f`.
    pub fn shared_edges(&self, f: FH, other: FH) -> Vec<EH> {
        let mut out = Vec::new();
        for l in fl_iter(self, f) {
            let h = self.loop_halfedge(l);
            let found = self
                .halfedge_loops(h)
                .iter()
                .any(|x| *x != l && self.loop_face(*x) == other)
                || self
                    .halfedge_loops(h.opposite())
                    .iter()
                    .any(|x| self.loop_face(*x) == other);
            if found {
                out.push(h.edge());
            }
        }
        out
    }

    /// The plane of a face as a unit normal and a signed distance, such that
    /// `n.dot(p) + d == 0` for points `p` on the plane. Assumes the face is
    /// planar and uses the first corner that spans a non degenerate triangle,
    /// so slivers at the start of the boundary are walked past. `None` when
    /// every corner is degenerate.
    pub fn face_plane(&self, f: FH) -> Option<(glam::Vec3, f32)> {
        let mut l = self.face_start(f);
        for _ in 0..self.face_size(f) {
            let ln = self.loop_next(l);
            let p1 = self.point(self.tail_vertex(self.loop_halfedge(l)));
            let p2 = self.point(self.tail_vertex(self.loop_halfedge(ln)));
            let p3 = self.point(self.tail_vertex(self.loop_halfedge(self.loop_next(ln))));
            let n = (p2 - p1).cross(p2 - p3);
            if n.length_squared() > crate::edit::DEGEN_EPS {
                let n = n.normalize();
                return Some((n, -n.dot(p1)));
            }
            l = ln;
        }
        None
    }
}

#[cfg(test)]
mod test {
    use crate::{
        element::{Handle, VH},
        macros::assert_f32_eq,
        mesh::{
            Mesh,
            test::{cube, split_quad},
        },
    };

    #[test]
    fn t_cube_vv_iter() {
        let mesh = cube();
        for (vi, vis) in [
            (0u32, [3u32, 1, 4]),
            (1, [2, 0, 5]),
            (2, [3, 1, 6]),
            (3, [0, 2, 7]),
            (4, [5, 0, 7]),
            (5, [1, 4, 6]),
            (6, [2, 5, 7]),
            (7, [3, 6, 4]),
        ] {
            assert_eq!(
                mesh.vv_iter(vi.into())
                    .map(|v| v.index())
                    .collect::<Vec<_>>(),
                vis
            );
        }
    }

    #[test]
    fn t_cube_vf_iter() {
        let mesh = cube();
        for (vi, fis) in [
            (0u32, [0u32, 1, 4]),
            (1, [2, 0, 1]),
            (2, [3, 0, 2]),
            (3, [4, 0, 3]),
            (4, [5, 1, 4]),
            (5, [2, 1, 5]),
            (6, [3, 2, 5]),
            (7, [4, 3, 5]),
        ] {
            assert_eq!(
                mesh.vf_iter(vi.into())
                    .map(|f| f.index())
                    .collect::<Vec<_>>(),
                fis
            );
        }
    }

    #[test]
    fn t_cube_fv_iter() {
        let mesh = cube();
        for (fi, vis) in [
            (0u32, [0u32, 3, 2, 1]),
            (1, [0, 1, 5, 4]),
            (2, [1, 2, 6, 5]),
            (3, [2, 3, 7, 6]),
            (4, [3, 0, 4, 7]),
            (5, [4, 5, 6, 7]),
        ] {
            assert_eq!(
                mesh.fv_iter(fi.into())
                    .map(|v| v.index())
                    .collect::<Vec<_>>(),
                vis
            );
        }
    }

    #[test]
    fn t_cube_degree() {
        let mesh = cube();
        for v in mesh.vertices() {
            assert_eq!(mesh.degree(v), 3);
            assert_eq!(mesh.ve_iter(v).count(), 3);
        }
    }

    #[test]
    fn t_cube_adjacent_faces() {
        let mesh = cube();
        assert_eq!(
            mesh.adjacent_faces(0u32.into())
                .iter()
                .map(|f| f.index())
                .collect::<Vec<_>>(),
            &[1, 2, 3, 4]
        );
        assert_eq!(
            mesh.adjacent_faces(5u32.into())
                .iter()
                .map(|f| f.index())
                .collect::<Vec<_>>(),
            &[1, 2, 3, 4]
        );
    }

    #[test]
    fn t_cube_shared_edges() {
        let mesh = cube();
        let shared = mesh.shared_edges(0u32.into(), 1u32.into());
        assert_eq!(shared.len(), 1);
        let e = mesh.find_edge(0u32.into(), 1u32.into()).unwrap();
        assert_eq!(shared[0], e);
        assert!(mesh.shared_edges(0u32.into(), 5u32.into()).is_empty());
    }

    #[test]
    fn t_cube_closed() {
        let mesh = cube();
        for e in mesh.edges() {
            assert_eq!(mesh.edge_face_count(e), 2);
            assert!(!mesh.is_boundary_edge(e));
        }
    }

    #[test]
    fn t_boundary_after_face_deletion() {
        let mut mesh = cube();
        mesh.delete_face(5u32.into());
        let boundary: Vec<_> = mesh
            .edges()
            .filter(|e| mesh.is_boundary_edge(*e))
            .collect();
        assert_eq!(boundary.len(), 4);
        for e in boundary {
            let (a, b) = mesh.edge_vertices(e);
            assert!(a.index() >= 4 && b.index() >= 4);
        }
    }

    #[test]
    fn t_wire_edge_is_not_boundary() {
        let mut mesh = Mesh::new();
        let a = mesh.new_vertex(glam::Vec3::ZERO);
        let b = mesh.new_vertex(glam::Vec3::X);
        let e = mesh.new_edge(a, b);
        assert!(!mesh.is_boundary_edge(e));
        assert_eq!(mesh.edge_face_count(e), 0);
        assert_eq!(mesh.any_face(e), None);
    }

    #[test]
    fn t_split_quad_iters() {
        let mesh = split_quad();
        assert_eq!(
            mesh.vv_iter(0u32.into())
                .map(|v| v.index())
                .collect::<Vec<_>>(),
            &[1, 2, 3]
        );
        assert_eq!(
            mesh.vf_iter(0u32.into())
                .map(|f| f.index())
                .collect::<Vec<_>>(),
            &[0, 1]
        );
        let diagonal = mesh.find_edge(0u32.into(), 2u32.into()).unwrap();
        assert_eq!(
            mesh.ef_iter(diagonal)
                .map(|f| f.index())
                .collect::<Vec<_>>(),
            &[0, 1]
        );
        assert_eq!(mesh.any_face(diagonal), Some(0u32.into()));
        assert_eq!(mesh.opposite_vertex(diagonal, 0u32.into()), 2u32.into());
    }

    #[test]
    fn t_ee_iter() {
        let mesh = split_quad();
        let e = mesh.find_edge(0u32.into(), 1u32.into()).unwrap();
        assert_eq!(
            mesh.ee_iter(e).map(|e| e.index()).collect::<Vec<_>>(),
            &[2, 4, 1]
        );
    }

    #[test]
    fn t_shared_vertex() {
        let mesh = split_quad();
        let ab = mesh.find_edge(0u32.into(), 1u32.into()).unwrap();
        let bc = mesh.find_edge(1u32.into(), 2u32.into()).unwrap();
        let cd = mesh.find_edge(2u32.into(), 3u32.into()).unwrap();
        assert_eq!(mesh.shared_vertex(ab, bc), Some(1u32.into()));
        assert_eq!(mesh.shared_vertex(ab, cd), None);
    }

    #[test]
    fn t_cube_face_planes() {
        let mesh = cube();
        assert_eq!(
            mesh.face_plane(0u32.into()),
            Some((glam::vec3(0.0, 0.0, 1.0), 0.0))
        );
        assert_eq!(
            mesh.face_plane(5u32.into()),
            Some((glam::vec3(0.0, 0.0, -1.0), 1.0))
        );
        for f in mesh.faces() {
            let (n, d) = mesh.face_plane(f).unwrap();
            assert_eq!(n.length(), 1.0);
            for v in mesh.fv_iter(f) {
                assert_eq!(n.dot(mesh.point(v)) + d, 0.0);
            }
        }
    }

    #[test]
    fn t_slanted_face_plane() {
        let mut mesh = Mesh::new();
        let a = mesh.new_vertex(glam::Vec3::ZERO);
        let b = mesh.new_vertex(glam::vec3(1.0, 0.0, 1.0));
        let c = mesh.new_vertex(glam::vec3(0.0, 1.0, 0.0));
        let f = mesh.new_tri(a, b, c);
        let (n, d) = mesh.face_plane(f).unwrap();
        let r = 1.0 / f32::sqrt(2.0);
        assert_f32_eq!(n.x, r, 1e-6);
        assert_f32_eq!(n.y, 0.0, 1e-6);
        assert_f32_eq!(n.z, -r, 1e-6);
        for v in [a, b, c] {
            assert_f32_eq!(n.dot(mesh.point(v)) + d, 0.0, 1e-6);
        }
    }

    #[test]
    fn t_face_plane_skips_degenerate_corner() {
        // The first three corners are colinear.
        let mut mesh = Mesh::new();
        let v: Vec<VH> = [
            glam::vec3(0.0, 0.0, 0.0),
            glam::vec3(1.0, 0.0, 0.0),
            glam::vec3(2.0, 0.0, 0.0),
            glam::vec3(0.0, 1.0, 0.0),
        ]
        .iter()
        .map(|p| mesh.new_vertex(*p))
        .collect();
        let f = mesh.new_face(&v);
        assert_eq!(
            mesh.face_plane(f),
            Some((glam::vec3(0.0, 0.0, -1.0), 0.0))
        );
    }

    #[test]
    fn t_face_plane_all_degenerate() {
        let mut mesh = Mesh::new();
        let a = mesh.new_vertex(glam::Vec3::ZERO);
        let b = mesh.new_vertex(glam::Vec3::X);
        let c = mesh.new_vertex(glam::vec3(2.0, 0.0, 0.0));
        let f = mesh.new_tri(a, b, c);
        assert_eq!(mesh.face_plane(f), None);
    }

    #[test]
    fn t_vf_iter_nonmanifold_corner() {
        // Two triangles touching only at one vertex.
        let mut mesh = Mesh::new();
        let pivot = mesh.new_vertex(glam::Vec3::ZERO);
        let wing: Vec<VH> = [
            glam::vec3(1.0, 0.0, 0.0),
            glam::vec3(1.0, 1.0, 0.0),
            glam::vec3(-1.0, 0.0, 0.0),
            glam::vec3(-1.0, -1.0, 0.0),
        ]
        .iter()
        .map(|p| mesh.new_vertex(*p))
        .collect();
        let f0 = mesh.new_tri(pivot, wing[0], wing[1]);
        let f1 = mesh.new_tri(pivot, wing[2], wing[3]);
        assert_eq!(
            mesh.vf_iter(pivot).collect::<Vec<_>>(),
            &[f0, f1]
        );
        assert_eq!(mesh.degree(pivot), 4);
    }
}

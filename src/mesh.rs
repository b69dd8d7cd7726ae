use crate::{
    arena::Arena,
    element::{EH, Edge, FH, Face, HH, Halfedge, Handle, LH, Loop, VH, Vertex},
    iterator,
    property::PropTable,
    token::Tokens,
};

/// Scratch buffers reused across topological edits to avoid allocating in a
/// loop. Taken out of the mesh with `std::mem::take` for the duration of an
/// edit and put back after.
#[derive(Default)]
pub(crate) struct EditCache {
    pub(crate) verts: Vec<VH>,
    pub(crate) halfedges: Vec<HH>,
    pub(crate) ring: Vec<HH>,
    pub(crate) edges: Vec<EH>,
    pub(crate) loops: Vec<LH>,
    pub(crate) faces: Vec<FH>,
}

impl EditCache {
    pub(crate) fn clear(&mut self) {
        self.verts.clear();
        self.halfedges.clear();
        self.ring.clear();
        self.edges.clear();
        self.loops.clear();
        self.faces.clear();
    }
}

/**
 * A polygonal mesh that does not require the surface to be manifold. Any
 * number of faces can share an edge, faces can share vertices without sharing
 * edges, and edges and vertices can exist with no faces at all.
 *
 * Connectivity is tracked with halfedges: each edge stores its two directions,
 * the outgoing halfedges of a vertex form a closed ring, and each halfedge
 * keeps the list of face boundary loops running along it. Elements live in
 * slot arenas, so handles stay valid across unrelated deletions.
 */
pub struct Mesh {
    pub(crate) verts: Arena<Vertex>,
    pub(crate) edges: Arena<Edge>,
    pub(crate) loops: Arena<Loop>,
    pub(crate) faces: Arena<Face>,
    pub(crate) vprops: PropTable<VH>,
    pub(crate) eprops: PropTable<EH>,
    pub(crate) fprops: PropTable<FH>,
    pub(crate) tokens: Option<Tokens>,
    pub(crate) cache: EditCache,
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

impl Mesh {
    pub fn new() -> Self {
        Mesh {
            verts: Arena::new(),
            edges: Arena::new(),
            loops: Arena::new(),
            faces: Arena::new(),
            vprops: PropTable::new(),
            eprops: PropTable::new(),
            fprops: PropTable::new(),
            tokens: None,
            cache: EditCache::default(),
        }
    }

    pub fn with_capacity(nverts: usize, nedges: usize, nfaces: usize) -> Self {
        Mesh {
            verts: Arena::with_capacity(nverts),
            edges: Arena::with_capacity(nedges),
            loops: Arena::with_capacity(nfaces * 4),
            faces: Arena::with_capacity(nfaces),
            vprops: PropTable::new(),
            eprops: PropTable::new(),
            fprops: PropTable::new(),
            tokens: None,
            cache: EditCache::default(),
        }
    }

    /// A mesh that resolves property names through `tokens`. Meshes meant to
    /// exchange properties should share one table.
    pub fn with_tokens(tokens: Tokens) -> Self {
        let mut mesh = Self::new();
        mesh.tokens = Some(tokens);
        mesh
    }

    pub fn token_table(&self) -> Option<&Tokens> {
        self.tokens.as_ref()
    }

    pub fn set_token_table(&mut self, tokens: Tokens) {
        self.tokens = Some(tokens);
    }

    pub(crate) fn require_tokens(&self) -> &Tokens {
        match &self.tokens {
            Some(tokens) => tokens,
            None => panic!("this operation requires a token table"),
        }
    }

    pub fn num_vertices(&self) -> usize {
        self.verts.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn num_halfedges(&self) -> usize {
        self.edges.len() * 2
    }

    pub fn num_loops(&self) -> usize {
        self.loops.len()
    }

    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    pub fn vertices(&self) -> impl Iterator<Item = VH> + use<'_> {
        self.verts.indices().map(|i| i.into())
    }

    pub fn edges(&self) -> impl Iterator<Item = EH> + use<'_> {
        self.edges.indices().map(|i| i.into())
    }

    pub fn faces(&self) -> impl Iterator<Item = FH> + use<'_> {
        self.faces.indices().map(|i| i.into())
    }

    pub fn is_live_vertex(&self, v: VH) -> bool {
        self.verts.contains(v.index())
    }

    pub fn is_live_edge(&self, e: EH) -> bool {
        self.edges.contains(e.index())
    }

    pub fn is_live_loop(&self, l: LH) -> bool {
        self.loops.contains(l.index())
    }

    pub fn is_live_face(&self, f: FH) -> bool {
        self.faces.contains(f.index())
    }

    pub(crate) fn vertex(&self, v: VH) -> &Vertex {
        self.verts.get(v.index())
    }

    pub(crate) fn vertex_mut(&mut self, v: VH) -> &mut Vertex {
        self.verts.get_mut(v.index())
    }

    pub(crate) fn halfedge(&self, h: HH) -> &Halfedge {
        &self.edges.get(h.index() >> 1).halfedges[(h.index() & 1) as usize]
    }

    pub(crate) fn halfedge_mut(&mut self, h: HH) -> &mut Halfedge {
        &mut self.edges.get_mut(h.index() >> 1).halfedges[(h.index() & 1) as usize]
    }

    pub(crate) fn loop_at(&self, l: LH) -> &Loop {
        self.loops.get(l.index())
    }

    pub(crate) fn loop_mut(&mut self, l: LH) -> &mut Loop {
        self.loops.get_mut(l.index())
    }

    pub(crate) fn face(&self, f: FH) -> &Face {
        self.faces.get(f.index())
    }

    pub(crate) fn face_mut(&mut self, f: FH) -> &mut Face {
        self.faces.get_mut(f.index())
    }

    pub fn point(&self, v: VH) -> glam::Vec3 {
        self.vertex(v).point
    }

    pub fn set_point(&mut self, v: VH, point: glam::Vec3) {
        self.vertex_mut(v).point = point;
    }

    /// One outgoing halfedge of the vertex, if the vertex has any edges.
    pub fn vertex_halfedge(&self, v: VH) -> Option<HH> {
        self.vertex(v).halfedge
    }

    pub fn head_vertex(&self, h: HH) -> VH {
        self.halfedge(h).head
    }

    pub fn tail_vertex(&self, h: HH) -> VH {
        self.halfedge(h.opposite()).head
    }

    /// The next outgoing halfedge in the ring around the tail vertex of `h`.
    pub fn ring_next(&self, h: HH) -> HH {
        self.halfedge(h).next
    }

    pub fn ring_prev(&self, h: HH) -> HH {
        self.halfedge(h).prev
    }

    /// The loops running along `h`, one per face using the edge in this
    /// direction.
    pub fn halfedge_loops(&self, h: HH) -> &[LH] {
        &self.halfedge(h).loops
    }

    /// The two vertices of an edge, tail and head of its first direction.
    pub fn edge_vertices(&self, e: EH) -> (VH, VH) {
        let (h0, h1) = e.halfedges();
        (self.halfedge(h1).head, self.halfedge(h0).head)
    }

    pub fn loop_face(&self, l: LH) -> FH {
        self.loop_at(l).face
    }

    pub fn loop_halfedge(&self, l: LH) -> HH {
        self.loop_at(l).halfedge
    }

    pub fn loop_next(&self, l: LH) -> LH {
        self.loop_at(l).next
    }

    pub fn face_start(&self, f: FH) -> LH {
        self.face(f).start
    }

    pub fn face_size(&self, f: FH) -> usize {
        self.face(f).size as usize
    }

    /// Find the halfedge running from `from` to `to`, if the two vertices are
    /// connected.
    pub fn find_halfedge(&self, from: VH, to: VH) -> Option<HH> {
        iterator::voh_iter(self, from).find(|h| self.head_vertex(*h) == to)
    }

    /// Find the edge connecting the two vertices regardless of direction.
    pub fn find_edge(&self, a: VH, b: VH) -> Option<EH> {
        self.find_halfedge(a, b).map(|h| h.edge())
    }

    pub fn new_vertex(&mut self, point: glam::Vec3) -> VH {
        let vi = self.verts.insert(Vertex {
            point,
            halfedge: None,
            seq: 0,
        });
        self.vprops.ensure_row(vi);
        vi.into()
    }

    /// Connect two vertices with an edge. Returns the existing edge if the
    /// vertices are already connected. Panics when `a == b`.
    pub fn new_edge(&mut self, a: VH, b: VH) -> EH {
        assert!(a != b, "cannot connect {} to itself", a);
        if let Some(e) = self.find_edge(a, b) {
            return e;
        }
        let ei = self.edges.insert(Edge {
            halfedges: [
                Halfedge {
                    head: b,
                    next: 0u32.into(),
                    prev: 0u32.into(),
                    loops: Vec::new(),
                },
                Halfedge {
                    head: a,
                    next: 0u32.into(),
                    prev: 0u32.into(),
                    loops: Vec::new(),
                },
            ],
            seq: 0,
        });
        self.eprops.ensure_row(ei);
        let e: EH = ei.into();
        let (h0, h1) = e.halfedges();
        self.splice(h0, a);
        self.splice(h1, b);
        e
    }

    /// Create a face bounded by the given vertices, in order. Edges between
    /// consecutive vertices are created as needed. The same vertices can
    /// bound any number of faces. Panics when fewer than 3 vertices are
    /// given.
    pub fn new_face(&mut self, verts: &[VH]) -> FH {
        assert!(
            verts.len() >= 3,
            "a face needs at least 3 vertices, got {}",
            verts.len()
        );
        let mut cache = std::mem::take(&mut self.cache);
        cache.halfedges.clear();
        cache.loops.clear();
        // Pick the halfedge running from each vertex to its successor.
        for i in 0..verts.len() {
            let from = verts[i];
            let to = verts[(i + 1) % verts.len()];
            let e = self.new_edge(from, to);
            let (h0, h1) = e.halfedges();
            let h = if self.head_vertex(h0) == to { h0 } else { h1 };
            cache.halfedges.push(h);
        }
        let fi = self.faces.insert(Face {
            start: 0u32.into(),
            size: verts.len() as u32,
            seq: 0,
        });
        self.fprops.ensure_row(fi);
        let f: FH = fi.into();
        for h in cache.halfedges.iter() {
            let li = self.loops.insert(Loop {
                face: f,
                halfedge: *h,
                next: 0u32.into(),
            });
            let l: LH = li.into();
            self.halfedge_mut(*h).loops.push(l);
            cache.loops.push(l);
        }
        for (i, l) in cache.loops.iter().enumerate() {
            self.loop_mut(*l).next = cache.loops[(i + 1) % cache.loops.len()];
        }
        self.face_mut(f).start = cache.loops[0];
        self.cache = cache;
        f
    }

    pub fn new_tri(&mut self, v0: VH, v1: VH, v2: VH) -> FH {
        self.new_face(&[v0, v1, v2])
    }

    pub fn new_quad(&mut self, v0: VH, v1: VH, v2: VH, v3: VH) -> FH {
        self.new_face(&[v0, v1, v2, v3])
    }

    /// Delete a face. Its edges and vertices are left in place.
    pub fn delete_face(&mut self, f: FH) {
        let mut cache = std::mem::take(&mut self.cache);
        cache.loops.clear();
        let start = self.face(f).start;
        let mut l = start;
        loop {
            cache.loops.push(l);
            l = self.loop_at(l).next;
            if l == start {
                break;
            }
        }
        for l in cache.loops.drain(..) {
            let h = self.loop_at(l).halfedge;
            self.halfedge_mut(h).loops.retain(|x| *x != l);
            self.loops.remove(l.index());
        }
        self.faces.remove(f.index());
        self.cache = cache;
    }

    /// Delete an edge along with every face using it.
    pub fn delete_edge(&mut self, e: EH) {
        let (h0, h1) = e.halfedges();
        loop {
            let l = match self.halfedge(h0).loops.first() {
                Some(l) => *l,
                None => match self.halfedge(h1).loops.first() {
                    Some(l) => *l,
                    None => break,
                },
            };
            let f = self.loop_at(l).face;
            self.delete_face(f);
        }
        let a = self.halfedge(h1).head;
        let b = self.halfedge(h0).head;
        self.unsplice(h0, a);
        self.unsplice(h1, b);
        self.edges.remove(e.index());
    }

    /// Delete a vertex along with every incident edge and face.
    pub fn delete_vertex(&mut self, v: VH) {
        while let Some(h) = self.vertex(v).halfedge {
            self.delete_edge(h.edge());
        }
        self.verts.remove(v.index());
    }

    /// Insert `h` into the outgoing ring of its tail vertex `v`, just before
    /// the ring anchor. Iterating the ring visits halfedges in insertion
    /// order.
    pub(crate) fn splice(&mut self, h: HH, v: VH) {
        match self.vertex(v).halfedge {
            Some(start) => {
                let prev = self.halfedge(start).prev;
                self.halfedge_mut(prev).next = h;
                self.halfedge_mut(start).prev = h;
                let he = self.halfedge_mut(h);
                he.next = start;
                he.prev = prev;
            }
            None => {
                let he = self.halfedge_mut(h);
                he.next = h;
                he.prev = h;
                self.vertex_mut(v).halfedge = Some(h);
            }
        }
    }

    /// Remove `h` from the outgoing ring of its tail vertex `v`.
    pub(crate) fn unsplice(&mut self, h: HH, v: VH) {
        let (next, prev) = {
            let he = self.halfedge(h);
            (he.next, he.prev)
        };
        if next == h {
            self.vertex_mut(v).halfedge = None;
        } else {
            self.halfedge_mut(prev).next = next;
            self.halfedge_mut(next).prev = prev;
            if self.vertex(v).halfedge == Some(h) {
                self.vertex_mut(v).halfedge = Some(next);
            }
        }
    }

    /// Number the live vertices consecutively and return them in that order.
    /// The numbering is readable through [`vertex_seq`](Self::vertex_seq)
    /// until the next edit that adds or removes vertices.
    pub fn enumerate_vertices(&mut self) -> Vec<VH> {
        let handles: Vec<VH> = self.vertices().collect();
        for (i, v) in handles.iter().enumerate() {
            self.verts.get_mut(v.index()).seq = i as u32;
        }
        handles
    }

    pub fn enumerate_edges(&mut self) -> Vec<EH> {
        let handles: Vec<EH> = self.edges().collect();
        for (i, e) in handles.iter().enumerate() {
            self.edges.get_mut(e.index()).seq = i as u32;
        }
        handles
    }

    pub fn enumerate_faces(&mut self) -> Vec<FH> {
        let handles: Vec<FH> = self.faces().collect();
        for (i, f) in handles.iter().enumerate() {
            self.faces.get_mut(f.index()).seq = i as u32;
        }
        handles
    }

    pub fn vertex_seq(&self, v: VH) -> u32 {
        self.vertex(v).seq
    }

    pub fn edge_seq(&self, e: EH) -> u32 {
        self.edges.get(e.index()).seq
    }

    pub fn face_seq(&self, f: FH) -> u32 {
        self.face(f).seq
    }

    /// Remove every element. Property schemas survive, property data does
    /// not.
    pub fn clear(&mut self) {
        self.verts.clear();
        self.edges.clear();
        self.loops.clear();
        self.faces.clear();
        self.vprops.clear_rows();
        self.eprops.clear_rows();
        self.fprops.clear_rows();
    }
}

#[cfg(test)]
pub(crate) mod test {
    use arrayvec::ArrayVec;

    use super::Mesh;
    use crate::element::{Handle, VH};

    /**
     * Makes a box with the following topology.
     * ```text
     *
     *      7-----------6
     *     /|          /|
     *    / |         / |
     *   4-----------5  |
     *   |  |        |  |
     *   |  3--------|--2
     *   | /         | /
     *   |/          |/
     *   0-----------1
     * ```
     */
    pub(crate) fn cube() -> Mesh {
        let mut mesh = Mesh::with_capacity(8, 12, 6);
        let verts: Vec<_> = [
            (0.0f32, 0.0, 0.0),
            (1.0, 0.0, 0.0),
            (1.0, 1.0, 0.0),
            (0.0, 1.0, 0.0),
            (0.0, 0.0, 1.0),
            (1.0, 0.0, 1.0),
            (1.0, 1.0, 1.0),
            (0.0, 1.0, 1.0),
        ]
        .iter()
        .map(|(x, y, z)| mesh.new_vertex(glam::vec3(*x, *y, *z)).index())
        .collect();
        assert_eq!(verts, (0u32..8).collect::<Vec<_>>());
        let faces: Vec<_> = [
            [0u32, 3, 2, 1],
            [0, 1, 5, 4],
            [1, 2, 6, 5],
            [2, 3, 7, 6],
            [3, 0, 4, 7],
            [4, 5, 6, 7],
        ]
        .iter()
        .map(|indices| mesh.new_face(&indices.map(|i| i.into())))
        .collect();
        assert_eq!(faces, (0u32..6).map(|i| i.into()).collect::<Vec<_>>());
        assert_eq!(mesh.num_vertices(), 8);
        assert_eq!(mesh.num_edges(), 12);
        assert_eq!(mesh.num_faces(), 6);
        assert_eq!(mesh.num_loops(), 24);
        mesh
    }

    /**
     * A unit square split along one diagonal.
     * ```text
     *   3-----------2
     *   |         / |
     *   |       /   |
     *   |     /     |
     *   |   /       |
     *   | /         |
     *   0-----------1
     * ```
     */
    pub(crate) fn split_quad() -> Mesh {
        let mut mesh = Mesh::new();
        let v: Vec<VH> = [
            (0.0f32, 0.0, 0.0),
            (1.0, 0.0, 0.0),
            (1.0, 1.0, 0.0),
            (0.0, 1.0, 0.0),
        ]
        .iter()
        .map(|(x, y, z)| mesh.new_vertex(glam::vec3(*x, *y, *z)))
        .collect();
        mesh.new_tri(v[0], v[1], v[2]);
        mesh.new_tri(v[0], v[2], v[3]);
        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_edges(), 5);
        assert_eq!(mesh.num_faces(), 2);
        mesh
    }

    #[test]
    fn t_triangle() {
        let mut mesh = Mesh::new();
        let verts: Vec<_> = (0..3)
            .map(|i| mesh.new_vertex(glam::vec3(i as f32, 0.0, 0.0)))
            .collect();
        let f = mesh.new_face(&verts);
        assert_eq!(f.index(), 0);
        assert_eq!(mesh.num_vertices(), 3);
        assert_eq!(mesh.num_edges(), 3);
        assert_eq!(mesh.num_halfedges(), 6);
        assert_eq!(mesh.num_loops(), 3);
        assert_eq!(mesh.num_faces(), 1);
        assert_eq!(mesh.face_size(f), 3);
        for (i, j) in (0u32..3).map(|i| (i, (i + 1) % 3)) {
            let h = mesh
                .find_halfedge(i.into(), j.into())
                .expect("Halfedge not found");
            assert_eq!(mesh.halfedge_loops(h).len(), 1);
            assert_eq!(mesh.halfedge_loops(h.opposite()).len(), 0);
        }
    }

    #[test]
    fn t_new_edge_idempotent() {
        let mut mesh = Mesh::new();
        let a = mesh.new_vertex(glam::Vec3::ZERO);
        let b = mesh.new_vertex(glam::Vec3::X);
        let e = mesh.new_edge(a, b);
        assert_eq!(mesh.new_edge(a, b), e);
        assert_eq!(mesh.new_edge(b, a), e);
        assert_eq!(mesh.num_edges(), 1);
        assert_eq!(mesh.edge_vertices(e), (a, b));
        assert_eq!(mesh.find_edge(b, a), Some(e));
    }

    #[test]
    #[should_panic(expected = "itself")]
    fn t_self_edge_panics() {
        let mut mesh = Mesh::new();
        let a = mesh.new_vertex(glam::Vec3::ZERO);
        mesh.new_edge(a, a);
    }

    #[test]
    #[should_panic(expected = "at least 3")]
    fn t_small_face_panics() {
        let mut mesh = Mesh::new();
        let a = mesh.new_vertex(glam::Vec3::ZERO);
        let b = mesh.new_vertex(glam::Vec3::X);
        mesh.new_face(&[a, b]);
    }

    #[test]
    fn t_shared_edge_two_faces() {
        let mesh = split_quad();
        let e = mesh.find_edge(0u32.into(), 2u32.into()).unwrap();
        let (h0, h1) = e.halfedges();
        // Both triangles traverse the diagonal from 0 to 2.
        assert_eq!(
            mesh.halfedge_loops(h0).len() + mesh.halfedge_loops(h1).len(),
            2
        );
    }

    #[test]
    fn t_nonmanifold_fan() {
        // Three triangles sharing one edge.
        let mut mesh = Mesh::new();
        let a = mesh.new_vertex(glam::Vec3::ZERO);
        let b = mesh.new_vertex(glam::Vec3::X);
        let wings: Vec<VH> = [glam::Vec3::Y, glam::Vec3::Z, glam::vec3(0.0, -1.0, 0.0)]
            .iter()
            .map(|p| mesh.new_vertex(*p))
            .collect();
        for w in &wings {
            mesh.new_tri(a, b, *w);
        }
        assert_eq!(mesh.num_faces(), 3);
        assert_eq!(mesh.num_edges(), 7);
        let h = mesh.find_halfedge(a, b).unwrap();
        assert_eq!(mesh.halfedge_loops(h).len(), 3);
        assert_eq!(mesh.halfedge_loops(h.opposite()).len(), 0);
    }

    #[test]
    fn t_quad_grid() {
        let mut mesh = Mesh::with_capacity(9, 12, 4);
        let verts: Vec<VH> = (0..9)
            .map(|i| mesh.new_vertex(glam::vec3((i % 3) as f32, (i / 3) as f32, 0.0)))
            .collect();
        for (i, j) in [(0usize, 0usize), (1, 0), (0, 1), (1, 1)] {
            let base = j * 3 + i;
            let vs: ArrayVec<VH, 4> = [base, base + 1, base + 4, base + 3]
                .iter()
                .map(|k| verts[*k])
                .collect();
            mesh.new_face(&vs);
        }
        assert_eq!(mesh.num_vertices(), 9);
        assert_eq!(mesh.num_edges(), 12);
        assert_eq!(mesh.num_faces(), 4);
        assert_eq!(mesh.num_loops(), 16);
        // The shared corner is used by all four quads.
        assert_eq!(mesh.degree(verts[4]), 4);
        mesh.check().unwrap();
    }

    #[test]
    fn t_delete_face() {
        let mut mesh = cube();
        mesh.delete_face(5u32.into());
        assert_eq!(mesh.num_faces(), 5);
        assert_eq!(mesh.num_loops(), 20);
        assert_eq!(mesh.num_edges(), 12);
        assert_eq!(mesh.num_vertices(), 8);
        let h = mesh.find_halfedge(4u32.into(), 5u32.into()).unwrap();
        assert!(mesh.halfedge_loops(h).is_empty());
        // The other side still bounds the front face.
        assert_eq!(mesh.halfedge_loops(h.opposite()).len(), 1);
    }

    #[test]
    fn t_delete_edge_removes_faces() {
        let mut mesh = cube();
        let e = mesh.find_edge(4u32.into(), 5u32.into()).unwrap();
        mesh.delete_edge(e);
        assert_eq!(mesh.num_edges(), 11);
        assert_eq!(mesh.num_faces(), 4);
        assert_eq!(mesh.num_vertices(), 8);
        assert!(!mesh.is_live_edge(e));
        assert_eq!(mesh.find_edge(4u32.into(), 5u32.into()), None);
    }

    #[test]
    fn t_delete_vertex() {
        let mut mesh = cube();
        mesh.delete_vertex(0u32.into());
        assert_eq!(mesh.num_vertices(), 7);
        assert_eq!(mesh.num_edges(), 9);
        assert_eq!(mesh.num_faces(), 3);
        let faces: Vec<u32> = mesh.faces().map(|f| f.index()).collect();
        assert_eq!(faces, &[2, 3, 5]);
    }

    #[test]
    fn t_slot_reuse() {
        let mut mesh = cube();
        mesh.delete_vertex(0u32.into());
        let v = mesh.new_vertex(glam::Vec3::ZERO);
        assert_eq!(v.index(), 0);
        assert_eq!(mesh.num_vertices(), 8);
        assert_eq!(mesh.vertex_halfedge(v), None);
    }

    #[test]
    fn t_enumerate_after_deletion() {
        let mut mesh = cube();
        mesh.delete_vertex(2u32.into());
        let order = mesh.enumerate_vertices();
        assert_eq!(
            order.iter().map(|v| v.index()).collect::<Vec<_>>(),
            &[0, 1, 3, 4, 5, 6, 7]
        );
        for (i, v) in order.iter().enumerate() {
            assert_eq!(mesh.vertex_seq(*v), i as u32);
        }
        let faces = mesh.enumerate_faces();
        assert_eq!(
            faces.iter().map(|f| f.index()).collect::<Vec<_>>(),
            &[1, 4, 5]
        );
        assert_eq!(mesh.face_seq(faces[1]), 1);
    }

    #[test]
    fn t_clear() {
        let mut mesh = cube();
        mesh.clear();
        assert_eq!(mesh.num_vertices(), 0);
        assert_eq!(mesh.num_edges(), 0);
        assert_eq!(mesh.num_loops(), 0);
        assert_eq!(mesh.num_faces(), 0);
        let v = mesh.new_vertex(glam::Vec3::ZERO);
        assert_eq!(v.index(), 0);
    }

    #[test]
    #[should_panic(expected = "dead element")]
    fn t_dead_vertex_access_panics() {
        let mut mesh = Mesh::new();
        let v = mesh.new_vertex(glam::Vec3::ZERO);
        mesh.delete_vertex(v);
        mesh.point(v);
    }
}

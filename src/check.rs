use crate::{
    element::{Handle, LH, VH},
    error::Error,
    mesh::Mesh,
};

fn check_vertices(mesh: &Mesh, visited: &mut [bool]) -> Result<(), Error> {
    for v in mesh.vertices() {
        let start = match mesh.vertex_halfedge(v) {
            Some(h) => h,
            None => continue,
        };
        if !mesh.is_live_edge(start.edge()) || mesh.tail_vertex(start) != v {
            return Err(Error::InvalidOutgoingHalfedge(v));
        }
        let mut h = start;
        let mut steps = 0usize;
        loop {
            if !mesh.is_live_edge(h.edge()) {
                return Err(Error::BrokenVertexRing(v));
            }
            // Every ring member leaves this vertex for some other vertex.
            if mesh.head_vertex(h) == v || mesh.tail_vertex(h) != v {
                return Err(Error::BrokenVertexRing(v));
            }
            let next = mesh.ring_next(h);
            let prev = mesh.ring_prev(h);
            if !mesh.is_live_edge(next.edge()) || !mesh.is_live_edge(prev.edge()) {
                return Err(Error::BrokenVertexRing(v));
            }
            if mesh.ring_next(prev) != h || mesh.ring_prev(next) != h {
                return Err(Error::BrokenVertexRing(v));
            }
            // A halfedge can only be in one ring, once.
            if std::mem::replace(&mut visited[h.index() as usize], true) {
                return Err(Error::BrokenVertexRing(v));
            }
            steps += 1;
            if steps > mesh.num_edges() {
                return Err(Error::BrokenVertexRing(v));
            }
            h = next;
            if h == start {
                break;
            }
        }
    }
    Ok(())
}

fn check_edges(mesh: &Mesh, visited: &[bool]) -> Result<(), Error> {
    for e in mesh.edges() {
        let (h0, h1) = e.halfedges();
        for h in [h0, h1] {
            let head = mesh.head_vertex(h);
            if !mesh.is_live_vertex(head) {
                return Err(Error::DeadVertex(head));
            }
        }
        if mesh.head_vertex(h0) == mesh.head_vertex(h1) {
            return Err(Error::DegenerateEdge(e));
        }
        for h in [h0, h1] {
            // The ring walks marked every halfedge they saw; one that was
            // never seen is missing from the ring of its tail.
            if !visited[h.index() as usize] {
                return Err(Error::BrokenVertexRing(mesh.tail_vertex(h)));
            }
            for &l in mesh.halfedge_loops(h) {
                if !mesh.is_live_loop(l) {
                    return Err(Error::DeadLoop(l));
                }
                if mesh.loop_halfedge(l) != h {
                    return Err(Error::MissingRadialLoop(l));
                }
            }
        }
    }
    Ok(())
}

fn check_loops(mesh: &Mesh) -> Result<(), Error> {
    for i in mesh.loops.indices() {
        let l: LH = i.into();
        let h = mesh.loop_halfedge(l);
        if !mesh.is_live_edge(h.edge()) {
            return Err(Error::DeadEdge(h.edge()));
        }
        if !mesh.halfedge_loops(h).contains(&l) {
            return Err(Error::MissingRadialLoop(l));
        }
        if !mesh.is_live_face(mesh.loop_face(l)) {
            return Err(Error::DeadFace(mesh.loop_face(l)));
        }
        if !mesh.is_live_loop(mesh.loop_next(l)) {
            return Err(Error::DeadLoop(mesh.loop_next(l)));
        }
    }
    Ok(())
}

fn check_faces(mesh: &Mesh, chained: &mut [bool]) -> Result<(), Error> {
    for f in mesh.faces() {
        let start = mesh.face_start(f);
        if !mesh.is_live_loop(start) {
            return Err(Error::DeadLoop(start));
        }
        let size = mesh.face_size(f);
        if size < 3 {
            return Err(Error::FaceSizeMismatch(f));
        }
        let mut l = start;
        let mut steps = 0usize;
        loop {
            if mesh.loop_face(l) != f {
                return Err(Error::WrongLoopFace(l));
            }
            chained[l.index() as usize] = true;
            steps += 1;
            if steps > size {
                return Err(Error::BrokenFaceChain(f));
            }
            l = mesh.loop_next(l);
            if l == start {
                break;
            }
        }
        if steps != size {
            return Err(Error::FaceSizeMismatch(f));
        }
    }
    // Every loop belongs to the chain of the face it names.
    for i in mesh.loops.indices() {
        if !chained[i as usize] {
            return Err(Error::OrphanLoop(i.into()));
        }
    }
    Ok(())
}

impl Mesh {
    /**
     * Walk every vertex ring, radial list and face chain and report the
     * first inconsistency found. Meant for tests and for debugging editing
     * code; the editing operations themselves assume the invariants hold.
     */
    pub fn check(&self) -> Result<(), Error> {
        let mut visited = vec![false; self.edges.capacity() * 2].into_boxed_slice();
        check_vertices(self, &mut visited)?;
        check_edges(self, &visited)?;
        check_loops(self)?;
        let mut chained = vec![false; self.loops.capacity()].into_boxed_slice();
        check_faces(self, &mut chained)?;
        Ok(())
    }

    /// Whether the ring of outgoing halfedges around the vertex closes on
    /// itself without leaving the vertex. The walk gives up after as many
    /// steps as the mesh has edges, so it terminates even on mangled
    /// topology.
    pub fn check_vertex(&self, v: VH) -> bool {
        let start = match self.vertex_halfedge(v) {
            Some(h) => h,
            None => return true,
        };
        let mut h = self.ring_next(start);
        for _ in 0..self.num_edges() {
            if self.head_vertex(h) == v {
                return false;
            }
            if self.tail_vertex(h) != v {
                return false;
            }
            if h == start {
                return true;
            }
            h = self.ring_next(h);
        }
        false
    }
}

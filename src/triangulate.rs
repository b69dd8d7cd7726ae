use crate::mesh::Mesh;

impl Mesh {
    /**
     * Replace every face of more than 3 sides with a fan of triangles around
     * its first vertex. The triangles inherit the face's committed
     * properties. Faces are fanned in place, so for a moment the original
     * face and its triangles share edges; that is fine, edges carry any
     * number of faces.
     */
    pub fn triangulate(&mut self) {
        let mut faces = std::mem::take(&mut self.cache.faces);
        let mut verts = std::mem::take(&mut self.cache.verts);
        faces.clear();
        faces.extend(self.faces());
        for f in &faces {
            let f = *f;
            // Deleted slots get reused for fan triangles, which need no work.
            if !self.is_live_face(f) || self.face_size(f) == 3 {
                continue;
            }
            verts.clear();
            verts.extend(self.fv_iter(f));
            for j in 1..(verts.len() - 1) {
                let t = self.new_tri(verts[0], verts[j], verts[j + 1]);
                self.copy_face_props(f, t);
            }
            self.delete_face(f);
        }
        faces.clear();
        verts.clear();
        self.cache.faces = faces;
        self.cache.verts = verts;
    }
}

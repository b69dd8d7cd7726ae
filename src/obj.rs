use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use crate::{
    element::{Handle, VH},
    error::Error,
    mesh::Mesh,
};

const OBJ_EXT: &str = "obj";

fn check_extension(path: &Path) -> Result<(), Error> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case(OBJ_EXT) => Ok(()),
        _ => Err(Error::InvalidObjFile(path.to_path_buf())),
    }
}

impl Mesh {
    pub fn load_obj(path: &Path) -> Result<Mesh, Error> {
        check_extension(path)?;
        let options = tobj::LoadOptions::default();
        let (models, _) =
            tobj::load_obj(path, &options).map_err(|e| Error::ObjLoadFailed(format!("{}", e)))?;
        let (nverts, nfaces) = models
            .iter()
            .fold((0usize, 0usize), |(nverts, nfaces), model| {
                let msh = &model.mesh;
                (
                    nverts + (msh.positions.len() / 3),
                    nfaces + msh.face_arities.len(),
                )
            });
        let nedges = nfaces * 3 / 2; // Estimate.
        let mut outmesh = Mesh::with_capacity(nverts, nedges, nfaces);
        let mut voffset = 0u32;
        let mut fvs: Vec<VH> = Vec::new();
        for model in models {
            let mesh = model.mesh;
            if mesh.positions.len() % 3 != 0 {
                return Err(Error::IncorrectNumberOfCoordinates(mesh.positions.len()));
            }
            let nverts = (mesh.positions.len() / 3) as u32;
            for triplet in mesh.positions.chunks(3) {
                outmesh.new_vertex(glam::vec3(triplet[0], triplet[1], triplet[2]));
            }
            let mut start = 0usize;
            for size in mesh.face_arities {
                let size = size as usize;
                let indices = &mesh.indices[start..(start + size)];
                start += size;
                fvs.clear();
                for i in indices {
                    if *i >= nverts {
                        return Err(Error::InvalidVertexIndex(*i));
                    }
                    let v: VH = (*i + voffset).into();
                    // Sloppy exporters repeat corners; collapse them instead
                    // of refusing the file.
                    if fvs.last() == Some(&v) {
                        continue;
                    }
                    fvs.push(v);
                }
                if fvs.len() > 1 && fvs.first() == fvs.last() {
                    fvs.pop();
                }
                if fvs.len() < 3 {
                    return Err(Error::FaceTooSmall(fvs.len()));
                }
                outmesh.new_face(&fvs);
            }
            voffset += nverts;
        }
        Ok(outmesh)
    }

    /**
     * Write the mesh out as Wavefront OBJ. When the mesh has a token table
     * and `f32` vertex properties named `"u"` and `"v"`, they are written as
     * texture coordinates, one per vertex. Face corners refer to vertices in
     * the order they are written, 1 based, as the format wants.
     */
    pub fn write_obj(&self, w: &mut impl Write) -> Result<(), Error> {
        let uv = if self.vertex_prop_exists("u") && self.vertex_prop_exists("v") {
            Some((self.vertex_prop::<f32>("u"), self.vertex_prop::<f32>("v")))
        } else {
            None
        };
        // Slot to output row, 1 based.
        let mut rows = vec![0u32; self.verts.capacity()];
        for (i, v) in self.vertices().enumerate() {
            rows[v.index() as usize] = i as u32 + 1;
            let p = self.point(v);
            writeln!(w, "v {} {} {}", p.x, p.y, p.z)?;
            if let Some((pu, pv)) = &uv {
                writeln!(w, "vt {} {}", pu.get(self, v), pv.get(self, v))?;
            }
        }
        for f in self.faces() {
            write!(w, "f")?;
            for v in self.fv_iter(f) {
                let row = rows[v.index() as usize];
                if uv.is_some() {
                    write!(w, " {}/{}", row, row)?;
                } else {
                    write!(w, " {}", row)?;
                }
            }
            writeln!(w)?;
        }
        Ok(())
    }

    pub fn save_obj(&self, path: &Path) -> Result<(), Error> {
        check_extension(path)?;
        let mut file = BufWriter::new(File::create(path)?);
        self.write_obj(&mut file)
    }
}

#[cfg(test)]
mod test {
    use std::path::PathBuf;

    use crate::{
        error::Error,
        mesh::{
            Mesh,
            test::{cube, split_quad},
        },
        token::TokenTable,
    };

    #[test]
    fn t_write_plain() {
        let mesh = split_quad();
        let mut out = Vec::new();
        mesh.write_obj(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "v 0 0 0\n\
             v 1 0 0\n\
             v 1 1 0\n\
             v 0 1 0\n\
             f 1 2 3\n\
             f 1 3 4\n"
        );
    }

    #[test]
    fn t_write_with_uvs() {
        let mut mesh = Mesh::new();
        let a = mesh.new_vertex(glam::Vec3::ZERO);
        let b = mesh.new_vertex(glam::Vec3::X);
        let c = mesh.new_vertex(glam::Vec3::Y);
        mesh.new_tri(a, b, c);
        mesh.set_token_table(TokenTable::new_shared());
        mesh.add_vertex_prop("u", 0.0f32);
        mesh.add_vertex_prop("v", 0.0f32);
        mesh.commit_props(true);
        let pu = mesh.vertex_prop::<f32>("u");
        let pv = mesh.vertex_prop::<f32>("v");
        for (i, v) in [a, b, c].iter().enumerate() {
            pu.set(&mut mesh, *v, 0.25 * i as f32);
            pv.set(&mut mesh, *v, 0.5);
        }
        let mut out = Vec::new();
        mesh.write_obj(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "v 0 0 0\n\
             vt 0 0.5\n\
             v 1 0 0\n\
             vt 0.25 0.5\n\
             v 0 1 0\n\
             vt 0.5 0.5\n\
             f 1/1 2/2 3/3\n"
        );
    }

    #[test]
    fn t_save_load_roundtrip() {
        let mesh = cube();
        let path = std::env::temp_dir().join("mica_obj_roundtrip.obj");
        mesh.save_obj(&path).unwrap();
        let back = Mesh::load_obj(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(back.num_vertices(), 8);
        assert_eq!(back.num_edges(), 12);
        assert_eq!(back.num_faces(), 6);
        back.check().unwrap();
        for v in mesh.vertices() {
            assert_eq!(mesh.point(v), back.point(v));
        }
        for f in mesh.faces() {
            assert_eq!(
                mesh.fv_iter(f).collect::<Vec<_>>(),
                back.fv_iter(f).collect::<Vec<_>>()
            );
        }
    }

    #[test]
    fn t_wrong_extension() {
        let mesh = split_quad();
        let path = PathBuf::from("mesh.txt");
        assert!(matches!(
            mesh.save_obj(&path),
            Err(Error::InvalidObjFile(p)) if p == path
        ));
        assert!(matches!(
            Mesh::load_obj(&PathBuf::from("mesh.png")),
            Err(Error::InvalidObjFile(_))
        ));
    }
}

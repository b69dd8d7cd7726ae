use std::rc::Rc;

use crate::{
    element::{EH, FH, Handle, VH},
    mesh::Mesh,
    property::{PropTable, PropValue},
};

enum Op {
    /// Matched by name and size, copy the bytes across.
    Copy {
        from_col: u32,
        to_col: u32,
        size: usize,
    },
    /// No source counterpart, reset the destination to its default.
    Fill { to_col: u32, default: Vec<u8> },
}

struct Blend {
    from_col: u32,
    to_col: u32,
}

/**
 * A property transfer plan between two meshes that share a token table.
 *
 * The plan is built once against the committed schemas and then applied per
 * element. Every destination property is matched to a source property by name
 * and size, not by type, be warned. Matched values are copied byte for byte,
 * unmatched destination properties are reset to their defaults.
 *
 * [`interpolate`](MeshTransfer::interpolate) additionally blends the position
 * and every name matched `f32` vertex property over a weighted set of source
 * vertices.
 *
 * Committing a property schema on either mesh makes the plan stale, and a
 * stale plan panics when used.
 */
pub struct MeshTransfer {
    vert_ops: Vec<Op>,
    edge_ops: Vec<Op>,
    face_ops: Vec<Op>,
    vert_blend: Vec<Blend>,
    from_gen: [u32; 3],
    to_gen: [u32; 3],
}

fn build_ops<H: Handle>(from: &PropTable<H>, to: &PropTable<H>, ops: &mut Vec<Op>) {
    for rec in to.records() {
        let matched = from
            .find(rec.name)
            .map(|i| from.record(i as usize))
            .filter(|frec| frec.size == rec.size);
        ops.push(match matched {
            Some(frec) => Op::Copy {
                from_col: frec.column,
                to_col: rec.column,
                size: rec.size,
            },
            None => Op::Fill {
                to_col: rec.column,
                default: rec.default.clone(),
            },
        });
    }
}

fn apply_ops<H: Handle>(
    ops: &[Op],
    from: &PropTable<H>,
    fslot: u32,
    to: &mut PropTable<H>,
    tslot: u32,
) {
    for op in ops {
        match op {
            Op::Copy {
                from_col,
                to_col,
                size,
            } => {
                let bytes = from.read_raw(*from_col, fslot, *size);
                to.write_raw(*to_col, tslot, bytes);
            }
            Op::Fill { to_col, default } => to.write_raw(*to_col, tslot, default),
        }
    }
}

fn generations(mesh: &Mesh) -> [u32; 3] {
    [
        mesh.vprops.generation(),
        mesh.eprops.generation(),
        mesh.fprops.generation(),
    ]
}

impl MeshTransfer {
    pub fn new(from: &Mesh, to: &Mesh) -> MeshTransfer {
        assert!(
            Rc::ptr_eq(from.require_tokens(), to.require_tokens()),
            "the meshes do not share a token table"
        );
        assert!(
            !from.vprops.is_dirty()
                && !from.eprops.is_dirty()
                && !from.fprops.is_dirty()
                && !to.vprops.is_dirty()
                && !to.eprops.is_dirty()
                && !to.fprops.is_dirty(),
            "a schema has uncommitted changes, commit before building a transfer"
        );
        let mut plan = MeshTransfer {
            vert_ops: Vec::new(),
            edge_ops: Vec::new(),
            face_ops: Vec::new(),
            vert_blend: Vec::new(),
            from_gen: generations(from),
            to_gen: generations(to),
        };
        build_ops(&from.vprops, &to.vprops, &mut plan.vert_ops);
        build_ops(&from.eprops, &to.eprops, &mut plan.edge_ops);
        build_ops(&from.fprops, &to.fprops, &mut plan.face_ops);
        let real = to.require_tokens().borrow_mut().intern(f32::TYPE_NAME);
        for rec in to.vprops.records() {
            if rec.ty != real {
                continue;
            }
            let matched = from
                .vprops
                .find(rec.name)
                .map(|i| from.vprops.record(i as usize))
                .filter(|frec| frec.ty == real);
            if let Some(frec) = matched {
                plan.vert_blend.push(Blend {
                    from_col: frec.column,
                    to_col: rec.column,
                });
            }
        }
        plan
    }

    fn check_fresh(&self, from: &Mesh, to: &Mesh) {
        assert!(
            self.from_gen == generations(from) && self.to_gen == generations(to),
            "the transfer plan is stale, a schema was committed after it was built"
        );
    }

    pub fn vertex(&self, from: &Mesh, fv: VH, to: &mut Mesh, tv: VH) {
        self.check_fresh(from, to);
        assert!(from.is_live_vertex(fv), "reading a property of dead {}", fv);
        assert!(to.is_live_vertex(tv), "writing a property of dead {}", tv);
        apply_ops(&self.vert_ops, &from.vprops, fv.index(), &mut to.vprops, tv.index());
    }

    pub fn edge(&self, from: &Mesh, fe: EH, to: &mut Mesh, te: EH) {
        self.check_fresh(from, to);
        assert!(from.is_live_edge(fe), "reading a property of dead {}", fe);
        assert!(to.is_live_edge(te), "writing a property of dead {}", te);
        apply_ops(&self.edge_ops, &from.eprops, fe.index(), &mut to.eprops, te.index());
    }

    pub fn face(&self, from: &Mesh, ff: FH, to: &mut Mesh, tf: FH) {
        self.check_fresh(from, to);
        assert!(from.is_live_face(ff), "reading a property of dead {}", ff);
        assert!(to.is_live_face(tf), "writing a property of dead {}", tf);
        apply_ops(&self.face_ops, &from.fprops, ff.index(), &mut to.fprops, tf.index());
    }

    /**
     * Make a new vertex in the destination mesh from a weighted set of source
     * vertices. The weights need not sum to one, the position and every
     * blended property are divided by the weight total. Matched `f32`
     * properties are blended with the same weights as the position,
     * everything else is copied from the first sample.
     */
    pub fn interpolate(&self, from: &Mesh, samples: &[(VH, f32)], to: &mut Mesh) -> VH {
        self.check_fresh(from, to);
        assert!(!samples.is_empty(), "interpolating a vertex from no samples");
        let mut pos = glam::Vec3::ZERO;
        let mut total = 0.0f32;
        for (v, w) in samples {
            assert!(from.is_live_vertex(*v), "reading a property of dead {}", v);
            pos += from.point(*v) * *w;
            total += *w;
        }
        let tv = to.new_vertex(pos / total);
        apply_ops(
            &self.vert_ops,
            &from.vprops,
            samples[0].0.index(),
            &mut to.vprops,
            tv.index(),
        );
        for b in &self.vert_blend {
            let mut val = 0.0f32;
            for (v, w) in samples {
                val += *w * from.vprops.get::<f32>(b.from_col, v.index());
            }
            to.vprops.set(b.to_col, tv.index(), val / total);
        }
        tv
    }
}

#[cfg(test)]
mod test {
    use super::MeshTransfer;
    use crate::{mesh::Mesh, token::TokenTable};

    fn paired_meshes() -> (Mesh, Mesh) {
        let tokens = TokenTable::new_shared();
        let mut from = Mesh::new();
        from.set_token_table(tokens.clone());
        let mut to = Mesh::new();
        to.set_token_table(tokens);
        (from, to)
    }

    fn tri(mesh: &mut Mesh) {
        let a = mesh.new_vertex(glam::Vec3::ZERO);
        let b = mesh.new_vertex(glam::Vec3::X);
        let c = mesh.new_vertex(glam::Vec3::Y);
        mesh.new_tri(a, b, c);
    }

    #[test]
    fn t_vertex_transfer() {
        let (mut from, mut to) = paired_meshes();
        let fv = from.new_vertex(glam::Vec3::ZERO);
        from.add_vertex_prop("weight", 0.0f32);
        from.add_vertex_prop("tag", 0i32);
        from.commit_props(true);
        let fw = from.vertex_prop::<f32>("weight");
        fw.set(&mut from, fv, 2.5);
        let tv = to.new_vertex(glam::Vec3::X);
        to.add_vertex_prop("weight", 0.0f32);
        to.add_vertex_prop("shade", 1.0f32);
        to.commit_props(true);
        let tw = to.vertex_prop::<f32>("weight");
        let ts = to.vertex_prop::<f32>("shade");
        ts.set(&mut to, tv, 9.0);
        let plan = MeshTransfer::new(&from, &to);
        plan.vertex(&from, fv, &mut to, tv);
        // The name match copies, the unmatched property goes back to its
        // default.
        assert_eq!(tw.get(&to, tv), 2.5);
        assert_eq!(ts.get(&to, tv), 1.0);
    }

    #[test]
    fn t_size_mismatch_is_not_a_match() {
        let (mut from, mut to) = paired_meshes();
        let fv = from.new_vertex(glam::Vec3::ZERO);
        from.add_vertex_prop("weight", 2.0f64);
        from.commit_props(true);
        let tv = to.new_vertex(glam::Vec3::X);
        to.add_vertex_prop("weight", 0.5f32);
        to.commit_props(true);
        let tw = to.vertex_prop::<f32>("weight");
        tw.set(&mut to, tv, 3.0);
        let plan = MeshTransfer::new(&from, &to);
        plan.vertex(&from, fv, &mut to, tv);
        assert_eq!(tw.get(&to, tv), 0.5);
    }

    #[test]
    fn t_edge_and_face_transfer() {
        let (mut from, mut to) = paired_meshes();
        tri(&mut from);
        tri(&mut to);
        from.add_edge_prop("crease", 0.0f32);
        from.add_face_prop("patch", 0i32);
        from.commit_props(true);
        to.add_edge_prop("crease", 0.0f32);
        to.add_face_prop("patch", 0i32);
        to.commit_props(true);
        let fc = from.edge_prop::<f32>("crease");
        let fp = from.face_prop::<i32>("patch");
        fc.set(&mut from, 1u32.into(), 0.75);
        fp.set(&mut from, 0u32.into(), 11);
        let plan = MeshTransfer::new(&from, &to);
        plan.edge(&from, 1u32.into(), &mut to, 2u32.into());
        plan.face(&from, 0u32.into(), &mut to, 0u32.into());
        assert_eq!(to.edge_prop::<f32>("crease").get(&to, 2u32.into()), 0.75);
        assert_eq!(to.face_prop::<i32>("patch").get(&to, 0u32.into()), 11);
    }

    #[test]
    fn t_interpolate() {
        let (mut from, mut to) = paired_meshes();
        let va = from.new_vertex(glam::Vec3::ZERO);
        let vb = from.new_vertex(glam::Vec3::X);
        let vc = from.new_vertex(glam::Vec3::Y);
        from.add_vertex_prop("weight", 0.0f32);
        from.add_vertex_prop("tag", 0i32);
        from.commit_props(true);
        let fw = from.vertex_prop::<f32>("weight");
        let ft = from.vertex_prop::<i32>("tag");
        fw.set(&mut from, va, 1.0);
        fw.set(&mut from, vb, 2.0);
        fw.set(&mut from, vc, 3.0);
        ft.set(&mut from, va, 42);
        to.add_vertex_prop("weight", 0.0f32);
        to.add_vertex_prop("tag", 0i32);
        to.commit_props(true);
        let plan = MeshTransfer::new(&from, &to);
        let tv = plan.interpolate(&from, &[(va, 1.0), (vb, 1.0), (vc, 2.0)], &mut to);
        assert_eq!(to.point(tv), glam::vec3(0.25, 0.5, 0.0));
        assert_eq!(to.vertex_prop::<f32>("weight").get(&to, tv), 2.25);
        assert_eq!(to.vertex_prop::<i32>("tag").get(&to, tv), 42);
    }

    #[test]
    #[should_panic(expected = "stale")]
    fn t_stale_plan_panics() {
        let (mut from, mut to) = paired_meshes();
        let fv = from.new_vertex(glam::Vec3::ZERO);
        let tv = to.new_vertex(glam::Vec3::X);
        let plan = MeshTransfer::new(&from, &to);
        to.add_vertex_prop("weight", 0.0f32);
        to.commit_props(true);
        plan.vertex(&from, fv, &mut to, tv);
    }

    #[test]
    #[should_panic(expected = "token table")]
    fn t_unshared_tokens_panics() {
        let mut from = Mesh::new();
        from.set_token_table(TokenTable::new_shared());
        let mut to = Mesh::new();
        to.set_token_table(TokenTable::new_shared());
        MeshTransfer::new(&from, &to);
    }
}

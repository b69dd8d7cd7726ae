use crate::{
    element::Handle,
    error::Error,
    mesh::Mesh,
    property::{PropState, PropTable, PropValue},
    token::{Token, Tokens},
};

/// One column of a table: a name, a type tag, the byte width of one value,
/// the default for absent rows, and `rows * size` bytes of packed data.
/// Fields whose names start with `$` describe the mesh structure itself;
/// everything else is a property.
pub struct Field {
    pub name: String,
    pub ty: String,
    pub size: usize,
    pub default: Vec<u8>,
    pub data: Vec<u8>,
}

#[derive(Default)]
pub struct Table {
    pub rows: usize,
    pub fields: Vec<Field>,
}

impl Table {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/**
 * A mesh flattened into four tables, one row per element: vertices with
 * their position in `"$vert"`, edges with their endpoint rows in `"$a"` and
 * `"$b"`, faces with the start of their index range in `"$offset"`, and the
 * face corner rows in `"$index"`. A face's corners run from its offset to
 * the next face's offset, the last face running to the end of the index
 * table. Committed properties follow the structural fields, so a round trip
 * preserves them along with the topology.
 */
pub struct MeshTables {
    pub vertices: Table,
    pub edges: Table,
    pub faces: Table,
    pub indices: Table,
}

fn prop_fields<H: Handle>(table: &PropTable<H>, tokens: &Tokens, order: &[H], out: &mut Vec<Field>) {
    let tt = tokens.borrow();
    for rec in table.records().iter().filter(|r| r.state == PropState::Stored) {
        let mut data = Vec::with_capacity(order.len() * rec.size);
        for h in order {
            data.extend_from_slice(table.read_raw(rec.column, h.index(), rec.size));
        }
        out.push(Field {
            name: tt.name(rec.name).to_string(),
            ty: tt.name(rec.ty).to_string(),
            size: rec.size,
            default: rec.default.clone(),
            data,
        });
    }
}

/// The field must exist with the given value size and carry one value per
/// row of its table.
fn expect_field<'a>(table: &'a Table, name: &str, size: usize) -> Result<&'a Field, Error> {
    let field = table
        .field(name)
        .ok_or_else(|| Error::MissingTableField(name.to_string()))?;
    if field.size != size {
        return Err(Error::FieldSizeMismatch(name.to_string(), size, field.size));
    }
    Ok(field)
}

fn check_data_lengths(table: &Table) -> Result<(), Error> {
    for field in &table.fields {
        let expected = table.rows * field.size;
        if field.data.len() != expected {
            return Err(Error::FieldDataLength(
                field.name.clone(),
                expected,
                field.data.len(),
            ));
        }
    }
    Ok(())
}

fn u32_at(field: &Field, row: usize) -> u32 {
    u32::read_from(&field.data[row * 4..][..4])
}

/// Intern and declare the non-structural fields of a table as properties.
/// Returns the table field index and name of everything declared.
fn declare_props(
    table: &Table,
    structural: &[&str],
    tokens: &Tokens,
    mut add: impl FnMut(Token, Token, usize, &[u8]),
) -> Vec<(usize, Token)> {
    let mut declared = Vec::new();
    for (i, field) in table.fields.iter().enumerate() {
        if structural.contains(&field.name.as_str()) {
            continue;
        }
        let (name, ty) = {
            let mut tt = tokens.borrow_mut();
            (tt.intern(&field.name), tt.intern(&field.ty))
        };
        add(name, ty, field.size, &field.default);
        declared.push((i, name));
    }
    declared
}

/// Resolve the declared fields to their committed columns, so row copies can
/// skip the name lookups.
fn copy_plan<H: Handle>(
    props: &PropTable<H>,
    declared: &[(usize, Token)],
) -> Vec<(usize, u32, usize)> {
    declared
        .iter()
        .filter_map(|(i, name)| {
            props.find(*name).map(|r| {
                let rec = props.record(r as usize);
                (*i, rec.column, rec.size)
            })
        })
        .collect()
}

impl Mesh {
    /**
     * Flatten the mesh into tables. This stamps fresh sequence numbers on
     * vertices, edges and faces, the same numbers the rows of the tables end
     * up in, so handles can be related to rows afterwards. Naming the
     * property fields needs the token table, so a mesh with properties but
     * no token table panics.
     */
    pub fn to_tables(&mut self) -> MeshTables {
        let vorder = self.enumerate_vertices();
        let eorder = self.enumerate_edges();
        let forder = self.enumerate_faces();
        // Vertices.
        let mut vdata = Vec::with_capacity(vorder.len() * glam::Vec3::SIZE);
        for v in &vorder {
            let mut buf = [0u8; glam::Vec3::SIZE];
            self.point(*v).write_to(&mut buf);
            vdata.extend_from_slice(&buf);
        }
        let mut vfields = vec![Field {
            name: "$vert".to_string(),
            ty: glam::Vec3::TYPE_NAME.to_string(),
            size: glam::Vec3::SIZE,
            default: vec![0u8; glam::Vec3::SIZE],
            data: vdata,
        }];
        if self.vprops.count() > 0 {
            prop_fields(&self.vprops, self.require_tokens(), &vorder, &mut vfields);
        }
        // Edges.
        let mut adata = Vec::with_capacity(eorder.len() * 4);
        let mut bdata = Vec::with_capacity(eorder.len() * 4);
        for e in &eorder {
            let (va, vb) = self.edge_vertices(*e);
            adata.extend_from_slice(&self.vertex_seq(va).to_le_bytes());
            bdata.extend_from_slice(&self.vertex_seq(vb).to_le_bytes());
        }
        let mut efields = vec![
            Field {
                name: "$a".to_string(),
                ty: u32::TYPE_NAME.to_string(),
                size: 4,
                default: vec![0u8; 4],
                data: adata,
            },
            Field {
                name: "$b".to_string(),
                ty: u32::TYPE_NAME.to_string(),
                size: 4,
                default: vec![0u8; 4],
                data: bdata,
            },
        ];
        if self.eprops.count() > 0 {
            prop_fields(&self.eprops, self.require_tokens(), &eorder, &mut efields);
        }
        // Faces and the corner index list.
        let mut odata = Vec::with_capacity(forder.len() * 4);
        let mut idata = Vec::new();
        let mut offset = 0u32;
        for f in &forder {
            odata.extend_from_slice(&offset.to_le_bytes());
            for v in self.fv_iter(*f) {
                idata.extend_from_slice(&self.vertex_seq(v).to_le_bytes());
                offset += 1;
            }
        }
        let mut ffields = vec![Field {
            name: "$offset".to_string(),
            ty: u32::TYPE_NAME.to_string(),
            size: 4,
            default: vec![0u8; 4],
            data: odata,
        }];
        if self.fprops.count() > 0 {
            prop_fields(&self.fprops, self.require_tokens(), &forder, &mut ffields);
        }
        MeshTables {
            vertices: Table {
                rows: vorder.len(),
                fields: vfields,
            },
            edges: Table {
                rows: eorder.len(),
                fields: efields,
            },
            faces: Table {
                rows: forder.len(),
                fields: ffields,
            },
            indices: Table {
                rows: offset as usize,
                fields: vec![Field {
                    name: "$index".to_string(),
                    ty: u32::TYPE_NAME.to_string(),
                    size: 4,
                    default: vec![0u8; 4],
                    data: idata,
                }],
            },
        }
    }

    /**
     * Build a mesh from tables. The structural fields are validated before
     * anything else: they must exist with their exact sizes, every field
     * must carry one value per row, edge endpoints must be distinct vertex
     * rows, face offsets must slice the index table into ranges of at least
     * 3 corners, and every corner must be a vertex row. Any violation
     * returns an error and no mesh.
     *
     * The remaining fields of the vertex, edge and face tables become
     * committed properties with the same names, types, sizes and defaults.
     */
    pub fn from_tables(tokens: Tokens, tables: &MeshTables) -> Result<Mesh, Error> {
        let vert = expect_field(&tables.vertices, "$vert", glam::Vec3::SIZE)?;
        let ea = expect_field(&tables.edges, "$a", 4)?;
        let eb = expect_field(&tables.edges, "$b", 4)?;
        let off = expect_field(&tables.faces, "$offset", 4)?;
        let idx = expect_field(&tables.indices, "$index", 4)?;
        check_data_lengths(&tables.vertices)?;
        check_data_lengths(&tables.edges)?;
        check_data_lengths(&tables.faces)?;
        check_data_lengths(&tables.indices)?;
        let nverts = tables.vertices.rows as u32;

        let mut mesh = Mesh::with_capacity(
            tables.vertices.rows,
            tables.edges.rows,
            tables.faces.rows,
        );
        mesh.set_token_table(tokens.clone());
        let vdecl = declare_props(&tables.vertices, &["$vert"], &tokens, |n, t, s, d| {
            mesh.add_vertex_prop_raw(n, t, s, d)
        });
        let edecl = declare_props(&tables.edges, &["$a", "$b"], &tokens, |n, t, s, d| {
            mesh.add_edge_prop_raw(n, t, s, d)
        });
        let fdecl = declare_props(&tables.faces, &["$offset"], &tokens, |n, t, s, d| {
            mesh.add_face_prop_raw(n, t, s, d)
        });
        mesh.commit_props(false);
        let vplan = copy_plan(&mesh.vprops, &vdecl);
        let eplan = copy_plan(&mesh.eprops, &edecl);
        let fplan = copy_plan(&mesh.fprops, &fdecl);

        // Vertices. Fresh arenas hand out slots in order, so row i is slot i.
        for row in 0..tables.vertices.rows {
            let v = mesh.new_vertex(glam::Vec3::read_from(
                &vert.data[row * glam::Vec3::SIZE..][..glam::Vec3::SIZE],
            ));
            write_prop_row(&mut mesh.vprops, &tables.vertices, &vplan, row, v.index());
        }
        // Edges.
        for row in 0..tables.edges.rows {
            let a = u32_at(ea, row);
            let b = u32_at(eb, row);
            if a >= nverts {
                return Err(Error::InvalidVertexIndex(a));
            }
            if b >= nverts {
                return Err(Error::InvalidVertexIndex(b));
            }
            if a == b {
                return Err(Error::DegenerateTableEdge(row));
            }
            let e = mesh.new_edge(a.into(), b.into());
            write_prop_row(&mut mesh.eprops, &tables.edges, &eplan, row, e.index());
        }
        // Faces.
        let mut corners = Vec::new();
        for row in 0..tables.faces.rows {
            let start = u32_at(off, row) as usize;
            let end = if row + 1 < tables.faces.rows {
                u32_at(off, row + 1) as usize
            } else {
                tables.indices.rows
            };
            if start > end || end > tables.indices.rows {
                return Err(Error::InvalidFaceOffset(start as u32));
            }
            if end - start < 3 {
                return Err(Error::FaceTooSmall(end - start));
            }
            corners.clear();
            for j in start..end {
                let c = u32_at(idx, j);
                if c >= nverts {
                    return Err(Error::InvalidVertexIndex(c));
                }
                corners.push(c.into());
            }
            for j in 0..corners.len() {
                if corners[j] == corners[(j + 1) % corners.len()] {
                    return Err(Error::DegenerateTableEdge(row));
                }
            }
            let f = mesh.new_face(&corners);
            write_prop_row(&mut mesh.fprops, &tables.faces, &fplan, row, f.index());
        }
        Ok(mesh)
    }
}

/// Copy one row of every planned property field into its committed column.
/// The element constructors already sized the columns for the slot.
fn write_prop_row<H: Handle>(
    props: &mut PropTable<H>,
    table: &Table,
    plan: &[(usize, u32, usize)],
    row: usize,
    slot: u32,
) {
    for &(i, col, size) in plan {
        let field = &table.fields[i];
        props.write_raw(col, slot, &field.data[row * size..][..size]);
    }
}

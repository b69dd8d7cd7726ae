use std::{collections::HashMap, marker::PhantomData};

use crate::{
    element::{EH, FH, Handle, VH},
    mesh::Mesh,
    token::Token,
};

/// Types that can live in a property column. Values are stored as little
/// endian bytes so that exported tables mean the same thing everywhere.
pub trait PropValue: Copy {
    /// Type tag recorded in the schema.
    const TYPE_NAME: &'static str;
    /// Number of bytes one value occupies.
    const SIZE: usize;

    fn write_to(self, bytes: &mut [u8]);
    fn read_from(bytes: &[u8]) -> Self;
}

impl PropValue for f32 {
    const TYPE_NAME: &'static str = "f32";
    const SIZE: usize = 4;

    fn write_to(self, bytes: &mut [u8]) {
        bytes.copy_from_slice(&self.to_le_bytes());
    }

    fn read_from(bytes: &[u8]) -> Self {
        let mut b = [0u8; 4];
        b.copy_from_slice(bytes);
        f32::from_le_bytes(b)
    }
}

impl PropValue for f64 {
    const TYPE_NAME: &'static str = "f64";
    const SIZE: usize = 8;

    fn write_to(self, bytes: &mut [u8]) {
        bytes.copy_from_slice(&self.to_le_bytes());
    }

    fn read_from(bytes: &[u8]) -> Self {
        let mut b = [0u8; 8];
        b.copy_from_slice(bytes);
        f64::from_le_bytes(b)
    }
}

impl PropValue for i32 {
    const TYPE_NAME: &'static str = "i32";
    const SIZE: usize = 4;

    fn write_to(self, bytes: &mut [u8]) {
        bytes.copy_from_slice(&self.to_le_bytes());
    }

    fn read_from(bytes: &[u8]) -> Self {
        let mut b = [0u8; 4];
        b.copy_from_slice(bytes);
        i32::from_le_bytes(b)
    }
}

impl PropValue for u32 {
    const TYPE_NAME: &'static str = "u32";
    const SIZE: usize = 4;

    fn write_to(self, bytes: &mut [u8]) {
        bytes.copy_from_slice(&self.to_le_bytes());
    }

    fn read_from(bytes: &[u8]) -> Self {
        let mut b = [0u8; 4];
        b.copy_from_slice(bytes);
        u32::from_le_bytes(b)
    }
}

impl PropValue for glam::Vec2 {
    const TYPE_NAME: &'static str = "vec2";
    const SIZE: usize = 8;

    fn write_to(self, bytes: &mut [u8]) {
        bytes[..4].copy_from_slice(&self.x.to_le_bytes());
        bytes[4..8].copy_from_slice(&self.y.to_le_bytes());
    }

    fn read_from(bytes: &[u8]) -> Self {
        glam::vec2(f32::read_from(&bytes[..4]), f32::read_from(&bytes[4..8]))
    }
}

impl PropValue for glam::Vec3 {
    const TYPE_NAME: &'static str = "vec3";
    const SIZE: usize = 12;

    fn write_to(self, bytes: &mut [u8]) {
        bytes[..4].copy_from_slice(&self.x.to_le_bytes());
        bytes[4..8].copy_from_slice(&self.y.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.z.to_le_bytes());
    }

    fn read_from(bytes: &[u8]) -> Self {
        glam::vec3(
            f32::read_from(&bytes[..4]),
            f32::read_from(&bytes[4..8]),
            f32::read_from(&bytes[8..12]),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PropState {
    /// Committed, with a live column.
    Stored,
    /// Declared, storage arrives at the next commit.
    Added,
    /// Marked for removal at the next commit.
    Deleted,
}

const UNSET: u32 = u32::MAX;

#[derive(Debug, Clone)]
pub(crate) struct PropRecord {
    pub(crate) name: Token,
    pub(crate) ty: Token,
    pub(crate) size: usize,
    pub(crate) default: Vec<u8>,
    pub(crate) state: PropState,
    pub(crate) column: u32,
}

/// Property storage for one element kind. The schema is a list of records,
/// each committed record owning one byte column with a value per element
/// slot. Declaring or removing properties only edits the schema; storage
/// changes happen in one migration when the table is committed.
pub(crate) struct PropTable<H> {
    records: Vec<PropRecord>,
    columns: Vec<Vec<u8>>,
    by_name: HashMap<Token, u32>,
    rows: usize,
    dirty: bool,
    r#gen: u32,
    _phantom: PhantomData<H>,
}

enum CopyOp {
    Carry { from: u32 },
    Fill,
    Zero,
}

impl<H> PropTable<H>
where
    H: Handle,
{
    pub fn new() -> Self {
        PropTable {
            records: Vec::new(),
            columns: Vec::new(),
            by_name: HashMap::new(),
            rows: 0,
            dirty: false,
            r#gen: 0,
            _phantom: PhantomData,
        }
    }

    pub fn generation(&self) -> u32 {
        self.r#gen
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn count(&self) -> usize {
        self.records.len()
    }

    pub fn record(&self, i: usize) -> &PropRecord {
        &self.records[i]
    }

    pub fn records(&self) -> &[PropRecord] {
        &self.records
    }

    /// The committed record position for a name, if any. Pending additions
    /// are invisible until the next commit.
    pub fn find(&self, name: Token) -> Option<u32> {
        self.by_name.get(&name).copied()
    }

    pub fn add(&mut self, name: Token, ty: Token, size: usize, default: &[u8]) {
        assert_eq!(
            default.len(),
            size,
            "default value has {} bytes for a property of size {}",
            default.len(),
            size
        );
        self.records.push(PropRecord {
            name,
            ty,
            size,
            default: default.to_vec(),
            state: PropState::Added,
            column: UNSET,
        });
        self.dirty = true;
    }

    pub fn remove(&mut self, name: Token) {
        for rec in self.records.iter_mut() {
            if rec.name == name {
                rec.state = PropState::Deleted;
                self.dirty = true;
            }
        }
    }

    /// Write committed defaults into row `slot`, growing the columns when the
    /// slot is new. Called for every element creation, including ones that
    /// reuse a vacant slot.
    pub fn ensure_row(&mut self, slot: u32) {
        let slot = slot as usize;
        if slot >= self.rows {
            debug_assert_eq!(slot, self.rows);
            self.rows = slot + 1;
            for rec in &self.records {
                if rec.column != UNSET {
                    self.columns[rec.column as usize].resize(self.rows * rec.size, 0);
                }
            }
        }
        for rec in &self.records {
            if rec.column != UNSET {
                self.columns[rec.column as usize][slot * rec.size..(slot + 1) * rec.size]
                    .copy_from_slice(&rec.default);
            }
        }
    }

    /// Apply all pending schema changes in one migration. Surviving columns
    /// move as a whole, added properties get a fresh column filled with their
    /// default when `use_default` is set and zeroed otherwise, and removed
    /// columns are dropped. Does nothing when no changes are pending.
    pub fn commit(&mut self, use_default: bool) {
        if !self.dirty {
            return;
        }
        let mut program = Vec::with_capacity(self.records.len());
        let mut survivors = Vec::with_capacity(self.records.len());
        for rec in self.records.drain(..) {
            match rec.state {
                PropState::Deleted => {}
                PropState::Stored => {
                    program.push(CopyOp::Carry { from: rec.column });
                    survivors.push(rec);
                }
                PropState::Added => {
                    program.push(if use_default { CopyOp::Fill } else { CopyOp::Zero });
                    survivors.push(rec);
                }
            }
        }
        let mut old: Vec<Option<Vec<u8>>> =
            std::mem::take(&mut self.columns).into_iter().map(Some).collect();
        for (i, (op, rec)) in program.iter().zip(survivors.iter_mut()).enumerate() {
            let col = match op {
                CopyOp::Carry { from } => old[*from as usize]
                    .take()
                    .expect("a column was claimed twice during a schema commit"),
                CopyOp::Fill => {
                    let mut col = vec![0u8; self.rows * rec.size];
                    for row in col.chunks_exact_mut(rec.size) {
                        row.copy_from_slice(&rec.default);
                    }
                    col
                }
                CopyOp::Zero => vec![0u8; self.rows * rec.size],
            };
            rec.column = i as u32;
            rec.state = PropState::Stored;
            self.columns.push(col);
        }
        self.records = survivors;
        self.by_name.clear();
        for (i, rec) in self.records.iter().enumerate() {
            self.by_name.insert(rec.name, i as u32);
        }
        self.dirty = false;
        self.r#gen += 1;
    }

    pub fn get<T: PropValue>(&self, col: u32, slot: u32) -> T {
        T::read_from(&self.columns[col as usize][slot as usize * T::SIZE..][..T::SIZE])
    }

    pub fn set<T: PropValue>(&mut self, col: u32, slot: u32, val: T) {
        val.write_to(&mut self.columns[col as usize][slot as usize * T::SIZE..][..T::SIZE]);
    }

    pub fn read_raw(&self, col: u32, slot: u32, size: usize) -> &[u8] {
        &self.columns[col as usize][slot as usize * size..][..size]
    }

    pub fn write_raw(&mut self, col: u32, slot: u32, bytes: &[u8]) {
        self.columns[col as usize][slot as usize * bytes.len()..][..bytes.len()]
            .copy_from_slice(bytes);
    }

    /// Copy every stored value from one row to another.
    pub fn copy_row(&mut self, from: u32, to: u32) {
        for rec in &self.records {
            if rec.column == UNSET {
                continue;
            }
            let col = &mut self.columns[rec.column as usize];
            let (from, to) = (from as usize * rec.size, to as usize * rec.size);
            col.copy_within(from..from + rec.size, to);
        }
    }

    pub fn clear_rows(&mut self) {
        self.rows = 0;
        for col in &mut self.columns {
            col.clear();
        }
    }
}

/// A typed accessor for one committed property. Cheap to copy and to pass
/// around. The accessor is pinned to the schema revision it was bound
/// against; committing the schema again makes it stale, and using a stale or
/// unbound accessor panics.
pub struct Prop<H, T> {
    col: u32,
    r#gen: u32,
    _phantom: PhantomData<(H, T)>,
}

impl<H, T> Clone for Prop<H, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<H, T> Copy for Prop<H, T> {}

pub type VProp<T> = Prop<VH, T>;
pub type EProp<T> = Prop<EH, T>;
pub type FProp<T> = Prop<FH, T>;

impl<H, T> Prop<H, T> {
    /// The accessor that refers to nothing. Binding a name that is not in
    /// the committed schema returns this.
    pub const UNBOUND: Self = Prop {
        col: UNSET,
        r#gen: 0,
        _phantom: PhantomData,
    };

    pub fn is_bound(&self) -> bool {
        self.col != UNSET
    }

    fn check(&self, r#gen: u32) {
        assert!(self.is_bound(), "the property accessor is unbound");
        assert!(
            self.r#gen == r#gen,
            "the property accessor is stale, the schema was committed after it was bound"
        );
    }
}

fn bind<H, T>(rec: &PropRecord, r#gen: u32) -> Prop<H, T>
where
    T: PropValue,
{
    assert_eq!(
        rec.size,
        T::SIZE,
        "property of size {} bound with a type of size {}",
        rec.size,
        T::SIZE
    );
    Prop {
        col: rec.column,
        r#gen,
        _phantom: PhantomData,
    }
}

impl<T: PropValue> VProp<T> {
    pub fn get(&self, mesh: &Mesh, v: VH) -> T {
        self.check(mesh.vprops.generation());
        assert!(mesh.is_live_vertex(v), "reading a property of dead {}", v);
        mesh.vprops.get(self.col, v.index())
    }

    pub fn set(&self, mesh: &mut Mesh, v: VH, val: T) {
        self.check(mesh.vprops.generation());
        assert!(mesh.is_live_vertex(v), "writing a property of dead {}", v);
        mesh.vprops.set(self.col, v.index(), val);
    }
}

impl<T: PropValue> EProp<T> {
    pub fn get(&self, mesh: &Mesh, e: EH) -> T {
        self.check(mesh.eprops.generation());
        assert!(mesh.is_live_edge(e), "reading a property of dead {}", e);
        mesh.eprops.get(self.col, e.index())
    }

    pub fn set(&self, mesh: &mut Mesh, e: EH, val: T) {
        self.check(mesh.eprops.generation());
        assert!(mesh.is_live_edge(e), "writing a property of dead {}", e);
        mesh.eprops.set(self.col, e.index(), val);
    }
}

impl<T: PropValue> FProp<T> {
    pub fn get(&self, mesh: &Mesh, f: FH) -> T {
        self.check(mesh.fprops.generation());
        assert!(mesh.is_live_face(f), "reading a property of dead {}", f);
        mesh.fprops.get(self.col, f.index())
    }

    pub fn set(&self, mesh: &mut Mesh, f: FH, val: T) {
        self.check(mesh.fprops.generation());
        assert!(mesh.is_live_face(f), "writing a property of dead {}", f);
        mesh.fprops.set(self.col, f.index(), val);
    }
}

impl Mesh {
    fn intern_prop<T: PropValue>(&self, name: &str) -> (Token, Token) {
        let mut tt = self.require_tokens().borrow_mut();
        (tt.intern(name), tt.intern(T::TYPE_NAME))
    }

    /// Declare a vertex property. The property has no storage until the next
    /// [`commit_props`](Self::commit_props). The same name can be declared
    /// more than once. Panics when the mesh has no token table.
    pub fn add_vertex_prop<T: PropValue>(&mut self, name: &str, default: T) -> Token {
        let (name, ty) = self.intern_prop::<T>(name);
        let mut bytes = vec![0u8; T::SIZE];
        default.write_to(&mut bytes);
        self.vprops.add(name, ty, T::SIZE, &bytes);
        name
    }

    pub fn add_edge_prop<T: PropValue>(&mut self, name: &str, default: T) -> Token {
        let (name, ty) = self.intern_prop::<T>(name);
        let mut bytes = vec![0u8; T::SIZE];
        default.write_to(&mut bytes);
        self.eprops.add(name, ty, T::SIZE, &bytes);
        name
    }

    pub fn add_face_prop<T: PropValue>(&mut self, name: &str, default: T) -> Token {
        let (name, ty) = self.intern_prop::<T>(name);
        let mut bytes = vec![0u8; T::SIZE];
        default.write_to(&mut bytes);
        self.fprops.add(name, ty, T::SIZE, &bytes);
        name
    }

    /// Declare a vertex property from raw schema parts. Meant for codecs
    /// that carry schemas of types this crate has no `PropValue` for.
    pub fn add_vertex_prop_raw(&mut self, name: Token, ty: Token, size: usize, default: &[u8]) {
        self.vprops.add(name, ty, size, default);
    }

    pub fn add_edge_prop_raw(&mut self, name: Token, ty: Token, size: usize, default: &[u8]) {
        self.eprops.add(name, ty, size, default);
    }

    pub fn add_face_prop_raw(&mut self, name: Token, ty: Token, size: usize, default: &[u8]) {
        self.fprops.add(name, ty, size, default);
    }

    /// Mark every vertex property with this name for removal at the next
    /// commit.
    pub fn remove_vertex_prop(&mut self, name: &str) {
        let tok = self.require_tokens().borrow().lookup(name);
        if let Some(tok) = tok {
            self.vprops.remove(tok);
        }
    }

    pub fn remove_edge_prop(&mut self, name: &str) {
        let tok = self.require_tokens().borrow().lookup(name);
        if let Some(tok) = tok {
            self.eprops.remove(tok);
        }
    }

    pub fn remove_face_prop(&mut self, name: &str) {
        let tok = self.require_tokens().borrow().lookup(name);
        if let Some(tok) = tok {
            self.fprops.remove(tok);
        }
    }

    /// Apply the pending schema changes of all three element kinds. With
    /// `use_default` set, added properties start out at their default value
    /// on every existing element; otherwise their columns start out zeroed.
    /// Kinds with no pending changes are untouched, so committing twice is
    /// the same as committing once.
    pub fn commit_props(&mut self, use_default: bool) {
        self.vprops.commit(use_default);
        self.eprops.commit(use_default);
        self.fprops.commit(use_default);
    }

    /// Bind a typed accessor to a committed vertex property. Returns
    /// [`Prop::UNBOUND`] when no committed property has this name. Panics
    /// when the property's size does not match `T`.
    pub fn vertex_prop<T: PropValue>(&self, name: &str) -> VProp<T> {
        let tok = self.require_tokens().borrow().lookup(name);
        match tok.and_then(|t| self.vprops.find(t)) {
            Some(i) => bind(self.vprops.record(i as usize), self.vprops.generation()),
            None => Prop::UNBOUND,
        }
    }

    pub fn edge_prop<T: PropValue>(&self, name: &str) -> EProp<T> {
        let tok = self.require_tokens().borrow().lookup(name);
        match tok.and_then(|t| self.eprops.find(t)) {
            Some(i) => bind(self.eprops.record(i as usize), self.eprops.generation()),
            None => Prop::UNBOUND,
        }
    }

    pub fn face_prop<T: PropValue>(&self, name: &str) -> FProp<T> {
        let tok = self.require_tokens().borrow().lookup(name);
        match tok.and_then(|t| self.fprops.find(t)) {
            Some(i) => bind(self.fprops.record(i as usize), self.fprops.generation()),
            None => Prop::UNBOUND,
        }
    }

    /// The number of vertex property records, committed and pending.
    pub fn num_vertex_props(&self) -> usize {
        self.vprops.count()
    }

    pub fn num_edge_props(&self) -> usize {
        self.eprops.count()
    }

    pub fn num_face_props(&self) -> usize {
        self.fprops.count()
    }

    /// The record position of the committed vertex property with this name,
    /// usable with the reflection calls below. `None` when no such property
    /// exists, also on a mesh without a token table.
    pub fn vertex_prop_index(&self, name: &str) -> Option<usize> {
        let tok = self.tokens.as_ref()?.borrow().lookup(name)?;
        self.vprops.find(tok).map(|i| i as usize)
    }

    pub fn edge_prop_index(&self, name: &str) -> Option<usize> {
        let tok = self.tokens.as_ref()?.borrow().lookup(name)?;
        self.eprops.find(tok).map(|i| i as usize)
    }

    pub fn face_prop_index(&self, name: &str) -> Option<usize> {
        let tok = self.tokens.as_ref()?.borrow().lookup(name)?;
        self.fprops.find(tok).map(|i| i as usize)
    }

    /// Whether a committed vertex property with this name exists.
    pub fn vertex_prop_exists(&self, name: &str) -> bool {
        self.vertex_prop_index(name).is_some()
    }

    pub fn edge_prop_exists(&self, name: &str) -> bool {
        self.edge_prop_index(name).is_some()
    }

    pub fn face_prop_exists(&self, name: &str) -> bool {
        self.face_prop_index(name).is_some()
    }

    /// Schema reflection by record position: name, type tag, value size and
    /// default bytes of the `i`th vertex property record.
    pub fn vertex_prop_name(&self, i: usize) -> Token {
        self.vprops.record(i).name
    }

    pub fn vertex_prop_type(&self, i: usize) -> Token {
        self.vprops.record(i).ty
    }

    pub fn vertex_prop_size(&self, i: usize) -> usize {
        self.vprops.record(i).size
    }

    pub fn vertex_prop_default(&self, i: usize) -> &[u8] {
        &self.vprops.record(i).default
    }

    pub fn edge_prop_name(&self, i: usize) -> Token {
        self.eprops.record(i).name
    }

    pub fn edge_prop_type(&self, i: usize) -> Token {
        self.eprops.record(i).ty
    }

    pub fn edge_prop_size(&self, i: usize) -> usize {
        self.eprops.record(i).size
    }

    pub fn edge_prop_default(&self, i: usize) -> &[u8] {
        &self.eprops.record(i).default
    }

    pub fn face_prop_name(&self, i: usize) -> Token {
        self.fprops.record(i).name
    }

    pub fn face_prop_type(&self, i: usize) -> Token {
        self.fprops.record(i).ty
    }

    pub fn face_prop_size(&self, i: usize) -> usize {
        self.fprops.record(i).size
    }

    pub fn face_prop_default(&self, i: usize) -> &[u8] {
        &self.fprops.record(i).default
    }

    /// Copy all committed vertex properties from one vertex to another.
    pub fn copy_vertex_props(&mut self, from: VH, to: VH) {
        assert!(
            self.is_live_vertex(from) && self.is_live_vertex(to),
            "copying properties between dead vertices"
        );
        self.vprops.copy_row(from.index(), to.index());
    }

    pub fn copy_edge_props(&mut self, from: EH, to: EH) {
        assert!(
            self.is_live_edge(from) && self.is_live_edge(to),
            "copying properties between dead edges"
        );
        self.eprops.copy_row(from.index(), to.index());
    }

    pub fn copy_face_props(&mut self, from: FH, to: FH) {
        assert!(
            self.is_live_face(from) && self.is_live_face(to),
            "copying properties between dead faces"
        );
        self.fprops.copy_row(from.index(), to.index());
    }
}

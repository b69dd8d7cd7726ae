/*!
A halfedge based polygon mesh library for meshes that are not necessarily
manifold. Any number of faces can share an edge, edges can exist without
faces, and vertices can exist without edges, so wire frames, medial
structures and partially built meshes are all representable directly.

# Overview

+ The connectivity lives in four arenas of vertices, edges, loops and faces,
  addressed by small copyable handles ([`VH`], [`HH`], [`EH`], [`LH`],
  [`FH`]). Deleting an element leaves a hole that a later creation reuses,
  and only the handles of deleted elements become invalid.

+ Instead of the manifold halfedge rule of at most one face per halfedge,
  every halfedge keeps a radial list of the face boundary loops running
  along it. A mesh where every edge has one or two faces with agreeing
  windings is an ordinary manifold mesh, but nothing in the API requires
  that.

+ Vertices, edges and faces carry named runtime properties of any
  [`PropValue`] type. Declarations and removals are buffered and applied by
  a single [commit](Mesh::commit_props), which migrates the column storage
  in one pass. Names are interned in a [`TokenTable`] that can be shared
  between meshes, which is what [`MeshTransfer`] builds on to move property
  values from one mesh to another.

+ Meshes convert to and from flat byte tables ([`MeshTables`]) in which the
  connectivity and all committed properties travel together, and they read
  and write Wavefront OBJ files.

+ Edits keep the structure consistent through arbitrary non manifold
  situations: vertex merging ([`Mesh::fire`]), pruning, triangulation and
  face reversal, with the predicates [`Mesh::safe_contraction`] and
  [`Mesh::safe_move`] for vetting geometry changes before making them.
  [`Mesh::check`] validates the entire structure.

Positions and vector math use the
[`glam`](https://crates.io/crates/glam) crate.
*/

mod arena;
mod check;
mod edit;
mod element;
mod error;
mod iterator;
mod macros;
mod mesh;
mod obj;
mod property;
mod store;
mod token;
mod transfer;
mod triangulate;

pub use element::{EH, FH, HH, Handle, LH, VH};
pub use error::Error;
pub use mesh::Mesh;
pub use property::{EProp, FProp, Prop, PropValue, VProp};
pub use store::{Field, MeshTables, Table};
pub use token::{Token, TokenTable, Tokens};
pub use transfer::MeshTransfer;

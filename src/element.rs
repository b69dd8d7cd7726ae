use std::fmt::{Debug, Display};

/**
 * All elements of the mesh implement this trait. They are identified by their
 * index.
 */
pub trait Handle {
    /**
     * The index of the element.
     */
    fn index(&self) -> u32;
}

/**
 * Vertex handle.
 */
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VH {
    idx: u32,
}

/**
 * Halfedge handle. The two directions of an edge are indexed `2 * e` and
 * `2 * e + 1`.
 */
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HH {
    idx: u32,
}

/**
 * Edge handle.
 */
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EH {
    idx: u32,
}

/**
 * Loop handle. A loop is one traversal of a face boundary along a specific
 * halfedge. Several loops can run along the same halfedge when more than two
 * faces share an edge.
 */
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LH {
    idx: u32,
}

/**
 * Face handle.
 */
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FH {
    idx: u32,
}

impl Handle for VH {
    fn index(&self) -> u32 {
        self.idx
    }
}

impl From<u32> for VH {
    fn from(idx: u32) -> Self {
        VH { idx }
    }
}

impl From<&u32> for VH {
    fn from(idx: &u32) -> Self {
        VH { idx: *idx }
    }
}

impl Handle for HH {
    fn index(&self) -> u32 {
        self.idx
    }
}

impl From<u32> for HH {
    fn from(idx: u32) -> Self {
        HH { idx }
    }
}

impl From<&u32> for HH {
    fn from(idx: &u32) -> Self {
        HH { idx: *idx }
    }
}

impl Handle for EH {
    fn index(&self) -> u32 {
        self.idx
    }
}

impl From<u32> for EH {
    fn from(idx: u32) -> Self {
        EH { idx }
    }
}

impl From<&u32> for EH {
    fn from(idx: &u32) -> Self {
        EH { idx: *idx }
    }
}

impl Handle for LH {
    fn index(&self) -> u32 {
        self.idx
    }
}

impl From<u32> for LH {
    fn from(idx: u32) -> Self {
        LH { idx }
    }
}

impl From<&u32> for LH {
    fn from(idx: &u32) -> Self {
        LH { idx: *idx }
    }
}

impl Handle for FH {
    fn index(&self) -> u32 {
        self.idx
    }
}

impl From<u32> for FH {
    fn from(idx: u32) -> Self {
        FH { idx }
    }
}

impl From<&u32> for FH {
    fn from(idx: &u32) -> Self {
        FH { idx: *idx }
    }
}

impl HH {
    /// The halfedge running along the same edge in the other direction.
    pub fn opposite(self) -> HH {
        HH { idx: self.idx ^ 1 }
    }

    /// The edge this halfedge belongs to.
    pub fn edge(self) -> EH {
        EH { idx: self.idx >> 1 }
    }

    /// Which of the two directions of its edge this halfedge is.
    pub fn flag(self) -> bool {
        (self.idx & 1) == 1
    }
}

impl EH {
    pub fn halfedges(self) -> (HH, HH) {
        let hi = self.idx << 1;
        (hi.into(), (hi | 1).into())
    }

    pub fn halfedge(self, flag: bool) -> HH {
        ((self.idx << 1) | if flag { 1 } else { 0 }).into()
    }
}

impl Display for VH {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VH({})", self.index())
    }
}

impl Display for HH {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HH({})", self.index())
    }
}

impl Display for EH {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EH({})", self.index())
    }
}

impl Display for LH {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LH({})", self.index())
    }
}

impl Display for FH {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FH({})", self.index())
    }
}

impl Debug for VH {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VH({})", self.index())
    }
}

impl Debug for HH {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HH({})", self.index())
    }
}

impl Debug for EH {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EH({})", self.index())
    }
}

impl Debug for LH {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LH({})", self.index())
    }
}

impl Debug for FH {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FH({})", self.index())
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Vertex {
    pub(crate) point: glam::Vec3,
    pub(crate) halfedge: Option<HH>,
    pub(crate) seq: u32,
}

/// One direction of an edge. `next` and `prev` link the outgoing halfedges of
/// the tail vertex into a closed ring. `loops` holds every face boundary loop
/// running along this direction.
#[derive(Debug, Clone)]
pub(crate) struct Halfedge {
    pub(crate) head: VH,
    pub(crate) next: HH,
    pub(crate) prev: HH,
    pub(crate) loops: Vec<LH>,
}

#[derive(Debug, Clone)]
pub(crate) struct Edge {
    pub(crate) halfedges: [Halfedge; 2],
    pub(crate) seq: u32,
}

/// One segment of a face boundary. `next` chains the segments of one face
/// into a closed singly linked cycle whose length equals the face size.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Loop {
    pub(crate) face: FH,
    pub(crate) halfedge: HH,
    pub(crate) next: LH,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Face {
    pub(crate) start: LH,
    pub(crate) size: u32,
    pub(crate) seq: u32,
}

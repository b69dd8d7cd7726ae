use std::path::PathBuf;

use crate::element::{EH, FH, LH, VH};

#[derive(Debug)]
pub enum Error {
    // Tables.
    MissingTableField(String),
    FieldSizeMismatch(String, usize, usize),
    FieldDataLength(String, usize, usize),
    InvalidVertexIndex(u32),
    InvalidFaceOffset(u32),
    DegenerateTableEdge(usize),
    FaceTooSmall(usize),
    // Obj.
    InvalidObjFile(PathBuf),
    ObjLoadFailed(String),
    IncorrectNumberOfCoordinates(usize),
    Io(std::io::Error),
    // Topology checks.
    DeadVertex(VH),
    DeadEdge(EH),
    DeadLoop(LH),
    DeadFace(FH),
    DegenerateEdge(EH),
    InvalidOutgoingHalfedge(VH),
    BrokenVertexRing(VH),
    BrokenFaceChain(FH),
    FaceSizeMismatch(FH),
    MissingRadialLoop(LH),
    WrongLoopFace(LH),
    OrphanLoop(LH),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

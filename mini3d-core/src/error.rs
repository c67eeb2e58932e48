//! Typed failures, one enum per concern.
//!
//! Precondition violations and parse errors fail fast and are never
//! retried; numerical degeneracy inside the pipeline is handled locally
//! with defined fallbacks and never surfaces here, with the single
//! exception of matrix inversion.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Construction-time mesh invariant violations.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("mesh must have at least one vertex")]
    Empty,
    #[error(
        "attribute length mismatch: {positions} positions, {texcoords} texcoords, {normals} normals"
    )]
    AttributeMismatch {
        positions: usize,
        texcoords: usize,
        normals: usize,
    },
    #[error("index count {0} is not a multiple of 3")]
    IndexCount(usize),
    #[error("vertex index {index} out of range (vertex count {count})")]
    IndexOutOfRange { index: u32, count: usize },
}

/// Matrix inversion on a singular matrix. A hard error: callers rely on
/// a valid inverse and must not fall back.
#[derive(Debug, Error)]
pub enum MatrixError {
    #[error("singular matrix (det = {det:e})")]
    Singular { det: f64 },
}

/// OBJ import/export failures. A parse error aborts the whole import;
/// no partial mesh is ever returned.
#[derive(Debug, Error)]
pub enum ObjError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("line {line}: vertex reference {value} out of range ({count} elements so far)")]
    IndexOutOfRange {
        line: usize,
        value: i64,
        count: usize,
    },
    #[error(transparent)]
    Mesh(#[from] MeshError),
    #[error("write failed: {0}")]
    Write(#[from] io::Error),
}

/// Render precondition violations.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("framebuffer size must be at least 2x2 (got {width}x{height})")]
    BadSize { width: usize, height: usize },
}

/// Texture construction failures.
#[derive(Debug, Error)]
pub enum TextureError {
    #[error("texture must be at least 1x1")]
    ZeroSize,
    #[error("pixel buffer length {actual} does not match {width}x{height}")]
    SizeMismatch {
        width: usize,
        height: usize,
        actual: usize,
    },
}

/// Pixel filter precondition violations.
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("pixel buffer length {actual} does not match {width}x{height}")]
    SizeMismatch {
        width: usize,
        height: usize,
        actual: usize,
    },
}

//! Typed errors for sample setup.
//!
//! Asset IO goes through `anyhow` with context; anything the host loop needs to
//! tell apart is a [`SampleError`].

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SampleError {
    #[error("could not compile shader `{label}`:\n{message}")]
    Shader { label: String, message: String },

    #[error("could not create pipeline `{label}`: {message}")]
    Pipeline { label: String, message: String },

    #[error("{path}:{line}:{column}: `{cell}` is not an integer")]
    Csv {
        path: PathBuf,
        line: usize,
        column: usize,
        cell: String,
    },

    #[error("voxel slice {path} is {rows}x{columns}, expected at least {expected}x{expected}")]
    SliceTooSmall {
        path: PathBuf,
        rows: usize,
        columns: usize,
        expected: usize,
    },

    #[error("no suitable GPU adapter found")]
    Adapter,

    #[error("unknown sample `{0}`, expected one of triangle, cube, instanced, voxels, particles")]
    UnknownSample(String),
}

pub type SampleResult<T> = Result<T, SampleError>;

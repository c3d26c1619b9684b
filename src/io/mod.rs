//! Reading and writing of the file formats used around the tree: OFF triangle
//! meshes, point sets, DXF debugging dumps, and leaf occupancy reports.

pub use self::dxf::{write_aabbs_dxf, write_triangles_dxf};
pub use self::off::{parse_mesh, read_mesh};
pub use self::points::{parse_points, read_points, write_points};
pub use self::report::write_report;

mod dxf;
mod off;
mod points;
mod report;

/// Error produced when loading one of the text formats supported by this crate.
#[derive(thiserror::Error, Debug)]
pub enum MeshFileError {
    /// The underlying byte stream could not be read.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// The header is missing or malformed.
    #[error("invalid header: {0}")]
    InvalidHeader(String),
    /// A vertex record is truncated or holds a non-numeric coordinate.
    #[error("invalid vertex record {index}")]
    InvalidVertex {
        /// Position of the offending record, starting at 0.
        index: usize,
    },
    /// A face record is truncated or holds a non-integer index.
    #[error("invalid face record {index}")]
    InvalidFace {
        /// Position of the offending record, starting at 0.
        index: usize,
    },
    /// A face references a vertex that does not exist.
    #[error("face {face} references out-of-range vertex {vertex}")]
    VertexOutOfRange {
        /// Position of the offending face record, starting at 0.
        face: usize,
        /// The out-of-range vertex index.
        vertex: usize,
    },
}

use crate::io::MeshFileError;
use crate::math::{Point, Real, DIM};
use crate::shape::Triangle;
use std::path::Path;

/// Reads a triangle soup from an OFF file.
///
/// See [`parse_mesh`] for the details of the accepted format.
pub fn read_mesh(path: impl AsRef<Path>) -> Result<Vec<Triangle>, MeshFileError> {
    parse_mesh(&std::fs::read_to_string(path)?)
}

/// Parses the content of an OFF file into a triangle soup.
///
/// The format is whitespace-separated: an optional `OFF` magic token, the
/// vertex, face, and edge counts, then the vertex records followed by the face
/// records. Each face record starts with its arity; only the first three
/// vertices of a face are kept, higher-arity faces are not triangulated.
///
/// A file declaring zero vertices or zero faces yields an empty soup.
pub fn parse_mesh(content: &str) -> Result<Vec<Triangle>, MeshFileError> {
    let mut tokens = content.split_whitespace().peekable();

    if tokens.peek() == Some(&"OFF") {
        let _ = tokens.next();
    }

    let num_vertices = next_usize(&mut tokens)
        .ok_or_else(|| MeshFileError::InvalidHeader("expected a vertex count".to_string()))?;
    let num_faces = next_usize(&mut tokens)
        .ok_or_else(|| MeshFileError::InvalidHeader("expected a face count".to_string()))?;
    let _ = next_usize(&mut tokens)
        .ok_or_else(|| MeshFileError::InvalidHeader("expected an edge count".to_string()))?;

    if num_vertices == 0 || num_faces == 0 {
        return Ok(Vec::new());
    }

    let mut vertices = Vec::with_capacity(num_vertices);

    for index in 0..num_vertices {
        let mut coords = [0.0; DIM];

        for coord in &mut coords {
            *coord = next_real(&mut tokens).ok_or(MeshFileError::InvalidVertex { index })?;
        }

        vertices.push(Point::new(coords[0], coords[1], coords[2]));
    }

    let mut triangles = Vec::with_capacity(num_faces);

    for index in 0..num_faces {
        // Arity of the face. Read and discarded, like the fourth and further
        // vertices of higher-arity faces.
        let _ = next_usize(&mut tokens).ok_or(MeshFileError::InvalidFace { index })?;

        let mut ids = [0usize; 3];

        for id in &mut ids {
            *id = next_usize(&mut tokens).ok_or(MeshFileError::InvalidFace { index })?;
        }

        for id in ids {
            if id >= vertices.len() {
                return Err(MeshFileError::VertexOutOfRange {
                    face: index,
                    vertex: id,
                });
            }
        }

        triangles.push(Triangle::new(
            vertices[ids[0]],
            vertices[ids[1]],
            vertices[ids[2]],
        ));
    }

    Ok(triangles)
}

fn next_usize<'a>(tokens: &mut impl Iterator<Item = &'a str>) -> Option<usize> {
    tokens.next().and_then(|token| token.parse().ok())
}

fn next_real<'a>(tokens: &mut impl Iterator<Item = &'a str>) -> Option<Real> {
    tokens.next().and_then(|token| token.parse().ok())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_a_simple_mesh() {
        let content = "OFF\n4 2 0\n0 0 0\n1 0 0\n0 1 0\n0 0 1\n3 0 1 2\n3 0 2 3\n";
        let triangles = parse_mesh(content).unwrap();

        assert_eq!(triangles.len(), 2);
        assert_eq!(triangles[0].b, Point::new(1.0, 0.0, 0.0));
        assert_eq!(triangles[1].c, Point::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn magic_token_is_optional() {
        let with_magic = parse_mesh("OFF 3 1 0  0 0 0  1 0 0  0 1 0  3 0 1 2").unwrap();
        let without_magic = parse_mesh("3 1 0  0 0 0  1 0 0  0 1 0  3 0 1 2").unwrap();
        assert_eq!(with_magic, without_magic);
        assert_eq!(with_magic.len(), 1);
    }

    #[test]
    fn zero_counts_yield_an_empty_mesh() {
        assert!(parse_mesh("0 0 0").unwrap().is_empty());
        assert!(parse_mesh("OFF\n3 0 0\n0 0 0\n1 0 0\n0 1 0\n").unwrap().is_empty());
    }

    #[test]
    fn malformed_input_is_reported() {
        assert!(matches!(
            parse_mesh(""),
            Err(MeshFileError::InvalidHeader(_))
        ));
        assert!(matches!(
            parse_mesh("OFF x 1 0"),
            Err(MeshFileError::InvalidHeader(_))
        ));
        assert!(matches!(
            parse_mesh("3 1 0  0 0 oops  1 0 0  0 1 0  3 0 1 2"),
            Err(MeshFileError::InvalidVertex { index: 0 })
        ));
        assert!(matches!(
            parse_mesh("3 1 0  0 0 0  1 0 0  0 1 0  3 0 1"),
            Err(MeshFileError::InvalidFace { index: 0 })
        ));
        assert!(matches!(
            parse_mesh("3 1 0  0 0 0  1 0 0  0 1 0  3 0 1 7"),
            Err(MeshFileError::VertexOutOfRange { face: 0, vertex: 7 })
        ));
    }
}

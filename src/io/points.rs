use crate::io::MeshFileError;
use crate::math::{Point, Real, DIM};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Writes a point set: the number of points, then one `x y z` record per line.
///
/// Coordinates are written with their shortest exact decimal representation,
/// so reading the file back with [`read_points`] restores them bit-for-bit.
pub fn write_points(path: impl AsRef<Path>, points: &[Point<Real>]) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_points_to(&mut out, points)?;
    out.flush()
}

/// Reads a point set written by [`write_points`].
pub fn read_points(path: impl AsRef<Path>) -> Result<Vec<Point<Real>>, MeshFileError> {
    parse_points(&std::fs::read_to_string(path)?)
}

/// Parses a point set: a point count followed by that many coordinate triplets,
/// all whitespace-separated.
pub fn parse_points(content: &str) -> Result<Vec<Point<Real>>, MeshFileError> {
    let mut tokens = content.split_whitespace();
    let num_points: usize = tokens
        .next()
        .and_then(|token| token.parse().ok())
        .ok_or_else(|| MeshFileError::InvalidHeader("expected a point count".to_string()))?;

    let mut points = Vec::with_capacity(num_points);

    for index in 0..num_points {
        let mut coords = [0.0; DIM];

        for coord in &mut coords {
            *coord = tokens
                .next()
                .and_then(|token| token.parse().ok())
                .ok_or(MeshFileError::InvalidVertex { index })?;
        }

        points.push(Point::new(coords[0], coords[1], coords[2]));
    }

    Ok(points)
}

fn write_points_to<W: Write>(out: &mut W, points: &[Point<Real>]) -> io::Result<()> {
    writeln!(out, "{}", points.len())?;

    for point in points {
        writeln!(out, "{} {} {}", point.x, point.y, point.z)?;
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn points_survive_a_round_trip_exactly() {
        let points = vec![
            Point::new(0.1 + 0.2, -1.0 / 3.0, 1.0e-30),
            Point::new(12345.678901234567, 0.0, -0.0),
            Point::new(Real::MIN_POSITIVE, Real::MAX, 42.0),
        ];

        let mut out = Vec::new();
        write_points_to(&mut out, &points).unwrap();
        let reread = parse_points(&String::from_utf8(out).unwrap()).unwrap();

        assert_eq!(points, reread);
    }

    #[test]
    fn truncated_input_is_reported() {
        assert!(matches!(
            parse_points(""),
            Err(MeshFileError::InvalidHeader(_))
        ));
        assert!(matches!(
            parse_points("2  0 0 0  1 1"),
            Err(MeshFileError::InvalidVertex { index: 1 })
        ));
    }
}

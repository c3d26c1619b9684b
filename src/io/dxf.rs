use crate::bounding_volume::Aabb;
use crate::math::{Point, Real};
use crate::shape::Triangle;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Writes one wireframe box per AABB into a minimal DXF file.
///
/// The resulting file holds a single `ENTITIES` section of `LINE` entities,
/// twelve per box, which most CAD viewers open directly. Dumping the leaves of
/// a tree this way is a convenient way to inspect how it partitions space.
pub fn write_aabbs_dxf<'a, I>(path: impl AsRef<Path>, aabbs: I) -> io::Result<()>
where
    I: IntoIterator<Item = &'a Aabb>,
{
    let mut out = BufWriter::new(File::create(path)?);
    write_aabbs(&mut out, aabbs)?;
    out.flush()
}

/// Writes one `3DFACE` entity per triangle into a minimal DXF file.
pub fn write_triangles_dxf<'a, I>(path: impl AsRef<Path>, triangles: I) -> io::Result<()>
where
    I: IntoIterator<Item = &'a Triangle>,
{
    let mut out = BufWriter::new(File::create(path)?);
    write_triangles(&mut out, triangles)?;
    out.flush()
}

fn write_aabbs<'a, W, I>(out: &mut W, aabbs: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Aabb>,
{
    write_header(out)?;

    for aabb in aabbs {
        let vertices = aabb.vertices();

        for (i, j) in Aabb::EDGES_VERTEX_IDS {
            write_line(out, &vertices[i], &vertices[j])?;
        }
    }

    write_footer(out)
}

fn write_triangles<'a, W, I>(out: &mut W, triangles: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Triangle>,
{
    write_header(out)?;

    for triangle in triangles {
        write_face(out, triangle)?;
    }

    write_footer(out)
}

// Every entity ends with its own `0` group code, so the separator preceding
// the next entity name is already in the stream. The header ends with one for
// the first entity, and the footer starts without one for the same reason.
fn write_header<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "0\nSECTION\n2\nENTITIES\n0")
}

fn write_footer<W: Write>(out: &mut W) -> io::Result<()> {
    write!(out, "ENDSEC\n0\nEOF")
}

fn write_line<W: Write>(out: &mut W, a: &Point<Real>, b: &Point<Real>) -> io::Result<()> {
    writeln!(out, "LINE\n8\n0")?;
    writeln!(out, "10\n{:.6}\n20\n{:.6}\n30\n{:.6}", a.x, a.y, a.z)?;
    writeln!(out, "11\n{:.6}\n21\n{:.6}\n31\n{:.6}", b.x, b.y, b.z)?;
    writeln!(out, "0")
}

fn write_face<W: Write>(out: &mut W, triangle: &Triangle) -> io::Result<()> {
    let (a, b, c) = (&triangle.a, &triangle.b, &triangle.c);

    writeln!(out, "3DFACE\n8\n0")?;
    writeln!(out, "10\n{:.6}\n20\n{:.6}\n30\n{:.6}", a.x, a.y, a.z)?;
    writeln!(out, "11\n{:.6}\n21\n{:.6}\n31\n{:.6}", b.x, b.y, b.z)?;
    writeln!(out, "12\n{:.6}\n22\n{:.6}\n32\n{:.6}", c.x, c.y, c.z)?;
    // A 3DFACE has four corners; the last one is repeated for a triangle.
    writeln!(out, "13\n{:.6}\n23\n{:.6}\n33\n{:.6}", c.x, c.y, c.z)?;
    writeln!(out, "0")
}

use crate::partitioning::LeafStats;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::Duration;

/// Writes a short plain-text summary of a tree build.
///
/// The report lists the leaf statistics of the tree and, when provided, the
/// name of the input model and the time the build took. Omitted values simply
/// drop their line from the report.
pub fn write_report(
    path: impl AsRef<Path>,
    model_name: Option<&str>,
    stats: &LeafStats,
    build_time: Option<Duration>,
) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_report_to(&mut out, model_name, stats, build_time)?;
    out.flush()
}

fn write_report_to<W: Write>(
    out: &mut W,
    model_name: Option<&str>,
    stats: &LeafStats,
    build_time: Option<Duration>,
) -> io::Result<()> {
    if let Some(name) = model_name {
        writeln!(out, "{:<16} : {}", "Test Name", name)?;
    }

    writeln!(out, "{:<16} : {}", "NUM LEAFS", stats.num_leaves)?;
    writeln!(out, "{:<16} : {}", "MAX NUM ELEMENTS", stats.max_items)?;
    writeln!(out, "{:<16} : {:.6}", "AVG NUM ELEMENTS", stats.avg_items)?;

    if let Some(time) = build_time {
        writeln!(out, "{:<16} : {} ms", "TIME", time.as_millis())?;
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn full_report_lists_every_attribute() {
        let stats = LeafStats {
            num_leaves: 42,
            max_items: 17,
            avg_items: 3.5,
        };

        let mut out = Vec::new();
        write_report_to(
            &mut out,
            Some("bunny.off"),
            &stats,
            Some(Duration::from_millis(250)),
        )
        .unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Test Name        : bunny.off\n\
             NUM LEAFS        : 42\n\
             MAX NUM ELEMENTS : 17\n\
             AVG NUM ELEMENTS : 3.500000\n\
             TIME             : 250 ms\n"
        );
    }

    #[test]
    fn optional_attributes_are_skipped() {
        let stats = LeafStats {
            num_leaves: 1,
            max_items: 8,
            avg_items: 8.0,
        };

        let mut out = Vec::new();
        write_report_to(&mut out, None, &stats, None).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "NUM LEAFS        : 1\n\
             MAX NUM ELEMENTS : 8\n\
             AVG NUM ELEMENTS : 8.000000\n"
        );
    }
}

use fleche3d::io;
use fleche3d::math::{Point, Real, Vector};
use fleche3d::partitioning::{KdTree, SahSplitter};
use fleche3d::shape::Triangle;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;

const NUM_GENERATED_TRIANGLES: usize = 100_000;
const NUM_QUERY_POINTS: usize = 200_000;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    /*
     * Load the model, or generate a random soup when no path is given.
     */
    let (name, triangles) = match std::env::args().nth(1) {
        Some(path) => {
            let triangles = io::read_mesh(&path)?;
            (path, triangles)
        }
        None => (
            "random soup".to_string(),
            random_soup(NUM_GENERATED_TRIANGLES, 100.0),
        ),
    };

    println!("{}: {} triangles", name, triangles.len());

    /*
     * Build the tree and dump its leaves for inspection.
     */
    let start = Instant::now();
    let tree = KdTree::new(triangles, &SahSplitter)?;
    let build_time = start.elapsed();

    let stats = tree.leaf_stats();
    io::write_report("report.txt", Some(&name), &stats, Some(build_time))?;
    io::write_aabbs_dxf("leaves.dxf", tree.leaves().map(|leaf| leaf.aabb()))?;
    println!(
        "built {} leaves in {:.1?} (report.txt, leaves.dxf)",
        stats.num_leaves, build_time
    );

    /*
     * Query a random point cloud.
     */
    let points = random_points(NUM_QUERY_POINTS, 120.0);
    io::write_points("probes.txt", &points)?;

    let start = Instant::now();
    let results = tree.par_find_nearest(&points);
    let query_time = start.elapsed();
    println!("{} queries in {:.1?}", points.len(), query_time);

    /*
     * Check a sample of the answers against a brute-force scan.
     */
    let mut rng = StdRng::seed_from_u64(5489);

    for _ in 0..16 {
        let i = rng.gen_range(0..points.len());
        let brute = tree
            .items()
            .iter()
            .map(|triangle| triangle.distance_squared_to_point(&points[i]))
            .fold(Real::MAX, Real::min);

        assert!((results[i].distance_squared - brute).abs() <= 1.0e-9 * brute.max(1.0));
    }

    println!("16 sampled answers match a brute-force scan");
    Ok(())
}

fn random_soup(num: usize, extent: Real) -> Vec<Triangle> {
    let mut rng = StdRng::seed_from_u64(1984);
    let size = extent * 0.01;
    let mut coord = move |scale: Real| rng.gen_range(-scale..scale);

    (0..num)
        .map(|_| {
            let center = Point::new(coord(extent), coord(extent), coord(extent));
            Triangle::new(
                center + Vector::new(coord(size), coord(size), coord(size)),
                center + Vector::new(coord(size), coord(size), coord(size)),
                center + Vector::new(coord(size), coord(size), coord(size)),
            )
        })
        .collect()
}

fn random_points(num: usize, extent: Real) -> Vec<Point<Real>> {
    let mut rng = StdRng::seed_from_u64(271_828);
    let mut coord = move || rng.gen_range(-extent..extent);
    (0..num)
        .map(|_| Point::new(coord(), coord(), coord()))
        .collect()
}

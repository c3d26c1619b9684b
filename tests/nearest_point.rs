use fleche3d::math::{Point, Real, Vector};
use fleche3d::partitioning::{KdTree, QueryWorkspace, SahSplitter};
use fleche3d::shape::Triangle;

fn random_triangles(num: usize, extent: Real, seed: u128) -> Vec<Triangle> {
    let mut rng = oorandom::Rand64::new(seed);
    let mut coord = move |scale: Real| (rng.rand_float() * 2.0 - 1.0) * scale;
    let size = extent * 0.05;

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

fn random_points(num: usize, extent: Real, seed: u128) -> Vec<Point<Real>> {
    let mut rng = oorandom::Rand64::new(seed);
    let mut coord = move || (rng.rand_float() * 2.0 - 1.0) * extent;
    (0..num).map(|_| Point::new(coord(), coord(), coord())).collect()
}

fn brute_force_nearest(triangles: &[Triangle], point: &Point<Real>) -> Real {
    triangles
        .iter()
        .map(|triangle| triangle.distance_squared_to_point(point))
        .fold(Real::MAX, Real::min)
}

#[test]
fn queries_match_brute_force_on_a_large_soup() {
    let triangles = random_triangles(1_500, 20.0, 2024);
    let points = random_points(300, 25.0, 77);
    let tree = KdTree::new(triangles.clone(), &SahSplitter).unwrap();
    let mut workspace = QueryWorkspace::new();

    for point in &points {
        let nearest = tree.find_nearest(point, &mut workspace);
        let brute_dist2 = brute_force_nearest(&triangles, point);
        let recomputed = triangles[nearest.item as usize].distance_squared_to_point(point);

        // The reported item must actually realize the minimum distance.
        approx::assert_relative_eq!(
            recomputed,
            brute_dist2,
            epsilon = 1.0e-14,
            max_relative = 1.0e-12
        );
        approx::assert_relative_eq!(
            nearest.distance_squared,
            brute_dist2,
            epsilon = 1.0e-14,
            max_relative = 1.0e-12
        );
    }
}

#[test]
fn one_workspace_serves_many_trees() {
    let small = KdTree::new(random_triangles(40, 5.0, 1), &SahSplitter).unwrap();
    let large = KdTree::new(random_triangles(900, 5.0, 2), &SahSplitter).unwrap();
    let points = random_points(60, 6.0, 3);

    let mut shared = QueryWorkspace::new();

    for point in &points {
        let mut fresh = QueryWorkspace::new();

        // Alternating between trees of very different sizes must not change
        // any result compared to a workspace used once and thrown away.
        assert_eq!(
            large.find_nearest(point, &mut shared),
            large.find_nearest(point, &mut fresh)
        );
        let mut fresh = QueryWorkspace::new();
        assert_eq!(
            small.find_nearest(point, &mut shared),
            small.find_nearest(point, &mut fresh)
        );
    }

    assert!(shared.is_empty());
}

#[test]
fn radius_queries_agree_with_unbounded_queries() {
    let triangles = random_triangles(400, 10.0, 42);
    let tree = KdTree::new(triangles, &SahSplitter).unwrap();
    let points = random_points(100, 14.0, 43);
    let mut workspace = QueryWorkspace::new();

    for point in &points {
        let nearest = tree.find_nearest(point, &mut workspace);

        let generous = tree.find_nearest_in_radius(point, nearest.distance + 1.0, &mut workspace);
        assert_eq!(generous, Some(nearest));

        // Only items strictly closer than the radius are reported.
        if nearest.distance > 0.0 {
            let tight = tree.find_nearest_in_radius(point, nearest.distance * 0.5, &mut workspace);
            assert_eq!(tight, None);
        }
    }
}

#[cfg(feature = "parallel")]
#[test]
fn parallel_batch_queries_match_serial_queries() {
    let triangles = random_triangles(800, 12.0, 7);
    let tree = KdTree::new(triangles, &SahSplitter).unwrap();
    let points = random_points(256, 15.0, 8);

    let batched = tree.par_find_nearest(&points);

    let mut workspace = QueryWorkspace::new();
    for (point, from_batch) in points.iter().zip(batched) {
        assert_eq!(tree.find_nearest(point, &mut workspace), from_batch);
    }
}

#[cfg(feature = "parallel")]
#[test]
fn build_mode_does_not_change_query_results() {
    use fleche3d::partitioning::BuildMode;

    let triangles = random_triangles(3_000, 30.0, 99);
    let sequential =
        KdTree::with_mode(triangles.clone(), &SahSplitter, BuildMode::Sequential).unwrap();
    let parallel = KdTree::with_mode(triangles, &SahSplitter, BuildMode::Parallel).unwrap();

    sequential.assert_well_formed();
    parallel.assert_well_formed();
    assert_eq!(sequential.num_nodes(), parallel.num_nodes());

    let points = random_points(200, 35.0, 100);
    let mut workspace = QueryWorkspace::new();

    for point in &points {
        assert_eq!(
            sequential.find_nearest(point, &mut workspace),
            parallel.find_nearest(point, &mut workspace)
        );
    }
}

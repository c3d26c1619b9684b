use fleche3d::math::Point;
use fleche3d::partitioning::{KdTree, QueryWorkspace, SahSplitter};
use fleche3d::shape::Triangle;

fn main() {
    /*
     * Index the two faces of a small quad lying in the z = 0 plane.
     */
    let triangles = vec![
        Triangle::new(
            Point::new(0.0, 0.0, 0.0),
            Point::new(1.0, 0.0, 0.0),
            Point::new(1.0, 1.0, 0.0),
        ),
        Triangle::new(
            Point::new(0.0, 0.0, 0.0),
            Point::new(1.0, 1.0, 0.0),
            Point::new(0.0, 1.0, 0.0),
        ),
    ];

    let tree = KdTree::new(triangles, &SahSplitter).unwrap();

    /*
     * Ask which triangle is nearest to a few probe points.
     */
    let mut workspace = QueryWorkspace::new();

    for point in [
        Point::new(0.9, 0.1, 2.0),
        Point::new(0.1, 0.9, -0.5),
        Point::new(3.0, 0.5, 0.0),
    ] {
        let nearest = tree.find_nearest(&point, &mut workspace);
        println!(
            "nearest triangle to {}: #{} at distance {}",
            point, nearest.item, nearest.distance
        );
    }
}

use proptest::prelude::*;
use tessera_geom::{Point2, Rect2, on_germ_side};

fn coord() -> impl Strategy<Value = i32> {
    -1_000_000i32..=1_000_000
}

fn arb_point() -> impl Strategy<Value = Point2> {
    (coord(), coord()).prop_map(|(x, y)| Point2::new(x, y))
}

fn distinct_pair() -> impl Strategy<Value = (Point2, Point2)> {
    (arb_point(), arb_point()).prop_filter("distinct", |(a, b)| a != b)
}

proptest! {
    // A germ always lies on its own side of any bisector
    #[test]
    fn germ_is_inside_its_half_plane((g, n) in distinct_pair()) {
        prop_assert!(on_germ_side(g, g, n));
        prop_assert!(!on_germ_side(n, g, n));
    }

    // Off the bisector exactly one of the two germs claims a point
    #[test]
    fn half_planes_cover_and_split((g, n) in distinct_pair(), p in arb_point()) {
        let a = on_germ_side(p, g, n);
        let b = on_germ_side(p, n, g);
        prop_assert!(a || b);
        let equidistant = p.distance_sq(g) == p.distance_sq(n);
        prop_assert_eq!(a && b, equidistant);
    }

    // Inside the half-plane means no farther from the germ than from the neighbour
    #[test]
    fn half_plane_matches_distance((g, n) in distinct_pair(), p in arb_point()) {
        prop_assert_eq!(on_germ_side(p, g, n), p.distance_sq(g) <= p.distance_sq(n));
    }

    // Bounding rectangle holds every source point
    #[test]
    fn rect_from_points_contains_all(points in prop::collection::vec(arb_point(), 1..16)) {
        let rect = Rect2::from_points(points.iter().copied()).unwrap();
        for p in &points {
            prop_assert!(rect.contains(*p));
        }
        prop_assert!(rect.width() >= 1 && rect.height() >= 1);
    }
}

#[test]
fn empty_rect_from_points_is_none() {
    assert!(Rect2::from_points(std::iter::empty()).is_none());
}

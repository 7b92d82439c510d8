use proptest::prelude::*;
use tessera_world::Metrics;

fn metrics() -> impl Strategy<Value = Metrics> {
    (1u32..=512, 1u32..=64, 1u32..=16).prop_map(|(t, c, k)| Metrics::new(t, c, k))
}

proptest! {
    // Refining then coarsening returns the starting coordinate
    #[test]
    fn coarsen_inverts_refine(m in metrics(), c in -1_000_000i64..1_000_000) {
        prop_assert_eq!(m.pixel_to_tile(m.tile_to_pixel(c)), c);
        prop_assert_eq!(m.tile_to_germ(m.germ_to_tile(c)), c);
        prop_assert_eq!(m.germ_to_cluster(m.cluster_to_germ(c)), c);
        prop_assert_eq!(m.tile_to_cluster(m.cluster_to_tile(c)), c);
    }

    // Coarsening never reorders coordinates
    #[test]
    fn coarsening_is_monotonic(m in metrics(), a in -1_000_000i64..1_000_000, d in 0i64..10_000) {
        let b = a + d;
        prop_assert!(m.pixel_to_tile(a) <= m.pixel_to_tile(b));
        prop_assert!(m.tile_to_germ(a) <= m.tile_to_germ(b));
        prop_assert!(m.tile_to_cluster(a) <= m.tile_to_cluster(b));
    }

    // Going through the germ tier agrees with the direct tile → cluster step
    #[test]
    fn tiers_compose(m in metrics(), t in -1_000_000i64..1_000_000) {
        prop_assert_eq!(m.germ_to_cluster(m.tile_to_germ(t)), m.tile_to_cluster(t));
        let origin = m.cluster_to_tile(m.tile_to_cluster(t));
        prop_assert!(origin <= t && t < origin + m.cluster_span());
    }
}

//! Initial node placement.

use std::f32::consts::PI;

use rand::{Rng, SeedableRng, rngs::StdRng};

use textgraph_core::geometry::{Bounds, Point};

/// Radius step of the phyllotaxis spiral
const SPIRAL_RADIUS: f32 = 10.0;

/// Starting positions for `count` nodes inside `bounds`.
///
/// With a seed, positions are drawn uniformly from a PRNG seeded with it.
/// Without one, nodes are laid on a phyllotaxis spiral around the center of
/// `bounds`. Both are fully determined by their inputs.
pub(super) fn initial_positions(count: usize, bounds: Bounds, seed: Option<u64>) -> Vec<Point> {
    match seed {
        Some(seed) => uniform(count, bounds, seed),
        None => phyllotaxis(count, bounds),
    }
}

fn uniform(count: usize, bounds: Bounds, seed: u64) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            Point::new(
                rng.random_range(bounds.min_x()..=bounds.max_x()),
                rng.random_range(bounds.min_y()..=bounds.max_y()),
            )
        })
        .collect()
}

fn phyllotaxis(count: usize, bounds: Bounds) -> Vec<Point> {
    let center = Point::new(
        (bounds.min_x() + bounds.max_x()) / 2.0,
        (bounds.min_y() + bounds.max_y()) / 2.0,
    );
    let golden_angle = PI * (3.0 - 5.0_f32.sqrt());

    (0..count)
        .map(|i| {
            let radius = SPIRAL_RADIUS * (0.5 + i as f32).sqrt();
            let angle = i as f32 * golden_angle;
            center
                .add_point(Point::new(radius * angle.cos(), radius * angle.sin()))
                .clamp_to(bounds)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use textgraph_core::geometry::Size;

    use super::*;

    fn bounds() -> Bounds {
        Bounds::new_from_top_left(Point::new(20.0, 20.0), Size::new(760.0, 560.0))
    }

    #[test]
    fn test_seeded_positions_repeat() {
        let first = initial_positions(50, bounds(), Some(99));
        let second = initial_positions(50, bounds(), Some(99));
        assert_eq!(first, second);
        assert!(first.iter().all(|p| bounds().contains(*p)));
    }

    #[test]
    fn test_seeded_positions_spread_out() {
        let positions = initial_positions(50, bounds(), Some(1));
        let distinct_x = positions
            .iter()
            .filter(|p| (p.x() - positions[0].x()).abs() > 1.0)
            .count();
        assert!(distinct_x > 40);
    }

    #[test]
    fn test_spiral_first_node_near_center() {
        let positions = initial_positions(3, bounds(), None);
        let offset = positions[0].sub_point(Point::new(400.0, 300.0));
        assert_approx_eq!(f32, offset.hypot(), 10.0 * 0.5_f32.sqrt(), epsilon = 1e-4);
    }

    #[test]
    fn test_spiral_radius_grows() {
        let positions = initial_positions(10, bounds(), None);
        let center = Point::new(400.0, 300.0);
        let radii: Vec<f32> = positions
            .iter()
            .map(|p| p.sub_point(center).hypot())
            .collect();
        assert!(radii.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_collapsed_bounds() {
        let collapsed = Bounds::new_from_top_left(Point::new(5.0, 5.0), Size::default());
        for seed in [None, Some(4)] {
            let positions = initial_positions(4, collapsed, seed);
            assert!(positions.iter().all(|p| *p == Point::new(5.0, 5.0)));
        }
    }

    #[test]
    fn test_zero_nodes() {
        assert!(initial_positions(0, bounds(), Some(1)).is_empty());
        assert!(initial_positions(0, bounds(), None).is_empty());
    }
}

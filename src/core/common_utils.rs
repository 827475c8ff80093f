//! # Common Utilities
//!
//! Small random-sampling helpers shared by world generation, most importantly
//! Poisson-disc sampling used to scatter vegetation.

use std::f32::consts::{SQRT_2, TAU};

use cgmath::{InnerSpace, Vector2};

/// Width of the neighbourhood (in grid cells) scanned around a candidate point.
/// With a cell size of `radius / √2`, any point closer than `radius` lies within
/// two cells on either side.
const NEIGHBOURHOOD_CELLS: usize = 2;

/// Returns a random integer in `min..=max` (bounds may be given in either order).
pub fn random_int_inclusive(rng: &mut fastrand::Rng, min: i32, max: i32) -> i32 {
    let (low, high) = if min <= max { (min, max) } else { (max, min) };
    rng.i32(low..=high)
}

/// Scatters points over `[0, region.x) × [0, region.y)` so that no two points are
/// closer than `radius`, using the thread-local random source.
///
/// See [`poisson_disc_sampling_with`] for the algorithm.
pub fn poisson_disc_sampling(
    radius: f32,
    region: Vector2<f32>,
    attempts: usize,
) -> Vec<Vector2<f32>> {
    poisson_disc_sampling_with(&mut fastrand::Rng::new(), radius, region, attempts)
}

/// Bounded-retry dart throwing over a background grid.
///
/// Starting from a spawn point at the centre of the region, a random active
/// spawn point is picked and up to `attempts` candidates are thrown into the
/// annulus `[radius, 2·radius)` around it. The first candidate that lies inside
/// the region and keeps its distance to every existing point is accepted and
/// becomes a spawn point itself. A spawn point that yields nothing is retired.
/// Sampling stops once no spawn points remain.
///
/// # Arguments
/// * `rng` - Random source; pass a seeded one for reproducible output
/// * `radius` - Minimum distance between any two points
/// * `region` - Size of the sampled rectangle, anchored at the origin
/// * `attempts` - Candidates tried per spawn point before it is retired
///
/// # Returns
/// The accepted points. The spawn point at the centre is not part of the output.
pub fn poisson_disc_sampling_with(
    rng: &mut fastrand::Rng,
    radius: f32,
    region: Vector2<f32>,
    attempts: usize,
) -> Vec<Vector2<f32>> {
    if radius <= 0.0 || region.x <= 0.0 || region.y <= 0.0 {
        return Vec::new();
    }

    let cell_size = radius / SQRT_2;
    let columns = (region.x / cell_size).ceil() as usize;
    let rows = (region.y / cell_size).ceil() as usize;
    let mut grid: Vec<Option<usize>> = vec![None; columns * rows];

    let mut points: Vec<Vector2<f32>> = Vec::new();
    let mut spawn_points = vec![region / 2.0];

    while !spawn_points.is_empty() {
        let spawn_index = rng.usize(..spawn_points.len());
        let centre = spawn_points[spawn_index];
        let mut accepted = false;

        for _ in 0..attempts {
            let angle = rng.f32() * TAU;
            let direction = Vector2::new(angle.sin(), angle.cos());
            let candidate = centre + direction * (radius + rng.f32() * radius);

            if is_valid(candidate, region, cell_size, radius, columns, rows, &points, &grid) {
                let cell_x = (candidate.x / cell_size) as usize;
                let cell_y = (candidate.y / cell_size) as usize;
                grid[cell_y * columns + cell_x] = Some(points.len());
                points.push(candidate);
                spawn_points.push(candidate);
                accepted = true;
                break;
            }
        }

        if !accepted {
            spawn_points.swap_remove(spawn_index);
        }
    }

    points
}

#[allow(clippy::too_many_arguments)]
fn is_valid(
    candidate: Vector2<f32>,
    region: Vector2<f32>,
    cell_size: f32,
    radius: f32,
    columns: usize,
    rows: usize,
    points: &[Vector2<f32>],
    grid: &[Option<usize>],
) -> bool {
    if candidate.x < 0.0 || candidate.x >= region.x || candidate.y < 0.0 || candidate.y >= region.y {
        return false;
    }

    let cell_x = (candidate.x / cell_size) as usize;
    let cell_y = (candidate.y / cell_size) as usize;
    let min_x = cell_x.saturating_sub(NEIGHBOURHOOD_CELLS);
    let max_x = (cell_x + NEIGHBOURHOOD_CELLS).min(columns - 1);
    let min_y = cell_y.saturating_sub(NEIGHBOURHOOD_CELLS);
    let max_y = (cell_y + NEIGHBOURHOOD_CELLS).min(rows - 1);

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            if let Some(index) = grid[y * columns + x] {
                if (candidate - points[index]).magnitude2() < radius * radius {
                    return false;
                }
            }
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_keep_minimum_separation_and_stay_in_region() {
        for seed in 0..20 {
            let mut rng = fastrand::Rng::with_seed(seed);
            let region = Vector2::new(15.0, 15.0);
            let radius = 2.5;
            let points = poisson_disc_sampling_with(&mut rng, radius, region, 30);
            assert!(!points.is_empty());

            for (i, p) in points.iter().enumerate() {
                assert!(p.x >= 0.0 && p.x < region.x && p.y >= 0.0 && p.y < region.y);
                for q in &points[i + 1..] {
                    assert!((p - q).magnitude() >= radius - 1e-4, "{p:?} too close to {q:?}");
                }
            }
        }
    }

    #[test]
    fn radius_larger_than_region_yields_nothing() {
        let mut rng = fastrand::Rng::with_seed(1);
        let points = poisson_disc_sampling_with(&mut rng, 50.0, Vector2::new(10.0, 10.0), 50);
        assert!(points.is_empty());
    }

    #[test]
    fn degenerate_input_yields_nothing() {
        assert!(poisson_disc_sampling(0.0, Vector2::new(10.0, 10.0), 10).is_empty());
        assert!(poisson_disc_sampling(1.0, Vector2::new(0.0, 10.0), 10).is_empty());
    }

    #[test]
    fn random_int_is_inclusive_and_order_agnostic() {
        let mut rng = fastrand::Rng::with_seed(3);
        let mut seen = [false; 3];
        for _ in 0..200 {
            let value = random_int_inclusive(&mut rng, 7, 5);
            assert!((5..=7).contains(&value));
            seen[(value - 5) as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}

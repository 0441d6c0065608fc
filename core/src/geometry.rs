//! Conversions between grid cells and pixel space.

use crate::{CellCoord, Vec2};

/// Euclidean distance between two points.
#[must_use]
pub fn distance(from: Vec2, to: Vec2) -> f32 {
    from.distance(to)
}

/// Pixel-space centre of the provided cell.
#[must_use]
pub fn grid_to_pixel(cell: CellCoord, cell_size: f32) -> Vec2 {
    Vec2::new(
        cell.column() as f32 * cell_size + cell_size / 2.0,
        cell.row() as f32 * cell_size + cell_size / 2.0,
    )
}

/// Cell containing the provided pixel-space point.
///
/// Returns `None` for points left of or above the origin. Callers bound the
/// result against the map dimensions themselves.
#[must_use]
pub fn pixel_to_grid(point: Vec2, cell_size: f32) -> Option<CellCoord> {
    if point.x < 0.0 || point.y < 0.0 || cell_size <= 0.0 {
        return None;
    }
    let column = (point.x / cell_size).floor() as u32;
    let row = (point.y / cell_size).floor() as u32;
    Some(CellCoord::new(column, row))
}

/// Unit vector pointing from `from` towards `to`, or zero when they coincide.
#[must_use]
pub fn direction(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::{direction, distance, grid_to_pixel, pixel_to_grid};
    use crate::{CellCoord, Vec2};

    #[test]
    fn cell_centres_sit_half_a_cell_in() {
        assert_eq!(grid_to_pixel(CellCoord::new(0, 0), 40.0), Vec2::new(20.0, 20.0));
        assert_eq!(grid_to_pixel(CellCoord::new(6, 7), 40.0), Vec2::new(260.0, 300.0));
    }

    #[test]
    fn pixels_map_back_to_their_cell() {
        let cell = CellCoord::new(12, 3);
        assert_eq!(pixel_to_grid(grid_to_pixel(cell, 40.0), 40.0), Some(cell));
        assert_eq!(pixel_to_grid(Vec2::new(39.9, 0.0), 40.0), Some(CellCoord::new(0, 0)));
        assert_eq!(pixel_to_grid(Vec2::new(-1.0, 5.0), 40.0), None);
    }

    #[test]
    fn direction_is_normalised() {
        let unit = direction(Vec2::ZERO, Vec2::new(3.0, 4.0));
        assert!((unit.length() - 1.0).abs() < 1e-6);
        assert_eq!(direction(Vec2::ONE, Vec2::ONE), Vec2::ZERO);
        assert!((distance(Vec2::ZERO, Vec2::new(3.0, 4.0)) - 5.0).abs() < 1e-6);
    }
}

//! Grid, path cells, and the waypoint sequence enemies follow.

use lane_defence_core::{geometry, CellCoord, Vec2};
use lane_defence_tables::{MapLayout, Rules, TableError};

use crate::navigation::{find_route, index};

/// Immutable map built from a named layout.
#[derive(Clone, Debug)]
pub struct Map {
    name: String,
    columns: u32,
    rows: u32,
    cell_size: f32,
    path: Vec<bool>,
    route: Vec<CellCoord>,
    waypoints: Vec<Vec2>,
    path_length: f32,
}

impl Map {
    /// Builds the map for a layout, routing from its first to its last corner.
    ///
    /// Fails when the layout is malformed or when no route connects the
    /// endpoints; a map that loads always has a non-empty waypoint sequence.
    pub fn from_layout(layout: &MapLayout, rules: &Rules) -> Result<Self, TableError> {
        let cells = layout.path_cells(rules.columns, rules.rows)?;
        let width = usize::try_from(rules.columns).unwrap_or(0);
        let height = usize::try_from(rules.rows).unwrap_or(0);
        let mut path = vec![false; width.saturating_mul(height)];
        for cell in &cells {
            if let Some(slot) = index(width, *cell).and_then(|offset| path.get_mut(offset)) {
                *slot = true;
            }
        }

        let (Some(start), Some(end)) = (layout.start(), layout.end()) else {
            return Err(TableError::UnroutablePath(layout.name.clone()));
        };
        let route = find_route(rules.columns, rules.rows, start, end, |cell| {
            index(width, cell)
                .and_then(|offset| path.get(offset).copied())
                .unwrap_or(false)
        });
        if route.is_empty() {
            return Err(TableError::UnroutablePath(layout.name.clone()));
        }

        let waypoints: Vec<Vec2> = route
            .iter()
            .map(|cell| geometry::grid_to_pixel(*cell, rules.cell_size))
            .collect();
        let path_length = waypoints
            .windows(2)
            .map(|pair| geometry::distance(pair[0], pair[1]))
            .sum();

        Ok(Self {
            name: layout.name.clone(),
            columns: rules.columns,
            rows: rules.rows,
            cell_size: rules.cell_size,
            path,
            route,
            waypoints,
            path_length,
        })
    }

    /// Name of the layout the map was built from.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of grid columns.
    #[must_use]
    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of grid rows.
    #[must_use]
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Edge length of a cell in pixels.
    #[must_use]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Reports whether the cell belongs to the enemy path.
    #[must_use]
    pub fn is_path(&self, cell: CellCoord) -> bool {
        self.contains(cell)
            && usize::try_from(self.columns)
                .ok()
                .and_then(|width| index(width, cell))
                .and_then(|offset| self.path.get(offset).copied())
                .unwrap_or(false)
    }

    /// Reports whether a tower may stand on the cell, ignoring other towers.
    #[must_use]
    pub fn is_buildable(&self, cell: CellCoord) -> bool {
        self.contains(cell) && !self.is_path(cell)
    }

    /// Ordered cells from the start of the path to its end.
    #[must_use]
    pub fn route(&self) -> &[CellCoord] {
        &self.route
    }

    /// Pixel-space waypoints matching [`Map::route`].
    #[must_use]
    pub fn waypoints(&self) -> &[Vec2] {
        &self.waypoints
    }

    /// Total length of the waypoint sequence in pixels.
    #[must_use]
    pub fn path_length(&self) -> f32 {
        self.path_length
    }

    /// Pixel-space centre of the provided cell.
    #[must_use]
    pub fn cell_center(&self, cell: CellCoord) -> Vec2 {
        geometry::grid_to_pixel(cell, self.cell_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lane_defence_tables::Tables;

    #[test]
    fn shipped_layouts_route_end_to_end() {
        let tables = Tables::default();
        for layout in &tables.maps {
            let map = Map::from_layout(layout, &tables.rules).expect("layout routes");
            assert_eq!(map.route().first().copied(), layout.start());
            assert_eq!(map.route().last().copied(), layout.end());
            assert_eq!(map.waypoints().len(), map.route().len());
        }
    }

    #[test]
    fn classic_layout_starts_on_the_left_edge() {
        let tables = Tables::default();
        let map = Map::from_layout(tables.map("classic").expect("classic"), &tables.rules)
            .expect("classic routes");

        assert_eq!(map.waypoints()[0], Vec2::new(20.0, 300.0));
        assert!(!map.is_buildable(CellCoord::new(0, 7)));
        assert!(!map.is_buildable(CellCoord::new(20, 0)), "out of bounds");
        assert!(map.is_buildable(CellCoord::new(0, 0)));
    }

    #[test]
    fn path_length_matches_route_steps() {
        let tables = Tables::default();
        let map = Map::from_layout(tables.map("zigzag").expect("zigzag"), &tables.rules)
            .expect("zigzag routes");
        let steps = (map.route().len() - 1) as f32;
        assert!((map.path_length() - steps * 40.0).abs() < 1e-3);
    }
}

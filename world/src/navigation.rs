//! Breadth-first route finder over the path cells of a map.

use std::collections::VecDeque;

use lane_defence_core::CellCoord;

/// Finds the shortest 4-connected route from `start` to `end` that only visits
/// cells accepted by `is_path`.
///
/// Neighbours are explored in up, right, down, left order, so among routes of
/// equal length the result is deterministic. Returns an empty vector when the
/// endpoints are disconnected, out of bounds, or not path cells themselves.
pub(crate) fn find_route<F>(
    width: u32,
    height: u32,
    start: CellCoord,
    end: CellCoord,
    mut is_path: F,
) -> Vec<CellCoord>
where
    F: FnMut(CellCoord) -> bool,
{
    let width_usize = usize::try_from(width).unwrap_or(0);
    let height_usize = usize::try_from(height).unwrap_or(0);
    let cell_count = width_usize.checked_mul(height_usize).unwrap_or(0);

    if cell_count == 0 {
        return Vec::new();
    }

    let in_bounds = |cell: CellCoord| cell.column() < width && cell.row() < height;
    if !in_bounds(start) || !in_bounds(end) || !is_path(start) || !is_path(end) {
        return Vec::new();
    }

    let mut parents: Vec<Option<CellCoord>> = vec![None; cell_count];
    let mut visited = vec![false; cell_count];
    let mut queue = VecDeque::new();

    if let Some(start_index) = index(width_usize, start) {
        visited[start_index] = true;
        queue.push_back(start);
    }

    while let Some(cell) = queue.pop_front() {
        if cell == end {
            break;
        }

        for neighbor in neighbors(cell, width, height) {
            let Some(neighbor_index) = index(width_usize, neighbor) else {
                continue;
            };

            if visited[neighbor_index] || !is_path(neighbor) {
                continue;
            }

            visited[neighbor_index] = true;
            parents[neighbor_index] = Some(cell);
            queue.push_back(neighbor);
        }
    }

    let reached = index(width_usize, end).is_some_and(|end_index| visited[end_index]);
    if !reached {
        return Vec::new();
    }

    let mut route = vec![end];
    let mut cursor = end;
    while cursor != start {
        let Some(parent) = index(width_usize, cursor).and_then(|offset| parents[offset]) else {
            return Vec::new();
        };
        route.push(parent);
        cursor = parent;
    }
    route.reverse();
    route
}

fn neighbors(cell: CellCoord, width: u32, height: u32) -> impl Iterator<Item = CellCoord> {
    let mut candidates = [None; 4];
    let mut count = 0;

    if let Some(row) = cell.row().checked_sub(1) {
        candidates[count] = Some(CellCoord::new(cell.column(), row));
        count += 1;
    }

    if let Some(column) = cell.column().checked_add(1) {
        if column < width {
            candidates[count] = Some(CellCoord::new(column, cell.row()));
            count += 1;
        }
    }

    if let Some(row) = cell.row().checked_add(1) {
        if row < height {
            candidates[count] = Some(CellCoord::new(cell.column(), row));
            count += 1;
        }
    }

    if let Some(column) = cell.column().checked_sub(1) {
        candidates[count] = Some(CellCoord::new(column, cell.row()));
        count += 1;
    }

    candidates.into_iter().take(count).flatten()
}

pub(crate) fn index(width: usize, cell: CellCoord) -> Option<usize> {
    let column = usize::try_from(cell.column()).ok()?;
    let row = usize::try_from(cell.row()).ok()?;
    row.checked_mul(width)?.checked_add(column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_follows_an_l_shaped_corridor() {
        let corridor = [
            CellCoord::new(0, 0),
            CellCoord::new(1, 0),
            CellCoord::new(2, 0),
            CellCoord::new(2, 1),
            CellCoord::new(2, 2),
        ];

        let route = find_route(3, 3, corridor[0], corridor[4], |cell| corridor.contains(&cell));

        assert_eq!(route, corridor.to_vec());
    }

    #[test]
    fn disconnected_endpoints_yield_an_empty_route() {
        let cells = [CellCoord::new(0, 0), CellCoord::new(2, 2)];

        let route = find_route(3, 3, cells[0], cells[1], |cell| cells.contains(&cell));

        assert!(route.is_empty());
    }

    #[test]
    fn open_grid_prefers_shortest_route() {
        let route = find_route(4, 4, CellCoord::new(0, 0), CellCoord::new(3, 3), |_| true);

        assert_eq!(route.len(), 7);
        assert_eq!(route.first(), Some(&CellCoord::new(0, 0)));
        assert_eq!(route.last(), Some(&CellCoord::new(3, 3)));
    }

    #[test]
    fn start_equal_to_end_is_a_single_cell() {
        let cell = CellCoord::new(1, 1);
        assert_eq!(find_route(3, 3, cell, cell, |_| true), vec![cell]);
    }
}

use core::fmt;
use std::str::FromStr;

use grid_util::point::Point;
use itertools::Itertools;
use log::debug;
use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;

use crate::cell::{Cell, Role, SearchStatus};
use crate::error::{EndpointError, Error, Result};
use crate::{pos, NEIGHBOR_ORDER};

/// A square grid of [Cell]s. Besides the cells themselves it remembers where the start and end
/// markers are, so that placing a new start or end moves the marker instead of duplicating it.
///
/// Adjacency is derived from the cell roles each time it is asked for, so obstacles may be
/// edited freely between searches.
#[derive(Clone, Debug)]
pub struct Grid {
    size: usize,
    cells: Vec<Cell>,
    start: Option<Point>,
    end: Option<Point>,
}

impl Grid {
    /// Creates a `size` by `size` grid of free cells.
    pub fn new(size: usize) -> Result<Grid> {
        if size == 0 || size > i32::MAX as usize {
            return Err(Error::InvalidSize { size });
        }
        let n = size as i32;
        let cells = (0..n)
            .cartesian_product(0..n)
            .map(|(row, col)| Cell::new(pos(row, col)))
            .collect();
        Ok(Grid {
            size,
            cells,
            start: None,
            end: None,
        })
    }
    pub fn size(&self) -> usize {
        self.size
    }
    pub fn in_bounds(&self, point: Point) -> bool {
        point.x >= 0
            && point.y >= 0
            && (point.x as usize) < self.size
            && (point.y as usize) < self.size
    }
    fn get_ix(&self, point: Point) -> Option<usize> {
        self.in_bounds(point)
            .then(|| point.y as usize * self.size + point.x as usize)
    }
    pub fn cell(&self, point: Point) -> Option<&Cell> {
        self.get_ix(point).map(|ix| &self.cells[ix])
    }
    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }
    pub fn role(&self, point: Point) -> Option<Role> {
        self.cell(point).map(Cell::role)
    }
    pub fn status(&self, point: Point) -> Option<SearchStatus> {
        self.cell(point).map(Cell::status)
    }
    pub fn start(&self) -> Option<Point> {
        self.start
    }
    pub fn end(&self) -> Option<Point> {
        self.end
    }
    /// Whether a search may enter `point`: it is inside the grid and not an obstacle.
    pub fn is_traversable(&self, point: Point) -> bool {
        self.cell(point).is_some_and(Cell::is_traversable)
    }
    /// Number of cells currently carrying `status`.
    pub fn count_status(&self, status: SearchStatus) -> usize {
        self.cells.iter().filter(|c| c.status == status).count()
    }

    /// Changes the role of a cell. Placing [Role::Start] or [Role::End] moves the existing marker:
    /// the previous start (or end) cell is turned back into a free cell. Overwriting the current
    /// start or end with any other role removes that marker.
    pub fn set_role(&mut self, point: Point, role: Role) -> Result<()> {
        let ix = self.get_ix(point).ok_or(Error::OutOfBounds(point))?;
        let previous = self.cells[ix].role;
        if previous == role {
            return Ok(());
        }
        match previous {
            Role::Start => self.start = None,
            Role::End => self.end = None,
            _ => {}
        }
        let displaced = match role {
            Role::Start => self.start.replace(point),
            Role::End => self.end.replace(point),
            _ => None,
        };
        if let Some(old_ix) = displaced.and_then(|old| self.get_ix(old)) {
            debug!("Moving {:?} marker from {} to {}", role, self.cells[old_ix].point(), point);
            self.cells[old_ix].role = Role::Free;
        }
        self.cells[ix].role = role;
        Ok(())
    }

    /// Places the next thing an editor would place at `point`: the start if there is none, then
    /// the end, then obstacles. Start and end cells are never overwritten. Returns the role the
    /// cell has afterwards.
    pub fn paint(&mut self, point: Point) -> Result<Role> {
        let current = self.role(point).ok_or(Error::OutOfBounds(point))?;
        let role = match current {
            Role::Start | Role::End => return Ok(current),
            _ if self.start.is_none() => Role::Start,
            _ if self.end.is_none() => Role::End,
            _ => Role::Obstacle,
        };
        self.set_role(point, role)?;
        Ok(role)
    }

    /// Turns `point` back into a free cell, dropping the start or end marker if it was one.
    pub fn erase(&mut self, point: Point) -> Result<()> {
        self.set_role(point, Role::Free)
    }

    pub(crate) fn set_status(&mut self, point: Point, status: SearchStatus) {
        if let Some(ix) = self.get_ix(point) {
            self.cells[ix].status = status;
        }
    }

    /// Forgets the outcome of the previous search while keeping the layout.
    pub fn clear_search(&mut self) {
        for cell in self.cells.iter_mut() {
            cell.status = SearchStatus::Unvisited;
        }
    }

    /// Clears every role and search status.
    pub fn reset(&mut self) {
        self.clear_search();
        for cell in self.cells.iter_mut() {
            cell.role = Role::Free;
        }
        self.start = None;
        self.end = None;
    }

    /// The traversable cells adjacent to `point`, enumerated in [NEIGHBOR_ORDER].
    pub fn neighbors(&self, point: Point) -> SmallVec<[Point; 4]> {
        if !self.in_bounds(point) {
            return SmallVec::new();
        }
        NEIGHBOR_ORDER
            .iter()
            .map(|&(d_row, d_col)| pos(point.y + d_row, point.x + d_col))
            .filter(|&p| self.is_traversable(p))
            .collect()
    }

    /// Checks that a search from `start` to `end` may be started on this grid.
    pub fn validate_endpoints(
        &self,
        start: Point,
        end: Point,
    ) -> std::result::Result<(), EndpointError> {
        for point in [start, end] {
            match self.cell(point) {
                None => return Err(EndpointError::OutOfBounds(point)),
                Some(cell) if !cell.is_traversable() => {
                    return Err(EndpointError::Obstacle(point))
                }
                _ => {}
            }
        }
        if start == end {
            return Err(EndpointError::Equal(start));
        }
        Ok(())
    }

    /// Builds a [UnionFind] over the cell indices in which traversable 4-neighbours share a
    /// component. Computed from scratch on every call.
    pub fn components(&self) -> UnionFind<usize> {
        let mut components = UnionFind::new(self.cells.len());
        for cell in self.cells.iter().filter(|c| c.is_traversable()) {
            let p = cell.point();
            for n in [pos(p.y + 1, p.x), pos(p.y, p.x + 1)] {
                if let (Some(a), Some(b)) = (self.get_ix(p), self.get_ix(n)) {
                    if self.cells[b].is_traversable() {
                        components.union(a, b);
                    }
                }
            }
        }
        components
    }

    /// Checks if `a` and `b` are traversable and on the same connected component.
    pub fn reachable(&self, a: &Point, b: &Point) -> bool {
        if !self.is_traversable(*a) || !self.is_traversable(*b) {
            return false;
        }
        match (self.get_ix(*a), self.get_ix(*b)) {
            (Some(a_ix), Some(b_ix)) => self.components().equiv(a_ix, b_ix),
            _ => false,
        }
    }
}

/// One line per row: `.` free, `#` obstacle, `S` start, `E` end, and for free cells touched by
/// the last search `o` open, `x` closed, `*` path.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.cells.chunks(self.size) {
            writeln!(f, "{}", row.iter().map(Cell::symbol).collect::<String>())?;
        }
        Ok(())
    }
}

/// Parses the text form written by [Display](fmt::Display). Blank lines and surrounding
/// whitespace are ignored and search markers (`o`, `x`, `*`) read back as free cells.
impl FromStr for Grid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Grid> {
        let lines = s
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<Vec<&str>>();
        let mut grid = Grid::new(lines.len())?;
        for (row, line) in lines.iter().enumerate() {
            let parse_error = |reason: String| Error::Parse {
                line: row + 1,
                reason,
            };
            let width = line.chars().count();
            if width != lines.len() {
                return Err(parse_error(format!(
                    "expected {} cells, found {}",
                    lines.len(),
                    width
                )));
            }
            for (col, c) in line.chars().enumerate() {
                let role = match c {
                    '.' | 'o' | 'x' | '*' => Role::Free,
                    '#' => Role::Obstacle,
                    'S' if grid.start.is_some() => {
                        return Err(parse_error("more than one start".to_owned()))
                    }
                    'E' if grid.end.is_some() => {
                        return Err(parse_error("more than one end".to_owned()))
                    }
                    'S' => Role::Start,
                    'E' => Role::End,
                    other => return Err(parse_error(format!("unexpected character {other:?}"))),
                };
                grid.set_role(pos(row as i32, col as i32), role)?;
            }
        }
        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_grid() {
        assert_eq!(Grid::new(0).unwrap_err(), Error::InvalidSize { size: 0 });
        assert!(Grid::new(1).is_ok());
    }

    #[test]
    fn cells_know_their_position() {
        let grid = Grid::new(3).unwrap();
        assert_eq!(grid.cells().count(), 9);
        let cell = grid.cell(pos(2, 1)).unwrap();
        assert_eq!((cell.row(), cell.col()), (2, 1));
        assert!(grid.cell(pos(3, 0)).is_none());
        assert!(grid.cell(pos(0, -1)).is_none());
    }

    /// Neighbours come out down, up, right, left and skip obstacles and the border.
    #[test]
    fn neighbor_order_and_filtering() {
        let mut grid = Grid::new(3).unwrap();
        let center = pos(1, 1);
        assert_eq!(
            grid.neighbors(center).as_slice(),
            &[pos(2, 1), pos(0, 1), pos(1, 2), pos(1, 0)]
        );
        grid.set_role(pos(0, 1), Role::Obstacle).unwrap();
        assert_eq!(
            grid.neighbors(center).as_slice(),
            &[pos(2, 1), pos(1, 2), pos(1, 0)]
        );
        assert_eq!(grid.neighbors(pos(0, 0)).as_slice(), &[pos(1, 0)]);
    }

    #[test]
    fn no_neighbors_outside_the_grid() {
        let grid = Grid::new(3).unwrap();
        assert!(grid.neighbors(pos(i32::MAX, 0)).is_empty());
        assert!(grid.neighbors(pos(0, i32::MIN)).is_empty());
        assert!(grid.neighbors(pos(3, 1)).is_empty());
    }

    #[test]
    fn placing_start_moves_the_marker() {
        let mut grid = Grid::new(4).unwrap();
        grid.set_role(pos(0, 0), Role::Start).unwrap();
        grid.set_role(pos(1, 1), Role::Start).unwrap();
        assert_eq!(grid.start(), Some(pos(1, 1)));
        assert_eq!(grid.role(pos(0, 0)), Some(Role::Free));

        grid.set_role(pos(2, 2), Role::End).unwrap();
        // Turning the end into the start drops the end marker.
        grid.set_role(pos(2, 2), Role::Start).unwrap();
        assert_eq!(grid.start(), Some(pos(2, 2)));
        assert_eq!(grid.end(), None);
        assert_eq!(grid.role(pos(1, 1)), Some(Role::Free));

        grid.set_role(pos(2, 2), Role::Obstacle).unwrap();
        assert_eq!(grid.start(), None);
    }

    #[test]
    fn set_role_out_of_bounds() {
        let mut grid = Grid::new(2).unwrap();
        assert_eq!(
            grid.set_role(pos(2, 0), Role::Obstacle),
            Err(Error::OutOfBounds(pos(2, 0)))
        );
    }

    #[test]
    fn paint_places_start_end_then_obstacles() {
        let mut grid = Grid::new(3).unwrap();
        assert_eq!(grid.paint(pos(0, 0)).unwrap(), Role::Start);
        assert_eq!(grid.paint(pos(0, 0)).unwrap(), Role::Start);
        assert_eq!(grid.paint(pos(2, 2)).unwrap(), Role::End);
        assert_eq!(grid.paint(pos(1, 1)).unwrap(), Role::Obstacle);
        assert_eq!(grid.paint(pos(2, 2)).unwrap(), Role::End);

        grid.erase(pos(0, 0)).unwrap();
        assert_eq!(grid.start(), None);
        assert_eq!(grid.paint(pos(1, 1)).unwrap(), Role::Start);
    }

    #[test]
    fn reset_and_clear_search() {
        let mut grid: Grid = "S.\n#E".parse().unwrap();
        grid.set_status(pos(0, 1), SearchStatus::Closed);
        grid.clear_search();
        assert_eq!(grid.count_status(SearchStatus::Unvisited), 4);
        assert_eq!(grid.role(pos(1, 0)), Some(Role::Obstacle));
        grid.reset();
        assert!(grid.cells().all(|c| c.role() == Role::Free));
        assert_eq!(grid.start(), None);
        assert_eq!(grid.end(), None);
    }

    #[test]
    fn endpoint_validation() {
        let grid: Grid = "S#\n..".parse().unwrap();
        assert_eq!(grid.validate_endpoints(pos(0, 0), pos(1, 1)), Ok(()));
        assert_eq!(
            grid.validate_endpoints(pos(0, 0), pos(0, 0)),
            Err(EndpointError::Equal(pos(0, 0)))
        );
        assert_eq!(
            grid.validate_endpoints(pos(0, 0), pos(0, 1)),
            Err(EndpointError::Obstacle(pos(0, 1)))
        );
        assert_eq!(
            grid.validate_endpoints(pos(-1, 0), pos(1, 1)),
            Err(EndpointError::OutOfBounds(pos(-1, 0)))
        );
    }

    /// Tests whether cells are correctly mapped to different connected components.
    #[test]
    fn test_component_generation() {
        // |. # .|
        // |. # .|
        // |. # .|
        let grid: Grid = ".#.\n.#.\n.#.".parse().unwrap();
        assert!(grid.reachable(&pos(0, 0), &pos(2, 0)));
        assert!(!grid.reachable(&pos(0, 0), &pos(0, 2)));
        assert!(!grid.reachable(&pos(0, 0), &pos(0, 1)));
        assert!(!grid.reachable(&pos(0, 0), &pos(5, 5)));
    }

    #[test]
    fn text_round_trip() {
        let text = "S..\n.#.\n..E\n";
        let grid: Grid = text.parse().unwrap();
        assert_eq!(grid.start(), Some(pos(0, 0)));
        assert_eq!(grid.end(), Some(pos(2, 2)));
        assert_eq!(grid.to_string(), text);
    }

    #[test]
    fn text_parse_errors() {
        assert!(matches!(
            "S.\n...".parse::<Grid>(),
            Err(Error::Parse { line: 2, .. })
        ));
        assert!(matches!(
            "S?\n..".parse::<Grid>(),
            Err(Error::Parse { line: 1, .. })
        ));
        assert!(matches!(
            "SS\n..".parse::<Grid>(),
            Err(Error::Parse { line: 1, .. })
        ));
        assert_eq!("".parse::<Grid>().unwrap_err(), Error::InvalidSize { size: 0 });
    }
}

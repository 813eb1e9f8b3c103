//! # grid_astar
//!
//! Observable [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) pathfinding on a
//! uniform-cost square grid with a 4-neighbourhood. The search engine reports every cell that
//! becomes open, closed or part of the final path to an [Observer], which makes it suitable for
//! driving visualisations one frontier iteration at a time as well as for batch use.
//!
//! ```
//! use grid_astar::{pos, search, Grid, NoopObserver, Role};
//!
//! let mut grid = Grid::new(5).unwrap();
//! grid.set_role(pos(2, 1), Role::Obstacle).unwrap();
//! let outcome = search(&mut grid, pos(0, 0), pos(4, 4), &mut NoopObserver).unwrap();
//! assert_eq!(outcome.cost(), Some(8));
//! ```
//!
//! Cells are addressed by [Point] with `x` as the column and `y` as the row; [pos] builds one
//! from a `(row, col)` pair.
pub mod astar;
pub mod cell;
pub mod error;
pub mod grid;
pub mod heuristic;
pub mod observer;

pub use grid_util::point::Point;

pub use astar::{search, search_marked, AstarSearch, SearchOutcome};
pub use cell::{Cell, Role, SearchStatus};
pub use error::{EndpointError, Error, Result};
pub use grid::Grid;
pub use heuristic::manhattan;
pub use observer::{CancelOnFlag, Flow, NoopObserver, Observer, Recorder};

/// Cost of moving between two adjacent cells. All edges have the same cost.
pub const STEP_COST: u32 = 1;

/// Row and column offsets in the order neighbours are enumerated: down, up, right, left.
/// Changing this order changes which of several equally short paths is returned.
pub const NEIGHBOR_ORDER: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Builds the [Point] addressing the cell at `row`, `col`.
pub fn pos(row: i32, col: i32) -> Point {
    Point::new(col, row)
}

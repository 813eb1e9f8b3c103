use grid_util::point::Point;

/// [Manhattan distance](https://en.wikipedia.org/wiki/Taxicab_geometry) between two cells.
/// Admissible and consistent on a 4-connected grid with unit step cost, which is what makes the
/// paths returned by [crate::search] optimal.
pub fn manhattan(a: &Point, b: &Point) -> u32 {
    a.x.abs_diff(b.x) + a.y.abs_diff(b.y)
}

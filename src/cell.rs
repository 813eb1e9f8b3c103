use grid_util::point::Point;

/// What a cell is, as placed by whoever edits the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Role {
    #[default]
    Free,
    Obstacle,
    Start,
    End,
}

/// What the most recent search did with a cell. Kept apart from [Role] so that a start cell can
/// lie on the path and an end cell can be open without losing their role.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SearchStatus {
    #[default]
    Unvisited,
    Open,
    Closed,
    Path,
}

/// A single grid square. Its position never changes after the grid is built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    point: Point,
    pub(crate) role: Role,
    pub(crate) status: SearchStatus,
}

impl Cell {
    pub(crate) fn new(point: Point) -> Cell {
        Cell {
            point,
            role: Role::Free,
            status: SearchStatus::Unvisited,
        }
    }
    pub fn point(&self) -> Point {
        self.point
    }
    pub fn row(&self) -> i32 {
        self.point.y
    }
    pub fn col(&self) -> i32 {
        self.point.x
    }
    pub fn role(&self) -> Role {
        self.role
    }
    pub fn status(&self) -> SearchStatus {
        self.status
    }
    /// Obstacles are never entered by a search.
    pub fn is_traversable(&self) -> bool {
        self.role != Role::Obstacle
    }
    /// Character used by the grid's text rendering. Roles other than [Role::Free] take precedence
    /// over the search status.
    pub fn symbol(&self) -> char {
        match (self.role, self.status) {
            (Role::Obstacle, _) => '#',
            (Role::Start, _) => 'S',
            (Role::End, _) => 'E',
            (Role::Free, SearchStatus::Unvisited) => '.',
            (Role::Free, SearchStatus::Open) => 'o',
            (Role::Free, SearchStatus::Closed) => 'x',
            (Role::Free, SearchStatus::Path) => '*',
        }
    }
}

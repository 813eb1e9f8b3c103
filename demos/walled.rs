use grid_astar::{pos, search, Grid, Recorder, Role, SearchStatus};

// A wall spanning the whole grid separates start and end, so no path exists. The search still
// reports every cell it explored on the start's side.
//  _____
// |S #  |
// |  #  |
// |  # E|
// |  #  |
// |  #  |
//  _____

fn main() {
    env_logger::init();
    let mut grid = Grid::new(5).unwrap();
    for row in 0..5 {
        grid.set_role(pos(row, 2), Role::Obstacle).unwrap();
    }
    let mut recorder = Recorder::new();
    let outcome = search(&mut grid, pos(0, 0), pos(2, 4), &mut recorder).unwrap();
    println!("{grid}");
    println!(
        "{:?}: {} opened, {} closed",
        outcome,
        recorder.count(SearchStatus::Open),
        recorder.count(SearchStatus::Closed)
    );
}

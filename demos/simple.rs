use grid_astar::{search_marked, Grid, NoopObserver};

// In this example a path is found on a grid with shape
//  _____
// |S    |
// | ### |
// |   # |
// | #  E|
// |     |
//  _____
// where
// - # marks an obstacle
// - S marks the start
// - E marks the end
//
// Nodes have a 4-neighborhood

fn main() {
    env_logger::init();
    let map = "S....\n.###.\n...#.\n.#..E\n.....";
    let mut grid: Grid = match map.parse() {
        Ok(grid) => grid,
        Err(e) => {
            eprintln!("{e}");
            return;
        }
    };
    match search_marked(&mut grid, &mut NoopObserver) {
        Ok(outcome) => {
            println!("{grid}");
            if let Some(path) = outcome.path() {
                println!("Path of cost {}:", path.len() - 1);
                for p in path {
                    println!("{:?}", p);
                }
            } else {
                println!("No path");
            }
        }
        Err(e) => eprintln!("{e}"),
    }
}

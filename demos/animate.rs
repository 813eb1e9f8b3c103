use grid_astar::{pos, AstarSearch, Flow, Grid, Point, Role, SearchStatus};

// Drives a search one frontier iteration at a time and prints the grid after every iteration,
// the way a renderer would draw one frame per step.

fn main() {
    env_logger::init();
    let mut grid = Grid::new(8).unwrap();
    // Same placement sequence an editor would produce: start, end, then walls
    for p in [pos(0, 0), pos(7, 7)] {
        grid.paint(p).unwrap();
    }
    for row in 1..7 {
        grid.set_role(pos(row, 4), Role::Obstacle).unwrap();
    }
    for col in 1..4 {
        grid.set_role(pos(5, col), Role::Obstacle).unwrap();
    }

    let mut transitions = 0;
    let mut observer = |_: &Grid, _: Point, _: SearchStatus| {
        transitions += 1;
        Flow::Continue
    };
    let (start, end) = (pos(0, 0), pos(7, 7));
    let mut astar = AstarSearch::new(&mut grid, start, end, &mut observer).unwrap();
    let outcome = loop {
        if let Some(outcome) = astar.step() {
            break outcome;
        }
        println!("Step {}:\n{}", astar.expansions(), astar.grid());
    };
    println!("Final:\n{}", astar.grid());
    println!(
        "{:?} after {} expansions, cost {:?}",
        outcome.cost(),
        astar.expansions(),
        astar.g_score(&end)
    );
    println!("{transitions} transitions observed");
}

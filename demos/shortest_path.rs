use collector_maze::{Cell, FoodSet, GridPathfinder, MazeGrid};
use grid_util::point::Point;

// In this example a path is found on a 3x3 grid with shape
//  ___
// |S F|
// | # |
// |F E|
//  ___
// where
// - # marks an obstacle
// - S marks the start
// - E marks the end
// - F marks a target for the nearest target query
//
// Nodes have a 4-neighborhood

fn main() {
    let mut grid = MazeGrid::new(3, 3, Cell::Open);
    grid.set_cell(Point::new(1, 1), Cell::Wall);
    println!("{}", grid);
    let solver = GridPathfinder::new();
    let start = grid.start();
    let end = grid.goal();
    println!("Path:");
    for p in solver.shortest_path(&grid, start, end) {
        println!("{:?}", p);
    }
    let targets: FoodSet = [Point::new(2, 0), Point::new(0, 2)].into_iter().collect();
    if let Some((target, path)) = solver.path_to_nearest(&grid, start, &targets) {
        println!("Nearest target: {:?}, reached in {} steps", target, path.len() - 1);
    }
}

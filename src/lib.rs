//! # collector_maze
//!
//! Procedural generation of always-solvable grid mazes and route planning for an agent that has
//! to collect every reward on the way to the goal. Mazes are carved with a randomized
//! [depth-first backtracker](https://en.wikipedia.org/wiki/Maze_generation_algorithm#Randomized_depth-first_search),
//! repaired so that the goal is always reachable and then opened up with extra loops.
//! Paths are found with [breadth-first search](https://en.wikipedia.org/wiki/Breadth-first_search)
//! on a 4-connected grid. Connected components are tracked so that hopeless queries can be
//! answered without flood-filling.
//!
//! The collector route is built greedily: always walk to the nearest remaining reward, then to
//! the goal. This is a heuristic and not an optimal tour.
mod bfs;
pub mod generator;
pub mod level;
pub mod maze_grid;
pub mod pathfinder;
pub mod planner;

pub use generator::{MazeConfig, MazeGenerator};
pub use level::{Level, Solution, SolutionStore};
pub use maze_grid::{Cell, GridError, MazeGrid};
pub use pathfinder::{GridPathfinder, PathError};
pub use planner::CollectorPlanner;

use fxhash::FxBuildHasher;
use grid_util::point::Point;
use indexmap::IndexSet;
use itertools::Itertools;
use rand::Rng;

/// Smallest number of rows or columns a generated maze can have.
pub const MIN_DIMENSION: usize = 2;
/// Lower bound of the fraction of loop candidates that get opened after carving.
pub const DEFAULT_LOOP_RATIO_MIN: f64 = 0.25;
/// Upper bound of the fraction of loop candidates that get opened after carving.
pub const DEFAULT_LOOP_RATIO_MAX: f64 = 0.40;
pub const WALL_TOKEN: &str = "#";
pub const EMPTY_TOKEN: &str = " ";

pub(crate) const N_SMALLVEC_SIZE: usize = 4;

pub type FxIndexSet<T> = IndexSet<T, FxBuildHasher>;

/// Ordered sequence of 4-connected steps. Empty means that no path exists.
pub type Path = Vec<Point>;

/// Uncollected reward positions. Iteration order is insertion order, which keeps planning
/// deterministic for a given input.
pub type FoodSet = FxIndexSet<Point>;

/// Generates a `rows` x `cols` maze with the default loop ratio. See [MazeGenerator::generate].
pub fn generate<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> MazeGrid {
    MazeGenerator::new(MazeConfig::new(rows, cols)).generate(rng)
}

/// Builds a route from `start` through every food position to `goal`. Returns an empty path if
/// any leg cannot be walked. See [CollectorPlanner::build_collector_path].
pub fn build_collector_path(grid: &MazeGrid, start: Point, foods: &FoodSet, goal: Point) -> Path {
    CollectorPlanner::new().build_collector_path(grid, start, foods, goal)
}

/// Checks that every consecutive pair of points differs by exactly one unit along exactly one
/// axis.
pub fn is_contiguous(path: &[Point]) -> bool {
    path.iter()
        .tuple_windows()
        .all(|(a, b)| (a.x - b.x).abs() + (a.y - b.y).abs() == 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn contiguity() {
        let good = vec![Point::new(0, 0), Point::new(1, 0), Point::new(1, 1)];
        let diagonal = vec![Point::new(0, 0), Point::new(1, 1)];
        let repeated = vec![Point::new(0, 0), Point::new(0, 0)];
        assert!(is_contiguous(&good));
        assert!(!is_contiguous(&diagonal));
        assert!(!is_contiguous(&repeated));
        assert!(is_contiguous(&[]));
        assert!(is_contiguous(&[Point::new(3, 3)]));
    }

    /// The top level functions should agree with the components they wrap.
    #[test]
    fn entry_points() {
        let mut rng = StdRng::seed_from_u64(7);
        let grid = generate(9, 11, &mut rng);
        let foods: FoodSet = grid.reward_positions().into_iter().collect();
        assert!(foods.is_empty());
        let path = build_collector_path(&grid, grid.start(), &foods, grid.goal());
        assert_eq!(
            path,
            GridPathfinder::new().shortest_path(&grid, grid.start(), grid.goal())
        );
    }
}

use crate::bfs::bfs;
use crate::maze_grid::MazeGrid;
use crate::{FoodSet, Path};
use core::fmt;
use grid_util::point::Point;
use log::warn;

/// Reasons a query could not produce a path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathError {
    OutOfBounds(Point),
    BlockedEndpoint(Point),
    Unreachable { start: Point, goal: Point },
    NoReachableTarget { start: Point },
    UnreachableFood { from: Point, remaining: usize },
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PathError::OutOfBounds(p) => write!(f, "{} is outside of the grid", p),
            PathError::BlockedEndpoint(p) => write!(f, "{} is a wall", p),
            PathError::Unreachable { start, goal } => {
                write!(f, "{} is not reachable from {}", goal, start)
            }
            PathError::NoReachableTarget { start } => {
                write!(f, "no target is reachable from {}", start)
            }
            PathError::UnreachableFood { from, remaining } => {
                write!(f, "{} remaining food items are not reachable from {}", remaining, from)
            }
        }
    }
}

impl std::error::Error for PathError {}

/// Breadth-first shortest path and nearest target queries on a [MazeGrid]. Open and reward cells
/// are passable, walls are not. Neighbours are expanded up, right, down, left, so among equally
/// short paths the result is always the same one.
///
/// The plain queries return an empty path or [None] on failure; the `try_` variants report why.
#[derive(Clone, Debug)]
pub struct GridPathfinder {
    /// Consult the grid's connected components before searching, so that disconnected endpoints
    /// are rejected without a flood fill.
    pub use_components: bool,
}

impl Default for GridPathfinder {
    fn default() -> GridPathfinder {
        GridPathfinder {
            use_components: true,
        }
    }
}

impl GridPathfinder {
    pub fn new() -> GridPathfinder {
        GridPathfinder::default()
    }

    fn check_endpoint(grid: &MazeGrid, point: Point) -> Result<(), PathError> {
        if !grid.in_bounds(point) {
            Err(PathError::OutOfBounds(point))
        } else if grid.is_wall(point) {
            Err(PathError::BlockedEndpoint(point))
        } else {
            Ok(())
        }
    }

    /// Shortest path from `start` to `goal`, inclusive of both, or an empty path.
    pub fn shortest_path(&self, grid: &MazeGrid, start: Point, goal: Point) -> Path {
        self.try_shortest_path(grid, start, goal).unwrap_or_default()
    }

    pub fn try_shortest_path(
        &self,
        grid: &MazeGrid,
        start: Point,
        goal: Point,
    ) -> Result<Path, PathError> {
        Self::check_endpoint(grid, start)?;
        Self::check_endpoint(grid, goal)?;
        let unreachable = PathError::Unreachable { start, goal };
        if self.use_components && grid.unreachable(&start, &goal) {
            return Err(unreachable);
        }
        bfs(&start, |p| grid.passable_neighbours(p), |p| *p == goal).ok_or_else(|| {
            if self.use_components && !grid.components_dirty() {
                warn!("Reachable goal could not be pathed to, are the components correct?");
            }
            unreachable
        })
    }

    /// The first target met by a breadth-first expansion from `start`, which is a target at the
    /// smallest step distance. Returns [None] if `targets` is empty or none can be reached.
    pub fn nearest_target(
        &self,
        grid: &MazeGrid,
        start: Point,
        targets: &FoodSet,
    ) -> Option<Point> {
        self.try_nearest_target(grid, start, targets).ok()
    }

    pub fn try_nearest_target(
        &self,
        grid: &MazeGrid,
        start: Point,
        targets: &FoodSet,
    ) -> Result<Point, PathError> {
        self.try_path_to_nearest(grid, start, targets).map(|(target, _)| target)
    }

    /// Like [nearest_target](Self::nearest_target), but also returns the path that the search
    /// found to it. This path is the one [shortest_path](Self::shortest_path) would return.
    pub fn path_to_nearest(
        &self,
        grid: &MazeGrid,
        start: Point,
        targets: &FoodSet,
    ) -> Option<(Point, Path)> {
        self.try_path_to_nearest(grid, start, targets).ok()
    }

    pub fn try_path_to_nearest(
        &self,
        grid: &MazeGrid,
        start: Point,
        targets: &FoodSet,
    ) -> Result<(Point, Path), PathError> {
        Self::check_endpoint(grid, start)?;
        let no_target = PathError::NoReachableTarget { start };
        if targets.is_empty() {
            return Err(no_target);
        }
        let path = bfs(&start, |p| grid.passable_neighbours(p), |p| targets.contains(p))
            .ok_or(no_target)?;
        match path.last() {
            Some(&target) => Ok((target, path)),
            None => Err(PathError::NoReachableTarget { start }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze_grid::Cell;
    use crate::{is_contiguous, FoodSet};

    fn grid_from(rows: &[&str]) -> MazeGrid {
        let tokens = rows
            .iter()
            .map(|row| {
                row.chars()
                    .map(|c| if c == '#' { "#" } else { " " })
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();
        MazeGrid::from_tokens(&tokens).unwrap()
    }

    /// Asserts that the case in which start and goal are equal is handled correctly.
    #[test]
    fn equal_start_goal() {
        let grid = MazeGrid::new(1, 1, Cell::Open);
        let start = Point::new(0, 0);
        let path = GridPathfinder::new().shortest_path(&grid, start, start);
        assert_eq!(path, vec![start]);
    }

    /// Asserts that the optimal 4 step solution is found.
    #[test]
    fn solve_simple_problem() {
        let grid = grid_from(&["...", ".#.", "..."]);
        let path = GridPathfinder::new().shortest_path(&grid, Point::new(0, 0), Point::new(2, 2));
        assert_eq!(path.len(), 5);
        assert!(is_contiguous(&path));
        // Up, right, down, left: going right is tried before going down.
        assert_eq!(path[1], Point::new(1, 0));
    }

    #[test]
    fn deterministic_tie_break() {
        let grid = MazeGrid::new(4, 4, Cell::Open);
        let solver = GridPathfinder::new();
        let a = solver.shortest_path(&grid, Point::new(0, 0), Point::new(3, 3));
        let b = solver.shortest_path(&grid, Point::new(0, 0), Point::new(3, 3));
        assert_eq!(a, b);
        assert_eq!(a.len(), 7);
    }

    #[test]
    fn failure_reasons() {
        let grid = grid_from(&["..#", ".##", "#.."]);
        let solver = GridPathfinder::new();
        let start = Point::new(0, 0);
        assert_eq!(
            solver.try_shortest_path(&grid, Point::new(-1, 0), start),
            Err(PathError::OutOfBounds(Point::new(-1, 0)))
        );
        assert_eq!(
            solver.try_shortest_path(&grid, start, Point::new(3, 0)),
            Err(PathError::OutOfBounds(Point::new(3, 0)))
        );
        assert_eq!(
            solver.try_shortest_path(&grid, start, Point::new(2, 0)),
            Err(PathError::BlockedEndpoint(Point::new(2, 0)))
        );
        let goal = Point::new(2, 2);
        assert_eq!(
            solver.try_shortest_path(&grid, start, goal),
            Err(PathError::Unreachable { start, goal })
        );
        assert!(solver.shortest_path(&grid, start, goal).is_empty());
    }

    /// Without the component shortcut the search itself has to discover disconnection.
    #[test]
    fn unreachable_without_components() {
        let grid = grid_from(&[".#.", ".#.", ".#."]);
        let solver = GridPathfinder {
            use_components: false,
        };
        let (start, goal) = (Point::new(0, 0), Point::new(2, 2));
        assert_eq!(
            solver.try_shortest_path(&grid, start, goal),
            Err(PathError::Unreachable { start, goal })
        );
    }

    /// Rewards are walked over like open cells.
    #[test]
    fn rewards_are_passable() {
        let grid = MazeGrid::from_tokens(&[vec![" ", "🍖", " "]]).unwrap();
        let path = GridPathfinder::new().shortest_path(&grid, Point::new(0, 0), Point::new(2, 0));
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn test_nearest_target() {
        //  ___
        // |S.T|
        // |.#.|
        // |..T|
        //  ___
        let grid = grid_from(&["...", ".#.", "..."]);
        let solver = GridPathfinder::new();
        let start = Point::new(0, 0);
        let mut targets = FoodSet::default();
        targets.insert(Point::new(2, 2));
        targets.insert(Point::new(2, 0));
        assert_eq!(solver.nearest_target(&grid, start, &targets), Some(Point::new(2, 0)));

        let (target, path) = solver.path_to_nearest(&grid, start, &targets).unwrap();
        assert_eq!(target, Point::new(2, 0));
        assert_eq!(path, solver.shortest_path(&grid, start, target));

        // A target on the start is found without moving.
        targets.insert(start);
        assert_eq!(solver.nearest_target(&grid, start, &targets), Some(start));
    }

    #[test]
    fn nearest_target_failures() {
        let grid = grid_from(&[".#.", "##."]);
        let solver = GridPathfinder::new();
        let start = Point::new(0, 0);
        assert_eq!(solver.nearest_target(&grid, start, &FoodSet::default()), None);
        let targets: FoodSet = [Point::new(2, 1), Point::new(1, 0)].into_iter().collect();
        assert_eq!(
            solver.try_nearest_target(&grid, start, &targets),
            Err(PathError::NoReachableTarget { start })
        );
        assert_eq!(
            solver.try_nearest_target(&grid, Point::new(1, 1), &targets),
            Err(PathError::BlockedEndpoint(Point::new(1, 1)))
        );
    }
}

use crate::maze_grid::MazeGrid;
use crate::pathfinder::{GridPathfinder, PathError};
use crate::{FoodSet, Path};
use grid_util::point::Point;
use log::{debug, trace};

/// Appends a segment to a route, dropping the segment's first point when it repeats the
/// route's last one.
fn append_segment(route: &mut Path, segment: Path) {
    let skip = usize::from(!route.is_empty());
    route.extend(segment.into_iter().skip(skip));
}

/// Greedy nearest-first route planning: walk to the closest remaining food until none is left,
/// then walk to the goal. The total length is not minimal in general.
#[derive(Clone, Debug, Default)]
pub struct CollectorPlanner {
    pub pathfinder: GridPathfinder,
}

impl CollectorPlanner {
    pub fn new() -> CollectorPlanner {
        CollectorPlanner::default()
    }

    pub fn with_pathfinder(pathfinder: GridPathfinder) -> CollectorPlanner {
        CollectorPlanner { pathfinder }
    }

    /// One contiguous path from `start` through every food position to `goal`, or an empty path
    /// if some leg cannot be walked.
    pub fn build_collector_path(
        &self,
        grid: &MazeGrid,
        start: Point,
        foods: &FoodSet,
        goal: Point,
    ) -> Path {
        self.try_build_collector_path(grid, start, foods, goal).unwrap_or_else(|e| {
            debug!("No collector path: {}", e);
            Path::new()
        })
    }

    pub fn try_build_collector_path(
        &self,
        grid: &MazeGrid,
        start: Point,
        foods: &FoodSet,
        goal: Point,
    ) -> Result<Path, PathError> {
        let mut remaining = foods.clone();
        let mut route = Path::new();
        let mut current = start;
        while !remaining.is_empty() {
            let nearest = self
                .pathfinder
                .try_nearest_target(grid, current, &remaining)
                .map_err(|e| match e {
                    PathError::NoReachableTarget { start } => PathError::UnreachableFood {
                        from: start,
                        remaining: remaining.len(),
                    },
                    other => other,
                })?;
            let segment = self.pathfinder.try_shortest_path(grid, current, nearest)?;
            trace!("Collecting {} from {} in {} steps", nearest, current, segment.len() - 1);
            append_segment(&mut route, segment);
            remaining.swap_remove(&nearest);
            current = nearest;
        }
        let last = self.pathfinder.try_shortest_path(grid, current, goal)?;
        append_segment(&mut route, last);
        Ok(route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::is_contiguous;
    use crate::maze_grid::Cell;

    fn foods(points: &[(i32, i32)]) -> FoodSet {
        points.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn open_field_route() {
        let grid = MazeGrid::new(5, 5, Cell::Open);
        let planner = CollectorPlanner::new();
        let path = planner.build_collector_path(
            &grid,
            Point::new(0, 0),
            &foods(&[(1, 1), (3, 3)]),
            Point::new(4, 4),
        );
        assert_eq!(path.len(), 9);
        assert!(is_contiguous(&path));
        let first = path.iter().position(|p| *p == Point::new(1, 1)).unwrap();
        let second = path.iter().position(|p| *p == Point::new(3, 3)).unwrap();
        assert_eq!(first, 2);
        assert_eq!(second, 6);
        assert_eq!(path.last(), Some(&Point::new(4, 4)));
    }

    /// Food given in far-to-near order is still collected nearest first.
    #[test]
    fn greedy_order() {
        let grid = MazeGrid::new(1, 6, Cell::Open);
        let path = CollectorPlanner::new().build_collector_path(
            &grid,
            Point::new(0, 0),
            &foods(&[(4, 0), (2, 0)]),
            Point::new(5, 0),
        );
        assert_eq!(path, (0..6).map(|x| Point::new(x, 0)).collect::<Vec<_>>());
    }

    /// Greedy routing takes the closest food first and pays for it on the way back.
    #[test]
    fn greedy_is_not_optimal() {
        let grid = MazeGrid::new(1, 7, Cell::Open);
        let path = CollectorPlanner::new().build_collector_path(
            &grid,
            Point::new(3, 0),
            &foods(&[(2, 0), (6, 0)]),
            Point::new(0, 0),
        );
        // 3 -> 2 -> 6 -> 0 takes 11 steps, 3 -> 6 -> 2 -> 0 would take 9.
        assert_eq!(path.len(), 12);
        assert!(is_contiguous(&path));
        assert_eq!(path[1], Point::new(2, 0));
    }

    #[test]
    fn food_on_start_and_goal() {
        let grid = MazeGrid::new(2, 2, Cell::Open);
        let start = Point::new(0, 0);
        let goal = Point::new(1, 1);
        let path = CollectorPlanner::new().build_collector_path(
            &grid,
            start,
            &foods(&[(0, 0), (1, 1)]),
            goal,
        );
        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&goal));
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn no_food_is_shortest_path() {
        let grid = MazeGrid::new(3, 3, Cell::Open);
        let planner = CollectorPlanner::new();
        let (start, goal) = (Point::new(0, 0), Point::new(2, 2));
        assert_eq!(
            planner.build_collector_path(&grid, start, &FoodSet::default(), goal),
            planner.pathfinder.shortest_path(&grid, start, goal)
        );
    }

    #[test]
    fn walled_in_goal() {
        let mut grid = MazeGrid::new(3, 3, Cell::Wall);
        grid.set_cell(Point::new(0, 0), Cell::Open);
        grid.set_cell(Point::new(2, 2), Cell::Open);
        let planner = CollectorPlanner::new();
        let (start, goal) = (Point::new(0, 0), Point::new(2, 2));
        assert!(planner
            .build_collector_path(&grid, start, &FoodSet::default(), goal)
            .is_empty());
        assert_eq!(
            planner.try_build_collector_path(&grid, start, &foods(&[(2, 2)]), goal),
            Err(PathError::UnreachableFood {
                from: start,
                remaining: 1
            })
        );
        // Food that sits in a wall can never be reached either.
        assert!(planner
            .build_collector_path(&grid, start, &foods(&[(1, 1)]), goal)
            .is_empty());
    }

    #[test]
    fn input_food_set_is_untouched() {
        let grid = MazeGrid::new(3, 3, Cell::Open);
        let food = foods(&[(1, 1), (2, 0)]);
        let before = food.clone();
        let planner = CollectorPlanner::new();
        planner.build_collector_path(&grid, Point::new(0, 0), &food, Point::new(2, 2));
        assert_eq!(food, before);
    }
}

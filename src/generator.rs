use crate::bfs::{bfs, flood};
use crate::maze_grid::{Cell, MazeGrid, NEUMANN_OFFSETS};
use crate::{DEFAULT_LOOP_RATIO_MAX, DEFAULT_LOOP_RATIO_MIN, MIN_DIMENSION};
use grid_util::point::Point;
use itertools::iproduct;
use log::{debug, info, warn};
use rand::seq::SliceRandom;
use rand::Rng;

/// Dimensions and loop density of a generated maze.
#[derive(Clone, Debug, PartialEq)]
pub struct MazeConfig {
    pub rows: usize,
    pub cols: usize,
    /// Fraction of loop candidates to open, drawn uniformly from this inclusive range.
    pub loop_ratio: (f64, f64),
}

impl Default for MazeConfig {
    fn default() -> MazeConfig {
        MazeConfig {
            rows: 21,
            cols: 21,
            loop_ratio: (DEFAULT_LOOP_RATIO_MIN, DEFAULT_LOOP_RATIO_MAX),
        }
    }
}

impl MazeConfig {
    pub fn new(rows: usize, cols: usize) -> MazeConfig {
        MazeConfig {
            rows,
            cols,
            ..MazeConfig::default()
        }
    }
    /// Sets the loop ratio range. See [normalize_loop_ratio] for how bounds are adjusted.
    pub fn with_loop_ratio(mut self, min: f64, max: f64) -> MazeConfig {
        self.loop_ratio = normalize_loop_ratio((min, max));
        self
    }
    /// Disables loop injection, leaving a spanning-tree maze.
    pub fn without_loops(self) -> MazeConfig {
        self.with_loop_ratio(0.0, 0.0)
    }
}

/// Clamps both bounds to `[0, 1]` and swaps them if reversed. NaN counts as 0.
pub fn normalize_loop_ratio((min, max): (f64, f64)) -> (f64, f64) {
    let bound = |r: f64| if r.is_nan() { 0.0 } else { r.clamp(0.0, 1.0) };
    let (min, max) = (bound(min), bound(max));
    if min <= max {
        (min, max)
    } else {
        (max, min)
    }
}

/// Stack frame of the iterative backtracker: a maze cell, its shuffled directions and how many
/// of them have been tried.
struct CarveFrame {
    cell: Point,
    directions: [(i32, i32); 4],
    next: usize,
}

impl CarveFrame {
    fn new<R: Rng + ?Sized>(cell: Point, rng: &mut R) -> CarveFrame {
        let mut directions = NEUMANN_OFFSETS;
        directions.shuffle(rng);
        CarveFrame {
            cell,
            directions,
            next: 0,
        }
    }
}

/// [MazeGenerator] carves a maze with a randomized depth-first backtracker over the
/// even-coordinate cells, makes sure the goal is reachable from the start and then opens a
/// random share of the walls that separate two open cells. All randomness comes from the
/// supplied [Rng], so equal seeds give equal mazes.
#[derive(Clone, Debug, Default)]
pub struct MazeGenerator {
    config: MazeConfig,
}

impl MazeGenerator {
    pub fn new(mut config: MazeConfig) -> MazeGenerator {
        if config.rows < MIN_DIMENSION || config.cols < MIN_DIMENSION {
            warn!(
                "Maze dimensions {}x{} are too small, using at least {}x{}",
                config.rows, config.cols, MIN_DIMENSION, MIN_DIMENSION
            );
            config.rows = config.rows.max(MIN_DIMENSION);
            config.cols = config.cols.max(MIN_DIMENSION);
        }
        let loop_ratio = normalize_loop_ratio(config.loop_ratio);
        if loop_ratio != config.loop_ratio {
            warn!(
                "Loop ratio {:?} is outside of [0, 1], using {:?}",
                config.loop_ratio, loop_ratio
            );
            config.loop_ratio = loop_ratio;
        }
        MazeGenerator { config }
    }

    pub fn config(&self) -> &MazeConfig {
        &self.config
    }

    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> MazeGrid {
        info!("Generating {}x{} maze", self.config.rows, self.config.cols);
        let mut grid = MazeGrid::new(self.config.rows, self.config.cols, Cell::Wall);
        carve(&mut grid, rng);
        let start = grid.start();
        let goal = grid.goal();
        grid.set_cell(start, Cell::Open);
        grid.set_cell(goal, Cell::Open);
        let tunnelled = connect_goal(&mut grid);
        if tunnelled > 0 {
            debug!("Carved {} cells to connect {} to {}", tunnelled, goal, start);
        }
        let opened = self.inject_loops(&mut grid, rng);
        debug!("Opened {} walls to create loops", opened);
        grid
    }

    /// Opens a random share of the interior walls that touch at least two open cells. Candidates
    /// are collected before any wall is removed.
    fn inject_loops<R: Rng + ?Sized>(&self, grid: &mut MazeGrid, rng: &mut R) -> usize {
        let mut candidates = iproduct!(1..grid.rows() - 1, 1..grid.cols() - 1)
            .map(|(y, x)| Point::new(x as i32, y as i32))
            .filter(|p| grid.is_wall(*p) && grid.passable_neighbours(p).len() >= 2)
            .collect::<Vec<Point>>();
        let (min, max) = self.config.loop_ratio;
        let ratio = if min < max {
            rng.gen_range(min..=max)
        } else {
            min
        };
        let count = ((candidates.len() as f64 * ratio) as usize).min(candidates.len());
        candidates.shuffle(rng);
        for p in &candidates[..count] {
            grid.set_cell(*p, Cell::Open);
        }
        count
    }
}

/// Iterative randomized depth-first carving from the start. Only cells with even coordinates
/// are maze cells; the wall between two of them is opened when the far one is first visited.
fn carve<R: Rng + ?Sized>(grid: &mut MazeGrid, rng: &mut R) {
    let cols = grid.cols();
    let mut visited = vec![false; grid.rows() * cols];
    let start = grid.start();
    visited[0] = true;
    grid.set_cell(start, Cell::Open);
    let mut stack = vec![CarveFrame::new(start, rng)];
    while let Some(frame) = stack.last_mut() {
        if frame.next == frame.directions.len() {
            stack.pop();
            continue;
        }
        let (dx, dy) = frame.directions[frame.next];
        frame.next += 1;
        let cell = frame.cell;
        let far = Point::new(cell.x + 2 * dx, cell.y + 2 * dy);
        if !grid.in_bounds(far) {
            continue;
        }
        let far_ix = far.y as usize * cols + far.x as usize;
        if visited[far_ix] {
            continue;
        }
        visited[far_ix] = true;
        grid.set_cell(Point::new(cell.x + dx, cell.y + dy), Cell::Open);
        grid.set_cell(far, Cell::Open);
        stack.push(CarveFrame::new(far, rng));
    }
}

/// Makes the goal reachable from the start. If it is not, a search from the goal that may pass
/// through walls finds the closest cell already reachable from the start and every wall on the
/// way is opened. Returns the number of opened cells.
fn connect_goal(grid: &mut MazeGrid) -> usize {
    let start = grid.start();
    let goal = grid.goal();
    let reached = flood(&start, |p| grid.passable_neighbours(p));
    if reached.contains_key(&goal) {
        return 0;
    }
    let tunnel = match bfs(&goal, |p| grid.neighbours(p), |p| reached.contains_key(p)) {
        Some(tunnel) => tunnel,
        None => {
            // Only possible if the start is out of the grid.
            warn!("No cell reachable from {} could be found from {}", start, goal);
            return 0;
        }
    };
    let mut opened = 0;
    for p in tunnel {
        if grid.is_wall(p) {
            grid.set_cell(p, Cell::Open);
            opened += 1;
        }
    }
    opened
}

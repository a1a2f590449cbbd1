use crate::{EMPTY_TOKEN, N_SMALLVEC_SIZE, WALL_TOKEN};
use core::fmt;
use grid_util::point::Point;
use itertools::iproduct;
use log::{debug, warn};
use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;

/// Offsets in the fixed expansion order up, right, down, left. Every search in this crate walks
/// neighbours in this order, which makes tie-breaking between equally short paths deterministic.
pub const NEUMANN_OFFSETS: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// State of a single grid cell. Rewards carry a display token that is irrelevant to pathing.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Cell {
    Wall,
    Open,
    Reward(String),
}

impl Cell {
    /// Any non-wall cell can be walked over.
    pub fn is_passable(&self) -> bool {
        !matches!(self, Cell::Wall)
    }
    pub fn is_reward(&self) -> bool {
        matches!(self, Cell::Reward(_))
    }
    pub fn token(&self) -> &str {
        match self {
            Cell::Wall => WALL_TOKEN,
            Cell::Open => EMPTY_TOKEN,
            Cell::Reward(token) => token,
        }
    }
    /// Inverse of [token](Self::token): anything that is not the wall or empty token is a reward.
    pub fn from_token(token: &str) -> Cell {
        match token {
            WALL_TOKEN => Cell::Wall,
            EMPTY_TOKEN => Cell::Open,
            other => Cell::Reward(other.to_owned()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GridError {
    Empty,
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GridError::Empty => write!(f, "grid has no cells"),
            GridError::Ragged {
                row,
                expected,
                found,
            } => write!(
                f,
                "row {} has {} cells but {} were expected",
                row, found, expected
            ),
        }
    }
}

impl std::error::Error for GridError {}

/// [MazeGrid] stores the cell states of a rectangular maze in row-major order together with a
/// [UnionFind] structure over the passable cells. The components are kept up to date when cells
/// are opened and are flagged as dirty when a wall is placed, since that can split a component.
///
/// The start is always the top-left corner and the goal the bottom-right corner.
#[derive(Clone, Debug)]
pub struct MazeGrid {
    cells: Vec<Cell>,
    rows: usize,
    cols: usize,
    components: UnionFind<usize>,
    components_dirty: bool,
}

impl MazeGrid {
    /// Creates a grid filled with `fill`. A grid always has at least one row and one column, so
    /// zero dimensions are raised to 1.
    pub fn new(rows: usize, cols: usize, fill: Cell) -> MazeGrid {
        if rows == 0 || cols == 0 {
            warn!("Grid of {}x{} cells would be empty, using at least 1x1", rows, cols);
        }
        let (rows, cols) = (rows.max(1), cols.max(1));
        let mut grid = MazeGrid {
            cells: vec![fill; rows * cols],
            rows,
            cols,
            components: UnionFind::new(rows * cols),
            components_dirty: false,
        };
        grid.generate_components();
        grid
    }

    /// Parses a matrix of string tokens. See [Cell::from_token] for the token scheme.
    pub fn from_tokens<S: AsRef<str>>(rows: &[Vec<S>]) -> Result<MazeGrid, GridError> {
        let cols = rows.first().map_or(0, |row| row.len());
        if cols == 0 {
            return Err(GridError::Empty);
        }
        let mut cells = Vec::with_capacity(rows.len() * cols);
        for (row_ix, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(GridError::Ragged {
                    row: row_ix,
                    expected: cols,
                    found: row.len(),
                });
            }
            cells.extend(row.iter().map(|token| Cell::from_token(token.as_ref())));
        }
        let mut grid = MazeGrid {
            cells,
            rows: rows.len(),
            cols,
            components: UnionFind::new(rows.len() * cols),
            components_dirty: true,
        };
        grid.generate_components();
        Ok(grid)
    }

    /// The grid as a rows x cols matrix of tokens, which is the form handed to renderers and
    /// clients.
    pub fn tokens(&self) -> Vec<Vec<String>> {
        self.cells
            .chunks(self.cols.max(1))
            .map(|row| row.iter().map(|cell| cell.token().to_owned()).collect())
            .collect()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }
    pub fn cols(&self) -> usize {
        self.cols
    }
    pub fn start(&self) -> Point {
        Point::new(0, 0)
    }
    pub fn goal(&self) -> Point {
        Point::new(self.cols as i32 - 1, self.rows as i32 - 1)
    }

    pub fn in_bounds(&self, point: Point) -> bool {
        point.x >= 0
            && point.y >= 0
            && (point.x as usize) < self.cols
            && (point.y as usize) < self.rows
    }
    fn get_ix(&self, point: Point) -> Option<usize> {
        if self.in_bounds(point) {
            Some(point.y as usize * self.cols + point.x as usize)
        } else {
            None
        }
    }
    pub fn get(&self, point: Point) -> Option<&Cell> {
        self.get_ix(point).map(|ix| &self.cells[ix])
    }
    pub fn is_passable(&self, point: Point) -> bool {
        self.get(point).is_some_and(Cell::is_passable)
    }
    /// Out of bounds points are not walls, they do not exist.
    pub fn is_wall(&self, point: Point) -> bool {
        matches!(self.get(point), Some(Cell::Wall))
    }

    /// In-bounds 4-neighbours of a point in the order up, right, down, left.
    pub fn neighbours(&self, point: &Point) -> SmallVec<[Point; N_SMALLVEC_SIZE]> {
        NEUMANN_OFFSETS
            .iter()
            .map(|(dx, dy)| Point::new(point.x + dx, point.y + dy))
            .filter(|p| self.in_bounds(*p))
            .collect()
    }
    /// Passable 4-neighbours of a point in the order up, right, down, left.
    pub fn passable_neighbours(&self, point: &Point) -> SmallVec<[Point; N_SMALLVEC_SIZE]> {
        NEUMANN_OFFSETS
            .iter()
            .map(|(dx, dy)| Point::new(point.x + dx, point.y + dy))
            .filter(|p| self.is_passable(*p))
            .collect()
    }

    /// Updates a cell and returns the previous state, or [None] if the point is out of bounds.
    /// Opening a cell joins it with its passable neighbours. Walling off a passable cell flags
    /// the components as dirty.
    pub fn set_cell(&mut self, point: Point, cell: Cell) -> Option<Cell> {
        let ix = self.get_ix(point)?;
        let was_passable = self.cells[ix].is_passable();
        if was_passable && !cell.is_passable() {
            self.components_dirty = true;
        } else if !was_passable && cell.is_passable() {
            let joined = self
                .passable_neighbours(&point)
                .into_iter()
                .filter_map(|p| self.get_ix(p))
                .collect::<SmallVec<[usize; N_SMALLVEC_SIZE]>>();
            for n_ix in joined {
                self.components.union(ix, n_ix);
            }
        }
        Some(std::mem::replace(&mut self.cells[ix], cell))
    }

    /// Marks a reward as collected by turning it into an open cell and hands back its token.
    pub fn consume(&mut self, point: Point) -> Option<String> {
        let ix = self.get_ix(point)?;
        match std::mem::replace(&mut self.cells[ix], Cell::Open) {
            Cell::Reward(token) => Some(token),
            other => {
                self.cells[ix] = other;
                None
            }
        }
    }

    /// All reward positions in row-major order.
    pub fn reward_positions(&self) -> Vec<Point> {
        iproduct!(0..self.rows, 0..self.cols)
            .map(|(y, x)| Point::new(x as i32, y as i32))
            .filter(|p| self.get(*p).is_some_and(Cell::is_reward))
            .collect()
    }

    /// Number of cells in each state as `(walls, open, rewards)`.
    pub fn census(&self) -> (usize, usize, usize) {
        self.cells
            .iter()
            .fold((0, 0, 0), |(w, o, r), cell| match cell {
                Cell::Wall => (w + 1, o, r),
                Cell::Open => (w, o + 1, r),
                Cell::Reward(_) => (w, o, r + 1),
            })
    }

    pub fn components_dirty(&self) -> bool {
        self.components_dirty
    }

    /// Checks if start and goal are known to lie on different components. Dirty components
    /// cannot rule anything out, so this is [false] until [update](Self::update) is called.
    pub fn unreachable(&self, start: &Point, goal: &Point) -> bool {
        match (self.get_ix(*start), self.get_ix(*goal)) {
            (Some(start_ix), Some(goal_ix)) => {
                !self.components_dirty && !self.components.equiv(start_ix, goal_ix)
            }
            _ => true,
        }
    }

    /// Regenerates the components if they are marked as dirty.
    pub fn update(&mut self) {
        if self.components_dirty {
            self.generate_components();
        }
    }

    /// Generates a new [UnionFind] structure and links up passable neighbours.
    pub fn generate_components(&mut self) {
        debug!("Generating components for {}x{} grid", self.rows, self.cols);
        self.components = UnionFind::new(self.rows * self.cols);
        self.components_dirty = false;
        for (y, x) in iproduct!(0..self.rows, 0..self.cols) {
            let point = Point::new(x as i32, y as i32);
            if !self.is_passable(point) {
                continue;
            }
            let parent_ix = y * self.cols + x;
            // Right and down cover every edge once.
            for p in [Point::new(point.x + 1, point.y), Point::new(point.x, point.y + 1)] {
                if self.is_passable(p) {
                    let ix = p.y as usize * self.cols + p.x as usize;
                    self.components.union(parent_ix, ix);
                }
            }
        }
    }
}

impl fmt::Display for MazeGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.cells.chunks(self.cols.max(1)) {
            let line = row
                .iter()
                .map(|cell| match cell {
                    Cell::Wall => '#',
                    Cell::Open => '.',
                    Cell::Reward(_) => '*',
                })
                .collect::<String>();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

//! Playable levels: a generated maze filled with rewards, split into the part that may be shown
//! to a player and the collector route, which stays on the serving side.
use crate::generator::{MazeConfig, MazeGenerator};
use crate::maze_grid::{Cell, MazeGrid};
use crate::planner::CollectorPlanner;
use crate::{is_contiguous, FoodSet, Path};
use fxhash::FxHashMap;
use grid_util::point::Point;
use itertools::iproduct;
use log::{info, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use std::hash::Hash;

/// Food tokens placed on open cells.
pub const DEFAULT_FOOD_TOKENS: [&str; 14] = [
    "🍗", "🍖", "🍔", "🍟", "🍕", "🌭", "🍣", "🍤", "🍲", "🍜", "🥩", "🍱", "🧀", "🥓",
];

/// Turns every open cell into a reward with a token picked uniformly from `tokens`. Returns the
/// number of rewards placed; an empty token list places none.
pub fn populate_rewards<S, R>(grid: &mut MazeGrid, tokens: &[S], rng: &mut R) -> usize
where
    S: AsRef<str>,
    R: Rng + ?Sized,
{
    if tokens.is_empty() {
        return 0;
    }
    let open = iproduct!(0..grid.rows(), 0..grid.cols())
        .map(|(y, x)| Point::new(x as i32, y as i32))
        .filter(|p| matches!(grid.get(*p), Some(Cell::Open)))
        .collect::<Vec<Point>>();
    for p in &open {
        if let Some(token) = tokens.choose(rng) {
            grid.set_cell(*p, Cell::Reward(token.as_ref().to_owned()));
        }
    }
    open.len()
}

/// The client-visible part of a level. It holds no route.
#[derive(Clone, Debug)]
pub struct Level {
    grid: MazeGrid,
    total_rewards: usize,
}

impl Level {
    /// Generates a maze, fills it with rewards and plans the collector route. The route is
    /// returned separately so that it can be kept away from whatever gets sent to a player.
    pub fn generate<S, R>(config: MazeConfig, food_tokens: &[S], rng: &mut R) -> (Level, Solution)
    where
        S: AsRef<str>,
        R: Rng + ?Sized,
    {
        let mut grid = MazeGenerator::new(config).generate(rng);
        let total_rewards = populate_rewards(&mut grid, food_tokens, rng);
        let level = Level {
            grid,
            total_rewards,
        };
        let solution = Solution::plan(&level, &CollectorPlanner::new());
        info!(
            "Generated {}x{} level with {} rewards and a {} step route",
            level.grid.rows(),
            level.grid.cols(),
            total_rewards,
            solution.len().saturating_sub(1)
        );
        (level, solution)
    }

    /// Wraps an existing grid, counting the rewards already on it.
    pub fn from_grid(grid: MazeGrid) -> Level {
        let total_rewards = grid.reward_positions().len();
        Level {
            grid,
            total_rewards,
        }
    }

    pub fn grid(&self) -> &MazeGrid {
        &self.grid
    }
    /// Mutable access for gameplay, e.g. consuming rewards. Plans made earlier stay as they are.
    pub fn grid_mut(&mut self) -> &mut MazeGrid {
        &mut self.grid
    }
    pub fn start(&self) -> Point {
        self.grid.start()
    }
    pub fn goal(&self) -> Point {
        self.grid.goal()
    }
    /// Rewards placed when the level was created.
    pub fn total_rewards(&self) -> usize {
        self.total_rewards
    }
    pub fn foods(&self) -> FoodSet {
        self.grid.reward_positions().into_iter().collect()
    }
    pub fn tokens(&self) -> Vec<Vec<String>> {
        self.grid.tokens()
    }
}

/// A planned collector route for a [Level]. Empty if the level could not be solved.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Solution {
    path: Path,
}

impl Solution {
    /// Plans a route over a snapshot of the level's current rewards.
    pub fn plan(level: &Level, planner: &CollectorPlanner) -> Solution {
        let path = planner.build_collector_path(
            level.grid(),
            level.start(),
            &level.foods(),
            level.goal(),
        );
        if path.is_empty() {
            warn!("Level could not be solved");
        }
        Solution { path }
    }

    pub fn path(&self) -> &[Point] {
        &self.path
    }
    pub fn len(&self) -> usize {
        self.path.len()
    }
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Checks the route against the level as it is now: it must be contiguous, run from start to
    /// goal over passable cells only and pass every remaining reward.
    pub fn validate(&self, level: &Level) -> bool {
        let grid = level.grid();
        match (self.path.first(), self.path.last()) {
            (Some(first), Some(last)) => {
                *first == grid.start()
                    && *last == grid.goal()
                    && is_contiguous(&self.path)
                    && self.path.iter().all(|p| grid.is_passable(*p))
                    && grid
                        .reward_positions()
                        .iter()
                        .all(|food| self.path.contains(food))
            }
            _ => false,
        }
    }
}

/// Server-side storage of solutions keyed by session or game id.
#[derive(Clone, Debug)]
pub struct SolutionStore<K = String> {
    solutions: FxHashMap<K, Solution>,
}

impl<K> Default for SolutionStore<K> {
    fn default() -> SolutionStore<K> {
        SolutionStore {
            solutions: FxHashMap::default(),
        }
    }
}

impl<K: Eq + Hash> SolutionStore<K> {
    pub fn new() -> SolutionStore<K> {
        SolutionStore::default()
    }
    /// Stores a solution and returns the one it replaced, if any.
    pub fn insert(&mut self, key: K, solution: Solution) -> Option<Solution> {
        self.solutions.insert(key, solution)
    }
    pub fn get(&self, key: &K) -> Option<&Solution> {
        self.solutions.get(key)
    }
    pub fn remove(&mut self, key: &K) -> Option<Solution> {
        self.solutions.remove(key)
    }
    pub fn contains(&self, key: &K) -> bool {
        self.solutions.contains_key(key)
    }
    pub fn len(&self) -> usize {
        self.solutions.len()
    }
    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }
}

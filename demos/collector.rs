use collector_maze::level::{Level, DEFAULT_FOOD_TOKENS};
use collector_maze::MazeConfig;
use rand::rngs::StdRng;
use rand::SeedableRng;

// Generates a seeded 11x15 level, fills every open cell with food and prints the maze next to
// the greedy collector route, where
// - # marks a wall
// - * marks food
// - the numbers give the order in which cells are first entered (mod 10)

fn main() {
    let mut rng = StdRng::seed_from_u64(2024);
    let (level, solution) =
        Level::generate(MazeConfig::new(11, 15), &DEFAULT_FOOD_TOKENS, &mut rng);
    println!("{}", level.grid());
    println!(
        "{} foods, route of {} steps",
        level.total_rewards(),
        solution.len().saturating_sub(1)
    );
    let grid = level.grid();
    let mut canvas = grid
        .tokens()
        .iter()
        .map(|row| {
            row.iter()
                .map(|t| if t == "#" { '#' } else { ' ' })
                .collect::<Vec<char>>()
        })
        .collect::<Vec<_>>();
    for (i, p) in solution.path().iter().enumerate() {
        let cell = &mut canvas[p.y as usize][p.x as usize];
        if *cell == ' ' {
            *cell = char::from_digit((i % 10) as u32, 10).unwrap_or('?');
        }
    }
    for row in canvas {
        println!("{}", row.into_iter().collect::<String>());
    }
}

use seeker_grid::astar::AStarPlanner;
use seeker_grid::map::{Grid, GridConfig, GridPoint, Position};
use seeker_grid::simplify::simplify_path;
use std::collections::HashSet;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 10x10 grid over a 10m x 10m world centered on the origin.
    let config = GridConfig::new(Position::new(0.0, 0.0), 10.0, 10.0, 0.5);

    let obstacles = vec![
        (1, 1), (2, 1), (7, 1), (8, 1),
        (4, 2),
        (2, 3), (3, 3), (4, 3), (5, 3), (7, 3),
        (5, 4), (7, 4),
        (1, 5), (2, 5), (3, 5), (5, 5), (7, 5), (8, 5),
        (3, 6),
        (1, 7), (3, 7), (5, 7), (6, 7), (7, 7),
        (1, 8), (8, 8),
        (3, 9), (4, 9), (5, 9),
    ];
    let blocked: HashSet<(usize, usize)> = obstacles.into_iter().collect();

    // Cell (x, y) has its center at (x - 4.5, y - 4.5); the obstacle query
    // maps each probed center back to its cell and checks the set.
    let grid = Grid::build(config, |center, _| {
        let x = (center.x + 4.5).round() as usize;
        let y = (center.y + 4.5).round() as usize;
        blocked.contains(&(x, y))
    })?;

    let start = Position::new(-4.5, -4.5);
    let goal = Position::new(4.5, 4.5);

    println!("Grid:");
    print_grid(&grid, Some(start), Some(goal), None);
    println!("\nStart: {}", start);
    println!("Goal: {}", goal);

    let mut planner = AStarPlanner::new(&grid);
    let result = planner.plan(&grid, start, goal)?;
    println!("\n{}", result);

    if let Some(path) = result.into_path() {
        let cells: HashSet<(usize, usize)> = path.iter().map(|w| (w.cell.x, w.cell.y)).collect();

        println!("\nGrid with path:");
        print_grid(&grid, Some(start), Some(goal), Some(&cells));

        let waypoints = simplify_path(&path);
        println!("\nSimplified to {} waypoints:", waypoints.len());
        for waypoint in &waypoints {
            println!("  {} at {}", waypoint.cell, waypoint.position);
        }
    } else {
        println!("\nNo path found.");
    }

    Ok(())
}

fn print_grid(
    grid: &Grid,
    start: Option<Position>,
    goal: Option<Position>,
    path: Option<&HashSet<(usize, usize)>>,
) {
    let start_cell = start.map(|p| grid.point_at(p));
    let goal_cell = goal.map(|p| grid.point_at(p));

    // Print from top to bottom (reverse y order for visual clarity)
    for y in (0..grid.size_y()).rev() {
        print!("{} ", y);
        for x in 0..grid.size_x() {
            let point = GridPoint::new(x, y);

            if start_cell == Some(point) {
                print!("S ");
                continue;
            }
            if goal_cell == Some(point) {
                print!("G ");
                continue;
            }
            if let Some(cells) = path {
                if cells.contains(&(x, y)) {
                    print!("* ");
                    continue;
                }
            }

            let walkable = grid.node(grid.index_of(point)).walkable;
            print!("{} ", if walkable { '.' } else { 'X' });
        }
        println!();
    }

    // Print x-axis labels
    print!("  ");
    for x in 0..grid.size_x() {
        print!("{} ", x);
    }
    println!();
}

use seeker_dispatch::coordinator::RequestCoordinator;
use seeker_dispatch::settings::Settings;
use seeker_grid::map::{Grid, Position};

use std::sync::Arc;

use tokio::sync::oneshot;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    let settings = Settings::from_file(concat!(env!("CARGO_MANIFEST_DIR"), "/config/default.toml"))?;

    // A circular obstacle sitting between the two endpoints.
    let obstacle = Position::new(4.0, 2.0);
    let grid = Arc::new(Grid::build(settings.grid, |center, radius| {
        center.distance_to(obstacle) < 6.0 + radius
    })?);
    info!(size_x = grid.size_x(), size_y = grid.size_y(), "grid built");

    let (coordinator, handle) = RequestCoordinator::spawn(grid);

    // Two requests queued back to back; callbacks fire in submission order.
    let (tx_a, rx_a) = oneshot::channel();
    let id = coordinator.request_path(
        Position::new(-30.0, -20.0),
        Position::new(30.0, 20.0),
        Box::new(move |waypoints, found| {
            let _ = tx_a.send((waypoints, found));
        }),
    )?;
    info!(%id, "request submitted");

    let (tx_b, rx_b) = oneshot::channel();
    let id = coordinator.request_path(
        Position::new(-30.0, 20.0),
        Position::new(30.0, -20.0),
        Box::new(move |waypoints, found| {
            let _ = tx_b.send((waypoints, found));
        }),
    )?;
    info!(%id, "request submitted");

    let (waypoints, found) = rx_a.await?;
    report("southwest to northeast", &waypoints, found);
    let (waypoints, found) = rx_b.await?;
    report("northwest to southeast", &waypoints, found);

    // A reset supersedes anything still pending and plans its own request;
    // the queue is already drained here, so it simply runs next.
    let (tx_c, rx_c) = oneshot::channel();
    let id = coordinator.reset_path(
        Position::new(0.0, -20.0),
        Position::new(0.0, 20.0),
        Box::new(move |waypoints, found| {
            let _ = tx_c.send((waypoints, found));
        }),
    )?;
    info!(%id, "reset submitted");

    let (waypoints, found) = rx_c.await?;
    report("reset replan, south to north", &waypoints, found);

    println!("\nStats: {:?}", coordinator.stats());

    drop(coordinator);
    handle.await?;
    Ok(())
}

fn report(label: &str, waypoints: &[Position], found: bool) {
    if found {
        println!("{label}: path with {} waypoints after simplification:", waypoints.len());
        for waypoint in waypoints {
            println!("  {}", waypoint);
        }
    } else {
        println!("{label}: no path found");
    }
}

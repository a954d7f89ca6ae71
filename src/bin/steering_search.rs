// Steering lattice search on a small walled grid.
//
// Loads configs/steering.yaml when present, otherwise uses the default
// vehicle (10 cell steps, 5 deg steering increments, 2.5 m look-ahead).
use nalgebra::DMatrix;
use steering_planner::common::Pose2D;
use steering_planner::path_planning::steering::{
    LatticeMap, SearchConfig, SteeringConfig, SteeringNeighborhood, SteeringSearch,
};
use steering_planner::utils::{OccupancyGrid, FREE, OCCUPIED};
use steering_planner::PlannerResult;

const GRID_SCALE: usize = 10;

/// Walled 24x16 block layout, each block upscaled to 10x10 cells
fn build_grid(resolution: f64) -> PlannerResult<OccupancyGrid> {
    let layout = DMatrix::from_fn(24, 16, |ix, iy| {
        let boundary = ix == 0 || iy == 0 || ix == 23 || iy == 15;
        // wall with an opening at the top
        let wall = ix == 11 && iy < 7;
        if boundary || wall {
            OCCUPIED
        } else {
            FREE
        }
    });
    OccupancyGrid::from_matrix(layout, GRID_SCALE, resolution * GRID_SCALE as f64)
}

fn main() -> PlannerResult<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("Steering lattice search start!!");

    let config = SteeringConfig::load_default()?;
    println!(
        "distance={} steer_steps={} steer_step_deg={} max_steer={} look_ahead={}cm moves={:?}",
        config.distance,
        config.steer_steps,
        config.steer_step_deg,
        config.max_steer,
        config.look_ahead,
        config.moves
    );

    let grid = build_grid(config.resolution)?;
    let resolution = grid.resolution();
    let mut map = LatticeMap::new(grid);
    let neighborhood = SteeringNeighborhood::new(config)?;
    let mut search = SteeringSearch::new(neighborhood, SearchConfig::default());

    let start = Pose2D::new(30.5, 30.5, 0.0);
    let goal = Pose2D::new(200.5, 30.5, 0.0);

    match search.plan(&mut map, start, goal) {
        Ok(path) => {
            println!(
                "Path found: {} poses, cost {:.1}, {} direction switches, {} expansions",
                path.len(),
                path.cost,
                path.direction_switches(),
                search.expansions()
            );
            for pose in path.to_world(resolution) {
                println!("  x={:7.2} m  y={:7.2} m  yaw={:6.3} rad", pose.x, pose.y, pose.yaw);
            }
        }
        Err(e) => println!("No path found: {}", e),
    }

    println!("Steering lattice search finish!!");
    Ok(())
}

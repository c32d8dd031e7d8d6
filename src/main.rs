//! Tether - headless demo
//!
//! Runs a scripted session on a sampled planet and logs the player and
//! grapple state as it goes.

use tether::config::{AppConfig, TerrainKind};
use tether::systems::{demo_script, ScriptedSession, Simulation};
use tether_math::Vec3;

fn main() {
    let config = AppConfig::load();

    let log_level = config
        .as_ref()
        .map(|c| c.debug.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = config.unwrap_or_else(|e| {
        log::warn!("Failed to load config: {}. Using defaults.", e);
        AppConfig::default()
    });

    log::info!("Starting Tether");

    let center = Vec3::from_array(config.planet.center);
    let terrain = config.terrain.build(center);
    log::info!(
        "{} sphere: radius {}, {} samples, gravity {}",
        match config.terrain.kind {
            TerrainKind::Solid => "Solid",
            TerrainKind::Hollow => "Hollow",
        },
        config.terrain.radius,
        config.terrain.samples,
        config.planet.gravity
    );

    let simulation = Simulation::new(terrain, &config);
    let mut session = ScriptedSession::new(simulation, &config, demo_script());
    let summary = session.run(config.session.frames);

    log::info!(
        "Finished after {} frames: position {:?}, speed {:.2}, grapple {:?}, {} contact frames, {} attached frames",
        summary.frames,
        summary.final_position,
        summary.final_speed,
        summary.final_phase,
        summary.contact_frames,
        summary.attached_frames
    );
}

use anyhow::Result;
use clap::Parser;
use winit::event_loop::EventLoop;

use scene_viewer::cli::Cli;
use scene_viewer::{App, ViewerConfig};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = ViewerConfig::from_cli(&cli)?;
    log::info!(
        "Scene viewer - model {:?}. Left drag orbits, right drag pans, wheel zooms, Escape quits",
        config.resolved_model_path()
    );

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    Ok(())
}

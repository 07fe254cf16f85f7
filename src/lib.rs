pub mod app;
pub mod camera;
pub mod cli;
pub mod config;
pub mod controls;
pub mod core;
pub mod loaders;
pub mod math;
pub mod overlay;
pub mod picking;
pub mod renderer;
pub mod scene;

pub use app::App;
pub use camera::PerspectiveCamera;
pub use config::ViewerConfig;
pub use controls::OrbitControls;

// cli.rs - Command-line interface configuration
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "scene-viewer")]
#[command(about = "glTF scene viewer with orbit controls", long_about = None)]
pub struct Cli {
    /// glTF model to load, relative to the asset root
    pub model: Option<PathBuf>,

    /// JSON configuration file; command-line flags take precedence
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Directory the model path is resolved against
    #[arg(long = "asset-root")]
    pub asset_root: Option<PathBuf>,

    /// Uniform scale applied to the loaded model
    #[arg(long)]
    pub scale: Option<f32>,

    /// Initial window width in logical pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Initial window height in logical pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Disable UI elements (axis labels, tooltip, status, FPS)
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,
}

pub mod asset_loader;
pub mod gltf;

pub use asset_loader::{AssetLoader, LoadState};
pub use self::gltf::{flat_shaded, load_gltf, load_gltf_slice, sanitize_node_name};

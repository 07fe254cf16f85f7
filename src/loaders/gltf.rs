use anyhow::{bail, Context, Result};
use glam::{Quat, Vec3};
use std::collections::HashMap;
use std::path::Path;

use crate::scene::{Mesh, Node, Primitive, Transform};

/// Loads the default scene of a glTF file as a single node tree. Images are
/// never read, so missing textures do not stop the geometry from loading.
pub fn load_gltf(path: impl AsRef<Path>) -> Result<Node> {
    let path = path.as_ref();
    log::info!("Loading glTF file: {:?}", path);

    let gltf::Gltf { document, blob } =
        gltf::Gltf::open(path).with_context(|| format!("Failed to load glTF file: {:?}", path))?;
    let buffers = gltf::import_buffers(&document, path.parent(), blob)
        .with_context(|| format!("Failed to load glTF buffers: {:?}", path))?;

    let fallback = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "model".to_string());

    from_document(&document, &buffers, &fallback)
}

/// Loads a self-contained glTF (embedded buffers or GLB) from memory
pub fn load_gltf_slice(bytes: &[u8], name: &str) -> Result<Node> {
    let gltf::Gltf { document, blob } =
        gltf::Gltf::from_slice(bytes).context("Failed to parse glTF data")?;
    let buffers =
        gltf::import_buffers(&document, None, blob).context("Failed to load glTF buffers")?;
    from_document(&document, &buffers, name)
}

fn from_document(
    document: &gltf::Document,
    buffers: &[gltf::buffer::Data],
    fallback_name: &str,
) -> Result<Node> {
    log::debug!(
        "glTF contents: {} scenes, {} nodes, {} meshes",
        document.scenes().count(),
        document.nodes().count(),
        document.meshes().count()
    );
    let images = document.images().count();
    if images > 0 {
        log::warn!("Ignoring {} images, materials use their base color only", images);
    }

    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .context("glTF file contains no scene")?;

    let mut names = UniqueNames::default();
    let root_name = scene
        .name()
        .map(sanitize_node_name)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| sanitize_node_name(fallback_name));

    let mut root = Node::new(root_name);
    for node in scene.nodes() {
        root.children.push(process_node(&node, buffers, &mut names)?);
    }

    if root.primitive_count() == 0 {
        log::warn!("No triangle geometry found in glTF scene");
    }
    log::info!(
        "Extracted {} nodes and {} primitives",
        root.node_count(),
        root.primitive_count()
    );
    Ok(root)
}

/// Recursively converts glTF nodes, keeping their local transforms
fn process_node(
    node: &gltf::Node,
    buffers: &[gltf::buffer::Data],
    names: &mut UniqueNames,
) -> Result<Node> {
    let (translation, rotation, scale) = node.transform().decomposed();
    let node_name = node.name().map(|name| names.claim(name));

    let mut out = Node::new(node_name.clone().unwrap_or_default());
    out.transform = Transform {
        translation: Vec3::from_array(translation),
        rotation: Quat::from_array(rotation),
        scale: Vec3::from_array(scale),
    };

    if let Some(mesh) = node.mesh() {
        out.mesh = Some(process_mesh(&mesh, buffers, node_name.as_deref(), names)?);
    }

    for child in node.children() {
        out.children.push(process_node(&child, buffers, names)?);
    }

    Ok(out)
}

/// Converts every triangle primitive of a mesh. Single-primitive meshes are
/// picked under the node name when there is one.
fn process_mesh(
    mesh: &gltf::Mesh,
    buffers: &[gltf::buffer::Data],
    node_name: Option<&str>,
    names: &mut UniqueNames,
) -> Result<Mesh> {
    let mesh_name = names.claim(
        &mesh
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("mesh_{}", mesh.index())),
    );
    let count = mesh.primitives().count();

    let mut primitives = Vec::with_capacity(count);
    for (i, primitive) in mesh.primitives().enumerate() {
        let name = match (count, node_name) {
            (1, Some(node_name)) => node_name.to_string(),
            (1, None) => mesh_name.clone(),
            _ => format!("{}_{}", mesh_name, i),
        };

        if let Some(primitive) = process_primitive(&primitive, buffers, name)
            .with_context(|| format!("Invalid primitive {} of mesh '{}'", i, mesh_name))?
        {
            primitives.push(primitive);
        }
    }

    Ok(Mesh {
        name: mesh.name().map(str::to_string),
        primitives,
    })
}

/// `Ok(None)` for primitives that are skipped rather than rejected
fn process_primitive(
    primitive: &gltf::Primitive,
    buffers: &[gltf::buffer::Data],
    name: String,
) -> Result<Option<Primitive>> {
    if primitive.mode() != gltf::mesh::Mode::Triangles {
        log::warn!("Skipping '{}': unsupported mode {:?}", name, primitive.mode());
        return Ok(None);
    }

    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| &data.0[..]));

    let Some(positions) = reader.read_positions() else {
        log::warn!("Skipping '{}': no positions", name);
        return Ok(None);
    };
    let positions: Vec<Vec3> = positions.map(Vec3::from_array).collect();

    let mut indices: Vec<u32> = match reader.read_indices() {
        Some(indices) => indices.into_u32().collect(),
        None => (0..positions.len() as u32).collect(),
    };

    if let Some(&bad) = indices.iter().find(|&&i| i as usize >= positions.len()) {
        bail!("index {} out of range for {} vertices", bad, positions.len());
    }
    if indices.len() % 3 != 0 {
        log::warn!("'{}': dropping {} trailing indices", name, indices.len() % 3);
        indices.truncate(indices.len() - indices.len() % 3);
    }

    // The default material is opaque white and single-sided
    let material = primitive.material();
    let color = material.pbr_metallic_roughness().base_color_factor();
    let double_sided = material.double_sided();

    let (positions, normals, indices) = match reader.read_normals() {
        Some(normals) => {
            let normals: Vec<Vec3> = normals.map(Vec3::from_array).collect();
            if normals.len() != positions.len() {
                bail!(
                    "{} normals for {} vertices",
                    normals.len(),
                    positions.len()
                );
            }
            (positions, normals, indices)
        }
        None => flat_shaded(&positions, &indices),
    };

    Ok(Some(Primitive {
        name,
        positions,
        normals,
        indices,
        color,
        double_sided,
    }))
}

/// Splits shared vertices so every triangle carries its own face normal
pub fn flat_shaded(positions: &[Vec3], indices: &[u32]) -> (Vec<Vec3>, Vec<Vec3>, Vec<u32>) {
    let mut out_positions = Vec::with_capacity(indices.len());
    let mut out_normals = Vec::with_capacity(indices.len());

    for triangle in indices.chunks_exact(3) {
        let [a, b, c] = [0, 1, 2].map(|k| positions[triangle[k] as usize]);
        let normal = (b - a).cross(c - a).normalize_or_zero();
        out_positions.extend([a, b, c]);
        out_normals.extend([normal; 3]);
    }

    let out_indices = (0..out_positions.len() as u32).collect();
    (out_positions, out_normals, out_indices)
}

/// Node names usable as binding paths: whitespace becomes `_` and
/// `[ ] . : /` are removed
pub fn sanitize_node_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '[' | ']' | '.' | ':' | '/'))
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}

/// Hands out sanitized names, suffixing repeats with `_1`, `_2`, ...
#[derive(Debug, Default)]
struct UniqueNames {
    used: HashMap<String, usize>,
}

impl UniqueNames {
    fn claim(&mut self, name: &str) -> String {
        let sanitized = sanitize_node_name(name);
        match self.used.get_mut(&sanitized) {
            Some(count) => {
                *count += 1;
                format!("{}_{}", sanitized, count)
            }
            None => {
                self.used.insert(sanitized.clone(), 0);
                sanitized
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_node_name() {
        assert_eq!(sanitize_node_name("Nef centrale"), "Nef_centrale");
        assert_eq!(sanitize_node_name("a.b:c/d[0]"), "abcd0");
        assert_eq!(sanitize_node_name("tab\there"), "tab_here");
        assert_eq!(sanitize_node_name(""), "");
    }

    #[test]
    fn test_unique_names() {
        let mut names = UniqueNames::default();
        assert_eq!(names.claim("Wall"), "Wall");
        assert_eq!(names.claim("Wall"), "Wall_1");
        assert_eq!(names.claim("Wall."), "Wall_2");
        assert_eq!(names.claim("Roof"), "Roof");
    }

    #[test]
    fn test_flat_shaded_splits_vertices() {
        let positions = [Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z];
        let indices = [0, 1, 2, 0, 2, 3];

        let (p, n, i) = flat_shaded(&positions, &indices);
        assert_eq!(p.len(), 6);
        assert_eq!(i, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(n[0], Vec3::Z);
        assert_eq!(n[3], Vec3::X);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = load_gltf("no/such/model.gltf").unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to load glTF file"));
    }
}

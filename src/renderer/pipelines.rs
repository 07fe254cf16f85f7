use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use super::DEPTH_FORMAT;
use crate::scene::{LineSegment, Lighting, WorldMesh, MAX_DIRECTIONAL_LIGHTS};

/// Per-frame uniform shared by the mesh and line shaders
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct SceneUniform {
    pub view_proj: [[f32; 4]; 4],
    /// Summed ambient light, rgb
    pub ambient: [f32; 4],
    /// `x` holds the number of directional lights in use
    pub light_count: [u32; 4],
    /// Towards the light, xyz
    pub light_dirs: [[f32; 4]; MAX_DIRECTIONAL_LIGHTS],
    /// Color times intensity, rgb
    pub light_colors: [[f32; 4]; MAX_DIRECTIONAL_LIGHTS],
}

impl SceneUniform {
    pub fn new(view_proj: Mat4, lighting: &Lighting) -> Self {
        let mut uniform = Self {
            view_proj: view_proj.to_cols_array_2d(),
            ambient: lighting.ambient_total().extend(1.0).to_array(),
            ..Zeroable::zeroed()
        };

        let lights = lighting.directional.iter().take(MAX_DIRECTIONAL_LIGHTS);
        for (i, light) in lights.enumerate() {
            uniform.light_dirs[i] = light.direction.extend(0.0).to_array();
            uniform.light_colors[i] = light.radiance().extend(1.0).to_array();
            uniform.light_count[0] = i as u32 + 1;
        }
        uniform
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
}

impl MeshVertex {
    pub fn from_world_mesh(mesh: &WorldMesh) -> Vec<Self> {
        mesh.positions
            .iter()
            .zip(&mesh.normals)
            .map(|(position, normal)| Self {
                position: position.to_array(),
                normal: normal.to_array(),
                color: mesh.color,
            })
            .collect()
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl LineVertex {
    /// Two vertices per segment for a line list
    pub fn from_segments(segments: &[LineSegment]) -> Vec<Self> {
        segments
            .iter()
            .flat_map(|segment| {
                let color = segment.color.extend(1.0).to_array();
                [
                    Self {
                        position: segment.start.to_array(),
                        color,
                    },
                    Self {
                        position: segment.end.to_array(),
                        color,
                    },
                ]
            })
            .collect()
    }
}

pub fn create_scene_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Scene Bind Group Layout"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

/// Lit triangle pipeline. `cull_mode` is `None` for double-sided materials.
pub fn create_mesh_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    format: wgpu::TextureFormat,
    sample_count: u32,
    cull_mode: Option<wgpu::Face>,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Mesh Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("mesh.wgsl").into()),
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(if cull_mode.is_some() {
            "Mesh Pipeline"
        } else {
            "Double-Sided Mesh Pipeline"
        }),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<MeshVertex>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &wgpu::vertex_attr_array![
                    0 => Float32x3,
                    1 => Float32x3,
                    2 => Float32x4,
                ],
            }],
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode,
            ..Default::default()
        },
        depth_stencil: Some(depth_state()),
        multisample: multisample_state(sample_count),
        multiview: None,
        cache: None,
    })
}

pub fn create_line_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    format: wgpu::TextureFormat,
    sample_count: u32,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Line Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("line.wgsl").into()),
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Line Pipeline"),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_line"),
            compilation_options: Default::default(),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<LineVertex>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &wgpu::vertex_attr_array![
                    0 => Float32x3,
                    1 => Float32x4,
                ],
            }],
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_line"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::LineList,
            ..Default::default()
        },
        depth_stencil: Some(depth_state()),
        multisample: multisample_state(sample_count),
        multiview: None,
        cache: None,
    })
}

fn depth_state() -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled: true,
        depth_compare: wgpu::CompareFunction::Less,
        stencil: Default::default(),
        bias: Default::default(),
    }
}

fn multisample_state(count: u32) -> wgpu::MultisampleState {
    wgpu::MultisampleState {
        count,
        mask: !0,
        alpha_to_coverage_enabled: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LightSettings;
    use crate::scene::DirectionalLight;
    use glam::Vec3;

    #[test]
    fn test_layout_sizes_match_shaders() {
        assert_eq!(std::mem::size_of::<MeshVertex>(), 40);
        assert_eq!(std::mem::size_of::<LineVertex>(), 28);
        assert_eq!(std::mem::size_of::<SceneUniform>(), 224);
    }

    #[test]
    fn test_uniform_packs_default_lights() {
        let lighting = Lighting::from_settings(&LightSettings::default());
        let uniform = SceneUniform::new(Mat4::IDENTITY, &lighting);

        assert_eq!(uniform.light_count[0], 2);
        assert_eq!(uniform.light_colors[0], [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(uniform.light_dirs[2], [0.0; 4]);
        assert_eq!(uniform.view_proj, Mat4::IDENTITY.to_cols_array_2d());
    }

    #[test]
    fn test_uniform_caps_light_count() {
        let light = DirectionalLight::from_position(Vec3::ONE, 1.0, Vec3::Y);
        let lighting = Lighting {
            ambient: vec![],
            directional: vec![light; 6],
        };
        let uniform = SceneUniform::new(Mat4::IDENTITY, &lighting);
        assert_eq!(uniform.light_count[0], MAX_DIRECTIONAL_LIGHTS as u32);
    }

    #[test]
    fn test_line_vertices_per_segment() {
        let segments = crate::scene::AxesHelper::new(10.0).segments();
        let vertices = LineVertex::from_segments(&segments);
        assert_eq!(vertices.len(), 6);
        assert_eq!(vertices[1].position, [10.0, 0.0, 0.0]);
        assert_eq!(vertices[1].color, [1.0, 0.0, 0.0, 1.0]);
    }
}

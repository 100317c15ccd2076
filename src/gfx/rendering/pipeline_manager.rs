//! Render pipelines of the gallery pass
//!
//! The gallery draws with exactly three pipelines over one shader and one
//! set of bind group layouts. Each [`PipelineKind`] knows its blend and
//! depth behaviour; [`PipelineManager`] compiles the shader once and builds
//! every kind up front.

use std::collections::HashMap;
use wgpu::*;

use crate::gfx::scene::vertex::Vertex3D;

/// Depth testing and writing for a pipeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthConfig {
    pub format: TextureFormat,
    pub write: bool,
    pub compare: CompareFunction,
}

impl DepthConfig {
    /// Standard opaque depth: test `Less`, write on
    pub fn opaque(format: TextureFormat) -> Self {
        Self {
            format,
            write: true,
            compare: CompareFunction::Less,
        }
    }
}

/// The passes of one frame, in draw order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineKind {
    /// Depth tested and written
    Opaque,
    /// Blended, depth tested but not written; drawn back to front
    Transparent,
    /// Gizmo handles: unlit, never occluded
    Overlay,
}

impl PipelineKind {
    pub const ALL: [PipelineKind; 3] = [
        PipelineKind::Opaque,
        PipelineKind::Transparent,
        PipelineKind::Overlay,
    ];
}

/// Everything that differs between pipeline kinds
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub label: &'static str,
    pub vertex_entry: &'static str,
    pub fragment_entry: &'static str,
    pub cull_mode: Option<Face>,
    pub depth: DepthConfig,
    pub blend: BlendState,
}

impl PipelineConfig {
    pub fn for_kind(kind: PipelineKind, depth_format: TextureFormat) -> Self {
        // Walls and canvases are planes seen from either side
        let base = Self {
            label: "Opaque Pipeline",
            vertex_entry: "vs_main",
            fragment_entry: "fs_main",
            cull_mode: None,
            depth: DepthConfig::opaque(depth_format),
            blend: BlendState::REPLACE,
        };

        match kind {
            PipelineKind::Opaque => base,
            PipelineKind::Transparent => Self {
                label: "Transparent Pipeline",
                depth: DepthConfig {
                    write: false,
                    ..base.depth
                },
                blend: BlendState::ALPHA_BLENDING,
                ..base
            },
            PipelineKind::Overlay => Self {
                label: "Overlay Pipeline",
                fragment_entry: "fs_unlit",
                depth: DepthConfig {
                    format: depth_format,
                    write: false,
                    compare: CompareFunction::Always,
                },
                blend: BlendState::ALPHA_BLENDING,
                ..base
            },
        }
    }
}

/// Compiled pipelines, one per [`PipelineKind`]
pub struct PipelineManager {
    pipelines: HashMap<PipelineKind, RenderPipeline>,
}

impl PipelineManager {
    /// Compiles `shader_source` and builds every pipeline kind
    pub fn new(
        device: &Device,
        shader_source: &str,
        color_format: TextureFormat,
        depth_format: TextureFormat,
        bind_group_layouts: &[&BindGroupLayout],
    ) -> Self {
        let shader = device.create_shader_module(ShaderModuleDescriptor {
            label: Some("Gallery Shader"),
            source: ShaderSource::Wgsl(shader_source.into()),
        });
        let layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("Gallery Pipeline Layout"),
            bind_group_layouts,
            push_constant_ranges: &[],
        });

        let pipelines = PipelineKind::ALL
            .into_iter()
            .map(|kind| {
                let config = PipelineConfig::for_kind(kind, depth_format);
                let pipeline = create_pipeline(device, &shader, &layout, color_format, &config);
                (kind, pipeline)
            })
            .collect();

        Self { pipelines }
    }

    pub fn pipeline(&self, kind: PipelineKind) -> Option<&RenderPipeline> {
        self.pipelines.get(&kind)
    }
}

fn create_pipeline(
    device: &Device,
    shader: &ShaderModule,
    layout: &PipelineLayout,
    color_format: TextureFormat,
    config: &PipelineConfig,
) -> RenderPipeline {
    device.create_render_pipeline(&RenderPipelineDescriptor {
        label: Some(config.label),
        layout: Some(layout),
        vertex: VertexState {
            module: shader,
            entry_point: Some(config.vertex_entry),
            buffers: &[Vertex3D::desc()],
            compilation_options: PipelineCompilationOptions::default(),
        },
        fragment: Some(FragmentState {
            module: shader,
            entry_point: Some(config.fragment_entry),
            targets: &[Some(ColorTargetState {
                format: color_format,
                blend: Some(config.blend),
                write_mask: ColorWrites::ALL,
            })],
            compilation_options: PipelineCompilationOptions::default(),
        }),
        primitive: PrimitiveState {
            topology: PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: FrontFace::Ccw,
            cull_mode: config.cull_mode,
            polygon_mode: PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(DepthStencilState {
            format: config.depth.format,
            depth_write_enabled: config.depth.write,
            depth_compare: config.depth.compare,
            stencil: StencilState::default(),
            bias: DepthBiasState::default(),
        }),
        multisample: MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEPTH: TextureFormat = TextureFormat::Depth32Float;

    #[test]
    fn only_opaque_writes_depth() {
        for kind in PipelineKind::ALL {
            let config = PipelineConfig::for_kind(kind, DEPTH);
            assert_eq!(config.depth.write, kind == PipelineKind::Opaque);
            assert_eq!(config.cull_mode, None);
        }
    }

    #[test]
    fn overlay_ignores_depth_and_skips_lighting() {
        let overlay = PipelineConfig::for_kind(PipelineKind::Overlay, DEPTH);
        assert_eq!(overlay.depth.compare, CompareFunction::Always);
        assert_eq!(overlay.fragment_entry, "fs_unlit");
        assert_eq!(overlay.blend, BlendState::ALPHA_BLENDING);

        let transparent = PipelineConfig::for_kind(PipelineKind::Transparent, DEPTH);
        assert_eq!(transparent.depth.compare, CompareFunction::Less);
        assert_eq!(transparent.fragment_entry, "fs_main");
    }
}

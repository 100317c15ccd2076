//! WGPU-based rendering engine for the gallery viewer
//!
//! Owns the surface, device and pipelines, and mirrors the scene graph into
//! GPU resources keyed by [`NodeId`]. Each frame draws opaque meshes, then
//! translucent meshes back to front, then overlay meshes (gizmo handles)
//! without depth testing, and finally hands the encoder to the UI.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use cgmath::{InnerSpace, Vector3};
use wgpu::TextureFormat;

use crate::{
    error::RenderError,
    gfx::{
        camera::CameraUniform,
        resources::{
            global_bindings::{update_global_ubo, GlobalBindings, GlobalUBO},
            material::{GpuMaterial, MaterialBindings},
            texture_resource::{DepthBuffer, TextureResource},
            transform_bindings::{TransformBindings, TransformUBO, TransformUniform},
        },
        scene::{DrawObject, GpuMesh, MeshData, NodeId, PlacedLight, RenderItem, RenderLayer, Scene},
    },
};

use super::pipeline_manager::{PipelineKind, PipelineManager};

/// Clear colour: #f0f0f0
const BACKGROUND: wgpu::Color = wgpu::Color {
    r: 0.941,
    g: 0.941,
    b: 0.941,
    a: 1.0,
};

/// GPU copies of one mesh node
struct NodeResources {
    source: Arc<MeshData>,
    mesh: GpuMesh,
    transform: TransformUBO,
    transform_bind_group: wgpu::BindGroup,
    material: GpuMaterial,
}

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth: DepthBuffer,
    format: TextureFormat,
    pipeline_manager: PipelineManager,
    global_ubo: GlobalUBO,
    global_bindings: GlobalBindings,
    transform_bindings: TransformBindings,
    material_bindings: MaterialBindings,
    white_texture: TextureResource,
    node_resources: HashMap<NodeId, NodeResources>,
    eye: Vector3<f32>,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// Initializes wgpu, creates the depth buffer and builds the opaque,
    /// transparent and overlay pipelines.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> Result<RenderEngine, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or(RenderError::NoSurfaceFormat)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth = DepthBuffer::new(&device, config.width, config.height);

        let global_ubo = GlobalUBO::new(&device, "globals");
        let global_bindings = GlobalBindings::new(&device, &global_ubo);
        let transform_bindings = TransformBindings::new(&device);
        let material_bindings = MaterialBindings::new(&device);
        let white_texture = TextureResource::white(&device, &queue);

        let device_handle = Arc::new(device);
        let queue_handle = Arc::new(queue);

        let pipeline_manager = PipelineManager::new(
            &device_handle,
            include_str!("gallery.wgsl"),
            format,
            DepthBuffer::FORMAT,
            &[
                global_bindings.bind_group_layout(),
                transform_bindings.bind_group_layout(),
                material_bindings.bind_group_layout(),
            ],
        );

        log::info!("Render engine ready ({:?}, {}x{})", format, config.width, config.height);

        Ok(RenderEngine {
            surface,
            device: device_handle,
            queue: queue_handle,
            config,
            depth,
            format,
            pipeline_manager,
            global_ubo,
            global_bindings,
            transform_bindings,
            material_bindings,
            white_texture,
            node_resources: HashMap::new(),
            eye: Vector3::new(0.0, 0.0, 0.0),
        })
    }

    /// Draws the scene and then lets `ui_callback` record into the same encoder
    pub fn render_frame<F>(
        &mut self,
        scene: &Scene,
        ui_callback: Option<F>,
    ) -> Result<(), wgpu::SurfaceError>
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        let surface_texture = self.surface.get_current_texture()?;
        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let items = scene.render_items();
        self.sync_nodes(&items);
        let batches = DrawBatches::sort(&items, self.eye);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Gallery Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(BACKGROUND),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);

            for (kind, ids) in [
                (PipelineKind::Opaque, &batches.opaque),
                (PipelineKind::Transparent, &batches.transparent),
                (PipelineKind::Overlay, &batches.overlay),
            ] {
                if ids.is_empty() {
                    continue;
                }
                let Some(pipeline) = self.pipeline_manager.pipeline(kind) else {
                    continue;
                };
                render_pass.set_pipeline(pipeline);
                for id in ids {
                    if let Some(node) = self.node_resources.get(id) {
                        render_pass.set_bind_group(1, &node.transform_bind_group, &[]);
                        render_pass.set_bind_group(2, node.material.bind_group(), &[]);
                        render_pass.draw_mesh(&node.mesh);
                    }
                }
            }
        }

        if let Some(ui_callback) = ui_callback {
            ui_callback(
                &self.device,
                &self.queue,
                &mut encoder,
                &surface_texture_view,
            );
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    /// Creates, refreshes and prunes per-node GPU resources
    fn sync_nodes(&mut self, items: &[RenderItem<'_>]) {
        let mut seen = HashSet::with_capacity(items.len());

        for item in items {
            seen.insert(item.id);
            let material = &item.mesh.material;

            match self.node_resources.get_mut(&item.id) {
                Some(node) => {
                    if !Arc::ptr_eq(&node.source, &item.mesh.mesh) {
                        node.mesh = GpuMesh::upload(&self.device, &item.mesh.mesh, "Scene Mesh");
                        node.source = item.mesh.mesh.clone();
                    }
                    node.transform
                        .write(&self.queue, &TransformUniform::from(item.world));
                    node.material.sync(
                        &self.device,
                        &self.queue,
                        &self.material_bindings,
                        &self.white_texture,
                        material,
                    );
                }
                None => {
                    let mut transform = TransformUBO::new(&self.device, "transform");
                    transform.write(&self.queue, &TransformUniform::from(item.world));
                    let transform_bind_group =
                        self.transform_bindings.create_bind_group(&self.device, &transform);
                    let resources = NodeResources {
                        source: item.mesh.mesh.clone(),
                        mesh: GpuMesh::upload(&self.device, &item.mesh.mesh, "Scene Mesh"),
                        transform,
                        transform_bind_group,
                        material: GpuMaterial::new(
                            &self.device,
                            &self.queue,
                            &self.material_bindings,
                            &self.white_texture,
                            material,
                        ),
                    };
                    self.node_resources.insert(item.id, resources);
                }
            }
        }

        self.node_resources.retain(|id, _| seen.contains(id));
    }

    /// Drops every per-node GPU resource, e.g. when a new scene is mounted
    pub fn clear_scene_resources(&mut self) {
        self.node_resources.clear();
    }

    /// Uploads this frame's camera and lights
    pub fn update(&mut self, camera_uniform: CameraUniform, lights: &[PlacedLight]) {
        let [x, y, z, _] = camera_uniform.view_position;
        self.eye = Vector3::new(x, y, z);
        update_global_ubo(&mut self.global_ubo, &self.queue, camera_uniform, lights);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth = DepthBuffer::new(&self.device, self.config.width, self.config.height);
    }

    /// Reconfigures the surface after it was lost or became outdated
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    /// Returns current surface dimensions
    pub fn get_surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }

    pub fn set_vsync(&mut self, enable: bool) {
        self.config.present_mode = if enable {
            wgpu::PresentMode::Fifo
        } else {
            wgpu::PresentMode::Immediate
        };
        self.surface.configure(&self.device, &self.config);
    }
}

/// Draw order for one frame
#[derive(Debug, Default, PartialEq)]
struct DrawBatches {
    opaque: Vec<NodeId>,
    /// Farthest first
    transparent: Vec<NodeId>,
    overlay: Vec<NodeId>,
}

impl DrawBatches {
    fn sort(items: &[RenderItem<'_>], eye: Vector3<f32>) -> Self {
        let mut batches = Self::default();
        let mut blended = Vec::new();

        for item in items {
            match item.mesh.layer {
                RenderLayer::Overlay => batches.overlay.push(item.id),
                RenderLayer::World if item.mesh.material.params.is_blended() => {
                    let position = Vector3::new(item.world.w.x, item.world.w.y, item.world.w.z);
                    blended.push((item.id, (position - eye).magnitude2()));
                }
                RenderLayer::World => batches.opaque.push(item.id),
            }
        }

        blended.sort_by(|a, b| b.1.total_cmp(&a.1));
        batches.transparent = blended.into_iter().map(|(id, _)| id).collect();
        batches
    }
}

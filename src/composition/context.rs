//! The per-view scene context
//!
//! One [`SceneContext`] exists per mounted gallery view. It owns the scene
//! graph, the asset loader and the transform editor, and holds the
//! [`NodeId`] handles that tie artwork records to their scene nodes.
//! Dropping it tears the view down and cancels pending loads.

use std::{collections::HashMap, sync::Arc};

use cgmath::{InnerSpace, Vector2};

use super::{
    displays::{
        build_model_slot, build_painting, build_pedestal, model_material, set_canvas_image,
        show_model, show_placeholder, Placeholder,
    },
    layout::placement,
    lighting::build_lighting,
    surfaces::build_surfaces,
    GalleryInput,
};
use crate::{
    config::EditorConfig,
    editing::{GalleryEvent, TransformEditor, TransformMode},
    gallery::{
        default_environment, Artwork, ArtworkId, FrameCatalog, MaterialProperties, ModelFormat,
        PedestalCatalog, ResolvedMaterial,
    },
    gfx::{
        camera::OrbitCamera,
        picking::ObjectPicker,
        scene::{NodeId, NodeTransform, Scene},
    },
    models::{AssetRequest, AssetSource, LoadId, LoadedAsset, LoadedModel, ModelLoader},
};

/// Cursor travel in pixels below which a press and release count as a click
const CLICK_SLOP: f32 = 4.0;

/// What a sculpture's model slot currently holds
#[derive(Debug, Clone)]
pub enum ModelState {
    /// Never loaded: obj/stl, unknown format or no model URL
    Unsupported,
    Loading(LoadId),
    Loaded(LoadedModel),
    Failed,
}

#[derive(Debug)]
enum Display {
    Painting {
        canvas: NodeId,
    },
    Sculpture {
        slot: NodeId,
        model: ModelState,
    },
}

#[derive(Debug)]
struct ArtworkEntry {
    artwork: Artwork,
    root: NodeId,
    display: Display,
}

pub struct SceneContext {
    scene: Scene,
    loader: ModelLoader,
    editor: TransformEditor,
    picker: ObjectPicker,
    entries: Vec<ArtworkEntry>,
    loads: HashMap<LoadId, usize>,
    overrides: HashMap<ArtworkId, MaterialProperties>,
    selected: Option<usize>,
    press: Option<Vector2<f32>>,
    events: Vec<GalleryEvent>,
}

impl SceneContext {
    /// Composes the scene and starts every asset load it needs
    pub fn new(input: GalleryInput, source: Arc<dyn AssetSource>, editor: &EditorConfig) -> Self {
        let GalleryInput {
            environment,
            artworks,
            frames,
            pedestals,
        } = input;
        let environment = environment.unwrap_or_else(default_environment);

        let mut scene = Scene::new();
        build_surfaces(&mut scene, &environment);
        build_lighting(&mut scene, &environment.lighting_configs);

        let mut loader = ModelLoader::new(source);
        let mut loads = HashMap::new();
        let mut entries = Vec::with_capacity(artworks.len());
        for index in 0..artworks.len() {
            let Some(transform) = placement(&artworks, index) else {
                continue;
            };
            let artwork = artworks[index].clone();
            let root = scene.add_group(
                None,
                &format!("artwork-{}", artwork.id),
                NodeTransform::from_record(&transform),
            );
            let (display, load) =
                build_display(&mut scene, &mut loader, &artwork, root, &frames, &pedestals);
            if let Some(load) = load {
                loads.insert(load, entries.len());
            }
            entries.push(ArtworkEntry {
                artwork,
                root,
                display,
            });
        }

        // Gizmo nodes go in last so they draw over everything else
        let editor = TransformEditor::new(&mut scene, editor);

        log::info!(
            "Composed '{}' with {} artworks, {} loads pending",
            environment.name,
            entries.len(),
            loads.len()
        );

        Self {
            scene,
            loader,
            editor,
            picker: ObjectPicker::new(),
            entries,
            loads,
            overrides: HashMap::new(),
            selected: None,
            press: None,
            events: Vec::new(),
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn editor(&self) -> &TransformEditor {
        &self.editor
    }

    /// Artwork records in display order, with committed transforms applied
    pub fn artworks(&self) -> impl Iterator<Item = &Artwork> {
        self.entries.iter().map(|e| &e.artwork)
    }

    pub fn artwork(&self, id: &str) -> Option<&Artwork> {
        self.entry_index(id).map(|i| &self.entries[i].artwork)
    }

    /// Root node of an artwork, the node clicks and the gizmo resolve to
    pub fn root_of(&self, id: &str) -> Option<NodeId> {
        self.entry_index(id).map(|i| self.entries[i].root)
    }

    pub fn model_state(&self, id: &str) -> Option<&ModelState> {
        match &self.entries[self.entry_index(id)?].display {
            Display::Sculpture { model, .. } => Some(model),
            Display::Painting { .. } => None,
        }
    }

    pub fn pending_loads(&self) -> usize {
        self.loader.pending()
    }

    pub fn selected(&self) -> Option<&Artwork> {
        self.selected.map(|i| &self.entries[i].artwork)
    }

    /// Selects an artwork by id; `None` or an unknown id deselects
    pub fn select(&mut self, id: Option<&str>) {
        self.selected = id.and_then(|id| self.entry_index(id));
        let target = self.selected.map(|i| {
            let entry = &self.entries[i];
            (entry.artwork.id.clone(), entry.root)
        });
        self.editor.select(target);
    }

    pub fn edit_mode(&self) -> bool {
        self.editor.edit_mode()
    }

    pub fn set_edit_mode(&mut self, enabled: bool) {
        self.editor.set_edit_mode(enabled);
    }

    pub fn transform_mode(&self) -> TransformMode {
        self.editor.mode()
    }

    pub fn set_transform_mode(&mut self, mode: TransformMode) {
        self.editor.set_mode(mode);
    }

    /// Sets or clears the editor-time material of an artwork's model
    ///
    /// Loaded models and never-loaded placeholders pick the change up
    /// immediately. Returns false for unknown ids.
    pub fn set_material_override(
        &mut self,
        id: &str,
        properties: Option<MaterialProperties>,
    ) -> bool {
        let Some(index) = self.entry_index(id) else {
            return false;
        };
        match properties {
            Some(properties) => self.overrides.insert(id.to_string(), properties),
            None => self.overrides.remove(id),
        };

        let entry = &self.entries[index];
        let material = model_material(
            self.overrides.get(id),
            entry.artwork.material_properties.as_ref(),
        );
        if let Display::Sculpture { slot, model } = &entry.display {
            match model {
                ModelState::Loaded(loaded) => show_model(&mut self.scene, *slot, loaded, material),
                ModelState::Unsupported => show_placeholder(
                    &mut self.scene,
                    *slot,
                    Placeholder::Neutral(material.unwrap_or(ResolvedMaterial::MODEL_DEFAULT)),
                ),
                ModelState::Loading(_) | ModelState::Failed => {}
            }
        }
        true
    }

    /// Per-frame work: applies finished loads and moves the gizmo
    pub fn update(&mut self, camera: &OrbitCamera) {
        for (id, result) in self.loader.poll() {
            let Some(index) = self.loads.remove(&id) else {
                continue;
            };
            let entry = &mut self.entries[index];
            let artwork_id = &entry.artwork.id;

            match (&mut entry.display, result) {
                (Display::Sculpture { slot, model }, Ok(LoadedAsset::Model(loaded))) => {
                    let material = model_material(
                        self.overrides.get(artwork_id),
                        entry.artwork.material_properties.as_ref(),
                    );
                    show_model(&mut self.scene, *slot, &loaded, material);
                    log::info!(
                        "Model for {} loaded: {} triangles",
                        artwork_id,
                        loaded.triangle_count()
                    );
                    *model = ModelState::Loaded(loaded);
                }
                (Display::Sculpture { slot, model }, Err(e)) => {
                    log::warn!("Model for {} failed to load: {}", artwork_id, e);
                    show_placeholder(&mut self.scene, *slot, Placeholder::Failed);
                    *model = ModelState::Failed;
                }
                (Display::Painting { canvas }, Ok(LoadedAsset::Image(image))) => {
                    set_canvas_image(&mut self.scene, *canvas, image);
                }
                (Display::Painting { .. }, Err(e)) => {
                    log::warn!("Image for {} failed to load, canvas stays blank: {}", artwork_id, e);
                }
                (_, Ok(_)) => {
                    log::warn!("Load {} for {} returned the wrong asset kind", id, artwork_id);
                }
            }
        }

        self.editor.sync(&mut self.scene, camera);
    }

    /// Primary button down; true when it grabbed a gizmo handle
    ///
    /// While a handle is held the camera should not orbit.
    pub fn pointer_pressed(
        &mut self,
        cursor: Vector2<f32>,
        screen_size: (f32, f32),
        camera: &OrbitCamera,
    ) -> bool {
        let ray = self
            .picker
            .screen_to_ray((cursor.x, cursor.y), screen_size, camera);
        if self.editor.grab(&self.scene, &ray, cursor) {
            self.press = None;
            return true;
        }
        self.press = Some(cursor);
        false
    }

    /// Cursor motion; true when it moved the edited node
    pub fn pointer_moved(
        &mut self,
        cursor: Vector2<f32>,
        screen_size: (f32, f32),
        camera: &OrbitCamera,
    ) -> bool {
        self.editor
            .drag(&mut self.scene, camera, cursor, screen_size)
    }

    /// Primary button up: ends a drag, or clicks when the cursor stayed put
    pub fn pointer_released(
        &mut self,
        cursor: Vector2<f32>,
        screen_size: (f32, f32),
        camera: &OrbitCamera,
    ) {
        if self.editor.is_dragging() {
            self.press = None;
            if let Some(event) = self.editor.release(&self.scene) {
                self.record_commit(&event);
                self.events.push(event);
            }
            return;
        }

        let Some(start) = self.press.take() else {
            return;
        };
        if (cursor - start).magnitude() <= CLICK_SLOP {
            self.click(cursor, screen_size, camera);
        }
    }

    /// Queues an event raised outside the scene (offer form)
    pub fn push_event(&mut self, event: GalleryEvent) {
        self.events.push(event);
    }

    /// Everything that happened since the last call, oldest first
    pub fn drain_events(&mut self) -> Vec<GalleryEvent> {
        std::mem::take(&mut self.events)
    }

    fn click(&mut self, cursor: Vector2<f32>, screen_size: (f32, f32), camera: &OrbitCamera) {
        let ray = self
            .picker
            .screen_to_ray((cursor.x, cursor.y), screen_size, camera);
        let hit = self
            .picker
            .pick(&ray, &self.scene, self.entries.iter().map(|e| e.root));
        let Some(index) = hit.and_then(|hit| self.entries.iter().position(|e| e.root == hit.node))
        else {
            return;
        };

        let id = self.entries[index].artwork.id.clone();
        log::debug!("Clicked artwork {}", id);
        self.select(Some(&id));
        self.events.push(GalleryEvent::ArtworkClicked(id));
    }

    fn record_commit(&mut self, event: &GalleryEvent) {
        if let GalleryEvent::TransformCommitted {
            artwork_id,
            transform,
        } = event
        {
            if let Some(index) = self.entry_index(artwork_id) {
                self.entries[index].artwork.apply_transform(transform);
            }
        }
    }

    fn entry_index(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.artwork.id == id)
    }
}

impl Drop for SceneContext {
    fn drop(&mut self) {
        log::info!("Tearing down scene with {} nodes", self.scene.len());
    }
}

/// Builds an artwork's display under `root` and starts its asset load
fn build_display(
    scene: &mut Scene,
    loader: &mut ModelLoader,
    artwork: &Artwork,
    root: NodeId,
    frames: &FrameCatalog,
    pedestals: &PedestalCatalog,
) -> (Display, Option<LoadId>) {
    if artwork.is_painting() {
        let look = frames.look_for(artwork.frame_style.as_deref());
        let nodes = build_painting(scene, root, &look);
        let load = artwork.image_url().map(|url| {
            loader.request(AssetRequest::Image {
                url: url.to_string(),
            })
        });
        return (Display::Painting { canvas: nodes.canvas }, load);
    }

    let look = pedestals.look_for(artwork.pedestal_style.as_deref());
    build_pedestal(scene, root, &look);
    let slot = build_model_slot(scene, root);

    match (artwork.model_url(), artwork.model_format()) {
        (Some(url), Some(format @ (ModelFormat::Gltf | ModelFormat::Glb | ModelFormat::Fbx))) => {
            show_placeholder(scene, slot, Placeholder::Loading);
            let load = loader.request(AssetRequest::Model {
                url: url.to_string(),
                format,
            });
            (
                Display::Sculpture {
                    slot,
                    model: ModelState::Loading(load),
                },
                Some(load),
            )
        }
        (url, format) => {
            match format {
                Some(format @ (ModelFormat::Obj | ModelFormat::Stl)) => {
                    log::debug!("{} models are shown as placeholders ({})", format, artwork.id)
                }
                _ if url.is_some() => log::debug!(
                    "Unknown model format {:?} for {}",
                    artwork.model_format,
                    artwork.id
                ),
                _ => {}
            }
            let material = model_material(None, artwork.material_properties.as_ref())
                .unwrap_or(ResolvedMaterial::MODEL_DEFAULT);
            show_placeholder(scene, slot, Placeholder::Neutral(material));
            (
                Display::Sculpture {
                    slot,
                    model: ModelState::Unsupported,
                },
                None,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::AssetError,
        gallery::{
            ArtworkKind, GalleryEnvironment, LightKind, LightingConfig, Transform3D, Vec3Record,
        },
        gfx::{gizmos::world_to_screen, scene::NodeKind},
        models::fixtures::triangle_gltf,
    };
    use cgmath::Vector3;
    use std::{
        sync::Mutex,
        time::{Duration, Instant},
    };

    const SCREEN: (f32, f32) = (800.0, 800.0);

    /// Serves the triangle glTF for `good` URLs, 404 for everything else
    #[derive(Default)]
    struct TestSource {
        fetched: Mutex<Vec<String>>,
    }

    impl AssetSource for TestSource {
        fn fetch(&self, url: &str) -> Result<Vec<u8>, AssetError> {
            self.fetched.lock().unwrap().push(url.to_string());
            if url.contains("good") {
                Ok(triangle_gltf())
            } else {
                Err(AssetError::Status {
                    url: url.to_string(),
                    status: 404,
                })
            }
        }
    }

    fn sculpture(id: &str) -> Artwork {
        Artwork::new(id, id, ArtworkKind::Sculpture)
    }

    fn painting(id: &str) -> Artwork {
        Artwork::new(id, id, ArtworkKind::Painting)
    }

    fn compose(artworks: Vec<Artwork>) -> (SceneContext, Arc<TestSource>) {
        compose_in(None, artworks)
    }

    fn compose_in(
        environment: Option<GalleryEnvironment>,
        artworks: Vec<Artwork>,
    ) -> (SceneContext, Arc<TestSource>) {
        let source = Arc::new(TestSource::default());
        let input = GalleryInput {
            environment,
            artworks,
            ..Default::default()
        };
        let context = SceneContext::new(input, source.clone(), &EditorConfig::default());
        (context, source)
    }

    fn settle(context: &mut SceneContext, camera: &OrbitCamera) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while context.pending_loads() > 0 && Instant::now() < deadline {
            context.update(camera);
            std::thread::sleep(Duration::from_millis(5));
        }
        context.update(camera);
    }

    fn slot_children(context: &SceneContext, id: &str) -> Vec<String> {
        let root = context.root_of(id).unwrap();
        let slot = context
            .scene()
            .subtree(root)
            .into_iter()
            .find(|n| context.scene().get(*n).unwrap().name == "model-slot")
            .unwrap();
        context
            .scene()
            .get(slot)
            .unwrap()
            .children()
            .iter()
            .map(|c| context.scene().get(*c).unwrap().name.clone())
            .collect()
    }

    fn first_slot_material(context: &SceneContext, id: &str) -> ResolvedMaterial {
        let root = context.root_of(id).unwrap();
        context
            .scene()
            .subtree(root)
            .into_iter()
            .filter_map(|n| {
                let node = context.scene().get(n)?;
                node.name.starts_with("placeholder").then_some(node)
            })
            .find_map(|node| node.as_mesh().map(|m| m.material.params))
            .unwrap()
    }

    fn camera_on(target: Vector3<f32>) -> OrbitCamera {
        OrbitCamera::new(10.0, 0.0, 0.0, target, 1.0)
    }

    #[test]
    fn default_environment_when_none_is_active() {
        let (context, _) = compose(Vec::new());
        let scene = context.scene();
        for name in ["floor", "ceiling", "wall-back", "wall-left", "wall-right"] {
            assert!(scene.find_by_name(name).is_some(), "{name} missing");
        }
        assert_eq!(scene.lights().len(), 3);
    }

    #[test]
    fn only_enabled_point_light_is_built() {
        let mut environment = default_environment();
        environment.lighting_configs = vec![
            LightingConfig::new("A", LightKind::Point, 0.5).at(0.0, 3.0, 0.0),
            LightingConfig::new("B", LightKind::Point, 0.3).at(1.0, 3.0, 0.0).disabled(),
        ];
        let (context, _) = compose_in(Some(environment), Vec::new());

        let lights = context.scene().lights();
        assert_eq!(lights.len(), 1);
        assert_eq!(lights[0].light.kind(), LightKind::Point);
        assert_eq!(lights[0].light.intensity(), 0.5);
    }

    #[test]
    fn roots_follow_the_default_layout() {
        let (context, _) = compose(vec![
            sculpture("s1"),
            sculpture("s2"),
            painting("p1"),
            sculpture("s3"),
            painting("p2").with_position(5.0, 1.5, -7.0),
        ]);
        let at = |id| context.scene().world_position(context.root_of(id).unwrap()).unwrap();

        assert_eq!(at("s1"), Vector3::new(-3.0, 0.0, 2.0));
        assert_eq!(at("s2"), Vector3::new(0.0, 0.0, 2.0));
        assert_eq!(at("s3"), Vector3::new(3.0, 0.0, 2.0));
        assert_eq!(at("p1"), Vector3::new(-8.0, 2.0, -7.0));
        assert_eq!(at("p2"), Vector3::new(5.0, 1.5, -7.0));
        assert!(context.scene().find_by_name("artwork-s2").is_some());
    }

    #[test]
    fn obj_and_stl_show_material_placeholders_without_fetching() {
        let mut bronze = sculpture("s1").with_model("/models/good.obj", "obj");
        bronze.material_properties = Some(MaterialProperties::default().with_color("#ff0000"));
        let (context, source) = compose(vec![
            bronze,
            sculpture("s2").with_model("/models/good.stl", "STL"),
            sculpture("s3").with_model("/models/good.usdz", "usdz"),
            sculpture("s4"),
        ]);

        assert_eq!(context.pending_loads(), 0);
        assert!(source.fetched.lock().unwrap().is_empty());
        for id in ["s1", "s2", "s3", "s4"] {
            assert!(matches!(context.model_state(id), Some(ModelState::Unsupported)));
            assert_eq!(slot_children(&context, id), vec!["placeholder"]);
        }
        assert_eq!(first_slot_material(&context, "s1").color, [1.0, 0.0, 0.0]);
        assert_eq!(
            first_slot_material(&context, "s2"),
            ResolvedMaterial::MODEL_DEFAULT
        );
    }

    #[test]
    fn sculpture_without_model_url_shows_neutral_placeholder() {
        let (context, _) = compose(vec![sculpture("s1")]);
        assert_eq!(slot_children(&context, "s1"), vec!["placeholder"]);
        assert_eq!(first_slot_material(&context, "s1"), ResolvedMaterial::MODEL_DEFAULT);
    }

    #[test]
    fn failed_model_only_affects_its_own_slot() {
        let (mut context, source) = compose(vec![
            sculpture("ok").with_model("/models/good.gltf", "gltf"),
            sculpture("broken").with_model("/models/bad.glb", "glb"),
            painting("p1").with_image("/img/bad.png"),
        ]);
        assert_eq!(slot_children(&context, "ok"), vec!["placeholder-loading"]);
        let nodes_before = context.scene().len();

        settle(&mut context, &camera_on(Vector3::new(0.0, 0.0, 0.0)));

        assert_eq!(source.fetched.lock().unwrap().len(), 3);
        assert!(matches!(context.model_state("ok"), Some(ModelState::Loaded(_))));
        assert_eq!(slot_children(&context, "ok"), vec!["bust"]);
        assert!(matches!(context.model_state("broken"), Some(ModelState::Failed)));
        assert_eq!(slot_children(&context, "broken"), vec!["placeholder-error"]);

        // surfaces, lights and the painting are untouched
        assert_eq!(context.scene().lights().len(), 3);
        assert!(context.scene().find_by_name("wall-back").is_some());
        let canvas = context.scene().find_by_name("canvas").unwrap();
        let canvas_material = &context.scene().get(canvas).unwrap().as_mesh().unwrap().material;
        assert!(canvas_material.texture.is_none());
        assert_eq!(context.scene().len(), nodes_before);
    }

    #[test]
    fn override_replaces_loaded_model_materials() {
        let (mut context, _) =
            compose(vec![sculpture("s1").with_model("/models/good.glb", "glb")]);
        settle(&mut context, &camera_on(Vector3::new(0.0, 0.0, 0.0)));

        let part_color = |context: &SceneContext| {
            let root = context.root_of("s1").unwrap();
            let id = context
                .scene()
                .subtree(root)
                .into_iter()
                .find(|n| context.scene().get(*n).unwrap().name == "bust")
                .unwrap();
            match &context.scene().get(id).unwrap().kind {
                NodeKind::Mesh(mesh) => mesh.material.params.color,
                _ => unreachable!(),
            }
        };
        assert_eq!(part_color(&context), [1.0, 0.0, 0.0]);

        let gold = MaterialProperties::default().with_color("#ffd700");
        assert!(context.set_material_override("s1", Some(gold)));
        assert_eq!(part_color(&context)[0], 1.0);
        assert_eq!(part_color(&context)[2], 0.0);
        assert!(part_color(&context)[1] > 0.8);

        assert!(context.set_material_override("s1", None));
        assert_eq!(part_color(&context), [1.0, 0.0, 0.0]);
        assert!(!context.set_material_override("nope", None));
    }

    #[test]
    fn click_selects_the_nearest_artwork() {
        let (mut context, _) = compose(vec![sculpture("s1"), sculpture("s2")]);
        let camera = camera_on(Vector3::new(0.0, 1.5, 2.0));

        assert!(!context.pointer_pressed(Vector2::new(400.0, 400.0), SCREEN, &camera));
        context.pointer_released(Vector2::new(401.0, 402.0), SCREEN, &camera);

        assert_eq!(
            context.drain_events(),
            vec![GalleryEvent::ArtworkClicked("s2".to_string())]
        );
        assert_eq!(context.selected().map(|a| a.id.as_str()), Some("s2"));
        assert!(context.drain_events().is_empty());
    }

    #[test]
    fn dragging_the_view_is_not_a_click() {
        let (mut context, _) = compose(vec![sculpture("s1")]);
        let camera = camera_on(Vector3::new(-3.0, 1.0, 2.0));

        context.pointer_pressed(Vector2::new(400.0, 400.0), SCREEN, &camera);
        context.pointer_released(Vector2::new(460.0, 400.0), SCREEN, &camera);
        assert!(context.drain_events().is_empty());
        assert!(context.selected().is_none());
    }

    #[test]
    fn handle_drag_commits_once_and_updates_the_record() {
        let (mut context, _) = compose(vec![sculpture("s1")]);
        let root_position = Vector3::new(-3.0, 0.0, 2.0);
        let camera = camera_on(root_position);

        context.set_edit_mode(true);
        context.select(Some("s1"));
        context.update(&camera);

        let handle = world_to_screen(&camera, root_position + Vector3::new(1.0, 0.0, 0.0), SCREEN)
            .unwrap();
        assert!(context.pointer_pressed(handle, SCREEN, &camera));
        assert!(context.pointer_moved(handle + Vector2::new(30.0, 0.0), SCREEN, &camera));
        assert!(context.drain_events().is_empty());

        context.pointer_released(handle + Vector2::new(30.0, 0.0), SCREEN, &camera);
        let events = context.drain_events();
        assert_eq!(events.len(), 1);
        let GalleryEvent::TransformCommitted { artwork_id, transform } = &events[0] else {
            panic!("expected a commit, got {:?}", events[0]);
        };
        assert_eq!(artwork_id, "s1");
        assert!(transform.position.x > -3.0);
        assert_eq!(transform.position.y, 0.0);
        assert_eq!(context.artwork("s1").unwrap().position, Some(transform.position));
        assert_ne!(
            *transform,
            Transform3D {
                position: Vec3Record::new(-3.0, 0.0, 2.0),
                ..Default::default()
            }
        );
    }

    #[test]
    fn edit_mode_off_mid_drag_emits_nothing() {
        let (mut context, _) = compose(vec![sculpture("s1")]);
        let root_position = Vector3::new(-3.0, 0.0, 2.0);
        let camera = camera_on(root_position);
        context.set_edit_mode(true);
        context.select(Some("s1"));
        context.update(&camera);

        let handle = world_to_screen(&camera, root_position + Vector3::new(1.0, 0.0, 0.0), SCREEN)
            .unwrap();
        assert!(context.pointer_pressed(handle, SCREEN, &camera));
        context.set_edit_mode(false);
        context.pointer_released(handle, SCREEN, &camera);
        assert!(context.drain_events().is_empty());
    }
}

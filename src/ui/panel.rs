//! Gallery panels
//!
//! One window on the left: edit toggles, the artwork list, and the detail
//! view of the selected artwork with its material override and the
//! public offer form.

use imgui::{Condition, TreeNodeFlags, Ui};

use crate::{
    composition::{ModelState, SceneContext},
    editing::{GalleryEvent, TransformMode},
    gallery::{
        material::{format_color, Rgb},
        Artwork, ArtworkId, MaterialProperties, OfferDraft, ResolvedMaterial,
    },
};

const ERROR_COLOR: [f32; 4] = [1.0, 0.42, 0.42, 1.0];
const OK_COLOR: [f32; 4] = [0.4, 0.85, 0.4, 1.0];

/// Form contents that outlive a single UI frame
#[derive(Debug, Clone)]
pub struct PanelState {
    artwork: Option<ArtworkId>,
    offer: OfferDraft,
    amount_text: String,
    feedback: Option<Feedback>,
    override_color: Rgb,
    override_metalness: f32,
    override_roughness: f32,
}

#[derive(Debug, Clone, PartialEq)]
enum Feedback {
    Sent,
    Invalid(String),
}

impl Default for PanelState {
    fn default() -> Self {
        let base = ResolvedMaterial::MODEL_DEFAULT;
        Self {
            artwork: None,
            offer: OfferDraft::default(),
            amount_text: String::new(),
            feedback: None,
            override_color: base.color,
            override_metalness: base.metalness,
            override_roughness: base.roughness,
        }
    }
}

impl PanelState {
    /// Resets the forms when a different artwork gets selected
    pub fn track_selection(&mut self, selected: Option<&Artwork>) {
        let id = selected.map(|a| a.id.as_str());
        if self.artwork.as_deref() == id {
            return;
        }
        self.artwork = id.map(str::to_string);
        self.offer = OfferDraft::for_artwork(id.unwrap_or_default());
        self.amount_text.clear();
        self.feedback = None;

        let base = ResolvedMaterial::MODEL_DEFAULT;
        let current = selected
            .and_then(|a| a.material_properties.as_ref())
            .map_or(base, |p| p.resolve_over(&base));
        self.override_color = current.color;
        self.override_metalness = current.metalness;
        self.override_roughness = current.roughness;
    }

    /// Validates the offer form; a valid draft becomes an event and the
    /// form is cleared
    pub fn submit_offer(&mut self) -> Option<GalleryEvent> {
        self.offer.offer_amount = self.amount_text.trim().parse().unwrap_or(f64::NAN);
        match self.offer.submit() {
            Ok(offer) => {
                log::info!(
                    "Offer of {} on {} from {}",
                    offer.offer_amount,
                    offer.artwork_id,
                    offer.user_email
                );
                self.offer = OfferDraft::for_artwork(&offer.artwork_id);
                self.amount_text.clear();
                self.feedback = Some(Feedback::Sent);
                Some(GalleryEvent::OfferSubmitted(offer))
            }
            Err(e) => {
                self.feedback = Some(Feedback::Invalid(e.to_string()));
                None
            }
        }
    }

    /// The override the material controls currently describe
    pub fn override_properties(&self) -> MaterialProperties {
        MaterialProperties {
            color: Some(format_color(self.override_color)),
            metalness: Some(self.override_metalness),
            roughness: Some(self.override_roughness),
            ..Default::default()
        }
    }
}

/// Main gallery window
///
/// # Arguments
/// * `ui` - ImGui UI context
/// * `context` - Scene context of the mounted view
/// * `state` - Form state kept between frames
pub fn gallery_panel(ui: &Ui, context: &mut SceneContext, state: &mut PanelState) {
    let display_size = ui.io().display_size;
    if display_size[0] <= 0.0 || display_size[1] <= 0.0 {
        return;
    }
    let panel_width = (display_size[0] * 0.25).clamp(320.0, 460.0);
    let panel_height = (display_size[1] * 0.9).max(400.0);

    state.track_selection(context.selected());

    ui.window("Gallery")
        .size([panel_width, panel_height], Condition::FirstUseEver)
        .position([16.0, 16.0], Condition::FirstUseEver)
        .resizable(true)
        .collapsible(true)
        .build(|| {
            render_edit_controls(ui, context);
            ui.separator();
            render_artwork_list(ui, context);
            ui.separator();
            render_details(ui, context, state);
        });
}

fn render_edit_controls(ui: &Ui, context: &mut SceneContext) {
    let mut edit_mode = context.edit_mode();
    if ui.checkbox("Edit mode", &mut edit_mode) {
        context.set_edit_mode(edit_mode);
    }

    let mut mode = context.transform_mode();
    for (i, option) in TransformMode::ALL.into_iter().enumerate() {
        if i > 0 {
            ui.same_line();
        }
        if ui.radio_button(option.label(), &mut mode, option) {
            context.set_transform_mode(mode);
        }
    }

    if edit_mode {
        ui.text_disabled("Select an artwork, then drag a handle");
    }
}

fn render_artwork_list(ui: &Ui, context: &mut SceneContext) {
    ui.text("Artworks");

    let selected = context.selected().map(|a| a.id.clone());
    let entries: Vec<(ArtworkId, String)> = context
        .artworks()
        .map(|a| (a.id.clone(), a.display_name()))
        .collect();

    if entries.is_empty() {
        ui.text_disabled("The gallery is empty");
        return;
    }

    let mut clicked = None;
    ui.child_window("artwork_list")
        .size([0.0, 160.0])
        .border(true)
        .build(|| {
            for (id, label) in &entries {
                let is_selected = selected.as_ref() == Some(id);
                if ui
                    .selectable_config(format!("{}##{}", label, id))
                    .selected(is_selected)
                    .build()
                {
                    clicked = Some(id.clone());
                }
            }
        });

    if let Some(id) = clicked {
        context.select(Some(&id));
    }
}

fn render_details(ui: &Ui, context: &mut SceneContext, state: &mut PanelState) {
    let Some(artwork) = context.selected().cloned() else {
        ui.text_disabled("Click an artwork to see its details");
        return;
    };

    ui.text(&artwork.title);
    if !artwork.artist.is_empty() {
        ui.text(format!("by {}", artwork.artist));
    }
    if artwork.year != 0 {
        ui.text(format!("{}", artwork.year));
    }
    if !artwork.medium.is_empty() {
        ui.text(&artwork.medium);
    }
    if !artwork.dimensions.is_empty() {
        ui.text(&artwork.dimensions);
    }
    if artwork.price > 0.0 {
        ui.text(format!("Price: {:.2}", artwork.price));
    }
    if !artwork.description.is_empty() {
        ui.text_wrapped(&artwork.description);
    }

    if let Some(model) = context.model_state(&artwork.id) {
        ui.text_disabled(model_status(model));
    }

    if artwork.is_sculpture()
        && ui.collapsing_header("Material override", TreeNodeFlags::empty())
    {
        render_material_override(ui, context, state, &artwork.id);
    }

    if ui.collapsing_header("Make an offer", TreeNodeFlags::DEFAULT_OPEN) {
        render_offer_form(ui, context, state);
    }
}

fn model_status(model: &ModelState) -> String {
    match model {
        ModelState::Unsupported => "Model shown as a placeholder".to_string(),
        ModelState::Loading(_) => "Loading model...".to_string(),
        ModelState::Loaded(loaded) => format!("Model: {} triangles", loaded.triangle_count()),
        ModelState::Failed => "Model failed to load".to_string(),
    }
}

fn render_material_override(
    ui: &Ui,
    context: &mut SceneContext,
    state: &mut PanelState,
    artwork_id: &str,
) {
    let mut changed = ui.color_edit3("Color", &mut state.override_color);
    changed |= ui.slider("Metalness", 0.0, 1.0, &mut state.override_metalness);
    changed |= ui.slider("Roughness", 0.0, 1.0, &mut state.override_roughness);

    if changed {
        context.set_material_override(artwork_id, Some(state.override_properties()));
    }
    if ui.button("Clear override") {
        context.set_material_override(artwork_id, None);
    }
}

fn render_offer_form(ui: &Ui, context: &mut SceneContext, state: &mut PanelState) {
    ui.input_text("Name", &mut state.offer.user_name).build();
    ui.input_text("E-mail", &mut state.offer.user_email).build();
    ui.input_text("Amount", &mut state.amount_text)
        .chars_decimal(true)
        .build();
    ui.input_text_multiline("Message", &mut state.offer.message, [0.0, 60.0])
        .build();

    if ui.button("Submit offer") {
        if let Some(event) = state.submit_offer() {
            context.push_event(event);
        }
    }

    match &state.feedback {
        Some(Feedback::Sent) => ui.text_colored(OK_COLOR, "Offer sent"),
        Some(Feedback::Invalid(message)) => ui.text_colored(ERROR_COLOR, message),
        None => {}
    }
}

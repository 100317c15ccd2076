use anyhow::Context;
use clap::Parser;
use std::{path::PathBuf, sync::Arc};

use vernissage::{
    app::VernissageApp,
    composition::GalleryInput,
    config::ViewerConfig,
    editing::{GalleryEvent, TransformMode},
    gallery::{FrameCatalog, FrameStyle, PedestalCatalog, PedestalStyle},
    models::DefaultSource,
    store::{load_environments, load_json, ArtworkFile},
};

/// Walk through a virtual art gallery and arrange its artworks
#[derive(Parser, Debug)]
#[command(name = "vernissage", version)]
struct Cli {
    /// Artwork list (JSON array of artwork records)
    #[arg(long)]
    artworks: PathBuf,

    /// Gallery environments (one record or a list); the active one is shown
    #[arg(long)]
    environments: Option<PathBuf>,

    /// Activate this environment instead of the one flagged active
    #[arg(long, requires = "environments")]
    environment: Option<String>,

    /// Frame style catalog
    #[arg(long)]
    frames: Option<PathBuf>,

    /// Pedestal style catalog
    #[arg(long)]
    pedestals: Option<PathBuf>,

    /// Viewer configuration file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory asset URLs resolve against, overrides the config file
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Start with transform editing enabled
    #[arg(long)]
    edit: bool,

    /// Initial gizmo mode
    #[arg(long, value_parser = parse_mode)]
    mode: Option<TransformMode>,

    /// Save committed transforms back into the artwork file
    #[arg(long)]
    write_back: bool,
}

fn parse_mode(value: &str) -> Result<TransformMode, String> {
    match value.to_ascii_lowercase().as_str() {
        "translate" | "move" => Ok(TransformMode::Translate),
        "rotate" => Ok(TransformMode::Rotate),
        "scale" => Ok(TransformMode::Scale),
        other => Err(format!("unknown mode '{}'", other)),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ViewerConfig::from_file(path)?,
        None => ViewerConfig::default(),
    };
    if let Some(root) = &cli.assets {
        config.assets.root = root.clone();
    }
    if cli.edit {
        config.editor.edit_mode = true;
    }
    if let Some(mode) = cli.mode {
        config.editor.transform_mode = mode;
    }

    let artwork_file = ArtworkFile::new(&cli.artworks);
    let artworks = artwork_file.load()?;

    let environment = match &cli.environments {
        Some(path) => {
            let mut catalog = load_environments(path)?;
            if let Some(id) = &cli.environment {
                catalog
                    .activate(id)
                    .with_context(|| format!("in {}", path.display()))?;
            }
            if catalog.active().is_none() {
                log::info!("No active environment in {}, using the default room", path.display());
            }
            catalog.active().cloned()
        }
        None => None,
    };

    let frames = match &cli.frames {
        Some(path) => FrameCatalog::new(load_json::<Vec<FrameStyle>>(path)?),
        None => FrameCatalog::default(),
    };
    let pedestals = match &cli.pedestals {
        Some(path) => PedestalCatalog::new(load_json::<Vec<PedestalStyle>>(path)?),
        None => PedestalCatalog::default(),
    };

    log::info!(
        "Loaded {} artworks from {}",
        artworks.len(),
        cli.artworks.display()
    );

    let input = GalleryInput {
        environment,
        artworks,
        frames,
        pedestals,
    };
    let source = Arc::new(DefaultSource::new(config.assets.root.clone()));

    let mut app = VernissageApp::new(config, input, source);
    let write_back = cli.write_back.then_some(artwork_file);
    app.on_event(move |event| match event {
        GalleryEvent::ArtworkClicked(id) => log::info!("Selected {}", id),
        GalleryEvent::TransformCommitted {
            artwork_id,
            transform,
        } => {
            log::info!("Transform committed for {}: {:?}", artwork_id, transform);
            if let Some(file) = &write_back {
                match file.write_transform(artwork_id, transform) {
                    Ok(true) => {}
                    Ok(false) => log::warn!(
                        "{} is not in {}, transform not saved",
                        artwork_id,
                        file.path().display()
                    ),
                    Err(e) => log::warn!("Could not save transform: {}", e),
                }
            }
        }
        GalleryEvent::OfferSubmitted(offer) => match serde_json::to_string(offer) {
            // One JSON line per offer for whatever forwards them
            Ok(line) => println!("{}", line),
            Err(e) => log::warn!("Could not serialise offer: {}", e),
        },
    });

    app.run()?;
    Ok(())
}

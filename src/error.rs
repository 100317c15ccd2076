//! Error types for the gallery viewer
//!
//! One enum per layer. Asset and model errors never escape a single
//! artwork: the composition layer logs them and swaps in a placeholder.

use thiserror::Error;

/// Fetching raw bytes for a URL
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("IO error for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Invalid data URI: {0}")]
    InvalidDataUri(String),

    #[error("Load cancelled")]
    Cancelled,
}

/// Turning fetched bytes into renderable meshes or textures
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    #[error("glTF error: {0}")]
    Gltf(#[from] gltf::Error),

    #[error("glTF buffer {0} is missing or too short")]
    MissingBuffer(usize),

    #[error("glTF node {0} is its own ancestor or nested too deep")]
    NodeHierarchy(usize),

    #[error("FBX error: {0}")]
    Fbx(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Model contains no triangles")]
    Empty,

    #[error("Unsupported model format: {0}")]
    UnsupportedFormat(String),
}

/// Record-level rules enforced on gallery data
#[derive(Debug, Error, PartialEq)]
pub enum RecordError {
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Invalid offer: {0}")]
    InvalidOffer(String),

    #[error("Unknown environment: {0}")]
    UnknownEnvironment(String),
}

/// Loading the viewer configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type ModelResult<T> = Result<T, ModelError>;

/// Setting up the GPU for a window
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Cannot create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("No suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("Cannot open GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("Surface reports no texture formats")]
    NoSurfaceFormat,
}

/// Running the viewer window
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("Cannot create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("Renderer setup failed: {0}")]
    Render(#[from] RenderError),
}

/// Reading or rewriting the JSON record files
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path} does not hold a list of artworks")]
    NotAList { path: String },
}

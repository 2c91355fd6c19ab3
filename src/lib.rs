pub mod api;
pub mod app;
pub mod chart;
pub mod config;
pub mod confirm;
pub mod dom;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod participants;
pub mod presenter;
pub mod resources;
pub mod state;
pub mod ui;

pub use api::ApiClient;
pub use app::router;
pub use config::{resolve_api_base, resolve_port};
pub use dom::Document;
pub use errors::ClientError;
pub use resources::ResourceContext;
pub use state::AppState;

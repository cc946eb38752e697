pub mod app;
pub mod error;
pub mod routes;
pub mod settings;

pub use app::{build_client, build_router, AppState};
pub use error::ApiError;
pub use settings::ServerSettings;

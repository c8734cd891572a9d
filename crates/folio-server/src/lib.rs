//! JSON API for a folio site

pub mod error;
pub mod extract;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use router::create_router;
pub use server::FolioServer;
pub use state::AppState;

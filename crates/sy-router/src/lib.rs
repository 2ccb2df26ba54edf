pub mod cors;
pub mod handlers;
pub mod metrics;
pub mod openapi;
pub mod path;
pub mod server;
pub mod state;

pub use server::{build_router, serve};
pub use state::AppState;

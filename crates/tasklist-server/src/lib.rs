pub mod config;
pub mod dispatch;
pub mod handlers;
pub mod server;
pub mod store;

pub use config::ServerConfig;
pub use server::{build_router, start, AppState, ServerHandle};
pub use store::TaskStore;

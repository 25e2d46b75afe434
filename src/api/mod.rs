//! HTTP API: routes, handlers, sessions, and the embedded chat page

pub mod handlers;
pub mod routes;
pub mod server;
pub mod session;
pub mod types;
pub mod ui;

pub use handlers::AppState;
pub use server::serve_api;

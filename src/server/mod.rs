//! HTTP shell
//!
//! Binds each route to a container method, keeps one session per browser
//! and turns container navigation into redirects.

pub mod builder;
pub mod client;
pub mod handlers;
pub mod router;
pub mod state;

pub use builder::ServerBuilder;
pub use client::{Client, SESSION_COOKIE};
pub use router::build_routes;
pub use state::{AppState, ClientSession, SessionRegistry};

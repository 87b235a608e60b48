// src/api/http/mod.rs

pub mod handlers;
pub mod router;
pub mod session;
pub mod tutor;

pub use router::http_router;
pub use session::{SessionCookies, SESSION_COOKIE};

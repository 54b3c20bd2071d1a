//! rflow-client: HTTP implementation of the core `Session` trait.

pub mod http;
pub mod routes;

pub use http::HttpSession;
pub use routes::{form_fields, route_for, Method, Route};

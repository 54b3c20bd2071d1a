//! rflow-session: in-memory analytics session (no server required).

pub mod frame;
pub mod local;

pub use frame::Frame;
pub use local::LocalSession;

pub mod reflection;
pub mod service;
pub mod session_service;
pub mod stats;

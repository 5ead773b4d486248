pub mod common;
pub mod prefs;
pub mod resources;
pub mod session;
pub mod status;

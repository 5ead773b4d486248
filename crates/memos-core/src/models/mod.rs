//! Data models for the Memos client

mod preferences;
mod resource;
mod system_status;
mod user;

pub use preferences::{Appearance, Locale, PreferencePatch, Preferences};
pub use resource::{MemoId, Resource, ResourceId};
pub use system_status::{CustomizedProfile, SystemStatus};
pub use user::{StoredSession, User, UserRole};

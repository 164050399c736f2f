pub mod error;
pub mod events;
pub mod models;
pub mod resource;
pub mod session;
pub mod validation;

pub use error::{ApiErrorBody, CoreError, ErrorCategory, Result, ValidationError};
pub use events::{ClientEvent, EventBroadcaster, Notification, NotificationVariant, SessionEvent};
pub use resource::Resource;
pub use session::{Role, Session};

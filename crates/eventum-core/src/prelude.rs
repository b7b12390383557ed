pub use crate::app::App;
pub use eventum_types::error::{ClResult, Error};
pub use eventum_types::types::{EventId, Patch, Timestamp, UserId};

pub use tracing::{debug, error, info, warn};

// vim: ts=4

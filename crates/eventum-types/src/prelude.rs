pub use crate::error::{ClResult, Error};
pub use crate::types::{EventId, Patch, Timestamp, UserId};

pub use tracing::{debug, error, info, warn};

// vim: ts=4

pub use eventum_core::prelude::*;

// vim: ts=4

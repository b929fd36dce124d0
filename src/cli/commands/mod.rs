//! CLI command implementations

pub mod completions;
pub mod convert;
pub mod frame;
pub mod palette;
pub mod request;
pub mod tendons;
pub mod view;
pub mod watch;

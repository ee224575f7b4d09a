//! Panes of the explorer window.

pub mod files;
pub mod request;
pub mod toolbar;
pub mod tree;

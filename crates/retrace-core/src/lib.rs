pub mod engine;
pub mod error;
pub mod event;
pub mod path;
pub mod registry;
pub mod run;
pub mod tree;
pub mod view;

pub use engine::Devtools;
pub use error::{Result, RetraceError};

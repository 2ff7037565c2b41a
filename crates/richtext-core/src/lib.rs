mod active;
mod catalog;
mod core;
mod error;
mod history;
mod host;
mod link;
mod memory;
mod selection;

pub use crate::active::*;
pub use crate::catalog::*;
pub use crate::core::*;
pub use crate::error::*;
pub use crate::history::*;
pub use crate::host::*;
pub use crate::link::*;
pub use crate::memory::*;
pub use crate::selection::*;

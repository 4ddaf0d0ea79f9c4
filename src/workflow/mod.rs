//! Workflow template handling: loading templates from the configured
//! directory and patching prompt text, seeds, and output filenames into
//! a per-request copy of the node graph.

mod mutate;
mod store;

pub use mutate::{apply, MutationSpec};
pub use store::{list, load};

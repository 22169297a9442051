mod block;
pub mod blocks;
mod document;

pub use block::{Block, BlockKind};
pub use blocks::*;
pub use document::{DocumentProperties, DocumentRecord, OutputFormat, PageMetadata};

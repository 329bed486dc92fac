pub mod cache;
pub mod extractor;
pub mod launcher;
pub mod links;
pub mod titles;
pub mod watch_page;

pub use crate::domain::model::{ExtractedLink, ExtractionResult};
pub use crate::domain::ports::{CommandRunner, PageFetcher, TitleShortener};
pub use crate::utils::error::Result;

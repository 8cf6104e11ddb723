pub mod cli;
pub mod error;
pub mod fetcher;
pub mod logging;
pub mod target;

pub use cli::Args;
pub use error::FetchError;
pub use fetcher::{Download, Fetcher};
pub use target::Target;

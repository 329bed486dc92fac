// Adapters layer: concrete implementations of the domain ports (http, gemini, child processes).

pub mod gemini;
pub mod http;
pub mod process;

pub use gemini::GeminiShortener;
pub use http::HttpPageFetcher;
pub use process::SystemCommandRunner;

// Trawler - a web-crawling toolkit for Rust
//
// This library wires the trawler crates together: the download pipeline
// and its types from trawler-core, plus optional stages behind features.

// Re-export core functionality
pub use trawler_core::*;

// Re-export optional stages
#[cfg(feature = "compression")]
pub use trawler_compression;

// Prelude for common imports
pub mod prelude {
    pub use trawler_core::prelude::*;

    #[cfg(feature = "compression")]
    pub use trawler_compression::{
        DecompressionConfig, HttpDecompressionMiddleware, accept_encoding,
    };
}

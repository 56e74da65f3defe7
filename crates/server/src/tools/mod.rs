//! MCP tool implementations.
//!
//! This module contains all tools exposed by the jidanjia server.

pub mod drama_analyze;
pub mod drama_batch_analyze;
pub mod drama_lookup;

pub use drama_analyze::DramaAnalyzeParams;
pub use drama_batch_analyze::DramaBatchAnalyzeParams;
pub use drama_lookup::DramaLookupParams;

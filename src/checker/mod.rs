// src/checker/mod.rs
// =============================================================================
// This module contains the health-checking logic.
//
// Submodules:
// - http: Makes the concurrent HTTP requests and reports results
//
// This file (mod.rs) is the module root - it exports the public API that the
// rest of the application uses, so callers write `checker::check_urls()`
// instead of reaching into `checker::http`.
// =============================================================================

mod http;

// Re-export public items from the submodule
pub use http::{check_urls, CheckResult};

//! Turning a finished surface into a caller-owned, releasable resource.

/// PNG encoding behind an asynchronous seam.
pub mod png;
/// Managed handles for encoded payloads.
pub mod resource;

use serde::Serialize;

/// Snapshot of a pooled endpoint as seen by the pool at one instant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointStatus {
	pub url: String,
	pub healthy: bool,
	/// Whether the pool cursor currently points at this endpoint
	pub current: bool,
}

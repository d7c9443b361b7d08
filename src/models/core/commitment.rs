use serde::{Deserialize, Serialize};
use std::fmt;

/// Confirmation level requested from the cluster for reads and preflight checks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
	#[default]
	Processed,
	Confirmed,
	Finalized,
}

impl Commitment {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Processed => "processed",
			Self::Confirmed => "confirmed",
			Self::Finalized => "finalized",
		}
	}
}

impl fmt::Display for Commitment {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

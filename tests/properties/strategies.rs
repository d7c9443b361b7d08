use proptest::prelude::*;

const MIN_ENDPOINTS: usize = 1;
const MAX_ENDPOINTS: usize = 8;

/// What an endpoint answers to a liveness probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeAnswer {
	Height(u64),
	Unreachable,
}

impl ProbeAnswer {
	pub fn is_healthy(&self) -> bool {
		matches!(self, ProbeAnswer::Height(height) if *height > 0)
	}
}

pub fn probe_answer_strategy() -> impl Strategy<Value = ProbeAnswer> {
	prop_oneof![
		3 => (1u64..400_000_000).prop_map(ProbeAnswer::Height),
		1 => Just(ProbeAnswer::Height(0)),
		2 => Just(ProbeAnswer::Unreachable),
	]
}

/// Probe answers for every endpoint of a pool, in pool order
pub fn pool_layout_strategy() -> impl Strategy<Value = Vec<ProbeAnswer>> {
	prop::collection::vec(probe_answer_strategy(), MIN_ENDPOINTS..=MAX_ENDPOINTS)
}

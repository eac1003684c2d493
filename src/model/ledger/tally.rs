use serde::Serialize;

/// One counter per candidate, in candidate order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Tally(Vec<u64>);

impl Tally {
    pub fn zeroed(candidates: usize) -> Self {
        Self(vec![0; candidates])
    }

    /// Count one vote. The index has already been validated.
    pub fn increment(&mut self, index: usize) {
        self.0[index] += 1;
    }

    pub fn counts(&self) -> &[u64] {
        &self.0
    }

    pub fn total(&self) -> u64 {
        self.0.iter().sum()
    }
}

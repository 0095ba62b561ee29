use serde::{Deserialize, Serialize};

/// Synthesizes `"{y}-{n}"` ids for traces added without one.
///
/// The counter belongs to a single plot and only moves when a trace is added,
/// so re-running a layout never changes an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TraceIdGenerator {
    next: u64,
}

impl TraceIdGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `existing` when present, otherwise a fresh id for `y_column`.
    ///
    /// The counter advances for every trace, named or not.
    pub fn assign(&mut self, existing: Option<&str>, y_column: &str) -> String {
        let n = self.next;
        self.next += 1;
        match existing {
            Some(id) if !id.is_empty() => id.to_owned(),
            _ => format!("{y_column}-{n}"),
        }
    }

    #[must_use]
    pub fn issued(&self) -> u64 {
        self.next
    }
}

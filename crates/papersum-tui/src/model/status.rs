/// Lifecycle of a section's remote operation: idle, loading, then ready or failed.
///
/// Only one of the loading indicator, the results and the error is visible
/// at a time for a section, so the view switches on this alone.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OpStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(String),
}

impl OpStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

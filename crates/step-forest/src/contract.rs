use crate::log::{OpLog, StepRecord};
use crate::snapshot::{Snapshot, StructureKind, TreeStats};

/// The kind-independent surface every engine exposes, so callers can hold
/// a `dyn Structure` (or an enum of engines) without knowing which one.
///
/// Mutating operations stay on the concrete types; their signatures differ
/// too much (keys vs words vs indices) to flatten into one trait.
pub trait Structure {
    fn kind(&self) -> StructureKind;

    /// Number of stored values (or words, for the trie).
    fn size(&self) -> usize;

    /// Summary statistics. Recomputes cached per-node height/depth first,
    /// so this is a side-effecting read; two calls with no intervening
    /// mutation return identical results.
    fn stats(&mut self) -> TreeStats;

    /// Serializable structural snapshot, `None` when empty.
    fn snapshot(&self) -> Option<Snapshot>;

    /// Drop all contents and the operation log.
    fn clear(&mut self);

    fn log(&self) -> &OpLog;

    fn log_mut(&mut self) -> &mut OpLog;

    /// Enabling rewinds the replay cursor to the start of the log.
    fn set_step_mode(&mut self, enabled: bool) {
        self.log_mut().set_step_mode(enabled);
    }

    /// Next unconsumed step record, `None` at end of log.
    fn next_step(&mut self) -> Option<StepRecord> {
        self.log_mut().next_step()
    }

    fn reset_steps(&mut self) {
        self.log_mut().reset_cursor();
    }
}

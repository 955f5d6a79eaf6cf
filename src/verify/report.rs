/// Per-file verification counters.
///
/// A head piece is the first piece the target overlaps when the file
/// does not begin on a piece boundary; its leading bytes belong to the
/// previous file. Tail pieces are the symmetric case at the end of the
/// file. Both start out counted as missing when their digests fail
/// during the single-file scan and may be reclassified as passed by
/// boundary reconstruction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PieceReport {
    /// Pieces whose digest matched.
    pub passed: u32,
    /// Head pieces that could not be verified from the target alone.
    pub head_missing: u32,
    /// Tail pieces that could not be verified from the target alone.
    pub tail_missing: u32,
    /// Pieces that mismatched outright.
    pub failed: u32,
    /// Pieces examined.
    pub total: u32,
}

impl PieceReport {
    /// True when nothing failed and no boundary piece is left missing.
    pub fn all_passed(&self) -> bool {
        self.failed == 0 && self.head_missing == 0 && self.tail_missing == 0
    }
}

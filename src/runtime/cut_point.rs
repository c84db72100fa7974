//! Placement of the chunk boundaries.
//!
//! The input is first divided into equally sized chunks. Each inner boundary is then moved
//! forward to the first position inside the lookahead window at which the cut point automaton
//! matches. The match itself may extend beyond the window. Both workers that share a boundary
//! compute it independently and get the same result.

use crate::common::DfaTable;

/// The nominal start offset of the chunk with the given index.
/// The first `len % workers` chunks are one byte longer than the others.
pub(crate) fn nominal_offset(len: usize, workers: usize, index: usize) -> usize {
    let base = len / workers;
    let extra = len % workers;
    base * index + index.min(extra)
}

/// Find the cut point for the boundary at `nominal`.
///
/// Returns `None` if no cut point exists inside the lookahead window. If the window reaches the
/// end of the input without a cut point, the cut is placed at the end of the input.
pub(crate) fn find_cut_point(
    cut_points: &DfaTable,
    input: &[u8],
    nominal: usize,
    lookahead: usize,
) -> Option<usize> {
    let len = input.len();
    if nominal == 0 || nominal >= len {
        return Some(nominal.min(len));
    }
    let window_end = nominal.saturating_add(lookahead);
    (nominal..window_end.min(len))
        .find(|pos| cut_points.shortest_match(input, *pos).is_some())
        .or_else(|| (window_end >= len).then_some(len))
}

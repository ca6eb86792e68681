use std::ops::Range;

use itertools::Itertools;

use crate::coordinate::ContigIdx;

/// A single window: contiguous, half-open range of variant indices located on one contig.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    pub contig: ContigIdx,
    pub range : Range<usize>,
}

/// Window boundaries of a dataset, stored column-wise (`window_contig`, `window_start`, `window_stop`).
///
/// Boundaries refer to variant indices, and are thus only valid for the variant set they were
/// computed on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Windows {
    contig: Vec<ContigIdx>,
    start : Vec<usize>,
    stop  : Vec<usize>,
}

impl Windows {
    /// Partition variants into windows of `size` variants, with a new window starting every `step`
    /// variants. Windows never span two contigs: each contiguous run of variants sharing the same
    /// contig is windowed independently.
    ///
    /// Callers are expected to validate `size` and `step` (both must be non-zero).
    #[must_use]
    pub fn by_variant(variant_contig: &[ContigIdx], size: usize, step: usize) -> Self {
        debug_assert!(size > 0 && step > 0);
        let mut windows = Self::default();
        let runs = variant_contig.iter()
            .enumerate()
            .group_by(|(_, contig)| **contig);

        for (contig, run) in &runs {
            let run: Vec<usize> = run.map(|(i, _)| i).collect();
            let (first, end) = (run[0], run[run.len() - 1] + 1);
            for start in (first..end).step_by(step) {
                windows.contig.push(contig);
                windows.start.push(start);
                windows.stop.push(usize::min(start + size, end));
            }
        }
        windows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.start.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Window> + '_ {
        self.contig.iter()
            .zip(self.start.iter().zip(self.stop.iter()))
            .map(|(contig, (start, stop))| Window{contig: *contig, range: *start..*stop})
    }

    #[must_use]
    pub fn window_contig(&self) -> &[ContigIdx] {
        &self.contig
    }

    #[must_use]
    pub fn window_start(&self) -> &[usize] {
        &self.start
    }

    #[must_use]
    pub fn window_stop(&self) -> &[usize] {
        &self.stop
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contigs(layout: &[(u32, usize)]) -> Vec<ContigIdx> {
        layout.iter().flat_map(|(c, n)| std::iter::repeat(ContigIdx(*c)).take(*n)).collect()
    }

    #[test]
    fn overlapping_windows_single_contig() {
        let windows = Windows::by_variant(&contigs(&[(0, 10)]), 4, 2);
        assert_eq!(windows.window_start(), &[0, 2, 4, 6, 8]);
        assert_eq!(windows.window_stop(),  &[4, 6, 8, 10, 10]);
    }

    #[test]
    fn windows_do_not_span_contigs() {
        let windows = Windows::by_variant(&contigs(&[(0, 3), (1, 5)]), 4, 4);
        let got: Vec<Window> = windows.iter().collect();
        assert_eq!(got, vec![
            Window{contig: ContigIdx(0), range: 0..3},
            Window{contig: ContigIdx(1), range: 3..7},
            Window{contig: ContigIdx(1), range: 7..8},
        ]);
    }

    #[test]
    fn step_larger_than_size_leaves_gaps() {
        let windows = Windows::by_variant(&contigs(&[(2, 10)]), 2, 5);
        assert_eq!(windows.window_start(), &[0, 5]);
        assert_eq!(windows.window_stop(),  &[2, 7]);
        assert!(windows.window_contig().iter().all(|c| *c == ContigIdx(2)));
    }

    #[test]
    fn empty_dataset_has_no_windows() {
        let windows = Windows::by_variant(&[], 500, 250);
        assert!(windows.is_empty());
        assert_eq!(windows.len(), 0);
    }
}

use crate::folding::FoldingRange;
use std::cmp::Ordering;

/// Filters and orders raw provider output for the fold renderer.
pub struct RangeFilterSorter;

impl RangeFilterSorter {
    /// Keeps valid ranges matching `kind` (an empty kind matches everything),
    /// ordered bottom-up with inner ranges first on a shared start line.
    /// Duplicates are kept.
    pub fn process(ranges: Vec<FoldingRange>, kind: Option<&str>) -> Vec<FoldingRange> {
        let kind = kind.filter(|k| !k.is_empty());

        let mut ranges: Vec<FoldingRange> = ranges
            .into_iter()
            .filter(|range| kind.map_or(true, |k| range.kind.as_deref() == Some(k)))
            .filter(FoldingRange::is_valid)
            .collect();

        ranges.sort_by(Self::compare);
        ranges
    }

    pub fn compare(a: &FoldingRange, b: &FoldingRange) -> Ordering {
        b.start_line
            .cmp(&a.start_line)
            .then_with(|| a.end_line.cmp(&b.end_line))
    }
}

//! Current-section detection from a scroll offset

use crate::layout::SectionLayout;

/// Index of the section the reader is looking at
///
/// The reference line sits `ratio` of the viewport below the scroll offset.
/// The result is the last section whose offset is at or above that line,
/// found in a single forward pass; it is not the nearest section. With no
/// qualifying section the answer is 0.
pub fn section_at<L: SectionLayout + ?Sized>(layout: &L, scroll_top: f64, ratio: f64) -> usize {
    let reference = scroll_top + layout.viewport_height() * ratio;
    let mut best = 0;
    for index in 0..layout.section_count() {
        if layout.section_offset(index) <= reference {
            best = index;
        }
    }
    best
}

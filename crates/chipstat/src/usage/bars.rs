use std::num::NonZeroU32;

use chrono::Duration;

use crate::common::utils::time::one_hour;

/// Glyphs ordered by density, from an idle to a fully used bin.
pub const BAR_GLYPHS: [char; 8] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇'];

/// Frames the bar on both sides.
pub const BAR_DELIMITER: char = '│';

/// Number of bins needed to show `hours` hours.
pub fn bin_count(hours: u32, binwidth: NonZeroU32) -> usize {
    hours.div_ceil(binwidth.get()) as usize
}

/// Sums consecutive groups of `binwidth` hourly slots. The last group may be shorter.
pub fn bin_occupancy(hourly: &[Duration], binwidth: NonZeroU32) -> Vec<Duration> {
    hourly
        .chunks(binwidth.get() as usize)
        .map(|bin| bin.iter().fold(Duration::zero(), |acc, d| acc + *d))
        .collect()
}

/// Index into [`BAR_GLYPHS`] for a bin with `occupied` time.
///
/// The occupancy fraction is always relative to the full `binwidth`, even for a
/// shorter trailing bin. Any nonzero occupancy maps to at least the first nonzero glyph.
pub fn glyph_index(occupied: Duration, binwidth: NonZeroU32) -> usize {
    let last = (BAR_GLYPHS.len() - 1) as i64;
    let capacity = binwidth.get() as i64 * one_hour().num_seconds();
    let occupied = occupied.num_seconds().clamp(0, capacity);
    // ceil(last * occupied / capacity)
    ((last * occupied + capacity - 1) / capacity) as usize
}

/// Renders hourly occupancy (without the spillover slot) as a framed bar
/// with one glyph per bin, e.g. `│ ▁▇▇▃ │`.
pub fn render(hourly: &[Duration], binwidth: NonZeroU32) -> String {
    let bins = bin_count(hourly.len() as u32, binwidth);
    let mut bar = String::with_capacity((bins + 2) * BAR_DELIMITER.len_utf8());
    bar.push(BAR_DELIMITER);
    bar.extend(
        bin_occupancy(hourly, binwidth)
            .into_iter()
            .map(|occupied| BAR_GLYPHS[glyph_index(occupied, binwidth)]),
    );
    bar.push(BAR_DELIMITER);
    bar
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use chrono::Duration;

    use super::{bin_count, bin_occupancy, glyph_index, render};

    fn width(value: u32) -> NonZeroU32 {
        NonZeroU32::new(value).unwrap()
    }

    fn minutes(values: &[i64]) -> Vec<Duration> {
        values.iter().map(|m| Duration::minutes(*m)).collect()
    }

    #[test]
    fn test_glyph_index_bounds() {
        assert_eq!(glyph_index(Duration::zero(), width(1)), 0);
        assert_eq!(glyph_index(Duration::seconds(1), width(1)), 1);
        assert_eq!(glyph_index(Duration::hours(1), width(1)), 7);
        assert_eq!(glyph_index(Duration::hours(2), width(2)), 7);
    }

    #[test]
    fn test_glyph_index_ceil() {
        // 30 minutes => 3.5 => 4
        assert_eq!(glyph_index(Duration::minutes(30), width(1)), 4);
        // just below and just above 3/7 of an hour
        assert_eq!(glyph_index(Duration::seconds(1542), width(1)), 3);
        assert_eq!(glyph_index(Duration::seconds(1543), width(1)), 4);
        // 30 minutes in a two hour bin => 1.75 => 2
        assert_eq!(glyph_index(Duration::minutes(30), width(2)), 2);
    }

    #[test]
    fn test_bin_occupancy_trailing_bin() {
        let bins = bin_occupancy(&minutes(&[60, 30, 15, 0, 45]), width(2));
        assert_eq!(bins, minutes(&[90, 15, 45]));
    }

    #[test]
    fn test_trailing_bin_divides_by_full_width() {
        // A short trailing bin with one fully used hour is only half used.
        let bar = render(&minutes(&[0, 0, 60]), width(2));
        assert_eq!(bar, "│ ▄│");
    }

    #[test]
    fn test_render_hourly() {
        let bar = render(&minutes(&[0, 60, 30, 1]), width(1));
        assert_eq!(bar, "│ ▇▄▁│");
    }

    #[test]
    fn test_render_length() {
        let hourly = minutes(&[10; 24]);
        for binwidth in [1, 2, 3, 4, 6, 8, 12, 24] {
            let bar = render(&hourly, width(binwidth));
            assert_eq!(bar.chars().count(), 24 / binwidth as usize + 2);
            assert_eq!(bin_count(24, width(binwidth)), 24 / binwidth as usize);
        }
        assert_eq!(render(&hourly, width(2)).chars().count(), 12 + 2);
    }

    #[test]
    fn test_bin_count_rounds_up() {
        assert_eq!(bin_count(25, width(2)), 13);
        assert_eq!(bin_occupancy(&minutes(&[1; 25]), width(2)).len(), 13);
    }
}

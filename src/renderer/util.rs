#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ImageRange {
    pub from: u32,
    pub to: u32,
}

/// Splits `0..height` into `num_range` contiguous row ranges, the last one taking the rest.
pub fn create_image_ranges(num_range: u32, height: u32) -> Vec<ImageRange> {
    let num_range = num_range.clamp(1, height.max(1));
    let height_per_range = height / num_range;
    (0..num_range)
        .map(|t| ImageRange {
            from: t * height_per_range,
            to: if t + 1 == num_range {
                height
            } else {
                (t + 1) * height_per_range
            },
        })
        .collect()
}

pub fn render_progress_bar(width: u32, height: u32, visible: bool) -> indicatif::ProgressBar {
    if !visible {
        return indicatif::ProgressBar::hidden();
    }
    let progress_bar = indicatif::ProgressBar::new(width as u64 * height as u64);
    progress_bar.set_style(
        indicatif::ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} (eta: {eta})")
            .progress_chars("#>-"),
    );
    progress_bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges_cover_every_row_once() {
        for &(num, height) in &[(1, 10), (3, 10), (16, 10), (8, 256)] {
            let ranges = create_image_ranges(num, height);
            assert_eq!(ranges.first().unwrap().from, 0);
            assert_eq!(ranges.last().unwrap().to, height);
            for pair in ranges.windows(2) {
                assert_eq!(pair[0].to, pair[1].from);
            }
            assert!(ranges.iter().all(|r| r.from < r.to));
        }
    }
}

use std::{num::NonZeroUsize, ops::Range};

use crate::{
    traits::{PixelClassifier, PixelTransform},
    types::{PixelGrid, Rectangle},
};

/// Scan `rows` of the grid in row-major order and emit one rectangle per black pixel
pub fn scan_rows<C, T>(
    grid: &PixelGrid,
    classifier: &C,
    transform: &T,
    rows: Range<u32>,
) -> Vec<Rectangle>
where
    C: PixelClassifier + ?Sized,
    T: PixelTransform + ?Sized,
{
    let (width, height) = (grid.width(), grid.height());
    let mut rectangles = Vec::new();

    for y in rows {
        for (x, pixel) in grid.row(y).chunks_exact(grid.channels()).enumerate() {
            if classifier.is_black(pixel) {
                rectangles.push(transform.pixel_to_rect(x as u32, y, width, height));
            }
        }
    }

    rectangles
}

/// Scan the whole grid on the calling thread
pub fn scan<C, T>(grid: &PixelGrid, classifier: &C, transform: &T) -> Vec<Rectangle>
where
    C: PixelClassifier + ?Sized,
    T: PixelTransform + ?Sized,
{
    scan_rows(grid, classifier, transform, 0..grid.height())
}

/// Scan the grid split into contiguous row bands, one scoped thread per band.
///
/// Bands are concatenated in row order, so the result equals [`scan`].
pub fn scan_parallel<C, T>(
    grid: &PixelGrid,
    classifier: &C,
    transform: &T,
    jobs: NonZeroUsize,
) -> Vec<Rectangle>
where
    C: PixelClassifier + ?Sized,
    T: PixelTransform + ?Sized,
{
    let height = grid.height() as usize;
    let jobs = jobs.get().min(height);
    if jobs <= 1 {
        return scan(grid, classifier, transform);
    }

    let band = height.div_ceil(jobs);

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..height)
            .step_by(band)
            .map(|start| {
                let rows = start as u32..(start + band).min(height) as u32;
                scope.spawn(move || {
                    tracing::debug!("Scanning rows {}..{}", rows.start, rows.end);
                    scan_rows(grid, classifier, transform, rows)
                })
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
            })
            .collect()
    })
}

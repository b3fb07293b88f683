use crate::application::browser::HicBrowser;
use crate::application::navigation::GenomicRange;
use crate::domain::errors::{NavResult, NavigationError};
use crate::domain::view::ViewDimensions;
use crate::view_state::ViewState;

/// Screen rectangle, origin at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SweepRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Rubber-band zoom: drag a rectangle with the viewport's aspect ratio and
/// go to the region it covers on release.
#[derive(Debug, Clone)]
pub struct SweepZoom {
    aspect_ratio: f64,
    mouse_down: (f64, f64),
    rect: SweepRect,
}

impl SweepZoom {
    pub fn begin(dims: ViewDimensions, mouse_down_x: f64, mouse_down_y: f64) -> Self {
        Self {
            aspect_ratio: dims.width / dims.height,
            mouse_down: (mouse_down_x, mouse_down_y),
            rect: SweepRect { x: mouse_down_x, y: mouse_down_y, width: 1.0, height: 1.0 },
        }
    }

    /// Stretch the rectangle to the pointer along the dominant axis.
    pub fn update(&mut self, x: f64, y: f64) -> SweepRect {
        let (origin_x, origin_y) = self.mouse_down;
        let (dx, dy) = (x - origin_x, y - origin_y);

        let (width, height) = if dx > dy {
            (dx, dx / self.aspect_ratio)
        } else {
            (dy * self.aspect_ratio, dy)
        };

        self.rect = SweepRect {
            x: origin_x.min(origin_x + width),
            y: origin_y.min(origin_y + height),
            width: width.abs(),
            height: height.abs(),
        };
        self.rect
    }

    pub fn rect(&self) -> SweepRect {
        self.rect
    }

    /// Navigate to the swept region.
    pub fn dismiss(self, browser: &HicBrowser) -> NavResult<ViewState> {
        let state = browser.state();
        let bin_size = browser.resolution().ok_or(NavigationError::NoDataset)? as f64;
        let rect = self.rect;

        let bp_x = (state.x + rect.x / state.pixel_size) * bin_size;
        let bp_y = (state.y + rect.y / state.pixel_size) * bin_size;
        let bp_x_max = bp_x + rect.width / state.pixel_size * bin_size;
        let bp_y_max = bp_y + rect.height / state.pixel_size * bin_size;

        browser.goto(
            GenomicRange::new(state.chr1, bp_x, Some(bp_x_max)),
            GenomicRange::new(state.chr2, bp_y, Some(bp_y_max)),
            None,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rectangle_keeps_viewport_aspect_ratio() {
        let mut sweep = SweepZoom::begin(ViewDimensions::new(800.0, 400.0), 100.0, 100.0);
        let rect = sweep.update(300.0, 120.0);
        assert_eq!(rect, SweepRect { x: 100.0, y: 100.0, width: 200.0, height: 100.0 });
    }

    #[test]
    fn dragging_up_left_moves_the_origin() {
        let mut sweep = SweepZoom::begin(ViewDimensions::new(400.0, 400.0), 200.0, 200.0);
        let rect = sweep.update(150.0, 100.0);
        assert_eq!(rect, SweepRect { x: 150.0, y: 150.0, width: 50.0, height: 50.0 });
    }
}

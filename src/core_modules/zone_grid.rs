// THEORY:
// The `ZoneGrid` is the spatial partitioning layer of the analyzer. The flash
// guidelines are defined over a minimum visual area, not over individual
// pixels, so every frame is sliced into a fixed grid of zones of at most
// 341x256 pixels and all transition criteria are evaluated zone by zone.
//
// Key architectural principles:
// 1.  **Stable addressing**: The grid is derived once from the run's frame
//     dimensions. A zone's `(row, col)` address means the same rectangle in
//     every frame, so cross-frame comparison is an aligned index lookup,
//     never a search.
// 2.  **Exact tiling**: Zones tile the frame exactly. Edge zones shrink to
//     fit the remaining pixels; no zone ever exceeds the guideline maximum.
// 3.  **Spatial pooling**: Aggregating a zone to its mean luminance and its
//     red-area proportion cancels isolated pixel noise and reduces the data
//     volume the temporal stages have to carry.

use crate::core_modules::frame::Frame;
use serde::Serialize;

/// Aggregated metrics for one grid cell of one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneMetrics {
    /// Row index of this zone in the grid.
    pub row: u32,
    /// Column index of this zone in the grid.
    pub col: u32,
    /// Mean Rec. 601 luminance over the zone's pixels, 0-255 scale.
    pub luminance: f64,
    /// Fraction of the zone's pixels classified red-dominant, in [0, 1].
    pub red_area_proportion: f64,
    /// The zone's pixel count. Edge zones are smaller than interior ones.
    pub area: u64,
}

/// Partitions frames of a fixed size into a stable grid of analysis zones.
#[derive(Debug, Clone)]
pub struct ZoneGrid {
    image_width: u32,
    image_height: u32,
    zone_width: u32,
    zone_height: u32,
    grid_width: u32,
    grid_height: u32,
}

impl ZoneGrid {
    /// Creates a grid for the run's frame dimensions. `zone_width` and
    /// `zone_height` are the guideline maxima; the last row/column absorbs
    /// the remainder as smaller cells.
    pub fn new(image_width: u32, image_height: u32, zone_width: u32, zone_height: u32) -> Self {
        Self {
            image_width,
            image_height,
            zone_width,
            zone_height,
            grid_width: image_width.div_ceil(zone_width),
            grid_height: image_height.div_ceil(zone_height),
        }
    }

    /// Number of zone columns.
    pub fn grid_width(&self) -> u32 {
        self.grid_width
    }

    /// Number of zone rows.
    pub fn grid_height(&self) -> u32 {
        self.grid_height
    }

    /// Slices one frame into per-zone metrics, row-major. A single pass over
    /// the buffer accumulates luminance and red-dominant counts per cell.
    pub fn partition(&self, frame: &Frame) -> Vec<ZoneMetrics> {
        let num_zones = (self.grid_width * self.grid_height) as usize;
        let mut luminance_sums = vec![0.0f64; num_zones];
        let mut red_counts = vec![0u64; num_zones];
        let mut areas = vec![0u64; num_zones];

        for (i, pixel) in frame.pixels().enumerate() {
            let x = (i as u32) % self.image_width;
            let y = (i as u32) / self.image_width;
            let zone_index =
                ((y / self.zone_height) * self.grid_width + (x / self.zone_width)) as usize;

            luminance_sums[zone_index] += pixel.luminance();
            if pixel.is_red_dominant() {
                red_counts[zone_index] += 1;
            }
            areas[zone_index] += 1;
        }

        (0..num_zones)
            .map(|i| {
                let area = areas[i];
                ZoneMetrics {
                    row: i as u32 / self.grid_width,
                    col: i as u32 % self.grid_width,
                    luminance: if area > 0 {
                        luminance_sums[i] / area as f64
                    } else {
                        0.0
                    },
                    red_area_proportion: if area > 0 {
                        red_counts[i] as f64 / area as f64
                    } else {
                        0.0
                    },
                    area,
                }
            })
            .collect()
    }
}

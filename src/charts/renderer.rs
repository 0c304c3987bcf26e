//! Static Map Renderer
//! Draws a state's accidents as a scatter over the clipped base map and writes a PNG.
//!
//! Layout:
//! 1. Optional caption "State {state}, {year}" with longitude/latitude axes
//! 2. State outlines clipped to the accident bounds
//! 3. One filled marker per accident with known coordinates

use crate::charts::{BaseMap, StateMap};
use crate::config::MapOptions;
use crate::error::{FarsError, Result};
use plotters::prelude::*;
use std::fmt::Display;
use std::path::Path;
use tracing::debug;

const OUTLINE: RGBColor = RGBColor(120, 120, 120);
const POINT: RGBColor = RGBColor(231, 76, 60);

pub struct StaticMapRenderer;

impl StaticMapRenderer {
    /// Render `map` to `path`. Returns the number of markers drawn.
    ///
    /// Maps without bounds (no known coordinates) cannot be drawn and yield
    /// [`FarsError::Render`].
    pub fn render(
        map: &StateMap,
        base: &BaseMap,
        options: &MapOptions,
        path: &Path,
    ) -> Result<usize> {
        let bounds = map
            .bounds
            .ok_or_else(|| FarsError::Render("no known coordinates to bound the map".into()))?;
        let view = bounds.padded();

        let root = BitMapBackend::new(path, (options.width, options.height)).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let mut builder = ChartBuilder::on(&root);
        builder.margin(10);
        if options.labels {
            builder
                .caption(format!("State {}, {}", map.state, map.year), ("sans-serif", 24))
                .x_label_area_size(35)
                .y_label_area_size(45);
        }
        let mut chart = builder
            .build_cartesian_2d(view.lon_min..view.lon_max, view.lat_min..view.lat_max)
            .map_err(render_err)?;

        if options.labels {
            chart
                .configure_mesh()
                .disable_mesh()
                .x_desc("Longitude")
                .y_desc("Latitude")
                .draw()
                .map_err(render_err)?;
        }

        if !base.is_empty() {
            let segments = base.clipped_segments(&view);
            debug!(segments = segments.len(), "drawing base map");
            chart
                .draw_series(
                    segments
                        .into_iter()
                        .map(|[a, b]| PathElement::new(vec![a, b], OUTLINE.stroke_width(1))),
                )
                .map_err(render_err)?;
        }

        chart
            .draw_series(
                map.points
                    .iter()
                    .map(|&p| Circle::new(p, options.point_radius, POINT.filled())),
            )
            .map_err(render_err)?;

        root.present().map_err(render_err)?;
        Ok(map.points.len())
    }
}

fn render_err<E: Display>(e: E) -> FarsError {
    FarsError::Render(e.to_string())
}

//! SVG rendering of the twelve month grids.
//!
//! Layout is computed in pixels on a single drawing area: a title strip, a
//! 4x3 block of month panels, and a color bar on the right.

use std::path::Path;

use anyhow::Result;
use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::{debug, info};

use super::grid::{DelayLookup, MonthGrid, WEEKDAY_LABELS, year_grids};
use super::scale::ColorScale;

const WIDTH: u32 = 1400;
const HEIGHT: u32 = 1000;
const MARGIN: i32 = 20;
const TITLE_HEIGHT: i32 = 60;
const LEGEND_WIDTH: i32 = 130;
const PANEL_ROWS: i32 = 4;
const PANEL_COLS: i32 = 3;
const PANEL_HEADER: i32 = 26;
const WEEKDAY_HEADER: i32 = 18;
const MAX_WEEKS: i32 = 6;
const CELL_GAP: i32 = 2;
const COLOR_BAR_STEPS: i32 = 120;

type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;

/// Draws the calendar for one airline and year to `path`.
///
/// Days without a value are left unfilled. Returns the number of colored
/// day cells.
#[tracing::instrument(skip(lookup, scale), fields(path = %path.display(), airline = lookup.airline()))]
pub fn render_calendar(
    path: &Path,
    year: i32,
    lookup: &DelayLookup,
    scale: &ColorScale,
) -> Result<usize> {
    let grids = year_grids(year, lookup);

    let root = SVGBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;

    let title = format!(
        "{} - Share of delayed arrivals per day - {}",
        lookup.airline(),
        year
    );
    root.draw(&Text::new(
        title,
        (MARGIN, MARGIN),
        ("sans-serif", 28).into_font(),
    ))?;

    let panels_width = WIDTH as i32 - 2 * MARGIN - LEGEND_WIDTH;
    let panels_height = HEIGHT as i32 - TITLE_HEIGHT - 2 * MARGIN;
    let panel_w = panels_width / PANEL_COLS;
    let panel_h = panels_height / PANEL_ROWS;

    let mut colored = 0;
    for (i, grid) in grids.iter().enumerate() {
        let i = i as i32;
        let origin = (
            MARGIN + (i % PANEL_COLS) * panel_w,
            MARGIN + TITLE_HEIGHT + (i / PANEL_COLS) * panel_h,
        );
        colored += draw_month(&root, grid, origin, (panel_w, panel_h), scale)?;
    }

    draw_color_bar(&root, scale, (WIDTH as i32 - MARGIN - LEGEND_WIDTH, MARGIN + TITLE_HEIGHT))?;

    root.present()?;
    info!(colored, undated = lookup.undated(), "Calendar written");
    Ok(colored)
}

fn draw_month(
    root: &Area<'_>,
    grid: &MonthGrid,
    (x, y): (i32, i32),
    (w, h): (i32, i32),
    scale: &ColorScale,
) -> Result<usize> {
    root.draw(&Text::new(
        grid.name(),
        (x + CELL_GAP, y),
        ("sans-serif", 18).into_font(),
    ))?;

    let cell = ((w - 2 * MARGIN) / 7).min((h - PANEL_HEADER - WEEKDAY_HEADER - MARGIN) / MAX_WEEKS);
    let label_font = ("sans-serif", 13).into_font().color(&BLACK.mix(0.7));
    for (col, label) in WEEKDAY_LABELS.iter().enumerate() {
        let cx = x + col as i32 * cell + cell / 2 - 4;
        root.draw(&Text::new(*label, (cx, y + PANEL_HEADER), label_font.clone()))?;
    }

    let top = y + PANEL_HEADER + WEEKDAY_HEADER;
    let mut colored = 0;
    for (row, week) in grid.weeks.iter().enumerate() {
        for (col, value) in week.iter().enumerate() {
            let Some(value) = value else {
                continue;
            };
            let x0 = x + col as i32 * cell;
            let y0 = top + row as i32 * cell;
            root.draw(&Rectangle::new(
                [(x0, y0), (x0 + cell - CELL_GAP, y0 + cell - CELL_GAP)],
                scale.color(*value).filled(),
            ))?;
            colored += 1;
        }
    }

    debug!(month = grid.month, colored, "Drew month panel");
    Ok(colored)
}

fn draw_color_bar(root: &Area<'_>, scale: &ColorScale, (x, y): (i32, i32)) -> Result<()> {
    let bar_width = 22;
    let bar_top = y + 40;
    let bar_height = HEIGHT as i32 / 2;
    let slice = (bar_height as f64 / COLOR_BAR_STEPS as f64).ceil() as i32;

    root.draw(&Text::new(
        "Delayed (%)",
        (x, y + 10),
        ("sans-serif", 15).into_font(),
    ))?;

    for step in 0..COLOR_BAR_STEPS {
        let t = (step as f64 + 0.5) / COLOR_BAR_STEPS as f64;
        let value = scale.min + (scale.max - scale.min) * t;
        let y1 = bar_top + bar_height - (step * bar_height) / COLOR_BAR_STEPS;
        root.draw(&Rectangle::new(
            [(x, y1 - slice), (x + bar_width, y1)],
            scale.color(value).filled(),
        ))?;
    }

    root.draw(&Rectangle::new(
        [(x, bar_top), (x + bar_width, bar_top + bar_height)],
        BLACK.mix(0.6).stroke_width(1),
    ))?;

    let tick_font = ("sans-serif", 13).into_font();
    for tick in scale.ticks(0.1) {
        let ty = bar_top + bar_height - (scale.position(tick) * bar_height as f64).round() as i32;
        root.draw(&PathElement::new(
            vec![(x + bar_width, ty), (x + bar_width + 5, ty)],
            BLACK,
        ))?;
        root.draw(&Text::new(
            format!("{:.0}", tick * 100.0),
            (x + bar_width + 8, ty - 6),
            tick_font.clone(),
        ))?;
    }

    Ok(())
}

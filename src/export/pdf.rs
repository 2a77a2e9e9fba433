//! PDF chart export.
//!
//! The populated region is rasterized with numbered rows and columns and
//! embedded as one image on one A4 page.
//!
//! ## Layout
//!
//! ```text
//! ├ margin ┤ gutter ├──── cols × cell ────┤
//!          ┌────────┬──┬──┬──┬────────────
//!          │        │ 1│ 2│ 3│ ...          column numbers
//!          ├────────┼──┼──┼──┼
//!          │       1│■ │  │■ │
//!          │       2│  │■ │  │              cells inset 1px
//! ```
//!
//! Cell size is the largest that fits the region inside the page margins in
//! either orientation, floored at [`MIN_CELL_MM`]. Regions too large for the
//! floor overflow the page instead of shrinking further, up to
//! [`MAX_CHART_PIXELS`]; past that the export fails with
//! [`KnitError::TooLarge`].
//!
//! Row and column numbers are thinned to every 2nd, 5th, 10th, ... line
//! when a single cell is too small to hold its label.

use image::{DynamicImage, Rgba, RgbImage, RgbaImage};
use printpdf::{ColorBits, ColorSpace, Image as PdfImage, ImageTransform, ImageXObject, Mm, PdfDocument, Px};
use tracing::debug;

use super::export_filename;
use crate::color::cell_rgba;
use crate::error::KnitError;
use crate::grid::{BoundingBox, CellStore};
use crate::project::ProjectDocument;
use crate::render::font::LabelFont;
use crate::render::raster::fill_rect;

/// A4 short edge.
pub const A4_WIDTH_MM: f32 = 210.0;
/// A4 long edge.
pub const A4_HEIGHT_MM: f32 = 297.0;
pub const MARGIN_MM: f32 = 10.0;
pub const MIN_CELL_MM: f32 = 1.0;
/// Raster density (about 254 DPI).
pub const PX_PER_MM: u32 = 10;
/// Largest chart raster, in pixels.
pub const MAX_CHART_PIXELS: u64 = 40_000_000;

const LABEL_PAD_PX: u32 = 6;
/// Minimum free space between neighbouring labels.
const LABEL_GAP_PX: u32 = 4;
const PAPER: Rgba<u8> = Rgba([255, 255, 255, 255]);
const GRID_LINE: Rgba<u8> = Rgba([0xb0, 0xb0, 0xb0, 0xff]);
const LABEL: Rgba<u8> = Rgba([0x40, 0x40, 0x40, 0xff]);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    /// Page (width, height) in mm.
    pub fn page_size_mm(self) -> (f32, f32) {
        match self {
            Orientation::Portrait => (A4_WIDTH_MM, A4_HEIGHT_MM),
            Orientation::Landscape => (A4_HEIGHT_MM, A4_WIDTH_MM),
        }
    }
}

/// Pixel geometry of the chart raster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartLayout {
    pub region: BoundingBox,
    pub cols: u32,
    pub rows: u32,
    pub cell_mm: f32,
    pub cell_px: u32,
    pub gutter_left: u32,
    pub gutter_top: u32,
    pub width_px: u32,
    pub height_px: u32,
    pub orientation: Orientation,
    /// Every how many columns a number is drawn.
    pub col_label_step: u32,
    /// Every how many rows a number is drawn.
    pub row_label_step: u32,
}

impl ChartLayout {
    pub fn compute(region: BoundingBox, font: &LabelFont) -> Result<Self, KnitError> {
        let too_large = || {
            KnitError::TooLarge(format!(
                "{} x {} cells exceeds {} pixels",
                region.cols(),
                region.rows(),
                MAX_CHART_PIXELS
            ))
        };
        let cols = u32::try_from(region.cols()).map_err(|_| too_large())?;
        let rows = u32::try_from(region.rows()).map_err(|_| too_large())?;

        let gutter_left = font.text_width(&rows.to_string()) + 2 * LABEL_PAD_PX;
        let gutter_top = font.char_height + 2 * LABEL_PAD_PX;
        let density = PX_PER_MM as f32;

        let fit = |(page_w, page_h): (f32, f32)| {
            let avail_w = page_w - 2.0 * MARGIN_MM - gutter_left as f32 / density;
            let avail_h = page_h - 2.0 * MARGIN_MM - gutter_top as f32 / density;
            (avail_w / cols as f32).min(avail_h / rows as f32)
        };
        let cell_mm = fit(Orientation::Portrait.page_size_mm())
            .max(fit(Orientation::Landscape.page_size_mm()))
            .max(MIN_CELL_MM);
        let cell_px = ((cell_mm * density).floor() as u32).max(PX_PER_MM);

        let extent = |gutter: u32, count: u32| {
            (count as u64)
                .checked_mul(cell_px as u64)
                .and_then(|px| px.checked_add(gutter as u64 + 1))
        };
        let width = extent(gutter_left, cols).ok_or_else(too_large)?;
        let height = extent(gutter_top, rows).ok_or_else(too_large)?;
        if width.checked_mul(height).is_none_or(|pixels| pixels > MAX_CHART_PIXELS) {
            return Err(too_large());
        }
        let width_px = u32::try_from(width).map_err(|_| too_large())?;
        let height_px = u32::try_from(height).map_err(|_| too_large())?;

        let orientation = if width_px > height_px {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        };

        Ok(Self {
            region,
            cols,
            rows,
            cell_mm,
            cell_px,
            gutter_left,
            gutter_top,
            width_px,
            height_px,
            orientation,
            col_label_step: label_step(cell_px, font.text_width(&cols.to_string())),
            row_label_step: label_step(cell_px, font.char_height),
        })
    }

    /// Raster size on paper, in mm.
    pub fn image_size_mm(&self) -> (f32, f32) {
        let density = PX_PER_MM as f32;
        (self.width_px as f32 / density, self.height_px as f32 / density)
    }

    /// Bottom-left corner of the centered image in PDF page coordinates.
    /// Negative when the chart overflows the page.
    pub fn image_origin_mm(&self) -> (f32, f32) {
        let (page_w, page_h) = self.orientation.page_size_mm();
        let (img_w, img_h) = self.image_size_mm();
        ((page_w - img_w) / 2.0, (page_h - img_h) / 2.0)
    }
}

/// Smallest of 1, 2, 5, 10, 20, 50, ... lines whose span holds a label of
/// `label_px` plus the gap.
fn label_step(cell_px: u32, label_px: u32) -> u32 {
    let need = (label_px + LABEL_GAP_PX) as u64;
    let cell = cell_px.max(1) as u64;
    let mut base = 1u64;
    loop {
        for step in [base, 2 * base, 5 * base] {
            if step * cell >= need {
                return step.min(u32::MAX as u64) as u32;
            }
        }
        base *= 10;
    }
}

fn shows_label(number: i64, step: u32) -> bool {
    step <= 1 || number % step as i64 == 0
}

/// Draw the numbered chart for `layout`.
pub fn render_chart(store: &dyn CellStore, layout: &ChartLayout, font: &LabelFont) -> RgbImage {
    let mut img = RgbaImage::from_pixel(layout.width_px, layout.height_px, PAPER);
    let cell = layout.cell_px as i64;
    let left = layout.gutter_left as i64;
    let top = layout.gutter_top as i64;
    let grid_w = layout.cols as i64 * cell + 1;
    let grid_h = layout.rows as i64 * cell + 1;

    for col in 0..=layout.cols as i64 {
        fill_rect(&mut img, left + col * cell, top, 1, grid_h, GRID_LINE);
    }
    for row in 0..=layout.rows as i64 {
        fill_rect(&mut img, left, top + row * cell, grid_w, 1, GRID_LINE);
    }

    let pad = LABEL_PAD_PX as i64;
    let char_h = font.char_height as i64;
    for col in 0..layout.cols as i64 {
        if !shows_label(col + 1, layout.col_label_step) {
            continue;
        }
        let label = (col + 1).to_string();
        let tw = font.text_width(&label) as i64;
        font.draw(&mut img, &label, left + col * cell + (cell - tw) / 2, pad, LABEL);
    }
    for row in 0..layout.rows as i64 {
        if !shows_label(row + 1, layout.row_label_step) {
            continue;
        }
        let label = (row + 1).to_string();
        let tw = font.text_width(&label) as i64;
        font.draw(&mut img, &label, left - pad - tw, top + row * cell + (cell - char_h) / 2, LABEL);
    }

    for (coord, color) in store.cells() {
        let col = coord.x - layout.region.min_x;
        let row = coord.y - layout.region.min_y;
        fill_rect(
            &mut img,
            left + col * cell + 1,
            top + row * cell + 1,
            cell - 2,
            cell - 2,
            cell_rgba(color),
        );
    }

    DynamicImage::ImageRgba8(img).to_rgb8()
}

/// A finished PDF download.
#[derive(Debug, Clone)]
pub struct PdfExport {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Export the populated region of `store` as a one-page A4 PDF.
pub fn export_pdf(store: &dyn CellStore, project_name: &str) -> Result<PdfExport, KnitError> {
    let region = store.bounding_box().ok_or(KnitError::EmptyGrid)?;
    let font = LabelFont::new()?;
    let layout = ChartLayout::compute(region, &font)?;
    debug!(
        cols = layout.cols,
        rows = layout.rows,
        cell_px = layout.cell_px,
        orientation = ?layout.orientation,
        "exporting chart"
    );

    let raster = render_chart(store, &layout, &font);
    let bytes = assemble_pdf(project_name, raster, &layout)?;

    Ok(PdfExport {
        filename: export_filename(project_name, "pdf"),
        bytes,
    })
}

/// Export a project document. Fixed-size documents are clipped to their
/// `cols × rows` bounds first.
pub fn export_document(doc: &ProjectDocument) -> Result<PdfExport, KnitError> {
    match doc.fixed_grid() {
        Some(fixed) => export_pdf(&fixed, &doc.name),
        None => export_pdf(&doc.grid, &doc.name),
    }
}

fn assemble_pdf(title: &str, raster: RgbImage, layout: &ChartLayout) -> Result<Vec<u8>, KnitError> {
    let (page_w, page_h) = layout.orientation.page_size_mm();
    let title = if title.trim().is_empty() { "Pattern" } else { title };
    let (doc, page, layer) = PdfDocument::new(title, Mm(page_w), Mm(page_h), "Chart");
    let layer = doc.get_page(page).get_layer(layer);

    let (width, height) = raster.dimensions();
    let image = PdfImage::from(ImageXObject {
        width: Px(width as usize),
        height: Px(height as usize),
        color_space: ColorSpace::Rgb,
        bits_per_component: ColorBits::Bit8,
        interpolate: false,
        image_data: raster.into_raw(),
        image_filter: None,
        clipping_bbox: None,
        smask: None,
    });

    let (x, y) = layout.image_origin_mm();
    image.add_to_layer(
        layer,
        ImageTransform {
            translate_x: Some(Mm(x)),
            translate_y: Some(Mm(y)),
            dpi: Some(PX_PER_MM as f32 * 25.4),
            ..Default::default()
        },
    );

    doc.save_to_bytes().map_err(|e| KnitError::Pdf(e.to_string()))
}

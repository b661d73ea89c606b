//! Static Chart Renderer
//! Draws PM2.5 box plots per calendar category with regulatory reference
//! lines and a diagonal watermark, saved as PNG.
//!
//! Layout:
//! 1. Title centered above the plot
//! 2. One box per category in canonical order (empty categories keep their slot)
//! 3. Dashed NOM limit (red) and WHO target (green) lines with a legend
//! 4. Translucent watermark across the plot area, rotated 20 degrees

use crate::charts::Palette;
use crate::config::ReportConfig;
use crate::data::AirQualityRecord;
use crate::stats::{CategoryAxis, CategoryStats, StatsCalculator};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const FONT: &str = "sans-serif";
const Y_LABEL: &str = "PM2.5 Concentration (µg/m³)";
const BOX_WIDTH: f64 = 0.6;
const Y_HEADROOM: f64 = 1.1;
const SLOT_TOLERANCE: f64 = 1e-6;

const NOM_COLOR: RGBColor = RGBColor(214, 39, 40);
const WHO_COLOR: RGBColor = RGBColor(44, 160, 44);
const WATERMARK_COLOR: RGBColor = RGBColor(128, 128, 128);
const WATERMARK_ALPHA: f64 = 0.2;
const WATERMARK_ANGLE_DEG: f64 = 20.0;

// Font sizes in points; pixels scale with DPI
const TITLE_PT: f64 = 14.0;
const AXIS_DESC_PT: f64 = 11.0;
const TICK_PT: f64 = 9.0;
const LEGEND_PT: f64 = 9.0;
const WATERMARK_PT: f64 = 20.0;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Cannot create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Font '{family}' is not available: {message}")]
    FontUnavailable {
        family: &'static str,
        message: String,
    },
    #[error("Failed to draw {path}: {message}")]
    Drawing { path: PathBuf, message: String },
}

/// Fixed settings of one chart variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartVariant {
    pub name: &'static str,
    pub axis: CategoryAxis,
    pub title: &'static str,
    pub x_label: &'static str,
    pub file_name: &'static str,
    /// Figure size in inches (width, height)
    pub figure_inches: (f64, f64),
    pub palette: Palette,
}

impl ChartVariant {
    pub const MONTHLY: ChartVariant = ChartVariant {
        name: "Monthly",
        axis: CategoryAxis::Month,
        title: "Monthly PM2.5 Distribution in Mexicali",
        x_label: "Month",
        file_name: "monthly_trend.png",
        figure_inches: (14.0, 8.0),
        palette: Palette::CoolWarm,
    };

    pub const WEEKLY: ChartVariant = ChartVariant {
        name: "Weekly",
        axis: CategoryAxis::Weekday,
        title: "Weekly PM2.5 Distribution",
        x_label: "Day of Week",
        file_name: "weekly_trend.png",
        figure_inches: (12.0, 6.0),
        palette: Palette::Viridis,
    };

    /// Image size in pixels at the given resolution.
    pub fn pixel_size(&self, dpi: u32) -> (u32, u32) {
        let (w, h) = self.figure_inches;
        (
            (w * dpi as f64).round() as u32,
            (h * dpi as f64).round() as u32,
        )
    }
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    pub fn render_monthly(
        records: &[AirQualityRecord],
        config: &ReportConfig,
    ) -> Result<PathBuf, RenderError> {
        Self::render(records, &ChartVariant::MONTHLY, config)
    }

    pub fn render_weekly(
        records: &[AirQualityRecord],
        config: &ReportConfig,
    ) -> Result<PathBuf, RenderError> {
        Self::render(records, &ChartVariant::WEEKLY, config)
    }

    /// Render one variant into the configured output directory.
    pub fn render(
        records: &[AirQualityRecord],
        variant: &ChartVariant,
        config: &ReportConfig,
    ) -> Result<PathBuf, RenderError> {
        fs::create_dir_all(&config.output_dir).map_err(|source| RenderError::OutputDir {
            path: config.output_dir.clone(),
            source,
        })?;
        Self::check_font()?;
        let path = config.output_dir.join(variant.file_name);

        let groups = StatsCalculator::group_by_category(records, variant.axis);
        for group in &groups {
            if let Some(summary) = &group.summary {
                log::debug!(
                    "{}: n={} median={:.1} q1={:.1} q3={:.1} outliers={}",
                    group.label,
                    summary.count,
                    summary.median,
                    summary.q1,
                    summary.q3,
                    summary.outliers.len()
                );
            }
        }

        Self::draw_chart(&path, &groups, variant, config).map_err(|e| RenderError::Drawing {
            path: path.clone(),
            message: e.to_string(),
        })?;

        log::info!("{} chart saved to '{}'", variant.name, path.display());
        Ok(path)
    }

    /// Text is drawn in regular and bold weights; both must load.
    fn check_font() -> Result<(), RenderError> {
        for style in [FontStyle::Normal, FontStyle::Bold] {
            (FONT, TICK_PT)
                .into_font()
                .style(style)
                .box_size(Y_LABEL)
                .map_err(|e| RenderError::FontUnavailable {
                    family: FONT,
                    message: e.to_string(),
                })?;
        }
        Ok(())
    }

    /// Upper bound of the y axis: headroom above the data and the NOM line.
    /// Non-finite values are ignored so the axis range stays finite.
    pub fn y_upper_bound(groups: &[CategoryStats], limit_nom: f64) -> f64 {
        let data_max = groups
            .iter()
            .flat_map(|g| g.values.iter().copied())
            .filter(|v| v.is_finite())
            .fold(f64::NEG_INFINITY, f64::max);
        let top = data_max.max(limit_nom);
        if top > 0.0 {
            top * Y_HEADROOM
        } else {
            1.0
        }
    }

    /// Category name for an x tick; ticks between slots stay blank.
    fn label_at(labels: &[&str], x: f64) -> String {
        let idx = x.round();
        if (x - idx).abs() < SLOT_TOLERANCE && idx >= 0.0 && (idx as usize) < labels.len() {
            labels[idx as usize].to_string()
        } else {
            String::new()
        }
    }

    fn draw_chart(
        path: &Path,
        groups: &[CategoryStats],
        variant: &ChartVariant,
        config: &ReportConfig,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let pt = config.px_per_pt();
        let px = |points: f64| (points * pt).round().max(1.0) as u32;

        let root = BitMapBackend::new(path, variant.pixel_size(config.dpi)).into_drawing_area();
        root.fill(&WHITE)?;

        let labels = variant.axis.labels();
        let n = labels.len();
        let x_start = -0.5;
        let x_end = n as f64 - 0.5;
        let y_max = Self::y_upper_bound(groups, config.limit_nom);

        let mut chart = ChartBuilder::on(&root)
            .caption(
                variant.title,
                (FONT, TITLE_PT * pt).into_font().style(FontStyle::Bold),
            )
            .margin(px(12.0))
            .x_label_area_size(px(36.0))
            .y_label_area_size(px(48.0))
            .build_cartesian_2d(x_start..x_end, 0f64..y_max)?;

        let x_formatter = |x: &f64| Self::label_at(labels, *x);
        chart
            .configure_mesh()
            .disable_x_mesh()
            .bold_line_style(&BLACK.mix(0.3))
            .light_line_style(&WHITE)
            .x_labels(n)
            .x_label_formatter(&x_formatter)
            .x_desc(variant.x_label)
            .y_desc(Y_LABEL)
            .label_style((FONT, TICK_PT * pt))
            .axis_desc_style((FONT, AXIS_DESC_PT * pt))
            .draw()?;

        let stroke = px(1.0);
        let half = BOX_WIDTH / 2.0;
        for (i, group) in groups.iter().enumerate() {
            let Some(summary) = &group.summary else {
                continue;
            };
            let x = i as f64;
            let fill = variant.palette.color_at(i, n);
            let outline = BLACK.stroke_width(stroke);

            chart.draw_series(std::iter::once(Rectangle::new(
                [(x - half, summary.q1), (x + half, summary.q3)],
                fill.filled(),
            )))?;
            chart.draw_series(std::iter::once(Rectangle::new(
                [(x - half, summary.q1), (x + half, summary.q3)],
                outline,
            )))?;

            let cap = half / 2.0;
            chart.draw_series(vec![
                PathElement::new(
                    vec![(x - half, summary.median), (x + half, summary.median)],
                    BLACK.stroke_width(stroke * 2),
                ),
                PathElement::new(vec![(x, summary.q3), (x, summary.whisker_high)], outline),
                PathElement::new(vec![(x, summary.q1), (x, summary.whisker_low)], outline),
                PathElement::new(
                    vec![(x - cap, summary.whisker_high), (x + cap, summary.whisker_high)],
                    outline,
                ),
                PathElement::new(
                    vec![(x - cap, summary.whisker_low), (x + cap, summary.whisker_low)],
                    outline,
                ),
            ])?;

            chart.draw_series(
                summary
                    .outliers
                    .iter()
                    .map(|&v| Circle::new((x, v), px(2.5), BLACK.stroke_width(stroke))),
            )?;
        }

        let line_width = px(1.5);
        let dash = px(6.0);
        let gap = px(3.0);
        let legend_len = px(20.0) as i32;
        for (limit, color, label) in [
            (config.limit_nom, NOM_COLOR, format!("NOM Limit ({})", config.limit_nom)),
            (config.limit_who, WHO_COLOR, format!("WHO Target ({})", config.limit_who)),
        ] {
            chart
                .draw_series(DashedLineSeries::new(
                    vec![(x_start, limit), (x_end, limit)],
                    dash,
                    gap,
                    color.stroke_width(line_width),
                ))?
                .label(label)
                .legend(move |(lx, ly)| {
                    PathElement::new(
                        vec![(lx, ly), (lx + legend_len, ly)],
                        color.stroke_width(line_width),
                    )
                });
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .label_font((FONT, LEGEND_PT * pt))
            .draw()?;

        let (x_px, y_px) = chart.plotting_area().get_pixel_range();
        let center = ((x_px.start + x_px.end) / 2, (y_px.start + y_px.end) / 2);
        Self::draw_watermark(&root, center, &config.watermark_text, WATERMARK_PT * pt)?;

        root.present()?;
        Ok(())
    }

    /// Lay the text out glyph by glyph along a line rising at
    /// `WATERMARK_ANGLE_DEG`, centred on `center`.
    fn draw_watermark(
        area: &DrawingArea<BitMapBackend<'_>, Shift>,
        center: (i32, i32),
        text: &str,
        font_px: f64,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let style = (FONT, font_px)
            .into_font()
            .style(FontStyle::Bold)
            .color(&WATERMARK_COLOR.mix(WATERMARK_ALPHA))
            .pos(Pos::new(HPos::Center, VPos::Center));

        let mut glyphs: Vec<(String, f64)> = Vec::with_capacity(text.len());
        for c in text.chars() {
            let glyph = c.to_string();
            let width = if c.is_whitespace() {
                font_px * 0.3
            } else {
                area.estimate_text_size(&glyph, &style)?.0 as f64
            };
            glyphs.push((glyph, width));
        }

        let total: f64 = glyphs.iter().map(|(_, w)| w).sum();
        let (sin, cos) = WATERMARK_ANGLE_DEG.to_radians().sin_cos();
        let mut offset = -total / 2.0;
        for (glyph, width) in glyphs {
            let mid = offset + width / 2.0;
            offset += width;
            if glyph.trim().is_empty() {
                continue;
            }
            let x = center.0 as f64 + mid * cos;
            let y = center.1 as f64 - mid * sin;
            area.draw(&Text::new(
                glyph,
                (x.round() as i32, y.round() as i32),
                style.clone(),
            ))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{month_name, weekday_name};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn records() -> Vec<AirQualityRecord> {
        [(1, 5, 30.0), (1, 6, 52.0), (3, 14, 18.0), (7, 2, 9.0), (7, 3, 140.0)]
            .iter()
            .map(|&(m, d, pm25)| {
                let date = NaiveDate::from_ymd_opt(2023, m, d)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap();
                AirQualityRecord {
                    date,
                    pm25,
                    pm10: None,
                    o3: None,
                    no2: None,
                    so2: None,
                    co: None,
                    month: month_name(&date).to_string(),
                    weekday: weekday_name(&date).to_string(),
                }
            })
            .collect()
    }

    fn config(dir: &TempDir) -> ReportConfig {
        ReportConfig {
            output_dir: dir.path().join("images"),
            dpi: 50,
            ..Default::default()
        }
    }

    /// Drawing needs a system sans-serif font; hosts without one skip.
    fn rendered(result: Result<PathBuf, RenderError>) -> Option<PathBuf> {
        match result {
            Err(RenderError::FontUnavailable { message, .. }) => {
                eprintln!("skipping chart check, no usable font: {message}");
                None
            }
            other => Some(other.unwrap()),
        }
    }

    #[test]
    fn pixel_size_follows_figure_and_dpi() {
        assert_eq!(ChartVariant::MONTHLY.pixel_size(300), (4200, 2400));
        assert_eq!(ChartVariant::WEEKLY.pixel_size(300), (3600, 1800));
        assert_eq!(ChartVariant::WEEKLY.pixel_size(50), (600, 300));
    }

    #[test]
    fn y_axis_clears_data_and_regulatory_limit() {
        let groups = StatsCalculator::group_by_category(&records(), CategoryAxis::Month);
        assert!((StaticChartRenderer::y_upper_bound(&groups, 45.0) - 154.0).abs() < 1e-9);

        let empty = StatsCalculator::group_by_category(&[], CategoryAxis::Month);
        assert!((StaticChartRenderer::y_upper_bound(&empty, 45.0) - 49.5).abs() < 1e-9);
    }

    #[test]
    fn y_axis_ignores_infinite_values() {
        let mut data = records();
        data[0].pm25 = f64::INFINITY;
        let groups = StatsCalculator::group_by_category(&data, CategoryAxis::Month);

        let top = StaticChartRenderer::y_upper_bound(&groups, 45.0);
        assert!(top.is_finite());
        assert!((top - 154.0).abs() < 1e-9);
    }

    #[test]
    fn x_labels_map_integer_slots() {
        let labels = CategoryAxis::Weekday.labels();
        assert_eq!(StaticChartRenderer::label_at(labels, 0.0), "Monday");
        assert_eq!(StaticChartRenderer::label_at(labels, 6.0), "Sunday");
        assert_eq!(StaticChartRenderer::label_at(labels, -1.0), "");
        assert_eq!(StaticChartRenderer::label_at(labels, 7.0), "");
        assert_eq!(StaticChartRenderer::label_at(labels, 2.5), "");
    }

    #[test]
    fn unwritable_output_dir_is_reported() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("images");
        std::fs::write(&blocker, "not a directory").unwrap();
        let config = ReportConfig {
            output_dir: blocker,
            ..Default::default()
        };

        let err = StaticChartRenderer::render_monthly(&records(), &config).unwrap_err();
        assert!(matches!(err, RenderError::OutputDir { .. }));
    }

    #[test]
    fn renders_monthly_png() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);

        let Some(path) = rendered(StaticChartRenderer::render_monthly(&records(), &config)) else {
            return;
        };
        assert_eq!(path, config.output_dir.join("monthly_trend.png"));
        assert_eq!(image::image_dimensions(&path).unwrap(), (700, 400));
    }

    #[test]
    fn renders_weekly_png() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);

        let Some(path) = rendered(StaticChartRenderer::render_weekly(&records(), &config)) else {
            return;
        };
        assert_eq!(path, config.output_dir.join("weekly_trend.png"));
        assert_eq!(image::image_dimensions(&path).unwrap(), (600, 300));
    }

    #[test]
    fn renders_weekly_png_without_data() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);

        let Some(path) = rendered(StaticChartRenderer::render_weekly(&[], &config)) else {
            return;
        };
        assert_eq!(image::image_dimensions(&path).unwrap(), (600, 300));
    }
}

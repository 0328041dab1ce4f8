//! 尺度分布グラフ
//!
//! 回答対象の先頭 N 問が各尺度に何問ずつ含まれるかを棒グラフにする。
//! 棒は常に Stress, Anxiety, Depression の3本で、先頭 N 問に現れない尺度も
//! 高さ 0 の棒として残す。

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::question::{Category, QuestionStore};
use crate::Result;

const BAR_COLORS: [&str; 3] = ["#6baed6", "#fd8d3c", "#74c476"];

const SVG_WIDTH: f64 = 640.0;
const SVG_HEIGHT: f64 = 480.0;
const PLOT_LEFT: f64 = 80.0;
const PLOT_RIGHT: f64 = 600.0;
const PLOT_TOP: f64 = 70.0;
const PLOT_BOTTOM: f64 = 400.0;
const FONT: &str = "DejaVu Sans, Segoe UI, sans-serif";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bar {
    pub category: Category,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Distribution {
    pub answered_count: usize,
    pub bars: [Bar; 3],
}

pub fn plot_distribution(store: &QuestionStore, answered_count: usize) -> Result<Distribution> {
    let questions = store.prefix(answered_count)?;
    let bars = Category::ALL.map(|category| Bar {
        category,
        count: questions
            .iter()
            .filter(|question| question.category == category)
            .count(),
    });
    debug!(answered_count, ?bars, "category distribution counted");
    Ok(Distribution {
        answered_count,
        bars,
    })
}

impl Distribution {
    pub fn title(&self) -> String {
        format!(
            "Category distribution ({} questions answered)",
            self.answered_count
        )
    }

    pub fn total(&self) -> usize {
        self.bars.iter().map(|bar| bar.count).sum()
    }

    fn max_count(&self) -> usize {
        self.bars.iter().map(|bar| bar.count).max().unwrap_or(0)
    }

    /// 端末向けの横棒グラフ
    ///
    /// `width` は最長の棒の文字数。各棒の右に件数を添える。
    pub fn text(&self, width: usize) -> TextChart<'_> {
        TextChart {
            distribution: self,
            width,
        }
    }

    pub fn svg(&self) -> SvgChart<'_> {
        SvgChart(self)
    }

    pub fn render_text(&self, width: usize) -> String {
        self.text(width).to_string()
    }

    pub fn render_svg(&self) -> String {
        self.svg().to_string()
    }
}

pub struct TextChart<'a> {
    distribution: &'a Distribution,
    width: usize,
}

impl fmt::Display for TextChart<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let max = self.distribution.max_count();
        let label_width = self
            .distribution
            .bars
            .iter()
            .map(|bar| bar.category.label().chars().count())
            .max()
            .unwrap_or(0);

        writeln!(f, "{}", self.distribution.title())?;
        for bar in &self.distribution.bars {
            let length = if max == 0 {
                0
            } else {
                (bar.count * self.width).div_ceil(max)
            };
            writeln!(
                f,
                "{:<label_width$}  {} {}",
                bar.category.label(),
                "█".repeat(length),
                bar.count,
            )?;
        }
        Ok(())
    }
}

pub struct SvgChart<'a>(&'a Distribution);

impl fmt::Display for SvgChart<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let distribution = self.0;
        let max = distribution.max_count().max(1) as f64;
        let plot_height = PLOT_BOTTOM - PLOT_TOP;
        let slot_width = (PLOT_RIGHT - PLOT_LEFT) / distribution.bars.len() as f64;
        let bar_width = slot_width * 0.5;

        writeln!(
            f,
            "<svg xmlns='http://www.w3.org/2000/svg' width='{SVG_WIDTH:.0}' height='{SVG_HEIGHT:.0}' viewBox='0 0 {SVG_WIDTH:.0} {SVG_HEIGHT:.0}' role='img'>"
        )?;
        writeln!(
            f,
            "  <rect width='{SVG_WIDTH:.0}' height='{SVG_HEIGHT:.0}' fill='#ffffff'/>"
        )?;
        writeln!(
            f,
            "  <text x='{:.0}' y='40' text-anchor='middle' font-family='{FONT}' font-size='18'>{}</text>",
            SVG_WIDTH / 2.0,
            escape_text(&distribution.title())
        )?;

        for (index, bar) in distribution.bars.iter().enumerate() {
            let height = bar.count as f64 / max * plot_height;
            let center = PLOT_LEFT + slot_width * (index as f64 + 0.5);
            let x = center - bar_width / 2.0;
            let y = PLOT_BOTTOM - height;
            writeln!(
                f,
                "  <rect x='{x:.1}' y='{y:.1}' width='{bar_width:.1}' height='{height:.1}' fill='{}'/>",
                BAR_COLORS[index]
            )?;
            writeln!(
                f,
                "  <text x='{center:.1}' y='{:.1}' text-anchor='middle' font-family='{FONT}' font-size='14'>{}</text>",
                y - 6.0,
                bar.count
            )?;
            writeln!(
                f,
                "  <text x='{center:.1}' y='{:.1}' text-anchor='middle' font-family='{FONT}' font-size='14'>{}</text>",
                PLOT_BOTTOM + 22.0,
                escape_text(&bar.category.label())
            )?;
        }

        writeln!(
            f,
            "  <line x1='{PLOT_LEFT:.0}' y1='{PLOT_BOTTOM:.0}' x2='{PLOT_RIGHT:.0}' y2='{PLOT_BOTTOM:.0}' stroke='#333333'/>"
        )?;
        writeln!(
            f,
            "  <line x1='{PLOT_LEFT:.0}' y1='{PLOT_TOP:.0}' x2='{PLOT_LEFT:.0}' y2='{PLOT_BOTTOM:.0}' stroke='#333333'/>"
        )?;
        writeln!(
            f,
            "  <text x='{:.0}' y='{:.0}' text-anchor='middle' font-family='{FONT}' font-size='14'>Category</text>",
            (PLOT_LEFT + PLOT_RIGHT) / 2.0,
            PLOT_BOTTOM + 56.0
        )?;
        writeln!(
            f,
            "  <text x='30' y='{y:.0}' text-anchor='middle' font-family='{FONT}' font-size='14' transform='rotate(-90 30 {y:.0})'>Number of questions</text>",
            y = (PLOT_TOP + PLOT_BOTTOM) / 2.0
        )?;
        writeln!(f, "</svg>")
    }
}

fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\'', "&apos;")
}

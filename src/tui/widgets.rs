use ratatui::prelude::*;
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::cli::ColorModel;
use crate::color::Color as AppColor;
use crate::notify::{Level, Toast};
use crate::pipeline::format::{color_formats, format};
use crate::pipeline::normalize::CanonicalColor;

const SWATCH: &str = "      ";

/// The palette as a list: swatch, `color-N` name, value in the chosen model,
/// and the canonical notation it was entered as. Highlights the selected row.
pub struct PaletteWidget<'a> {
    colors: &'a [CanonicalColor],
    model: ColorModel,
    selected: Option<usize>,
    title: String,
}

impl<'a> PaletteWidget<'a> {
    pub fn new(colors: &'a [CanonicalColor], model: ColorModel, selected: Option<usize>) -> Self {
        Self {
            colors,
            model,
            selected,
            title: format!("Palette ({model})"),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

fn to_color(c: AppColor) -> Color {
    let [r, g, b] = c.to_rgb8();
    Color::Rgb(r, g, b)
}

/// Choose black or white foreground for readable text on the given background.
fn contrast_fg(c: AppColor) -> Color {
    if c.relative_luminance() > 0.4 {
        Color::Black
    } else {
        Color::White
    }
}

fn build_row(index: usize, color: &CanonicalColor, model: ColorModel, selected: bool) -> Line<'static> {
    let c = color.color();
    let name_style = if selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let marker = if selected { "> " } else { "  " };

    Line::from(vec![
        Span::raw(marker),
        Span::styled(SWATCH, Style::default().bg(to_color(c)).fg(contrast_fg(c))),
        Span::raw(" "),
        Span::styled(format!("{:<10}", format!("color-{}", index + 1)), name_style),
        Span::raw(format(color, model)),
        Span::styled(
            format!("  {}", color.as_str()),
            Style::default().fg(Color::DarkGray),
        ),
    ])
}

impl Widget for PaletteWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut block = Block::bordered().title(self.title);
        if let Some(color) = self.selected.and_then(|i| self.colors.get(i)) {
            block = block.title_bottom(color_formats(color).summary());
        }
        let inner = block.inner(area);
        block.render(area, buf);

        let lines: Vec<Line> = if self.colors.is_empty() {
            vec![Line::styled(
                "  no colors yet: type one below or extract from an image",
                Style::default().fg(Color::DarkGray),
            )]
        } else {
            self.colors
                .iter()
                .enumerate()
                .map(|(i, color)| build_row(i, color, self.model, self.selected == Some(i)))
                .collect()
        };

        // Keep the selected row on screen.
        let height = inner.height as usize;
        let scroll = match self.selected {
            Some(s) if height > 0 && s >= height => s + 1 - height,
            _ => 0,
        };

        Paragraph::new(lines)
            .scroll((scroll as u16, 0))
            .render(inner, buf);
    }
}

/// Read-only view of an export text.
pub struct ExportWidget<'a> {
    title: &'a str,
    content: &'a str,
}

impl<'a> ExportWidget<'a> {
    pub fn new(title: &'a str, content: &'a str) -> Self {
        Self { title, content }
    }
}

impl Widget for ExportWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let text = if self.content.is_empty() {
            Text::styled("(empty palette)", Style::default().fg(Color::DarkGray))
        } else {
            Text::raw(self.content)
        };
        Paragraph::new(text)
            .block(Block::bordered().title(self.title))
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}

/// One-line status: the latest notification, or the key help.
pub struct StatusLine<'a> {
    toast: Option<&'a Toast>,
}

impl<'a> StatusLine<'a> {
    pub fn new(toast: Option<&'a Toast>) -> Self {
        Self { toast }
    }
}

const HELP: &str =
    "Enter add · ^O extract image · ↑↓ select · Del remove · ^X clear · Tab model · ^E export · ^T css/tailwind · Esc quit";

impl Widget for StatusLine<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let line = match self.toast {
            Some(toast) => {
                let color = match toast.level {
                    Level::Loading => Color::Cyan,
                    Level::Info => Color::Blue,
                    Level::Success => Color::Green,
                    Level::Error => Color::Red,
                };
                let mut spans = vec![Span::styled(
                    toast.message.clone(),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                )];
                if let Some(detail) = &toast.detail {
                    spans.push(Span::raw(format!(": {detail}")));
                }
                Line::from(spans)
            }
            None => Line::styled(HELP, Style::default().fg(Color::DarkGray)),
        };
        Paragraph::new(line).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::normalize::normalize;

    fn render(widget: impl Widget, width: u16, height: u16) -> String {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
        buf.content.iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn palette_rows_show_name_and_value() {
        let colors = vec![normalize("#f00").unwrap(), normalize("0 0 255").unwrap()];
        let out = render(PaletteWidget::new(&colors, ColorModel::Rgb, Some(1)), 70, 6);
        assert!(out.contains("Palette (rgb)"));
        assert!(out.contains("color-1"));
        assert!(out.contains("rgb(255, 0, 0)"));
        assert!(out.contains("> "));
        assert!(out.contains("rgb(0 0 255)"));
    }

    #[test]
    fn selected_color_lists_every_format_in_footer() {
        let colors = vec![normalize("#f00").unwrap()];
        let out = render(PaletteWidget::new(&colors, ColorModel::Hex, Some(0)), 120, 4);
        assert!(out.contains("#ff0000 · rgb(255, 0, 0) · hsl(0, 100%, 50%) · HSV(0°, 100%, 100%)"));

        let out = render(PaletteWidget::new(&colors, ColorModel::Hex, None), 120, 4);
        assert!(!out.contains("rgb(255, 0, 0)"));
    }

    #[test]
    fn empty_palette_shows_hint() {
        let out = render(PaletteWidget::new(&[], ColorModel::Hex, None), 70, 4);
        assert!(out.contains("no colors yet"));
    }

    #[test]
    fn swatch_uses_the_color_as_background() {
        let colors = vec![normalize("#102030").unwrap()];
        let area = Rect::new(0, 0, 40, 3);
        let mut buf = Buffer::empty(area);
        PaletteWidget::new(&colors, ColorModel::Hex, None).render(area, &mut buf);
        // Border, then the two-column marker, then the swatch.
        assert_eq!(buf[(3, 1)].bg, Color::Rgb(0x10, 0x20, 0x30));
    }

    #[test]
    fn status_line_shows_toast_detail() {
        let toast = Toast {
            level: Level::Error,
            message: "Invalid color".into(),
            detail: Some("Please enter a valid color code".into()),
        };
        let out = render(StatusLine::new(Some(&toast)), 60, 1);
        assert!(out.starts_with("Invalid color: Please enter a valid color code"));
    }

    #[test]
    fn export_widget_marks_empty_palette() {
        let out = render(ExportWidget::new("CSS variables", ""), 40, 3);
        assert!(out.contains("(empty palette)"));
    }
}

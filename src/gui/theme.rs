//! One Dark colours and per-style span formatting

use crate::markdown::{Style, StyledRun};
use iced::font::{Style as FontStyle, Weight};
use iced::theme::Palette;
use iced::widget::text::Span;
use iced::{Color, Font, Theme};

fn rgb(hex: u32) -> Color {
    Color::from_rgb8((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

pub fn background() -> Color {
    rgb(0x282c34)
}

pub fn foreground() -> Color {
    rgb(0xabb2bf)
}

pub fn green() -> Color {
    rgb(0x98c379)
}

pub fn blue() -> Color {
    rgb(0x61afef)
}

pub fn red() -> Color {
    rgb(0xe06c75)
}

pub fn code_background() -> Color {
    rgb(0x3e4451)
}

pub fn theme() -> Theme {
    Theme::custom(
        "Jarvis".to_string(),
        Palette {
            background: background(),
            text: foreground(),
            primary: blue(),
            success: green(),
            danger: red(),
        },
    )
}

/// How a style is drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Look {
    pub color: Color,
    pub size: f32,
    pub bold: bool,
    pub italic: bool,
    pub background: Option<Color>,
}

pub fn look(style: Style) -> Look {
    let base = Look {
        color: foreground(),
        size: 15.0,
        bold: false,
        italic: false,
        background: None,
    };
    match style {
        Style::Normal => base,
        Style::Bold => Look {
            color: green(),
            bold: true,
            ..base
        },
        Style::Italic => Look {
            color: blue(),
            italic: true,
            ..base
        },
        Style::InlineCode => Look {
            background: Some(code_background()),
            ..base
        },
        Style::CodeBlock => Look {
            size: 14.0,
            background: Some(code_background()),
            ..base
        },
        Style::SectionTitle => Look {
            color: blue(),
            size: 20.0,
            bold: true,
            ..base
        },
        Style::ArticleTitle => Look {
            color: green(),
            size: 17.0,
            bold: true,
            ..base
        },
        Style::Info => Look {
            color: blue(),
            size: 14.0,
            italic: true,
            ..base
        },
        Style::Error => Look {
            color: red(),
            size: 14.0,
            ..base
        },
    }
}

pub fn span<Link>(run: &StyledRun) -> Span<'_, Link, Font> {
    let look = look(run.style);
    let font = Font {
        weight: if look.bold { Weight::Bold } else { Weight::Normal },
        style: if look.italic {
            FontStyle::Italic
        } else {
            FontStyle::Normal
        },
        ..Font::MONOSPACE
    };

    let span = iced::widget::span(run.text.as_str())
        .color(look.color)
        .size(look.size)
        .font(font);
    match look.background {
        Some(background) => span.background(background),
        None => span,
    }
}

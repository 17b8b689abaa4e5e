//! TUI rendering for PST using ratatui.

mod banner;
mod input;
pub mod runtime;
mod theme;

pub use input::{SyntheticError, handle_event, handle_exception_event};
pub use runtime::{Screen, run_scenes, supervise};
pub use theme::{Glyphs, Palette, glyphs, palette, styles};

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

use pst_engine::views::{
    ConfigEditorView, DirectoryFocus, DirectoryView, EditorFocus, ExceptionButton, ExceptionView,
    FieldValue,
};
use pst_engine::{App, Notice, NoticeLevel, UiOptions, View};

use self::banner::{BANNER_HEIGHT, banner_lines, banner_width};

/// Frames never shrink below this unless the screen itself is smaller.
const MIN_FRAME_WIDTH: u16 = 40;
const MIN_FRAME_HEIGHT: u16 = 12;

const BANNER_TEXT: &str = "EXCEPTION";

const DIRECTORY_HINTS: &[(&str, &str)] = &[
    ("Up/Down", "select"),
    ("Tab", "focus"),
    ("Enter", "open"),
    ("Ctrl+Q", "quit"),
];
const EDITOR_HINTS: &[(&str, &str)] = &[
    ("Tab", "next field"),
    ("Space", "toggle"),
    ("Ctrl+S", "save"),
    ("Esc", "back"),
    ("Ctrl+Q", "quit"),
];
const EXCEPTION_HINTS: &[(&str, &str)] = &[
    ("Left/Right", "choose"),
    ("Enter", "activate"),
    ("PgUp/PgDn", "scroll"),
    ("Ctrl+Q", "quit"),
];

fn three_quarters(n: u16) -> u16 {
    u16::try_from(u32::from(n) * 3 / 4).unwrap_or(n)
}

/// Centered frame: 3/4 of the screen height and `min(3/4 width, max_frame_width)` wide.
#[must_use]
pub fn frame_area(area: Rect, options: UiOptions) -> Rect {
    let height = three_quarters(area.height).max(area.height.min(MIN_FRAME_HEIGHT));
    let width = three_quarters(area.width)
        .min(options.max_frame_width)
        .max(area.width.min(MIN_FRAME_WIDTH));

    Rect {
        x: area.x + (area.width.saturating_sub(width) / 2),
        y: area.y + (area.height.saturating_sub(height) / 2),
        width,
        height,
    }
}

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let options = app.ui_options();
    let palette = palette(options);
    let glyphs = glyphs(options);
    let bg_block = Block::default().style(Style::default().bg(palette.bg_dark));
    frame.render_widget(bg_block, frame.area());

    let area = frame_area(frame.area(), options);
    let hints = match app.view() {
        View::Directory(view) => {
            draw_directory(frame, view, area, &palette, &glyphs);
            DIRECTORY_HINTS
        }
        View::ConfigEditor(view) => {
            draw_config_editor(frame, view, area, &palette, &glyphs);
            EDITOR_HINTS
        }
        View::Exception(view) => {
            draw_exception_frame(frame, view, area, &palette, &glyphs);
            EXCEPTION_HINTS
        }
    };

    draw_status(frame, area, app.notice(), hints, &palette, &glyphs);
}

/// Draw the exception screen that replaces the scene graph after an error.
pub fn draw_exception(frame: &mut Frame, view: &ExceptionView, options: UiOptions) {
    let palette = palette(options);
    let glyphs = glyphs(options);
    let bg_block = Block::default().style(Style::default().bg(palette.bg_dark));
    frame.render_widget(bg_block, frame.area());

    let backdrop: Vec<Line> = backdrop_rows(frame.area().width, frame.area().height)
        .into_iter()
        .map(|row| Line::from(Span::styled(row, Style::default().fg(palette.bg_border))))
        .collect();
    frame.render_widget(Paragraph::new(backdrop), frame.area());

    let area = frame_area(frame.area(), options);
    frame.render_widget(Clear, area);
    draw_exception_frame(frame, view, area, &palette, &glyphs);
    draw_status(frame, area, None, EXCEPTION_HINTS, &palette, &glyphs);
}

const BACKDROP_DIGITS: &[u8] = b"0123456789abcdef";

/// Static "falling code" columns behind the exception frame.
///
/// Every third column carries runs of three hex digits; the pattern depends
/// only on position, so redraws and resizes are stable.
fn backdrop_rows(width: u16, height: u16) -> Vec<String> {
    (0..usize::from(height))
        .map(|y| {
            (0..usize::from(width))
                .map(|x| {
                    if x % 3 == 0 && (y + x * 5) % 7 < 3 {
                        char::from(BACKDROP_DIGITS[(x * 31 + y * 17) % BACKDROP_DIGITS.len()])
                    } else {
                        ' '
                    }
                })
                .collect()
        })
        .collect()
}

fn frame_block<'a>(title: Vec<Span<'a>>, border: Style, palette: &Palette) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border)
        .style(Style::default().bg(palette.bg_panel))
        .title(Line::from(title))
}

fn button<'a>(label: &str, focused: bool, palette: &Palette) -> Span<'a> {
    Span::styled(format!("[ {label} ]"), styles::button(palette, focused))
}

/// First row to show so that `focused` stays inside a window of `height` rows.
fn scroll_offset(focused: usize, height: u16) -> usize {
    focused.saturating_sub(usize::from(height.max(1)) - 1)
}

fn draw_directory(
    frame: &mut Frame,
    view: &DirectoryView,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let block = frame_block(
        vec![Span::styled(
            format!(" {} ", view.title()),
            styles::frame_title(palette),
        )],
        Style::default().fg(palette.primary),
        palette,
    );
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let description_height = view.description().map_or(0, |text| {
        let width = u16::try_from(text.width()).unwrap_or(u16::MAX);
        width.div_ceil(inner.width.saturating_sub(2).max(1)) + 1
    });

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(description_height), // Description
            Constraint::Min(1),                     // Entries
            Constraint::Length(1),                  // Open button
        ])
        .split(inner);

    if let Some(description) = view.description() {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            description,
            Style::default().fg(palette.text_secondary),
        )))
        .wrap(Wrap { trim: true })
        .block(Block::default().padding(Padding::horizontal(1)));
        frame.render_widget(paragraph, chunks[0]);
    }

    let list_focused = view.focus() == DirectoryFocus::List;
    let lines: Vec<Line> = view
        .entries()
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let selected = index == view.selected();
            let marker = if selected {
                glyphs.selected
            } else {
                glyphs.unselected
            };
            let style = if selected {
                styles::selection(palette, list_focused)
            } else if entry.is_placeholder() {
                Style::default().fg(palette.text_disabled)
            } else {
                Style::default().fg(palette.text_primary)
            };
            Line::from(Span::styled(format!(" {marker} {}", entry.label()), style))
        })
        .collect();
    let offset = scroll_offset(view.selected(), chunks[1].height);
    let list = Paragraph::new(lines).scroll((u16::try_from(offset).unwrap_or(0), 0));
    frame.render_widget(list, chunks[1]);

    let open = Paragraph::new(Line::from(vec![
        button("Open", view.focus() == DirectoryFocus::OpenButton, palette),
        Span::raw(" "),
    ]))
    .alignment(Alignment::Right);
    frame.render_widget(open, chunks[2]);
}

fn draw_config_editor(
    frame: &mut Frame,
    view: &ConfigEditorView,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let mut title = vec![Span::styled(
        format!(" {} ", view.title()),
        styles::frame_title(palette),
    )];
    if view.is_dirty() {
        title.push(Span::styled(
            "(modified) ",
            Style::default()
                .fg(palette.warning)
                .add_modifier(Modifier::ITALIC),
        ));
    }
    let block = frame_block(title, Style::default().fg(palette.primary), palette);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // Fields
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Buttons
        ])
        .split(inner);
    let fields_area = chunks[0];

    let key_width = view
        .fields()
        .iter()
        .map(|field| field.key().width())
        .max()
        .unwrap_or(0)
        .min(usize::from(inner.width / 2));

    let focused_index = match view.focus() {
        EditorFocus::Field(index) => Some(index),
        EditorFocus::SaveButton | EditorFocus::BackButton => None,
    };
    let offset = scroll_offset(focused_index.unwrap_or(0), fields_area.height);

    let mut cursor = None;
    let mut lines = Vec::with_capacity(view.fields().len());
    for (index, field) in view.fields().iter().enumerate().skip(offset) {
        let focused = focused_index == Some(index);
        let key = field.key();
        let padding = " ".repeat(key_width.saturating_sub(key.width()));
        let key_style = if focused {
            styles::selection(palette, true)
        } else {
            Style::default().fg(palette.text_secondary)
        };

        let value = match field.value() {
            FieldValue::Toggle(on) => Span::styled(
                if *on { glyphs.toggle_on } else { glyphs.toggle_off },
                if focused {
                    styles::selection(palette, true)
                } else {
                    Style::default().fg(palette.text_primary)
                },
            ),
            FieldValue::Text(input) => {
                if focused {
                    let before = input.text()[..input.cursor()].width() + key_width + 3;
                    cursor = Some((before, index - offset));
                }
                Span::styled(
                    input.text().to_string(),
                    Style::default()
                        .fg(palette.text_primary)
                        .add_modifier(Modifier::UNDERLINED),
                )
            }
            FieldValue::Unsupported { type_name } => Span::styled(
                format!("{} <{type_name}>", glyphs.read_only),
                Style::default().fg(palette.text_disabled),
            ),
        };

        lines.push(Line::from(vec![
            Span::styled(format!(" {key}{padding}"), key_style),
            Span::styled(format!(" {} ", glyphs.separator), styles::key_hint(palette)),
            value,
        ]));
    }
    frame.render_widget(Paragraph::new(lines), fields_area);

    if let Some((column, row)) = cursor {
        let x = fields_area.x + u16::try_from(column).unwrap_or(u16::MAX);
        let y = fields_area.y + u16::try_from(row).unwrap_or(u16::MAX);
        if x < fields_area.right() && y < fields_area.bottom() {
            frame.set_cursor_position(Position::new(x, y));
        }
    }

    let buttons = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        button("Save", view.focus() == EditorFocus::SaveButton, palette),
        Span::raw("  "),
        button("Back", view.focus() == EditorFocus::BackButton, palette),
    ]));
    frame.render_widget(buttons, chunks[2]);
}

fn draw_exception_frame(
    frame: &mut Frame,
    view: &ExceptionView,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let error_style = Style::default()
        .fg(palette.error)
        .add_modifier(Modifier::BOLD);
    let block = frame_block(
        vec![Span::styled(format!(" {} ", view.title()), error_style)],
        Style::default().fg(palette.error),
        palette,
    );
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let banner = banner_lines(BANNER_TEXT, glyphs.banner_fill).filter(|_| {
        banner_width(BANNER_TEXT) + 2 <= usize::from(inner.width)
            && inner.height >= BANNER_HEIGHT + 8
    });
    let banner_height = banner.as_ref().map_or(1, |_| BANNER_HEIGHT) + 1;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(banner_height), // Banner
            Constraint::Length(1),             // Headline
            Constraint::Length(2),             // Message
            Constraint::Min(1),                // Trace
            Constraint::Length(1),             // Buttons
        ])
        .split(inner);

    let banner_lines: Vec<Line> = match banner {
        Some(lines) => lines
            .into_iter()
            .map(|line| Line::from(Span::styled(line, error_style)))
            .collect(),
        None => vec![Line::from(Span::styled(BANNER_TEXT, error_style))],
    };
    frame.render_widget(
        Paragraph::new(banner_lines).alignment(Alignment::Center),
        chunks[0],
    );

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            format!(" {}", view.headline()),
            Style::default()
                .fg(palette.warning)
                .add_modifier(Modifier::BOLD),
        ))),
        chunks[1],
    );
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            format!(" {}", view.fault().message()),
            Style::default().fg(palette.text_primary),
        )))
        .wrap(Wrap { trim: false }),
        chunks[2],
    );

    let trace_lines: Vec<Line> = view
        .fault()
        .trace()
        .lines()
        .map(|line| {
            Line::from(Span::styled(
                format!(" {line}"),
                Style::default().fg(palette.text_muted),
            ))
        })
        .collect();
    let visible_rows = usize::from(chunks[3].height.saturating_sub(1));
    let more_above = view.scroll() > 0;
    let more_below = trace_lines.len() > usize::from(view.scroll()) + visible_rows;
    let trace_block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(palette.bg_border))
        .title(Line::from(Span::styled(
            trace_title(glyphs, more_above, more_below),
            styles::key_hint(palette),
        )));
    frame.render_widget(
        Paragraph::new(trace_lines)
            .block(trace_block)
            .scroll((view.scroll(), 0)),
        chunks[3],
    );

    let mut buttons = vec![Span::raw(" ")];
    for (index, choice) in ExceptionButton::ALL.into_iter().enumerate() {
        if index > 0 {
            buttons.push(Span::raw("  "));
        }
        buttons.push(button(choice.label(), view.focused() == choice, palette));
    }
    frame.render_widget(
        Paragraph::new(Line::from(buttons)).alignment(Alignment::Center),
        chunks[4],
    );
}

/// "Trace" plus arrows for rows hidden above or below the window.
fn trace_title(glyphs: &Glyphs, more_above: bool, more_below: bool) -> String {
    let mut title = String::from(" Trace ");
    if more_above {
        title.push_str(glyphs.arrow_up);
        title.push(' ');
    }
    if more_below {
        title.push_str(glyphs.arrow_down);
        title.push(' ');
    }
    title
}

/// Notice line under the frame and key hints on the last row.
fn draw_status(
    frame: &mut Frame,
    frame_rect: Rect,
    notice: Option<&Notice>,
    hints: &[(&str, &str)],
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let screen = frame.area();
    if screen.height == 0 {
        return;
    }
    let hint_row = screen.bottom() - 1;

    if let Some(notice) = notice {
        let row = frame_rect.bottom().min(hint_row.saturating_sub(1));
        if row >= frame_rect.bottom() {
            let style = match notice.level() {
                NoticeLevel::Info => Style::default().fg(palette.success),
                NoticeLevel::Warning => Style::default().fg(palette.warning),
            };
            let notice_area = Rect::new(frame_rect.x, row, frame_rect.width, 1);
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(notice.text(), style)))
                    .alignment(Alignment::Center),
                notice_area,
            );
        }
    }

    if hint_row < frame_rect.bottom() {
        return;
    }
    let mut spans = Vec::with_capacity(hints.len() * 3);
    for (index, (key, action)) in hints.iter().enumerate() {
        if index > 0 {
            spans.push(Span::styled(
                format!(" {} ", glyphs.separator),
                styles::key_hint(palette),
            ));
        }
        spans.push(Span::styled(*key, styles::key_highlight(palette)));
        spans.push(Span::styled(format!(" {action}"), styles::key_hint(palette)));
    }
    let hint_area = Rect::new(screen.x, hint_row, screen.width, 1);
    frame.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
        hint_area,
    );
}

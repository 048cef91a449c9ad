use std::ops::Range;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthChar;

use crate::controller::{Controller, Phase, QuoteStatus};
use crate::session::Mark;
use crate::timer::Clock;

const HORIZONTAL_MARGIN: u16 = 5;
const LOADING_TEXT: &str = "loading quote…";

struct Areas {
    readouts: Rect,
    quote: Rect,
    status: Rect,
}

/// Columns available for text inside the bordered quote box
fn inner_width(area: Rect) -> usize {
    area.width.saturating_sub(HORIZONTAL_MARGIN * 2 + 2).max(1) as usize
}

/// Word-wrap `chars` into rows no wider than `width`. Every char lands in
/// exactly one row; words wider than a row are split.
fn wrap_rows(chars: &[char], width: usize) -> Vec<Range<usize>> {
    let width = width.max(1);
    let char_width = |c: char| c.width().unwrap_or(0);
    let mut rows = Vec::new();
    let mut row_start = 0;
    let mut col = 0;
    let mut idx = 0;

    while idx < chars.len() {
        // a word plus the spaces that follow it
        let word_end = chars[idx..]
            .iter()
            .position(|c| *c == ' ')
            .map_or(chars.len(), |p| idx + p);
        let word_width: usize = chars[idx..word_end].iter().map(|c| char_width(*c)).sum();
        if col > 0 && col + word_width > width {
            rows.push(row_start..idx);
            row_start = idx;
            col = 0;
        }

        let token_end = chars[word_end..]
            .iter()
            .position(|c| *c != ' ')
            .map_or(chars.len(), |p| word_end + p);
        for (i, c) in chars.iter().enumerate().take(token_end).skip(idx) {
            let w = char_width(*c);
            if col > 0 && col + w > width {
                rows.push(row_start..i);
                row_start = i;
                col = 0;
            }
            col += w;
        }
        idx = token_end;
    }
    if row_start < chars.len() || rows.is_empty() {
        rows.push(row_start..chars.len());
    }
    rows
}

fn split(area: Rect, rows: usize) -> Areas {
    let box_height = (rows.max(1) as u16).saturating_add(2);
    let top = area.height.saturating_sub(box_height + 2) / 2;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(top),
            Constraint::Length(1),
            Constraint::Length(box_height),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

    Areas {
        readouts: chunks[1],
        quote: chunks[2],
        status: chunks[3],
    }
}

fn display_chars<C: Clock>(ctl: &Controller<C>) -> Vec<char> {
    ctl.session()
        .quote()
        .map_or_else(|| LOADING_TEXT.chars().collect(), |q| q.chars().to_vec())
}

fn quote_rows<C: Clock>(ctl: &Controller<C>, area: Rect) -> Vec<Range<usize>> {
    wrap_rows(&display_chars(ctl), inner_width(area))
}

/// Screen region of the bordered quote box, for mouse hit testing
pub fn quote_area<C: Clock>(ctl: &Controller<C>, area: Rect) -> Rect {
    split(area, quote_rows(ctl, area).len()).quote
}

fn quote_spans<C: Clock>(ctl: &Controller<C>) -> Vec<Span<'static>> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let correct = bold.fg(Color::Green);
    let incorrect = bold.fg(Color::Red);
    let untested = bold.add_modifier(Modifier::DIM);

    let session = ctl.session();
    let Some(quote) = session.quote() else {
        return LOADING_TEXT
            .chars()
            .map(|c| Span::styled(c.to_string(), untested))
            .collect();
    };
    let cursor = (ctl.phase() == Phase::Typing && *ctl.status() == QuoteStatus::Ready)
        .then(|| session.index());

    quote
        .chars()
        .iter()
        .zip(session.marks())
        .enumerate()
        .map(|(idx, (&c, mark))| {
            let (text, mut style) = match mark {
                Mark::Correct => (c.to_string(), correct),
                Mark::Incorrect if c == ' ' => ("·".to_string(), incorrect),
                Mark::Incorrect => (c.to_string(), incorrect),
                Mark::Untested => (c.to_string(), untested),
            };
            if cursor == Some(idx) {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
            Span::styled(text, style)
        })
        .collect()
}

fn status_line<C: Clock>(ctl: &Controller<C>) -> Span<'static> {
    let hint = Style::default().add_modifier(Modifier::DIM | Modifier::ITALIC);
    match (ctl.status(), ctl.phase()) {
        (QuoteStatus::Loading, _) => Span::styled(LOADING_TEXT, hint),
        (QuoteStatus::Failed(msg), _) => Span::styled(
            format!("could not load quote: {msg} (press Enter or click the quote to retry)"),
            Style::default().fg(Color::Red),
        ),
        (QuoteStatus::Ready, Phase::Idle) => Span::styled(
            "press Enter or click the quote to start, Esc quits",
            hint,
        ),
        (QuoteStatus::Ready, Phase::Typing) => {
            Span::styled("Esc or click outside the quote to stop", hint)
        }
    }
}

impl<C: Clock> Widget for &Controller<C> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rows = quote_rows(self, area);
        let areas = split(area, rows.len());
        let bold = Style::default().add_modifier(Modifier::BOLD);

        let readouts = Paragraph::new(Line::from(vec![
            Span::styled("time: ", Style::default().add_modifier(Modifier::DIM)),
            Span::styled(format!("{}s", self.elapsed_seconds()), bold),
            Span::raw("   "),
            Span::styled("wpm: ", Style::default().add_modifier(Modifier::DIM)),
            Span::styled(self.wpm().to_string(), bold.fg(Color::Magenta)),
        ]))
        .alignment(Alignment::Center);
        readouts.render(areas.readouts, buf);

        let border_style = if self.is_typing() {
            bold.fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" quote ");

        let spans = quote_spans(self);
        let lines: Vec<Line> = rows
            .iter()
            .map(|row| Line::from(spans[row.clone()].to_vec()))
            .collect();
        let quote = Paragraph::new(lines)
            .block(block)
            .alignment(if rows.len() == 1 {
                Alignment::Center
            } else {
                Alignment::Left
            });
        quote.render(areas.quote, buf);

        Paragraph::new(status_line(self))
            .alignment(Alignment::Center)
            .render(areas.status, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::Event;
    use crate::quote::{FetchError, Quote};
    use crate::session::Keystroke;
    use crate::timer::ManualClock;
    use ratatui::layout::Margin;

    fn render(ctl: &Controller<ManualClock>) -> (Buffer, Rect) {
        let area = Rect::new(0, 0, 60, 12);
        let mut buf = Buffer::empty(area);
        ctl.render(area, &mut buf);
        (buf, area)
    }

    fn text(buf: &Buffer) -> String {
        let area = buf.area;
        (area.top()..area.bottom())
            .map(|y| {
                (area.left()..area.right())
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn ready(quote: &str) -> Controller<ManualClock> {
        let mut ctl = Controller::with_clock(ManualClock::new());
        ctl.handle(Event::FetchCompleted(Ok(Quote::new(quote).unwrap())));
        ctl
    }

    #[test]
    fn renders_loading_state() {
        let ctl = Controller::with_clock(ManualClock::new());
        let (buf, _) = render(&ctl);
        let screen = text(&buf);

        assert!(screen.contains("loading quote"));
        assert!(screen.contains("time: 0s"));
        assert!(screen.contains("wpm: 0"));
    }

    #[test]
    fn renders_failure_message() {
        let mut ctl = Controller::with_clock(ManualClock::new());
        ctl.handle(Event::FetchCompleted(Err(FetchError::Status(503))));
        let (buf, _) = render(&ctl);

        assert!(text(&buf).contains("could not load quote"));
    }

    #[test]
    fn renders_quote_in_box() {
        let ctl = ready("hello");
        let (buf, area) = render(&ctl);
        let screen = text(&buf);

        assert!(screen.contains("hello"));
        assert!(screen.contains("press Enter"));

        let quote_rect = quote_area(&ctl, area);
        assert!(quote_rect.width > 0 && quote_rect.height >= 3);
    }

    #[test]
    fn marks_are_coloured() {
        let mut ctl = ready("ab");
        ctl.handle(Event::Activate);
        ctl.handle(Event::KeyDown(Keystroke::Char('a')));
        ctl.handle(Event::KeyDown(Keystroke::Char('x')));

        let (buf, area) = render(&ctl);
        let inner = quote_area(&ctl, area).inner(Margin::new(1, 1));
        let y = inner.y;
        let cell_for = |sym: &str| {
            (inner.left()..inner.right())
                .map(|x| &buf[(x, y)])
                .find(|cell| cell.symbol() == sym)
                .cloned()
        };

        let a = cell_for("a").expect("a rendered");
        let b = cell_for("b").expect("b rendered");
        assert_eq!(a.fg, Color::Green);
        assert_eq!(b.fg, Color::Red);
    }

    #[test]
    fn quote_box_is_hit_target_for_clicks() {
        let ctl = ready("a reasonably long quote that should wrap across more than one line of the box");
        let area = Rect::new(0, 0, 40, 20);
        let rect = quote_area(&ctl, area);

        assert!(rect.height > 3);
        assert!(rect.x >= HORIZONTAL_MARGIN);
        assert!(rect.bottom() <= area.bottom());
    }

    #[test]
    fn long_quote_fully_visible_on_narrow_screen() {
        let words = [
            "aaaaa", "bbbbb", "ccccc", "ddddd", "eeeee", "fffff", "ggggg", "hhhhh", "iiiii",
            "zzzzz",
        ];
        let ctl = ready(&words.join(" "));
        let area = Rect::new(0, 0, 22, 24);
        let mut buf = Buffer::empty(area);
        (&ctl).render(area, &mut buf);
        let screen = text(&buf);

        for word in words {
            assert!(screen.contains(word), "{word} missing from:\n{screen}");
        }

        // every wrapped row sits inside the clickable box
        let rect = quote_area(&ctl, area);
        assert_eq!(rect.height as usize, words.len() + 2);
    }

    #[test]
    fn wrap_rows_breaks_at_spaces() {
        let chars: Vec<char> = "hello big world".chars().collect();
        let rows = wrap_rows(&chars, 10);

        assert_eq!(rows, vec![0..10, 10..15]);
    }

    #[test]
    fn wrap_rows_splits_overlong_words() {
        let chars: Vec<char> = "abcdefghij kl".chars().collect();
        let rows = wrap_rows(&chars, 4);

        assert_eq!(rows, vec![0..4, 4..8, 8..11, 11..13]);
    }

    #[test]
    fn wrap_rows_covers_every_char_once() {
        let text = "The quick brown fox jumps over the lazy dog, again and again.";
        let chars: Vec<char> = text.chars().collect();
        for width in 1..=30 {
            let rows = wrap_rows(&chars, width);
            assert_eq!(rows.first().map(|r| r.start), Some(0));
            assert_eq!(rows.last().map(|r| r.end), Some(chars.len()));
            for pair in rows.windows(2) {
                assert_eq!(pair[0].end, pair[1].start);
            }
            for row in &rows {
                assert!(row.len() <= width, "row {row:?} wider than {width}");
            }
        }
    }
}

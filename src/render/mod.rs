//! Frame assembly: navigation state plus menu tree in, styled lines out.
//!
//! Clear-and-redraw: the runtime repaints the whole frame on every state
//! transition, so each call produces a complete, self-contained frame.

mod borders;

pub use borders::{BorderSet, BORDER_ASCII, BORDER_UNICODE};

use unicode_width::UnicodeWidthChar;

use crate::capabilities::Capabilities;
use crate::menu::{MenuNode, MenuTree};
use crate::nav::NavigationController;

/// How a row presents in the frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowKind {
    /// Category that opens as a new view.
    Submenu,
    /// Category that unfolds in place.
    Inline { expanded: bool },
    Item,
    Toggle { on: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub label: String,
    pub depth: usize,
    pub kind: RowKind,
    pub disabled_reason: Option<&'static str>,
}

/// Everything one frame needs; built fresh per redraw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameView {
    pub breadcrumb: Vec<String>,
    pub rows: Vec<RowView>,
    pub selected: usize,
    pub footer: String,
    pub banner: Option<String>,
    pub confirm: Option<String>,
}

impl FrameView {
    pub fn build(
        tree: &MenuTree,
        nav: &NavigationController,
        footer: String,
        banner: Option<String>,
    ) -> Self {
        let rows = nav
            .view(tree)
            .into_iter()
            .filter_map(|row| {
                let node = tree.node_at(&row.path)?;
                let kind = match node {
                    MenuNode::Category { expandable: true, .. } => RowKind::Inline {
                        expanded: nav.expanded().contains(&row.path),
                    },
                    MenuNode::Category { .. } => RowKind::Submenu,
                    MenuNode::Item { .. } => RowKind::Item,
                    MenuNode::Toggle { value, .. } => RowKind::Toggle { on: *value },
                };
                Some(RowView {
                    label: node.label().to_string(),
                    depth: row.depth,
                    kind,
                    disabled_reason: node.disabled_reason(),
                })
            })
            .collect();

        let confirm = nav
            .pending()
            .map(|pending| format!("{}? [y/N]", pending.label));

        Self {
            breadcrumb: tree
                .labels_for(nav.breadcrumb())
                .into_iter()
                .map(str::to_string)
                .collect(),
            rows,
            selected: nav.selected(),
            footer,
            banner,
            confirm,
        }
    }
}

/// ANSI fragments used per frame; all empty when color is off.
struct Style {
    border: &'static str,
    reverse: &'static str,
    dim: &'static str,
    notice: &'static str,
    reset: &'static str,
}

impl Style {
    fn for_color(color: bool) -> Self {
        if color {
            Self {
                border: "\x1b[36m",
                reverse: "\x1b[7m",
                dim: "\x1b[2m",
                notice: "\x1b[33m",
                reset: "\x1b[0m",
            }
        } else {
            Self {
                border: "",
                reverse: "",
                dim: "",
                notice: "",
                reset: "",
            }
        }
    }
}

/// Render the frame as a list of lines (no positioning; the runtime centers
/// them in the terminal).
pub fn render(caps: &Capabilities, view: &FrameView) -> Vec<String> {
    let style = Style::for_color(caps.color);
    let borders = BorderSet::for_unicode(caps.unicode);
    let box_width = frame_width(caps.width);
    let inner = box_width.saturating_sub(2);
    let mut lines = Vec::new();

    lines.push(edge(borders.top_left, borders.top_right, borders, &style, inner));
    lines.push(plain_line(&style, borders, &center("Shellmate", inner), inner));
    lines.push(plain_line(
        &style,
        borders,
        &center(&breadcrumb_text(view, caps.unicode), inner),
        inner,
    ));
    lines.push(edge(borders.t_left, borders.t_right, borders, &style, inner));

    for (index, row) in view.rows.iter().enumerate() {
        lines.push(format_row(
            row,
            index,
            index == view.selected,
            caps,
            &style,
            borders,
            inner,
        ));
    }

    lines.push(edge(borders.t_left, borders.t_right, borders, &style, inner));

    if let Some(confirm) = &view.confirm {
        lines.push(styled_line(&style, borders, confirm, style.notice, inner));
    } else if let Some(banner) = &view.banner {
        lines.push(styled_line(&style, borders, banner, style.notice, inner));
    }

    let hints = if caps.unicode {
        "ENTER=select · ESC=back · Q=quit"
    } else {
        "ENTER=select  ESC=back  Q=quit"
    };
    lines.push(plain_line(&style, borders, &center(hints, inner), inner));
    lines.push(styled_line(
        &style,
        borders,
        &center(&view.footer, inner),
        style.dim,
        inner,
    ));
    lines.push(edge(borders.bottom_left, borders.bottom_right, borders, &style, inner));

    lines
}

/// Box width for a terminal of `cols` columns, clamped to a readable band.
pub fn frame_width(cols: u16) -> usize {
    (cols as usize).saturating_sub(4).clamp(32, 70)
}

fn breadcrumb_text(view: &FrameView, unicode: bool) -> String {
    let sep = if unicode { " › " } else { " > " };
    view.breadcrumb.join(sep)
}

fn format_row(
    row: &RowView,
    index: usize,
    selected: bool,
    caps: &Capabilities,
    style: &Style,
    borders: &BorderSet,
    inner: usize,
) -> String {
    let marker = match (selected, caps.unicode) {
        (true, true) => "▸",
        (true, false) => ">",
        (false, _) => " ",
    };
    let shortcut = if index < 9 {
        format!("{}.", index + 1)
    } else {
        "  ".to_string()
    };
    let indent = "  ".repeat(row.depth);

    let body = match &row.kind {
        RowKind::Toggle { on } => {
            let mark = if *on { "[X]" } else { "[ ]" };
            format!("{mark} {}", row.label)
        }
        RowKind::Inline { expanded } => {
            let mark = if *expanded { "[-]" } else { "[+]" };
            format!("{mark} {}", row.label)
        }
        RowKind::Submenu => {
            let arrow = if caps.unicode { "›" } else { ">" };
            format!("{} {arrow}", row.label)
        }
        RowKind::Item => row.label.clone(),
    };
    let body = match row.disabled_reason {
        Some(reason) => format!("{body} ({reason})"),
        None => body,
    };

    let text = fit(&format!("{marker} {shortcut} {indent}{body}"), inner);
    let styled = if selected && caps.color {
        format!("{}{}{}", style.reverse, text, style.reset)
    } else if row.disabled_reason.is_some() && caps.color {
        format!("{}{}{}", style.dim, text, style.reset)
    } else {
        text
    };

    format!(
        "{}{}{}{}{}{}{}",
        style.border, borders.vertical, style.reset, styled, style.border, borders.vertical, style.reset
    )
}

fn edge(left: char, right: char, borders: &BorderSet, style: &Style, inner: usize) -> String {
    let bar: String = std::iter::repeat(borders.horizontal).take(inner).collect();
    format!("{}{left}{bar}{right}{}", style.border, style.reset)
}

fn plain_line(style: &Style, borders: &BorderSet, text: &str, inner: usize) -> String {
    format!(
        "{}{}{}{}{}{}{}",
        style.border,
        borders.vertical,
        style.reset,
        fit(text, inner),
        style.border,
        borders.vertical,
        style.reset
    )
}

fn styled_line(
    style: &Style,
    borders: &BorderSet,
    text: &str,
    color: &str,
    inner: usize,
) -> String {
    format!(
        "{}{}{}{color}{}{}{}{}{}",
        style.border,
        borders.vertical,
        style.reset,
        fit(text, inner),
        style.reset,
        style.border,
        borders.vertical,
        style.reset
    )
}

fn center(text: &str, width: usize) -> String {
    let text_width = display_width(text);
    if text_width >= width {
        return text.to_string();
    }
    let left = (width - text_width) / 2;
    format!("{}{}", " ".repeat(left), text)
}

/// Truncate to `width` display columns, then pad right to exactly `width`.
fn fit(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + ch_width > width {
            break;
        }
        out.push(ch);
        used += ch_width;
    }
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

fn display_width(text: &str) -> usize {
    text.chars()
        .map(|ch| UnicodeWidthChar::width(ch).unwrap_or(0))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::KeyEvent;
    use crate::menu::test_support::sample_tree;
    use crate::nav::NavigationController;

    fn caps(color: bool, unicode: bool) -> Capabilities {
        Capabilities {
            color,
            unicode,
            width: 80,
            height: 24,
        }
    }

    fn frame(color: bool, unicode: bool) -> Vec<String> {
        let tree = sample_tree();
        let nav = NavigationController::new();
        let view = FrameView::build(&tree, &nav, "load 0.12".to_string(), None);
        render(&caps(color, unicode), &view)
    }

    #[test]
    fn every_line_has_the_frame_width() {
        let lines = frame(false, false);
        let expected = frame_width(80);
        for line in &lines {
            assert_eq!(display_width(line), expected, "line {line:?}");
        }
    }

    #[test]
    fn ascii_frame_contains_only_ascii() {
        let lines = frame(false, false);
        for line in &lines {
            assert!(line.is_ascii(), "non-ASCII in {line:?}");
        }
    }

    #[test]
    fn no_color_frame_has_no_escape_codes() {
        let lines = frame(false, true);
        for line in &lines {
            assert!(!line.contains('\x1b'), "SGR codes in {line:?}");
        }
    }

    #[test]
    fn selected_row_is_reverse_video_when_color() {
        let lines = frame(true, true);
        let selected: Vec<_> = lines.iter().filter(|l| l.contains("\x1b[7m")).collect();
        assert_eq!(selected.len(), 1);
        assert!(selected[0].contains("Settings"));
    }

    #[test]
    fn rows_carry_number_shortcuts() {
        let lines = frame(false, false);
        let body = lines.join("\n");
        assert!(body.contains("1. Settings"));
        assert!(body.contains("2. Restore backup"));
    }

    #[test]
    fn toggle_rows_show_checkbox_state() {
        let tree = sample_tree();
        let mut nav = NavigationController::new();
        nav.handle(&KeyEvent::Enter, &tree); // into Settings
        let view = FrameView::build(&tree, &nav, String::new(), None);
        let body = render(&caps(false, false), &view).join("\n");
        assert!(body.contains("[ ] Animations"));
    }

    #[test]
    fn checked_toggle_renders_x() {
        let mut tree = sample_tree();
        let mut store = crate::menu::test_support::MemoryStore::default();
        assert!(tree.set_toggle(&[0, 0], true, &mut store));
        let mut nav = NavigationController::new();
        nav.handle(&KeyEvent::Enter, &tree);
        let view = FrameView::build(&tree, &nav, String::new(), None);
        let body = render(&caps(false, false), &view).join("\n");
        assert!(body.contains("[X] Animations"));
    }

    #[test]
    fn breadcrumb_shows_full_path() {
        let tree = sample_tree();
        let mut nav = NavigationController::new();
        nav.handle(&KeyEvent::Enter, &tree);
        let view = FrameView::build(&tree, &nav, String::new(), None);
        let body = render(&caps(false, false), &view).join("\n");
        assert!(body.contains("Root > Settings"));
    }

    #[test]
    fn confirm_prompt_takes_precedence_over_banner() {
        let tree = sample_tree();
        let mut nav = NavigationController::new();
        nav.handle(&KeyEvent::Down, &tree);
        nav.handle(&KeyEvent::Enter, &tree); // destructive -> pending
        let view = FrameView::build(
            &tree,
            &nav,
            String::new(),
            Some("stale banner".to_string()),
        );
        let body = render(&caps(false, false), &view).join("\n");
        assert!(body.contains("Restore backup? [y/N]"));
        assert!(!body.contains("stale banner"));
    }

    #[test]
    fn banner_renders_when_present() {
        let tree = sample_tree();
        let nav = NavigationController::new();
        let view = FrameView::build(
            &tree,
            &nav,
            String::new(),
            Some("Could not save ui.animations".to_string()),
        );
        let body = render(&caps(false, false), &view).join("\n");
        assert!(body.contains("Could not save ui.animations"));
    }

    #[test]
    fn footer_hints_always_present() {
        let body = frame(false, false).join("\n");
        assert!(body.contains("ENTER=select"));
        assert!(body.contains("Q=quit"));
        assert!(body.contains("load 0.12"));
    }

    #[test]
    fn disabled_rows_show_reason() {
        let body = frame(false, false).join("\n");
        assert!(body.contains("AI assistant (coming soon)"));
    }

    #[test]
    fn long_labels_are_truncated_to_width() {
        let long = "x".repeat(200);
        let text = fit(&long, 20);
        assert_eq!(display_width(&text), 20);
    }

    #[test]
    fn frame_width_clamps_to_band() {
        assert_eq!(frame_width(200), 70);
        assert_eq!(frame_width(40), 36);
        assert_eq!(frame_width(10), 32);
    }
}

use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}

/// Shorten a value for single-line list rendering, appending an ellipsis
/// when anything was cut.
pub(crate) fn truncate_for_list(value: &str, max_chars: usize) -> String {
    let flattened = value.replace('\n', " ");
    if flattened.chars().count() <= max_chars {
        return flattened;
    }
    let mut shortened: String = flattened.chars().take(max_chars.saturating_sub(1)).collect();
    shortened.push('…');
    shortened
}

#[cfg(test)]
mod tests {
    use super::truncate_for_list;

    #[test]
    fn truncate_keeps_short_values_intact() {
        assert_eq!(truncate_for_list("normal", 10), "normal");
    }

    #[test]
    fn truncate_flattens_newlines_and_cuts() {
        let long = "first line\nsecond line that keeps going";
        let shortened = truncate_for_list(long, 16);
        assert_eq!(shortened.chars().count(), 16);
        assert!(shortened.ends_with('…'));
        assert!(!shortened.contains('\n'));
    }
}

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use sonance_core::CuratedView;
use unicode_width::UnicodeWidthStr as _;

// ── Main vertical layout ────────────────────────────────────────────────────

pub const NOW_PLAYING_HEIGHT: u16 = 3;
pub const PROGRESS_BAR_HEIGHT: u16 = 1;
pub const TABS_HEIGHT: u16 = 1;
pub const SEARCH_HEIGHT: u16 = 1;
pub const CONTENT_MIN_HEIGHT: u16 = 3;
pub const HELP_BAR_HEIGHT: u16 = 1;

pub struct MainLayout {
    pub now_playing: Rect,
    pub progress_bar: Rect,
    pub tabs: Rect,
    pub search: Rect,
    pub content: Rect,
    pub help_bar: Rect,
}

pub fn split_main(area: Rect) -> MainLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(NOW_PLAYING_HEIGHT),
            Constraint::Length(PROGRESS_BAR_HEIGHT),
            Constraint::Length(TABS_HEIGHT),
            Constraint::Length(SEARCH_HEIGHT),
            Constraint::Min(CONTENT_MIN_HEIGHT),
            Constraint::Length(HELP_BAR_HEIGHT),
        ])
        .split(area);
    MainLayout {
        now_playing: chunks[0],
        progress_bar: chunks[1],
        tabs: chunks[2],
        search: chunks[3],
        content: chunks[4],
        help_bar: chunks[5],
    }
}

// ── Now-playing horizontal layout ───────────────────────────────────────────

pub const TRACK_INFO_MIN_WIDTH: u16 = 20;
pub const STATUS_WIDTH: u16 = 18;

pub struct NowPlayingLayout {
    pub track_info: Rect,
    pub status: Rect,
}

pub fn split_now_playing(area: Rect) -> NowPlayingLayout {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(TRACK_INFO_MIN_WIDTH),
            Constraint::Length(STATUS_WIDTH),
        ])
        .split(area);
    NowPlayingLayout {
        track_info: chunks[0],
        status: chunks[1],
    }
}

// ── Progress bar ────────────────────────────────────────────────────────────

/// Maps a click at column `x` on `bar` to a fraction of the track, or `None`
/// if the click missed the bar.
pub fn seek_fraction_at(bar: Rect, x: u16, y: u16) -> Option<f64> {
    if bar.width == 0 || !contains(bar, x, y) {
        return None;
    }
    Some((x - bar.x) as f64 / bar.width as f64)
}

// ── View tabs ───────────────────────────────────────────────────────────────

pub const TAB_PADDING: u16 = 1;
pub const TAB_SEPARATOR: &str = "\u{2502}";

/// Column ranges `[start, end)` occupied by each view's tab label, in the
/// order they are drawn.
pub fn view_tab_ranges(area: Rect) -> Vec<(u16, u16, CuratedView)> {
    let separator = TAB_SEPARATOR.width() as u16;
    let mut x = area.x;
    let mut ranges = Vec::with_capacity(CuratedView::ALL.len());
    for view in CuratedView::ALL {
        let width = view.as_str().width() as u16 + 2 * TAB_PADDING;
        ranges.push((x, x + width, view));
        x += width + separator;
    }
    ranges
}

pub fn view_tab_at(area: Rect, x: u16, y: u16) -> Option<CuratedView> {
    if !contains(area, x, y) {
        return None;
    }
    view_tab_ranges(area)
        .into_iter()
        .find(|(start, end, _)| x >= *start && x < *end)
        .map(|(_, _, view)| view)
}

// ── Interaction constants ───────────────────────────────────────────────────

pub const PAGE_SCROLL_SIZE: usize = 20;
pub const SCROLL_WHEEL_STEPS: usize = 3;
pub const SEEK_STEP_SECS: i64 = 5;
pub const VOLUME_STEP: f32 = 0.05;

// ── Log view ────────────────────────────────────────────────────────────────

pub const LOG_TARGET_WIDTH: usize = 24;
pub const LOG_TARGET_SUFFIX_LEN: usize = 21;

pub fn contains(area: Rect, x: u16, y: u16) -> bool {
    x >= area.x && x < area.x + area.width && y >= area.y && y < area.y + area.height
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_main_stacks_rows() {
        let main = split_main(Rect::new(0, 0, 80, 24));
        assert_eq!(main.now_playing.height, NOW_PLAYING_HEIGHT);
        assert_eq!(main.progress_bar.y, NOW_PLAYING_HEIGHT);
        assert_eq!(main.tabs.y, main.progress_bar.y + 1);
        assert_eq!(main.search.y, main.tabs.y + 1);
        assert_eq!(main.help_bar.y, 23);
        assert_eq!(main.content.height, 24 - 3 - 1 - 1 - 1 - 1);
    }

    #[test]
    fn test_seek_fraction_maps_click_offset() {
        let bar = Rect::new(10, 3, 100, 1);
        assert_eq!(seek_fraction_at(bar, 10, 3), Some(0.0));
        assert_eq!(seek_fraction_at(bar, 35, 3), Some(0.25));
        assert_eq!(seek_fraction_at(bar, 60, 3), Some(0.5));
        assert_eq!(seek_fraction_at(bar, 109, 3), Some(0.99));
    }

    #[test]
    fn test_seek_fraction_ignores_clicks_off_the_bar() {
        let bar = Rect::new(10, 3, 100, 1);
        assert_eq!(seek_fraction_at(bar, 9, 3), None);
        assert_eq!(seek_fraction_at(bar, 110, 3), None);
        assert_eq!(seek_fraction_at(bar, 50, 4), None);
        assert_eq!(seek_fraction_at(Rect::new(0, 0, 0, 1), 0, 0), None);
    }

    #[test]
    fn test_view_tabs_are_hit_by_their_labels() {
        let area = Rect::new(0, 4, 80, 1);
        // " For You " spans 0..9, then the separator, then " Top Tracks ".
        assert_eq!(view_tab_at(area, 0, 4), Some(CuratedView::ForYou));
        assert_eq!(view_tab_at(area, 8, 4), Some(CuratedView::ForYou));
        assert_eq!(view_tab_at(area, 9, 4), None);
        assert_eq!(view_tab_at(area, 10, 4), Some(CuratedView::TopTracks));
        assert_eq!(view_tab_at(area, 21, 4), Some(CuratedView::TopTracks));
        assert_eq!(view_tab_at(area, 22, 4), None);
        assert_eq!(view_tab_at(area, 2, 5), None);
    }
}

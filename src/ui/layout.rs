use tui::layout::{Constraint, Layout, Rect, Size};

pub const TAB_BAR_HEIGHT: u16 = 3;
pub const STATUS_HEIGHT: u16 = 1;
pub const LOG_PANE_PERCENT: u16 = 30;

/// Pre-computed layout areas for the main draw loop.
pub struct LayoutAreas {
    pub tab_bar: [Rect; 2],
    pub main: Rect,
    pub status: Rect,
    pub logs: Option<Rect>,
}

impl LayoutAreas {
    pub fn new(size: Size) -> Self {
        let rect = Rect::new(0, 0, size.width, size.height);
        Self::from_rect(rect, false, false)
    }

    pub fn update(&mut self, area: Rect, full_screen: bool, show_logs: bool) {
        *self = Self::from_rect(area, full_screen, show_logs);
    }

    fn from_rect(area: Rect, full_screen: bool, show_logs: bool) -> Self {
        let (tab_bar, rest) = if full_screen {
            ([Rect::ZERO, Rect::ZERO], area)
        } else {
            let [tab, rest] =
                Layout::vertical([Constraint::Length(TAB_BAR_HEIGHT), Constraint::Fill(1)])
                    .areas(area);
            (Self::split_tab_bar(tab), rest)
        };

        let [body, status] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(STATUS_HEIGHT)]).areas(rest);

        let (main, logs) = if show_logs {
            let [main, logs] = Layout::vertical([
                Constraint::Fill(1),
                Constraint::Percentage(LOG_PANE_PERCENT),
            ])
            .areas(body);
            (main, Some(logs))
        } else {
            (body, None)
        };

        LayoutAreas { tab_bar, main, status, logs }
    }

    fn split_tab_bar(area: Rect) -> [Rect; 2] {
        Layout::horizontal([Constraint::Percentage(80), Constraint::Percentage(20)]).areas(area)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_pane_only_when_requested() {
        let area = Rect::new(0, 0, 100, 40);
        let plain = LayoutAreas::from_rect(area, false, false);
        assert!(plain.logs.is_none());
        assert_eq!(plain.tab_bar[0].height, TAB_BAR_HEIGHT);
        assert_eq!(plain.status.height, STATUS_HEIGHT);

        let with_logs = LayoutAreas::from_rect(area, false, true);
        let logs = with_logs.logs.unwrap();
        assert!(logs.height > 0);
        assert!(with_logs.main.height < plain.main.height);
    }

    #[test]
    fn full_screen_hides_tab_bar() {
        let areas = LayoutAreas::from_rect(Rect::new(0, 0, 80, 24), true, false);
        assert_eq!(areas.tab_bar[0], Rect::ZERO);
        assert_eq!(areas.main.y, 0);
    }
}

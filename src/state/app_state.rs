use crate::state::auth::AuthStore;
use crate::state::detail::{DetailTarget, DetailView};
use crate::state::favorites::{FavoriteFilter, FavoriteItem, FavoritesStore};
use crate::state::persistence::Persister;
use crate::state::sports::SportsStore;
use crate::state::theme::ThemeStore;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum MenuItem {
    #[default]
    Home,
    Players,
    Favorites,
    Profile,
    Help,
    /// Full record of one team, player or match; not in the tab bar.
    Detail,
}

/// Which list the cursor moves through on the Home tab.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum HomeFocus {
    #[default]
    Teams,
    Matches,
}

impl HomeFocus {
    pub fn other(self) -> Self {
        match self {
            HomeFocus::Teams => HomeFocus::Matches,
            HomeFocus::Matches => HomeFocus::Teams,
        }
    }
}

// ---------------------------------------------------------------------------
// Cursor over a list whose length changes underneath it
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ListCursor {
    pub selected: usize,
}

impl ListCursor {
    pub fn down(&mut self, len: usize) {
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Keep the cursor inside a list that may have shrunk.
    pub fn clamp(&mut self, len: usize) {
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    pub fn reset(&mut self) {
        self.selected = 0;
    }
}

// ---------------------------------------------------------------------------
// Root app state: one container per slice, plus UI navigation
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_logs: bool,
    pub home_focus: HomeFocus,
    pub teams_cursor: ListCursor,
    pub matches_cursor: ListCursor,
    pub players_cursor: ListCursor,
    pub favorites_cursor: ListCursor,
    pub favorites_filter: FavoriteFilter,
    /// Open while the Detail screen is showing.
    pub detail: Option<DetailView>,
    /// Team whose roster the Players tab shows.
    pub players_team: Option<String>,
    /// Team search prompt, open while `Some`.
    pub search_input: Option<String>,
    pub favorites: FavoritesStore,
    pub theme: ThemeStore,
    pub sports: SportsStore,
    pub auth: AuthStore,
}

impl AppState {
    pub fn new(persister: Persister, default_league: &str) -> Self {
        Self {
            active_tab: MenuItem::default(),
            previous_tab: MenuItem::default(),
            show_logs: false,
            home_focus: HomeFocus::default(),
            teams_cursor: ListCursor::default(),
            matches_cursor: ListCursor::default(),
            players_cursor: ListCursor::default(),
            favorites_cursor: ListCursor::default(),
            favorites_filter: FavoriteFilter::default(),
            detail: None,
            players_team: None,
            search_input: None,
            favorites: FavoritesStore::new(persister.clone()),
            theme: ThemeStore::new(persister.clone()),
            sports: SportsStore::new(default_league),
            auth: AuthStore::new(persister),
        }
    }

    /// Restore favorites, theme and session from storage.
    pub async fn hydrate(&mut self) {
        self.favorites.load().await;
        self.theme.load().await;
        self.auth.load().await;
    }

    /// Snapshot of whatever the cursor points at on the current tab, ready
    /// to be toggled as a favorite.
    pub fn selected_favorite_candidate(&self) -> Option<FavoriteItem> {
        match self.active_tab {
            MenuItem::Home => match self.home_focus {
                HomeFocus::Teams => self
                    .sports
                    .teams()
                    .items()
                    .get(self.teams_cursor.selected)
                    .map(FavoriteItem::from_team),
                HomeFocus::Matches => self
                    .sports
                    .matches()
                    .items()
                    .get(self.matches_cursor.selected)
                    .map(FavoriteItem::from_match),
            },
            MenuItem::Players => self
                .sports
                .players()
                .items()
                .get(self.players_cursor.selected)
                .map(FavoriteItem::from_player),
            MenuItem::Favorites => self.selected_favorite().cloned(),
            MenuItem::Detail => self.detail.as_ref().map(|view| view.target().favorite_item()),
            MenuItem::Profile | MenuItem::Help => None,
        }
    }

    /// Favorites under the current filter tab.
    pub fn visible_favorites(&self) -> Vec<&FavoriteItem> {
        self.favorites.filtered(self.favorites_filter)
    }

    pub fn selected_favorite(&self) -> Option<&FavoriteItem> {
        self.visible_favorites().get(self.favorites_cursor.selected).copied()
    }

    /// The record the cursor points at, for the Detail screen.
    pub fn selected_detail_target(&self) -> Option<DetailTarget> {
        match self.active_tab {
            MenuItem::Home => match self.home_focus {
                HomeFocus::Teams => self
                    .sports
                    .teams()
                    .items()
                    .get(self.teams_cursor.selected)
                    .cloned()
                    .map(DetailTarget::Team),
                HomeFocus::Matches => self
                    .sports
                    .matches()
                    .items()
                    .get(self.matches_cursor.selected)
                    .cloned()
                    .map(DetailTarget::Match),
            },
            MenuItem::Players => self
                .sports
                .players()
                .items()
                .get(self.players_cursor.selected)
                .cloned()
                .map(DetailTarget::Player),
            MenuItem::Favorites => self.selected_favorite().map(DetailTarget::from_favorite),
            MenuItem::Profile | MenuItem::Help | MenuItem::Detail => None,
        }
    }

    /// League after the selected one among the fetched leagues of the
    /// current sport, wrapping around.
    pub fn next_league(&self) -> Option<String> {
        let tag = self.sports.current_sport().api_tag();
        let names: Vec<&str> = self
            .sports
            .leagues()
            .items()
            .iter()
            .filter(|league| league.sport.as_deref() == Some(tag))
            .map(|league| league.name.as_str())
            .collect();
        if names.is_empty() {
            return None;
        }
        let next = names
            .iter()
            .position(|name| *name == self.sports.selected_league())
            .map_or(0, |i| (i + 1) % names.len());
        Some(names[next].to_string())
    }

    pub fn clamp_cursors(&mut self) {
        self.teams_cursor.clamp(self.sports.teams().items().len());
        self.matches_cursor.clamp(self.sports.matches().items().len());
        self.players_cursor.clamp(self.sports.players().items().len());
        self.favorites_cursor.clamp(self.visible_favorites().len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::persistence::test_support::memory_persister;
    use sportsdb_api::{League, Match, Team};

    #[test]
    fn cursor_stays_in_bounds() {
        let mut cursor = ListCursor::default();
        cursor.up();
        assert_eq!(cursor.selected, 0);
        cursor.down(2);
        cursor.down(2);
        assert_eq!(cursor.selected, 1);
        cursor.clamp(0);
        assert_eq!(cursor.selected, 0);
    }

    #[tokio::test]
    async fn candidate_follows_tab_and_focus() {
        let (persister, _) = memory_persister();
        let mut state = AppState::new(persister, "English Premier League");
        state.sports.apply_teams(Ok(vec![
            Team { id: "1".into(), name: "Arsenal".into(), ..Default::default() },
            Team { id: "2".into(), name: "Chelsea".into(), ..Default::default() },
        ]));
        state.sports.apply_matches(Ok(vec![Match {
            id: "m1".into(),
            title: "Arsenal vs Chelsea".into(),
            ..Default::default()
        }]));

        state.teams_cursor.down(2);
        assert_eq!(state.selected_favorite_candidate().map(|f| f.id), Some("2".into()));

        state.home_focus = state.home_focus.other();
        assert_eq!(state.selected_favorite_candidate().map(|f| f.id), Some("m1".into()));

        state.active_tab = MenuItem::Players;
        assert!(state.selected_favorite_candidate().is_none());
    }

    #[tokio::test]
    async fn favorites_cursor_walks_the_filtered_list() {
        use crate::state::favorites::FavoriteKind;

        let (persister, _) = memory_persister();
        let mut state = AppState::new(persister, "English Premier League");
        state.favorites.add(FavoriteItem::new("t1", FavoriteKind::Team, "Arsenal"));
        state.favorites.add(FavoriteItem::new("p1", FavoriteKind::Player, "Saka"));
        state.favorites.add(FavoriteItem::new("t2", FavoriteKind::Team, "Chelsea"));
        state.active_tab = MenuItem::Favorites;

        state.favorites_cursor.down(state.visible_favorites().len());
        assert_eq!(state.selected_favorite().map(|f| f.id.as_str()), Some("p1"));

        state.favorites_filter = FavoriteFilter::Teams;
        assert_eq!(state.visible_favorites().len(), 2);
        assert_eq!(state.selected_favorite().map(|f| f.id.as_str()), Some("t2"));

        state.favorites_filter = FavoriteFilter::Players;
        state.clamp_cursors();
        assert_eq!(state.favorites_cursor.selected, 0);
        assert_eq!(
            state.selected_detail_target().map(|t| t.name().to_string()),
            Some("Saka".to_string())
        );
    }

    #[tokio::test]
    async fn next_league_wraps_within_current_sport() {
        let (persister, _) = memory_persister();
        let mut state = AppState::new(persister, "English Premier League");
        assert_eq!(state.next_league(), None);

        let league = |id: &str, name: &str, sport: &str| League {
            id: id.into(),
            name: name.into(),
            sport: Some(sport.into()),
            ..Default::default()
        };
        state.sports.apply_leagues(Ok(vec![
            league("4328", "English Premier League", "Soccer"),
            league("4387", "NBA", "Basketball"),
            league("4335", "Spanish La Liga", "Soccer"),
        ]));

        assert_eq!(state.next_league().as_deref(), Some("Spanish La Liga"));
        state.sports.set_selected_league("Spanish La Liga");
        assert_eq!(state.next_league().as_deref(), Some("English Premier League"));
    }

    #[tokio::test]
    async fn hydrate_restores_every_persisted_slice() {
        let (persister, _) = memory_persister();
        let mut first = AppState::new(persister.clone(), "NBA");
        first.favorites.add(FavoriteItem::new("t1", crate::state::favorites::FavoriteKind::Team, "Arsenal"));
        first.theme.set(true);
        persister.flush().await;

        let mut second = AppState::new(persister, "NBA");
        second.hydrate().await;
        assert!(second.favorites.contains("t1"));
        assert!(second.theme.is_dark_mode());
        assert!(!second.auth.is_authenticated());
    }
}

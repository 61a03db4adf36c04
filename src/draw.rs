use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Paragraph, Tabs, Wrap};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::App;
use crate::ui::layout::LayoutAreas;
use crate::ui::palette::Palette;
use sportsdb_api::Match;
use sportszone::state::app_state::{HomeFocus, ListCursor, MenuItem};
use sportszone::state::detail::DetailTarget;
use sportszone::state::favorites::FavoriteFilter;
use sportszone::state::network::{ERROR_CHAR, LoadingState};
use sportszone::state::sports::Slice;

static TABS: &[&str; 4] = &["Home", "Players", "Favorites", "Profile"];

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);
    let palette = Palette::for_mode(app.state.theme.is_dark_mode());

    let result = terminal.draw(|f| {
        f.render_widget(
            Block::default().style(Style::default().bg(palette.background).fg(palette.text)),
            f.area(),
        );

        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app, &palette);
        }

        match app.state.active_tab {
            MenuItem::Home => draw_home(f, layout.main, app, &palette),
            MenuItem::Players => draw_players(f, layout.main, app, &palette),
            MenuItem::Favorites => draw_favorites(f, layout.main, app, &palette),
            MenuItem::Profile => draw_profile(f, layout.main, app, &palette),
            MenuItem::Help => draw_help(f, layout.main, &palette),
            MenuItem::Detail => draw_detail(f, layout.main, app, &palette),
        }

        draw_status(f, layout.status, app, &palette);

        if let Some(logs) = layout.logs {
            draw_logs(f, logs, &palette);
        }

        draw_loading_spinner(f, f.area(), app, loading, &palette);
    });

    if let Err(e) = result {
        log::error!("draw failed: {e}");
    }
}

pub fn default_border<'a>(palette: &Palette) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.border))
}

fn focused_border<'a>(palette: &Palette, focused: bool) -> Block<'a> {
    let block = default_border(palette);
    if focused {
        block.border_style(Style::default().fg(palette.primary))
    } else {
        block
    }
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App, palette: &Palette) {
    let border_type = BorderType::Rounded;
    let border_style = Style::default().fg(palette.border);

    let tab_index = match app.state.active_tab {
        MenuItem::Home | MenuItem::Help | MenuItem::Detail => 0,
        MenuItem::Players => 1,
        MenuItem::Favorites => 2,
        MenuItem::Profile => 3,
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type)
                .border_style(border_style),
        )
        .highlight_style(
            Style::default()
                .fg(palette.primary)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )
        .select(tab_index)
        .style(Style::default().fg(palette.text));
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .style(Style::default().fg(palette.text_secondary))
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type)
                .border_style(border_style),
        );
    f.render_widget(help, tab_bar[1]);
}

// ---------------------------------------------------------------------------
// Home: teams of the selected league next to its fixtures
// ---------------------------------------------------------------------------

fn draw_home(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let state = &app.state;
    let [header, body] = Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(area);

    let header_line = match state.search_input.as_deref() {
        Some(input) => Line::from(vec![
            Span::styled(" Search teams: ", Style::default().fg(palette.primary)),
            Span::raw(input.to_string()),
            Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ]),
        None => Line::from(vec![
            Span::styled(
                format!(" {} ", state.sports.current_sport()),
                Style::default().fg(palette.primary).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("· {}", state.sports.selected_league()),
                Style::default().fg(palette.text_secondary),
            ),
        ]),
    };
    f.render_widget(Paragraph::new(header_line), header);

    let [teams_area, matches_area] =
        Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)]).areas(body);

    let teams = state.sports.teams();
    let team_lines = teams
        .items()
        .iter()
        .map(|team| {
            let star = favorite_marker(app, &team.id);
            let stadium = team.stadium.as_deref().unwrap_or_default();
            (format!("{star}{}", team.name), stadium.to_string())
        })
        .collect::<Vec<_>>();
    draw_list(
        f,
        teams_area,
        " Teams ",
        teams,
        &team_lines,
        state.teams_cursor,
        state.home_focus == HomeFocus::Teams,
        palette,
    );

    let matches = state.sports.matches();
    let match_lines = matches
        .items()
        .iter()
        .map(|event| {
            let star = favorite_marker(app, &event.id);
            let detail = match event.score_line() {
                Some(score) => score,
                None => [event.date.as_deref(), event.time.as_deref()]
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>()
                    .join(" "),
            };
            (format!("{star}{}", event.title), detail)
        })
        .collect::<Vec<_>>();
    draw_list(
        f,
        matches_area,
        " Matches ",
        matches,
        &match_lines,
        state.matches_cursor,
        state.home_focus == HomeFocus::Matches,
        palette,
    );
}

fn draw_players(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let state = &app.state;
    let Some(team) = state.players_team.as_deref() else {
        draw_placeholder(f, area, "Select a team on Home and press p", palette);
        return;
    };

    let players = state.sports.players();
    let lines = players
        .items()
        .iter()
        .map(|player| {
            let star = favorite_marker(app, &player.id);
            let detail = [player.position.as_deref(), player.nationality.as_deref()]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" · ");
            (format!("{star}{}", player.name), detail)
        })
        .collect::<Vec<_>>();
    draw_list(
        f,
        area,
        &format!(" {team} "),
        players,
        &lines,
        state.players_cursor,
        true,
        palette,
    );
}

fn draw_favorites(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let state = &app.state;
    let favorites = &state.favorites;
    let [filter_bar, list_area] = Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(area);

    let titles: Vec<Line> = FavoriteFilter::ALL
        .iter()
        .map(|filter| Line::from(format!("{} ({})", filter.label(), favorites.filtered(*filter).len())))
        .collect();
    let selected_filter = FavoriteFilter::ALL
        .iter()
        .position(|filter| *filter == state.favorites_filter)
        .unwrap_or(0);
    f.render_widget(
        Tabs::new(titles)
            .select(selected_filter)
            .style(Style::default().fg(palette.text_secondary))
            .highlight_style(Style::default().fg(palette.primary).add_modifier(Modifier::BOLD)),
        filter_bar,
    );

    let block = default_border(palette).title(format!(" Favorites ({}) ", favorites.len()));

    if favorites.is_loading() {
        f.render_widget(Paragraph::new("Loading...").block(block), list_area);
        return;
    }
    let visible = state.visible_favorites();
    if visible.is_empty() {
        let msg = if favorites.is_empty() {
            "No favorites yet. Press f on a team, player or match.".to_string()
        } else {
            format!("No {} favorites. Tab: next category", state.favorites_filter.label().to_lowercase())
        };
        f.render_widget(
            Paragraph::new(msg)
                .style(Style::default().fg(palette.text_secondary))
                .alignment(Alignment::Center)
                .block(block),
            list_area,
        );
        return;
    }

    let selected = state.favorites_cursor.selected;
    let lines: Vec<Line> = visible
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let added = item.date_added.get(..10).unwrap_or(&item.date_added).to_string();
            row_line(
                i == selected,
                format!("[{}] {}", item.kind.label(), item.name),
                added,
                palette,
            )
        })
        .collect();
    let paragraph = Paragraph::new(lines).block(block).scroll((scroll_offset(selected, list_area), 0));
    f.render_widget(paragraph, list_area);
}

// ---------------------------------------------------------------------------
// Detail: one team, player or match
// ---------------------------------------------------------------------------

fn draw_detail(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let Some(view) = app.state.detail.as_ref() else {
        draw_placeholder(f, area, "Press Enter on a team, player or match", palette);
        return;
    };
    let target = view.target();
    let star = favorite_marker(app, target.id());
    let title_style = Style::default().fg(palette.primary).add_modifier(Modifier::BOLD);

    let mut lines = vec![Line::from(Span::styled(format!("{star}{}", target.name()), title_style))];
    match target {
        DetailTarget::Team(team) => {
            lines.push(detail_field("League", team.league.as_deref(), palette));
            lines.push(detail_field("Stadium", team.stadium.as_deref(), palette));
            lines.push(detail_field("Sport", team.sport.as_deref(), palette));
            lines.push(Line::default());
            lines.push(Line::from(team.description.clone().unwrap_or_else(|| "No description.".into())));
        }
        DetailTarget::Player(player) => {
            lines.push(detail_field("Position", player.position.as_deref(), palette));
            lines.push(detail_field("Team", player.team.as_deref(), palette));
            lines.push(detail_field("Nationality", player.nationality.as_deref(), palette));
            lines.push(detail_field("Height", player.height.as_deref(), palette));
            lines.push(detail_field("Weight", player.weight.as_deref(), palette));
        }
        DetailTarget::Match(event) => {
            lines.push(detail_field("Home", Some(event.home_team.as_str()), palette));
            lines.push(detail_field("Away", Some(event.away_team.as_str()), palette));
            lines.push(detail_field("Score", Some(event.score_line().as_deref().unwrap_or("TBD")), palette));
            lines.push(detail_field("Date", event.date.as_deref(), palette));
            lines.push(detail_field("Time", event.time.as_deref(), palette));
            lines.push(detail_field("Status", event.status.as_deref(), palette));
        }
    }

    lines.push(Line::default());
    if let Some(error) = view.error() {
        lines.push(Line::from(Span::styled(format!("{error} (r to retry)"), Style::default().fg(palette.error))));
    } else if view.is_loading() {
        lines.push(Line::from(Span::styled("Loading...", Style::default().fg(palette.text_secondary))));
    }
    let hint = match target {
        DetailTarget::Team(_) => "f: favorite   p: players   r: refresh   Esc: back",
        DetailTarget::Player(_) => "f: favorite   r: refresh   Esc: back",
        DetailTarget::Match(_) => "f: favorite   Esc: back",
    };
    lines.push(Line::from(Span::styled(hint, Style::default().fg(palette.text_secondary))));

    let block = default_border(palette).title(match target {
        DetailTarget::Team(_) => " Team ",
        DetailTarget::Player(_) => " Player ",
        DetailTarget::Match(_) => " Match ",
    });
    let info = Paragraph::new(lines).wrap(Wrap { trim: false }).block(block);

    if !matches!(target, DetailTarget::Team(_)) {
        f.render_widget(info, area);
        return;
    }

    let [info_area, fixtures_area] =
        Layout::vertical([Constraint::Percentage(55), Constraint::Percentage(45)]).areas(area);
    f.render_widget(info, info_area);

    let [next_area, last_area] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(fixtures_area);
    let fixture_rows = |events: &[Match]| -> Vec<(String, String)> {
        events
            .iter()
            .map(|event| {
                let detail = event
                    .score_line()
                    .or_else(|| event.date.clone())
                    .unwrap_or_default();
                (event.title.clone(), detail)
            })
            .collect()
    };
    let next = view.next_events();
    draw_list(f, next_area, " Next ", next, &fixture_rows(next.items()), ListCursor::default(), false, palette);
    let last = view.last_events();
    draw_list(f, last_area, " Last ", last, &fixture_rows(last.items()), ListCursor::default(), false, palette);
}

fn detail_field<'a>(label: &str, value: Option<&str>, palette: &Palette) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{label:<12}"), Style::default().fg(palette.text_secondary)),
        Span::raw(value.unwrap_or("N/A").to_string()),
    ])
}

fn draw_profile(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let state = &app.state;
    let label = Style::default().fg(palette.text_secondary);
    let mut lines = Vec::new();

    match state.auth.session() {
        Some(session) => {
            let user = &session.user;
            lines.push(Line::from(Span::styled(
                user.display_name(),
                Style::default().fg(palette.primary).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(vec![Span::styled("Username  ", label), Span::raw(user.username.clone())]));
            lines.push(Line::from(vec![Span::styled("Email     ", label), Span::raw(user.email.clone())]));
            lines.push(Line::from(Span::styled("o: log out", label)));
        }
        None if state.auth.is_loading() => lines.push(Line::from("Signing in...")),
        None => {
            lines.push(Line::from("Not signed in."));
            lines.push(Line::from(Span::styled(
                "l: log in   n: create account   (uses SPORTSZONE_USERNAME / SPORTSZONE_PASSWORD)",
                label,
            )));
        }
    }
    if let Some(error) = state.auth.error() {
        lines.push(Line::from(Span::styled(format!("{error} (x to dismiss)"), Style::default().fg(palette.error))));
    }

    lines.push(Line::default());
    let theme = if state.theme.is_dark_mode() { "dark" } else { "light" };
    lines.push(Line::from(vec![Span::styled("Theme     ", label), Span::raw(format!("{theme} (t to toggle)"))]));
    lines.push(Line::from(vec![
        Span::styled("Favorites ", label),
        Span::raw(state.favorites.len().to_string()),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Leagues   ", label),
        Span::raw(format!("{} known (r to refresh)", state.sports.leagues().items().len())),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Data dir  ", label),
        Span::raw(app.settings.data_dir.display().to_string()),
    ]));

    f.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }).block(default_border(palette).title(" Profile ")),
        area,
    );
}

fn draw_help(f: &mut Frame, area: Rect, palette: &Palette) {
    const KEYS: &[(&str, &str)] = &[
        ("1-4", "switch tab"),
        ("j/k ↑/↓", "move selection"),
        ("Tab h/l", "switch between teams and matches"),
        ("Enter", "details of the selected item"),
        ("p", "players of the selected team (Home, details)"),
        ("Tab h/l", "switch category (Favorites tab)"),
        ("/", "search teams"),
        ("s", "next sport"),
        ("g", "next league of the current sport"),
        ("f", "toggle favorite"),
        ("d", "remove favorite (Favorites tab)"),
        ("r", "retry / reload"),
        ("x", "dismiss errors"),
        ("l / n / o", "log in / create account / log out (Profile tab)"),
        ("t", "toggle dark mode"),
        ("\"", "show logs"),
        ("F", "full screen"),
        ("Esc", "close help or details"),
        ("q", "quit"),
    ];
    let lines: Vec<Line> = KEYS
        .iter()
        .map(|(key, action)| {
            Line::from(vec![
                Span::styled(format!("{key:>12}  "), Style::default().fg(palette.primary)),
                Span::raw(*action),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines).block(default_border(palette).title(" Help ")), area);
}

fn draw_status(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let line = match app.state.sports.error() {
        Some(error) => Line::from(vec![
            Span::styled(format!(" {error} "), Style::default().fg(palette.error)),
            Span::styled("r: retry  x: dismiss", Style::default().fg(palette.text_secondary)),
        ]),
        None => {
            let user = app
                .state
                .auth
                .session()
                .map(|s| s.user.username.clone())
                .unwrap_or_else(|| "guest".to_string());
            Line::from(Span::styled(
                format!(" {user} · {} favorites", app.state.favorites.len()),
                Style::default().fg(palette.text_secondary),
            ))
        }
    };
    f.render_widget(Paragraph::new(line), area);
}

fn draw_logs(f: &mut Frame, area: Rect, palette: &Palette) {
    let logs = TuiLoggerWidget::default()
        .block(default_border(palette).title(" Logs "))
        .style_error(Style::default().fg(palette.error))
        .style_warn(Style::default().fg(palette.warning))
        .style_info(Style::default().fg(palette.success))
        .output_target(false)
        .output_file(false)
        .output_line(false);
    f.render_widget(logs, area);
}

fn draw_placeholder(f: &mut Frame, area: Rect, msg: &str, palette: &Palette) {
    let block = default_border(palette);
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
        Paragraph::new(msg)
            .style(Style::default().fg(palette.text_secondary))
            .alignment(Alignment::Center),
        inner,
    );
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState, palette: &Palette) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(palette.error),
        _ => Style::default().fg(palette.primary),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Render one slice as a selectable list. Stale rows stay visible under an
/// error line so a failed refresh never blanks the screen.
#[allow(clippy::too_many_arguments)]
fn draw_list<T>(
    f: &mut Frame,
    area: Rect,
    title: &str,
    slice: &Slice<T>,
    rows: &[(String, String)],
    cursor: ListCursor,
    focused: bool,
    palette: &Palette,
) {
    let block = focused_border(palette, focused).title(title.to_string());
    let mut lines: Vec<Line> = Vec::new();

    if let Some(error) = slice.error() {
        lines.push(Line::from(Span::styled(
            format!("{error} (r to retry)"),
            Style::default().fg(palette.error),
        )));
    }
    if slice.is_loading() && rows.is_empty() {
        lines.push(Line::from(Span::styled("Loading...", Style::default().fg(palette.text_secondary))));
    } else if rows.is_empty() && slice.error().is_none() {
        lines.push(Line::from(Span::styled("Nothing here", Style::default().fg(palette.text_secondary))));
    }

    let header_rows = lines.len();
    lines.extend(
        rows.iter()
            .enumerate()
            .map(|(i, (name, detail))| row_line(focused && i == cursor.selected, name.clone(), detail.clone(), palette)),
    );

    let offset = scroll_offset(cursor.selected + header_rows, area);
    f.render_widget(Paragraph::new(lines).block(block).scroll((offset, 0)), area);
}

fn row_line<'a>(selected: bool, name: String, detail: String, palette: &Palette) -> Line<'a> {
    let name_style = if selected {
        Style::default().bg(palette.surface).fg(palette.primary).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(palette.text)
    };
    let marker = if selected { "▶ " } else { "  " };
    Line::from(vec![
        Span::styled(format!("{marker}{name}"), name_style),
        Span::styled(format!("  {detail}"), Style::default().fg(palette.text_secondary)),
    ])
}

fn favorite_marker(app: &App, id: &str) -> &'static str {
    if app.state.favorites.contains(id) { "★ " } else { "" }
}

/// Keep the selected row inside the bordered area.
fn scroll_offset(selected: usize, area: Rect) -> u16 {
    let visible = area.height.saturating_sub(2) as usize;
    if visible == 0 || selected < visible {
        return 0;
    }
    u16::try_from(selected + 1 - visible).unwrap_or(u16::MAX)
}

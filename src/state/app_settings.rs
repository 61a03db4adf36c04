use crate::state::sports::DEFAULT_LEAGUE;
use log::LevelFilter;
use std::path::PathBuf;

const DEFAULT_SPORTS_API: &str = "https://www.thesportsdb.com/api/v1/json/3";
const DEFAULT_AUTH_API: &str = "https://dummyjson.com";

/// Runtime configuration, read from `SPORTSZONE_*` environment variables.
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: LevelFilter,
    pub data_dir: PathBuf,
    pub sports_api_url: String,
    pub auth_api_url: String,
    pub default_league: String,
    pub credentials: Option<Credentials>,
}

/// Used by the sign-in key binding; there is no login form.
#[derive(Clone, PartialEq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub email: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("email", &self.email)
            .finish()
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            full_screen: false,
            log_level: LevelFilter::Info,
            data_dir: PathBuf::from(".sportszone"),
            sports_api_url: DEFAULT_SPORTS_API.to_string(),
            auth_api_url: DEFAULT_AUTH_API.to_string(),
            default_league: DEFAULT_LEAGUE.to_string(),
            credentials: None,
        }
    }
}

impl AppSettings {
    pub fn load() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build settings from any variable source; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let credentials = match (var("SPORTSZONE_USERNAME"), var("SPORTSZONE_PASSWORD")) {
            (Some(username), Some(password)) => Some(Credentials {
                username,
                password,
                email: var("SPORTSZONE_EMAIL"),
            }),
            _ => None,
        };

        Self {
            full_screen: false,
            log_level: var("SPORTSZONE_LOG")
                .and_then(|level| level.parse().ok())
                .unwrap_or(defaults.log_level),
            data_dir: var("SPORTSZONE_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| default_data_dir(&var)),
            sports_api_url: var("SPORTSZONE_SPORTS_API").unwrap_or(defaults.sports_api_url),
            auth_api_url: var("SPORTSZONE_AUTH_API").unwrap_or(defaults.auth_api_url),
            default_league: var("SPORTSZONE_LEAGUE").unwrap_or(defaults.default_league),
            credentials,
        }
    }
}

fn default_data_dir(var: &impl Fn(&str) -> Option<String>) -> PathBuf {
    if let Some(config_dir) = var("XDG_CONFIG_HOME") {
        return PathBuf::from(config_dir).join("sportszone");
    }
    if let Some(home) = var("HOME") {
        return PathBuf::from(home).join(".config").join("sportszone");
    }
    PathBuf::from(".sportszone")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> AppSettings {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppSettings::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let s = settings(&[]);
        assert_eq!(s.log_level, LevelFilter::Info);
        assert_eq!(s.default_league, "English Premier League");
        assert_eq!(s.data_dir, PathBuf::from(".sportszone"));
        assert!(s.credentials.is_none());
    }

    #[test]
    fn data_dir_precedence() {
        assert_eq!(
            settings(&[("HOME", "/home/u")]).data_dir,
            PathBuf::from("/home/u/.config/sportszone")
        );
        assert_eq!(
            settings(&[("HOME", "/home/u"), ("XDG_CONFIG_HOME", "/xdg")]).data_dir,
            PathBuf::from("/xdg/sportszone")
        );
        assert_eq!(
            settings(&[("XDG_CONFIG_HOME", "/xdg"), ("SPORTSZONE_DATA_DIR", "/data")]).data_dir,
            PathBuf::from("/data")
        );
    }

    #[test]
    fn overrides_and_blank_values() {
        let s = settings(&[
            ("SPORTSZONE_LOG", "debug"),
            ("SPORTSZONE_LEAGUE", "  "),
            ("SPORTSZONE_SPORTS_API", "http://localhost:9000"),
            ("SPORTSZONE_USERNAME", "emilys"),
            ("SPORTSZONE_PASSWORD", "emilyspass"),
        ]);
        assert_eq!(s.log_level, LevelFilter::Debug);
        assert_eq!(s.default_league, "English Premier League");
        assert_eq!(s.sports_api_url, "http://localhost:9000");
        let creds = s.credentials.unwrap();
        assert_eq!(creds.username, "emilys");
        assert!(!format!("{creds:?}").contains("emilyspass"));
    }

    #[test]
    fn unknown_log_level_falls_back() {
        assert_eq!(settings(&[("SPORTSZONE_LOG", "loud")]).log_level, LevelFilter::Info);
    }
}

use crate::state::persistence::Persister;
use log::warn;

pub const THEME_KEY: &str = "isDarkMode";

/// Light/dark flag. The UI always reads the in-memory value, whatever
/// happened to the last write.
#[derive(Debug)]
pub struct ThemeStore {
    is_dark_mode: bool,
    persister: Persister,
}

impl ThemeStore {
    pub fn new(persister: Persister) -> Self {
        Self { is_dark_mode: false, persister }
    }

    /// Defaults to light mode when nothing usable is stored.
    pub async fn load(&mut self) {
        let raw = self.persister.read(THEME_KEY).await;
        self.is_dark_mode = match raw.as_deref().map(serde_json::from_str::<bool>) {
            Some(Ok(value)) => value,
            Some(Err(e)) => {
                warn!("ignoring unreadable theme flag: {e}");
                false
            }
            None => false,
        };
    }

    pub fn is_dark_mode(&self) -> bool {
        self.is_dark_mode
    }

    pub fn toggle(&mut self) {
        self.set(!self.is_dark_mode);
    }

    pub fn set(&mut self, value: bool) {
        self.is_dark_mode = value;
        self.persister.write_json(THEME_KEY, &self.is_dark_mode);
    }
}

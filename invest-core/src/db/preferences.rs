//! Typed access to persisted preferences.

use tracing::debug;

use super::repository::{RepositoryError, SimulationRepository};
use crate::{THEME_SETTING_KEY, Theme};

/// Reads the saved theme; a missing setting means [`Theme::Light`].
pub async fn load_theme(repo: &dyn SimulationRepository) -> Result<Theme, RepositoryError> {
    let theme = repo
        .get_setting(THEME_SETTING_KEY)
        .await?
        .map(|value| Theme::from_setting(&value))
        .unwrap_or_default();
    debug!(theme = theme.as_str(), "theme loaded");
    Ok(theme)
}

pub async fn save_theme(
    repo: &dyn SimulationRepository,
    theme: Theme,
) -> Result<(), RepositoryError> {
    repo.put_setting(THEME_SETTING_KEY, theme.as_setting())
        .await
}

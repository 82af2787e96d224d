use crate::models::settings::EngineConfig;

/// Maps accounts to display colors.
///
/// The slot depends on the account id only, so an account keeps its color
/// across refreshes no matter how the batch is ordered.
pub struct ColorService {
    palette: Vec<String>,
    fallback_color: String,
}

impl ColorService {
    pub fn new() -> Self {
        Self::from_config(&EngineConfig::default())
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            palette: config.palette.clone(),
            fallback_color: config.fallback_color.clone(),
        }
    }

    /// Palette slot for an account: `|id| % len` for a known id, otherwise
    /// the account's position in the enumeration order. `None` if the
    /// palette is empty.
    #[must_use]
    pub fn palette_index(&self, account_id: Option<i64>, position: usize) -> Option<usize> {
        let len = self.palette.len();
        if len == 0 {
            return None;
        }
        Some(match account_id {
            Some(id) => (id.unsigned_abs() % len as u64) as usize,
            None => position % len,
        })
    }

    /// Resolve a slot to a color, falling back when there is none.
    #[must_use]
    pub fn color_at(&self, index: Option<usize>) -> &str {
        index
            .and_then(|i| self.palette.get(i))
            .map_or(self.fallback_color.as_str(), String::as_str)
    }

    #[must_use]
    pub fn color_for(&self, account_id: Option<i64>, position: usize) -> &str {
        self.color_at(self.palette_index(account_id, position))
    }

    #[must_use]
    pub fn fallback_color(&self) -> &str {
        &self.fallback_color
    }
}

impl Default for ColorService {
    fn default() -> Self {
        Self::new()
    }
}

use std::sync::Arc;

use attendance_core::model::{CalculatorInput, Preferences};
use storage::repository::KeyValueStore;

use crate::error::LocalDataError;
use crate::local_store::{load_or_default, save};

pub const PREFERENCES_KEY: &str = "app_storage";

/// Device preferences: theme and the quick calculator's last input.
#[derive(Clone)]
pub struct PreferencesService {
    kv: Arc<dyn KeyValueStore>,
}

impl PreferencesService {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// # Errors
    ///
    /// Returns `LocalDataError::Storage` if the store cannot be read.
    pub async fn load(&self) -> Result<Preferences, LocalDataError> {
        load_or_default(self.kv.as_ref(), PREFERENCES_KEY).await
    }

    /// # Errors
    ///
    /// Returns `LocalDataError` if the preferences cannot be written.
    pub async fn set_dark_mode(&self, enabled: bool) -> Result<Preferences, LocalDataError> {
        let mut prefs = self.load().await?;
        prefs.dark_mode = enabled;
        save(self.kv.as_ref(), PREFERENCES_KEY, &prefs).await?;
        Ok(prefs)
    }

    /// # Errors
    ///
    /// Returns `LocalDataError` if the preferences cannot be written.
    pub async fn save_calculator(
        &self,
        input: CalculatorInput,
    ) -> Result<Preferences, LocalDataError> {
        let mut prefs = self.load().await?;
        prefs.calculator = input;
        save(self.kv.as_ref(), PREFERENCES_KEY, &prefs).await?;
        Ok(prefs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::InMemoryKeyValueStore;

    #[tokio::test]
    async fn dark_mode_defaults_on_and_persists() {
        let service = PreferencesService::new(Arc::new(InMemoryKeyValueStore::new()));
        assert!(service.load().await.unwrap().dark_mode);

        service.set_dark_mode(false).await.unwrap();
        assert!(!service.load().await.unwrap().dark_mode);

        let input = CalculatorInput {
            total_classes: "40".into(),
            classes_attended: "30".into(),
            target_percentage: 75,
        };
        let prefs = service.save_calculator(input.clone()).await.unwrap();
        assert_eq!(prefs.calculator, input);
        assert!(!prefs.dark_mode);
    }
}

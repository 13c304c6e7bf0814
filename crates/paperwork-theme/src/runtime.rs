//! The theme runtime and its read-only handles.
//!
//! [`ThemeRuntime`] is the single owner of the theme settings. Every change
//! goes through it and ends in a publish: the settings are resolved into
//! [`StyleVariables`], stored in a shared scope and announced to subscribers.
//! Rendering code never sees the runtime; it receives a cloneable
//! [`ThemeHandle`] that reads whatever was published last.

use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;

use crate::catalog::{ThemeCategory, ThemeConfig};
use crate::settings::ThemeSettings;
use crate::variables::{derive_variables, DocumentEffects, StyleVariables};
use paperwork_core::{PaperworkResult, Settings};
use paperwork_signals::{Signal, SignalReceiver};

/// One published theme state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishedTheme {
    /// Increases by one on every publish. The state built at construction is 0.
    pub revision: u64,
    /// The settings this state was derived from.
    pub settings: ThemeSettings,
    /// The flat variable scope.
    pub variables: StyleVariables,
    /// Effects applied to the document root.
    pub effects: DocumentEffects,
}

impl PublishedTheme {
    /// Space-separated classes for the document root.
    pub fn root_class(&self) -> String {
        let mut classes = vec!["paperwork-theme"];
        classes.extend(self.effects.root_classes());
        classes.join(" ")
    }

    /// Inline style for the document root: the variables, then the effects.
    pub fn root_style(&self) -> String {
        format!(
            "{}; {}",
            self.variables.style_attribute(),
            self.effects.root_style()
        )
    }
}

type Scope = Arc<RwLock<Arc<PublishedTheme>>>;

/// A read-only view of the published theme.
///
/// Handles are cheap to clone and always observe the latest publish.
#[derive(Debug, Clone)]
pub struct ThemeHandle {
    scope: Scope,
    signal: Arc<Signal<PublishedTheme>>,
}

impl ThemeHandle {
    /// Returns the latest published state.
    pub fn current(&self) -> Arc<PublishedTheme> {
        Arc::clone(&self.scope.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Returns the latest revision number.
    pub fn revision(&self) -> u64 {
        self.current().revision
    }

    /// Returns one variable of the latest publish.
    pub fn variable(&self, name: &str) -> Option<String> {
        self.current().variables.get(name).map(str::to_string)
    }

    /// Registers a callback run after every publish.
    pub fn subscribe(
        &self,
        receiver_id: impl Into<String>,
        callback: SignalReceiver<PublishedTheme>,
    ) {
        self.signal.connect(receiver_id, callback);
    }

    /// Removes a callback. Returns `true` if it was registered.
    pub fn unsubscribe(&self, receiver_id: &str) -> bool {
        self.signal.disconnect(receiver_id)
    }
}

/// The single mutating owner of theme state.
///
/// # Examples
///
/// ```
/// use paperwork_theme::{ThemeCategory, ThemeRuntime};
/// use paperwork_theme::variables::PRIMARY_COLOR;
///
/// let mut runtime = ThemeRuntime::new();
/// let handle = runtime.handle();
///
/// runtime.update_setting(ThemeCategory::Color, "teal").unwrap();
/// assert_eq!(handle.variable(PRIMARY_COLOR).as_deref(), Some("#0f766e"));
///
/// runtime.reset();
/// assert_eq!(handle.variable(PRIMARY_COLOR).as_deref(), Some("#1e40af"));
/// ```
#[derive(Debug)]
pub struct ThemeRuntime {
    config: ThemeConfig,
    settings: ThemeSettings,
    variables: StyleVariables,
    default_variables: StyleVariables,
    revision: u64,
    scope: Scope,
    signal: Arc<Signal<PublishedTheme>>,
}

impl Default for ThemeRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl ThemeRuntime {
    /// Creates a runtime over the built-in catalog with default settings.
    pub fn new() -> Self {
        Self::with_config(ThemeConfig::builtin().clone())
            .expect("built-in catalog covers the default theme settings")
    }

    /// Creates a runtime over `config` with default settings.
    ///
    /// Fails if the catalog lacks one of the default keys, since `reset`
    /// must always be able to return to them.
    pub fn with_config(config: ThemeConfig) -> PaperworkResult<Self> {
        Self::with_settings(config, ThemeSettings::default())
    }

    /// Creates a runtime over `config` starting from `settings`.
    pub fn with_settings(config: ThemeConfig, settings: ThemeSettings) -> PaperworkResult<Self> {
        let default_variables = derive_variables(&config, &ThemeSettings::default())?;
        let variables = derive_variables(&config, &settings)?;
        let initial = PublishedTheme {
            revision: 0,
            effects: effects_of(&settings),
            settings: settings.clone(),
            variables: variables.clone(),
        };
        Ok(Self {
            config,
            settings,
            variables,
            default_variables,
            revision: 0,
            scope: Arc::new(RwLock::new(Arc::new(initial))),
            signal: Arc::new(Signal::new()),
        })
    }

    /// Creates a runtime from runtime settings, loading `theme_catalog` when set.
    pub fn from_settings(settings: &Settings) -> PaperworkResult<Self> {
        match &settings.theme_catalog {
            Some(path) => Self::with_config(ThemeConfig::from_file(path)?),
            None => Ok(Self::new()),
        }
    }

    /// Returns a read-only handle on the published scope.
    pub fn handle(&self) -> ThemeHandle {
        ThemeHandle {
            scope: Arc::clone(&self.scope),
            signal: Arc::clone(&self.signal),
        }
    }

    /// Returns the catalog.
    pub const fn config(&self) -> &ThemeConfig {
        &self.config
    }

    /// Returns the current settings.
    pub const fn settings(&self) -> &ThemeSettings {
        &self.settings
    }

    /// Registers a callback run after every publish.
    pub fn subscribe(
        &self,
        receiver_id: impl Into<String>,
        callback: SignalReceiver<PublishedTheme>,
    ) {
        self.signal.connect(receiver_id, callback);
    }

    /// Removes a callback. Returns `true` if it was registered.
    pub fn unsubscribe(&self, receiver_id: &str) -> bool {
        self.signal.disconnect(receiver_id)
    }

    /// Selects `key` for `category` and publishes.
    ///
    /// An unknown key is rejected with [`paperwork_core::PaperworkError::UnknownThemeOption`]
    /// and leaves the settings and the published scope untouched.
    pub fn update_setting(
        &mut self,
        category: ThemeCategory,
        key: &str,
    ) -> PaperworkResult<Arc<PublishedTheme>> {
        if let Err(err) = self.config.require(category, key) {
            tracing::warn!(category = %category, key, "rejected theme option");
            return Err(err);
        }
        let mut candidate = self.settings.clone();
        candidate.set(category, key);
        self.variables = derive_variables(&self.config, &candidate)?;
        self.settings = candidate;
        Ok(self.publish())
    }

    /// Like [`update_setting`](Self::update_setting), naming the category by string.
    pub fn update_setting_named(
        &mut self,
        category: &str,
        key: &str,
    ) -> PaperworkResult<Arc<PublishedTheme>> {
        match category.parse::<ThemeCategory>() {
            Ok(category) => self.update_setting(category, key),
            Err(err) => {
                tracing::warn!(category, key, "rejected theme category");
                Err(err)
            }
        }
    }

    /// Switches dark mode and publishes.
    pub fn set_dark_mode(&mut self, enabled: bool) -> Arc<PublishedTheme> {
        self.settings.dark_mode = enabled;
        self.publish()
    }

    /// Switches the gridline overlay and publishes.
    pub fn set_gridlines(&mut self, enabled: bool) -> Arc<PublishedTheme> {
        self.settings.show_gridlines = enabled;
        self.publish()
    }

    /// Restores default settings and publishes.
    pub fn reset(&mut self) -> Arc<PublishedTheme> {
        self.settings = ThemeSettings::default();
        self.variables = self.default_variables.clone();
        self.publish()
    }

    /// Stores the current state in the shared scope and notifies subscribers.
    pub fn publish(&mut self) -> Arc<PublishedTheme> {
        self.revision += 1;
        let published = Arc::new(PublishedTheme {
            revision: self.revision,
            settings: self.settings.clone(),
            variables: self.variables.clone(),
            effects: effects_of(&self.settings),
        });
        *self.scope.write().unwrap_or_else(PoisonError::into_inner) = Arc::clone(&published);

        let notified = self.signal.send(&published);
        tracing::info!(
            revision = published.revision,
            color = %published.settings.color,
            dark_mode = published.effects.dark_mode,
            notified,
            "theme published"
        );
        published
    }
}

const fn effects_of(settings: &ThemeSettings) -> DocumentEffects {
    DocumentEffects {
        dark_mode: settings.dark_mode,
        show_gridlines: settings.show_gridlines,
    }
}

impl From<&ThemeRuntime> for ThemeHandle {
    fn from(runtime: &ThemeRuntime) -> Self {
        runtime.handle()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};

    use paperwork_core::PaperworkError;

    use super::*;
    use crate::variables::{PRIMARY_COLOR, SPACING_UNIT, TEXT_DIRECTION};

    #[test]
    fn test_initial_state_is_revision_zero() {
        let runtime = ThemeRuntime::new();
        let current = runtime.handle().current();
        assert_eq!(current.revision, 0);
        assert_eq!(current.variables.get(PRIMARY_COLOR), Some("#1e40af"));
    }

    #[test]
    fn test_update_publishes_new_revision() {
        let mut runtime = ThemeRuntime::new();
        let published = runtime.update_setting(ThemeCategory::Density, "compact").unwrap();
        assert_eq!(published.revision, 1);
        assert_eq!(published.variables.get(SPACING_UNIT), Some("4px"));
        assert_eq!(runtime.settings().density, "compact");
    }

    #[test]
    fn test_rejected_key_leaves_state_unchanged() {
        let mut runtime = ThemeRuntime::new();
        let handle = runtime.handle();
        let err = runtime.update_setting(ThemeCategory::Color, "chartreuse").unwrap_err();
        assert!(matches!(err, PaperworkError::UnknownThemeOption { .. }));
        assert_eq!(runtime.settings().color, "blue");
        assert_eq!(handle.revision(), 0);
    }

    #[test]
    fn test_update_setting_named() {
        let mut runtime = ThemeRuntime::new();
        runtime.update_setting_named("language", "he").unwrap();
        assert_eq!(runtime.handle().variable(TEXT_DIRECTION).as_deref(), Some("rtl"));
        assert!(matches!(
            runtime.update_setting_named("glitter", "max"),
            Err(PaperworkError::UnknownThemeCategory(_))
        ));
    }

    #[test]
    fn test_subscribers_see_each_publish() {
        let mut runtime = ThemeRuntime::new();
        let seen = Arc::new(AtomicU64::new(0));
        let seen_clone = Arc::clone(&seen);
        runtime.subscribe(
            "sidebar",
            Arc::new(move |theme: &PublishedTheme| {
                seen_clone.store(theme.revision, Ordering::SeqCst);
            }),
        );

        runtime.set_dark_mode(true);
        runtime.set_gridlines(true);
        assert_eq!(seen.load(Ordering::SeqCst), 2);

        assert!(runtime.unsubscribe("sidebar"));
        runtime.reset();
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_effects_do_not_touch_variables() {
        let mut runtime = ThemeRuntime::new();
        let before = runtime.handle().current().variables.clone();
        let published = runtime.set_dark_mode(true);
        assert_eq!(published.variables, before);
        assert!(published.root_class().contains("theme-dark"));
        assert!(published.root_style().contains("background-color: #121212"));
    }

    #[test]
    fn test_config_without_defaults_is_rejected() {
        let mut config = ThemeConfig::builtin().clone();
        config.colors.remove("blue");
        assert!(ThemeRuntime::with_config(config).is_err());
    }

    #[test]
    fn test_from_settings_without_catalog() {
        let runtime = ThemeRuntime::from_settings(&Settings::default()).unwrap();
        assert_eq!(runtime.config(), ThemeConfig::builtin());
    }
}

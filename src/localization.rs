use anyhow::{anyhow, Result};
use fluent_bundle::{FluentArgs, FluentBundle, FluentResource, FluentValue};
use unic_langid::LanguageIdentifier;

const EN_MESSAGES: &str = include_str!("../locales/en/main.ftl");

/// Localization manager for console output
pub struct LocalizationManager {
    bundle: FluentBundle<FluentResource>,
}

impl LocalizationManager {
    /// Create a manager with the embedded English catalog
    pub fn new() -> Result<Self> {
        let en_locale: LanguageIdentifier = "en".parse()?;
        let bundle = Self::create_bundle(&en_locale, EN_MESSAGES)?;
        Ok(Self { bundle })
    }

    /// Create a fluent bundle for a locale from catalog source
    fn create_bundle(locale: &LanguageIdentifier, source: &str) -> Result<FluentBundle<FluentResource>> {
        let mut bundle = FluentBundle::new(vec![locale.clone()]);
        // Plain terminal output; no bidi isolation marks around arguments
        bundle.set_use_isolating(false);

        let resource = FluentResource::try_new(source.to_string())
            .map_err(|(_, errors)| anyhow!("Invalid message catalog for {locale}: {errors:?}"))?;
        bundle
            .add_resource(resource)
            .map_err(|errors| anyhow!("Conflicting messages for {locale}: {errors:?}"))?;

        Ok(bundle)
    }

    /// Get a localized message
    pub fn get_message(&self, key: &str, args: Option<&FluentArgs>) -> String {
        let msg = match self.bundle.get_message(key) {
            Some(msg) => msg,
            None => return format!("Missing translation: {}", key),
        };

        let pattern = match msg.value() {
            Some(pattern) => pattern,
            None => return format!("Missing value for key: {}", key),
        };

        let mut errors = vec![];
        self.bundle
            .format_pattern(pattern, args, &mut errors)
            .into_owned()
    }

    /// Get a localized message with simple string arguments
    pub fn get_message_with_args(&self, key: &str, args: &[(&str, &str)]) -> String {
        let fluent_args = FluentArgs::from_iter(
            args.iter()
                .map(|(k, v)| (*k, FluentValue::from(*v))),
        );
        self.get_message(key, Some(&fluent_args))
    }

    /// Convenience wrapper for messages without arguments
    pub fn t(&self, key: &str) -> String {
        self.get_message(key, None)
    }

    /// Convenience wrapper for messages with arguments
    pub fn t_args(&self, key: &str, args: &[(&str, &str)]) -> String {
        self.get_message_with_args(key, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_message() {
        let l10n = LocalizationManager::new().unwrap();
        assert_eq!(l10n.t("forecast-header"), "I. OUR FORECAST");
    }

    #[test]
    fn test_message_with_args_has_no_isolation_marks() {
        let l10n = LocalizationManager::new().unwrap();
        assert_eq!(
            l10n.t_args("similar-header", &[("count", "3")]),
            "III. TOP-3 SIMILAR RECIPES:"
        );
        assert_eq!(l10n.t_args("similar-url", &[("url", "http://x")]), "  http://x");
    }

    #[test]
    fn test_multiline_message() {
        let l10n = LocalizationManager::new().unwrap();
        let text = l10n.t("forecast-bad");
        assert_eq!(text.lines().count(), 2);
        assert!(text.ends_with("dish with that list of ingredients."));
    }

    #[test]
    fn test_missing_key() {
        let l10n = LocalizationManager::new().unwrap();
        assert_eq!(l10n.t("no-such-key"), "Missing translation: no-such-key");
    }
}

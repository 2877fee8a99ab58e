/* src/core/src/config/tests/validation.rs */

use crate::config::PagefanConfig;

#[test]
fn empty_locales_is_fatal() {
  let toml_str = r#"
[project]
name = "my-site"

[i18n]
locales = []
"#;
  let config: PagefanConfig = toml::from_str(toml_str).unwrap();
  let err = config.i18n.validate().unwrap_err();
  assert!(err.to_string().contains("must not be empty"));
}

#[test]
fn default_not_in_locales_is_a_warning() {
  let toml_str = r#"
[project]
name = "my-site"

[i18n]
locales = ["es", "fr"]
default = "en"
"#;
  let config: PagefanConfig = toml::from_str(toml_str).unwrap();
  let warnings = config.i18n.validate().unwrap();
  assert_eq!(warnings.len(), 1);
  assert!(warnings[0].contains("\"en\""));
}

#[test]
fn translations_for_unknown_locale_warn() {
  let toml_str = r#"
[project]
name = "my-site"

[i18n]
locales = ["en", "es"]
default = "en"

[i18n.translations.de]
home = "startseite"
"#;
  let config: PagefanConfig = toml::from_str(toml_str).unwrap();
  let warnings = config.i18n.validate().unwrap();
  assert_eq!(warnings.len(), 1);
  assert!(warnings[0].contains("i18n.translations.de"));
}

#[test]
fn valid_config_has_no_warnings() {
  let toml_str = r#"
[project]
name = "my-site"

[i18n]
locales = ["en", "es"]
default = "en"

[i18n.translations.es]
home = "inicio"
"#;
  let config: PagefanConfig = toml::from_str(toml_str).unwrap();
  assert!(config.i18n.validate().unwrap().is_empty());
}

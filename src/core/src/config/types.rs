/* src/core/src/config/types.rs */

use std::collections::BTreeMap;

use anyhow::{Result, bail};
use serde::Deserialize;

/// locale -> base file name (extension-less) -> translated base name.
/// A missing entry means the original name is kept.
pub type TranslationTable = BTreeMap<String, BTreeMap<String, String>>;

#[derive(Debug, Clone, Deserialize)]
pub struct PagefanConfig {
  pub project: ProjectConfig,
  #[serde(default)]
  pub pages: PagesSection,
  pub i18n: I18nSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
  pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PagesSection {
  #[serde(default = "default_pages_dir")]
  pub dir: String,
  #[serde(default = "default_out_dir")]
  pub out_dir: String,
}

impl Default for PagesSection {
  fn default() -> Self {
    Self { dir: default_pages_dir(), out_dir: default_out_dir() }
  }
}

fn default_pages_dir() -> String {
  "src/pages".to_string()
}

fn default_out_dir() -> String {
  ".pagefan/pages".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct I18nSection {
  pub locales: Vec<String>,
  #[serde(default = "default_locale")]
  pub default: String,
  #[serde(default)]
  pub include_default: bool,
  #[serde(default)]
  pub translations: TranslationTable,
}

impl I18nSection {
  /// Fatal on an empty locale set; soft issues come back as warnings.
  pub fn validate(&self) -> Result<Vec<String>> {
    if self.locales.is_empty() {
      bail!("i18n.locales must not be empty");
    }
    let mut warnings = Vec::new();
    if !self.locales.contains(&self.default) {
      warnings.push(format!(
        "i18n.default \"{}\" is not in i18n.locales {:?}",
        self.default, self.locales
      ));
    }
    for locale in self.translations.keys() {
      if !self.locales.contains(locale) {
        warnings.push(format!(
          "i18n.translations.{locale} has no matching entry in i18n.locales and is never applied"
        ));
      }
    }
    Ok(warnings)
  }

  /// Locales that produce output, in configured order. The default locale is
  /// skipped unless `include_default` is set — the untranslated source tree
  /// already serves it.
  pub fn fanout_locales(&self) -> impl Iterator<Item = &str> {
    self
      .locales
      .iter()
      .map(String::as_str)
      .filter(|l| self.include_default || *l != self.default)
  }
}

fn default_locale() -> String {
  "en".to_string()
}

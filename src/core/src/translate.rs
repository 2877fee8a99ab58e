/* src/core/src/translate.rs */

use std::path::Path;

use crate::config::TranslationTable;

/// Look up the translated base name for (locale, base_name).
/// Identity when the table has no entry for the pair. Pure, no I/O.
pub fn translate<'a>(table: &'a TranslationTable, locale: &str, base_name: &'a str) -> &'a str {
  table.get(locale).and_then(|names| names.get(base_name)).map_or(base_name, String::as_str)
}

/// Translate a full file name, leaving the extension untouched:
/// `home.page` with `es.home = "inicio"` becomes `inicio.page`.
pub fn translate_file_name(table: &TranslationTable, locale: &str, file_name: &str) -> String {
  let path = Path::new(file_name);
  let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
    return file_name.to_string();
  };
  let translated = translate(table, locale, stem);
  match path.extension().and_then(|e| e.to_str()) {
    Some(ext) => format!("{translated}.{ext}"),
    None => translated.to_string(),
  }
}

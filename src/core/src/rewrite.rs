/* src/core/src/rewrite.rs */

// Generated pages live one directory deeper than their sources (inside a
// locale folder), so every relative import specifier gains one leading
// `../`. This is a path-depth compensation, not a module resolver: bare and
// aliased specifiers pass through untouched.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

/// Source types that can contain import statements. Everything else is
/// copied verbatim.
const TEXTUAL_EXTENSIONS: &[&str] = &["astro", "js", "jsx", "mjs", "ts", "tsx"];

pub fn is_textual(path: &Path) -> bool {
  path
    .extension()
    .and_then(|e| e.to_str())
    .is_some_and(|ext| TEXTUAL_EXTENSIONS.iter().any(|t| ext.eq_ignore_ascii_case(t)))
}

fn from_clause_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| {
    // Static imports and re-exports, including clauses spanning lines:
    //   import { a,\n b } from './x'   export * from '../y'
    Regex::new(r#"(?s)(?P<stmt>\b(?:import|export)\b[^;'"]*?\bfrom\s*)(?P<q>['"])(?P<spec>\.{1,2}/[^'"]*)(?P<q2>['"])"#)
      .unwrap()
  })
}

fn dynamic_import_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| {
    Regex::new(r#"(?P<call>\bimport\s*\(\s*)(?P<q>['"])(?P<spec>\.{1,2}/[^'"]*)(?P<q2>['"])"#)
      .unwrap()
  })
}

fn side_effect_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| {
    // `import './global.css'` — the quote follows the keyword directly
    Regex::new(r#"(?P<kw>\bimport\s*)(?P<q>['"])(?P<spec>\.{1,2}/[^'"]*)(?P<q2>['"])"#).unwrap()
  })
}

/// Prepend one `../` to every relative import/reference specifier.
/// Locale-independent: callers reuse the result for every locale target of
/// the same source.
pub fn rewrite_imports(source: &str) -> String {
  let pass = from_clause_re().replace_all(source, "${stmt}${q}../${spec}${q2}");
  let pass = dynamic_import_re().replace_all(&pass, "${call}${q}../${spec}${q2}");
  let pass = side_effect_re().replace_all(&pass, "${kw}${q}../${spec}${q2}");
  pass.into_owned()
}

//! Import path resolution against an alias table.

use super::ProjectConfig;
use crate::document::DocumentPath;
use tracing::debug;

/// Resolve `import` as written in `importer` to an absolute path.
///
/// The first alias whose prefix matches decides, in declaration order, and
/// only its first substitution is used, relative to the config's own
/// directory. An alias with no substitutions, a
/// missing config or no matching prefix all resolve relative to the
/// importer's directory. Never fails: the result may not exist.
pub fn resolve(import: &str, importer: &DocumentPath, config: Option<&ProjectConfig>) -> DocumentPath {
    let matched = config.and_then(|config| {
        config
            .aliases
            .iter()
            .find(|rule| import.starts_with(rule.prefix.as_str()))
            .and_then(|rule| rule.substitutions.first().map(|sub| (config, rule, sub)))
    });

    if let Some((config, rule, substitution)) = matched {
        let rewritten = format!("{substitution}{}", &import[rule.prefix.len()..]);
        let resolved = config.directory().join(rewritten);
        debug!(import, alias = %rule.prefix, resolved = %resolved, "alias resolved");
        return resolved;
    }

    importer.parent().join(import)
}

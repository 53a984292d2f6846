//! `[django]` in setup.cfg.
//!
//! setup.cfg is read with raw INI rules: no interpolation, no inline
//! comments, lowercased option names, indented continuation lines and a
//! `[DEFAULT]` section whose options show through in every other section.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ResolveError;

/// File name read from the working directory only.
pub const FILE_NAME: &str = "setup.cfg";

/// Section holding the settings module.
pub const SECTION: &str = "django";
/// Option naming the settings module.
pub const SETTINGS_KEY: &str = "settings_module";

const DEFAULT_SECTION: &str = "DEFAULT";

/// Values read from a setup.cfg file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupCfgConfig {
    /// Path of the file that was read.
    pub path: PathBuf,
    /// Whether the `[django]` section exists.
    pub has_section: bool,
    /// Settings module, if the option held a non-empty value.
    pub settings: Option<String>,
}

/// Read setup.cfg from `dir`.
///
/// Returns `Ok(None)` if the file cannot be opened. A file that is not
/// valid UTF-8 is an error.
pub fn load(dir: &Path) -> Result<Option<SetupCfgConfig>, ResolveError> {
    let path = dir.join(FILE_NAME);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::InvalidData => {
            return Err(ResolveError::Io { path, source: e });
        }
        Err(e) => {
            debug!(path = %path.display(), error = %e, "setup.cfg not readable");
            return Ok(None);
        }
    };
    parse(&path, &content).map(Some)
}

/// Interpret setup.cfg content that was read from `path`.
pub fn parse(path: &Path, content: &str) -> Result<SetupCfgConfig, ResolveError> {
    let ini = Ini::parse(content).map_err(|(line, message)| ResolveError::Ini {
        path: path.to_path_buf(),
        line,
        message,
    })?;

    Ok(SetupCfgConfig {
        path: path.to_path_buf(),
        has_section: ini.has_section(SECTION),
        // A value that starts on a continuation line begins with a newline.
        settings: ini
            .get(SECTION, SETTINGS_KEY)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string),
    })
}

/// Parsed INI document.
#[derive(Debug, Default)]
struct Ini {
    defaults: HashMap<String, String>,
    sections: HashMap<String, HashMap<String, String>>,
}

impl Ini {
    /// Parse INI text. Errors carry the 1-based line number.
    fn parse(content: &str) -> Result<Self, (usize, String)> {
        let mut ini = Ini::default();
        let mut section: Option<String> = None;
        // Option a continuation line extends, with the indentation of the line that set it.
        let mut current: Option<(String, usize)> = None;

        for (index, raw) in content.lines().enumerate() {
            let lineno = index + 1;
            let trimmed = raw.trim();

            if trimmed.starts_with('#') || trimmed.starts_with(';') {
                continue;
            }
            if trimmed.is_empty() {
                // Blank lines belong to the current value; trailing ones are trimmed later.
                if let (Some(name), Some((key, _))) = (&section, &current) {
                    if let Some(value) = ini.section_mut(name).get_mut(key) {
                        value.push('\n');
                    }
                }
                continue;
            }

            let indent = raw.chars().take_while(|c| c.is_whitespace()).count();
            if let (Some(name), Some((key, option_indent))) = (&section, &current) {
                if indent > *option_indent {
                    let value = ini
                        .section_mut(name)
                        .get_mut(key)
                        .ok_or_else(|| (lineno, "continuation of unknown option".to_string()))?;
                    value.push('\n');
                    value.push_str(trimmed);
                    continue;
                }
            }

            if let Some(name) = section_header(trimmed) {
                if name != DEFAULT_SECTION && ini.sections.contains_key(name) {
                    return Err((lineno, format!("section [{name}] already exists")));
                }
                if name != DEFAULT_SECTION {
                    ini.sections.insert(name.to_string(), HashMap::new());
                }
                section = Some(name.to_string());
                current = None;
                continue;
            }

            let Some(name) = &section else {
                return Err((lineno, "file contains no section headers".to_string()));
            };

            let Some((key, value)) = split_option(trimmed) else {
                return Err((lineno, format!("cannot parse line: {trimmed:?}")));
            };
            let key = key.trim_end().to_lowercase();
            if key.is_empty() {
                return Err((lineno, format!("cannot parse line: {trimmed:?}")));
            }

            let options = ini.section_mut(name);
            if options.contains_key(&key) {
                return Err((
                    lineno,
                    format!("option {key:?} in section [{name}] already exists"),
                ));
            }
            options.insert(key.clone(), value.trim_start().to_string());
            current = Some((key, indent));
        }

        for value in ini
            .defaults
            .values_mut()
            .chain(ini.sections.values_mut().flat_map(HashMap::values_mut))
        {
            value.truncate(value.trim_end().len());
        }

        Ok(ini)
    }

    fn section_mut(&mut self, name: &str) -> &mut HashMap<String, String> {
        if name == DEFAULT_SECTION {
            &mut self.defaults
        } else {
            self.sections.entry(name.to_string()).or_default()
        }
    }

    /// `[DEFAULT]` never counts as a present section.
    fn has_section(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    /// Option value from `section`, falling back to `[DEFAULT]`.
    fn get(&self, section: &str, key: &str) -> Option<&str> {
        let options = self.sections.get(section)?;
        let key = key.to_lowercase();
        options
            .get(&key)
            .or_else(|| self.defaults.get(&key))
            .map(String::as_str)
    }
}

/// Section name from a `[name]` header line.
fn section_header(line: &str) -> Option<&str> {
    let inner = line.strip_prefix('[')?;
    let end = inner.rfind(']')?;
    let name = &inner[..end];
    (!name.is_empty()).then_some(name)
}

/// Split `key = value` or `key: value` at the first delimiter.
fn split_option(line: &str) -> Option<(&str, &str)> {
    let pos = line.find(['=', ':'])?;
    Some((&line[..pos], &line[pos + 1..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_str(content: &str) -> Result<SetupCfgConfig, ResolveError> {
        parse(Path::new("/project/setup.cfg"), content)
    }

    #[test]
    fn test_settings_module() {
        let config = parse_str("[django]\nsettings_module = ball.yarn\n").unwrap();
        assert!(config.has_section);
        assert_eq!(config.settings.as_deref(), Some("ball.yarn"));
    }

    #[test]
    fn test_colon_delimiter_and_key_case() {
        let config = parse_str("[django]\nSettings_Module: ball.yarn\n").unwrap();
        assert_eq!(config.settings.as_deref(), Some("ball.yarn"));
    }

    #[test]
    fn test_section_without_option() {
        let config = parse_str("[django]\nother = 1\n").unwrap();
        assert!(config.has_section);
        assert_eq!(config.settings, None);
    }

    #[test]
    fn test_empty_value_is_not_a_setting() {
        let config = parse_str("[django]\nsettings_module =\n").unwrap();
        assert!(config.has_section);
        assert_eq!(config.settings, None);
    }

    #[test]
    fn test_other_sections_only() {
        let config =
            parse_str("[metadata]\nname = ball\n\n[flake8]\nmax-line-length = 100\n").unwrap();
        assert!(!config.has_section);
        assert_eq!(config.settings, None);
    }

    #[test]
    fn test_section_names_are_case_sensitive() {
        let config = parse_str("[Django]\nsettings_module = ball.yarn\n").unwrap();
        assert!(!config.has_section);
        assert_eq!(config.settings, None);
    }

    #[test]
    fn test_default_section_shows_through() {
        let config =
            parse_str("[DEFAULT]\nsettings_module = ball.yarn\n\n[django]\nother = 1\n").unwrap();
        assert_eq!(config.settings.as_deref(), Some("ball.yarn"));
    }

    #[test]
    fn test_default_section_alone_is_not_django() {
        let config = parse_str("[DEFAULT]\nsettings_module = ball.yarn\n").unwrap();
        assert!(!config.has_section);
        assert_eq!(config.settings, None);
    }

    #[test]
    fn test_comments_and_no_inline_comment_stripping() {
        let config =
            parse_str("# top\n[django]\n; note\nsettings_module = ball.yarn # not a comment\n")
                .unwrap();
        assert_eq!(config.settings.as_deref(), Some("ball.yarn # not a comment"));
    }

    #[test]
    fn test_continuation_lines() {
        let config = parse_str("[django]\nsettings_module =\n    ball.yarn\n").unwrap();
        assert_eq!(config.settings.as_deref(), Some("ball.yarn"));
    }

    #[test]
    fn test_blank_line_inside_multiline_value() {
        let content = "[options]\ninstall_requires =\n    django\n\n    requests\n\n\
                       [django]\nsettings_module = ball.yarn\n";
        let config = parse_str(content).unwrap();
        assert_eq!(config.settings.as_deref(), Some("ball.yarn"));

        let ini = Ini::parse(content).unwrap();
        assert_eq!(ini.get("options", "install_requires"), Some("\ndjango\n\nrequests"));
    }

    #[test]
    fn test_trailing_blank_lines_are_trimmed() {
        let ini = Ini::parse("[django]\nsettings_module = ball.yarn\n\n\n[other]\n").unwrap();
        assert_eq!(ini.get("django", "settings_module"), Some("ball.yarn"));
    }

    #[test]
    fn test_comment_inside_multiline_value_is_skipped() {
        let ini = Ini::parse("[options]\npackages =\n    ball\n# yarn\n    spam\n").unwrap();
        assert_eq!(ini.get("options", "packages"), Some("\nball\nspam"));
    }

    #[test]
    fn test_indented_options_are_not_continuations() {
        let config =
            parse_str("[django]\n    other = 1\n    settings_module = ball.yarn\n").unwrap();
        assert_eq!(config.settings.as_deref(), Some("ball.yarn"));
    }

    #[test]
    fn test_deeper_indent_continues_indented_option() {
        let ini = Ini::parse("[django]\n  other = 1\n      settings_module = ball.yarn\n").unwrap();
        assert_eq!(ini.get("django", "other"), Some("1\nsettings_module = ball.yarn"));
        assert_eq!(ini.get("django", "settings_module"), None);
    }

    #[test]
    fn test_option_before_section_is_an_error() {
        let err = parse_str("settings_module = ball.yarn\n").unwrap_err();
        assert!(matches!(err, ResolveError::Ini { line: 1, .. }));
    }

    #[test]
    fn test_line_without_delimiter_is_an_error() {
        let err = parse_str("[django]\nsettings_module\n").unwrap_err();
        assert!(matches!(err, ResolveError::Ini { line: 2, .. }));
    }

    #[test]
    fn test_duplicate_section_is_an_error() {
        let err = parse_str("[django]\n[django]\n").unwrap_err();
        assert!(matches!(err, ResolveError::Ini { line: 2, .. }));
    }

    #[test]
    fn test_duplicate_option_is_an_error() {
        let err = parse_str("[django]\na = 1\nA = 2\n").unwrap_err();
        assert!(matches!(err, ResolveError::Ini { line: 3, .. }));
    }

    #[test]
    fn test_missing_file_is_absent() {
        let tmp = tempfile::tempdir().unwrap();
        assert_eq!(load(tmp.path()).unwrap(), None);
    }

    #[test]
    fn test_non_utf8_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let content = b"[django]\nsettings_module = \xff\xfe\n";
        fs::write(tmp.path().join(FILE_NAME), content).unwrap();

        let err = load(tmp.path()).unwrap_err();
        assert!(matches!(err, ResolveError::Io { .. }));
    }

    #[test]
    fn test_load_from_dir() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(
            tmp.path().join(FILE_NAME),
            "[django]\nsettings_module = ball.yarn\n",
        )
        .unwrap();

        let config = load(tmp.path()).unwrap().unwrap();
        assert_eq!(config.path, tmp.path().join(FILE_NAME));
        assert_eq!(config.settings.as_deref(), Some("ball.yarn"));
    }
}

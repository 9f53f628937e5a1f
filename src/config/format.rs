use std::fmt;
use std::path::Path;

/// The syntax a configuration file is parsed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// Flat `KEY=VALUE` lines.
    Env,
    /// Nested YAML mapping.
    Yaml,
}

impl ConfigFormat {
    /// Infers the format from the last dot-separated segment of the file name.
    ///
    /// Returns the format and whether the extension was recognised. Unknown or
    /// missing extensions fall back to [`ConfigFormat::Env`]. Dotfiles such as
    /// `.env` or `.env.test` resolve on their final segment, so `.env` is env
    /// and `.env.test` is not recognised.
    pub fn from_path(path: &Path) -> (Self, bool) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let ext = name.rsplit('.').next().unwrap_or_default();

        match ext.to_ascii_lowercase().as_str() {
            "env" => (Self::Env, true),
            "yaml" | "yml" => (Self::Yaml, true),
            _ => (Self::Env, false),
        }
    }

    /// Returns the extension segment of `path` as written, for diagnostics.
    pub(crate) fn extension_of(path: &Path) -> String {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match name.rsplit_once('.') {
            Some((_, ext)) => ext.to_string(),
            None => String::new(),
        }
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Env => f.write_str("env"),
            Self::Yaml => f.write_str("yaml"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_extensions() {
        assert_eq!(ConfigFormat::from_path(Path::new("a/b.env")), (ConfigFormat::Env, true));
        assert_eq!(ConfigFormat::from_path(Path::new("app.yaml")), (ConfigFormat::Yaml, true));
        assert_eq!(ConfigFormat::from_path(Path::new("app.YML")), (ConfigFormat::Yaml, true));
        assert_eq!(ConfigFormat::from_path(Path::new(".env")), (ConfigFormat::Env, true));
    }

    #[test]
    fn test_unknown_extension_falls_back_to_env() {
        assert_eq!(ConfigFormat::from_path(Path::new(".env.test")), (ConfigFormat::Env, false));
        assert_eq!(ConfigFormat::from_path(Path::new("config.toml")), (ConfigFormat::Env, false));
        assert_eq!(ConfigFormat::from_path(Path::new("settings")), (ConfigFormat::Env, false));
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(ConfigFormat::extension_of(Path::new("dir/.env.test")), "test");
        assert_eq!(ConfigFormat::extension_of(Path::new("settings")), "");
    }
}

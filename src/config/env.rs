//! Environment-style (`KEY=VALUE`) file parsing.
//!
//! Syntax (comments, `export`, quoting, `$VAR`/`${VAR}` substitution) is
//! handled by `dotenvy` without touching the process environment. Values are
//! kept as strings; the typed accessors coerce them at read time.

use toml::{Table, Value};

use super::source::{key_path, merge_at_path};

/// Parses the contents of an env file into a table with lowercased keys.
/// Dotted keys (`db.host`) are stored nested, like YAML keys.
///
/// Substitution prefers the process environment over keys defined earlier
/// in the same file; unknown names expand to an empty string.
pub fn parse_env(contents: &str) -> Result<Table, dotenvy::Error> {
    let mut table = Table::new();

    for item in dotenvy::from_read_iter(contents.as_bytes()) {
        let (key, value) = item?;
        merge_at_path(&mut table, &key_path(&key), Value::String(value));
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get<'a>(table: &'a Table, key: &str) -> &'a str {
        table[key].as_str().unwrap()
    }

    #[test]
    fn test_basic_pairs_are_lowercased() {
        let table = parse_env("ENV_STRING=test\nENV_NUMBER=1\n").unwrap();
        assert_eq!(get(&table, "env_string"), "test");
        assert_eq!(get(&table, "env_number"), "1");
        assert!(!table.contains_key("ENV_STRING"));
    }

    #[test]
    fn test_comments_blank_lines_and_export() {
        let table = parse_env("# leading comment\n\nexport COLOR=blue\nSHADE=dark # trailing\n").unwrap();
        assert_eq!(get(&table, "color"), "blue");
        assert_eq!(get(&table, "shade"), "dark");
    }

    #[test]
    fn test_quoted_values() {
        let table = parse_env("SINGLE='keep ${DRAGON_CFG_HOST}'\nDOUBLE=\"two words\"\nEMPTY=\n").unwrap();
        assert_eq!(get(&table, "single"), "keep ${DRAGON_CFG_HOST}");
        assert_eq!(get(&table, "double"), "two words");
        assert_eq!(get(&table, "empty"), "");
    }

    #[test]
    fn test_substitution_from_earlier_keys() {
        let table = parse_env(
            "DRAGON_CFG_HOST=example.com\nDRAGON_CFG_PORT=8080\nURL=\"https://${DRAGON_CFG_HOST}:${DRAGON_CFG_PORT}/api\"\n",
        )
        .unwrap();
        assert_eq!(get(&table, "url"), "https://example.com:8080/api");
    }

    #[test]
    fn test_unknown_reference_expands_to_empty() {
        let table = parse_env("A=x${DRAGON_CONFIG_SURELY_UNSET_VAR}y\n").unwrap();
        assert_eq!(get(&table, "a"), "xy");
    }

    #[test]
    fn test_dotted_keys_are_nested() {
        let table = parse_env("DB.HOST=localhost\ndb.port=5432\n").unwrap();
        assert_eq!(table["db"]["host"].as_str(), Some("localhost"));
        assert_eq!(table["db"]["port"].as_str(), Some("5432"));
    }

    #[test]
    fn test_later_duplicate_wins() {
        let table = parse_env("KEY=first\nkey=second\n").unwrap();
        assert_eq!(get(&table, "key"), "second");
    }

    #[test]
    fn test_missing_separator_is_error() {
        let result = parse_env("GOOD=1\nthis line is broken\n");
        assert!(matches!(result, Err(dotenvy::Error::LineParse(..))));
    }
}

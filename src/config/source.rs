//! Table merging and key addressing shared by every source.

use toml::{Table, Value};

/// Splits a dot-path into lowercased segments.
pub fn key_path(key: &str) -> Vec<String> {
    key.to_lowercase().split('.').map(str::to_string).collect()
}

/// Sets `value` at the nested `path`, creating intermediate tables and
/// replacing any non-table value found on the way. Tables are deep merged.
pub fn merge_at_path(table: &mut Table, path: &[String], value: Value) {
    let Some((first, rest)) = path.split_first() else {
        if let Value::Table(overlay) = value {
            deep_merge(table, overlay);
        }
        return;
    };

    if rest.is_empty() {
        match (table.get_mut(first), value) {
            (Some(Value::Table(base)), Value::Table(overlay)) => {
                deep_merge(base, overlay);
            }
            (_, value) => {
                table.insert(first.clone(), value);
            }
        }
        return;
    }

    if !matches!(table.get(first), Some(Value::Table(_))) {
        table.insert(first.clone(), Value::Table(Table::new()));
    }

    if let Some(Value::Table(nested)) = table.get_mut(first) {
        merge_at_path(nested, rest, value);
    }
}

/// Recursively merges `overlay` into `base`. Nested tables are merged; any
/// other value (arrays included) is replaced.
pub fn deep_merge(base: &mut Table, overlay: Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(Value::Table(base_table)), Value::Table(overlay_table)) => {
                deep_merge(base_table, overlay_table);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

/// Finds the value addressed by a case-insensitive dot-path.
///
/// Every source stores dotted keys nested (see [`normalize_keys`]), so the
/// path is walked one table per segment.
pub fn lookup<'a>(table: &'a Table, key: &str) -> Option<&'a Value> {
    let path = key_path(key);
    let (last, parents) = path.split_last()?;

    let mut current = table;
    for segment in parents {
        current = current.get(segment)?.as_table()?;
    }
    current.get(last)
}

/// Lowercases every key of the table and expands dotted keys (`db.host`)
/// into nested tables, recursing into nested tables and arrays. This is the
/// single key form every source is stored in. On a case-only collision the
/// entry visited last wins.
pub fn normalize_keys(table: Table) -> Table {
    let mut out = Table::new();
    for (key, value) in table {
        merge_at_path(&mut out, &key_path(&key), normalize_value(value));
    }
    out
}

pub(crate) fn normalize_value(value: Value) -> Value {
    match value {
        Value::Table(t) => Value::Table(normalize_keys(t)),
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_value).collect()),
        other => other,
    }
}

/// Collects the dot-paths of every leaf value, sorted.
pub fn leaf_keys(table: &Table) -> Vec<String> {
    let mut keys = Vec::new();
    collect_leaves(table, "", &mut keys);
    keys.sort();
    keys
}

fn collect_leaves(table: &Table, prefix: &str, out: &mut Vec<String>) {
    for (key, value) in table {
        let full = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::Table(nested) if !nested.is_empty() => collect_leaves(nested, &full, out),
            _ => out.push(full),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_table(toml_str: &str) -> Table {
        toml::from_str(toml_str).unwrap()
    }

    #[test]
    fn test_deep_merge_overrides_leaves_and_keeps_siblings() {
        let mut base = make_table(
            r#"
            name = "base"
            [db]
            host = "localhost"
            port = 5432
            "#,
        );
        let overlay = make_table(
            r#"
            [db]
            port = 6543
            "#,
        );
        deep_merge(&mut base, overlay);
        assert_eq!(base["name"].as_str(), Some("base"));
        assert_eq!(base["db"]["host"].as_str(), Some("localhost"));
        assert_eq!(base["db"]["port"].as_integer(), Some(6543));
    }

    #[test]
    fn test_deep_merge_replaces_arrays() {
        let mut base = make_table("list = [1, 2, 3]");
        deep_merge(&mut base, make_table("list = [9]"));
        assert_eq!(base["list"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_merge_at_path_creates_tables() {
        let mut table = make_table("db = \"scalar\"");
        merge_at_path(&mut table, &key_path("db.host"), Value::from("example.com"));
        merge_at_path(&mut table, &key_path("db.port"), Value::Integer(1));
        assert_eq!(table["db"]["host"].as_str(), Some("example.com"));
        assert_eq!(table["db"]["port"].as_integer(), Some(1));
    }

    #[test]
    fn test_lookup_nested_and_case_insensitive() {
        let table = make_table(
            r#"
            [server]
            host = "example.com"
            "#,
        );
        assert_eq!(lookup(&table, "server.host").and_then(Value::as_str), Some("example.com"));
        assert_eq!(lookup(&table, "SERVER.Host").and_then(Value::as_str), Some("example.com"));
        assert!(lookup(&table, "server.port").is_none());
        assert!(lookup(&table, "server.host.deeper").is_none());
    }

    #[test]
    fn test_normalize_keys_expands_dotted_keys() {
        let mut table = Table::new();
        table.insert("App.Name".into(), Value::from("flat"));
        table.insert("app".into(), Value::Table(make_table("version = 2")));

        let table = normalize_keys(table);
        assert_eq!(table["app"]["name"].as_str(), Some("flat"));
        assert_eq!(table["app"]["version"].as_integer(), Some(2));
        assert_eq!(lookup(&table, "APP.name").and_then(Value::as_str), Some("flat"));
        assert_eq!(leaf_keys(&table), vec!["app.name", "app.version"]);
    }

    #[test]
    fn test_lookup_through_scalar_is_none() {
        let table = make_table("db = \"scalar\"");
        assert!(lookup(&table, "db.host").is_none());
        assert!(lookup(&table, "").is_none());
    }

    #[test]
    fn test_normalize_keys_recurses() {
        let table = normalize_keys(make_table(
            r#"
            TOP = 1
            [Nested]
            InnerKey = "v"
            "#,
        ));
        assert_eq!(table["top"].as_integer(), Some(1));
        assert_eq!(table["nested"]["innerkey"].as_str(), Some("v"));
    }

    #[test]
    fn test_leaf_keys() {
        let table = make_table(
            r#"
            a = 1
            [b]
            c = 2
            [b.d]
            e = 3
            "#,
        );
        assert_eq!(leaf_keys(&table), vec!["a", "b.c", "b.d.e"]);
    }
}

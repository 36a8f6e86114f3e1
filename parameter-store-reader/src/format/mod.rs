use std::{fmt, str::FromStr};

use crate::{
    configs::FormatOptions,
    domain::{CollisionPolicy, FlatMap, KeyTransform, last_segment},
    error::ReaderError,
    tree::build_tree,
};

const FORMATS: [&str; 5] = ["line", "json", "pretty-json", "yaml", "env"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// `key:value` per line.
    #[default]
    Line,
    Json,
    PrettyJson,
    Yaml,
    /// `KEY=value` per line, using the last path segment as the key.
    Env,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Line => "line",
            OutputFormat::Json => "json",
            OutputFormat::PrettyJson => "pretty-json",
            OutputFormat::Yaml => "yaml",
            OutputFormat::Env => "env",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = ReaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "line" => Ok(OutputFormat::Line),
            "json" => Ok(OutputFormat::Json),
            "pretty-json" => Ok(OutputFormat::PrettyJson),
            "yaml" => Ok(OutputFormat::Yaml),
            "env" => Ok(OutputFormat::Env),
            other => Err(ReaderError::UnsupportedFormat {
                format: other.to_string(),
            }),
        }
    }
}

pub fn valid_formats() -> &'static [&'static str] {
    &FORMATS
}

pub fn is_valid_format(format: &str) -> bool {
    FORMATS.contains(&format)
}

/// Renders a flat result in the configured format.
pub fn render(data: &FlatMap, options: &FormatOptions) -> Result<Vec<u8>, ReaderError> {
    match options.format {
        OutputFormat::Line => Ok(line_format(data)),
        OutputFormat::Env => env_format(data, &options.transform, options.on_collision),
        OutputFormat::Json => Ok(serde_json::to_vec(&build_tree(data)?)?),
        OutputFormat::PrettyJson => Ok(serde_json::to_vec_pretty(&build_tree(data)?)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(&build_tree(data)?)?.into_bytes()),
    }
}

pub fn line_format(data: &FlatMap) -> Vec<u8> {
    data.iter()
        .map(|(key, value)| format!("{key}:{value}"))
        .collect::<Vec<_>>()
        .join("\n")
        .into_bytes()
}

pub fn env_format(
    data: &FlatMap,
    transform: &KeyTransform,
    on_collision: CollisionPolicy,
) -> Result<Vec<u8>, ReaderError> {
    let mut seen = FlatMap::new();
    let mut lines = Vec::with_capacity(data.len());

    for (key, value) in data {
        let name = transform.apply_to_segment(last_segment(key));
        if seen.contains_key(&name) {
            // logs or fails
            on_collision.insert(&mut seen, name, value.clone())?;
            continue;
        }
        lines.push(format!("{name}={value}"));
        seen.insert(name, value.clone());
    }

    Ok(lines.join("\n").into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(entries: &[(&str, &str)]) -> FlatMap {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn render_str(data: &FlatMap, format: OutputFormat) -> String {
        let options = FormatOptions {
            format,
            ..Default::default()
        };
        String::from_utf8(render(data, &options).unwrap()).unwrap()
    }

    #[test]
    fn test_format_validation() {
        assert!(is_valid_format("line"));
        assert!(is_valid_format("pretty-json"));
        assert!(is_valid_format("env"));
        assert!(!is_valid_format("xml"));
        assert!(!is_valid_format("LINE"));
    }

    #[test]
    fn test_parse_unknown_format() {
        let err = "xml".parse::<OutputFormat>().unwrap_err();
        assert!(matches!(err, ReaderError::UnsupportedFormat { format } if format == "xml"));
    }

    #[test]
    fn test_parse_matches_display() {
        for name in valid_formats() {
            let format: OutputFormat = name.parse().unwrap();
            assert_eq!(format.to_string(), *name);
        }
    }

    #[test]
    fn test_line_format_single_entry() {
        let out = line_format(&flat(&[("/key1/key2/final1", "value1")]));
        assert_eq!(out, b"/key1/key2/final1:value1");
    }

    #[test]
    fn test_env_format_uses_last_segment() {
        let out = env_format(
            &flat(&[("/key1/key2/FINAL1", "value1"), ("/key1/key2/FINAL2", "value2")]),
            &KeyTransform::default(),
            CollisionPolicy::KeepFirst,
        )
        .unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines: Vec<&str> = text.lines().collect();
        lines.sort();
        assert_eq!(lines, vec!["FINAL1=value1", "FINAL2=value2"]);
    }

    #[test]
    fn test_env_format_applies_transform() {
        let out = env_format(
            &flat(&[("/app/db_host", "localhost")]),
            &KeyTransform::new("app_", true),
            CollisionPolicy::KeepFirst,
        )
        .unwrap();
        assert_eq!(out, b"APP_DB_HOST=localhost");
    }

    #[test]
    fn test_env_format_keeps_first_on_collision() {
        let out = env_format(
            &flat(&[("/a/port", "1"), ("/b/port", "2")]),
            &KeyTransform::default(),
            CollisionPolicy::KeepFirst,
        )
        .unwrap();
        assert_eq!(out, b"port=1");
    }

    #[test]
    fn test_env_format_rejects_collision_when_strict() {
        let err = env_format(
            &flat(&[("/a/port", "1"), ("/b/port", "2")]),
            &KeyTransform::default(),
            CollisionPolicy::Reject,
        )
        .unwrap_err();
        assert!(matches!(err, ReaderError::KeyCollision { key } if key == "port"));
    }

    #[test]
    fn test_json_renders_tree() {
        let data = flat(&[("/db/user", "admin"), ("/db/password", "secret")]);
        assert_eq!(
            render_str(&data, OutputFormat::Json),
            r#"{"db":{"password":"secret","user":"admin"}}"#
        );
    }

    #[test]
    fn test_pretty_json_uses_two_spaces() {
        let data = flat(&[("/db/user", "admin")]);
        assert_eq!(
            render_str(&data, OutputFormat::PrettyJson),
            "{\n  \"db\": {\n    \"user\": \"admin\"\n  }\n}"
        );
    }

    #[test]
    fn test_yaml_renders_block_style() {
        let data = flat(&[("/db/user", "admin"), ("/port", "8080")]);
        assert_eq!(
            render_str(&data, OutputFormat::Yaml),
            "db:\n  user: admin\nport: '8080'\n"
        );
    }

    #[test]
    fn test_tree_conflict_surfaces_from_render() {
        let data = flat(&[("/a", "1"), ("/a/b", "2")]);
        let options = FormatOptions {
            format: OutputFormat::Json,
            ..Default::default()
        };
        assert!(matches!(
            render(&data, &options),
            Err(ReaderError::Conflict { .. })
        ));
    }
}

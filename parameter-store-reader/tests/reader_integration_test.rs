use std::{fs, sync::Arc};

use base64::{Engine, engine::general_purpose::STANDARD};
use parameter_store_reader::{
    ReaderError,
    configs::{FetchConfig, FormatOptions, ReaderConfig, SessionConfig},
    domain::{CollisionPolicy, KeyTransform, Parameter},
    format::{OutputFormat, render},
    reader::{run, write_output},
    store::{ParameterStore, adapters::local_store::LocalParameterStore},
    tree::{build_tree, flatten},
};
use tempfile::tempdir;

fn seeded_store(page_size: usize) -> Arc<LocalParameterStore> {
    let mut parameters = vec![
        Parameter::new("/prod/api/db/host", "db.internal"),
        Parameter::new("/prod/api/db/password", "s3cr3t"),
        Parameter::new("/prod/api/db/user", "api"),
        Parameter::new("/prod/api/port", "8080"),
        Parameter::new("/prod/api/feature/enabled", "true"),
        Parameter::new("/prod/web/port", "443"),
    ];
    for i in 0..5 {
        parameters.push(Parameter::new(format!("/prod/api/workers/w{i}"), format!("{i}")));
    }
    Arc::new(LocalParameterStore::with_parameters(parameters).page_size(page_size))
}

fn recursive(path: &str) -> FetchConfig {
    FetchConfig {
        recursive: true,
        ..FetchConfig::new(path)
    }
}

fn reader_config(fetch: FetchConfig, format: OutputFormat) -> ReaderConfig {
    ReaderConfig {
        fetch,
        format: FormatOptions {
            format,
            ..Default::default()
        },
        session: SessionConfig::default(),
        output_file: None,
    }
}

#[tokio::test]
async fn test_paginated_fetch_collects_union_of_pages() {
    let source = seeded_store(3);
    let store = ParameterStore::new(Arc::clone(&source));

    let values = store
        .fetch_path(
            &recursive("/prod/api"),
            &KeyTransform::default(),
            CollisionPolicy::KeepFirst,
        )
        .await
        .unwrap();

    // 10 parameters under /prod/api at 3 per page
    assert_eq!(values.len(), 10);
    assert_eq!(source.request_count(), 4);
    assert_eq!(values["/db/password"], "s3cr3t");
    assert_eq!(values["/workers/w4"], "4");
    assert_eq!(values["/port"], "8080");
    assert!(values.keys().all(|key| !key.starts_with("/prod")));
}

#[tokio::test]
async fn test_non_recursive_reads_one_level() {
    let store = ParameterStore::new(seeded_store(2));

    let values = store
        .fetch_path(
            &FetchConfig::new("/prod/api/"),
            &KeyTransform::default(),
            CollisionPolicy::KeepFirst,
        )
        .await
        .unwrap();

    assert_eq!(values.len(), 1);
    assert_eq!(values["/port"], "8080");
}

#[tokio::test]
async fn test_tree_round_trip_of_fetched_values() {
    let store = ParameterStore::new(seeded_store(4));
    let values = store
        .fetch_path(
            &recursive("/prod"),
            &KeyTransform::default(),
            CollisionPolicy::KeepFirst,
        )
        .await
        .unwrap();

    let tree = build_tree(&values).unwrap();
    assert_eq!(flatten(&tree), values);
}

#[tokio::test]
async fn test_pretty_json_of_branch() {
    let out = run(
        &reader_config(recursive("/prod/api/db"), OutputFormat::PrettyJson),
        seeded_store(10),
    )
    .await
    .unwrap();

    let expected = r#"{
  "host": "db.internal",
  "password": "s3cr3t",
  "user": "api"
}"#;
    assert_eq!(String::from_utf8(out).unwrap(), expected);
}

#[tokio::test]
async fn test_yaml_of_nested_branch() {
    let out = run(
        &reader_config(recursive("/prod/api/feature"), OutputFormat::Yaml),
        seeded_store(10),
    )
    .await
    .unwrap();

    let parsed: serde_yaml::Value = serde_yaml::from_slice(&out).unwrap();
    assert_eq!(parsed["enabled"], serde_yaml::Value::String("true".into()));
}

#[tokio::test]
async fn test_env_output_with_prefix_and_upper_case() {
    let mut config = reader_config(recursive("/prod/api/db"), OutputFormat::Env);
    config.format.transform = KeyTransform::new("db_", true);

    let out = run(&config, seeded_store(2)).await.unwrap();
    let text = String::from_utf8(out).unwrap();
    let mut lines: Vec<&str> = text.lines().collect();
    lines.sort();

    assert_eq!(
        lines,
        vec!["DB_HOST=db.internal", "DB_PASSWORD=s3cr3t", "DB_USER=api"]
    );
}

#[tokio::test]
async fn test_base64_values_decode_to_originals() {
    let mut fetch = recursive("/prod/api/db");
    fetch.base64_encode = true;

    let out = run(&reader_config(fetch, OutputFormat::Line), seeded_store(2))
        .await
        .unwrap();
    let text = String::from_utf8(out).unwrap();

    for line in text.lines() {
        let (key, value) = line.split_once(':').unwrap();
        let decoded = String::from_utf8(STANDARD.decode(value).unwrap()).unwrap();
        match key {
            "/host" => assert_eq!(decoded, "db.internal"),
            "/password" => assert_eq!(decoded, "s3cr3t"),
            "/user" => assert_eq!(decoded, "api"),
            other => panic!("unexpected key {other}"),
        }
    }
}

#[tokio::test]
async fn test_unknown_branch_is_empty_result() {
    let result = run(
        &reader_config(recursive("/staging"), OutputFormat::Json),
        seeded_store(2),
    )
    .await;
    assert!(matches!(result, Err(ReaderError::EmptyResult { path }) if path == "/staging"));
}

#[tokio::test]
async fn test_single_parameter_missing() {
    let result = run(
        &reader_config(FetchConfig::new("/prod/api/nope"), OutputFormat::Line),
        seeded_store(2),
    )
    .await;
    assert!(matches!(result, Err(ReaderError::NotFound { .. })));
}

#[tokio::test]
async fn test_include_path_output_to_file() {
    let mut fetch = recursive("/prod/web");
    fetch.include_path = true;
    let out = run(&reader_config(fetch, OutputFormat::Line), seeded_store(2))
        .await
        .unwrap();

    let dir = tempdir().unwrap();
    let path = dir.path().join("params.txt");
    write_output(&out, Some(path.as_path())).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "/prod/web/port:443\n");
}

#[test]
fn test_render_rejects_conflicting_tree() {
    let data = [("/a".to_string(), "1".to_string()), ("/a/b".to_string(), "2".to_string())]
        .into_iter()
        .collect();
    let options = FormatOptions {
        format: OutputFormat::Yaml,
        ..Default::default()
    };
    assert!(matches!(
        render(&data, &options),
        Err(ReaderError::Conflict { .. })
    ));
}

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use ragpack_core::config::resolve_with_base;
use ragpack_core::types::{ChunkType, DocumentChunk};
use ragpack_core::{ChunkingConfig, ChunkingStrategy, Config, Error, OptimizationOptions};

fn write_config(dir: &Path, body: &str) -> std::path::PathBuf {
    let path = dir.join("ragpack.toml");
    fs::write(&path, body).unwrap();
    path
}

#[test]
fn partial_sections_fall_back_to_defaults() {
    let tmp = TempDir::new().unwrap();
    let path = write_config(
        tmp.path(),
        "[chunking]\nstrategy = \"late\"\nchunk_size = 256\n\n[optimization]\ntoken_budget = 4000\n",
    );
    let config = Config::from_file(&path).expect("load");

    let chunking = config.chunking().expect("chunking");
    assert_eq!(chunking.strategy, ChunkingStrategy::Contextual);
    assert_eq!(chunking.chunk_size, 256);
    assert_eq!(chunking.chunk_overlap, ChunkingConfig::default().chunk_overlap);

    let options = config.optimization().expect("optimization");
    assert_eq!(options.token_budget, 4000);
    assert_eq!(options.max_tokens(), 3600);
    assert_eq!(options.full_document_threshold, 3);
}

#[test]
fn missing_sections_use_defaults() {
    let tmp = TempDir::new().unwrap();
    let path = write_config(tmp.path(), "[tokenizer]\npath = \"models/tokenizer.json\"\n");
    let config = Config::from_file(&path).expect("load");
    assert_eq!(config.chunking().unwrap(), ChunkingConfig::default());
    assert_eq!(config.optimization().unwrap(), OptimizationOptions::default());
    assert_eq!(config.get::<String>("tokenizer.path").unwrap(), "models/tokenizer.json");
    assert!(config.get::<String>("tokenizer.missing").is_err());
}

#[test]
fn invalid_file_values_fail_on_load() {
    let tmp = TempDir::new().unwrap();
    let path = write_config(tmp.path(), "[chunking]\nchunk_size = 100\nchunk_overlap = 100\n");
    assert!(Config::from_file(&path).is_err());

    let path = write_config(tmp.path(), "[chunking]\nstrategy = \"hierarchical\"\n");
    let err = Config::from_file(&path).err().expect("unknown strategy");
    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::InvalidConfig(_))));
}

#[test]
fn missing_config_file_is_not_found() {
    let tmp = TempDir::new().unwrap();
    let err = Config::from_file(&tmp.path().join("absent.toml")).err().expect("missing file");
    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::NotFound(_))));
}

#[test]
fn built_in_defaults_are_valid() {
    let config = Config::defaults();
    assert_eq!(config.chunking().unwrap(), ChunkingConfig::default());
    assert_eq!(config.get::<usize>("optimization.token_budget").unwrap(), 10_000);
    assert!(ChunkingConfig::default().validate().is_ok());
}

#[test]
fn relative_paths_resolve_against_base() {
    let base = Path::new("/srv/ragpack");
    assert_eq!(resolve_with_base(base, "models/t.json"), base.join("models/t.json"));
    assert_eq!(resolve_with_base(base, "/abs/t.json"), Path::new("/abs/t.json"));
}

#[test]
fn chunk_types_classify_leading_content() {
    assert_eq!(ChunkType::classify("## Install\nsteps"), ChunkType::Section);
    assert_eq!(ChunkType::classify("  ```rust\nfn main() {}\n```"), ChunkType::Code);
    assert_eq!(ChunkType::classify("#hashtag is not a heading"), ChunkType::Text);
    assert_eq!(ChunkType::classify("####### seven"), ChunkType::Text);
}

#[test]
fn chunk_serializes_type_field() {
    let chunk = DocumentChunk {
        id: "doc:0".into(),
        doc_id: "doc".into(),
        content: "## Title".into(),
        index: 0,
        total_chunks: 1,
        start_offset: 0,
        end_offset: 8,
        token_count: 2,
        chunk_type: ChunkType::Section,
        content_hash: "abc".into(),
        context: None,
    };
    let value = serde_json::to_value(&chunk).unwrap();
    assert_eq!(value["type"], "section");
    assert!(value.get("context").is_none());
    let back: DocumentChunk = serde_json::from_value(value).unwrap();
    assert_eq!(back, chunk);
}

#[test]
fn error_messages_name_the_problem() {
    assert_eq!(Error::InvalidConfig("chunk_size must be greater than 0".into()).to_string(), "Invalid configuration: chunk_size must be greater than 0");
    assert_eq!(Error::NotFound("config file x.toml".into()).to_string(), "Not found: config file x.toml");
}

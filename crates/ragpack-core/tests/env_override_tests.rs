use std::fs;
use tempfile::TempDir;

use ragpack_core::{ChunkingStrategy, Config};

// Kept in its own test binary: it mutates process environment variables.
#[test]
fn app_env_vars_override_file_values() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("ragpack.toml");
    fs::write(&path, "[chunking]\nchunk_size = 128\nstrategy = \"semantic\"\n\n[optimization]\ntoken_budget = 2000\n").unwrap();

    std::env::set_var("APP_CHUNKING__CHUNK_SIZE", "256");
    std::env::set_var("APP_OPTIMIZATION__TARGET_UTILIZATION", "0.5");
    let config = Config::from_file(&path);
    std::env::remove_var("APP_CHUNKING__CHUNK_SIZE");
    std::env::remove_var("APP_OPTIMIZATION__TARGET_UTILIZATION");

    let config = config.expect("load");
    let chunking = config.chunking().unwrap();
    assert_eq!(chunking.chunk_size, 256, "env wins over the file");
    assert_eq!(chunking.strategy, ChunkingStrategy::Semantic, "untouched keys come from the file");
    let options = config.optimization().unwrap();
    assert_eq!(options.token_budget, 2000);
    assert_eq!(options.max_tokens(), 1000);
}

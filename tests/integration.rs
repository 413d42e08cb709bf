use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const CORPUS: &str = r#"[
  {
    "title": "Bone Density Study",
    "summary": "Results: Astronauts showed significant bone loss during long missions. Impacts: Bone loss limits mission duration for crews. Knowledge Gaps: Recovery after return to Earth is poorly understood."
  },
  {
    "title": "Plant Growth in Microgravity",
    "summary": "Results: Arabidopsis roots grew in random directions without gravity. Areas_of Scientific Progress: Root gravitropism signaling was mapped."
  },
  {
    "title": "Radiation Exposure Survey",
    "summary": "Cosmic radiation doses were measured on the station. Shielding reduced exposure for crew members."
  }
]"#;

fn desk_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("desk");
    path
}

fn write_config(root: &Path, extra: &str) -> PathBuf {
    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();

    let config_content = format!(
        r#"[corpus]
path = "../data/summaries.json"

[embedding]
provider = "hashed"
dims = 384

[retrieval]
relevance_threshold = 0.30
{}"#,
        extra
    );

    let config_path = config_dir.join("desk.toml");
    fs::write(&config_path, config_content).unwrap();
    config_path
}

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let data_dir = root.join("data");
    fs::create_dir_all(&data_dir).unwrap();
    fs::write(data_dir.join("summaries.json"), CORPUS).unwrap();

    let config_path = write_config(&root, "");
    (tmp, config_path)
}

fn run_desk(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = desk_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap_or_else(|e| panic!("Failed to run desk binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

fn ask_json(config_path: &Path, query: &str) -> serde_json::Value {
    let (stdout, stderr, success) = run_desk(config_path, &["ask", query, "--json"]);
    assert!(success, "ask failed: stdout={}, stderr={}", stdout, stderr);
    serde_json::from_str(&stdout)
        .unwrap_or_else(|e| panic!("ask --json is not JSON ({}): {}", e, stdout))
}

#[test]
fn test_ask_returns_requested_section() {
    let (_tmp, config_path) = setup_test_env();

    let json = ask_json(&config_path, "bone loss results");
    assert_eq!(json["title"], "Bone Density Study — Results");
    assert_eq!(
        json["summary"],
        "Astronauts showed significant bone loss during long missions."
    );
}

#[test]
fn test_ask_impact_intent() {
    let (_tmp, config_path) = setup_test_env();

    let json = ask_json(&config_path, "impacts of bone loss");
    assert_eq!(json["title"], "Bone Density Study — Impacts");
    assert_eq!(json["summary"], "Bone loss limits mission duration for crews.");
}

#[test]
fn test_ask_knowledge_gaps_last_section() {
    let (_tmp, config_path) = setup_test_env();

    let json = ask_json(&config_path, "knowledge gaps in bone loss recovery");
    assert_eq!(json["title"], "Bone Density Study — Knowledge Gaps");
    assert_eq!(
        json["summary"],
        "Recovery after return to Earth is poorly understood."
    );
}

#[test]
fn test_ask_underscored_label() {
    let (_tmp, config_path) = setup_test_env();

    let json = ask_json(&config_path, "arabidopsis roots progress");
    assert_eq!(
        json["title"],
        "Plant Growth in Microgravity — Areas_of Scientific Progress"
    );
    assert_eq!(json["summary"], "Root gravitropism signaling was mapped.");
}

#[test]
fn test_ask_without_intent_returns_full_summary() {
    let (_tmp, config_path) = setup_test_env();

    let json = ask_json(&config_path, "radiation shielding doses");
    assert_eq!(json["title"], "Radiation Exposure Survey");
    assert_eq!(
        json["summary"],
        "Cosmic radiation doses were measured on the station. Shielding reduced exposure for crew members."
    );
}

#[test]
fn test_ask_text_output_breaks_sentences() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_desk(&config_path, &["ask", "radiation shielding doses"]);
    assert!(success, "ask failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.starts_with("Radiation Exposure Survey\n"));
    assert!(stdout.contains("Cosmic radiation doses were measured on the station.\nShielding"));
}

#[test]
fn test_ask_unrelated_query_has_no_match() {
    let (_tmp, config_path) = setup_test_env();

    let json = ask_json(&config_path, "tell me about volcanoes");
    assert_eq!(json["title"], "");
    assert_eq!(json["summary"], "No relevant summary found.");
}

#[test]
fn test_ask_below_threshold_ignores_intent() {
    let (_tmp, config_path) = setup_test_env();

    // Closest document scores under 0.30; the "result" intent must not rescue it.
    let json = ask_json(&config_path, "radiation results");
    assert_eq!(json["summary"], "No relevant summary found.");
}

#[test]
fn test_ask_threshold_is_configurable() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    fs::create_dir_all(root.join("data")).unwrap();
    fs::write(root.join("data/summaries.json"), CORPUS).unwrap();
    let config_path = write_config(root, "");
    let lowered = fs::read_to_string(&config_path)
        .unwrap()
        .replace("relevance_threshold = 0.30", "relevance_threshold = 0.10");
    fs::write(&config_path, lowered).unwrap();

    let json = ask_json(&config_path, "radiation results");
    assert_eq!(json["title"], "Bone Density Study — Results");
}

#[test]
fn test_ask_empty_query() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_desk(&config_path, &["ask", "   "]);
    assert!(success);
    assert_eq!(stdout, "Please enter a question.\n");
}

#[test]
fn test_empty_query_skips_corpus_load() {
    let tmp = TempDir::new().unwrap();
    // No corpus file on disk.
    let config_path = write_config(tmp.path(), "");

    let (stdout, stderr, success) = run_desk(&config_path, &["ask", ""]);
    assert!(success, "stderr={}", stderr);
    assert_eq!(stdout, "Please enter a question.\n");
}

#[test]
fn test_sections_lists_parsed_sections() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_desk(&config_path, &["sections"]);
    assert!(success, "sections failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("[0] Bone Density Study"));
    assert!(stdout.contains("    Impacts: Bone loss limits mission duration for crews.\n"));
    assert!(stdout.contains("[2] Radiation Exposure Survey\n    (no labeled sections)"));
}

#[test]
fn test_sections_single_position() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_desk(&config_path, &["sections", "1"]);
    assert!(success);
    assert!(stdout.contains("[1] Plant Growth in Microgravity"));
    assert!(!stdout.contains("Bone Density Study"));

    let (_, stderr, success) = run_desk(&config_path, &["sections", "9"]);
    assert!(!success);
    assert!(stderr.contains("no document at position 9"));
}

#[test]
fn test_intents_custom_catalog() {
    let tmp = TempDir::new().unwrap();
    let config_path = write_config(
        tmp.path(),
        r#"
[[catalog.intents]]
key = "gap"
labels = ["Knowledge Gaps"]
"#,
    );

    let (stdout, stderr, success) = run_desk(&config_path, &["intents"]);
    assert!(success, "intents failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("gap"));
    assert!(stdout.contains("Knowledge Gaps"));
    assert!(!stdout.contains("impact"));
}

#[test]
fn test_stats() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_desk(&config_path, &["stats"]);
    assert!(success, "stats failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("Documents:   3"));
    assert!(stdout.contains("Model:       hashed"));
    assert!(stdout.contains("Dimensions:  384"));
    assert!(stdout.contains("Without sections: 1"));
}

#[test]
fn test_missing_corpus_fails() {
    let tmp = TempDir::new().unwrap();
    let config_path = write_config(tmp.path(), "");

    let (_, stderr, success) = run_desk(&config_path, &["ask", "bone loss results"]);
    assert!(!success);
    assert!(stderr.contains("Failed to read corpus file"));
}

#[test]
fn test_malformed_corpus_fails() {
    let (tmp, config_path) = setup_test_env();
    fs::write(tmp.path().join("data/summaries.json"), "{ not json").unwrap();

    let (_, stderr, success) = run_desk(&config_path, &["stats"]);
    assert!(!success);
    assert!(stderr.contains("Failed to parse corpus file"));
}

#[test]
fn test_invalid_threshold_rejected() {
    let (_tmp, config_path) = setup_test_env();
    let broken = fs::read_to_string(&config_path)
        .unwrap()
        .replace("relevance_threshold = 0.30", "relevance_threshold = 1.5");
    fs::write(&config_path, broken).unwrap();

    let (_, _, success) = run_desk(&config_path, &["intents"]);
    assert!(!success);
}

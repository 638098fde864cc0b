//! Harness config loading and console routing
//! Run with: cargo test --test harness_config

mod common;

use std::io::Write;

use common::ensure_init;
use endpointfs::application::console::{run_line, ConsoleOutcome};
use endpointfs::application::errors::ConfigError;
use endpointfs::infrastructure::config::Config;
use endpointfs::plugins::EndpointManager;

const CONFIG: &str = "\
mounts:
  - plugin: skills
    path: /skills
    config:
      skill_name: demo-skill
      metadata: owner=tests
      cache_ttl_seconds: 60
  - plugin: summaryfs
    path: /summary/
";

fn output(manager: &EndpointManager, line: &str) -> String {
    match run_line(manager, line).unwrap() {
        Some(ConsoleOutcome::Output(text)) => text,
        other => panic!("expected output for {:?}, got {:?}", line, other),
    }
}

fn load() -> EndpointManager {
    ensure_init();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(CONFIG.as_bytes()).unwrap();
    let config = Config::load(file.path()).unwrap();
    EndpointManager::from_config(&config).unwrap()
}

#[test]
fn test_load_mounts_from_yaml() {
    let manager = load();
    let mounts = manager.list_mounts();
    assert_eq!(mounts.len(), 2);
    assert_eq!((mounts[0].path.as_str(), mounts[0].plugin.as_str()), ("/skills", "skillsfs"));
    assert_eq!((mounts[1].path.as_str(), mounts[1].plugin.as_str()), ("/summary", "summaryfs"));
    assert_eq!(output(&manager, "mounts"), "/skills         skillsfs\n/summary        summaryfs\n");
}

#[test]
fn test_mount_config_reaches_endpoint() {
    let manager = load();
    assert_eq!(output(&manager, "cat /skills/metadata"), "owner=tests");
    let status: serde_json::Value = serde_json::from_str(&output(&manager, "cat /skills/status")).unwrap();
    assert_eq!(status["skill"], "demo-skill");
    assert_eq!(status["state"], "idle");
}

#[test]
fn test_console_session() {
    let manager = load();
    assert_eq!(output(&manager, "ls"), "skills/\nsummary/\n");

    let listing = output(&manager, "ls /skills");
    let names: Vec<_> = listing.lines().filter_map(|l| l.split_whitespace().next()).collect();
    assert_eq!(names, vec!["metadata", "instructions", "execute", "result", "status", "log"]);

    assert_eq!(output(&manager, "write /skills/execute {\"n\": 3}"), "wrote 8 bytes to /skills/execute\n");
    let result = output(&manager, "cat /skills/result");
    assert!(result.starts_with("Skill: demo-skill\n"));
    assert!(result.contains("Parameters:\n{\"n\": 3}\n"));
    assert_eq!(output(&manager, "cat /skills/result 0 6"), "Skill:");

    let stat: serde_json::Value = serde_json::from_str(&output(&manager, "stat /skills/result")).unwrap();
    assert_eq!(stat["name"], "result");
    assert_eq!(stat["size"].as_u64().unwrap() as usize, result.len());

    assert!(output(&manager, "readme /summary").starts_with("# SummaryFS\n"));
    assert_eq!(run_line(&manager, "quit").unwrap(), Some(ConsoleOutcome::Quit));
}

#[test]
fn test_console_errors() {
    let manager = load();
    assert_eq!(
        run_line(&manager, "cat /nowhere/file").unwrap_err().to_string(),
        "unsupported path: /nowhere/file"
    );
    assert_eq!(
        run_line(&manager, "write /skills/status x").unwrap_err().to_string(),
        "write not supported on /status"
    );
    assert_eq!(
        run_line(&manager, "ls /skills/log").unwrap_err().to_string(),
        "not a directory: /log"
    );
    assert_eq!(
        run_line(&manager, "stat /skills/missing").unwrap_err().to_string(),
        "unsupported path: /skills/missing"
    );
}

#[test]
fn test_unknown_plugin_and_missing_file() {
    ensure_init();
    let config: Config = serde_yaml::from_str("mounts:\n  - plugin: ftpfs\n    path: /ftp\n").unwrap();
    assert!(EndpointManager::from_config(&config).is_err());

    let err = Config::load("/definitely/not/here.yaml").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_default_config_mounts_all_plugins() {
    let manager = EndpointManager::from_config(&Config::default()).unwrap();
    let plugins: Vec<_> = manager.list_mounts().into_iter().map(|m| m.plugin).collect();
    assert_eq!(plugins, vec!["simpcurlfs", "summaryfs", "skillsfs"]);
}

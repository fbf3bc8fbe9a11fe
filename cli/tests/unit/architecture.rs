//! Structural tests for architectural boundary enforcement.
//!
//! These tests scan source files to verify that the layering holds: domain
//! code is pure, services reach the outside world only through ports, and
//! only `infra/` spawns processes.

use std::path::{Path, PathBuf};

/// Collect all `.rs` files under a directory recursively.
fn collect_rs_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                files.extend(collect_rs_files(&path));
            } else if path.extension().and_then(|e| e.to_str()) == Some("rs") {
                files.push(path);
            }
        }
    }
    files
}

/// Read a file and strip comment lines to avoid false positives.
fn read_non_comment_lines(path: &Path) -> Vec<String> {
    let Ok(content) = std::fs::read_to_string(path) else {
        return Vec::new();
    };
    content
        .lines()
        .filter(|l| {
            let trimmed = l.trim();
            !trimmed.starts_with("//") && !trimmed.starts_with("/*") && !trimmed.starts_with('*')
        })
        .map(String::from)
        .collect()
}

/// Track brace depth and return whether a line is inside a `#[cfg(test)]` block.
struct CfgTestTracker {
    in_test_block: bool,
    brace_depth: i32,
    test_block_start_depth: i32,
}

impl CfgTestTracker {
    fn new() -> Self {
        Self {
            in_test_block: false,
            brace_depth: 0,
            test_block_start_depth: 0,
        }
    }

    /// Process a line and return `true` if it's inside a `#[cfg(test)]` block.
    fn process_line(&mut self, line: &str) -> bool {
        let trimmed = line.trim();
        if trimmed.contains("#[cfg(test)]") {
            self.in_test_block = true;
            self.test_block_start_depth = self.brace_depth;
        }
        for ch in line.chars() {
            match ch {
                '{' => self.brace_depth += 1,
                '}' => {
                    self.brace_depth -= 1;
                    if self.in_test_block && self.brace_depth <= self.test_block_start_depth {
                        self.in_test_block = false;
                    }
                }
                _ => {}
            }
        }
        self.in_test_block
    }
}

fn src_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("src")
}

fn relative(file: &Path) -> String {
    file.strip_prefix(env!("CARGO_MANIFEST_DIR"))
        .unwrap_or(file)
        .to_string_lossy()
        .replace('\\', "/")
}

/// Every non-comment line under `dir` containing one of `forbidden`.
fn scan(dir: &Path, forbidden: &[&str]) -> Vec<String> {
    let mut violations = Vec::new();
    for file in collect_rs_files(dir) {
        let rel = relative(&file);
        for (i, line) in read_non_comment_lines(&file).iter().enumerate() {
            for needle in forbidden {
                if line.contains(needle) {
                    violations.push(format!("{rel}:{}: `{needle}`: {line}", i + 1));
                }
            }
        }
    }
    violations
}

// ── Layer imports ────────────────────────────────────────────────────────────

#[test]
fn domain_is_pure() {
    let violations = scan(
        &src_dir().join("domain"),
        &[
            "crate::application",
            "crate::infra",
            "crate::commands",
            "crate::output",
            "tokio::",
            "std::process",
        ],
    );
    assert!(
        violations.is_empty(),
        "domain/ must not depend on outer layers or do I/O:\n{}",
        violations.join("\n")
    );
}

#[test]
fn application_depends_only_on_domain() {
    let violations = scan(
        &src_dir().join("application"),
        &["crate::infra", "crate::commands", "crate::output"],
    );
    assert!(
        violations.is_empty(),
        "application/ must only import from domain/ and its own ports:\n{}",
        violations.join("\n")
    );
}

#[test]
fn infra_has_no_imports_from_commands_or_output() {
    let violations = scan(
        &src_dir().join("infra"),
        &["crate::commands", "crate::output"],
    );
    assert!(
        violations.is_empty(),
        "infra/ must not import from commands/ or output/:\n{}",
        violations.join("\n")
    );
}

// ── Process spawning ─────────────────────────────────────────────────────────

#[test]
fn no_tokio_command_runner_new_outside_infra() {
    let violations: Vec<String> = scan(&src_dir(), &["TokioCommandRunner::new"])
        .into_iter()
        .filter(|v| !v.starts_with("src/infra/") && !v.starts_with("src/app.rs"))
        .collect();
    assert!(
        violations.is_empty(),
        "Found TokioCommandRunner::new outside infra/: construct runners in AppContext:\n{}",
        violations.join("\n")
    );
}

#[test]
fn only_infra_spawns_processes() {
    let violations: Vec<String> = scan(&src_dir(), &["Command::new("])
        .into_iter()
        .filter(|v| !v.starts_with("src/infra/"))
        .collect();
    assert!(
        violations.is_empty(),
        "Processes must be spawned through the CommandRunner port:\n{}",
        violations.join("\n")
    );
}

#[test]
fn no_concrete_runner_types_in_service_signatures() {
    let services_dir = src_dir().join("application").join("services");
    let mut violations = Vec::new();
    for file in collect_rs_files(&services_dir) {
        let rel = relative(&file);
        for (i, line) in read_non_comment_lines(&file).iter().enumerate() {
            if !line.contains("fn ") {
                continue;
            }
            for concrete in ["TokioCommandRunner", "AwsCliProvider", "AwsCliObjectStore"] {
                if line.contains(concrete) {
                    violations.push(format!("{rel}:{}: `{concrete}`: {line}", i + 1));
                }
            }
        }
    }
    assert!(
        violations.is_empty(),
        "Services must take trait bounds, not concrete adapters:\n{}",
        violations.join("\n")
    );
}

// ── Output discipline ────────────────────────────────────────────────────────

#[test]
fn no_print_macros_in_domain_application_or_infra() {
    let mut violations = Vec::new();
    for layer in ["domain", "application", "infra"] {
        for file in collect_rs_files(&src_dir().join(layer)) {
            let rel = relative(&file);
            let Ok(content) = std::fs::read_to_string(&file) else {
                continue;
            };
            let mut tracker = CfgTestTracker::new();
            for (i, line) in content.lines().enumerate() {
                let in_test = tracker.process_line(line);
                if in_test || line.trim().starts_with("//") {
                    continue;
                }
                if line.contains("println!") || line.contains("eprintln!") {
                    violations.push(format!("{rel}:{}: {line}", i + 1));
                }
            }
        }
    }
    assert!(
        violations.is_empty(),
        "Only commands/ and output/ may print:\n{}",
        violations.join("\n")
    );
}

#[test]
fn no_inline_json_branching_in_commands() {
    let violations = scan(&src_dir().join("commands"), &["json: bool", "if json", "if !json"]);
    assert!(
        violations.is_empty(),
        "Found inline JSON branching in commands/: use app.is_json() instead:\n{}",
        violations.join("\n")
    );
}

#[test]
fn command_handlers_accept_app_context() {
    let mut violations = Vec::new();
    for file in collect_rs_files(&src_dir().join("commands")) {
        let Ok(content) = std::fs::read_to_string(&file) else {
            continue;
        };
        let has_handler = content.contains("pub async fn ") || content.contains("pub fn run(");
        if has_handler && !content.contains("app: &AppContext") {
            violations.push(relative(&file));
        }
    }
    assert!(
        violations.is_empty(),
        "Command handlers must receive &AppContext:\n{}",
        violations.join("\n")
    );
}

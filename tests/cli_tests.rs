use assert_cmd::Command;
use predicates::prelude::*;
use std::error::Error;
use std::fs;
use tempfile::TempDir;

type TestResult = Result<(), Box<dyn Error>>;

fn sample_tree() -> Result<TempDir, Box<dyn Error>> {
    let temp = TempDir::new()?;
    let root = temp.path();
    fs::create_dir_all(root.join("src"))?;
    fs::create_dir_all(root.join("node_modules/dep"))?;
    fs::write(root.join("a.py"), "x")?;
    fs::write(root.join("src/util.js"), "let y;")?;
    fs::write(root.join("node_modules/dep/index.js"), "ignored")?;
    fs::write(root.join("logo.bin"), [0u8, 1, 2])?;
    Ok(temp)
}

#[test]
fn test_bundle_command() -> TestResult {
    let temp = sample_tree()?;
    let out_dir = TempDir::new()?;
    let output = out_dir.path().join("bundle.txt");

    Command::cargo_bin("codebundle")?
        .arg(temp.path())
        .arg("-o")
        .arg(&output)
        .arg("--sort")
        .assert()
        .success()
        .stderr(predicate::str::contains("Excluding directories"))
        .stderr(predicate::str::contains("Bundling complete."))
        .stdout(predicate::str::contains("2 files bundled"));

    let text = fs::read_to_string(&output)?;
    let util = std::path::Path::new("src").join("util.js");
    assert_eq!(
        text,
        format!(
            "### File: a.py ###\nx\n\n### File: {} ###\nlet y;\n\n",
            util.display()
        )
    );
    Ok(())
}

#[test]
fn test_default_output_in_working_directory() -> TestResult {
    let temp = sample_tree()?;

    Command::cargo_bin("codebundle")?
        .current_dir(temp.path())
        .assert()
        .success();
    Command::cargo_bin("codebundle")?
        .current_dir(temp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Skipping output file"));

    let text = fs::read_to_string(temp.path().join("project_code_bundle.txt"))?;
    assert!(text.contains("### File: a.py ###"));
    assert!(!text.contains("project_code_bundle.txt ###"));
    assert!(!text.contains("index.js"));
    Ok(())
}

#[test]
fn test_list_json() -> TestResult {
    let temp = sample_tree()?;

    let assert = Command::cargo_bin("codebundle")?
        .args(["list", "--sort", "--format", "json"])
        .arg(temp.path())
        .assert()
        .success();

    let entries: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout)?;
    let entries = entries.as_array().ok_or("expected an array")?;
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["relative"], "a.py");
    assert_eq!(entries[0]["size"], 1);
    Ok(())
}

#[test]
fn test_list_excludes_named_output() -> TestResult {
    let temp = sample_tree()?;
    let output = temp.path().join("bundle.txt");
    fs::write(&output, "### File: a.py ###\nx\n\n")?;

    let assert = Command::cargo_bin("codebundle")?
        .args(["list", "--sort", "--format", "json", "-o"])
        .arg(&output)
        .arg(temp.path())
        .assert()
        .success();

    let entries: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout)?;
    let entries = entries.as_array().ok_or("expected an array")?;
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e["relative"] != "bundle.txt"));
    Ok(())
}

#[test]
fn test_defaults_command() -> TestResult {
    Command::cargo_bin("codebundle")?
        .arg("defaults")
        .assert()
        .success()
        .stdout(predicate::str::contains("node_modules"))
        .stdout(predicate::str::contains("project_code_bundle.txt"));
    Ok(())
}

#[test]
fn test_unwritable_output_fails() -> TestResult {
    let temp = sample_tree()?;

    Command::cargo_bin("codebundle")?
        .arg(temp.path())
        .arg("-o")
        .arg(temp.path().join("no-such-dir/bundle.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot open output file"));
    Ok(())
}

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

#[test]
fn build_writes_classes_under_their_packages() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write(
        input.path(),
        "Hello.bb.html",
        "<%@ params (String name) %>Hello, <%= name %>",
    );
    write(input.path(), "mail/Welcome.bb.txt", "Welcome!");
    write(input.path(), "README.md", "not a template");

    let mut cmd = cargo_bin_cmd!("bbc");
    cmd.arg("build").arg(input.path()).arg(output.path());
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Compiled 2 template(s), 0 failed"));

    let hello = fs::read_to_string(output.path().join("bb/hgen/Hello.java")).unwrap();
    assert!(hello.starts_with("package bb.hgen;\n"));
    assert!(hello.contains("public static String render(String name) {"));

    let welcome = fs::read_to_string(output.path().join("bb/hgen/mail/Welcome.java")).unwrap();
    assert!(welcome.starts_with("package bb.hgen.mail;\n"));
    assert!(!output.path().join("bb/hgen/README.java").exists());
}

#[test]
fn build_isolates_failing_templates() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write(input.path(), "Good.bb.html", "fine");
    write(
        input.path(),
        "Bad.bb.html",
        "<%@ extends a.One %>\n<%@ extends b.Two %>",
    );
    write(input.path(), "Open.bb.html", "<%@ section s %>never closed");

    let mut cmd = cargo_bin_cmd!("bbc");
    cmd.arg("build").arg(input.path()).arg(output.path());
    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("Compiled 1 template(s), 2 failed"))
        .stderr(
            predicate::str::contains("Bad.bb.html")
                .and(predicate::str::contains("a.One"))
                .and(predicate::str::contains("b.Two"))
                .and(predicate::str::contains("Open.bb.html")),
        );

    assert!(output.path().join("bb/hgen/Good.java").exists());
    assert!(!output.path().join("bb/hgen/Bad.java").exists());
    assert!(!output.path().join("bb/hgen/Open.java").exists());
}

#[test]
fn build_respects_package_prefix_override() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write(input.path(), "views/Page.bb.html", "page");

    let mut cmd = cargo_bin_cmd!("bbc");
    cmd.arg("build")
        .arg(input.path())
        .arg(output.path())
        .arg("--package-prefix")
        .arg("com.acme");
    cmd.assert().success();

    let page = fs::read_to_string(output.path().join("com/acme/views/Page.java")).unwrap();
    assert!(page.starts_with("package com.acme.views;\n"));
}

#[test]
fn build_reads_config_file() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let config_dir = TempDir::new().unwrap();
    write(input.path(), "Page.tpl.html", "page");
    write(input.path(), "Other.bb.html", "ignored with the custom marker");
    write(
        config_dir.path(),
        "bb.toml",
        "[input]\nmarker = \".tpl.\"\n\n[output]\npackage_prefix = \"\"\n",
    );

    let mut cmd = cargo_bin_cmd!("bbc");
    cmd.arg("--config")
        .arg(config_dir.path().join("bb.toml"))
        .arg("build")
        .arg(input.path())
        .arg(output.path());
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Compiled 1 template(s), 0 failed"));

    let page = fs::read_to_string(output.path().join("Page.java")).unwrap();
    assert!(page.starts_with("import java.io.IOException;\n"));
}

#[test]
fn build_fails_for_missing_input() {
    let output = TempDir::new().unwrap();
    let mut cmd = cargo_bin_cmd!("bbc");
    cmd.arg("build")
        .arg(output.path().join("does-not-exist"))
        .arg(output.path());
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Input directory not found"));
}

#[test]
fn compile_prints_java() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "Card.bb.html", "<b><%= title %></b>");

    let mut cmd = cargo_bin_cmd!("bbc");
    cmd.arg("compile")
        .arg(dir.path().join("Card.bb.html"))
        .arg("--package")
        .arg("ui");
    cmd.assert().success().stdout(
        predicate::str::starts_with("package ui;\n")
            .and(predicate::str::contains("public class Card extends bb.runtime.BaseBBTemplate {"))
            .and(predicate::str::contains("buffer.append(toS(title));")),
    );
}

#[test]
fn compile_with_empty_base_class_drops_extends() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "Plain.bb.html", "x");

    let mut cmd = cargo_bin_cmd!("bbc");
    cmd.arg("compile")
        .arg(dir.path().join("Plain.bb.html"))
        .arg("--base-class")
        .arg("");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("public class Plain {"));
}

#[test]
fn compile_reports_errors_with_line() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "Broken.bb.html", "ok\n<%@ frobnicate %>");

    let mut cmd = cargo_bin_cmd!("bbc");
    cmd.arg("compile").arg(dir.path().join("Broken.bb.html"));
    cmd.assert().failure().stderr(
        predicate::str::contains("Unsupported directive on line 2")
            .and(predicate::str::contains("Broken.bb.html")),
    );
}

#[test]
fn tokens_prints_json() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "T.bb.html", "Hi <%= name %>\n<%@ include footer %>");

    let mut cmd = cargo_bin_cmd!("bbc");
    cmd.arg("tokens").arg(dir.path().join("T.bb.html"));
    let output = cmd.assert().success().get_output().stdout.clone();

    let tokens: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let kinds: Vec<&str> = tokens
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["kind"].as_str().unwrap())
        .collect();
    assert_eq!(
        kinds,
        vec!["STRING_CONTENT", "EXPRESSION", "STRING_CONTENT", "DIRECTIVE"]
    );
    assert_eq!(tokens[3]["content"], "include footer");
    assert_eq!(tokens[3]["line"], 2);
}

#[test]
fn no_arguments_prints_help() {
    let mut cmd = cargo_bin_cmd!("bbc");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn build_skips_directories_named_like_templates() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write(input.path(), "parts.bb.d/Item.bb.html", "item");

    let mut cmd = cargo_bin_cmd!("bbc");
    cmd.arg("build").arg(input.path()).arg(output.path());
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Compiled 1 template(s), 0 failed"));

    // Package segments come from the directory name split on dots
    assert!(output.path().join("bb/hgen/parts/bb/d/Item.java").exists());
}

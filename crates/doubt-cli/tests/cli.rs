use std::path::Path;

use assert_cmd::Command;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use predicates::prelude::*;

fn write_pdf(path: &Path, pages: &[&str]) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

fn doubt(config_home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("doubt").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home);
    cmd
}

#[test]
fn test_keywords_command() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("notes.pdf");
    write_pdf(&pdf, &["Rust ownership rules borrowing rules", "lifetimes"]);

    doubt(dir.path())
        .args(["keywords", pdf.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("rules (2)\n"));
}

#[test]
fn test_analyze_json() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("notes.pdf");
    write_pdf(&pdf, &["first page text", "second", "third"]);

    let output = doubt(dir.path())
        .args(["analyze", "--format", "json", pdf.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["page_count"]["pages"], 3);
    assert_eq!(report["document"], "notes.pdf");
    assert!(report["preview"]["text"].as_str().unwrap().contains("first page text"));
}

#[test]
fn test_analyze_reports_decode_failure() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("broken.pdf");
    std::fs::write(&pdf, b"%PDF-1.4\n1 0 obj garbage").unwrap();

    doubt(dir.path())
        .args(["analyze", pdf.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pages: error: failed to parse PDF"));
}

#[test]
fn test_rejects_non_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let txt = dir.path().join("notes.txt");
    std::fs::write(&txt, "plain text").unwrap();

    doubt(dir.path())
        .args(["analyze", txt.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please upload a valid PDF file"));
}

#[test]
fn test_ask_echoes_question() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("notes.pdf");
    write_pdf(&pdf, &["content"]);

    doubt(dir.path())
        .args(["ask", pdf.to_str().unwrap(), "What is this about?"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sample answer for: \"What is this about?\""));
}

#[test]
fn test_batch_writes_summary() {
    let dir = tempfile::tempdir().unwrap();
    let inputs = dir.path().join("inputs");
    let out = dir.path().join("out");
    std::fs::create_dir_all(&inputs).unwrap();
    write_pdf(&inputs.join("good.pdf"), &["Rust ownership rules borrowing rules"]);
    std::fs::write(inputs.join("broken.pdf"), b"%PDF-1.4\n1 0 obj garbage").unwrap();

    let pattern = inputs.join("*.pdf");
    doubt(dir.path())
        .args(["batch", pattern.to_str().unwrap(), "--continue-on-error", "--summary", "-o"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 successful, 1 failed"));

    assert!(out.join("good.json").exists());
    assert!(out.join("broken.json").exists());

    let summary = std::fs::read_to_string(out.join("summary.csv")).unwrap();
    let lines: Vec<&str> = summary.lines().collect();
    assert_eq!(lines[0], "filename,status,pages,keywords,processing_time_ms,error");
    assert_eq!(lines.len(), 3);

    let broken = lines.iter().find(|l| l.starts_with("broken.pdf,")).unwrap();
    assert!(broken.starts_with("broken.pdf,error,,"));
    assert!(broken.contains("failed to parse PDF"));

    let good = lines.iter().find(|l| l.starts_with("good.pdf,")).unwrap();
    assert!(good.starts_with("good.pdf,success,1,rules (2); rust (1)"));
}

#[test]
fn test_config_set_then_get() {
    let dir = tempfile::tempdir().unwrap();

    doubt(dir.path())
        .args(["config", "set", "analysis.keyword_limit", "3"])
        .assert()
        .success();
    assert!(dir.path().join("doubt").join("config.json").exists());

    doubt(dir.path())
        .args(["config", "get", "analysis.keyword_limit"])
        .assert()
        .success()
        .stdout("3\n");

    doubt(dir.path())
        .args(["config", "set", "analysis.nope", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));
}

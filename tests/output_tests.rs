use polaris::cli::ExportFormat;
use polaris::gate::{Credential, DEFAULT_IDENTIFIER, DEFAULT_VERIFIER};
use polaris::output::{export_report, HtmlOutput, JsonOutput, OutputError};
use polaris::report::{Report, SECTIONS};

fn export(format: ExportFormat, verifier: &str) -> (Result<(), OutputError>, Vec<u8>) {
    let mut buf = Vec::new();
    let result = export_report(
        &Report::polaris(),
        format,
        &Credential::default(),
        (DEFAULT_IDENTIFIER, verifier),
        &mut buf,
    );
    (result, buf)
}

#[test]
fn test_html_export_has_every_section_anchor() {
    let (result, buf) = export(ExportFormat::Html, DEFAULT_VERIFIER);
    result.unwrap();
    let html = String::from_utf8(buf).unwrap();

    assert!(html.starts_with("<!DOCTYPE html>"));
    for section in SECTIONS {
        assert!(html.contains(&format!("id=\"{}\"", section.id)));
        assert!(html.contains(&format!("href=\"#{}\"", section.id)));
    }
}

#[test]
fn test_html_sections_in_declaration_order() {
    let html = HtmlOutput::new(&Report::polaris()).to_html().unwrap();
    let positions: Vec<usize> = SECTIONS
        .iter()
        .map(|s| html.find(&format!("<section id=\"{}\"", s.id)).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_json_export_matches_report() {
    let (result, buf) = export(ExportFormat::Json, DEFAULT_VERIFIER);
    result.unwrap();
    let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();

    let ids: Vec<&str> = value["report"]["sections"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_str().unwrap())
        .collect();
    let expected: Vec<&str> = SECTIONS.iter().map(|s| s.id).collect();
    assert_eq!(ids, expected);
    assert_eq!(
        value["total_latency_ms"],
        Report::polaris().total_latency_ms()
    );
}

#[test]
fn test_denied_export_writes_nothing() {
    for format in [ExportFormat::Html, ExportFormat::Json] {
        let (result, buf) = export(format, "digital_era@sina.co");
        assert!(matches!(result, Err(OutputError::Denied(_))));
        assert!(buf.is_empty());
    }
}

#[test]
fn test_json_output_is_stable_apart_from_timestamp() {
    let report = Report::polaris();
    let mut a: serde_json::Value =
        serde_json::from_str(&JsonOutput::new(&report).to_json().unwrap()).unwrap();
    let mut b: serde_json::Value =
        serde_json::from_str(&JsonOutput::new(&report).to_json_pretty().unwrap()).unwrap();
    a["generated_at"] = serde_json::Value::Null;
    b["generated_at"] = serde_json::Value::Null;
    assert_eq!(a, b);
}

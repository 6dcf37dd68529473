//! Schema validation and translation against real source text

use allio_ir::{Severity, SourceMap};
use allio_schema::{Strictness, ValidatorCache, ValidatorOptions, translate_violations};
use serde_json::Value;

fn diagnose(source: &str, strictness: Strictness) -> anyhow::Result<Vec<allio_ir::Diagnostic>> {
    let tree: Value = serde_yaml::from_str(source)?;
    let cache = ValidatorCache::new();
    let validator = cache.get_or_build(ValidatorOptions::new(strictness))?;
    let violations = validator.violations(&tree);
    Ok(translate_violations(&violations, &SourceMap::parse(source)))
}

#[test]
fn test_valid_document_has_no_diagnostics() -> anyhow::Result<()> {
    let source = "\
devices:
  lamp:
    kind: light
diagrams:
  - name: evening
    content:
      - type: begin
        id: b1
      - type: command
        id: c1
        device: lamp
        command: switch_on
        args:
          brightness: 80
      - type: end
        id: e1
      - type: transition
        from: b1
        to: c1
      - type: transition
        id: t2
        from: c1
        to: e1
        condition: done
";
    assert!(diagnose(source, Strictness::Exhaustive)?.is_empty());
    Ok(())
}

#[test]
fn test_invalid_key_points_at_key_line() -> anyhow::Result<()> {
    let source = "\
devices: {}
diagrams:
  - content:
      - type: begin
        id: b1
      - type: end
        id: e1
        foo: bar
";
    let diagnostics = diagnose(source, Strictness::FirstError)?;

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].severity, Severity::Error);
    assert_eq!(diagnostics[0].message, "found invalid key \"foo\"");
    assert_eq!(diagnostics[0].line, Some(8));
    Ok(())
}

#[test]
fn test_invalid_top_level_key() -> anyhow::Result<()> {
    let source = "\
devices: {}
diagrams: []
extra: true
";
    let diagnostics = diagnose(source, Strictness::FirstError)?;

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].message, "found invalid key \"extra\"");
    assert_eq!(diagnostics[0].line, Some(3));
    Ok(())
}

#[test]
fn test_missing_required_field_points_at_component() -> anyhow::Result<()> {
    let source = "\
devices: {}
diagrams:
  - content:
      - type: begin
        id: b1
      - type: transition
        from: b1
";
    let diagnostics = diagnose(source, Strictness::FirstError)?;

    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].message.contains("\"to\""));
    assert_eq!(diagnostics[0].line, Some(6));
    Ok(())
}

#[test]
fn test_exhaustive_reports_every_component() -> anyhow::Result<()> {
    let source = "\
devices: {}
diagrams:
  - content:
      - type: begin
      - type: command
        id: c1
      - type: end
";
    let diagnostics = diagnose(source, Strictness::Exhaustive)?;

    let lines: Vec<_> = diagnostics.iter().filter_map(|d| d.line).collect();
    assert!(lines.contains(&4));
    assert!(lines.contains(&5));
    assert!(lines.contains(&7));
    Ok(())
}

#[test]
fn test_unknown_component_type() -> anyhow::Result<()> {
    let source = "\
devices: {}
diagrams:
  - content:
      - type: teleport
        id: x
";
    let diagnostics = diagnose(source, Strictness::FirstError)?;

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].severity, Severity::Error);
    assert!(diagnostics[0].line.is_some());
    Ok(())
}

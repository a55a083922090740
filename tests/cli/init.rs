use anyhow::{Context, Result};
use serde_json::Value;

use crate::CliTest;

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("init").output()?;

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "✓ Created .dictsyncrc.json\n"
    );

    let content = test.read_file(".dictsyncrc.json")?;
    let parsed: Value = serde_json::from_str(&content).context("Config should be valid JSON")?;
    assert_eq!(parsed["sourceLanguage"], "en");
    assert_eq!(parsed["provider"], "aws");
    assert_eq!(parsed["providers"]["openai"]["model"], "gpt-4o");
    assert!(!content.contains("apiKey"), "credentials are never written");
    assert!(content.ends_with("}\n"));

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".dictsyncrc.json", "{}")?;

    let output = test.command().arg("init").output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains(".dictsyncrc.json already exists"));
    assert_eq!(test.read_file(".dictsyncrc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;
    test.command().arg("init").output()?;
    test.write_file("locales/en/common.json", r#"{"title": "Hi"}"#)?;
    test.create_dir("locales/fr")?;

    let output = test
        .command()
        .args(["translate", "locales", "--dry-run", "-p", "openai"])
        .output()?;

    assert!(
        output.status.success(),
        "dry run should work with initialized config. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    Ok(())
}

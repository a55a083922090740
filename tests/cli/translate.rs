use anyhow::Result;
use insta::assert_snapshot;

use crate::{CliTest, MockOpenAi};

fn setup_source(test: &CliTest) -> Result<()> {
    test.write_file(
        "locales/en/common.json",
        r#"{"title": "Hi", "nav": {"home": "Home"}}"#,
    )?;
    test.create_dir("locales/fr")
}

fn stdout(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn test_translate_fills_empty_locale() -> Result<()> {
    let test = CliTest::new()?;
    setup_source(&test)?;
    let server = MockOpenAi::start()?;

    let output = test.translate_command(&server)?.output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "✓ Translated 2 keys in 1 file\n");
    assert!(stderr(&output).contains("fr/common.json ✓ 2 translated"));
    assert_eq!(server.request_count(), 1);
    assert_snapshot!(test.read_file("locales/fr/common.json")?, @r#"
    {
      "title": "[fr] Hi",
      "nav": {
        "home": "[fr] Home"
      }
    }
    "#);

    Ok(())
}

#[test]
fn test_rerun_makes_no_requests() -> Result<()> {
    let test = CliTest::new()?;
    setup_source(&test)?;
    let server = MockOpenAi::start()?;

    test.translate_command(&server)?.output()?;
    let before = test.read_file("locales/fr/common.json")?;

    let output = test.translate_command(&server)?.output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(server.request_count(), 1);
    assert_eq!(
        stdout(&output),
        "✓ All catalogs are up to date (1 file checked)\n"
    );
    assert_eq!(test.read_file("locales/fr/common.json")?, before);

    Ok(())
}

#[test]
fn test_translate_only_missing_keys() -> Result<()> {
    let test = CliTest::new()?;
    setup_source(&test)?;
    test.write_file("locales/fr/common.json", r#"{"title": "Salut"}"#)?;
    let server = MockOpenAi::start()?;

    let output = test.translate_command(&server)?.output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_snapshot!(test.read_file("locales/fr/common.json")?, @r#"
    {
      "title": "Salut",
      "nav": {
        "home": "[fr] Home"
      }
    }
    "#);

    Ok(())
}

#[test]
fn test_selection_forces_retranslation() -> Result<()> {
    let test = CliTest::new()?;
    setup_source(&test)?;
    test.write_file(
        "locales/fr/common.json",
        r#"{"title": "Salut", "nav": {"home": "Maison"}}"#,
    )?;
    let server = MockOpenAi::start()?;

    let output = test
        .translate_command(&server)?
        .args(["--only", "common:nav.*"])
        .output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_snapshot!(test.read_file("locales/fr/common.json")?, @r#"
    {
      "title": "Salut",
      "nav": {
        "home": "[fr] Home"
      }
    }
    "#);

    Ok(())
}

#[test]
fn test_strict_prunes_stale_keys() -> Result<()> {
    let test = CliTest::new()?;
    setup_source(&test)?;
    test.write_file(
        "locales/fr/common.json",
        r#"{"title": "Salut", "nav": {"home": "Accueil"}, "legacy": "Ancien"}"#,
    )?;
    let server = MockOpenAi::start()?;

    let output = test.translate_command(&server)?.arg("--strict").output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(server.request_count(), 0);
    assert_eq!(stdout(&output), "✓ Pruned 1 key in 1 file\n");
    assert_snapshot!(test.read_file("locales/fr/common.json")?, @r#"
    {
      "title": "Salut",
      "nav": {
        "home": "Accueil"
      }
    }
    "#);

    Ok(())
}

#[test]
fn test_yaml_catalogs() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("locales/en/auth.yaml", "login: Log in\nlogout: Log out\n")?;
    test.write_file("locales/de/auth.yaml", "login: Anmelden\n")?;
    let server = MockOpenAi::start()?;

    let output = test.translate_command(&server)?.output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_snapshot!(test.read_file("locales/de/auth.yaml")?, @r"
    login: Anmelden
    logout: '[de] Log out'
    ");

    Ok(())
}

#[test]
fn test_dry_run_writes_nothing() -> Result<()> {
    let test = CliTest::new()?;
    setup_source(&test)?;
    let server = MockOpenAi::start()?;

    let output = test.translate_command(&server)?.arg("--dry-run").output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(server.request_count(), 0);
    assert!(!test.root().join("locales/fr/common.json").exists());
    assert_snapshot!(stdout(&output), @r"
    fr/common.json
      + common:title
      + common:nav.home

    Would translate 2 keys in 1 file
    Run without --dry-run to apply.
    ");

    Ok(())
}

#[test]
fn test_dicts_path_without_subcommand_runs_translate() -> Result<()> {
    let test = CliTest::new()?;
    setup_source(&test)?;
    let server = MockOpenAi::start()?;
    test.write_config(&server)?;

    let output = test
        .command()
        .args(["locales", "--dry-run"])
        .output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(server.request_count(), 0);
    assert!(stdout(&output).contains("Would translate 2 keys in 1 file"));

    Ok(())
}

#[test]
fn test_non_locale_dirs_are_skipped_with_warning() -> Result<()> {
    let test = CliTest::new()?;
    setup_source(&test)?;
    test.create_dir("locales/shared-assets")?;
    let server = MockOpenAi::start()?;

    let output = test.translate_command(&server)?.output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(
        stderr(&output).contains("warning: skipping shared-assets (not a locale directory)")
    );
    assert!(!test.root().join("locales/shared-assets/common.json").exists());

    Ok(())
}

#[test]
fn test_missing_api_key_fails_before_translating() -> Result<()> {
    let test = CliTest::new()?;
    setup_source(&test)?;

    let output = test
        .command()
        .args(["translate", "locales", "-p", "openai"])
        .output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("OPENAI_API_KEY is not set"));
    assert!(!test.root().join("locales/fr/common.json").exists());

    Ok(())
}

#[test]
fn test_missing_source_locale_fails() -> Result<()> {
    let test = CliTest::new()?;
    setup_source(&test)?;
    let server = MockOpenAi::start()?;

    let output = test
        .translate_command(&server)?
        .args(["-s", "pt"])
        .output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("source locale directory 'pt' does not exist"));

    Ok(())
}

#[test]
fn test_invalid_selection_is_a_usage_error() -> Result<()> {
    let test = CliTest::new()?;
    setup_source(&test)?;

    let output = test
        .command()
        .args(["translate", "locales", "--only", "title"])
        .output()?;

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Invalid selection format"));

    Ok(())
}

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;
use tracing::debug;

use super::super::{
    args::TranslateCommand, exit_status::ExitStatus, progress::Progress, report::print_summary,
};
use crate::{
    config::{Config, ProviderSettings, load_config},
    core::{CatalogStore, Reconciler, RunOptions},
    translator::{self, Provider},
};

/// Settings of one translate run after merging flags over the config file.
#[derive(Debug)]
struct Resolved {
    dicts_path: PathBuf,
    provider: Provider,
    providers: ProviderSettings,
    ignores: Vec<glob::Pattern>,
    options: RunOptions,
}

fn resolve(cmd: TranslateCommand, config: Config) -> Result<Resolved> {
    let concurrency = cmd.concurrency.or(config.concurrency);
    if concurrency == Some(0) {
        anyhow::bail!("--concurrency must be at least 1");
    }

    let mut providers = config.providers.clone();
    providers.openai.api_key = cmd.openai_api_key;
    providers.anthropic.api_key = cmd.anthropic_api_key;

    Ok(Resolved {
        dicts_path: cmd.dicts_path,
        provider: cmd.provider.unwrap_or(config.provider),
        providers,
        ignores: config.ignore_patterns()?,
        options: RunOptions {
            source_locale: cmd.source_language.unwrap_or(config.source_language),
            selection: cmd.only,
            strict: cmd.strict || config.strict,
            concurrency,
            dry_run: cmd.dry_run,
        },
    })
}

fn config_search_start(dicts_path: &Path) -> PathBuf {
    dicts_path
        .canonicalize()
        .unwrap_or_else(|_| dicts_path.to_path_buf())
}

pub fn translate(cmd: TranslateCommand) -> Result<ExitStatus> {
    let loaded = load_config(&config_search_start(&cmd.dicts_path))?;
    if let Some(path) = &loaded.path {
        debug!(config = %path.display(), "using config file");
    }
    let resolved = resolve(cmd, loaded.config)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    runtime.block_on(run(resolved))
}

async fn run(resolved: Resolved) -> Result<ExitStatus> {
    let Resolved {
        dicts_path,
        provider,
        providers,
        ignores,
        options,
    } = resolved;
    let dry_run = options.dry_run;

    let store = CatalogStore::new(&dicts_path).with_ignores(ignores);
    let translator = translator::connect(provider, &providers).await;
    if !dry_run {
        translator.validate_configuration().await?;
    }

    let reconciler = Reconciler::new(&store, translator.as_ref(), options);
    let mut progress = Progress::new(store.root(), dry_run);

    let outcome = tokio::select! {
        result = reconciler.run(&mut progress) => Some(result),
        Ok(()) = tokio::signal::ctrl_c() => None,
    };
    // Closes a status line left open by cancellation.
    drop(progress);

    match outcome {
        Some(result) => {
            let summary = result?;
            print_summary(store.root(), &summary, dry_run);
            Ok(ExitStatus::Success)
        }
        None => {
            eprintln!(
                "{} interrupted, catalogs written so far were kept",
                "warning:".bold().yellow()
            );
            Ok(ExitStatus::Interrupted)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SelectionSpec;

    fn command(dicts_path: &str) -> TranslateCommand {
        TranslateCommand {
            dicts_path: PathBuf::from(dicts_path),
            source_language: None,
            provider: None,
            only: None,
            concurrency: None,
            strict: false,
            dry_run: false,
            openai_api_key: None,
            anthropic_api_key: None,
            verbose: false,
        }
    }

    #[test]
    fn test_resolve_uses_config_defaults() {
        let config: Config = serde_json::from_str(
            r#"{ "sourceLanguage": "de", "provider": "anthropic", "concurrency": 4, "strict": true }"#,
        )
        .unwrap();

        let resolved = resolve(command("locales"), config).unwrap();

        assert_eq!(resolved.dicts_path, PathBuf::from("locales"));
        assert_eq!(resolved.provider, Provider::Anthropic);
        assert_eq!(resolved.options.source_locale, "de");
        assert_eq!(resolved.options.concurrency, Some(4));
        assert!(resolved.options.strict);
    }

    #[test]
    fn test_resolve_flags_override_config() {
        let config: Config =
            serde_json::from_str(r#"{ "sourceLanguage": "de", "concurrency": 4 }"#).unwrap();
        let cmd = TranslateCommand {
            source_language: Some("fr".to_string()),
            provider: Some(Provider::OpenAi),
            only: Some(SelectionSpec::parse("common:nav.*").unwrap()),
            concurrency: Some(2),
            dry_run: true,
            openai_api_key: Some("sk-test".to_string()),
            ..command("locales")
        };

        let resolved = resolve(cmd, config).unwrap();

        assert_eq!(resolved.provider, Provider::OpenAi);
        assert_eq!(resolved.options.source_locale, "fr");
        assert_eq!(resolved.options.concurrency, Some(2));
        assert!(resolved.options.dry_run);
        assert!(resolved.options.selection.unwrap().prefix_match);
        assert_eq!(resolved.providers.openai.api_key.as_deref(), Some("sk-test"));
        assert!(resolved.providers.anthropic.api_key.is_none());
    }

    #[test]
    fn test_resolve_rejects_zero_concurrency() {
        let cmd = TranslateCommand {
            concurrency: Some(0),
            ..command("locales")
        };
        assert!(resolve(cmd, Config::default()).is_err());
    }
}

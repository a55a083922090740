//! Reconciliation of target catalogs against the source locale.
//!
//! For every (source namespace file, target locale) pair the engine loads the
//! existing target catalog, decides which units need a translation, sends
//! them to the [`Translator`], folds the answers back over the existing
//! entries and persists the result. Pairs are processed one after another;
//! each pair persists independently, so an interrupted run resumes where it
//! stopped.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use tracing::{debug, info};

use super::{
    catalog::Catalog,
    error::{Error, Result},
    key::TranslationKey,
    selection::SelectionSpec,
    store::{CatalogStore, Skipped},
    unit::{Translation, TranslationUnit},
};
use crate::translator::Translator;

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub source_locale: String,
    /// Force-retranslate the selected keys instead of filling gaps.
    pub selection: Option<SelectionSpec>,
    /// Prune target keys that no longer exist in the source.
    pub strict: bool,
    /// Batch-size hint passed through to the translator.
    pub concurrency: Option<usize>,
    /// Plan only: no translator calls, no writes.
    pub dry_run: bool,
}

/// What happened to one (target locale, namespace file) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairOutcome {
    pub locale: String,
    pub path: PathBuf,
    /// Keys sent (or, on a dry run, that would be sent) to the translator.
    pub requested: Vec<TranslationKey>,
    /// Keys removed because the source no longer has them.
    pub pruned: Vec<TranslationKey>,
    pub written: bool,
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub pairs: Vec<PairOutcome>,
    pub skipped: Vec<Skipped>,
}

impl RunSummary {
    pub fn requested_count(&self) -> usize {
        self.pairs.iter().map(|p| p.requested.len()).sum()
    }

    pub fn pruned_count(&self) -> usize {
        self.pairs.iter().map(|p| p.pruned.len()).sum()
    }

    pub fn written_count(&self) -> usize {
        self.pairs.iter().filter(|p| p.written).count()
    }
}

/// Progress hooks. Every method defaults to doing nothing.
pub trait RunObserver {
    fn skipped(&mut self, _skipped: &Skipped) {}

    fn pair_started(&mut self, _locale: &str, _path: &Path) {}

    fn pair_finished(&mut self, _result: std::result::Result<&PairOutcome, &Error>) {}
}

/// Observer that ignores every event.
pub struct Silent;

impl RunObserver for Silent {}

/// Units to request for one target catalog, in source order.
///
/// With a selection, every selected source key is requested whether or not
/// the target has it. Without one, only keys missing from `existing` are.
pub fn plan_units(
    source: &Catalog,
    existing: &Catalog,
    selection: Option<&SelectionSpec>,
    source_locale: &str,
    target_locale: &str,
) -> Vec<TranslationUnit> {
    source
        .entries()
        .iter()
        .filter(|entry| match selection {
            Some(selection) => selection.matches_key(&entry.key),
            None => !existing.has_key(&entry.key),
        })
        .map(|entry| {
            TranslationUnit::new(
                entry.key.clone(),
                entry.value.clone(),
                source_locale,
                target_locale,
            )
        })
        .collect()
}

/// Fail unless `translations` answers every unit exactly once.
pub fn ensure_complete(units: &[TranslationUnit], translations: &[Translation]) -> Result<()> {
    let answered: HashSet<&TranslationKey> = translations.iter().map(|t| t.key()).collect();
    let missing: Vec<String> = units
        .iter()
        .filter(|u| !answered.contains(&u.key))
        .map(|u| u.key.to_string())
        .collect();

    if missing.is_empty() && translations.len() == units.len() {
        return Ok(());
    }
    Err(Error::ProviderIncompleteResponse {
        expected: units.len(),
        received: translations.len(),
        missing,
    })
}

/// Merge `translations` over `existing`, then prune against `strict_source`
/// when given. Returns the new catalog and the pruned keys.
pub fn fold_translations(
    existing: &Catalog,
    translations: Vec<Translation>,
    strict_source: Option<&Catalog>,
) -> (Catalog, Vec<TranslationKey>) {
    let incoming: Catalog = translations
        .into_iter()
        .map(Translation::into_entry)
        .collect();
    let mut merged = existing.merge(&incoming);

    let pruned = match strict_source {
        Some(source) => merged.retain(|entry| source.has_key(&entry.key)),
        None => Vec::new(),
    };
    (merged, pruned)
}

pub struct Reconciler<'a> {
    store: &'a CatalogStore,
    translator: &'a dyn Translator,
    options: RunOptions,
}

impl<'a> Reconciler<'a> {
    pub fn new(store: &'a CatalogStore, translator: &'a dyn Translator, options: RunOptions) -> Self {
        Self {
            store,
            translator,
            options,
        }
    }

    /// Reconcile every target locale with every source namespace file.
    ///
    /// The first error stops the run; pairs finished before it stay written.
    pub async fn run(&self, observer: &mut dyn RunObserver) -> Result<RunSummary> {
        let source_locale = &self.options.source_locale;
        let sources = self.store.source_files(source_locale)?;
        let targets = self.store.target_locales(source_locale)?;

        let mut summary = RunSummary::default();
        for skipped in sources.skipped.into_iter().chain(targets.skipped) {
            debug!(path = %skipped.path.display(), reason = %skipped.reason, "skipping");
            observer.skipped(&skipped);
            summary.skipped.push(skipped);
        }

        info!(
            files = sources.found.len(),
            locales = targets.found.len(),
            provider = self.translator.name(),
            "reconciling catalogs"
        );

        for source_path in &sources.found {
            if let Some(selection) = &self.options.selection
                && !selection.matches_filename(source_path)
            {
                debug!(path = %source_path.display(), %selection, "file not selected");
                continue;
            }

            let source = self.store.load(source_path)?;
            for locale in &targets.found {
                let target_path = self.store.target_path(locale, source_path);
                observer.pair_started(locale, &target_path);
                let result = self.reconcile_pair(&source, locale, target_path).await;
                observer.pair_finished(result.as_ref());
                summary.pairs.push(result?);
            }
        }

        Ok(summary)
    }

    async fn reconcile_pair(
        &self,
        source: &Catalog,
        locale: &str,
        path: PathBuf,
    ) -> Result<PairOutcome> {
        let options = &self.options;
        let target_exists = path.exists();
        let existing = self.store.load_or_empty(&path)?;

        let units = plan_units(
            source,
            &existing,
            options.selection.as_ref(),
            &options.source_locale,
            locale,
        );
        let requested: Vec<TranslationKey> = units.iter().map(|u| u.key.clone()).collect();
        let strict_source = options.strict.then_some(source);

        if options.dry_run {
            let (_, pruned) = fold_translations(&existing, Vec::new(), strict_source);
            return Ok(PairOutcome {
                locale: locale.to_string(),
                path,
                requested,
                pruned,
                written: false,
            });
        }

        let translations = if units.is_empty() {
            Vec::new()
        } else {
            debug!(%locale, path = %path.display(), units = units.len(), "requesting translations");
            self.translator
                .translate(&units, options.concurrency)
                .await?
        };
        ensure_complete(&units, &translations)?;

        let (merged, pruned) = fold_translations(&existing, translations, strict_source);
        let written = !target_exists || merged != existing;
        if written {
            self.store.persist(&path, &merged)?;
        }

        Ok(PairOutcome {
            locale: locale.to_string(),
            path,
            requested,
            pruned,
            written,
        })
    }
}

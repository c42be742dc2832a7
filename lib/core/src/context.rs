//! Matching snapshots
//!
//! A [`MatchContext`] bundles the weight configuration and the case
//! collection a matching pass runs against. It is immutable; updates build a
//! new context and [`ContextStore`] swaps it in whole, so a pass that already
//! took a snapshot never sees a partial update.

use crate::case::CaseRecord;
use crate::config::FeatureWeightConfig;
use crate::error::Result;
use parking_lot::RwLock;
use std::sync::Arc;

/// Read-only configuration and case collection for one matching pass
#[derive(Debug, Clone)]
pub struct MatchContext {
    config: Option<Arc<FeatureWeightConfig>>,
    cases: Arc<[CaseRecord]>,
}

impl Default for MatchContext {
    fn default() -> Self {
        Self {
            config: None,
            cases: Arc::from(Vec::new()),
        }
    }
}

impl MatchContext {
    /// Build a context without checking the configuration; matching
    /// validates it before scoring
    pub fn new(config: FeatureWeightConfig, cases: Vec<CaseRecord>) -> Self {
        Self {
            config: Some(Arc::new(config)),
            cases: Arc::from(cases),
        }
    }

    /// Build a context, rejecting a configuration that fails
    /// [`FeatureWeightConfig::validate`]
    pub fn try_new(config: FeatureWeightConfig, cases: Vec<CaseRecord>) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config, cases))
    }

    /// A context with cases but no weight configuration loaded yet
    pub fn without_config(cases: Vec<CaseRecord>) -> Self {
        Self {
            config: None,
            cases: Arc::from(cases),
        }
    }

    pub fn config(&self) -> Option<&FeatureWeightConfig> {
        self.config.as_deref()
    }

    pub fn cases(&self) -> &[CaseRecord] {
        &self.cases
    }

    pub fn case_count(&self) -> usize {
        self.cases.len()
    }

    /// New context with a replaced configuration, sharing the case collection
    pub fn with_config(&self, config: FeatureWeightConfig) -> Self {
        Self {
            config: Some(Arc::new(config)),
            cases: Arc::clone(&self.cases),
        }
    }

    /// New context with a replaced case collection, sharing the configuration
    pub fn with_cases(&self, cases: Vec<CaseRecord>) -> Self {
        Self {
            config: self.config.clone(),
            cases: Arc::from(cases),
        }
    }
}

/// Holder of the current matching context
///
/// Readers take an `Arc` snapshot; writers replace the whole context.
#[derive(Debug, Default)]
pub struct ContextStore {
    current: RwLock<Arc<MatchContext>>,
}

impl ContextStore {
    pub fn new(context: MatchContext) -> Self {
        Self {
            current: RwLock::new(Arc::new(context)),
        }
    }

    pub fn snapshot(&self) -> Arc<MatchContext> {
        Arc::clone(&self.current.read())
    }

    pub fn replace(&self, context: MatchContext) {
        *self.current.write() = Arc::new(context);
    }

    pub fn replace_config(&self, config: FeatureWeightConfig) {
        let mut current = self.current.write();
        let next = current.with_config(config);
        *current = Arc::new(next);
        let features = current.config().map(|c| c.feature_count()).unwrap_or(0);
        tracing::debug!(features, "weight configuration replaced");
    }

    pub fn replace_cases(&self, cases: Vec<CaseRecord>) {
        let mut current = self.current.write();
        let next = current.with_cases(cases);
        *current = Arc::new(next);
        tracing::debug!(cases = current.case_count(), "case collection replaced");
    }
}

//! Caller-owned cache of compiled schema validators

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, trace};

use crate::Result;
use crate::loader::{SchemaValidator, ValidatorOptions};

/// Compiled validators keyed by the options they were built with.
///
/// Compiling the schema is not free, so a host builds one cache at startup
/// and hands it to every validation call. At most one validator exists per
/// distinct [`ValidatorOptions`] value.
#[derive(Default)]
pub struct ValidatorCache {
    validators: DashMap<ValidatorOptions, Arc<SchemaValidator>>,
}

impl ValidatorCache {
    /// Create an empty cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the validator for `options`, compiling it on first use
    ///
    /// # Errors
    ///
    /// Returns an error when the schema fails to compile.
    pub fn get_or_build(&self, options: ValidatorOptions) -> Result<Arc<SchemaValidator>> {
        if let Some(cached) = self.validators.get(&options) {
            trace!(?options, "Validator cache hit");
            return Ok(Arc::clone(cached.value()));
        }

        debug!(?options, "Validator cache miss");
        let compiled = Arc::new(SchemaValidator::compile(options)?);
        let entry = self.validators.entry(options).or_insert(compiled);
        Ok(Arc::clone(entry.value()))
    }

    /// Number of compiled validators held
    #[must_use]
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Drop every compiled validator
    pub fn clear(&self) {
        self.validators.clear();
    }
}

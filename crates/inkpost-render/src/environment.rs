//! Template resolution and rendering environments.
//!
//! Templates are referenced by [`TemplateRef`] and resolved lazily into
//! [`RenderFn`]s. Resolution needs a live [`RenderEnvironment`], which is
//! created by an [`EnvironmentProvider`] and must be closed when the caller
//! is done with it. [`with_environment`] wraps that lifecycle so the
//! environment is released whether the work succeeds or fails.

use inkpost_config::TemplateRef;

use crate::page::RenderFn;

/// Error returned when a template reference cannot be resolved.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// No template exists for the reference.
    #[error("Template not found: {0}")]
    NotFound(TemplateRef),
    /// The template exists but failed to load or compile.
    #[error("Failed to load template {reference}: {source}")]
    Load {
        /// Reference that failed.
        reference: TemplateRef,
        /// Underlying template engine error.
        #[source]
        source: minijinja::Error,
    },
    /// The rendering environment could not be created or closed.
    #[error("Rendering environment unavailable: {0}")]
    Environment(String),
}

/// Turns template references into render functions.
pub trait TemplateResolver {
    /// Resolve `reference` into a render function.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] if the template is missing or invalid.
    fn resolve(&self, reference: &TemplateRef) -> Result<RenderFn, ResolveError>;
}

/// An isolated context able to resolve templates.
pub trait RenderEnvironment: TemplateResolver {
    /// Release the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Environment`] if teardown fails.
    fn close(self) -> Result<(), ResolveError>;
}

/// Creates fresh rendering environments.
pub trait EnvironmentProvider: Send + Sync {
    /// Environment type handed out by [`EnvironmentProvider::create`].
    type Environment: RenderEnvironment;

    /// Create a new environment.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Environment`] if the environment cannot be set up.
    fn create(&self) -> Result<Self::Environment, ResolveError>;
}

/// Run `f` inside a freshly created environment and always close it.
///
/// If `f` fails, its error is returned and a close failure is only logged.
/// If `f` succeeds but closing fails, the close error is returned.
///
/// # Errors
///
/// Returns the error of `f`, or a [`ResolveError`] from creating or closing
/// the environment.
pub fn with_environment<P, T, E, F>(provider: &P, f: F) -> Result<T, E>
where
    P: EnvironmentProvider + ?Sized,
    F: FnOnce(&P::Environment) -> Result<T, E>,
    E: From<ResolveError>,
{
    let env = provider.create()?;
    let result = f(&env);
    let closed = env.close();

    match (result, closed) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(close_err)) => Err(close_err.into()),
        (Err(err), Ok(())) => Err(err),
        (Err(err), Err(close_err)) => {
            tracing::warn!(error = %close_err, "Failed to close rendering environment");
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Provider that counts created and closed environments.
    #[derive(Default)]
    struct CountingProvider {
        created: AtomicUsize,
        closed: Arc<AtomicUsize>,
        fail_close: bool,
    }

    struct CountingEnvironment {
        closed: Arc<AtomicUsize>,
        fail_close: bool,
    }

    impl TemplateResolver for CountingEnvironment {
        fn resolve(&self, reference: &TemplateRef) -> Result<RenderFn, ResolveError> {
            Err(ResolveError::NotFound(reference.clone()))
        }
    }

    impl RenderEnvironment for CountingEnvironment {
        fn close(self) -> Result<(), ResolveError> {
            self.closed.fetch_add(1, Ordering::SeqCst);
            if self.fail_close {
                return Err(ResolveError::Environment("teardown failed".to_owned()));
            }
            Ok(())
        }
    }

    impl EnvironmentProvider for CountingProvider {
        type Environment = CountingEnvironment;

        fn create(&self) -> Result<Self::Environment, ResolveError> {
            self.created.fetch_add(1, Ordering::SeqCst);
            Ok(CountingEnvironment {
                closed: Arc::clone(&self.closed),
                fail_close: self.fail_close,
            })
        }
    }

    #[test]
    fn test_closes_after_success() {
        let provider = CountingProvider::default();

        let value: Result<u32, ResolveError> = with_environment(&provider, |_| Ok(7));

        assert_eq!(value.unwrap(), 7);
        assert_eq!(provider.created.load(Ordering::SeqCst), 1);
        assert_eq!(provider.closed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_closes_after_failure() {
        let provider = CountingProvider::default();

        let result: Result<(), ResolveError> =
            with_environment(&provider, |env| env.resolve(&TemplateRef::new("x")).map(|_| ()));

        assert!(matches!(result, Err(ResolveError::NotFound(_))));
        assert_eq!(provider.closed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_close_failure_reported_on_success() {
        let provider = CountingProvider {
            fail_close: true,
            ..Default::default()
        };

        let result: Result<(), ResolveError> = with_environment(&provider, |_| Ok(()));

        assert!(matches!(result, Err(ResolveError::Environment(_))));
    }

    #[test]
    fn test_work_error_wins_over_close_failure() {
        let provider = CountingProvider {
            fail_close: true,
            ..Default::default()
        };

        let result: Result<(), ResolveError> =
            with_environment(&provider, |env| env.resolve(&TemplateRef::new("x")).map(|_| ()));

        assert!(matches!(result, Err(ResolveError::NotFound(_))));
        assert_eq!(provider.closed.load(Ordering::SeqCst), 1);
    }
}

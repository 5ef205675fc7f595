use std::borrow::Cow;

/// Errors produced while loading or validating emitter configuration.
///
/// Registry operations themselves never fail; see [`crate::EventEmitter`].
#[derive(Debug, thiserror::Error)]
pub enum EmitterError {
    /// The layered configuration could not be built or deserialized.
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },

    /// Configuration values were read but are not usable.
    #[error("Invalid emitter configuration{}: {message}", format_context(.context))]
    InvalidConfiguration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Adds `.context(...)` to results that carry or convert into [`EmitterError`].
pub trait EmitterErrorExt<T> {
    /// Attaches a human-readable context message to the error, if any.
    ///
    /// # Errors
    /// Returns the original error, converted into [`EmitterError`], with the
    /// context attached.
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, EmitterError>;
}

impl<T> EmitterErrorExt<T> for Result<T, EmitterError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Self {
        self.map_err(|mut e| {
            match &mut e {
                EmitterError::Config { context: c, .. }
                | EmitterError::InvalidConfiguration { context: c, .. } => {
                    *c = Some(context.into());
                },
            }
            e
        })
    }
}

impl<T> EmitterErrorExt<T> for Result<T, config::ConfigError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, EmitterError> {
        self.map_err(|source| EmitterError::Config { source, context: Some(context.into()) })
    }
}

impl From<config::ConfigError> for EmitterError {
    #[inline]
    fn from(source: config::ConfigError) -> Self {
        Self::Config { source, context: None }
    }
}

fn format_context(context: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    context.as_ref().map_or(Cow::Borrowed(""), |c| Cow::Owned(format!(" ({c})")))
}

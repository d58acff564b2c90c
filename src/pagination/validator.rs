//! Side-channel token validation.
//!
//! Lets request middleware reject malformed or edited cursors without knowing
//! the entity type or sort columns an encoder would need.

use crate::core::token::ContinuationTokenOptions;
use crate::pagination::serializer::{DefaultSerializerFactory, SerializerFactory};

#[derive(Debug, Clone, Default)]
pub struct TokenValidator<F = DefaultSerializerFactory> {
    factory: F,
}

impl TokenValidator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<F: SerializerFactory> TokenValidator<F> {
    pub fn with_factory(factory: F) -> Self {
        Self { factory }
    }

    /// Whether `text` is blank or decodes under `options`. Never fails.
    pub fn is_valid_token(&self, text: &str, options: ContinuationTokenOptions) -> bool {
        if text.trim().is_empty() {
            return true;
        }
        self.factory.create(options).is_valid(text)
    }
}

/// [`TokenValidator::is_valid_token`] with the default serializer factory.
pub fn is_valid_token(text: &str, options: ContinuationTokenOptions) -> bool {
    TokenValidator::new().is_valid_token(text, options)
}

//! Missing-token recognition.
//!
//! A [`MissingRecognizer`] holds the sentinel tokens that denote a missing
//! value (for example `""`, `"NA"`, `"-99"`). Each token may carry an alias
//! that is reported as its reason tag instead of the token itself.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use labelled_model::{LabelledError, Result, Value, ValueType};

/// Whether classification reports a reason for missing cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recognition {
    /// Missing cells classify as `Missing(None)`.
    #[default]
    Untagged,
    /// Missing cells classify as `Missing(Some(reason))`.
    Tagged,
}

/// Outcome of classifying one raw cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification<'a> {
    Present,
    Missing(Option<&'a str>),
}

impl Classification<'_> {
    pub fn is_missing(&self) -> bool {
        matches!(self, Classification::Missing(_))
    }
}

/// Classifies raw cells as present or missing-with-reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingRecognizer {
    /// Token to optional alias.
    tokens: BTreeMap<String, Option<String>>,
    #[serde(default)]
    recognition: Recognition,
}

impl Default for MissingRecognizer {
    fn default() -> Self {
        Self::new([""])
    }
}

impl MissingRecognizer {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens
                .into_iter()
                .map(|token| (token.into(), None))
                .collect(),
            recognition: Recognition::default(),
        }
    }

    /// Recognizer that treats nothing as missing.
    pub fn none() -> Self {
        Self::new(Vec::<String>::new())
    }

    /// Report `alias` as the reason for `token`, adding the token if needed.
    #[must_use]
    pub fn with_alias(mut self, token: impl Into<String>, alias: impl Into<String>) -> Self {
        self.tokens.insert(token.into(), Some(alias.into()));
        self
    }

    #[must_use]
    pub fn with_recognition(mut self, recognition: Recognition) -> Self {
        self.recognition = recognition;
        self
    }

    #[must_use]
    pub fn tagged(self) -> Self {
        self.with_recognition(Recognition::Tagged)
    }

    pub fn recognition(&self) -> Recognition {
        self.recognition
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.tokens.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn is_missing_token(&self, raw: &str) -> bool {
        self.tokens.contains_key(raw)
    }

    /// Reason tag for a token: its alias, or the token itself.
    pub fn reason(&self, token: &str) -> Option<&str> {
        self.tokens
            .get_key_value(token)
            .map(|(token, alias)| alias.as_deref().unwrap_or(token))
    }

    /// Distinct reason tags, in token order.
    pub fn reasons(&self) -> Vec<&str> {
        let mut reasons: Vec<&str> = Vec::with_capacity(self.tokens.len());
        for token in self.tokens.keys() {
            if let Some(reason) = self.reason(token)
                && !reasons.contains(&reason)
            {
                reasons.push(reason);
            }
        }
        reasons
    }

    /// Classify a raw cell using the configured [`Recognition`].
    pub fn classify(&self, raw: &str) -> Classification<'_> {
        match self.recognition {
            Recognition::Untagged if self.is_missing_token(raw) => Classification::Missing(None),
            Recognition::Untagged => Classification::Present,
            Recognition::Tagged => self.classify_tagged(raw),
        }
    }

    /// Classify a raw cell, always reporting the reason tag.
    pub fn classify_tagged(&self, raw: &str) -> Classification<'_> {
        match self.reason(raw) {
            Some(reason) => Classification::Missing(Some(reason)),
            None => Classification::Present,
        }
    }

    /// Fail if a token is also a member of a field's typed domain.
    ///
    /// # Errors
    ///
    /// Returns [`LabelledError::AmbiguousMissingToken`] for the first overlap.
    pub fn check_domain(&self, field: &str, value_type: ValueType, domain: &[Value]) -> Result<()> {
        for token in self.tokens.keys() {
            let Some(value) = value_type.parse(token) else {
                continue;
            };
            if domain.contains(&value) {
                return Err(LabelledError::AmbiguousMissingToken {
                    field: field.to_string(),
                    token: token.clone(),
                });
            }
        }
        Ok(())
    }
}

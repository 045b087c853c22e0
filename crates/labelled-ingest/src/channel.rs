//! Channel requests and output column naming.
//!
//! A source column can be split into a `values` channel (the typed value)
//! and a `missing` channel (the reason a value is absent). Naming rules:
//!
//! - one channel without an explicit suffix keeps the source name
//! - otherwise each column is `source + suffix`, where the suffix is the
//!   explicit override or `_values` / `_missing`
//! - an explicit empty suffix always means "no suffix"

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use labelled_model::{LabelledError, Result};

/// A facet extractable from a source column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Values,
    Missing,
}

impl ChannelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelKind::Values => "values",
            ChannelKind::Missing => "missing",
        }
    }

    pub fn default_suffix(&self) -> &'static str {
        match self {
            ChannelKind::Values => "_values",
            ChannelKind::Missing => "_missing",
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChannelKind {
    type Err = LabelledError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "values" => Ok(ChannelKind::Values),
            "missing" => Ok(ChannelKind::Missing),
            _ => Err(LabelledError::UnknownChannel {
                token: s.to_string(),
            }),
        }
    }
}

/// One requested channel with an optional suffix override.
///
/// Deserialises from `"values"` or `["missing", "_why"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RequestFragment", into = "RequestFragment")]
pub struct ChannelRequest {
    pub kind: ChannelKind,
    pub suffix: Option<String>,
}

impl ChannelRequest {
    pub fn new(kind: ChannelKind) -> Self {
        Self { kind, suffix: None }
    }

    #[must_use]
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }
}

impl From<ChannelKind> for ChannelRequest {
    fn from(kind: ChannelKind) -> Self {
        Self::new(kind)
    }
}

/// Parses `KIND` or `KIND:SUFFIX`. `values:` requests an empty suffix.
impl FromStr for ChannelRequest {
    type Err = LabelledError;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once(':') {
            Some((kind, suffix)) => Ok(Self::new(kind.parse()?).with_suffix(suffix)),
            None => Ok(Self::new(s.parse()?)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RequestFragment {
    Bare(String),
    Pair(String, String),
}

impl TryFrom<RequestFragment> for ChannelRequest {
    type Error = LabelledError;

    fn try_from(fragment: RequestFragment) -> Result<Self> {
        match fragment {
            RequestFragment::Bare(kind) => Ok(Self::new(kind.parse()?)),
            RequestFragment::Pair(kind, suffix) => Ok(Self::new(kind.parse()?).with_suffix(suffix)),
        }
    }
}

impl From<ChannelRequest> for RequestFragment {
    fn from(request: ChannelRequest) -> Self {
        match request.suffix {
            Some(suffix) => RequestFragment::Pair(request.kind.as_str().to_string(), suffix),
            None => RequestFragment::Bare(request.kind.as_str().to_string()),
        }
    }
}

/// Validated, ordered, non-empty list of channel requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ChannelRequest>", into = "Vec<ChannelRequest>")]
pub struct ChannelSpec {
    requests: Vec<ChannelRequest>,
}

impl Default for ChannelSpec {
    fn default() -> Self {
        Self {
            requests: vec![ChannelRequest::new(ChannelKind::Values)],
        }
    }
}

impl ChannelSpec {
    /// # Errors
    ///
    /// - [`LabelledError::EmptyChannelSpec`] for an empty list
    /// - [`LabelledError::DuplicateChannel`] if a kind is requested twice
    pub fn new(requests: Vec<ChannelRequest>) -> Result<Self> {
        if requests.is_empty() {
            return Err(LabelledError::EmptyChannelSpec);
        }
        for (index, request) in requests.iter().enumerate() {
            if requests[..index]
                .iter()
                .any(|earlier| earlier.kind == request.kind)
            {
                return Err(LabelledError::DuplicateChannel {
                    kind: request.kind.to_string(),
                });
            }
        }
        Ok(Self { requests })
    }

    /// Build from bare channel tokens such as `["values", "missing"]`.
    ///
    /// # Errors
    ///
    /// Returns [`LabelledError::UnknownChannel`] for unrecognised tokens, and
    /// the errors of [`ChannelSpec::new`].
    pub fn parse<I, S>(tokens: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let requests = tokens
            .into_iter()
            .map(|token| token.as_ref().parse::<ChannelKind>().map(ChannelRequest::new))
            .collect::<Result<Vec<_>>>()?;
        Self::new(requests)
    }

    /// Values channel only.
    pub fn values() -> Self {
        Self::default()
    }

    /// Values then missing, with default suffixes.
    pub fn values_and_missing() -> Self {
        Self {
            requests: vec![
                ChannelRequest::new(ChannelKind::Values),
                ChannelRequest::new(ChannelKind::Missing),
            ],
        }
    }

    pub fn requests(&self) -> &[ChannelRequest] {
        &self.requests
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn contains(&self, kind: ChannelKind) -> bool {
        self.requests.iter().any(|request| request.kind == kind)
    }

    /// Output column name for `request` applied to `source`.
    pub fn column_name(&self, source: &str, request: &ChannelRequest) -> String {
        match (&request.suffix, self.requests.len()) {
            (Some(suffix), _) => format!("{source}{suffix}"),
            (None, 1) => source.to_string(),
            (None, _) => format!("{source}{}", request.kind.default_suffix()),
        }
    }

    /// Output column names for one source column, in request order.
    pub fn column_names(&self, source: &str) -> Vec<(ChannelKind, String)> {
        self.requests
            .iter()
            .map(|request| (request.kind, self.column_name(source, request)))
            .collect()
    }
}

impl TryFrom<Vec<ChannelRequest>> for ChannelSpec {
    type Error = LabelledError;

    fn try_from(requests: Vec<ChannelRequest>) -> Result<Self> {
        Self::new(requests)
    }
}

impl From<ChannelSpec> for Vec<ChannelRequest> {
    fn from(spec: ChannelSpec) -> Self {
        spec.requests
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_channel_keeps_source_name() {
        let spec = ChannelSpec::parse(["missing"]).expect("spec");
        assert_eq!(
            spec.column_names("age"),
            vec![(ChannelKind::Missing, "age".to_string())]
        );
    }

    #[test]
    fn explicit_suffix_applies_to_single_channel() {
        let spec = ChannelSpec::new(vec!["values:_v".parse().expect("request")]).expect("spec");
        assert_eq!(spec.column_name("age", &spec.requests()[0]), "age_v");
    }

    #[test]
    fn two_channels_use_default_suffixes_in_request_order() {
        let spec = ChannelSpec::parse(["missing", "values"]).expect("spec");
        assert_eq!(
            spec.column_names("age"),
            vec![
                (ChannelKind::Missing, "age_missing".to_string()),
                (ChannelKind::Values, "age_values".to_string()),
            ]
        );
    }

    #[test]
    fn empty_suffix_override_means_unsuffixed() {
        let spec = ChannelSpec::new(vec![
            ChannelRequest::new(ChannelKind::Values).with_suffix(""),
            ChannelRequest::new(ChannelKind::Missing),
        ])
        .expect("spec");
        assert_eq!(
            spec.column_names("age"),
            vec![
                (ChannelKind::Values, "age".to_string()),
                (ChannelKind::Missing, "age_missing".to_string()),
            ]
        );
    }

    #[test]
    fn rejects_bad_specs() {
        assert_eq!(
            ChannelSpec::parse(["values", "labels"]),
            Err(LabelledError::UnknownChannel {
                token: "labels".to_string()
            })
        );
        assert_eq!(
            ChannelSpec::parse(["values", "values"]),
            Err(LabelledError::DuplicateChannel {
                kind: "values".to_string()
            })
        );
        assert_eq!(
            ChannelSpec::parse(Vec::<String>::new()),
            Err(LabelledError::EmptyChannelSpec)
        );
        assert!("Values".parse::<ChannelKind>().is_err());
    }
}

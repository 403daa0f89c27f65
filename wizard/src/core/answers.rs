//! The answer snapshot threaded through every prompter.

use std::collections::BTreeMap;

use crate::core::keys::ParamKey;
use crate::core::types::{Credentials, ProjectCreationMode};

/// A resolved parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerValue {
    Text(String),
    Credentials(Credentials),
}

impl AnswerValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AnswerValue::Text(text) => Some(text),
            AnswerValue::Credentials(_) => None,
        }
    }

    pub fn as_credentials(&self) -> Option<&Credentials> {
        match self {
            AnswerValue::Credentials(credentials) => Some(credentials),
            AnswerValue::Text(_) => None,
        }
    }
}

impl From<String> for AnswerValue {
    fn from(value: String) -> Self {
        AnswerValue::Text(value)
    }
}

impl From<Credentials> for AnswerValue {
    fn from(value: Credentials) -> Self {
        AnswerValue::Credentials(value)
    }
}

/// Immutable snapshot of everything collected so far.
///
/// Prompters never mutate a snapshot they were handed; [`Answers::with`]
/// returns a new one. Keys are only ever added or replaced, never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Answers {
    mode: ProjectCreationMode,
    values: BTreeMap<ParamKey, AnswerValue>,
}

impl Answers {
    pub fn new(mode: ProjectCreationMode) -> Self {
        Self {
            mode,
            values: BTreeMap::new(),
        }
    }

    /// Start a session from flag-supplied values.
    pub fn seeded<I>(mode: ProjectCreationMode, supplied: I) -> Self
    where
        I: IntoIterator<Item = (ParamKey, String)>,
    {
        let values = supplied
            .into_iter()
            .map(|(key, value)| (key, AnswerValue::Text(value)))
            .collect();
        Self { mode, values }
    }

    pub fn mode(&self) -> ProjectCreationMode {
        self.mode
    }

    pub fn with(&self, key: ParamKey, value: impl Into<AnswerValue>) -> Self {
        let mut next = self.clone();
        next.values.insert(key, value.into());
        next
    }

    pub fn get(&self, key: ParamKey) -> Option<&AnswerValue> {
        self.values.get(&key)
    }

    pub fn text(&self, key: ParamKey) -> Option<&str> {
        self.get(key).and_then(AnswerValue::as_text)
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.get(ParamKey::Credentials)
            .and_then(AnswerValue::as_credentials)
    }

    pub fn contains(&self, key: ParamKey) -> bool {
        self.values.contains_key(&key)
    }

    pub fn keys(&self) -> impl Iterator<Item = ParamKey> + '_ {
        self.values.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

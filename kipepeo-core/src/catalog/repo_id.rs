use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::RepoIdError;

/// A hub repository id: `owner/name`, or a bare `name` for legacy
/// top-level repositories such as `gpt2`.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq)]
#[serde(try_from = "String")]
pub struct RepoId {
    pub owner: Option<String>,
    pub name: String,
}

impl FromStr for RepoId {
    type Err = RepoIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (owner, name) = match s.split_once('/') {
            Some((owner, _)) if owner.is_empty() => {
                return Err(RepoIdError::MissingOwner(s.to_string()));
            }
            Some((owner, name)) => (Some(owner), name),
            None => (None, s),
        };

        if name.is_empty() {
            return Err(RepoIdError::MissingName(s.to_string()));
        }
        if name.contains('/') {
            return Err(RepoIdError::TooManySegments(s.to_string()));
        }

        Ok(Self {
            owner: owner.map(str::to_string),
            name: name.to_string(),
        })
    }
}

impl TryFrom<String> for RepoId {
    type Error = RepoIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.owner {
            Some(owner) => write!(f, "{}/{}", owner, self.name),
            None => f.write_str(&self.name),
        }
    }
}

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const MAX_ID_LEN: usize = 12;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdError {
    #[error("Structure identifier cannot be empty")]
    Empty,
    #[error("Structure identifier '{0}' is longer than {max} characters", max = MAX_ID_LEN)]
    TooLong(String),
    #[error("Structure identifier '{0}' may only contain ASCII letters, digits and '_'")]
    InvalidCharacter(String),
}

/// An archive identifier such as `6LKD` or `PDB_00006LKD`, stored upper case.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructureId(String);

impl StructureId {
    pub fn new(raw: &str) -> Result<Self, IdError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(IdError::Empty);
        }
        if trimmed.len() > MAX_ID_LEN {
            return Err(IdError::TooLong(trimmed.to_string()));
        }
        if !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(IdError::InvalidCharacter(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for StructureId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for StructureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

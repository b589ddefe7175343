use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

const USER_PREFIX: &str = "user/";
const PAT_SUFFIX: &str = "/pat";
const INSTALLATION_PREFIX: &str = "installation/";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenSlotError {
    #[error("unknown token slot: {0}")]
    Unknown(String),
    #[error("invalid owner id in slot: {0:?}")]
    InvalidOwner(String),
}

/// The owning record a stored secret belongs to.
///
/// Slots render as `user/<id>/pat` and `installation/<id>`, which is also
/// the key written to the backing store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TokenSlot {
    /// A user's GitHub personal access token
    PersonalAccessToken { user_id: String },
    /// The GitHub App installation bound to an account
    Installation { account_id: String },
}

fn validate_owner(id: &str) -> Result<(), TokenSlotError> {
    if id.is_empty() || id.contains('/') || id.chars().any(char::is_whitespace) {
        return Err(TokenSlotError::InvalidOwner(id.to_string()));
    }
    Ok(())
}

impl TokenSlot {
    pub fn personal_access_token(user_id: impl Into<String>) -> Result<Self, TokenSlotError> {
        let user_id = user_id.into();
        validate_owner(&user_id)?;
        Ok(Self::PersonalAccessToken { user_id })
    }

    pub fn installation(account_id: impl Into<String>) -> Result<Self, TokenSlotError> {
        let account_id = account_id.into();
        validate_owner(&account_id)?;
        Ok(Self::Installation { account_id })
    }

    pub fn owner(&self) -> &str {
        match self {
            Self::PersonalAccessToken { user_id } => user_id,
            Self::Installation { account_id } => account_id,
        }
    }
}

impl fmt::Display for TokenSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PersonalAccessToken { user_id } => {
                write!(f, "{}{}{}", USER_PREFIX, user_id, PAT_SUFFIX)
            }
            Self::Installation { account_id } => write!(f, "{}{}", INSTALLATION_PREFIX, account_id),
        }
    }
}

impl FromStr for TokenSlot {
    type Err = TokenSlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(user_id) = s
            .strip_prefix(USER_PREFIX)
            .and_then(|rest| rest.strip_suffix(PAT_SUFFIX))
        {
            return Self::personal_access_token(user_id);
        }
        if let Some(account_id) = s.strip_prefix(INSTALLATION_PREFIX) {
            return Self::installation(account_id);
        }
        Err(TokenSlotError::Unknown(s.to_string()))
    }
}

impl TryFrom<String> for TokenSlot {
    type Error = TokenSlotError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TokenSlot> for String {
    fn from(slot: TokenSlot) -> Self {
        slot.to_string()
    }
}

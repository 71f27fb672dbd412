//! Strongly typed identifiers for scoped-credential requests.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal, $validate:path) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Creates a new identifier after validation.
			pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
				let view = value.as_ref();

				$validate($kind, view)?;

				Ok(Self(view.to_owned()))
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				$validate($kind, &value)?;

				Ok(Self(value))
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!(stringify!($name), "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
	};
}

const PRINCIPAL_MIN_LEN: usize = 2;
const PRINCIPAL_MAX_LEN: usize = 32;
const POLICY_ARN_MAX_LEN: usize = 2048;
const POLICY_ARN_PREFIX: &str = "arn:";

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} cannot be empty.")]
	Empty {
		/// Kind of identifier (principal name, permission boundary).
		kind: &'static str,
	},
	/// The identifier contains a character outside the allowed set.
	#[error("{kind} contains the disallowed character {character:?}.")]
	InvalidCharacter {
		/// Kind of identifier (principal name, permission boundary).
		kind: &'static str,
		/// First offending character.
		character: char,
	},
	/// The identifier length falls outside the allowed range.
	#[error("{kind} must be between {min} and {max} characters.")]
	Length {
		/// Kind of identifier (principal name, permission boundary).
		kind: &'static str,
		/// Minimum permitted character count.
		min: usize,
		/// Maximum permitted character count.
		max: usize,
	},
	/// The permission boundary is not an ARN.
	#[error("{kind} must be an ARN starting with `arn:`.")]
	NotAnArn {
		/// Kind of identifier (permission boundary).
		kind: &'static str,
	},
}

def_id! {
	PrincipalName,
	"Name of the federated principal the scoped credentials are issued to.",
	"Principal name",
	validate_principal
}
def_id! {
	PolicyArn,
	"ARN of the single managed policy bounding the scoped credentials.",
	"Permission boundary",
	validate_policy_arn
}

fn validate_principal(kind: &'static str, view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if let Some(character) = view.chars().find(|c| !is_principal_char(*c)) {
		return Err(IdentifierError::InvalidCharacter { kind, character });
	}
	if !(PRINCIPAL_MIN_LEN..=PRINCIPAL_MAX_LEN).contains(&view.len()) {
		return Err(IdentifierError::Length {
			kind,
			min: PRINCIPAL_MIN_LEN,
			max: PRINCIPAL_MAX_LEN,
		});
	}

	Ok(())
}

fn is_principal_char(c: char) -> bool {
	c.is_ascii_alphanumeric() || matches!(c, '+' | '=' | ',' | '.' | '@' | '_' | '-')
}

fn validate_policy_arn(kind: &'static str, view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if let Some(character) = view.chars().find(|c| c.is_whitespace() || c.is_control()) {
		return Err(IdentifierError::InvalidCharacter { kind, character });
	}
	if !view.starts_with(POLICY_ARN_PREFIX) {
		return Err(IdentifierError::NotAnArn { kind });
	}
	if view.len() > POLICY_ARN_MAX_LEN {
		return Err(IdentifierError::Length {
			kind,
			min: POLICY_ARN_PREFIX.len(),
			max: POLICY_ARN_MAX_LEN,
		});
	}

	Ok(())
}

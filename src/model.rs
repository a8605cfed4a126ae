//! The user record and its schema.
//!
//! [`UserInput`] is whatever a client sent. The only way to get the values
//! the store accepts, [`NewUser`] and [`UserPatch`], is through schema
//! validation, so nothing unchecked reaches the persistence boundary.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

/// Shortest accepted value for every text field, in characters.
pub const MIN_LEN: usize = 2;

/// A stored user, as returned to clients.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub hobby: String,
}

/// The schema's fields. Ordering follows declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    FirstName,
    LastName,
    Hobby,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::FirstName, Field::LastName, Field::Hobby];

    /// The JSON key, which is also the stored document key.
    pub fn key(self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName  => "lastName",
            Self::Hobby     => "hobby",
        }
    }

    /// Message for a missing or empty value.
    pub fn required_message(self) -> &'static str {
        match self {
            Self::FirstName => "First name is required",
            Self::LastName  => "Last name is required",
            Self::Hobby     => "Hobby is required",
        }
    }

    fn too_short_message(self, value: &str) -> String {
        format!(
            "Path `{}` (`{value}`) is shorter than the minimum allowed length ({MIN_LEN}).",
            self.key(),
        )
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ── Validation errors ─────────────────────────────────────────────────────────

/// Every field that failed validation, with the reason, in schema order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<Field, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The message recorded for `field`, if it failed.
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    fn into_result<T>(self, ok: T) -> Result<T, Self> {
        if self.is_empty() { Ok(ok) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("User validation failed")?;
        for (i, (field, message)) in self.0.iter().enumerate() {
            let sep = if i == 0 { ": " } else { ", " };
            write!(f, "{sep}{field}: {message}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(field, message)| (field.key(), message)))
    }
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// User fields as sent by a client. Unknown keys are ignored.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub hobby: Option<String>,
}

impl UserInput {
    fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::FirstName => self.first_name.as_deref(),
            Field::LastName  => self.last_name.as_deref(),
            Field::Hobby     => self.hobby.as_deref(),
        }
    }

    /// Validates a full record for insertion.
    pub fn into_new_user(self) -> Result<NewUser, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for field in Field::ALL {
            match self.get(field) {
                None | Some("") => errors.add(field, field.required_message()),
                Some(value) => check_len(&mut errors, field, value),
            }
        }
        errors.into_result(())?;
        Ok(NewUser {
            first_name: self.first_name.unwrap_or_default(),
            last_name: self.last_name.unwrap_or_default(),
            hobby: self.hobby.unwrap_or_default(),
        })
    }

    /// Validates the supplied fields of a partial update. Absent fields are
    /// left alone; present ones obey the same rules as on insert.
    pub fn into_patch(self) -> Result<UserPatch, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for field in Field::ALL {
            match self.get(field) {
                None => {}
                Some("") => errors.add(field, field.required_message()),
                Some(value) => check_len(&mut errors, field, value),
            }
        }
        errors.into_result(UserPatch {
            first_name: self.first_name,
            last_name: self.last_name,
            hobby: self.hobby,
        })
    }
}

fn check_len(errors: &mut ValidationErrors, field: Field, value: &str) {
    if value.chars().count() < MIN_LEN {
        errors.add(field, field.too_short_message(value));
    }
}

// ── Validated values ──────────────────────────────────────────────────────────

/// A complete, schema-valid user awaiting an identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewUser {
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) hobby: String,
}

impl NewUser {
    pub fn first_name(&self) -> &str { &self.first_name }
    pub fn last_name(&self) -> &str { &self.last_name }
    pub fn hobby(&self) -> &str { &self.hobby }
}

/// Schema-valid replacements for some subset of a user's fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub(crate) first_name: Option<String>,
    pub(crate) last_name: Option<String>,
    pub(crate) hobby: Option<String>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.changes().next().is_none()
    }

    /// `(field, new value)` for every field the patch replaces.
    pub fn changes(&self) -> impl Iterator<Item = (Field, &str)> {
        [
            (Field::FirstName, self.first_name.as_deref()),
            (Field::LastName, self.last_name.as_deref()),
            (Field::Hobby, self.hobby.as_deref()),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|v| (field, v)))
    }

    pub(crate) fn apply(&self, user: &mut User) {
        for (field, value) in self.changes() {
            let slot = match field {
                Field::FirstName => &mut user.first_name,
                Field::LastName  => &mut user.last_name,
                Field::Hobby     => &mut user.hobby,
            };
            value.clone_into(slot);
        }
    }
}

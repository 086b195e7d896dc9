use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use uuid::Uuid;

use crate::contact::errors::ContactError;
use crate::contact::errors::ContactFieldError;
use crate::contact::errors::ContactIdError;
use crate::domain::user::models::UserId;

/// Contact entity, always owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub id: ContactId,
    pub owner_id: UserId,
    pub first_name: ContactName,
    pub last_name: ContactName,
    pub email: ContactEmail,
    pub phone: PhoneNumber,
    pub birthday: NaiveDate,
    pub additional_info: Option<AdditionalInfo>,
    pub created_at: DateTime<Utc>,
}

impl Contact {
    pub fn new(owner_id: UserId, details: ContactDetails) -> Self {
        Self {
            id: ContactId::new(),
            owner_id,
            first_name: details.first_name,
            last_name: details.last_name,
            email: details.email,
            phone: details.phone,
            birthday: details.birthday,
            additional_info: details.additional_info,
            created_at: Utc::now(),
        }
    }

    /// Overwrite every editable field with `details`.
    pub fn apply(&mut self, details: ContactDetails) {
        self.first_name = details.first_name;
        self.last_name = details.last_name;
        self.email = details.email;
        self.phone = details.phone;
        self.birthday = details.birthday;
        self.additional_info = details.additional_info;
    }
}

/// Contact unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContactId(pub Uuid);

impl ContactId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a contact ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, ContactIdError> {
        Uuid::parse_str(s)
            .map(ContactId)
            .map_err(|e| ContactIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for ContactId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

fn bounded(
    field: &'static str,
    value: String,
    max: usize,
) -> Result<String, ContactFieldError> {
    let value = value.trim().to_string();
    let length = value.chars().count();
    if length == 0 {
        Err(ContactFieldError::Empty { field })
    } else if length > max {
        Err(ContactFieldError::TooLong {
            field,
            max,
            actual: length,
        })
    } else {
        Ok(value)
    }
}

/// First or last name of a contact, 1-50 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactName(String);

impl ContactName {
    const MAX_LENGTH: usize = 50;

    /// # Arguments
    /// * `field` - Field name reported in validation errors
    /// * `name` - Raw name
    pub fn new(field: &'static str, name: String) -> Result<Self, ContactFieldError> {
        bounded(field, name, Self::MAX_LENGTH).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Contact email, syntactically valid and at most 320 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactEmail(String);

impl ContactEmail {
    const MAX_LENGTH: usize = 320;

    pub fn new(email: String) -> Result<Self, ContactFieldError> {
        let email = bounded("email", email, Self::MAX_LENGTH)?;
        email_address::EmailAddress::from_str(&email)
            .map(|_| Self(email))
            .map_err(|e| ContactFieldError::InvalidEmail(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    const MAX_LENGTH: usize = 15;

    pub fn new(phone: String) -> Result<Self, ContactFieldError> {
        bounded("phone", phone, Self::MAX_LENGTH).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Free-form note attached to a contact, at most 350 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdditionalInfo(String);

impl AdditionalInfo {
    const MAX_LENGTH: usize = 350;

    pub fn new(info: String) -> Result<Self, ContactFieldError> {
        bounded("additional_info", info, Self::MAX_LENGTH).map(Self)
    }

    /// Blank input is treated as no note at all.
    pub fn optional(info: Option<String>) -> Result<Option<Self>, ContactFieldError> {
        match info {
            Some(info) if !info.trim().is_empty() => Self::new(info).map(Some),
            _ => Ok(None),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validated editable fields of a contact, used for create and full update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDetails {
    pub first_name: ContactName,
    pub last_name: ContactName,
    pub email: ContactEmail,
    pub phone: PhoneNumber,
    pub birthday: NaiveDate,
    pub additional_info: Option<AdditionalInfo>,
}

/// Case-insensitive substring filters, all provided ones must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactSearch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl ContactSearch {
    pub fn new(
        first_name: Option<String>,
        last_name: Option<String>,
        email: Option<String>,
    ) -> Self {
        let clean = |value: Option<String>| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            first_name: clean(first_name),
            last_name: clean(last_name),
            email: clean(email),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.email.is_none()
    }

    pub fn matches(&self, contact: &Contact) -> bool {
        fn contains(haystack: &str, needle: &Option<String>) -> bool {
            needle
                .as_ref()
                .map_or(true, |n| haystack.to_lowercase().contains(&n.to_lowercase()))
        }

        contains(contact.first_name.as_str(), &self.first_name)
            && contains(contact.last_name.as_str(), &self.last_name)
            && contains(contact.email.as_str(), &self.email)
    }
}

/// Offset pagination over a user's contacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub skip: u32,
    pub limit: u32,
}

impl Page {
    pub const DEFAULT_LIMIT: u32 = 100;
    pub const MAX_LIMIT: u32 = 1000;

    /// # Errors
    /// * `InvalidQuery` - Limit above the maximum page size
    pub fn new(skip: Option<u32>, limit: Option<u32>) -> Result<Self, ContactError> {
        let limit = limit.unwrap_or(Self::DEFAULT_LIMIT);
        if limit > Self::MAX_LIMIT {
            return Err(ContactError::InvalidQuery(format!(
                "limit must be at most {}",
                Self::MAX_LIMIT
            )));
        }

        Ok(Self {
            skip: skip.unwrap_or(0),
            limit,
        })
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

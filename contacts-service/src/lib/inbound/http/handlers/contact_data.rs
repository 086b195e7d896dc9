use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use crate::contact::errors::ContactFieldError;
use crate::contact::models::AdditionalInfo;
use crate::contact::models::Contact;
use crate::contact::models::ContactDetails;
use crate::contact::models::ContactEmail;
use crate::contact::models::ContactId;
use crate::contact::models::ContactName;
use crate::contact::models::PhoneNumber;

/// HTTP request body for creating or replacing a contact (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContactRequest {
    first_name: String,
    last_name: String,
    email: String,
    phone: String,
    birthday: NaiveDate,
    #[serde(default)]
    additional_info: Option<String>,
}

impl ContactRequest {
    pub fn try_into_details(self) -> Result<ContactDetails, ContactFieldError> {
        Ok(ContactDetails {
            first_name: ContactName::new("first_name", self.first_name)?,
            last_name: ContactName::new("last_name", self.last_name)?,
            email: ContactEmail::new(self.email)?,
            phone: PhoneNumber::new(self.phone)?,
            birthday: self.birthday,
            additional_info: AdditionalInfo::optional(self.additional_info)?,
        })
    }
}

impl From<ContactFieldError> for ApiError {
    fn from(err: ContactFieldError) -> Self {
        ApiError::UnprocessableEntity(format!("Invalid contact: {}", err))
    }
}

/// Parse the `:contact_id` path segment.
pub fn parse_contact_id(raw: &str) -> Result<ContactId, ApiError> {
    ContactId::from_string(raw)
        .map_err(|e| ApiError::UnprocessableEntity(format!("Invalid contact ID: {}", e)))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactData {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub birthday: NaiveDate,
    pub additional_info: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Contact> for ContactData {
    fn from(contact: &Contact) -> Self {
        Self {
            id: contact.id.to_string(),
            first_name: contact.first_name.as_str().to_string(),
            last_name: contact.last_name.as_str().to_string(),
            email: contact.email.as_str().to_string(),
            phone: contact.phone.as_str().to_string(),
            birthday: contact.birthday,
            additional_info: contact
                .additional_info
                .as_ref()
                .map(|info| info.as_str().to_string()),
            created_at: contact.created_at,
        }
    }
}

pub fn to_contact_list(contacts: &[Contact]) -> Vec<ContactData> {
    contacts.iter().map(ContactData::from).collect()
}

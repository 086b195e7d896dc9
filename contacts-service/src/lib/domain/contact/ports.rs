use async_trait::async_trait;

use crate::contact::errors::ContactError;
use crate::contact::models::Contact;
use crate::contact::models::ContactDetails;
use crate::contact::models::ContactId;
use crate::contact::models::ContactSearch;
use crate::contact::models::Page;
use crate::domain::user::models::UserId;

/// Port for contact domain service operations.
///
/// Every operation is scoped to `owner`; another user's contact behaves
/// exactly like a missing one.
#[async_trait]
pub trait ContactServicePort: Send + Sync + 'static {
    async fn list_contacts(&self, owner: &UserId, page: Page) -> Result<Vec<Contact>, ContactError>;

    /// # Errors
    /// * `NotFound` - No such contact for this owner
    async fn get_contact(&self, owner: &UserId, id: &ContactId) -> Result<Contact, ContactError>;

    async fn create_contact(
        &self,
        owner: &UserId,
        details: ContactDetails,
    ) -> Result<Contact, ContactError>;

    /// Replace every editable field of a contact.
    ///
    /// # Errors
    /// * `NotFound` - No such contact for this owner
    async fn update_contact(
        &self,
        owner: &UserId,
        id: &ContactId,
        details: ContactDetails,
    ) -> Result<Contact, ContactError>;

    /// # Returns
    /// The removed contact
    ///
    /// # Errors
    /// * `NotFound` - No such contact for this owner
    async fn delete_contact(&self, owner: &UserId, id: &ContactId) -> Result<Contact, ContactError>;

    async fn search_contacts(
        &self,
        owner: &UserId,
        search: ContactSearch,
    ) -> Result<Vec<Contact>, ContactError>;

    /// Contacts whose birthday falls within the next `days` days, soonest
    /// first.
    async fn upcoming_birthdays(&self, owner: &UserId, days: u32)
        -> Result<Vec<Contact>, ContactError>;
}

/// Persistence operations for contacts.
#[async_trait]
pub trait ContactRepository: Send + Sync + 'static {
    async fn create(&self, contact: Contact) -> Result<Contact, ContactError>;

    /// # Returns
    /// Optional contact (None if missing or owned by someone else)
    async fn find(&self, owner: &UserId, id: &ContactId) -> Result<Option<Contact>, ContactError>;

    /// Contacts of `owner` ordered by creation time.
    async fn list(&self, owner: &UserId, page: Page) -> Result<Vec<Contact>, ContactError>;

    async fn list_all(&self, owner: &UserId) -> Result<Vec<Contact>, ContactError>;

    /// # Returns
    /// The stored contact, or None if it no longer exists
    async fn update(&self, contact: Contact) -> Result<Option<Contact>, ContactError>;

    /// # Returns
    /// The removed contact, or None if nothing matched
    async fn delete(&self, owner: &UserId, id: &ContactId) -> Result<Option<Contact>, ContactError>;

    async fn search(
        &self,
        owner: &UserId,
        search: &ContactSearch,
    ) -> Result<Vec<Contact>, ContactError>;
}

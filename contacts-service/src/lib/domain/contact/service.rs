use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use chrono::Utc;

use crate::contact::birthdays;
use crate::contact::errors::ContactError;
use crate::contact::models::Contact;
use crate::contact::models::ContactDetails;
use crate::contact::models::ContactId;
use crate::contact::models::ContactSearch;
use crate::contact::models::Page;
use crate::contact::ports::ContactRepository;
use crate::contact::ports::ContactServicePort;
use crate::domain::user::models::UserId;

/// Domain service implementation for contact operations.
pub struct ContactService<CR>
where
    CR: ContactRepository,
{
    repository: Arc<CR>,
}

impl<CR> ContactService<CR>
where
    CR: ContactRepository,
{
    pub fn new(repository: Arc<CR>) -> Self {
        Self { repository }
    }

    /// Birthdays within `days` of an explicit `today`, soonest first.
    pub async fn upcoming_birthdays_from(
        &self,
        owner: &UserId,
        today: NaiveDate,
        days: u32,
    ) -> Result<Vec<Contact>, ContactError> {
        let mut upcoming: Vec<(NaiveDate, Contact)> = self
            .repository
            .list_all(owner)
            .await?
            .into_iter()
            .filter(|contact| birthdays::is_upcoming(contact.birthday, today, days))
            .filter_map(|contact| {
                birthdays::next_birthday(contact.birthday, today).map(|next| (next, contact))
            })
            .collect();

        upcoming.sort_by_key(|(next, _)| *next);

        Ok(upcoming.into_iter().map(|(_, contact)| contact).collect())
    }
}

#[async_trait]
impl<CR> ContactServicePort for ContactService<CR>
where
    CR: ContactRepository,
{
    async fn list_contacts(&self, owner: &UserId, page: Page) -> Result<Vec<Contact>, ContactError> {
        self.repository.list(owner, page).await
    }

    async fn get_contact(&self, owner: &UserId, id: &ContactId) -> Result<Contact, ContactError> {
        self.repository
            .find(owner, id)
            .await?
            .ok_or(ContactError::NotFound(id.to_string()))
    }

    async fn create_contact(
        &self,
        owner: &UserId,
        details: ContactDetails,
    ) -> Result<Contact, ContactError> {
        let contact = self
            .repository
            .create(Contact::new(*owner, details))
            .await?;

        tracing::info!(contact_id = %contact.id, owner_id = %owner, "Contact created");

        Ok(contact)
    }

    async fn update_contact(
        &self,
        owner: &UserId,
        id: &ContactId,
        details: ContactDetails,
    ) -> Result<Contact, ContactError> {
        let mut contact = self.get_contact(owner, id).await?;
        contact.apply(details);

        let updated = self
            .repository
            .update(contact)
            .await?
            .ok_or(ContactError::NotFound(id.to_string()))?;

        tracing::info!(contact_id = %id, owner_id = %owner, "Contact updated");

        Ok(updated)
    }

    async fn delete_contact(&self, owner: &UserId, id: &ContactId) -> Result<Contact, ContactError> {
        let removed = self
            .repository
            .delete(owner, id)
            .await?
            .ok_or(ContactError::NotFound(id.to_string()))?;

        tracing::info!(contact_id = %id, owner_id = %owner, "Contact deleted");

        Ok(removed)
    }

    async fn search_contacts(
        &self,
        owner: &UserId,
        search: ContactSearch,
    ) -> Result<Vec<Contact>, ContactError> {
        self.repository.search(owner, &search).await
    }

    async fn upcoming_birthdays(
        &self,
        owner: &UserId,
        days: u32,
    ) -> Result<Vec<Contact>, ContactError> {
        self.upcoming_birthdays_from(owner, Utc::now().date_naive(), days)
            .await
    }
}

#[cfg(test)]
mod tests {
    use mockall::mock;

    use super::*;
    use crate::contact::models::ContactEmail;
    use crate::contact::models::ContactName;
    use crate::contact::models::PhoneNumber;

    mock! {
        pub TestContactRepository {}

        #[async_trait]
        impl ContactRepository for TestContactRepository {
            async fn create(&self, contact: Contact) -> Result<Contact, ContactError>;
            async fn find(&self, owner: &UserId, id: &ContactId) -> Result<Option<Contact>, ContactError>;
            async fn list(&self, owner: &UserId, page: Page) -> Result<Vec<Contact>, ContactError>;
            async fn list_all(&self, owner: &UserId) -> Result<Vec<Contact>, ContactError>;
            async fn update(&self, contact: Contact) -> Result<Option<Contact>, ContactError>;
            async fn delete(&self, owner: &UserId, id: &ContactId) -> Result<Option<Contact>, ContactError>;
            async fn search(&self, owner: &UserId, search: &ContactSearch) -> Result<Vec<Contact>, ContactError>;
        }
    }

    fn details(first_name: &str, birthday: NaiveDate) -> ContactDetails {
        ContactDetails {
            first_name: ContactName::new("first_name", first_name.to_string()).unwrap(),
            last_name: ContactName::new("last_name", "Smith".to_string()).unwrap(),
            email: ContactEmail::new(format!("{}@example.com", first_name.to_lowercase()))
                .unwrap(),
            phone: PhoneNumber::new("+15550100".to_string()).unwrap(),
            birthday,
            additional_info: None,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_create_contact_sets_owner() {
        let owner = UserId::new();
        let mut repository = MockTestContactRepository::new();
        repository
            .expect_create()
            .withf(move |contact| contact.owner_id == owner)
            .times(1)
            .returning(Ok);

        let service = ContactService::new(Arc::new(repository));

        let contact = service
            .create_contact(&owner, details("Bob", date(1990, 1, 1)))
            .await
            .unwrap();
        assert_eq!(contact.owner_id, owner);
        assert_eq!(contact.first_name.as_str(), "Bob");
    }

    #[tokio::test]
    async fn test_get_contact_not_found() {
        let mut repository = MockTestContactRepository::new();
        repository.expect_find().times(1).returning(|_, _| Ok(None));

        let service = ContactService::new(Arc::new(repository));

        let result = service.get_contact(&UserId::new(), &ContactId::new()).await;
        assert!(matches!(result, Err(ContactError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_contact_replaces_fields() {
        let owner = UserId::new();
        let existing = Contact::new(owner, details("Bob", date(1990, 1, 1)));
        let id = existing.id;

        let mut repository = MockTestContactRepository::new();
        repository
            .expect_find()
            .times(1)
            .returning(move |_, _| Ok(Some(existing.clone())));
        repository
            .expect_update()
            .withf(move |contact| contact.id == id && contact.first_name.as_str() == "Robert")
            .times(1)
            .returning(|contact| Ok(Some(contact)));

        let service = ContactService::new(Arc::new(repository));

        let updated = service
            .update_contact(&owner, &id, details("Robert", date(1991, 2, 2)))
            .await
            .unwrap();
        assert_eq!(updated.id, id);
        assert_eq!(updated.birthday, date(1991, 2, 2));
    }

    #[tokio::test]
    async fn test_update_missing_contact() {
        let mut repository = MockTestContactRepository::new();
        repository.expect_find().times(1).returning(|_, _| Ok(None));
        repository.expect_update().times(0);

        let service = ContactService::new(Arc::new(repository));

        let result = service
            .update_contact(
                &UserId::new(),
                &ContactId::new(),
                details("Bob", date(1990, 1, 1)),
            )
            .await;
        assert!(matches!(result, Err(ContactError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_contact_not_found() {
        let mut repository = MockTestContactRepository::new();
        repository.expect_delete().times(1).returning(|_, _| Ok(None));

        let service = ContactService::new(Arc::new(repository));

        let result = service
            .delete_contact(&UserId::new(), &ContactId::new())
            .await;
        assert!(matches!(result, Err(ContactError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_upcoming_birthdays_sorted_soonest_first() {
        let owner = UserId::new();
        let contacts = vec![
            Contact::new(owner, details("Late", date(1980, 1, 3))),
            Contact::new(owner, details("Outside", date(1980, 2, 1))),
            Contact::new(owner, details("Soon", date(1980, 12, 30))),
        ];

        let mut repository = MockTestContactRepository::new();
        repository
            .expect_list_all()
            .times(1)
            .returning(move |_| Ok(contacts.clone()));

        let service = ContactService::new(Arc::new(repository));

        let upcoming = service
            .upcoming_birthdays_from(&owner, date(2024, 12, 29), 7)
            .await
            .unwrap();

        let names: Vec<&str> = upcoming.iter().map(|c| c.first_name.as_str()).collect();
        assert_eq!(names, vec!["Soon", "Late"]);
    }
}

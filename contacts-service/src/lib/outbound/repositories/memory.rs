use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::contact::errors::ContactError;
use crate::contact::models::Contact;
use crate::contact::models::ContactId;
use crate::contact::models::ContactSearch;
use crate::contact::models::Page;
use crate::contact::ports::ContactRepository;
use crate::domain::user::models::AvatarUrl;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// Process-local user store keyed by email.
///
/// Every write happens under one lock, so refresh token rotation is atomic
/// just like the conditional UPDATE in Postgres.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn modify<F>(&self, user: &User, change: F) -> Result<User, UserError>
    where
        F: FnOnce(&mut User) + Send,
    {
        let mut users = self.users.write().await;
        let stored = users
            .get_mut(user.email.as_str())
            .ok_or_else(|| UserError::NotFound(user.id.to_string()))?;

        change(stored);
        Ok(stored.clone())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        let users = self.users.read().await;
        let found = users.get(email).cloned();
        Ok(found)
    }

    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.write().await;
        if users.contains_key(user.email.as_str()) {
            return Err(UserError::EmailAlreadyExists(user.email.to_string()));
        }

        users.insert(user.email.as_str().to_string(), user.clone());
        Ok(user)
    }

    async fn set_refresh_token(
        &self,
        user: &User,
        token: Option<String>,
    ) -> Result<User, UserError> {
        self.modify(user, |stored| stored.refresh_token = token).await
    }

    async fn rotate_refresh_token(
        &self,
        user: &User,
        expected: &str,
        replacement: &str,
    ) -> Result<bool, UserError> {
        let mut users = self.users.write().await;
        match users.get_mut(user.email.as_str()) {
            Some(stored) if stored.refresh_token.as_deref() == Some(expected) => {
                stored.refresh_token = Some(replacement.to_string());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn set_confirmed(&self, user: &User) -> Result<User, UserError> {
        self.modify(user, |stored| stored.confirmed = true).await
    }

    async fn set_avatar(&self, user: &User, avatar: &AvatarUrl) -> Result<User, UserError> {
        let avatar = avatar.as_str().to_string();
        self.modify(user, move |stored| stored.avatar = Some(avatar))
            .await
    }
}

/// Process-local contact store, kept in insertion order.
#[derive(Default)]
pub struct InMemoryContactRepository {
    contacts: RwLock<Vec<Contact>>,
}

impl InMemoryContactRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn owned_by<'a>(
        contacts: &'a [Contact],
        owner: &'a UserId,
    ) -> impl Iterator<Item = &'a Contact> + 'a {
        contacts.iter().filter(move |c| c.owner_id == *owner)
    }
}

#[async_trait]
impl ContactRepository for InMemoryContactRepository {
    async fn create(&self, contact: Contact) -> Result<Contact, ContactError> {
        self.contacts.write().await.push(contact.clone());
        Ok(contact)
    }

    async fn find(&self, owner: &UserId, id: &ContactId) -> Result<Option<Contact>, ContactError> {
        let contacts = self.contacts.read().await;
        let found = Self::owned_by(&contacts, owner)
            .find(|c| c.id == *id)
            .cloned();
        Ok(found)
    }

    async fn list(&self, owner: &UserId, page: Page) -> Result<Vec<Contact>, ContactError> {
        let contacts = self.contacts.read().await;
        let window = Self::owned_by(&contacts, owner)
            .skip(page.skip as usize)
            .take(page.limit as usize)
            .cloned()
            .collect();
        Ok(window)
    }

    async fn list_all(&self, owner: &UserId) -> Result<Vec<Contact>, ContactError> {
        let contacts = self.contacts.read().await;
        let owned = Self::owned_by(&contacts, owner).cloned().collect();
        Ok(owned)
    }

    async fn update(&self, contact: Contact) -> Result<Option<Contact>, ContactError> {
        let mut contacts = self.contacts.write().await;
        let stored = contacts
            .iter_mut()
            .find(|c| c.id == contact.id && c.owner_id == contact.owner_id);

        Ok(stored.map(|stored| {
            *stored = contact.clone();
            contact
        }))
    }

    async fn delete(&self, owner: &UserId, id: &ContactId) -> Result<Option<Contact>, ContactError> {
        let mut contacts = self.contacts.write().await;
        let position = contacts
            .iter()
            .position(|c| c.id == *id && c.owner_id == *owner);

        Ok(position.map(|index| contacts.remove(index)))
    }

    async fn search(
        &self,
        owner: &UserId,
        search: &ContactSearch,
    ) -> Result<Vec<Contact>, ContactError> {
        let contacts = self.contacts.read().await;
        let matches = Self::owned_by(&contacts, owner)
            .filter(|c| search.matches(c))
            .cloned()
            .collect();
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::contact::models::ContactDetails;
    use crate::contact::models::ContactEmail;
    use crate::contact::models::ContactName;
    use crate::contact::models::PhoneNumber;
    use crate::domain::user::models::EmailAddress;
    use crate::domain::user::models::Username;

    fn user() -> User {
        User::register(
            Username::new("alice".to_string()).unwrap(),
            EmailAddress::new("alice@example.com".to_string()).unwrap(),
            "hash".to_string(),
        )
    }

    fn contact(owner: UserId, first_name: &str) -> Contact {
        Contact::new(
            owner,
            ContactDetails {
                first_name: ContactName::new("first_name", first_name.to_string()).unwrap(),
                last_name: ContactName::new("last_name", "Smith".to_string()).unwrap(),
                email: ContactEmail::new("someone@example.com".to_string()).unwrap(),
                phone: PhoneNumber::new("5550100".to_string()).unwrap(),
                birthday: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
                additional_info: None,
            },
        )
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_email() {
        let repository = InMemoryUserRepository::new();
        repository.create(user()).await.unwrap();

        let result = repository.create(user()).await;
        assert!(matches!(result, Err(UserError::EmailAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_rotate_refresh_token_is_compare_and_set() {
        let repository = InMemoryUserRepository::new();
        let user = repository.create(user()).await.unwrap();
        repository
            .set_refresh_token(&user, Some("first".to_string()))
            .await
            .unwrap();

        assert!(repository
            .rotate_refresh_token(&user, "first", "second")
            .await
            .unwrap());
        assert!(!repository
            .rotate_refresh_token(&user, "first", "third")
            .await
            .unwrap());

        let stored = repository
            .find_by_email("alice@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.refresh_token.as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_mutations_on_missing_user() {
        let repository = InMemoryUserRepository::new();

        let result = repository.set_confirmed(&user()).await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
        assert!(!repository
            .rotate_refresh_token(&user(), "a", "b")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_contacts_are_scoped_to_owner() {
        let repository = InMemoryContactRepository::new();
        let alice = UserId::new();
        let bob = UserId::new();

        let alices = repository.create(contact(alice, "Carol")).await.unwrap();
        repository.create(contact(bob, "Dave")).await.unwrap();

        assert_eq!(repository.list_all(&alice).await.unwrap().len(), 1);
        assert_eq!(
            repository.find(&alice, &alices.id).await.unwrap(),
            Some(alices.clone())
        );
        assert!(repository.find(&bob, &alices.id).await.unwrap().is_none());
        assert!(repository.delete(&bob, &alices.id).await.unwrap().is_none());
        assert!(repository.update(Contact { owner_id: bob, ..alices.clone() }).await.unwrap().is_none());
        assert_eq!(
            repository.delete(&alice, &alices.id).await.unwrap(),
            Some(alices)
        );
    }

    #[tokio::test]
    async fn test_list_pages_in_insertion_order() {
        let repository = InMemoryContactRepository::new();
        let owner = UserId::new();
        for name in ["Ann", "Ben", "Cat"] {
            repository.create(contact(owner, name)).await.unwrap();
        }

        let page = repository
            .list(&owner, Page { skip: 1, limit: 1 })
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].first_name.as_str(), "Ben");
    }
}

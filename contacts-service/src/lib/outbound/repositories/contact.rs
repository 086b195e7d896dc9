use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use crate::contact::errors::ContactError;
use crate::contact::models::AdditionalInfo;
use crate::contact::models::Contact;
use crate::contact::models::ContactEmail;
use crate::contact::models::ContactId;
use crate::contact::models::ContactName;
use crate::contact::models::ContactSearch;
use crate::contact::models::Page;
use crate::contact::models::PhoneNumber;
use crate::contact::ports::ContactRepository;
use crate::domain::user::models::UserId;

const CONTACT_COLUMNS: &str =
    "id, owner_id, first_name, last_name, email, phone, birthday, additional_info, created_at";

pub struct PostgresContactRepository {
    pool: PgPool,
}

impl PostgresContactRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_contact(row: PgRow) -> Result<Contact, ContactError> {
        let additional_info: Option<String> = row.get("additional_info");

        Ok(Contact {
            id: ContactId(row.get("id")),
            owner_id: UserId(row.get("owner_id")),
            first_name: ContactName::new("first_name", row.get("first_name"))?,
            last_name: ContactName::new("last_name", row.get("last_name"))?,
            email: ContactEmail::new(row.get("email"))?,
            phone: PhoneNumber::new(row.get("phone"))?,
            birthday: row.get("birthday"),
            additional_info: AdditionalInfo::optional(additional_info)?,
            created_at: row.get("created_at"),
        })
    }

    fn rows_to_contacts(rows: Vec<PgRow>) -> Result<Vec<Contact>, ContactError> {
        rows.into_iter().map(Self::row_to_contact).collect()
    }
}

#[async_trait]
impl ContactRepository for PostgresContactRepository {
    async fn create(&self, contact: Contact) -> Result<Contact, ContactError> {
        sqlx::query(
            r#"
            INSERT INTO contacts (id, owner_id, first_name, last_name, email, phone, birthday, additional_info, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(contact.id.0)
        .bind(contact.owner_id.0)
        .bind(contact.first_name.as_str())
        .bind(contact.last_name.as_str())
        .bind(contact.email.as_str())
        .bind(contact.phone.as_str())
        .bind(contact.birthday)
        .bind(contact.additional_info.as_ref().map(|i| i.as_str()))
        .bind(contact.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| ContactError::DatabaseError(e.to_string()))?;

        Ok(contact)
    }

    async fn find(&self, owner: &UserId, id: &ContactId) -> Result<Option<Contact>, ContactError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM contacts WHERE id = $1 AND owner_id = $2",
            CONTACT_COLUMNS
        ))
        .bind(id.0)
        .bind(owner.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ContactError::DatabaseError(e.to_string()))?;

        row.map(Self::row_to_contact).transpose()
    }

    async fn list(&self, owner: &UserId, page: Page) -> Result<Vec<Contact>, ContactError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM contacts WHERE owner_id = $1 ORDER BY created_at, id OFFSET $2 LIMIT $3",
            CONTACT_COLUMNS
        ))
        .bind(owner.0)
        .bind(i64::from(page.skip))
        .bind(i64::from(page.limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ContactError::DatabaseError(e.to_string()))?;

        Self::rows_to_contacts(rows)
    }

    async fn list_all(&self, owner: &UserId) -> Result<Vec<Contact>, ContactError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM contacts WHERE owner_id = $1 ORDER BY created_at, id",
            CONTACT_COLUMNS
        ))
        .bind(owner.0)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ContactError::DatabaseError(e.to_string()))?;

        Self::rows_to_contacts(rows)
    }

    async fn update(&self, contact: Contact) -> Result<Option<Contact>, ContactError> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE contacts
            SET first_name = $3, last_name = $4, email = $5, phone = $6, birthday = $7, additional_info = $8
            WHERE id = $1 AND owner_id = $2
            RETURNING {}
            "#,
            CONTACT_COLUMNS
        ))
        .bind(contact.id.0)
        .bind(contact.owner_id.0)
        .bind(contact.first_name.as_str())
        .bind(contact.last_name.as_str())
        .bind(contact.email.as_str())
        .bind(contact.phone.as_str())
        .bind(contact.birthday)
        .bind(contact.additional_info.as_ref().map(|i| i.as_str()))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ContactError::DatabaseError(e.to_string()))?;

        row.map(Self::row_to_contact).transpose()
    }

    async fn delete(&self, owner: &UserId, id: &ContactId) -> Result<Option<Contact>, ContactError> {
        let row = sqlx::query(&format!(
            "DELETE FROM contacts WHERE id = $1 AND owner_id = $2 RETURNING {}",
            CONTACT_COLUMNS
        ))
        .bind(id.0)
        .bind(owner.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ContactError::DatabaseError(e.to_string()))?;

        row.map(Self::row_to_contact).transpose()
    }

    async fn search(
        &self,
        owner: &UserId,
        search: &ContactSearch,
    ) -> Result<Vec<Contact>, ContactError> {
        // strpos keeps user input out of LIKE pattern syntax
        let rows = sqlx::query(&format!(
            r#"
            SELECT {} FROM contacts
            WHERE owner_id = $1
              AND ($2::text IS NULL OR strpos(lower(first_name), lower($2)) > 0)
              AND ($3::text IS NULL OR strpos(lower(last_name), lower($3)) > 0)
              AND ($4::text IS NULL OR strpos(lower(email), lower($4)) > 0)
            ORDER BY created_at, id
            "#,
            CONTACT_COLUMNS
        ))
        .bind(owner.0)
        .bind(search.first_name.as_deref())
        .bind(search.last_name.as_deref())
        .bind(search.email.as_deref())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ContactError::DatabaseError(e.to_string()))?;

        Self::rows_to_contacts(rows)
    }
}

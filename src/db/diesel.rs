use std::convert::TryFrom;
use std::fmt::Debug;

use crate::auth::Store;
use crate::core::models::{Account, NewScope, ScopeChanges, ScopeRecord, Token};
use crate::core::types::{HashedPassword, HashedTokenValue, ScopeIdentifier, TokenKind};
use crate::provider::error::Error;

use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use tokio::task::block_in_place;
use tracing::{event, Level};

use super::models;
use super::schema;

diesel_migrations::embed_migrations!("migrations");

type PgPool = Pool<ConnectionManager<PgConnection>>;

pub struct DbStore {
    pool: PgPool,
}

impl DbStore {
    pub fn acquire(uri: &str, max_size: u32) -> Result<Self, Error> {
        let pool = Pool::builder()
            .max_size(max_size)
            .build(ConnectionManager::new(uri))?;
        event!(Level::INFO, max_size, "Database pool established");
        Ok(Self { pool })
    }

    fn conn(&self) -> Result<PooledConnection<ConnectionManager<PgConnection>>, Error> {
        Ok(self.pool.get()?)
    }

    /// Checks out a connection and runs `query` on it. Both steps may block, so both happen
    /// off the async worker.
    fn run<T, F>(&self, query: F) -> Result<T, Error>
    where
        F: FnOnce(&PgConnection) -> Result<T, Error>,
    {
        block_in_place(|| {
            let conn = self.conn()?;
            query(&*conn)
        })
    }

    pub fn migrate(&self) -> Result<(), Error> {
        self.run(|conn| {
            embedded_migrations::run_with_output(conn, &mut std::io::stderr())
                .map_err(|e| Error::Migration(e.to_string()))
        })?;
        event!(Level::INFO, "Ran migrations");
        Ok(())
    }

    fn find_token(
        &self,
        conn: &PgConnection,
        value: &HashedTokenValue,
    ) -> Result<Option<Token>, Error> {
        use schema::access_tokens::dsl::{self as access_dsl, access_tokens};
        use schema::refresh_tokens::dsl::{self as refresh_dsl, refresh_tokens};

        let access = access_tokens
            .filter(access_dsl::token_value.eq(&value.0))
            .first::<models::Token>(conn)
            .optional()?;
        if let Some(row) = access {
            return Ok(Some(token_from_row(row, TokenKind::AccessToken)));
        }

        let refresh = refresh_tokens
            .filter(refresh_dsl::token_value.eq(&value.0))
            .first::<models::Token>(conn)
            .optional()?;
        Ok(refresh.map(|row| token_from_row(row, TokenKind::RefreshToken)))
    }
}

impl Debug for DbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbStore").finish()
    }
}

fn token_from_row(row: models::Token, kind: TokenKind) -> Token {
    Token {
        id: row.token_id,
        kind,
        active: row.active,
        created_at: row.created_at,
        expires_at: row.expires_at,
        account_id: row.account_id,
    }
}

impl From<models::Scope> for ScopeRecord {
    fn from(s: models::Scope) -> Self {
        Self {
            id: s.scope_id,
            name: s.scope_name,
            description: s.scope_description,
            value: s.scope_value,
        }
    }
}

impl From<models::Account> for Account {
    fn from(a: models::Account) -> Self {
        Self {
            id: a.account_id,
            first_name: a.first_name,
            last_name: a.last_name,
            username: a.username,
            password: HashedPassword(a.password_hash),
            active: a.active,
        }
    }
}

impl Store for DbStore {
    fn get_token(&self, value: &HashedTokenValue) -> Result<Option<Token>, Error> {
        self.run(|conn| self.find_token(conn, value))
    }

    fn get_account(&self, id: i32) -> Result<Option<Account>, Error> {
        use schema::accounts::dsl::accounts;

        let found = self.run(|conn| {
            Ok(accounts
                .find(id)
                .first::<models::Account>(conn)
                .optional()?)
        })?;

        Ok(found.map(Into::into))
    }

    fn get_scope(&self, identifier: &ScopeIdentifier) -> Result<Option<ScopeRecord>, Error> {
        use schema::scopes::dsl::{self, scopes};

        let found = match identifier {
            ScopeIdentifier::Id(id) => match i32::try_from(*id) {
                Ok(id) => self.run(|conn| {
                    Ok(scopes.find(id).first::<models::Scope>(conn).optional()?)
                })?,
                // Ids past the column range cannot exist
                Err(_) => None,
            },
            ScopeIdentifier::Value(value) => self.run(|conn| {
                Ok(scopes
                    .filter(dsl::scope_value.eq(value))
                    .first::<models::Scope>(conn)
                    .optional()?)
            })?,
        };

        Ok(found.map(Into::into))
    }

    fn list_scopes(&self) -> Result<Vec<ScopeRecord>, Error> {
        use schema::scopes::dsl::{self, scopes};

        let found = self.run(|conn| {
            Ok(scopes
                .order(dsl::scope_id)
                .get_results::<models::Scope>(conn)?)
        })?;

        Ok(found.into_iter().map(Into::into).collect())
    }

    fn list_token_scopes(&self, token: &Token) -> Result<Vec<ScopeRecord>, Error> {
        use schema::scopes;

        let found = self.run(|conn| match token.kind {
            TokenKind::AccessToken => {
                use schema::access_token_scopes::dsl::{self, access_token_scopes};

                Ok(access_token_scopes
                    .inner_join(scopes::table)
                    .filter(dsl::token_id.eq(token.id))
                    .select(scopes::all_columns)
                    .get_results::<models::Scope>(conn)?)
            }
            TokenKind::RefreshToken => {
                use schema::refresh_token_scopes::dsl::{self, refresh_token_scopes};

                Ok(refresh_token_scopes
                    .inner_join(scopes::table)
                    .filter(dsl::token_id.eq(token.id))
                    .select(scopes::all_columns)
                    .get_results::<models::Scope>(conn)?)
            }
        })?;

        Ok(found.into_iter().map(Into::into).collect())
    }

    fn insert_scope(&self, scope: NewScope) -> Result<ScopeRecord, Error> {
        use schema::scopes::dsl::scopes;

        let model = models::NewScope {
            scope_name: scope.name,
            scope_description: scope.description,
            scope_value: scope.value,
        };

        let inserted = self.run(|conn| {
            Ok(diesel::insert_into(scopes)
                .values(&model)
                .get_result::<models::Scope>(conn)?)
        })?;

        Ok(inserted.into())
    }

    fn update_scope(&self, id: i32, changes: ScopeChanges) -> Result<ScopeRecord, Error> {
        use crate::auth::error::ServiceError;
        use schema::scopes::dsl::scopes;

        // An empty changeset is not a valid UPDATE, read the row back instead
        let updated = if changes.is_empty() {
            self.run(|conn| Ok(scopes.find(id).first::<models::Scope>(conn).optional()?))?
        } else {
            let changeset = models::ScopeChangeset {
                scope_name: changes.name,
                scope_description: changes.description,
            };
            self.run(|conn| {
                Ok(diesel::update(scopes.find(id))
                    .set(&changeset)
                    .get_result::<models::Scope>(conn)
                    .optional()?)
            })?
        };

        updated
            .map(Into::into)
            .ok_or_else(|| ServiceError::ScopeNotFound.into())
    }

    fn delete_scope(&self, id: i32) -> Result<(), Error> {
        use schema::scopes::dsl::scopes;

        self.run(|conn| Ok(diesel::delete(scopes.find(id)).execute(conn)?))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn pool_checkout_does_not_hold_the_worker() {
        let pool = Pool::builder()
            .max_size(1)
            .min_idle(Some(0))
            .connection_timeout(Duration::from_secs(2))
            .build_unchecked(ConnectionManager::new("postgres://127.0.0.1:1/unreachable"));
        let store = Arc::new(DbStore { pool });

        let stuck = tokio::spawn({
            let store = Arc::clone(&store);
            async move { store.get_scope(&ScopeIdentifier::Id(1)).is_err() }
        });
        tokio::time::sleep(Duration::from_millis(100)).await;

        let other = tokio::spawn(async { "served" });
        let served = tokio::time::timeout(Duration::from_millis(1_000), other).await;
        assert_eq!(served.unwrap().unwrap(), "served");

        assert!(stuck.await.unwrap());
    }
}

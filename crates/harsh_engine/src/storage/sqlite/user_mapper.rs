//! SQLite mapper for [`User`] records.

use async_trait::async_trait;
use tokio_rusqlite::Connection;

use harsh_core::entity::{Entity, User, Value};
use harsh_core::mapper::{
    resolve_columns, validate_assignments, validate_query_args, DataMapper, DataMapperError,
    ModelState, Projection, RepositoryError, Result,
};
use harsh_core::query::QueryArgsBag;

use super::conversions::{project_row, row_to_user, row_to_values};
use super::mapper::SqliteDataMapper;
use super::schema;
use super::statements::{
    build_delete, build_insert, build_select, build_select_columns, build_update,
};

/// Maps [`User`] entities to the `users` table.
#[derive(Clone)]
pub struct UserMapper {
    inner: SqliteDataMapper,
}

impl UserMapper {
    pub fn new(inner: SqliteDataMapper) -> Self {
        Self { inner }
    }

    /// Attaches a new mapper to an open connection.
    pub async fn attach(conn: Connection, enable_foreign_keys: bool) -> Result<Self> {
        Ok(Self::new(
            SqliteDataMapper::attach(conn, enable_foreign_keys).await?,
        ))
    }

    /// Looks up a user by username and password hash.
    ///
    /// A missing user is not an error: the state is valid with no data.
    pub async fn read_by_credentials(&self, username: &str, password_hash: &str) -> ModelState<User> {
        let args = vec![Value::from(username), Value::from(password_hash)];

        match self
            .inner
            .exec_query(
                schema::SELECT_USER_BY_CREDENTIALS.to_string(),
                args,
                true,
                row_to_user,
                User::ENTITY_TYPE,
            )
            .await
        {
            Ok(users) if users.is_empty() => ModelState::success("Invalid username or password", users),
            Ok(users) => ModelState::success(format!("Found user {username}"), users),
            Err(err) => store_failure(err),
        }
    }

    /// Looks up a user by id.
    pub async fn read_by_id(&self, id: i64) -> ModelState<User> {
        match self
            .inner
            .exec_query(
                schema::SELECT_USER_BY_ID.to_string(),
                vec![Value::Integer(id)],
                true,
                row_to_user,
                User::ENTITY_TYPE,
            )
            .await
        {
            Ok(users) if users.is_empty() => ModelState::from_error(RepositoryError::NotFound {
                entity_type: User::ENTITY_TYPE,
                id: id.to_string(),
            }),
            Ok(users) => ModelState::success(format!("Found user with ID {id}"), users),
            Err(err) => store_failure(err),
        }
    }

    /// Builds the failed state for a rejected write.
    ///
    /// Uniqueness violations can only come from `username`.
    fn write_failure<T>(username: Option<&str>, err: RepositoryError) -> ModelState<T> {
        if err.is_unique_violation() {
            tracing::warn!(error = %err, "username already taken");
            let message = match username {
                Some(name) => format!("Username {name} already taken"),
                None => "Username already taken".to_string(),
            };
            ModelState::failure(message, vec![err])
        } else {
            store_failure(err)
        }
    }
}

fn store_failure<T>(err: RepositoryError) -> ModelState<T> {
    tracing::error!(error = %err, "user store operation failed");
    ModelState::from_error(err)
}

/// Rejects `update`/`delete` calls that would touch every row.
fn require_filter(query: &QueryArgsBag) -> std::result::Result<(), DataMapperError> {
    if query.query_by().is_empty() {
        return Err(DataMapperError::UnfilteredMutation);
    }
    Ok(())
}

#[async_trait]
impl DataMapper for UserMapper {
    type Entity = User;

    async fn create(&self, entity: &User, excluded: &[&str]) -> ModelState<User> {
        let stmt = build_insert::<User>(excluded);
        let args = entity.to_tuple(excluded, true);

        match self
            .inner
            .exec_mutation(stmt, args, true, User::ENTITY_TYPE)
            .await
        {
            Ok(id) => {
                tracing::info!(id, username = entity.username(), "user created");
                ModelState::success(
                    format!(
                        "Successfully created new user with ID {id} and username {}",
                        entity.username()
                    ),
                    vec![entity.clone().with_id(id)],
                )
            }
            Err(err) => Self::write_failure(Some(entity.username()), err),
        }
    }

    async fn read(
        &self,
        query: &QueryArgsBag,
    ) -> std::result::Result<ModelState<User>, DataMapperError> {
        let stmt = build_select::<User>(query)?;

        Ok(
            match self
                .inner
                .exec_query(stmt.sql, stmt.args, false, row_to_user, User::ENTITY_TYPE)
                .await
            {
                Ok(users) => ModelState::success(format!("Found {} user(s)", users.len()), users),
                Err(err) => store_failure(err),
            },
        )
    }

    async fn read_columns(
        &self,
        query: &QueryArgsBag,
        return_cols: &[&str],
    ) -> std::result::Result<ModelState<Projection>, DataMapperError> {
        let columns = match resolve_columns::<User>(return_cols) {
            Ok(columns) => columns,
            Err(unknown) => {
                let names = unknown.into_iter().collect::<Vec<_>>().join(", ");
                return Ok(ModelState::failure(
                    format!("Unknown user properties: {names}"),
                    vec![RepositoryError::InvalidData(format!(
                        "Unknown user properties: {names}"
                    ))],
                ));
            }
        };
        let stmt = build_select_columns::<User>(query, &columns)?;

        Ok(
            match self
                .inner
                .exec_query(stmt.sql, stmt.args, false, row_to_values, User::ENTITY_TYPE)
                .await
            {
                Ok(rows) => {
                    let rows: Vec<Projection> = rows
                        .into_iter()
                        .map(|values| project_row(&columns, values))
                        .collect();
                    ModelState::success(format!("Found {} user(s)", rows.len()), rows)
                }
                Err(err) => store_failure(err),
            },
        )
    }

    async fn update(
        &self,
        query: &QueryArgsBag,
        values: &[(&str, Value)],
    ) -> std::result::Result<ModelState<usize>, DataMapperError> {
        validate_query_args::<User>(query)?;
        validate_assignments::<User>(values)?;
        require_filter(query)?;

        if values.is_empty() {
            return Ok(ModelState::success("Nothing to update", vec![0]));
        }

        let stmt = build_update::<User>(query, values)?;
        let username = values.iter().find_map(|(name, value)| match (*name, value) {
            ("username", Value::Text(name)) => Some(name.as_str()),
            _ => None,
        });

        Ok(
            match self
                .inner
                .exec_mutation(stmt.sql, stmt.args, false, User::ENTITY_TYPE)
                .await
            {
                Ok(affected) => {
                    ModelState::success(format!("Updated {affected} user(s)"), vec![affected as usize])
                }
                Err(err) => Self::write_failure(username, err),
            },
        )
    }

    async fn delete(
        &self,
        query: &QueryArgsBag,
    ) -> std::result::Result<ModelState<usize>, DataMapperError> {
        validate_query_args::<User>(query)?;
        require_filter(query)?;

        let stmt = build_delete::<User>(query)?;

        Ok(
            match self
                .inner
                .exec_mutation(stmt.sql, stmt.args, false, User::ENTITY_TYPE)
                .await
            {
                Ok(affected) => {
                    ModelState::success(format!("Deleted {affected} user(s)"), vec![affected as usize])
                }
                Err(err) => store_failure(err),
            },
        )
    }
}

//! Command execution.
//!
//! Each command opens its own [`Database`], does its work through the user
//! mapper and closes the connection before returning.

use anyhow::{bail, Context, Result};
use serde_json::json;

use harsh_core::entity::{hash_password, Entity, PropertyKind, User, Value, MIN_PASSWORD_LEN};
use harsh_core::mapper::{coerce_filter_value, DataMapper, ModelState};
use harsh_core::query::{Filter, FilterOp, QueryArgsBag};

use crate::cli::{Commands, OutputFormat};
use crate::config::Config;
use crate::output::{format_state, json::format_json, pretty};
use crate::storage::Database;

/// What a command printed and whether it succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub output: String,
    pub success: bool,
}

impl Outcome {
    fn from_state<T: serde::Serialize>(
        state: &ModelState<T>,
        format: OutputFormat,
        item: impl Fn(&T) -> String,
    ) -> Self {
        Self {
            output: format_state(state, format, item),
            success: state.valid(),
        }
    }
}

/// Runs `command` against the database named in `config`.
pub async fn run(command: Commands, config: &Config, format: OutputFormat) -> Result<Outcome> {
    let db = Database::open(&config.database)
        .await
        .with_context(|| format!("opening {}", config.database.display()))?;

    let outcome = execute(&db, command, config, format).await;
    db.close().await.context("closing database")?;
    outcome
}

async fn execute(
    db: &Database,
    command: Commands,
    config: &Config,
    format: OutputFormat,
) -> Result<Outcome> {
    let user_mapper = || db.user_mapper(config.enable_foreign_keys);

    let outcome = match command {
        Commands::Init {
            schema,
            users,
            seed,
        } => {
            let schema = schema.or_else(|| config.database_schema.clone());
            let users = users.unwrap_or(config.n_dummy_users);
            let seed = seed.unwrap_or(config.seed);

            db.init(schema.as_deref()).await.context("applying schema")?;
            let created = db
                .seed_dummy_users(users, seed, config.enable_foreign_keys)
                .await
                .context("seeding dummy users")?;

            let output = match format {
                OutputFormat::Json => format_json(&json!({
                    "database": config.database,
                    "seeded": created,
                    "requested": users,
                })),
                OutputFormat::Pretty => format!(
                    "Initialized {} with {created} of {users} dummy users",
                    config.database.display()
                ),
            };
            Outcome {
                output,
                success: true,
            }
        }
        Commands::Register { username, password } => {
            let user = User::new(username, &password)?;
            let state = user_mapper().await?.create(&user, &["id"]).await;
            Outcome::from_state(&state, format, pretty::format_user)
        }
        Commands::Login { username, password } => {
            let state = user_mapper()
                .await?
                .read_by_credentials(&username, &hash_password(&password))
                .await;
            let success = state.valid() && !state.data().is_empty();
            let mut outcome = Outcome::from_state(&state, format, pretty::format_user);
            outcome.success = success;
            outcome
        }
        Commands::Show { id } => {
            let state = user_mapper().await?.read_by_id(id).await;
            Outcome::from_state(&state, format, pretty::format_user)
        }
        Commands::List {
            filters,
            sort,
            columns,
        } if !columns.is_empty() => {
            let query = query_args(filters, sort)?;
            let columns: Vec<&str> = columns.iter().map(String::as_str).collect();
            let state = user_mapper().await?.read_columns(&query, &columns).await?;
            Outcome::from_state(&state, format, pretty::format_projection)
        }
        Commands::List { filters, sort, .. } => {
            let query = query_args(filters, sort)?;
            let state = user_mapper().await?.read(&query).await?;
            match format {
                OutputFormat::Pretty if state.valid() => Outcome {
                    output: pretty::format_users(state.data()),
                    success: true,
                },
                _ => Outcome::from_state(&state, format, pretty::format_user),
            }
        }
        Commands::Update {
            filters,
            assignments,
        } => {
            let query = query_args(filters, None)?;
            let values = assignments
                .iter()
                .map(|(name, raw)| Ok((name.as_str(), assignment_value(name, raw)?)))
                .collect::<Result<Vec<_>>>()?;
            let state = user_mapper().await?.update(&query, &values).await?;
            Outcome::from_state(&state, format, |n| format!("  affected: {n}"))
        }
        Commands::Delete { filters } => {
            let query = query_args(filters, None)?;
            let state = user_mapper().await?.delete(&query).await?;
            Outcome::from_state(&state, format, |n| format!("  affected: {n}"))
        }
    };

    Ok(outcome)
}

/// Collects CLI filters and the sort string into a query bag.
fn query_args(filters: Vec<(String, String)>, sort: Option<String>) -> Result<QueryArgsBag> {
    let mut query = QueryArgsBag::default();
    let sort_param = query.sort_by_param().to_string();

    if filters.iter().any(|(name, _)| *name == sort_param) {
        bail!("`{sort_param}` is reserved for sorting; use --sort");
    }

    query.add(
        filters
            .into_iter()
            .chain(sort.map(|sort| (sort_param, sort))),
    )?;
    Ok(query)
}

/// Converts a raw `--set` value to the stored representation of `name`.
///
/// Passwords are validated and hashed. Unknown names pass through as text so
/// the mapper reports them.
fn assignment_value(name: &str, raw: &str) -> Result<Value> {
    if name == "password" {
        if raw.chars().count() < MIN_PASSWORD_LEN {
            bail!("password must be at least {MIN_PASSWORD_LEN} characters");
        }
        return Ok(Value::Text(hash_password(raw)));
    }

    match User::property(name) {
        Some(property) if property.kind != PropertyKind::Text => Ok(coerce_filter_value(
            property,
            &Filter::new(FilterOp::Eq, raw),
        )?),
        _ => Ok(Value::Text(raw.to_string())),
    }
}

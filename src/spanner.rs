use anyhow::{Context, Result};
use async_trait::async_trait;
use gcloud_gax::grpc::{Code, Status};
use gcloud_googleapis::spanner::admin::database::v1::{
    CreateDatabaseRequest, GetDatabaseDdlRequest, GetDatabaseRequest, UpdateDatabaseDdlRequest,
};
use gcloud_googleapis::spanner::admin::instance::v1::{
    CreateInstanceRequest, GetInstanceRequest, Instance,
};
use gcloud_spanner::admin::AdminClientConfig;
use gcloud_spanner::admin::client::Client as AdminClient;
use gcloud_spanner::client::{Client, ClientConfig};
use gcloud_spanner::key::Key;
use gcloud_spanner::mutation::{delete, insert_or_update};
use gcloud_spanner::row::Row;
use gcloud_spanner::statement::Statement;
use serde_json::Value as JsonValue;
use std::sync::Arc;

use crate::config::SpannerConfig;
use crate::models::Kitten;
use crate::store::KittenStore;

/// Kitten table backed by Cloud Spanner
///
/// Cheap to clone; all clones share one session pool.
#[derive(Clone)]
pub struct SpannerKittenStore {
    inner: Arc<Client>,
    table: String,
}

impl SpannerKittenStore {
    /// Connect to Spanner and make sure the kitten table exists.
    ///
    /// The gcloud-spanner library picks up SPANNER_EMULATOR_HOST from the
    /// environment and talks to the emulator when it is set.
    pub async fn from_config(config: &SpannerConfig, table: &str) -> Result<Self> {
        auto_provision(config, table).await?;

        let database_path = config.database_path();

        match &config.emulator_host {
            Some(host) => tracing::info!("Connecting to Spanner emulator at: {}", host),
            None => tracing::info!("Connecting to production Spanner"),
        }

        let client = Client::new(&database_path, ClientConfig::default())
            .await
            .context("Failed to create Spanner client")?;

        tracing::info!(
            "Successfully connected to Spanner database: {} (table '{}')",
            database_path,
            table
        );

        Ok(Self {
            inner: Arc::new(client),
            table: table.to_string(),
        })
    }

    fn select_all_sql(&self) -> String {
        format!("SELECT name, age FROM {}", self.table)
    }

    fn select_one_sql(&self) -> String {
        format!("SELECT name, age FROM {} WHERE name = @name", self.table)
    }

    async fn write(&self, name: &str, age: &JsonValue) -> Result<()> {
        let name = name.to_string();
        let age_str = serde_json::to_string(age).context("Failed to serialize age")?;

        let mutation = insert_or_update(&self.table, &["name", "age"], &[&name, &age_str]);

        self.inner
            .apply(vec![mutation])
            .await
            .context("Failed to write kitten to Spanner")?;
        Ok(())
    }
}

fn kitten_from_row(row: &Row) -> Result<Kitten> {
    let name: String = row.column_by_name("name")?;
    let age_str: String = row.column_by_name("age")?;
    let age: JsonValue = serde_json::from_str(&age_str).context("Failed to deserialize age")?;
    Ok(Kitten { name, age })
}

#[async_trait]
impl KittenStore for SpannerKittenStore {
    async fn put(&self, kitten: Kitten) -> Result<()> {
        self.write(&kitten.name, &kitten.age).await?;
        tracing::debug!("Upserted kitten: {}", kitten.name);
        Ok(())
    }

    async fn scan(&self) -> Result<Vec<Kitten>> {
        let statement = Statement::new(&self.select_all_sql());

        let mut tx = self
            .inner
            .single()
            .await
            .context("Failed to create read transaction for scan")?;

        let mut result_set = tx
            .query(statement)
            .await
            .context("Failed to scan kittens")?;

        let mut kittens = Vec::new();
        while let Some(row) = result_set.next().await? {
            kittens.push(kitten_from_row(&row)?);
        }

        tracing::debug!("Scanned {} kittens", kittens.len());
        Ok(kittens)
    }

    async fn get(&self, name: &str) -> Result<Option<Kitten>> {
        let mut statement = Statement::new(&self.select_one_sql());
        statement.add_param("name", &name.to_string());

        let mut tx = self
            .inner
            .single()
            .await
            .context("Failed to create read transaction")?;

        let mut result_set = tx
            .query(statement)
            .await
            .context("Failed to query kitten from Spanner")?;

        match result_set.next().await? {
            Some(row) => Ok(Some(kitten_from_row(&row)?)),
            None => {
                tracing::debug!("Kitten not found: {}", name);
                Ok(None)
            }
        }
    }

    async fn update_age(&self, name: &str, age: JsonValue) -> Result<()> {
        // The table only has these two columns, so writing both is the field update.
        self.write(name, &age).await?;
        tracing::debug!("Updated age of kitten: {}", name);
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<()> {
        let mutation = delete(&self.table, Key::new(&name.to_string()));

        self.inner
            .apply(vec![mutation])
            .await
            .context("Failed to delete kitten from Spanner")?;

        tracing::debug!("Deleted kitten: {}", name);
        Ok(())
    }

    async fn health_check(&self) -> Result<()> {
        let statement = Statement::new("SELECT 1");

        let mut tx = self
            .inner
            .single()
            .await
            .context("Failed to create health check transaction")?;

        let mut result_set = tx
            .query(statement)
            .await
            .context("Failed to execute health check query")?;

        if result_set.next().await?.is_some() {
            tracing::debug!("Health check query succeeded");
            Ok(())
        } else {
            Err(anyhow::anyhow!("Health check query returned no results"))
        }
    }
}

fn create_table_ddl(table: &str) -> String {
    format!(
        r#"
CREATE TABLE {} (
    name STRING(MAX) NOT NULL,
    age JSON NOT NULL,
) PRIMARY KEY (name)
"#,
        table
    )
    .trim()
    .to_string()
}

/// Create the Spanner instance, database and kitten table when missing.
///
/// Lets a fresh emulator come up with no manual setup.
async fn auto_provision(config: &SpannerConfig, table: &str) -> Result<()> {
    tracing::info!("Starting auto-provisioning checks...");

    let admin_client = AdminClient::new(AdminClientConfig::default())
        .await
        .context("Failed to create Spanner admin client")?;

    let instance_path = config.instance_path();
    let database_path = config.database_path();

    let get_instance = GetInstanceRequest {
        name: instance_path.clone(),
        field_mask: None,
    };
    ensure_exists(
        "Instance",
        &instance_path,
        admin_client.instance().get_instance(get_instance, None),
        create_instance(&admin_client, config),
    )
    .await?;

    let get_database = GetDatabaseRequest {
        name: database_path.clone(),
    };
    ensure_exists(
        "Database",
        &database_path,
        admin_client.database().get_database(get_database, None),
        create_database(&admin_client, config),
    )
    .await?;

    ensure_table_exists(&admin_client, &database_path, table).await?;

    tracing::info!("Auto-provisioning complete");
    Ok(())
}

/// Run `create` only when `lookup` reports NotFound.
///
/// Both futures are lazy; `create` is dropped unpolled when the resource exists.
async fn ensure_exists<T>(
    kind: &str,
    path: &str,
    lookup: impl Future<Output = Result<T, Status>>,
    create: impl Future<Output = Result<()>>,
) -> Result<()> {
    match lookup.await {
        Ok(_) => {
            tracing::info!("{} already exists: {}", kind, path);
            Ok(())
        }
        Err(status) if status.code() == Code::NotFound => {
            tracing::info!("{} not found, creating: {}", kind, path);
            create.await?;
            tracing::info!("{} created successfully: {}", kind, path);
            Ok(())
        }
        Err(status) => Err(anyhow::anyhow!(
            "Failed to check {} existence for {}: {}",
            kind.to_lowercase(),
            path,
            status.message()
        )),
    }
}

fn instance_config_name(config: &SpannerConfig) -> String {
    let region = if config.emulator_host.is_some() {
        "emulator-config"
    } else {
        "regional-us-central1"
    };
    format!("{}/instanceConfigs/{}", config.project_path(), region)
}

async fn create_instance(admin_client: &AdminClient, config: &SpannerConfig) -> Result<()> {
    let request = CreateInstanceRequest {
        parent: config.project_path(),
        instance_id: config.instance.clone(),
        instance: Some(Instance {
            name: config.instance_path(),
            config: instance_config_name(config),
            display_name: format!("{} instance", config.instance),
            node_count: 1,
            ..Default::default()
        }),
    };

    admin_client
        .instance()
        .create_instance(request, None)
        .await
        .context("Failed to start instance creation")?
        .wait(None)
        .await
        .context("Failed to create instance")?;
    Ok(())
}

async fn create_database(admin_client: &AdminClient, config: &SpannerConfig) -> Result<()> {
    let request = CreateDatabaseRequest {
        parent: config.instance_path(),
        create_statement: format!("CREATE DATABASE `{}`", config.database),
        extra_statements: vec![],
        encryption_config: None,
        database_dialect: 1, // GoogleSQL
        proto_descriptors: vec![],
    };

    admin_client
        .database()
        .create_database(request, None)
        .await
        .context("Failed to start database creation")?
        .wait(None)
        .await
        .context("Failed to create database")?;
    Ok(())
}

async fn ensure_table_exists(
    admin_client: &AdminClient,
    database_path: &str,
    table: &str,
) -> Result<()> {
    let get_ddl_request = GetDatabaseDdlRequest {
        database: database_path.to_string(),
    };

    let ddl_response = admin_client
        .database()
        .get_database_ddl(get_ddl_request, None)
        .await
        .context("Failed to get database DDL")?;

    let table_exists = ddl_response
        .into_inner()
        .statements
        .iter()
        .any(|stmt| ddl_creates_table(stmt, table));

    if table_exists {
        tracing::info!("Table '{}' already exists", table);
        return Ok(());
    }

    tracing::info!("Table '{}' not found, creating...", table);

    let update_request = UpdateDatabaseDdlRequest {
        database: database_path.to_string(),
        statements: vec![create_table_ddl(table)],
        operation_id: String::new(),
        proto_descriptors: vec![],
        throughput_mode: false,
    };

    admin_client
        .database()
        .update_database_ddl(update_request, None)
        .await
        .context("Failed to start table creation")?
        .wait(None)
        .await
        .context("Failed to create table")?;

    tracing::info!("Table '{}' created successfully", table);
    Ok(())
}

/// Table named by a `CREATE TABLE` statement, without backticks.
fn created_table_name(stmt: &str) -> Option<&str> {
    let mut words = stmt.trim_start().splitn(3, char::is_whitespace);
    let create = words.next()?;
    let keyword = words.next()?;
    if !create.eq_ignore_ascii_case("CREATE") || !keyword.eq_ignore_ascii_case("TABLE") {
        return None;
    }
    let rest = words.next()?.trim_start();
    let end = rest
        .find(|c: char| c.is_whitespace() || c == '(')
        .unwrap_or(rest.len());
    Some(rest[..end].trim_matches('`'))
}

/// Spanner identifiers are case-insensitive, so `Kittens` and `kittens` are one table.
fn ddl_creates_table(stmt: &str, table: &str) -> bool {
    created_table_name(stmt).is_some_and(|name| name.eq_ignore_ascii_case(table))
}

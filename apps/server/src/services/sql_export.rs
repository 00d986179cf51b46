// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! SQL export - writes a table into a named database table.
//!
//! Column types are inferred from the cells at write time. Rows go in as
//! parameterized multi-row `INSERT`s inside one transaction. PostgreSQL,
//! MySQL and SQLite go through sqlx's `Any` driver, SQL Server through
//! tiberius.

use super::flatten::CellValue;
use super::table::Table;
use rustc_hash::FxHashSet;
use serde::Serialize;
use sqlx::any::{Any, AnyConnectOptions, AnyPoolOptions};
use sqlx::mysql::MySqlConnectOptions;
use sqlx::postgres::PgConnectOptions;
use sqlx::{AnyPool, ConnectOptions};
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

/// SQL Server client over a tokio socket.
pub type MssqlClient = tiberius::Client<Compat<TcpStream>>;

/// Errors from the SQL export.
#[derive(Debug, thiserror::Error)]
pub enum SqlExportError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("SQL Server error: {0}")]
    SqlServer(#[from] tiberius::error::Error),

    #[error("Connection failed: {0}")]
    Connect(#[from] std::io::Error),

    #[error("Timed out connecting after {0:?}")]
    ConnectTimeout(Duration),

    #[error("Unsupported SQL driver: {0}")]
    UnsupportedDriver(String),

    #[error("Unsupported write mode: {0} (expected append or replace)")]
    InvalidMode(String),

    #[error("Invalid host: {0}")]
    InvalidHost(String),

    #[error("Invalid table name: {0:?}")]
    InvalidTableName(String),

    #[error("Table has no columns to write")]
    EmptyTable,
}

/// Database backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SqlDriver {
    Postgres,
    MySql,
    Sqlite,
    /// Microsoft SQL Server 2016 or later
    Mssql,
}

impl FromStr for SqlDriver {
    type Err = SqlExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(SqlDriver::Postgres),
            "mysql" | "mariadb" => Ok(SqlDriver::MySql),
            "sqlite" => Ok(SqlDriver::Sqlite),
            "mssql" | "sqlserver" => Ok(SqlDriver::Mssql),
            other => Err(SqlExportError::UnsupportedDriver(other.to_string())),
        }
    }
}

impl SqlDriver {
    /// Bind placeholder for the `n`th parameter (1-based).
    fn placeholder(self, n: usize) -> String {
        match self {
            SqlDriver::Postgres => format!("${}", n),
            SqlDriver::Mssql => format!("@P{}", n),
            SqlDriver::MySql | SqlDriver::Sqlite => "?".to_string(),
        }
    }

    fn quote_identifier(self, name: &str) -> String {
        match self {
            SqlDriver::MySql => format!("`{}`", name.replace('`', "``")),
            SqlDriver::Mssql => format!("[{}]", name.replace(']', "]]")),
            SqlDriver::Postgres | SqlDriver::Sqlite => format!("\"{}\"", name.replace('"', "\"\"")),
        }
    }

    /// Upper bound on bind parameters in one statement.
    fn max_parameters(self) -> usize {
        match self {
            SqlDriver::Postgres | SqlDriver::MySql => 65_535,
            SqlDriver::Sqlite => 32_766,
            // 2100 per RPC call, less headroom for the statement itself
            SqlDriver::Mssql => 2_000,
        }
    }

    /// Upper bound on rows in one `INSERT ... VALUES` list.
    fn max_rows_per_insert(self) -> usize {
        match self {
            SqlDriver::Mssql => 1_000,
            SqlDriver::Postgres | SqlDriver::MySql | SqlDriver::Sqlite => usize::MAX,
        }
    }

    /// Longest identifier in bytes; `None` when unlimited.
    fn max_identifier_len(self) -> Option<usize> {
        match self {
            SqlDriver::Postgres => Some(63),
            SqlDriver::MySql => Some(64),
            SqlDriver::Mssql => Some(128),
            SqlDriver::Sqlite => None,
        }
    }

    fn drop_table(self, quoted_table: &str) -> String {
        format!("DROP TABLE IF EXISTS {}", quoted_table)
    }

    fn create_table(self, quoted_table: &str, definitions: &[String]) -> String {
        match self {
            SqlDriver::Mssql => format!(
                "IF OBJECT_ID(N'{}', N'U') IS NULL CREATE TABLE {} ({})",
                quoted_table.replace('\'', "''"),
                quoted_table,
                definitions.join(", ")
            ),
            SqlDriver::Postgres | SqlDriver::MySql | SqlDriver::Sqlite => format!(
                "CREATE TABLE IF NOT EXISTS {} ({})",
                quoted_table,
                definitions.join(", ")
            ),
        }
    }
}

/// Longest prefix of `name` within `limit` bytes, cut on a char boundary.
fn truncate_identifier(name: &str, limit: Option<usize>) -> &str {
    match limit {
        Some(limit) if name.len() > limit => {
            let mut end = limit;
            while !name.is_char_boundary(end) {
                end -= 1;
            }
            &name[..end]
        }
        _ => name,
    }
}

/// Column names as the backend stores them.
///
/// Names are cut to the driver's identifier limit, then made unique
/// case-insensitively: later duplicates get `_2`, `_3`, ... in column order.
pub fn unique_column_names(driver: SqlDriver, columns: &[String]) -> Vec<String> {
    let limit = driver.max_identifier_len();
    let mut taken = FxHashSet::default();
    columns
        .iter()
        .map(|column| {
            let mut name = truncate_identifier(column, limit).to_string();
            let mut n = 1;
            while !taken.insert(name.to_lowercase()) {
                n += 1;
                let suffix = format!("_{}", n);
                let head = truncate_identifier(column, limit.map(|l| l.saturating_sub(suffix.len())));
                name = format!("{}{}", head, suffix);
            }
            name
        })
        .collect()
}

/// What happens to an existing table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    /// Create the table if absent, then insert.
    #[default]
    Append,
    /// Drop and recreate the table, then insert.
    Replace,
}

impl FromStr for WriteMode {
    type Err = SqlExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "append" => Ok(WriteMode::Append),
            "replace" => Ok(WriteMode::Replace),
            other => Err(SqlExportError::InvalidMode(other.to_string())),
        }
    }
}

/// Where to connect. Assembled from user-supplied fields.
#[derive(Clone, Default)]
pub struct ConnectionDescriptor {
    pub host: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub database: Option<String>,
}

impl fmt::Debug for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionDescriptor")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("database", &self.database)
            .finish()
    }
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

impl ConnectionDescriptor {
    /// Whether every field the driver needs is filled in.
    ///
    /// SQLite only needs a database path.
    pub fn is_complete(&self, driver: SqlDriver) -> bool {
        match driver {
            SqlDriver::Sqlite => present(&self.database),
            SqlDriver::Postgres | SqlDriver::MySql | SqlDriver::Mssql => {
                present(&self.host)
                    && present(&self.username)
                    && present(&self.password)
                    && present(&self.database)
            }
        }
    }

    fn host_and_port(&self) -> Result<(String, Option<u16>), SqlExportError> {
        let host = self.host.as_deref().unwrap_or_default().trim();
        match host.rsplit_once(':') {
            Some((name, port)) if !name.contains(':') => {
                let port = port
                    .parse()
                    .map_err(|_| SqlExportError::InvalidHost(host.to_string()))?;
                Ok((name.to_string(), Some(port)))
            }
            _ => Ok((host.to_string(), None)),
        }
    }

    /// Connect options for the `Any` driver.
    pub fn connect_options(&self, driver: SqlDriver) -> Result<AnyConnectOptions, SqlExportError> {
        let database = self.database.as_deref().unwrap_or_default();
        let username = self.username.as_deref().unwrap_or_default();
        let password = self.password.as_deref().unwrap_or_default();

        let url = match driver {
            SqlDriver::Postgres => {
                let (host, port) = self.host_and_port()?;
                let mut options = PgConnectOptions::new()
                    .host(&host)
                    .username(username)
                    .password(password)
                    .database(database);
                if let Some(port) = port {
                    options = options.port(port);
                }
                options.to_url_lossy()
            }
            SqlDriver::MySql => {
                let (host, port) = self.host_and_port()?;
                let mut options = MySqlConnectOptions::new()
                    .host(&host)
                    .username(username)
                    .password(password)
                    .database(database);
                if let Some(port) = port {
                    options = options.port(port);
                }
                options.to_url_lossy()
            }
            SqlDriver::Sqlite => {
                return Ok(AnyConnectOptions::from_str(&format!(
                    "sqlite://{}?mode=rwc",
                    database
                ))?);
            }
            SqlDriver::Mssql => return Err(SqlExportError::UnsupportedDriver("mssql".into())),
        };

        Ok(AnyConnectOptions::from_url(&url)?)
    }
}

/// Open a single-connection pool for one export.
pub async fn connect(
    descriptor: &ConnectionDescriptor,
    driver: SqlDriver,
) -> Result<AnyPool, SqlExportError> {
    sqlx::any::install_default_drivers();
    let options = descriptor.connect_options(driver)?;

    tracing::debug!(?descriptor, "Connecting for SQL export");

    let pool = AnyPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(15))
        .connect_with(options)
        .await?;
    Ok(pool)
}

/// Open a SQL Server connection. The default port is 1433.
pub async fn connect_mssql(descriptor: &ConnectionDescriptor) -> Result<MssqlClient, SqlExportError> {
    let (host, port) = descriptor.host_and_port()?;
    let mut config = tiberius::Config::new();
    config.host(host);
    config.port(port.unwrap_or(1433));
    config.database(descriptor.database.as_deref().unwrap_or_default());
    config.authentication(tiberius::AuthMethod::sql_server(
        descriptor.username.as_deref().unwrap_or_default(),
        descriptor.password.as_deref().unwrap_or_default(),
    ));

    tracing::debug!(?descriptor, "Connecting to SQL Server for SQL export");

    let connecting = async {
        let tcp = TcpStream::connect(config.get_addr()).await?;
        tcp.set_nodelay(true)?;
        Ok::<_, SqlExportError>(tiberius::Client::connect(config, tcp.compat_write()).await?)
    };
    tokio::time::timeout(CONNECT_TIMEOUT, connecting)
        .await
        .map_err(|_| SqlExportError::ConnectTimeout(CONNECT_TIMEOUT))?
}

/// Connect, write and disconnect with whichever client serves the driver.
pub async fn export_table(
    descriptor: &ConnectionDescriptor,
    target: &SqlTarget,
    table: &Table,
) -> Result<u64, SqlExportError> {
    match target.driver {
        SqlDriver::Mssql => {
            let mut client = connect_mssql(descriptor).await?;
            let written = write_table_mssql(&mut client, target, table).await;
            if let Err(error) = client.close().await {
                tracing::warn!(%error, "Failed to close SQL Server connection");
            }
            written
        }
        driver => {
            let pool = connect(descriptor, driver).await?;
            let written = write_table(&pool, target, table).await;
            pool.close().await;
            written
        }
    }
}

/// Column type inferred from a column's non-null cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Boolean,
    BigInt,
    Double,
    Text,
}

impl ColumnType {
    fn sql(self, driver: SqlDriver) -> &'static str {
        match (self, driver) {
            (ColumnType::Boolean, SqlDriver::Mssql) => "BIT",
            (ColumnType::Boolean, _) => "BOOLEAN",
            (ColumnType::BigInt, _) => "BIGINT",
            (ColumnType::Double, SqlDriver::Mssql) => "FLOAT",
            (ColumnType::Double, _) => "DOUBLE PRECISION",
            (ColumnType::Text, SqlDriver::Mssql) => "NVARCHAR(MAX)",
            (ColumnType::Text, _) => "TEXT",
        }
    }
}

/// Infer one type per column. Mixed or all-null columns are `Text`.
pub fn infer_column_types(table: &Table) -> Vec<ColumnType> {
    (0..table.columns().len())
        .map(|col| {
            let mut kinds = table
                .rows()
                .iter()
                .map(|row| &row[col])
                .filter(|cell| !cell.is_null())
                .peekable();
            if kinds.peek().is_none() {
                return ColumnType::Text;
            }

            let mut all_bool = true;
            let mut all_int = true;
            let mut all_numeric = true;
            for cell in kinds {
                all_bool &= matches!(cell, CellValue::Bool(_));
                all_int &= matches!(cell, CellValue::Integer(_));
                all_numeric &= matches!(cell, CellValue::Integer(_) | CellValue::Real(_));
            }

            if all_bool {
                ColumnType::Boolean
            } else if all_int {
                ColumnType::BigInt
            } else if all_numeric {
                ColumnType::Double
            } else {
                ColumnType::Text
            }
        })
        .collect()
}

/// A cell converted to its column's type.
enum Bound {
    Null,
    Bool(bool),
    BigInt(i64),
    Double(f64),
    Text(String),
}

fn bind_value(cell: &CellValue, column_type: ColumnType) -> Bound {
    match (cell, column_type) {
        (CellValue::Null, _) => Bound::Null,
        (CellValue::Bool(b), ColumnType::Boolean) => Bound::Bool(*b),
        (CellValue::Integer(i), ColumnType::BigInt) => Bound::BigInt(*i),
        (CellValue::Integer(i), ColumnType::Double) => Bound::Double(*i as f64),
        (CellValue::Real(r), ColumnType::Double) => Bound::Double(*r),
        (other, _) => Bound::Text(other.to_string()),
    }
}

/// Where and how to write.
#[derive(Debug, Clone)]
pub struct SqlTarget {
    pub driver: SqlDriver,
    pub table_name: String,
    pub mode: WriteMode,
    /// Rows per `INSERT` statement.
    pub batch_rows: usize,
}

/// Statements for one write, shared by both clients.
struct WritePlan {
    driver: SqlDriver,
    table_name: String,
    quoted_table: String,
    quoted_columns: Vec<String>,
    types: Vec<ColumnType>,
    rows_per_batch: usize,
}

impl WritePlan {
    fn new(target: &SqlTarget, table: &Table) -> Result<Self, SqlExportError> {
        let driver = target.driver;
        let name = target.table_name.trim();
        let too_long = driver.max_identifier_len().is_some_and(|limit| name.len() > limit);
        if name.is_empty() || name.contains('\0') || too_long {
            return Err(SqlExportError::InvalidTableName(target.table_name.clone()));
        }
        if table.columns().is_empty() {
            return Err(SqlExportError::EmptyTable);
        }

        let quoted_columns: Vec<String> = unique_column_names(driver, table.columns())
            .iter()
            .map(|c| driver.quote_identifier(c))
            .collect();
        let width = quoted_columns.len();
        let rows_per_batch = target
            .batch_rows
            .min(driver.max_rows_per_insert())
            .clamp(1, (driver.max_parameters() / width).max(1));

        Ok(Self {
            driver,
            table_name: name.to_string(),
            quoted_table: driver.quote_identifier(name),
            quoted_columns,
            types: infer_column_types(table),
            rows_per_batch,
        })
    }

    fn drop_table(&self) -> String {
        self.driver.drop_table(&self.quoted_table)
    }

    fn create_table(&self) -> String {
        let definitions: Vec<String> = self
            .quoted_columns
            .iter()
            .zip(&self.types)
            .map(|(column, ty)| format!("{} {}", column, ty.sql(self.driver)))
            .collect();
        self.driver.create_table(&self.quoted_table, &definitions)
    }

    /// Multi-row `INSERT` for `rows` and the values to bind, in order.
    /// Nulls are written literally so no typed null is bound.
    fn insert(&self, rows: &[Vec<CellValue>]) -> (String, Vec<Bound>) {
        let width = self.quoted_columns.len();
        let mut values = Vec::with_capacity(rows.len() * width);
        let mut tuples = Vec::with_capacity(rows.len());
        for row in rows {
            let mut slots = Vec::with_capacity(width);
            for (cell, ty) in row.iter().zip(&self.types) {
                match bind_value(cell, *ty) {
                    Bound::Null => slots.push("NULL".to_string()),
                    bound => {
                        values.push(bound);
                        slots.push(self.driver.placeholder(values.len()));
                    }
                }
            }
            tuples.push(format!("({})", slots.join(", ")));
        }

        let sql = format!(
            "INSERT INTO {} ({}) VALUES {}",
            self.quoted_table,
            self.quoted_columns.join(", "),
            tuples.join(", ")
        );
        (sql, values)
    }

    fn log_written(&self, mode: WriteMode, written: u64, start: Instant) {
        tracing::info!(
            table_name = %self.table_name,
            ?mode,
            rows = written,
            columns = self.quoted_columns.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Wrote table to database"
        );
    }
}

/// Write every row of `table` through a sqlx pool; returns rows written.
pub async fn write_table(
    pool: &AnyPool,
    target: &SqlTarget,
    table: &Table,
) -> Result<u64, SqlExportError> {
    let start = Instant::now();
    if target.driver == SqlDriver::Mssql {
        return Err(SqlExportError::UnsupportedDriver("mssql".into()));
    }
    let plan = WritePlan::new(target, table)?;

    let mut tx = pool.begin().await?;

    if target.mode == WriteMode::Replace {
        sqlx::query::<Any>(&plan.drop_table()).execute(&mut *tx).await?;
    }
    sqlx::query::<Any>(&plan.create_table()).execute(&mut *tx).await?;

    let mut written = 0u64;
    for chunk in table.rows().chunks(plan.rows_per_batch) {
        let (sql, values) = plan.insert(chunk);
        let mut query = sqlx::query::<Any>(&sql);
        for value in values {
            query = match value {
                Bound::Bool(b) => query.bind(b),
                Bound::BigInt(i) => query.bind(i),
                Bound::Double(f) => query.bind(f),
                Bound::Text(s) => query.bind(s),
                Bound::Null => query,
            };
        }
        written += query.execute(&mut *tx).await?.rows_affected();
    }

    tx.commit().await?;
    plan.log_written(target.mode, written, start);
    Ok(written)
}

/// Write every row of `table` into SQL Server; returns rows written.
///
/// Same semantics as [`write_table`]: one transaction, dropped first on
/// replace. Dropping the connection mid-write rolls the transaction back.
pub async fn write_table_mssql(
    client: &mut MssqlClient,
    target: &SqlTarget,
    table: &Table,
) -> Result<u64, SqlExportError> {
    let start = Instant::now();
    let plan = WritePlan::new(target, table)?;

    client.simple_query("BEGIN TRANSACTION").await?.into_results().await?;

    if target.mode == WriteMode::Replace {
        client.simple_query(plan.drop_table()).await?.into_results().await?;
    }
    client.simple_query(plan.create_table()).await?.into_results().await?;

    let mut written = 0u64;
    for chunk in table.rows().chunks(plan.rows_per_batch) {
        let (sql, values) = plan.insert(chunk);
        let mut query = tiberius::Query::new(sql);
        for value in values {
            match value {
                Bound::Bool(b) => query.bind(b),
                Bound::BigInt(i) => query.bind(i),
                Bound::Double(f) => query.bind(f),
                Bound::Text(s) => query.bind(s),
                Bound::Null => {}
            }
        }
        written += query.execute(client).await?.total();
    }

    client.simple_query("COMMIT TRANSACTION").await?.into_results().await?;
    plan.log_written(target.mode, written, start);
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::flatten::{flatten, FlatRecord, FlattenPolicy};
    use crate::services::test_fixtures::{NAME_PROPERTY, SCENARIO_A, TWO_WALLS};
    use ifc_sheet_core::IfcModel;

    fn table_of(content: &str) -> Table {
        let model = IfcModel::parse(content).unwrap();
        let records: Vec<FlatRecord> = flatten(&model, "model.ifc", &FlattenPolicy::default()).unwrap();
        Table::from_records(&records)
    }

    async fn memory_pool() -> AnyPool {
        sqlx::any::install_default_drivers();
        AnyPoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap()
    }

    async fn row_count(pool: &AnyPool, table_name: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM \"{}\"", table_name))
            .fetch_one(pool)
            .await
            .unwrap()
    }

    fn target(mode: WriteMode) -> SqlTarget {
        SqlTarget {
            driver: SqlDriver::Sqlite,
            table_name: "ifc export".to_string(),
            mode,
            batch_rows: 2,
        }
    }

    #[tokio::test]
    async fn test_scenario_e_replace_keeps_last_write() {
        let pool = memory_pool().await;
        let three = table_of(TWO_WALLS);
        let two = table_of(SCENARIO_A);

        write_table(&pool, &target(WriteMode::Replace), &three).await.unwrap();
        assert_eq!(row_count(&pool, "ifc export").await, 3);

        write_table(&pool, &target(WriteMode::Replace), &two).await.unwrap();
        assert_eq!(row_count(&pool, "ifc export").await, 2);
    }

    #[tokio::test]
    async fn test_append_creates_then_accumulates() {
        let pool = memory_pool().await;
        let table = table_of(TWO_WALLS);

        assert_eq!(write_table(&pool, &target(WriteMode::Append), &table).await.unwrap(), 3);
        write_table(&pool, &target(WriteMode::Append), &table).await.unwrap();
        assert_eq!(row_count(&pool, "ifc export").await, 6);
    }

    #[tokio::test]
    async fn test_values_and_nulls_are_written() {
        let pool = memory_pool().await;
        let table = table_of(SCENARIO_A);
        write_table(&pool, &target(WriteMode::Replace), &table).await.unwrap();

        let rows: Vec<(String, Option<String>)> = sqlx::query_as(
            "SELECT \"GlobalId\", \"Material\" FROM \"ifc export\" ORDER BY \"GlobalId\"",
        )
        .fetch_all(&pool)
        .await
        .unwrap();
        assert_eq!(
            rows,
            vec![
                ("door-guid".to_string(), None),
                ("wall-guid".to_string(), Some("Concrete".to_string())),
            ]
        );
    }

    #[tokio::test]
    async fn test_case_insensitive_duplicate_columns_are_suffixed() {
        let pool = memory_pool().await;
        let table = table_of(NAME_PROPERTY);
        assert_eq!(table.columns(), ["GlobalId", "Name", "Type", "FileName", "name"]);

        write_table(&pool, &target(WriteMode::Replace), &table).await.unwrap();

        let row: (String, String) =
            sqlx::query_as("SELECT \"Name\", \"name_2\" FROM \"ifc export\"")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(row, ("Wall".to_string(), "Shadow name".to_string()));
    }

    #[tokio::test]
    async fn test_empty_table_is_rejected() {
        let pool = memory_pool().await;
        let result = write_table(&pool, &target(WriteMode::Append), &Table::default()).await;
        assert!(matches!(result, Err(SqlExportError::EmptyTable)));
    }

    #[test]
    fn test_infer_column_types() {
        let table = table_of(TWO_WALLS);
        let types = infer_column_types(&table);
        let type_of = |name: &str| types[table.column_index(name).unwrap()];

        assert_eq!(type_of("GlobalId"), ColumnType::Text);
        assert_eq!(type_of("Width"), ColumnType::Double);
        assert_eq!(type_of("Layers"), ColumnType::BigInt);
    }

    #[test]
    fn test_identifier_quoting_and_placeholders() {
        assert_eq!(SqlDriver::Postgres.quote_identifier("a\"b"), "\"a\"\"b\"");
        assert_eq!(SqlDriver::MySql.quote_identifier("a`b"), "`a``b`");
        assert_eq!(SqlDriver::Mssql.quote_identifier("a]b"), "[a]]b]");
        assert_eq!(SqlDriver::Postgres.placeholder(3), "$3");
        assert_eq!(SqlDriver::Sqlite.placeholder(3), "?");
        assert_eq!(SqlDriver::Mssql.placeholder(3), "@P3");
    }

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_unique_column_names() {
        let names = unique_column_names(
            SqlDriver::Sqlite,
            &columns(&["GlobalId", "Name", "Type", "FileName", "name", "NAME", "name_2"]),
        );
        assert_eq!(
            names,
            ["GlobalId", "Name", "Type", "FileName", "name_2", "NAME_3", "name_2_2"]
        );
    }

    #[test]
    fn test_column_names_fit_identifier_limit() {
        let long = "x".repeat(70);
        let longer = format!("{}tail", long);
        let names = unique_column_names(SqlDriver::Postgres, &columns(&[&long, &longer]));
        assert_eq!(names[0], "x".repeat(63));
        assert_eq!(names[1], format!("{}_2", "x".repeat(61)));
        assert!(names.iter().all(|n| n.len() <= 63));

        // Cut on a char boundary
        let accented = "é".repeat(40);
        let names = unique_column_names(SqlDriver::Postgres, &columns(&[&accented]));
        assert_eq!(names[0], "é".repeat(31));

        assert_eq!(unique_column_names(SqlDriver::Sqlite, &columns(&[&long]))[0], long);
    }

    #[test]
    fn test_mssql_statements() {
        let table = table_of(TWO_WALLS);
        let target = SqlTarget {
            driver: SqlDriver::Mssql,
            table_name: "ifc export".to_string(),
            mode: WriteMode::Replace,
            batch_rows: 5_000,
        };
        let plan = WritePlan::new(&target, &table).unwrap();

        assert_eq!(plan.drop_table(), "DROP TABLE IF EXISTS [ifc export]");
        let create = plan.create_table();
        assert!(create.starts_with(
            "IF OBJECT_ID(N'[ifc export]', N'U') IS NULL CREATE TABLE [ifc export] ("
        ));
        assert!(create.contains("[GlobalId] NVARCHAR(MAX)"));
        assert!(create.contains("[Width] FLOAT"));
        assert!(create.contains("[Layers] BIGINT"));
        assert!(plan.rows_per_batch <= 1_000);

        let (sql, values) = plan.insert(&table.rows()[..1]);
        assert!(sql.starts_with("INSERT INTO [ifc export] ([GlobalId], [Name], [Type], [FileName]"));
        assert!(sql.contains("@P1"));
        assert_eq!(sql.matches("@P").count(), values.len());
    }

    #[test]
    fn test_table_name_longer_than_limit_is_rejected() {
        let target = SqlTarget {
            driver: SqlDriver::Postgres,
            table_name: "t".repeat(64),
            mode: WriteMode::Append,
            batch_rows: 10,
        };
        assert!(matches!(
            WritePlan::new(&target, &table_of(TWO_WALLS)),
            Err(SqlExportError::InvalidTableName(_))
        ));
    }

    #[test]
    fn test_descriptor_completeness() {
        let mut descriptor = ConnectionDescriptor {
            host: Some("db.local:5433".into()),
            username: Some("etl".into()),
            password: Some("s3cret".into()),
            database: Some("bim".into()),
        };
        assert!(descriptor.is_complete(SqlDriver::Postgres));
        assert_eq!(
            descriptor.host_and_port().unwrap(),
            ("db.local".to_string(), Some(5433))
        );
        assert!(!format!("{:?}", descriptor).contains("s3cret"));

        descriptor.password = Some("  ".into());
        assert!(!descriptor.is_complete(SqlDriver::Postgres));

        let sqlite = ConnectionDescriptor {
            database: Some("/tmp/export.db".into()),
            ..Default::default()
        };
        assert!(sqlite.is_complete(SqlDriver::Sqlite));
        assert!(!sqlite.is_complete(SqlDriver::Mssql));
    }

    #[test]
    fn test_parse_driver_and_mode() {
        assert_eq!("PostgreSQL".parse::<SqlDriver>().unwrap(), SqlDriver::Postgres);
        assert_eq!("mssql".parse::<SqlDriver>().unwrap(), SqlDriver::Mssql);
        assert_eq!("SqlServer".parse::<SqlDriver>().unwrap(), SqlDriver::Mssql);
        assert!("oracle".parse::<SqlDriver>().is_err());
        assert_eq!("".parse::<WriteMode>().unwrap(), WriteMode::Append);
        assert_eq!("Replace".parse::<WriteMode>().unwrap(), WriteMode::Replace);
        assert!("upsert".parse::<WriteMode>().is_err());
    }
}

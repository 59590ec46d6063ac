use entity::usuarios;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Schema};

use crate::config::AppConfig;

pub async fn connect(config: &AppConfig) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(config.database_url.clone());
    opt.max_connections(config.db_max_connections)
        .min_connections(1)
        .sqlx_logging(true);

    Database::connect(opt).await
}

/// Create the `usuarios` table, with its unique email and token indexes, if it is missing
pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let mut table = Schema::new(backend).create_table_from_entity(usuarios::Entity);
    table.if_not_exists();

    db.execute(backend.build(&table)).await?;
    tracing::info!("usuarios table ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    use super::*;

    #[tokio::test]
    async fn ensure_schema_issues_one_statement() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        ensure_schema(&db).await.unwrap();

        let log = db.into_transaction_log();
        assert_eq!(1, log.len());
    }
}

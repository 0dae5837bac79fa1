use std::sync::Arc;

use pawlog_core::config::Config;
use pawlog_storage::{DatabasePool, SqliteDiaryStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pawlog_core::logging::init("pawlog");

    let cfg = Arc::new(Config::load()?);
    tracing::info!(database_url = %cfg.database_url, "starting");

    let pool = DatabasePool::new(&cfg.database_url).await?;
    let store = Arc::new(SqliteDiaryStore::new(pool));

    pawlog_telegram::run_polling(cfg, store).await
}

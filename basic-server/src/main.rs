use std::{env, path, sync::Arc};

use eventum::prelude::*;
use eventum::worker::WorkerPool;
use eventum_auth_adapter_sqlite::AuthAdapterSqlite;
use eventum_meta_adapter_sqlite::MetaAdapterSqlite;

pub struct Config {
	pub listen: String,
	pub db_dir: path::PathBuf,
	pub workers: usize,
}

impl Config {
	fn from_env() -> ClResult<Self> {
		let workers = match env::var("WORKERS") {
			Ok(val) => val
				.parse()
				.map_err(|_| Error::ConfigError(format!("WORKERS must be a number, got {:?}", val)))?,
			Err(_) => 2,
		};
		Ok(Config {
			listen: env::var("LISTEN").unwrap_or_else(|_| "127.0.0.1:8000".to_string()),
			db_dir: path::PathBuf::from(env::var("DB_DIR").unwrap_or_else(|_| "./data".to_string())),
			workers,
		})
	}
}

#[tokio::main]
async fn main() -> ClResult<()> {
	let mut builder = eventum::AppBuilder::new();
	let config = Config::from_env()?;

	tokio::fs::create_dir_all(&config.db_dir).await?;
	info!("Using database directory {:?}", config.db_dir);

	// One immediate thread for password hashing, the rest shared
	let worker = Arc::new(WorkerPool::new(1, config.workers.max(1)));
	let auth_adapter = AuthAdapterSqlite::new(worker, &config.db_dir).await?;
	let meta_adapter = MetaAdapterSqlite::new(&config.db_dir).await?;

	builder
		.listen(config.listen)
		.auth_adapter(Arc::new(auth_adapter))
		.meta_adapter(Arc::new(meta_adapter));
	builder.run().await
}

// vim: ts=4

mod error;

pub use error::{Error, Result};

use std::{env, str::FromStr, thread};

use sqlx::{
	ConnectOptions, Connection, Executor, PgPool,
	postgres::{PgConnectOptions, PgConnection, PgPoolOptions},
};
use tokio::runtime::Builder;
use uuid::Uuid;

pub const DSN_ENV: &str = "VMS_PG_DSN";

const ADMIN_DATABASES: [&str; 2] = ["postgres", "template1"];
const NAME_PREFIX: &str = "vms_test_";

/// A throwaway database created next to the one named by `VMS_PG_DSN`.
///
/// Call [`TestDatabase::cleanup`] at the end of a test. A database that is dropped without it
/// (a panicking test) is removed from a helper thread.
pub struct TestDatabase {
	name: String,
	dsn: String,
	admin_options: PgConnectOptions,
	dropped: bool,
}
impl TestDatabase {
	/// Creates a database when `VMS_PG_DSN` is set. Without it the skip is reported on stderr
	/// under `test_name` and `None` is returned.
	pub async fn from_env(test_name: &str) -> Result<Option<Self>> {
		let Some(base_dsn) = env_dsn() else {
			eprintln!("Skipping {test_name}; set {DSN_ENV} to run this test.");

			return Ok(None);
		};

		Self::new(&base_dsn).await.map(Some)
	}

	pub async fn new(base_dsn: &str) -> Result<Self> {
		let base_options = PgConnectOptions::from_str(base_dsn)
			.map_err(|err| Error::Message(format!("Failed to parse {DSN_ENV}: {err}.")))?;
		let (admin_options, mut admin_conn) = connect_admin(&base_options).await?;
		let name = format!("{NAME_PREFIX}{}", Uuid::new_v4().simple());

		admin_conn
			.execute(format!(r#"CREATE DATABASE "{name}""#).as_str())
			.await
			.map_err(|err| Error::Message(format!("Failed to create {name}: {err}.")))?;

		let dsn = base_options.database(&name).to_url_lossy().to_string();

		Ok(Self { name, dsn, admin_options, dropped: false })
	}

	pub fn dsn(&self) -> &str {
		&self.dsn
	}

	/// A small pool on the test database, for tests that seed rows directly.
	pub async fn pool(&self, max_connections: u32) -> Result<PgPool> {
		let pool =
			PgPoolOptions::new().max_connections(max_connections).connect(&self.dsn).await?;

		Ok(pool)
	}

	pub async fn cleanup(mut self) -> Result<()> {
		drop_database(&self.name, &self.admin_options).await?;

		self.dropped = true;

		Ok(())
	}
}
impl Drop for TestDatabase {
	fn drop(&mut self) {
		if self.dropped {
			return;
		}

		let name = self.name.clone();
		let admin_options = self.admin_options.clone();
		let worker = thread::spawn(move || {
			let result = Builder::new_current_thread()
				.enable_all()
				.build()
				.map_err(|err| Error::Message(err.to_string()))
				.and_then(|runtime| runtime.block_on(drop_database(&name, &admin_options)));

			if let Err(err) = result {
				eprintln!("Failed to drop {name}: {err}.");
			}
		});
		let _ = worker.join();
	}
}

pub fn env_dsn() -> Option<String> {
	env::var(DSN_ENV).ok().filter(|dsn| !dsn.trim().is_empty())
}

async fn connect_admin(
	base_options: &PgConnectOptions,
) -> Result<(PgConnectOptions, PgConnection)> {
	let mut errors = Vec::new();

	for database in ADMIN_DATABASES {
		let options = base_options.clone().database(database);

		match PgConnection::connect_with(&options).await {
			Ok(conn) => return Ok((options, conn)),
			Err(err) => errors.push(format!("{database}: {err}")),
		}
	}

	Err(Error::Message(format!("Failed to connect to an admin database ({}).", errors.join("; "))))
}

async fn drop_database(name: &str, admin_options: &PgConnectOptions) -> Result<()> {
	let mut conn = PgConnection::connect_with(admin_options).await?;

	// Pools from the test may still hold connections.
	sqlx::query(
		"\
SELECT pg_terminate_backend(pid)
FROM pg_stat_activity
WHERE datname = $1 AND pid <> pg_backend_pid()",
	)
	.bind(name)
	.fetch_all(&mut conn)
	.await?;

	conn.execute(format!(r#"DROP DATABASE IF EXISTS "{name}""#).as_str()).await?;

	Ok(())
}

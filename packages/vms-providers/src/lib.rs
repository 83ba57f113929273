pub mod page;
pub mod reddit;

mod error;

pub use error::{Error, Result};

use std::time::Duration;

use reqwest::Client;

fn http_client(timeout_ms: u64, user_agent: &str) -> Result<Client> {
	let client = Client::builder()
		.timeout(Duration::from_millis(timeout_ms))
		.user_agent(user_agent)
		.build()?;

	Ok(client)
}

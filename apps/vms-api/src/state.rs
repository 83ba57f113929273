use std::sync::Arc;

use vms_service::VmsService;
use vms_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<VmsService>,
}
impl AppState {
	pub async fn new(config: vms_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		let service = VmsService::new(config, db)?;

		Ok(Self::from_service(service))
	}

	pub fn from_service(service: VmsService) -> Self {
		Self { service: Arc::new(service) }
	}

	pub fn api_auth_token(&self) -> Option<&str> {
		self.service.cfg.security.api_auth_token.as_deref()
	}
}

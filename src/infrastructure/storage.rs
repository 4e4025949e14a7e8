use crate::config::AppConfig;
use crate::services::content_store::{ContentStore, LocalContentStore};
use std::sync::Arc;
use tracing::info;

pub async fn setup_storage(config: &AppConfig) -> anyhow::Result<Arc<dyn ContentStore>> {
    let store = LocalContentStore::new(config.avatars_dir.clone());

    info!("🗄️  Avatar storage: {}", config.avatars_dir.display());

    // fail fast on an unusable root
    store.ensure_namespace().await?;
    info!("✅ Avatar storage is ready");

    Ok(Arc::new(store))
}

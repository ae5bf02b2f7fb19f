// ── Sync gateway ──
//
// The two remote operations the reconciler depends on. The core only
// relies on their contracts: `fetch` returns the whole document, `replace`
// swaps it atomically. Neither retries.

use std::future::Future;

use stconf_api::ConfigClient;

use crate::error::CoreError;
use crate::model::ConfigDocument;

/// Fetch/replace access to a remote configuration document.
pub trait ConfigGateway {
    fn fetch(&self) -> impl Future<Output = Result<ConfigDocument, CoreError>> + Send;

    fn replace(
        &self,
        document: &ConfigDocument,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;
}

impl ConfigGateway for ConfigClient {
    async fn fetch(&self) -> Result<ConfigDocument, CoreError> {
        Ok(self.get_config().await?)
    }

    async fn replace(&self, document: &ConfigDocument) -> Result<(), CoreError> {
        Ok(self.post_config(document).await?)
    }
}

use salvo::async_trait;
use std::sync::Arc;

use crate::error::AppResult;
use mentora_core::error::CoreError;
use mentora_store::SessionStore;

pub struct StoreHandler<T: SessionStore + Clone> {
    pub store: T,
}

#[async_trait]
impl<T: SessionStore + Clone + 'static> salvo::Handler for StoreHandler<T> {
    #[tracing::instrument(skip(self, _req, depot, _res, _ctrl))]
    async fn handle(
        &self,
        _req: &mut salvo::Request,
        depot: &mut salvo::Depot,
        _res: &mut salvo::Response,
        _ctrl: &mut salvo::FlowCtrl,
    ) {
        let store: Arc<dyn SessionStore> = Arc::new(self.store.clone());
        depot.inject(store);
    }
}

/// ## Summary
/// Retrieves the session store from the depot.
///
/// ## Errors
/// Returns an error if no store was injected for this request.
pub fn get_store_from_depot(depot: &salvo::Depot) -> AppResult<Arc<dyn SessionStore>> {
    depot
        .obtain::<Arc<dyn SessionStore>>()
        .cloned()
        .map_err(|_err| CoreError::InvariantViolation("Session store not found in depot").into())
}

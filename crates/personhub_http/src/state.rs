//! Shared handler state.

use crate::error::{ApiError, ApiResult};
use log::error;
use personhub_core::{PersonRepository, PersonService, ServiceResult};
use std::sync::Arc;

/// State cloned into every request; holds the person service.
pub struct AppState<R: PersonRepository> {
    service: Arc<PersonService<R>>,
}

impl<R: PersonRepository> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

impl<R: PersonRepository + 'static> AppState<R> {
    pub fn new(service: PersonService<R>) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    pub fn service(&self) -> &PersonService<R> {
        &self.service
    }

    /// Runs a service call on the blocking pool.
    ///
    /// The store is synchronous SQLite, so service calls must not run on
    /// async worker threads.
    pub async fn run<T, F>(&self, op: F) -> ApiResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&PersonService<R>) -> ServiceResult<T> + Send + 'static,
    {
        let service = Arc::clone(&self.service);
        let joined = tokio::task::spawn_blocking(move || op(&service)).await;
        match joined {
            Ok(result) => result.map_err(ApiError::from),
            Err(err) => {
                error!("event=service_call module=http status=error error_code=join_failed error={err}");
                Err(ApiError::InternalServer)
            }
        }
    }
}

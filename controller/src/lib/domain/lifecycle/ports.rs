use crate::domain::lifecycle::models::error::{LifecycleError, TransportError};
use crate::domain::lifecycle::models::request::GraphQlRequest;
use railyard_shared::{OperationResult, ProjectId, Service, ServiceId};
use serde_json::Value;

// A transport sends one GraphQL request and hands back its `data` member
pub trait GraphQlTransport: Send + Sync + 'static + Clone {
    fn execute(
        &self,
        request: &GraphQlRequest,
    ) -> impl Future<Output = Result<Value, TransportError>> + Send;
}

// The lifecycle service reads service state and starts or stops services
pub trait LifecycleService: Send + Sync + 'static + Clone {
    fn get_service(
        &self,
        service_id: &ServiceId,
    ) -> impl Future<Output = Result<Option<Service>, LifecycleError>> + Send;

    fn list_services(
        &self,
        project_id: &ProjectId,
    ) -> impl Future<Output = Result<Vec<Service>, LifecycleError>> + Send;

    fn start_service(
        &self,
        service_id: &ServiceId,
    ) -> impl Future<Output = Result<OperationResult, LifecycleError>> + Send;

    fn stop_service(
        &self,
        service_id: &ServiceId,
    ) -> impl Future<Output = Result<OperationResult, LifecycleError>> + Send;
}

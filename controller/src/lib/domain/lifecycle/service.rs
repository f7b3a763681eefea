use crate::domain::lifecycle::models::error::LifecycleError;
use crate::domain::lifecycle::models::operations::{
    GET_SERVICE, LIST_SERVICES, MutationPair, START, STOP, expected_field, identify,
};
use crate::domain::lifecycle::models::request::GraphQlRequest;
use crate::domain::lifecycle::ports::{GraphQlTransport, LifecycleService};
use log::{debug, error, info, warn};
use railyard_shared::{OperationResult, ProjectId, Service, ServiceId};
use serde_json::Value;

/// Lifecycle operations against the platform, one round trip per read.
///
/// Nothing is cached between calls: every `get_service` and `list_services`
/// goes to the network.
#[derive(Clone)]
pub struct LifecycleClient<T: GraphQlTransport> {
    transport: T,
}

impl<T: GraphQlTransport> LifecycleClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    async fn execute(&self, request: &GraphQlRequest) -> Result<Value, LifecycleError> {
        debug!("sending {}", request.operation_name);
        Ok(self.transport.execute(request).await?)
    }

    /// Issues the primary mutation and, only if its result field is absent,
    /// the fallback. Failed calls are returned as-is and never trigger the
    /// fallback.
    async fn run_with_fallback(
        &self,
        pair: &MutationPair,
        service_id: &ServiceId,
    ) -> Result<OperationResult, LifecycleError> {
        let data = self.execute(&pair.primary.request(service_id)).await?;
        if let Some(result) = pair.primary.result(&data) {
            return Ok(result);
        }

        info!(
            "{} returned no `{}` for {service_id}, trying {}",
            pair.primary.operation_name, pair.primary.field, pair.fallback.operation_name
        );
        let data = self.execute(&pair.fallback.request(service_id)).await?;
        Ok(pair
            .fallback
            .result(&data)
            .unwrap_or_else(|| OperationResult::unknown(service_id.clone())))
    }
}

impl<T: GraphQlTransport> LifecycleService for LifecycleClient<T> {
    async fn get_service(&self, service_id: &ServiceId) -> Result<Option<Service>, LifecycleError> {
        let request = GraphQlRequest::for_service(GET_SERVICE, "GetService", service_id);
        let data = self
            .execute(&request)
            .await
            .inspect_err(|e| error!("Error fetching service {service_id}: {e}"))?;
        Ok(expected_field(&data, "service").and_then(|value| identify("GetService", value)))
    }

    async fn list_services(&self, project_id: &ProjectId) -> Result<Vec<Service>, LifecycleError> {
        let request = GraphQlRequest::for_project(LIST_SERVICES, "ListServices", project_id);
        let data = self
            .execute(&request)
            .await
            .inspect_err(|e| error!("Error listing services of {project_id}: {e}"))?;
        let entries = expected_field(&data, "project")
            .and_then(|project| expected_field(project, "services"))
            .and_then(Value::as_array);
        // entries without an id are skipped, the rest keep server order
        let services: Vec<Service> = entries
            .into_iter()
            .flatten()
            .filter_map(|entry| identify("ListServices", entry))
            .collect();
        if let Some(entries) = entries
            && entries.len() != services.len()
        {
            warn!(
                "skipped {} unidentifiable services in project {project_id}",
                entries.len() - services.len()
            );
        }
        debug!("found {} services in project {project_id}", services.len());
        Ok(services)
    }

    async fn start_service(&self, service_id: &ServiceId) -> Result<OperationResult, LifecycleError> {
        self.run_with_fallback(&START, service_id)
            .await
            .inspect(|result| info!("{result}"))
            .inspect_err(|e| error!("Error starting service {service_id}: {e}"))
    }

    async fn stop_service(&self, service_id: &ServiceId) -> Result<OperationResult, LifecycleError> {
        self.run_with_fallback(&STOP, service_id)
            .await
            .inspect(|result| info!("{result}"))
            .inspect_err(|e| error!("Error stopping service {service_id}: {e}"))
    }
}

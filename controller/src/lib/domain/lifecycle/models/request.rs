use railyard_shared::{ProjectId, ServiceId};
use serde::Serialize;
use serde_json::{Value, json};

/// Body of a single GraphQL POST.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct GraphQlRequest {
    pub query: &'static str,
    #[serde(rename = "operationName")]
    pub operation_name: &'static str,
    pub variables: Value,
}

impl GraphQlRequest {
    pub fn new(query: &'static str, operation_name: &'static str, variables: Value) -> Self {
        Self {
            query,
            operation_name,
            variables,
        }
    }

    pub fn for_service(
        query: &'static str,
        operation_name: &'static str,
        service_id: &ServiceId,
    ) -> Self {
        Self::new(
            query,
            operation_name,
            json!({ "serviceId": service_id.as_str() }),
        )
    }

    pub fn for_project(
        query: &'static str,
        operation_name: &'static str,
        project_id: &ProjectId,
    ) -> Self {
        Self::new(
            query,
            operation_name,
            json!({ "projectId": project_id.as_str() }),
        )
    }
}

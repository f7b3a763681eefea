//! GraphQL documents sent to the platform and the fallback pairing of the
//! lifecycle mutations.
//!
//! The platform does not expose the same mutation names on every API version
//! or account tier. Start and stop therefore name a primary and a fallback
//! mutation; the fallback is only issued when the primary answered
//! successfully but without its expected field.

use crate::domain::lifecycle::models::request::GraphQlRequest;
use log::warn;
use railyard_shared::{OperationResult, ServiceId, UNKNOWN_STATUS};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub const GET_SERVICE: &str = r#"
  query GetService($serviceId: String!) {
    service(id: $serviceId) {
      id
      name
      status
      createdAt
    }
  }
"#;

pub const LIST_SERVICES: &str = r#"
  query ListServices($projectId: String!) {
    project(id: $projectId) {
      services {
        id
        name
        status
        createdAt
      }
    }
  }
"#;

pub const START_SERVICE: &str = r#"
  mutation StartService($serviceId: String!) {
    serviceRestart(id: $serviceId) {
      id
      status
    }
  }
"#;

pub const DEPLOY_SERVICE: &str = r#"
  mutation DeployService($serviceId: String!) {
    serviceDeploy(id: $serviceId) {
      id
      status
    }
  }
"#;

pub const STOP_SERVICE: &str = r#"
  mutation StopService($serviceId: String!) {
    serviceStop(id: $serviceId) {
      id
      status
    }
  }
"#;

pub const PAUSE_SERVICE: &str = r#"
  mutation PauseService($serviceId: String!) {
    servicePause(id: $serviceId) {
      id
      status
    }
  }
"#;

/// A mutation together with the response field that carries its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mutation {
    pub document: &'static str,
    pub operation_name: &'static str,
    pub field: &'static str,
}

impl Mutation {
    pub fn request(&self, service_id: &ServiceId) -> GraphQlRequest {
        GraphQlRequest::for_service(self.document, self.operation_name, service_id)
    }

    /// `None` when the response lacks the expected field or the field carries
    /// no service id.
    pub fn result(&self, data: &Value) -> Option<OperationResult> {
        let value = expected_field(data, self.field)?;
        let payload: MutationPayload = identify(self.operation_name, value)?;
        Some(OperationResult::new(
            payload.id,
            payload.status.unwrap_or_else(|| UNKNOWN_STATUS.to_string()),
        ))
    }
}

#[derive(Deserialize)]
struct MutationPayload {
    id: ServiceId,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationPair {
    pub primary: Mutation,
    pub fallback: Mutation,
}

pub const START: MutationPair = MutationPair {
    primary: Mutation {
        document: START_SERVICE,
        operation_name: "StartService",
        field: "serviceRestart",
    },
    fallback: Mutation {
        document: DEPLOY_SERVICE,
        operation_name: "DeployService",
        field: "serviceDeploy",
    },
};

pub const STOP: MutationPair = MutationPair {
    primary: Mutation {
        document: STOP_SERVICE,
        operation_name: "StopService",
        field: "serviceStop",
    },
    fallback: Mutation {
        document: PAUSE_SERVICE,
        operation_name: "PauseService",
        field: "servicePause",
    },
};

/// Returns the value of `field` when `data` carries it with a non-null value.
///
/// A field the server nulled on purpose and a field missing because of schema
/// drift look the same here; both count as absent.
pub fn expected_field<'a>(data: &'a Value, field: &str) -> Option<&'a Value> {
    data.as_object()?.get(field).filter(|value| !value.is_null())
}

/// Reads `value` as `T`; a value that does not have the expected shape is
/// treated like an absent one.
pub(crate) fn identify<T: DeserializeOwned>(operation: &'static str, value: &Value) -> Option<T> {
    serde_json::from_value(value.clone())
        .inspect_err(|e| warn!("{operation} returned an unidentifiable value, ignoring it: {e}"))
        .ok()
}

//! Start, stop and inspect platform services from the command line
mod cli;

use crate::cli::{Action, configure_cli};
use controller::config::{ConfigError, load_config};
use controller::domain::lifecycle::models::error::LifecycleError;
use controller::domain::lifecycle::ports::LifecycleService;
use controller::domain::lifecycle::service::LifecycleClient;
use controller::outbound::binder::{TransportBinder, TransportLifetime};
use env_logger::Env;
use log::{debug, info};
use railyard_shared::{OperationResult, ProjectId, Service, ServiceId, StatusPhase};
use serde_json::Value;
use std::io::Write;
use thiserror::Error;

#[derive(Debug, Error)]
enum CliError {
    #[error("no project given, pass --project or set RAILYARD_PROJECT_ID")]
    NoProject,
    #[error("service {0} not found")]
    NotFound(ServiceId),
    #[error("service {service} is already {phase}, pass --force to send the request anyway")]
    AlreadyInPhase { service: ServiceId, phase: StatusPhase },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn print_services(out: &mut impl Write, services: &[Service], json: bool) -> Result<(), CliError> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(services)?)?;
        return Ok(());
    }
    if services.is_empty() {
        writeln!(out, "no services found")?;
    }
    for service in services {
        writeln!(out, "{service}")?;
    }
    Ok(())
}

fn print_result(out: &mut impl Write, result: &OperationResult, json: bool) -> Result<(), CliError> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(result)?)?;
    } else {
        writeln!(out, "{result}")?;
    }
    Ok(())
}

/// Refuses a start or stop the dashboard would have disabled for this status.
async fn check_phase<LS: LifecycleService>(
    service: &LS,
    service_id: &ServiceId,
    allowed: fn(&Service) -> bool,
) -> Result<(), CliError> {
    let current = service
        .get_service(service_id)
        .await?
        .ok_or_else(|| CliError::NotFound(service_id.clone()))?;
    if allowed(&current) {
        Ok(())
    } else {
        Err(CliError::AlreadyInPhase {
            service: service_id.clone(),
            phase: current.phase(),
        })
    }
}

async fn run<LS: LifecycleService>(
    action: &Action,
    service: &LS,
    default_project: Option<&ProjectId>,
    json: bool,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match action {
        Action::List { project } => {
            let project = project
                .as_ref()
                .or(default_project)
                .ok_or(CliError::NoProject)?;
            debug!("listing services of {project}");
            let services = service.list_services(project).await?;
            print_services(out, &services, json)
        }
        Action::Get { service: service_id } => match service.get_service(service_id).await? {
            Some(found) if json => {
                writeln!(out, "{}", serde_json::to_string_pretty(&found)?)?;
                Ok(())
            }
            Some(found) => print_services(out, &[found], false),
            None if json => {
                writeln!(out, "{}", Value::Null)?;
                Err(CliError::NotFound(service_id.clone()))
            }
            None => Err(CliError::NotFound(service_id.clone())),
        },
        Action::Start {
            service: service_id,
            force,
        } => {
            if !force {
                check_phase(service, service_id, Service::can_start).await?;
            }
            info!("Spinning up {service_id}");
            let result = service.start_service(service_id).await?;
            print_result(out, &result, json)
        }
        Action::Stop {
            service: service_id,
            force,
        } => {
            if !force {
                check_phase(service, service_id, Service::can_stop).await?;
            }
            info!("Spinning down {service_id}");
            let result = service.stop_service(service_id).await?;
            print_result(out, &result, json)
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + 'static>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    let cli = configure_cli();
    let config = load_config(cli.config_path.as_deref())?;

    // one invocation, one request cycle: nothing to keep between calls
    let binder = TransportBinder::new(config.transport()?, TransportLifetime::PerCall);
    let lifecycle_service = LifecycleClient::new(binder);

    let mut stdout = std::io::stdout().lock();
    run(
        &cli.action,
        &lifecycle_service,
        config.project_id.as_ref(),
        cli.json,
        &mut stdout,
    )
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use controller::domain::lifecycle::models::error::TransportError;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// Services held in memory; start and stop rewrite the status.
    #[derive(Clone, Default)]
    struct MemoryLifecycle {
        services: Arc<Mutex<HashMap<ServiceId, Service>>>,
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl MemoryLifecycle {
        fn with(services: &[(&str, &str)]) -> Self {
            let lifecycle = Self::default();
            for (id, status) in services {
                lifecycle.services.lock().unwrap().insert(
                    ServiceId::new(*id),
                    Service {
                        id: ServiceId::new(*id),
                        name: Some(format!("{id}-name")),
                        status: Some(status.to_string()),
                        created_at: None,
                    },
                );
            }
            lifecycle
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn set_status(&self, id: &ServiceId, status: &str) -> OperationResult {
            if let Some(service) = self.services.lock().unwrap().get_mut(id) {
                service.status = Some(status.to_string());
            }
            OperationResult::new(id.clone(), status)
        }
    }

    impl LifecycleService for MemoryLifecycle {
        async fn get_service(&self, id: &ServiceId) -> Result<Option<Service>, LifecycleError> {
            self.calls.lock().unwrap().push(format!("get {id}"));
            Ok(self.services.lock().unwrap().get(id).cloned())
        }

        async fn list_services(&self, project: &ProjectId) -> Result<Vec<Service>, LifecycleError> {
            self.calls.lock().unwrap().push(format!("list {project}"));
            if project.as_str() == "proj_broken" {
                return Err(TransportError::Status {
                    status: 500,
                    body: "boom".to_string(),
                }
                .into());
            }
            let mut services: Vec<_> = self.services.lock().unwrap().values().cloned().collect();
            services.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
            Ok(services)
        }

        async fn start_service(&self, id: &ServiceId) -> Result<OperationResult, LifecycleError> {
            self.calls.lock().unwrap().push(format!("start {id}"));
            Ok(self.set_status(id, "DEPLOYING"))
        }

        async fn stop_service(&self, id: &ServiceId) -> Result<OperationResult, LifecycleError> {
            self.calls.lock().unwrap().push(format!("stop {id}"));
            Ok(self.set_status(id, "STOPPED"))
        }
    }

    async fn run_to_string(
        action: Action,
        lifecycle: &MemoryLifecycle,
        default_project: Option<&str>,
        json: bool,
    ) -> (Result<(), CliError>, String) {
        let project = default_project.map(ProjectId::new);
        let mut out = Vec::new();
        let result = run(&action, lifecycle, project.as_ref(), json, &mut out).await;
        (result, String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn test_list_uses_default_project() {
        let lifecycle = MemoryLifecycle::with(&[("svc_a", "RUNNING"), ("svc_b", "STOPPED")]);
        let (result, out) =
            run_to_string(Action::List { project: None }, &lifecycle, Some("proj_1"), false).await;

        result.unwrap();
        assert_eq!(
            out,
            "svc_a-name (svc_a) RUNNING [running]\nsvc_b-name (svc_b) STOPPED [stopped]\n"
        );
        assert_eq!(lifecycle.calls(), ["list proj_1"]);
    }

    #[tokio::test]
    async fn test_list_without_project_fails_before_any_call() {
        let lifecycle = MemoryLifecycle::default();
        let (result, _) =
            run_to_string(Action::List { project: None }, &lifecycle, None, false).await;

        assert!(matches!(result, Err(CliError::NoProject)));
        assert!(lifecycle.calls().is_empty());
    }

    #[tokio::test]
    async fn test_list_failure_is_reported() {
        let lifecycle = MemoryLifecycle::default();
        let action = Action::List {
            project: Some(ProjectId::new("proj_broken")),
        };
        let (result, out) = run_to_string(action, &lifecycle, Some("proj_1"), false).await;

        assert!(matches!(result, Err(CliError::Lifecycle(_))));
        assert!(out.is_empty());
        assert_eq!(lifecycle.calls(), ["list proj_broken"]);
    }

    #[tokio::test]
    async fn test_get_missing_service() {
        let lifecycle = MemoryLifecycle::default();
        let action = Action::Get {
            service: ServiceId::new("svc_x"),
        };
        let (result, _) = run_to_string(action, &lifecycle, None, false).await;

        assert!(matches!(result, Err(CliError::NotFound(id)) if id.as_str() == "svc_x"));
    }

    #[tokio::test]
    async fn test_get_as_json() {
        let lifecycle = MemoryLifecycle::with(&[("svc_a", "RUNNING")]);
        let action = Action::Get {
            service: ServiceId::new("svc_a"),
        };
        let (result, out) = run_to_string(action, &lifecycle, None, true).await;

        result.unwrap();
        let printed: Value = serde_json::from_str(&out).unwrap();
        assert!(printed.is_object());
        let printed: Service = serde_json::from_value(printed).unwrap();
        assert_eq!(printed.id, ServiceId::new("svc_a"));
        assert_eq!(printed.status.as_deref(), Some("RUNNING"));
    }

    #[tokio::test]
    async fn test_start_refused_when_running() {
        let lifecycle = MemoryLifecycle::with(&[("svc_a", "RUNNING")]);
        let action = Action::Start {
            service: ServiceId::new("svc_a"),
            force: false,
        };
        let (result, _) = run_to_string(action, &lifecycle, None, false).await;

        assert!(matches!(
            result,
            Err(CliError::AlreadyInPhase {
                phase: StatusPhase::Running,
                ..
            })
        ));
        assert_eq!(lifecycle.calls(), ["get svc_a"]);
    }

    #[tokio::test]
    async fn test_start_forced_skips_check() {
        let lifecycle = MemoryLifecycle::with(&[("svc_a", "RUNNING")]);
        let action = Action::Start {
            service: ServiceId::new("svc_a"),
            force: true,
        };
        let (result, out) = run_to_string(action, &lifecycle, None, false).await;

        result.unwrap();
        assert_eq!(out, "service svc_a is now DEPLOYING\n");
        assert_eq!(lifecycle.calls(), ["start svc_a"]);
    }

    #[tokio::test]
    async fn test_stop_running_service() {
        let lifecycle = MemoryLifecycle::with(&[("svc_a", "RUNNING")]);
        let action = Action::Stop {
            service: ServiceId::new("svc_a"),
            force: false,
        };
        let (result, out) = run_to_string(action, &lifecycle, None, true).await;

        result.unwrap();
        let printed: OperationResult = serde_json::from_str(&out).unwrap();
        assert_eq!(printed.status, "STOPPED");
        assert_eq!(lifecycle.calls(), ["get svc_a", "stop svc_a"]);
    }

    #[tokio::test]
    async fn test_stop_refused_when_stopped() {
        let lifecycle = MemoryLifecycle::with(&[("svc_a", "PAUSED")]);
        let action = Action::Stop {
            service: ServiceId::new("svc_a"),
            force: false,
        };
        let (result, _) = run_to_string(action, &lifecycle, None, false).await;

        assert!(matches!(result, Err(CliError::AlreadyInPhase { .. })));
        assert_eq!(lifecycle.calls(), ["get svc_a"]);
    }
}

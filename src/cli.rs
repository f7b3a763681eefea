use clap::{Arg, ArgAction, ArgMatches, Command};
use railyard_shared::{ProjectId, ServiceId};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    List { project: Option<ProjectId> },
    Get { service: ServiceId },
    Start { service: ServiceId, force: bool },
    Stop { service: ServiceId, force: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub config_path: Option<PathBuf>,
    pub json: bool,
    pub action: Action,
}

fn service_id(matches: &ArgMatches) -> ServiceId {
    ServiceId::new(
        matches
            .get_one::<String>("service_id")
            .cloned()
            .unwrap_or_default(),
    )
}

impl From<ArgMatches> for Config {
    fn from(matches: ArgMatches) -> Self {
        let action = match matches.subcommand() {
            Some(("get", sub)) => Action::Get {
                service: service_id(sub),
            },
            Some(("start", sub)) => Action::Start {
                service: service_id(sub),
                force: sub.get_flag("force"),
            },
            Some(("stop", sub)) => Action::Stop {
                service: service_id(sub),
                force: sub.get_flag("force"),
            },
            Some(("list", sub)) => Action::List {
                project: sub.get_one::<String>("project").cloned().map(ProjectId::new),
            },
            _ => Action::List { project: None },
        };
        Config {
            config_path: matches.get_one::<PathBuf>("config").cloned(),
            json: matches.get_flag("json"),
            action,
        }
    }
}

fn service_arg() -> Arg {
    Arg::new("service_id")
        .value_name("SERVICE_ID")
        .help("Identifier of the service on the platform")
        .required(true)
}

fn force_arg() -> Arg {
    Arg::new("force")
        .long("force")
        .help("Skip the check against the current service status")
        .action(ArgAction::SetTrue)
}

pub(crate) fn command() -> Command {
    Command::new("railyard")
        .version(env!("CARGO_PKG_VERSION"))
        .about("start and stop platform services through the GraphQL API")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("TOML configuration file; RAILYARD_* environment variables take precedence")
                .value_name("PATH")
                .global(true)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print results as JSON")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("list").about("List the services of a project").arg(
                Arg::new("project")
                    .short('p')
                    .long("project")
                    .value_name("PROJECT_ID")
                    .help("Project to list (default: RAILYARD_PROJECT_ID)"),
            ),
        )
        .subcommand(
            Command::new("get")
                .about("Show a single service")
                .arg(service_arg()),
        )
        .subcommand(
            Command::new("start")
                .about("Spin up a service")
                .arg(service_arg())
                .arg(force_arg()),
        )
        .subcommand(
            Command::new("stop")
                .about("Spin down a service")
                .arg(service_arg())
                .arg(force_arg()),
        )
}

pub(crate) fn configure_cli() -> Config {
    command().get_matches().into()
}

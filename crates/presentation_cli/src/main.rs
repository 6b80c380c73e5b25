//! Faultmesh CLI
//!
//! Command-line interface for routing inspection, fault-injection rule
//! management and chaos-recipe runs against the mesh control plane.

#![allow(clippy::print_stdout)]

mod table;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use application::{
    FaultRuleService, FixedDelayConvergence, OrchestratorConfig, RecipeOrchestrator,
    RoutingViewService,
};
use clap::{Parser, Subcommand};
use domain::{
    Checklist, ExperimentReport, FailureScenario, FaultInjectionRule, FaultRuleRequest,
    RecipeSpec, ServiceRoutingView, VersionSelector,
};
use infrastructure::{
    ConsoleSignal, ControllerClient, FaultmeshConfig, LogStoreAssertionChecker, RegistryClient,
    ScenarioFailureGenerator, ShellScriptRunner, init_telemetry,
};
use table::Table;

/// Faultmesh CLI
#[derive(Parser)]
#[command(name = "faultmesh")]
#[command(author, version, about = "Chaos experiments for a microservice mesh", long_about = None)]
struct Cli {
    /// Configuration file (TOML); FAULTMESH_* env vars override it,
    /// e.g. FAULTMESH_CONTROLLER__TOKEN
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List services with versions, routing defaults, selectors and liveness
    ServiceList,

    /// Set a service's traffic-routing policy
    RouteSet {
        /// Service to route
        service: String,

        /// Default version for unmatched traffic
        #[arg(short, long)]
        default: Option<String>,

        /// Selector in short form, e.g. 'v2(user=alice)'; repeatable
        #[arg(short, long)]
        selector: Vec<String>,
    },

    /// Delete a service's traffic-routing policy
    RouteDelete {
        /// Service whose policy is removed
        service: String,
    },

    /// List installed fault-injection rules
    RuleList,

    /// Install a single fault-injection rule
    RuleSet {
        /// Source service name
        #[arg(long)]
        source: Option<String>,

        /// Destination service name
        #[arg(long)]
        destination: Option<String>,

        /// Header that scopes the fault to matching requests
        #[arg(long)]
        header: Option<String>,

        /// Header-value pattern; matches everything when omitted
        #[arg(long)]
        pattern: Option<String>,

        /// Delay in seconds
        #[arg(long, default_value_t = 0.0)]
        delay: f64,

        /// Probability of delaying a matching request
        #[arg(long, default_value_t = 0.0)]
        delay_probability: f64,

        /// Probability of aborting a matching request
        #[arg(long, default_value_t = 0.0)]
        abort_probability: f64,

        /// HTTP status returned on abort
        #[arg(long)]
        abort_code: Option<u16>,
    },

    /// Delete one fault-injection rule by id
    RuleDelete {
        /// Rule identifier as reported by rule-list
        rule_id: String,
    },

    /// Clear every installed fault-injection rule
    RuleClear,

    /// Run a chaos recipe: install failures, drive load, check assertions
    RecipeRun {
        /// Topology file (JSON) naming the services under test
        #[arg(long)]
        topology: Option<PathBuf>,

        /// Failure scenarios file (JSON array)
        #[arg(long)]
        scenarios: Option<PathBuf>,

        /// Assertion checklist file (JSON)
        #[arg(long)]
        checks: Option<PathBuf>,

        /// Load script run during the load phase; manual checkpoint otherwise
        #[arg(long)]
        load_script: Option<PathBuf>,

        /// Override the configured test-traffic header
        #[arg(long)]
        header: Option<String>,

        /// Override the configured header-value pattern
        #[arg(long)]
        pattern: Option<String>,
    },
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> anyhow::Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {what} file {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {what} file {}", path.display()))
}

fn print_views(views: &[ServiceRoutingView]) {
    let mut table = Table::new(&[
        "Service",
        "Instances",
        "Default Version",
        "Version Selectors",
        "Active",
    ]);
    for view in views {
        let instances = view
            .versions
            .iter()
            .map(|v| format!("{}({})", v.name, v.instances))
            .collect::<Vec<_>>()
            .join(", ");
        let selectors = view
            .selectors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            view.name.clone(),
            instances,
            view.default_version.clone(),
            selectors,
            if view.is_active { "yes" } else { "no" }.to_string(),
        ]);
    }
    println!("{}", table.render());
}

fn print_rules(rules: &[FaultInjectionRule]) {
    let mut table = Table::new(&[
        "Id",
        "Source",
        "Destination",
        "Header",
        "Pattern",
        "Delay Prob",
        "Delay",
        "Abort Prob",
        "Abort Code",
    ]);
    for rule in rules {
        table.add_row(vec![
            rule.id.clone().unwrap_or_else(|| "-".to_string()),
            rule.source.clone(),
            rule.destination.clone(),
            rule.header.clone(),
            rule.header_pattern.clone(),
            rule.delay_probability.to_string(),
            rule.delay.to_string(),
            rule.abort_probability.to_string(),
            rule.abort_code.map_or_else(|| "-".to_string(), |c| c.to_string()),
        ]);
    }
    println!("{}", table.render());
}

fn print_report(report: &ExperimentReport) {
    println!(
        "Experiment window: {} .. {}",
        report.window.start_rfc3339(),
        report.window.end_rfc3339()
    );
    let mut table = Table::new(&["Assertion", "Source", "Destination", "Result", "Error"]);
    for result in &report.results {
        table.add_row(vec![
            result.name.clone(),
            result.source.clone(),
            result.destination.clone(),
            result.outcome.to_string(),
            result.error_message.clone().unwrap_or_default(),
        ]);
    }
    println!("{}", table.render());
    let failed = report.results.iter().filter(|r| !r.passed()).count();
    println!("{} assertion(s), {} failed", report.results.len(), failed);
}

#[allow(clippy::too_many_arguments)]
async fn run_recipe(
    config: &FaultmeshConfig,
    topology: Option<PathBuf>,
    scenarios: Option<PathBuf>,
    checks: Option<PathBuf>,
    load_script: Option<PathBuf>,
    header: Option<String>,
    pattern: Option<String>,
) -> anyhow::Result<ExperimentReport> {
    let recipe = RecipeSpec {
        topology: topology
            .as_deref()
            .map(|p| read_json(p, "topology"))
            .transpose()?,
        scenarios: scenarios
            .as_deref()
            .map(|p| read_json::<Vec<FailureScenario>>(p, "scenarios"))
            .transpose()?,
        checklist: checks
            .as_deref()
            .map(|p| read_json::<Checklist>(p, "checks"))
            .transpose()?,
    };
    let script = load_script
        .as_deref()
        .map(|p| {
            std::fs::read_to_string(p)
                .with_context(|| format!("reading load script {}", p.display()))
        })
        .transpose()?;

    let controller = Arc::new(ControllerClient::new(&config.controller)?);
    let orchestrator = RecipeOrchestrator::new(
        Arc::new(ScenarioFailureGenerator::new(controller)),
        Arc::new(LogStoreAssertionChecker::new()),
        Arc::new(ConsoleSignal),
        Arc::new(ShellScriptRunner::new(&config.experiment.script_path)),
        Arc::new(FixedDelayConvergence::new(
            config.experiment.settle(),
            config.experiment.flush(),
        )),
        OrchestratorConfig {
            header: header.unwrap_or_else(|| config.experiment.header.clone()),
            pattern: pattern.unwrap_or_else(|| config.experiment.pattern.clone()),
            log_server: config.experiment.log_server.clone(),
        },
    );
    Ok(orchestrator.run(recipe, script.as_deref()).await?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_telemetry(cli.verbose);

    let config = FaultmeshConfig::load(cli.config.as_deref()).context("loading configuration")?;

    match cli.command {
        Commands::ServiceList => {
            let registry = Arc::new(RegistryClient::new(&config.registry)?);
            let controller = Arc::new(ControllerClient::new(&config.controller)?);
            let service = RoutingViewService::new(registry, controller);
            print_views(&service.list_views().await?);
        },

        Commands::RouteSet {
            service,
            default,
            selector,
        } => {
            let selectors = selector
                .iter()
                .map(|s| VersionSelector::parse_short_form(s))
                .collect::<Result<Vec<_>, _>>()?;
            let registry = Arc::new(RegistryClient::new(&config.registry)?);
            let controller = Arc::new(ControllerClient::new(&config.controller)?);
            let routing = RoutingViewService::new(registry, controller);
            routing.set_routing(&service, default, &selectors).await?;
            println!("Set routing for service '{service}'");
        },

        Commands::RouteDelete { service } => {
            let registry = Arc::new(RegistryClient::new(&config.registry)?);
            let controller = Arc::new(ControllerClient::new(&config.controller)?);
            let routing = RoutingViewService::new(registry, controller);
            routing.delete_routing(&service).await?;
            println!("Deleted routing for service '{service}'");
        },

        Commands::RuleList => {
            let controller = Arc::new(ControllerClient::new(&config.controller)?);
            let rules = FaultRuleService::new(controller);
            print_rules(&rules.list().await?);
        },

        Commands::RuleSet {
            source,
            destination,
            header,
            pattern,
            delay,
            delay_probability,
            abort_probability,
            abort_code,
        } => {
            let request = FaultRuleRequest {
                source,
                destination,
                header,
                header_pattern: pattern,
                delay,
                delay_probability,
                abort_probability,
                abort_code,
            };
            let controller = Arc::new(ControllerClient::new(&config.controller)?);
            let rules = FaultRuleService::new(controller);
            for id in rules.submit(request).await? {
                println!("Installed rule {id}");
            }
        },

        Commands::RuleDelete { rule_id } => {
            let controller = Arc::new(ControllerClient::new(&config.controller)?);
            FaultRuleService::new(controller).delete(&rule_id).await?;
            println!("Deleted rule {rule_id}");
        },

        Commands::RuleClear => {
            let controller = Arc::new(ControllerClient::new(&config.controller)?);
            FaultRuleService::new(controller).clear().await?;
            println!("Cleared all rules");
        },

        Commands::RecipeRun {
            topology,
            scenarios,
            checks,
            load_script,
            header,
            pattern,
        } => {
            let report = run_recipe(
                &config, topology, scenarios, checks, load_script, header, pattern,
            )
            .await?;
            print_report(&report);
            if !report.all_passed() {
                std::process::exit(1);
            }
        },
    }

    Ok(())
}

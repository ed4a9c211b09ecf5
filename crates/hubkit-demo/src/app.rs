//! Hub wiring for the demo.

use std::rc::Rc;

use clap::{Arg, ArgAction, ArgMatches, Command};
use hubkit::{
    CommandOptions, CommandSpec, Component, ComponentClass, ComponentInfo, ComponentOptions,
    Dependency, Hub, HubError, Injectable, Overrides, Resolver,
};
use hubkit_parse::{parse_bool, parse_sample_rate, EnvReader, Settings, SettingsError};
use serde::Serialize;
use serde_json::{Map, Value};

/// Prefix for every environment variable the demo reads.
pub const ENV_PREFIX: &str = "HUBKIT_";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemoConfig {
    pub strict_flags: bool,
    pub sample_rate: f64,
    pub labels: Map<String, Value>,
}

impl DemoConfig {
    /// Reads `STRICT_FLAGS`, `SAMPLE_RATE` and `LABELS`.
    pub fn load<R: EnvReader>(settings: &Settings<R>) -> Result<Self, SettingsError> {
        Ok(Self {
            strict_flags: settings.strict_flag("STRICT_FLAGS", false)?,
            sample_rate: settings.sample_rate("SAMPLE_RATE", 1.0)?,
            labels: settings.json_dict("LABELS")?,
        })
    }
}

struct Cache;

impl Component for Cache {
    fn describe(class: ComponentClass) -> ComponentClass {
        class
            .doc("In-memory lookup cache")
            .on_initialize(|| {
                tracing::info!("cache warmed");
                Ok(())
            })
            .on_cleanup(|| {
                tracing::info!("cache flushed");
                Ok(())
            })
    }
}

struct Telemetry;

impl Component for Telemetry {
    fn describe(class: ComponentClass) -> ComponentClass {
        class.doc("Samples command timings")
    }
}

/// Formats command results according to the loaded config.
pub struct Reporter {
    config: Rc<DemoConfig>,
}

impl Injectable for Reporter {
    fn dependencies() -> Vec<Dependency> {
        vec![Dependency::required::<DemoConfig>("config")]
    }

    fn construct(deps: &Resolver<'_>) -> anyhow::Result<Self> {
        Ok(Self {
            config: deps.require("config")?,
        })
    }
}

impl Reporter {
    pub fn check_bool(&self, value: &str, strict: bool) -> anyhow::Result<String> {
        let strict = strict || self.config.strict_flags;
        let parsed = parse_bool(value, strict)?;
        Ok(format!("{} -> {}", value, parsed))
    }

    pub fn check_rate(&self, value: &str) -> anyhow::Result<String> {
        let rate = parse_sample_rate(value)?;
        let sampled = rate <= self.config.sample_rate;
        Ok(format!("{} (sampled: {})", rate, sampled))
    }

    pub fn config_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self.config.as_ref())?)
    }
}

fn value_arg(matches: &ArgMatches) -> anyhow::Result<&str> {
    matches
        .get_one::<String>("value")
        .map(String::as_str)
        .ok_or_else(|| anyhow::anyhow!("missing <value>"))
}

/// Builds the demo Hub from settings: components, the injected config and
/// every command, with the CLI group created last.
pub fn build_hub<R: EnvReader>(settings: &Settings<R>) -> Result<Hub, HubError> {
    let config = DemoConfig::load(settings)
        .map_err(|e| HubError::validation(e.to_string()).with_source(e))?;
    let sample_rate = config.sample_rate;

    let mut hub = Hub::new();
    hub.add_component(ComponentClass::of::<Cache>())?;
    hub.add_component_with(
        ComponentClass::of::<Telemetry>().on_initialize(move || {
            tracing::info!(sample_rate, "telemetry started");
            Ok(())
        }),
        ComponentOptions::new()
            .dimension("observability")
            .version(env!("CARGO_PKG_VERSION"))
            .extra("sample_rate", Value::from(sample_rate)),
    )?;

    hub.register(config, None);
    let reporter = Rc::new(hub.resolve::<Reporter>(Overrides::new())?);

    let infos: Rc<Vec<ComponentInfo>> = Rc::new(
        hub.list_components(None)
            .iter()
            .filter_map(|name| hub.component_info(name, None).cloned())
            .collect(),
    );

    hub.add_command_with(
        CommandSpec::from_clap(Command::new("components").about("List registered components"))
            .handler(move |_m| {
                println!("{}", serde_json::to_string_pretty(infos.as_ref())?);
                Ok(())
            }),
        CommandOptions::new().alias("ls").category("inspect"),
    )?;

    let r = reporter.clone();
    hub.add_command(
        CommandSpec::from_clap(
            Command::new("check-bool")
                .about("Parse a boolean the way settings do")
                .arg(Arg::new("value").required(true))
                .arg(
                    Arg::new("strict")
                        .long("strict")
                        .action(ArgAction::SetTrue)
                        .help("Reject anything outside the strict literal set"),
                ),
        )
        .handler(move |m| {
            println!("{}", r.check_bool(value_arg(m)?, m.get_flag("strict"))?);
            Ok(())
        }),
    )?;

    let r = reporter.clone();
    hub.add_command(
        CommandSpec::from_clap(
            Command::new("check-rate")
                .about("Validate a sampling rate")
                .arg(Arg::new("value").required(true)),
        )
        .handler(move |m| {
            println!("{}", r.check_rate(value_arg(m)?)?);
            Ok(())
        }),
    )?;

    hub.add_command_with(
        CommandSpec::from_clap(Command::new("config")).handler(move |_m| {
            println!("{}", reporter.config_json()?);
            Ok(())
        }),
        CommandOptions::new().description("Show the loaded settings"),
    )?;

    hub.create_cli("hubkit-demo", Some(env!("CARGO_PKG_VERSION")))?;
    Ok(hub)
}

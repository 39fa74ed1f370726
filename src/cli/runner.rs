//! CLI runner - executes commands

use crate::catalog;
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::codec::{decode, encode, KeyFields};
use crate::config::{load_config, ProviderConfig};
use crate::engine::{DesiredState, ReadOutcome, Reconciler};
use crate::error::{Error, Result, ResultExt};
use crate::http::HttpClient;
use crate::resource::RestResource;
use crate::template::TemplateContext;
use crate::types::{JsonObject, JsonValue, TriState};
use serde_json::json;
use std::collections::BTreeSet;
use std::fs;
use std::sync::Arc;
use tracing::debug;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Kinds => self.kinds(),
            Commands::Encode { fields } => {
                let identifier = encode(&parse_fields(fields)?);
                self.output(&json!({ "identifier": identifier }))
            }
            Commands::Decode { identifier } => {
                self.output(&json!({ "keys": fields_to_json(&decode(identifier)) }))
            }
            _ => self.run_remote().await,
        }
    }

    /// Commands that need a provider config and a resource kind
    async fn run_remote(&self) -> Result<()> {
        let config = self.load_provider()?;
        let resource = self.build_resource(&config)?;
        let reconciler = Reconciler::new(&resource).with_config(config.walk_config());

        let result = match &self.cli.command {
            Commands::Read { identifier } => read_json(reconciler.read(identifier).await),
            Commands::Import { fields } => {
                read_json(reconciler.import(&parse_fields(fields)?).await)
            }
            Commands::Create { keys, body, flags } => {
                let desired = desired_state(keys, body.as_deref(), flags)?;
                let outcome = reconciler.create(&desired).await?;
                json!({
                    "binding": outcome.binding,
                    "identifier": outcome.identifier,
                    "state": read_json(outcome.state),
                })
            }
            Commands::Update {
                identifier,
                body,
                flags,
            } => {
                let desired = desired_state(&[], body.as_deref(), flags)?;
                read_json(reconciler.update(identifier, &desired).await?)
            }
            Commands::Delete { identifier } => {
                let outcome = reconciler.delete(identifier).await?;
                json!({ "status": outcome })
            }
            Commands::Kinds | Commands::Encode { .. } | Commands::Decode { .. } => {
                return Err(Error::Other("not a remote command".to_string()));
            }
        };

        self.output(&result)
    }

    /// Load and validate the provider config
    fn load_provider(&self) -> Result<ProviderConfig> {
        let path = self
            .cli
            .config
            .as_ref()
            .ok_or_else(|| Error::config("Provider config not specified (use -c flag)"))?;
        debug!(path = %path.display(), "Loading provider config");
        load_config(path)
    }

    /// Build the REST adapter for the selected kind
    fn build_resource(&self, config: &ProviderConfig) -> Result<RestResource> {
        let kind = self
            .cli
            .kind
            .as_deref()
            .ok_or_else(|| Error::config("Resource kind not specified (use -k flag)"))?;

        let definition = config.resource(kind)?;
        let auth = config.resolved_auth(&TemplateContext::from_env())?;
        debug!(kind, auth = auth.type_name(), "Building REST client");

        let client = HttpClient::with_auth(config.http_client_config(), auth)?;
        Ok(RestResource::new(Arc::new(client), definition))
    }

    /// List built-in kinds plus any declared in the provider config
    fn kinds(&self) -> Result<()> {
        let mut kinds: BTreeSet<String> = catalog::list_builtin()
            .into_iter()
            .map(str::to_string)
            .collect();

        if self.cli.config.is_some() {
            let config = self.load_provider()?;
            kinds.extend(config.resources.into_iter().map(|r| r.kind));
        }

        self.output(&json!({ "kinds": kinds }))
    }

    /// Print a JSON document in the selected format
    fn output(&self, value: &JsonValue) -> Result<()> {
        let text = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };
        println!("{text}");
        Ok(())
    }
}

/// Split `name=value`
fn split_pair(arg: &str) -> Result<(&str, &str)> {
    match arg.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => Ok((name.trim(), value)),
        _ => Err(Error::invalid_value(arg, "expected name=value")),
    }
}

/// Parse `name=value` arguments into key fields, keeping their order
fn parse_fields(args: &[String]) -> Result<KeyFields> {
    args.iter()
        .map(|arg| split_pair(arg))
        .collect::<Result<Vec<_>>>()
        .map(|pairs| pairs.into_iter().collect())
}

/// Read a JSON object body, inline or from `@path`
fn read_body(arg: &str) -> Result<JsonObject> {
    let text = match arg.strip_prefix('@') {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("Failed to read body file '{path}'"))?
        }
        None => arg.to_string(),
    };
    match serde_json::from_str(&text)? {
        JsonValue::Object(body) => Ok(body),
        _ => Err(Error::invalid_value("body", "expected a JSON object")),
    }
}

fn desired_state(keys: &[String], body: Option<&str>, flags: &[String]) -> Result<DesiredState> {
    let mut desired = DesiredState::new();
    desired.keys = parse_fields(keys)?;
    if let Some(body) = body {
        desired.payload = read_body(body)?;
    }
    for flag in flags {
        let (name, value) = split_pair(flag)?;
        let state: TriState = value
            .parse()
            .map_err(|e: String| Error::invalid_value(name, e))?;
        desired = desired.with_flag(name, state);
    }
    Ok(desired)
}

fn fields_to_json(fields: &KeyFields) -> JsonValue {
    let map: JsonObject = fields
        .iter()
        .map(|(k, v)| (k.to_string(), JsonValue::String(v.to_string())))
        .collect();
    JsonValue::Object(map)
}

fn read_json(outcome: ReadOutcome) -> JsonValue {
    match outcome {
        ReadOutcome::Present(observed) => json!({
            "status": "present",
            "identifier": observed.identifier,
            "keys": fields_to_json(&observed.keys),
            "record": observed.record,
            "observed_at": observed.observed_at,
        }),
        ReadOutcome::Absent => json!({ "status": "absent" }),
    }
}

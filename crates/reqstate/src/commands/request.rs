//! `reqstate request`: drive one controller and print its final state.

use std::sync::Arc;

use futures_util::future::join_all;
use serde_json::{Map, Value};
use tracing::{debug, info};

use reqstate_api::HttpTransport;
use reqstate_core::{Endpoint, MemoryCache, RequestConfig, ResponseCache, guard};

use crate::cli::{GlobalOpts, RequestArgs};
use crate::commands::{resolve_base_url, resolve_config};
use crate::error::CliError;
use crate::output::{self, StateView};

pub async fn handle(args: RequestArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = resolve_config(global)?;
    let base_url = resolve_base_url(&cfg, global)?;
    let params = parse_params(&args.params)?;

    let mut overrides = RequestConfig::default();
    for raw in &args.headers {
        let (name, value) = parse_header(raw)?;
        overrides = overrides.with_header(name, value);
    }
    if let Some(ref body) = args.body {
        overrides = overrides.with_data(serde_json::from_str(body)?);
    }

    let target = RequestConfig::new(args.method, args.path.clone())
        .resolve_url(Some(&base_url))
        .map_or_else(|_| args.path.clone(), |url| url.to_string());

    let transport = Arc::new(HttpTransport::new(Some(base_url), &cfg.transport())?);
    let cache: Arc<dyn ResponseCache> = match cfg.cache_ttl() {
        Some(ttl) => Arc::new(MemoryCache::with_ttl(ttl)),
        None => MemoryCache::global(),
    };

    let mut endpoint: Endpoint<Value, _> = Endpoint::new(args.method, args.path, transport)
        .with_config(overrides)
        .with_cache(cache)
        .cancel_previous(args.cancel_previous);
    if let Some(key) = args.cache_key {
        endpoint = endpoint.with_cache_key(key);
    }
    let controller = endpoint.controller();

    debug!(method = %args.method, url = %target, repeat = args.repeat, "starting");
    let last = if args.concurrent {
        let calls = (0..args.repeat)
            .map(|_| controller.request(params.clone(), None, args.force_refresh));
        join_all(calls).await.pop().flatten()
    } else {
        let mut last = None;
        for attempt in 1..=args.repeat {
            last = controller
                .request(params.clone(), None, args.force_refresh)
                .await;
            debug!(attempt, ok = last.is_some(), "call finished");
        }
        last
    };

    let state = controller.state();
    output::print_output(&output::render(global.output, &StateView::from(&state))?);
    info!(ok = last.is_some(), "request finished");

    if last.is_some() {
        return Ok(());
    }
    Err(state.error.as_ref().map_or_else(
        || CliError::RequestFailed {
            message: "no payload".into(),
        },
        |err| CliError::from_request(err, &target),
    ))
}

/// Collect `KEY=VALUE` pairs into one JSON object.
///
/// Values that parse as JSON keep their type; anything else is a string.
/// Empty values (`""`, `null`, `{}`, `[]`) are rejected.
fn parse_params(raw: &[String]) -> Result<Option<Value>, CliError> {
    if raw.is_empty() {
        return Ok(None);
    }

    let mut params = Map::new();
    for pair in raw {
        let Some((key, value)) = pair.split_once('=') else {
            return Err(CliError::Validation {
                field: "param".into(),
                reason: format!("expected KEY=VALUE, got '{pair}'"),
            });
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(CliError::Validation {
                field: "param".into(),
                reason: format!("missing key in '{pair}'"),
            });
        }

        let value =
            serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_owned()));
        if !guard::is_valid_value(&value) {
            return Err(CliError::Validation {
                field: format!("param '{key}'"),
                reason: format!("empty {} value", guard::type_name(&value)),
            });
        }
        params.insert(key.to_owned(), value);
    }
    Ok(Some(Value::Object(params)))
}

fn parse_header(raw: &str) -> Result<(&str, &str), CliError> {
    raw.split_once(':')
        .map(|(name, value)| (name.trim(), value.trim()))
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| CliError::Validation {
            field: "header".into(),
            reason: format!("expected NAME:VALUE, got '{raw}'"),
        })
}

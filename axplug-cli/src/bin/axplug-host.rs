//! Line-delimited JSON harness for the axplug plugin.
//!
//! Reads requests from stdin, dispatches against an in-process
//! `PluginContext`, writes responses to stdout.  Lets a developer exercise
//! the manifest and the full decode/dispatch/encode path without loading
//! the cdylib through a host.
//!
//! Methods: `manifest`, `invoke` (params: `{type, id, args}`), `ping`.

use std::io::{self, BufRead, Write};

use clap::Parser;
use serde::{Deserialize, Serialize};

use axplug_core::context::PluginContext;

#[derive(Parser)]
#[command(name = "axplug-host", about = "axplug in-process host harness")]
struct Args {
    /// Enable verbose logging to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Deserialize)]
struct Request {
    id: u64,
    method: String,
    #[serde(default)]
    params: serde_json::Value,
}

#[derive(Serialize)]
struct Response {
    id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn dispatch(
    ctx: &PluginContext,
    method: &str,
    params: &serde_json::Value,
) -> Result<serde_json::Value, String> {
    match method {
        "manifest" => serde_json::from_str(&ctx.manifest()).map_err(|e| e.to_string()),
        "invoke" => {
            let capability_type = params
                .get("type")
                .and_then(|v| v.as_str())
                .unwrap_or("tool");
            let capability_id = params
                .get("id")
                .and_then(|v| v.as_str())
                .ok_or("invoke requires params.id")?;
            let args = params.get("args").cloned().unwrap_or_else(|| {
                serde_json::Value::Object(serde_json::Map::new())
            });
            let payload = serde_json::to_vec(&args).map_err(|e| e.to_string())?;

            let out = ctx.invoke(capability_type, capability_id, &payload);
            serde_json::from_str(&out).map_err(|e| e.to_string())
        }
        "ping" => Ok(serde_json::Value::String("pong".to_owned())),
        _ => Err(format!("unknown method: {method}")),
    }
}

fn main() {
    let args = Args::parse();
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    let ctx = match PluginContext::new() {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("axplug-host: failed to create plugin context: {e}");
            std::process::exit(1);
        }
    };

    if args.verbose {
        eprintln!("axplug-host: ready");
    }

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                if args.verbose {
                    eprintln!("axplug-host: stdin read error: {e}");
                }
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let request: Request = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(e) => {
                if args.verbose {
                    eprintln!("axplug-host: bad request: {e}");
                }
                continue;
            }
        };

        let response = match dispatch(&ctx, &request.method, &request.params) {
            Ok(result) => Response {
                id: request.id,
                result: Some(result),
                error: None,
            },
            Err(error) => Response {
                id: request.id,
                result: None,
                error: Some(error),
            },
        };

        match serde_json::to_string(&response) {
            Ok(json) => {
                let _ = writeln!(stdout, "{json}");
                let _ = stdout.flush();
            }
            Err(e) => {
                if args.verbose {
                    eprintln!("axplug-host: response encode error: {e}");
                }
            }
        }
    }
}

// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tessera-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tessera and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Tessera demo entrypoint.
//!
//! Drives a playground against the mock services: imports the component list, optionally selects
//! a component and runs a generation, then prints the resulting view state as JSON on stdout.
//!
//! Use `--schema` to print the JSON schema of the view state instead.

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use tessera::playground::PreviewMode;
use tessera::services::mock::{DEFAULT_GENERATION_DELAY, DEFAULT_IMPORT_DELAY};
use tessera::services::{MockGenerationService, MockImportService};
use tessera::{Playground, PlaygroundConfig, ViewState};
use tracing::info;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [--select <component-id>] [--prompt <text>] [--max-width <cols>]\n      [--import-delay-ms <ms>] [--generate-delay-ms <ms>]\n  {program} --schema\n\nImports the mock component list, applies --select and then --prompt, and prints the view state as JSON.\n--max-width 0 disables preview truncation.\n--schema prints the JSON schema of the view state and exits.\n\nLogs go to stderr; filter them with RUST_LOG (default info)."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    schema: bool,
    select: Option<String>,
    prompt: Option<String>,
    max_width: Option<usize>,
    import_delay_ms: Option<u64>,
    generate_delay_ms: Option<u64>,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--schema" => {
                if options.schema {
                    return Err(());
                }
                options.schema = true;
            }
            "--select" => {
                if options.select.is_some() {
                    return Err(());
                }
                options.select = Some(args.next().ok_or(())?);
            }
            "--prompt" => {
                if options.prompt.is_some() {
                    return Err(());
                }
                options.prompt = Some(args.next().ok_or(())?);
            }
            "--max-width" => {
                if options.max_width.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                options.max_width = Some(raw.parse().map_err(|_| ())?);
            }
            "--import-delay-ms" => {
                if options.import_delay_ms.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                options.import_delay_ms = Some(raw.parse().map_err(|_| ())?);
            }
            "--generate-delay-ms" => {
                if options.generate_delay_ms.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                options.generate_delay_ms = Some(raw.parse().map_err(|_| ())?);
            }
            _ => return Err(()),
        }
    }

    let drives_playground = options.select.is_some()
        || options.prompt.is_some()
        || options.max_width.is_some()
        || options.import_delay_ms.is_some()
        || options.generate_delay_ms.is_some();
    if options.schema && drives_playground {
        return Err(());
    }

    Ok(options)
}

fn playground_config(options: &CliOptions) -> PlaygroundConfig {
    let mut config = PlaygroundConfig::default();
    if let Some(width) = options.max_width {
        config.render.max_width = (width > 0).then_some(width);
    }
    config
}

async fn run_demo(options: CliOptions) -> Result<ViewState, Box<dyn Error>> {
    let import_delay = options
        .import_delay_ms
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_IMPORT_DELAY);
    let generation_delay = options
        .generate_delay_ms
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_GENERATION_DELAY);

    let mut playground = Playground::new(
        playground_config(&options),
        Arc::new(MockImportService::new(import_delay)),
        Arc::new(MockGenerationService::new(generation_delay)),
    );

    playground.import_components()?;
    while playground.next_completion().await.is_some() {}

    if let Some(id) = options.select.as_deref() {
        let revision = playground.select_imported_component(id)?;
        info!(component_id = id, revision, "component selected");
    }

    if let Some(prompt) = options.prompt.as_deref() {
        playground.generate_from_prompt(prompt)?;
        while playground.next_completion().await.is_some() {}
    }

    playground.set_preview_mode(PreviewMode::Preview);
    Ok(playground.view_state())
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "tessera".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        if options.schema {
            let schema = schemars::schema_for!(ViewState);
            println!("{}", serde_json::to_string_pretty(&schema)?);
            return Ok(());
        }

        tessera::logging::init_logging();

        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
        let view = runtime.block_on(run_demo(options))?;
        println!("{}", serde_json::to_string_pretty(&view)?);
        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("tessera: {err}");
        std::process::exit(1);
    }
}

use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use tracing::info;

use tbrun::cli::Cli;
use tbrun::config::{LauncherConfig, Settings};
use tbrun::runner::{Runner, RunnerOptions};
use tbrun::sources::{SourceManifest, SOURCES_FILE};
use tbrun::translate::{translate, TranslateOptions};
use tbrun::viewer::{self, ViewerOptions};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt().with_env_filter(log_level).init();

    let config = LauncherConfig::load(cli.config.as_deref())
        .context("Failed to load launcher configuration")?;
    let settings = cli.settings(config);

    println!("\n==== Preparing framework arguments ====");
    let translation = translate(
        &cli.args,
        &TranslateOptions {
            testbench_dir: settings.testbench_dir.clone(),
            force_gui: cli.gui,
            force_display_time: cli.display_time,
        },
    );
    if translation.gui {
        if translation.saves.is_empty() {
            println!("Running with GUI without any save file.");
        } else {
            println!(
                "Running with GUI; {} saved view(s) will be opened after the run.",
                translation.saves.len()
            );
        }
    } else {
        println!("Running with no GUI.");
    }

    println!("\n==== Registering project libraries ====");
    let manifest = load_manifest(&settings)?;
    let mut runner = Runner::from_argv(
        translation.argv.clone(),
        RunnerOptions {
            command: settings.runner.clone(),
            output_path: settings.output_path.clone(),
        },
    );
    runner.enable_location_preprocessing();
    for (name, files) in manifest.iter() {
        println!("\n== Library \"{}\"", name);
        let library = runner.add_library(name);
        for file in files {
            println!("====   \"{}\"", file.display());
            library
                .add_source_file(file)
                .with_context(|| format!("Failed to register library '{}'", name))?;
        }
    }
    if translation.display_time {
        runner.set_sim_option("ghdl.sim_flags", &["--disp-time"]);
    }

    println!("\n==== Handing off to the test framework ====");
    let viewer_options = ViewerOptions {
        command: settings.viewer.clone(),
        extra_args: settings.viewer_args.clone(),
    };
    let saves = translation.saves.clone();
    let code = runner
        .run(move || viewer::open_saved_waves(&viewer_options, &saves))
        .context("Failed to run the test framework")?;
    std::process::exit(code)
}

/// Library registration for this run: an explicit sources file, the
/// default one when present, or discovery of the conventional layout.
fn load_manifest(settings: &Settings) -> Result<SourceManifest> {
    let manifest = match &settings.sources {
        Some(path) => SourceManifest::from_path(path)
            .with_context(|| format!("Failed to read sources file {}", path.display()))?,
        None => {
            let default = Path::new(SOURCES_FILE);
            if default.exists() {
                SourceManifest::from_path(default)?
            } else {
                info!("no {} found, discovering the conventional layout", SOURCES_FILE);
                SourceManifest::discover(Path::new("."))
            }
        }
    };
    Ok(manifest)
}

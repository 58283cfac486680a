mod cli;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};

use cm_av::{CombineSpec, Preset, ToolRegistry};
use cm_core::config::Config;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG if set, otherwise pick defaults based on --verbose.
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "clipmux=trace,cm_server=debug,cm_av=debug,cm_core=debug,tower_http=debug".to_string()
        } else {
            "clipmux=info,cm_server=info,cm_av=info,cm_core=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            let mut config = Config::load_or_default(cli.config.as_deref());
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }

            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(cm_server::start(config))?;
            Ok(())
        }
        Commands::Combine {
            audio,
            video,
            output,
            preset,
            dry_run,
        } => {
            let spec = CombineSpec::new(audio, video, output, preset);
            combine(&spec, cli.config.as_deref(), dry_run)
        }
        Commands::Presets => {
            list_presets();
            Ok(())
        }
        Commands::CheckTools => check_tools(cli.config.as_deref()),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("clipmux {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn combine(spec: &CombineSpec, config_path: Option<&Path>, dry_run: bool) -> Result<()> {
    let config = Config::load_or_default(config_path);
    let tools = ToolRegistry::discover(&config.tools);

    if dry_run {
        // Show the command even when ffmpeg is not installed.
        let ffmpeg = tools
            .require("ffmpeg")
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| "ffmpeg".into());
        let cmd = spec.command(&ffmpeg, config.combine.timeout());
        println!("{}", cmd.argv().join(" "));
        return Ok(());
    }

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(cm_av::run_combine(&tools, spec, config.combine.timeout()))
        .with_context(|| format!("Failed to combine into {}", spec.output_file))?;

    println!("Files combined successfully");
    println!("Output: {}", spec.output_file);
    println!("Preset: {}", spec.preset);
    println!("Format: {}", cm_av::OUTPUT_FORMAT);
    Ok(())
}

fn list_presets() {
    for preset in Preset::ALL {
        match preset.scale_filter() {
            Some(filter) => println!("{:<20} {} [{}]", preset.id(), preset.description(), filter),
            None => println!("{:<20} {}", preset.id(), preset.description()),
        }
    }
}

fn check_tools(config_path: Option<&Path>) -> Result<()> {
    println!("Checking external tools...\n");

    let config = Config::load_or_default(config_path);
    let tools = ToolRegistry::discover(&config.tools);
    let mut all_ok = true;

    for tool in tools.check_all() {
        let status = if tool.available {
            "✓"
        } else {
            all_ok = false;
            "✗"
        };

        print!("{} {}", status, tool.name);

        if let Some(ref version) = tool.version {
            print!(" ({})", version);
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    println!();
    if all_ok {
        println!("All required tools are available!");
    } else {
        println!("Some tools are missing. Install ffmpeg to enable /combine.");
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {}", p.display());
            Config::load(p).with_context(|| format!("Invalid config file: {}", p.display()))?
        }
        None => {
            println!("No config file specified, using defaults");
            Config::default()
        }
    };

    println!("✓ Configuration is valid");
    println!("  Server: {}:{}", config.server.host, config.server.port);
    println!("  Combine timeout: {}s", config.combine.timeout_secs);
    println!("  Max concurrent jobs: {}", config.combine.max_concurrent_jobs);
    match config.tools.ffmpeg_path {
        Some(ref p) => println!("  ffmpeg: {}", p.display()),
        None => println!("  ffmpeg: (search PATH)"),
    }

    for warning in config.validate() {
        println!("  warning: {warning}");
    }

    Ok(())
}

//! Paddock - native entry point

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use anyhow::{Context, Result};
    use clap::Parser;
    use paddock_core::{Viewer, ViewerConfig};
    use std::path::PathBuf;
    use tracing::{info, Level};
    use tracing_subscriber::FmtSubscriber;

    #[derive(Parser, Debug)]
    #[command(name = "paddock")]
    #[command(about = "Interactive F1 car model viewer")]
    #[command(version)]
    struct Args {
        /// Path to configuration file
        #[arg(short, long, default_value = "paddock.toml")]
        config: PathBuf,

        /// Catalog index to show first (overrides the configuration)
        #[arg(short, long)]
        model: Option<usize>,

        /// Directory model and environment locators are resolved against
        #[arg(short, long, default_value = "assets")]
        assets: String,

        /// Log level (trace, debug, info, warn, error)
        #[arg(short, long, default_value = "info")]
        log_level: String,

        /// Write the effective configuration to this path and exit
        #[arg(long, value_name = "PATH")]
        write_config: Option<PathBuf>,
    }

    pub fn main() -> Result<()> {
        let args = Args::parse();

        let level = match args.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };

        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_target(true)
            .finish();

        tracing::subscriber::set_global_default(subscriber)?;

        info!("Paddock v{}", env!("CARGO_PKG_VERSION"));

        let mut config = ViewerConfig::load(&args.config)
            .with_context(|| format!("loading {}", args.config.display()))?;
        if let Some(model) = args.model {
            config.initial_model = model;
        }

        info!(
            models = config.models.len(),
            initial = config.initial_model,
            assets = %args.assets,
            "Configuration loaded"
        );

        if let Some(path) = &args.write_config {
            config.validate().context("invalid viewer configuration")?;
            config
                .save(path)
                .with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "Configuration written");
            return Ok(());
        }

        let viewer = Viewer::new(config).context("invalid viewer configuration")?;
        paddock_viewer::app::run(viewer, args.assets);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::main()
}

#[cfg(target_arch = "wasm32")]
fn main() {}

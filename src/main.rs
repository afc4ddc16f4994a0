#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;

#[cfg(not(target_arch = "wasm32"))]
use spotlit_scene::Variant;

/// Spotlit 3D scene: a plane, a cube and a bouncing sphere under a red spotlight.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Parser)]
#[command(name = "spotlit-scene", version, about)]
struct Cli {
    /// Which variant of the scene to run
    #[arg(long, value_enum, default_value_t = Variant::Animated)]
    variant: Variant,

    /// Enable verbose logging (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), spotlit_scene::Error> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    log::info!("Starting {:?} scene", cli.variant);
    spotlit_scene::run(cli.variant)
}

// The browser build enters through `start_animated` / `start_static` in the library.
#[cfg(target_arch = "wasm32")]
fn main() {}

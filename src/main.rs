use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use swatchbook::cli::Args;
use swatchbook::export;
use swatchbook::notify::TracingNotifier;
use swatchbook::pipeline::extract::Extractor;
use swatchbook::store::PaletteStore;
use swatchbook::tui::{self, TuiApp};

fn init_tracing(args: &Args) {
    // The TUI owns the terminal, so it stays silent unless RUST_LOG says otherwise.
    let level = if args.tui {
        "off"
    } else if args.debug {
        "debug"
    } else if args.verbose {
        "info"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args);
    info!("swatchbook v{}", env!("CARGO_PKG_VERSION"));

    let mut store = PaletteStore::new();
    let mut notifier = TracingNotifier;

    for input in &args.colors {
        store
            .add_color(input, &mut notifier)
            .with_context(|| format!("cannot add color {input:?}"))?;
    }

    let extractor = Extractor::new()
        .max_colors(args.max_colors)
        .threshold(args.threshold);
    for path in &args.images {
        let added = extractor
            .extract_file(path, &mut store, &mut notifier)
            .with_context(|| format!("cannot extract colors from {}", path.display()))?;
        info!(path = %path.display(), added, "image processed");
    }

    if args.tui {
        store = tui::run(TuiApp::new(store, extractor, args.format))?;
    }

    let exporter = export::exporter(args.export, args.format);
    match &args.output {
        Some(path) => exporter.write_to(store.colors(), path)?,
        None => {
            let out = exporter.serialize(store.colors());
            if !out.is_empty() {
                println!("{out}");
            }
        }
    }

    Ok(())
}

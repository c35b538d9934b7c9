use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use plotshot::{
    CpuGateway, CpuGatewayOpts, RenderCache, RenderCacheOpts, RenderRequest, RenderService,
    ServiceOpts, ThemeSet,
};

#[derive(Parser, Debug)]
#[command(name = "plotshot", version)]
struct Cli {
    /// Log at debug level.
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a request JSON into a PNG.
    Render(RenderArgs),
    /// Print the color each label resolves to.
    Colors(ColorsArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Request JSON (`{"widget": ...}` or `{"option": ...}`).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Theme name, overriding the request and widget.
    #[arg(long)]
    theme: Option<String>,

    /// Theme JSON file; built-in themes are used when it cannot be read.
    #[arg(long)]
    themes: Option<PathBuf>,

    /// Image width, overriding the request.
    #[arg(long)]
    width: Option<u32>,

    /// Image height, overriding the request.
    #[arg(long)]
    height: Option<u32>,

    /// Print the chart document as JSON instead of rendering.
    #[arg(long, default_value_t = false)]
    dump_config: bool,
}

#[derive(Parser, Debug)]
struct ColorsArgs {
    /// Series labels.
    #[arg(required = true)]
    labels: Vec<String>,

    /// Theme whose palette hashed labels draw from.
    #[arg(long)]
    theme: Option<String>,

    /// Theme JSON file.
    #[arg(long)]
    themes: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Colors(args) => cmd_colors(args),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_themes(path: Option<&Path>) -> ThemeSet {
    match path {
        Some(p) => ThemeSet::load_or_default(p),
        None => ThemeSet::builtin(),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let body = std::fs::read(&args.in_path)
        .with_context(|| format!("read request '{}'", args.in_path.display()))?;

    let service = RenderService::new(
        CpuGateway::new(CpuGatewayOpts::default()),
        Arc::new(RenderCache::new(RenderCacheOpts::default())),
        Arc::new(load_themes(args.themes.as_deref())),
        ServiceOpts::default(),
    );

    let mut request = RenderRequest::from_slice(&body, service.opts().max_payload_bytes)
        .with_context(|| format!("decode request '{}'", args.in_path.display()))?;
    if args.width.is_some() || args.height.is_some() {
        let (w, h) = (
            args.width.unwrap_or(request.width),
            args.height.unwrap_or(request.height),
        );
        request = request.with_size(w, h);
    }
    if let Some(theme) = args.theme {
        request = request.with_theme(theme);
    }

    if args.dump_config {
        let prepared = service.prepare(&request)?;
        let json =
            serde_json::to_string_pretty(&prepared.document).context("serialize config")?;
        println!("{json}");
        return Ok(());
    }

    let Some(out) = args.out else {
        anyhow::bail!("--out is required unless --dump-config is set");
    };

    let handle = service.render(request)?;
    let image = service.fetch(&handle.id.to_string())?;

    if let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&out, &image.bytes).with_context(|| format!("write png '{}'", out.display()))?;

    eprintln!(
        "wrote {} ({}x{}, {} bytes)",
        out.display(),
        handle.width,
        handle.height,
        image.bytes.len()
    );
    Ok(())
}

fn cmd_colors(args: ColorsArgs) -> anyhow::Result<()> {
    let themes = load_themes(args.themes.as_deref());
    let theme = themes.get(args.theme.as_deref().unwrap_or(plotshot::color::theme::DEFAULT_THEME));
    for label in &args.labels {
        println!("{label}\t{}", plotshot::resolve_with(label, &theme.palette));
    }
    Ok(())
}

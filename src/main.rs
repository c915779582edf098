use anyhow::{Context, Result};
use clap::Parser;
use enhance::{EnhancerConfig, Page, initialize};
use html::Document;
use mimalloc::MiMalloc;

mod cli;
mod logging;

use cli::Cli;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_level.map(|l| l.to_level_filter()));

    let config = match &cli.config {
        Some(path) => EnhancerConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => EnhancerConfig::default(),
    };
    let source = std::fs::read_to_string(&cli.page)
        .with_context(|| format!("reading {}", cli.page.display()))?;

    let mut page = Page::from_html(&source);
    let (width, height) = cli.viewport;
    page.resize(width, height);

    let summary = initialize(&mut page, &config).context("initializing page enhancements")?;
    log::info!("{summary:?}");

    match cli.advance {
        Some(ms) => page.advance(ms),
        None => {
            let fired = page.run_until_idle();
            log::info!("ran {fired} timer callbacks, clock at {}ms", page.now());
        }
    }

    println!("{}", html::to_html(page.document(), Document::ROOT));
    Ok(())
}

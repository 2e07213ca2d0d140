use std::path::Path;

use anyhow::{Context, Result};

use scrollstop_core::page::{Script, TraceCause, TraceEntry};
use scrollstop_core::{AppConfig, PageHost, PageSpec};

/// Viewport used for replays, in page pixels
const VIEWPORT: (f64, f64) = (1280.0, 800.0);

pub fn run(config: &AppConfig, page: PageSpec, script_path: &Path, json: bool) -> Result<()> {
    let script = Script::load(script_path)
        .with_context(|| format!("Failed to load script {}", script_path.display()))?;
    let mut host = PageHost::new(page, config.clone(), VIEWPORT.0, VIEWPORT.1)?;

    let trace = script.run(&mut host)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&trace)?);
        return Ok(());
    }

    for entry in &trace {
        println!("{}", describe(entry));
    }
    Ok(())
}

fn describe(entry: &TraceEntry) -> String {
    let what = match &entry.cause {
        TraceCause::Event { event } => {
            format!("event     {}", serde_json::to_string(event).unwrap_or_default())
        }
        TraceCause::Settled { index } => format!("settled   section {}", index),
        TraceCause::Revealed { count } => format!("revealed  {} element(s)", count),
        TraceCause::OpenUrl { url } => format!("open      {}", url),
        TraceCause::Navigate { href } => format!("navigate  {}", href),
        TraceCause::Arrived { destination, intro } => {
            if *intro {
                format!("arrived   {} (intro)", destination)
            } else {
                format!("arrived   {}", destination)
            }
        }
        TraceCause::End => "end".to_string(),
    };
    let state = &entry.state;
    format!(
        "{:>7}ms  {:<48} top={:.0} section={} header={:.0}{}",
        entry.at_ms,
        what,
        state.scroll_top,
        state.current,
        state.header_height,
        if state.animating { " animating" } else { "" },
    )
}

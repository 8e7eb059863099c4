use anyhow::Context;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use librarian_cli::{FileSearchSource, ProgressBars, SearchSnapshot};
use librarian_cluster::{FreenetKeys, PresentationOptions, ResultClusterer, ResultsLayout};
use librarian_core::config::{Config, Settings};
use librarian_core::diagnostics::Diagnostics;
use librarian_core::error::Error;
use librarian_core::selection::{should_refresh, IndexSelection};
use librarian_core::traits::SearchSource;
use librarian_core::types::RequestHandle;
use librarian_progress::ProgressAggregator;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: librarian <progress|results|watch> <snapshot.json|handle> [--show-old] [--js] [--json]\n       librarian handle <query> [indexes...]";

struct Flags {
    positional: Vec<String>,
    show_old: bool,
    js: bool,
    json: bool,
}

fn parse_args() -> (String, Flags) {
    let mut args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() { eprintln!("{}", USAGE); std::process::exit(1); }
    let cmd = args.remove(0);
    let mut flags = Flags { positional: Vec::new(), show_old: false, js: false, json: false };
    for arg in args {
        match arg.as_str() {
            "--show-old" => flags.show_old = true,
            "--js" => flags.js = true,
            "--json" => flags.json = true,
            _ if !arg.starts_with("--") => flags.positional.push(arg),
            _ => { eprintln!("Unknown flag: {}\n{}", arg, USAGE); std::process::exit(1); }
        }
    }
    (cmd, flags)
}

fn init_logging(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log.filter));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

/// A snapshot file path, or a handle looked up in the configured snapshot dir.
fn open_target(target: &str, config: &Config) -> anyhow::Result<(FileSearchSource, RequestHandle)> {
    let path = PathBuf::from(target);
    if path.is_file() {
        let snapshot = SearchSnapshot::load(&path)?;
        return Ok((FileSearchSource::pinned(path), snapshot.handle()));
    }
    let handle: RequestHandle = target
        .parse()
        .with_context(|| format!("'{}' is neither a snapshot file nor a request handle", target))?;
    Ok((FileSearchSource::new(config.snapshot_dir()?), handle))
}

fn print_results(
    source: &FileSearchSource,
    handle: RequestHandle,
    aggregator: &ProgressAggregator,
    options: &PresentationOptions,
    json: bool,
) -> anyhow::Result<()> {
    let entries = match source.results(handle) {
        Ok(entries) => entries,
        Err(err @ Error::AbortedSearch(_)) => {
            print!("{}", aggregator.render(&source.snapshot(handle)?).render_text());
            return Err(err.into());
        }
        Err(err) => return Err(err.into()),
    };
    let mut diagnostics = Diagnostics::new();
    let tree = ResultClusterer::new(&FreenetKeys).cluster(entries, &mut diagnostics);
    let layout = ResultsLayout::build(&tree, &FreenetKeys, options);
    if json {
        println!("{}", serde_json::to_string_pretty(&layout)?);
    } else {
        print!("{}", layout.render_text());
    }
    if !diagnostics.is_empty() {
        eprintln!("Skipped {} malformed result(s)", diagnostics.malformed_count());
        for error in diagnostics.errors() {
            eprintln!("  {}", error);
        }
    }
    Ok(())
}

fn watch(source: &FileSearchSource, handle: RequestHandle, aggregator: &ProgressAggregator, interval: Duration) -> anyhow::Result<bool> {
    let query = source.read(handle)?.query;
    tokio::runtime::Runtime::new()?.block_on(async {
        let mut bars = ProgressBars::new()?;
        let mut ticker = tokio::time::interval(interval);
        let finished = loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = tokio::signal::ctrl_c() => break false,
            }
            let node = source.snapshot(handle)?;
            bars.update(&aggregator.render(&node));
            if !should_refresh(&query, node.is_done(), 0) {
                break node.is_done();
            }
        };
        bars.finish();
        anyhow::Ok(finished)
    })
}

fn main() -> anyhow::Result<()> {
    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let settings = config.settings()?;
    init_logging(&settings);
    let (cmd, flags) = parse_args();

    let aggregator = ProgressAggregator::from_settings(&settings.progress);
    let mut options = PresentationOptions::from_settings(&settings.presentation);
    options.show_old |= flags.show_old;
    options.scripting |= flags.js;

    match cmd.as_str() {
        "progress" | "results" | "watch" => {
            let Some(target) = flags.positional.first() else { eprintln!("{}", USAGE); std::process::exit(1) };
            let (source, handle) = open_target(target, &config)?;
            tracing::info!(%handle, path = %source.path_for(handle).display(), "opened search");
            match cmd.as_str() {
                "progress" => print!("{}", aggregator.render(&source.snapshot(handle)?).render_text()),
                "results" => print_results(&source, handle, &aggregator, &options, flags.json)?,
                _ => {
                    let interval = Duration::from_millis(settings.search.refresh_interval_ms);
                    if watch(&source, handle, &aggregator, interval)? {
                        print_results(&source, handle, &aggregator, &options, flags.json)?;
                    }
                }
            }
        }
        "handle" => {
            let Some(query) = flags.positional.first() else { eprintln!("{}", USAGE); std::process::exit(1) };
            let raw = flags.positional[1..].join(" ");
            let search = &settings.search;
            let selection = IndexSelection::parse(&raw, &search.bookmark_prefix, &search.bookmarks, &search.default_index);
            let indexes = selection.to_index_string();
            println!("{}\t{}", RequestHandle::derive(query, &indexes), indexes);
        }
        _ => { eprintln!("Unknown command: {}\n{}", cmd, USAGE); std::process::exit(1); }
    }
    Ok(())
}

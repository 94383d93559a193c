use clap::Parser;
use console::style;
use dvdlite::cli::{Args, ExportFormat};
use dvdlite::config::EngineConfig;
use dvdlite::cti::CtiCollector;
use dvdlite::model::AttackStatus;
use dvdlite::registry::AttackRegistry;
use dvdlite::DvdLite;
use env_logger::Env;
use indicatif::{ProgressBar, ProgressStyle};

fn display_banner() {
    println!();
    println!("    {}", style("DVDLITE // damn vulnerable drone").red().bold());
    println!("    {}", style("attack-simulation engine - lab use only").dim());
    println!();
}

fn print_catalogue(registry: &AttackRegistry, tactic: Option<dvdlite::model::Tactic>) {
    let tactics = match tactic {
        Some(t) => vec![t],
        None => dvdlite::model::Tactic::all().to_vec(),
    };

    for tactic in tactics {
        let names = registry.by_tactic(tactic);
        if names.is_empty() {
            continue;
        }
        println!("  {}", style(tactic.as_str()).cyan().bold());
        for name in names {
            let scenario = registry.scenario(&name).expect("registered name");
            println!(
                "    {:<28} {:<12} {}",
                name,
                scenario.difficulty.to_string(),
                style(&scenario.description).dim()
            );
        }
        println!();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    // Initialize logging based on verbosity and quiet flags
    let log_level = if args.quiet {
        "error"
    } else if args.verbose {
        "debug"
    } else {
        "info"
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(log_level))
        .format_timestamp_millis()
        .init();

    if !args.quiet {
        display_banner();
    }

    let mut config = EngineConfig::load(args.config.as_deref())?;
    if let Some(target) = &args.target {
        config.target.ip = target.clone();
    }
    let delay_between = config.attacks.delay_between.max(0.0);

    let registry = AttackRegistry::builtin();

    if args.list {
        print_catalogue(&registry, args.tactic.map(Into::into));
        return Ok(());
    }

    let mut engine = match args.seed {
        Some(seed) => DvdLite::with_seed(registry, config, seed),
        None => DvdLite::new(registry, config),
    };

    if let Some(name) = &args.info {
        let info = engine.get_attack_info(name);
        if info.as_object().map(|m| m.is_empty()).unwrap_or(true) {
            eprintln!("unknown attack '{name}'; use --list to see the catalogue");
            std::process::exit(1);
        }
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    let mut collector = CtiCollector::new().with_threshold(args.min_confidence);
    if let Some(dir) = &args.results_dir {
        collector = collector.with_results_dir(dir);
    }
    engine.register_cti_collector(collector);

    let names: Vec<String> = match (&args.attack, &args.batch) {
        (Some(name), _) => vec![name.clone()],
        (None, batch) if !batch.is_empty() => batch.clone(),
        _ => {
            eprintln!("nothing to do: pass --attack, --batch or --list");
            std::process::exit(2);
        }
    };

    let bar = if args.quiet || names.len() < 2 {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(names.len() as u64)
    };
    bar.set_style(ProgressStyle::with_template(
        "{prefix} [{wide_bar:.red/black}] {pos}/{len}",
    )?);
    bar.set_prefix(style("ATTACK").red().bold().to_string());

    let emit = |bar: &ProgressBar, line: String| {
        if bar.is_hidden() {
            println!("{line}");
        } else {
            bar.println(line);
        }
    };

    for (i, name) in names.iter().enumerate() {
        if i > 0 {
            tokio::time::sleep(std::time::Duration::from_secs_f64(delay_between)).await;
        }
        match engine.run_attack(name).await {
            Ok(result) => {
                let (icon, colour) = match result.status {
                    AttackStatus::Success => ("+", style(result.status.to_string()).green()),
                    _ => ("-", style(result.status.to_string()).yellow()),
                };
                emit(
                    &bar,
                    format!(
                        "  [{icon}] {:<28} {} in {:.2}s, {} IOCs",
                        name,
                        colour,
                        result.response_time,
                        result.iocs.len()
                    ),
                );
            }
            Err(err) => emit(&bar, format!("  [!] {name}: {err}")),
        }
        bar.inc(1);
    }
    bar.finish_and_clear();

    let summary = engine.get_summary();
    println!();
    println!("  {}", style("RUN SUMMARY").bold());
    println!("{}", serde_json::to_string_pretty(&summary)?);

    if let Some(collector) = engine.cti_collector() {
        if !args.export.is_empty() {
            for format in &args.export {
                let path = match format {
                    ExportFormat::Json => collector.export_json(None)?,
                    ExportFormat::Csv => collector.export_csv(None)?,
                };
                println!("  exported CTI indicators to {}", path.display());
            }
        }
    }

    Ok(())
}

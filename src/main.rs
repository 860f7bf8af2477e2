use clap::Parser;
use deskline::{
    cli::{Cli, Command},
    config::SimConfig,
    error::EngineResult,
    io::{event_loader, write_audit_log, write_final_state, write_snapshots},
    processor::Processor,
    sample_data,
};
use tracing::info;

fn main() -> EngineResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Run { config, log_level } => {
            deskline::logging::init_tracing(log_level.as_deref());
            run(&config)
        }
        Command::GenerateSampleData {
            output_dir,
            num_trades,
            num_ticks,
        } => {
            deskline::logging::init_tracing(None);
            sample_data::generate(&output_dir, num_trades, num_ticks)?;
            info!(out_dir = %output_dir.display(), num_trades, num_ticks, "wrote sample input data");
            Ok(())
        }
    }
}

fn run(config_path: &std::path::Path) -> EngineResult<()> {
    let config = SimConfig::load(config_path)?;
    info!(config = %config_path.display(), "loaded configuration");

    let events = event_loader::load_events(&config)?;
    info!(event_count = events.len(), "loaded events");

    let state = deskline::state::EngineState::new(config.reporting_currency.clone());
    let mut processor = Processor::new(state, config.lot_tracking.clone());
    processor.process_events(&events)?;

    let (final_state, records) = processor.into_parts();

    write_audit_log(&config.audit_log_path(), &records)?;
    write_snapshots(&config.snapshots_path(), &records)?;
    write_final_state(&config.final_state_path(), &final_state)?;

    info!(
        event_count = final_state.event_count,
        record_count = records.len(),
        "replay complete"
    );
    Ok(())
}

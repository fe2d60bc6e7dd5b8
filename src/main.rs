use clap::Parser;
use metrics_cloudwatch_publish::cli::Cli;
use metrics_cloudwatch_publish::{Builder, CloudWatchSink, Config, EmfSink, Outcome, PerformanceData, Pipeline, Sink};
use std::io::Write;
use tracing::{error, info};

fn run(cli: Cli) -> metrics_cloudwatch_publish::Result<Outcome> {
    let config = Config::load(&cli.config)?;
    let settings = Builder::from_config(&config)?.with_overrides(&cli.overrides).build()?;
    let data = PerformanceData::load(&cli.data)?;

    let emf = cli.emf;
    // With --emf stdout is the metric stream, the preview and prompt move to stderr
    let output: Box<dyn Write> = if emf {
        Box::new(std::io::stderr())
    } else {
        Box::new(std::io::stdout())
    };
    let pipeline = Pipeline::new(&settings, std::io::stdin().lock(), output);
    pipeline.run(&data, &config.metric_mappings, |settings| {
        let sink: Box<dyn Sink> = if emf {
            Box::new(EmfSink::new(std::io::stdout()))
        } else {
            Box::new(CloudWatchSink::new(settings)?)
        };
        Ok(sink)
    })
}

fn main() {
    // stdout carries the preview and prompt (or EMF), keep logs on stderr
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .compact()
        .init();

    match run(Cli::parse()) {
        Ok(outcome) => info!("Finished: {outcome:?}"),
        Err(err) => {
            error!("{err}");
            std::process::exit(1);
        }
    }
}

use std::time::Duration;

use clap::Args;
use pauseroom_core::gateway::spawn_dispatcher;
use pauseroom_core::{
    ChannelGateway, Config, Event, NoopGateway, PauseSettings, PhaseTimer, TimerRunner,
};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use crate::console::ConsoleSink;

#[derive(Args)]
pub struct SettingsArgs {
    /// Break duration in minutes (defaults to timer.break_duration_minutes)
    #[arg(long)]
    pub duration: Option<u64>,
    /// Work frequency in minutes (defaults to timer.work_frequency_minutes)
    #[arg(long)]
    pub frequency: Option<u64>,
}

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub settings: SettingsArgs,
    /// Stop after this many ticks instead of waiting for Ctrl-C
    #[arg(long)]
    pub ticks: Option<u64>,
    /// Tick period in milliseconds
    #[arg(long, default_value = "1000")]
    pub tick_ms: u64,
}

impl SettingsArgs {
    /// Flags override the config file; the result is range-checked.
    fn resolve(&self, config: &Config) -> Result<PauseSettings, Box<dyn std::error::Error>> {
        let mut settings = config.timer;
        if let Some(duration) = self.duration {
            settings.break_duration_minutes = duration;
        }
        if let Some(frequency) = self.frequency {
            settings.work_frequency_minutes = frequency;
        }
        Ok(settings.validated()?)
    }
}

fn print_event(event: &Event) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string(event)?);
    Ok(())
}

pub fn status(args: SettingsArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let settings = args.resolve(config)?;
    let timer = PhaseTimer::new(settings, NoopGateway);
    println!("{}", serde_json::to_string_pretty(&timer.snapshot())?);
    Ok(())
}

pub fn run(args: RunArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let settings = args.settings.resolve(config)?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run_timer(settings, config, args.ticks, args.tick_ms.max(1)))
}

async fn run_timer(
    settings: PauseSettings,
    config: &Config,
    ticks: Option<u64>,
    tick_ms: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let (gateway, rx) = ChannelGateway::new();
    let dispatcher = spawn_dispatcher(rx, ConsoleSink::new(config.notifications.clone()));

    let period = Duration::from_millis(tick_ms);
    let (handle, task) = TimerRunner::spawn(PhaseTimer::new(settings, gateway), period);
    let mut events = handle.subscribe_events();

    info!(
        break_minutes = settings.break_duration_minutes,
        work_minutes = settings.work_frequency_minutes,
        "starting timer"
    );
    // With a tick budget the timer task stops itself after exactly that many
    // ticks, so the count never depends on wall-clock scheduling here.
    match ticks {
        Some(n) => handle.start_for(n).await?,
        None => handle.start().await?,
    };

    let interrupted = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };
    tokio::pin!(interrupted);

    loop {
        tokio::select! {
            _ = &mut interrupted => break,
            received = events.recv() => match received {
                Ok(event) => {
                    print_event(&event)?;
                    if matches!(event, Event::TimerStopped { .. }) {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "display fell behind"),
                Err(RecvError::Closed) => break,
            },
        }
    }

    handle.stop().await?;
    while let Ok(event) = events.try_recv() {
        print_event(&event)?;
    }
    print_event(&handle.snapshot().await?)?;

    handle.shutdown().await?;
    task.await?;
    dispatcher.await?;
    Ok(())
}

use std::{str::FromStr, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::Parser;
use cube_core::{
    config::{build_orchestrator, load_settings},
    CubeSession, PlaybackEvent, PlaybackState, SessionError, SolveOutcome, TokioScheduler,
};
use shared::domain::CubeState;
use tokio::sync::broadcast;
use tracing::info;

#[derive(Parser, Debug)]
struct Args {
    /// 54 color codes (W Y R O G B) in U R F D L B face order, `.` for unset.
    #[arg(long)]
    stickers: String,
    #[arg(long)]
    auto_play: bool,
    #[arg(long)]
    solver_url: Option<String>,
    #[arg(long)]
    solver_command: Option<String>,
}

fn print_events(events: &mut broadcast::Receiver<PlaybackEvent>) -> Result<()> {
    while let Ok(event) = events.try_recv() {
        println!("{}", serde_json::to_string(&event)?);
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();

    let mut settings = load_settings();
    if args.solver_url.is_some() {
        settings.solver_url = args.solver_url;
    }
    if args.solver_command.is_some() {
        settings.solver_command = args.solver_command;
    }

    let state = CubeState::from_str(&args.stickers).context("failed to parse --stickers")?;
    let (scheduler, mut timers) = TokioScheduler::new();
    let mut session = CubeSession::new(Arc::new(scheduler), settings.playback_timing());
    session.replace_state(state);

    let verdict = session.verdict();
    println!("{}", verdict.message());
    if !verdict.can_solve {
        if verdict.show_error() {
            bail!("cube cannot be solved as entered");
        }
        return Ok(());
    }

    let orchestrator = build_orchestrator(&settings)?;
    info!(backend = orchestrator.backend_name(), "solving");
    match session.solve(&orchestrator).await {
        Ok(SolveOutcome::Installed { moves }) => println!("Solution ({moves} moves):"),
        Ok(SolveOutcome::AlreadySolved) => {
            println!("Cube is already solved!");
            return Ok(());
        }
        Ok(SolveOutcome::Discarded) => bail!("solve result was discarded"),
        Err(SessionError::Solve(err)) => bail!(err.user_message()),
        Err(err) => return Err(err.into()),
    }

    if let Some(solution) = session.solution() {
        if !solution.is_verified() {
            println!("warning: placeholder sequence, not computed for this cube");
        }
        for (step, mv) in solution.moves().iter().enumerate() {
            println!("{:>3}. {:<4} {}", step + 1, mv.notation(), mv.description());
        }
    }

    if !args.auto_play {
        return Ok(());
    }

    let mut events = session.playback().subscribe_events();
    session.playback_mut().toggle_auto_play();
    print_events(&mut events)?;

    while session.playback().state() == PlaybackState::AutoPlaying {
        tokio::select! {
            fired = timers.recv() => {
                let Some(id) = fired else { break };
                session.on_timer(id);
                print_events(&mut events)?;
            }
            _ = tokio::signal::ctrl_c() => {
                session.playback_mut().toggle_auto_play();
                print_events(&mut events)?;
            }
        }
    }

    Ok(())
}

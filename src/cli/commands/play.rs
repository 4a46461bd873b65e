//! Play command - Train, then step through the grid interactively
//!
//! Each line read from stdin is one command. Moves are applied directly without
//! learning; a policy step lets the trained agent choose.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use clap::Parser;

use crate::{
    cli::{commands::train::train_session, config::SessionArgs, output::format_values},
    gridworld::{Action, Signal, Transition},
    q_learning::Trainer,
};

#[derive(Parser, Debug)]
#[command(about = "Train an agent, then move it around by hand")]
pub struct PlayArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Exploration rate used when the agent picks its own move
    #[arg(long, default_value_t = 0.0)]
    pub epsilon: f64,
}

/// One line of interactive input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayCommand {
    Move(Action),
    PolicyStep,
    Reset,
    Quit,
}

impl PlayCommand {
    /// Parse a line of input. Unknown input yields `None` and is ignored.
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "" | "space" | "n" | "next" => Some(PlayCommand::PolicyStep),
            "r" | "reset" => Some(PlayCommand::Reset),
            "q" | "quit" | "exit" => Some(PlayCommand::Quit),
            other => other.parse::<Action>().ok().map(PlayCommand::Move),
        }
    }
}

const HELP: &str = "w/a/s/d move, enter/n let the agent move, r reset, q quit";

fn describe(transition: &Transition) -> String {
    let outcome = match transition.signal {
        Signal::Goal => "reached the goal, back to start",
        Signal::Hazard => "hit a hazard, back to start",
        Signal::Clear => "ok",
    };
    format!(
        "{} {} -> {}: {}",
        transition.from, transition.action, transition.landing, outcome
    )
}

/// Drive `trainer`'s world from `input` until it ends or a quit command arrives.
///
/// The grid is redrawn to `output` after every recognised command.
pub fn run_interactive<R: BufRead, W: Write>(
    trainer: &mut Trainer,
    epsilon: f64,
    input: R,
    mut output: W,
) -> Result<()> {
    writeln!(output, "{HELP}")?;
    write!(output, "{}", trainer.world())?;

    for line in input.lines() {
        let line = line?;
        let Some(command) = PlayCommand::parse(&line) else {
            continue;
        };

        match command {
            PlayCommand::Quit => break,
            PlayCommand::Reset => {
                trainer.world_mut().reset();
                writeln!(output, "new layout")?;
            }
            PlayCommand::Move(action) => {
                let transition = trainer.world_mut().apply(action);
                writeln!(output, "{}", describe(&transition))?;
            }
            PlayCommand::PolicyStep => {
                let state = trainer.world().agent();
                writeln!(output, "values {}", format_values(trainer.table(), state)?)?;
                let transition = trainer.policy_step(epsilon)?;
                writeln!(output, "{}", describe(&transition))?;
            }
        }
        write!(output, "{}", trainer.world())?;
        output.flush()?;
    }
    Ok(())
}

pub fn execute(args: PlayArgs) -> Result<()> {
    let mut session = train_session(&args.session, None)?;
    session.trainer.world_mut().return_to_start();

    println!();
    let stdin = io::stdin();
    run_interactive(
        &mut session.trainer,
        args.epsilon,
        stdin.lock(),
        io::stdout().lock(),
    )
}

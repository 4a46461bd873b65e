//! Train command - Train a Q-learning agent on the grid

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use serde_json::to_writer_pretty;

use crate::{
    app::SessionConfig,
    cli::{
        config::SessionArgs,
        output::{
            format_number, format_values, print_kv, print_section, print_subsection,
            render_policy,
        },
    },
    gridworld::{GridWorld, Position},
    pipeline::{
        JsonlObserver, ProgressObserver, Rollout, TrainingPipeline, TrainingResult,
        greedy_rollout,
    },
    q_learning::Trainer,
};

#[derive(Debug, Serialize)]
struct TrainingSummaryFile<'a> {
    training: &'a TrainingResult,
    greedy: &'a Rollout,
    start_values: [f64; 4],
    config: &'a SessionConfig,
}

fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    // Treat trailing separators or missing filename as a directory target.
    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("training_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Train an agent", allow_negative_numbers = true)]
pub struct TrainArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Optional file for JSONL observations
    #[arg(long)]
    pub observations: Option<PathBuf>,

    /// Include every step in the JSONL observations
    #[arg(long, requires = "observations")]
    pub record_steps: bool,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Print the greedy path frame by frame after training
    #[arg(long)]
    pub replay: bool,
}

/// Output of a finished training run.
pub(crate) struct TrainedSession {
    pub config: SessionConfig,
    pub trainer: Trainer,
    pub result: TrainingResult,
}

/// Build a session from `args`, train it and print the headline numbers.
pub(crate) fn train_session(
    args: &SessionArgs,
    observations: Option<JsonlObserver>,
) -> Result<TrainedSession> {
    let config = args.resolve()?;
    let mut trainer = config.build_trainer()?;

    println!("\n=== Training ===");
    print_kv("Grid", &format!("{0}x{0}", config.grid_size));
    print_kv("Hazards", &trainer.world().hazards().len().to_string());
    print_kv("Episodes", &format_number(config.episodes));
    print_kv("Reward", &config.reward.to_string());
    if let Some(seed) = config.seed {
        print_kv("Seed", &seed.to_string());
    }

    let mut pipeline = TrainingPipeline::new(config.training_config());
    if args.show_progress() {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(observer) = observations {
        pipeline = pipeline.with_observer(Box::new(observer));
    }

    let result = pipeline.run(&mut trainer)?;

    print_section("Training Complete");
    print_kv("Episodes", &format_number(result.episodes));
    print_kv(
        "Goals",
        &format!("{} ({:.1}%)", result.goals, result.goal_rate * 100.0),
    );
    print_kv("Step caps", &result.step_caps.to_string());
    print_kv("Hazard hits", &result.hazard_hits.to_string());
    print_kv("Mean steps", &format!("{:.2}", result.mean_steps));
    match result.first_goal {
        Some(episode) => print_kv("First goal", &format!("episode {episode}")),
        None => print_kv("First goal", "never"),
    }
    print_kv("Final epsilon", &format!("{:.4}", result.final_epsilon));
    print_kv("Final alpha", &format!("{:.4}", result.final_alpha));

    Ok(TrainedSession {
        config,
        trainer,
        result,
    })
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let summary_target = args.summary.as_ref().map(|raw| {
        let sanitized = sanitize_summary_path(raw);
        let normalized = sanitized != *raw;
        (sanitized, normalized)
    });

    let observations = match &args.observations {
        Some(path) => {
            let observer = JsonlObserver::new(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Some(if args.record_steps {
                observer.with_steps()
            } else {
                observer
            })
        }
        None => None,
    };

    let TrainedSession {
        config,
        trainer,
        result,
    } = train_session(&args.session, observations)?;

    print_subsection("Grid");
    print!("{}", trainer.world());
    print_subsection("Greedy policy");
    print!("{}", render_policy(trainer.world(), trainer.table())?);
    print_subsection("Start cell values");
    println!("  {}", format_values(trainer.table(), Position::ORIGIN)?);

    let mut world = trainer.world().clone();
    let rollout = greedy_rollout(&mut world, trainer.table(), config.max_steps)?;

    print_subsection("Greedy rollout");
    print_kv(
        "Outcome",
        &format!("{:?} after {} steps", rollout.outcome, rollout.steps),
    );
    print_kv("Hazard hits", &rollout.hazard_hits.to_string());

    if args.replay {
        replay(&world, &rollout);
    }

    if let Some((path, normalized)) = summary_target {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let summary = TrainingSummaryFile {
            training: &result,
            greedy: &rollout,
            start_values: trainer.table().row(Position::ORIGIN)?,
            config: &config,
        };
        let file = File::create(&path)
            .with_context(|| format!("failed to create summary {}", path.display()))?;
        to_writer_pretty(file, &summary)?;
        if normalized {
            println!("\nSummary written to: {} (normalized)", path.display());
        } else {
            println!("\nSummary written to: {}", path.display());
        }
    }

    if let Some(path) = &args.observations {
        println!("Observations written to: {}", path.display());
    }

    Ok(())
}

/// Print one grid frame per cell of the rollout path.
fn replay(world: &GridWorld, rollout: &Rollout) {
    print!("{}", replay_frames(world, rollout));
}

fn replay_frames(world: &GridWorld, rollout: &Rollout) -> String {
    rollout
        .path
        .iter()
        .enumerate()
        .map(|(index, &cell)| format!("\nFrame {index}: {cell}\n{}", world.render_at(cell)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_summary_path() {
        assert_eq!(
            sanitize_summary_path(Path::new("out/run")),
            PathBuf::from("out/run.json")
        );
        assert_eq!(
            sanitize_summary_path(Path::new("out/run.JSON")),
            PathBuf::from("out/run.JSON")
        );
        assert_eq!(
            sanitize_summary_path(Path::new("out/run.txt")),
            PathBuf::from("out/run.json")
        );
        let dir = format!("out{}", std::path::MAIN_SEPARATOR);
        assert_eq!(
            sanitize_summary_path(Path::new(&dir)),
            PathBuf::from("out").join("training_summary.json")
        );
    }

    #[test]
    fn test_replay_frames_follow_the_path() {
        let world = GridWorld::with_hazards(2, []).unwrap();
        let rollout = Rollout {
            path: vec![Position::ORIGIN, Position::new(1, 0), Position::new(1, 1)],
            outcome: crate::q_learning::EpisodeOutcome::Goal,
            steps: 2,
            hazard_hits: 0,
        };
        assert_eq!(
            replay_frames(&world, &rollout),
            "\nFrame 0: (0, 0)\nP.\n.G\n\
             \nFrame 1: (1, 0)\n.P\n.G\n\
             \nFrame 2: (1, 1)\n..\n.P\n"
        );
    }
}

use anyhow::Result;
use colored::Colorize;
use std::io::Write;
use std::time::Duration;

use super::BatchSummary;
use crate::common::report_timestamp;

fn format_score(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

fn format_int(value: Option<i32>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

pub fn generate_console_report<W: Write + ?Sized>(
    writer: &mut W,
    summary: &BatchSummary,
    total_duration: Duration,
    verbose: bool,
) -> Result<()> {
    writeln!(writer)?;
    writeln!(writer, "{}", "📊 Simulation Results Summary".bright_cyan().bold())?;
    writeln!(writer, "{}", "=============================".cyan())?;
    writeln!(writer, "Generated: {}", report_timestamp())?;
    writeln!(writer, "Batch seed: {}", summary.seed)?;
    writeln!(
        writer,
        "Games completed: {}/{}",
        summary.completed.to_string().green(),
        summary.rounds
    )?;
    if summary.failed() {
        writeln!(
            writer,
            "Games failed: {}",
            summary.failures.len().to_string().red()
        )?;
    }
    writeln!(writer, "Average turns: {}", format_score(summary.mean_turns))?;
    writeln!(writer, "Total time: {total_duration:?}")?;
    writeln!(writer)?;

    for player in &summary.players {
        writeln!(
            writer,
            "{} ({})",
            player.name.bold(),
            player.strategy.bright_white()
        )?;
        writeln!(
            writer,
            "   Average score: {}",
            format_score(player.mean_score).bright_green()
        )?;
        writeln!(
            writer,
            "   Range: {} to {}",
            format_int(player.min_score),
            format_int(player.max_score)
        )?;
        writeln!(
            writer,
            "   Wins: {} ({}%)",
            player.wins,
            format_score(summary.win_rate(player))
        )?;
        writeln!(
            writer,
            "   Finished first: {} (doubled {})",
            player.finishes, player.doubled
        )?;
        writeln!(writer)?;
    }

    if !summary.failures.is_empty() {
        writeln!(writer, "{}", "❌ Failed games".red().bold())?;
        for failure in &summary.failures {
            writeln!(
                writer,
                "     • game {} (seed {}): {}",
                failure.index,
                failure.seed,
                failure.error.red()
            )?;
        }
        writeln!(writer)?;
    }

    if verbose && !summary.games.is_empty() {
        writeln!(writer, "{}", "🃏 Individual games".bright_yellow().bold())?;
        writeln!(writer, "{}", "===================".yellow())?;
        for game in &summary.games {
            let scores: Vec<String> = game
                .outcome
                .scores
                .iter()
                .map(|(name, score)| format!("{name}={score}"))
                .collect();
            let finisher = game.outcome.finisher.as_deref().unwrap_or("-");
            let marker = if game.outcome.finisher_doubled {
                " (doubled)"
            } else {
                ""
            };
            writeln!(
                writer,
                "   #{:<5} seed {:<20} turns {:<4} finisher {finisher}{marker}: {}",
                game.index,
                game.outcome.seed,
                game.outcome.turns,
                scores.join(", ")
            )?;
        }
    }
    Ok(())
}

pub fn generate_json_report<W: Write + ?Sized>(writer: &mut W, summary: &BatchSummary) -> Result<()> {
    let payload = serde_json::json!({
        "generated_at": report_timestamp(),
        "summary": summary,
    });
    let json_output = serde_json::to_string_pretty(&payload)?;
    writeln!(writer, "{json_output}")?;
    Ok(())
}

pub fn generate_markdown_report<W: Write + ?Sized>(
    writer: &mut W,
    summary: &BatchSummary,
) -> Result<()> {
    writeln!(writer, "# Skyjo Simulation Results\n")?;
    writeln!(writer, "_Generated {}_\n", report_timestamp())?;

    writeln!(writer, "## Summary\n")?;
    writeln!(writer, "- **Batch seed**: {}", summary.seed)?;
    writeln!(writer, "- **Games completed**: {}/{}", summary.completed, summary.rounds)?;
    writeln!(writer, "- **Games failed**: {}", summary.failures.len())?;
    writeln!(
        writer,
        "- **Average turns**: {}\n",
        format_score(summary.mean_turns)
    )?;

    writeln!(writer, "## Players\n")?;
    writeln!(
        writer,
        "| Player | Strategy | Average | Min | Max | Wins | Finished first | Doubled |"
    )?;
    writeln!(writer, "|---|---|---|---|---|---|---|---|")?;
    for player in &summary.players {
        writeln!(
            writer,
            "| {} | {} | {} | {} | {} | {} | {} | {} |",
            player.name,
            player.strategy,
            format_score(player.mean_score),
            format_int(player.min_score),
            format_int(player.max_score),
            player.wins,
            player.finishes,
            player.doubled
        )?;
    }

    if !summary.failures.is_empty() {
        writeln!(writer, "\n## Failed games\n")?;
        for failure in &summary.failures {
            writeln!(
                writer,
                "- game {} (seed {}): {}",
                failure.index, failure.seed, failure.error
            )?;
        }
    }
    Ok(())
}

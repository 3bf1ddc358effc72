//! Inspect command implementation
//!
//! Compiles a note file in memory and prints the circuit statistics and the
//! timers the trigger starts, without writing anything.

use anyhow::{Context, Result};
use colored::Colorize;
use notecircuit_backend_circuit::graph::Layout;
use notecircuit_backend_circuit::{
    compile_with, trigger_timers, CompileContext, CompileError, CompileResult, TimerRef,
};
use notecircuit_spec::validate_sequence;
use std::path::Path;
use std::process::ExitCode;

use super::compile::print_stats;
use super::json_output::{InspectOutput, JsonError, JsonWarning, TriggerTarget};
use super::reporting;
use crate::input::load_notes;

/// Run the inspect command
///
/// # Returns
/// Exit code: 0 if the notes compile, 1 otherwise
pub fn run(input_path: &str, json_output: bool) -> Result<ExitCode> {
    if json_output {
        run_json(input_path)
    } else {
        run_human(input_path)
    }
}

fn run_human(input_path: &str) -> Result<ExitCode> {
    println!("{} {}", "Inspecting:".cyan().bold(), input_path);

    let loaded = load_notes(Path::new(input_path))
        .with_context(|| format!("Failed to load note file: {}", input_path))?;
    let validation = validate_sequence(&loaded.sequence);
    reporting::print_validation_results(&validation);
    if !validation.is_ok() {
        println!("\n{} Notes are invalid", "FAILED".red().bold());
        return Ok(ExitCode::from(1));
    }

    let mut ctx = CompileContext::new();
    let (result, trigger) = match inspect(&mut ctx, &loaded.sequence.notes) {
        Ok(inspected) => inspected,
        Err(e) => {
            println!("  {} {}", "x".red(), e);
            println!("\n{} Compilation failed", "FAILED".red().bold());
            return Ok(ExitCode::from(1));
        }
    };

    print_stats(&result.stats);
    println!("\n{}", "Trigger starts:".cyan().bold());
    if trigger.is_empty() {
        println!("  {}", "(nothing)".dimmed());
    }
    for target in &trigger {
        println!("  {:<18} node {}", target.timer, target.node);
    }
    println!("\n{} {}", "Document hash:".dimmed(), result.hash);

    Ok(ExitCode::SUCCESS)
}

fn run_json(input_path: &str) -> Result<ExitCode> {
    let mut output = InspectOutput {
        success: false,
        errors: vec![],
        warnings: vec![],
        stats: None,
        trigger: vec![],
        document_hash: None,
    };

    match load_notes(Path::new(input_path)) {
        Ok(loaded) => {
            let validation = validate_sequence(&loaded.sequence);
            output.errors = validation.errors.iter().map(JsonError::from_validation).collect();
            output.warnings = validation
                .warnings
                .iter()
                .map(JsonWarning::from_validation)
                .collect();

            if validation.is_ok() {
                let mut ctx = CompileContext::new();
                match inspect(&mut ctx, &loaded.sequence.notes) {
                    Ok((result, trigger)) => {
                        output.success = true;
                        output.stats = Some(result.stats);
                        output.trigger = trigger;
                        output.document_hash = Some(result.hash);
                    }
                    Err(e) => output.errors.push(JsonError::from_backend(&e)),
                }
            }
        }
        Err(e) => output.errors.push(JsonError::new(e.code(), e.to_string())),
    }

    let json = serde_json::to_string_pretty(&output).context("Failed to serialize output")?;
    println!("{}", json);

    Ok(if output.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

/// Compiles into `ctx` and resolves the trigger's targets to node ids.
fn inspect(
    ctx: &mut CompileContext,
    notes: &[notecircuit_spec::Note],
) -> Result<(CompileResult, Vec<TriggerTarget>), CompileError> {
    let result = compile_with(ctx, notes)?;
    let layout = Layout::assign(ctx);
    let trigger = trigger_timers(ctx)
        .into_iter()
        .map(|timer| {
            Ok(TriggerTarget {
                timer: timer_label(timer),
                node: layout.timer(timer)?.0,
            })
        })
        .collect::<Result<Vec<_>, CompileError>>()?;
    Ok((result, trigger))
}

fn timer_label(timer: TimerRef) -> String {
    match timer {
        TimerRef::Duration(i) => format!("duration[{}]", i),
        TimerRef::Start(i) => format!("start[{}]", i),
        TimerRef::Extension(i) => format!("extension[{}]", i),
    }
}

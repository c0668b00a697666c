//! CLI tool for patchgrid - replays a gesture script against a grid payload
//!
//! Usage:
//!   grid_replay <info.json> <script.json>              # Print final state as JSON
//!   grid_replay <info.json> <script.json> -o out.json  # Write it to a file
//!
//! `info.json` is the host render payload (`{payload, patchInfo,
//! selectionModes}`). The script is a list of steps such as
//! `{"op": "edit", "row": 0, "col": 1, "text": "x"}` or
//! `{"op": "respond", "response": [...]}`; responses answer the oldest
//! outstanding submission. Set `RUST_LOG=patchgrid=debug` to trace.

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::collections::VecDeque;
use std::env;
use std::fs;
use std::io::{self, Write};

use patchgrid::{CommitOutcome, Grid, GridError, GridInfo, HostOutputs, Modifiers, Platform, Submission};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
enum Step {
    /// Host custom event
    Event { name: String, detail: Value },
    /// Pointer-down on a row
    Click {
        row: usize,
        #[serde(default)]
        ctrl: bool,
        #[serde(default)]
        shift: bool,
        #[serde(default)]
        meta: bool,
        #[serde(default)]
        alt: bool,
    },
    /// Key press on a focused row
    Key { row: usize, key: String },
    /// Double-click a cell and type `text`
    Edit { row: usize, col: usize, text: String },
    /// Key press inside the editor (`Enter`, `Tab`, `Escape`)
    EditorKey {
        key: String,
        #[serde(default)]
        shift: bool,
    },
    /// Pointer-down outside the editor
    Blur,
    /// Answer the oldest outstanding submission
    Respond { response: Value },
    /// Fail the oldest outstanding submission
    Fail { message: String },
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("patchgrid=warn"))
        .unwrap();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}

fn read_json(path: &str) -> Value {
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error reading {}: {}", path, e);
            std::process::exit(1);
        }
    };
    match serde_json::from_str(&text) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Error parsing {}: {}", path, e);
            std::process::exit(1);
        }
    }
}

fn run_step(grid: &mut Grid, pending: &mut VecDeque<Submission>, step: Step) -> Result<(), GridError> {
    match step {
        Step::Event { name, detail } => grid.dispatch_host_event(&name, detail)?,
        Step::Click {
            row,
            ctrl,
            shift,
            meta,
            alt,
        } => {
            let mods = Modifiers {
                ctrl,
                shift,
                meta,
                alt,
            };
            grid.row_pointer_down(row, mods, Platform::default());
        }
        Step::Key { row, key } => {
            grid.row_key_down(row, &key);
        }
        Step::Edit { row, col, text } => {
            let transition = grid.begin_edit(row, col);
            pending.extend(transition.submission);
            if transition.editing != Some(patchgrid::CellKey::new(row, col)) {
                return Err(GridError::Other(format!("cell ({row}, {col}) is not editable")));
            }
            grid.set_edit_value(&text);
        }
        Step::EditorKey { key, shift } => {
            let submission = match key.as_str() {
                "Enter" => grid.edit_enter(shift).submission,
                "Tab" => grid.edit_tab(shift).submission,
                "Escape" => {
                    grid.escape_edit();
                    None
                }
                other => return Err(GridError::Other(format!("unknown editor key: {other}"))),
            };
            pending.extend(submission);
        }
        Step::Blur => {
            if let CommitOutcome::Submit(s) = grid.commit_edit() {
                pending.push_back(s);
            }
        }
        Step::Respond { response } => {
            let submission = pending
                .pop_front()
                .ok_or_else(|| GridError::Other("no outstanding submission".into()))?;
            grid.complete_submission(&submission, Ok(response));
        }
        Step::Fail { message } => {
            let submission = pending
                .pop_front()
                .ok_or_else(|| GridError::Other("no outstanding submission".into()))?;
            grid.complete_submission(&submission, Err(GridError::Transport(message)));
        }
    }
    Ok(())
}

fn main() {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    if args.len() < 3 {
        eprintln!("Usage: grid_replay <info.json> <script.json> [-o output.json]");
        std::process::exit(1);
    }

    let output_path = if args.len() > 4 && args[3] == "-o" {
        Some(&args[4])
    } else {
        None
    };

    let info: GridInfo = match serde_json::from_value(read_json(&args[1])) {
        Ok(i) => i,
        Err(e) => {
            eprintln!("Error reading grid info: {}", e);
            std::process::exit(1);
        }
    };
    let steps: Vec<Step> = match serde_json::from_value(read_json(&args[2])) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading script: {}", e);
            std::process::exit(1);
        }
    };

    let mut grid = match Grid::from_info(info) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Error creating grid: {}", e);
            std::process::exit(1);
        }
    };

    let mut pending = VecDeque::new();
    for (i, step) in steps.into_iter().enumerate() {
        if let Err(e) = run_step(&mut grid, &mut pending, step) {
            eprintln!("Step {}: {}", i, e);
            std::process::exit(1);
        }
    }

    let outputs: serde_json::Map<String, Value> = HostOutputs::from_grid(&grid)
        .named_values("grid")
        .unwrap()
        .into_iter()
        .collect();
    let mut cells: Vec<_> = grid.edits().iter().collect();
    cells.sort_by_key(|(key, _)| **key);
    let cells: Vec<Value> = cells
        .into_iter()
        .map(|(key, record)| json!({"row": key.row, "col": key.col, "record": record}))
        .collect();

    let report = json!({
        "outputs": outputs,
        "cells": cells,
        "data": grid.data(),
        "pending": pending.len(),
    });
    let json = serde_json::to_string_pretty(&report).unwrap();

    match output_path {
        Some(path) => {
            if let Err(e) = fs::write(path, &json) {
                eprintln!("Error writing {}: {}", path, e);
                std::process::exit(1);
            }
            eprintln!("Written: {}", path);
        }
        None => {
            io::stdout().write_all(json.as_bytes()).unwrap();
            println!();
        }
    }
}

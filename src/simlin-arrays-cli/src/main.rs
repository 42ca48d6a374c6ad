// Copyright 2025 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use simlin_arrays::{Project, expand_project};

#[derive(Parser, Debug)]
#[command(
    name = "simlin-arrays",
    version,
    about = "Expand arrayed system dynamics equations into scalar equations"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Expand arrays and write the resulting project as JSON
    Expand {
        /// JSON project to read (stdin if omitted)
        path: Option<PathBuf>,
        /// Path to write output to (stdout if omitted)
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Indent the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Expand arrays and print one equation per entity
    Equations {
        /// JSON project to read (stdin if omitted)
        path: Option<PathBuf>,
        /// Path to write output to (stdout if omitted)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

fn read_project(path: Option<&Path>) -> Result<Project> {
    let mut contents = String::new();
    match path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            BufReader::new(file)
                .read_to_string(&mut contents)
                .with_context(|| format!("failed to read {}", path.display()))?;
        }
        None => {
            io::stdin()
                .read_to_string(&mut contents)
                .context("failed to read project from stdin")?;
        }
    }

    let source = path.map_or_else(|| "<stdin>".to_owned(), |p| p.display().to_string());
    Project::from_json(&contents).with_context(|| format!("failed to parse project {source}"))
}

fn expand(mut project: Project) -> Result<Project> {
    let stats = expand_project(&mut project).context("array expansion failed")?;
    debug!(
        expanded = stats.expanded,
        clones = stats.clones,
        "expansion complete"
    );
    Ok(project)
}

fn render_json(project: &Project, pretty: bool) -> Result<String> {
    let mut json = if pretty {
        project.to_json_pretty()?
    } else {
        project.to_json()?
    };
    json.push('\n');
    Ok(json)
}

fn render_equations(out: &mut impl fmt::Write, project: &Project) -> fmt::Result {
    for (model_name, model) in project.models.iter() {
        writeln!(out, "% {model_name}")?;
        for (kind, entities) in model.entities.iter() {
            writeln!(out, "{kind}:")?;
            for entity in entities.iter() {
                match entity.equation() {
                    Some(eqn) => writeln!(out, "    {} = {eqn}", entity.key())?,
                    None => writeln!(out, "    {} = <element equations>", entity.key())?,
                }
            }
        }
    }
    Ok(())
}

fn write_output(output: Option<&Path>, contents: &str) -> Result<()> {
    match output {
        Some(path) => {
            let mut file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            file.write_all(contents.as_bytes())
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        None => {
            io::stdout()
                .write_all(contents.as_bytes())
                .context("failed to write to stdout")?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Expand {
            path,
            output,
            pretty,
        } => {
            let project = expand(read_project(path.as_deref())?)?;
            write_output(output.as_deref(), &render_json(&project, pretty)?)
        }
        Command::Equations { path, output } => {
            let project = expand(read_project(path.as_deref())?)?;
            let mut listing = String::new();
            render_equations(&mut listing, &project)?;
            write_output(output.as_deref(), &listing)
        }
    }
}

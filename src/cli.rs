//! Parseo mínimo de argumentos, al estilo de las CLIs del workspace: sin
//! frameworks, un `match` por bandera.
use std::path::PathBuf;

use crate::errors::CliError;

pub const USAGE: &str = "Uso:
  temporal-timeline project --history <FILE> [--describe <FILE>]... [--namespace <NS>] [--run-id <ID>] [--no-reconcile]
  temporal-timeline search --executions <FILE> [--query <Q>]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectArgs {
    pub history: PathBuf,
    pub describes: Vec<PathBuf>,
    pub namespace: Option<String>,
    pub run_id: Option<String>,
    pub reconcile: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchArgs {
    pub executions: PathBuf,
    pub query: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Project(ProjectArgs),
    Search(SearchArgs),
}

/// `args` sin el nombre del binario.
pub fn parse_args<I, S>(args: I) -> Result<Command, CliError>
    where I: IntoIterator<Item = S>,
          S: Into<String>
{
    let args: Vec<String> = args.into_iter().map(Into::into).collect();
    let Some((sub, rest)) = args.split_first() else {
        return Err(CliError::Usage("missing subcommand".into()));
    };
    match sub.as_str() {
        "project" => parse_project(rest).map(Command::Project),
        "search" => parse_search(rest).map(Command::Search),
        other => Err(CliError::Usage(format!("unknown subcommand {other:?}"))),
    }
}

fn value<'a>(rest: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str, CliError> {
    *i += 1;
    rest.get(*i)
        .map(String::as_str)
        .ok_or_else(|| CliError::Usage(format!("{flag} requires a value")))
}

fn parse_project(rest: &[String]) -> Result<ProjectArgs, CliError> {
    let mut history = None;
    let mut describes = Vec::new();
    let mut namespace = None;
    let mut run_id = None;
    let mut reconcile = true;
    let mut i = 0;
    while i < rest.len() {
        match rest[i].as_str() {
            "--history" => history = Some(PathBuf::from(value(rest, &mut i, "--history")?)),
            "--describe" => describes.push(PathBuf::from(value(rest, &mut i, "--describe")?)),
            "--namespace" => namespace = Some(value(rest, &mut i, "--namespace")?.to_string()),
            "--run-id" => run_id = Some(value(rest, &mut i, "--run-id")?.to_string()),
            "--no-reconcile" => reconcile = false,
            other => return Err(CliError::Usage(format!("unexpected argument {other:?}"))),
        }
        i += 1;
    }
    let history = history.ok_or_else(|| CliError::Usage("project requires --history".into()))?;
    Ok(ProjectArgs { history,
                     describes,
                     namespace,
                     run_id,
                     reconcile })
}

fn parse_search(rest: &[String]) -> Result<SearchArgs, CliError> {
    let mut executions = None;
    let mut query = None;
    let mut i = 0;
    while i < rest.len() {
        match rest[i].as_str() {
            "--executions" => executions = Some(PathBuf::from(value(rest, &mut i, "--executions")?)),
            "--query" => query = Some(value(rest, &mut i, "--query")?.to_string()),
            other => return Err(CliError::Usage(format!("unexpected argument {other:?}"))),
        }
        i += 1;
    }
    let executions = executions.ok_or_else(|| CliError::Usage("search requires --executions".into()))?;
    Ok(SearchArgs { executions, query })
}

use std::collections::HashMap;
use std::path::Path;

use argh::{EarlyExit, FromArgs};

/// Flags that take a value.
const OPTIONS: &[&str] = &["credspath", "filepath", "folderid", "owner"];
/// Boolean flags.
const SWITCHES: &[&str] = &["alldrives"];

#[derive(FromArgs, PartialEq, Eq, Debug, Default)]
/// Upload a single file to a google drive folder using a service account.
pub struct Args {
    #[argh(option, description = "path to service account credentials")]
    pub credspath: Option<String>,
    #[argh(option, description = "path of file to be uploaded")]
    pub filepath: Option<String>,
    #[argh(option, description = "ID of folder to upload file to")]
    pub folderid: Option<String>,
    #[argh(option, description = "owner to transfer file to")]
    pub owner: Option<String>,
    #[argh(switch, description = "support all drives")]
    pub alldrives: bool,
}

/// Name the binary was invoked as, for usage output.
pub fn command_name() -> String {
    std::env::args_os()
        .next()
        .as_deref()
        .map(Path::new)
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string())
}

pub fn parse(command: &str, args: &[String]) -> Result<Args, EarlyExit> {
    let args = normalize(args);
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    Args::from_args(&[command], &args)
}

pub fn usage(command: &str) -> String {
    match Args::from_args(&[command], &["--help"]) {
        Err(exit) => exit.output,
        Ok(_) => String::new(),
    }
}

/// Rewrites `-flag`, `-flag=value` and `--flag=value` into the `--flag value`
/// form argh understands. Values following an option are passed through
/// untouched, and so is everything after `--`. A flag given more than once
/// keeps only its last occurrence.
fn normalize(args: &[String]) -> Vec<String> {
    let mut groups: Vec<Vec<String>> = Vec::with_capacity(args.len());
    let mut last: HashMap<&str, usize> = HashMap::new();
    let mut value_next = false;
    let mut rest = false;

    for arg in args {
        if value_next {
            value_next = false;
            if let Some(group) = groups.last_mut() {
                group.push(arg.clone());
            }
            continue;
        }
        if rest || arg == "--" {
            rest = true;
            groups.push(vec![arg.clone()]);
            continue;
        }

        let flag = match arg.strip_prefix("--").or_else(|| arg.strip_prefix('-')) {
            Some(flag) if !flag.is_empty() => flag,
            _ => {
                groups.push(vec![arg.clone()]);
                continue;
            }
        };
        let (name, value) = match flag.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (flag, None),
        };

        if matches!(name, "h" | "help") {
            groups.push(vec!["--help".to_string()]);
        } else if SWITCHES.contains(&name) {
            let group = match value.map(parse_bool) {
                None | Some(Some(true)) => vec![format!("--{name}")],
                Some(Some(false)) => vec![],
                // leave it for argh to reject
                Some(None) => {
                    groups.push(vec![arg.clone()]);
                    continue;
                }
            };
            supersede(&mut groups, &mut last, name, group);
        } else if OPTIONS.contains(&name) {
            let mut group = vec![format!("--{name}")];
            match value {
                Some(value) => group.push(value.to_string()),
                None => value_next = true,
            }
            supersede(&mut groups, &mut last, name, group);
        } else {
            groups.push(vec![arg.clone()]);
        }
    }
    groups.concat()
}

/// Pushes `group` for flag `name`, emptying any earlier occurrence.
fn supersede<'a>(
    groups: &mut Vec<Vec<String>>,
    last: &mut HashMap<&'a str, usize>,
    name: &'a str,
    group: Vec<String>,
) {
    if let Some(&previous) = last.get(name) {
        groups[previous].clear();
    }
    last.insert(name, groups.len());
    groups.push(group);
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

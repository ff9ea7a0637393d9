//! borax — sanitize untrusted HTML on the command line.
//!
//! Reads markup from a file (or stdin), runs it through the whitelist
//! sanitizer, and writes the safe result to stdout. `--snippet N` extracts a
//! plain-text preview instead.

mod config;

use std::env;
use std::fs;
use std::io::Read;

use anyhow::{Context, Result, bail};
use mimalloc::MiMalloc;

use crate::config::PolicyFile;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const USAGE: &str = "Usage: borax [OPTIONS] [FILE]

Sanitize untrusted HTML from FILE (or stdin) to stdout.

Options:
  --policy <file.toml>   policy file; absent keys keep the built-in defaults
  --strip                drop disallowed tags instead of escaping them
  --keep-comments        pass comments through instead of dropping them
  --snippet <chars>      emit a plain-text snippet of at most <chars> chars
  -h, --help             show this help";

struct Cli {
    input: Option<String>,
    policy_path: Option<String>,
    strip: bool,
    keep_comments: bool,
    snippet: Option<usize>,
}

fn parse_args(args: &[String]) -> Result<Cli> {
    let mut cli = Cli {
        input: None,
        policy_path: None,
        strip: false,
        keep_comments: false,
        snippet: None,
    };
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            "--strip" => cli.strip = true,
            "--keep-comments" => cli.keep_comments = true,
            "--policy" => {
                let path = iter.next().context("--policy requires a file argument")?;
                cli.policy_path = Some(path.clone());
            }
            "--snippet" => {
                let chars = iter.next().context("--snippet requires a length argument")?;
                let chars = chars
                    .parse()
                    .with_context(|| format!("invalid snippet length: {chars}"))?;
                cli.snippet = Some(chars);
            }
            other if other.starts_with('-') && other != "-" => {
                bail!("unknown option: {other}\n{USAGE}");
            }
            path => {
                if cli.input.is_some() {
                    bail!("more than one input file\n{USAGE}");
                }
                cli.input = Some(path.to_string());
            }
        }
    }
    Ok(cli)
}

fn read_input(input: Option<&str>) -> Result<String> {
    match input {
        Some("-") | None => {
            let mut html = String::new();
            std::io::stdin()
                .read_to_string(&mut html)
                .context("reading stdin")?;
            Ok(html)
        }
        Some(path) => fs::read_to_string(path).with_context(|| format!("reading {path}")),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env().init();

    let args: Vec<String> = env::args().skip(1).collect();
    let cli = parse_args(&args)?;

    let mut policy = match &cli.policy_path {
        Some(path) => {
            let text = fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
            PolicyFile::parse(&text)
                .with_context(|| format!("parsing policy file {path}"))?
                .into_policy()
        }
        None => sanitize::Policy::default(),
    };
    if cli.strip {
        policy.strip = true;
    }
    if cli.keep_comments {
        policy.strip_comments = false;
    }

    let html = read_input(cli.input.as_deref())?;
    log::debug!(
        "sanitizing {} bytes ({} allowed tags)",
        html.len(),
        policy.tags.len()
    );

    let output = match cli.snippet {
        Some(max_chars) => sanitize::generate_snippet(&html, max_chars),
        None => sanitize::sanitize(&html, &policy),
    };
    println!("{output}");

    Ok(())
}

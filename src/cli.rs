// src/cli.rs
use std::env;
use std::path::PathBuf;

use color_eyre::eyre::{Result, bail};

use crate::params::DEFAULT_DATA_DIR;
use crate::progress::Progress;
use crate::sync::{self, SyncOptions};

pub fn run() -> Result<()> {
    let opts = parse_args(env::args().skip(1))?;
    let mut progress = CliProgress::default();
    let summary = sync::synchronize(&opts, Some(&mut progress))?;

    if summary.wrote {
        println!(
            "Synced season {}: {} new pairing(s), {} new row(s), {} backfilled.",
            opts.season_id, summary.new_pairings, summary.new_rows, summary.backfilled
        );
    }
    Ok(())
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<SyncOptions> {
    let mut season = None;
    let mut table_path = None;
    let mut data_dir = PathBuf::from(DEFAULT_DATA_DIR);

    while let Some(a) = args.next() {
        match a.as_str() {
            "-s" | "--season" => {
                let v = args.next().ok_or_else(|| color_eyre::eyre::eyre!("Missing season id"))?;
                season = Some(v.parse()?);
            }
            "-o" | "--out" => {
                table_path = Some(PathBuf::from(args.next().ok_or_else(|| color_eyre::eyre::eyre!("Missing output path"))?));
            }
            "--data-dir" => {
                data_dir = PathBuf::from(args.next().ok_or_else(|| color_eyre::eyre::eyre!("Missing data dir"))?);
            }
            "-h" | "--help" => {
                eprintln!(include_str!("cli_help.txt"));
                std::process::exit(0);
            }
            _ => bail!("Unknown arg: {a}"),
        }
    }

    let Some(season_id) = season else {
        bail!("Missing required --season <id> (see --help)");
    };
    Ok(SyncOptions { season_id, table_path, data_dir })
}

/* ---------------- CLI progress sink ---------------- */

/// Prints one line per match; the 15s league-site throttle makes a season
/// catch-up slow enough that silence would look like a hang.
#[derive(Default)]
struct CliProgress {
    total: usize,
    done: usize,
}

impl Progress for CliProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        if total > 0 {
            println!("{total} new match(es) to pull (politely, this takes a while)");
        }
    }

    fn log(&mut self, msg: &str) {
        println!("{msg}");
    }

    fn item_done(&mut self, informal_id: u64) {
        self.done += 1;
        println!("[{}/{}] match {} synced", self.done, self.total, informal_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> impl Iterator<Item = String> {
        args.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn season_is_required() {
        assert!(parse_args(strings(&[])).is_err());
    }

    #[test]
    fn parses_all_flags() {
        let opts = parse_args(strings(&["-s", "33", "-o", "out/t.csv", "--data-dir", "cache"])).unwrap();
        assert_eq!(opts.season_id, 33);
        assert_eq!(opts.table_path, Some(PathBuf::from("out/t.csv")));
        assert_eq!(opts.data_dir, PathBuf::from("cache"));
    }

    #[test]
    fn unknown_flag_is_rejected() {
        assert!(parse_args(strings(&["--season", "33", "--frobnicate"])).is_err());
    }
}

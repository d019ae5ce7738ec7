use std::collections::HashSet;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Result};
use chrono::{Duration, Local, NaiveDate};
use clap::{Arg, ArgAction, ArgMatches, Command};
use itertools::Itertools;
use strum::IntoEnumIterator;

use crate::format_config::Format;
use crate::models::decklist::Zone;
use crate::opt::RunConfig;

const DEFAULT_WINDOW_DAYS: i64 = 7;
const DEFAULT_TOP: usize = 20;

/// What to print once the decks are classified.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Report {
        top: usize,
    },
    Similar {
        top: usize,
    },
    Cards {
        archetype: Option<String>,
        zone: Zone,
        include: HashSet<String>,
        include_zone: Zone,
        exclude: HashSet<String>,
        exclude_zone: Zone,
    },
}

#[derive(Debug)]
pub struct Invocation {
    pub run: RunConfig,
    pub index: Option<PathBuf>,
    pub catalog: Option<PathBuf>,
    pub cache_dir: Option<PathBuf>,
    pub query: Query,
}

pub fn cli() -> Command {
    const COMMAND_TEMPLATE: &str = "\
        {about-with-newline}\n\
        {usage-heading}\n    {usage}\n\
        \n\
        {all-args}{after-help}\
    ";

    Command::new("deck-claw")
        .about("Classifies and compares tournament decklists")
        .arg_required_else_help(true)
        .subcommand_required(true)
        .subcommand_value_name("COMMAND")
        .subcommand_help_heading("COMMANDS")
        .subcommand(
            Command::new("report")
                .about("Metagame breakdown and most played cards")
                .help_template(COMMAND_TEMPLATE)
                .args(run_args())
                .arg(top_arg()),
        )
        .subcommand(
            Command::new("similar")
                .about("Most similar deck pairs")
                .help_template(COMMAND_TEMPLATE)
                .args(run_args())
                .arg(top_arg()),
        )
        .subcommand(
            Command::new("cards")
                .about("Average card counts for a slice of the field")
                .help_template(COMMAND_TEMPLATE)
                .args(run_args())
                .arg(
                    Arg::new("archetype")
                        .long("archetype")
                        .help("Deck name or archetype label, e.g. \"Dimir Midrange\""),
                )
                .arg(zone_arg("zone", "main", "Zone to count cards in"))
                .arg(
                    Arg::new("include")
                        .long("include")
                        .action(ArgAction::Append)
                        .help("Card every selected deck must play (repeatable)"),
                )
                .arg(zone_arg("include-zone", "main", "Zone checked for --include"))
                .arg(
                    Arg::new("exclude")
                        .long("exclude")
                        .action(ArgAction::Append)
                        .help("Card no selected deck may play (repeatable)"),
                )
                .arg(zone_arg("exclude-zone", "side", "Zone checked for --exclude")),
        )
}

fn run_args() -> Vec<Arg> {
    let formats = Format::iter().map(|format| format.slug()).join(", ");
    vec![
        Arg::new("format")
            .long("format")
            .short('f')
            .default_value("standard")
            .value_parser(parse_format)
            .help(format!("One of: {}", formats)),
        Arg::new("from")
            .long("from")
            .value_parser(parse_date)
            .help("First tournament date, YYYY-MM-DD (default: a week before --to)"),
        Arg::new("to")
            .long("to")
            .value_parser(parse_date)
            .help("Last tournament date, YYYY-MM-DD (default: today)"),
        Arg::new("skip")
            .long("skip")
            .value_delimiter(',')
            .action(ArgAction::Append)
            .help("Comma separated tournament ids to leave out"),
        Arg::new("index")
            .long("index")
            .value_parser(clap::value_parser!(PathBuf))
            .help("Tournament index JSON file"),
        Arg::new("catalog")
            .long("catalog")
            .value_parser(clap::value_parser!(PathBuf))
            .help("Reference card bulk data JSON file"),
        Arg::new("cache-dir")
            .long("cache-dir")
            .value_parser(clap::value_parser!(PathBuf))
            .help("Directory holding cached decklists"),
    ]
}

fn top_arg() -> Arg {
    Arg::new("top")
        .long("top")
        .short('n')
        .default_value("20")
        .value_parser(clap::value_parser!(usize))
        .help("Number of rows to print")
}

fn zone_arg(name: &'static str, default: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .default_value(default)
        .value_parser(parse_zone)
        .help(help)
}

fn parse_format(s: &str) -> Result<Format, String> {
    Format::from_str(s).map_err(|_| format!("unknown format '{}'", s))
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("'{}': {}", s, e))
}

fn parse_zone(s: &str) -> Result<Zone, String> {
    Zone::from_str(s).map_err(|_| format!("unknown zone '{}', expected main or side", s))
}

pub fn parse(matches: &ArgMatches) -> Result<Invocation> {
    parse_with_today(matches, Local::now().date_naive())
}

fn parse_with_today(matches: &ArgMatches, today: NaiveDate) -> Result<Invocation> {
    let (name, sub) = match matches.subcommand() {
        Some(subcommand) => subcommand,
        None => bail!("a subcommand is required"),
    };

    let format = sub.get_one::<Format>("format").copied().unwrap_or(Format::Standard);
    let end = sub.get_one::<NaiveDate>("to").copied().unwrap_or(today);
    let start = sub
        .get_one::<NaiveDate>("from")
        .copied()
        .unwrap_or(end - Duration::days(DEFAULT_WINDOW_DAYS));
    if start > end {
        bail!("--from {} is after --to {}", start, end);
    }

    let skip = strings(sub, "skip")
        .into_iter()
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty());
    let run = RunConfig::new(format, start, end).with_skip(skip);

    let query = match name {
        "report" => Query::Report { top: top(sub) },
        "similar" => Query::Similar { top: top(sub) },
        "cards" => Query::Cards {
            archetype: sub.get_one::<String>("archetype").cloned(),
            zone: zone(sub, "zone"),
            include: strings(sub, "include").into_iter().collect(),
            include_zone: zone(sub, "include-zone"),
            exclude: strings(sub, "exclude").into_iter().collect(),
            exclude_zone: zone(sub, "exclude-zone"),
        },
        other => bail!("unknown command '{}'", other),
    };

    Ok(Invocation {
        run,
        index: sub.get_one::<PathBuf>("index").cloned(),
        catalog: sub.get_one::<PathBuf>("catalog").cloned(),
        cache_dir: sub.get_one::<PathBuf>("cache-dir").cloned(),
        query,
    })
}

fn strings(matches: &ArgMatches, id: &str) -> Vec<String> {
    matches
        .get_many::<String>(id)
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}

fn top(matches: &ArgMatches) -> usize {
    matches.get_one::<usize>("top").copied().unwrap_or(DEFAULT_TOP)
}

fn zone(matches: &ArgMatches, id: &str) -> Zone {
    matches.get_one::<Zone>(id).copied().unwrap_or(Zone::Main)
}

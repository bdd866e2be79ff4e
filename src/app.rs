use std::io::Read;

use chrono::NaiveDate;
use crate::cli::{Cli, Commands, TextArgs};
use crate::config::Config;
use crate::error::AppError;
use crate::ledger::WeeklyLedger;
use crate::menu::{MenuRecord, week_key};
use crate::output::{output_check_json, output_records_json, print_records_table};
use crate::pipeline::{Pipeline, RunOutcome};
use crate::source::{TwitterFeed, VisionOcr};
use crate::utils::{Timezone, parse_date};

pub(crate) struct CommandContext<'a> {
    pub(crate) cli: &'a Cli,
    pub(crate) config: &'a Config,
    pub(crate) timezone: Timezone,
}

impl CommandContext<'_> {
    fn pipeline(&self) -> Pipeline {
        Pipeline::new(self.cli.ledger_path(), self.cli.slot_check())
    }

    fn reference_date(&self, date: Option<&str>) -> Result<NaiveDate, AppError> {
        match date {
            Some(raw) => parse_date(raw),
            None => Ok(self.timezone.today()),
        }
    }

    fn print_records(&self, title: &str, records: &[MenuRecord]) -> Result<(), AppError> {
        if self.cli.json {
            println!("{}", output_records_json(records)?);
        } else {
            print_records_table(title, records, self.cli.use_color());
        }
        Ok(())
    }

    fn report(&self, outcome: &RunOutcome) -> Result<(), AppError> {
        match outcome {
            RunOutcome::AlreadyRecorded { week_key } => {
                if self.cli.json {
                    println!("{}", output_check_json(week_key, true)?);
                } else {
                    println!("Week {week_key} is already recorded.");
                }
                Ok(())
            }
            RunOutcome::Recorded { records } => self.print_records("Recorded", records),
        }
    }
}

fn read_text(args: &TextArgs) -> Result<String, AppError> {
    if let Some(path) = &args.file {
        return std::fs::read_to_string(path).map_err(AppError::Input);
    }
    match args.text.as_deref() {
        Some(text) if text != "-" => Ok(text.to_string()),
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .map_err(AppError::Input)?;
            Ok(text)
        }
    }
}

fn handle_run(ctx: &CommandContext<'_>) -> Result<(), AppError> {
    let feed = TwitterFeed::new(&ctx.config.feed)?;
    let ocr = VisionOcr::new(&ctx.config.ocr)?;
    let outcome = ctx.pipeline().run(&feed, &ocr, ctx.timezone)?;
    ctx.report(&outcome)
}

fn handle_ingest(args: &TextArgs, ctx: &CommandContext<'_>) -> Result<(), AppError> {
    let reference = ctx.reference_date(args.date.as_deref())?;
    let outcome = ctx.pipeline().record_week(reference, || read_text(args))?;
    ctx.report(&outcome)
}

fn handle_parse(args: &TextArgs, ctx: &CommandContext<'_>) -> Result<(), AppError> {
    let reference = ctx.reference_date(args.date.as_deref())?;
    let text = read_text(args)?;
    let records = ctx.pipeline().extract_records(&text, reference)?;
    ctx.print_records("Parsed (not recorded)", &records)
}

fn handle_check(date: Option<&str>, ctx: &CommandContext<'_>) -> Result<(), AppError> {
    let key = week_key(ctx.reference_date(date)?);
    let recorded = WeeklyLedger::open(ctx.cli.ledger_path())?.is_recorded(&key)?;
    if ctx.cli.json {
        println!("{}", output_check_json(&key, recorded)?);
    } else if recorded {
        println!("Week {key} is recorded.");
    } else {
        println!("Week {key} is not recorded.");
    }
    Ok(())
}

fn handle_list(ctx: &CommandContext<'_>) -> Result<(), AppError> {
    let rows = WeeklyLedger::open(ctx.cli.ledger_path())?.rows()?;
    if rows.is_empty() && !ctx.cli.json {
        println!("No weekly menus recorded yet.");
        return Ok(());
    }
    ctx.print_records("Weekly Menus", &rows)
}

fn handle_init(ctx: &CommandContext<'_>) -> Result<(), AppError> {
    let path = ctx.cli.ledger_path();
    WeeklyLedger::create(&path)?;
    println!("Created {}", path.display());
    Ok(())
}

pub(crate) fn dispatch(ctx: &CommandContext<'_>) -> Result<(), AppError> {
    match &ctx.cli.command {
        None | Some(Commands::Run) => handle_run(ctx),
        Some(Commands::Ingest(args)) => handle_ingest(args, ctx),
        Some(Commands::Parse(args)) => handle_parse(args, ctx),
        Some(Commands::Check { date }) => handle_check(date.as_deref(), ctx),
        Some(Commands::List) => handle_list(ctx),
        Some(Commands::Init) => handle_init(ctx),
    }
}

mod cli;
mod output;

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use clap::Parser;
use log::info;

use cli::{Cli, Command};
use taskpad_core::projection::calendar::month_containing;
use taskpad_core::{
    core_version, init_from_config, month_range, CoreConfig, NewTask, Priority, SortSpec,
    SqliteTaskStore, TaskFilter, TaskId, TaskPatch, TaskService,
};

fn parse_priority(value: &str) -> Result<Priority> {
    Priority::parse(value)
        .with_context(|| format!("invalid priority '{value}' (expected low, medium, high or none)"))
}

fn parse_deadline(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid deadline '{value}' (expected YYYY-MM-DD)"))
}

fn parse_month(value: &str) -> Result<(NaiveDate, NaiveDate)> {
    let Some((year, month)) = value.trim().split_once('-') else {
        bail!("invalid month '{value}' (expected YYYY-MM)");
    };
    let year: i32 = year
        .parse()
        .with_context(|| format!("invalid year in '{value}'"))?;
    let month: u32 = month
        .parse()
        .with_context(|| format!("invalid month in '{value}'"))?;
    month_range(year, month).with_context(|| format!("month out of range: '{value}'"))
}

fn open_service(config: &CoreConfig) -> Result<TaskService<SqliteTaskStore>> {
    TaskService::open_sqlite(&config.db_path)
        .with_context(|| format!("failed to open task store {}", config.db_path.display()))
}

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Command::Version = cli.command {
        println!("taskpad {}", core_version());
        return Ok(());
    }

    let config = CoreConfig::resolve(cli.db, cli.log_dir, None)?;
    if let Err(err) = init_from_config(&config) {
        eprintln!("warning: logging disabled: {err}");
    }
    let mut service = open_service(&config)?;
    info!(
        "event=cli_start module=cli status=ok tasks={}",
        service.tasks().len()
    );

    match cli.command {
        Command::Add {
            title,
            desc,
            assignee,
            priority,
            deadline,
            category,
        } => {
            let priority = priority.as_deref().map(parse_priority).transpose()?;
            let input = NewTask {
                title,
                description: desc,
                assignee,
                priority: priority.unwrap_or_default(),
                deadline: deadline.as_deref().map(parse_deadline).transpose()?,
                category,
            };
            let id = service.create_task(input)?;
            println!("{id}");
            eprintln!("Added task '{id}'");
        }

        Command::Edit {
            id,
            title,
            desc,
            assignee,
            priority,
            deadline,
            clear_deadline,
            category,
        } => {
            let deadline = if clear_deadline {
                Some(None)
            } else {
                deadline.as_deref().map(parse_deadline).transpose()?.map(Some)
            };
            let patch = TaskPatch {
                title,
                description: desc,
                assignee,
                priority: priority.as_deref().map(parse_priority).transpose()?,
                deadline,
                category,
            };
            if patch.is_empty() {
                bail!("nothing to edit; pass at least one field");
            }
            let id = TaskId::new(id);
            service.update_task(&id, &patch)?;
            eprintln!("Updated '{id}'");
        }

        Command::Toggle { id } => {
            let id = TaskId::new(id);
            if service.toggle_task(&id)? {
                eprintln!("Marked '{id}' as completed");
            } else {
                eprintln!("Reopened '{id}'");
            }
        }

        Command::Rm { id } => {
            let id = TaskId::new(id);
            if service.delete_task(&id)? {
                eprintln!("Removed '{id}'");
            } else {
                eprintln!("No task '{id}'; nothing removed");
            }
        }

        Command::List { filter, sort, json } => {
            let filter = TaskFilter::parse(&filter).with_context(|| {
                format!("invalid filter '{filter}' (expected all, active or completed)")
            })?;
            let sort = SortSpec::parse(&sort)
                .with_context(|| format!("invalid sort '{sort}' (expected <key>-<asc|desc>)"))?;
            service.set_filter(filter);
            service.set_sort(sort);

            let tasks = service.visible_tasks();
            let now = Utc::now();
            if json {
                let listed = output::listed_tasks(&tasks, now);
                println!("{}", serde_json::to_string_pretty(&listed)?);
            } else if tasks.is_empty() {
                eprintln!("No tasks");
            } else {
                print!("{}", output::format_task_list(&tasks, now));
            }
        }

        Command::Note { id, text } => {
            let id = TaskId::new(id);
            service.select_task(&id)?;
            service.edit_note(&text)?;
            eprintln!("Saved note for '{id}'");
        }

        Command::Calendar { month, json } => {
            let (start, end) = match month.as_deref() {
                Some(value) => parse_month(value)?,
                None => month_containing(Utc::now().date_naive())
                    .context("current date is outside the supported calendar range")?,
            };
            let summary = service.period_summary(start, end);
            let events: Vec<_> = service
                .calendar_events()
                .into_iter()
                .filter(|event| event.date >= start && event.date < end)
                .collect();
            if json {
                let view = output::CalendarView {
                    summary: &summary,
                    events: &events,
                };
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print!("{}", output::format_calendar(&summary, &events));
            }
        }

        // Printed above without touching the store.
        Command::Version => {}
    }

    Ok(())
}

use clap::{CommandFactory, Parser};
use std::io::{self, BufRead};
use tabled::{Table, Tabled, settings::Style};
use tasklist_core::config::{self, Palette};
use tasklist_core::error::AppError;
use tasklist_core::model::{Filter, Task, TaskUpdate};
use tasklist_core::store::TaskStore;
use time::format_description::well_known::Rfc3339;

mod cli;

use cli::{Cli, Command};

fn status_label(completed: bool) -> &'static str {
    if completed { "completed" } else { "pending" }
}

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Created")]
    created: String,
    #[tabled(rename = "Description")]
    description: String,
}

fn task_row(task: &Task, palette: &Palette) -> Result<TaskRow, AppError> {
    let created = task
        .created_at
        .format(&Rfc3339)
        .map_err(|err| AppError::invalid_data(err.to_string()))?;
    let status = if task.completed {
        palette.mutedize(status_label(true))
    } else {
        palette.accentize(status_label(false))
    };

    Ok(TaskRow {
        id: task.id.clone(),
        title: task.title.clone(),
        status,
        created,
        description: task.description.clone(),
    })
}

fn print_tasks_table(tasks: &[Task], palette: &Palette) -> Result<(), AppError> {
    if tasks.is_empty() {
        println!("No tasks.");
        return Ok(());
    }

    let rows = tasks
        .iter()
        .map(|task| task_row(task, palette))
        .collect::<Result<Vec<_>, _>>()?;
    println!("{}", Table::new(rows).with(Style::sharp()));
    Ok(())
}

fn print_tasks_json(tasks: &[Task]) -> Result<(), AppError> {
    let payload =
        serde_json::to_value(tasks).map_err(|err| AppError::invalid_data(err.to_string()))?;
    println!("{payload}");
    Ok(())
}

fn print_task_json(task: &Task) -> Result<(), AppError> {
    let payload =
        serde_json::to_value(task).map_err(|err| AppError::invalid_data(err.to_string()))?;
    println!("{payload}");
    Ok(())
}

fn find_task(store: &TaskStore, id: &str) -> Result<Task, AppError> {
    store
        .task_by_id(id.trim())
        .cloned()
        .ok_or_else(|| AppError::invalid_input("task not found"))
}

fn run_command(store: &mut TaskStore, cli: Cli, palette: &Palette) -> Result<(), AppError> {
    match cli.command {
        Command::Add { title, description } => {
            let Some(task) = store.add(&title, description.as_deref()) else {
                return Err(AppError::invalid_input("title is required"));
            };

            if cli.json {
                print_task_json(&task)?;
            } else {
                println!("Added task: {} ({})", task.title, task.id);
            }
        }
        Command::List { filter } => {
            if let Some(name) = filter {
                store.set_filter(Filter::from_name(&name));
            }

            let tasks = store.filtered_tasks();
            if cli.json {
                print_tasks_json(&tasks)?;
            } else {
                print_tasks_table(&tasks, palette)?;
            }
        }
        Command::Show { id } => {
            let task = find_task(store, &id)?;
            if cli.json {
                print_task_json(&task)?;
            } else {
                let created = task
                    .created_at
                    .format(&Rfc3339)
                    .map_err(|err| AppError::invalid_data(err.to_string()))?;
                println!("id:          {}", task.id);
                println!("title:       {}", task.title);
                println!("status:      {}", status_label(task.completed));
                println!("created:     {created}");
                println!("description: {}", task.description);
            }
        }
        Command::Edit {
            id,
            title,
            description,
            completed,
        } => {
            let update = TaskUpdate {
                title,
                description,
                completed,
            };
            if update.is_empty() {
                return Err(AppError::invalid_input("nothing to update"));
            }

            if !store.update(id.trim(), update) {
                return Err(AppError::invalid_input("task not found"));
            }

            let task = find_task(store, &id)?;
            if cli.json {
                print_task_json(&task)?;
            } else {
                println!("Updated task: {} ({})", task.title, task.id);
            }
        }
        Command::Toggle { id } => {
            if !store.toggle(id.trim()) {
                return Err(AppError::invalid_input("task not found"));
            }

            let task = find_task(store, &id)?;
            if cli.json {
                print_task_json(&task)?;
            } else {
                println!(
                    "Toggled task: {} ({}) is now {}",
                    task.title,
                    task.id,
                    status_label(task.completed)
                );
            }
        }
        Command::Delete { id } => {
            let task = find_task(store, &id)?;
            store.remove(&task.id);
            if cli.json {
                print_task_json(&task)?;
            } else {
                println!("Deleted task: {} ({})", task.title, task.id);
            }
        }
        Command::CompleteAll => {
            store.mark_all_completed();
            if cli.json {
                print_tasks_json(&store.filtered_tasks())?;
            } else {
                println!("Marked {} task(s) as completed", store.total_count());
            }
        }
        Command::Prune => {
            let before = store.total_count();
            store.delete_completed();
            if cli.json {
                print_tasks_json(&store.filtered_tasks())?;
            } else {
                println!("Deleted {} completed task(s)", before - store.total_count());
            }
        }
        Command::Clear => {
            let removed = store.total_count();
            store.clear();
            if cli.json {
                print_tasks_json(store.tasks())?;
            } else {
                println!("Deleted all {removed} task(s)");
            }
        }
        Command::Stats => {
            if cli.json {
                let payload = serde_json::json!({
                    "total": store.total_count(),
                    "pending": store.pending_count(),
                    "completed": store.completed_count(),
                    "all_completed": store.all_completed(),
                    "has_completed": store.has_completed(),
                });
                println!("{payload}");
            } else {
                println!(
                    "total: {}  pending: {}  completed: {}",
                    palette.accentize(&store.total_count().to_string()),
                    palette.accentize(&store.pending_count().to_string()),
                    palette.mutedize(&store.completed_count().to_string()),
                );
                println!("all completed: {}", store.all_completed());
                println!("has completed: {}", store.has_completed());
            }
        }
        Command::Filter { name } => {
            store.set_filter(Filter::from_name(&name));
            println!("Filter set to {}", store.filter().name());
        }
    }

    Ok(())
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '\\' if in_quotes => match chars.next() {
                Some(escaped @ ('"' | '\\')) => current.push(escaped),
                Some(other) => {
                    current.push('\\');
                    current.push(other);
                }
                None => current.push('\\'),
            },
            '"' => in_quotes = !in_quotes,
            _ if ch.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    args.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(ch),
        }
    }

    if in_quotes {
        return Err(AppError::invalid_input("unterminated quote in command"));
    }

    if !current.is_empty() {
        args.push(current);
    }

    Ok(args)
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
}

fn load_palette() -> Palette {
    let load = config::load_config_with_fallback();
    if let Some(err) = load.error {
        eprintln!("WARNING: {err}");
    }
    config::palette_for_theme(load.config.theme.as_deref())
}

/// One store per session: hydrated once, mutated by each line, dropped
/// on exit. The persisted snapshot is the only durable artifact.
fn run_interactive() -> Result<(), AppError> {
    let palette = load_palette();
    let mut store = TaskStore::from_env();
    store.initialize();

    let mut input = String::new();
    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();

    loop {
        input.clear();
        let bytes = stdin_lock
            .read_line(&mut input)
            .map_err(|err| AppError::io(err.to_string()))?;

        if bytes == 0 {
            break;
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        if line == "help" || line == "?" {
            print_help();
            continue;
        }

        let args = match split_command_line(line) {
            Ok(args) => args,
            Err(err) => {
                eprintln!("ERROR: {err}");
                continue;
            }
        };

        if args.is_empty() {
            continue;
        }

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push("tasklist".to_string());
        argv.extend(args);

        let cli = match Cli::try_parse_from(argv) {
            Ok(cli) => cli,
            Err(err) => {
                eprintln!("ERROR: {}", normalize_parse_error(err));
                continue;
            }
        };

        if let Err(err) = run_command(&mut store, cli, &palette) {
            eprintln!("ERROR: {err}");
        }
    }

    Ok(())
}

fn main() {
    let mut args = std::env::args_os();
    args.next();
    if args.next().is_none() {
        if let Err(err) = run_interactive() {
            eprintln!("ERROR: {err}");
            std::process::exit(1);
        }
        return;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    let palette = load_palette();
    let mut store = TaskStore::from_env();
    store.initialize();

    if let Err(err) = run_command(&mut store, cli, &palette) {
        eprintln!("ERROR: {err}");
        std::process::exit(1);
    }
}

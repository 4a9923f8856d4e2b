//! Administrative command line for the reflection journal store.
//!
//! Every command runs bootstrap seeding first, so a fresh database always
//! starts with an administrator.

use clap::{Parser, Subcommand};
use reflection_note_core::{
    BootstrapSeeder, ClassRepository, CoreConfig, RecordStore, StudentImport, UserRepository,
};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "reflection-note", version, about = "Reflection journal store administration")]
struct Cli {
    /// SQLite database file; omitted means a throwaway in-memory store.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Absolute directory for rolling log files.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[arg(long, global = true, default_value = reflection_note_core::default_log_level())]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Seed the default administrator and sample data if missing.
    Init,
    /// List every account.
    Users,
    /// List every class.
    Classes,
    AddTeacher {
        name: String,
        login_id: String,
        password_hash: String,
    },
    Deactivate {
        user_id: String,
    },
    Reactivate {
        user_id: String,
    },
    /// Restore the default password and force a first-login change.
    ResetPassword {
        user_id: String,
    },
    /// Delete a class; its students stay with no class.
    DeleteClass {
        class_id: String,
    },
    /// Import students given as `STUDENT_ID:NAME` pairs.
    ImportStudents {
        class_id: String,
        #[arg(required = true, value_parser = parse_student_entry)]
        entries: Vec<(String, String)>,
    },
}

fn parse_student_entry(raw: &str) -> Result<(String, String), String> {
    let (student_id, name) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected STUDENT_ID:NAME, got `{raw}`"))?;
    let student_id = student_id.trim();
    if student_id.is_empty() {
        return Err(format!("student id is empty in `{raw}`"));
    }
    Ok((student_id.to_string(), name.trim().to_string()))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("event=cli_command module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = CoreConfig {
        db_path: cli.db,
        log_level: cli.log_level,
        log_dir: cli.log_dir,
    }
    .validate()?;
    config.init_logging()?;

    let store = config.open_store()?;
    let seeded = BootstrapSeeder::new(store.as_ref()).init()?;
    execute(store.as_ref(), cli.command, seeded)
}

fn execute(store: &dyn RecordStore, command: Command, seeded: bool) -> Result<(), Box<dyn Error>> {
    let users = UserRepository::new(store);
    let classes = ClassRepository::new(store);

    match command {
        Command::Init => {
            println!("{}", if seeded { "seeded" } else { "already initialized" });
        }
        Command::Users => {
            for user in users.list_users()? {
                println!(
                    "{}\t{:?}\t{}\t{}\t{:?}\t{}",
                    user.id,
                    user.role,
                    user.name,
                    user.student_id.as_deref().unwrap_or(&user.login_id),
                    user.status,
                    user.class_id.as_deref().unwrap_or("-"),
                );
            }
        }
        Command::Classes => {
            for class in classes.list_classes()? {
                println!(
                    "{}\t{}\t{}\tteacher={}\ttarget_days={}",
                    class.id, class.name, class.year, class.teacher_id, class.target_days
                );
            }
        }
        Command::AddTeacher {
            name,
            login_id,
            password_hash,
        } => {
            let teacher = users.add_teacher(name, login_id, password_hash)?;
            println!("{}", teacher.id);
        }
        Command::Deactivate { user_id } => users.deactivate_user(&user_id)?,
        Command::Reactivate { user_id } => users.reactivate_user(&user_id)?,
        Command::ResetPassword { user_id } => users.reset_user_password(&user_id)?,
        Command::DeleteClass { class_id } => classes.delete_class(&class_id)?,
        Command::ImportStudents { class_id, entries } => {
            let rows: Vec<StudentImport> = entries
                .into_iter()
                .map(|(student_id, name)| StudentImport {
                    name,
                    student_id,
                    class_id: class_id.clone(),
                })
                .collect();
            let report = users.bulk_upsert_students(&rows)?;
            println!("admitted={}", report.count);
            for duplicate in report.duplicates {
                println!("skipped duplicate student id {duplicate}");
            }
        }
    }
    Ok(())
}

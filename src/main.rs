use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use dialoguer::{Confirm, Input};
use dotenvy::dotenv;
use groupwise::cli::render;
use groupwise::cli::resolve_group;
use groupwise::cli::seeder::{self, SeedConfig};
use groupwise::groupwise_config::{LogConfig, RulesConfig, StorageConfig};
use groupwise::groupwise_models::{
    CreateGroupDto, CreateStudentDto, UpdateGroupDto, UpdateStudentDto,
};
use groupwise::logging::init_tracing;
use groupwise::modules::groups::service::parse_capacity;
use groupwise::modules::{GroupService, MembershipService, StudentService};
use groupwise::state::{AppState, init_app_state};

#[derive(Parser)]
#[command(name = "groupwise")]
#[command(about = "Groupwise - manage students and work groups", long_about = None)]
struct Cli {
    /// Registry file (overrides GROUPWISE_DATA_FILE)
    #[arg(long, global = true)]
    data_file: Option<PathBuf>,

    /// Apply changes in memory only
    #[arg(long, global = true)]
    dry_run: bool,

    /// Skip confirmation prompts
    #[arg(short = 'y', long, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage students
    #[command(subcommand)]
    Student(StudentCommand),
    /// Manage groups and their members
    #[command(subcommand)]
    Group(GroupCommand),
    /// List students without a group
    Unassigned,
    /// Fill the registry with fake students and groups
    Seed {
        /// Number of groups to create
        #[arg(short = 'g', long, default_value = "3")]
        groups: usize,

        /// Number of students to create
        #[arg(short = 's', long, default_value = "10")]
        students: usize,

        /// Maximum size of each seeded group
        #[arg(long, default_value = "4")]
        max: i64,

        /// Minimum size of each seeded group (default: configured minimum)
        #[arg(long)]
        min: Option<i64>,
    },
}

#[derive(Subcommand)]
enum StudentCommand {
    /// Register a student
    Add {
        number: Option<String>,
        #[arg(short = 'n', long)]
        name: Option<String>,
        #[arg(short = 'e', long)]
        email: Option<String>,
    },
    /// Change a student's name or email
    Edit {
        number: String,
        #[arg(short = 'n', long)]
        name: Option<String>,
        #[arg(short = 'e', long)]
        email: Option<String>,
    },
    /// Remove a student
    Remove { number: String },
    /// List all students
    List,
    /// Search by name, number, or email
    Search { query: Option<String> },
    /// Show one student
    Show { number: String },
    /// Move a student to another group
    Transfer {
        number: String,
        /// Destination group (id or name)
        group: String,
    },
}

#[derive(Subcommand)]
enum GroupCommand {
    /// Create a group
    Add(GroupArgs),
    /// Rename a group or change its capacities
    Edit {
        /// Group id or name
        group: String,
        #[command(flatten)]
        args: GroupArgs,
    },
    /// Remove a group and unassign its members
    Remove { group: String },
    /// List all groups
    List,
    /// Search groups by name
    Search { query: Option<String> },
    /// Show a group and its members
    Show { group: String },
    /// Add a student to a group
    Enroll { group: String, number: String },
    /// Take a student out of a group
    Unenroll { group: String, number: String },
}

#[derive(Args)]
struct GroupArgs {
    /// Group name
    name: Option<String>,
    #[arg(long)]
    max: Option<i64>,
    #[arg(long)]
    min: Option<i64>,
}

fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();

    let _guard = init_tracing(&LogConfig::from_env());

    let mut storage = StorageConfig::from_env();
    if let Some(path) = cli.data_file.clone() {
        storage.data_file = path;
    }
    let mut state = init_app_state(storage, RulesConfig::from_env(), cli.dry_run);

    run(&mut state, cli.command, cli.yes)
}

fn run(state: &mut AppState, command: Commands, yes: bool) -> Result<()> {
    match command {
        Commands::Student(cmd) => handle_student(state, cmd, yes),
        Commands::Group(cmd) => handle_group(state, cmd, yes),
        Commands::Unassigned => {
            let students = StudentService::get_students_without_group(state);
            print!("{}", render::student_table(&students, state.registry()));
            Ok(())
        }
        Commands::Seed {
            groups,
            students,
            max,
            min,
        } => {
            let config = SeedConfig {
                groups,
                students,
                max_capacity: max,
                min_capacity: min,
            };
            let report = seeder::seed(state, &config);
            println!(
                "✅ Created {} groups and {} students ({} assigned, {} skipped)",
                report.groups_created,
                report.students_created,
                report.students_assigned,
                report.skipped
            );
            Ok(())
        }
    }
}

fn handle_student(state: &mut AppState, cmd: StudentCommand, yes: bool) -> Result<()> {
    match cmd {
        StudentCommand::Add {
            number,
            name,
            email,
        } => {
            let dto = CreateStudentDto {
                student_number: prompt_missing(number, "Student number")?,
                name: prompt_missing(name, "Name")?,
                email: prompt_missing(email, "Email")?,
            };
            let student = StudentService::create_student(state, dto)?;
            println!("✅ Registered {}", student);
        }
        StudentCommand::Edit {
            number,
            name,
            email,
        } => {
            let current = StudentService::get_student(state, &number)?;
            let dto = UpdateStudentDto {
                name: prompt_with_default(name, "Name", &current.name)?,
                email: prompt_with_default(email, "Email", &current.email)?,
            };
            let student = StudentService::update_student(state, &current.student_number, dto)?;
            println!("✅ Updated {}", student);
        }
        StudentCommand::Remove { number } => {
            let student = StudentService::get_student(state, &number)?;
            if confirm(&format!("Remove {}?", student), yes)? {
                StudentService::delete_student(state, &student.student_number)?;
                println!("✅ Removed {}", student);
            }
        }
        StudentCommand::List => {
            let students = StudentService::get_all_students(state);
            print!("{}", render::student_table(&students, state.registry()));
        }
        StudentCommand::Search { query } => {
            let students = StudentService::search_students(state, query.as_deref().unwrap_or(""));
            print!("{}", render::student_table(&students, state.registry()));
        }
        StudentCommand::Show { number } => {
            let student = StudentService::get_student(state, &number)?;
            print!("{}", render::student_detail(&student, state.registry()));
        }
        StudentCommand::Transfer { number, group } => {
            let student = StudentService::get_student(state, &number)?;
            let group_id = resolve_group(state, &group)?;
            MembershipService::transfer_student(state, &student.student_number, group_id)?;
            let group = GroupService::get_group(state, group_id)?;
            println!("✅ Moved {} to {}", student, group);
        }
    }
    Ok(())
}

fn handle_group(state: &mut AppState, cmd: GroupCommand, yes: bool) -> Result<()> {
    match cmd {
        GroupCommand::Add(args) => {
            let dto = CreateGroupDto {
                name: prompt_missing(args.name, "Group name")?,
                max_capacity: match args.max {
                    Some(max) => max,
                    None => prompt_number("Maximum capacity", None)?,
                },
                min_capacity: args.min,
            };
            let group = GroupService::create_group(state, dto)?;
            println!("✅ Created {} [{}]", group, group.group_id);
        }
        GroupCommand::Edit { group, args } => {
            let group_id = resolve_group(state, &group)?;
            let current = GroupService::get_group(state, group_id)?;
            let dto = UpdateGroupDto {
                name: prompt_with_default(args.name, "Group name", &current.name)?,
                max_capacity: match args.max {
                    Some(max) => max,
                    None => prompt_number("Maximum capacity", Some(current.max_capacity))?,
                },
                min_capacity: match args.min {
                    Some(min) => min,
                    None => prompt_number("Minimum capacity", Some(current.min_capacity))?,
                },
            };
            let updated = GroupService::update_group(state, group_id, dto)?;
            println!("✅ Updated {}", updated);
        }
        GroupCommand::Remove { group } => {
            let group_id = resolve_group(state, &group)?;
            let current = GroupService::get_group(state, group_id)?;
            let prompt = format!(
                "Remove {}? Its {} member(s) will be unassigned.",
                current,
                current.current_size()
            );
            if confirm(&prompt, yes)? {
                GroupService::delete_group(state, group_id)?;
                println!("✅ Removed {}", current.name);
            }
        }
        GroupCommand::List => {
            let groups = GroupService::get_all_groups(state);
            print!("{}", render::group_table(&groups));
        }
        GroupCommand::Search { query } => {
            let groups = GroupService::search_groups(state, query.as_deref().unwrap_or(""));
            print!("{}", render::group_table(&groups));
        }
        GroupCommand::Show { group } => {
            let group_id = resolve_group(state, &group)?;
            let current = GroupService::get_group(state, group_id)?;
            let members = MembershipService::get_group_members(state, group_id)?;
            print!("{}", render::group_detail(&current, &members));
        }
        GroupCommand::Enroll { group, number } => {
            let group_id = resolve_group(state, &group)?;
            let student = StudentService::get_student(state, &number)?;
            MembershipService::add_student_to_group(state, &student.student_number, group_id)?;
            let group = GroupService::get_group(state, group_id)?;
            println!("✅ Added {} to {}", student, group);
        }
        GroupCommand::Unenroll { group, number } => {
            let group_id = resolve_group(state, &group)?;
            let student = StudentService::get_student(state, &number)?;
            let prompt = format!("Remove {} from the group?", student);
            if confirm(&prompt, yes)? {
                MembershipService::remove_student_from_group(
                    state,
                    &student.student_number,
                    group_id,
                )?;
                println!("✅ Removed {} from the group", student);
            }
        }
    }
    Ok(())
}

fn prompt_missing(value: Option<String>, prompt: &str) -> Result<String> {
    match value {
        Some(value) => Ok(value),
        None => Ok(Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?),
    }
}

fn prompt_with_default(value: Option<String>, prompt: &str, current: &str) -> Result<String> {
    match value {
        Some(value) => Ok(value),
        None => Ok(Input::new()
            .with_prompt(prompt)
            .default(current.to_string())
            .interact_text()?),
    }
}

fn prompt_number(prompt: &str, current: Option<u32>) -> Result<i64> {
    let input = Input::<String>::new().with_prompt(prompt);
    let raw = match current {
        Some(current) => input.default(current.to_string()).interact_text()?,
        None => input.interact_text()?,
    };
    Ok(parse_capacity(&raw)?)
}

fn confirm(prompt: &str, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}

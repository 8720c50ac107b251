use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for punchclock:
/// reconcile time-clock punches against schedules, holidays and justifications.
#[derive(Parser)]
#[command(
    name = "punchclock",
    version = env!("CARGO_PKG_VERSION"),
    about = "Time-and-attendance punch reconciliation on top of SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Inspect the configuration file
    Config {
        #[arg(long = "print", help = "Print the effective configuration")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,

        #[arg(long = "limit", help = "Only the most recent N rows")]
        limit: Option<usize>,
    },

    /// Manage employees
    Employee {
        #[command(subcommand)]
        action: EmployeeAction,
    },

    /// Manage departments and reconcile them as a whole
    Department {
        #[command(subcommand)]
        action: DepartmentAction,
    },

    /// Record, list or delete punches
    Punch {
        #[command(subcommand)]
        action: PunchAction,
    },

    /// Import a time-clock export file
    Import {
        /// Pipe-delimited export file
        file: String,

        #[arg(long = "reconcile", help = "Reconcile the imported days afterwards")]
        reconcile: bool,
    },

    /// Manage holidays
    Holiday {
        #[command(subcommand)]
        action: HolidayAction,
    },

    /// Manage expected work schedules
    Schedule {
        #[command(subcommand)]
        action: ScheduleAction,
    },

    /// Manage justifications
    Justify {
        #[command(subcommand)]
        action: JustifyAction,
    },

    /// Reconcile an employee over a period
    Reconcile {
        /// Employee registration number or id
        employee: String,

        #[arg(
            long,
            short,
            help = "YYYY, YYYY-MM, YYYY-MM-DD or a range A:B (default: current month)"
        )]
        period: Option<String>,

        #[arg(long = "from", help = "First day (YYYY-MM-DD)", conflicts_with = "period")]
        start: Option<String>,

        #[arg(long = "to", help = "Last day (YYYY-MM-DD)", conflicts_with = "period")]
        end: Option<String>,

        #[arg(long = "export", value_name = "FILE", help = "Also write the per-day results to FILE")]
        export: Option<String>,

        #[arg(long = "format", value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long = "force", help = "Overwrite the export file without asking")]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum EmployeeAction {
    /// Register an employee
    Add {
        /// Registration number used by the time clock
        registration: String,

        /// Full name
        name: String,

        #[arg(long = "department", help = "Department code or id")]
        department: Option<String>,
    },

    /// List employees
    List {
        #[arg(long = "all", help = "Include inactive employees")]
        all: bool,

        #[arg(long = "department", help = "Only members of this department (code or id)")]
        department: Option<String>,
    },

    /// Move an employee to a department
    Assign {
        employee: String,

        /// Department code or id
        #[arg(required_unless_present = "none", conflicts_with = "none")]
        department: Option<String>,

        #[arg(long = "none", help = "Remove the employee from any department")]
        none: bool,
    },

    /// Mark an employee inactive
    Deactivate { employee: String },
}

#[derive(Subcommand)]
pub enum DepartmentAction {
    /// Register a department
    Add {
        /// Short unique code (e.g. SEMED)
        code: String,

        name: String,
    },

    /// List departments
    List {
        #[arg(long = "all", help = "Include inactive departments")]
        all: bool,
    },

    /// Mark a department active again
    Activate { department: String },

    /// Mark a department inactive
    Deactivate { department: String },

    /// Remove a department without members
    Del { department: String },

    /// Reconcile every active member over a period
    Reconcile {
        department: String,

        #[arg(
            long,
            short,
            help = "YYYY, YYYY-MM, YYYY-MM-DD or a range A:B (default: current month)"
        )]
        period: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum PunchAction {
    /// Record a single punch by hand
    Add {
        /// Employee registration number or id
        employee: String,

        /// Date (YYYY-MM-DD)
        date: String,

        /// Time (HH:MM)
        time: String,

        #[arg(long = "kind", help = "in, out, break-start or break-end (default: by position)")]
        kind: Option<String>,
    },

    /// List raw punches, or the reconciled projection with --processed
    List {
        employee: String,

        #[arg(
            long,
            short,
            help = "YYYY, YYYY-MM, YYYY-MM-DD or a range A:B (default: current month)"
        )]
        period: Option<String>,

        #[arg(long = "processed", help = "Show processed punches instead of raw ones")]
        processed: bool,
    },

    /// Delete a raw punch by id
    Del { id: i64 },
}

#[derive(Subcommand)]
pub enum HolidayAction {
    /// Register a holiday
    Add {
        /// Date (YYYY-MM-DD)
        date: String,

        description: String,

        #[arg(long = "scope", default_value = "national", help = "national, regional or local")]
        scope: String,
    },

    /// List holidays
    List {
        #[arg(long, short, help = "YYYY, YYYY-MM or a range A:B (default: current year)")]
        period: Option<String>,
    },

    /// Count the holiday as a special day again
    Activate { date: String },

    /// Keep the holiday but stop counting it as a special day
    Deactivate { date: String },

    /// Remove a holiday
    Del { date: String },
}

#[derive(Subcommand)]
pub enum ScheduleAction {
    /// Replace the work periods of one weekday (no periods clears it)
    Set {
        employee: String,

        /// 0 = Monday .. 6 = Sunday, or a day name
        weekday: String,

        /// Periods as HH:MM-HH:MM
        periods: Vec<String>,
    },

    /// Show the weekly schedule
    Show { employee: String },
}

#[derive(Subcommand)]
pub enum JustifyAction {
    /// File a justification request (pending)
    Request {
        employee: String,

        /// Date (YYYY-MM-DD)
        date: String,

        #[arg(long = "type", default_value = "other", help = "medical, excused-absence, compensatory or other")]
        kind: String,

        #[arg(long = "reason", help = "Free-text reason (10 to 500 characters)")]
        reason: String,

        #[arg(long = "channel", default_value = "manual", help = "system, manual, email or whatsapp")]
        channel: String,
    },

    /// List justifications
    List {
        #[arg(long = "employee")]
        employee: Option<String>,

        #[arg(long = "status", help = "pending, approved or rejected")]
        status: Option<String>,
    },

    /// Approve a pending request
    Approve {
        id: i64,

        #[arg(long = "by")]
        by: String,
    },

    /// Reject a pending request
    Reject {
        id: i64,

        #[arg(long = "by")]
        by: String,
    },

    /// Delete a pending request
    Del { id: i64 },
}

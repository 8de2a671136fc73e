use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "servtrack")]
#[command(about = "Start and stop service time tracking from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Base URL of the servtrack API
    #[arg(
        long,
        global = true,
        env = "SERVTRACK_API_URL",
        default_value = "http://127.0.0.1:8080",
        value_name = "URL"
    )]
    pub api_url: String,

    /// Base URL of the user directory used to resolve clients
    #[arg(long, global = true, env = "SERVTRACK_USERS_URL", value_name = "URL")]
    pub users_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List time tracking records, newest first
    #[command(alias = "ls")]
    List {
        /// Only records for this client
        #[arg(long, value_name = "ID", conflicts_with = "employee")]
        client: Option<String>,
        /// Only records for this employee
        #[arg(long, value_name = "ID")]
        employee: Option<String>,
        /// Only records still running
        #[arg(long)]
        active: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Start a service session
    Start {
        /// Employee performing the service
        #[arg(long, value_name = "ID")]
        employee: String,
        /// Client the service is performed for
        #[arg(long, value_name = "ID")]
        client: String,
        /// Latitude where the service starts
        #[arg(long, requires = "long", allow_negative_numbers = true)]
        lat: Option<f64>,
        /// Longitude where the service starts
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        long: Option<f64>,
        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
    },
    /// Show one session and its client
    Show {
        /// Time tracking ID
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Stop a running session now
    Stop {
        /// Time tracking ID
        id: String,
        /// Latitude where the service ends
        #[arg(long, requires = "long", allow_negative_numbers = true)]
        lat: Option<f64>,
        /// Longitude where the service ends
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        long: Option<f64>,
    },
    /// Replace the notes of a session
    Note {
        /// Time tracking ID
        id: String,
        /// Note text
        #[arg(required = true)]
        text: Vec<String>,
    },
}

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tripmate::{
    api::{NewExpense, TravelPlanUpdate, TravelRequest},
    commands::{self, Config},
    http::{FailureKind, RequestFailed},
    runtime::RealRuntime,
};

/// tripmate - travel planner client
///
/// Plan trips, track expenses and query maps from the command line.
///
/// The access token from `tripmate login` is kept in the configuration
/// directory and sent with every authenticated request.
///
/// Examples:
///   tripmate login alice --password secret1
///   tripmate plan create --destination Kyoto --start-date 2024-10-01 --end-date 2024-10-04 --budget 5000
///   tripmate expense add --category food --amount 88.5 --plan 3
#[derive(Parser, Debug)]
#[command(author, version = env!("TRIPMATE_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Backend API URL (defaults to http://localhost:8000)
    #[arg(
        long = "api-url",
        env = "TRIPMATE_API_URL",
        value_name = "URL",
        global = true
    )]
    pub api_url: Option<String>,

    /// Directory holding the access token (also via TRIPMATE_CONFIG_DIR)
    #[arg(
        long = "config-dir",
        env = "TRIPMATE_CONFIG_DIR",
        value_name = "PATH",
        global = true
    )]
    pub config_dir: Option<PathBuf>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Log in and store the access token
    Login(LoginArgs),

    /// Create an account
    Register(RegisterArgs),

    /// Forget the stored access token
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Check that the backend is up
    Health,

    /// Manage travel plans
    #[command(subcommand)]
    Plan(PlanCommands),

    /// Record and review expenses
    #[command(subcommand)]
    Expense(ExpenseCommands),

    /// Speech recognition and trip parsing
    #[command(subcommand)]
    Voice(VoiceCommands),

    /// Geocoding, points of interest, routes and weather
    #[command(subcommand)]
    Map(MapCommands),
}

#[derive(clap::Args, Debug)]
pub struct LoginArgs {
    pub username: String,

    #[arg(long, env = "TRIPMATE_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(clap::Args, Debug)]
pub struct RegisterArgs {
    pub username: String,

    #[arg(long)]
    pub email: String,

    #[arg(long, env = "TRIPMATE_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(clap::Subcommand, Debug)]
enum PlanCommands {
    /// Generate a new itinerary
    Create(PlanCreateArgs),
    /// List your travel plans
    List,
    /// Show one plan in full
    Show { id: i64 },
    /// Change fields of an existing plan
    Update(PlanUpdateArgs),
    /// Delete a plan
    Delete {
        id: i64,
        /// Do not ask for confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(clap::Args, Debug)]
pub struct PlanCreateArgs {
    #[arg(long)]
    pub destination: String,
    /// YYYY-MM-DD
    #[arg(long)]
    pub start_date: String,
    /// YYYY-MM-DD
    #[arg(long)]
    pub end_date: String,
    #[arg(long)]
    pub budget: f64,
    #[arg(long = "travelers", default_value_t = 1)]
    pub travelers_count: u32,
    #[arg(long, default_value = "")]
    pub preferences: String,
}

#[derive(clap::Args, Debug)]
pub struct PlanUpdateArgs {
    pub id: i64,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub destination: Option<String>,
    #[arg(long)]
    pub start_date: Option<String>,
    #[arg(long)]
    pub end_date: Option<String>,
    #[arg(long)]
    pub budget: Option<f64>,
    #[arg(long = "travelers")]
    pub travelers_count: Option<u32>,
    #[arg(long)]
    pub preferences: Option<String>,
}

#[derive(clap::Subcommand, Debug)]
enum ExpenseCommands {
    /// Record an expense
    Add(ExpenseArgs),
    /// List expenses, newest first
    List {
        /// Only expenses of this travel plan
        #[arg(long = "plan")]
        plan: Option<i64>,
    },
    /// Totals per category, with budget usage when filtered by plan
    Summary {
        #[arg(long = "plan")]
        plan: Option<i64>,
    },
    /// Replace an expense
    Update {
        id: i64,
        #[command(flatten)]
        expense: ExpenseArgs,
    },
    /// Delete an expense
    Delete {
        id: i64,
        /// Do not ask for confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(clap::Args, Debug)]
pub struct ExpenseArgs {
    #[arg(long)]
    pub category: String,
    #[arg(long, allow_negative_numbers = true)]
    pub amount: f64,
    #[arg(long = "plan")]
    pub plan: Option<i64>,
    #[arg(long)]
    pub description: Option<String>,
    /// ISO 8601 timestamp; the server uses the current time when omitted
    #[arg(long)]
    pub date: Option<String>,
}

impl From<ExpenseArgs> for NewExpense {
    fn from(args: ExpenseArgs) -> Self {
        NewExpense {
            travel_plan_id: args.plan,
            category: args.category,
            amount: args.amount,
            description: args.description,
            expense_date: args.date,
        }
    }
}

#[derive(clap::Subcommand, Debug)]
enum VoiceCommands {
    /// Transcribe an audio file
    Recognize {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Extract destination, dates and budget from free text
    Parse { text: String },
}

#[derive(clap::Subcommand, Debug)]
enum MapCommands {
    /// Address to coordinates
    Geocode { address: String },
    /// Search points of interest
    Poi {
        query: String,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        types: Option<String>,
    },
    /// Route between two `lng,lat` points
    Route {
        origin: String,
        destination: String,
        #[arg(long, default_value = "driving", value_parser = ["driving", "walking", "transit"])]
        mode: String,
    },
    /// Current weather for a city
    Weather { city: String },
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::new(RealRuntime, cli.api_url, cli.config_dir)?;
    let runtime = config.runtime.as_ref();
    let client = &config.client;

    match cli.command {
        Commands::Login(args) => commands::auth::login(client, &args.username, &args.password).await,
        Commands::Register(args) => {
            commands::auth::register(client, &args.username, &args.email, &args.password).await
        }
        Commands::Logout => commands::auth::logout(client),
        Commands::Whoami => commands::auth::whoami(client).await,
        Commands::Health => commands::auth::health(client).await,
        Commands::Plan(command) => match command {
            PlanCommands::Create(args) => {
                let request = TravelRequest {
                    destination: args.destination,
                    start_date: args.start_date,
                    end_date: args.end_date,
                    budget: args.budget,
                    travelers_count: args.travelers_count,
                    preferences: args.preferences,
                };
                commands::plan::create(client, &request).await
            }
            PlanCommands::List => commands::plan::list(client).await,
            PlanCommands::Show { id } => commands::plan::show(client, id).await,
            PlanCommands::Update(args) => {
                let update = TravelPlanUpdate {
                    title: args.title,
                    destination: args.destination,
                    start_date: args.start_date,
                    end_date: args.end_date,
                    days: None,
                    budget: args.budget,
                    travelers_count: args.travelers_count,
                    preferences: args.preferences,
                };
                commands::plan::update(client, args.id, &update).await
            }
            PlanCommands::Delete { id, yes } => {
                commands::plan::delete(runtime, client, id, yes).await
            }
        },
        Commands::Expense(command) => match command {
            ExpenseCommands::Add(args) => commands::expense::add(client, &args.into()).await,
            ExpenseCommands::List { plan } => commands::expense::list(client, plan).await,
            ExpenseCommands::Summary { plan } => commands::expense::summary(client, plan).await,
            ExpenseCommands::Update { id, expense } => {
                commands::expense::update(client, id, &expense.into()).await
            }
            ExpenseCommands::Delete { id, yes } => {
                commands::expense::delete(runtime, client, id, yes).await
            }
        },
        Commands::Voice(command) => match command {
            VoiceCommands::Recognize { file } => {
                commands::voice::recognize(runtime, client, &file).await
            }
            VoiceCommands::Parse { text } => commands::voice::parse(client, &text).await,
        },
        Commands::Map(command) => match command {
            MapCommands::Geocode { address } => commands::map::geocode(client, &address).await,
            MapCommands::Poi { query, city, types } => {
                commands::map::poi(client, &query, city.as_deref(), types.as_deref()).await
            }
            MapCommands::Route {
                origin,
                destination,
                mode,
            } => commands::map::route(client, &origin, &destination, &mode).await,
            MapCommands::Weather { city } => commands::map::weather(client, &city).await,
        },
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let result = run(cli).await;
    if let Err(err) = &result {
        let unauthorized = err
            .downcast_ref::<RequestFailed>()
            .is_some_and(|failed| failed.kind() == FailureKind::Unauthorized);
        if unauthorized {
            eprintln!("Hint: run `tripmate login` to sign in again.");
        }
    }
    result
}

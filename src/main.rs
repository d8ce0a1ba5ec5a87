use std::io;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde_json::{Map, Value};
use tracing_subscriber::EnvFilter;

use seatrack::app::App;
use seatrack::config::{ClientConfig, ConfigError};
use seatrack::net::api::ApiClient;
use seatrack::net::types::{
    ApiError, CsvUpload, DataIdPayload, DataRecord, OceanEnvironmentQuery, PageQuery, RecordQuery, SurgeDirection,
    VesselTrackQuery,
};
use seatrack::router::{Navigation, Route, RouteTarget};
use seatrack::util::storage::FileStorage;


#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("update payload must be a JSON object")]
    NotAnObject,
    #[error("cannot read {path}: {source}")]
    ReadInput { path: String, source: io::Error },
    #[error("invalid surge direction `{0}`; expected E, S, W or N")]
    SurgeDirection(String),
    #[error("no route for {0}")]
    NotFound(String),
    #[error("redirect loop while navigating to {0}")]
    RedirectLoop(String),
}

#[derive(Parser, Debug)]
#[command(name = "seatrack", about = "Vessel tracking and ocean data dashboard client")]
struct Cli {
    /// Backend origin; overrides `SEATRACK_BASE_URL`.
    #[arg(long)]
    base_url: Option<String>,

    /// Request timeout in seconds; overrides `SEATRACK_TIMEOUT_SECS`.
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Where the signed-in user is kept; overrides `SEATRACK_STATE_DIR`.
    #[arg(long)]
    state_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and remember the user.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "SEATRACK_PASSWORD")]
        password: String,
    },
    /// Create an account.
    Register {
        #[arg(long)]
        email: String,
        #[arg(long, env = "SEATRACK_PASSWORD")]
        password: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value_t = 0)]
        role: i64,
    },
    /// Forget the remembered user.
    Logout,
    /// Print the remembered user.
    Whoami,
    /// Run the navigation guard for a path.
    Navigate { path: String },
    /// Print the route table.
    Routes,
    /// List ship ids.
    Ships,
    /// Query vessel tracks.
    Tracks(TrackArgs),
    /// Query ocean environment samples.
    Ocean(OceanArgs),
    /// Query the operation audit log (admin).
    Records(RecordArgs),
    /// Manage observation rows (admin).
    Data(DataCommand),
}

#[derive(Args, Debug)]
struct TrackArgs {
    #[arg(long)]
    ship_id: Option<i64>,
    #[arg(long)]
    start_time: Option<String>,
    #[arg(long)]
    end_time: Option<String>,
}

#[derive(Args, Debug)]
struct OceanArgs {
    #[arg(long, allow_hyphen_values = true)]
    min_lat: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    max_lat: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    min_lng: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    max_lng: Option<f64>,
    #[arg(long)]
    start_time: Option<String>,
    #[arg(long)]
    end_time: Option<String>,
}

#[derive(Args, Debug)]
struct RecordArgs {
    #[arg(long)]
    user_id: Option<i64>,
    #[arg(long)]
    operation_type: Option<String>,
    #[arg(long)]
    start_time: Option<String>,
    #[arg(long)]
    end_time: Option<String>,
    #[arg(long)]
    page: Option<u32>,
    #[arg(long)]
    per_page: Option<u32>,
}

#[derive(Args, Debug)]
struct DataCommand {
    #[command(subcommand)]
    command: DataSubcommand,
}

#[derive(Subcommand, Debug)]
enum DataSubcommand {
    Add(AddArgs),
    Import {
        file: PathBuf,
    },
    List {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        per_page: Option<u32>,
    },
    Update {
        data_id: i64,
        /// JSON object of column updates, e.g. `{"WaveHeight": 2.5}`.
        #[arg(long)]
        data: String,
    },
    Delete {
        data_id: i64,
    },
}

#[derive(Args, Debug)]
struct AddArgs {
    #[arg(long)]
    ship_id: i64,
    #[arg(long)]
    datetime: String,
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,
    #[arg(long, allow_hyphen_values = true)]
    long: f64,
    #[arg(long, allow_hyphen_values = true)]
    sea_temp: Option<f64>,
    #[arg(long)]
    wave_height: f64,
    #[arg(long)]
    wave_period: f64,
    #[arg(long)]
    surge_direction: String,
    #[arg(long)]
    surge_height: f64,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    init_tracing();
    let cli = Cli::parse();
    let config = ClientConfig::from_env_with(cli.base_url.as_deref(), cli.timeout_secs, cli.state_dir)?;
    tracing::debug!(base_url = %config.base_url, state_dir = %config.state_dir.display(), "config resolved");

    let api = ApiClient::from_config(&config)?;
    let mut app = App::new(api, FileStorage::new(&config.state_dir));

    match cli.command {
        Command::Login { email, password } => {
            let user = app.login(&email, &password).await?;
            print_json(&serde_json::to_value(user)?)
        }
        Command::Register { email, password, name, role } => {
            let body = app.register(&email, &password, &name, role).await?;
            print_json(&body)
        }
        Command::Logout => {
            app.logout();
            Ok(())
        }
        Command::Whoami => print_json(&serde_json::to_value(app.current_user())?),
        Command::Navigate { path } => run_navigate(&app.navigate(&path)),
        Command::Routes => print_json(&routes_json(app.router().routes())),
        Command::Ships => print_json(&app.api().get_ships().await?),
        Command::Tracks(args) => {
            let params = VesselTrackQuery { ship_id: args.ship_id, start_time: args.start_time, end_time: args.end_time };
            print_json(&app.api().get_vessel_tracks(&params).await?)
        }
        Command::Ocean(args) => {
            let params = OceanEnvironmentQuery {
                min_lat: args.min_lat,
                max_lat: args.max_lat,
                min_lng: args.min_lng,
                max_lng: args.max_lng,
                start_time: args.start_time,
                end_time: args.end_time,
            };
            print_json(&app.api().get_ocean_environment(&params).await?)
        }
        Command::Records(args) => {
            let params = RecordQuery {
                user_id: args.user_id,
                operation_type: args.operation_type,
                start_time: args.start_time,
                end_time: args.end_time,
                page: args.page,
                per_page: args.per_page,
            };
            print_json(&app.get_records(&params).await?)
        }
        Command::Data(data) => run_data(&app, data).await,
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

async fn run_data(app: &App<FileStorage>, data: DataCommand) -> Result<(), CliError> {
    let body = match data.command {
        DataSubcommand::Add(args) => app.add_data(&data_record(args)?).await?,
        DataSubcommand::Import { file } => {
            let upload = CsvUpload::from_path(&file).map_err(|source| CliError::ReadInput {
                path: file.display().to_string(),
                source,
            })?;
            app.import_csv(upload).await?
        }
        DataSubcommand::List { page, per_page } => app.list_data(&PageQuery { page, per_page }).await?,
        DataSubcommand::Update { data_id, data } => app.update_data(&update_payload(data_id, &data)?).await?,
        DataSubcommand::Delete { data_id } => app.delete_data(&DataIdPayload { data_id }).await?,
    };
    print_json(&body)
}

fn data_record(args: AddArgs) -> Result<DataRecord, CliError> {
    let surge_direction =
        SurgeDirection::parse(&args.surge_direction).ok_or(CliError::SurgeDirection(args.surge_direction))?;
    Ok(DataRecord {
        ship_id: args.ship_id,
        datetime: args.datetime,
        lat: args.lat,
        long: args.long,
        sea_temp: args.sea_temp,
        wave_height: args.wave_height,
        wave_period: args.wave_period,
        surge_direction,
        surge_height: args.surge_height,
    })
}

/// `data_id` merged into the caller's column updates; the flag wins on conflict.
fn update_payload(data_id: i64, raw: &str) -> Result<Value, CliError> {
    let Value::Object(mut fields) = serde_json::from_str::<Value>(raw)? else {
        return Err(CliError::NotAnObject);
    };
    fields.insert("data_id".to_owned(), Value::from(data_id));
    Ok(Value::Object(fields))
}

fn run_navigate(navigation: &Navigation) -> Result<(), CliError> {
    match navigation {
        Navigation::Render { page, path, title, redirected_from } => print_json(&serde_json::json!({
            "page": page.name(),
            "path": path,
            "title": title,
            "redirected_from": redirected_from,
        })),
        Navigation::NotFound { path } => Err(CliError::NotFound(path.clone())),
        Navigation::RedirectLoop { path } => Err(CliError::RedirectLoop(path.clone())),
    }
}

fn routes_json(routes: &[Route]) -> Value {
    let rows = routes
        .iter()
        .map(|route| {
            let mut row = Map::new();
            row.insert("path".to_owned(), Value::from(route.path));
            match route.target {
                RouteTarget::Page(page) => row.insert("page".to_owned(), Value::from(page.name())),
                RouteTarget::Redirect(to) => row.insert("redirect".to_owned(), Value::from(to)),
            };
            row.insert("requires_auth".to_owned(), Value::from(route.meta.requires_auth));
            row.insert("requires_admin".to_owned(), Value::from(route.meta.requires_admin));
            if let Some(title) = route.meta.title {
                row.insert("title".to_owned(), Value::from(title));
            }
            Value::Object(row)
        })
        .collect();
    Value::Array(rows)
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

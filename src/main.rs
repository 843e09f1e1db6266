use anyhow::{Context, Result, bail};
use apirelay::config::{ClientConfig, Mode};
use apirelay::http::{ApiClient, Outcome};
use clap::Parser;

/// apirelay - normalized HTTP client for the upstream API
///
/// Issues requests through the same wrapper the application uses: paths are
/// prefixed with /api, successful responses are unwrapped to their JSON body,
/// and transport failures are reported with normalized messages.
///
/// The runtime mode comes from --mode or the APIRELAY_ENV environment
/// variable; production talks to the origin directly, anything else goes
/// through the local dev proxy.
#[derive(Parser, Debug)]
#[command(author, version = env!("APIRELAY_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Runtime mode ("production" or anything else; defaults to APIRELAY_ENV)
    #[arg(long = "mode", value_name = "MODE", global = true)]
    pub mode: Option<String>,

    /// Deployment origin used in production mode
    #[arg(
        long = "origin",
        env = "APIRELAY_ORIGIN",
        value_name = "URL",
        default_value = "https://www.scgzjg.cn",
        global = true
    )]
    pub origin: String,

    /// Local dev proxy address used outside production
    #[arg(
        long = "proxy",
        env = "APIRELAY_PROXY",
        value_name = "URL",
        default_value = "http://127.0.0.1:8080",
        global = true
    )]
    pub proxy: String,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// GET a path (the /api prefix is added automatically)
    Get(GetArgs),

    /// POST a JSON body to a path
    Post(BodyArgs),

    /// PUT a JSON body to a path
    Put(BodyArgs),

    /// DELETE a path
    Del(PathArgs),
}

#[derive(clap::Args, Debug)]
pub struct GetArgs {
    /// API path
    #[arg(value_name = "PATH")]
    pub path: String,

    /// Query parameter as key=value (repeatable)
    #[arg(long = "param", short = 'p', value_name = "KEY=VALUE")]
    pub params: Vec<String>,
}

#[derive(clap::Args, Debug)]
pub struct BodyArgs {
    /// API path
    #[arg(value_name = "PATH")]
    pub path: String,

    /// JSON request body
    #[arg(long = "data", short = 'd', value_name = "JSON", default_value = "{}")]
    pub data: String,
}

#[derive(clap::Args, Debug)]
pub struct PathArgs {
    /// API path
    #[arg(value_name = "PATH")]
    pub path: String,
}

fn parse_pair(raw: &str) -> Result<(String, String)> {
    match raw.split_once('=') {
        Some((key, value)) => Ok((key.to_string(), value.to_string())),
        None => bail!("Invalid query parameter '{}', expected KEY=VALUE", raw),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let mode = match &cli.mode {
        Some(value) => Mode::parse(value),
        None => Mode::from_env(),
    };
    let config = ClientConfig::resolve(mode, &cli.origin, &cli.proxy);
    let client = ApiClient::new(config)?;

    let outcome: Outcome<serde_json::Value> = match cli.command {
        Commands::Get(args) => {
            let pairs = args
                .params
                .iter()
                .map(|raw| parse_pair(raw))
                .collect::<Result<Vec<_>>>()?;
            let params: Vec<(&str, &str)> = pairs
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect();
            client.get(&args.path, &params).await?
        }
        Commands::Post(args) => {
            let body = serde_json::from_str(&args.data).context("Invalid JSON body")?;
            client.post(&args.path, body).await?
        }
        Commands::Put(args) => {
            let body = serde_json::from_str(&args.data).context("Invalid JSON body")?;
            client.put(&args.path, body).await?
        }
        Commands::Del(args) => client.del(&args.path).await?,
    };

    match outcome {
        Outcome::Completed(body) => println!("{}", serde_json::to_string_pretty(&body)?),
        Outcome::Canceled { message } => eprintln!("{}", message),
    }
    Ok(())
}

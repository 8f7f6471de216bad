use clap::{Parser, Subcommand};
use serde_json::Value;

use bazaar_client::{ApiClient, RequestOptions, ResponseData};

#[derive(Parser)]
#[command(name = "bazaar-cli")]
#[command(about = "Command-line probe for the Bazaar storefront API", long_about = None)]
struct Cli {
    /// Base URL of the API (defaults to BAZAAR_API_URL)
    #[arg(short, long)]
    url: Option<String>,

    /// Bearer token to attach to requests
    #[arg(short, long)]
    token: Option<String>,

    /// Whole-call timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Number of retries for transient failures
    #[arg(long)]
    retries: Option<u32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch an endpoint with GET
    Get {
        endpoint: String,
        /// Bypass response caching for this call
        #[arg(long)]
        no_cache: bool,
    },
    /// Send a JSON body with POST
    Post { endpoint: String, body: String },
    /// Send a JSON body with PUT
    Put { endpoint: String, body: String },
    /// Delete a resource
    Delete { endpoint: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = bazaar_client::config::loader::from_env();
    if let Some(url) = cli.url {
        config.base_url = url;
    }
    bazaar_client::observability::logging::init(&config.log_level);

    let client = ApiClient::new(config)?;
    if let Some(token) = cli.token {
        client.token_store().set(token);
    }

    let mut options = RequestOptions::new();
    if let Some(ms) = cli.timeout_ms {
        options = options.timeout_ms(ms);
    }
    if let Some(retries) = cli.retries {
        options = options.retries(retries);
    }

    let result = match cli.command {
        Commands::Get { endpoint, no_cache } => {
            if no_cache {
                options = options.header("Cache-Control", "no-cache");
            }
            client.get(&endpoint, options).await
        }
        Commands::Post { endpoint, body } => {
            let body: Value = serde_json::from_str(&body)?;
            client.post(&endpoint, body, options).await
        }
        Commands::Put { endpoint, body } => {
            let body: Value = serde_json::from_str(&body)?;
            client.put(&endpoint, body, options).await
        }
        Commands::Delete { endpoint } => client.delete(&endpoint, options).await,
    };

    match result {
        Ok(data) => print_data(data),
        Err(e) => {
            match e.status() {
                Some(status) => eprintln!("Error ({}): {}", status, e),
                None => eprintln!("Error: {}", e),
            }
            std::process::exit(1);
        }
    }

    Ok(())
}

fn print_data(data: ResponseData) {
    match data {
        ResponseData::Json(v) => {
            println!("{}", serde_json::to_string_pretty(&v).unwrap_or_default())
        }
        ResponseData::Text(s) => println!("{}", s),
        ResponseData::Bytes(b) => println!("<{} bytes of binary data>", b.len()),
    }
}

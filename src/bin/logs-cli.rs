use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "logs-cli")]
#[command(about = "Query and manage a running log aggregator", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List stored logs
    List {
        /// Only logs from this service
        #[arg(short, long)]
        service: Option<String>,
    },
    /// Show log counts by service
    Count,
    /// Remove every stored log
    Clear,
    /// Check aggregator health
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::List { service } => {
            let mut req = client.get(format!("{}/logs", base));
            if let Some(service) = service {
                req = req.query(&[("service", service)]);
            }
            req.send().await?
        }
        Commands::Count => client.get(format!("{}/logs/count", base)).send().await?,
        Commands::Clear => client.post(format!("{}/logs/clear", base)).send().await?,
        Commands::Health => client.get(format!("{}/health", base)).send().await?,
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: aggregator returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

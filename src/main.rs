use recipefy_import::{import_pinterest, import_web};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let (source, url) = match (args.get(1), args.get(2)) {
        (Some(source), Some(url)) => (source.as_str(), url.as_str()),
        _ => {
            eprintln!("Usage: recipefy-import <pinterest|web> <url>");
            std::process::exit(2);
        }
    };

    let payload = match source {
        "pinterest" => import_pinterest(url).await?,
        "web" => import_web(url).await?,
        other => {
            eprintln!("Unknown source '{other}', expected 'pinterest' or 'web'");
            std::process::exit(2);
        }
    };

    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

use clap::Parser;
use rand::Rng;
use reqwest::blocking::Client;
use std::error::Error;
use std::thread;
use std::time::{Duration, Instant};

/// Drives traffic at the fake inventory API so its injected latency and
/// failures can be watched from the outside.
#[derive(Parser, Debug)]
#[command(name = "loadgen")]
#[command(about = "Generate traffic against the server-store API", long_about = None)]
struct Args {
    /// server base URL, e.g., http://127.0.0.1:8081
    #[arg(short, long, default_value = "http://127.0.0.1:8081")]
    server: String,

    /// number of requests to send
    #[arg(short = 'n', long, default_value_t = 50)]
    requests: u32,

    /// pause between requests in milliseconds
    #[arg(short, long, default_value_t = 200)]
    interval_ms: u64,
}

const GET_PATHS: &[&str] = &["/", "/servers", "/servers/1", "/servers/2", "/servers/999"];

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let base = args.server.trim_end_matches('/').to_string();
    let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

    let mut ok = 0u32;
    let mut failed = 0u32;
    let mut slow = 0u32;

    for i in 1..=args.requests {
        let mut rng = rand::thread_rng();

        // Every fifth request exercises the create stub; the rest read.
        let started = Instant::now();
        let response = if i % 5 == 0 {
            client.post(format!("{base}/servers")).send()
        } else {
            let path = GET_PATHS[rng.gen_range(0..GET_PATHS.len())];
            client.get(format!("{base}{path}")).send()
        };
        let elapsed = started.elapsed();
        if elapsed >= Duration::from_millis(500) {
            slow += 1;
        }

        match response {
            Ok(resp) if resp.status().is_success() => {
                ok += 1;
                println!("{} {} -> {} ({:?})", i, resp.url().path(), resp.status(), elapsed);
            }
            Ok(resp) => {
                failed += 1;
                let status = resp.status();
                let detail = resp.text().unwrap_or_default();
                println!("{} -> {} {}", i, status, detail.trim());
            }
            Err(err) => {
                failed += 1;
                println!("{} -> request error: {}", i, err);
            }
        }

        thread::sleep(Duration::from_millis(args.interval_ms));
    }

    println!(
        "done: {} ok, {} failed, {} slow (>=500ms) out of {}",
        ok, failed, slow, args.requests
    );
    Ok(())
}

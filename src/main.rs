// main.rs - CLI for submitting montage jobs and following them to completion
use std::path::Path;
use std::sync::Arc;

use montage_client::{
    ClientConfig, ConsoleUi, FilePayload, HttpJobService, JobService, MontageRequest,
    SubmissionController,
};

fn usage() -> ! {
    eprintln!("Usage: montage_client [SOURCE] [OPTIONS]");
    eprintln!();
    eprintln!("Source (exactly one):");
    eprintln!("  --url <URL>                remote video URL (downloaded server-side)");
    eprintln!("  --file <PATH>              upload a local video file");
    eprintln!("  --server-file <NAME>       use a video already on the server");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --labels <PATH>            beat label file (required by the backend)");
    eprintln!("  --audio <PATH>             replacement/overlay audio track");
    eprintln!("  --resolution <WxH>         output resolution (default 1280x720)");
    eprintln!("  --duration <SECS>          target total output duration");
    eprintln!("  --scenes <N>               target total number of scenes");
    eprintln!("  --min-scene-duration <S>   minimum beat-grouped scene duration");
    eprintln!("  --audio-mode <MODE>        replace | mix | keep (default replace)");
    eprintln!();
    eprintln!("  --list-server-videos       list selectable server-side videos and exit");
    eprintln!();
    eprintln!("Environment: MONTAGE_SERVER_URL, MONTAGE_POLL_INTERVAL_SECS, RUST_LOG");
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    init_logging()?;

    let config = ClientConfig::from_env();
    let service = Arc::new(HttpJobService::new(&config.server_url));

    let mut args = std::env::args().skip(1);
    let mut request = MontageRequest::new();
    let mut list_only = false;

    while let Some(flag) = args.next() {
        match flag.as_str() {
            "--url" => request.set_video_url(args.next().unwrap_or_else(|| usage())),
            "--file" => {
                let path = args.next().unwrap_or_else(|| usage());
                request.set_upload(read_payload(&path).await?);
            }
            "--server-file" => request.set_server_file(args.next().unwrap_or_else(|| usage())),
            "--labels" => {
                let path = args.next().unwrap_or_else(|| usage());
                request.label_file = Some(read_payload(&path).await?);
            }
            "--audio" => {
                let path = args.next().unwrap_or_else(|| usage());
                request.audio_file = Some(read_payload(&path).await?);
            }
            "--resolution" => {
                request.options.resolution = args.next().unwrap_or_else(|| usage());
            }
            "--duration" => {
                request.options.total_duration =
                    args.next().and_then(|v| v.parse().ok()).unwrap_or_else(|| usage());
            }
            "--scenes" => {
                request.options.total_scenes =
                    args.next().and_then(|v| v.parse().ok()).unwrap_or_else(|| usage());
            }
            "--min-scene-duration" => {
                request.options.min_scene_duration =
                    args.next().and_then(|v| v.parse().ok()).unwrap_or_else(|| usage());
            }
            "--audio-mode" => {
                request.options.audio_mode = args.next().unwrap_or_else(|| usage());
            }
            "--list-server-videos" => list_only = true,
            "--help" | "-h" => usage(),
            other => {
                eprintln!("❌ Unknown argument: {}", other);
                usage();
            }
        }
    }

    if list_only {
        println!("📼 Server videos at {}:", config.server_url);
        for name in service.list_server_videos().await? {
            println!("   {}", name);
        }
        return Ok(());
    }

    println!("🎬 Montage Client");
    println!("   Server: {}", config.server_url);

    let ui = Arc::new(ConsoleUi::new());
    let controller = SubmissionController::new(Arc::clone(&service), ui)
        .with_poll_interval(config.poll_interval);

    match controller.submit(request).await {
        Ok(task_id) => {
            println!("   Task:   {}", task_id);
        }
        Err(error) => {
            eprintln!("❌ {}", error);
            std::process::exit(1);
        }
    }

    controller.wait_until_idle().await;
    println!();
    Ok(())
}

async fn read_payload(path: &str) -> Result<FilePayload, Box<dyn std::error::Error>> {
    let bytes = tokio::fs::read(path).await?;
    let filename = Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("upload.bin")
        .to_string();
    Ok(FilePayload::new(filename, bytes))
}

fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, fmt, Layer};

    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cfg!(debug_assertions) {
            "debug,montage_client=trace,reqwest=info,hyper=info".to_string()
        } else {
            "warn,montage_client=info,reqwest=warn,hyper=warn".to_string()
        }
    });

    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&log_level))?;

    let fmt_layer = if std::env::var("LOG_FORMAT").as_deref() == Ok("json") {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_target(true)
            .boxed()
    } else {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    Ok(())
}

use actix_web::{web, App, HttpServer};
use gateway::config;
use gateway::engine::EngineClient;
use gateway::history::HistoryStore;
use gateway::middleware::cors::cors_middleware;
use gateway::middleware::request_trace::RequestTrace;
use gateway::middleware::structured_logger::StructuredLogger;
use gateway::routes;
use gateway::state::AppState;

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment:
    // - Docker: Set via docker-compose env_file or docker run --env-file
    // - Local dev: Source env files manually (e.g., set -a; . ./.env; set +a)
    let (host, port) = match config::bind_addr() {
        Ok(addr) => addr,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    let engine_url = config::engine_base_url();
    println!("🚀 Starting Mogul Gateway on http://{}:{}", host, port);
    println!("   Engine at {engine_url}");

    let engine = EngineClient::new(engine_url);

    // The history store is strictly optional: a missing REDIS_URL or a
    // failed connection leaves mirroring disabled without affecting
    // gameplay.
    let app_state = match config::history_redis_url() {
        Some(redis_url) => match HistoryStore::connect(&redis_url).await {
            Ok(store) => {
                println!("✅ History store connected");
                AppState::new(engine, store)
            }
            Err(e) => {
                eprintln!("⚠️  History store unavailable, mirroring disabled: {e}");
                AppState::without_history(engine)
            }
        },
        None => {
            println!("ℹ️  REDIS_URL not set, history mirroring disabled");
            AppState::without_history(engine)
        }
    };

    // Wrap AppState with web::Data before passing to HttpServer
    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware())
            .wrap(StructuredLogger)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}

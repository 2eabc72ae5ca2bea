use actix_web::web;

pub mod agents;
pub mod board;
pub mod games;
pub mod health;
pub mod history;
pub mod simulate;

/// Configure application routes for the server and for tests.
///
/// In production `main.rs` wires these behind the CORS, logging and
/// trace middleware; tests register the same paths directly so endpoint
/// behavior can be exercised without the wrappers.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .configure(health::configure_routes)
            .configure(agents::configure_routes)
            .configure(board::configure_routes)
            .configure(games::configure_routes)
            .configure(simulate::configure_routes)
            .configure(history::configure_routes),
    );
}

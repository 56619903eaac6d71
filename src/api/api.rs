use actix_web::{self, middleware::Logger, web, App, HttpServer};

use crate::{
    config::{init_logger, API_URL, API_WORKERS, DATABASE_URL},
    models::{self, todo_repository::TodoRepository},
};

use super::{errors, todo_service::TodoService, todos_handler};

/// Registers the `/api/todos` endpoints and the extractor error handlers
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(errors::json_config())
        .app_data(errors::query_config())
        .app_data(errors::path_config())
        .service(
            web::scope("/api/todos")
                .route("", web::get().to(todos_handler::get_all_todos))
                .route("", web::post().to(todos_handler::create_todo))
                .route("/before", web::get().to(todos_handler::get_todos_before_date))
                .route("/all", web::delete().to(todos_handler::delete_all_todos))
                .route("/{id}", web::get().to(todos_handler::get_todo_by_id))
                .route("/{id}", web::put().to(todos_handler::update_todo))
                .route("/{id}", web::patch().to(todos_handler::patch_todo))
                .route("/{id}", web::delete().to(todos_handler::delete_todo_by_id)),
        );
}

#[actix_web::main]
pub async fn start_server() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    init_logger();

    let pool: models::Pool = models::build_pool(DATABASE_URL.as_str()).map_err(|e| {
        log::error!("Failed to open database {}: {}", DATABASE_URL.as_str(), e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;

    let service = web::Data::new(TodoService::new(TodoRepository::new(pool)));

    log::info!("Starting server on {}", API_URL.as_str());

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(service.clone())
            .configure(routes)
            .default_service(web::to(errors::not_found))
    })
    .workers(*API_WORKERS)
    .bind(API_URL.as_str())?
    .run()
    .await
}

use actix_web::{http::header, web, HttpResponse};

use super::dtos::response::{ApiResponse, ToSuccessResponse};
use super::dtos::todo::{
    BeforeDateQuery, CreateTodoRequest, PartialUpdateTodoRequest, TodoListItemResponse,
    TodoListQuery, TodoResponse, UpdateTodoRequest,
};
use super::errors::TodoApiError;
use super::todo_service::TodoService;
use super::validation::Validate;
use crate::utils::parse_local_datetime;

/// List todos, newest first unless narrowed by `?completed=`
pub async fn get_all_todos(
    service: web::Data<TodoService>,
    query: web::Query<TodoListQuery>,
) -> Result<HttpResponse, TodoApiError> {
    let completed = query.into_inner().completed;

    let list = web::block(move || match completed {
        Some(completed) => service.get_todos_by_completed(completed),
        None => service.get_all_todos(),
    })
    .await??;

    let items: Vec<TodoListItemResponse> = list.into_iter().map(Into::into).collect();

    Ok(items.to_success_response())
}

/// Full todos created strictly before `?date=`
pub async fn get_todos_before_date(
    service: web::Data<TodoService>,
    query: web::Query<BeforeDateQuery>,
) -> Result<HttpResponse, TodoApiError> {
    let raw = query.into_inner().date;

    let date = parse_local_datetime(&raw).map_err(|_| TodoApiError::InvalidDate(raw))?;

    let list = web::block(move || service.find_todo_before_date(date)).await??;

    let todos: Vec<TodoResponse> = list.into_iter().map(Into::into).collect();

    Ok(todos.to_success_response())
}

pub async fn get_todo_by_id(
    service: web::Data<TodoService>,
    id: web::Path<i64>,
) -> Result<HttpResponse, TodoApiError> {
    let id = id.into_inner();

    let todo = web::block(move || service.find_todo_by_id(id))
        .await??
        .ok_or_else(|| TodoApiError::todo_not_found(id))?;

    Ok(TodoResponse::from(todo).to_success_response())
}

/// Create a new todo
pub async fn create_todo(
    service: web::Data<TodoService>,
    request_data: web::Json<CreateTodoRequest>,
) -> Result<HttpResponse, TodoApiError> {
    let request_data = request_data.into_inner();
    request_data.validate()?;

    let draft = request_data.to_draft();
    let created = web::block(move || service.create_todo(&draft)).await??;

    log::info!("Created todo {}", created.id);

    let location = format!("/api/todos/{}", created.id);

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, location))
        .json(ApiResponse::success(TodoResponse::from(created))))
}

/// Replace title, description and completion of a todo
pub async fn update_todo(
    service: web::Data<TodoService>,
    id: web::Path<i64>,
    request_data: web::Json<UpdateTodoRequest>,
) -> Result<HttpResponse, TodoApiError> {
    let id = id.into_inner();
    let request_data = request_data.into_inner();
    request_data.validate()?;

    let saved = web::block(move || {
        let existing = service
            .find_todo_by_id(id)?
            .ok_or_else(|| TodoApiError::todo_not_found(id))?;

        service.update_todo(&request_data.apply_to(existing))
    })
    .await??;

    Ok(TodoResponse::from(saved).to_success_response())
}

/// Update only the fields present in the body
pub async fn patch_todo(
    service: web::Data<TodoService>,
    id: web::Path<i64>,
    request_data: web::Json<PartialUpdateTodoRequest>,
) -> Result<HttpResponse, TodoApiError> {
    let id = id.into_inner();
    let request_data = request_data.into_inner();
    request_data.validate()?;

    let saved = web::block(move || {
        let existing = service
            .find_todo_by_id(id)?
            .ok_or_else(|| TodoApiError::todo_not_found(id))?;

        service.update_todo(&request_data.apply_to(existing))
    })
    .await??;

    Ok(TodoResponse::from(saved).to_success_response())
}

/// Api to Delete a TODO
pub async fn delete_todo_by_id(
    service: web::Data<TodoService>,
    id: web::Path<i64>,
) -> Result<HttpResponse, TodoApiError> {
    let id = id.into_inner();

    web::block(move || {
        service
            .find_todo_by_id(id)?
            .ok_or_else(|| TodoApiError::todo_not_found(id))?;

        service.delete_todo_by_id(id)
    })
    .await??;

    log::info!("Deleted todo {}", id);

    Ok(HttpResponse::Ok().json(ApiResponse::<()>::empty()))
}

pub async fn delete_all_todos(
    service: web::Data<TodoService>,
) -> Result<HttpResponse, TodoApiError> {
    web::block(move || service.delete_all_todos()).await??;

    Ok(HttpResponse::Ok().json(ApiResponse::<()>::empty()))
}

#[cfg(test)]
mod test {
    use actix_web::{
        dev::ServiceResponse,
        http::{header, StatusCode},
        test, web, App,
    };
    use serde_json::{json, Value};

    use crate::api::{api::routes, errors::not_found, todo_service::TodoService};
    use crate::models::{build_pool, todo_repository::TodoRepository};

    fn service() -> web::Data<TodoService> {
        let pool = build_pool(":memory:").unwrap();

        web::Data::new(TodoService::new(TodoRepository::new(pool)))
    }

    macro_rules! init_app {
        () => {
            test::init_service(
                App::new()
                    .app_data(service())
                    .configure(routes)
                    .default_service(web::to(not_found)),
            )
            .await
        };
    }

    async fn body(resp: ServiceResponse) -> Value {
        test::read_body_json(resp).await
    }

    fn post(body: Value) -> test::TestRequest {
        test::TestRequest::post().uri("/api/todos").set_json(body)
    }

    #[actix_web::test]
    async fn test_create_todo_returns_created_envelope() {
        let app = init_app!();

        let req = post(json!({"title": "Buy milk", "description": "2%"})).to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::CREATED);

        let location = resp.headers().get(header::LOCATION).unwrap().to_str().unwrap().to_string();
        let body = body(resp).await;

        assert_eq!(body["success"], true);
        assert!(body["error"].is_null());
        assert_eq!(body["data"]["title"], "Buy milk");
        assert_eq!(body["data"]["description"], "2%");
        assert_eq!(body["data"]["completed"], false);
        assert!(body["data"]["id"].as_i64().unwrap() > 0);
        assert!(body["data"]["createdAt"].is_string());
        assert!(body["data"]["updatedAt"].is_string());
        assert_eq!(location, format!("/api/todos/{}", body["data"]["id"]));
    }

    #[actix_web::test]
    async fn test_create_todo_with_short_title_is_rejected() {
        let app = init_app!();

        let resp = test::call_service(&app, post(json!({"title": "ab"})).to_request()).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = body(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "title: size must be between 3 and 80");
    }

    #[actix_web::test]
    async fn test_create_todo_with_malformed_body() {
        let app = init_app!();

        let req = test::TestRequest::post()
            .uri("/api/todos")
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload("{\"title\": ")
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body(resp).await["error"], "Malformed JSON or invalid request body");

        let req = post(json!({"description": "no title"})).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body(resp).await["error"], "Malformed JSON or invalid request body");
    }

    #[actix_web::test]
    async fn test_get_missing_todo_is_not_found() {
        let app = init_app!();

        let req = test::TestRequest::get().uri("/api/todos/4242").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body = body(resp).await;
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("4242"));
    }

    #[actix_web::test]
    async fn test_get_todo_by_id() {
        let app = init_app!();

        let req = post(json!({"title": "Read book"})).to_request();
        let created = body(test::call_service(&app, req).await).await;
        let id = created["data"]["id"].as_i64().unwrap();

        let req = test::TestRequest::get().uri(&format!("/api/todos/{}", id)).to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body(resp).await["data"], created["data"]);
    }

    #[actix_web::test]
    async fn test_invalid_path_id_is_bad_request() {
        let app = init_app!();

        let req = test::TestRequest::get().uri("/api/todos/abc").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body(resp).await["error"], "Invalid todo id");
    }

    #[actix_web::test]
    async fn test_list_is_newest_first_and_slim() {
        let app = init_app!();

        test::call_service(&app, post(json!({"title": "first todo"})).to_request()).await;
        test::call_service(&app, post(json!({"title": "second todo"})).to_request()).await;

        let req = test::TestRequest::get().uri("/api/todos").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = body(resp).await;
        let list = body["data"].as_array().unwrap();

        assert_eq!(list.len(), 2);
        assert_eq!(list[0]["title"], "second todo");
        assert_eq!(list[1]["title"], "first todo");
        assert!(list[0].get("description").is_none());
        assert!(list[0].get("createdAt").is_none());
    }

    #[actix_web::test]
    async fn test_list_filtered_by_completed() {
        let app = init_app!();

        let req = post(json!({"title": "done one"})).to_request();
        let created = body(test::call_service(&app, req).await).await;
        test::call_service(&app, post(json!({"title": "open one"})).to_request()).await;

        let id = created["data"]["id"].as_i64().unwrap();
        let req = test::TestRequest::patch()
            .uri(&format!("/api/todos/{}", id))
            .set_json(json!({"completed": true}))
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::get().uri("/api/todos?completed=true").to_request();
        let list = body(test::call_service(&app, req).await).await;

        assert_eq!(list["data"].as_array().unwrap().len(), 1);
        assert_eq!(list["data"][0]["title"], "done one");
    }

    #[actix_web::test]
    async fn test_patch_completed_only() {
        let app = init_app!();

        let req = post(json!({"title": "Buy milk", "description": "2%"})).to_request();
        let created = body(test::call_service(&app, req).await).await;
        let id = created["data"]["id"].as_i64().unwrap();

        let req = test::TestRequest::patch()
            .uri(&format!("/api/todos/{}", id))
            .set_json(json!({"completed": true}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = body(resp).await;
        assert_eq!(body["data"]["completed"], true);
        assert_eq!(body["data"]["title"], "Buy milk");
        assert_eq!(body["data"]["description"], "2%");
        assert_eq!(body["data"]["createdAt"], created["data"]["createdAt"]);
    }

    #[actix_web::test]
    async fn test_patch_validates_present_fields() {
        let app = init_app!();

        let req = post(json!({"title": "Buy milk"})).to_request();
        let created = body(test::call_service(&app, req).await).await;
        let id = created["data"]["id"].as_i64().unwrap();

        let req = test::TestRequest::patch()
            .uri(&format!("/api/todos/{}", id))
            .set_json(json!({"title": "no"}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body(resp).await["error"], "title: size must be between 3 and 80");
    }

    #[actix_web::test]
    async fn test_put_replaces_fields() {
        let app = init_app!();

        let req = post(json!({"title": "Buy milk", "description": "2%"})).to_request();
        let created = body(test::call_service(&app, req).await).await;
        let id = created["data"]["id"].as_i64().unwrap();

        let req = test::TestRequest::put()
            .uri(&format!("/api/todos/{}", id))
            .set_json(json!({"title": "Buy bread", "description": "rye", "completed": true}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = body(resp).await;
        assert_eq!(body["data"]["id"], id);
        assert_eq!(body["data"]["title"], "Buy bread");
        assert_eq!(body["data"]["description"], "rye");
        assert_eq!(body["data"]["completed"], true);
    }

    #[actix_web::test]
    async fn test_put_and_patch_missing_todo() {
        let app = init_app!();

        let req = test::TestRequest::put()
            .uri("/api/todos/99")
            .set_json(json!({"title": "Buy bread", "completed": false}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body(resp).await["error"], "Todo with id 99 not found");

        let req = test::TestRequest::patch()
            .uri("/api/todos/99")
            .set_json(json!({"completed": true}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_before_date() {
        let app = init_app!();

        test::call_service(&app, post(json!({"title": "Buy milk"})).to_request()).await;

        let req = test::TestRequest::get()
            .uri("/api/todos/before?date=2999-01-01T00:00:00")
            .to_request();
        let body_after = body(test::call_service(&app, req).await).await;
        let list = body_after["data"].as_array().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["title"], "Buy milk");
        assert!(list[0]["createdAt"].is_string());

        let req = test::TestRequest::get()
            .uri("/api/todos/before?date=2000-01-01T00:00")
            .to_request();
        let body_before = body(test::call_service(&app, req).await).await;
        assert!(body_before["data"].as_array().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_before_malformed_date() {
        let app = init_app!();

        let req = test::TestRequest::get()
            .uri("/api/todos/before?date=yesterday")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = body(resp).await;
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("yesterday"));
    }

    #[actix_web::test]
    async fn test_before_without_date() {
        let app = init_app!();

        let req = test::TestRequest::get().uri("/api/todos/before").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_delete_todo() {
        let app = init_app!();

        let req = post(json!({"title": "Buy milk"})).to_request();
        let created = body(test::call_service(&app, req).await).await;
        let id = created["data"]["id"].as_i64().unwrap();
        let uri = format!("/api/todos/{}", id);

        let req = test::TestRequest::delete().uri(&uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body_deleted = body(resp).await;
        assert_eq!(body_deleted["success"], true);
        assert!(body_deleted["data"].is_null());

        let req = test::TestRequest::delete().uri(&uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_delete_all_then_list_is_empty() {
        let app = init_app!();

        test::call_service(&app, post(json!({"title": "one todo"})).to_request()).await;
        test::call_service(&app, post(json!({"title": "two todo"})).to_request()).await;

        let req = test::TestRequest::delete().uri("/api/todos/all").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body(resp).await["data"].is_null());

        let req = test::TestRequest::get().uri("/api/todos").to_request();
        let list = body(test::call_service(&app, req).await).await;
        assert_eq!(list["success"], true);
        assert!(list["data"].as_array().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_unknown_route_is_enveloped() {
        let app = init_app!();

        let req = test::TestRequest::get().uri("/api/unknown").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body(resp).await["error"], "Resource not found");
    }
}

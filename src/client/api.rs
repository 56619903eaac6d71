use chrono::NaiveDateTime;
use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::{
    api::dtos::{
        response::ApiResponse,
        todo::{
            CreateTodoRequest, PartialUpdateTodoRequest, TodoListItemResponse, TodoResponse,
            UpdateTodoRequest,
        },
    },
    config::TodoConfig,
    errors::{RequestError, TodoError},
    utils::api_url,
};

/// Every call the client can make against `/api/todos`
pub trait TodoEndpoints {
    fn fetch_all_todos(&self) -> Result<Vec<TodoListItemResponse>, TodoError>;

    fn fetch_todo(&self, id: i64) -> Result<TodoResponse, TodoError>;

    fn fetch_todos_before(&self, date: NaiveDateTime) -> Result<Vec<TodoResponse>, TodoError>;

    fn create_todo(&self, data: &CreateTodoRequest) -> Result<TodoResponse, TodoError>;

    fn put_todo(&self, id: i64, data: &UpdateTodoRequest) -> Result<TodoResponse, TodoError>;

    fn patch_todo(
        &self,
        id: i64,
        data: &PartialUpdateTodoRequest,
    ) -> Result<TodoResponse, TodoError>;

    fn delete_todo(&self, id: i64) -> Result<(), TodoError>;

    fn delete_all_todos(&self) -> Result<(), TodoError>;
}

/// Blocking reqwest client for the todo server
#[derive(Debug, Clone)]
pub struct HttpTodoApi {
    client: Client,
    host: String,
}

impl HttpTodoApi {
    pub fn new<T: Into<String>>(host: T) -> Self {
        Self {
            client: Client::new(),
            host: host.into(),
        }
    }

    pub fn from_config() -> Self {
        Self::new(TodoConfig::load().api_url())
    }

    fn url(&self, resource: &str) -> String {
        api_url(&self.host, resource)
    }

    /// Sends the request and unwraps the envelope
    fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<Option<T>, TodoError> {
        let response = request.send()?;

        let status = response.status();
        let text = response.text()?;

        log::debug!("{} <- {}", status, text);

        match serde_json::from_str::<ApiResponse<T>>(&text) {
            Ok(envelope) if status.is_success() && envelope.success => Ok(envelope.data),
            Ok(envelope) => Err(TodoError::ApiError(RequestError {
                status: status.as_u16(),
                error: envelope.error.unwrap_or_default(),
            })),
            Err(_) if !status.is_success() => Err(TodoError::ApiError(RequestError {
                status: status.as_u16(),
                error: status.canonical_reason().unwrap_or_default().to_string(),
            })),
            Err(e) => Err(e.into()),
        }
    }

    fn send_data<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, TodoError> {
        self.send(request)?.ok_or(TodoError::EmptyResponse)
    }
}

impl TodoEndpoints for HttpTodoApi {
    fn fetch_all_todos(&self) -> Result<Vec<TodoListItemResponse>, TodoError> {
        self.send_data(self.client.get(self.url("todos")))
    }

    fn fetch_todo(&self, id: i64) -> Result<TodoResponse, TodoError> {
        self.send_data(self.client.get(self.url(&format!("todos/{}", id))))
    }

    fn fetch_todos_before(&self, date: NaiveDateTime) -> Result<Vec<TodoResponse>, TodoError> {
        let date = date.format("%Y-%m-%dT%H:%M:%S%.f").to_string();

        self.send_data(
            self.client
                .get(self.url("todos/before"))
                .query(&[("date", date)]),
        )
    }

    fn create_todo(&self, data: &CreateTodoRequest) -> Result<TodoResponse, TodoError> {
        self.send_data(self.client.post(self.url("todos")).json(data))
    }

    fn put_todo(&self, id: i64, data: &UpdateTodoRequest) -> Result<TodoResponse, TodoError> {
        self.send_data(self.client.put(self.url(&format!("todos/{}", id))).json(data))
    }

    fn patch_todo(
        &self,
        id: i64,
        data: &PartialUpdateTodoRequest,
    ) -> Result<TodoResponse, TodoError> {
        self.send_data(self.client.patch(self.url(&format!("todos/{}", id))).json(data))
    }

    fn delete_todo(&self, id: i64) -> Result<(), TodoError> {
        self.send::<serde_json::Value>(self.client.delete(self.url(&format!("todos/{}", id))))
            .map(|_| ())
    }

    fn delete_all_todos(&self) -> Result<(), TodoError> {
        self.send::<serde_json::Value>(self.client.delete(self.url("todos/all")))
            .map(|_| ())
    }
}

#[cfg(test)]
mod test {
    use std::net::TcpListener;

    use actix_web::{web, App, HttpServer};

    use super::{HttpTodoApi, TodoEndpoints};
    use crate::api::{api::routes, dtos::todo::*, todo_service::TodoService};
    use crate::errors::TodoError;
    use crate::models::{build_pool, todo_repository::TodoRepository};
    use crate::utils::parse_local_datetime;

    /// Starts the real server on a random port in its own thread
    fn spawn_server() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap().to_string();

        std::thread::spawn(move || {
            actix_web::rt::System::new().block_on(async move {
                let pool = build_pool(":memory:").unwrap();
                let service = web::Data::new(TodoService::new(TodoRepository::new(pool)));

                HttpServer::new(move || App::new().app_data(service.clone()).configure(routes))
                    .workers(1)
                    .listen(listener)
                    .unwrap()
                    .run()
                    .await
            })
        });

        address
    }

    #[test]
    fn test_crud_round_trip() {
        let api = HttpTodoApi::new(spawn_server());

        assert!(api.fetch_all_todos().unwrap().is_empty());

        let created = api
            .create_todo(&CreateTodoRequest {
                title: "Buy milk".into(),
                description: Some("2%".into()),
            })
            .unwrap();
        assert!(!created.completed);

        let fetched = api.fetch_todo(created.id).unwrap();
        assert_eq!(fetched, created);

        let patched = api
            .patch_todo(
                created.id,
                &PartialUpdateTodoRequest {
                    completed: Some(true),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(patched.completed);
        assert_eq!(patched.description.as_deref(), Some("2%"));

        let put = api
            .put_todo(
                created.id,
                &UpdateTodoRequest {
                    title: "Buy bread".into(),
                    description: None,
                    completed: false,
                },
            )
            .unwrap();
        assert_eq!(put.title, "Buy bread");
        assert_eq!(put.description, None);

        let list = api.fetch_all_todos().unwrap();
        assert_eq!(list, vec![TodoListItemResponse::from(&put)]);

        let before = api
            .fetch_todos_before(parse_local_datetime("2999-01-01T00:00").unwrap())
            .unwrap();
        assert_eq!(before.len(), 1);

        api.delete_todo(created.id).unwrap();

        match api.fetch_todo(created.id) {
            Err(TodoError::ApiError(e)) => {
                assert_eq!(e.status, 404);
                assert!(e.error.contains(&created.id.to_string()));
            }
            other => panic!("expected not found, got {:?}", other),
        }

        api.create_todo(&CreateTodoRequest {
            title: "another".into(),
            description: None,
        })
        .unwrap();
        api.delete_all_todos().unwrap();
        assert!(api.fetch_all_todos().unwrap().is_empty());
    }

    #[test]
    fn test_validation_failure_is_request_error() {
        let api = HttpTodoApi::new(spawn_server());

        let err = api
            .create_todo(&CreateTodoRequest {
                title: "ab".into(),
                description: None,
            })
            .unwrap_err();

        match err {
            TodoError::ApiError(e) => {
                assert_eq!(e.status, 400);
                assert_eq!(e.error, "title: size must be between 3 and 80");
            }
            other => panic!("expected request error, got {:?}", other),
        }
    }
}

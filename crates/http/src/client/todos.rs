//! To-do API client methods

use super::{ApiRequest, AuthenticatedTodoClient, ClientError};
use crate::types::{
    PaginatedResponse, PaginationParams, Todo, TodoCreate, TodoFilter, TodoReorderRequest,
    TodoUpdate,
};

impl AuthenticatedTodoClient {
    /// List to-dos matching `filter`, one page at a time
    pub async fn list_todos(
        &self,
        filter: &TodoFilter,
        pagination: &PaginationParams,
    ) -> Result<PaginatedResponse<Todo>, ClientError> {
        pagination.validate().map_err(ClientError::Validation)?;
        let request = ApiRequest::get("/todos")
            .query(filter.to_query())
            .query(pagination.to_query());
        self.execute(request).await
    }

    pub async fn get_todo(&self, id: i64) -> Result<Todo, ClientError> {
        self.execute(ApiRequest::get(format!("/todos/{id}"))).await
    }

    pub async fn create_todo(&self, todo: &TodoCreate) -> Result<Todo, ClientError> {
        todo.validate().map_err(ClientError::Validation)?;
        let request = ApiRequest::post("/todos").json(todo)?;
        self.execute(request).await
    }

    pub async fn update_todo(&self, id: i64, update: &TodoUpdate) -> Result<Todo, ClientError> {
        update.validate().map_err(ClientError::Validation)?;
        let request = ApiRequest::patch(format!("/todos/{id}")).json(update)?;
        self.execute(request).await
    }

    pub async fn delete_todo(&self, id: i64) -> Result<(), ClientError> {
        self.execute_empty(ApiRequest::delete(format!("/todos/{id}"))).await
    }

    /// Move to-dos to new positions within one parent
    pub async fn reorder_todos(
        &self,
        request: &TodoReorderRequest,
    ) -> Result<Vec<Todo>, ClientError> {
        let request = ApiRequest::post("/todos/reorder").json(request)?;
        self.execute(request).await
    }
}

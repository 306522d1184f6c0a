use serde::Serialize;

use crate::errors::AppError;
use crate::extract::Json;

/// Success envelope shared by every JSON endpoint: `{"data": ...}`.
#[derive(Debug, Serialize)]
pub struct Data<T> {
    pub data: T,
}

pub type ApiResult<T> = Result<Json<Data<T>>, AppError>;

pub fn data<T: Serialize>(payload: T) -> Json<Data<T>> {
    Json(Data { data: payload })
}

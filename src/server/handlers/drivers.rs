use axum::extract::{Extension, Json, Path};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::DynAPI;
use crate::auth::Caller;
use crate::entities::Driver;
use crate::error::Error;

#[derive(Serialize, Deserialize)]
pub struct CreateParams {
    name: String,
}

#[derive(Serialize, Deserialize)]
pub struct RateParams {
    rating: f64,
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    caller: Caller,
    Json(params): Json<CreateParams>,
) -> Result<Json<Driver>, Error> {
    let driver = api.create_driver(caller, params.name).await?;

    Ok(driver.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
) -> Result<Json<Driver>, Error> {
    let driver = api.find_driver(id).await?;

    Ok(driver.into())
}

pub async fn rate(
    Extension(api): Extension<DynAPI>,
    caller: Caller,
    Path(id): Path<Uuid>,
    Json(params): Json<RateParams>,
) -> Result<Json<Driver>, Error> {
    let driver = api.rate_driver(caller, id, params.rating).await?;

    Ok(driver.into())
}

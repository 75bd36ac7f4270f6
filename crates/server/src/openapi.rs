use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// Flat vehicle shape; `id` is ignored on create.
#[derive(ToSchema)]
pub struct VehicleJsonDoc {
    pub id: i64,
    pub brand: String,
    pub model: String,
    pub registration: String,
    pub color: String,
    pub year: i32,
    pub passengers: i32,
    pub max_speed: f64,
    pub fuel_type: String,
    pub transmission: String,
    pub weight: f64,
    pub height: f64,
    pub length: f64,
    pub width: f64,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::vehicles::list_vehicles,
        crate::routes::vehicles::create_vehicle,
        crate::routes::vehicles::vehicles_by_color_and_year,
    ),
    components(
        schemas(
            HealthResponse,
            VehicleJsonDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "vehicles")
    )
)]
pub struct ApiDoc;

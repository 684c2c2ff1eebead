use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::rest::{dto, handlers, problem};

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    info(title = "Job Scheduler API", description = "Window installation job scheduling"),
    paths(
        handlers::login,
        handlers::session,
        handlers::logout,
        handlers::list_teams,
        handlers::list_jobs,
        handlers::create_job,
        handlers::get_job,
        handlers::update_job,
        handlers::set_status,
        handlers::estimate,
        handlers::calendar,
    ),
    components(schemas(
        problem::Problem,
        problem::FieldError,
        dto::JobEvent,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "auth", description = "Sessions"),
        (name = "teams", description = "Team reference data"),
        (name = "jobs", description = "Job scheduling"),
        (name = "calendar", description = "Calendar projection"),
    )
)]
pub struct ApiDoc;

use crate::api::admin::{DeleteRequests, DeleteResponse};
use crate::api::blocked_dates::BlockDate;
use crate::api::requests::SubmitResponse;
use crate::leave::{AdminFilter, SubmitRequest};
use crate::model::request::{LeaveRequest, RequestKind};
use crate::models::{LoginReqDto, LoginResponse};
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Leave Desk API",
        version = "0.1.0",
        description = r#"
## Time-off request desk

Employees submit **vacation**, **permit** and **sick-leave** requests; an
administrator reviews them and decides which calendar dates are closed to
new vacation/permit requests.

### Status
Every request gets a status at submission time:
- sick-leave notices are acknowledged,
- requests made with less than 5 days' notice are pending,
- everything else is submitted and awaits an outcome.

### Security
Administrator endpoints require a **Bearer** token from `/api/admin/login`,
valid for two hours.

### Errors
Every error response is `{"message": "..."}`.
"#,
    ),
    paths(
        crate::api::requests::submit_request,
        crate::api::requests::list_requests,

        crate::auth::handlers::login,

        crate::api::admin::list_requests,
        crate::api::admin::delete_requests,

        crate::api::blocked_dates::list_blocked_dates,
        crate::api::blocked_dates::add_blocked_date,
        crate::api::blocked_dates::remove_blocked_date
    ),
    components(
        schemas(
            SubmitRequest,
            SubmitResponse,
            LeaveRequest,
            RequestKind,
            AdminFilter,
            DeleteRequests,
            DeleteResponse,
            BlockDate,
            LoginReqDto,
            LoginResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Requests", description = "Employee request APIs"),
        (name = "Admin", description = "Administrator login and request review"),
        (name = "Blocked dates", description = "Dates closed to vacation and permit requests"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

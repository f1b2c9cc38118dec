use utoipa::OpenApi;

use crate::api;
use crate::model;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health,
        api::list_teachers,
        api::recent_teachers,
        api::get_teacher,
        api::create_teacher,
        api::update_teacher,
        api::delete_teacher,
        api::teacher_card,
        api::upload_photo,
        api::stats,
    ),
    components(
        schemas(model::Teacher, model::InsertTeacher, model::UpdateTeacher, model::FieldError)
    ),
    tags(
        (name = "idcard", description = "Teacher ID card backend API")
    )
)]
pub struct ApiDoc;

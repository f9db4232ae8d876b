//! Registration API Handlers

use std::collections::HashMap;

use axum::{
    Form,
    extract::{Path, State, rejection::FormRejection},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::core::ServerState;
use crate::registration::page::{PageMessage, RegisterPage};
use crate::registration::{DepartmentGate, FieldErrors, FormValues, SubmissionOutcome};
use crate::utils::AppResult;

fn html(status: StatusCode, page: &RegisterPage) -> AppResult<Response> {
    Ok((status, Html(page.render()?)).into_response())
}

/// GET /annual/{department}/register - 报名表单
pub async fn page(
    State(state): State<ServerState>,
    Path(department): Path<String>,
) -> AppResult<Response> {
    let service = state.registration_service();
    match service.prepare(&department).await? {
        DepartmentGate::Allowed(term) => {
            let page = RegisterPage::with_form(
                term.name,
                service.schema(),
                &service.schema().defaults(),
                &FieldErrors::default(),
            );
            html(StatusCode::OK, &page)
        }
        DepartmentGate::NotAllowed { allowed } => {
            let outcome = SubmissionOutcome::DepartmentNotAllowed { allowed };
            let page = RegisterPage::without_form(department)
                .message(PageMessage::error(outcome.message()));
            html(outcome.http_status(), &page)
        }
    }
}

/// POST /annual/{department}/register - 提交报名
///
/// 无法解析的请求体按空表单处理，页面显示各字段的必填错误
pub async fn submit(
    State(state): State<ServerState>,
    Path(department): Path<String>,
    form: Result<Form<HashMap<String, String>>, FormRejection>,
) -> AppResult<Response> {
    let values = match form {
        Ok(Form(values)) => FormValues::from(values),
        Err(rejection) => {
            tracing::warn!(department = %department, error = %rejection, "Unreadable form body");
            FormValues::default()
        }
    };

    let service = state.registration_service();
    let outcome = service.submit(&department, values).await?;
    let status = outcome.http_status();
    let schema = service.schema();

    let page = match &outcome {
        SubmissionOutcome::Registered(record) => RegisterPage::with_form(
            record.department.clone().unwrap_or_else(|| department.clone()),
            schema,
            &schema.defaults(),
            &FieldErrors::default(),
        )
        .message(PageMessage::status(outcome.message())),
        SubmissionOutcome::Rejected { errors, input } => errors.iter().fold(
            RegisterPage::with_form(department.to_lowercase(), schema, input, errors),
            |page, error| page.message(PageMessage::error(error.message.clone())),
        ),
        SubmissionOutcome::DepartmentNotAllowed { .. } => {
            RegisterPage::without_form(department).message(PageMessage::error(outcome.message()))
        }
        SubmissionOutcome::StorageUnavailable { input } => RegisterPage::with_form(
            department.to_lowercase(),
            schema,
            input,
            &FieldErrors::default(),
        )
        .message(PageMessage::error(outcome.message())),
    };

    html(status, &page)
}

//! 年会报名模块
//!
//! - [`form`] - 表单定义和格式校验
//! - [`rules`] - 业务规则
//! - [`sanitize`] - 标题清理
//! - [`service`] - 提交流程
//! - [`page`] - 报名页面渲染

pub mod form;
pub mod page;
pub mod rules;
pub mod sanitize;
pub mod service;

pub use form::{FieldError, FieldErrorKind, FieldErrors, FieldKind, FieldSpec, FormSchema, FormValues, SchemaError};
pub use service::{
    DepartmentGate, RegistrationService, RegistrationSettings, SubmissionOutcome,
};

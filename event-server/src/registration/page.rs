//! 报名页面渲染

use askama::Template;

use super::form::{FieldErrors, FieldKind, FieldSpec, FormSchema, FormValues};
use crate::utils::{AppError, AppResult};

/// 表单上方显示的消息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMessage {
    /// `status` 或 `error`
    pub kind: &'static str,
    pub text: String,
}

impl PageMessage {
    pub fn status(text: impl Into<String>) -> Self {
        Self {
            kind: "status",
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: "error",
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RadioOption {
    pub value: &'static str,
    pub label: &'static str,
    pub checked: bool,
}

/// 渲染后的输入项
#[derive(Debug, Clone)]
pub struct FieldView {
    pub name: &'static str,
    pub label: &'static str,
    /// `text`、`email`、`number` 或 `radios`
    pub input_type: &'static str,
    pub value: String,
    pub required: bool,
    pub max_length: Option<usize>,
    pub min: Option<i64>,
    pub max: Option<i64>,
    pub options: Vec<RadioOption>,
    pub error: Option<String>,
}

impl FieldView {
    fn build(spec: &FieldSpec, value: String, errors: &FieldErrors) -> Self {
        let mut view = Self {
            name: spec.name,
            label: spec.label,
            input_type: "text",
            required: spec.required,
            max_length: None,
            min: None,
            max: None,
            options: Vec::new(),
            error: errors.for_field(spec.name).map(|e| e.message.clone()),
            value,
        };
        match spec.kind {
            FieldKind::Text { max_length } => view.max_length = Some(max_length),
            FieldKind::Email { max_length } => {
                view.input_type = "email";
                view.max_length = Some(max_length);
            }
            FieldKind::Number { min, max } => {
                view.input_type = "number";
                view.min = Some(min);
                view.max = Some(max);
            }
            FieldKind::Boolean => {
                view.input_type = "radios";
                view.options = vec![
                    RadioOption {
                        value: "1",
                        label: "Yes",
                        checked: view.value == "1",
                    },
                    RadioOption {
                        value: "0",
                        label: "No",
                        checked: view.value == "0",
                    },
                ];
            }
        }
        view
    }
}

#[derive(Template)]
#[template(path = "register_page.html")]
struct RegisterPageTemplate<'a> {
    title: &'a str,
    action: &'a str,
    messages: &'a [PageMessage],
    fields: &'a [FieldView],
    show_form: bool,
}

/// 渲染前的报名页面内容
#[derive(Debug, Clone)]
pub struct RegisterPage {
    department: String,
    messages: Vec<PageMessage>,
    fields: Option<Vec<FieldView>>,
}

impl RegisterPage {
    /// 不带表单的页面 (例如部门不允许报名)
    pub fn without_form(department: impl Into<String>) -> Self {
        Self {
            department: department.into(),
            messages: Vec::new(),
            fields: None,
        }
    }

    /// 用 `values` 填充表单的页面
    pub fn with_form(
        department: impl Into<String>,
        schema: &FormSchema,
        values: &FormValues,
        errors: &FieldErrors,
    ) -> Self {
        let fields = schema
            .fields()
            .iter()
            .map(|spec| {
                let value = values
                    .get(spec.name)
                    .map(str::to_string)
                    .unwrap_or_else(|| spec.default_value());
                FieldView::build(spec, value, errors)
            })
            .collect();
        Self {
            department: department.into(),
            messages: Vec::new(),
            fields: Some(fields),
        }
    }

    pub fn message(mut self, message: PageMessage) -> Self {
        self.messages.push(message);
        self
    }

    pub fn messages(&self) -> &[PageMessage] {
        &self.messages
    }

    pub fn has_form(&self) -> bool {
        self.fields.is_some()
    }

    pub fn render(&self) -> AppResult<String> {
        let action = format!("/annual/{}/register", self.department);
        let fields = self.fields.as_deref().unwrap_or_default();
        RegisterPageTemplate {
            title: "Annual event registration",
            action: &action,
            messages: &self.messages,
            fields,
            show_form: self.fields.is_some(),
        }
        .render()
        .map_err(|e| AppError::template(e.to_string()))
    }
}

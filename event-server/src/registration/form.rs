//! Registration 表单定义
//!
//! 字段只声明一次 ([`FieldSpec`])，启动时由 [`FormSchema::validate`] 校验，
//! 渲染表单和解析提交值都使用同一份定义。

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::ValidateEmail;

// ========== 字段名 ==========

pub const EMPLOYEE_NAME: &str = "employee_name";
pub const EMPLOYEE_ONE_PLUS: &str = "employee_one_plus";
pub const EMPLOYEE_KIDS: &str = "employee_kids";
pub const EMPLOYEE_VEGETARIANS: &str = "employee_vegetarians";
pub const EMPLOYEE_EMAIL: &str = "employee_email";

/// 邮箱字段允许的最大长度
pub const EMAIL_MAX_LENGTH: usize = 254;

/// 字段类型及其取值范围
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text { max_length: usize },
    Email { max_length: usize },
    Number { min: i64, max: i64 },
    /// 是/否单选，提交值为 `1` / `0`
    Boolean,
}

/// 表单字段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// 只有数字和布尔字段有默认值
    pub default: Option<i64>,
}

impl FieldSpec {
    pub fn text(name: &'static str, label: &'static str, max_length: usize) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Text { max_length },
            required: true,
            default: None,
        }
    }

    pub fn email(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Email {
                max_length: EMAIL_MAX_LENGTH,
            },
            required: true,
            default: None,
        }
    }

    pub fn number(name: &'static str, label: &'static str, min: i64, max: i64) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Number { min, max },
            required: true,
            default: None,
        }
    }

    pub fn boolean(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Boolean,
            required: true,
            default: None,
        }
    }

    pub fn with_default(mut self, default: i64) -> Self {
        self.default = Some(default);
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// 空表单中渲染的默认值
    pub fn default_value(&self) -> String {
        self.default.map(|d| d.to_string()).unwrap_or_default()
    }

    fn parse(&self, raw: Option<&str>) -> Result<Option<FieldValue>, FieldError> {
        let raw = raw.unwrap_or_default();
        if raw.trim().is_empty() {
            if self.required {
                return Err(FieldError::new(
                    self.name,
                    FieldErrorKind::Required,
                    format!("{} field is required.", self.label),
                ));
            }
            return Ok(None);
        }

        let value = match self.kind {
            FieldKind::Text { max_length } => {
                let length = raw.chars().count();
                if length > max_length {
                    return Err(FieldError::new(
                        self.name,
                        FieldErrorKind::TooLong,
                        format!(
                            "{} cannot be longer than {max_length} characters but is currently {length} characters long.",
                            self.label
                        ),
                    ));
                }
                FieldValue::Text(raw.to_string())
            }
            FieldKind::Email { max_length } => {
                let address = raw.trim();
                let length = address.chars().count();
                if length > max_length {
                    return Err(FieldError::new(
                        self.name,
                        FieldErrorKind::TooLong,
                        format!(
                            "{} cannot be longer than {max_length} characters but is currently {length} characters long.",
                            self.label
                        ),
                    ));
                }
                if !address.validate_email() {
                    return Err(FieldError::new(
                        self.name,
                        FieldErrorKind::InvalidEmail,
                        format!("The email address {address} is not valid."),
                    ));
                }
                FieldValue::Text(address.to_string())
            }
            FieldKind::Number { min, max } => {
                let number: i64 = raw.trim().parse().map_err(|_| {
                    FieldError::new(
                        self.name,
                        FieldErrorKind::NotANumber,
                        format!("{} must be a number.", self.label),
                    )
                })?;
                if number < min || number > max {
                    return Err(FieldError::new(
                        self.name,
                        FieldErrorKind::OutOfRange,
                        format!("{} must be between {min} and {max}.", self.label),
                    ));
                }
                FieldValue::Number(number)
            }
            FieldKind::Boolean => match raw.trim() {
                "1" => FieldValue::Boolean(true),
                "0" => FieldValue::Boolean(false),
                _ => {
                    return Err(FieldError::new(
                        self.name,
                        FieldErrorKind::InvalidChoice,
                        format!("An illegal choice has been detected for {}.", self.label),
                    ));
                }
            },
        };
        Ok(Some(value))
    }
}

/// 表单定义错误，仅在启动时检查
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("field name must not be empty")]
    EmptyName,

    #[error("duplicate field: {0}")]
    DuplicateField(&'static str),

    #[error("field {0}: min is greater than max")]
    InvalidBounds(&'static str),

    #[error("field {0}: max length must be positive")]
    ZeroMaxLength(&'static str),

    #[error("field {name}: default {default} is not allowed")]
    InvalidDefault { name: &'static str, default: i64 },
}

/// 按顺序排列的表单字段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSchema {
    fields: Vec<FieldSpec>,
}

impl FormSchema {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    /// 年会报名表单
    pub fn registration() -> Self {
        Self::new(vec![
            FieldSpec::text(EMPLOYEE_NAME, "Name of the employee", 255),
            FieldSpec::boolean(EMPLOYEE_ONE_PLUS, "One plus").with_default(0),
            FieldSpec::number(EMPLOYEE_KIDS, "Amount of kids", 0, 100).with_default(0),
            FieldSpec::number(EMPLOYEE_VEGETARIANS, "Amount of vegetarians", 0, 100)
                .with_default(0),
            FieldSpec::email(EMPLOYEE_EMAIL, "Email address"),
        ])
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// 校验字段定义本身
    pub fn validate(&self) -> Result<(), SchemaError> {
        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.name.trim().is_empty() {
                return Err(SchemaError::EmptyName);
            }
            if !seen.insert(field.name) {
                return Err(SchemaError::DuplicateField(field.name));
            }

            match (field.kind, field.default) {
                (FieldKind::Text { max_length } | FieldKind::Email { max_length }, default) => {
                    if max_length == 0 {
                        return Err(SchemaError::ZeroMaxLength(field.name));
                    }
                    if let Some(default) = default {
                        return Err(SchemaError::InvalidDefault {
                            name: field.name,
                            default,
                        });
                    }
                }
                (FieldKind::Number { min, max }, default) => {
                    if min > max {
                        return Err(SchemaError::InvalidBounds(field.name));
                    }
                    if let Some(default) = default
                        && (default < min || default > max)
                    {
                        return Err(SchemaError::InvalidDefault {
                            name: field.name,
                            default,
                        });
                    }
                }
                (FieldKind::Boolean, Some(default)) if default != 0 && default != 1 => {
                    return Err(SchemaError::InvalidDefault {
                        name: field.name,
                        default,
                    });
                }
                (FieldKind::Boolean, _) => {}
            }
        }
        Ok(())
    }

    /// 未填写表单的值
    pub fn defaults(&self) -> FormValues {
        let values = self
            .fields
            .iter()
            .map(|f| (f.name.to_string(), f.default_value()))
            .collect();
        FormValues(values)
    }

    /// 逐字段格式校验，收集全部错误
    pub fn parse(&self, input: &FormValues) -> Result<ParsedForm, FieldErrors> {
        let mut values = HashMap::new();
        let mut errors = FieldErrors::default();
        for field in &self.fields {
            match field.parse(input.get(field.name)) {
                Ok(Some(value)) => {
                    values.insert(field.name, value);
                }
                Ok(None) => {}
                Err(error) => errors.push(error),
            }
        }
        if errors.is_empty() {
            Ok(ParsedForm { values })
        } else {
            Err(errors)
        }
    }
}

/// 按字段名存放的原始提交值
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormValues(HashMap<String, String>);

impl FormValues {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }
}

impl From<HashMap<String, String>> for FormValues {
    fn from(values: HashMap<String, String>) -> Self {
        Self(values)
    }
}

impl<const N: usize> From<[(&str, &str); N]> for FormValues {
    fn from(pairs: [(&str, &str); N]) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

/// 格式校验后的字段值
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Number(i64),
    Boolean(bool),
}

/// [`FormSchema::parse`] 成功后的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedForm {
    values: HashMap<&'static str, FieldValue>,
}

impl ParsedForm {
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(FieldValue::Text(v)) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn number(&self, name: &str) -> Option<i64> {
        match self.values.get(name) {
            Some(FieldValue::Number(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn boolean(&self, name: &str) -> Option<bool> {
        match self.values.get(name) {
            Some(FieldValue::Boolean(v)) => Some(*v),
            _ => None,
        }
    }
}

// ========== 字段错误 ==========

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    Required,
    TooLong,
    NotANumber,
    OutOfRange,
    InvalidChoice,
    InvalidEmail,
    VegetarianCountExceeded,
    DuplicateEmail,
}

impl FieldErrorKind {
    /// 业务规则仅在全部格式校验通过后执行
    pub fn is_business_rule(&self) -> bool {
        matches!(self, Self::VegetarianCountExceeded | Self::DuplicateEmail)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub kind: FieldErrorKind,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, kind: FieldErrorKind, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind,
            message: message.into(),
        }
    }
}

/// 一次提交的全部错误，按字段顺序排列
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// `field` 的第一个错误
    pub fn for_field(&self, field: &str) -> Option<&FieldError> {
        self.0.iter().find(|e| e.field == field)
    }

    pub fn fields(&self) -> Vec<&str> {
        self.0.iter().map(|e| e.field.as_str()).collect()
    }
}

impl From<FieldError> for FieldErrors {
    fn from(error: FieldError) -> Self {
        Self(vec![error])
    }
}

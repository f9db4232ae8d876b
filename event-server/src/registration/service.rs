//! 报名提交流程
//!
//! 部门检查 → 格式校验 → 业务规则 → 持久化 → 结果

use std::sync::Arc;

use shared::models::{
    DepartmentTerm, RecordField, RecordStatus, Registration, RegistrationCreate,
};

use super::form::{
    EMPLOYEE_EMAIL, EMPLOYEE_KIDS, EMPLOYEE_NAME, EMPLOYEE_ONE_PLUS, EMPLOYEE_VEGETARIANS,
    FieldErrorKind, FieldErrors, FormSchema, FormValues,
};
use super::rules;
use super::sanitize::sanitize_title;
use crate::block::{RenderCache, record_type_tag};
use crate::core::Config;
use crate::db::repository::RepoError;
use crate::db::{DepartmentLookup, RecordStore};
use crate::utils::{AppResult, ErrorCode};

pub const REGISTERED_MESSAGE: &str = "Registered for event successfully!";
pub const STORAGE_UNAVAILABLE_MESSAGE: &str =
    "Sorry, seems that 'Registration' record type is not configured!";

/// 页面级错误，列出允许报名的部门
pub fn department_not_allowed_message(allowed: &[String]) -> String {
    format!(
        "Sorry, this department is not allowed. Try another. ( f.e. {} )",
        allowed.join(", ")
    )
}

/// 从 [`Config`] 读取的流程设置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationSettings {
    pub record_type: String,
    pub vocabulary: String,
    pub status: RecordStatus,
}

impl From<&Config> for RegistrationSettings {
    fn from(config: &Config) -> Self {
        Self {
            record_type: config.registration_record_type.clone(),
            vocabulary: config.department_vocabulary.clone(),
            status: RecordStatus::from_published(config.registration_published),
        }
    }
}

/// 部门 URL 段的解析结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepartmentGate {
    Allowed(DepartmentTerm),
    NotAllowed { allowed: Vec<String> },
}

/// 单次提交的结果
#[derive(Debug, Clone)]
pub enum SubmissionOutcome {
    Registered(Registration),
    /// 格式或业务规则错误，附带用于重新渲染的输入
    Rejected {
        errors: FieldErrors,
        input: FormValues,
    },
    DepartmentNotAllowed {
        allowed: Vec<String>,
    },
    /// 存储拒绝写入，原因只记录日志
    StorageUnavailable {
        input: FormValues,
    },
}

impl SubmissionOutcome {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::Registered(_) => ErrorCode::Success,
            Self::Rejected { errors, .. } => {
                if errors.iter().any(|e| e.kind == FieldErrorKind::DuplicateEmail) {
                    ErrorCode::DuplicateEmail
                } else if errors
                    .iter()
                    .any(|e| e.kind == FieldErrorKind::VegetarianCountExceeded)
                {
                    ErrorCode::VegetarianCountExceeded
                } else {
                    ErrorCode::RegistrationRejected
                }
            }
            Self::DepartmentNotAllowed { .. } => ErrorCode::DepartmentNotAllowed,
            Self::StorageUnavailable { .. } => ErrorCode::RegistrationTypeMissing,
        }
    }

    /// 重新渲染页面的状态码，所有拒绝均为 422
    pub fn http_status(&self) -> http::StatusCode {
        match self {
            Self::Rejected { .. } => ErrorCode::RegistrationRejected.http_status(),
            _ => self.error_code().http_status(),
        }
    }

    /// 状态或错误提示
    pub fn message(&self) -> String {
        match self {
            Self::Registered(_) => REGISTERED_MESSAGE.to_string(),
            Self::Rejected { errors, .. } => errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join(" "),
            Self::DepartmentNotAllowed { allowed } => department_not_allowed_message(allowed),
            Self::StorageUnavailable { .. } => STORAGE_UNAVAILABLE_MESSAGE.to_string(),
        }
    }
}

/// 报名校验与保存
#[derive(Clone)]
pub struct RegistrationService {
    store: Arc<dyn RecordStore>,
    departments: Arc<dyn DepartmentLookup>,
    cache: Arc<RenderCache>,
    schema: Arc<FormSchema>,
    settings: RegistrationSettings,
}

impl RegistrationService {
    pub fn new(
        store: Arc<dyn RecordStore>,
        departments: Arc<dyn DepartmentLookup>,
        cache: Arc<RenderCache>,
        schema: Arc<FormSchema>,
        settings: RegistrationSettings,
    ) -> Self {
        Self {
            store,
            departments,
            cache,
            schema,
            settings,
        }
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    /// 渲染或接收表单前先解析部门
    pub async fn prepare(&self, department: &str) -> AppResult<DepartmentGate> {
        match self
            .departments
            .resolve(&self.settings.vocabulary, department)
            .await?
        {
            Some(term) => Ok(DepartmentGate::Allowed(term)),
            None => {
                let allowed = self
                    .departments
                    .terms(&self.settings.vocabulary)
                    .await?
                    .into_iter()
                    .map(|t| t.name)
                    .collect();
                Ok(DepartmentGate::NotAllowed { allowed })
            }
        }
    }

    /// 执行一次完整提交
    ///
    /// `Err` 仅用于读取失败 (部门查询、重复检查)，其余结果都通过
    /// [`SubmissionOutcome`] 返回。
    pub async fn submit(&self, department: &str, input: FormValues) -> AppResult<SubmissionOutcome> {
        let term = match self.prepare(department).await? {
            DepartmentGate::Allowed(term) => term,
            DepartmentGate::NotAllowed { allowed } => {
                tracing::info!(department, "Registration refused: department not allowed");
                return Ok(SubmissionOutcome::DepartmentNotAllowed { allowed });
            }
        };

        let parsed = match self.schema.parse(&input) {
            Ok(parsed) => parsed,
            Err(errors) => {
                tracing::info!(fields = ?errors.fields(), "Registration rejected: invalid input");
                return Ok(SubmissionOutcome::Rejected { errors, input });
            }
        };

        let employee_name = parsed.text(EMPLOYEE_NAME).unwrap_or_default().to_string();
        let email = parsed.text(EMPLOYEE_EMAIL).unwrap_or_default().to_string();
        let brings_plus_one = parsed.boolean(EMPLOYEE_ONE_PLUS).unwrap_or_default();
        let kids = parsed.number(EMPLOYEE_KIDS).unwrap_or_default();
        let vegetarians = parsed.number(EMPLOYEE_VEGETARIANS).unwrap_or_default();

        let mut errors = FieldErrors::default();
        if let Err(error) = rules::check_vegetarians(vegetarians, kids, brings_plus_one) {
            errors.push(error);
        }
        let existing = self
            .store
            .find_by_field(&self.settings.record_type, RecordField::EmailAddress, &email)
            .await?;
        if !existing.is_empty() {
            errors.push(rules::duplicate_email(&email));
        }
        if !errors.is_empty() {
            tracing::info!(fields = ?errors.fields(), "Registration rejected: business rules");
            return Ok(SubmissionOutcome::Rejected { errors, input });
        }

        let data = RegistrationCreate {
            record_type: self.settings.record_type.clone(),
            title: sanitize_title(&employee_name),
            employee_name,
            brings_plus_one,
            kids_count: kids,
            vegetarian_count: vegetarians,
            email_address: email.clone(),
            department: Some(term.name.clone()),
            status: self.settings.status,
        };

        match self.store.create(data).await {
            Ok(record) => {
                self.cache
                    .invalidate_tag(&record_type_tag(&self.settings.record_type));
                tracing::info!(id = record.id, department = %term.name, "Registered for annual event");
                Ok(SubmissionOutcome::Registered(record))
            }
            Err(RepoError::Duplicate(_)) => {
                tracing::info!("Registration rejected: email registered concurrently");
                Ok(SubmissionOutcome::Rejected {
                    errors: rules::duplicate_email(&email).into(),
                    input,
                })
            }
            Err(e) => {
                tracing::error!(error = %e, record_type = %self.settings.record_type, "Failed to store registration");
                Ok(SubmissionOutcome::StorageUnavailable { input })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{BLOCK_ID, RenderedBlock};
    use crate::db::{DbService, SqliteDepartmentLookup, SqliteRecordStore};
    use async_trait::async_trait;
    use crate::db::repository::RepoResult;
    use shared::models::CountFilter;

    fn settings() -> RegistrationSettings {
        RegistrationSettings {
            record_type: "registration".to_string(),
            vocabulary: "annual_departments".to_string(),
            status: RecordStatus::Active,
        }
    }

    fn service_with(db: &DbService, store: Arc<dyn RecordStore>, settings: RegistrationSettings) -> RegistrationService {
        RegistrationService::new(
            store,
            Arc::new(SqliteDepartmentLookup::new(db.pool.clone())),
            Arc::new(RenderCache::new()),
            Arc::new(FormSchema::registration()),
            settings,
        )
    }

    fn service(db: &DbService) -> RegistrationService {
        service_with(db, Arc::new(SqliteRecordStore::new(db.pool.clone())), settings())
    }

    fn input(email: &str, kids: &str, plus_one: &str, vegetarians: &str) -> FormValues {
        FormValues::from([
            (EMPLOYEE_NAME, "Alice"),
            (EMPLOYEE_ONE_PLUS, plus_one),
            (EMPLOYEE_KIDS, kids),
            (EMPLOYEE_VEGETARIANS, vegetarians),
            (EMPLOYEE_EMAIL, email),
        ])
    }

    async fn count(db: &DbService) -> i64 {
        SqliteRecordStore::new(db.pool.clone())
            .count(&CountFilter::active("registration"))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_submission_is_stored() {
        let db = DbService::in_memory().await.unwrap();
        let outcome = service(&db)
            .submit("it", input("alice@example.com", "2", "1", "4"))
            .await
            .unwrap();

        let SubmissionOutcome::Registered(record) = &outcome else {
            panic!("expected registration, got {outcome:?}");
        };
        assert_eq!(record.employee_name, "Alice");
        assert_eq!(record.title, "Alice");
        assert!(record.brings_plus_one);
        assert_eq!(record.kids_count, 2);
        assert_eq!(record.vegetarian_count, 4);
        assert_eq!(record.email_address, "alice@example.com");
        assert_eq!(record.department.as_deref(), Some("it"));
        assert_eq!(outcome.message(), REGISTERED_MESSAGE);
        assert_eq!(outcome.error_code(), ErrorCode::Success);
        assert_eq!(count(&db).await, 1);
    }

    #[tokio::test]
    async fn test_too_many_vegetarians_is_rejected() {
        let db = DbService::in_memory().await.unwrap();
        let outcome = service(&db)
            .submit("it", input("bob@example.com", "2", "0", "4"))
            .await
            .unwrap();

        let SubmissionOutcome::Rejected { errors, input } = &outcome else {
            panic!("expected rejection, got {outcome:?}");
        };
        let error = errors.for_field(EMPLOYEE_VEGETARIANS).unwrap();
        assert_eq!(
            error.message,
            "The number of vegetarians - 4 is higher than number of people - 3."
        );
        assert_eq!(input.get(EMPLOYEE_EMAIL), Some("bob@example.com"));
        assert_eq!(outcome.error_code(), ErrorCode::VegetarianCountExceeded);
        assert_eq!(count(&db).await, 0);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let db = DbService::in_memory().await.unwrap();
        let service = service(&db);
        let first = service
            .submit("it", input("carol@example.com", "0", "0", "0"))
            .await
            .unwrap();
        assert!(matches!(first, SubmissionOutcome::Registered(_)));

        let second = service
            .submit("finance", input("carol@example.com", "0", "0", "0"))
            .await
            .unwrap();
        let SubmissionOutcome::Rejected { errors, .. } = &second else {
            panic!("expected rejection, got {second:?}");
        };
        assert_eq!(
            errors.for_field(EMPLOYEE_EMAIL).unwrap().message,
            "Sorry, the email address - carol@example.com already registered for annual event."
        );
        assert_eq!(second.error_code(), ErrorCode::DuplicateEmail);
        assert_eq!(second.http_status(), http::StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(count(&db).await, 1);
    }

    #[tokio::test]
    async fn test_business_rule_errors_are_collected_together() {
        let db = DbService::in_memory().await.unwrap();
        let service = service(&db);
        service
            .submit("it", input("dave@example.com", "0", "0", "0"))
            .await
            .unwrap();

        let outcome = service
            .submit("it", input("dave@example.com", "0", "0", "5"))
            .await
            .unwrap();
        let SubmissionOutcome::Rejected { errors, .. } = outcome else {
            panic!("expected rejection");
        };
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.kind.is_business_rule()));
    }

    #[tokio::test]
    async fn test_shape_errors_skip_business_rules() {
        let db = DbService::in_memory().await.unwrap();
        let outcome = service(&db)
            .submit("it", input("not-an-email", "2", "0", "50"))
            .await
            .unwrap();
        let SubmissionOutcome::Rejected { errors, .. } = outcome else {
            panic!("expected rejection");
        };
        assert_eq!(errors.fields(), vec![EMPLOYEE_EMAIL]);
        assert_eq!(errors.iter().next().unwrap().kind, FieldErrorKind::InvalidEmail);
    }

    #[tokio::test]
    async fn test_department_is_case_insensitive() {
        let db = DbService::in_memory().await.unwrap();
        let outcome = service(&db)
            .submit("IT", input("erin@example.com", "0", "0", "0"))
            .await
            .unwrap();
        let SubmissionOutcome::Registered(record) = outcome else {
            panic!("expected registration");
        };
        assert_eq!(record.department.as_deref(), Some("it"));
    }

    #[tokio::test]
    async fn test_unknown_department_is_refused() {
        let db = DbService::in_memory().await.unwrap();
        let service = service(&db);

        let gate = service.prepare("marketing").await.unwrap();
        assert_eq!(
            gate,
            DepartmentGate::NotAllowed {
                allowed: vec!["finance".into(), "it".into(), "consulting".into()]
            }
        );

        let outcome = service
            .submit("marketing", input("frank@example.com", "0", "0", "0"))
            .await
            .unwrap();
        assert_eq!(
            outcome.message(),
            "Sorry, this department is not allowed. Try another. ( f.e. finance, it, consulting )"
        );
        assert_eq!(outcome.error_code(), ErrorCode::DepartmentNotAllowed);
        assert_eq!(count(&db).await, 0);
    }

    #[tokio::test]
    async fn test_title_is_sanitized() {
        let db = DbService::in_memory().await.unwrap();
        let mut values = input("grace@example.com", "0", "0", "0");
        values.insert(EMPLOYEE_NAME, "<script>x</script>Alice");

        let outcome = service(&db).submit("it", values).await.unwrap();
        let SubmissionOutcome::Registered(record) = outcome else {
            panic!("expected registration");
        };
        assert_eq!(record.title, "Alice");
        assert_eq!(record.employee_name, "<script>x</script>Alice");
    }

    #[tokio::test]
    async fn test_missing_record_type_reports_storage_unavailable() {
        let db = DbService::in_memory().await.unwrap();
        let mut settings = settings();
        settings.record_type = "missing".to_string();
        let service = service_with(
            &db,
            Arc::new(SqliteRecordStore::new(db.pool.clone())),
            settings,
        );

        let outcome = service
            .submit("it", input("heidi@example.com", "0", "0", "0"))
            .await
            .unwrap();
        assert!(matches!(outcome, SubmissionOutcome::StorageUnavailable { .. }));
        assert_eq!(outcome.message(), STORAGE_UNAVAILABLE_MESSAGE);
        assert!(!outcome.message().contains("missing"));

        let stored: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM record")
            .fetch_one(&db.pool)
            .await
            .unwrap();
        assert_eq!(stored, 0);
    }

    /// 预检查看不到并发插入的存储
    struct RacingStore(SqliteRecordStore);

    #[async_trait]
    impl RecordStore for RacingStore {
        async fn create(&self, data: RegistrationCreate) -> RepoResult<Registration> {
            self.0.create(data).await
        }

        async fn find_by_field(
            &self,
            _record_type: &str,
            _field: RecordField,
            _value: &str,
        ) -> RepoResult<Vec<Registration>> {
            Ok(Vec::new())
        }

        async fn count(&self, filter: &CountFilter) -> RepoResult<i64> {
            self.0.count(filter).await
        }
    }

    #[tokio::test]
    async fn test_unique_violation_on_insert_is_a_duplicate_email() {
        let db = DbService::in_memory().await.unwrap();
        let store = Arc::new(RacingStore(SqliteRecordStore::new(db.pool.clone())));
        let service = service_with(&db, store, settings());

        service
            .submit("it", input("ivan@example.com", "0", "0", "0"))
            .await
            .unwrap();
        let outcome = service
            .submit("it", input("ivan@example.com", "0", "0", "0"))
            .await
            .unwrap();

        let SubmissionOutcome::Rejected { errors, .. } = outcome else {
            panic!("expected rejection");
        };
        assert_eq!(
            errors.for_field(EMPLOYEE_EMAIL).unwrap().kind,
            FieldErrorKind::DuplicateEmail
        );
        assert_eq!(count(&db).await, 1);
    }

    #[tokio::test]
    async fn test_success_invalidates_count_block() {
        let db = DbService::in_memory().await.unwrap();
        let cache = Arc::new(RenderCache::new());
        let service = RegistrationService::new(
            Arc::new(SqliteRecordStore::new(db.pool.clone())),
            Arc::new(SqliteDepartmentLookup::new(db.pool.clone())),
            cache.clone(),
            Arc::new(FormSchema::registration()),
            settings(),
        );
        let tags = vec![record_type_tag("registration")];
        let stamp = cache.stamp(&tags);
        assert!(cache.insert(
            BLOCK_ID,
            RenderedBlock {
                html: "stale".to_string(),
                cache_tags: tags,
            },
            stamp,
        ));

        service
            .submit("it", input("judy@example.com", "0", "0", "0"))
            .await
            .unwrap();
        assert!(cache.get(BLOCK_ID).is_none());
    }

    #[tokio::test]
    async fn test_unpublished_setting_creates_inactive_records() {
        let db = DbService::in_memory().await.unwrap();
        let mut settings = settings();
        settings.status = RecordStatus::Unpublished;
        let service = service_with(
            &db,
            Arc::new(SqliteRecordStore::new(db.pool.clone())),
            settings,
        );

        let outcome = service
            .submit("it", input("ken@example.com", "0", "0", "0"))
            .await
            .unwrap();
        let SubmissionOutcome::Registered(record) = outcome else {
            panic!("expected registration");
        };
        assert_eq!(record.status, RecordStatus::Unpublished);
        assert_eq!(count(&db).await, 0);
    }
}

use std::sync::Arc;

use anyhow::Context;

use crate::block::{CountAlterPipeline, RegistrationCountQuery, RenderCache};
use crate::core::Config;
use crate::db::{DbService, DepartmentLookup, RecordStore, SqliteDepartmentLookup, SqliteRecordStore};
use crate::registration::{FormSchema, RegistrationService, RegistrationSettings};

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝，所有权成本极低。启动后除渲染缓存外均为只读。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | DbService | SQLite 连接池 |
/// | store | Arc<dyn RecordStore> | 记录存储 |
/// | departments | Arc<dyn DepartmentLookup> | 部门词表查询 |
/// | schema | Arc<FormSchema> | 报名表单定义 (启动时校验) |
/// | count_hooks | Arc<CountAlterPipeline> | 计数修改钩子 |
/// | render_cache | Arc<RenderCache> | 区块渲染缓存 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// SQLite 数据库
    pub db: DbService,
    /// 记录存储
    pub store: Arc<dyn RecordStore>,
    /// 部门词表
    pub departments: Arc<dyn DepartmentLookup>,
    /// 报名表单
    pub schema: Arc<FormSchema>,
    /// 计数钩子
    pub count_hooks: Arc<CountAlterPipeline>,
    /// 渲染缓存
    pub render_cache: Arc<RenderCache>,
}

impl ServerState {
    /// 由已打开的数据库构造状态
    ///
    /// 表单定义在这里校验，非法定义直接拒绝启动
    pub fn new(config: Config, db: DbService, count_hooks: CountAlterPipeline) -> anyhow::Result<Self> {
        let schema = FormSchema::registration();
        schema
            .validate()
            .context("Invalid registration form schema")?;

        Ok(Self {
            store: Arc::new(SqliteRecordStore::new(db.pool.clone())),
            departments: Arc::new(SqliteDepartmentLookup::new(db.pool.clone())),
            schema: Arc::new(schema),
            count_hooks: Arc::new(count_hooks),
            render_cache: Arc::new(RenderCache::new()),
            config,
            db,
        })
    }

    /// 初始化服务器状态
    ///
    /// 创建数据库目录、打开数据库并执行迁移
    pub async fn initialize(config: &Config) -> anyhow::Result<Self> {
        Self::initialize_with_hooks(config, CountAlterPipeline::new()).await
    }

    /// 同 [`initialize()`](Self::initialize)，附带预先注册的计数钩子
    pub async fn initialize_with_hooks(
        config: &Config,
        count_hooks: CountAlterPipeline,
    ) -> anyhow::Result<Self> {
        if let Some(dir) = config.database_dir() {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create database directory {}", dir.display()))?;
        }

        let db = DbService::new(&config.database_path)
            .await
            .context("Failed to open database")?;

        Self::new(config.clone(), db, count_hooks)
    }

    /// 报名流程服务
    pub fn registration_service(&self) -> RegistrationService {
        RegistrationService::new(
            self.store.clone(),
            self.departments.clone(),
            self.render_cache.clone(),
            self.schema.clone(),
            RegistrationSettings::from(&self.config),
        )
    }

    /// 报名计数查询
    pub fn count_query(&self) -> RegistrationCountQuery {
        RegistrationCountQuery::new(
            self.store.clone(),
            self.count_hooks.clone(),
            self.config.registration_record_type.clone(),
        )
    }
}

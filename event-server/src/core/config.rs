use std::path::PathBuf;

use shared::models::{DEPARTMENT_VOCABULARY, REGISTRATION_TYPE};

/// 服务器配置 - 年会报名服务的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | DATABASE_PATH | {WORK_DIR}/database/event.db | SQLite 数据库文件 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 (RUST_LOG 优先) |
/// | LOG_DIR | - | 日志目录 (存在时按天滚动写文件) |
/// | LOG_JSON | false | JSON 格式日志 |
/// | DEPARTMENT_VOCABULARY | annual_departments | 部门词表 |
/// | REGISTRATION_RECORD_TYPE | registration | 报名记录类型 |
/// | REGISTRATION_PUBLISHED | true | 新报名是否直接发布 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/event HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志等文件
    pub work_dir: String,
    /// HTTP 服务端口
    pub http_port: u16,
    /// SQLite 数据库路径
    pub database_path: String,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 日志级别
    pub log_level: String,
    /// 日志目录
    pub log_dir: Option<String>,
    /// JSON 日志
    pub log_json: bool,
    /// 允许报名的部门所在词表
    pub department_vocabulary: String,
    /// 报名记录类型
    pub registration_record_type: String,
    /// 新报名的默认发布状态
    pub registration_published: bool,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into());
        let database_path = std::env::var("DATABASE_PATH").unwrap_or_else(|_| {
            PathBuf::from(&work_dir)
                .join("database")
                .join("event.db")
                .to_string_lossy()
                .into_owned()
        });

        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            database_path,
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            log_json: std::env::var("LOG_JSON")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            department_vocabulary: std::env::var("DEPARTMENT_VOCABULARY")
                .unwrap_or_else(|_| DEPARTMENT_VOCABULARY.into()),
            registration_record_type: std::env::var("REGISTRATION_RECORD_TYPE")
                .unwrap_or_else(|_| REGISTRATION_TYPE.into()),
            registration_published: std::env::var("REGISTRATION_PUBLISHED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            work_dir,
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.database_path = PathBuf::from(&config.work_dir)
            .join("database")
            .join("event.db")
            .to_string_lossy()
            .into_owned();
        config.http_port = http_port;
        config
    }

    /// 数据库所在目录
    pub fn database_dir(&self) -> Option<PathBuf> {
        PathBuf::from(&self.database_path)
            .parent()
            .map(|p| p.to_path_buf())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

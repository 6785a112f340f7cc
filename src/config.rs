use std::time::Duration;

/// 程序配置
///
/// 所有字段都有默认值；环境变量（以及 `.env` 文件）可以覆盖。
#[derive(Clone, Debug)]
pub struct Config {
    /// 已运行浏览器的调试端口；未设置时自行启动浏览器
    pub browser_debug_port: Option<u16>,
    /// 浏览器可执行文件路径（启动模式）
    pub chrome_executable: Option<String>,
    /// 是否使用无头模式（启动模式）
    pub headless: bool,
    /// 站点根地址
    pub base_url: String,
    pub login_path: String,
    pub books_path: String,
    /// 登录成功后 URL 中应包含的片段
    pub profile_url_marker: String,
    // --- 登录凭据 ---
    pub username: String,
    pub password: String,
    // --- 目录与文件 ---
    pub log_dir: String,
    pub reports_dir: String,
    pub data_dir: String,
    pub database_path: String,
    pub csv_path: String,
    /// 任务文件（闹钟与网页分区）
    pub job_file: String,
    /// 闹钟执行历史
    pub history_file: String,
    // --- 等待与按键节奏 ---
    pub wait_timeout: Duration,
    pub poll_interval: Duration,
    pub inter_key_delay: Duration,
    pub alarm_open_delay: Duration,
    pub alarm_save_delay: Duration,
    /// 启动时钟应用后的等待时间
    pub clock_launch_delay: Duration,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            browser_debug_port: None,
            chrome_executable: None,
            headless: false,
            base_url: "https://demoqa.com".to_string(),
            login_path: "/login".to_string(),
            books_path: "/books".to_string(),
            profile_url_marker: "profile".to_string(),
            username: String::new(),
            password: String::new(),
            log_dir: "logs".to_string(),
            reports_dir: "reports".to_string(),
            data_dir: "data".to_string(),
            database_path: "data/demoqa.db".to_string(),
            csv_path: "data/books.csv".to_string(),
            job_file: "job.toml".to_string(),
            history_file: "historico_robo/historico.txt".to_string(),
            wait_timeout: Duration::from_secs(10),
            poll_interval: Duration::from_millis(250),
            inter_key_delay: Duration::from_millis(100),
            alarm_open_delay: Duration::from_secs(2),
            alarm_save_delay: Duration::from_secs(2),
            clock_launch_delay: Duration::from_secs(5),
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 从环境变量加载配置（先读取 `.env`）
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let default = Self::default();
        Self {
            browser_debug_port: env_parse("BROWSER_DEBUG_PORT").or(default.browser_debug_port),
            chrome_executable: std::env::var("CHROME_EXECUTABLE")
                .ok()
                .or(default.chrome_executable),
            headless: env_parse("HEADLESS").unwrap_or(default.headless),
            base_url: env_string("BASE_URL", default.base_url),
            login_path: env_string("LOGIN_PATH", default.login_path),
            books_path: env_string("BOOKS_PATH", default.books_path),
            profile_url_marker: env_string("PROFILE_URL_MARKER", default.profile_url_marker),
            username: env_string("DEMOQA_USERNAME", default.username),
            password: env_string("DEMOQA_PASSWORD", default.password),
            log_dir: env_string("LOG_DIR", default.log_dir),
            reports_dir: env_string("REPORTS_DIR", default.reports_dir),
            data_dir: env_string("DATA_DIR", default.data_dir),
            database_path: env_string("DATABASE_PATH", default.database_path),
            csv_path: env_string("CSV_PATH", default.csv_path),
            job_file: env_string("JOB_FILE", default.job_file),
            history_file: env_string("HISTORY_FILE", default.history_file),
            wait_timeout: env_parse("WAIT_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(default.wait_timeout),
            poll_interval: env_millis("POLL_INTERVAL_MS", default.poll_interval),
            inter_key_delay: env_millis("INTER_KEY_DELAY_MS", default.inter_key_delay),
            alarm_open_delay: env_millis("ALARM_OPEN_DELAY_MS", default.alarm_open_delay),
            alarm_save_delay: env_millis("ALARM_SAVE_DELAY_MS", default.alarm_save_delay),
            clock_launch_delay: env_millis("CLOCK_LAUNCH_DELAY_MS", default.clock_launch_delay),
            verbose_logging: env_parse("VERBOSE_LOGGING").unwrap_or(default.verbose_logging),
        }
    }

    /// 拼接站点地址
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

fn env_string(name: &str, default: String) -> String {
    std::env::var(name).unwrap_or(default)
}

fn env_millis(name: &str, default: Duration) -> Duration {
    env_parse(name).map(Duration::from_millis).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let config = Config {
            base_url: "https://demoqa.com/".to_string(),
            ..Config::default()
        };
        assert_eq!(config.url("/books"), "https://demoqa.com/books");
    }

    #[test]
    fn test_unparsable_millis_falls_back_to_default() {
        std::env::set_var("RPA_ROBOT_TEST_BAD_MILLIS", "logo");
        std::env::set_var("RPA_ROBOT_TEST_GOOD_MILLIS", "250");
        assert_eq!(
            env_millis("RPA_ROBOT_TEST_BAD_MILLIS", Duration::from_millis(7)),
            Duration::from_millis(7)
        );
        assert_eq!(
            env_millis("RPA_ROBOT_TEST_GOOD_MILLIS", Duration::ZERO),
            Duration::from_millis(250)
        );
    }
}

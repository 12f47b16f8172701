use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub collection: CollectionConfig,
    #[serde(default)]
    pub commands: CommandsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    /// Pause between collection passes.
    pub refresh_interval_ms: u64,
    /// Hard limit for each scheduler command; a timeout fails the pass.
    pub command_timeout_secs: u64,
    /// Header lines subtracted from the job listing line count.
    /// Plain `qstat` prints 2; `qstat -a` prints 5.
    pub job_header_lines: u64,
    /// How often to log collection stats at INFO level.
    pub stats_log_interval_secs: u64,
    /// Shell used to run command templates (`<shell> -c <template>`).
    pub shell: String,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: 5000,
            command_timeout_secs: 30,
            job_header_lines: 2,
            stats_log_interval_secs: 300,
            shell: "sh".into(),
        }
    }
}

/// Shell pipelines for each scheduler query.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CommandsConfig {
    pub job_count: String,
    pub node_description: String,
    pub job_state_counts: String,
    pub job_detail: String,
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            job_count: "qstat | wc -l".into(),
            node_description: "pbsnodes -a".into(),
            job_state_counts: "qstat -a | tail -n +6 | awk '{print $10}' | sort | uniq -c"
                .into(),
            job_detail: "qstat -f".into(),
        }
    }
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("reading config {}: {}", path, e))?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            !self.server.host.is_empty(),
            "server.host must be non-empty"
        );
        anyhow::ensure!(
            self.collection.refresh_interval_ms > 0,
            "collection.refresh_interval_ms must be > 0, got {}",
            self.collection.refresh_interval_ms
        );
        anyhow::ensure!(
            self.collection.command_timeout_secs > 0,
            "collection.command_timeout_secs must be > 0, got {}",
            self.collection.command_timeout_secs
        );
        anyhow::ensure!(
            self.collection.stats_log_interval_secs > 0,
            "collection.stats_log_interval_secs must be > 0, got {}",
            self.collection.stats_log_interval_secs
        );
        anyhow::ensure!(
            !self.collection.shell.is_empty(),
            "collection.shell must be non-empty"
        );
        for (name, template) in [
            ("job_count", &self.commands.job_count),
            ("node_description", &self.commands.node_description),
            ("job_state_counts", &self.commands.job_state_counts),
            ("job_detail", &self.commands.job_detail),
        ] {
            anyhow::ensure!(
                !template.trim().is_empty(),
                "commands.{} must be non-empty",
                name
            );
        }
        Ok(())
    }
}

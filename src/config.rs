use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use anyhow::Result;
use regex::Regex;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Where the pretrained model lives and how the pipeline is invoked
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "default_service_url")]
    pub service_url: String,
    #[serde(default = "default_model_path")]
    pub model_path: String,
    #[serde(default = "default_task")]
    pub task: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_service_url() -> String {
    "http://localhost:8001".to_string()
}

fn default_model_path() -> String {
    "model/t5-small".to_string()
}

fn default_task() -> String {
    "translation_XX_to_YY".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            service_url: default_service_url(),
            model_path: default_model_path(),
            task: default_task(),
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            anyhow::bail!("Configuration file not found: {}", path);
        }

        let bytes = fs::read(path)?;
        // Strips a UTF-8 BOM if present
        let (content, _, had_errors) = encoding_rs::UTF_8.decode(&bytes);
        if had_errors {
            anyhow::bail!("Configuration file is not valid UTF-8: {}", path);
        }
        let content = substitute_env_vars(&content);

        let path_lower = path.to_lowercase();
        if path_lower.ends_with(".json") {
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(serde_yaml::from_str(&content)?)
        }
    }

    /// Apply TRANSLATE_HOST, TRANSLATE_PORT and PIPELINE_SERVICE_URL overrides
    pub fn apply_env_overrides(self) -> Result<Self> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(host) = lookup("TRANSLATE_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("TRANSLATE_PORT") {
            self.server.port = port
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid TRANSLATE_PORT {:?}: {}", port, e))?;
        }
        if let Some(url) = lookup("PIPELINE_SERVICE_URL") {
            self.pipeline.service_url = url;
        }
        Ok(self)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Replace `${VAR_NAME}` with the variable's value, leaving unknown ones untouched
fn substitute_env_vars(content: &str) -> String {
    let pattern = Regex::new(r"\$\{(\w+)\}").expect("static regex");
    pattern
        .replace_all(content, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn write_temp(suffix: &str, content: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content).unwrap();
        file
    }

    #[test]
    fn defaults_match_original_service() {
        let config = Config::default();
        assert_eq!(config.bind_address(), "0.0.0.0:8000");
        assert_eq!(config.pipeline.model_path, "model/t5-small");
        assert_eq!(config.pipeline.task, "translation_XX_to_YY");
    }

    #[test]
    fn loads_partial_yaml_with_defaults() {
        let file = write_temp(".yaml", b"server:\n  port: 9000\npipeline:\n  task: translation_en_to_de\n");
        let config = Config::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.pipeline.task, "translation_en_to_de");
        assert_eq!(config.pipeline.model_path, "model/t5-small");
    }

    #[test]
    fn loads_json_with_bom() {
        let mut content = vec![0xEF, 0xBB, 0xBF];
        content.extend_from_slice(br#"{"pipeline": {"model_path": "/models/t5-base"}}"#);
        let file = write_temp(".json", &content);
        let config = Config::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.pipeline.model_path, "/models/t5-base");
    }

    #[test]
    fn substitutes_environment_variables() {
        std::env::set_var("TRANSLATE_SERVER_TEST_URL", "http://sidecar:9100");
        let out = substitute_env_vars("url: ${TRANSLATE_SERVER_TEST_URL}\nother: ${TRANSLATE_SERVER_UNSET_VAR}");
        assert_eq!(out, "url: http://sidecar:9100\nother: ${TRANSLATE_SERVER_UNSET_VAR}");
    }

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn overrides_replace_configured_values() {
        let config = Config::default()
            .apply_overrides(lookup_from(&[
                ("TRANSLATE_HOST", "127.0.0.1"),
                ("TRANSLATE_PORT", "9100"),
                ("PIPELINE_SERVICE_URL", "http://sidecar:8001"),
            ]))
            .unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:9100");
        assert_eq!(config.pipeline.service_url, "http://sidecar:8001");
        assert_eq!(config.pipeline.model_path, "model/t5-small");
    }

    #[test]
    fn no_overrides_keeps_configuration() {
        let config = Config::default().apply_overrides(lookup_from(&[])).unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:8000");
        assert_eq!(config.pipeline.service_url, "http://localhost:8001");
    }

    #[test]
    fn invalid_port_override_is_an_error() {
        for port in ["eighty", "70000", ""] {
            let err = Config::default()
                .apply_overrides(lookup_from(&[("TRANSLATE_PORT", port)]))
                .unwrap_err();
            assert!(err.to_string().contains("Invalid TRANSLATE_PORT"));
        }
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(Config::load("/nonexistent/conf.yaml").is_err());
    }
}

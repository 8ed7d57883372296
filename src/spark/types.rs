use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Сырой отчёт spark (`?raw=1`), из него читаем только нужные поля
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SparkReport {
    #[serde(default)]
    pub metadata: SparkMetadata,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SparkMetadata {
    /// Отсутствует у клиентских отчётов
    #[serde(default)]
    pub server_configurations: Option<HashMap<String, Value>>,
    #[serde(default)]
    pub system_statistics: SystemStatistics,
    #[serde(default)]
    pub platform: PlatformInfo,
    #[serde(default)]
    pub user: UserInfo,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStatistics {
    #[serde(default)]
    pub java: JavaInfo,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JavaInfo {
    #[serde(default)]
    pub vm_args: String,
    #[serde(default)]
    pub vendor_version: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformInfo {
    #[serde(default)]
    pub version: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    #[serde(default)]
    pub name: String,
}

impl SparkReport {
    pub fn is_server(&self) -> bool {
        self.metadata.server_configurations.is_some()
    }

    pub fn server_configurations(&self) -> Option<&HashMap<String, Value>> {
        self.metadata.server_configurations.as_ref()
    }

    pub fn vm_args(&self) -> &str {
        &self.metadata.system_statistics.java.vm_args
    }

    /// Мажорная версия Java: "17.0.2+8" -> 17, "1.8.0_312" -> 1, мусор -> 0
    pub fn java_major_version(&self) -> u32 {
        let version = &self.metadata.system_statistics.java.vendor_version;
        let first = version.split('.').next().unwrap_or_default();
        let digits: String = first.chars().take_while(|c| c.is_ascii_digit()).collect();
        digits.parse().unwrap_or(0)
    }

    pub fn platform_version(&self) -> &str {
        &self.metadata.platform.version
    }

    pub fn user_name(&self) -> &str {
        &self.metadata.user.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn report(value: Value) -> SparkReport {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_deserialize_raw_report() {
        let r = report(json!({
            "metadata": {
                "serverConfigurations": {"bukkit.yml": "{}"},
                "systemStatistics": {"java": {"vmArgs": "-Xmx4G -XX:+UseG1GC", "vendorVersion": "17.0.8+7"}},
                "platform": {"version": "git-Paper-196 (MC: 1.20.1)"},
                "user": {"name": "Steve"},
                "sampler": {"ignored": true}
            }
        }));
        assert!(r.is_server());
        assert_eq!(r.vm_args(), "-Xmx4G -XX:+UseG1GC");
        assert_eq!(r.java_major_version(), 17);
        assert_eq!(r.platform_version(), "git-Paper-196 (MC: 1.20.1)");
        assert_eq!(r.user_name(), "Steve");
    }

    #[test]
    fn test_missing_fields_default() {
        let r = report(json!({}));
        assert!(!r.is_server());
        assert_eq!(r.vm_args(), "");
        assert_eq!(r.java_major_version(), 0);
    }

    #[test]
    fn test_java_major_version_variants() {
        let with_version = |v: &str| {
            report(json!({"metadata": {"systemStatistics": {"java": {"vendorVersion": v}}}}))
                .java_major_version()
        };
        assert_eq!(with_version("21"), 21);
        assert_eq!(with_version("1.8.0_312"), 1);
        assert_eq!(with_version("17-ea"), 17);
        assert_eq!(with_version("unknown"), 0);
    }
}

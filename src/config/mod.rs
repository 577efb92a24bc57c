//! Domain-policy configuration loading
//!
//! The sanitizer's per-platform domain rules are ordinary data. Deployments
//! can ship them as a YAML file (notably to extend the blog-provider
//! allowlist without a release); the built-in default covers the canonical
//! platform set.

use crate::core::error::ConfigError;
use crate::core::model::PlatformType;
use crate::sanitizer::DomainPolicy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Domain rule for one platform, as it appears in configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum PolicyRule {
    /// Exact match against one or two canonical domains
    Strict { domains: Vec<String> },

    /// Exact match against an allowlist of known providers
    Flexible { domains: Vec<String> },

    /// No domain restriction
    Open,
}

/// One platform's entry in the policy file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyEntry {
    /// The platform this rule applies to
    pub platform: PlatformType,

    #[serde(flatten)]
    pub rule: PolicyRule,
}

/// Complete domain-policy configuration for the sanitizer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    pub platforms: Vec<PolicyEntry>,
}

impl PolicyConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.to_string()),
            message: e.to_string(),
        })
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Built-in policy set: canonical domains for the strict platforms, a
    /// small provider allowlist for blogs, everything else open.
    pub fn default_config() -> Self {
        Self {
            platforms: vec![
                PolicyEntry {
                    platform: PlatformType::Instagram,
                    rule: PolicyRule::Strict {
                        domains: vec!["instagram.com".to_string()],
                    },
                },
                PolicyEntry {
                    platform: PlatformType::Strava,
                    rule: PolicyRule::Strict {
                        domains: vec!["strava.com".to_string()],
                    },
                },
                PolicyEntry {
                    platform: PlatformType::Blog,
                    rule: PolicyRule::Flexible {
                        domains: vec![
                            "medium.com".to_string(),
                            "substack.com".to_string(),
                            "dev.to".to_string(),
                            "hashnode.com".to_string(),
                            "wordpress.com".to_string(),
                        ],
                    },
                },
                PolicyEntry {
                    platform: PlatformType::Portfolio,
                    rule: PolicyRule::Open,
                },
                PolicyEntry {
                    platform: PlatformType::CustomOne,
                    rule: PolicyRule::Open,
                },
                PolicyEntry {
                    platform: PlatformType::CustomTwo,
                    rule: PolicyRule::Open,
                },
            ],
        }
    }

    /// Convert into the policy table the sanitizer consumes.
    ///
    /// Later entries for the same platform win, so a loaded file can be
    /// merged over the defaults by concatenating entries.
    pub fn into_policies(self) -> HashMap<PlatformType, DomainPolicy> {
        self.platforms
            .into_iter()
            .map(|entry| {
                let policy = match entry.rule {
                    PolicyRule::Strict { domains } => DomainPolicy::Strict(domains),
                    PolicyRule::Flexible { domains } => DomainPolicy::Flexible(domains),
                    PolicyRule::Open => DomainPolicy::Open,
                };
                (entry.platform, policy)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_covers_all_platforms() {
        let policies = PolicyConfig::default_config().into_policies();
        for platform in PlatformType::ALL {
            assert!(policies.contains_key(&platform), "missing {:?}", platform);
        }
    }

    #[test]
    fn test_default_config_strict_platforms() {
        let policies = PolicyConfig::default_config().into_policies();
        assert_eq!(
            policies[&PlatformType::Instagram],
            DomainPolicy::Strict(vec!["instagram.com".to_string()])
        );
        assert!(matches!(
            policies[&PlatformType::Blog],
            DomainPolicy::Flexible(_)
        ));
        assert_eq!(policies[&PlatformType::Portfolio], DomainPolicy::Open);
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = PolicyConfig::default_config();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed = PolicyConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed.platforms.len(), config.platforms.len());
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r#"
            platforms:
              - platform: strava
                policy: strict
                domains: [strava.com, strava.cc]
              - platform: blog
                policy: flexible
                domains: [medium.com]
              - platform: portfolio
                policy: open
        "#;

        let config = PolicyConfig::from_yaml_str(yaml).unwrap();
        let policies = config.into_policies();
        assert_eq!(
            policies[&PlatformType::Strava],
            DomainPolicy::Strict(vec!["strava.com".to_string(), "strava.cc".to_string()])
        );
        assert_eq!(policies[&PlatformType::Portfolio], DomainPolicy::Open);
    }

    #[test]
    fn test_invalid_yaml_is_parse_error() {
        let result = PolicyConfig::from_yaml_str("platforms: [not, a, policy]");
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }
}

use std::env;

use crate::application::services::visibility::CountMode;
use crate::application::use_cases::questions::list_questions_by_lesson::ListingLimits;

pub const DEFAULT_LOG_FILTER: &str = "lesson_qa=info";

#[derive(Clone, Debug)]
pub struct Config {
    pub default_page_size: u64,
    pub max_page_size: u64,
    pub notification_capacity: usize,
    pub visibility_count: CountMode,
    pub memoize_creator_lookups: bool,
    pub log_filter: String,
    pub is_production: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 100,
            notification_capacity: 256,
            visibility_count: CountMode::PageAdjusted,
            memoize_creator_lookups: true,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            is_production: false,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup. Unparsable values fall
    /// back to their defaults.
    pub fn from_vars<F>(var: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let default_page_size = var("QA_DEFAULT_PAGE_SIZE")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.default_page_size);
        let max_page_size = var("QA_MAX_PAGE_SIZE")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.max_page_size);
        let notification_capacity = var("QA_NOTIFICATION_CAPACITY")
            .and_then(|s| s.trim().parse().ok())
            .filter(|n: &usize| *n > 0)
            .unwrap_or(defaults.notification_capacity);
        let visibility_count = var("QA_VISIBILITY_COUNT")
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.visibility_count);
        let memoize_creator_lookups = var("QA_MEMOIZE_CREATOR_LOOKUPS")
            .and_then(|s| parse_flag(&s))
            .unwrap_or(defaults.memoize_creator_lookups);
        let log_filter = var("QA_LOG_FILTER")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.log_filter);
        let is_production = matches!(
            var("RUST_ENV").as_deref(),
            Some("production") | Some("prod")
        );

        // Production hardening: page limits must be coherent
        if is_production {
            if max_page_size == 0 {
                anyhow::bail!("QA_MAX_PAGE_SIZE must be positive in production");
            }
            if default_page_size == 0 || default_page_size > max_page_size {
                anyhow::bail!(
                    "QA_DEFAULT_PAGE_SIZE ({default_page_size}) must be between 1 and QA_MAX_PAGE_SIZE ({max_page_size}) in production"
                );
            }
        }

        Ok(Self {
            default_page_size,
            max_page_size,
            notification_capacity,
            visibility_count,
            memoize_creator_lookups,
            log_filter,
            is_production,
        })
    }

    pub fn listing_limits(&self) -> ListingLimits {
        ListingLimits {
            default_page_size: self.default_page_size,
            max_page_size: self.max_page_size,
            count_mode: self.visibility_count,
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::common::PaginationInfo;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/feature_flag.ts")]
pub struct FeatureFlag {
    pub id: i64,
    pub key: String,
    pub name: String,
    pub description: Option<String>,
    pub is_enabled: bool,
    // 灰度比例 0..=100
    pub rollout_percentage: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// 64 位 FNV-1a
pub fn fnv1a_64(input: &[u8]) -> u64 {
    input.iter().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}

/// 学校在某个开关上的稳定分桶 0..100
pub fn rollout_bucket(key: &str, school_id: Option<i64>) -> u32 {
    let scope = school_id.map_or_else(|| "global".to_string(), |id| id.to_string());
    (fnv1a_64(format!("{key}:{scope}").as_bytes()) % 100) as u32
}

impl FeatureFlag {
    /// 针对某学校求值
    pub fn is_enabled_for(&self, school_id: Option<i64>) -> bool {
        if !self.is_enabled || self.rollout_percentage <= 0 {
            return false;
        }
        if self.rollout_percentage >= 100 {
            return true;
        }
        rollout_bucket(&self.key, school_id) < self.rollout_percentage as u32
    }
}

pub fn validate_rollout_percentage(value: i32) -> Result<(), String> {
    if !(0..=100).contains(&value) {
        return Err("rollout_percentage must be between 0 and 100".to_string());
    }
    Ok(())
}

fn default_rollout() -> i32 {
    100
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/feature_flag.ts")]
pub struct CreateFeatureFlagRequest {
    pub key: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_enabled: bool,
    #[serde(default = "default_rollout")]
    pub rollout_percentage: i32,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/feature_flag.ts")]
pub struct UpdateFeatureFlagRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_enabled: Option<bool>,
    pub rollout_percentage: Option<i32>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/feature_flag.ts")]
pub struct FeatureFlagEvaluation {
    pub key: String,
    pub enabled: bool,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/feature_flag.ts")]
pub struct FeatureFlagListResponse {
    pub items: Vec<FeatureFlag>,
    pub pagination: PaginationInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flag(is_enabled: bool, rollout_percentage: i32) -> FeatureFlag {
        FeatureFlag {
            id: 1,
            key: "new_gradebook".to_string(),
            name: "New gradebook".to_string(),
            description: None,
            is_enabled,
            rollout_percentage,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_fnv1a_known_vectors() {
        assert_eq!(fnv1a_64(b""), 0xcbf29ce484222325);
        assert_eq!(fnv1a_64(b"a"), 0xaf63dc4c8601ec8c);
        assert_eq!(fnv1a_64(b"foobar"), 0x85944171f73967e8);
    }

    #[test]
    fn test_bucket_follows_64_bit_hash() {
        let expected = (fnv1a_64(b"new_gradebook:7") % 100) as u32;
        assert_eq!(rollout_bucket("new_gradebook", Some(7)), expected);
        let global = (fnv1a_64(b"new_gradebook:global") % 100) as u32;
        assert_eq!(rollout_bucket("new_gradebook", None), global);
    }

    #[test]
    fn test_disabled_and_bounds() {
        assert!(!flag(false, 100).is_enabled_for(Some(1)));
        assert!(!flag(true, 0).is_enabled_for(Some(1)));
        assert!(flag(true, 100).is_enabled_for(Some(1)));
        assert!(flag(true, 100).is_enabled_for(None));
    }

    #[test]
    fn test_partial_rollout_is_stable_and_monotonic() {
        for school_id in 1..50 {
            let bucket = rollout_bucket("new_gradebook", Some(school_id));
            assert!(bucket < 100);
            assert_eq!(bucket, rollout_bucket("new_gradebook", Some(school_id)));

            let at = flag(true, bucket as i32 + 1).is_enabled_for(Some(school_id));
            let below = flag(true, bucket as i32).is_enabled_for(Some(school_id));
            assert!(at);
            assert!(!below);
        }
    }

    #[test]
    fn test_percentage_validation() {
        assert!(validate_rollout_percentage(0).is_ok());
        assert!(validate_rollout_percentage(100).is_ok());
        assert!(validate_rollout_percentage(-1).is_err());
        assert!(validate_rollout_percentage(101).is_err());
    }
}

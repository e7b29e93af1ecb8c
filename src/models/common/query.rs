use serde::{Deserialize, Deserializer, de::Error};

// 查询字符串经过 `#[serde(flatten)]` 后所有值都是字符串，
// 这里同时接受数字和字符串两种形式

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(i64),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BoolOrString {
    Bool(bool),
    Text(String),
}

/// 可选的 i64 查询参数，空字符串视为未提供
pub fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(n)) => Ok(Some(n)),
        Some(NumberOrString::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(NumberOrString::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid integer: '{s}'"))),
    }
}

/// 可选的布尔查询参数，接受 true/false/1/0
pub fn deserialize_optional_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<BoolOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(BoolOrString::Bool(b)) => Ok(Some(b)),
        Some(BoolOrString::Text(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "" => Ok(None),
            "true" | "1" => Ok(Some(true)),
            "false" | "0" => Ok(Some(false)),
            _ => Err(D::Error::custom(format!("invalid boolean: '{s}'"))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::common::PaginationQuery;

    #[derive(Deserialize)]
    struct Params {
        #[serde(flatten)]
        pagination: PaginationQuery,
        #[serde(default, deserialize_with = "deserialize_optional_i64")]
        school_id: Option<i64>,
        #[serde(default, deserialize_with = "deserialize_optional_bool")]
        is_locked: Option<bool>,
    }

    #[test]
    fn test_flattened_query_strings() {
        let p: Params =
            serde_json::from_str(r#"{"page":"2","school_id":"7","is_locked":"true"}"#).unwrap();
        assert_eq!(p.pagination.page, 2);
        assert_eq!(p.school_id, Some(7));
        assert_eq!(p.is_locked, Some(true));
    }

    #[test]
    fn test_missing_and_invalid_values() {
        let p: Params = serde_json::from_str(r#"{"school_id":""}"#).unwrap();
        assert_eq!(p.school_id, None);
        assert_eq!(p.is_locked, None);
        assert!(serde_json::from_str::<Params>(r#"{"school_id":"abc"}"#).is_err());
        assert!(serde_json::from_str::<Params>(r#"{"is_locked":"maybe"}"#).is_err());
    }
}

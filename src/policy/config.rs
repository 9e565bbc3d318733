use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// ライセンスルール: 完全一致とGlobパターンをサポート
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct LicenseRule {
    /// 完全一致するライセンス識別子のリスト
    #[serde(default)]
    pub exact: Vec<String>,
    /// Globパターン（例: "BSD-*", "*-only"）
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl LicenseRule {
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            exact: ids.into_iter().map(Into::into).collect(),
            patterns: Vec::new(),
        }
    }
}

/// 監査から除外するパッケージのエントリ
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IgnoredPackage {
    pub name: String,
    /// 未指定または "*" は全バージョンにマッチ
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// 期限を過ぎたエントリはマッチしなくなる
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<NaiveDate>,
}

impl IgnoredPackage {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            reason: None,
            expires: None,
        }
    }
}

/// Replacement license record for one package. Applied after ignore, so an
/// identity present in both never reaches the violation check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LicenseOverride {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub license_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
}

/// Policy section of the checker configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PolicyConfig {
    /// Acceptable licenses. Absent means no violation checking at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow: Option<LicenseRule>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore: Vec<IgnoredPackage>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub overrides: Vec<LicenseOverride>,
}

// src/models.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// User identity. Compares by its string form so `1` and `"1"` are the same
/// user, but serializes back in the JSON form it was read from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "RawUserId", into = "RawUserId")]
pub struct UserId {
    key: String,
    raw: RawUserId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawUserId {
    Text(String),
    Number(serde_json::Number),
}

impl From<RawUserId> for UserId {
    fn from(raw: RawUserId) -> Self {
        let key = match &raw {
            RawUserId::Text(text) => text.clone(),
            RawUserId::Number(number) => number.to_string(),
        };
        UserId { key, raw }
    }
}

impl From<UserId> for RawUserId {
    fn from(id: UserId) -> Self {
        id.raw
    }
}

impl PartialEq for UserId {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for UserId {}

impl Hash for UserId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        UserId::from(RawUserId::Text(id.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.key
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioEntry {
    pub symbol: String,
    #[serde(default)]
    pub owned: Option<serde_json::Number>,
}

impl PortfolioEntry {
    /// Share count as it appeared in the source data, empty when absent.
    pub fn owned_display(&self) -> String {
        self.owned
            .as_ref()
            .map(|owned| owned.to_string())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub firstname: String,
    #[serde(default)]
    pub lastname: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub portfolio: Vec<PortfolioEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub user: User,
}

impl UserRecord {
    /// List label, `"lastname, firstname"`.
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.user.lastname, self.user.firstname)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    pub symbol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    #[serde(
        default,
        rename = "subIndustry",
        skip_serializing_if = "Option::is_none"
    )]
    pub sub_industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Stock {
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.company.as_deref())
            .unwrap_or(&self.symbol)
    }

    pub fn sector(&self) -> &str {
        self.sector.as_deref().unwrap_or_default()
    }

    pub fn industry(&self) -> &str {
        self.sub_industry
            .as_deref()
            .or(self.industry.as_deref())
            .unwrap_or_default()
    }

    pub fn address(&self) -> &str {
        self.address.as_deref().unwrap_or_default()
    }
}

pub fn find_user<'a>(users: &'a [UserRecord], id: &str) -> Option<&'a UserRecord> {
    users.iter().find(|record| record.id.as_str() == id)
}

pub fn find_stock<'a>(stocks: &'a [Stock], symbol: &str) -> Option<&'a Stock> {
    stocks.iter().find(|stock| stock.symbol == symbol)
}

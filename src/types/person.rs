use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::sync::LazyLock;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// 画像的核心字段名
pub struct CoreFields;

impl CoreFields {
    pub const NAME: &'static str = "name";
    pub const EMAIL: &'static str = "email";
    pub const COMPANY: &'static str = "company";
    pub const ROLE: &'static str = "role";
    pub const LINKEDIN: &'static str = "linkedin";

    /// 获取所有核心字段的列表
    pub fn all() -> [&'static str; 5] {
        [
            Self::NAME,
            Self::EMAIL,
            Self::COMPANY,
            Self::ROLE,
            Self::LINKEDIN,
        ]
    }
}

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());
static LINKEDIN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"linkedin\.com/(in|company)/[\w\-%]+").unwrap());

/// 研究目标的种子描述，由调用方提供，运行期间不可变
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Seed {
    pub name: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub linkedin: Option<String>,
    pub role: Option<String>,
    /// 调用方的自由文本补充说明
    pub notes: Option<String>,
}

impl Seed {
    /// 判断种子是否为空（所有字段缺失或全为空白）
    pub fn is_empty(&self) -> bool {
        [
            &self.name,
            &self.email,
            &self.company,
            &self.linkedin,
            &self.role,
            &self.notes,
        ]
        .iter()
        .all(|field| field.as_deref().map(str::trim).unwrap_or("").is_empty())
    }

    /// 检查种子字段的合理性，返回非致命的提示信息
    pub fn sanity_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if let Some(email) = self.email.as_deref()
            && !email.trim().is_empty()
            && !EMAIL_PATTERN.is_match(email.trim())
        {
            warnings.push(format!("邮箱格式疑似不合法: {}", email));
        }
        if let Some(linkedin) = self.linkedin.as_deref()
            && !linkedin.trim().is_empty()
            && !LINKEDIN_PATTERN.is_match(linkedin.trim())
        {
            warnings.push(format!("LinkedIn地址疑似不合法: {}", linkedin));
        }
        warnings
    }

    /// 格式化为提示词中的人物描述
    pub fn descriptor(&self) -> String {
        let mut parts = Vec::new();
        if let Some(name) = self.non_blank(&self.name) {
            parts.push(format!("Name: {}", name));
        }
        if let Some(email) = self.non_blank(&self.email) {
            parts.push(format!("Email: {}", email));
        }
        if let Some(company) = self.non_blank(&self.company) {
            parts.push(format!("Company: {}", company));
        }
        if let Some(linkedin) = self.non_blank(&self.linkedin) {
            parts.push(format!("LinkedIn URL: {}", linkedin));
        }
        if let Some(role) = self.non_blank(&self.role) {
            parts.push(format!("Role: {}", role));
        }
        if let Some(notes) = self.non_blank(&self.notes) {
            parts.push(format!("Notes: {}", notes));
        }
        parts.join(" ")
    }

    /// 种子中已提供的核心字段
    pub fn present_core_fields(&self) -> Vec<&'static str> {
        let mut present = Vec::new();
        for field in CoreFields::all() {
            if self.core_field(field).is_some() {
                present.push(field);
            }
        }
        present
    }

    /// 种子中缺失的核心字段，作为首轮研究的优先目标
    pub fn absent_core_fields(&self) -> Vec<&'static str> {
        CoreFields::all()
            .into_iter()
            .filter(|field| self.core_field(field).is_none())
            .collect()
    }

    fn core_field(&self, field: &str) -> Option<&str> {
        let value = match field {
            CoreFields::NAME => &self.name,
            CoreFields::EMAIL => &self.email,
            CoreFields::COMPANY => &self.company,
            CoreFields::ROLE => &self.role,
            CoreFields::LINKEDIN => &self.linkedin,
            _ => return None,
        };
        self.non_blank(value)
    }

    fn non_blank<'a>(&self, value: &'a Option<String>) -> Option<&'a str> {
        value.as_deref().map(str::trim).filter(|v| !v.is_empty())
    }
}

/// 字段值的置信度
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    #[default]
    Low,
    Medium,
    High,
}

impl Display for Confidence {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Confidence::Low => write!(f, "low"),
            Confidence::Medium => write!(f, "medium"),
            Confidence::High => write!(f, "high"),
        }
    }
}

/// 字段值的来源出处，记录在第几轮由哪个网页产生
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    pub url: String,
    pub cycle: u32,
}

/// 与当前主值冲突、被保留备查的候选值
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlternateValue {
    pub value: String,
    pub confidence: Confidence,
    pub sources: Vec<SourceRef>,
}

/// 画像中的单个字段：主值、置信度、出处、以及冲突备选
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileField {
    pub value: String,
    pub confidence: Confidence,
    pub sources: Vec<SourceRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternates: Vec<AlternateValue>,
}

impl ProfileField {
    pub fn new(value: String, confidence: Confidence, source: SourceRef) -> Self {
        Self {
            value,
            confidence,
            sources: vec![source],
            alternates: Vec::new(),
        }
    }

    /// 是否已被至少两个独立来源确认
    pub fn is_confirmed(&self) -> bool {
        self.distinct_source_count() >= 2
    }

    /// 独立来源数量（按URL去重）
    pub fn distinct_source_count(&self) -> usize {
        let mut urls: Vec<&str> = self.sources.iter().map(|s| s.url.as_str()).collect();
        urls.sort_unstable();
        urls.dedup();
        urls.len()
    }

    /// 追加一个出处，已存在的URL不重复记录
    pub fn add_source(&mut self, source: SourceRef) {
        if !self.sources.iter().any(|s| s.url == source.url) {
            self.sources.push(source);
        }
    }
}

/// 人物画像：字段名到字段记录的映射，随研究循环逐步充实
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    fields: BTreeMap<String, ProfileField>,
}

impl Profile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&ProfileField> {
        self.fields.get(field)
    }

    pub fn get_mut(&mut self, field: &str) -> Option<&mut ProfileField> {
        self.fields.get_mut(field)
    }

    pub fn insert(&mut self, field: String, record: ProfileField) {
        self.fields.insert(field, record);
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// 已填充的字段名列表
    pub fn populated_fields(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }

    /// 字段是否已填充且被确认
    pub fn is_confirmed(&self, field: &str) -> bool {
        self.fields
            .get(field)
            .map(ProfileField::is_confirmed)
            .unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ProfileField)> {
        self.fields.iter()
    }
}

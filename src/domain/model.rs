use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Case-study category. Serialized with the kebab-case labels used by the
/// site's JSON documents and filter links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    WebApp,
    MobileApp,
    ProductDesign,
    SeoGrowth,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::WebApp => "Web Application",
            Category::MobileApp => "Mobile App",
            Category::ProductDesign => "Product Design",
            Category::SeoGrowth => "SEO & Growth",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: u32,
    pub name: String,
    pub category: Category,
    pub description: String,
    pub client: String,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    /// Display strings keyed by metric name, e.g. "conversion" -> "+45%".
    #[serde(default)]
    pub metrics: HashMap<String, String>,
    #[serde(default)]
    pub featured: bool,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: u32,
    pub name: String,
    pub role: String,
    pub bio: String,
    #[serde(default)]
    pub expertise: Vec<String>,
    /// Display position; members without one sort first (as 0).
    #[serde(default)]
    pub order: Option<i32>,
    #[serde(default)]
    pub linkedin: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Testimonial {
    pub id: u32,
    pub name: String,
    pub role: String,
    pub company: String,
    pub quote: String,
    /// 0 to 5 stars.
    pub rating: u8,
    /// Name of the project the quote refers to.
    pub project: String,
    /// Initials shown in the avatar placeholder.
    pub avatar: String,
    #[serde(default)]
    pub category: Option<String>,
}

/// The three collections the store manages, loaded and cached as a unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Collections {
    pub projects: Vec<Project>,
    pub team: Vec<TeamMember>,
    pub testimonials: Vec<Testimonial>,
}

/// Timestamped wrapper persisted to storage; valid only within the TTL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEnvelope {
    pub timestamp: DateTime<Utc>,
    pub data: Collections,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults {
    pub projects: Vec<Project>,
    pub testimonials: Vec<Testimonial>,
    pub total: usize,
}

// Wire shapes of the fetched documents: { "<collectionName>": [ ... ] }.

#[derive(Debug, Deserialize)]
pub(crate) struct ProjectsDocument {
    pub projects: Vec<Project>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TeamDocument {
    pub team: Vec<TeamMember>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TestimonialsDocument {
    pub testimonials: Vec<Testimonial>,
}

use crate::domain::model::{Category, Project, SearchResults, TeamMember, Testimonial};
use std::collections::{BTreeSet, HashMap};

/// Conjunctive project filter; fields left `None` are ignored.
/// Applied in order: category, featured, search, limit.
#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    pub category: Option<Category>,
    pub featured: Option<bool>,
    /// Case-insensitive substring over name, description, and tech tags.
    pub search: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct TestimonialFilter {
    pub category: Option<String>,
    /// Inclusive minimum rating.
    pub min_rating: Option<u8>,
    pub limit: Option<usize>,
}

pub(crate) fn filter_projects(projects: &[Project], filter: &ProjectFilter) -> Vec<Project> {
    let mut filtered: Vec<Project> = projects.to_vec();

    if let Some(category) = filter.category {
        filtered.retain(|p| p.category == category);
    }
    if let Some(featured) = filter.featured {
        filtered.retain(|p| p.featured == featured);
    }
    if let Some(search) = &filter.search {
        let term = search.to_lowercase();
        filtered.retain(|p| project_matches(p, &term));
    }
    if let Some(limit) = filter.limit {
        filtered.truncate(limit);
    }

    filtered
}

pub(crate) fn filter_testimonials(
    testimonials: &[Testimonial],
    filter: &TestimonialFilter,
) -> Vec<Testimonial> {
    let mut filtered: Vec<Testimonial> = testimonials.to_vec();

    if let Some(category) = &filter.category {
        filtered.retain(|t| t.category.as_deref() == Some(category.as_str()));
    }
    if let Some(min_rating) = filter.min_rating {
        filtered.retain(|t| t.rating >= min_rating);
    }
    if let Some(limit) = filter.limit {
        filtered.truncate(limit);
    }

    filtered
}

/// Team sorted ascending by display order; a missing order sorts as 0.
pub(crate) fn sorted_team(team: &[TeamMember]) -> Vec<TeamMember> {
    let mut sorted = team.to_vec();
    sorted.sort_by_key(|m| m.order.unwrap_or(0));
    sorted
}

pub(crate) fn search_collections(
    projects: &[Project],
    testimonials: &[Testimonial],
    query: &str,
) -> SearchResults {
    let term = query.to_lowercase();

    let projects: Vec<Project> = projects
        .iter()
        .filter(|p| project_matches(p, &term) || p.client.to_lowercase().contains(&term))
        .cloned()
        .collect();

    let testimonials: Vec<Testimonial> = testimonials
        .iter()
        .filter(|t| {
            t.name.to_lowercase().contains(&term)
                || t.quote.to_lowercase().contains(&term)
                || t.company.to_lowercase().contains(&term)
        })
        .cloned()
        .collect();

    let total = projects.len() + testimonials.len();
    SearchResults {
        projects,
        testimonials,
        total,
    }
}

/// Unique client names for the logo strip, skipping internal and
/// confidential entries; only the first comma-separated segment is shown.
pub(crate) fn unique_clients(projects: &[Project]) -> Vec<String> {
    let mut clients = BTreeSet::new();
    for project in projects {
        if project.client.contains("Internal") || project.client.contains("Confidential") {
            continue;
        }
        let name = project
            .client
            .split(',')
            .next()
            .unwrap_or(&project.client)
            .trim();
        if !name.is_empty() {
            clients.insert(name.to_string());
        }
    }
    clients.into_iter().collect()
}

pub(crate) fn category_stats(projects: &[Project]) -> HashMap<Category, usize> {
    let mut stats = HashMap::new();
    for project in projects {
        *stats.entry(project.category).or_insert(0) += 1;
    }
    stats
}

fn project_matches(project: &Project, term: &str) -> bool {
    project.name.to_lowercase().contains(term)
        || project.description.to_lowercase().contains(term)
        || project
            .tech_stack
            .iter()
            .any(|tech| tech.to_lowercase().contains(term))
}

//! Page-level shaping of fetched content.
//!
//! Pages always fetch a whole collection and then slice, sort or filter on
//! the client side. These helpers hold that logic so the CLI and server
//! present content the same way the site does.

use chrono::{DateTime, NaiveDate};
use serde::Serialize;

use crate::error::StoreResult;
use crate::models::{
    BlogPost, CaseStudy, Faq, PricingPlan, Service, Solution, TeamMember, Testimonial,
};
use crate::store::{DataService, DocumentStore};

/// Category label that matches every FAQ.
pub const ALL_CATEGORIES: &str = "All";

pub const HOME_TESTIMONIALS: usize = 3;
pub const HOME_CASE_STUDIES: usize = 6;
pub const HOME_BLOG_POSTS: usize = 6;
pub const HOME_FAQS: usize = 10;
pub const BLOG_PAGE_POSTS: usize = 6;
pub const KEY_BENEFITS_SHOWN: usize = 3;

/// Everything the home page renders.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HomeSnapshot {
    pub testimonials: Vec<Testimonial>,
    pub services: Vec<Service>,
    pub solutions: Vec<Solution>,
    pub case_studies: Vec<CaseStudy>,
    pub blog_posts: Vec<BlogPost>,
    pub team_members: Vec<TeamMember>,
    pub pricing_plans: Vec<PricingPlan>,
    pub faqs: Vec<Faq>,
}

/// Fetch all eight collections concurrently and keep the home page slices.
///
/// One failed fetch fails the whole snapshot.
pub async fn load_home<S: DocumentStore>(service: &DataService<S>) -> StoreResult<HomeSnapshot> {
    let (
        testimonials,
        services,
        solutions,
        case_studies,
        blog_posts,
        team_members,
        pricing_plans,
        faqs,
    ) = tokio::try_join!(
        service.get_all_of::<Testimonial>(),
        service.get_all_of::<Service>(),
        service.get_all_of::<Solution>(),
        service.get_all_of::<CaseStudy>(),
        service.get_all_of::<BlogPost>(),
        service.get_all_of::<TeamMember>(),
        service.get_all_of::<PricingPlan>(),
        service.get_all_of::<Faq>(),
    )?;

    Ok(HomeSnapshot {
        testimonials: take_front(testimonials.items, HOME_TESTIMONIALS),
        services: services.items,
        solutions: solutions.items,
        case_studies: take_front(case_studies.items, HOME_CASE_STUDIES),
        blog_posts: take_front(blog_posts.items, HOME_BLOG_POSTS),
        team_members: team_members.items,
        pricing_plans: pricing_plans.items,
        faqs: take_front(faqs.items, HOME_FAQS),
    })
}

/// Posts shown on the blog index.
pub async fn load_blog<S: DocumentStore>(service: &DataService<S>) -> StoreResult<Vec<BlogPost>> {
    let page = service.get_all_of::<BlogPost>().await?;
    Ok(take_front(page.items, BLOG_PAGE_POSTS))
}

pub fn take_front<T>(mut items: Vec<T>, n: usize) -> Vec<T> {
    items.truncate(n);
    items
}

/// Featured first, then ascending `displayOrder` (missing counts as 0).
/// Ties keep their fetched order.
pub fn sort_faqs(mut faqs: Vec<Faq>) -> Vec<Faq> {
    faqs.sort_by(|a, b| {
        let featured_a = a.is_featured.unwrap_or(false);
        let featured_b = b.is_featured.unwrap_or(false);
        featured_b.cmp(&featured_a).then_with(|| {
            a.display_order
                .unwrap_or(0.0)
                .total_cmp(&b.display_order.unwrap_or(0.0))
        })
    });
    faqs
}

/// `"All"` followed by each distinct non-empty category, first seen first.
pub fn faq_categories(faqs: &[Faq]) -> Vec<String> {
    let mut categories = vec![ALL_CATEGORIES.to_string()];
    for category in faqs.iter().filter_map(|f| f.category.as_deref()) {
        if !category.is_empty() && !categories[1..].iter().any(|c| c == category) {
            categories.push(category.to_string());
        }
    }
    categories
}

pub fn filter_by_category<'a>(faqs: &'a [Faq], category: &str) -> Vec<&'a Faq> {
    if category == ALL_CATEGORIES {
        return faqs.iter().collect();
    }
    faqs.iter()
        .filter(|f| f.category.as_deref() == Some(category))
        .collect()
}

/// Up to two uppercase initials, e.g. `"Priya Das"` → `"PD"`.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect()
}

/// Long US date label, e.g. `"March 2, 2024"`.
///
/// Absent dates render as an empty string; strings that are not a date are
/// returned unchanged.
pub fn format_date(date: Option<&str>) -> String {
    let Some(raw) = date.map(str::trim).filter(|s| !s.is_empty()) else {
        return String::new();
    };
    let parsed = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"));
    match parsed {
        Ok(day) => day.format("%B %-d, %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// The first few lines of a solution's benefit list. Blank lines count
/// toward the limit and come back as empty strings.
pub fn key_benefits(solution: &Solution) -> Vec<&str> {
    solution
        .key_benefits
        .as_deref()
        .map(|text| {
            text.split('\n')
                .map(str::trim)
                .take(KEY_BENEFITS_SHOWN)
                .collect()
        })
        .unwrap_or_default()
}
